pub(crate) mod heroes;
pub(crate) mod history;
pub(crate) mod play;
pub(crate) mod spin;
