use crate::role::Role;

/// Errors raised by the catalog, the selection engine and app-state transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No catalog entry survives the role filter and ban list.
    ///
    /// Recoverable: the caller should ask the user to relax the filters.
    /// Nothing has been mutated when this is returned.
    #[error("candidate pool is empty for roles [{}] with {banned} banned heroes", format_roles(.roles))]
    EmptyPool { roles: Vec<Role>, banned: usize },

    /// A hero name that is not part of the catalog.
    #[error("unknown hero: {0}")]
    UnknownHero(String),

    /// Two catalog entries share the same name.
    #[error("duplicate hero in catalog: {0}")]
    DuplicateHero(String),

    /// A catalog entry with an empty role set can never be drawn.
    #[error("hero has no roles: {0}")]
    HeroWithoutRoles(String),

    /// Text that does not name one of the five lanes.
    #[error("unknown role '{0}' (expected one of: top, jungle, mid, adc, support)")]
    UnknownRole(String),
}

fn format_roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(|r| r.code())
        .collect::<Vec<_>>()
        .join(", ")
}
