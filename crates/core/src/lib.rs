//! lucky-core: hero lottery engine.
//!
//! Owns the static hero catalog, the selection engine that draws a winner
//! from the role-filtered, ban-filtered pool, the reel state machines and the
//! sequencer that turns N reel completions into one reveal, the capped draw
//! history, and the `AppState` that ties them together. Nothing here sleeps,
//! spawns or touches storage; drivers feed timed events in and persist
//! history themselves.

pub mod app;
pub mod catalog;
pub mod error;
pub mod history;
pub mod reel;
pub mod role;
pub mod selection;
pub mod sequencer;

pub use app::{AppState, DrawOutcome};
pub use catalog::{Catalog, Hero, FALLBACK_IMAGE_URL};
pub use error::Error;
pub use history::{History, HistoryEntry, HISTORY_CAPACITY};
pub use reel::{Epoch, Reel, ReelEvent, ReelEventKind, ReelState, ScheduledEvent};
pub use role::{Role, RoleSet};
pub use selection::{draw, eligible_pool, BanSet, DrawResult};
pub use sequencer::{
    LotteryPhase, Reveal, RevealSequencer, SequencerConfig, SpinPlan, MAX_REEL_COUNT, MAX_TIMING,
};
