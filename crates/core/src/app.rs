//! Application state for one lottery session and its transitions.
//!
//! `AppState` holds everything the screen shows: lane preferences, the
//! session ban list, the history log and the reveal sequencer. Rendering and
//! persistence live outside; every transition here is a plain method that
//! either changes state and returns what the caller needs to act on, or
//! returns an error and leaves the state untouched.

use rand::Rng;
use time::OffsetDateTime;

use crate::catalog::Catalog;
use crate::error::Error;
use crate::history::{History, HistoryEntry};
use crate::reel::ReelEvent;
use crate::role::{Role, RoleSet};
use crate::selection::{self, BanSet, DrawResult};
use crate::sequencer::{LotteryPhase, Reveal, RevealSequencer, SequencerConfig, SpinPlan};

/// What a successful draw produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOutcome {
    pub result: DrawResult,
    /// The entry already prepended to history; persist the history next.
    pub entry: HistoryEntry,
    /// Timed reel events to deliver back through [`AppState::handle_reel_event`].
    pub plan: SpinPlan,
}

#[derive(Debug, Clone)]
pub struct AppState {
    selected_roles: RoleSet,
    bans: BanSet,
    history: History,
    sequencer: RevealSequencer,
    last_result: Option<DrawResult>,
}

impl AppState {
    pub fn new(config: SequencerConfig, history: History) -> Self {
        AppState {
            selected_roles: RoleSet::new(),
            bans: BanSet::new(),
            history,
            sequencer: RevealSequencer::new(config),
            last_result: None,
        }
    }

    pub fn phase(&self) -> LotteryPhase {
        self.sequencer.phase()
    }

    pub fn selected_roles(&self) -> &RoleSet {
        &self.selected_roles
    }

    /// Roles a draw would use right now: the selection, or every role when none is selected.
    pub fn requested_roles(&self) -> RoleSet {
        selection::effective_roles(&self.selected_roles)
    }

    pub fn bans(&self) -> &BanSet {
        &self.bans
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Swap in a history loaded from storage. Lanes, bans and the current
    /// cycle are kept, so events already scheduled stay valid or stale as before.
    pub fn replace_history(&mut self, history: History) {
        self.history = history;
    }

    pub fn sequencer(&self) -> &RevealSequencer {
        &self.sequencer
    }

    pub fn last_result(&self) -> Option<&DrawResult> {
        self.last_result.as_ref()
    }

    /// Select or deselect a lane. Returns whether it is now selected.
    pub fn toggle_role(&mut self, role: Role) -> bool {
        if self.selected_roles.remove(&role) {
            false
        } else {
            self.selected_roles.insert(role);
            true
        }
    }

    pub fn clear_roles(&mut self) {
        self.selected_roles.clear();
    }

    /// Ban or unban a catalog hero. Returns whether it is now banned.
    pub fn toggle_ban(&mut self, catalog: &Catalog, name: &str) -> Result<bool, Error> {
        if !catalog.contains(name) {
            return Err(Error::UnknownHero(name.to_string()));
        }
        Ok(self.bans.toggle(name))
    }

    /// Draw a winner, record it and start the reels.
    ///
    /// A draw while reels are still spinning supersedes that cycle. On
    /// [`Error::EmptyPool`] nothing changes: no history entry, no phase change.
    pub fn draw<R: Rng + ?Sized>(
        &mut self,
        catalog: &Catalog,
        rng: &mut R,
        now: OffsetDateTime,
    ) -> Result<DrawOutcome, Error> {
        let result = selection::draw(catalog, &self.bans, &self.selected_roles, rng)?;
        let entry = HistoryEntry::new(&result, now);
        self.history.record(entry.clone());
        let plan = self.sequencer.start(&result.hero, catalog, rng);
        self.last_result = Some(result.clone());
        Ok(DrawOutcome {
            result,
            entry,
            plan,
        })
    }

    pub fn handle_reel_event(&mut self, event: &ReelEvent) -> Option<Reveal> {
        self.sequencer.handle(event)
    }

    /// Leave the result screen (or abandon a spin) and return to idle.
    pub fn back(&mut self) {
        self.sequencer.reset();
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new(SequencerConfig::default(), History::new())
    }
}
