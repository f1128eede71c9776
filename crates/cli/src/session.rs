//! A lottery session: state, durable history and the random source.

use std::path::PathBuf;

use lucky_core::{AppState, Catalog, DrawOutcome, Error};
use lucky_storage::{load_history, DirStore, HistoryStore, KvHistoryStore};
use rand::rngs::StdRng;
use rand::SeedableRng;
use time::OffsetDateTime;

use crate::config::LuckyConfig;
use crate::GlobalOptions;

pub(crate) struct Session {
    pub(crate) state: AppState,
    pub(crate) catalog: &'static Catalog,
    store: KvHistoryStore<DirStore>,
    rng: StdRng,
}

impl Session {
    /// Load config and history and build a fresh session.
    ///
    /// Only a bad config is fatal; unreadable history starts empty.
    pub(crate) fn open(opts: &GlobalOptions, instant: bool, seed: Option<u64>) -> Result<Self, String> {
        let config = LuckyConfig::load(opts.config.as_deref())?;
        let data_dir = opts
            .data_dir
            .clone()
            .unwrap_or_else(|| config.storage.data_dir.clone());
        let store = history_store(data_dir);
        let history = load_history(&store);
        tracing::debug!(entries = history.len(), "history loaded");

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Session {
            state: AppState::new(config.sequencer(instant), history),
            catalog: Catalog::builtin(),
            store,
            rng,
        })
    }

    /// Draw, then write the updated history before the reels start.
    ///
    /// A failed write is logged and the draw still stands.
    pub(crate) fn draw(&mut self) -> Result<DrawOutcome, Error> {
        let outcome = self
            .state
            .draw(self.catalog, &mut self.rng, OffsetDateTime::now_utc())?;
        if let Err(e) = self.store.save(self.state.history().entries()) {
            tracing::error!(error = %e, "failed to persist history");
        }
        Ok(outcome)
    }
}

/// History store rooted at `data_dir`, read-only callers included.
pub(crate) fn history_store(data_dir: PathBuf) -> KvHistoryStore<DirStore> {
    KvHistoryStore::new(DirStore::new(data_dir))
}
