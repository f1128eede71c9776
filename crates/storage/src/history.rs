use lucky_core::{History, HistoryEntry};

use crate::error::StorageError;
use crate::kv::KeyValueStore;

/// Record name the history is stored under.
pub const HISTORY_KEY: &str = "lottery_history";

/// Durable storage for the draw history.
///
/// `load` returns entries exactly as saved: newest-first. Capping is the
/// caller's concern (see [`load_history`]).
pub trait HistoryStore {
    fn load(&self) -> Result<Vec<HistoryEntry>, StorageError>;

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), StorageError>;
}

/// History serialized as one JSON array under [`HISTORY_KEY`].
#[derive(Debug)]
pub struct KvHistoryStore<K> {
    kv: K,
}

impl<K: KeyValueStore> KvHistoryStore<K> {
    pub fn new(kv: K) -> Self {
        KvHistoryStore { kv }
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }
}

impl<K: KeyValueStore> HistoryStore for KvHistoryStore<K> {
    fn load(&self) -> Result<Vec<HistoryEntry>, StorageError> {
        let Some(raw) = self.kv.get(HISTORY_KEY)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
            key: HISTORY_KEY.to_string(),
            source,
        })
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), StorageError> {
        let json = serde_json::to_string(entries)
            .map_err(|e| StorageError::Backend(format!("serializing history: {}", e)))?;
        self.kv.set(HISTORY_KEY, &json)
    }
}

impl<S: HistoryStore + ?Sized> HistoryStore for &S {
    fn load(&self) -> Result<Vec<HistoryEntry>, StorageError> {
        (**self).load()
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), StorageError> {
        (**self).save(entries)
    }
}

/// Startup read: missing or unreadable history becomes an empty history.
///
/// Failures are logged, never returned; the lottery must start regardless.
pub fn load_history<S: HistoryStore + ?Sized>(store: &S) -> History {
    match store.load() {
        Ok(entries) => History::from_entries(entries),
        Err(e) => {
            tracing::warn!(error = %e, "discarding unreadable history");
            History::new()
        }
    }
}
