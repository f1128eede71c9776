//! lucky-storage: durable records for Lucky Select.
//!
//! A small key-value layer ([`KeyValueStore`]) with an in-memory and a
//! directory-backed implementation, and the [`HistoryStore`] that keeps the
//! draw history as a single JSON record on top of it. Ban lists are
//! session-only and deliberately have no store.

pub mod conformance;
mod error;
mod history;
mod kv;

pub use error::StorageError;
pub use history::{load_history, HistoryStore, KvHistoryStore, HISTORY_KEY};
pub use kv::{DirStore, KeyValueStore, MemoryStore};
