use std::path::PathBuf;

/// All errors that can be returned by a key-value or history store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored record exists but does not parse.
    #[error("corrupt record '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Keys are limited to ASCII letters, digits, `_` and `-`.
    #[error("invalid record key: '{0}'")]
    InvalidKey(String),

    /// A backend-specific failure (poisoned lock, serialization, etc.).
    #[error("storage backend error: {0}")]
    Backend(String),
}
