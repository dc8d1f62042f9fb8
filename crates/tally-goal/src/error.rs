// error.rs — Error types for goal persistence.

use thiserror::Error;

/// Errors that can occur while loading or saving the goal book.
///
/// Storage failures are fatal to the current operation: the caller must
/// discard any in-memory mutation so the user-visible state never diverges
/// from what is actually on disk.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading the goals file failed.
    #[error("failed to read goals file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// Writing the goals file failed.
    #[error("failed to write goals file {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    /// The goals file exists but is not valid JSON of the expected shape.
    #[error("goals file {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        source: serde_json::Error,
    },

    /// The goals file parsed but violates a goal invariant
    /// (empty name, zero threshold).
    #[error("goals file {path} is invalid: {reason}")]
    Invalid { path: String, reason: String },

    /// The in-memory store's lock was poisoned.
    #[error("goal store lock poisoned: {0}")]
    Lock(String),
}
