// Error types for the cache core.
//
// Only startup paths (loading config, opening a durable store, loading saved
// state) return these across the public API. Gameplay operations on
// `GameState` never fail outward: empty transfers are no-ops, corrupt
// mementos (`CorruptState` from `cache::from_memento`) are logged and
// regenerated, and write failures are logged (see `game.rs`).

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type GeocacheResult<T> = Result<T, GeocacheError>;

#[derive(Error, Debug)]
pub enum GeocacheError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Corrupt saved state under '{key}': {reason}")]
    CorruptState { key: String, reason: String },

    #[error("Invalid cell key: {0:?}")]
    InvalidCellKey(String),

    #[error("Invalid token identity: {0:?}")]
    InvalidTokenId(String),

    #[error("Store directory is not usable: {0}")]
    StoreDir(PathBuf),
}

impl GeocacheError {
    /// Wrap an I/O error with a short description of what was being done.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
