//! Error types for the deck builder.
//!
//! Ingestion and queries never fail; these cover file access, snapshots and export.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A source file given to the engine does not exist.
    #[error("Source file not found: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("Snapshot encoding failed: {0}")]
    Snapshot(#[from] bincode::Error),

    /// The snapshot was written by an incompatible format version.
    #[error("Snapshot version mismatch: expected {expected}, found {found}")]
    SnapshotVersion { expected: u32, found: u32 },

    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DeckError>;
