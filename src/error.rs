use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Structural failures. Row-level ambiguity never ends up here: it is
/// resolved to a sentinel label instead.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("required column '{0}' is missing")]
    MissingColumn(String),
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("no crawler files found in {}", .0.display())]
    EmptyFolder(PathBuf),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
