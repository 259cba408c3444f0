use std::path::PathBuf;

use thiserror::Error;

/// Structural failures. Anything raised here aborts the run; per-field
/// problems never surface as an error and instead leave the cell empty.
#[derive(Debug, Error)]
pub enum AugmentError {
    #[error("input CSV must have a header row: {}", path.display())]
    MissingHeader { path: PathBuf },

    #[error("failed to open input {}: {source}", path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create output next to {}: {source}", path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to move finished output into {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid start time '{value}': expected an ISO-8601 timestamp")]
    InvalidStartTime { value: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AugmentError>;
