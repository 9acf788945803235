//! Error types for the fixture harness.

use layered_svoc::IngestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecError {
    /// The fixture file is not valid fixture TOML.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("failed to load fixture: {path}: {message}")]
    Load { path: String, message: String },

    /// The engine rejected the fixture's labeler records.
    #[error("labeler records rejected: {0}")]
    Ingest(#[from] IngestError),

    /// The analysis disagrees with the fixture's expectations.
    #[error("{fixture}: {count} mismatch(es)\n{details}")]
    Mismatch {
        fixture: String,
        count: usize,
        details: String,
    },
}

pub type SpecResult<T> = Result<T, SpecError>;
