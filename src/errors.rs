//! Error types for the engine boundary.
//!
//! Nothing inside the pipeline fails once a [`ClauseTree`](crate::ClauseTree)
//! has been built: bad spans, stray roles and broken chains become violations
//! and repair actions. Only malformed labeler input and unreadable
//! configuration are errors.

use std::path::PathBuf;
use thiserror::Error;

/// Malformed labeler output rejected at ingestion.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("clause id `{0}` appears more than once")]
    DuplicateClauseId(String),

    #[error("labeler output has no `main` clause")]
    MissingMainClause,

    /// The parent does not exist yet. Parents must precede their children,
    /// which also rules out cycles and self-parenting.
    #[error("clause `{clause}` names parent `{parent}`, which is not an earlier clause")]
    UnknownParentClause { clause: String, parent: String },

    #[error("clause `{clause}` names element {index} of `{parent}`, which has {len} elements")]
    ParentElementOutOfRange {
        clause: String,
        parent: String,
        index: usize,
        len: usize,
    },

    #[error("clause `{clause}` has a parent element index but no parent clause")]
    OrphanParentElementIndex { clause: String },

    #[error("clause `{clause}` element {index}: unknown arrow type `{value}`")]
    UnknownArrowType {
        clause: String,
        index: usize,
        value: String,
    },

    #[error("clause `{clause}` element {index}: invalid span {start}..{end}")]
    InvalidSpan {
        clause: String,
        index: usize,
        start: i64,
        end: i64,
    },

    /// A negative `parentElementIndex` or `modifiesIndex`. Absent indices
    /// are `null`, never a sentinel.
    #[error("clause `{clause}`: {field} {value} is negative")]
    InvalidIndex {
        clause: String,
        field: &'static str,
        value: i64,
    },

    #[error("malformed labeler JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type IngestResult<T> = Result<T, IngestError>;

/// Failure loading an [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Lexicon(#[from] layered_svoc_lexicon::LexiconError),
}
