//! Engine configuration, loadable from TOML.
//!
//! ```toml
//! max_repair_iterations = 3
//! max_parenthetical_tokens = 15
//!
//! [reconcile]
//! case_insensitive = true
//! max_edit_distance = 1
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::ConfigError;

/// Tunables for the whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on validate/repair rounds.
    pub max_repair_iterations: usize,
    /// Word tokens allowed inside a comma-delimited insertion of a
    /// discontinuous verb chain.
    pub max_parenthetical_tokens: usize,
    pub reconcile: ReconcileConfig,
}

/// Which fallback strategies the span reconciler may use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    pub trim_punctuation: bool,
    pub case_insensitive: bool,
    pub collapse_whitespace: bool,
    /// Largest Levenshtein distance accepted for a word-aligned window.
    /// Zero disables fuzzy matching.
    pub max_edit_distance: usize,
}

impl EngineConfig {
    pub fn standard() -> Self {
        Self {
            max_repair_iterations: 3,
            max_parenthetical_tokens: 15,
            reconcile: ReconcileConfig::standard(),
        }
    }

    pub fn with_max_repair_iterations(mut self, iterations: usize) -> Self {
        self.max_repair_iterations = iterations;
        self
    }

    pub fn with_reconcile(mut self, reconcile: ReconcileConfig) -> Self {
        self.reconcile = reconcile;
        self
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl ReconcileConfig {
    pub fn standard() -> Self {
        Self {
            trim_punctuation: true,
            case_insensitive: true,
            collapse_whitespace: true,
            max_edit_distance: 0,
        }
    }

    /// Exact matching only.
    pub fn strict() -> Self {
        Self {
            trim_punctuation: false,
            case_insensitive: false,
            collapse_whitespace: false,
            max_edit_distance: 0,
        }
    }

    pub fn with_max_edit_distance(mut self, distance: usize) -> Self {
        self.max_edit_distance = distance;
        self
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self::standard()
    }
}
