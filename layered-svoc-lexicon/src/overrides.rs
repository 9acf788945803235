//! Deployment-specific additions to the built-in tables, loaded from TOML.
//!
//! ```toml
//! verbs = ["onboard"]
//! adverbs = ["allegedly"]
//!
//! [verb_classes]
//! purpose-in-passive = ["onboard"]
//! bridge = ["insinuate"]
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read lexicon overrides {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid lexicon overrides: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unknown verb class `{0}`")]
    UnknownVerbClass(String),
}

/// Extra words merged into a [`Lexicon`](crate::Lexicon) via
/// [`Lexicon::with_overrides`](crate::Lexicon::with_overrides).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LexiconOverrides {
    /// Class name to lemmas. Lemmas are also added to the verb table.
    pub verb_classes: BTreeMap<String, Vec<String>>,
    pub verbs: Vec<String>,
    pub adjectives: Vec<String>,
    pub adverbs: Vec<String>,
}

impl LexiconOverrides {
    pub fn from_toml_str(content: &str) -> Result<Self, LexiconError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
