//! Fixture file format.
//!
//! ```toml
//! title = "Raising verb takes a verbal complement"
//! sentence = "She seems to be happy"
//!
//! [[labeler.clauses]]
//! clauseId = "main"
//! type = "main"
//! elements = [
//!   { role = "S", text = "She", startIndex = 0, endIndex = 3 },
//!   { role = "V", text = "seems to be", startIndex = 4, endIndex = 15 },
//!   { role = "C", text = "happy", startIndex = 16, endIndex = 21 },
//! ]
//!
//! [[expect]]
//! clause = "main"
//! elements = ["S:She", "V:seems", "Comp:to be happy"]
//! pattern = 2
//! ```

use layered_svoc::{EngineConfig, LabelerOutput};
use serde::Deserialize;

use crate::errors::{SpecError, SpecResult};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SvocFixture {
    #[serde(default)]
    pub title: Option<String>,
    pub sentence: String,
    /// Overrides for this fixture only.
    #[serde(default)]
    pub config: Option<EngineConfig>,
    /// What the labeler returned for the sentence.
    pub labeler: LabelerOutput,
    /// Whether the final violation report must be free of errors.
    #[serde(default)]
    pub valid: Option<bool>,
    #[serde(default)]
    pub expect: Vec<ClauseExpectation>,
}

/// Expected state of one clause after analysis.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClauseExpectation {
    pub clause: String,
    /// `Role:text` per element, `Role:_` for elided ones.
    #[serde(default)]
    pub elements: Option<Vec<String>>,
    /// Sentence pattern number, 1 to 5.
    #[serde(default)]
    pub pattern: Option<u8>,
    #[serde(default)]
    pub label_contains: Option<String>,
}

impl SvocFixture {
    pub fn name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.sentence)
    }
}

/// Parse fixture TOML, reporting the line of the first error.
pub fn parse_fixture(content: &str) -> SpecResult<SvocFixture> {
    toml::from_str(content).map_err(|e| {
        let line = e
            .span()
            .and_then(|span| content.get(..span.start))
            .map_or(0, |prefix| prefix.matches('\n').count() + 1);
        SpecError::Parse {
            line,
            message: e.message().to_string(),
        }
    })
}
