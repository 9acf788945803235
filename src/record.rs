//! The labeler-facing wire records.
//!
//! Field names are camelCase and form a stable contract with the
//! orchestration layer. Indices use `-1` for elided elements.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    pub role: String,
    #[serde(default)]
    pub text: String,
    #[serde(default = "sentinel")]
    pub start_index: i64,
    #[serde(default = "sentinel")]
    pub end_index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expands_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifies_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate_group_id: Option<String>,
    /// Output only: the reconciler could not place `text`.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unresolved: bool,
}

fn sentinel() -> i64 {
    -1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClauseRecord {
    pub clause_id: String,
    #[serde(rename = "type", default)]
    pub clause_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_pattern: Option<u8>,
    /// Output only: `SV`, `SVC`, `SVO+Comp`, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_label: Option<String>,
    #[serde(default)]
    pub elements: Vec<ElementRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_clause: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_element_index: Option<i64>,
}

/// Everything the labeler returns for one sentence.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LabelerOutput {
    pub clauses: Vec<ClauseRecord>,
}

impl LabelerOutput {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
