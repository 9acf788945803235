//! Labeled constituents of a clause.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Half-open UTF-8 byte range into the sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Bytes shared by both spans.
    pub fn overlap_len(&self, other: &Span) -> usize {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        end.saturating_sub(start)
    }

    /// The text this span covers, if it lies on char boundaries inside `sentence`.
    pub fn slice<'s>(&self, sentence: &'s str) -> Option<&'s str> {
        sentence.get(self.start..self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// The nine constituent roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Subject
    S,
    /// Verb (one verb-chain part)
    V,
    /// Indirect object
    Oi,
    /// Direct object
    Od,
    /// Subject or object complement
    C,
    /// Modifier / adjunct
    M,
    /// Verbal complement, e.g. the to-infinitive after a raising verb
    Comp,
    /// Parenthetical insertion splitting a verb chain
    Insert,
    /// Complementizer introducing a subordinate clause
    Compz,
}

impl Role {
    pub const ALL: [Role; 9] = [
        Role::S,
        Role::V,
        Role::Oi,
        Role::Od,
        Role::C,
        Role::M,
        Role::Comp,
        Role::Insert,
        Role::Compz,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::S => "S",
            Role::V => "V",
            Role::Oi => "Oi",
            Role::Od => "Od",
            Role::C => "C",
            Role::M => "M",
            Role::Comp => "Comp",
            Role::Insert => "Insert",
            Role::Compz => "Compz",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    /// Exact canonical spelling only; see [`crate::normalize_role`] for synonyms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or(())
    }
}

/// A role as received from the labeler: either canonical or flagged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoleTag {
    Known(Role),
    Unrecognized(String),
}

impl RoleTag {
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<Role>() {
            Ok(role) => RoleTag::Known(role),
            Err(()) => RoleTag::Unrecognized(raw.to_string()),
        }
    }

    pub fn is(&self, role: Role) -> bool {
        matches!(self, RoleTag::Known(r) if *r == role)
    }

    pub fn known(&self) -> Option<Role> {
        match self {
            RoleTag::Known(role) => Some(*role),
            RoleTag::Unrecognized(_) => None,
        }
    }
}

impl fmt::Display for RoleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleTag::Known(role) => role.fmt(f),
            RoleTag::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

impl From<Role> for RoleTag {
    fn from(role: Role) -> Self {
        RoleTag::Known(role)
    }
}

/// How an element's arc attaches in rendered trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowType {
    Modifies,
    Complement,
    Reference,
    Insertion,
}

impl ArrowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArrowType::Modifies => "modifies",
            ArrowType::Complement => "complement",
            ArrowType::Reference => "reference",
            ArrowType::Insertion => "insertion",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "modifies" => Some(ArrowType::Modifies),
            "complement" => Some(ArrowType::Complement),
            "reference" => Some(ArrowType::Reference),
            "insertion" => Some(ArrowType::Insertion),
            _ => None,
        }
    }
}

/// One labeled constituent.
///
/// `span == None` is the elided sentinel (no surface form). Otherwise the
/// contiguity invariant says `sentence[span] == text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub text: String,
    pub span: Option<Span>,
    pub role: RoleTag,
    pub expands_to: Option<String>,
    pub modifies_index: Option<usize>,
    pub arrow_type: Option<ArrowType>,
    pub predicate_group_id: Option<String>,
    /// Set when the reconciler could not place the text in the sentence.
    pub unresolved: bool,
}

impl Element {
    pub fn new(role: Role, text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            span: Some(Span::new(start, end)),
            role: RoleTag::Known(role),
            expands_to: None,
            modifies_index: None,
            arrow_type: None,
            predicate_group_id: None,
            unresolved: false,
        }
    }

    /// An element at `span`, its text cut from `sentence`.
    pub fn at(role: Role, sentence: &str, span: Span) -> Option<Self> {
        span.slice(sentence)
            .map(|text| Self::new(role, text, span.start, span.end))
    }

    /// Locate `text` as the first exact occurrence in `sentence` that does
    /// not start or end inside a word.
    pub fn find(role: Role, sentence: &str, text: &str) -> Option<Self> {
        let word_char = |c: Option<char>| c.map_or(false, char::is_alphanumeric);
        let bounded = |start: usize| {
            let end = start + text.len();
            let before = sentence.get(..start).and_then(|p| p.chars().next_back());
            let after = sentence.get(end..).and_then(|r| r.chars().next());
            (!word_char(text.chars().next()) || !word_char(before))
                && (!word_char(text.chars().next_back()) || !word_char(after))
        };
        sentence
            .match_indices(text)
            .map(|(start, _)| start)
            .find(|&start| bounded(start))
            .map(|start| Self::new(role, text, start, start + text.len()))
    }

    pub fn elided(role: Role) -> Self {
        Self {
            text: String::new(),
            span: None,
            role: RoleTag::Known(role),
            expands_to: None,
            modifies_index: None,
            arrow_type: None,
            predicate_group_id: None,
            unresolved: false,
        }
    }

    pub fn with_role_tag(mut self, role: RoleTag) -> Self {
        self.role = role;
        self
    }

    pub fn with_expands_to(mut self, clause_id: impl Into<String>) -> Self {
        self.expands_to = Some(clause_id.into());
        self
    }

    pub fn with_modifies(mut self, index: usize) -> Self {
        self.modifies_index = Some(index);
        self
    }

    pub fn with_arrow(mut self, arrow: ArrowType) -> Self {
        self.arrow_type = Some(arrow);
        self
    }

    pub fn is_elided(&self) -> bool {
        self.span.is_none()
    }

    pub fn is(&self, role: Role) -> bool {
        self.role.is(role)
    }

    /// Whether the text equals the sentence substring at the span.
    /// Elided elements trivially satisfy this.
    pub fn matches_sentence(&self, sentence: &str) -> bool {
        match self.span {
            None => true,
            Some(span) => span.slice(sentence) == Some(self.text.as_str()),
        }
    }

    /// Lowercase whitespace-separated words of the text.
    pub fn words(&self) -> Vec<String> {
        self.text
            .split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                    .to_lowercase()
            })
            .filter(|w| !w.is_empty())
            .collect()
    }

    pub fn first_word(&self) -> Option<String> {
        self.words().into_iter().next()
    }

    /// "to" followed by at least one more word.
    pub fn is_to_infinitive(&self) -> bool {
        let words = self.words();
        words.len() >= 2 && words[0] == "to"
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span {
            Some(span) => write!(f, "{}:{:?}@{}", self.role, self.text, span),
            None => write!(f, "{}:∅", self.role),
        }
    }
}
