//! Clauses and the arena that holds them.
//!
//! The clause graph is a tree rooted at `main`. Parents are referenced by id
//! and must already exist when a child is inserted, so a tree built through
//! [`ClauseTree::insert`] can never contain a cycle.

use std::collections::HashMap;
use std::fmt;

use crate::element::{ArrowType, Element, Role, RoleTag, Span};
use crate::errors::{IngestError, IngestResult};
use crate::record::{ClauseRecord, ElementRecord, LabelerOutput};

pub const MAIN_CLAUSE_ID: &str = "main";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClauseType {
    Main,
    Relative,
    /// that-clauses and other content clauses
    Noun,
    Adverbial,
    Infinitive,
    Participle,
    Coordinate,
    Other(String),
}

impl ClauseType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "main" | "independent" => ClauseType::Main,
            "relative" | "adjective" | "adjectival" => ClauseType::Relative,
            "noun" | "nominal" | "content" => ClauseType::Noun,
            "adverbial" | "adverb" => ClauseType::Adverbial,
            "infinitive" | "to-infinitive" => ClauseType::Infinitive,
            "participle" | "participial" => ClauseType::Participle,
            "coordinate" => ClauseType::Coordinate,
            _ => ClauseType::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ClauseType::Main => "main",
            ClauseType::Relative => "relative",
            ClauseType::Noun => "noun",
            ClauseType::Adverbial => "adverbial",
            ClauseType::Infinitive => "infinitive",
            ClauseType::Participle => "participle",
            ClauseType::Coordinate => "coordinate",
            ClauseType::Other(raw) => raw.as_str(),
        }
    }
}

/// The five basic sentence patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SentencePattern {
    /// S-V
    SV = 1,
    /// S-V-C
    SVC = 2,
    /// S-V-Od
    SVO = 3,
    /// S-V-Oi-Od
    SVOO = 4,
    /// S-V-Od-C
    SVOC = 5,
}

/// Which roles a clause carries, as far as pattern classification cares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleProfile {
    pub od: bool,
    pub oi: bool,
    pub c: bool,
    pub comp: bool,
}

impl RoleProfile {
    pub fn of(elements: &[Element]) -> Self {
        Self {
            od: elements.iter().any(|e| e.is(Role::Od)),
            oi: elements.iter().any(|e| e.is(Role::Oi)),
            c: elements.iter().any(|e| e.is(Role::C)),
            comp: elements.iter().any(|e| e.is(Role::Comp)),
        }
    }
}

impl SentencePattern {
    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::SV),
            2 => Some(Self::SVC),
            3 => Some(Self::SVO),
            4 => Some(Self::SVOO),
            5 => Some(Self::SVOC),
            _ => None,
        }
    }

    /// `SV`, `SVC`, ..., with a `+Comp` suffix where a verbal complement
    /// rides along an S-V or S-V-O core.
    pub fn label(&self, profile: RoleProfile) -> String {
        let base = match self {
            Self::SV => "SV",
            Self::SVC => "SVC",
            Self::SVO => "SVO",
            Self::SVOO => "SVOO",
            Self::SVOC => "SVOC",
        };
        match self {
            Self::SV | Self::SVO if profile.comp => format!("{}+Comp", base),
            _ => base.to_string(),
        }
    }

    /// Whether the roles present could carry this pattern at all.
    pub fn consistent_with(&self, profile: RoleProfile) -> bool {
        match self {
            Self::SV => !profile.od && !profile.c,
            Self::SVC => profile.c || profile.comp,
            Self::SVO => profile.od,
            Self::SVOO => profile.od && profile.oi,
            Self::SVOC => profile.od && (profile.c || profile.comp),
        }
    }
}

impl fmt::Display for SentencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub id: String,
    pub clause_type: ClauseType,
    /// Free-text description, e.g. "contact relative clause".
    pub label: Option<String>,
    pub pattern: Option<SentencePattern>,
    pub pattern_label: Option<String>,
    pub elements: Vec<Element>,
    pub parent: Option<String>,
    pub parent_element_index: Option<usize>,
}

impl Clause {
    pub fn new(id: impl Into<String>, clause_type: ClauseType) -> Self {
        Self {
            id: id.into(),
            clause_type,
            label: None,
            pattern: None,
            pattern_label: None,
            elements: Vec::new(),
            parent: None,
            parent_element_index: None,
        }
    }

    pub fn main() -> Self {
        Self::new(MAIN_CLAUSE_ID, ClauseType::Main)
    }

    pub fn with_elements(mut self, elements: Vec<Element>) -> Self {
        self.elements = elements;
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>, element_index: usize) -> Self {
        self.parent = Some(parent.into());
        self.parent_element_index = Some(element_index);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_pattern(mut self, pattern: SentencePattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn is_main(&self) -> bool {
        self.id == MAIN_CLAUSE_ID
    }

    pub fn profile(&self) -> RoleProfile {
        RoleProfile::of(&self.elements)
    }

    /// Index of the last surface `V`, the clause's main verb.
    pub fn main_verb_index(&self) -> Option<usize> {
        self.elements
            .iter()
            .rposition(|e| e.is(Role::V) && !e.is_elided())
    }

    /// Indices of elements carrying `role`.
    pub fn indices_of(&self, role: Role) -> impl Iterator<Item = usize> + '_ {
        self.elements
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.is(role))
            .map(|(i, _)| i)
    }

    pub fn has_surface(&self, role: Role) -> bool {
        self.elements.iter().any(|e| e.is(role) && !e.is_elided())
    }

    /// Smallest span covering every surface element.
    pub fn extent(&self) -> Option<Span> {
        let spans = self.elements.iter().filter_map(|e| e.span);
        spans.fold(None, |acc: Option<Span>, s| match acc {
            None => Some(s),
            Some(a) => Some(Span::new(a.start.min(s.start), a.end.max(s.end))),
        })
    }
}

/// Arena of clauses, looked up by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClauseTree {
    clauses: Vec<Clause>,
    index: HashMap<String, usize>,
}

impl ClauseTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a clause. Its parent, if any, must already be present.
    pub fn insert(&mut self, clause: Clause) -> IngestResult<usize> {
        if self.index.contains_key(&clause.id) {
            return Err(IngestError::DuplicateClauseId(clause.id));
        }
        match (&clause.parent, clause.parent_element_index) {
            (None, Some(_)) => {
                return Err(IngestError::OrphanParentElementIndex { clause: clause.id });
            }
            (Some(parent), index) => {
                let parent_clause = self.get(parent).ok_or_else(|| {
                    IngestError::UnknownParentClause {
                        clause: clause.id.clone(),
                        parent: parent.clone(),
                    }
                })?;
                if let Some(index) = index {
                    let len = parent_clause.elements.len();
                    if index >= len {
                        return Err(IngestError::ParentElementOutOfRange {
                            clause: clause.id.clone(),
                            parent: parent.clone(),
                            index,
                            len,
                        });
                    }
                }
            }
            (None, None) => {}
        }
        Ok(self.push_unchecked(clause))
    }

    /// Append without checking parents. Used by repairs that rewrite links
    /// and by tests that need a corrupt tree.
    pub(crate) fn push_unchecked(&mut self, clause: Clause) -> usize {
        let position = self.clauses.len();
        self.index.insert(clause.id.clone(), position);
        self.clauses.push(clause);
        position
    }

    pub fn from_records(records: &[ClauseRecord]) -> IngestResult<Self> {
        let mut tree = Self::new();
        for record in records {
            tree.insert(clause_from_record(record)?)?;
        }
        if tree.get(MAIN_CLAUSE_ID).is_none() {
            return Err(IngestError::MissingMainClause);
        }
        Ok(tree)
    }

    pub fn to_output(&self) -> LabelerOutput {
        LabelerOutput {
            clauses: self.clauses.iter().map(clause_to_record).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&Clause> {
        self.position(id).map(|i| &self.clauses[i])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Clause> {
        match self.position(id) {
            Some(i) => Some(&mut self.clauses[i]),
            None => None,
        }
    }

    pub fn main(&self) -> Option<&Clause> {
        self.get(MAIN_CLAUSE_ID)
    }

    pub fn clause(&self, position: usize) -> &Clause {
        &self.clauses[position]
    }

    pub fn clause_mut(&mut self, position: usize) -> &mut Clause {
        &mut self.clauses[position]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Clause> {
        self.clauses.iter_mut()
    }

    pub fn children_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Clause> + 'a {
        self.clauses
            .iter()
            .filter(move |c| c.parent.as_deref() == Some(id))
    }

    /// Whether following parent links from `position` leads back to it.
    pub fn is_own_ancestor(&self, position: usize) -> bool {
        let start = &self.clauses[position].id;
        let mut current = self.clauses[position].parent.clone();
        for _ in 0..self.clauses.len() {
            match current {
                None => return false,
                Some(ref id) if id == start => return true,
                Some(ref id) => {
                    current = self.get(id).and_then(|c| c.parent.clone());
                }
            }
        }
        current.is_some()
    }

    /// Rewrite `parent_element_index` of every child of `parent_id` through
    /// an old→new element index map.
    pub(crate) fn remap_child_links(&mut self, parent_id: &str, remap: &[Option<usize>]) {
        for clause in self.clauses.iter_mut() {
            if clause.parent.as_deref() != Some(parent_id) {
                continue;
            }
            if let Some(old) = clause.parent_element_index {
                clause.parent_element_index = remap.get(old).copied().flatten();
            }
        }
    }
}

fn clause_from_record(record: &ClauseRecord) -> IngestResult<Clause> {
    let id = record.clause_id.clone();
    let elements = record
        .elements
        .iter()
        .enumerate()
        .map(|(index, element)| element_from_record(&id, index, element))
        .collect::<IngestResult<Vec<_>>>()?;

    let parent_element_index = record
        .parent_element_index
        .map(|i| non_negative(&id, "parentElementIndex", i))
        .transpose()?;
    let pattern = record.sentence_pattern.and_then(SentencePattern::from_number);

    Ok(Clause {
        id,
        clause_type: ClauseType::parse(&record.clause_type),
        label: record.type_label.clone(),
        pattern,
        pattern_label: record.pattern_label.clone(),
        elements,
        parent: record.parent_clause.clone().filter(|p| !p.is_empty()),
        parent_element_index,
    })
}

fn element_from_record(clause: &str, index: usize, record: &ElementRecord) -> IngestResult<Element> {
    let span = match (record.start_index, record.end_index) {
        (s, e) if s < 0 && e < 0 => None,
        (s, e) if s >= 0 && e >= s => Some(Span::new(s as usize, e as usize)),
        (start, end) => {
            return Err(IngestError::InvalidSpan {
                clause: clause.to_string(),
                index,
                start,
                end,
            })
        }
    };
    let arrow_type = match record.arrow_type.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(ArrowType::parse(raw).ok_or_else(|| IngestError::UnknownArrowType {
            clause: clause.to_string(),
            index,
            value: raw.to_string(),
        })?),
    };

    Ok(Element {
        text: record.text.clone(),
        span,
        role: RoleTag::parse(&record.role),
        expands_to: record.expands_to.clone().filter(|c| !c.is_empty()),
        modifies_index: record
            .modifies_index
            .map(|i| non_negative(clause, "modifiesIndex", i))
            .transpose()?,
        arrow_type,
        predicate_group_id: record.predicate_group_id.clone(),
        unresolved: false,
    })
}

fn non_negative(clause: &str, field: &'static str, value: i64) -> IngestResult<usize> {
    usize::try_from(value).map_err(|_| IngestError::InvalidIndex {
        clause: clause.to_string(),
        field,
        value,
    })
}

fn clause_to_record(clause: &Clause) -> ClauseRecord {
    ClauseRecord {
        clause_id: clause.id.clone(),
        clause_type: clause.clause_type.as_str().to_string(),
        type_label: clause.label.clone(),
        sentence_pattern: clause.pattern.map(|p| p.number()),
        pattern_label: clause.pattern_label.clone(),
        elements: clause.elements.iter().map(element_to_record).collect(),
        parent_clause: clause.parent.clone(),
        parent_element_index: clause.parent_element_index.map(|i| i as i64),
    }
}

fn element_to_record(element: &Element) -> ElementRecord {
    let (start_index, end_index) = match element.span {
        Some(span) => (span.start as i64, span.end as i64),
        None => (-1, -1),
    };
    ElementRecord {
        role: element.role.to_string(),
        text: element.text.clone(),
        start_index,
        end_index,
        expands_to: element.expands_to.clone(),
        modifies_index: element.modifies_index.map(|i| i as i64),
        arrow_type: element.arrow_type.map(|a| a.as_str().to_string()),
        predicate_group_id: element.predicate_group_id.clone(),
        unresolved: element.unresolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, parent: Option<&str>, parent_index: Option<i64>) -> ClauseRecord {
        ClauseRecord {
            clause_id: id.to_string(),
            clause_type: if id == "main" { "main" } else { "noun" }.to_string(),
            type_label: None,
            sentence_pattern: None,
            pattern_label: None,
            elements: vec![ElementRecord {
                role: "S".to_string(),
                text: "It".to_string(),
                start_index: 0,
                end_index: 2,
                expands_to: None,
                modifies_index: None,
                arrow_type: None,
                predicate_group_id: None,
                unresolved: false,
            }],
            parent_clause: parent.map(str::to_string),
            parent_element_index: parent_index,
        }
    }

    #[test]
    fn test_tree_from_records() {
        let tree = ClauseTree::from_records(&[
            record("main", None, None),
            record("c1", Some("main"), Some(0)),
        ])
        .unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.children_of("main").count(), 1);
        assert!(!tree.is_own_ancestor(1));
    }

    #[test]
    fn test_parent_must_come_first() {
        let err = ClauseTree::from_records(&[
            record("main", None, None),
            record("c2", Some("c1"), Some(0)),
            record("c1", Some("main"), Some(0)),
        ])
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "clause `c2` names parent `c1`, which is not an earlier clause"
        );
    }

    #[test]
    fn test_self_parent_is_rejected() {
        let err = ClauseTree::from_records(&[
            record("main", None, None),
            record("c1", Some("c1"), Some(0)),
        ])
        .unwrap_err();
        assert!(matches!(err, IngestError::UnknownParentClause { .. }));
    }

    #[test]
    fn test_ingest_errors() {
        assert!(matches!(
            ClauseTree::from_records(&[record("c1", None, None)]),
            Err(IngestError::MissingMainClause)
        ));
        assert!(matches!(
            ClauseTree::from_records(&[record("main", None, None), record("main", None, None)]),
            Err(IngestError::DuplicateClauseId(_))
        ));
        assert!(matches!(
            ClauseTree::from_records(&[
                record("main", None, None),
                record("c1", Some("main"), Some(3))
            ]),
            Err(IngestError::ParentElementOutOfRange { index: 3, len: 1, .. })
        ));
        assert!(matches!(
            ClauseTree::from_records(&[record("main", None, Some(0))]),
            Err(IngestError::OrphanParentElementIndex { .. })
        ));

        let mut bad_arrow = record("main", None, None);
        bad_arrow.elements[0].arrow_type = Some("sideways".to_string());
        assert!(matches!(
            ClauseTree::from_records(&[bad_arrow]),
            Err(IngestError::UnknownArrowType { .. })
        ));

        let mut bad_span = record("main", None, None);
        bad_span.elements[0].start_index = -1;
        assert!(matches!(
            ClauseTree::from_records(&[bad_span]),
            Err(IngestError::InvalidSpan { start: -1, end: 2, .. })
        ));
    }

    #[test]
    fn test_negative_indices_are_rejected() {
        let err = ClauseTree::from_records(&[
            record("main", None, None),
            record("c1", Some("main"), Some(-1)),
        ])
        .unwrap_err();
        assert_eq!(err.to_string(), "clause `c1`: parentElementIndex -1 is negative");

        let mut modifier = record("main", None, None);
        modifier.elements[0].modifies_index = Some(-2);
        assert!(matches!(
            ClauseTree::from_records(&[modifier]),
            Err(IngestError::InvalidIndex {
                field: "modifiesIndex",
                value: -2,
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_roles_are_flagged_not_rejected() {
        let mut odd = record("main", None, None);
        odd.elements[0].role = "Subject".to_string();
        let tree = ClauseTree::from_records(&[odd]).unwrap();
        assert_eq!(
            tree.main().unwrap().elements[0].role,
            RoleTag::Unrecognized("Subject".to_string())
        );
    }

    #[test]
    fn test_cycle_detection_on_unchecked_trees() {
        let mut tree = ClauseTree::new();
        tree.push_unchecked(Clause::main());
        tree.push_unchecked(Clause::new("a", ClauseType::Noun).with_parent("b", 0));
        tree.push_unchecked(Clause::new("b", ClauseType::Noun).with_parent("a", 0));
        assert!(!tree.is_own_ancestor(0));
        assert!(tree.is_own_ancestor(1));
        assert!(tree.is_own_ancestor(2));
    }

    #[test]
    fn test_pattern_labels() {
        let comp = RoleProfile {
            comp: true,
            ..RoleProfile::default()
        };
        assert_eq!(SentencePattern::SV.label(comp), "SV+Comp");
        assert_eq!(SentencePattern::SVC.label(comp), "SVC");
        assert!(SentencePattern::SVC.consistent_with(comp));
        assert!(!SentencePattern::SVO.consistent_with(comp));
    }

    #[test]
    fn test_records_round_trip_through_tree() {
        let records = vec![record("main", None, None), record("c1", Some("main"), Some(0))];
        let tree = ClauseTree::from_records(&records).unwrap();
        assert_eq!(tree.to_output().clauses, records);
    }
}
