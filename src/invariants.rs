//! Structural invariants over a clause tree.
//!
//! The validator never mutates. Violations come out in a fixed order (tree
//! order, then check order, then element order) so two runs over the same
//! tree produce identical reports.

use layered_svoc_lexicon::Lexicon;
use serde::Serialize;
use std::fmt;

use crate::chain_enforcer::covers_with_particle;
use crate::clause::{Clause, ClauseTree};
use crate::element::{Role, RoleTag, Span};
use crate::verb_chain::{ChainPartKind, VerbChain};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    SpanMismatch,
    DuplicateSubject,
    CompzExpands,
    UnknownRole,
    DanglingParent,
    ClauseCycle,
    DanglingExpansion,
    VchainStraddle,
    VchainFragmented,
    AuxOutsideVerb,
    PatternMismatch,
    UnchainedVerb,
    MissingVerb,
    UnlinkedModifier,
}

impl ViolationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SpanMismatch => "span_mismatch",
            Self::DuplicateSubject => "duplicate_subject",
            Self::CompzExpands => "compz_expands",
            Self::UnknownRole => "unknown_role",
            Self::DanglingParent => "dangling_parent",
            Self::ClauseCycle => "clause_cycle",
            Self::DanglingExpansion => "dangling_expansion",
            Self::VchainStraddle => "vchain_straddle",
            Self::VchainFragmented => "vchain_fragmented",
            Self::AuxOutsideVerb => "aux_outside_verb",
            Self::PatternMismatch => "pattern_mismatch",
            Self::UnchainedVerb => "unchained_verb",
            Self::MissingVerb => "missing_verb",
            Self::UnlinkedModifier => "unlinked_modifier",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::UnchainedVerb | Self::MissingVerb | Self::UnlinkedModifier => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub code: ViolationCode,
    pub severity: Severity,
    pub message: String,
    pub clause_id: String,
    pub element_index: Option<usize>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.clause_id)?;
        if let Some(index) = self.element_index {
            write!(f, "#{}", index)?;
        }
        write!(f, ": {}", self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViolationReport {
    /// No violation of error severity.
    pub valid: bool,
    pub violations: Vec<Violation>,
}

impl ViolationReport {
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        Self {
            valid: violations.iter().all(|v| v.severity != Severity::Error),
            violations,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.severity == Severity::Warning)
    }

    pub fn has(&self, code: ViolationCode) -> bool {
        self.violations.iter().any(|v| v.code == code)
    }
}

pub struct InvariantValidator<'a> {
    sentence: &'a str,
    lexicon: &'a Lexicon,
    chains: &'a [VerbChain],
}

impl<'a> InvariantValidator<'a> {
    pub fn new(sentence: &'a str, lexicon: &'a Lexicon, chains: &'a [VerbChain]) -> Self {
        Self {
            sentence,
            lexicon,
            chains,
        }
    }

    pub fn validate(&self, tree: &ClauseTree) -> ViolationReport {
        let mut out = Vec::new();
        for (position, clause) in tree.iter().enumerate() {
            let mut report = |code: ViolationCode, index: Option<usize>, message: String| {
                out.push(Violation {
                    code,
                    severity: code.severity(),
                    message,
                    clause_id: clause.id.clone(),
                    element_index: index,
                });
            };
            self.check_elements(clause, &mut report);
            check_links(tree, position, clause, &mut report);
            self.check_chains(clause, &mut report);
            self.check_predicate(clause, &mut report);
        }
        ViolationReport::from_violations(out)
    }

    fn check_elements(&self, clause: &Clause, report: &mut impl FnMut(ViolationCode, Option<usize>, String)) {
        for (i, e) in clause.elements.iter().enumerate() {
            if !e.matches_sentence(self.sentence) {
                let found = e
                    .span
                    .and_then(|s| s.slice(self.sentence))
                    .unwrap_or("<out of range>");
                report(
                    ViolationCode::SpanMismatch,
                    Some(i),
                    format!("text {:?} does not match sentence text {:?}", e.text, found),
                );
            }
            if let RoleTag::Unrecognized(raw) = &e.role {
                report(ViolationCode::UnknownRole, Some(i), format!("unknown role {:?}", raw));
            }
        }

        let mut surface_subjects = 0;
        let mut elided_subjects = 0;
        for (i, e) in clause.elements.iter().enumerate().filter(|(_, e)| e.is(Role::S)) {
            let seen = if e.is_elided() {
                elided_subjects += 1;
                elided_subjects
            } else {
                surface_subjects += 1;
                surface_subjects
            };
            if seen > 1 {
                report(
                    ViolationCode::DuplicateSubject,
                    Some(i),
                    format!("second subject {}", e),
                );
            }
        }

        for (i, e) in clause.elements.iter().enumerate() {
            if e.is(Role::Compz) && e.expands_to.is_some() {
                report(
                    ViolationCode::CompzExpands,
                    Some(i),
                    format!("complementizer {:?} expands to a clause", e.text),
                );
            }
        }
    }

    fn check_chains(&self, clause: &Clause, report: &mut impl FnMut(ViolationCode, Option<usize>, String)) {
        let parts: Vec<(ChainPartKind, Span)> = self
            .chains
            .iter()
            .flat_map(|c| c.parts.iter().map(|p| (p.kind, p.span)))
            .collect();
        let verbs: Vec<(usize, Span)> = clause
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is(Role::V))
            .filter_map(|(i, e)| e.span.map(|s| (i, s)))
            .collect();

        for &(i, span) in &verbs {
            let over: Vec<&(ChainPartKind, Span)> =
                parts.iter().filter(|(_, p)| p.overlaps(&span)).collect();
            let verb_parts: Vec<Span> = over
                .iter()
                .filter(|(k, _)| *k == ChainPartKind::Verb)
                .map(|(_, p)| *p)
                .collect();
            let insertion = over.iter().any(|(k, _)| *k == ChainPartKind::Insertion);
            let text = span.slice(self.sentence).unwrap_or_default();

            if verb_parts.is_empty() && !insertion {
                report(
                    ViolationCode::UnchainedVerb,
                    Some(i),
                    format!("verb {:?} matches no verb chain", text),
                );
            } else if verb_parts.len() > 1 || insertion {
                report(
                    ViolationCode::VchainStraddle,
                    Some(i),
                    format!("verb {:?} spans more than one chain part", text),
                );
            } else if let [part] = verb_parts.as_slice() {
                let inside = part.contains(&span)
                    || covers_with_particle(self.sentence, self.lexicon, *part, span);
                if !inside {
                    report(
                        ViolationCode::VchainStraddle,
                        Some(i),
                        format!("verb {:?} runs past its chain", text),
                    );
                }
            }
        }

        for chain in self.chains {
            for part in chain.verb_parts() {
                let covering: Vec<&(usize, Span)> =
                    verbs.iter().filter(|(_, s)| s.overlaps(&part.span)).collect();
                match covering.as_slice() {
                    [] => {}
                    [(_, span)] if span.contains(&part.span) => {}
                    [(i, _)] => report(
                        ViolationCode::VchainFragmented,
                        Some(*i),
                        format!("verb covers only part of chain {:?}", part.text),
                    ),
                    [_, (i, _), ..] => report(
                        ViolationCode::VchainFragmented,
                        Some(*i),
                        format!("chain {:?} is split over {} verbs", part.text, covering.len()),
                    ),
                }
            }
        }

        for (i, e) in clause.elements.iter().enumerate() {
            let Some(span) = e.span else {
                continue;
            };
            if e.is(Role::V) {
                continue;
            }
            let words = e.words();
            let lone_aux = words.len() == 1 && self.lexicon.is_aux_or_modal(&words[0]);
            let in_chain = self
                .chains
                .iter()
                .any(|c| c.verb_part_containing(&span).is_some());
            if lone_aux && in_chain {
                report(
                    ViolationCode::AuxOutsideVerb,
                    Some(i),
                    format!("auxiliary {:?} labelled {}", e.text, e.role),
                );
            }
        }
    }

    fn check_predicate(&self, clause: &Clause, report: &mut impl FnMut(ViolationCode, Option<usize>, String)) {
        if let Some(pattern) = clause.pattern {
            if !pattern.consistent_with(clause.profile()) {
                report(
                    ViolationCode::PatternMismatch,
                    None,
                    format!("pattern {} does not fit the roles present", pattern),
                );
            }
        }
        let has_surface = clause.elements.iter().any(|e| !e.is_elided());
        if has_surface && !clause.has_surface(Role::V) {
            report(ViolationCode::MissingVerb, None, "clause has no verb".to_string());
        }
        for (i, e) in clause.elements.iter().enumerate() {
            if e.is(Role::M) && e.modifies_index.is_none() {
                report(
                    ViolationCode::UnlinkedModifier,
                    Some(i),
                    format!("modifier {:?} has no target", e.text),
                );
            }
        }
    }
}

fn check_links(
    tree: &ClauseTree,
    position: usize,
    clause: &Clause,
    report: &mut impl FnMut(ViolationCode, Option<usize>, String),
) {
    match (&clause.parent, clause.parent_element_index) {
        (Some(parent), index) => match tree.get(parent) {
            None => report(
                ViolationCode::DanglingParent,
                None,
                format!("parent clause `{}` does not exist", parent),
            ),
            Some(p) => {
                if let Some(index) = index.filter(|&i| i >= p.elements.len()) {
                    report(
                        ViolationCode::DanglingParent,
                        None,
                        format!(
                            "parent element {} is out of range for `{}` ({} elements)",
                            index,
                            parent,
                            p.elements.len()
                        ),
                    );
                }
            }
        },
        (None, Some(index)) => report(
            ViolationCode::DanglingParent,
            None,
            format!("parent element {} given without a parent clause", index),
        ),
        (None, None) => {}
    }
    if tree.is_own_ancestor(position) {
        report(
            ViolationCode::ClauseCycle,
            None,
            "clause is its own ancestor".to_string(),
        );
    }
    for (i, e) in clause.elements.iter().enumerate() {
        if let Some(target) = &e.expands_to {
            if tree.get(target).is_none() {
                report(
                    ViolationCode::DanglingExpansion,
                    Some(i),
                    format!("expands to missing clause `{}`", target),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::{ClauseType, SentencePattern};
    use crate::element::Element;
    use crate::token::Tokenizer;
    use crate::verb_chain::VerbChainResolver;

    fn validate(sentence: &str, tree: &ClauseTree) -> ViolationReport {
        let lexicon = Lexicon::english();
        let tokens = Tokenizer::new(&lexicon).tokenize(sentence);
        let chains = VerbChainResolver::new(&lexicon).resolve(sentence, &tokens);
        InvariantValidator::new(sentence, &lexicon, &chains).validate(tree)
    }

    fn codes(report: &ViolationReport) -> Vec<&'static str> {
        report.violations.iter().map(|v| v.code.as_str()).collect()
    }

    fn main_clause(sentence: &str, elements: Vec<(Role, &str)>) -> ClauseTree {
        let mut tree = ClauseTree::new();
        tree.push_unchecked(
            Clause::main().with_elements(
                elements
                    .into_iter()
                    .map(|(role, text)| Element::find(role, sentence, text).unwrap())
                    .collect(),
            ),
        );
        tree
    }

    #[test]
    fn test_clean_clause_is_valid() {
        let sentence = "She reads books";
        let tree = main_clause(
            sentence,
            vec![(Role::S, "She"), (Role::V, "reads"), (Role::Od, "books")],
        );
        let report = validate(sentence, &tree);
        assert!(report.valid);
        assert!(report.violations.is_empty());
    }

    #[test]
    fn test_element_level_violations() {
        let sentence = "She reads books";
        let mut tree = main_clause(
            sentence,
            vec![(Role::S, "She"), (Role::V, "reads"), (Role::Od, "books")],
        );
        let clause = tree.clause_mut(0);
        clause.elements[2].span = Some(Span::new(9, 14));
        clause.elements.push(Element::find(Role::S, sentence, "books").unwrap());
        clause.elements.push(
            Element::find(Role::Compz, sentence, "She")
                .unwrap()
                .with_expands_to("nowhere"),
        );
        clause.elements[0].role = RoleTag::Unrecognized("Agent".to_string());

        let report = validate(sentence, &tree);
        assert!(!report.valid);
        assert_eq!(
            codes(&report),
            vec![
                "unknown_role",
                "span_mismatch",
                "compz_expands",
                "dangling_expansion"
            ]
        );
    }

    #[test]
    fn test_duplicate_subjects() {
        let sentence = "She and he sing";
        let tree = main_clause(
            sentence,
            vec![(Role::S, "She"), (Role::S, "he"), (Role::V, "sing")],
        );
        let report = validate(sentence, &tree);
        assert_eq!(codes(&report), vec!["duplicate_subject"]);
        assert_eq!(report.violations[0].element_index, Some(1));
    }

    #[test]
    fn test_chain_conformance() {
        let sentence = "She seems to be happy";
        let tree = main_clause(
            sentence,
            vec![(Role::S, "She"), (Role::V, "seems to be"), (Role::C, "happy")],
        );
        assert_eq!(codes(&validate(sentence, &tree)), vec!["vchain_straddle"]);

        let sentence = "She had never been told the truth";
        let tree = main_clause(
            sentence,
            vec![
                (Role::S, "She"),
                (Role::V, "had"),
                (Role::M, "never"),
                (Role::V, "been told"),
                (Role::Od, "the truth"),
            ],
        );
        let report = validate(sentence, &tree);
        assert!(report.has(ViolationCode::VchainFragmented));
        assert!(!report.valid);
    }

    #[test]
    fn test_auxiliary_outside_verb() {
        let sentence = "Rarely did the committee acknowledge the report";
        let tree = main_clause(
            sentence,
            vec![
                (Role::M, "Rarely"),
                (Role::M, "did"),
                (Role::S, "the committee"),
                (Role::V, "acknowledge"),
                (Role::Od, "the report"),
            ],
        );
        let report = validate(sentence, &tree);
        assert!(report.has(ViolationCode::AuxOutsideVerb));
    }

    #[test]
    fn test_link_violations() {
        let sentence = "She said that it failed";
        let mut tree = main_clause(
            sentence,
            vec![(Role::S, "She"), (Role::V, "said"), (Role::Od, "that it failed")],
        );
        tree.push_unchecked(
            Clause::new("c1", ClauseType::Noun)
                .with_parent("main", 7)
                .with_elements(vec![
                    Element::find(Role::S, sentence, "it").unwrap(),
                    Element::find(Role::V, sentence, "failed").unwrap(),
                ]),
        );
        tree.push_unchecked(Clause::new("c2", ClauseType::Noun).with_parent("c3", 0));
        tree.push_unchecked(Clause::new("c3", ClauseType::Noun).with_parent("c2", 0));

        let report = validate(sentence, &tree);
        let links: Vec<(&str, &str)> = report
            .violations
            .iter()
            .map(|v| (v.clause_id.as_str(), v.code.as_str()))
            .collect();
        assert_eq!(
            links,
            vec![
                ("c1", "dangling_parent"),
                ("c2", "dangling_parent"),
                ("c2", "clause_cycle"),
                ("c3", "dangling_parent"),
                ("c3", "clause_cycle"),
            ]
        );
    }

    #[test]
    fn test_pattern_and_warnings() {
        let sentence = "She reads books quickly";
        let mut tree = main_clause(
            sentence,
            vec![
                (Role::S, "She"),
                (Role::V, "reads"),
                (Role::Od, "books"),
                (Role::M, "quickly"),
            ],
        );
        tree.clause_mut(0).pattern = Some(SentencePattern::SV);
        let report = validate(sentence, &tree);
        assert_eq!(codes(&report), vec!["pattern_mismatch", "unlinked_modifier"]);
        assert_eq!(report.warnings().count(), 1);
        assert!(!report.valid);
    }

    #[test]
    fn test_validation_is_repeatable() {
        let sentence = "She seems to be happy";
        let tree = main_clause(
            sentence,
            vec![(Role::S, "She"), (Role::V, "seems to be"), (Role::M, "happy")],
        );
        assert_eq!(validate(sentence, &tree), validate(sentence, &tree));
    }
}
