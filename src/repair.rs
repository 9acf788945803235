//! Bounded validate → repair → re-validate loop.
//!
//! Each error code maps to one repair strategy. A strategy only reports an
//! action when it changed the tree, so a loop that makes no progress stops
//! early and a second run over a repaired tree applies nothing.

use std::collections::HashSet;

use layered_svoc_lexicon::Lexicon;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::chain_enforcer::{rebuild, VerbChainEnforcer};
use crate::clause::ClauseTree;
use crate::config::EngineConfig;
use crate::element::{Element, Role, RoleTag};
use crate::invariants::{InvariantValidator, Violation, ViolationCode, ViolationReport};
use crate::pattern::PatternClassifier;
use crate::role_normalizer::normalize_role;
use crate::span_reconciler::{Reconciled, SpanReconciler};
use crate::verb_chain::VerbChain;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairAction {
    pub code: ViolationCode,
    pub reason: String,
    pub clause_id: String,
    pub element_index: Option<usize>,
    /// 1-based.
    pub iteration: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairLog {
    pub actions: Vec<RepairAction>,
    pub iterations: usize,
    /// Actions applied after the first iteration, i.e. fixes for violations
    /// an earlier repair uncovered or introduced.
    pub cascade_count: usize,
}

impl RepairLog {
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// What a strategy did.
struct Repair {
    reason: String,
    /// Element indices of the clause may have shifted.
    structural: bool,
}

impl Repair {
    fn edit(reason: impl Into<String>) -> Option<Self> {
        Some(Self {
            reason: reason.into(),
            structural: false,
        })
    }

    fn restructure(reason: impl Into<String>) -> Option<Self> {
        Some(Self {
            reason: reason.into(),
            structural: true,
        })
    }
}

type Strategy<'a> = fn(&RepairLoop<'a>, &mut ClauseTree, usize, &Violation) -> Option<Repair>;

/// Violation code → repair. Codes without an entry are reported, not repaired.
fn strategy<'a>(code: ViolationCode) -> Option<Strategy<'a>> {
    let strategy: Strategy<'a> = match code {
        ViolationCode::SpanMismatch => RepairLoop::reconcile_element,
        ViolationCode::VchainStraddle | ViolationCode::VchainFragmented => RepairLoop::enforce_chains,
        ViolationCode::CompzExpands | ViolationCode::DanglingExpansion => RepairLoop::strip_expansion,
        ViolationCode::DuplicateSubject => RepairLoop::drop_subject,
        ViolationCode::UnknownRole => RepairLoop::normalize_role,
        ViolationCode::AuxOutsideVerb => RepairLoop::relabel_verb,
        ViolationCode::DanglingParent => RepairLoop::relink_parent,
        ViolationCode::PatternMismatch => RepairLoop::reclassify,
        ViolationCode::ClauseCycle
        | ViolationCode::UnchainedVerb
        | ViolationCode::MissingVerb
        | ViolationCode::UnlinkedModifier => return None,
    };
    Some(strategy)
}

pub struct RepairLoop<'a> {
    sentence: &'a str,
    lexicon: &'a Lexicon,
    chains: &'a [VerbChain],
    config: &'a EngineConfig,
}

impl<'a> RepairLoop<'a> {
    pub fn new(
        sentence: &'a str,
        lexicon: &'a Lexicon,
        chains: &'a [VerbChain],
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            sentence,
            lexicon,
            chains,
            config,
        }
    }

    pub fn run(&self, tree: &mut ClauseTree) -> (ViolationReport, RepairLog) {
        let validator = InvariantValidator::new(self.sentence, self.lexicon, self.chains);
        let mut report = validator.validate(tree);
        let mut log = RepairLog::default();

        for iteration in 1..=self.config.max_repair_iterations {
            if report.valid {
                break;
            }
            log.iterations = iteration;
            let mut restructured: HashSet<String> = HashSet::new();
            let mut applied = 0;

            for violation in report.errors() {
                if restructured.contains(&violation.clause_id) {
                    continue;
                }
                let Some(position) = tree.position(&violation.clause_id) else {
                    continue;
                };
                let Some(repair) = strategy(violation.code).and_then(|s| s(self, tree, position, violation))
                else {
                    continue;
                };
                trace!(
                    iteration,
                    code = %violation.code,
                    clause = %violation.clause_id,
                    index = ?violation.element_index,
                    reason = %repair.reason,
                    "repair"
                );
                if repair.structural {
                    restructured.insert(violation.clause_id.clone());
                }
                if iteration > 1 {
                    log.cascade_count += 1;
                }
                log.actions.push(RepairAction {
                    code: violation.code,
                    reason: repair.reason,
                    clause_id: violation.clause_id.clone(),
                    element_index: violation.element_index,
                    iteration,
                });
                applied += 1;
            }

            report = validator.validate(tree);
            debug!(iteration, applied, remaining = report.errors().count(), "repair iteration");
            if applied == 0 {
                break;
            }
        }

        if !report.valid {
            warn!(
                errors = report.errors().count(),
                iterations = log.iterations,
                "repair budget exhausted with violations remaining"
            );
        }
        (report, log)
    }

    fn reconcile_element(&self, tree: &mut ClauseTree, position: usize, violation: &Violation) -> Option<Repair> {
        let index = violation.element_index?;
        let clause = tree.clause_mut(position);
        let cursor = clause.elements[..index.min(clause.elements.len())]
            .iter()
            .filter_map(|e| e.span)
            .map(|s| s.end)
            .max()
            .unwrap_or(0);
        let element = clause.elements.get_mut(index)?;
        match SpanReconciler::new(self.sentence, &self.config.reconcile).reconcile_element(element, cursor) {
            Reconciled::Unchanged => None,
            Reconciled::Moved(strategy) => {
                Repair::edit(format!("moved {:?} to its {:?} match", element.text, strategy))
            }
            Reconciled::Unresolved => {
                Repair::edit(format!("{:?} not found in sentence, marked unresolved", element.text))
            }
        }
    }

    fn enforce_chains(&self, tree: &mut ClauseTree, position: usize, _: &Violation) -> Option<Repair> {
        let fixes = VerbChainEnforcer::new(self.sentence, self.lexicon, self.chains)
            .enforce_clause(tree, position);
        (fixes > 0)
            .then(|| Repair::restructure(format!("re-segmented verb chains ({} fixes)", fixes)))
            .flatten()
    }

    fn strip_expansion(&self, tree: &mut ClauseTree, position: usize, violation: &Violation) -> Option<Repair> {
        let element = tree.clause_mut(position).elements.get_mut(violation.element_index?)?;
        let target = element.expands_to.take()?;
        Repair::edit(format!("removed expansion to `{}` from {:?}", target, element.text))
    }

    fn drop_subject(&self, tree: &mut ClauseTree, position: usize, violation: &Violation) -> Option<Repair> {
        let index = violation.element_index?;
        let clause = tree.clause(position);
        let dropped = clause.elements.get(index).filter(|e| e.is(Role::S))?.to_string();
        let mut elements = clause.elements.clone();
        elements.remove(index);
        let remap: Vec<Option<usize>> = (0..clause.elements.len())
            .map(|i| match i.cmp(&index) {
                std::cmp::Ordering::Less => Some(i),
                std::cmp::Ordering::Equal => None,
                std::cmp::Ordering::Greater => Some(i - 1),
            })
            .collect();
        rebuild(tree, position, elements, &remap);
        Repair::restructure(format!("dropped duplicate subject {}", dropped))
    }

    fn normalize_role(&self, tree: &mut ClauseTree, position: usize, violation: &Violation) -> Option<Repair> {
        let element = tree.clause_mut(position).elements.get_mut(violation.element_index?)?;
        let RoleTag::Unrecognized(raw) = &element.role else {
            return None;
        };
        let role = normalize_role(raw);
        let reason = format!("role {:?} normalized to {}", raw, role);
        element.role = RoleTag::Known(role);
        Repair::edit(reason)
    }

    fn relabel_verb(&self, tree: &mut ClauseTree, position: usize, violation: &Violation) -> Option<Repair> {
        let element = tree.clause_mut(position).elements.get_mut(violation.element_index?)?;
        if element.is(Role::V) {
            return None;
        }
        let reason = format!("auxiliary {:?} relabelled from {} to V", element.text, element.role);
        element.role = RoleTag::Known(Role::V);
        element.modifies_index = None;
        element.arrow_type = None;
        Repair::edit(reason)
    }

    /// Point the clause at the element that expands to it, wherever that is.
    fn relink_parent(&self, tree: &mut ClauseTree, position: usize, _: &Violation) -> Option<Repair> {
        let id = tree.clause(position).id.clone();
        let expands = |e: &Element| e.expands_to.as_deref() == Some(id.as_str());
        let expanding = tree.iter().filter(|c| c.id != id).find_map(|c| {
            c.elements
                .iter()
                .position(|e| expands(e) && !e.is(Role::Compz))
                .or_else(|| c.elements.iter().position(expands))
                .map(|i| (c.id.clone(), i))
        });
        let clause = tree.clause_mut(position);
        let before = (clause.parent.clone(), clause.parent_element_index);
        match expanding {
            Some((parent, index)) => {
                clause.parent = Some(parent);
                clause.parent_element_index = Some(index);
            }
            None if clause.parent.is_some() => {
                clause.parent_element_index = None;
            }
            None => {
                clause.parent = None;
                clause.parent_element_index = None;
            }
        }
        let after = (clause.parent.clone(), clause.parent_element_index);
        if before == after {
            return None;
        }
        Repair::edit(format!(
            "parent link {:?}#{:?} rewritten to {:?}#{:?}",
            before.0, before.1, after.0, after.1
        ))
    }

    fn reclassify(&self, tree: &mut ClauseTree, position: usize, _: &Violation) -> Option<Repair> {
        let before = tree.clause(position).pattern;
        let changes = PatternClassifier::new(self.sentence, self.lexicon, self.chains)
            .classify_clause(tree, position);
        if changes == 0 {
            return None;
        }
        let after = tree.clause(position).pattern;
        Repair::restructure(format!(
            "pattern {:?} recomputed as {:?}",
            before.map(|p| p.number()),
            after.map(|p| p.number())
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::{Clause, ClauseType, SentencePattern};
    use crate::element::Span;
    use crate::token::Tokenizer;
    use crate::verb_chain::VerbChainResolver;

    fn run(sentence: &str, tree: &mut ClauseTree) -> (ViolationReport, RepairLog) {
        let lexicon = Lexicon::english();
        let tokens = Tokenizer::new(&lexicon).tokenize(sentence);
        let chains = VerbChainResolver::new(&lexicon).resolve(sentence, &tokens);
        let config = EngineConfig::standard();
        RepairLoop::new(sentence, &lexicon, &chains, &config).run(tree)
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
    fn test_valid_tree_needs_nothing() {
        let sentence = "She reads books";
        let mut tree = main_clause(
            sentence,
            vec![(Role::S, "She"), (Role::V, "reads"), (Role::Od, "books")],
        );
        let (report, log) = run(sentence, &mut tree);
        assert!(report.valid);
        assert!(log.is_empty());
        assert_eq!(log.iterations, 0);
    }

    #[test]
    fn test_repairs_several_codes() {
        let sentence = "She said that it failed";
        let mut tree = main_clause(
            sentence,
            vec![
                (Role::S, "She"),
                (Role::V, "said"),
                (Role::Compz, "that"),
                (Role::Od, "it failed"),
            ],
        );
        {
            let main = tree.clause_mut(0);
            main.elements[0].span = Some(Span::new(1, 4));
            main.elements[2].expands_to = Some("c1".to_string());
            main.elements[3].expands_to = Some("c1".to_string());
            main.elements.push(Element::find(Role::S, sentence, "it").unwrap());
            main.pattern = Some(SentencePattern::SV);
        }
        tree.push_unchecked(
            Clause::new("c1", ClauseType::Noun)
                .with_parent("main", 9)
                .with_elements(vec![
                    Element::find(Role::S, sentence, "it").unwrap(),
                    Element::find(Role::V, sentence, "failed").unwrap(),
                ]),
        );

        let (report, log) = run(sentence, &mut tree);
        assert!(report.valid, "{:?}", report.violations);
        let codes: Vec<&str> = log.actions.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(
            codes,
            vec![
                "span_mismatch",
                "duplicate_subject",
                "dangling_parent",
                "compz_expands",
                "pattern_mismatch"
            ]
        );
        assert_eq!(log.iterations, 2);
        assert_eq!(log.cascade_count, 2);
        let main = tree.clause(0);
        assert_eq!(main.elements.len(), 4);
        assert_eq!(main.elements[0].span, Some(Span::new(0, 3)));
        assert_eq!(main.elements[2].expands_to, None);
        assert_eq!(main.pattern, Some(SentencePattern::SVO));
        assert_eq!(tree.clause(1).parent_element_index, Some(3));
    }

    #[test]
    fn test_fragmented_chain_absorbs_auxiliary() {
        let sentence = "She had never been told the truth";
        let mut tree = main_clause(
            sentence,
            vec![
                (Role::S, "She"),
                (Role::M, "had"),
                (Role::M, "never"),
                (Role::V, "been told"),
                (Role::Od, "the truth"),
            ],
        );
        let (report, log) = run(sentence, &mut tree);
        assert!(report.valid, "{:?}", report.violations);
        assert_eq!(log.actions.len(), 1);
        assert_eq!(log.actions[0].code, ViolationCode::VchainFragmented);
        assert_eq!(tree.clause(0).elements[1].text, "had never been told");
        assert!(tree.clause(0).elements[1].is(Role::V));
    }

    #[test]
    fn test_auxiliary_is_relabelled() {
        let sentence = "Rarely did the committee acknowledge the report";
        let mut tree = main_clause(
            sentence,
            vec![
                (Role::M, "Rarely"),
                (Role::M, "did"),
                (Role::S, "the committee"),
                (Role::V, "acknowledge"),
                (Role::Od, "the report"),
            ],
        );
        let (report, log) = run(sentence, &mut tree);
        assert!(report.valid, "{:?}", report.violations);
        assert_eq!(log.actions[0].code, ViolationCode::AuxOutsideVerb);
        assert!(tree.clause(0).elements[1].is(Role::V));
    }

    #[test]
    fn test_unrepairable_violations_are_reported() {
        let sentence = "She sleeps";
        let mut tree = main_clause(sentence, vec![(Role::S, "She"), (Role::V, "sleeps")]);
        tree.push_unchecked(Clause::new("a", ClauseType::Noun).with_parent("b", 0));
        tree.push_unchecked(Clause::new("b", ClauseType::Noun).with_parent("a", 0));
        let (report, log) = run(sentence, &mut tree);
        assert!(!report.valid);
        assert!(report.has(ViolationCode::ClauseCycle));
        assert!(log.iterations <= 3);
    }

    #[test]
    fn test_second_run_applies_nothing() {
        let sentence = "Rarely did the committee acknowledge the report";
        let mut tree = main_clause(
            sentence,
            vec![
                (Role::M, "Rarely"),
                (Role::V, "did the committee acknowledge"),
                (Role::Od, "the report"),
            ],
        );
        let (_, first) = run(sentence, &mut tree);
        assert!(!first.is_empty());
        let (_, second) = run(sentence, &mut tree);
        assert!(second.is_empty());
    }
}
