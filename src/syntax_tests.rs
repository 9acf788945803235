//! Diagnostic syntax tests over the final tree.
//!
//! Results are evidence for monitoring only. Nothing here mutates the tree
//! and no outcome blocks the analysis from being returned.

use layered_svoc_lexicon::Lexicon;
use serde::Serialize;
use std::fmt;

use crate::clause::{Clause, ClauseTree, ClauseType};
use crate::element::Role;
use crate::gap_detector::{detect_gap, validate_clause_type, ClauseTypeCheck};
use crate::to_infinitive::{is_to_infinitive, ToInfinitiveClassifier};
use crate::verb_chain::VerbChain;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
    Warn,
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TestStatus::Pass => "pass",
            TestStatus::Fail => "fail",
            TestStatus::Warn => "warn",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntaxTestEvidence {
    pub id: &'static str,
    pub status: TestStatus,
    pub message: String,
    pub clause_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence_text: Option<String>,
    pub rule_id: &'static str,
    pub confidence: f32,
}

impl SyntaxTestEvidence {
    fn new(id: &'static str, rule_id: &'static str, status: TestStatus, message: impl Into<String>) -> Self {
        Self {
            id,
            status,
            message: message.into(),
            clause_id: None,
            element_index: None,
            evidence_text: None,
            rule_id,
            confidence: 1.0,
        }
    }

    fn in_clause(mut self, clause: &Clause) -> Self {
        self.clause_id = Some(clause.id.clone());
        self
    }

    fn at(mut self, index: usize) -> Self {
        self.element_index = Some(index);
        self
    }

    fn with_evidence(mut self, text: impl Into<String>) -> Self {
        self.evidence_text = Some(text.into());
        self
    }

    fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }
}

pub struct SyntaxTestRunner<'a> {
    sentence: &'a str,
    lexicon: &'a Lexicon,
    chains: &'a [VerbChain],
}

impl<'a> SyntaxTestRunner<'a> {
    pub fn new(sentence: &'a str, lexicon: &'a Lexicon, chains: &'a [VerbChain]) -> Self {
        Self {
            sentence,
            lexicon,
            chains,
        }
    }

    pub fn run(&self, tree: &ClauseTree) -> Vec<SyntaxTestEvidence> {
        let mut out = Vec::new();
        for clause in tree.iter() {
            self.aux_in_v_chain(clause, &mut out);
            finite_verb_exists(clause, &mut out);
            self.span_exact_match(clause, &mut out);
            m_has_target(clause, &mut out);
            self.v_excludes_to_infinitive(clause, &mut out);
        }
        expands_to_integrity(tree, &mut out);
        pattern_consistency(tree, &mut out);
        self.relative_gap(tree, &mut out);
        self.noun_clause_completeness(tree, &mut out);
        self.to_inf_function(tree, &mut out);
        out
    }

    fn aux_in_v_chain(&self, clause: &Clause, out: &mut Vec<SyntaxTestEvidence>) {
        const ID: &str = "aux_in_v_chain";
        const RULE: &str = "aux-in-v";
        let before = out.len();
        for (i, e) in clause.elements.iter().enumerate() {
            if e.is(Role::V) || e.is_elided() {
                continue;
            }
            let words = e.words();
            if words.len() == 1 && self.lexicon.is_aux_or_modal(&words[0]) {
                out.push(
                    SyntaxTestEvidence::new(
                        ID,
                        RULE,
                        TestStatus::Fail,
                        format!("auxiliary {:?} is labelled {}, not V", e.text, e.role),
                    )
                    .in_clause(clause)
                    .at(i)
                    .with_evidence(e.text.clone()),
                );
            }
        }
        if out.len() == before {
            out.push(
                SyntaxTestEvidence::new(ID, RULE, TestStatus::Pass, "every auxiliary sits in a V element")
                    .in_clause(clause),
            );
        }
    }

    fn span_exact_match(&self, clause: &Clause, out: &mut Vec<SyntaxTestEvidence>) {
        const ID: &str = "span_exact_match";
        const RULE: &str = "span-match";
        let before = out.len();
        for (i, e) in clause.elements.iter().enumerate() {
            if !e.matches_sentence(self.sentence) {
                let found = e.span.and_then(|s| s.slice(self.sentence)).unwrap_or_default();
                out.push(
                    SyntaxTestEvidence::new(
                        ID,
                        RULE,
                        TestStatus::Fail,
                        format!("{:?} does not match sentence text {:?}", e.text, found),
                    )
                    .in_clause(clause)
                    .at(i)
                    .with_evidence(e.text.clone()),
                );
            }
        }
        if out.len() == before {
            out.push(
                SyntaxTestEvidence::new(ID, RULE, TestStatus::Pass, "every span matches the sentence")
                    .in_clause(clause),
            );
        }
    }

    /// "seems to be" as one `V` hides a verbal complement.
    fn v_excludes_to_infinitive(&self, clause: &Clause, out: &mut Vec<SyntaxTestEvidence>) {
        const ID: &str = "v_excludes_to_infinitive";
        const RULE: &str = "v-no-to-inf";
        let before = out.len();
        for (i, e) in clause.elements.iter().enumerate().filter(|(_, e)| e.is(Role::V)) {
            let words = e.words();
            let contains = words
                .windows(2)
                .any(|pair| pair[0] == "to" && self.lexicon.is_known_verb(&pair[1]));
            if contains {
                out.push(
                    SyntaxTestEvidence::new(
                        ID,
                        RULE,
                        TestStatus::Fail,
                        format!("verb {:?} contains a to-infinitive", e.text),
                    )
                    .in_clause(clause)
                    .at(i)
                    .with_evidence(e.text.clone()),
                );
            }
        }
        if out.len() == before {
            out.push(
                SyntaxTestEvidence::new(ID, RULE, TestStatus::Pass, "no verb contains a to-infinitive")
                    .in_clause(clause),
            );
        }
    }

    fn relative_gap(&self, tree: &ClauseTree, out: &mut Vec<SyntaxTestEvidence>) {
        for (position, clause) in tree.iter().enumerate() {
            if clause.clause_type != ClauseType::Relative {
                continue;
            }
            let evidence = match detect_gap(self.lexicon, tree, position) {
                Some(gap) => SyntaxTestEvidence::new(
                    "relative_gap",
                    "rel-gap",
                    TestStatus::Pass,
                    format!("relative clause has a {:?} gap", gap.role),
                )
                .with_evidence(format!("gap: {:?}", gap.role))
                .with_confidence(gap.confidence),
                None => match validate_clause_type(self.lexicon, tree, position) {
                    ClauseTypeCheck::RelativeWithoutGap {
                        parent_takes_that: true,
                    } => SyntaxTestEvidence::new(
                        "relative_gap",
                        "rel-gap",
                        TestStatus::Warn,
                        "relative clause has no gap and the parent verb takes a that-complement, likely a noun clause",
                    )
                    .with_confidence(0.8),
                    _ => SyntaxTestEvidence::new(
                        "relative_gap",
                        "rel-gap",
                        TestStatus::Warn,
                        "relative clause has no identifiable gap, may be a noun clause",
                    )
                    .with_confidence(0.6),
                },
            };
            out.push(evidence.in_clause(clause));
        }
    }

    fn noun_clause_completeness(&self, tree: &ClauseTree, out: &mut Vec<SyntaxTestEvidence>) {
        const ID: &str = "noun_clause_completeness";
        const RULE: &str = "noun-complete";
        for (position, clause) in tree.iter().enumerate() {
            let that_clause = clause
                .elements
                .iter()
                .any(|e| e.is(Role::Compz) && e.first_word().as_deref() == Some("that"));
            if clause.clause_type != ClauseType::Noun && !that_clause {
                continue;
            }
            let evidence = if !clause.has_surface(Role::V) {
                SyntaxTestEvidence::new(ID, RULE, TestStatus::Fail, "noun clause has no predicate")
            } else if validate_clause_type(self.lexicon, tree, position) == ClauseTypeCheck::NounClauseWithGap {
                let gap = detect_gap(self.lexicon, tree, position);
                SyntaxTestEvidence::new(
                    ID,
                    RULE,
                    TestStatus::Warn,
                    "noun clause is missing a constituent, may be a relative clause",
                )
                .with_confidence(gap.map_or(0.5, |g| g.confidence))
            } else {
                SyntaxTestEvidence::new(ID, RULE, TestStatus::Pass, "noun clause is complete")
            };
            out.push(evidence.in_clause(clause));
        }
    }

    fn to_inf_function(&self, tree: &ClauseTree, out: &mut Vec<SyntaxTestEvidence>) {
        let classifier = ToInfinitiveClassifier::new(self.lexicon, self.chains);
        for clause in tree.iter() {
            for (i, e) in clause.elements.iter().enumerate() {
                if !is_to_infinitive(self.lexicon, e) {
                    continue;
                }
                let Some(reading) = classifier.classify(clause, i) else {
                    continue;
                };
                let status = if reading.confidence < 0.7 {
                    TestStatus::Warn
                } else {
                    TestStatus::Pass
                };
                out.push(
                    SyntaxTestEvidence::new(
                        "to_inf_function",
                        "to-inf-function",
                        status,
                        format!("to-infinitive {:?} reads as {}", e.text, reading.function),
                    )
                    .in_clause(clause)
                    .at(i)
                    .with_evidence(format!("{} -> {}", e.text, reading.function))
                    .with_confidence(reading.confidence),
                );
            }
        }
    }
}

fn finite_verb_exists(clause: &Clause, out: &mut Vec<SyntaxTestEvidence>) {
    let surface = clause.elements.iter().any(|e| !e.is_elided());
    let evidence = if surface && !clause.has_surface(Role::V) {
        SyntaxTestEvidence::new("finite_verb_exists", "finite-v", TestStatus::Fail, "no verb in clause")
    } else {
        SyntaxTestEvidence::new("finite_verb_exists", "finite-v", TestStatus::Pass, "verb present")
    };
    out.push(evidence.in_clause(clause));
}

fn m_has_target(clause: &Clause, out: &mut Vec<SyntaxTestEvidence>) {
    const ID: &str = "m_has_target";
    const RULE: &str = "m-target";
    let before = out.len();
    for (i, e) in clause.elements.iter().enumerate().filter(|(_, e)| e.is(Role::M)) {
        match e.modifies_index {
            None => out.push(
                SyntaxTestEvidence::new(ID, RULE, TestStatus::Warn, format!("modifier {:?} has no target", e.text))
                    .in_clause(clause)
                    .at(i)
                    .with_confidence(0.7),
            ),
            Some(target) if target >= clause.elements.len() => out.push(
                SyntaxTestEvidence::new(
                    ID,
                    RULE,
                    TestStatus::Fail,
                    format!("modifier {:?} targets missing element {}", e.text, target),
                )
                .in_clause(clause)
                .at(i),
            ),
            Some(_) => {}
        }
    }
    if out.len() == before {
        out.push(
            SyntaxTestEvidence::new(ID, RULE, TestStatus::Pass, "every modifier has a target").in_clause(clause),
        );
    }
}

fn expands_to_integrity(tree: &ClauseTree, out: &mut Vec<SyntaxTestEvidence>) {
    const ID: &str = "expands_to_integrity";
    const RULE: &str = "expands-to";
    let before = out.len();
    for clause in tree.iter() {
        for (i, e) in clause.elements.iter().enumerate() {
            let Some(target) = e.expands_to.as_deref() else {
                continue;
            };
            let problem = if e.is(Role::Compz) {
                Some("a complementizer cannot expand to a clause".to_string())
            } else {
                match tree.get(target) {
                    None => Some(format!("expands to missing clause `{}`", target)),
                    Some(child) if child.parent.as_deref() != Some(clause.id.as_str()) => Some(format!(
                        "expands to `{}`, whose parent is {:?}",
                        target, child.parent
                    )),
                    Some(_) => None,
                }
            };
            if let Some(message) = problem {
                out.push(
                    SyntaxTestEvidence::new(ID, RULE, TestStatus::Fail, message)
                        .in_clause(clause)
                        .at(i)
                        .with_evidence(e.text.clone()),
                );
            }
        }
    }
    if out.len() == before {
        out.push(SyntaxTestEvidence::new(
            ID,
            RULE,
            TestStatus::Pass,
            "every expansion points at a child clause",
        ));
    }
}

fn pattern_consistency(tree: &ClauseTree, out: &mut Vec<SyntaxTestEvidence>) {
    for clause in tree.iter() {
        let Some(pattern) = clause.pattern else {
            continue;
        };
        let consistent = pattern.consistent_with(clause.profile());
        let (status, confidence) = if consistent {
            (TestStatus::Pass, 1.0)
        } else {
            (TestStatus::Fail, 0.9)
        };
        out.push(
            SyntaxTestEvidence::new(
                "pattern_consistency",
                "pattern",
                status,
                format!(
                    "pattern {} {} the roles present",
                    clause.pattern_label.as_deref().unwrap_or("?"),
                    if consistent { "fits" } else { "does not fit" }
                ),
            )
            .in_clause(clause)
            .with_confidence(confidence),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::SentencePattern;
    use crate::element::Element;
    use crate::token::Tokenizer;
    use crate::verb_chain::VerbChainResolver;

    fn run(sentence: &str, tree: &ClauseTree) -> Vec<SyntaxTestEvidence> {
        let lexicon = Lexicon::english();
        let tokens = Tokenizer::new(&lexicon).tokenize(sentence);
        let chains = VerbChainResolver::new(&lexicon).resolve(sentence, &tokens);
        SyntaxTestRunner::new(sentence, &lexicon, &chains).run(tree)
    }

    fn statuses(evidence: &[SyntaxTestEvidence], id: &str) -> Vec<TestStatus> {
        evidence.iter().filter(|e| e.id == id).map(|e| e.status).collect()
    }

    fn tree_of(sentence: &str, elements: Vec<(Role, &str)>) -> ClauseTree {
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
    fn test_clean_tree_passes() {
        let sentence = "She reads books";
        let mut tree = tree_of(
            sentence,
            vec![(Role::S, "She"), (Role::V, "reads"), (Role::Od, "books")],
        );
        tree.clause_mut(0).pattern = Some(SentencePattern::SVO);
        let evidence = run(sentence, &tree);
        assert!(evidence.iter().all(|e| e.status == TestStatus::Pass), "{:#?}", evidence);
        assert_eq!(statuses(&evidence, "pattern_consistency"), vec![TestStatus::Pass]);
    }

    #[test]
    fn test_failures_are_reported_not_fixed() {
        let sentence = "She seems to be happy";
        let tree = tree_of(
            sentence,
            vec![(Role::S, "She"), (Role::V, "seems to be"), (Role::C, "happy")],
        );
        let before = tree.clone();
        let evidence = run(sentence, &tree);
        assert_eq!(statuses(&evidence, "v_excludes_to_infinitive"), vec![TestStatus::Fail]);
        assert_eq!(tree, before);
    }

    #[test]
    fn test_auxiliary_and_modifier_checks() {
        let sentence = "Rarely did the committee acknowledge the report";
        let tree = tree_of(
            sentence,
            vec![
                (Role::M, "Rarely"),
                (Role::M, "did"),
                (Role::S, "the committee"),
                (Role::V, "acknowledge"),
                (Role::Od, "the report"),
            ],
        );
        let evidence = run(sentence, &tree);
        assert_eq!(statuses(&evidence, "aux_in_v_chain"), vec![TestStatus::Fail]);
        assert_eq!(
            statuses(&evidence, "m_has_target"),
            vec![TestStatus::Warn, TestStatus::Warn]
        );
    }

    #[test]
    fn test_that_clause_needs_predicate() {
        let sentence = "She said that it failed";
        let mut tree = tree_of(
            sentence,
            vec![(Role::S, "She"), (Role::V, "said"), (Role::Od, "that it failed")],
        );
        tree.clause_mut(0).elements[2].expands_to = Some("c1".to_string());
        tree.push_unchecked(
            Clause::new("c1", ClauseType::Noun)
                .with_parent("main", 2)
                .with_elements(vec![
                    Element::find(Role::Compz, sentence, "that").unwrap(),
                    Element::find(Role::S, sentence, "it").unwrap(),
                ]),
        );
        let evidence = run(sentence, &tree);
        assert_eq!(statuses(&evidence, "noun_clause_completeness"), vec![TestStatus::Fail]);
        assert_eq!(statuses(&evidence, "expands_to_integrity"), vec![TestStatus::Pass]);
    }

    #[test]
    fn test_relative_under_that_verb_reads_as_noun_clause() {
        let sentence = "She said that it failed";
        let mut tree = tree_of(
            sentence,
            vec![(Role::S, "She"), (Role::V, "said"), (Role::Od, "that it failed")],
        );
        tree.clause_mut(0).elements[2].expands_to = Some("c1".to_string());
        tree.push_unchecked(
            Clause::new("c1", ClauseType::Relative)
                .with_parent("main", 2)
                .with_elements(vec![
                    Element::find(Role::Compz, sentence, "that").unwrap(),
                    Element::find(Role::S, sentence, "it").unwrap(),
                    Element::find(Role::V, sentence, "failed").unwrap(),
                ]),
        );
        let evidence = run(sentence, &tree);
        let gap = evidence.iter().find(|e| e.id == "relative_gap").unwrap();
        assert_eq!(gap.status, TestStatus::Warn);
        assert!(gap.message.contains("that-complement"), "{}", gap.message);
        assert_eq!(gap.confidence, 0.8);
    }

    #[test]
    fn test_to_infinitive_function_evidence() {
        let sentence = "The book was written to inspire readers";
        let tree = tree_of(
            sentence,
            vec![
                (Role::S, "The book"),
                (Role::V, "was written"),
                (Role::Comp, "to inspire readers"),
            ],
        );
        let evidence = run(sentence, &tree);
        let reading = evidence.iter().find(|e| e.id == "to_inf_function").unwrap();
        assert_eq!(reading.element_index, Some(2));
        assert_eq!(reading.evidence_text.as_deref(), Some("to inspire readers -> complement"));
    }
}
