//! Deterministic sentence-pattern classification.
//!
//! The labeler's pattern is only a guess. The classifier recomputes it from
//! the verb's dictionary class and the roles present, and fixes the role of
//! the first to-infinitive after the verb on the way (adjuncts in between
//! are skipped):
//!
//! - raising, aspectual, and (in the passive) causative or copular verbs take
//!   it as an obligatory `Comp`,
//! - purpose verbs in the passive take it as an `M` adjunct.

use layered_svoc_lexicon::{Lexicon, VerbClass};
use tracing::{debug, trace};

use crate::chain_enforcer::splice;
use crate::clause::{ClauseTree, RoleProfile, SentencePattern};
use crate::element::{ArrowType, Element, Role, RoleTag, Span};
use crate::to_infinitive::{is_incomplete_to_infinitive, is_to_infinitive};
use crate::verb_chain::{chain_index_at, VerbChain, Voice};

/// Whether the chain's verb takes a following to-infinitive as `Comp`.
pub fn takes_verbal_complement(lexicon: &Lexicon, chain: &VerbChain) -> bool {
    let classes = lexicon.classes(&chain.main_verb_lemma);
    classes.contains(VerbClass::Aspectual)
        || classes.contains(VerbClass::Raising)
        || (chain.voice == Voice::Passive
            && (classes.contains(VerbClass::CausativePassive)
                || classes.contains(VerbClass::CopularPassive)))
}

/// The verb facts the rules look at.
#[derive(Debug, Clone, Default)]
struct VerbFacts {
    index: Option<usize>,
    lemma: Option<String>,
    passive: bool,
    takes_comp: bool,
}

pub struct PatternClassifier<'a> {
    sentence: &'a str,
    lexicon: &'a Lexicon,
    chains: &'a [VerbChain],
}

impl<'a> PatternClassifier<'a> {
    pub fn new(sentence: &'a str, lexicon: &'a Lexicon, chains: &'a [VerbChain]) -> Self {
        Self {
            sentence,
            lexicon,
            chains,
        }
    }

    pub fn classify(&self, tree: &mut ClauseTree) -> usize {
        let changes = (0..tree.len())
            .map(|position| self.classify_clause(tree, position))
            .sum();
        debug!(changes, "pattern classification");
        changes
    }

    /// Fix roles and set the pattern of one clause. Returns the number of
    /// changes, a pattern override included.
    pub fn classify_clause(&self, tree: &mut ClauseTree, position: usize) -> usize {
        let mut changes = 0;
        let facts = self.verb_facts(tree, position);
        let linking = facts
            .lemma
            .as_deref()
            .map_or(false, |lemma| self.lexicon.is_linking(lemma));

        if linking {
            changes += self.copular_object_fix(tree, position);
        }
        changes += self.attach_infinitive(tree, position, &facts);
        let aspectual = facts
            .lemma
            .as_deref()
            .map_or(false, |lemma| self.lexicon.has_class(lemma, VerbClass::Aspectual));
        let aspectual_comp = aspectual && tree.clause(position).has_surface(Role::Comp);
        let linking = linking && !aspectual_comp;
        if linking {
            changes += self.extend_complement(tree, position);
        }

        let clause = tree.clause(position);
        let profile = clause.profile();
        let has = |class| {
            facts
                .lemma
                .as_deref()
                .map_or(false, |lemma| self.lexicon.has_class(lemma, class))
        };
        let pattern = decide(
            profile,
            linking,
            aspectual,
            has(VerbClass::Ditransitive),
            has(VerbClass::ObjectComplement),
        );
        let label = pattern.label(profile);

        if clause.pattern != Some(pattern) {
            debug!(
                clause = %clause.id,
                labeler = ?clause.pattern.map(|p| p.number()),
                pattern = pattern.number(),
                "pattern override"
            );
            changes += 1;
        }
        let clause = tree.clause_mut(position);
        clause.pattern = Some(pattern);
        clause.pattern_label = Some(label);
        changes
    }

    fn verb_facts(&self, tree: &ClauseTree, position: usize) -> VerbFacts {
        let clause = tree.clause(position);
        let Some(index) = clause.main_verb_index() else {
            return VerbFacts::default();
        };
        let element = &clause.elements[index];
        let chain = element
            .span
            .and_then(|span| chain_index_at(self.chains, &span))
            .map(|i| &self.chains[i]);
        match chain {
            Some(chain) => VerbFacts {
                index: Some(index),
                lemma: Some(chain.main_verb_lemma.clone()),
                passive: chain.voice == Voice::Passive,
                takes_comp: takes_verbal_complement(self.lexicon, chain),
            },
            None => {
                let lemma = element.words().last().map(|w| self.lexicon.lemma(w));
                let takes_comp = lemma.as_deref().map_or(false, |l| {
                    let classes = self.lexicon.classes(l);
                    classes.contains(VerbClass::Aspectual) || classes.contains(VerbClass::Raising)
                });
                VerbFacts {
                    index: Some(index),
                    lemma,
                    passive: false,
                    takes_comp,
                }
            }
        }
    }

    /// "She is likely to win": `Od:"likely to win"` after a linking verb is a `C`.
    fn copular_object_fix(&self, tree: &mut ClauseTree, position: usize) -> usize {
        let clause = tree.clause_mut(position);
        let mut changes = 0;
        for (index, element) in clause.elements.iter_mut().enumerate() {
            let copular = element
                .first_word()
                .map_or(false, |w| self.lexicon.is_copular_adjective(&w));
            if element.is(Role::Od) && copular {
                trace!(clause = %clause.id, index, text = %element.text, "object after linking verb is a complement");
                element.role = RoleTag::Known(Role::C);
                element.arrow_type = Some(ArrowType::Complement);
                changes += 1;
            }
        }
        changes
    }

    /// First to-infinitive after the main verb, adjuncts in between skipped.
    fn following_infinitive(&self, elements: &[Element], verb: usize) -> Option<(usize, bool)> {
        elements.iter().enumerate().skip(verb + 1).find_map(|(index, element)| {
            let candidate = !element.is_elided()
                && [Role::C, Role::Od, Role::Comp, Role::M].iter().any(|r| element.is(*r));
            if !candidate {
                return None;
            }
            let incomplete = is_incomplete_to_infinitive(element);
            (incomplete || is_to_infinitive(self.lexicon, element)).then_some((index, incomplete))
        })
    }

    /// Role of the to-infinitive following the main verb.
    fn attach_infinitive(&self, tree: &mut ClauseTree, position: usize, facts: &VerbFacts) -> usize {
        let Some(verb) = facts.index else {
            return 0;
        };
        let clause = tree.clause(position);
        let Some((next, incomplete)) = self.following_infinitive(&clause.elements, verb) else {
            return 0;
        };

        if facts.takes_comp {
            let mut changes = 0;
            if incomplete {
                if let Some(after) = next_surface(&clause.elements, next) {
                    let merged = self
                        .merge(&clause.elements[next], &clause.elements[after], Role::Comp)
                        .filter(|merged| is_to_infinitive(self.lexicon, merged));
                    if let Some(merged) = merged {
                        trace!(clause = %clause.id, text = %merged.text, "completed verbal complement");
                        splice(tree, position, &[next, after], vec![merged]);
                        return 1;
                    }
                }
            }
            let element = &mut tree.clause_mut(position).elements[next];
            if !element.is(Role::Comp) {
                trace!(index = next, text = %element.text, from = %element.role, "verbal complement");
                element.role = RoleTag::Known(Role::Comp);
                element.modifies_index = None;
                changes += 1;
            }
            return changes;
        }

        let purpose = facts.passive
            && facts
                .lemma
                .as_deref()
                .map_or(false, |l| self.lexicon.has_class(l, VerbClass::PurposeInPassive));
        if purpose && !incomplete {
            let element = &mut tree.clause_mut(position).elements[next];
            let already = element.is(Role::M)
                && element.arrow_type == Some(ArrowType::Modifies)
                && element.modifies_index == Some(verb);
            if !already {
                trace!(index = next, text = %element.text, from = %element.role, "purpose adjunct");
                element.role = RoleTag::Known(Role::M);
                element.arrow_type = Some(ArrowType::Modifies);
                element.modifies_index = Some(verb);
                return 1;
            }
        }
        0
    }

    /// A linking verb's `C` runs on over a following to-infinitive or
    /// "of"-phrase: "afraid of the dark", "likely to win".
    fn extend_complement(&self, tree: &mut ClauseTree, position: usize) -> usize {
        let mut changes = 0;
        loop {
            let clause = tree.clause(position);
            let found = clause.indices_of(Role::C).find_map(|c| {
                let next = next_surface(&clause.elements, c)?;
                let element = &clause.elements[next];
                let continues = element.first_word().as_deref() == Some("of")
                    || is_to_infinitive(self.lexicon, element);
                if !continues || element.expands_to.is_some() {
                    return None;
                }
                self.merge(&clause.elements[c], element, Role::C)
                    .map(|merged| (c, next, merged))
            });
            let Some((c, next, merged)) = found else {
                break;
            };
            trace!(clause = %clause.id, text = %merged.text, "extended complement");
            splice(tree, position, &[c, next], vec![merged]);
            changes += 1;
        }
        changes
    }

    /// One element covering two adjacent ones.
    fn merge(&self, first: &Element, second: &Element, role: Role) -> Option<Element> {
        let (a, b) = (first.span?, second.span?);
        let between = self.sentence.get(a.end..b.start)?;
        if a.end > b.start || !between.trim().is_empty() {
            return None;
        }
        let mut merged = Element::at(role, self.sentence, Span::new(a.start, b.end))?;
        merged.arrow_type = first.arrow_type.or(second.arrow_type);
        Some(merged)
    }
}

/// Next non-elided element after `index`.
fn next_surface(elements: &[Element], index: usize) -> Option<usize> {
    elements
        .iter()
        .enumerate()
        .skip(index + 1)
        .find(|(_, e)| !e.is_elided())
        .map(|(i, _)| i)
}

/// First matching rule wins. A `Comp` counts as a complement unless the
/// verb is aspectual.
fn decide(
    profile: RoleProfile,
    linking: bool,
    aspectual: bool,
    ditransitive: bool,
    object_complement: bool,
) -> SentencePattern {
    let complement = profile.c || (profile.comp && !aspectual);
    if linking && complement {
        SentencePattern::SVC
    } else if ditransitive && profile.oi && profile.od {
        SentencePattern::SVOO
    } else if object_complement && profile.od && complement {
        SentencePattern::SVOC
    } else if profile.oi && profile.od {
        SentencePattern::SVOO
    } else if profile.od && complement {
        SentencePattern::SVOC
    } else if profile.od {
        SentencePattern::SVO
    } else if complement {
        SentencePattern::SVC
    } else {
        SentencePattern::SV
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::Clause;
    use crate::token::Tokenizer;
    use crate::verb_chain::VerbChainResolver;

    fn classify(sentence: &str, elements: Vec<(Role, &str)>) -> Clause {
        let lexicon = Lexicon::english();
        let tokens = Tokenizer::new(&lexicon).tokenize(sentence);
        let chains = VerbChainResolver::new(&lexicon).resolve(sentence, &tokens);
        let mut tree = ClauseTree::new();
        tree.push_unchecked(
            Clause::main()
                .with_elements(
                    elements
                        .into_iter()
                        .map(|(role, text)| Element::find(role, sentence, text).unwrap())
                        .collect(),
                )
                .with_pattern(SentencePattern::SVO),
        );
        PatternClassifier::new(sentence, &lexicon, &chains).classify(&mut tree);
        tree.clause(0).clone()
    }

    fn render(clause: &Clause) -> String {
        let elements = clause
            .elements
            .iter()
            .map(|e| format!("{}:{}", e.role, e.text))
            .collect::<Vec<_>>()
            .join(" | ");
        format!(
            "{} [{}]",
            elements,
            clause.pattern_label.as_deref().unwrap_or("?")
        )
    }

    #[test]
    fn test_raising_verb_takes_comp() {
        let clause = classify(
            "She seems to be happy",
            vec![(Role::S, "She"), (Role::V, "seems"), (Role::M, "to be happy")],
        );
        assert_eq!(clause.pattern, Some(SentencePattern::SVC));
        insta::assert_snapshot!(render(&clause), @"S:She | V:seems | Comp:to be happy [SVC]");
    }

    #[test]
    fn test_incomplete_infinitive_absorbs_complement() {
        let clause = classify(
            "She seems to be happy",
            vec![(Role::S, "She"), (Role::V, "seems"), (Role::M, "to be"), (Role::C, "happy")],
        );
        insta::assert_snapshot!(render(&clause), @"S:She | V:seems | Comp:to be happy [SVC]");
    }

    #[test]
    fn test_passive_purpose_is_modifier() {
        let clause = classify(
            "The book was written to inspire readers",
            vec![
                (Role::S, "The book"),
                (Role::V, "was written"),
                (Role::Comp, "to inspire readers"),
            ],
        );
        insta::assert_snapshot!(
            render(&clause),
            @"S:The book | V:was written | M:to inspire readers [SV]"
        );
        assert_eq!(clause.elements[2].modifies_index, Some(1));
        assert_eq!(clause.elements[2].arrow_type, Some(ArrowType::Modifies));
    }

    #[test]
    fn test_purpose_infinitive_after_agent_phrase() {
        let clause = classify(
            "The book was written by her to inspire readers",
            vec![
                (Role::S, "The book"),
                (Role::V, "was written"),
                (Role::M, "by her"),
                (Role::Comp, "to inspire readers"),
            ],
        );
        insta::assert_snapshot!(
            render(&clause),
            @"S:The book | V:was written | M:by her | M:to inspire readers [SV]"
        );
        assert_eq!(clause.elements[3].modifies_index, Some(1));
    }

    #[test]
    fn test_raising_complement_after_adverb() {
        let clause = classify(
            "She seems today to be happy",
            vec![
                (Role::S, "She"),
                (Role::V, "seems"),
                (Role::M, "today"),
                (Role::M, "to be happy"),
            ],
        );
        assert_eq!(clause.elements[2].role, RoleTag::Known(Role::M));
        assert_eq!(clause.elements[3].role, RoleTag::Known(Role::Comp));
        assert_eq!(clause.pattern, Some(SentencePattern::SVC));
    }

    #[test]
    fn test_object_with_verbal_complement() {
        let clause = classify(
            "She asked him to leave",
            vec![(Role::S, "She"), (Role::V, "asked"), (Role::Od, "him"), (Role::Comp, "to leave")],
        );
        assert_eq!(clause.pattern, Some(SentencePattern::SVOC));
    }

    #[test]
    fn test_copular_object_becomes_complement() {
        let clause = classify(
            "He is likely to win",
            vec![(Role::S, "He"), (Role::V, "is"), (Role::Od, "likely"), (Role::M, "to win")],
        );
        insta::assert_snapshot!(render(&clause), @"S:He | V:is | C:likely to win [SVC]");
    }

    #[test]
    fn test_object_patterns() {
        let clause = classify(
            "She gave him a book",
            vec![(Role::S, "She"), (Role::V, "gave"), (Role::Oi, "him"), (Role::Od, "a book")],
        );
        assert_eq!(clause.pattern, Some(SentencePattern::SVOO));

        let clause = classify(
            "They made him captain",
            vec![(Role::S, "They"), (Role::V, "made"), (Role::Od, "him"), (Role::C, "captain")],
        );
        assert_eq!(clause.pattern, Some(SentencePattern::SVOC));

        let clause = classify(
            "She reads books",
            vec![(Role::S, "She"), (Role::V, "reads"), (Role::Od, "books")],
        );
        assert_eq!(clause.pattern, Some(SentencePattern::SVO));

        let clause = classify("She sleeps", vec![(Role::S, "She"), (Role::V, "sleeps")]);
        assert_eq!(clause.pattern, Some(SentencePattern::SV));
    }

    #[test]
    fn test_aspectual_infinitive_is_not_linking() {
        let clause = classify(
            "The rule had come to define practice",
            vec![
                (Role::S, "The rule"),
                (Role::V, "had come"),
                (Role::M, "to define practice"),
            ],
        );
        insta::assert_snapshot!(
            render(&clause),
            @"S:The rule | V:had come | Comp:to define practice [SV+Comp]"
        );
    }

    #[test]
    fn test_override_is_counted_once() {
        let sentence = "She sleeps";
        let lexicon = Lexicon::english();
        let tokens = Tokenizer::new(&lexicon).tokenize(sentence);
        let chains = VerbChainResolver::new(&lexicon).resolve(sentence, &tokens);
        let mut tree = ClauseTree::new();
        tree.push_unchecked(Clause::main().with_elements(vec![
            Element::find(Role::S, sentence, "She").unwrap(),
            Element::find(Role::V, sentence, "sleeps").unwrap(),
        ]));
        let classifier = PatternClassifier::new(sentence, &lexicon, &chains);
        assert_eq!(classifier.classify(&mut tree), 1);
        assert_eq!(classifier.classify(&mut tree), 0);
    }
}
