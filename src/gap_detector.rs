//! Relative-clause gaps and long-distance extraction.
//!
//! In "the man who she claimed was guilty" the relative pronoun is not the
//! object of "claimed" but the subject of "was guilty", a clause embedded
//! under the bridge verb. The detector finds these and rewrites the clause
//! description so it no longer reads as a plain contact relative.

use layered_svoc_lexicon::{Lexicon, VerbClass};
use serde::Serialize;
use tracing::{debug, trace};

use crate::clause::{Clause, ClauseTree, ClauseType};
use crate::element::Role;
use crate::verb_chain::{chain_index_at, VerbChain};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GapRole {
    Subject,
    Object,
    Complement,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Gap {
    pub role: GapRole,
    pub confidence: f32,
    /// The gap sits inside a clause embedded under a bridge verb.
    pub long_distance: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseTypeCheck {
    Consistent,
    /// Labelled relative but nothing is missing. `parent_takes_that` is set
    /// when the verb of the parent clause takes a that-complement.
    RelativeWithoutGap { parent_takes_that: bool },
    /// Labelled a noun clause but a constituent is missing.
    NounClauseWithGap,
}

impl ClauseTypeCheck {
    /// The clause type the check points to instead of the labelled one.
    pub fn suggested_type(&self) -> Option<ClauseType> {
        match self {
            ClauseTypeCheck::Consistent => None,
            ClauseTypeCheck::RelativeWithoutGap { .. } => Some(ClauseType::Noun),
            ClauseTypeCheck::NounClauseWithGap => Some(ClauseType::Relative),
        }
    }
}

/// Which constituent, if any, a clause is missing.
pub fn detect_gap(lexicon: &Lexicon, tree: &ClauseTree, position: usize) -> Option<Gap> {
    let clause = tree.clause(position);
    let subject = clause.elements.iter().find(|e| e.is(Role::S));
    match subject {
        Some(s) if s.is_elided() => {
            return Some(Gap {
                role: GapRole::Subject,
                confidence: 0.9,
                long_distance: false,
            })
        }
        None if clause.has_surface(Role::V) => {
            return Some(Gap {
                role: GapRole::Subject,
                confidence: 0.75,
                long_distance: false,
            })
        }
        _ => {}
    }

    let lemma = verb_lemma(lexicon, clause);
    let has = |class| lemma.as_deref().map_or(false, |l| lexicon.has_class(l, class));

    if let Some(od) = clause.elements.iter().find(|e| e.is(Role::Od)) {
        if od.is_elided() {
            return Some(Gap {
                role: GapRole::Object,
                confidence: 0.9,
                long_distance: false,
            });
        }
        let embedded = od
            .expands_to
            .as_deref()
            .and_then(|id| tree.get(id))
            .map_or(false, |child| !child.has_surface(Role::S));
        if embedded && has(VerbClass::Bridge) {
            return Some(Gap {
                role: GapRole::Subject,
                confidence: 0.85,
                long_distance: true,
            });
        }
        return None;
    }

    if clause.elements.iter().any(|e| e.is(Role::C)) {
        return None;
    }
    if has(VerbClass::Linking) {
        return Some(Gap {
            role: GapRole::Complement,
            confidence: 0.6,
            long_distance: false,
        });
    }
    if has(VerbClass::Transitive) && !has(VerbClass::Intransitive) {
        return Some(Gap {
            role: GapRole::Object,
            confidence: 0.7,
            long_distance: false,
        });
    }
    None
}

/// Whether the clause's type agrees with the presence of a gap.
pub fn validate_clause_type(lexicon: &Lexicon, tree: &ClauseTree, position: usize) -> ClauseTypeCheck {
    let clause = tree.clause(position);
    let gap = detect_gap(lexicon, tree, position);
    match (&clause.clause_type, gap) {
        (ClauseType::Relative, None) => {
            let parent_takes_that = clause
                .parent
                .as_deref()
                .and_then(|id| tree.get(id))
                .and_then(|parent| verb_lemma(lexicon, parent))
                .map_or(false, |lemma| lexicon.has_class(&lemma, VerbClass::ThatComplement));
            ClauseTypeCheck::RelativeWithoutGap { parent_takes_that }
        }
        (ClauseType::Noun, Some(gap)) if gap.confidence >= 0.8 => ClauseTypeCheck::NounClauseWithGap,
        _ => ClauseTypeCheck::Consistent,
    }
}

fn verb_lemma(lexicon: &Lexicon, clause: &Clause) -> Option<String> {
    let verb = &clause.elements[clause.main_verb_index()?];
    verb.words().last().map(|w| lexicon.lemma(w))
}

pub struct GapDetector<'a> {
    sentence: &'a str,
    lexicon: &'a Lexicon,
    chains: &'a [VerbChain],
}

impl<'a> GapDetector<'a> {
    pub fn new(sentence: &'a str, lexicon: &'a Lexicon, chains: &'a [VerbChain]) -> Self {
        Self {
            sentence,
            lexicon,
            chains,
        }
    }

    /// Relabel relative clauses whose gap is extracted across a bridge verb.
    /// Returns the number of labels changed.
    pub fn fix_long_distance_extraction(&self, tree: &mut ClauseTree) -> usize {
        let mut changed = 0;
        for position in 0..tree.len() {
            let Some(label) = self.extraction_label(tree, position) else {
                continue;
            };
            let clause = tree.clause_mut(position);
            if clause.label.as_deref() != Some(label.as_str()) {
                trace!(clause = %clause.id, from = ?clause.label, to = %label, "long-distance extraction");
                clause.label = Some(label);
                changed += 1;
            }
        }
        debug!(changed, "gap detection");
        changed
    }

    fn extraction_label(&self, tree: &ClauseTree, position: usize) -> Option<String> {
        let clause = tree.clause(position);
        if clause.clause_type != ClauseType::Relative {
            return None;
        }
        let verb = &clause.elements[clause.main_verb_index()?];
        let lemma = verb
            .span
            .and_then(|s| chain_index_at(self.chains, &s))
            .map(|i| self.chains[i].main_verb_lemma.clone())
            .or_else(|| verb.words().last().map(|w| self.lexicon.lemma(w)))?;
        if !self.lexicon.is_bridge_verb(&lemma) {
            return None;
        }
        let od = clause.elements.iter().find(|e| e.is(Role::Od) && !e.is_elided())?;

        let through_child = od
            .expands_to
            .as_deref()
            .and_then(|id| tree.get(id))
            .map_or(false, |child| !child.has_surface(Role::S) && child.has_surface(Role::V));
        let flat = od.expands_to.is_none() && self.opens_with_finite_verb(od.span?.start);
        if !through_child && !flat {
            return None;
        }
        Some(format!(
            "relative clause (long-distance extraction via {:?}: gap is the subject of the embedded clause)",
            verb.text
        ))
    }

    /// A finite chain starts at `offset`, skipping leading whitespace.
    fn opens_with_finite_verb(&self, offset: usize) -> bool {
        let skipped = self
            .sentence
            .get(offset..)
            .map_or(0, |rest| rest.len() - rest.trim_start().len());
        let start = offset + skipped;
        self.chains.iter().any(|c| c.finite && c.span.start == start)
    }
}
