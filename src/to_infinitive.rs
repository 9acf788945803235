//! What a to-infinitive phrase is doing in its clause.

use layered_svoc_lexicon::{Lexicon, VerbClass};
use serde::Serialize;
use std::fmt;

use crate::clause::Clause;
use crate::element::{Element, Role};
use crate::verb_chain::{chain_index_at, VerbChain, Voice};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToInfinitiveFunction {
    /// "To err is human."
    Subject,
    /// "She wants to leave."
    Object,
    /// "She seems to be happy."
    Complement,
    /// "the first person to arrive"
    NounModifier,
    /// "He woke up only to find the house empty."
    Result,
    /// "The book was written to inspire readers."
    Purpose,
}

impl ToInfinitiveFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Object => "object",
            Self::Complement => "complement",
            Self::NounModifier => "noun_modifier",
            Self::Result => "result",
            Self::Purpose => "purpose",
        }
    }
}

impl fmt::Display for ToInfinitiveFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ToInfinitiveReading {
    pub function: ToInfinitiveFunction,
    pub confidence: f32,
}

/// Whether the element reads as "to" + verb, optionally led by
/// "in order", "so as" or "only".
pub fn is_to_infinitive(lexicon: &Lexicon, element: &Element) -> bool {
    let words = element.words();
    match to_position(&words) {
        Some(at) => words
            .get(at + 1)
            .map_or(false, |w| lexicon.is_known_verb(w) || lexicon.is_aux_or_modal(w)),
        None => false,
    }
}

/// "to" on its own or "to be", which need the next element to be complete.
pub fn is_incomplete_to_infinitive(element: &Element) -> bool {
    let words = element.words();
    matches!(words.as_slice(), [to] if to == "to")
        || matches!(words.as_slice(), [to, be] if to == "to" && be == "be")
}

fn to_position(words: &[String]) -> Option<usize> {
    let prefix: Vec<&str> = words.iter().take(3).map(String::as_str).collect();
    match prefix.as_slice() {
        ["to", ..] => Some(0),
        ["only", "to", ..] => Some(1),
        ["in", "order", "to", ..] | ["so", "as", "to", ..] => Some(2),
        _ => None,
    }
}

pub struct ToInfinitiveClassifier<'a> {
    lexicon: &'a Lexicon,
    chains: &'a [VerbChain],
}

impl<'a> ToInfinitiveClassifier<'a> {
    pub fn new(lexicon: &'a Lexicon, chains: &'a [VerbChain]) -> Self {
        Self { lexicon, chains }
    }

    /// Classify the element at `index`, or `None` when it is not a to-infinitive.
    pub fn classify(&self, clause: &Clause, index: usize) -> Option<ToInfinitiveReading> {
        let element = clause.elements.get(index)?;
        if !is_to_infinitive(self.lexicon, element) {
            return None;
        }
        let words = element.words();
        let reading = |function, confidence| Some(ToInfinitiveReading { function, confidence });

        match words.first().map(String::as_str) {
            Some("in") | Some("so") => return reading(ToInfinitiveFunction::Purpose, 0.95),
            Some("only") => return reading(ToInfinitiveFunction::Result, 0.85),
            _ => {}
        }

        let verb = clause.main_verb_index();
        let chain = verb
            .and_then(|v| clause.elements[v].span)
            .and_then(|span| chain_index_at(self.chains, &span))
            .map(|i| &self.chains[i]);
        let lemma = chain.map(|c| c.main_verb_lemma.clone()).or_else(|| {
            verb.and_then(|v| clause.elements[v].words().last().map(|w| self.lexicon.lemma(w)))
        });
        let passive = chain.map_or(false, |c| c.voice == Voice::Passive);
        let has = |class| lemma.as_deref().map_or(false, |l| self.lexicon.has_class(l, class));

        if element.is(Role::S) || verb.map_or(false, |v| index < v && !clause.has_surface(Role::S)) {
            return reading(ToInfinitiveFunction::Subject, 0.8);
        }
        if element.is(Role::Comp) {
            return reading(ToInfinitiveFunction::Complement, 0.9);
        }
        if element.is(Role::Od) {
            let confidence = if has(VerbClass::ToInfinitiveObject) { 0.9 } else { 0.6 };
            return reading(ToInfinitiveFunction::Object, confidence);
        }
        if element.is(Role::C) {
            return reading(ToInfinitiveFunction::Complement, 0.7);
        }
        if passive && has(VerbClass::PurposeInPassive) {
            return reading(ToInfinitiveFunction::Purpose, 0.85);
        }
        let after_noun = index
            .checked_sub(1)
            .and_then(|i| clause.elements.get(i))
            .map_or(false, |prev| {
                (prev.is(Role::Od) || prev.is(Role::S) || prev.is(Role::C)) && !prev.is_elided()
            });
        let targets_noun = element
            .modifies_index
            .and_then(|m| clause.elements.get(m))
            .map_or(false, |target| !target.is(Role::V));
        if element.is(Role::M) && after_noun && targets_noun {
            return reading(ToInfinitiveFunction::NounModifier, 0.7);
        }
        reading(ToInfinitiveFunction::Purpose, 0.6)
    }
}
