//! The [`Lexicon`]: every dictionary the engine consults, built once and shared.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::inflection::{base_candidates, fallback_lemma};
use crate::overrides::{LexiconError, LexiconOverrides};
use crate::verb_class::{VerbClass, VerbClassSet};
use crate::words;

static ENGLISH: Lazy<Arc<Lexicon>> = Lazy::new(|| Arc::new(Lexicon::english()));

/// Closed-class categories, looked up by exact lowercase form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClosedClass {
    Auxiliary,
    Modal,
    Complementizer,
    Particle,
    Determiner,
    Pronoun,
    Coordinator,
    Subordinator,
    Preposition,
}

/// English word tables.
///
/// Immutable after construction. Share it with [`Lexicon::shared`] or wrap a
/// customised instance in an `Arc` and hand it to every analysis.
#[derive(Debug, Clone)]
pub struct Lexicon {
    closed: HashMap<String, ClosedClass>,
    wh_words: HashSet<String>,
    adverbs: HashSet<String>,
    adjectives: HashSet<String>,
    copular_adjectives: HashSet<String>,
    phrasal_particles: HashSet<String>,
    non_verbal_ing: HashSet<String>,
    irregular: HashMap<String, String>,
    irregular_participles: HashSet<String>,
    verbs: HashSet<String>,
    classes: HashMap<String, VerbClassSet>,
}

fn set_of(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Lexicon {
    /// The built-in English tables.
    pub fn english() -> Self {
        let mut closed = HashMap::new();
        // Earlier tables win when a word appears in more than one.
        let tables: [(&[&str], ClosedClass); 9] = [
            (words::AUXILIARIES, ClosedClass::Auxiliary),
            (words::MODALS, ClosedClass::Modal),
            (words::COMPLEMENTIZERS, ClosedClass::Complementizer),
            (words::PARTICLES, ClosedClass::Particle),
            (words::DETERMINERS, ClosedClass::Determiner),
            (words::PRONOUNS, ClosedClass::Pronoun),
            (words::COORDINATORS, ClosedClass::Coordinator),
            (words::SUBORDINATORS, ClosedClass::Subordinator),
            (words::PREPOSITIONS, ClosedClass::Preposition),
        ];
        for (table, class) in tables {
            for word in table {
                closed.entry(word.to_string()).or_insert(class);
            }
        }

        let mut lexicon = Self {
            closed,
            wh_words: set_of(words::WH_WORDS),
            adverbs: set_of(words::ADVERBS),
            adjectives: set_of(words::ADJECTIVES),
            copular_adjectives: set_of(words::COPULAR_ADJECTIVES),
            phrasal_particles: set_of(words::PHRASAL_PARTICLES),
            non_verbal_ing: set_of(words::NON_VERBAL_ING),
            irregular: words::IRREGULAR_FORMS
                .iter()
                .map(|(form, lemma)| (form.to_string(), lemma.to_string()))
                .collect(),
            irregular_participles: set_of(words::IRREGULAR_PARTICIPLES),
            verbs: set_of(words::COMMON_VERBS),
            classes: HashMap::new(),
        };

        for class in VerbClass::ALL {
            for lemma in class.seed_lemmas() {
                lexicon.add_to_class(lemma, class);
            }
        }
        lexicon
    }

    /// The process-wide default English lexicon.
    pub fn shared() -> Arc<Lexicon> {
        Arc::clone(&ENGLISH)
    }

    /// A copy of these tables extended with deployment-specific words.
    pub fn with_overrides(&self, overrides: &LexiconOverrides) -> Result<Self, LexiconError> {
        let mut lexicon = self.clone();
        for (class_name, lemmas) in &overrides.verb_classes {
            let class = VerbClass::from_name(class_name)
                .ok_or_else(|| LexiconError::UnknownVerbClass(class_name.clone()))?;
            for lemma in lemmas {
                lexicon.add_to_class(lemma, class);
            }
        }
        for verb in &overrides.verbs {
            lexicon.verbs.insert(verb.trim().to_lowercase());
        }
        for adjective in &overrides.adjectives {
            lexicon.adjectives.insert(adjective.trim().to_lowercase());
        }
        for adverb in &overrides.adverbs {
            lexicon.adverbs.insert(adverb.trim().to_lowercase());
        }
        Ok(lexicon)
    }

    fn add_to_class(&mut self, lemma: &str, class: VerbClass) {
        let lemma = lemma.trim().to_lowercase();
        self.verbs.insert(lemma.clone());
        self.classes.entry(lemma).or_default().insert(class);
    }

    pub fn closed_class(&self, word: &str) -> Option<ClosedClass> {
        self.closed.get(&word.to_lowercase()).copied()
    }

    pub fn is_auxiliary(&self, word: &str) -> bool {
        self.closed_class(word) == Some(ClosedClass::Auxiliary)
    }

    pub fn is_modal(&self, word: &str) -> bool {
        self.closed_class(word) == Some(ClosedClass::Modal)
    }

    /// Auxiliary or modal.
    pub fn is_aux_or_modal(&self, word: &str) -> bool {
        matches!(
            self.closed_class(word),
            Some(ClosedClass::Auxiliary) | Some(ClosedClass::Modal)
        )
    }

    pub fn is_be_form(&self, word: &str) -> bool {
        matches!(
            word.to_lowercase().as_str(),
            "am" | "is" | "are" | "was" | "were" | "be" | "been" | "being" | "isn't" | "aren't"
                | "wasn't" | "weren't"
        )
    }

    pub fn is_wh_word(&self, word: &str) -> bool {
        self.wh_words.contains(&word.to_lowercase())
    }

    pub fn is_adverb(&self, word: &str) -> bool {
        self.adverbs.contains(&word.to_lowercase())
    }

    pub fn is_adjective(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        self.adjectives.contains(&lower) || self.copular_adjectives.contains(&lower)
    }

    pub fn is_copular_adjective(&self, word: &str) -> bool {
        self.copular_adjectives.contains(&word.to_lowercase())
    }

    pub fn is_phrasal_particle(&self, word: &str) -> bool {
        self.phrasal_particles.contains(&word.to_lowercase())
    }

    /// Dictionary form of a (possibly inflected) verb.
    pub fn lemma(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        if let Some(lemma) = self.irregular.get(&lower) {
            return lemma.clone();
        }
        if self.verbs.contains(&lower) {
            return lower;
        }
        base_candidates(&lower)
            .into_iter()
            .find(|candidate| self.verbs.contains(candidate))
            .unwrap_or_else(|| fallback_lemma(&lower))
    }

    /// Whether the word is an inflection of a verb this lexicon knows.
    pub fn is_known_verb(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        self.irregular.contains_key(&lower)
            || self.verbs.contains(&lower)
            || base_candidates(&lower)
                .iter()
                .any(|candidate| self.verbs.contains(candidate))
    }

    pub fn is_past_participle(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        if self.irregular_participles.contains(&lower) {
            return true;
        }
        if lower.len() > 3 && lower.ends_with("ed") {
            return true;
        }
        lower.len() > 3
            && lower.ends_with("en")
            && base_candidates(&lower)
                .iter()
                .any(|candidate| self.verbs.contains(candidate))
    }

    pub fn is_present_participle(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        lower.len() > 4 && lower.ends_with("ing") && !self.non_verbal_ing.contains(&lower)
    }

    /// Every class the word's lemma belongs to.
    pub fn classes(&self, word: &str) -> VerbClassSet {
        let lower = word.to_lowercase();
        if let Some(set) = self.classes.get(&lower) {
            return *set;
        }
        self.classes
            .get(&self.lemma(&lower))
            .copied()
            .unwrap_or_default()
    }

    pub fn has_class(&self, word: &str, class: VerbClass) -> bool {
        self.classes(word).contains(class)
    }

    pub fn is_linking(&self, word: &str) -> bool {
        self.has_class(word, VerbClass::Linking)
    }

    pub fn is_bridge_verb(&self, word: &str) -> bool {
        self.has_class(word, VerbClass::Bridge)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::english()
    }
}
