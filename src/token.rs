//! Part-of-speech tagged tokens with exact byte spans.
//!
//! Tokens tile the sentence: every byte belongs to exactly one token,
//! whitespace runs included.

use layered_svoc_lexicon::{ClosedClass, Lexicon};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::element::Span;

/// The closed tag set the downstream stages rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartOfSpeech {
    Determiner,
    Pronoun,
    /// be / have / do, including negative contractions
    Auxiliary,
    Modal,
    MainVerb,
    Preposition,
    /// coordinating and subordinating conjunctions
    Conjunction,
    /// that / whether / if
    Complementizer,
    Punctuation,
    Noun,
    Adjective,
    Adverb,
    /// infinitival "to", "not"
    Particle,
    Number,
    Whitespace,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub lower: String,
    /// Lexicon lemma for verbs, the lowercase form otherwise.
    pub lemma: String,
    pub start: usize,
    pub end: usize,
    pub pos: PartOfSpeech,
    pub is_auxiliary: bool,
}

impl Token {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    pub fn is_whitespace(&self) -> bool {
        self.pos == PartOfSpeech::Whitespace
    }

    /// Auxiliary, modal or main verb.
    pub fn is_verb_like(&self) -> bool {
        matches!(
            self.pos,
            PartOfSpeech::Auxiliary | PartOfSpeech::Modal | PartOfSpeech::MainVerb
        )
    }

    pub fn is_punctuation(&self, text: &str) -> bool {
        self.pos == PartOfSpeech::Punctuation && self.text == text
    }

    fn is_capitalized(&self) -> bool {
        self.text.chars().next().map_or(false, char::is_uppercase)
    }
}

/// Dictionary plus suffix-heuristic tagger. Never fails.
pub struct Tokenizer<'a> {
    lexicon: &'a Lexicon,
}

const NOUN_SUFFIXES: &[&str] = &[
    "tion", "sion", "ment", "ness", "ity", "ship", "ance", "ence", "ism", "hood", "dom",
];
const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ful", "ive", "able", "ible", "al", "ic", "less"];

impl<'a> Tokenizer<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn tokenize(&self, sentence: &str) -> Vec<Token> {
        let mut tokens: Vec<Token> = sentence
            .split_word_bound_indices()
            .map(|(start, text)| {
                let lower = text.to_lowercase();
                Token {
                    text: text.to_string(),
                    lemma: lower.clone(),
                    lower,
                    start,
                    end: start + text.len(),
                    pos: PartOfSpeech::Other,
                    is_auxiliary: false,
                }
            })
            .collect();

        let mut first_word = true;
        for token in tokens.iter_mut() {
            token.pos = self.tag_in_isolation(token, first_word);
            if token.pos != PartOfSpeech::Whitespace {
                first_word = false;
            }
        }

        self.apply_context(&mut tokens);

        for token in tokens.iter_mut() {
            token.is_auxiliary =
                matches!(token.pos, PartOfSpeech::Auxiliary | PartOfSpeech::Modal);
            if token.is_verb_like() {
                token.lemma = self.lexicon.lemma(&token.lower);
            }
        }
        tokens
    }

    fn tag_in_isolation(&self, token: &Token, sentence_initial: bool) -> PartOfSpeech {
        let lower = token.lower.as_str();
        let Some(first) = lower.chars().next() else {
            return PartOfSpeech::Other;
        };
        if first.is_whitespace() {
            return PartOfSpeech::Whitespace;
        }
        if !first.is_alphanumeric() {
            return PartOfSpeech::Punctuation;
        }
        if first.is_numeric() {
            return PartOfSpeech::Number;
        }

        if let Some(class) = self.lexicon.closed_class(lower) {
            return match class {
                ClosedClass::Auxiliary => PartOfSpeech::Auxiliary,
                ClosedClass::Modal => PartOfSpeech::Modal,
                ClosedClass::Complementizer => PartOfSpeech::Complementizer,
                ClosedClass::Particle => PartOfSpeech::Particle,
                ClosedClass::Determiner => PartOfSpeech::Determiner,
                ClosedClass::Pronoun => PartOfSpeech::Pronoun,
                ClosedClass::Coordinator | ClosedClass::Subordinator => {
                    PartOfSpeech::Conjunction
                }
                ClosedClass::Preposition => PartOfSpeech::Preposition,
            };
        }
        if self.lexicon.is_adverb(lower) {
            return PartOfSpeech::Adverb;
        }
        if self.lexicon.is_adjective(lower) {
            return PartOfSpeech::Adjective;
        }
        if self.lexicon.is_known_verb(lower) {
            return PartOfSpeech::MainVerb;
        }
        if !sentence_initial && token.is_capitalized() {
            return PartOfSpeech::Noun;
        }
        if lower.len() > 4 && lower.ends_with("ly") {
            return PartOfSpeech::Adverb;
        }
        if NOUN_SUFFIXES.iter().any(|s| lower.len() > s.len() + 2 && lower.ends_with(s)) {
            return PartOfSpeech::Noun;
        }
        if ADJECTIVE_SUFFIXES
            .iter()
            .any(|s| lower.len() > s.len() + 2 && lower.ends_with(s))
        {
            return PartOfSpeech::Adjective;
        }
        if self.lexicon.is_present_participle(lower)
            || (lower.len() > 4 && lower.ends_with("ed"))
        {
            return PartOfSpeech::MainVerb;
        }
        PartOfSpeech::Other
    }

    fn apply_context(&self, tokens: &mut [Token]) {
        let words: Vec<usize> = (0..tokens.len())
            .filter(|&i| !tokens[i].is_whitespace())
            .collect();

        for (w, &i) in words.iter().enumerate() {
            let prev = w.checked_sub(1).map(|p| tokens[words[p]].pos);
            let next = words.get(w + 1).map(|&n| (tokens[n].pos, tokens[n].is_capitalized()));

            match tokens[i].pos {
                // "the report", "a quick review"
                PartOfSpeech::MainVerb
                    if matches!(
                        prev,
                        Some(PartOfSpeech::Determiner) | Some(PartOfSpeech::Adjective)
                    ) =>
                {
                    tokens[i].pos = PartOfSpeech::Noun;
                }
                PartOfSpeech::Particle if tokens[i].lower == "to" => {
                    let nominal = match next {
                        Some((pos, capitalized)) => {
                            capitalized
                                || matches!(
                                    pos,
                                    PartOfSpeech::Determiner
                                        | PartOfSpeech::Pronoun
                                        | PartOfSpeech::Number
                                        | PartOfSpeech::Noun
                                )
                        }
                        None => true,
                    };
                    if nominal {
                        tokens[i].pos = PartOfSpeech::Preposition;
                    }
                }
                _ => {}
            }
        }
    }
}
