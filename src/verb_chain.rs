//! Verb-chain recognition over the token stream.
//!
//! A chain is a run of auxiliaries/modals ending in a main verb, e.g.
//! "might have been told". Three shapes are recognised:
//!
//! - contiguous: "has been told"
//! - inverted: "Rarely **did** the committee **acknowledge**", reported as
//!   two chains that point at each other through `partner`
//! - discontinuous: "**had**, once codified into procedure, **come**",
//!   one chain whose `parts` include the comma-delimited insertion
//!
//! Scanning is greedy left to right: the longest run starting at the
//! leftmost verb wins and its tokens are consumed.

use layered_svoc_lexicon::Lexicon;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::element::Span;
use crate::token::{PartOfSpeech, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainKind {
    Contiguous,
    /// One half of a subject-separated pair. Never merged with its partner.
    Inverted,
    Discontinuous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainPartKind {
    Verb,
    /// The comma-delimited gap of a discontinuous chain, commas included.
    Insertion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainPart {
    pub kind: ChainPartKind,
    pub span: Span,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    Active,
    Passive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tense {
    Modal,
    PastPerfect,
    PresentPerfect,
    Past,
    Present,
    /// "did acknowledge"
    PastEmphatic,
    Simple,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerbChain {
    pub text: String,
    pub span: Span,
    pub kind: ChainKind,
    pub parts: Vec<ChainPart>,
    /// Lowercase verb words in order, adverbs and insertion excluded.
    pub words: Vec<String>,
    pub main_verb_lemma: String,
    pub voice: Voice,
    pub tense: Tense,
    /// False directly after infinitival "to" and for a bare present participle.
    pub finite: bool,
    /// Index of the other half of an inverted pair.
    pub partner: Option<usize>,
    /// First word is an auxiliary or modal.
    pub aux_led: bool,
}

impl VerbChain {
    pub fn verb_parts(&self) -> impl Iterator<Item = &ChainPart> {
        self.parts
            .iter()
            .filter(|p| p.kind == ChainPartKind::Verb)
    }

    pub fn insertion(&self) -> Option<&ChainPart> {
        self.parts
            .iter()
            .find(|p| p.kind == ChainPartKind::Insertion)
    }

    pub fn is_single_word(&self) -> bool {
        self.words.len() == 1 && self.kind != ChainKind::Discontinuous
    }

    /// The verb part fully containing `span`.
    pub fn verb_part_containing(&self, span: &Span) -> Option<&ChainPart> {
        self.verb_parts().find(|p| p.span.contains(span))
    }
}

pub struct VerbChainResolver<'a> {
    lexicon: &'a Lexicon,
    max_parenthetical_tokens: usize,
}

/// Word tokens allowed in front of an inverted main verb.
const MAX_INVERTED_SUBJECT_TOKENS: usize = 6;

impl<'a> VerbChainResolver<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self {
            lexicon,
            max_parenthetical_tokens: 15,
        }
    }

    pub fn with_max_parenthetical_tokens(mut self, max: usize) -> Self {
        self.max_parenthetical_tokens = max;
        self
    }

    pub fn resolve(&self, sentence: &str, tokens: &[Token]) -> Vec<VerbChain> {
        let words: Vec<&Token> = tokens.iter().filter(|t| !t.is_whitespace()).collect();
        let mut chains = Vec::new();
        let mut i = 0;

        while i < words.len() {
            if !words[i].is_verb_like() {
                i += 1;
                continue;
            }
            let end = self.extend(&words, i);

            if words[end].is_auxiliary {
                if let Some((chain, next)) = self.discontinuous(sentence, &words, i, end) {
                    chains.push(chain);
                    i = next;
                    continue;
                }
            }

            let aux_only = (i..=end)
                .filter(|&k| words[k].is_verb_like())
                .all(|k| words[k].is_auxiliary);
            if aux_only {
                if let Some((verb_start, verb_end)) = self.inversion(&words, i, end) {
                    let first = chains.len();
                    let mut aux = self.contiguous(sentence, &words, i, end, ChainKind::Inverted);
                    let mut verb =
                        self.contiguous(sentence, &words, verb_start, verb_end, ChainKind::Inverted);
                    aux.partner = Some(first + 1);
                    verb.partner = Some(first);
                    chains.push(aux);
                    chains.push(verb);
                    i = verb_end + 1;
                    continue;
                }
            }

            chains.push(self.contiguous(sentence, &words, i, end, ChainKind::Contiguous));
            i = end + 1;
        }
        chains
    }

    /// Index of the last verb word in the run starting at `start`.
    fn extend(&self, words: &[&Token], start: usize) -> usize {
        let mut last = start;
        if words[start].pos == PartOfSpeech::MainVerb {
            return last;
        }
        let mut k = start + 1;
        while k < words.len() {
            let word = words[k];
            match word.pos {
                PartOfSpeech::Auxiliary | PartOfSpeech::Modal => {
                    last = k;
                }
                PartOfSpeech::MainVerb => {
                    if self.can_follow_auxiliary(word) {
                        last = k;
                    }
                    break;
                }
                // kept only if a verb follows
                PartOfSpeech::Adverb => {}
                PartOfSpeech::Particle if word.lower != "to" => {}
                _ => break,
            }
            k += 1;
        }
        last
    }

    fn can_follow_auxiliary(&self, word: &Token) -> bool {
        self.lexicon.is_past_participle(&word.lower)
            || self.lexicon.is_present_participle(&word.lower)
            || self.lexicon.lemma(&word.lower) == word.lower
    }

    fn clause_initial(&self, words: &[&Token], k: usize) -> bool {
        k == 0
            || matches!(
                words[k - 1].pos,
                PartOfSpeech::Punctuation | PartOfSpeech::Conjunction | PartOfSpeech::Complementizer
            )
    }

    fn opens_clause(&self, words: &[&Token], k: usize) -> bool {
        if self.clause_initial(words, k) {
            return true;
        }
        let prev = words[k - 1];
        (prev.pos == PartOfSpeech::Adverb || self.lexicon.is_wh_word(&prev.lower))
            && self.clause_initial(words, k - 1)
    }

    /// Aux run `start..=end` followed by a subject noun phrase and a verb.
    fn inversion(&self, words: &[&Token], start: usize, end: usize) -> Option<(usize, usize)> {
        if !self.opens_clause(words, start) {
            return None;
        }
        let mut k = end + 1;
        let mut subject_tokens = 0;
        while k < words.len() && subject_tokens <= MAX_INVERTED_SUBJECT_TOKENS {
            match words[k].pos {
                PartOfSpeech::Determiner
                | PartOfSpeech::Pronoun
                | PartOfSpeech::Noun
                | PartOfSpeech::Adjective
                | PartOfSpeech::Number
                | PartOfSpeech::Other => {
                    subject_tokens += 1;
                    k += 1;
                }
                PartOfSpeech::Adverb | PartOfSpeech::Particle if subject_tokens > 0 => {
                    k += 1;
                }
                _ => break,
            }
        }
        if subject_tokens == 0 || k >= words.len() {
            return None;
        }
        let verb = words[k];
        let verb_ok = match verb.pos {
            PartOfSpeech::Auxiliary => true,
            PartOfSpeech::MainVerb => self.can_follow_auxiliary(verb),
            _ => false,
        };
        if verb_ok {
            Some((k, self.extend(words, k)))
        } else {
            None
        }
    }

    /// Aux run `start..=end`, a comma insertion, then the rest of the chain.
    fn discontinuous(
        &self,
        sentence: &str,
        words: &[&Token],
        start: usize,
        end: usize,
    ) -> Option<(VerbChain, usize)> {
        let open = end + 1;
        if !words.get(open)?.is_punctuation(",") {
            return None;
        }
        let mut k = open + 1;
        let mut inner_words = 0;
        let close = loop {
            let word = words.get(k)?;
            if word.is_punctuation(",") {
                break k;
            }
            if word.pos == PartOfSpeech::Punctuation
                && matches!(word.text.as_str(), "." | "!" | "?" | ";" | ":")
            {
                return None;
            }
            if word.pos != PartOfSpeech::Punctuation {
                inner_words += 1;
            }
            if inner_words > self.max_parenthetical_tokens {
                return None;
            }
            k += 1;
        };
        if inner_words == 0 {
            return None;
        }
        let resume = words.get(close + 1)?;
        let resumes_chain = match resume.pos {
            PartOfSpeech::Auxiliary => true,
            PartOfSpeech::MainVerb => self.can_follow_auxiliary(resume),
            _ => false,
        };
        if !resumes_chain {
            return None;
        }
        let tail_end = self.extend(words, close + 1);

        let head_span = Span::new(words[start].start, words[end].end);
        let insertion_span = Span::new(words[open].start, words[close].end);
        let tail_span = Span::new(words[close + 1].start, words[tail_end].end);
        let span = Span::new(head_span.start, tail_span.end);

        let verbs: Vec<&Token> = (start..=end)
            .chain(close + 1..=tail_end)
            .map(|k| words[k])
            .filter(|t| t.is_verb_like())
            .collect();
        let parts = vec![
            self.part(sentence, ChainPartKind::Verb, head_span),
            self.part(sentence, ChainPartKind::Insertion, insertion_span),
            self.part(sentence, ChainPartKind::Verb, tail_span),
        ];
        let chain = self.describe(
            sentence,
            span,
            ChainKind::Discontinuous,
            parts,
            &verbs,
            self.after_infinitival_to(words, start),
        );
        Some((chain, tail_end + 1))
    }

    fn contiguous(
        &self,
        sentence: &str,
        words: &[&Token],
        start: usize,
        end: usize,
        kind: ChainKind,
    ) -> VerbChain {
        let span = Span::new(words[start].start, words[end].end);
        let verbs: Vec<&Token> = (start..=end)
            .map(|k| words[k])
            .filter(|t| t.is_verb_like())
            .collect();
        let parts = vec![self.part(sentence, ChainPartKind::Verb, span)];
        self.describe(
            sentence,
            span,
            kind,
            parts,
            &verbs,
            self.after_infinitival_to(words, start),
        )
    }

    fn part(&self, sentence: &str, kind: ChainPartKind, span: Span) -> ChainPart {
        ChainPart {
            kind,
            span,
            text: span.slice(sentence).unwrap_or_default().to_string(),
        }
    }

    fn after_infinitival_to(&self, words: &[&Token], start: usize) -> bool {
        start > 0 && words[start - 1].lower == "to" && words[start - 1].pos == PartOfSpeech::Particle
    }

    fn describe(
        &self,
        sentence: &str,
        span: Span,
        kind: ChainKind,
        parts: Vec<ChainPart>,
        verbs: &[&Token],
        after_to: bool,
    ) -> VerbChain {
        let words: Vec<String> = verbs.iter().map(|t| t.lower.clone()).collect();
        let last = verbs.last();
        let main_verb_lemma = last.map(|t| t.lemma.clone()).unwrap_or_default();

        let passive = match last {
            Some(last) if verbs.len() > 1 && last.pos == PartOfSpeech::MainVerb => {
                self.lexicon.is_past_participle(&last.lower)
                    && verbs[..verbs.len() - 1]
                        .iter()
                        .any(|t| self.lexicon.is_be_form(&t.lower))
            }
            _ => false,
        };
        let bare_participle = verbs.len() == 1
            && verbs[0].pos == PartOfSpeech::MainVerb
            && self.lexicon.is_present_participle(&verbs[0].lower);

        VerbChain {
            text: span.slice(sentence).unwrap_or_default().to_string(),
            span,
            kind,
            parts,
            tense: self.tense(verbs),
            words,
            main_verb_lemma,
            voice: if passive { Voice::Passive } else { Voice::Active },
            finite: !after_to && !bare_participle,
            partner: None,
            aux_led: verbs.first().map_or(false, |t| t.is_auxiliary),
        }
    }

    fn tense(&self, verbs: &[&Token]) -> Tense {
        let Some(first) = verbs.first() else {
            return Tense::Simple;
        };
        let compound = verbs.len() > 1;
        match first.lower.as_str() {
            _ if first.pos == PartOfSpeech::Modal => Tense::Modal,
            "had" | "hadn't" if compound => Tense::PastPerfect,
            "has" | "have" | "hasn't" | "haven't" if compound => Tense::PresentPerfect,
            "did" | "didn't" => Tense::PastEmphatic,
            "was" | "were" | "wasn't" | "weren't" | "had" | "hadn't" => Tense::Past,
            "is" | "am" | "are" | "isn't" | "aren't" | "do" | "does" | "don't" | "doesn't"
            | "has" | "have" | "hasn't" | "haven't" => Tense::Present,
            lower if first.lemma != lower => {
                if lower.ends_with("ing") {
                    Tense::Simple
                } else if lower.ends_with('s') {
                    Tense::Present
                } else {
                    Tense::Past
                }
            }
            _ => Tense::Simple,
        }
    }
}

/// Index of the chain whose verb parts overlap `span` the most.
pub fn chain_index_at(chains: &[VerbChain], span: &Span) -> Option<usize> {
    chains
        .iter()
        .enumerate()
        .filter_map(|(i, chain)| {
            let overlap: usize = chain.verb_parts().map(|p| p.span.overlap_len(span)).sum();
            (overlap > 0).then_some((overlap, i))
        })
        .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
        .map(|(_, i)| i)
}

/// Deterministic description of the chains for the labeling prompt.
pub fn prompt_summary(chains: &[VerbChain]) -> String {
    if chains.is_empty() {
        return "Verb chains: none".to_string();
    }
    let mut out = String::from("Verb chains (label each as shown):");
    let mut number = 0;
    for (i, chain) in chains.iter().enumerate() {
        // inverted pairs are described once, at their first half
        if matches!(chain.partner, Some(p) if p < i) {
            continue;
        }
        number += 1;
        let _ = write!(out, "\n{}. ", number);
        match (chain.kind, chain.partner.and_then(|p| chains.get(p))) {
            (ChainKind::Inverted, Some(partner)) => {
                let _ = write!(
                    out,
                    "{:?} + {:?} [inverted] -> V:{:?} | V:{:?} (subject in between)",
                    chain.text, partner.text, chain.text, partner.text
                );
            }
            (ChainKind::Discontinuous, _) => {
                let layout = chain
                    .parts
                    .iter()
                    .map(|p| match p.kind {
                        ChainPartKind::Verb => format!("V:{:?}", p.text),
                        ChainPartKind::Insertion => format!("Insert:{:?}", p.text),
                    })
                    .collect::<Vec<_>>()
                    .join(" | ");
                let _ = write!(out, "{:?} [discontinuous] -> {}", chain.text, layout);
            }
            _ => {
                let _ = write!(out, "{:?} [contiguous] -> V:{:?}", chain.text, chain.text);
            }
        }
    }
    out
}
