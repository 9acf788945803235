//! Maps labeler element text back onto exact byte ranges of the sentence.
//!
//! Strategies, in order:
//!
//! 1. the element's own indices, if they already cut out its text
//! 2. exact match at or after the cursor (end of the previous element)
//! 3. exact match anywhere, nearest to the labeler's hinted start
//! 4. match after trimming surrounding punctuation and whitespace
//! 5. case-insensitive match
//! 6. match ignoring whitespace differences
//! 7. bounded edit distance over word-aligned windows
//!
//! Strategies 4-7 are individually switchable through [`ReconcileConfig`].
//! A successful fallback replaces the element text with the exact
//! substring, so the contiguity invariant holds afterwards.

use tracing::trace;

use crate::config::ReconcileConfig;
use crate::element::{Element, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStrategy {
    Exact,
    Trimmed,
    CaseInsensitive,
    CollapsedWhitespace,
    EditDistance,
}

/// What happened to one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// Elided, or already correct.
    Unchanged,
    Moved(MatchStrategy),
    /// No strategy found the text; the element is now elided and flagged.
    Unresolved,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub fixed: usize,
    pub unresolved: usize,
}

pub struct SpanReconciler<'a> {
    sentence: &'a str,
    config: &'a ReconcileConfig,
}

impl<'a> SpanReconciler<'a> {
    pub fn new(sentence: &'a str, config: &'a ReconcileConfig) -> Self {
        Self { sentence, config }
    }

    /// Reconcile a clause's elements left to right.
    pub fn reconcile(&self, elements: &mut [Element]) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome::default();
        let mut cursor = 0;
        for (index, element) in elements.iter_mut().enumerate() {
            match self.reconcile_element(element, cursor) {
                Reconciled::Unchanged => {}
                Reconciled::Moved(strategy) => {
                    trace!(index, ?strategy, text = %element.text, "reconciled element span");
                    outcome.fixed += 1;
                }
                Reconciled::Unresolved => {
                    trace!(index, text = %element.text, "element text not found in sentence");
                    outcome.unresolved += 1;
                }
            }
            if let Some(span) = element.span {
                cursor = cursor.max(span.end);
            }
        }
        outcome
    }

    pub fn reconcile_element(&self, element: &mut Element, cursor: usize) -> Reconciled {
        let Some(current) = element.span else {
            return Reconciled::Unchanged;
        };
        if element.text.trim().is_empty() {
            element.span = None;
            element.unresolved = true;
            return Reconciled::Unresolved;
        }
        if element.matches_sentence(self.sentence) {
            return Reconciled::Unchanged;
        }
        match self.locate(&element.text, cursor, Some(current.start)) {
            Some((span, strategy)) => {
                if let Some(text) = span.slice(self.sentence) {
                    element.text = text.to_string();
                    element.span = Some(span);
                    element.unresolved = false;
                    Reconciled::Moved(strategy)
                } else {
                    element.span = None;
                    element.unresolved = true;
                    Reconciled::Unresolved
                }
            }
            None => {
                element.span = None;
                element.unresolved = true;
                Reconciled::Unresolved
            }
        }
    }

    /// Find `text` in the sentence. Matches starting at or after `cursor`
    /// win; otherwise the match nearest `hint` does.
    pub fn locate(
        &self,
        text: &str,
        cursor: usize,
        hint: Option<usize>,
    ) -> Option<(Span, MatchStrategy)> {
        if text.is_empty() {
            return None;
        }
        if let Some(span) = pick(exact_matches(self.sentence, text), cursor, hint) {
            return Some((span, MatchStrategy::Exact));
        }

        let trimmed = text.trim_matches(|c: char| c.is_whitespace() || c.is_ascii_punctuation());
        let needle = if self.config.trim_punctuation && !trimmed.is_empty() {
            if trimmed != text {
                if let Some(span) = pick(exact_matches(self.sentence, trimmed), cursor, hint) {
                    return Some((span, MatchStrategy::Trimmed));
                }
            }
            trimmed
        } else {
            text
        };

        if self.config.case_insensitive {
            let found = pick(case_insensitive_matches(self.sentence, needle), cursor, hint);
            if let Some(span) = found {
                return Some((span, MatchStrategy::CaseInsensitive));
            }
        }

        if self.config.collapse_whitespace {
            let found = pick(
                whitespace_insensitive_matches(self.sentence, needle, self.config.case_insensitive),
                cursor,
                hint,
            );
            if let Some(span) = found {
                return Some((span, MatchStrategy::CollapsedWhitespace));
            }
        }

        if self.config.max_edit_distance > 0 {
            if let Some(span) = self.nearest_window(needle, cursor, hint) {
                return Some((span, MatchStrategy::EditDistance));
            }
        }
        None
    }

    fn nearest_window(&self, needle: &str, cursor: usize, hint: Option<usize>) -> Option<Span> {
        let width = needle.split_whitespace().count();
        let words = word_spans(self.sentence);
        if width == 0 || words.len() < width {
            return None;
        }
        let needle_lower = needle.to_lowercase();

        let mut best: Option<(usize, Vec<Span>)> = None;
        for window in words.windows(width) {
            let span = Span::new(window[0].start, window[width - 1].end);
            let Some(candidate) = span.slice(self.sentence) else {
                continue;
            };
            let distance = levenshtein(&needle_lower, &candidate.to_lowercase());
            if distance > self.config.max_edit_distance {
                continue;
            }
            let improves = best.as_ref().map_or(true, |(d, _)| distance < *d);
            if improves {
                best = Some((distance, vec![span]));
            } else if let Some((d, spans)) = best.as_mut() {
                if *d == distance {
                    spans.push(span);
                }
            }
        }
        best.and_then(|(_, spans)| pick(spans, cursor, hint))
    }
}

/// First candidate at or after the cursor, else the one nearest the hint.
fn pick(candidates: Vec<Span>, cursor: usize, hint: Option<usize>) -> Option<Span> {
    if let Some(span) = candidates
        .iter()
        .filter(|s| s.start >= cursor)
        .min_by_key(|s| s.start)
    {
        return Some(*span);
    }
    match hint {
        Some(hint) => candidates
            .into_iter()
            .min_by_key(|s| (s.start.abs_diff(hint), s.start)),
        None => candidates.into_iter().min_by_key(|s| s.start),
    }
}

fn exact_matches(haystack: &str, needle: &str) -> Vec<Span> {
    haystack
        .match_indices(needle)
        .map(|(start, m)| Span::new(start, start + m.len()))
        .collect()
}

/// End of `needle` matched case-insensitively at byte `start`.
fn match_folded_at(haystack: &str, start: usize, needle: &[char]) -> Option<usize> {
    let rest = haystack.get(start..)?;
    let mut matched = 0;
    for (offset, c) in rest.char_indices() {
        for lower in c.to_lowercase() {
            if needle.get(matched) != Some(&lower) {
                return None;
            }
            matched += 1;
        }
        if matched == needle.len() {
            return Some(start + offset + c.len_utf8());
        }
    }
    None
}

fn case_insensitive_matches(haystack: &str, needle: &str) -> Vec<Span> {
    let folded: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    if folded.is_empty() {
        return Vec::new();
    }
    haystack
        .char_indices()
        .filter_map(|(start, _)| {
            match_folded_at(haystack, start, &folded).map(|end| Span::new(start, end))
        })
        .collect()
}

/// The pieces of `needle` in order, separated by any run of whitespace.
fn whitespace_insensitive_matches(haystack: &str, needle: &str, fold_case: bool) -> Vec<Span> {
    let pieces: Vec<&str> = needle.split_whitespace().collect();
    let Some((first, rest)) = pieces.split_first() else {
        return Vec::new();
    };
    let match_at = |pos: usize, piece: &str| -> Option<usize> {
        if fold_case {
            let folded: Vec<char> = piece.chars().flat_map(char::to_lowercase).collect();
            match_folded_at(haystack, pos, &folded)
        } else {
            haystack
                .get(pos..)
                .filter(|tail| tail.starts_with(piece))
                .map(|_| pos + piece.len())
        }
    };

    let mut found = Vec::new();
    for (start, _) in haystack.char_indices() {
        let Some(mut pos) = match_at(start, first) else {
            continue;
        };
        let mut complete = true;
        for piece in rest {
            let skipped = haystack
                .get(pos..)
                .map(|tail| tail.len() - tail.trim_start().len())
                .unwrap_or(0);
            match match_at(pos + skipped, piece) {
                Some(end) => pos = end,
                None => {
                    complete = false;
                    break;
                }
            }
        }
        if complete {
            found.push(Span::new(start, pos));
        }
    }
    found
}

fn word_spans(sentence: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in sentence.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                spans.push(Span::new(s, i));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push(Span::new(s, sentence.len()));
    }
    spans
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];
    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}
