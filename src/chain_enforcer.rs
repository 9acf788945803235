//! Forces `V` segmentation to follow the resolved verb chains.
//!
//! For every chain a clause touches, the elements over the chain are
//! rewritten so that each verb part is exactly one `V` and a discontinuous
//! chain's gap is exactly one `Insert`. Text a `V` swallowed beyond its chain
//! is split back out. Element indices held by `modifiesIndex` and by child
//! clauses' `parentElementIndex` are remapped through every rewrite.

use layered_svoc_lexicon::Lexicon;
use tracing::{debug, trace};

use crate::clause::{Clause, ClauseTree};
use crate::element::{Element, Role, Span};
use crate::verb_chain::{ChainPartKind, VerbChain};

pub struct VerbChainEnforcer<'a> {
    sentence: &'a str,
    lexicon: &'a Lexicon,
    chains: &'a [VerbChain],
}

impl<'a> VerbChainEnforcer<'a> {
    pub fn new(sentence: &'a str, lexicon: &'a Lexicon, chains: &'a [VerbChain]) -> Self {
        Self {
            sentence,
            lexicon,
            chains,
        }
    }

    /// Enforce every clause. Returns the number of fixes applied.
    pub fn enforce(&self, tree: &mut ClauseTree) -> usize {
        let fixes = (0..tree.len())
            .map(|position| self.enforce_clause(tree, position))
            .sum();
        debug!(fixes, "verb chain enforcement");
        fixes
    }

    pub fn enforce_clause(&self, tree: &mut ClauseTree, position: usize) -> usize {
        let mut fixes = self.split_unresolved(tree, position);
        for chain_index in 0..self.chains.len() {
            fixes += self.conform(tree, position, chain_index);
        }
        fixes += self.dedupe(tree, position);
        if fixes > 0 {
            restore_order(tree, position);
        }
        fixes
    }

    /// `V:"did acknowledge"` that matched nowhere becomes one `V` per chain
    /// part its words are found in.
    fn split_unresolved(&self, tree: &mut ClauseTree, position: usize) -> usize {
        let targets: Vec<usize> = tree
            .clause(position)
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| {
                e.is(Role::V) && e.is_elided() && e.unresolved && e.text.split_whitespace().nth(1).is_some()
            })
            .map(|(i, _)| i)
            .collect();

        let mut fixes = 0;
        for index in targets.into_iter().rev() {
            let clause = tree.clause(position);
            let mut cursor = clause.elements[..index]
                .iter()
                .filter_map(|e| e.span)
                .map(|s| s.end)
                .max()
                .unwrap_or(0);

            let mut spans: Vec<Span> = Vec::new();
            for word in clause.elements[index].text.split_whitespace() {
                let Some(found) = self.locate_word(word, cursor) else {
                    continue;
                };
                cursor = found.end;
                let span = self
                    .chains
                    .iter()
                    .find_map(|c| c.verb_part_containing(&found).map(|p| p.span))
                    .unwrap_or(found);
                if spans.last() != Some(&span) {
                    spans.push(span);
                }
            }
            let added: Vec<Element> = spans
                .into_iter()
                .filter_map(|span| Element::at(Role::V, self.sentence, span))
                .collect();
            if added.is_empty() {
                continue;
            }
            trace!(
                clause = %clause.id,
                index,
                text = %clause.elements[index].text,
                parts = added.len(),
                "split unresolved verb"
            );
            splice(tree, position, &[index], added);
            fixes += 1;
        }
        fixes
    }

    /// A whole-word occurrence, preferring chain verb parts, at or after `cursor`.
    fn locate_word(&self, word: &str, cursor: usize) -> Option<Span> {
        let word = word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'');
        if word.is_empty() {
            return None;
        }
        let candidates: Vec<Span> = whole_word_matches(self.sentence, word);
        let in_chain = |s: &Span| self.chains.iter().any(|c| c.verb_part_containing(s).is_some());

        candidates
            .iter()
            .find(|s| s.start >= cursor && in_chain(s))
            .or_else(|| candidates.iter().find(|s| s.start >= cursor))
            .or_else(|| candidates.iter().find(|s| in_chain(s)))
            .copied()
    }

    fn conform(&self, tree: &mut ClauseTree, position: usize, chain_index: usize) -> usize {
        let chain = &self.chains[chain_index];
        let clause = tree.clause(position);
        let insertion = chain.insertion().map(|p| p.span);

        let touching: Vec<usize> = clause
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| {
                let Some(span) = e.span else {
                    return false;
                };
                if !span.overlaps(&chain.span) {
                    return false;
                }
                if e.expands_to.is_some() {
                    return insertion.map_or(false, |ins| ins.contains(&span));
                }
                e.is(Role::V) || chain.span.contains(&span)
            })
            .map(|(i, _)| i)
            .collect();
        if touching.is_empty() {
            return 0;
        }
        let has_verb = touching.iter().any(|&i| clause.elements[i].is(Role::V));
        if !has_verb && !chain.aux_led {
            return 0;
        }

        let mut added: Vec<Element> = Vec::new();
        let mut cover = chain.span;
        for part in &chain.parts {
            let (role, span) = match part.kind {
                ChainPartKind::Verb => (Role::V, self.particle_extension(clause, part.span)),
                ChainPartKind::Insertion => (Role::Insert, part.span),
            };
            cover.end = cover.end.max(span.end);
            if let Some(element) = Element::at(role, self.sentence, span) {
                added.push(element);
            }
        }

        let has_subject = clause
            .elements
            .iter()
            .enumerate()
            .any(|(i, e)| e.is(Role::S) && !e.is_elided() && !touching.contains(&i));
        for &i in &touching {
            let Some(span) = clause.elements[i].span else {
                continue;
            };
            if span.start < cover.start {
                let left = Span::new(span.start, cover.start);
                added.extend(self.remainder(chain_index, left, has_subject));
            }
            if span.end > cover.end {
                let right = Span::new(cover.end, span.end);
                added.extend(self.remainder(chain_index, right, has_subject));
            }
        }
        added.sort_by_key(|e| e.span.map(|s| s.start));
        added.dedup_by(|a, b| a.span == b.span && a.role == b.role);

        let current: Vec<(Option<Span>, Option<Role>)> = touching
            .iter()
            .map(|&i| (clause.elements[i].span, clause.elements[i].role.known()))
            .collect();
        let wanted: Vec<(Option<Span>, Option<Role>)> =
            added.iter().map(|e| (e.span, e.role.known())).collect();
        let mut sorted_current = current.clone();
        sorted_current.sort_by_key(|(span, _)| *span);
        if sorted_current == wanted {
            return 0;
        }

        trace!(
            clause = %clause.id,
            chain = %chain.text,
            before = touching.len(),
            after = added.len(),
            "rewrote verb chain elements"
        );
        splice(tree, position, &touching, added);
        1
    }

    /// The verb part's span, widened over a phrasal particle ("gave up")
    /// when the labeler's `V` already included one.
    fn particle_extension(&self, clause: &Clause, part: Span) -> Span {
        clause
            .elements
            .iter()
            .filter(|e| e.is(Role::V))
            .filter_map(|e| e.span)
            .find(|&span| {
                span.start == part.start
                    && span.end > part.end
                    && covers_with_particle(self.sentence, self.lexicon, part, span)
            })
            .unwrap_or(part)
    }

    /// Elements for text a `V` covered outside its chain: other finite chain
    /// parts become `V`, the subject between inverted partners becomes `S`,
    /// everything else `M`.
    fn remainder(&self, chain_index: usize, piece: Span, has_subject: bool) -> Vec<Element> {
        let chain = &self.chains[chain_index];
        let gap = chain
            .partner
            .and_then(|p| self.chains.get(p))
            .map(|partner| {
                if chain.span.end <= partner.span.start {
                    Span::new(chain.span.end, partner.span.start)
                } else {
                    Span::new(partner.span.end, chain.span.start)
                }
            });

        let mut verbs: Vec<Span> = self
            .chains
            .iter()
            .enumerate()
            .filter(|(i, c)| *i != chain_index && c.finite)
            .flat_map(|(_, c)| c.verb_parts().map(|p| p.span))
            .filter(|s| piece.contains(s))
            .collect();
        verbs.sort();

        let mut out = Vec::new();
        let text_piece = |span: Span, out: &mut Vec<Element>| {
            if let Some(trimmed) = trim_span(self.sentence, span) {
                let role = match gap {
                    Some(gap) if !has_subject && gap.contains(&trimmed) => Role::S,
                    _ => Role::M,
                };
                if let Some(element) = Element::at(role, self.sentence, trimmed) {
                    out.push(element);
                }
            }
        };
        let mut pos = piece.start;
        for verb in verbs {
            if verb.start > pos {
                text_piece(Span::new(pos, verb.start), &mut out);
            }
            if let Some(element) = Element::at(Role::V, self.sentence, verb) {
                out.push(element);
            }
            pos = verb.end;
        }
        if pos < piece.end {
            text_piece(Span::new(pos, piece.end), &mut out);
        }
        out
    }

    fn dedupe(&self, tree: &mut ClauseTree, position: usize) -> usize {
        let clause = tree.clause(position);
        let mut first_with_span: Vec<(Span, usize)> = Vec::new();
        let mut remap: Vec<Option<usize>> = Vec::with_capacity(clause.elements.len());
        let mut kept: Vec<Element> = Vec::with_capacity(clause.elements.len());
        let mut dropped = 0;

        for element in &clause.elements {
            if let (true, Some(span)) = (element.is(Role::V), element.span) {
                if let Some((_, at)) = first_with_span.iter().find(|(s, _)| *s == span) {
                    remap.push(Some(*at));
                    dropped += 1;
                    continue;
                }
                first_with_span.push((span, kept.len()));
            }
            remap.push(Some(kept.len()));
            kept.push(element.clone());
        }
        if dropped > 0 {
            trace!(clause = %clause.id, dropped, "dropped duplicate verb elements");
            rebuild(tree, position, kept, &remap);
        }
        dropped
    }
}

/// `v` starts with `part` and continues, if at all, only over whitespace
/// and one phrasal particle.
pub(crate) fn covers_with_particle(sentence: &str, lexicon: &Lexicon, part: Span, v: Span) -> bool {
    if v.start != part.start || v.end < part.end {
        return false;
    }
    if v.end == part.end {
        return true;
    }
    match sentence.get(part.end..v.end) {
        Some(extra) => {
            let word = extra.trim();
            extra.starts_with(char::is_whitespace)
                && !word.contains(char::is_whitespace)
                && lexicon.is_phrasal_particle(word)
        }
        None => false,
    }
}

fn whole_word_matches(sentence: &str, word: &str) -> Vec<Span> {
    let lower_sentence = sentence.to_lowercase();
    if lower_sentence.len() != sentence.len() {
        // lowercasing moved byte offsets; fall back to exact matches
        return boundary_matches(sentence, sentence, word);
    }
    boundary_matches(sentence, &lower_sentence, &word.to_lowercase())
}

fn boundary_matches(sentence: &str, haystack: &str, needle: &str) -> Vec<Span> {
    haystack
        .match_indices(needle)
        .map(|(start, m)| Span::new(start, start + m.len()))
        .filter(|span| {
            let before = sentence.get(..span.start).and_then(|s| s.chars().next_back());
            let after = sentence.get(span.end..).and_then(|s| s.chars().next());
            !before.map_or(false, char::is_alphanumeric) && !after.map_or(false, char::is_alphanumeric)
        })
        .collect()
}

/// `span` without surrounding whitespace; `None` if nothing wordlike is left.
fn trim_span(sentence: &str, span: Span) -> Option<Span> {
    let text = span.slice(sentence)?;
    let start = span.start + (text.len() - text.trim_start().len());
    let end = span.end - (text.len() - text.trim_end().len());
    let trimmed = Span::new(start, end.max(start));
    let has_word = trimmed.slice(sentence)?.chars().any(char::is_alphanumeric);
    if has_word {
        Some(trimmed)
    } else {
        None
    }
}

/// Replace the elements at `removed` with `added`, placed where the first
/// removed element was. Removed elements map to the added element they
/// overlap most (spanless ones to the first added element), which inherits
/// their metadata.
pub(crate) fn splice(tree: &mut ClauseTree, position: usize, removed: &[usize], added: Vec<Element>) {
    let Some(&insert_at) = removed.iter().min() else {
        return;
    };
    let old = tree.clause(position).elements.clone();
    let added_len = added.len();
    let mut kept: Vec<Element> = Vec::with_capacity(old.len() + added_len);
    let mut remap: Vec<Option<usize>> = vec![None; old.len()];
    let mut base = 0;
    let mut added = Some(added);

    for (i, element) in old.iter().enumerate() {
        if i == insert_at {
            base = kept.len();
            kept.extend(added.take().unwrap_or_default());
        }
        if !removed.contains(&i) {
            remap[i] = Some(kept.len());
            kept.push(element.clone());
        }
    }

    for &o in removed {
        let source = &old[o];
        let target = match source.span {
            None if added_len > 0 => Some(base),
            None => None,
            Some(span) => (0..added_len)
                .filter_map(|k| {
                    let overlap = kept[base + k].span.map_or(0, |s| s.overlap_len(&span));
                    (overlap > 0).then_some((overlap, k))
                })
                .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
                .map(|(_, k)| base + k),
        };
        remap[o] = target;
        if let Some(t) = target {
            inherit(&mut kept[t], source);
        }
    }
    rebuild(tree, position, kept, &remap);
}

fn inherit(target: &mut Element, source: &Element) {
    if target.role == source.role {
        if target.modifies_index.is_none() {
            target.modifies_index = source.modifies_index;
        }
        if target.arrow_type.is_none() {
            target.arrow_type = source.arrow_type;
        }
        if target.predicate_group_id.is_none() {
            target.predicate_group_id = source.predicate_group_id.clone();
        }
    }
    if target.expands_to.is_none() && !target.is(Role::V) {
        target.expands_to = source.expands_to.clone();
    }
}

/// Install a new element list and push an old→new index map through every
/// index reference.
pub(crate) fn rebuild(
    tree: &mut ClauseTree,
    position: usize,
    mut elements: Vec<Element>,
    remap: &[Option<usize>],
) {
    for (i, element) in elements.iter_mut().enumerate() {
        element.modifies_index = element
            .modifies_index
            .and_then(|m| remap.get(m).copied().flatten())
            .filter(|&m| m != i);
    }
    let clause = tree.clause_mut(position);
    clause.elements = elements;
    let id = clause.id.clone();
    tree.remap_child_links(&id, remap);
}

/// Stable re-sort of a clause's elements by start offset. Elided elements
/// stay behind the surface element they followed.
fn restore_order(tree: &mut ClauseTree, position: usize) {
    let elements = &tree.clause(position).elements;
    let mut last_start = None;
    let keys: Vec<(usize, u8, usize)> = elements
        .iter()
        .enumerate()
        .map(|(i, e)| match (e.span, last_start) {
            (Some(span), _) => {
                last_start = Some(span.start);
                (span.start, 1, i)
            }
            (None, Some(start)) => (start, 2, i),
            (None, None) => (0, 0, i),
        })
        .collect();
    let mut order: Vec<usize> = (0..elements.len()).collect();
    order.sort_by_key(|&i| keys[i]);
    if order.iter().enumerate().all(|(new, &old)| new == old) {
        return;
    }
    let mut remap = vec![None; elements.len()];
    for (new, &old) in order.iter().enumerate() {
        remap[old] = Some(new);
    }
    let reordered = order.iter().map(|&old| elements[old].clone()).collect();
    rebuild(tree, position, reordered, &remap);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::{Clause, ClauseType};
    use crate::config::ReconcileConfig;
    use crate::span_reconciler::SpanReconciler;
    use crate::token::Tokenizer;
    use crate::verb_chain::VerbChainResolver;

    fn enforce(sentence: &str, elements: Vec<Element>) -> (Vec<Element>, usize) {
        let lexicon = Lexicon::english();
        let tokens = Tokenizer::new(&lexicon).tokenize(sentence);
        let chains = VerbChainResolver::new(&lexicon).resolve(sentence, &tokens);
        let mut tree = ClauseTree::new();
        tree.push_unchecked(Clause::main().with_elements(elements));
        let config = ReconcileConfig::standard();
        SpanReconciler::new(sentence, &config).reconcile(&mut tree.clause_mut(0).elements);
        let fixes = VerbChainEnforcer::new(sentence, &lexicon, &chains).enforce(&mut tree);
        (tree.clause(0).elements.clone(), fixes)
    }

    fn render(elements: &[Element]) -> String {
        elements
            .iter()
            .map(|e| format!("{}:{}", e.role, e.text))
            .collect::<Vec<_>>()
            .join(" | ")
    }

    fn labeled(role: Role, sentence: &str, text: &str) -> Element {
        Element::find(role, sentence, text).unwrap()
    }

    #[test]
    fn test_inversion_split_from_unresolved_verb() {
        let sentence = "Rarely did the committee acknowledge the report";
        let (elements, fixes) = enforce(
            sentence,
            vec![
                labeled(Role::M, sentence, "Rarely"),
                Element::new(Role::V, "did acknowledge", 7, 22),
                labeled(Role::S, sentence, "the committee"),
                labeled(Role::Od, sentence, "the report"),
            ],
        );
        assert_eq!(fixes, 1);
        insta::assert_snapshot!(
            render(&elements),
            @"M:Rarely | V:did | S:the committee | V:acknowledge | Od:the report"
        );
    }

    #[test]
    fn test_inversion_split_from_merged_span() {
        let sentence = "Rarely did the committee acknowledge the report";
        let (elements, _) = enforce(
            sentence,
            vec![
                labeled(Role::M, sentence, "Rarely"),
                labeled(Role::V, sentence, "did the committee acknowledge"),
                labeled(Role::Od, sentence, "the report"),
            ],
        );
        insta::assert_snapshot!(
            render(&elements),
            @"M:Rarely | V:did | S:the committee | V:acknowledge | Od:the report"
        );
    }

    #[test]
    fn test_discontinuous_chain_gets_insert() {
        let sentence = "The rule had, once codified into procedure, come to define practice";
        let (elements, _) = enforce(
            sentence,
            vec![
                labeled(Role::S, sentence, "The rule"),
                Element::new(Role::V, "had come", 9, 17),
                labeled(Role::M, sentence, "once codified into procedure"),
                labeled(Role::Comp, sentence, "to define practice"),
            ],
        );
        insta::assert_snapshot!(
            render(&elements),
            @"S:The rule | V:had | Insert:, once codified into procedure, | V:come | Comp:to define practice"
        );
    }

    #[test]
    fn test_overlong_verb_is_shrunk() {
        let sentence = "She seems to be happy";
        let (elements, fixes) = enforce(
            sentence,
            vec![
                labeled(Role::S, sentence, "She"),
                labeled(Role::V, sentence, "seems to be"),
                labeled(Role::C, sentence, "happy"),
            ],
        );
        assert_eq!(fixes, 1);
        insta::assert_snapshot!(render(&elements), @"S:She | V:seems | M:to be | C:happy");
    }

    #[test]
    fn test_wrongly_split_chain_is_merged() {
        let sentence = "She had never been told the truth";
        let (elements, _) = enforce(
            sentence,
            vec![
                labeled(Role::S, sentence, "She"),
                labeled(Role::V, sentence, "had"),
                labeled(Role::M, sentence, "never"),
                labeled(Role::V, sentence, "been told"),
                labeled(Role::Od, sentence, "the truth"),
            ],
        );
        insta::assert_snapshot!(
            render(&elements),
            @"S:She | V:had never been told | Od:the truth"
        );
    }

    #[test]
    fn test_phrasal_particle_may_stay() {
        let sentence = "He gave up the fight";
        let (elements, fixes) = enforce(
            sentence,
            vec![
                labeled(Role::S, sentence, "He"),
                labeled(Role::V, sentence, "gave up"),
                labeled(Role::Od, sentence, "the fight"),
            ],
        );
        assert_eq!(fixes, 0);
        assert_eq!(elements[1].text, "gave up");
    }

    #[test]
    fn test_conformant_input_is_untouched() {
        let sentence = "Rarely did the committee acknowledge the report";
        let elements = vec![
            labeled(Role::M, sentence, "Rarely"),
            labeled(Role::V, sentence, "did"),
            labeled(Role::S, sentence, "the committee"),
            labeled(Role::V, sentence, "acknowledge"),
            labeled(Role::Od, sentence, "the report"),
        ];
        let (after, fixes) = enforce(sentence, elements.clone());
        assert_eq!(fixes, 0);
        assert_eq!(after, elements);
    }

    #[test]
    fn test_duplicate_verbs_are_dropped_and_links_remapped() {
        let sentence = "She sings loudly";
        let (elements, fixes) = enforce(
            sentence,
            vec![
                labeled(Role::S, sentence, "She"),
                labeled(Role::V, sentence, "sings"),
                labeled(Role::V, sentence, "sings"),
                labeled(Role::M, sentence, "loudly").with_modifies(2),
            ],
        );
        assert_eq!(fixes, 1);
        assert_eq!(render(&elements), "S:She | V:sings | M:loudly");
        assert_eq!(elements[2].modifies_index, Some(1));
    }

    #[test]
    fn test_child_links_follow_rewrites() {
        let sentence = "Rarely did the committee acknowledge that it failed";
        let lexicon = Lexicon::english();
        let tokens = Tokenizer::new(&lexicon).tokenize(sentence);
        let chains = VerbChainResolver::new(&lexicon).resolve(sentence, &tokens);

        let mut tree = ClauseTree::new();
        tree.push_unchecked(Clause::main().with_elements(vec![
            labeled(Role::M, sentence, "Rarely"),
            labeled(Role::V, sentence, "did the committee acknowledge"),
            labeled(Role::Od, sentence, "that it failed").with_expands_to("c1"),
        ]));
        tree.push_unchecked(
            Clause::new("c1", ClauseType::Noun)
                .with_parent("main", 2)
                .with_elements(vec![
                    labeled(Role::Compz, sentence, "that"),
                    labeled(Role::S, sentence, "it"),
                    labeled(Role::V, sentence, "failed"),
                ]),
        );
        VerbChainEnforcer::new(sentence, &lexicon, &chains).enforce(&mut tree);

        let main = tree.clause(0);
        assert_eq!(main.elements.len(), 5);
        assert_eq!(tree.clause(1).parent_element_index, Some(4));
        assert_eq!(main.elements[4].expands_to.as_deref(), Some("c1"));
    }
}
