//! Bracketing of discontinuous verb chains.
//!
//! After enforcement a discontinuous chain should read `V Insert V` with
//! nothing in between. The marker relabels whatever sits in the gap as
//! `Insert` and draws the bracket arc from the first `V` to the second.

use tracing::{debug, trace};

use crate::chain_enforcer::{rebuild, splice};
use crate::clause::{Clause, ClauseTree};
use crate::element::{ArrowType, Element, Role, RoleTag, Span};
use crate::verb_chain::{ChainKind, VerbChain};

pub struct ParentheticalMarker<'a> {
    sentence: &'a str,
    chains: &'a [VerbChain],
}

impl<'a> ParentheticalMarker<'a> {
    pub fn new(sentence: &'a str, chains: &'a [VerbChain]) -> Self {
        Self { sentence, chains }
    }

    pub fn mark(&self, tree: &mut ClauseTree) -> usize {
        let mut fixes = 0;
        for position in 0..tree.len() {
            for chain in self.chains.iter().filter(|c| c.kind == ChainKind::Discontinuous) {
                fixes += self.mark_chain(tree, position, chain);
            }
        }
        debug!(fixes, "parenthetical marking");
        fixes
    }

    fn mark_chain(&self, tree: &mut ClauseTree, position: usize, chain: &VerbChain) -> usize {
        let mut verbs = chain.verb_parts().map(|p| p.span);
        let (Some(first), Some(second), Some(gap)) =
            (verbs.next(), verbs.next(), chain.insertion().map(|p| p.span))
        else {
            return 0;
        };
        let clause = tree.clause(position);
        if verb_at(clause, first).is_none() || verb_at(clause, second).is_none() {
            return 0;
        }

        let mut fixes = 0;
        let occupants: Vec<usize> = clause
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.is(Role::V) && e.span.map_or(false, |s| s.overlaps(&gap)))
            .map(|(i, _)| i)
            .collect();

        match occupants.as_slice() {
            [] => {
                if let Some(insert) = Element::at(Role::Insert, self.sentence, gap) {
                    let at = verb_at(clause, first).map_or(0, |i| i + 1);
                    trace!(clause = %clause.id, text = %insert.text, "inserted missing insertion element");
                    insert_element(tree, position, at, insert);
                    fixes += 1;
                }
            }
            [only] if clause.elements[*only].span == Some(gap) => {
                if !clause.elements[*only].is(Role::Insert) {
                    trace!(
                        clause = %clause.id,
                        index = *only,
                        from = %clause.elements[*only].role,
                        "relabelled insertion"
                    );
                    tree.clause_mut(position).elements[*only].role = RoleTag::Known(Role::Insert);
                    fixes += 1;
                }
            }
            _ => {
                if let Some(insert) = Element::at(Role::Insert, self.sentence, gap) {
                    trace!(clause = %clause.id, replaced = occupants.len(), "collapsed insertion");
                    splice(tree, position, &occupants, vec![insert]);
                    fixes += 1;
                }
            }
        }

        let clause = tree.clause(position);
        if let (Some(v1), Some(v2)) = (verb_at(clause, first), verb_at(clause, second)) {
            let element = &clause.elements[v1];
            if element.arrow_type != Some(ArrowType::Insertion) || element.modifies_index != Some(v2) {
                let element = &mut tree.clause_mut(position).elements[v1];
                element.arrow_type = Some(ArrowType::Insertion);
                element.modifies_index = Some(v2);
                fixes += 1;
            }
        }
        fixes
    }
}

/// The `V` element sitting on a verb part.
fn verb_at(clause: &Clause, part: Span) -> Option<usize> {
    clause
        .elements
        .iter()
        .position(|e| e.is(Role::V) && e.span.map_or(false, |s| s.start == part.start))
}

fn insert_element(tree: &mut ClauseTree, position: usize, at: usize, element: Element) {
    let mut elements = tree.clause(position).elements.clone();
    let at = at.min(elements.len());
    let remap: Vec<Option<usize>> = (0..elements.len())
        .map(|i| Some(if i < at { i } else { i + 1 }))
        .collect();
    elements.insert(at, element);
    rebuild(tree, position, elements, &remap);
}
