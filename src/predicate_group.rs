//! Shared predicate ids for the `V` elements of one predicate.
//!
//! Ids are `vc-0`, `vc-1`, ... in tree order. Both halves of an inverted
//! pair and both verb parts of a discontinuous chain share one id, as does
//! an obligatory `Comp` directly after the predicate's last `V`.

use std::collections::HashMap;

use layered_svoc_lexicon::Lexicon;
use tracing::{debug, trace};

use crate::clause::ClauseTree;
use crate::element::Role;
use crate::pattern::takes_verbal_complement;
use crate::verb_chain::{chain_index_at, VerbChain};

pub struct PredicateGrouper<'a> {
    lexicon: &'a Lexicon,
    chains: &'a [VerbChain],
}

impl<'a> PredicateGrouper<'a> {
    pub fn new(lexicon: &'a Lexicon, chains: &'a [VerbChain]) -> Self {
        Self { lexicon, chains }
    }

    /// Stamp ids over the whole tree. Returns how many elements changed id.
    pub fn stamp(&self, tree: &mut ClauseTree) -> usize {
        let mut next = 0;
        let mut changed = 0;

        for position in 0..tree.len() {
            let clause = tree.clause(position);
            let mut ids: Vec<Option<String>> = vec![None; clause.elements.len()];
            let mut groups: HashMap<usize, (String, usize)> = HashMap::new();

            for (index, element) in clause.elements.iter().enumerate() {
                if !element.is(Role::V) {
                    continue;
                }
                let chain = element.span.and_then(|s| chain_index_at(self.chains, &s));
                let key = chain.map(|c| self.group_key(c));
                let id = match key.and_then(|k| groups.get_mut(&k)) {
                    Some((id, last)) => {
                        *last = index;
                        id.clone()
                    }
                    None => {
                        let id = format!("vc-{}", next);
                        next += 1;
                        if let Some(k) = key {
                            groups.insert(k, (id.clone(), index));
                        }
                        id
                    }
                };
                ids[index] = Some(id);
            }

            for (key, (id, last)) in &groups {
                let comp = last + 1;
                let obligatory = clause
                    .elements
                    .get(comp)
                    .map_or(false, |e| e.is(Role::Comp) && !e.is_elided())
                    && self.takes_comp(*key);
                if obligatory {
                    ids[comp] = Some(id.clone());
                }
            }

            let clause = tree.clause_mut(position);
            for (index, id) in ids.into_iter().enumerate() {
                let element = &mut clause.elements[index];
                let stale = element.is(Role::V) || element.is(Role::Comp);
                if id.is_none() && !stale {
                    continue;
                }
                if element.predicate_group_id != id {
                    trace!(clause = %clause.id, index, id = ?id, "predicate group");
                    element.predicate_group_id = id;
                    changed += 1;
                }
            }
        }
        debug!(changed, groups = next, "predicate grouping");
        changed
    }

    /// Inverted partners collapse onto the lower index.
    fn group_key(&self, chain: usize) -> usize {
        match self.chains[chain].partner {
            Some(partner) => partner.min(chain),
            None => chain,
        }
    }

    fn takes_comp(&self, key: usize) -> bool {
        let chain = match self.chains[key].partner {
            Some(partner) => &self.chains[partner.max(key)],
            None => &self.chains[key],
        };
        takes_verbal_complement(self.lexicon, chain)
    }
}
