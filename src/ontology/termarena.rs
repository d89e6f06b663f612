use std::collections::hash_map::{Values, ValuesMut};
use std::collections::HashMap;

use crate::term::internal::TermInternal;
use crate::term::TermKey;
use crate::DEFAULT_NUM_TERMS;

/// Owns every [`TermInternal`] of the ontology, keyed by [`TermKey`]
#[derive(Debug, Clone)]
pub(crate) struct Arena {
    terms: HashMap<TermKey, TermInternal>,
}

impl Arena {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn insert(&mut self, term: TermInternal) {
        let id = *term.key();
        self.terms.insert(id, term);
    }

    pub fn contains(&self, id: TermKey) -> bool {
        self.terms.contains_key(&id)
    }

    pub fn get(&self, id: TermKey) -> Option<&TermInternal> {
        self.terms.get(&id)
    }

    pub fn get_mut(&mut self, id: TermKey) -> Option<&mut TermInternal> {
        self.terms.get_mut(&id)
    }

    pub fn values(&self) -> Values<'_, TermKey, TermInternal> {
        self.terms.values()
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, TermKey, TermInternal> {
        self.terms.values_mut()
    }

    /// Returns all keys, sorted ascending
    pub fn keys(&self) -> Vec<TermKey> {
        let mut keys: Vec<TermKey> = self.terms.keys().copied().collect();
        keys.sort_unstable();
        keys
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            terms: HashMap::with_capacity(DEFAULT_NUM_TERMS),
        }
    }
}
