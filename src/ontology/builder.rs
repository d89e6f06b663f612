use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;

use tracing::{debug, info, warn};

use crate::ontology::termarena::Arena;
use crate::ontology::OntologyCache;
use crate::term::internal::TermInternal;
use crate::term::{TermGroup, TermKey, Vocabulary};
use crate::{IndexError, IndexResult};

/// Builder state: terms are being collected
pub struct LooseCollection;
/// Builder state: all terms are known, edges are being collected
pub struct AllTerms;

fn transition_state<TX, TY>(builder: Builder<TX>) -> Builder<TY> {
    Builder::<TY> {
        terms: builder.terms,
        obsolete: builder.obsolete,
        skipped_edges: builder.skipped_edges,
        state: PhantomData,
    }
}

/// Builds an [`OntologyCache`] in three explicit steps
///
/// ```text
/// Builder<LooseCollection>
/// |  add_term(), add_synonym(), add_alternate_id(), set_obsolete()
/// terms_complete()
/// V
/// Builder<AllTerms>
/// |  add_parent()
/// connect_all_terms()
/// V
/// OntologyCache
/// ```
///
/// Obsolete terms are dropped in `terms_complete`, so neither they nor any edge
/// touching them can end up in an ancestor set. The resulting cache is a
/// single consistent snapshot and is never refreshed afterwards.
///
/// # Examples
///
/// ```
/// use bsu_index::ontology::Builder;
/// use bsu_index::Vocabulary;
///
/// let mut builder = Builder::new();
/// let mp = || Vocabulary::MammalianPhenotype;
/// builder.add_term(1u32, "MP:0000001", "mammalian phenotype", mp());
/// builder.add_term(2u32, "MP:0005371", "limbs/digits/tail phenotype", mp());
///
/// let mut builder = builder.terms_complete();
/// builder.add_parent(1u32, 2u32).unwrap();
///
/// let ontology = builder.connect_all_terms();
/// assert!(ontology.ancestors(2u32).contains(&1u32.into()));
/// ```
pub struct Builder<T> {
    terms: Arena,
    obsolete: HashSet<TermKey>,
    skipped_edges: usize,
    state: PhantomData<T>,
}

impl Default for Builder<LooseCollection> {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder<LooseCollection> {
    pub fn new() -> Builder<LooseCollection> {
        Builder::<LooseCollection> {
            terms: Arena::default(),
            obsolete: HashSet::new(),
            skipped_edges: 0,
            state: PhantomData,
        }
    }

    /// Inserts a term into the collection
    ///
    /// A term with the same key replaces the previous one.
    pub fn add_term<I: Into<TermKey>>(
        &mut self,
        key: I,
        primary_id: &str,
        label: &str,
        vocabulary: Vocabulary,
    ) -> TermKey {
        let key = key.into();
        self.terms
            .insert(TermInternal::new(key, primary_id, label, vocabulary));
        key
    }

    /// Adds a synonym to a term
    ///
    /// # Errors
    ///
    /// [`IndexError::UnknownTerm`] if the term was not added before
    pub fn add_synonym<I: Into<TermKey>>(&mut self, key: I, synonym: &str) -> IndexResult<bool> {
        let key = key.into();
        let term = self.terms.get_mut(key).ok_or(IndexError::UnknownTerm(key))?;
        Ok(term.add_synonym(synonym))
    }

    /// Adds an alternate (secondary) id to a term
    ///
    /// # Errors
    ///
    /// [`IndexError::UnknownTerm`] if the term was not added before
    pub fn add_alternate_id<I: Into<TermKey>>(&mut self, key: I, id: &str) -> IndexResult<bool> {
        let key = key.into();
        let term = self.terms.get_mut(key).ok_or(IndexError::UnknownTerm(key))?;
        Ok(term.add_alternate_id(id))
    }

    /// Flags a term as obsolete; it is dropped once the terms are complete
    ///
    /// # Errors
    ///
    /// [`IndexError::UnknownTerm`] if the term was not added before
    pub fn set_obsolete<I: Into<TermKey>>(&mut self, key: I) -> IndexResult<()> {
        let key = key.into();
        let term = self.terms.get_mut(key).ok_or(IndexError::UnknownTerm(key))?;
        *term.obsolete_mut() = true;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[must_use]
    pub fn terms_complete(mut self) -> Builder<AllTerms> {
        let mut arena = Arena::default();
        for term in self.terms.values() {
            if term.obsolete() {
                self.obsolete.insert(*term.key());
            } else {
                arena.insert(term.clone());
            }
        }
        if !self.obsolete.is_empty() {
            debug!("Dropped {} obsolete terms", self.obsolete.len());
        }
        self.terms = arena;
        transition_state(self)
    }
}

impl Builder<AllTerms> {
    /// Add a connection from a term to its parent
    ///
    /// Edges that touch an obsolete term are skipped silently and counted,
    /// since the obsolete term is not part of the snapshot.
    ///
    /// # Errors
    ///
    /// [`IndexError::UnknownTerm`] if either term was never added
    pub fn add_parent<I: Into<TermKey>, J: Into<TermKey>>(
        &mut self,
        parent_id: I,
        child_id: J,
    ) -> IndexResult<()> {
        let parent_id = parent_id.into();
        let child_id = child_id.into();

        if self.obsolete.contains(&parent_id) || self.obsolete.contains(&child_id) {
            self.skipped_edges += 1;
            return Ok(());
        }
        if !self.terms.contains(parent_id) {
            return Err(IndexError::UnknownTerm(parent_id));
        }
        let child = self
            .terms
            .get_mut(child_id)
            .ok_or(IndexError::UnknownTerm(child_id))?;
        child.add_parent(parent_id);
        Ok(())
    }

    /// Like [`Builder::add_parent`] but skips edges to unknown terms instead
    /// of failing. Returns `false` if the edge referenced an unknown term.
    pub fn add_parent_lenient<I: Into<TermKey>, J: Into<TermKey>>(
        &mut self,
        parent_id: I,
        child_id: J,
    ) -> bool {
        let parent_id = parent_id.into();
        let child_id = child_id.into();
        match self.add_parent(parent_id, child_id) {
            Ok(()) => true,
            Err(_) => {
                debug!("Skipping edge {} -> {}", parent_id, child_id);
                self.skipped_edges += 1;
                false
            }
        }
    }

    /// Computes and caches the ancestor set of every term and returns the
    /// immutable [`OntologyCache`]
    ///
    /// The closure is computed depth-first. Each term's ancestor set is
    /// memoized the first time it is reached, so terms that share
    /// ancestors only pay for them once, no matter in which order they
    /// are visited.
    #[must_use]
    pub fn connect_all_terms(mut self) -> OntologyCache {
        let keys = self.terms.keys();
        let mut memo: HashMap<TermKey, TermGroup> = HashMap::with_capacity(keys.len());
        let mut in_progress: HashMap<TermKey, TermGroup> = HashMap::new();
        let mut cycles = 0usize;

        for key in &keys {
            ancestor_closure(*key, &self.terms, &mut memo, &mut in_progress, &mut cycles);
        }

        for term in self.terms.values_mut() {
            if let Some(ancestors) = memo.remove(term.key()) {
                *term.ancestors_mut() = ancestors;
            }
        }

        if cycles > 0 {
            warn!("Ontology contains {} cyclic parent references", cycles);
        }
        info!(
            "Ontology cache ready: {} terms, {} skipped edges",
            self.terms.len(),
            self.skipped_edges
        );

        OntologyCache::from_parts(self.terms, cycles, self.skipped_edges)
    }
}

/// Returns the full set of direct and indirect parents of `term`
///
/// `memo` holds the finished ancestor sets and is filled as a side effect.
/// `in_progress` holds the partially accumulated sets of the terms on the
/// current recursion path. Reaching one of them again means the parent
/// graph has a cycle: the partial set is returned instead of recursing and
/// `cycles` is incremented. The term itself is never part of its ancestors.
pub(crate) fn ancestor_closure(
    term: TermKey,
    arena: &Arena,
    memo: &mut HashMap<TermKey, TermGroup>,
    in_progress: &mut HashMap<TermKey, TermGroup>,
    cycles: &mut usize,
) -> TermGroup {
    if let Some(cached) = memo.get(&term) {
        return cached.clone();
    }
    if let Some(partial) = in_progress.get(&term) {
        *cycles += 1;
        return partial.clone();
    }

    let Some(internal) = arena.get(term) else {
        return TermGroup::new();
    };

    in_progress.insert(term, TermGroup::with_capacity(internal.parents().len() * 4));
    for parent in internal.parents() {
        if parent == term {
            *cycles += 1;
            continue;
        }
        let grandparents = ancestor_closure(parent, arena, memo, in_progress, cycles);
        if let Some(acc) = in_progress.get_mut(&term) {
            acc.insert(parent);
            acc.extend_from(&grandparents);
        }
    }

    let mut ancestors = in_progress.remove(&term).unwrap_or_default();
    ancestors.remove(&term);
    memo.insert(term, ancestors.clone());
    ancestors
}
