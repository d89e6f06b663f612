//! The in-memory term cache used during one indexing run
use core::fmt::Debug;
use std::path::Path;

use tracing::debug;

use crate::parser;
use crate::term::internal::TermInternal;
use crate::term::{Term, TermGroup, TermKey, Vocabulary};
use crate::IndexResult;

pub mod builder;
mod termarena;

pub use builder::{AllTerms, Builder, LooseCollection};
use termarena::Arena;

/// One term as delivered by an [`OntologySource`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermRecord {
    pub key: TermKey,
    pub primary_id: String,
    pub label: String,
    pub vocabulary: Vocabulary,
    pub synonyms: Vec<String>,
    pub alternate_ids: Vec<String>,
    pub obsolete: bool,
}

impl TermRecord {
    pub fn new<I: Into<TermKey>>(
        key: I,
        primary_id: &str,
        label: &str,
        vocabulary: Vocabulary,
    ) -> Self {
        TermRecord {
            key: key.into(),
            primary_id: primary_id.to_string(),
            label: label.to_string(),
            vocabulary,
            synonyms: Vec::new(),
            alternate_ids: Vec::new(),
            obsolete: false,
        }
    }
}

/// The backing store of terms and parent → child edges
///
/// Both methods are called exactly once per warm-up. Failing to reach the
/// store is fatal for the run and must be reported as an error.
pub trait OntologySource {
    /// Returns all terms of the relevant vocabularies
    fn terms(&self) -> IndexResult<Vec<TermRecord>>;

    /// Returns all `(parent, child)` edges
    fn edges(&self) -> IndexResult<Vec<(TermKey, TermKey)>>;
}

/// Term metadata and the ancestor closure of every term
///
/// The cache is built once per run, either through [`Builder`] or by
/// [`OntologyCache::load`] from an [`OntologySource`]. Afterwards it is
/// immutable and is handed by reference to every component that needs it.
///
/// All lookups are `O(1)`. Unknown terms are not an error, they yield an
/// empty group, an empty slice or `None`.
///
/// # Examples
///
/// ```
/// use bsu_index::ontology::Builder;
/// use bsu_index::Vocabulary;
///
/// let mut builder = Builder::new();
/// builder.add_term(1u32, "DOID:4", "disease", Vocabulary::Disease);
/// builder.add_term(2u32, "DOID:162", "cancer", Vocabulary::Disease);
/// builder.add_synonym(2u32, "malignant neoplasm").unwrap();
/// let mut builder = builder.terms_complete();
/// builder.add_parent(1u32, 2u32).unwrap();
/// let ontology = builder.connect_all_terms();
///
/// assert_eq!(ontology.label(2u32), Some("cancer"));
/// assert_eq!(ontology.synonyms(2u32), ["malignant neoplasm"]);
/// assert!(ontology.synonyms(99u32).is_empty());
/// ```
pub struct OntologyCache {
    terms: Arena,
    empty: TermGroup,
    cycles: usize,
    skipped_edges: usize,
}

impl Debug for OntologyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OntologyCache with {} terms", self.terms.len())
    }
}

impl OntologyCache {
    pub(crate) fn from_parts(terms: Arena, cycles: usize, skipped_edges: usize) -> Self {
        Self {
            terms,
            empty: TermGroup::new(),
            cycles,
            skipped_edges,
        }
    }

    /// Loads all terms and edges from `source` and computes the ancestor closure
    ///
    /// Loading the same source twice yields an identical cache. Edges that
    /// reference a term missing from the source are skipped.
    ///
    /// # Errors
    ///
    /// Any error of the source is passed through, nothing is cached
    pub fn load<S: OntologySource + ?Sized>(source: &S) -> IndexResult<Self> {
        let records = source.terms()?;
        let edges = source.edges()?;
        debug!("Loading {} terms and {} edges", records.len(), edges.len());

        let mut builder = Builder::new();
        for record in records {
            let key = builder.add_term(
                record.key,
                &record.primary_id,
                &record.label,
                record.vocabulary,
            );
            for synonym in &record.synonyms {
                builder.add_synonym(key, synonym)?;
            }
            for alt_id in &record.alternate_ids {
                builder.add_alternate_id(key, alt_id)?;
            }
            if record.obsolete {
                builder.set_obsolete(key)?;
            }
        }

        let mut builder = builder.terms_complete();
        for (parent, child) in edges {
            builder.add_parent_lenient(parent, child);
        }
        Ok(builder.connect_all_terms())
    }

    /// Loads the cache from an OBO flat file
    ///
    /// # Errors
    ///
    /// - [`crate::IndexError::CannotOpenFile`] if the file cannot be read
    /// - [`crate::IndexError::InvalidInput`] if a stanza is malformed
    pub fn from_obo<P: AsRef<Path>>(path: P) -> IndexResult<Self> {
        let source = parser::obo::OboSource::from_file(path)?;
        Self::load(&source)
    }

    /// Returns the number of (non-obsolete) terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if the cache holds no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the [`Term`] with the given key
    pub fn term<I: Into<TermKey>>(&self, key: I) -> Option<Term<'_>> {
        self.get(key.into()).map(|inner| Term::new(self, inner))
    }

    /// Returns the full set of direct and indirect parents of a term
    ///
    /// Roots and unknown terms have an empty set.
    pub fn ancestors<I: Into<TermKey>>(&self, key: I) -> &TermGroup {
        self.get(key.into())
            .map_or(&self.empty, TermInternal::ancestors)
    }

    /// Returns the direct parents of a term
    pub fn parents<I: Into<TermKey>>(&self, key: I) -> &TermGroup {
        self.get(key.into()).map_or(&self.empty, TermInternal::parents)
    }

    pub fn label<I: Into<TermKey>>(&self, key: I) -> Option<&str> {
        self.get(key.into()).map(TermInternal::label)
    }

    pub fn primary_id<I: Into<TermKey>>(&self, key: I) -> Option<&str> {
        self.get(key.into()).map(TermInternal::primary_id)
    }

    pub fn vocabulary<I: Into<TermKey>>(&self, key: I) -> Option<&Vocabulary> {
        self.get(key.into()).map(TermInternal::vocabulary)
    }

    pub fn synonyms<I: Into<TermKey>>(&self, key: I) -> &[String] {
        self.get(key.into()).map_or(&[][..], TermInternal::synonyms)
    }

    pub fn alternate_ids<I: Into<TermKey>>(&self, key: I) -> &[String] {
        self.get(key.into()).map_or(&[][..], TermInternal::alternate_ids)
    }

    /// Returns an iterator over all terms in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = Term<'_>> {
        self.terms.values().map(|inner| Term::new(self, inner))
    }

    /// Number of cyclic parent references found while computing the closure
    ///
    /// A non-zero value means the ancestor sets of the affected terms may be
    /// incomplete. It is a data-quality signal, not a failure.
    pub fn cycles_detected(&self) -> usize {
        self.cycles
    }

    /// Number of edges dropped because they referenced unknown or obsolete terms
    pub fn skipped_edges(&self) -> usize {
        self.skipped_edges
    }

    pub(crate) fn get(&self, key: TermKey) -> Option<&TermInternal> {
        self.terms.get(key)
    }
}
