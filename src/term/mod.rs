//! Controlled-vocabulary terms and groups of terms
use core::fmt::Debug;
use std::fmt::Display;

use serde::Serialize;

use crate::ontology::OntologyCache;

mod group;
pub(crate) mod internal;
mod termkey;

pub use group::{TermGroup, TermKeys};
pub use termkey::TermKey;

use internal::TermInternal;

/// The vocabulary (ontology) a term belongs to
///
/// Only phenotype and disease vocabularies are rolled up along their
/// ancestors when documents are assembled, see [`Vocabulary::rolls_up`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Vocabulary {
    MammalianPhenotype,
    HumanPhenotype,
    Disease,
    Anatomy,
    Other(String),
}

impl Vocabulary {
    /// Returns `true` if annotations to this vocabulary are attributed to
    /// every ancestor of the annotated term as well
    pub fn rolls_up(&self) -> bool {
        self.is_phenotype() || self.is_disease()
    }

    pub fn is_phenotype(&self) -> bool {
        matches!(self, Vocabulary::MammalianPhenotype | Vocabulary::HumanPhenotype)
    }

    pub fn is_disease(&self) -> bool {
        matches!(self, Vocabulary::Disease)
    }

    /// Guesses the vocabulary from the prefix of a primary id, e.g. `MP:0001186`
    pub fn from_primary_id(id: &str) -> Vocabulary {
        match id.split_once(':').map(|(prefix, _)| prefix) {
            Some("MP") => Vocabulary::MammalianPhenotype,
            Some("HP") => Vocabulary::HumanPhenotype,
            Some("DOID") | Some("OMIM") => Vocabulary::Disease,
            Some("EMAPA") | Some("UBERON") => Vocabulary::Anatomy,
            Some(prefix) => Vocabulary::Other(prefix.to_string()),
            None => Vocabulary::Other(String::new()),
        }
    }
}

impl From<&str> for Vocabulary {
    /// Parses a vocabulary name as found in the database or an OBO `default-namespace`
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().replace('_', " ").as_str() {
            "mammalian phenotype" | "mpheno.ontology" | "mp" => Vocabulary::MammalianPhenotype,
            "human phenotype ontology" | "human phenotype" | "hp" | "hpo" => {
                Vocabulary::HumanPhenotype
            }
            "disease ontology" | "disease" | "doid" | "omim" => Vocabulary::Disease,
            "emapa" | "anatomy" | "uberon" => Vocabulary::Anatomy,
            _ => Vocabulary::Other(name.trim().to_string()),
        }
    }
}

impl Display for Vocabulary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Vocabulary::MammalianPhenotype => write!(f, "Mammalian Phenotype"),
            Vocabulary::HumanPhenotype => write!(f, "Human Phenotype Ontology"),
            Vocabulary::Disease => write!(f, "Disease Ontology"),
            Vocabulary::Anatomy => write!(f, "Anatomy"),
            Vocabulary::Other(name) => write!(f, "{name}"),
        }
    }
}

/// A single term of the [`OntologyCache`]
///
/// The term borrows all of its data from the cache, so it is cheap to
/// create and to copy.
#[derive(Debug, Clone, Copy)]
pub struct Term<'a> {
    inner: &'a TermInternal,
    ontology: &'a OntologyCache,
}

impl<'a> Term<'a> {
    pub(crate) fn new(ontology: &'a OntologyCache, inner: &'a TermInternal) -> Term<'a> {
        Term { inner, ontology }
    }

    /// Returns the [`TermKey`] of the term
    pub fn key(&self) -> TermKey {
        *self.inner.key()
    }

    /// Returns the primary external id, e.g. `MP:0001186`
    pub fn primary_id(&self) -> &'a str {
        self.inner.primary_id()
    }

    /// Returns the display label of the term
    pub fn label(&self) -> &'a str {
        self.inner.label()
    }

    pub fn vocabulary(&self) -> &'a Vocabulary {
        self.inner.vocabulary()
    }

    pub fn alternate_ids(&self) -> &'a [String] {
        self.inner.alternate_ids()
    }

    pub fn synonyms(&self) -> &'a [String] {
        self.inner.synonyms()
    }

    /// Returns the [`TermKey`]s of the direct parents
    pub fn parent_ids(&self) -> &'a TermGroup {
        self.inner.parents()
    }

    /// Returns the [`TermKey`]s of all direct and indirect parents
    pub fn ancestor_ids(&self) -> &'a TermGroup {
        self.inner.ancestors()
    }

    /// Returns an iterator of all direct and indirect parents
    pub fn ancestors(&self) -> Terms<'a> {
        Terms::new(self.inner.ancestors(), self.ontology)
    }

    /// Returns `true` if `other` is a direct or indirect parent of `self`
    pub fn child_of(&self, other: &Term) -> bool {
        self.inner.ancestors().contains(&other.key())
    }
}

impl PartialEq for Term<'_> {
    fn eq(&self, other: &Term) -> bool {
        self.inner.key() == other.inner.key()
    }
}

impl Eq for Term<'_> {}

/// Iterates the [`Term`]s of a [`TermGroup`]
///
/// Keys that are not part of the ontology are skipped.
pub struct Terms<'a> {
    keys: TermKeys<'a>,
    ontology: &'a OntologyCache,
}

impl<'a> Terms<'a> {
    pub fn new(group: &'a TermGroup, ontology: &'a OntologyCache) -> Self {
        Terms {
            keys: group.iter(),
            ontology,
        }
    }
}

impl<'a> Iterator for Terms<'a> {
    type Item = Term<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        for key in self.keys.by_ref() {
            if let Some(term) = self.ontology.term(key) {
                return Some(term);
            }
        }
        None
    }
}

impl Debug for Terms<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Terms")
    }
}
