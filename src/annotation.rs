//! Raw annotations: "subject S is associated with term T"
use std::fmt::Display;

use serde::Serialize;

use crate::keys::{AnnotationKey, GenotypeKey, MarkerKey};
use crate::term::TermKey;

/// The annotated object
///
/// Mouse phenotype and disease annotations are made to genotypes, human
/// disease annotations are made directly to markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Marker(MarkerKey),
    Genotype(GenotypeKey),
}

/// A modifier on an annotation
///
/// A negating qualifier turns the annotation into an exclusionary fact, it
/// must never be merged with unqualified annotations of the same term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Qualifier {
    Not,
    Other(String),
}

impl Qualifier {
    /// Parses the qualifier column of an annotation
    ///
    /// Empty values mean "no qualifier" and yield `None`.
    pub fn parse(value: &str) -> Option<Qualifier> {
        let value = value.trim();
        if value.is_empty() {
            None
        } else if value.eq_ignore_ascii_case("not") {
            Some(Qualifier::Not)
        } else {
            Some(Qualifier::Other(value.to_string()))
        }
    }

    pub fn is_negated(&self) -> bool {
        matches!(self, Qualifier::Not)
    }
}

impl Display for Qualifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Qualifier::Not => write!(f, "NOT"),
            Qualifier::Other(q) => write!(f, "{q}"),
        }
    }
}

/// One annotation fact
///
/// The same subject and term can appear in several annotations with
/// different qualifiers or references; each one is kept as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub key: AnnotationKey,
    pub subject: Subject,
    pub term: TermKey,
    pub qualifier: Option<Qualifier>,
    pub reference: Option<String>,
}

impl Annotation {
    pub fn new(key: AnnotationKey, subject: Subject, term: TermKey) -> Self {
        Annotation {
            key,
            subject,
            term,
            qualifier: None,
            reference: None,
        }
    }

    #[must_use]
    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifier = Some(qualifier);
        self
    }

    #[must_use]
    pub fn with_reference(mut self, reference: &str) -> Self {
        self.reference = Some(reference.to_string());
        self
    }

    /// Returns `true` if the annotation carries a negating qualifier
    pub fn is_negated(&self) -> bool {
        self.qualifier.as_ref().is_some_and(Qualifier::is_negated)
    }
}
