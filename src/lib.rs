//! Ontology annotation rollup and grouped search-document assembly
//!
//! The crate turns a stream of ontology annotations into one search document
//! per Basic Search Unit (BSU). A run is strictly sequential:
//!
//! 1. Warm the [`OntologyCache`] (terms, edges and ancestor closure) and the
//!    [`OrthologyCache`] (markers, orthologs, coordinates).
//! 2. Warm the [`BsuRegistry`] from ordered human and mouse pair scans.
//! 3. Feed a BSU-ordered row stream through a [`DocumentBuilder`] which emits
//!    aggregated [`OutputRecord`]s into a [`DocumentSink`].
//!
//! Oversized scans are split with [`chunk::ChunkedRange`]; the builder keeps
//! its open record across chunk edges.
use core::fmt::Debug;
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

pub mod annotation;
pub mod chunk;
pub mod clusters;
pub mod config;
pub mod document;
pub mod keys;
pub mod markers;
pub mod ontology;
pub mod parser;
pub mod registry;
pub mod relationships;
pub mod term;

pub use annotation::{Annotation, Qualifier, Subject};
pub use config::IndexConfig;
pub use document::{DocumentBuilder, DocumentSink, OutputRecord, PassStats};
pub use keys::{
    AnnotationKey, BsuKey, GenotypeClusterKey, GenotypeKey, HomologyClusterKey, MarkerKey,
};
pub use markers::{Organism, OrthologyCache};
pub use ontology::OntologyCache;
pub use registry::{BasicSearchUnit, BsuRegistry, Grouping, RegistryBuilder};
pub use relationships::{RelatedTerms, RelationshipIndex};
pub use term::{Term, TermGroup, TermKey, Vocabulary};

const DEFAULT_NUM_PARENTS: usize = 4;
const DEFAULT_NUM_SYNONYMS: usize = 4;
const DEFAULT_NUM_TERMS: usize = 50_000;

/// Main error type of the crate
///
/// Setup errors (a source that cannot be read, a malformed file) and
/// sink errors are fatal for the whole run. Rows that cannot be resolved
/// to a BSU are *not* errors, they are counted in [`PassStats`].
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("term does not exist: {0}")]
    UnknownTerm(TermKey),
    #[error("unable to parse Integer")]
    ParseIntError,
    #[error("cannot open file {0}")]
    CannotOpenFile(String),
    #[error("invalid input data: {0}")]
    InvalidInput(String),
    #[error("input stream is not sorted by BSU: {current} follows {previous}")]
    UnsortedInput { previous: BsuKey, current: BsuKey },
    #[error("document sink failed: {0}")]
    Sink(#[from] std::io::Error),
    #[error("unable to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to read config file at {path:?}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file at {path:?}")]
    ParseConfig {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("{0}")]
    InvalidConfig(String),
}

impl From<ParseIntError> for IndexError {
    fn from(_: ParseIntError) -> Self {
        IndexError::ParseIntError
    }
}

/// Shortcut for `Result<T, IndexError>`
pub type IndexResult<T> = Result<T, IndexError>;
