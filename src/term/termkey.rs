use core::fmt::Debug;
use std::fmt::Display;

use serde::Serialize;

use crate::{IndexError, IndexResult};

/// The integer key of a controlled-vocabulary term
///
/// The key is the database key of the term, not its external accession.
/// Accessions like `MP:0001186` or `DOID:162` live on the term itself,
/// see [`crate::Term::primary_id`].
#[derive(Copy, Clone, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct TermKey {
    inner: u32,
}

impl TermKey {
    /// Returns the integer representation of the key
    pub fn as_u32(&self) -> u32 {
        self.inner
    }
}

impl TryFrom<&str> for TermKey {
    type Error = IndexError;
    fn try_from(s: &str) -> IndexResult<Self> {
        Ok(TermKey {
            inner: s.trim().parse::<u32>()?,
        })
    }
}

impl From<u32> for TermKey {
    fn from(inner: u32) -> Self {
        Self { inner }
    }
}

impl Debug for TermKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TermKey({})", self.inner)
    }
}

impl Display for TermKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "term:{}", self.inner)
    }
}

impl PartialEq<u32> for TermKey {
    fn eq(&self, other: &u32) -> bool {
        self.inner == *other
    }
}
