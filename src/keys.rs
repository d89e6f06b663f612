//! Integer keys of the records that flow through an indexing run
//!
//! The underlying principle for all keys is the same:
//! - Each record (marker, genotype, cluster, BSU...) has a unique numerical identifier.
//! - The identifier must be unique only within its record type, i.e. a marker
//!   and a genotype can have the same key.
//!
//! All keys are thin `u32` newtypes so that a genotype-cluster key can never
//! be passed where a homology-cluster key is expected.
use core::fmt::Debug;
use core::hash::Hash;
use std::fmt::Display;

use serde::Serialize;

use crate::IndexError;

/// Common behaviour of all record keys
pub trait RecordKey:
    Clone
    + Copy
    + Debug
    + Hash
    + PartialEq
    + PartialOrd
    + Eq
    + Ord
    + Display
    + From<u32>
    + for<'a> TryFrom<&'a str>
{
    /// Return the integer representation of the key
    fn as_u32(&self) -> u32;
}

macro_rules! record_key {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, Debug, Hash, PartialEq, PartialOrd, Eq, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name {
            inner: u32,
        }

        impl RecordKey for $name {
            fn as_u32(&self) -> u32 {
                self.inner
            }
        }

        impl TryFrom<&str> for $name {
            type Error = IndexError;
            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Ok($name {
                    inner: value.trim().parse::<u32>()?,
                })
            }
        }

        impl From<u32> for $name {
            fn from(inner: u32) -> Self {
                $name { inner }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}:{}", $prefix, self.inner)
            }
        }
    };
}

record_key!(
    /// Key of a gene / genome feature, mouse or human
    MarkerKey,
    "marker"
);
record_key!(
    /// Key of a single mouse genotype
    GenotypeKey,
    "genotype"
);
record_key!(
    /// Key of a precomputed cluster of equivalent genotypes
    GenotypeClusterKey,
    "genotype-cluster"
);
record_key!(
    /// Key of a precomputed cluster of cross-organism homologous markers
    /// (a "grid cluster")
    HomologyClusterKey,
    "homology-cluster"
);
record_key!(
    /// Synthetic key of a [`crate::BasicSearchUnit`]
    BsuKey,
    "bsu"
);
record_key!(
    /// Key of a single raw annotation row
    AnnotationKey,
    "annotation"
);
