//! Precomputed genotype clusters
use std::collections::HashMap;

use crate::keys::{GenotypeClusterKey, GenotypeKey};

/// Lookup between genotypes and the cluster of equivalent genotypes
/// they belong to
///
/// Clusters are computed outside of this crate, every genotype belongs
/// to at most one cluster.
#[derive(Debug, Default, Clone)]
pub struct GenotypeClusters {
    by_genotype: HashMap<GenotypeKey, GenotypeClusterKey>,
    members: HashMap<GenotypeClusterKey, Vec<GenotypeKey>>,
}

impl GenotypeClusters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a genotype to a cluster
    ///
    /// Returns `false` if the genotype was already part of a cluster, in
    /// which case the first assignment is kept.
    pub fn insert(&mut self, genotype: GenotypeKey, cluster: GenotypeClusterKey) -> bool {
        if self.by_genotype.contains_key(&genotype) {
            return false;
        }
        self.by_genotype.insert(genotype, cluster);
        self.members.entry(cluster).or_default().push(genotype);
        true
    }

    /// Returns the cluster of a genotype
    pub fn cluster_of(&self, genotype: GenotypeKey) -> Option<GenotypeClusterKey> {
        self.by_genotype.get(&genotype).copied()
    }

    /// Returns all genotypes of a cluster
    pub fn members(&self, cluster: GenotypeClusterKey) -> &[GenotypeKey] {
        self.members.get(&cluster).map_or(&[][..], Vec::as_slice)
    }

    /// Number of clusters
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl FromIterator<(GenotypeKey, GenotypeClusterKey)> for GenotypeClusters {
    fn from_iter<T: IntoIterator<Item = (GenotypeKey, GenotypeClusterKey)>>(iter: T) -> Self {
        let mut clusters = GenotypeClusters::new();
        for (genotype, cluster) in iter {
            clusters.insert(genotype, cluster);
        }
        clusters
    }
}
