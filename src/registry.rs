//! Basic Search Units and their synthetic keys
//!
//! A Basic Search Unit (BSU) is one row of the output grid. Human data is
//! grouped by (marker, disease term), mouse data by (genotype cluster,
//! homology cluster). Every distinct grouping gets exactly one synthetic
//! [`BsuKey`] during warm-up.
use std::collections::HashMap;
use std::fmt::Display;

use serde::Serialize;
use tracing::{debug, info};

use crate::keys::{BsuKey, GenotypeClusterKey, HomologyClusterKey, MarkerKey, RecordKey};
use crate::markers::Organism;
use crate::term::TermKey;
use crate::IndexResult;

/// The grouping values of an annotation row
///
/// Mouse rows may lack a homology cluster. Such rows have no place in the
/// grid and never resolve to a BSU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    Human {
        marker: MarkerKey,
        disease: TermKey,
    },
    Mouse {
        genotype_cluster: GenotypeClusterKey,
        homology_cluster: Option<HomologyClusterKey>,
    },
}

impl Grouping {
    pub fn organism(&self) -> Organism {
        match self {
            Grouping::Human { .. } => Organism::Human,
            Grouping::Mouse { .. } => Organism::Mouse,
        }
    }
}

impl Display for Grouping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grouping::Human { marker, disease } => write!(f, "({marker}, {disease})"),
            Grouping::Mouse {
                genotype_cluster,
                homology_cluster: Some(hc),
            } => write!(f, "({genotype_cluster}, {hc})"),
            Grouping::Mouse {
                genotype_cluster,
                homology_cluster: None,
            } => write!(f, "({genotype_cluster}, -)"),
        }
    }
}

/// One registered Basic Search Unit
///
/// Created during warm-up and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BasicSearchUnit {
    key: BsuKey,
    grouping: Grouping,
}

impl BasicSearchUnit {
    pub fn key(&self) -> BsuKey {
        self.key
    }

    pub fn organism(&self) -> Organism {
        self.grouping.organism()
    }

    pub fn grouping(&self) -> &Grouping {
        &self.grouping
    }

    /// The marker of a human BSU
    pub fn marker(&self) -> Option<MarkerKey> {
        match self.grouping {
            Grouping::Human { marker, .. } => Some(marker),
            Grouping::Mouse { .. } => None,
        }
    }

    /// The disease term of a human BSU
    pub fn disease(&self) -> Option<TermKey> {
        match self.grouping {
            Grouping::Human { disease, .. } => Some(disease),
            Grouping::Mouse { .. } => None,
        }
    }

    /// The genotype cluster of a mouse BSU
    pub fn genotype_cluster(&self) -> Option<GenotypeClusterKey> {
        match self.grouping {
            Grouping::Mouse {
                genotype_cluster, ..
            } => Some(genotype_cluster),
            Grouping::Human { .. } => None,
        }
    }

    /// The homology cluster of a mouse BSU
    pub fn homology_cluster(&self) -> Option<HomologyClusterKey> {
        match self.grouping {
            Grouping::Mouse {
                homology_cluster, ..
            } => homology_cluster,
            Grouping::Human { .. } => None,
        }
    }
}

/// Counters collected during warm-up
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    pub human_units: usize,
    pub mouse_units: usize,
    /// Pairs that were seen more than once and kept their first key
    pub repeated_pairs: usize,
    /// Mouse pairs without a homology cluster; they are not registered
    pub mouse_without_homology: usize,
}

/// Collects the pair scans and hands out the warmed [`BsuRegistry`]
///
/// The builder has no lookup methods, so a lookup before warm-up cannot
/// be written.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    capacity: usize,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocates room for `capacity` units
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Registers all distinct pairs and returns the immutable registry
    ///
    /// Human pairs are numbered first, then mouse pairs, each in the order
    /// encountered, starting at 1. With stable input ordering the numbering
    /// is stable across runs.
    ///
    /// # Examples
    ///
    /// ```
    /// use bsu_index::RegistryBuilder;
    /// use bsu_index::{BsuKey, GenotypeClusterKey, HomologyClusterKey, MarkerKey, TermKey};
    ///
    /// let human = vec![(MarkerKey::from(1u32), TermKey::from(10u32))];
    /// let mouse = vec![
    ///     (GenotypeClusterKey::from(5u32), Some(HomologyClusterKey::from(7u32))),
    ///     (GenotypeClusterKey::from(6u32), None),
    /// ];
    /// let registry = RegistryBuilder::new().warm_up(human, mouse);
    ///
    /// assert_eq!(registry.len(), 2);
    /// let bsu = registry.resolve_mouse(5u32.into(), 7u32.into()).unwrap();
    /// assert_eq!(bsu.key(), BsuKey::from(2u32));
    /// assert_eq!(registry.stats().mouse_without_homology, 1);
    /// ```
    pub fn warm_up<H, M>(self, human: H, mouse: M) -> BsuRegistry
    where
        H: IntoIterator<Item = (MarkerKey, TermKey)>,
        M: IntoIterator<Item = (GenotypeClusterKey, Option<HomologyClusterKey>)>,
    {
        let mut registry = BsuRegistry::with_capacity(self.capacity);
        for (marker, disease) in human {
            registry.register_human(marker, disease);
        }
        for (genotype_cluster, homology_cluster) in mouse {
            registry.register_mouse(genotype_cluster, homology_cluster);
        }
        registry.log_summary();
        registry
    }

    /// Same as [`RegistryBuilder::warm_up`] for scans that can fail
    ///
    /// # Errors
    ///
    /// The first error of either scan aborts the warm-up, no registry is
    /// returned.
    pub fn try_warm_up<H, M>(self, human: H, mouse: M) -> IndexResult<BsuRegistry>
    where
        H: IntoIterator<Item = IndexResult<(MarkerKey, TermKey)>>,
        M: IntoIterator<Item = IndexResult<(GenotypeClusterKey, Option<HomologyClusterKey>)>>,
    {
        let mut registry = BsuRegistry::with_capacity(self.capacity);
        for pair in human {
            let (marker, disease) = pair?;
            registry.register_human(marker, disease);
        }
        for pair in mouse {
            let (genotype_cluster, homology_cluster) = pair?;
            registry.register_mouse(genotype_cluster, homology_cluster);
        }
        registry.log_summary();
        Ok(registry)
    }
}

/// Synthetic keys of all Basic Search Units of a run
///
/// Lookups work in both directions: from the grouping values to the unit
/// ([`BsuRegistry::resolve_human`], [`BsuRegistry::resolve_mouse`]) and from
/// the synthetic key back to the unit ([`BsuRegistry::get`]).
#[derive(Debug, Default)]
pub struct BsuRegistry {
    units: Vec<BasicSearchUnit>,
    human: HashMap<(MarkerKey, TermKey), BsuKey>,
    mouse: HashMap<(GenotypeClusterKey, HomologyClusterKey), BsuKey>,
    stats: RegistryStats,
}

impl BsuRegistry {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            units: Vec::with_capacity(capacity),
            ..Default::default()
        }
    }

    fn next_key(&self) -> BsuKey {
        // units are numbered from 1, the index in `units` is key - 1
        let next = u32::try_from(self.units.len() + 1).unwrap_or(u32::MAX);
        BsuKey::from(next)
    }

    fn register_human(&mut self, marker: MarkerKey, disease: TermKey) {
        if self.human.contains_key(&(marker, disease)) {
            self.stats.repeated_pairs += 1;
            return;
        }
        let key = self.next_key();
        self.human.insert((marker, disease), key);
        self.units.push(BasicSearchUnit {
            key,
            grouping: Grouping::Human { marker, disease },
        });
        self.stats.human_units += 1;
    }

    fn register_mouse(
        &mut self,
        genotype_cluster: GenotypeClusterKey,
        homology_cluster: Option<HomologyClusterKey>,
    ) {
        let Some(homology_cluster) = homology_cluster else {
            // no homology cluster means no grid row to render into
            debug!("Not registering {} without homology cluster", genotype_cluster);
            self.stats.mouse_without_homology += 1;
            return;
        };
        if self.mouse.contains_key(&(genotype_cluster, homology_cluster)) {
            self.stats.repeated_pairs += 1;
            return;
        }
        let key = self.next_key();
        self.mouse.insert((genotype_cluster, homology_cluster), key);
        self.units.push(BasicSearchUnit {
            key,
            grouping: Grouping::Mouse {
                genotype_cluster,
                homology_cluster: Some(homology_cluster),
            },
        });
        self.stats.mouse_units += 1;
    }

    fn log_summary(&self) {
        info!(
            "BSU registry ready: {} human, {} mouse, {} mouse pairs without homology cluster",
            self.stats.human_units, self.stats.mouse_units, self.stats.mouse_without_homology
        );
    }

    /// Returns the BSU of a human (marker, disease) pair
    pub fn resolve_human(&self, marker: MarkerKey, disease: TermKey) -> Option<&BasicSearchUnit> {
        self.human
            .get(&(marker, disease))
            .and_then(|key| self.get(*key))
    }

    /// Returns the BSU of a mouse (genotype cluster, homology cluster) pair
    pub fn resolve_mouse(
        &self,
        genotype_cluster: GenotypeClusterKey,
        homology_cluster: HomologyClusterKey,
    ) -> Option<&BasicSearchUnit> {
        self.mouse
            .get(&(genotype_cluster, homology_cluster))
            .and_then(|key| self.get(*key))
    }

    /// Returns the BSU of a row's grouping values
    ///
    /// Mouse groupings without a homology cluster never resolve.
    pub fn resolve(&self, grouping: &Grouping) -> Option<&BasicSearchUnit> {
        match *grouping {
            Grouping::Human { marker, disease } => self.resolve_human(marker, disease),
            Grouping::Mouse {
                genotype_cluster,
                homology_cluster,
            } => homology_cluster.and_then(|hc| self.resolve_mouse(genotype_cluster, hc)),
        }
    }

    /// Returns the BSU with the given synthetic key
    pub fn get(&self, key: BsuKey) -> Option<&BasicSearchUnit> {
        let idx = usize::try_from(key.as_u32()).ok()?.checked_sub(1)?;
        self.units.get(idx)
    }

    /// Iterates all units in key order
    pub fn iter(&self) -> std::slice::Iter<'_, BasicSearchUnit> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn stats(&self) -> &RegistryStats {
        &self.stats
    }
}
