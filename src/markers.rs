//! Markers, their cross-organism orthologs and genomic coordinates
//!
//! The [`OrthologyCache`] is a plain lookup structure. It is filled once
//! before the grouped pass and only read afterwards.
use std::collections::HashMap;
use std::fmt::Display;

use serde::Serialize;
use smallvec::SmallVec;

use crate::keys::{HomologyClusterKey, MarkerKey};

/// The organism a marker or a BSU belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Organism {
    Human,
    Mouse,
}

impl Display for Organism {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Organism::Human => write!(f, "human"),
            Organism::Mouse => write!(f, "mouse"),
        }
    }
}

/// A genomic location of a marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Coordinate {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    pub strand: Option<char>,
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Chr{}:{}-{}", self.chromosome, self.start, self.end)?;
        if let Some(strand) = self.strand {
            write!(f, " ({strand})")?;
        }
        Ok(())
    }
}

/// A single marker (gene), mouse or human
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    key: MarkerKey,
    symbol: String,
    primary_id: String,
    organism: Organism,
    coordinate: Option<Coordinate>,
}

impl Marker {
    pub fn new(key: MarkerKey, symbol: &str, primary_id: &str, organism: Organism) -> Marker {
        Marker {
            key,
            symbol: symbol.to_string(),
            primary_id: primary_id.to_string(),
            organism,
            coordinate: None,
        }
    }

    pub fn key(&self) -> &MarkerKey {
        &self.key
    }

    /// The marker symbol, e.g. `Pax6`
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The primary accession, e.g. `MGI:97490` or an NCBI gene id
    pub fn primary_id(&self) -> &str {
        &self.primary_id
    }

    pub fn organism(&self) -> Organism {
        self.organism
    }

    pub fn coordinate(&self) -> Option<&Coordinate> {
        self.coordinate.as_ref()
    }
}

type Orthologs = SmallVec<[MarkerKey; 4]>;

/// Markers, ortholog pairs, homology clusters and coordinates
///
/// # Examples
///
/// ```
/// use bsu_index::markers::{Marker, Organism, OrthologyCache};
/// use bsu_index::MarkerKey;
///
/// let mut cache = OrthologyCache::default();
/// cache.add_marker(Marker::new(1u32.into(), "Pax6", "MGI:97490", Organism::Mouse));
/// cache.add_marker(Marker::new(2u32.into(), "PAX6", "5080", Organism::Human));
/// cache.add_ortholog(1u32.into(), 2u32.into());
/// cache.add_to_homology_cluster(1u32.into(), 10u32.into());
/// cache.add_to_homology_cluster(2u32.into(), 10u32.into());
///
/// assert_eq!(cache.orthologs(1u32.into()), [MarkerKey::from(2u32)]);
/// assert_eq!(cache.cluster_members(10u32.into()).len(), 2);
/// assert_eq!(cache.marker(2u32.into()).unwrap().symbol(), "PAX6");
/// ```
#[derive(Debug, Default)]
pub struct OrthologyCache {
    markers: HashMap<MarkerKey, Marker>,
    orthologs: HashMap<MarkerKey, Orthologs>,
    marker_cluster: HashMap<MarkerKey, HomologyClusterKey>,
    cluster_members: HashMap<HomologyClusterKey, Vec<MarkerKey>>,
}

impl OrthologyCache {
    /// Inserts a marker, replacing a previous one with the same key
    pub fn add_marker(&mut self, marker: Marker) {
        self.markers.insert(marker.key, marker);
    }

    /// Sets the genomic coordinate of a marker
    ///
    /// Returns `false` if the marker is unknown.
    pub fn set_coordinate(&mut self, key: MarkerKey, coordinate: Coordinate) -> bool {
        match self.markers.get_mut(&key) {
            Some(marker) => {
                marker.coordinate = Some(coordinate);
                true
            }
            None => false,
        }
    }

    /// Records an ortholog pair. The relation is symmetric.
    pub fn add_ortholog(&mut self, a: MarkerKey, b: MarkerKey) {
        if a == b {
            return;
        }
        for (from, to) in [(a, b), (b, a)] {
            let entry = self.orthologs.entry(from).or_default();
            if !entry.contains(&to) {
                entry.push(to);
            }
        }
    }

    /// Adds a marker to a homology cluster
    ///
    /// A marker belongs to at most one cluster, a later call moves it.
    pub fn add_to_homology_cluster(&mut self, marker: MarkerKey, cluster: HomologyClusterKey) {
        if let Some(previous) = self.marker_cluster.insert(marker, cluster) {
            if let Some(members) = self.cluster_members.get_mut(&previous) {
                members.retain(|m| *m != marker);
            }
        }
        let members = self.cluster_members.entry(cluster).or_default();
        if !members.contains(&marker) {
            members.push(marker);
        }
    }

    pub fn marker(&self, key: MarkerKey) -> Option<&Marker> {
        self.markers.get(&key)
    }

    pub fn coordinate(&self, key: MarkerKey) -> Option<&Coordinate> {
        self.markers.get(&key).and_then(Marker::coordinate)
    }

    /// Returns the orthologs of a marker in insertion order
    pub fn orthologs(&self, key: MarkerKey) -> &[MarkerKey] {
        self.orthologs.get(&key).map_or(&[][..], |o| o.as_slice())
    }

    pub fn homology_cluster(&self, key: MarkerKey) -> Option<HomologyClusterKey> {
        self.marker_cluster.get(&key).copied()
    }

    /// Returns all markers of a homology cluster, both organisms
    pub fn cluster_members(&self, cluster: HomologyClusterKey) -> &[MarkerKey] {
        self.cluster_members
            .get(&cluster)
            .map_or(&[][..], Vec::as_slice)
    }

    /// Returns the markers of one organism inside a homology cluster
    pub fn cluster_markers(
        &self,
        cluster: HomologyClusterKey,
        organism: Organism,
    ) -> impl Iterator<Item = &Marker> {
        self.cluster_members(cluster)
            .iter()
            .filter_map(|key| self.markers.get(key))
            .filter(move |marker| marker.organism == organism)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
