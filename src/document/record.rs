//! The aggregated search document of one BSU
use std::collections::BTreeSet;

use serde::Serialize;

use crate::keys::{BsuKey, GenotypeClusterKey, HomologyClusterKey, MarkerKey};
use crate::markers::{Coordinate, Organism};
use crate::term::TermKey;

/// An ordered set of strings
///
/// Equality is exact and case sensitive. Inserting a value that is already
/// present does nothing.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TextSet {
    values: BTreeSet<String>,
}

impl TextSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, returns `false` if it was present already
    pub fn insert(&mut self, value: &str) -> bool {
        if self.values.contains(value) {
            return false;
        }
        self.values.insert(value.to_string())
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates the values in lexical order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }
}

impl<'a> Extend<&'a str> for TextSet {
    fn extend<T: IntoIterator<Item = &'a str>>(&mut self, iter: T) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl Extend<String> for TextSet {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        self.values.extend(iter);
    }
}

impl<'a> FromIterator<&'a str> for TextSet {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut set = TextSet::new();
        set.extend(iter);
        set
    }
}

/// Searchable text of a group of annotated terms
///
/// Direct annotations land in `terms`, `ids` and `synonyms`. Terms of
/// rolled-up vocabularies add their ancestors to the `ancestor_*` fields.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct TermBucket {
    pub terms: TextSet,
    pub ids: TextSet,
    pub synonyms: TextSet,
    pub ancestor_terms: TextSet,
    pub ancestor_ids: TextSet,
    pub ancestor_synonyms: TextSet,
}

impl TermBucket {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
            && self.ids.is_empty()
            && self.synonyms.is_empty()
            && self.ancestor_terms.is_empty()
            && self.ancestor_ids.is_empty()
            && self.ancestor_synonyms.is_empty()
    }
}

/// The search document of one Basic Search Unit
///
/// Scalar fields follow "first write wins", set fields are unions of all
/// contributing rows. `excluded` holds the terms of negated annotations
/// and is never merged with `annotated`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    pub bsu: BsuKey,
    pub organism: Organism,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<MarkerKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disease: Option<TermKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genotype_cluster: Option<GenotypeClusterKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homology_cluster: Option<HomologyClusterKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<Coordinate>,
    pub annotated: TermBucket,
    pub excluded: TermBucket,
    pub qualifiers: TextSet,
    pub references: TextSet,
    pub related: TextSet,
    pub ortholog_symbols: TextSet,
}

impl OutputRecord {
    /// An empty record without any contribution
    pub fn new(bsu: BsuKey, organism: Organism) -> Self {
        Self {
            bsu,
            organism,
            marker: None,
            marker_symbol: None,
            marker_id: None,
            disease: None,
            genotype_cluster: None,
            homology_cluster: None,
            coordinate: None,
            annotated: TermBucket::default(),
            excluded: TermBucket::default(),
            qualifiers: TextSet::new(),
            references: TextSet::new(),
            related: TextSet::new(),
            ortholog_symbols: TextSet::new(),
        }
    }
}

/// Sets a scalar field unless it already holds a value
pub(crate) fn first_write<T>(slot: &mut Option<T>, value: T) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn text_set_dedup() {
        let mut set = TextSet::new();
        for _ in 0..5 {
            set.insert("Pax6");
        }
        assert!(!set.insert("Pax6"));
        assert!(set.insert("pax6"));
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), ["Pax6", "pax6"]);
    }

    #[test]
    fn text_set_serializes_as_list() {
        let set: TextSet = ["b", "a", "b"].into_iter().collect();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["a","b"]"#);
    }

    #[test]
    fn first_write_wins() {
        let mut slot = None;
        first_write(&mut slot, "Kit");
        first_write(&mut slot, "Pax6");
        assert_eq!(slot, Some("Kit"));
    }

    #[test]
    fn empty_scalars_are_not_serialized() {
        let record = OutputRecord::new(3u32.into(), Organism::Mouse);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["bsu"], 3);
        assert_eq!(json["organism"], "mouse");
        assert!(json.get("marker_symbol").is_none());
        assert!(json["annotated"]["terms"].as_array().unwrap().is_empty());
    }
}
