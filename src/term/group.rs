use std::cmp::Ordering;

use smallvec::SmallVec;

use crate::term::TermKey;

/// A set of [`TermKey`]s representing a group of terms
///
/// Each term can occur only once in the group. The keys are kept sorted,
/// so iteration order is deterministic.
///
/// This group is used e.g. for direct parents and the cached ancestor set
/// of a term.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TermGroup {
    ids: SmallVec<[TermKey; 30]>,
}

impl TermGroup {
    /// Constructs a new, empty [`TermGroup`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a new, empty [`TermGroup`] with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: SmallVec::with_capacity(capacity),
        }
    }

    /// Returns `true` if the group contains no [`TermKey`]s
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the number of [`TermKey`]s in the group
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Adds a new [`TermKey`] to the group
    ///
    /// Returns whether the `TermKey` was newly inserted. That is:
    ///
    /// - If the group did not previously contain this `TermKey`, true is returned.
    /// - If the group already contained this `TermKey`, false is returned.
    pub fn insert<I: Into<TermKey>>(&mut self, id: I) -> bool {
        let id = id.into();
        match self.ids.binary_search(&id) {
            Ok(_) => false,
            Err(idx) => {
                self.ids.insert(idx, id);
                true
            }
        }
    }

    /// Removes a [`TermKey`] from the group, returns whether it was present
    pub fn remove(&mut self, id: &TermKey) -> bool {
        match self.ids.binary_search(id) {
            Ok(idx) => {
                self.ids.remove(idx);
                true
            }
            Err(_) => false,
        }
    }

    /// Returns `true` if the group contains the [`TermKey`]
    pub fn contains(&self, id: &TermKey) -> bool {
        self.ids.binary_search(id).is_ok()
    }

    /// Returns an Iterator of the [`TermKey`]s inside the group
    pub fn iter(&self) -> TermKeys<'_> {
        TermKeys::new(self.ids.iter())
    }

    /// Adds all keys of `other` to the group
    pub fn extend_from(&mut self, other: &TermGroup) {
        if other.is_empty() {
            return;
        }
        let mut merged: SmallVec<[TermKey; 30]> =
            SmallVec::with_capacity(self.len() + other.len());
        let (mut i, mut j) = (0, 0);

        // both sides are sorted, so a single merge keeps the result sorted
        while i < self.ids.len() && j < other.ids.len() {
            let (l, r) = (self.ids[i], other.ids[j]);
            match l.cmp(&r) {
                Ordering::Less => {
                    merged.push(l);
                    i += 1;
                }
                Ordering::Greater => {
                    merged.push(r);
                    j += 1;
                }
                Ordering::Equal => {
                    merged.push(l);
                    i += 1;
                    j += 1;
                }
            }
        }
        merged.extend_from_slice(&self.ids[i..]);
        merged.extend_from_slice(&other.ids[j..]);
        self.ids = merged;
    }
}

impl FromIterator<TermKey> for TermGroup {
    fn from_iter<T: IntoIterator<Item = TermKey>>(iter: T) -> Self {
        let mut group = TermGroup::new();
        for id in iter {
            group.insert(id);
        }
        group
    }
}

impl From<Vec<u32>> for TermGroup {
    fn from(ids: Vec<u32>) -> Self {
        ids.into_iter().map(TermKey::from).collect()
    }
}

impl<'a> IntoIterator for &'a TermGroup {
    type Item = TermKey;

    type IntoIter = TermKeys<'a>;

    fn into_iter(self) -> TermKeys<'a> {
        TermKeys::new(self.ids.iter())
    }
}

/// An iterator over [`TermKey`]s
pub struct TermKeys<'a> {
    inner: std::slice::Iter<'a, TermKey>,
}

impl<'a> TermKeys<'a> {
    fn new(inner: std::slice::Iter<'a, TermKey>) -> Self {
        Self { inner }
    }
}

impl<'a> Iterator for TermKeys<'a> {
    type Item = TermKey;
    fn next(&mut self) -> Option<TermKey> {
        self.inner.next().copied()
    }
}
