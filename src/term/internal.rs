use crate::term::{TermGroup, TermKey, Vocabulary};
use crate::{DEFAULT_NUM_PARENTS, DEFAULT_NUM_SYNONYMS};

/// The owned data of a single term, stored inside the ontology arena
///
/// Public access goes through [`crate::Term`], which borrows from here.
#[derive(Debug, Clone)]
pub(crate) struct TermInternal {
    key: TermKey,
    primary_id: String,
    label: String,
    vocabulary: Vocabulary,
    parents: TermGroup,
    ancestors: TermGroup,
    alternate_ids: Vec<String>,
    synonyms: Vec<String>,
    obsolete: bool,
}

impl TermInternal {
    pub fn new(
        key: TermKey,
        primary_id: &str,
        label: &str,
        vocabulary: Vocabulary,
    ) -> TermInternal {
        TermInternal {
            key,
            primary_id: primary_id.to_string(),
            label: label.to_string(),
            vocabulary,
            parents: TermGroup::with_capacity(DEFAULT_NUM_PARENTS),
            ancestors: TermGroup::new(),
            alternate_ids: Vec::new(),
            synonyms: Vec::with_capacity(DEFAULT_NUM_SYNONYMS),
            obsolete: false,
        }
    }

    pub fn key(&self) -> &TermKey {
        &self.key
    }

    pub fn primary_id(&self) -> &str {
        &self.primary_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn parents(&self) -> &TermGroup {
        &self.parents
    }

    pub fn ancestors(&self) -> &TermGroup {
        &self.ancestors
    }

    pub fn ancestors_mut(&mut self) -> &mut TermGroup {
        &mut self.ancestors
    }

    pub fn alternate_ids(&self) -> &[String] {
        &self.alternate_ids
    }

    pub fn synonyms(&self) -> &[String] {
        &self.synonyms
    }

    pub fn add_parent<I: Into<TermKey>>(&mut self, parent: I) -> bool {
        self.parents.insert(parent)
    }

    /// Adds an alternate id, ignoring duplicates and the primary id itself
    pub fn add_alternate_id(&mut self, id: &str) -> bool {
        if id == self.primary_id || self.alternate_ids.iter().any(|alt| alt == id) {
            return false;
        }
        self.alternate_ids.push(id.to_string());
        true
    }

    /// Adds a synonym, ignoring exact duplicates
    pub fn add_synonym(&mut self, synonym: &str) -> bool {
        if self.synonyms.iter().any(|syn| syn == synonym) {
            return false;
        }
        self.synonyms.push(synonym.to_string());
        true
    }

    pub fn obsolete(&self) -> bool {
        self.obsolete
    }

    pub fn obsolete_mut(&mut self) -> &mut bool {
        &mut self.obsolete
    }
}

impl PartialEq for TermInternal {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for TermInternal {}
