use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{trace, warn};

use crate::ontology::{OntologySource, TermRecord};
use crate::term::{TermKey, Vocabulary};
use crate::{IndexError, IndexResult};

/// Terms and edges parsed from an OBO file
///
/// OBO files carry no integer keys, so every `[Term]` stanza gets the next
/// [`TermKey`] in file order, starting at 1. `is_a` lines are resolved
/// against the primary ids of all stanzas once the whole file is read.
/// `is_a` targets that are not defined in the file are dropped.
#[derive(Debug, Default)]
pub struct OboSource {
    terms: Vec<TermRecord>,
    edges: Vec<(TermKey, TermKey)>,
}

impl OboSource {
    /// Reads and parses an OBO file
    ///
    /// # Errors
    ///
    /// - [`IndexError::CannotOpenFile`] if the file is not readable
    /// - [`IndexError::InvalidInput`] if a stanza lacks an `id`
    pub fn from_file<P: AsRef<Path>>(path: P) -> IndexResult<Self> {
        let filename = path.as_ref().display().to_string();
        let content = fs::read_to_string(path).map_err(|_| IndexError::CannotOpenFile(filename))?;
        Self::parse(&content)
    }

    /// Parses the content of an OBO file
    ///
    /// # Errors
    ///
    /// [`IndexError::InvalidInput`] if a `[Term]` stanza lacks an `id`
    pub fn parse(content: &str) -> IndexResult<Self> {
        let content = content.replace("\r\n", "\n");
        let stanzas = content.split("\n\n");

        // the header is optional, a file may start with the first stanza
        let default_vocabulary = content
            .split("\n\n")
            .next()
            .filter(|header| !header.trim_start().starts_with('['))
            .and_then(default_namespace)
            .map(Vocabulary::from);

        let mut terms = Vec::new();
        // stores tuples of child key and parent primary id
        let mut connections: Vec<(TermKey, String)> = Vec::new();

        for stanza in stanzas {
            let stanza = stanza.trim_start_matches('\n');
            if let Some(body) = stanza.strip_prefix("[Term]\n") {
                let key = TermKey::from(u32::try_from(terms.len() + 1).map_err(|_| {
                    IndexError::InvalidInput("too many terms in OBO file".to_string())
                })?);
                let term = term_from_stanza(key, body, default_vocabulary.as_ref())?;
                add_connections(&mut connections, body, key);
                terms.push(term);
            } else {
                trace!("Ignoring: {}", stanza.lines().next().unwrap_or_default());
            }
        }

        let keys: HashMap<&str, TermKey> = terms
            .iter()
            .map(|term| (term.primary_id.as_str(), term.key))
            .collect();

        let mut edges = Vec::with_capacity(connections.len());
        for (child, parent_id) in &connections {
            match keys.get(parent_id.as_str()) {
                Some(parent) => edges.push((*parent, *child)),
                None => warn!("Unknown is_a target {}", parent_id),
            }
        }

        Ok(OboSource { terms, edges })
    }

    /// Returns the key assigned to a primary id
    pub fn key_of(&self, primary_id: &str) -> Option<TermKey> {
        self.terms
            .iter()
            .find(|term| term.primary_id == primary_id)
            .map(|term| term.key)
    }
}

impl OntologySource for OboSource {
    fn terms(&self) -> IndexResult<Vec<TermRecord>> {
        Ok(self.terms.clone())
    }

    fn edges(&self) -> IndexResult<Vec<(TermKey, TermKey)>> {
        Ok(self.edges.clone())
    }
}

fn default_namespace(header: &str) -> Option<&str> {
    header
        .lines()
        .find_map(|line| line.strip_prefix("default-namespace: "))
}

fn term_from_stanza(
    key: TermKey,
    stanza: &str,
    default_vocabulary: Option<&Vocabulary>,
) -> IndexResult<TermRecord> {
    let mut id: Option<&str> = None;
    let mut name: Option<&str> = None;
    let mut namespace: Option<&str> = None;
    let mut synonyms = Vec::new();
    let mut alternate_ids = Vec::new();
    let mut obsolete = false;

    for line in stanza.lines() {
        match parse_line(line) {
            Some(("id", value)) => id = Some(value),
            Some(("name", value)) => name = Some(value),
            Some(("namespace", value)) => namespace = Some(value),
            Some(("alt_id", value)) => alternate_ids.push(value.to_string()),
            Some(("synonym", value)) => {
                if let Some(synonym) = quoted(value) {
                    synonyms.push(synonym.to_string());
                }
            }
            Some(("is_obsolete", value)) => obsolete = value == "true",
            _ => (),
        }
    }

    let Some(id) = id else {
        return Err(IndexError::InvalidInput(format!(
            "OBO stanza without id: {}",
            stanza.lines().next().unwrap_or_default()
        )));
    };

    let vocabulary = match (namespace, default_vocabulary) {
        (Some(ns), _) => Vocabulary::from(ns),
        (None, Some(default)) => default.clone(),
        (None, None) => Vocabulary::from_primary_id(id),
    };

    let mut record = TermRecord::new(key, id, name.unwrap_or_default(), vocabulary);
    record.synonyms = synonyms;
    record.alternate_ids = alternate_ids;
    record.obsolete = obsolete;
    Ok(record)
}

fn add_connections(connections: &mut Vec<(TermKey, String)>, stanza: &str, key: TermKey) {
    for line in stanza.lines() {
        if let Some(value) = line.strip_prefix("is_a: ") {
            let parent = value.split_once(' ').map_or(value, |(id, _)| id);
            connections.push((key, parent.trim().to_string()));
        }
    }
}

fn parse_line(line: &str) -> Option<(&str, &str)> {
    line.split_once(": ").map(|(tag, value)| (tag, value.trim()))
}

/// Returns the text between the first pair of double quotes
fn quoted(value: &str) -> Option<&str> {
    let rest = value.strip_prefix('"')?;
    let end = rest.find('"')?;
    Some(&rest[..end])
}
