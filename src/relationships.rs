//! Annotations that share a grouping context
//!
//! A mouse genotype can be annotated to phenotypes and to diseases at the
//! same time. The [`RelationshipIndex`] links those annotations so a
//! disease document can also surface the phenotypes observed in the same
//! genotype cluster, and vice versa.
use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::annotation::{Annotation, Subject};
use crate::clusters::GenotypeClusters;
use crate::keys::{AnnotationKey, GenotypeClusterKey, GenotypeKey, MarkerKey};
use crate::ontology::OntologyCache;
use crate::term::{Term, TermKey};

/// The context two annotations must share to be related
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    GenotypeCluster(GenotypeClusterKey),
    /// A genotype that is not part of any cluster
    Genotype(GenotypeKey),
    Marker(MarkerKey),
}

/// Which related values [`RelationshipIndex::related_terms`] should return
///
/// `diseases` and `phenotypes` select related annotations by the vocabulary
/// of their term, `terms` and `ids` select whether labels, ids or both are
/// returned.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RelatedTerms {
    pub terms: bool,
    pub ids: bool,
    pub diseases: bool,
    pub phenotypes: bool,
}

impl RelatedTerms {
    /// Labels and ids of every related disease and phenotype
    pub fn all() -> Self {
        Self {
            terms: true,
            ids: true,
            diseases: true,
            phenotypes: true,
        }
    }

    fn accepts(&self, term: &Term) -> bool {
        let vocabulary = term.vocabulary();
        (self.diseases && vocabulary.is_disease())
            || (self.phenotypes && vocabulary.is_phenotype())
    }
}

#[derive(Debug, Clone, Copy)]
struct Member {
    key: AnnotationKey,
    term: TermKey,
}

#[derive(Debug, Clone, Copy)]
enum Coverage {
    /// Every member except this annotation was expanded
    AllBut(AnnotationKey),
    Complete,
}

/// Contexts whose related terms already went into one record
///
/// Used with [`RelationshipIndex::uncovered_related_terms`]. Clear it
/// whenever a new record is opened.
#[derive(Debug, Default)]
pub struct RelatedCoverage {
    contexts: HashMap<Context, Coverage>,
}

impl RelatedCoverage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.contexts.clear();
    }
}

/// Annotations grouped by the [`Context`] they were made in
///
/// Negated annotations are indexed with their context but never reported
/// as related to anything, a `NOT` fact must not enrich other documents.
#[derive(Debug, Default)]
pub struct RelationshipIndex {
    context_of: HashMap<AnnotationKey, Context>,
    members: HashMap<Context, Vec<Member>>,
}

impl RelationshipIndex {
    /// Builds the index from the complete annotation set
    ///
    /// Genotype annotations are grouped by the genotype cluster of the
    /// genotype, marker annotations by the marker.
    pub fn build<'a, I>(annotations: I, clusters: &GenotypeClusters) -> Self
    where
        I: IntoIterator<Item = &'a Annotation>,
    {
        let mut index = RelationshipIndex::default();
        for annotation in annotations {
            let context = match annotation.subject {
                Subject::Genotype(genotype) => clusters
                    .cluster_of(genotype)
                    .map_or(Context::Genotype(genotype), Context::GenotypeCluster),
                Subject::Marker(marker) => Context::Marker(marker),
            };
            index.context_of.insert(annotation.key, context);
            if !annotation.is_negated() {
                index.members.entry(context).or_default().push(Member {
                    key: annotation.key,
                    term: annotation.term,
                });
            }
        }
        debug!(
            "Relationship index: {} annotations in {} contexts",
            index.context_of.len(),
            index.members.len()
        );
        index
    }

    /// Returns the context of an annotation
    pub fn context(&self, key: AnnotationKey) -> Option<Context> {
        self.context_of.get(&key).copied()
    }

    /// Returns the keys of all other annotations that share the context of `key`
    pub fn related_annotations(
        &self,
        key: AnnotationKey,
    ) -> impl Iterator<Item = AnnotationKey> + '_ {
        self.others(key).map(|member| member.key)
    }

    fn members_of(&self, context: &Context) -> &[Member] {
        self.members.get(context).map_or(&[][..], Vec::as_slice)
    }

    fn others(&self, key: AnnotationKey) -> impl Iterator<Item = &Member> + '_ {
        self.context_of
            .get(&key)
            .map_or(&[][..], |context| self.members_of(context))
            .iter()
            .filter(move |member| member.key != key)
    }

    /// Returns labels and/or ids of the terms of all related annotations
    ///
    /// Related annotations are filtered by vocabulary, and the ancestors of
    /// each selected term contribute as well. The result is empty when the
    /// annotation has no relationships or `want` selects nothing.
    pub fn related_terms(
        &self,
        key: AnnotationKey,
        want: RelatedTerms,
        ontology: &OntologyCache,
    ) -> BTreeSet<String> {
        let mut result = BTreeSet::new();
        if !(want.terms || want.ids) {
            return result;
        }
        for member in self.others(key) {
            expand(member, want, ontology, &mut result);
        }
        result
    }

    /// Like [`RelationshipIndex::related_terms`], but skips members that
    /// `coverage` already expanded into the open record
    ///
    /// The union of all results for the rows of one record equals the
    /// union of their [`RelationshipIndex::related_terms`]. Each context is
    /// expanded at most twice per record: once for all members except the
    /// first row, once more for that row's own member.
    pub fn uncovered_related_terms(
        &self,
        key: AnnotationKey,
        want: RelatedTerms,
        ontology: &OntologyCache,
        coverage: &mut RelatedCoverage,
    ) -> BTreeSet<String> {
        let mut result = BTreeSet::new();
        if !(want.terms || want.ids) {
            return result;
        }
        let Some(context) = self.context(key) else {
            return result;
        };
        let members = self.members_of(&context);
        match coverage.contexts.get(&context).copied() {
            Some(Coverage::Complete) => {}
            Some(Coverage::AllBut(missing)) => {
                if missing != key {
                    for member in members.iter().filter(|member| member.key == missing) {
                        expand(member, want, ontology, &mut result);
                    }
                    coverage.contexts.insert(context, Coverage::Complete);
                }
            }
            None => {
                for member in members.iter().filter(|member| member.key != key) {
                    expand(member, want, ontology, &mut result);
                }
                coverage.contexts.insert(context, Coverage::AllBut(key));
            }
        }
        result
    }

    /// Number of indexed annotations
    pub fn len(&self) -> usize {
        self.context_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.context_of.is_empty()
    }
}

/// Adds the term of `member` and its ancestors, if `want` accepts it
fn expand(
    member: &Member,
    want: RelatedTerms,
    ontology: &OntologyCache,
    result: &mut BTreeSet<String>,
) {
    let Some(term) = ontology.term(member.term) else {
        return;
    };
    if !want.accepts(&term) {
        return;
    }
    for t in std::iter::once(term).chain(term.ancestors()) {
        if want.terms {
            result.insert(t.label().to_string());
        }
        if want.ids {
            result.insert(t.primary_id().to_string());
        }
    }
}
