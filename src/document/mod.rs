//! Streaming group-by of annotation rows into one record per BSU
//!
//! The [`DocumentBuilder`] reads rows sorted by BSU. It keeps exactly one
//! open record and emits it as soon as a row of a different BSU arrives.
//! Finished records are handed to a [`DocumentSink`] in batches.
use tracing::{debug, info, trace};

use crate::config::IndexConfig;
use crate::keys::{BsuKey, MarkerKey};
use crate::markers::{Organism, OrthologyCache};
use crate::ontology::OntologyCache;
use crate::registry::{BasicSearchUnit, BsuRegistry, Grouping};
use crate::relationships::{RelatedCoverage, RelatedTerms, RelationshipIndex};
use crate::term::TermKey;
use crate::{IndexError, IndexResult};

mod record;
mod sink;
mod source;

pub use record::{OutputRecord, TermBucket, TextSet};
pub use sink::{DocumentSink, JsonLinesSink, MemorySink};
pub use source::{AnnotationRow, IterSource, RowSource};

use record::first_write;

/// Counters of one grouped pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassStats {
    pub rows_seen: usize,
    /// Rows without a registered BSU, e.g. mouse rows without homology cluster
    pub rows_dropped: usize,
    pub records_emitted: usize,
    pub batches_written: usize,
}

enum State {
    Idle,
    Accumulating(BsuKey, Box<OutputRecord>),
}

/// Read-only lookups used to fill a record
#[derive(Clone, Copy)]
struct Lookups<'a> {
    ontology: &'a OntologyCache,
    orthology: Option<&'a OrthologyCache>,
    relationships: Option<(&'a RelationshipIndex, RelatedTerms)>,
}

impl Lookups<'_> {
    fn contribute(
        &self,
        record: &mut OutputRecord,
        unit: &BasicSearchUnit,
        row: &AnnotationRow,
        coverage: &mut RelatedCoverage,
    ) {
        self.add_marker_fields(record, unit, row.marker);

        let negated = row.is_negated();
        if negated {
            // a negated term says nothing about its ancestors
            self.add_term(&mut record.excluded, row.term, false);
        } else {
            self.add_term(&mut record.annotated, row.term, true);
        }

        if let Some(qualifier) = &row.qualifier {
            record.qualifiers.insert(&qualifier.to_string());
        }
        if let Some(reference) = &row.reference {
            record.references.insert(reference);
        }
        if let (false, Some((index, want))) = (negated, self.relationships) {
            record.related.extend(index.uncovered_related_terms(
                row.annotation,
                want,
                self.ontology,
                coverage,
            ));
        }
    }

    fn add_term(&self, bucket: &mut TermBucket, key: TermKey, roll_up: bool) {
        let Some(term) = self.ontology.term(key) else {
            trace!("Ignoring unknown {}", key);
            return;
        };
        bucket.terms.insert(term.label());
        bucket.ids.insert(term.primary_id());
        bucket.ids.extend(term.alternate_ids().iter().map(String::as_str));
        bucket.synonyms.extend(term.synonyms().iter().map(String::as_str));

        if !(roll_up && term.vocabulary().rolls_up()) {
            return;
        }
        for ancestor in term.ancestors() {
            bucket.ancestor_terms.insert(ancestor.label());
            bucket.ancestor_ids.insert(ancestor.primary_id());
            bucket
                .ancestor_ids
                .extend(ancestor.alternate_ids().iter().map(String::as_str));
            bucket
                .ancestor_synonyms
                .extend(ancestor.synonyms().iter().map(String::as_str));
        }
    }

    fn add_marker_fields(
        &self,
        record: &mut OutputRecord,
        unit: &BasicSearchUnit,
        row_marker: Option<MarkerKey>,
    ) {
        let Some(orthology) = self.orthology else {
            return;
        };
        let homology_cluster = unit.homology_cluster();
        let marker_key = unit.marker().or(row_marker).or_else(|| {
            homology_cluster.and_then(|hc| {
                orthology
                    .cluster_markers(hc, Organism::Mouse)
                    .next()
                    .map(|marker| *marker.key())
            })
        });

        if let Some(marker) = marker_key.and_then(|key| orthology.marker(key)) {
            first_write(&mut record.marker, *marker.key());
            if record.marker_symbol.is_none() {
                record.marker_symbol = Some(marker.symbol().to_string());
                record.marker_id = Some(marker.primary_id().to_string());
            }
            if let Some(coordinate) = marker.coordinate() {
                first_write(&mut record.coordinate, coordinate.clone());
            }
            for ortholog in orthology.orthologs(*marker.key()) {
                if let Some(other) = orthology.marker(*ortholog) {
                    record.ortholog_symbols.insert(other.symbol());
                }
            }
        }
        if let (Organism::Mouse, Some(hc)) = (unit.organism(), homology_cluster) {
            for human in orthology.cluster_markers(hc, Organism::Human) {
                record.ortholog_symbols.insert(human.symbol());
            }
        }
    }
}

/// Groups a BSU-ordered row stream into one [`OutputRecord`] per BSU
///
/// The builder is either idle or accumulating exactly one open record.
/// A row of a new BSU emits the open record first. [`DocumentBuilder::finish`]
/// emits the last record, writes the final batch and commits the sink.
///
/// The builder state survives between calls of [`DocumentBuilder::consume`],
/// so several chunked sources can feed the same pass.
///
/// # Examples
///
/// ```
/// use bsu_index::document::{AnnotationRow, IterSource, MemorySink};
/// use bsu_index::ontology::Builder;
/// use bsu_index::registry::Grouping;
/// use bsu_index::{
///     DocumentBuilder, IndexConfig, MarkerKey, RegistryBuilder, TermKey, Vocabulary,
/// };
///
/// let mut terms = Builder::new();
/// terms.add_term(1u32, "DOID:4", "disease", Vocabulary::Disease);
/// terms.add_term(2u32, "DOID:162", "cancer", Vocabulary::Disease);
/// let mut terms = terms.terms_complete();
/// terms.add_parent(1u32, 2u32).unwrap();
/// let ontology = terms.connect_all_terms();
///
/// let registry = RegistryBuilder::new()
///     .warm_up(vec![(MarkerKey::from(5u32), TermKey::from(2u32))], Vec::new());
///
/// let grouping = Grouping::Human { marker: 5u32.into(), disease: 2u32.into() };
/// let rows = vec![
///     AnnotationRow::new(1u32.into(), grouping, 2u32.into()).with_reference("PMID:1"),
///     AnnotationRow::new(2u32.into(), grouping, 2u32.into()).with_reference("PMID:2"),
/// ];
///
/// let config = IndexConfig::default();
/// let mut builder = DocumentBuilder::new(&ontology, &registry, MemorySink::new(), &config);
/// builder.consume(IterSource::new(rows)).unwrap();
/// let (sink, stats) = builder.finish().unwrap();
///
/// assert_eq!(stats.records_emitted, 1);
/// let record = sink.records().next().unwrap();
/// assert_eq!(record.references.len(), 2);
/// assert!(record.annotated.ancestor_terms.contains("disease"));
/// ```
pub struct DocumentBuilder<'a, S: DocumentSink> {
    lookups: Lookups<'a>,
    registry: &'a BsuRegistry,
    sink: S,
    batch_size: usize,
    check_order: bool,
    state: State,
    last_opened: Option<BsuKey>,
    /// Related contexts already merged into the open record
    coverage: RelatedCoverage,
    batch: Vec<OutputRecord>,
    stats: PassStats,
}

impl<'a, S: DocumentSink> DocumentBuilder<'a, S> {
    pub fn new(
        ontology: &'a OntologyCache,
        registry: &'a BsuRegistry,
        sink: S,
        config: &IndexConfig,
    ) -> Self {
        let batch_size = config.batch_size.max(1);
        Self {
            lookups: Lookups {
                ontology,
                orthology: None,
                relationships: None,
            },
            registry,
            sink,
            batch_size,
            check_order: config.check_order,
            state: State::Idle,
            last_opened: None,
            coverage: RelatedCoverage::new(),
            batch: Vec::with_capacity(batch_size),
            stats: PassStats::default(),
        }
    }

    /// Adds marker symbols, ids, coordinates and ortholog symbols to every record
    #[must_use]
    pub fn with_orthology(mut self, orthology: &'a OrthologyCache) -> Self {
        self.lookups.orthology = Some(orthology);
        self
    }

    /// Adds the related terms of every annotation to the `related` field
    #[must_use]
    pub fn with_relationships(
        mut self,
        index: &'a RelationshipIndex,
        want: RelatedTerms,
    ) -> Self {
        self.lookups.relationships = Some((index, want));
        self
    }

    /// Applies one row to the open record
    ///
    /// Rows that do not resolve to a BSU are dropped and counted.
    ///
    /// # Errors
    ///
    /// - [`IndexError::UnsortedInput`] if order checking is enabled and the
    ///   row belongs to a BSU lower than the previous one
    /// - Sink errors, if the row completes a batch
    pub fn push(&mut self, row: AnnotationRow) -> IndexResult<()> {
        self.stats.rows_seen += 1;
        let Some(unit) = self.registry.resolve(&row.grouping) else {
            trace!("Dropping {} without BSU {}", row.annotation, row.grouping);
            self.stats.rows_dropped += 1;
            return Ok(());
        };
        let unit = *unit;
        let key = unit.key();

        let is_open = matches!(&self.state, State::Accumulating(open, _) if *open == key);
        if !is_open {
            if let (true, Some(previous)) = (self.check_order, self.last_opened) {
                if key < previous {
                    return Err(IndexError::UnsortedInput {
                        previous,
                        current: key,
                    });
                }
            }
            self.close()?;
            self.state = State::Accumulating(key, Box::new(open_record(&unit)));
            self.last_opened = Some(key);
            self.coverage.clear();
        }

        let lookups = self.lookups;
        if let State::Accumulating(_, record) = &mut self.state {
            lookups.contribute(record, &unit, &row, &mut self.coverage);
        }
        Ok(())
    }

    /// Applies all rows of `source`
    ///
    /// The open record is kept at the end of the source, call
    /// [`DocumentBuilder::finish`] once all sources are consumed.
    ///
    /// # Errors
    ///
    /// Errors of the source, of the sink or of [`DocumentBuilder::push`]
    pub fn consume<R: RowSource>(&mut self, mut source: R) -> IndexResult<usize> {
        let mut rows = 0;
        while let Some(row) = source.next_row()? {
            self.push(row)?;
            rows += 1;
        }
        debug!("Consumed {} rows", rows);
        Ok(rows)
    }

    /// Emits the open record, writes the final batch and commits the sink
    ///
    /// The final batch is written even when it is shorter than the batch
    /// size or empty.
    ///
    /// # Errors
    ///
    /// Sink errors
    pub fn finish(mut self) -> IndexResult<(S, PassStats)> {
        self.close()?;
        self.write_batch()?;
        self.sink.commit()?;
        info!(
            "Grouped pass done: {} rows, {} dropped, {} records in {} batches",
            self.stats.rows_seen,
            self.stats.rows_dropped,
            self.stats.records_emitted,
            self.stats.batches_written
        );
        Ok((self.sink, self.stats))
    }

    /// The key of the open record, `None` while idle
    pub fn open_bsu(&self) -> Option<BsuKey> {
        match &self.state {
            State::Idle => None,
            State::Accumulating(key, _) => Some(*key),
        }
    }

    pub fn stats(&self) -> &PassStats {
        &self.stats
    }

    fn close(&mut self) -> IndexResult<()> {
        if let State::Accumulating(_, record) = std::mem::replace(&mut self.state, State::Idle) {
            self.batch.push(*record);
            self.stats.records_emitted += 1;
            if self.batch.len() >= self.batch_size {
                self.write_batch()?;
            }
        }
        Ok(())
    }

    fn write_batch(&mut self) -> IndexResult<()> {
        let batch = std::mem::replace(&mut self.batch, Vec::with_capacity(self.batch_size));
        trace!("Writing batch of {} records", batch.len());
        self.sink.write_batch(batch)?;
        self.stats.batches_written += 1;
        Ok(())
    }
}

fn open_record(unit: &BasicSearchUnit) -> OutputRecord {
    let mut record = OutputRecord::new(unit.key(), unit.organism());
    match *unit.grouping() {
        Grouping::Human { marker, disease } => {
            record.marker = Some(marker);
            record.disease = Some(disease);
        }
        Grouping::Mouse {
            genotype_cluster,
            homology_cluster,
        } => {
            record.genotype_cluster = Some(genotype_cluster);
            record.homology_cluster = homology_cluster;
        }
    }
    record
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::annotation::{Annotation, Qualifier, Subject};
    use crate::clusters::GenotypeClusters;
    use crate::keys::{GenotypeClusterKey, GenotypeKey, HomologyClusterKey};
    use crate::markers::{Coordinate, Marker};
    use crate::ontology::Builder;
    use crate::registry::RegistryBuilder;
    use crate::term::Vocabulary;

    // A{}, B{A}, C{A,B}, an anatomy term D{A} and a root phenotype E{}
    fn ontology() -> OntologyCache {
        let mut builder = Builder::new();
        builder.add_term(1u32, "MP:0000001", "A", Vocabulary::MammalianPhenotype);
        builder.add_term(2u32, "MP:0000002", "B", Vocabulary::MammalianPhenotype);
        builder.add_term(3u32, "MP:0000003", "C", Vocabulary::MammalianPhenotype);
        builder.add_term(4u32, "EMAPA:1", "D", Vocabulary::Anatomy);
        builder.add_term(5u32, "MP:0000005", "E", Vocabulary::MammalianPhenotype);
        builder.add_synonym(3u32, "C-syn").unwrap();
        builder.add_alternate_id(3u32, "MP:0099999").unwrap();
        builder.add_synonym(2u32, "B-syn").unwrap();
        let mut builder = builder.terms_complete();
        builder.add_parent(1u32, 2u32).unwrap();
        builder.add_parent(1u32, 3u32).unwrap();
        builder.add_parent(2u32, 3u32).unwrap();
        builder.add_parent(1u32, 4u32).unwrap();
        builder.connect_all_terms()
    }

    fn mouse(gc: u32, hc: Option<u32>) -> Grouping {
        Grouping::Mouse {
            genotype_cluster: GenotypeClusterKey::from(gc),
            homology_cluster: hc.map(HomologyClusterKey::from),
        }
    }

    fn registry() -> BsuRegistry {
        RegistryBuilder::new().warm_up(
            Vec::new(),
            vec![
                (GenotypeClusterKey::from(10u32), Some(HomologyClusterKey::from(1u32))),
                (GenotypeClusterKey::from(20u32), Some(HomologyClusterKey::from(1u32))),
                (GenotypeClusterKey::from(30u32), None),
            ],
        )
    }

    fn row(ann: u32, grouping: Grouping, term: u32) -> AnnotationRow {
        AnnotationRow::new(ann.into(), grouping, term.into())
    }

    fn config(batch_size: usize) -> IndexConfig {
        IndexConfig {
            batch_size,
            check_order: true,
            ..Default::default()
        }
    }

    fn run(rows: Vec<AnnotationRow>, batch_size: usize) -> (MemorySink, PassStats) {
        let ont = ontology();
        let reg = registry();
        let mut builder = DocumentBuilder::new(&ont, &reg, MemorySink::new(), &config(batch_size));
        builder.consume(IterSource::new(rows)).unwrap();
        builder.finish().unwrap()
    }

    #[test]
    fn diamond_groups() {
        let rows = vec![
            row(1, mouse(10, Some(1)), 3),
            row(2, mouse(10, Some(1)), 4),
            row(3, mouse(10, Some(1)), 3),
            row(4, mouse(20, Some(1)), 2),
            row(5, mouse(20, Some(1)), 5),
        ];
        let (sink, stats) = run(rows, 250);
        let records: Vec<&OutputRecord> = sink.records().collect();
        assert_eq!(records.len(), 2);
        assert_eq!(stats.records_emitted, 2);

        let first = records[0];
        assert_eq!(first.bsu, BsuKey::from(1u32));
        assert_eq!(first.annotated.terms.iter().collect::<Vec<_>>(), ["C", "D"]);
        assert_eq!(first.annotated.ancestor_terms.iter().collect::<Vec<_>>(), ["A", "B"]);
        assert!(first.annotated.ids.contains("MP:0099999"));
        assert!(first.annotated.synonyms.contains("C-syn"));
        assert!(first.annotated.ancestor_synonyms.contains("B-syn"));

        // the last group is never lost
        let last = records[1];
        assert_eq!(last.bsu, BsuKey::from(2u32));
        assert_eq!(last.annotated.terms.iter().collect::<Vec<_>>(), ["B", "E"]);
        assert_eq!(last.annotated.ancestor_terms.iter().collect::<Vec<_>>(), ["A"]);
    }

    #[test]
    fn anatomy_does_not_roll_up() {
        let ont = ontology();
        assert_eq!(ont.ancestors(4u32).len(), 1);

        let (sink, _) = run(vec![row(1, mouse(20, Some(1)), 4)], 250);
        let record = sink.records().next().unwrap();
        assert_eq!(record.annotated.terms.iter().collect::<Vec<_>>(), ["D"]);
        assert!(record.annotated.ancestor_terms.is_empty());
    }

    #[test]
    fn repeated_rows_are_deduplicated() {
        let rows = (0..10)
            .map(|i| row(i, mouse(10, Some(1)), 3).with_reference("J:1"))
            .collect();
        let (sink, stats) = run(rows, 250);
        let record = sink.records().next().unwrap();
        assert_eq!(record.annotated.terms.len(), 1);
        assert_eq!(record.references.len(), 1);
        assert_eq!(stats.rows_seen, 10);
    }

    #[test]
    fn negated_rows_are_excluded() {
        let rows = vec![
            row(1, mouse(10, Some(1)), 2),
            row(2, mouse(10, Some(1)), 3).with_qualifier(Qualifier::Not),
        ];
        let (sink, _) = run(rows, 250);
        let record = sink.records().next().unwrap();
        assert_eq!(record.annotated.terms.iter().collect::<Vec<_>>(), ["B"]);
        assert_eq!(record.excluded.terms.iter().collect::<Vec<_>>(), ["C"]);
        assert!(record.excluded.ancestor_terms.is_empty());
        assert!(record.qualifiers.contains("NOT"));
    }

    #[test]
    fn rows_without_homology_are_dropped() {
        let rows = vec![
            row(1, mouse(10, Some(1)), 3),
            row(2, mouse(30, None), 3),
            row(3, mouse(99, Some(1)), 3),
            row(4, mouse(20, Some(1)), 3),
        ];
        let (sink, stats) = run(rows, 250);
        assert_eq!(sink.records().count(), 2);
        assert_eq!(stats.rows_dropped, 2);
        assert_eq!(stats.rows_seen, 4);
    }

    #[test]
    fn unsorted_input_is_detected() {
        let ont = ontology();
        let reg = registry();
        let mut builder = DocumentBuilder::new(&ont, &reg, MemorySink::new(), &config(250));
        builder.push(row(1, mouse(20, Some(1)), 3)).unwrap();
        let res = builder.push(row(2, mouse(10, Some(1)), 3));
        assert!(matches!(
            res,
            Err(IndexError::UnsortedInput { previous, current })
                if previous == BsuKey::from(2u32) && current == BsuKey::from(1u32)
        ));
    }

    #[test]
    fn unsorted_input_fragments_without_check() {
        let ont = ontology();
        let reg = registry();
        let cfg = IndexConfig {
            check_order: false,
            ..Default::default()
        };
        let mut builder = DocumentBuilder::new(&ont, &reg, MemorySink::new(), &cfg);
        let rows = vec![
            row(1, mouse(10, Some(1)), 3),
            row(2, mouse(20, Some(1)), 3),
            row(3, mouse(10, Some(1)), 2),
        ];
        builder.consume(IterSource::new(rows)).unwrap();
        let (sink, _) = builder.finish().unwrap();
        assert_eq!(sink.records().count(), 3);
    }

    #[test]
    fn batches_and_commit() {
        let rows = vec![
            row(1, mouse(10, Some(1)), 3),
            row(2, mouse(20, Some(1)), 3),
        ];
        let (sink, stats) = run(rows, 1);
        // two full batches plus the final empty one
        assert_eq!(sink.batches().len(), 3);
        assert!(sink.batches()[2].is_empty());
        assert_eq!(stats.batches_written, 3);
        assert_eq!(sink.commits(), 1);

        let (sink, _) = run(Vec::new(), 10);
        assert_eq!(sink.batches().len(), 1);
        assert_eq!(sink.records().count(), 0);
        assert_eq!(sink.commits(), 1);
    }

    #[test]
    fn open_record_survives_consume() {
        let ont = ontology();
        let reg = registry();
        let mut builder = DocumentBuilder::new(&ont, &reg, MemorySink::new(), &config(250));
        builder
            .consume(IterSource::new(vec![row(1, mouse(10, Some(1)), 3)]))
            .unwrap();
        assert_eq!(builder.open_bsu(), Some(BsuKey::from(1u32)));
        builder
            .consume(IterSource::new(vec![row(2, mouse(10, Some(1)), 5)]))
            .unwrap();
        let (sink, _) = builder.finish().unwrap();
        let records: Vec<&OutputRecord> = sink.records().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].annotated.terms.len(), 2);
    }

    #[test]
    fn marker_fields_from_orthology() {
        let ont = ontology();
        let reg = registry();
        let mut orthology = OrthologyCache::default();
        orthology.add_marker(Marker::new(7u32.into(), "Kit", "MGI:96677", Organism::Mouse));
        orthology.add_marker(Marker::new(8u32.into(), "KIT", "3815", Organism::Human));
        orthology.add_to_homology_cluster(7u32.into(), 1u32.into());
        orthology.add_to_homology_cluster(8u32.into(), 1u32.into());
        orthology.set_coordinate(
            7u32.into(),
            Coordinate {
                chromosome: "5".to_string(),
                start: 75_735_647,
                end: 75_817_382,
                strand: Some('+'),
            },
        );

        let mut builder = DocumentBuilder::new(&ont, &reg, MemorySink::new(), &config(250))
            .with_orthology(&orthology);
        builder.push(row(1, mouse(10, Some(1)), 3)).unwrap();
        let (sink, _) = builder.finish().unwrap();
        let record = sink.records().next().unwrap();
        assert_eq!(record.marker_symbol.as_deref(), Some("Kit"));
        assert_eq!(record.marker_id.as_deref(), Some("MGI:96677"));
        assert_eq!(record.genotype_cluster, Some(10u32.into()));
        assert!(record.coordinate.is_some());
        assert_eq!(record.ortholog_symbols.iter().collect::<Vec<_>>(), ["KIT"]);
    }

    #[test]
    fn related_terms_per_record() {
        let ont = ontology();
        let reg = registry();
        let clusters: GenotypeClusters =
            [(GenotypeKey::from(1u32), GenotypeClusterKey::from(100u32))]
                .into_iter()
                .collect();
        let annotations = vec![
            Annotation::new(1u32.into(), Subject::Genotype(1u32.into()), 3u32.into()),
            Annotation::new(2u32.into(), Subject::Genotype(1u32.into()), 5u32.into()),
            Annotation::new(3u32.into(), Subject::Genotype(1u32.into()), 2u32.into()),
        ];
        let index = RelationshipIndex::build(&annotations, &clusters);
        let want = RelatedTerms {
            terms: true,
            phenotypes: true,
            ..Default::default()
        };

        let mut builder = DocumentBuilder::new(&ont, &reg, MemorySink::new(), &config(250))
            .with_relationships(&index, want);
        let rows = vec![
            row(1, mouse(10, Some(1)), 3),
            row(2, mouse(10, Some(1)), 5),
            row(3, mouse(10, Some(1)), 2),
            row(2, mouse(20, Some(1)), 5),
        ];
        builder.consume(IterSource::new(rows)).unwrap();
        let (sink, _) = builder.finish().unwrap();
        let records: Vec<&OutputRecord> = sink.records().collect();
        assert_eq!(records[0].related.iter().collect::<Vec<_>>(), ["A", "B", "C", "E"]);
        // the second record does not reuse what the first one expanded
        assert_eq!(
            records[1].related.iter().collect::<Vec<_>>(),
            index
                .related_terms(2u32.into(), want, &ont)
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
        );
        assert_eq!(records[1].related.iter().collect::<Vec<_>>(), ["A", "B", "C"]);
    }

    #[test]
    fn sink_errors_are_fatal() {
        struct Failing;
        impl DocumentSink for Failing {
            fn write_batch(&mut self, _: Vec<OutputRecord>) -> IndexResult<()> {
                Err(IndexError::Sink(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk full",
                )))
            }
            fn commit(&mut self) -> IndexResult<()> {
                Ok(())
            }
        }

        let ont = ontology();
        let reg = registry();
        let mut builder = DocumentBuilder::new(&ont, &reg, Failing, &config(1));
        builder.push(row(1, mouse(10, Some(1)), 3)).unwrap();
        assert!(builder.push(row(2, mouse(20, Some(1)), 3)).is_err());
    }
}
