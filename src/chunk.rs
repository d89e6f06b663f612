//! Splitting one oversized ordered scan into bounded key ranges
//!
//! All ranges are inclusive on both ends. Chunks of one pass feed the same
//! [`DocumentBuilder`] in ascending order, the open record of the builder
//! is carried over the chunk edge.
use tracing::debug;

use crate::config::IndexConfig;
use crate::document::{DocumentBuilder, DocumentSink, RowSource};
use crate::{IndexError, IndexResult};

/// Returns the next `(lower, upper)` range following `last_upper`
///
/// Pure arithmetic. The caller loops while `lower` is not above the highest
/// key of the table.
///
/// ```
/// use bsu_index::chunk::next_chunk;
///
/// assert_eq!(next_chunk(0, 100), (1, 100));
/// assert_eq!(next_chunk(100, 100), (101, 200));
/// ```
pub fn next_chunk(last_upper: u32, chunk_size: u32) -> (u32, u32) {
    let lower = last_upper.saturating_add(1);
    let upper = last_upper.saturating_add(chunk_size);
    (lower, upper)
}

/// Iterates the chunks that cover `min..=max`
#[derive(Debug, Clone)]
pub struct ChunkedRange {
    next_lower: Option<u32>,
    max: u32,
    chunk_size: u32,
}

impl ChunkedRange {
    /// # Errors
    ///
    /// [`IndexError::InvalidConfig`] if `chunk_size` is zero
    pub fn new(min: u32, max: u32, chunk_size: u32) -> IndexResult<Self> {
        if chunk_size == 0 {
            return Err(IndexError::InvalidConfig(
                "chunk_size must be greater than zero.".to_string(),
            ));
        }
        Ok(Self {
            next_lower: (min <= max).then_some(min),
            max,
            chunk_size,
        })
    }

    /// Chunks of `min..=max` sized by [`IndexConfig::chunk_size`]
    ///
    /// # Errors
    ///
    /// [`IndexError::InvalidConfig`] if the configured size is zero
    pub fn from_config(min: u32, max: u32, config: &IndexConfig) -> IndexResult<Self> {
        Self::new(min, max, config.chunk_size)
    }
}

impl Iterator for ChunkedRange {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let lower = self.next_lower?;
        if lower > self.max {
            self.next_lower = None;
            return None;
        }
        let upper = lower.saturating_add(self.chunk_size - 1);
        self.next_lower = match upper.checked_add(1) {
            Some(next) if next <= self.max => Some(next),
            _ => None,
        };
        Some((lower, upper))
    }
}

/// Feeds one builder from a row source per chunk
///
/// `fetch` opens the ordered scan of one key range. Returns the number of
/// chunks visited. The builder is not finished.
///
/// # Errors
///
/// The first error of `fetch` or of the builder aborts the pass
pub fn drive_chunks<S, R, F>(
    range: ChunkedRange,
    builder: &mut DocumentBuilder<'_, S>,
    mut fetch: F,
) -> IndexResult<usize>
where
    S: DocumentSink,
    R: RowSource,
    F: FnMut(u32, u32) -> IndexResult<R>,
{
    let mut chunks = 0;
    for (lower, upper) in range {
        debug!("Processing chunk {}..={}", lower, upper);
        let source = fetch(lower, upper)?;
        builder.consume(source)?;
        chunks += 1;
    }
    Ok(chunks)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::document::{AnnotationRow, IterSource, MemorySink};
    use crate::keys::{BsuKey, GenotypeClusterKey, HomologyClusterKey};
    use crate::ontology::Builder;
    use crate::registry::{Grouping, RegistryBuilder};
    use crate::term::Vocabulary;

    #[test]
    fn chunk_arithmetic() {
        assert_eq!(next_chunk(0, 10), (1, 10));
        assert_eq!(next_chunk(10, 10), (11, 20));
        assert_eq!(next_chunk(u32::MAX - 1, 10), (u32::MAX, u32::MAX));
    }

    #[test]
    fn covers_the_whole_range() {
        let chunks: Vec<(u32, u32)> = ChunkedRange::new(1, 25, 10).unwrap().collect();
        assert_eq!(chunks, [(1, 10), (11, 20), (21, 30)]);

        let chunks: Vec<(u32, u32)> = ChunkedRange::new(5, 5, 10).unwrap().collect();
        assert_eq!(chunks, [(5, 14)]);

        assert_eq!(ChunkedRange::new(10, 1, 10).unwrap().count(), 0);
        assert!(ChunkedRange::new(1, 10, 0).is_err());

        let config = IndexConfig {
            chunk_size: 50_000,
            ..Default::default()
        };
        let chunks = ChunkedRange::from_config(1, 120_000, &config).unwrap();
        assert_eq!(chunks.count(), 3);
    }

    #[test]
    fn terminates_at_the_end_of_the_key_space() {
        let chunks: Vec<(u32, u32)> = ChunkedRange::new(u32::MAX - 5, u32::MAX, 4)
            .unwrap()
            .collect();
        assert_eq!(
            chunks,
            [(u32::MAX - 5, u32::MAX - 2), (u32::MAX - 1, u32::MAX)]
        );
    }

    #[test]
    fn bsu_split_across_chunks_yields_one_record() {
        let mut terms = Builder::new();
        terms.add_term(1u32, "MP:0000001", "A", Vocabulary::MammalianPhenotype);
        terms.add_term(2u32, "MP:0000002", "B", Vocabulary::MammalianPhenotype);
        let ontology = terms.terms_complete().connect_all_terms();

        let registry = RegistryBuilder::new().warm_up(
            Vec::new(),
            vec![
                (GenotypeClusterKey::from(1u32), Some(HomologyClusterKey::from(1u32))),
                (GenotypeClusterKey::from(2u32), Some(HomologyClusterKey::from(1u32))),
            ],
        );

        // (chunked key, genotype cluster, term), sorted by genotype cluster
        let table = [(1u32, 1u32, 1u32), (2, 1, 2), (3, 2, 1), (4, 2, 2), (5, 2, 1)];

        let mut builder =
            DocumentBuilder::new(&ontology, &registry, MemorySink::new(), &IndexConfig::default());
        let range = ChunkedRange::new(1, 5, 2).unwrap();
        let chunks = drive_chunks(range, &mut builder, |lower, upper| {
            let rows: Vec<AnnotationRow> = table
                .iter()
                .filter(|(key, _, _)| (lower..=upper).contains(key))
                .map(|(key, gc, term)| {
                    let grouping = Grouping::Mouse {
                        genotype_cluster: (*gc).into(),
                        homology_cluster: Some(1u32.into()),
                    };
                    AnnotationRow::new((*key).into(), grouping, (*term).into())
                })
                .collect();
            Ok(IterSource::new(rows))
        })
        .unwrap();
        assert_eq!(chunks, 3);

        let (sink, stats) = builder.finish().unwrap();
        let records: Vec<_> = sink.records().collect();
        assert_eq!(records.len(), 2);
        assert_eq!(stats.records_emitted, 2);
        assert_eq!(records[0].bsu, BsuKey::from(1u32));
        assert_eq!(records[0].annotated.terms.len(), 2);
        assert_eq!(records[1].annotated.terms.len(), 2);
    }

    #[test]
    fn fetch_errors_abort() {
        let ontology = Builder::new().terms_complete().connect_all_terms();
        let registry = RegistryBuilder::new().warm_up(Vec::new(), Vec::new());
        let mut builder =
            DocumentBuilder::new(&ontology, &registry, MemorySink::new(), &IndexConfig::default());
        let res = drive_chunks(ChunkedRange::new(1, 10, 5).unwrap(), &mut builder, |_, _| {
            Err::<IterSource<std::vec::IntoIter<AnnotationRow>>, _>(IndexError::InvalidInput(
                "lost connection".to_string(),
            ))
        });
        assert!(res.is_err());
    }
}
