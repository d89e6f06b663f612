//! Destinations of finished records
use std::io::Write;

use crate::document::OutputRecord;
use crate::IndexResult;

/// Accepts batches of finished records
///
/// The builder calls [`DocumentSink::write_batch`] whenever a batch is
/// full and once more at the end of a pass, followed by exactly one
/// [`DocumentSink::commit`]. Errors are fatal for the pass, the builder
/// does not retry.
pub trait DocumentSink {
    /// Takes ownership of one batch of records
    ///
    /// # Errors
    ///
    /// Any failure of the underlying store
    fn write_batch(&mut self, records: Vec<OutputRecord>) -> IndexResult<()>;

    /// Makes all written batches durable or visible
    ///
    /// # Errors
    ///
    /// Any failure of the underlying store
    fn commit(&mut self) -> IndexResult<()>;
}

impl<S: DocumentSink + ?Sized> DocumentSink for &mut S {
    fn write_batch(&mut self, records: Vec<OutputRecord>) -> IndexResult<()> {
        (**self).write_batch(records)
    }

    fn commit(&mut self) -> IndexResult<()> {
        (**self).commit()
    }
}

/// Keeps every batch in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    batches: Vec<Vec<OutputRecord>>,
    commits: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All written batches in write order
    pub fn batches(&self) -> &[Vec<OutputRecord>] {
        &self.batches
    }

    /// All written records in write order
    pub fn records(&self) -> impl Iterator<Item = &OutputRecord> {
        self.batches.iter().flatten()
    }

    /// Number of `commit` calls
    pub fn commits(&self) -> usize {
        self.commits
    }
}

impl DocumentSink for MemorySink {
    fn write_batch(&mut self, records: Vec<OutputRecord>) -> IndexResult<()> {
        self.batches.push(records);
        Ok(())
    }

    fn commit(&mut self) -> IndexResult<()> {
        self.commits += 1;
        Ok(())
    }
}

/// Writes one JSON document per line
///
/// `commit` flushes the writer.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of records written so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DocumentSink for JsonLinesSink<W> {
    fn write_batch(&mut self, records: Vec<OutputRecord>) -> IndexResult<()> {
        for record in &records {
            serde_json::to_writer(&mut self.writer, record)?;
            self.writer.write_all(b"\n")?;
            self.written += 1;
        }
        Ok(())
    }

    fn commit(&mut self) -> IndexResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
