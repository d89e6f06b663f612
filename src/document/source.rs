//! Ordered annotation rows
use crate::annotation::Qualifier;
use crate::keys::{AnnotationKey, MarkerKey};
use crate::registry::Grouping;
use crate::term::TermKey;
use crate::IndexResult;

/// One row of the annotation join, the input unit of the grouped pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRow {
    pub annotation: AnnotationKey,
    pub grouping: Grouping,
    pub term: TermKey,
    pub qualifier: Option<Qualifier>,
    pub reference: Option<String>,
    /// The annotated marker, if the row source knows it
    ///
    /// Human rows carry their marker in the grouping, mouse rows may name
    /// the marker of the genotype here.
    pub marker: Option<MarkerKey>,
}

impl AnnotationRow {
    pub fn new(annotation: AnnotationKey, grouping: Grouping, term: TermKey) -> Self {
        Self {
            annotation,
            grouping,
            term,
            qualifier: None,
            reference: None,
            marker: None,
        }
    }

    #[must_use]
    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifier = Some(qualifier);
        self
    }

    #[must_use]
    pub fn with_reference(mut self, reference: &str) -> Self {
        self.reference = Some(reference.to_string());
        self
    }

    #[must_use]
    pub fn with_marker(mut self, marker: MarkerKey) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn is_negated(&self) -> bool {
        self.qualifier.as_ref().is_some_and(Qualifier::is_negated)
    }
}

/// A forward-only cursor over rows sorted by BSU grouping key
///
/// Sorting is the responsibility of the implementor. An unsorted stream
/// fragments the output into several records per BSU.
pub trait RowSource {
    /// Returns the next row, or `None` at the end of the stream
    ///
    /// # Errors
    ///
    /// Errors of the underlying store are fatal for the pass
    fn next_row(&mut self) -> IndexResult<Option<AnnotationRow>>;
}

/// A [`RowSource`] over any iterator of rows
#[derive(Debug)]
pub struct IterSource<I> {
    rows: I,
}

impl<I: Iterator<Item = AnnotationRow>> IterSource<I> {
    pub fn new<T: IntoIterator<IntoIter = I>>(rows: T) -> Self {
        Self {
            rows: rows.into_iter(),
        }
    }
}

impl<I: Iterator<Item = AnnotationRow>> RowSource for IterSource<I> {
    fn next_row(&mut self) -> IndexResult<Option<AnnotationRow>> {
        Ok(self.rows.next())
    }
}

impl<R: RowSource + ?Sized> RowSource for &mut R {
    fn next_row(&mut self) -> IndexResult<Option<AnnotationRow>> {
        (**self).next_row()
    }
}
