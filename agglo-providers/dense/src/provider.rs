//! Dense matrix provider loaded from Arrow or Parquet.
use std::{fs::File, path::Path};

use agglo_core::{DistanceQuery, DistanceQueryError};
use arrow_array::{FixedSizeListArray, RecordBatch, RecordBatchReader};
use parquet::arrow::{ProjectionMask, arrow_reader::ParquetRecordBatchReaderBuilder};
use parquet::file::reader::ChunkReader;

use crate::errors::DenseMatrixProviderError;
use crate::ingest::{RowSink, field_dimension};
use crate::metric::DenseMetric;

/// Dense matrix provider backed by a contiguous row-major buffer.
#[derive(Debug)]
pub struct DenseMatrixProvider {
    name: String,
    rows: usize,
    dimension: usize,
    values: Vec<f32>,
    metric: DenseMetric,
}

impl DenseMatrixProvider {
    fn from_sink(name: impl Into<String>, sink: RowSink) -> Self {
        let (rows, dimension, values) = sink.finish();
        debug_assert_eq!(values.len(), rows.saturating_mul(dimension));
        Self {
            name: name.into(),
            rows,
            dimension,
            values,
            metric: DenseMetric::default(),
        }
    }

    /// Replaces the distance metric.
    #[must_use]
    pub fn with_metric(mut self, metric: DenseMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Returns the metric used for distances.
    #[must_use]
    pub fn metric(&self) -> DenseMetric {
        self.metric
    }

    /// Returns the dimensionality of each row.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the underlying row-major matrix.
    #[must_use]
    pub fn data(&self) -> &[f32] {
        &self.values
    }

    /// Loads data from an Arrow [`FixedSizeListArray`].
    ///
    /// # Errors
    /// Returns [`DenseMatrixProviderError`] when the child type is not
    /// `Float32`, the width is not positive, or a row or value is null.
    pub fn try_from_fixed_size_list(
        name: impl Into<String>,
        array: &FixedSizeListArray,
    ) -> Result<Self, DenseMatrixProviderError> {
        let mut sink = RowSink::new(None);
        sink.append(array)?;
        Ok(Self::from_sink(name, sink))
    }

    /// Loads the named column from a sequence of record batches.
    ///
    /// Every batch must declare the same row width.
    ///
    /// # Errors
    /// Returns [`DenseMatrixProviderError::ColumnNotFound`] when a batch lacks
    /// the column and [`DenseMatrixProviderError::InconsistentBatchDimension`]
    /// when widths differ, besides the per-row checks of
    /// [`try_from_fixed_size_list`](Self::try_from_fixed_size_list).
    pub fn try_from_record_batches<I>(
        name: impl Into<String>,
        column: &str,
        batches: I,
    ) -> Result<Self, DenseMatrixProviderError>
    where
        I: IntoIterator<Item = RecordBatch>,
    {
        let mut sink = RowSink::new(None);
        for batch in batches {
            sink.append_batch(&batch, column)?;
        }
        Ok(Self::from_sink(name, sink))
    }

    /// Loads data from a Parquet column containing `FixedSizeList<Float32, D>` rows.
    ///
    /// # Errors
    /// Returns [`DenseMatrixProviderError::Io`] when the file cannot be opened
    /// and the errors of
    /// [`try_from_parquet_reader`](Self::try_from_parquet_reader) otherwise.
    pub fn try_from_parquet_path(
        name: impl Into<String>,
        path: impl AsRef<Path>,
        column: &str,
    ) -> Result<Self, DenseMatrixProviderError> {
        let file = File::open(path)?;
        Self::try_from_parquet_reader(name, file, column)
    }

    /// Loads data from a Parquet reader, projecting only `column`.
    ///
    /// # Errors
    /// Returns [`DenseMatrixProviderError`] for Parquet decoding failures, a
    /// missing or mistyped column, nullable schemas and null rows.
    pub fn try_from_parquet_reader<R>(
        name: impl Into<String>,
        reader: R,
        column: &str,
    ) -> Result<Self, DenseMatrixProviderError>
    where
        R: ChunkReader + Send + 'static,
    {
        let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;
        let mask = ProjectionMask::columns(builder.parquet_schema(), [column]);
        let reader = builder.with_projection(mask).build()?;
        let schema = reader.schema();
        let index =
            schema
                .index_of(column)
                .map_err(|_| DenseMatrixProviderError::ColumnNotFound {
                    column: column.to_owned(),
                })?;
        let dimension = field_dimension(schema.field(index), column)?;
        let mut sink = RowSink::new(Some(dimension));
        for batch in reader {
            sink.append_batch(&batch?, column)?;
        }
        Ok(Self::from_sink(name, sink))
    }

    fn row(&self, index: usize) -> Result<&[f32], DistanceQueryError> {
        if index >= self.rows {
            return Err(DistanceQueryError::OutOfBounds { index });
        }
        let start = index * self.dimension;
        self.values
            .get(start..start + self.dimension)
            .ok_or(DistanceQueryError::OutOfBounds { index })
    }
}

impl DistanceQuery for DenseMatrixProvider {
    fn len(&self) -> usize {
        self.rows
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn distance(&self, i: usize, j: usize) -> Result<f64, DistanceQueryError> {
        let a = self.row(i)?;
        let b = self.row(j)?;
        Ok(self.metric.measure(a, b))
    }

    fn is_squared(&self) -> bool {
        self.metric.is_squared()
    }

    fn batch_distances(
        &self,
        query: usize,
        candidates: &[usize],
    ) -> Result<Vec<f64>, DistanceQueryError> {
        let origin = self.row(query)?;
        let mut out = Vec::with_capacity(candidates.len());
        for &candidate in candidates {
            out.push(self.metric.measure(origin, self.row(candidate)?));
        }
        Ok(out)
    }
}
