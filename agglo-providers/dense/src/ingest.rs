//! Accumulates `FixedSizeList<Float32, D>` columns into a row-major buffer.
use arrow_array::{Array, FixedSizeListArray, Float32Array, RecordBatch};
use arrow_schema::{DataType, Field};

use crate::errors::DenseMatrixProviderError;

/// Reads the row width declared by a schema field.
///
/// Nullable lists or children are rejected up front so that every row
/// reaching the matrix is complete.
pub(crate) fn field_dimension(
    field: &Field,
    column: &str,
) -> Result<usize, DenseMatrixProviderError> {
    let DataType::FixedSizeList(child, width) = field.data_type() else {
        return Err(DenseMatrixProviderError::InvalidColumnType {
            column: column.to_owned(),
            actual: field.data_type().clone(),
        });
    };
    if field.is_nullable() || child.is_nullable() {
        return Err(DenseMatrixProviderError::NullableField {
            column: column.to_owned(),
            nullable_child: child.is_nullable(),
        });
    }
    if child.data_type() != &DataType::Float32 {
        return Err(DenseMatrixProviderError::InvalidListValueType {
            actual: child.data_type().clone(),
        });
    }
    positive_width(*width)
}

fn array_dimension(array: &FixedSizeListArray) -> Result<usize, DenseMatrixProviderError> {
    let value_type = array.value_type();
    if value_type != DataType::Float32 {
        return Err(DenseMatrixProviderError::InvalidListValueType { actual: value_type });
    }
    positive_width(array.value_length())
}

fn positive_width(width: i32) -> Result<usize, DenseMatrixProviderError> {
    usize::try_from(width)
        .ok()
        .filter(|&width| width > 0)
        .ok_or(DenseMatrixProviderError::InvalidDimension { actual: width })
}

/// Row-major accumulator shared by the Arrow and Parquet loaders.
#[derive(Debug, Default)]
pub(crate) struct RowSink {
    dimension: Option<usize>,
    rows: usize,
    values: Vec<f32>,
}

impl RowSink {
    /// Starts a sink, optionally pinned to a dimension read from a schema.
    pub(crate) fn new(dimension: Option<usize>) -> Self {
        Self {
            dimension,
            ..Self::default()
        }
    }

    /// Appends the named column of `batch`.
    pub(crate) fn append_batch(
        &mut self,
        batch: &RecordBatch,
        column: &str,
    ) -> Result<(), DenseMatrixProviderError> {
        let schema = batch.schema();
        let index =
            schema
                .index_of(column)
                .map_err(|_| DenseMatrixProviderError::ColumnNotFound {
                    column: column.to_owned(),
                })?;
        let width = field_dimension(schema.field(index), column)?;
        self.pin_dimension(width)?;
        let array = batch.column(index);
        let list = array
            .as_any()
            .downcast_ref::<FixedSizeListArray>()
            .ok_or_else(|| DenseMatrixProviderError::InvalidColumnType {
                column: column.to_owned(),
                actual: array.data_type().clone(),
            })?;
        self.append(list)
    }

    /// Appends every row of `array`.
    pub(crate) fn append(
        &mut self,
        array: &FixedSizeListArray,
    ) -> Result<(), DenseMatrixProviderError> {
        let width = array_dimension(array)?;
        self.pin_dimension(width)?;
        copy_rows(array, width, self.rows, &mut self.values)?;
        self.rows += array.len();
        Ok(())
    }

    fn pin_dimension(&mut self, width: usize) -> Result<(), DenseMatrixProviderError> {
        match self.dimension {
            Some(expected) if expected != width => {
                Err(DenseMatrixProviderError::InconsistentBatchDimension {
                    expected,
                    actual: width,
                })
            }
            Some(_) => Ok(()),
            None => {
                self.dimension = Some(width);
                Ok(())
            }
        }
    }

    /// Returns `(rows, dimension, values)`.
    pub(crate) fn finish(self) -> (usize, usize, Vec<f32>) {
        (self.rows, self.dimension.unwrap_or(0), self.values)
    }
}

/// Copies the rows of `array` into `out`, numbering them from `first_row`
/// in error reports.
pub(crate) fn copy_rows(
    array: &FixedSizeListArray,
    dimension: usize,
    first_row: usize,
    out: &mut Vec<f32>,
) -> Result<(), DenseMatrixProviderError> {
    let rows = array.len();
    let additional = rows
        .checked_mul(dimension)
        .ok_or(DenseMatrixProviderError::CapacityOverflow { rows, dimension })?;
    out.reserve(additional);
    for (offset, row) in (first_row..).zip(0..rows) {
        if array.is_null(row) {
            return Err(DenseMatrixProviderError::NullRow { row: offset });
        }
        let cells = array.value(row);
        let floats = cells.as_any().downcast_ref::<Float32Array>().ok_or_else(|| {
            DenseMatrixProviderError::InvalidListValueType {
                actual: cells.data_type().clone(),
            }
        })?;
        if floats.len() != dimension {
            return Err(DenseMatrixProviderError::InvalidRowLength {
                row: offset,
                expected: dimension,
                actual: floats.len(),
            });
        }
        if let Some(value_index) = (0..dimension).find(|&idx| floats.is_null(idx)) {
            return Err(DenseMatrixProviderError::NullValue {
                row: offset,
                value_index,
            });
        }
        out.extend_from_slice(floats.values());
    }
    Ok(())
}
