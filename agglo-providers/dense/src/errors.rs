use arrow_schema::{ArrowError, DataType};
use thiserror::Error;

/// Errors raised while loading a [`DenseMatrixProvider`](crate::DenseMatrixProvider).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DenseMatrixProviderError {
    /// The schema has no column with the requested name.
    #[error("no column named `{column}`")]
    ColumnNotFound { column: String },
    #[error("column `{column}` holds {actual}, expected FixedSizeList<Float32, D>")]
    InvalidColumnType { column: String, actual: DataType },
    #[error("vector elements must be Float32, found {actual}")]
    InvalidListValueType { actual: DataType },
    /// Zero or negative list width.
    #[error("vector width must be positive, found {actual}")]
    InvalidDimension { actual: i32 },
    /// The schema admits null rows or null elements.
    #[error("column `{column}` must not be nullable (nullable child: {nullable_child})")]
    NullableField {
        column: String,
        nullable_child: bool,
    },
    #[error("row {row} is null")]
    NullRow { row: usize },
    #[error("row {row} has a null at position {value_index}")]
    NullValue { row: usize, value_index: usize },
    #[error("row {row} holds {actual} values, expected {expected}")]
    InvalidRowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("{rows} rows of width {dimension} overflow the address space")]
    CapacityOverflow { rows: usize, dimension: usize },
    /// A later batch declared a different vector width than the first.
    #[error("batch width {actual} differs from the first batch's width {expected}")]
    InconsistentBatchDimension { expected: usize, actual: usize },
    #[error("arrow: {0}")]
    Arrow(#[from] ArrowError),
    #[error("parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
}
