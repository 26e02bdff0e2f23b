//! Dense `f32` vector providers for agglomerative clustering.
//!
//! [`DenseSource`] wraps rows held in memory, while [`DenseMatrixProvider`]
//! loads a contiguous row-major matrix from Arrow or Parquet. Both measure
//! distances with a [`DenseMetric`].

mod errors;
mod ingest;
mod metric;
mod provider;
mod source;

pub use errors::DenseMatrixProviderError;
pub use metric::DenseMetric;
pub use provider::DenseMatrixProvider;
pub use source::DenseSource;

#[cfg(test)]
mod tests;
