//! Benchmark setup error type.
//!
//! Aggregates the errors that may arise during benchmark data preparation so
//! that setup functions can propagate failures with `?` instead of using
//! `.expect()`.

use agglo_core::HierarchyError;

use crate::source::SyntheticError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic data generation failed.
    #[error("synthetic source generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// A hierarchy algorithm failed.
    #[error("hierarchy construction failed: {0}")]
    Hierarchy(#[from] HierarchyError),
    /// A zero value was passed where a non-zero integer was required.
    #[error("expected a non-zero value for {context}")]
    ZeroValue {
        /// A description of the parameter that was unexpectedly zero.
        context: &'static str,
    },
}
