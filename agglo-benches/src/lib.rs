//! Benchmark support crate for the agglomerative clustering algorithms.
//!
//! Provides a seeded synthetic [`DistanceQuery`](agglo_core::DistanceQuery)
//! and the parameter types used by the Criterion benchmarks.

pub mod error;
pub mod params;
pub mod source;
