//! Benchmark parameter types.
//!
//! Criterion labels each measurement with the `Display` form of these
//! structs.

use std::fmt;

/// Parameters for a linkage benchmark run.
#[derive(Clone, Debug)]
pub struct LinkageBenchParams {
    /// Number of points in the dataset.
    pub point_count: usize,
}

impl fmt::Display for LinkageBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={}", self.point_count)
    }
}

/// Parameters for a density-based benchmark run.
#[derive(Clone, Debug)]
pub struct DensityBenchParams {
    /// Number of points in the dataset.
    pub point_count: usize,
    /// Neighbourhood size used for core distances.
    pub min_pts: usize,
}

impl fmt::Display for DensityBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},min_pts={}", self.point_count, self.min_pts)
    }
}
