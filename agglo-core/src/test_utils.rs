//! Shared test utilities for `agglo-core`.

use agglo_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::{error::DistanceQueryError, query::DistanceQuery};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

/// Builds a standard proptest configuration from the shared CI profile.
///
/// This keeps property suites aligned on the same `PROGTEST_CASES` and
/// `AGGLO_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// [`DistanceQuery`] over points on a line that records distance
/// invocations for tests.
#[derive(Clone)]
pub(crate) struct CountingSource {
    data: Vec<f64>,
    calls: Arc<AtomicUsize>,
    name: &'static str,
}

impl CountingSource {
    /// Creates a counting source with the default "counting" name.
    #[must_use]
    pub(crate) fn new(data: Vec<f64>, calls: Arc<AtomicUsize>) -> Self {
        Self::with_name("counting", data, calls)
    }

    /// Creates a counting source with a specific display name.
    #[must_use]
    pub(crate) fn with_name(name: &'static str, data: Vec<f64>, calls: Arc<AtomicUsize>) -> Self {
        Self { data, calls, name }
    }

    /// Returns the backing distance counter for assertions.
    #[must_use]
    pub(crate) fn calls(&self) -> &Arc<AtomicUsize> {
        &self.calls
    }
}

impl DistanceQuery for CountingSource {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn name(&self) -> &str {
        self.name
    }

    fn distance(&self, left: usize, right: usize) -> Result<f64, DistanceQueryError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let a = self
            .data
            .get(left)
            .ok_or(DistanceQueryError::OutOfBounds { index: left })?;
        let b = self
            .data
            .get(right)
            .ok_or(DistanceQueryError::OutOfBounds { index: right })?;
        Ok((a - b).abs())
    }
}

/// Points on a line without call accounting.
pub(crate) fn line(data: &[f64]) -> CountingSource {
    CountingSource::with_name("line", data.to_vec(), Arc::new(AtomicUsize::new(0)))
}

/// Euclidean points in the plane.
#[derive(Clone, Debug)]
pub(crate) struct PlaneSource {
    points: Vec<(f64, f64)>,
    squared: bool,
}

impl PlaneSource {
    pub(crate) fn new(points: Vec<(f64, f64)>) -> Self {
        Self {
            points,
            squared: false,
        }
    }

    /// Same points, reporting squared Euclidean distances.
    pub(crate) fn squared(points: Vec<(f64, f64)>) -> Self {
        Self {
            points,
            squared: true,
        }
    }
}

impl DistanceQuery for PlaneSource {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn name(&self) -> &str {
        "plane"
    }

    fn distance(&self, left: usize, right: usize) -> Result<f64, DistanceQueryError> {
        let (ax, ay) = *self
            .points
            .get(left)
            .ok_or(DistanceQueryError::OutOfBounds { index: left })?;
        let (bx, by) = *self
            .points
            .get(right)
            .ok_or(DistanceQueryError::OutOfBounds { index: right })?;
        let square = (ax - bx).powi(2) + (ay - by).powi(2);
        Ok(if self.squared { square } else { square.sqrt() })
    }

    fn is_squared(&self) -> bool {
        self.squared
    }
}
