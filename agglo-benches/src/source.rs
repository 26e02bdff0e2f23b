//! Synthetic data source for benchmarking.
//!
//! Provides [`SyntheticSource`], a [`DistanceQuery`] over pre-generated
//! N-dimensional `f32` vectors with Euclidean distance. Data is seeded for
//! reproducibility across benchmark runs.

use agglo_core::{DistanceQuery, DistanceQueryError};
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Errors that may occur during synthetic source generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyntheticError {
    /// The requested point count was zero.
    #[error("point count must be greater than zero")]
    ZeroPoints,
    /// The requested dimension count was zero.
    #[error("dimension count must be greater than zero")]
    ZeroDimensions,
    /// `point_count * dimensions` does not fit in memory.
    #[error("{point_count} points of dimension {dimensions} overflow usize")]
    Overflow {
        /// Requested number of points.
        point_count: usize,
        /// Requested dimensionality.
        dimensions: usize,
    },
}

/// Configuration for synthetic vector generation.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    /// Number of points to generate.
    pub point_count: usize,
    /// Dimensionality of each vector.
    pub dimensions: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// A [`DistanceQuery`] of uniform random vectors in the unit hypercube.
///
/// Vectors are stored in a flat row-major `Vec<f32>` and generated eagerly
/// from a seeded RNG.
///
/// # Examples
///
/// ```
/// use agglo_benches::source::{SyntheticConfig, SyntheticSource};
/// use agglo_core::DistanceQuery;
///
/// let config = SyntheticConfig { point_count: 10, dimensions: 4, seed: 42 };
/// let source = SyntheticSource::generate(&config).expect("valid config");
/// assert_eq!(source.len(), 10);
/// ```
#[derive(Clone, Debug)]
pub struct SyntheticSource {
    data: Vec<f32>,
    point_count: usize,
    dimensions: usize,
}

impl SyntheticSource {
    /// Generates vectors eagerly from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SyntheticError::ZeroPoints`] if `point_count` is zero,
    /// [`SyntheticError::ZeroDimensions`] if `dimensions` is zero, or
    /// [`SyntheticError::Overflow`] if the buffer size overflows.
    pub fn generate(config: &SyntheticConfig) -> Result<Self, SyntheticError> {
        if config.point_count == 0 {
            return Err(SyntheticError::ZeroPoints);
        }
        if config.dimensions == 0 {
            return Err(SyntheticError::ZeroDimensions);
        }

        let total = config
            .point_count
            .checked_mul(config.dimensions)
            .ok_or(SyntheticError::Overflow {
                point_count: config.point_count,
                dimensions: config.dimensions,
            })?;
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let data: Vec<f32> = (0..total)
            .map(|_| rng.gen_range(0.0_f32..1.0_f32))
            .collect();

        Ok(Self {
            data,
            point_count: config.point_count,
            dimensions: config.dimensions,
        })
    }

    /// Returns the dimensionality of each vector.
    #[must_use]
    pub const fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn row(&self, index: usize) -> Result<&[f32], DistanceQueryError> {
        if index >= self.point_count {
            return Err(DistanceQueryError::OutOfBounds { index });
        }
        let start = index
            .checked_mul(self.dimensions)
            .ok_or(DistanceQueryError::OutOfBounds { index })?;
        let end = start
            .checked_add(self.dimensions)
            .ok_or(DistanceQueryError::OutOfBounds { index })?;
        self.data
            .get(start..end)
            .ok_or(DistanceQueryError::OutOfBounds { index })
    }
}

impl DistanceQuery for SyntheticSource {
    fn len(&self) -> usize {
        self.point_count
    }

    #[expect(
        clippy::unnecessary_literal_bound,
        reason = "DistanceQuery trait constrains the return type to &str"
    )]
    fn name(&self) -> &str {
        "synthetic"
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "Euclidean distance requires arithmetic on float values"
    )]
    fn distance(&self, left: usize, right: usize) -> Result<f64, DistanceQueryError> {
        let left_vec = self.row(left)?;
        let right_vec = self.row(right)?;
        let sum_sq = left_vec
            .iter()
            .zip(right_vec)
            .fold(0.0_f64, |acc, (&a, &b)| {
                let diff = f64::from(a) - f64::from(b);
                acc + diff * diff
            });
        Ok(sum_sq.sqrt())
    }
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    reason = "distance comparison assertions require float arithmetic"
)]
mod tests {
    use super::*;
    use agglo_core::{Agnes, Linkage, NnChain, Slink};
    use rstest::rstest;

    fn default_config(point_count: usize, dimensions: usize) -> SyntheticConfig {
        SyntheticConfig {
            point_count,
            dimensions,
            seed: 42,
        }
    }

    fn source(point_count: usize, dimensions: usize) -> SyntheticSource {
        SyntheticSource::generate(&default_config(point_count, dimensions))
            .expect("generation must succeed")
    }

    // -- happy path: generation -------------------------------------------

    #[rstest]
    #[case::small(10, 4)]
    #[case::medium(100, 16)]
    fn generates_correct_point_count(#[case] point_count: usize, #[case] dimensions: usize) {
        let generated = source(point_count, dimensions);
        assert_eq!(generated.len(), point_count);
        assert_eq!(generated.dimensions(), dimensions);
        assert!(!generated.is_empty());
        assert_eq!(generated.name(), "synthetic");
    }

    // -- happy path: distance properties ----------------------------------

    #[rstest]
    fn distance_is_a_metric_on_samples() {
        let generated = source(12, 8);
        for i in 0..generated.len() {
            assert_eq!(generated.distance(i, i).expect("distance"), 0.0);
            for j in 0..generated.len() {
                let d_ij = generated.distance(i, j).expect("distance");
                let d_ji = generated.distance(j, i).expect("distance");
                assert!(d_ij >= 0.0);
                assert_eq!(d_ij, d_ji, "distance must be symmetric for ({i},{j})");
            }
        }
        let d_ab = generated.distance(0, 1).expect("distance");
        let d_bc = generated.distance(1, 2).expect("distance");
        let d_ac = generated.distance(0, 2).expect("distance");
        assert!(d_ac <= d_ab + d_bc + 1e-12);
    }

    // -- happy path: determinism ------------------------------------------

    #[rstest]
    #[case::same_seed(42, true)]
    #[case::other_seed(7, false)]
    fn seeds_control_the_data(#[case] seed: u64, #[case] identical: bool) {
        let base = source(50, 8);
        let other = SyntheticSource::generate(&SyntheticConfig {
            point_count: 50,
            dimensions: 8,
            seed,
        })
        .expect("generation must succeed");
        let d_a = base.distance(0, 1).expect("distance must succeed");
        let d_b = other.distance(0, 1).expect("distance must succeed");
        assert_eq!(d_a == d_b, identical);
    }

    // -- unhappy path: generation errors ----------------------------------

    #[rstest]
    #[case::zero_points(0, 8, SyntheticError::ZeroPoints)]
    #[case::zero_dimensions(10, 0, SyntheticError::ZeroDimensions)]
    #[case::overflow(usize::MAX, 2, SyntheticError::Overflow { point_count: usize::MAX, dimensions: 2 })]
    fn rejects_invalid_configs(
        #[case] point_count: usize,
        #[case] dimensions: usize,
        #[case] expected: SyntheticError,
    ) {
        let err = SyntheticSource::generate(&default_config(point_count, dimensions))
            .expect_err("config must be rejected");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case::left(10, 0)]
    #[case::right(0, 10)]
    fn rejects_out_of_bounds_index(#[case] left: usize, #[case] right: usize) {
        let err = source(5, 4)
            .distance(left, right)
            .expect_err("out-of-bounds index must be rejected");
        assert!(matches!(err, DistanceQueryError::OutOfBounds { index: 10 }));
    }

    // -- benchmarked algorithms agree on the synthetic data ---------------

    #[rstest]
    fn benchmarked_single_linkage_algorithms_agree() {
        let generated = source(40, 4);
        let mut expected = Slink::new()
            .run(&generated, None)
            .expect("slink must succeed")
            .merges()
            .iter()
            .map(|merge| merge.distance())
            .collect::<Vec<_>>();
        expected.sort_by(f64::total_cmp);

        for hierarchy in [
            Agnes::new(Linkage::Single).run(&generated, None),
            NnChain::new(Linkage::Single).run(&generated, None),
        ] {
            let mut heights = hierarchy
                .expect("matrix algorithms must succeed")
                .merges()
                .iter()
                .map(|merge| merge.distance())
                .collect::<Vec<_>>();
            heights.sort_by(f64::total_cmp);
            assert_eq!(heights.len(), expected.len());
            for (actual, want) in heights.iter().zip(&expected) {
                assert!((actual - want).abs() < 1e-9);
            }
        }
    }
}
