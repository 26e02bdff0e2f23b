//! Distance metrics over dense `f32` rows.

use std::fmt;

/// Metric applied to pairs of dense rows.
///
/// Accumulation happens in `f64` so long rows do not lose precision before
/// the linkage arithmetic sees them.
///
/// # Examples
/// ```
/// use agglo_providers_dense::DenseMetric;
///
/// assert!(!DenseMetric::Euclidean.is_squared());
/// assert!(DenseMetric::SquaredEuclidean.is_squared());
/// assert_eq!(DenseMetric::default(), DenseMetric::Euclidean);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum DenseMetric {
    /// Straight-line distance.
    #[default]
    Euclidean,
    /// Squared straight-line distance, as Ward linkage expects.
    SquaredEuclidean,
}

impl DenseMetric {
    /// Returns the kebab-case metric name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::SquaredEuclidean => "squared-euclidean",
        }
    }

    /// Reports whether distances under this metric are already squared.
    #[must_use]
    pub const fn is_squared(self) -> bool {
        matches!(self, Self::SquaredEuclidean)
    }

    /// Measures two rows of equal length.
    pub(crate) fn measure(self, left: &[f32], right: &[f32]) -> f64 {
        debug_assert_eq!(left.len(), right.len());
        let sum = left
            .iter()
            .zip(right)
            .map(|(&a, &b)| {
                let diff = f64::from(a) - f64::from(b);
                diff * diff
            })
            .sum::<f64>();
        match self {
            Self::Euclidean => sum.sqrt(),
            Self::SquaredEuclidean => sum,
        }
    }
}

impl fmt::Display for DenseMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
