//! Lance–Williams linkage criteria.
//!
//! Every linkage maps raw distances into an internal scale with
//! [`Linkage::initial`], combines the distances of two merged clusters to a
//! third one with [`Linkage::combine`], and maps merge heights back with
//! [`Linkage::restore`] when they are recorded in the hierarchy.

use std::fmt;

/// Linkage criterion applied by the matrix-based algorithms.
///
/// # Examples
/// ```
/// use agglo_core::Linkage;
///
/// let ward = Linkage::Ward;
/// let internal = ward.initial(3.0, false);
/// assert_eq!(internal, 4.5);
/// assert_eq!(ward.restore(internal, false), 3.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Linkage {
    /// Minimum distance between members.
    #[default]
    Single,
    /// Maximum distance between members.
    Complete,
    /// Size-weighted mean distance between members (UPGMA).
    GroupAverage,
    /// Unweighted mean of the two merged clusters' distances (WPGMA).
    WeightedAverage,
    /// Squared distance between cluster centroids (UPGMC).
    Centroid,
    /// Squared distance between cluster medians (WPGMC).
    Median,
    /// Increase of within-cluster sum of squares.
    Ward,
    /// Increase of within-cluster variance.
    MinimumVariance,
    /// Lance–Williams flexible strategy with coefficient `beta`.
    FlexibleBeta {
        /// Weight of the merged pair's own distance, usually in `[-1, 1)`.
        beta: f64,
    },
}

impl Linkage {
    /// Conventional coefficient for [`Linkage::FlexibleBeta`].
    pub const DEFAULT_FLEXIBLE_BETA: f64 = -0.25;

    /// Flexible-beta linkage with the conventional coefficient.
    #[must_use]
    pub const fn flexible() -> Self {
        Self::FlexibleBeta {
            beta: Self::DEFAULT_FLEXIBLE_BETA,
        }
    }

    /// Maps a raw input distance into the matrix's internal scale.
    #[must_use]
    pub fn initial(self, distance: f64, squared: bool) -> f64 {
        let square = if squared { distance } else { distance * distance };
        match self {
            Self::Centroid | Self::Median => square,
            Self::Ward => 0.5 * square,
            Self::MinimumVariance => 0.25 * square,
            Self::Single
            | Self::Complete
            | Self::GroupAverage
            | Self::WeightedAverage
            | Self::FlexibleBeta { .. } => distance,
        }
    }

    /// Maps an internal merge height back to the reported distance scale.
    #[must_use]
    pub fn restore(self, distance: f64, squared: bool) -> f64 {
        let scaled = match self {
            Self::Ward => 2.0 * distance,
            Self::MinimumVariance => 4.0 * distance,
            Self::Centroid | Self::Median => distance,
            Self::Single
            | Self::Complete
            | Self::GroupAverage
            | Self::WeightedAverage
            | Self::FlexibleBeta { .. } => return distance,
        };
        if squared { scaled } else { scaled.sqrt() }
    }

    /// Distance from the union of clusters `x` and `y` to a third cluster `j`.
    ///
    /// `dx` and `dy` are the current distances from `x` and `y` to `j`, `dxy`
    /// is the distance at which `x` and `y` merge, and the sizes count the
    /// objects in each cluster.
    #[must_use]
    pub fn combine(
        self,
        size_x: usize,
        dx: f64,
        size_y: usize,
        dy: f64,
        size_j: usize,
        dxy: f64,
    ) -> f64 {
        match self {
            Self::Single => dx.min(dy),
            Self::Complete => dx.max(dy),
            Self::GroupAverage => {
                let (wx, wy) = (weight(size_x), weight(size_y));
                (wx * dx + wy * dy) / (wx + wy)
            }
            Self::WeightedAverage => 0.5 * (dx + dy),
            Self::Centroid => {
                let (wx, wy) = (weight(size_x), weight(size_y));
                let f = 1.0 / (wx + wy);
                (wx * dx + wy * dy) * f - wx * wy * dxy * f * f
            }
            Self::Median => 0.5 * (dx + dy) - 0.25 * dxy,
            Self::Ward => {
                let (wx, wy, wj) = (weight(size_x), weight(size_y), weight(size_j));
                ((wx + wj) * dx + (wy + wj) * dy - wj * dxy) / (wx + wy + wj)
            }
            Self::MinimumVariance => {
                let (wx, wy, wj) = (weight(size_x), weight(size_y), weight(size_j));
                let (xj, yj, n) = (wx + wj, wy + wj, wx + wy + wj);
                (xj * xj * dx + yj * yj * dy - (wx + wy) * wj * dxy) / (n * n)
            }
            Self::FlexibleBeta { beta } => 0.5 * (1.0 - beta) * (dx + dy) + beta * dxy,
        }
    }

    /// Whether merging reciprocal nearest neighbours in any order yields the
    /// same hierarchy as always merging the globally closest pair.
    ///
    /// Minimum variance and flexible beta with a nonzero coefficient depend
    /// on the order of independent merges; a zero coefficient reduces
    /// flexible beta to the weighted average.
    ///
    /// # Examples
    /// ```
    /// use agglo_core::Linkage;
    ///
    /// assert!(Linkage::Ward.is_reducible());
    /// assert!(!Linkage::Centroid.is_reducible());
    /// assert!(!Linkage::flexible().is_reducible());
    /// ```
    #[must_use]
    pub fn is_reducible(self) -> bool {
        match self {
            Self::Centroid | Self::Median | Self::MinimumVariance => false,
            Self::FlexibleBeta { beta } => beta == 0.0,
            Self::Single
            | Self::Complete
            | Self::GroupAverage
            | Self::WeightedAverage
            | Self::Ward => true,
        }
    }

    /// Short lowercase name used in logs and command-line output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Complete => "complete",
            Self::GroupAverage => "group-average",
            Self::WeightedAverage => "weighted-average",
            Self::Centroid => "centroid",
            Self::Median => "median",
            Self::Ward => "ward",
            Self::MinimumVariance => "minimum-variance",
            Self::FlexibleBeta { .. } => "flexible-beta",
        }
    }
}

impl fmt::Display for Linkage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FlexibleBeta { beta } => write!(f, "{}({beta})", self.name()),
            _ => f.write_str(self.name()),
        }
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "cluster sizes are bounded by the matrix object limit"
)]
fn weight(size: usize) -> f64 {
    size as f64
}
