//! Builder utilities for configuring agglomerative clustering runs.
//!
//! Exposes the algorithm selection surface and the builder validation used
//! before constructing [`Agglo`] instances.

use std::{fmt, num::NonZeroUsize};

use crate::{Linkage, MAX_OBJECTS, PrototypeObjective, Result, agglo::Agglo, error::AggloError};

/// Selects the clustering algorithm [`Agglo`] runs.
///
/// Algorithms with a fixed criterion ignore the configured [`Linkage`]:
/// SLINK is single linkage, CLINK approximates complete linkage, the HDBSCAN
/// variants are single linkage over mutual reachability and the prototype
/// family uses its [`PrototypeObjective`].
///
/// # Examples
/// ```
/// use agglo_core::{Algorithm, PrototypeObjective};
///
/// assert_eq!(Algorithm::default(), Algorithm::Anderberg);
/// assert!(Algorithm::Agnes.uses_linkage());
/// assert!(!Algorithm::Medoid(PrototypeObjective::DistanceSum).uses_linkage());
/// assert_eq!(Algorithm::HdbscanPrim.to_string(), "hdbscan-prim");
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Algorithm {
    /// Naive agglomerative nesting, `O(n³)`.
    Agnes,
    /// Agglomerative nesting with a nearest-neighbour cache per row.
    #[default]
    Anderberg,
    /// Nearest-neighbour chains; exact only for reducible linkages.
    NnChain,
    /// Sibson's single-linkage algorithm in `O(n)` memory.
    Slink,
    /// Defays' approximate complete-linkage algorithm in `O(n)` memory.
    Clink,
    /// HDBSCAN hierarchy built with SLINK.
    HdbscanSlink,
    /// HDBSCAN hierarchy built from a Prim spanning tree.
    HdbscanPrim,
    /// Naive MiniMax linkage.
    MiniMax,
    /// MiniMax linkage with a nearest-neighbour cache.
    MiniMaxAnderberg,
    /// MiniMax linkage with nearest-neighbour chains.
    MiniMaxNnChain,
    /// Medoid linkage with the given prototype objective.
    Medoid(PrototypeObjective),
}

impl Algorithm {
    /// Short lowercase name used in logs and command-line output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Agnes => "agnes",
            Self::Anderberg => "anderberg",
            Self::NnChain => "nn-chain",
            Self::Slink => "slink",
            Self::Clink => "clink",
            Self::HdbscanSlink => "hdbscan-slink",
            Self::HdbscanPrim => "hdbscan-prim",
            Self::MiniMax => "minimax",
            Self::MiniMaxAnderberg => "minimax-anderberg",
            Self::MiniMaxNnChain => "minimax-nn-chain",
            Self::Medoid(_) => "medoid",
        }
    }

    /// Reports whether the configured [`Linkage`] affects this algorithm.
    #[must_use]
    pub const fn uses_linkage(self) -> bool {
        matches!(self, Self::Agnes | Self::Anderberg | Self::NnChain)
    }

    /// Reports whether the algorithm materialises the `O(n²)` distance
    /// matrix and is therefore bound by the object limit.
    #[must_use]
    pub const fn uses_matrix(self) -> bool {
        !matches!(
            self,
            Self::Slink | Self::Clink | Self::HdbscanSlink | Self::HdbscanPrim
        )
    }

    /// Reports whether the algorithm computes core distances from `min_pts`.
    #[must_use]
    pub const fn uses_min_pts(self) -> bool {
        matches!(self, Self::HdbscanSlink | Self::HdbscanPrim)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configures and constructs [`Agglo`] instances.
///
/// # Examples
/// ```
/// use agglo_core::{AggloBuilder, Algorithm, Linkage};
///
/// let agglo = AggloBuilder::new()
///     .with_algorithm(Algorithm::NnChain)
///     .with_linkage(Linkage::Ward)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(agglo.algorithm(), Algorithm::NnChain);
/// assert_eq!(agglo.linkage(), Linkage::Ward);
/// assert_eq!(agglo.min_pts().get(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct AggloBuilder {
    algorithm: Algorithm,
    linkage: Linkage,
    min_pts: usize,
    max_objects: usize,
}

impl Default for AggloBuilder {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            linkage: Linkage::default(),
            min_pts: 5,
            max_objects: MAX_OBJECTS,
        }
    }
}

impl AggloBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use agglo_core::{AggloBuilder, Algorithm, Linkage, MAX_OBJECTS};
    ///
    /// let builder = AggloBuilder::new();
    /// assert_eq!(builder.algorithm(), Algorithm::Anderberg);
    /// assert_eq!(builder.linkage(), Linkage::Single);
    /// assert_eq!(builder.min_pts(), 5);
    /// assert_eq!(builder.max_objects(), MAX_OBJECTS);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the clustering algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Returns the configured algorithm.
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Selects the linkage used by the Lance–Williams algorithms.
    ///
    /// # Examples
    /// ```
    /// use agglo_core::{AggloBuilder, Linkage};
    ///
    /// let builder = AggloBuilder::new().with_linkage(Linkage::GroupAverage);
    /// assert_eq!(builder.linkage(), Linkage::GroupAverage);
    /// ```
    #[must_use]
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Returns the configured linkage.
    #[must_use]
    pub fn linkage(&self) -> Linkage {
        self.linkage
    }

    /// Overrides the neighbourhood size used for HDBSCAN core distances.
    ///
    /// The object itself counts as its first neighbour.
    #[must_use]
    pub fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.min_pts = min_pts;
        self
    }

    /// Returns the configured neighbourhood size.
    #[must_use]
    pub fn min_pts(&self) -> usize {
        self.min_pts
    }

    /// Overrides the largest object count the matrix algorithms accept.
    ///
    /// # Examples
    /// ```
    /// use agglo_core::AggloBuilder;
    ///
    /// let builder = AggloBuilder::new().with_max_objects(1_000);
    /// assert_eq!(builder.max_objects(), 1_000);
    /// ```
    #[must_use]
    pub fn with_max_objects(mut self, max_objects: usize) -> Self {
        self.max_objects = max_objects;
        self
    }

    /// Returns the configured object limit.
    #[must_use]
    pub fn max_objects(&self) -> usize {
        self.max_objects
    }

    /// Validates the configuration and constructs an [`Agglo`] instance.
    ///
    /// # Errors
    /// Returns [`AggloError::InvalidMinPts`] when `min_pts` is zero,
    /// [`AggloError::InvalidFlexibleBeta`] when a flexible-beta coefficient is
    /// not finite and [`AggloError::InvalidObjectLimit`] when the object
    /// limit lies outside `1..=MAX_OBJECTS`.
    ///
    /// # Examples
    /// ```
    /// use agglo_core::{AggloBuilder, AggloError};
    ///
    /// let error = AggloBuilder::new().with_min_pts(0).build().unwrap_err();
    /// assert!(matches!(error, AggloError::InvalidMinPts { got: 0 }));
    /// ```
    pub fn build(self) -> Result<Agglo> {
        let min_pts = NonZeroUsize::new(self.min_pts).ok_or(AggloError::InvalidMinPts {
            got: self.min_pts,
        })?;

        if let Linkage::FlexibleBeta { beta } = self.linkage
            && !beta.is_finite()
        {
            return Err(AggloError::InvalidFlexibleBeta { beta });
        }

        if !(1..=MAX_OBJECTS).contains(&self.max_objects) {
            return Err(AggloError::InvalidObjectLimit {
                got: self.max_objects,
                max: MAX_OBJECTS,
            });
        }

        Ok(Agglo::new(
            self.algorithm,
            self.linkage,
            min_pts,
            self.max_objects,
        ))
    }
}
