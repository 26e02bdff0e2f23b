//! Prototype-based linkages: MiniMax and medoid linkage.
//!
//! The distance between two clusters is the objective value of the best
//! prototype for their union, which is not a function of the two clusters'
//! previous values. The working state therefore keeps the input distances,
//! the member list of every non-singleton cluster and the prototype behind
//! every matrix cell, and recomputes affected cells from scratch after a
//! merge.

use std::collections::HashMap;

use tracing::instrument;

use super::{
    MergeMatrix,
    driver::{self, Ties},
};
use crate::{
    DistanceQuery, HierarchyError, MAX_OBJECTS, MergeProgress, PointerHierarchy,
    PointerHierarchyBuilder, TriangularMatrix, progress::Ticker,
};

/// Quantity a cluster prototype minimises over the members of a merged
/// cluster.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum PrototypeObjective {
    /// Largest distance from the prototype to any member (MiniMax linkage).
    #[default]
    MaxDistance,
    /// Sum of distances from the prototype to all members.
    DistanceSum,
    /// Increase of the distance sum over the two clusters' previous sums.
    DistanceSumIncrease,
}

impl PrototypeObjective {
    /// Short lowercase name used in logs and command-line output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MaxDistance => "max-distance",
            Self::DistanceSum => "distance-sum",
            Self::DistanceSumIncrease => "distance-sum-increase",
        }
    }

    fn accumulate(self, total: f64, distance: f64) -> f64 {
        match self {
            Self::MaxDistance => total.max(distance),
            Self::DistanceSum | Self::DistanceSumIncrease => total + distance,
        }
    }
}

/// Working state of the prototype-based algorithms.
#[derive(Debug)]
pub(crate) struct PrototypeMatrix {
    objective: PrototypeObjective,
    distances: TriangularMatrix,
    values: TriangularMatrix,
    prototypes: Vec<usize>,
    members: HashMap<usize, Vec<usize>>,
    deviations: Option<Vec<f64>>,
}

impl PrototypeMatrix {
    pub(crate) fn load<D>(
        query: &D,
        objective: PrototypeObjective,
        limit: usize,
    ) -> Result<Self, HierarchyError>
    where
        D: DistanceQuery + ?Sized,
    {
        let distances = TriangularMatrix::from_query(query, limit, |distance| distance)?;
        let size = distances.size();
        let prototypes = (0..size).flat_map(|x| 0..x).collect();
        let deviations =
            (objective == PrototypeObjective::DistanceSumIncrease).then(|| vec![0.0; size]);
        Ok(Self {
            objective,
            values: distances.clone(),
            distances,
            prototypes,
            members: HashMap::new(),
            deviations,
        })
    }

    fn distance(&self, i: usize, j: usize) -> f64 {
        if i == j { 0.0 } else { self.distances.get(i, j) }
    }

    /// Accumulates the distances from `candidate` to `members` onto `total`,
    /// stopping as soon as the total reaches `bound`.
    fn accumulate_over(&self, candidate: usize, members: &[usize], mut total: f64, bound: f64) -> f64 {
        for &member in members {
            total = self
                .objective
                .accumulate(total, self.distance(candidate, member));
            if total >= bound {
                return total;
            }
        }
        total
    }

    /// Best prototype drawn from `own` for the union of `own` and `other`.
    fn search(&self, own: &[usize], other: &[usize], mut best: (f64, usize)) -> (f64, usize) {
        for &candidate in own {
            let partial = self.accumulate_over(candidate, other, 0.0, best.0);
            if partial >= best.0 {
                continue;
            }
            let total = self.accumulate_over(candidate, own, partial, best.0);
            if total < best.0 {
                best = (total, candidate);
            }
        }
        best
    }

    /// Best prototype for the union of `cluster` and the single object
    /// `singleton`.
    fn search_singleton(&self, cluster: &[usize], singleton: usize, fallback: usize) -> (f64, usize) {
        let mut best = (f64::INFINITY, fallback);
        let mut singleton_total = 0.0;
        for &candidate in cluster {
            let distance = self.distance(candidate, singleton);
            singleton_total = self.objective.accumulate(singleton_total, distance);
            if distance >= best.0 {
                continue;
            }
            let total = self.accumulate_over(candidate, cluster, distance, best.0);
            if total < best.0 {
                best = (total, candidate);
            }
        }
        if singleton_total < best.0 {
            best = (singleton_total, singleton);
        }
        best
    }

    /// Recomputes the cell between `other` and the cluster `survivor` that
    /// now holds `merged`.
    fn refresh(&mut self, other: usize, survivor: usize, merged: &[usize]) {
        let (x, y) = (other.max(survivor), other.min(survivor));
        let (mut value, prototype) = match self.members.get(&other) {
            Some(own) if other == x => {
                let best = self.search(own, merged, (f64::INFINITY, x));
                self.search(merged, own, best)
            }
            Some(own) => {
                let best = self.search(merged, own, (f64::INFINITY, x));
                self.search(own, merged, best)
            }
            None => self.search_singleton(merged, other, x),
        };
        if let Some(deviations) = &self.deviations {
            value -= deviations[x] + deviations[y];
        }
        let offset = self.values.offset(x, y);
        self.values.set(x, y, value);
        self.prototypes[offset] = prototype;
    }
}

impl MergeMatrix for PrototypeMatrix {
    fn matrix(&self) -> &TriangularMatrix {
        &self.values
    }

    fn merge(&mut self, builder: &mut PointerHierarchyBuilder, x: usize, y: usize, end: usize) {
        let offset = self.values.offset(x, y);
        let value = self.values.get(x, y);
        let prototype = self.prototypes[offset];

        let mut merged = self.members.remove(&y).unwrap_or_else(|| vec![y]);
        match self.members.remove(&x) {
            Some(absorbed) => merged.extend(absorbed),
            None => merged.push(x),
        }
        if let Some(deviations) = self.deviations.as_mut() {
            deviations[y] = value + deviations[x] + deviations[y];
        }

        builder.strict_add_with_prototype(x, value, y, prototype);
        for j in 0..end {
            if j == y || builder.is_linked(j) {
                continue;
            }
            self.refresh(j, y, &merged);
        }
        self.members.insert(y, merged);
    }
}

#[derive(Clone, Copy, Debug)]
enum Search {
    Exhaustive,
    NearestCache,
    Chain,
}

fn cluster<D>(
    query: &D,
    objective: PrototypeObjective,
    max_objects: usize,
    search: Search,
    progress: Option<&mut dyn MergeProgress>,
) -> Result<PointerHierarchy, HierarchyError>
where
    D: DistanceQuery + ?Sized,
{
    let size = query.len();
    let mut state = PrototypeMatrix::load(query, objective, max_objects)?;
    let mut builder = PointerHierarchyBuilder::with_prototypes(size, query.is_squared());
    let mut ticker = Ticker::new(progress, size.saturating_sub(1));
    match search {
        Search::Exhaustive => driver::naive(&mut state, &mut builder, &mut ticker, Ties::PreferFirst),
        Search::NearestCache => driver::nearest_cache(&mut state, &mut builder, &mut ticker),
        Search::Chain => driver::nn_chain(&mut state, &mut builder, &mut ticker),
    }
    Ok(builder.complete())
}

/// MiniMax linkage by exhaustive search of the active triangle.
///
/// The merge distance of two clusters is the smallest, over all candidate
/// prototypes in their union, of the largest distance from the candidate to
/// any member. Every merge records the prototype of the new cluster.
///
/// Of several pairs at the same value, the first one scanned merges. The
/// cached and chained variants may pick another tied pair. MiniMax values
/// are input distances, so ties are common and their trees can differ.
///
/// # Examples
/// ```
/// use agglo_core::{DistanceQuery, DistanceQueryError, MiniMax};
///
/// struct Plane(Vec<(f64, f64)>);
///
/// impl DistanceQuery for Plane {
///     fn len(&self) -> usize { self.0.len() }
///     fn name(&self) -> &str { "plane" }
///     fn distance(&self, i: usize, j: usize) -> Result<f64, DistanceQueryError> {
///         let ((ax, ay), (bx, by)) = (self.0[i], self.0[j]);
///         Ok((ax - bx).hypot(ay - by))
///     }
/// }
///
/// let triangle = Plane(vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
/// let hierarchy = MiniMax::new().run(&triangle, None)?;
/// assert_eq!(hierarchy.prototypes(), Some(&[0, 0, 0][..]));
/// assert_eq!(hierarchy.distances(), &[f64::INFINITY, 1.0, 1.0]);
/// # Ok::<(), agglo_core::HierarchyError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MiniMax {
    max_objects: usize,
}

impl Default for MiniMax {
    fn default() -> Self {
        Self::new()
    }
}

impl MiniMax {
    /// Creates the algorithm with the default object limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_objects: MAX_OBJECTS,
        }
    }

    /// Overrides the largest object count accepted before allocation.
    #[must_use]
    pub fn with_max_objects(mut self, max_objects: usize) -> Self {
        self.max_objects = max_objects;
        self
    }

    /// Clusters every object of `query`.
    ///
    /// # Errors
    /// Returns [`HierarchyError::TooManyObjects`] when the query exceeds the
    /// object limit and [`HierarchyError::Query`] when a distance lookup
    /// fails.
    #[instrument(
        name = "core.minimax",
        skip(self, query, progress),
        fields(objects = query.len(), linkage = "minimax"),
    )]
    pub fn run<D>(
        &self,
        query: &D,
        progress: Option<&mut dyn MergeProgress>,
    ) -> Result<PointerHierarchy, HierarchyError>
    where
        D: DistanceQuery + ?Sized,
    {
        cluster(
            query,
            PrototypeObjective::MaxDistance,
            self.max_objects,
            Search::Exhaustive,
            progress,
        )
    }
}

/// MiniMax linkage driven by a nearest-neighbour cache.
///
/// Matches [`MiniMax`] on merge heights when no two cluster pairs tie;
/// tied pairs may merge in a different order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MiniMaxAnderberg {
    max_objects: usize,
}

impl Default for MiniMaxAnderberg {
    fn default() -> Self {
        Self::new()
    }
}

impl MiniMaxAnderberg {
    /// Creates the algorithm with the default object limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_objects: MAX_OBJECTS,
        }
    }

    /// Overrides the largest object count accepted before allocation.
    #[must_use]
    pub fn with_max_objects(mut self, max_objects: usize) -> Self {
        self.max_objects = max_objects;
        self
    }

    /// Clusters every object of `query`.
    ///
    /// # Errors
    /// Returns [`HierarchyError::TooManyObjects`] when the query exceeds the
    /// object limit and [`HierarchyError::Query`] when a distance lookup
    /// fails.
    #[instrument(
        name = "core.minimax_anderberg",
        skip(self, query, progress),
        fields(objects = query.len(), linkage = "minimax"),
    )]
    pub fn run<D>(
        &self,
        query: &D,
        progress: Option<&mut dyn MergeProgress>,
    ) -> Result<PointerHierarchy, HierarchyError>
    where
        D: DistanceQuery + ?Sized,
    {
        cluster(
            query,
            PrototypeObjective::MaxDistance,
            self.max_objects,
            Search::NearestCache,
            progress,
        )
    }
}

/// MiniMax linkage driven by nearest-neighbour chains.
///
/// Tied pairs may merge in a different order than under [`MiniMax`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MiniMaxNnChain {
    max_objects: usize,
}

impl Default for MiniMaxNnChain {
    fn default() -> Self {
        Self::new()
    }
}

impl MiniMaxNnChain {
    /// Creates the algorithm with the default object limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_objects: MAX_OBJECTS,
        }
    }

    /// Overrides the largest object count accepted before allocation.
    #[must_use]
    pub fn with_max_objects(mut self, max_objects: usize) -> Self {
        self.max_objects = max_objects;
        self
    }

    /// Clusters every object of `query`.
    ///
    /// # Errors
    /// Returns [`HierarchyError::TooManyObjects`] when the query exceeds the
    /// object limit and [`HierarchyError::Query`] when a distance lookup
    /// fails.
    #[instrument(
        name = "core.minimax_nn_chain",
        skip(self, query, progress),
        fields(objects = query.len(), linkage = "minimax"),
    )]
    pub fn run<D>(
        &self,
        query: &D,
        progress: Option<&mut dyn MergeProgress>,
    ) -> Result<PointerHierarchy, HierarchyError>
    where
        D: DistanceQuery + ?Sized,
    {
        cluster(
            query,
            PrototypeObjective::MaxDistance,
            self.max_objects,
            Search::Chain,
            progress,
        )
    }
}

/// Hierarchical clustering around medoids.
///
/// Generalises MiniMax to any [`PrototypeObjective`] and runs on the
/// nearest-neighbour cache. With [`PrototypeObjective::DistanceSumIncrease`]
/// the recorded merge heights are increases in total deviation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Medoid {
    objective: PrototypeObjective,
    max_objects: usize,
}

impl Medoid {
    /// Creates the algorithm for `objective` with the default object limit.
    #[must_use]
    pub fn new(objective: PrototypeObjective) -> Self {
        Self {
            objective,
            max_objects: MAX_OBJECTS,
        }
    }

    /// Overrides the largest object count accepted before allocation.
    #[must_use]
    pub fn with_max_objects(mut self, max_objects: usize) -> Self {
        self.max_objects = max_objects;
        self
    }

    /// Objective minimised by the prototypes.
    #[must_use]
    #[rustfmt::skip]
    pub fn objective(&self) -> PrototypeObjective { self.objective }

    /// Clusters every object of `query`.
    ///
    /// # Errors
    /// Returns [`HierarchyError::TooManyObjects`] when the query exceeds the
    /// object limit and [`HierarchyError::Query`] when a distance lookup
    /// fails.
    #[instrument(
        name = "core.medoid",
        skip(self, query, progress),
        fields(objects = query.len(), objective = self.objective.name()),
    )]
    pub fn run<D>(
        &self,
        query: &D,
        progress: Option<&mut dyn MergeProgress>,
    ) -> Result<PointerHierarchy, HierarchyError>
    where
        D: DistanceQuery + ?Sized,
    {
        cluster(
            query,
            self.objective,
            self.max_objects,
            Search::NearestCache,
            progress,
        )
    }
}
