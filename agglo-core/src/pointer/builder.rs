//! Mutable accumulator for merges recorded by the matrix-based algorithms.

use super::hierarchy::{PointerHierarchy, UNMERGED};

/// Records merges as an algorithm performs them.
///
/// Each merge rewrites the child's parent pointer, stores the merge distance
/// and stamps the merge with its 0-based sequence number. Cluster sizes are
/// tracked per surviving representative and discarded by
/// [`complete`](Self::complete).
///
/// # Examples
/// ```
/// use agglo_core::PointerHierarchyBuilder;
///
/// let mut builder = PointerHierarchyBuilder::new(3, false);
/// builder.add(2, 1.0, 1);
/// builder.set_size(1, 2);
/// builder.add(1, 4.0, 0);
///
/// let hierarchy = builder.complete();
/// assert_eq!(hierarchy.parents(), &[0, 0, 1]);
/// assert_eq!(hierarchy.merge_order(), Some(&[usize::MAX, 1, 0][..]));
/// ```
#[derive(Debug, Clone)]
pub struct PointerHierarchyBuilder {
    parent: Vec<usize>,
    distance: Vec<f64>,
    order: Vec<usize>,
    prototypes: Option<Vec<usize>>,
    sizes: Vec<usize>,
    merges: usize,
    squared: bool,
}

impl PointerHierarchyBuilder {
    /// Creates a builder for `objects` unmerged objects.
    ///
    /// `squared` records whether the merge distances are squared values.
    #[must_use]
    pub fn new(objects: usize, squared: bool) -> Self {
        Self {
            parent: (0..objects).collect(),
            distance: vec![f64::INFINITY; objects],
            order: vec![UNMERGED; objects],
            prototypes: None,
            sizes: vec![1; objects],
            merges: 0,
            squared,
        }
    }

    /// Creates a builder that also records a prototype object per merge.
    #[must_use]
    pub fn with_prototypes(objects: usize, squared: bool) -> Self {
        let mut builder = Self::new(objects, squared);
        builder.prototypes = Some((0..objects).collect());
        builder
    }

    /// Number of objects tracked by the builder.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.parent.len() }

    /// Whether the builder tracks no objects.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.parent.is_empty() }

    /// Number of merges recorded so far.
    #[must_use]
    #[rustfmt::skip]
    pub fn merge_count(&self) -> usize { self.merges }

    /// Links `child` under `parent` at `distance`.
    pub fn add(&mut self, child: usize, distance: f64, parent: usize) {
        debug_assert!(!self.is_linked(child), "object {child} is already linked");
        debug_assert!(child != parent, "an object cannot merge with itself");
        self.parent[child] = parent;
        self.distance[child] = distance;
        self.order[child] = self.merges;
        self.merges += 1;
    }

    /// Like [`add`](Self::add), for algorithms that always keep the smaller
    /// index as the survivor.
    pub fn strict_add(&mut self, child: usize, distance: f64, parent: usize) {
        debug_assert!(child > parent, "the larger index must join the smaller");
        self.add(child, distance, parent);
    }

    /// Like [`strict_add`](Self::strict_add), additionally recording the
    /// object chosen as prototype of the merged cluster.
    ///
    /// The prototype is dropped when the builder was created without
    /// prototype storage.
    pub fn strict_add_with_prototype(
        &mut self,
        child: usize,
        distance: f64,
        parent: usize,
        prototype: usize,
    ) {
        self.strict_add(child, distance, parent);
        if let Some(prototypes) = self.prototypes.as_mut() {
            prototypes[child] = prototype;
        }
    }

    /// Whether `object` has already joined a parent.
    #[must_use]
    pub fn is_linked(&self, object: usize) -> bool {
        self.parent[object] != object
    }

    /// Parent of `object`, or `None` while it is still unmerged.
    pub(crate) fn parent(&self, object: usize) -> Option<usize> {
        let parent = self.parent[object];
        (parent != object).then_some(parent)
    }

    /// Current size of the cluster represented by `object`.
    #[must_use]
    pub fn size(&self, object: usize) -> usize {
        self.sizes[object]
    }

    /// Overwrites the cluster size of representative `object`.
    pub fn set_size(&mut self, object: usize, size: usize) {
        self.sizes[object] = size;
    }

    /// Finalises the builder into an immutable hierarchy.
    ///
    /// A `warn` event is emitted when the number of recorded merges differs
    /// from `n - 1`; the possibly incomplete hierarchy is still returned.
    #[must_use]
    pub fn complete(self) -> PointerHierarchy {
        let Self {
            parent,
            distance,
            order,
            prototypes,
            merges,
            squared,
            ..
        } = self;
        PointerHierarchy::assemble(parent, distance, Some(order), squared, merges)
            .with_prototype_table(prototypes)
    }
}
