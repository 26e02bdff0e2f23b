//! Defays' CLINK complete-linkage algorithm.

use tracing::instrument;

use super::slink::Pointers;
use crate::{DistanceQuery, HierarchyError, MergeProgress, PointerHierarchy, progress::Ticker};

/// Complete-linkage clustering in `O(n²)` time and `O(n)` memory.
///
/// CLINK uses the same incremental pointer representation as
/// [`Slink`](super::Slink). It is fast but only approximates complete
/// linkage: the hierarchy depends on the insertion order of the objects and
/// can differ from the one [`Agnes`](super::Agnes) builds with
/// [`Linkage::Complete`](crate::Linkage::Complete).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Clink;

impl Clink {
    /// Creates the algorithm.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Clusters every object of `query`.
    ///
    /// # Errors
    /// Returns [`HierarchyError::Query`] when a distance lookup fails.
    #[instrument(
        name = "core.clink",
        skip(self, query, progress),
        fields(objects = query.len(), linkage = "complete"),
    )]
    pub fn run<D>(
        &self,
        query: &D,
        progress: Option<&mut dyn MergeProgress>,
    ) -> Result<PointerHierarchy, HierarchyError>
    where
        D: DistanceQuery + ?Sized,
    {
        let mut pointers = Pointers::new(query.len());
        let mut ticker = Ticker::new(progress, query.len().saturating_sub(1));
        let mut columns = Vec::with_capacity(query.len());
        for n in 0..query.len() {
            let row = query.batch_distances(n, &columns)?;
            if n > 0 {
                pointers.insert_complete(n, row);
                ticker.tick();
            }
            columns.push(n);
        }
        Ok(pointers.into_hierarchy(query.is_squared()))
    }
}

impl Pointers {
    /// Inserts object `n > 0` given its distances `m` to objects `0..n`,
    /// merging at the maximum.
    fn insert_complete(&mut self, n: usize, mut m: Vec<f64>) {
        let Self { parent, height } = self;
        parent[n] = n;
        height[n] = f64::INFINITY;

        for i in 0..n {
            if height[i] < m[i] {
                let p = parent[i];
                m[p] = m[p].max(m[i]);
                m[i] = f64::INFINITY;
            }
        }

        let mut a = n - 1;
        for i in (0..n).rev() {
            if height[i] >= m[parent[i]] {
                if m[i] < m[a] {
                    a = i;
                }
            } else {
                m[i] = f64::INFINITY;
            }
        }

        let mut b = parent[a];
        let mut c = height[a];
        parent[a] = n;
        height[a] = m[a];

        if a < n - 1 {
            while b != n {
                if b == n - 1 {
                    parent[b] = n;
                    height[b] = c;
                    break;
                }
                let next = parent[b];
                let next_height = height[b];
                parent[b] = n;
                height[b] = c;
                b = next;
                c = next_height;
            }
        }

        for i in 0..n {
            if parent[parent[i]] == n && height[i] >= height[parent[i]] {
                parent[i] = n;
            }
        }
    }
}
