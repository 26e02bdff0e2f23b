//! Agglomerative clustering algorithms.
//!
//! The matrix-based algorithms share one merge step per linkage family and
//! differ only in how they find the next pair to merge:
//!
//! - [`Agnes`] and [`MiniMax`] scan the whole active triangle.
//! - [`Anderberg`], [`MiniMaxAnderberg`] and [`Medoid`] keep a nearest
//!   neighbour cache per row.
//! - [`NnChain`] and [`MiniMaxNnChain`] follow chains of nearest neighbours
//!   until they find a reciprocal pair.
//!
//! [`Slink`], [`Clink`], [`HdbscanSlink`] and [`HdbscanPrim`] work on `O(n)`
//! arrays instead and never materialise the distance matrix.

mod agnes;
mod anderberg;
mod clink;
mod driver;
mod hdbscan;
mod minimax;
mod nn_chain;
mod slink;


pub use self::{
    agnes::Agnes,
    anderberg::Anderberg,
    clink::Clink,
    hdbscan::{HdbscanPrim, HdbscanSlink},
    minimax::{Medoid, MiniMax, MiniMaxAnderberg, MiniMaxNnChain, PrototypeObjective},
    nn_chain::NnChain,
    slink::Slink,
};

use crate::{
    DistanceQuery, HierarchyError, Linkage, PointerHierarchyBuilder, TriangularMatrix,
};

/// Working state of a matrix-based algorithm: the active distance triangle
/// plus whatever the merge step needs to rewrite it.
pub(crate) trait MergeMatrix {
    /// Current cluster-to-cluster values.
    fn matrix(&self) -> &TriangularMatrix;

    /// Links `x` under `y` (`x > y`) and rewrites every active cell that
    /// involves `y`. Only objects below `end` can still be active.
    fn merge(&mut self, builder: &mut PointerHierarchyBuilder, x: usize, y: usize, end: usize);
}

/// Lance–Williams state shared by [`Agnes`], [`Anderberg`] and [`NnChain`].
#[derive(Debug)]
pub(crate) struct LinkageMatrix {
    linkage: Linkage,
    matrix: TriangularMatrix,
    squared: bool,
}

impl LinkageMatrix {
    /// Loads the initial matrix from `query` in the linkage's internal scale.
    pub(crate) fn load<D>(query: &D, linkage: Linkage, limit: usize) -> Result<Self, HierarchyError>
    where
        D: DistanceQuery + ?Sized,
    {
        let squared = query.is_squared();
        let matrix =
            TriangularMatrix::from_query(query, limit, |distance| linkage.initial(distance, squared))?;
        Ok(Self {
            linkage,
            matrix,
            squared,
        })
    }
}

impl MergeMatrix for LinkageMatrix {
    fn matrix(&self) -> &TriangularMatrix {
        &self.matrix
    }

    fn merge(&mut self, builder: &mut PointerHierarchyBuilder, x: usize, y: usize, end: usize) {
        let distance = self.matrix.get(x, y);
        let size_x = builder.size(x);
        let size_y = builder.size(y);
        builder.strict_add(x, self.linkage.restore(distance, self.squared), y);
        builder.set_size(y, size_x + size_y);
        for j in 0..end {
            if j == x || j == y || builder.is_linked(j) {
                continue;
            }
            let combined = self.linkage.combine(
                size_x,
                self.matrix.get(x, j),
                size_y,
                self.matrix.get(y, j),
                builder.size(j),
                distance,
            );
            self.matrix.set(y, j, combined);
        }
    }
}
