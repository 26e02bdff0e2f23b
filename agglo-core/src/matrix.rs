//! Lower-triangular storage for symmetric, zero-diagonal distance matrices.
//!
//! The pair `(x, y)` with `y < x` lives at offset `triangle_size(x) + y`, so a
//! matrix over `n` objects occupies `triangle_size(n)` cells. Cell access is
//! order-insensitive; callers may pass the pair either way round.

use crate::{DistanceQuery, HierarchyError};

/// Largest object count a [`TriangularMatrix`] accepts by default.
pub const MAX_OBJECTS: usize = 0x10000;

/// Number of cells needed to store all pairs among the first `x` objects.
///
/// # Examples
/// ```
/// use agglo_core::triangle_size;
///
/// assert_eq!(triangle_size(0), 0);
/// assert_eq!(triangle_size(1), 0);
/// assert_eq!(triangle_size(4), 6);
/// ```
#[must_use]
pub const fn triangle_size(x: usize) -> usize {
    // x and x - 1 are consecutive, so one of them is even and the product
    // halves exactly.
    if x % 2 == 0 {
        (x / 2) * x.saturating_sub(1)
    } else {
        x * ((x - 1) / 2)
    }
}

/// Dense lower-triangular distance matrix over `size` objects.
#[derive(Clone, Debug, PartialEq)]
pub struct TriangularMatrix {
    size: usize,
    cells: Vec<f64>,
}

impl TriangularMatrix {
    /// Allocates a matrix of `size` objects with every cell set to `fill`.
    ///
    /// # Errors
    /// Returns [`HierarchyError::TooManyObjects`] when `size` exceeds `limit`.
    /// The check happens before anything is allocated.
    pub fn new(size: usize, limit: usize, fill: f64) -> Result<Self, HierarchyError> {
        check_limit(size, limit)?;
        Ok(Self {
            size,
            cells: vec![fill; triangle_size(size)],
        })
    }

    /// Fills a matrix from `query`, passing every raw distance through
    /// `transform` on the way in.
    ///
    /// Rows are fetched with [`DistanceQuery::batch_distances`] so providers
    /// with vectorised kernels serve a whole row per call.
    ///
    /// # Errors
    /// Returns [`HierarchyError::TooManyObjects`] before any distance is
    /// computed when the query is larger than `limit`, and
    /// [`HierarchyError::Query`] when a distance lookup fails.
    pub fn from_query<D, F>(query: &D, limit: usize, mut transform: F) -> Result<Self, HierarchyError>
    where
        D: DistanceQuery + ?Sized,
        F: FnMut(f64) -> f64,
    {
        let size = query.len();
        check_limit(size, limit)?;
        let mut cells = Vec::with_capacity(triangle_size(size));
        let mut columns = Vec::with_capacity(size);
        for x in 1..size {
            columns.push(x - 1);
            let row = query.batch_distances(x, &columns)?;
            cells.extend(row.into_iter().map(&mut transform));
        }
        Ok(Self { size, cells })
    }

    /// Number of objects covered by the matrix.
    #[must_use]
    #[rustfmt::skip]
    pub fn size(&self) -> usize { self.size }

    /// Raw cell storage in offset order.
    #[must_use]
    #[rustfmt::skip]
    pub fn cells(&self) -> &[f64] { &self.cells }

    /// Offset of the pair `(x, y)`; the pair may be given in either order.
    ///
    /// # Examples
    /// ```
    /// use agglo_core::TriangularMatrix;
    ///
    /// let matrix = TriangularMatrix::new(4, 4, 0.0).expect("within limit");
    /// assert_eq!(matrix.offset(1, 0), 0);
    /// assert_eq!(matrix.offset(0, 3), 3);
    /// assert_eq!(matrix.offset(3, 2), 5);
    /// ```
    #[must_use]
    pub fn offset(&self, x: usize, y: usize) -> usize {
        debug_assert!(x != y, "the diagonal is not stored");
        debug_assert!(x < self.size && y < self.size, "pair outside the matrix");
        let (high, low) = if x > y { (x, y) } else { (y, x) };
        triangle_size(high) + low
    }

    /// Reads the cell for the pair `(x, y)`.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.cells[self.offset(x, y)]
    }

    /// Overwrites the cell for the pair `(x, y)`.
    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        let offset = self.offset(x, y);
        self.cells[offset] = value;
    }
}

fn check_limit(size: usize, limit: usize) -> Result<(), HierarchyError> {
    if size > limit {
        return Err(HierarchyError::TooManyObjects {
            objects: size,
            limit,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{CountingSource, suite_proptest_config};
    use proptest::prelude::*;
    use rstest::rstest;
    use std::{
        collections::HashSet,
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
    };

    #[rstest]
    #[case::empty(0, 0)]
    #[case::single(1, 0)]
    #[case::pair(2, 1)]
    #[case::five(5, 10)]
    #[case::limit(MAX_OBJECTS, 2_147_450_880)]
    fn triangle_size_matches_closed_form(#[case] x: usize, #[case] expected: usize) {
        assert_eq!(triangle_size(x), expected);
    }

    #[test]
    fn from_query_lays_out_rows_in_offset_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = CountingSource::new(vec![0.0, 1.0, 3.0, 7.0], Arc::clone(&calls));

        let matrix =
            TriangularMatrix::from_query(&source, MAX_OBJECTS, |d| d).expect("within limit");

        assert_eq!(matrix.cells(), &[1.0, 3.0, 2.0, 7.0, 6.0, 4.0]);
        assert_eq!(calls.load(Ordering::Relaxed), 6);
    }

    #[test]
    fn from_query_applies_transform() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = CountingSource::new(vec![0.0, 2.0, 3.0], calls);

        let matrix = TriangularMatrix::from_query(&source, MAX_OBJECTS, |d| d * d)
            .expect("within limit");

        assert_eq!(matrix.get(0, 1), 4.0);
        assert_eq!(matrix.get(2, 0), 9.0);
        assert_eq!(matrix.get(1, 2), 1.0);
    }

    #[test]
    fn rejects_one_object_above_the_limit_before_computing_distances() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = CountingSource::new(vec![0.0; MAX_OBJECTS + 1], Arc::clone(&calls));

        let err = TriangularMatrix::from_query(&source, MAX_OBJECTS, |d| d)
            .expect_err("one object too many");

        assert_eq!(
            err,
            HierarchyError::TooManyObjects {
                objects: MAX_OBJECTS + 1,
                limit: MAX_OBJECTS,
            }
        );
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn set_and_get_are_order_insensitive() {
        let mut matrix = TriangularMatrix::new(3, MAX_OBJECTS, f64::INFINITY).expect("valid");
        matrix.set(0, 2, 5.0);
        assert_eq!(matrix.get(2, 0), 5.0);
        assert_eq!(matrix.get(1, 0), f64::INFINITY);
    }

    proptest! {
        #![proptest_config(suite_proptest_config(64))]

        #[test]
        fn triangle_size_grows_by_x(x in 0usize..100_000) {
            prop_assert_eq!(triangle_size(x + 1) - triangle_size(x), x);
        }

        #[test]
        fn offsets_biject_onto_the_triangle(size in 0usize..40) {
            let matrix = TriangularMatrix::new(size, MAX_OBJECTS, 0.0).expect("within limit");
            let mut seen = HashSet::new();
            for x in 0..size {
                for y in 0..x {
                    let offset = matrix.offset(x, y);
                    prop_assert!(offset < triangle_size(size));
                    prop_assert!(seen.insert(offset));
                }
            }
            prop_assert_eq!(seen.len(), triangle_size(size));
        }
    }
}
