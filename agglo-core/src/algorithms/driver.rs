//! Merge loops shared by the matrix-based algorithms.

use tracing::warn;

use super::MergeMatrix;
use crate::{PointerHierarchyBuilder, TriangularMatrix, progress::Ticker};

/// Which pair wins when the naive scan sees equal values.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Ties {
    /// The pair scanned last wins, which truncates the active set sooner.
    PreferLast,
    /// The pair scanned first wins.
    PreferFirst,
}

/// Drops trailing linked objects from the active range after `x` joined its
/// parent.
fn shrink(builder: &PointerHierarchyBuilder, x: usize, mut end: usize) -> usize {
    if x + 1 == end {
        end -= 1;
        while end > 0 && builder.is_linked(end - 1) {
            end -= 1;
        }
    }
    end
}

/// Scans the whole active triangle for the next pair, returning `(x, y)`
/// with `x > y`.
fn closest_pair<M: MergeMatrix>(
    state: &M,
    builder: &PointerHierarchyBuilder,
    end: usize,
    ties: Ties,
) -> Option<(usize, usize)> {
    let matrix = state.matrix();
    let mut best = f64::INFINITY;
    let mut pair = None;
    for x in 1..end {
        if builder.is_linked(x) {
            continue;
        }
        for y in 0..x {
            if builder.is_linked(y) {
                continue;
            }
            let value = matrix.get(x, y);
            let wins = match ties {
                Ties::PreferLast => value <= best,
                Ties::PreferFirst => value < best || (pair.is_none() && value <= best),
            };
            if wins {
                best = value;
                pair = Some((x, y));
            }
        }
    }
    pair
}

/// Repeats a full scan of the active triangle before every merge.
pub(crate) fn naive<M: MergeMatrix>(
    state: &mut M,
    builder: &mut PointerHierarchyBuilder,
    ticker: &mut Ticker<'_>,
    ties: Ties,
) {
    let size = builder.len();
    let mut end = size;
    for _ in 1..size {
        let Some((x, y)) = closest_pair(state, builder, end, ties) else {
            warn!(end, "no comparable pair left to merge");
            break;
        };
        state.merge(builder, x, y, end);
        end = shrink(builder, x, end);
        ticker.tick();
    }
}

/// Per-row nearest neighbour cache.
struct NearestCache {
    best_distance: Vec<f64>,
    best_index: Vec<Option<usize>>,
}

impl NearestCache {
    fn build(matrix: &TriangularMatrix) -> Self {
        let size = matrix.size();
        let mut best_distance = vec![f64::INFINITY; size];
        let mut best_index = vec![None; size];
        for x in 0..size {
            let mut row_distance = f64::INFINITY;
            let mut row_index = None;
            for y in 0..x {
                let value = matrix.get(x, y);
                if value < best_distance[y] {
                    best_distance[y] = value;
                    best_index[y] = Some(x);
                }
                if value < row_distance {
                    row_distance = value;
                    row_index = Some(y);
                }
            }
            best_distance[x] = row_distance;
            best_index[x] = row_index;
        }
        Self {
            best_distance,
            best_index,
        }
    }

    /// Pair with the smallest cached value, returned as `(x, y)` with `x > y`.
    fn closest_pair(&self, end: usize) -> Option<(usize, usize)> {
        let mut best = f64::INFINITY;
        let mut pair = None;
        for x in 0..end {
            let Some(y) = self.best_index[x] else {
                continue;
            };
            if self.best_distance[x] <= best {
                best = self.best_distance[x];
                pair = Some((x, y));
            }
        }
        pair.map(|(x, y)| if y > x { (y, x) } else { (x, y) })
    }

    fn rescan(&mut self, matrix: &TriangularMatrix, builder: &PointerHierarchyBuilder, j: usize) {
        let mut best = f64::INFINITY;
        let mut index = None;
        for i in 0..builder.len() {
            if i == j || builder.is_linked(i) {
                continue;
            }
            let value = matrix.get(i, j);
            if value < best {
                best = value;
                index = Some(i);
            }
        }
        self.best_distance[j] = best;
        self.best_index[j] = index;
    }

    /// Refreshes the cache after `x` was merged into `y`.
    fn update(
        &mut self,
        matrix: &TriangularMatrix,
        builder: &PointerHierarchyBuilder,
        x: usize,
        y: usize,
        end: usize,
    ) {
        self.best_index[x] = None;
        for j in 0..end {
            if j == y || builder.is_linked(j) {
                continue;
            }
            let value = matrix.get(y, j);
            if value <= self.best_distance[j] {
                self.best_distance[j] = value;
                self.best_index[j] = Some(y);
            } else if matches!(self.best_index[j], Some(k) if k == x || k == y) {
                self.rescan(matrix, builder, j);
            }
        }
        self.rescan(matrix, builder, y);
    }
}

/// Merges the pair with the smallest cached nearest-neighbour value, keeping
/// the cache consistent after every merge.
pub(crate) fn nearest_cache<M: MergeMatrix>(
    state: &mut M,
    builder: &mut PointerHierarchyBuilder,
    ticker: &mut Ticker<'_>,
) {
    let size = builder.len();
    let mut cache = NearestCache::build(state.matrix());
    let mut end = size;
    for _ in 1..size {
        let Some((x, y)) = cache.closest_pair(end) else {
            warn!(end, "no comparable pair left to merge");
            break;
        };
        state.merge(builder, x, y, end);
        cache.update(state.matrix(), builder, x, y, end);
        end = shrink(builder, x, end);
        ticker.tick();
    }
}

fn first_unlinked(builder: &PointerHierarchyBuilder, start: usize, end: usize) -> Option<usize> {
    (start..end).find(|&object| !builder.is_linked(object))
}

/// Follows nearest-neighbour chains and merges the first reciprocal pair
/// found. Exact only for reducible criteria.
pub(crate) fn nn_chain<M: MergeMatrix>(
    state: &mut M,
    builder: &mut PointerHierarchyBuilder,
    ticker: &mut Ticker<'_>,
) {
    let size = builder.len();
    let mut chain: Vec<usize> = Vec::with_capacity(size);
    let mut end = size;
    for _ in 1..size {
        let (mut a, mut b);
        if chain.len() <= 3 {
            let seeds = first_unlinked(builder, 0, end)
                .and_then(|first| Some((first, first_unlinked(builder, first + 1, end)?)));
            let Some((first, second)) = seeds else {
                warn!(end, "no comparable pair left to merge");
                break;
            };
            a = first;
            b = second;
            chain.clear();
            chain.push(a);
        } else {
            // The tail reads (.., a, b, c, b) where b and c were just merged.
            let last = chain.len();
            let c = chain[last - 2];
            b = chain[last - 3].min(c);
            a = chain[last - 4];
            chain.truncate(last - 3);
        }

        let matrix = state.matrix();
        let mut closest = matrix.get(a, b);
        loop {
            let mut c = b;
            for i in 0..end {
                if i == a || i == b || builder.is_linked(i) {
                    continue;
                }
                let value = matrix.get(a, i);
                if value < closest {
                    closest = value;
                    c = i;
                }
            }
            b = a;
            a = c;
            chain.push(a);
            if chain.len() >= 3 && a == chain[chain.len() - 3] {
                break;
            }
        }

        let (x, y) = if a > b { (a, b) } else { (b, a) };
        state.merge(builder, x, y, end);
        end = shrink(builder, x, end);
        ticker.tick();
    }
}
