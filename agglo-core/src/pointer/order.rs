//! Dendrogram ordering and layout derived from a finished hierarchy.

use super::hierarchy::PointerHierarchy;

impl PointerHierarchy {
    /// Topological order suitable for dendrogram layout.
    ///
    /// Every object appears after all of its descendants, so roots come last.
    /// Objects are ranked by merge order when one was recorded, and otherwise
    /// by the largest merge height seen at the object or its direct children,
    /// which keeps non-monotone hierarchies in a sensible order.
    ///
    /// # Examples
    /// ```
    /// use agglo_core::PointerHierarchyBuilder;
    ///
    /// let mut builder = PointerHierarchyBuilder::new(4, false);
    /// builder.add(2, 1.0, 1);
    /// builder.add(1, 1.0, 0);
    /// builder.add(3, 8.0, 0);
    /// let hierarchy = builder.complete();
    ///
    /// assert_eq!(hierarchy.topological_order(), vec![2, 1, 3, 0]);
    /// ```
    #[must_use]
    pub fn topological_order(&self) -> Vec<usize> {
        let parents = self.parents();
        let size = parents.len();
        let mut ranked: Vec<usize> = (0..size).collect();
        match self.merge_order() {
            Some(order) => ranked.sort_by_key(|&object| (order[object], object)),
            None => {
                let heights = self.max_heights();
                ranked.sort_by(|&a, &b| heights[a].total_cmp(&heights[b]).then_with(|| a.cmp(&b)));
            }
        }

        let mut seen = vec![false; size];
        let mut order = Vec::with_capacity(size);
        for &object in ranked.iter().rev() {
            if seen[object] {
                continue;
            }
            seen[object] = true;
            let begin = order.len();
            order.push(object);
            let mut current = object;
            while parents[current] != current {
                current = parents[current];
                if seen[current] {
                    break;
                }
                seen[current] = true;
                order.push(current);
            }
            order[begin..].reverse();
        }
        order.reverse();
        order
    }

    /// Number of objects in the subtree rooted at each object, itself
    /// included.
    #[must_use]
    pub fn subtree_sizes(&self) -> Vec<usize> {
        self.sizes_in(&self.topological_order())
    }

    /// Dendrogram x-position of every object.
    ///
    /// The positions form a permutation of `0..n`. Each subtree occupies a
    /// contiguous interval whose last slot is the subtree's root, so leaves
    /// of the same cluster sit next to each other.
    ///
    /// # Examples
    /// ```
    /// use agglo_core::PointerHierarchyBuilder;
    ///
    /// let mut builder = PointerHierarchyBuilder::new(4, false);
    /// builder.add(2, 1.0, 1);
    /// builder.add(1, 1.0, 0);
    /// builder.add(3, 8.0, 0);
    /// let hierarchy = builder.complete();
    ///
    /// assert_eq!(hierarchy.subtree_sizes(), vec![4, 2, 1, 1]);
    /// assert_eq!(hierarchy.positions(), vec![3, 2, 1, 0]);
    /// ```
    #[must_use]
    pub fn positions(&self) -> Vec<usize> {
        let parents = self.parents();
        let order = self.topological_order();
        let sizes = self.sizes_in(&order);
        let mut positions = vec![0; parents.len()];
        let mut insert = vec![0; parents.len()];
        let mut next_root = 0;
        for &object in order.iter().rev() {
            let parent = parents[object];
            let size = sizes[object];
            if parent == object {
                positions[object] = next_root + size - 1;
                insert[object] = next_root;
                next_root += size;
            } else {
                positions[object] = insert[parent] + size - 1;
                insert[object] = insert[parent];
                insert[parent] += size;
            }
        }
        positions
    }

    fn sizes_in(&self, order: &[usize]) -> Vec<usize> {
        let parents = self.parents();
        let mut sizes = vec![0; parents.len()];
        for &object in order {
            sizes[object] += 1;
            let parent = parents[object];
            if parent != object {
                sizes[parent] += sizes[object];
            }
        }
        sizes
    }

    fn max_heights(&self) -> Vec<f64> {
        let parents = self.parents();
        let distances = self.distances();
        let mut heights = vec![0.0_f64; parents.len()];
        for (object, &parent) in parents.iter().enumerate() {
            let height = distances[object];
            if height > heights[object] {
                heights[object] = height;
            }
            if height > heights[parent] {
                heights[parent] = height;
            }
        }
        heights
    }
}
