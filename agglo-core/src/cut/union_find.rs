//! Disjoint sets for replaying hierarchy links.

/// Union by size with path halving.
#[derive(Clone, Debug)]
pub(super) struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    pub(super) fn new(objects: usize) -> Self {
        Self {
            parent: (0..objects).collect(),
            size: vec![1; objects],
        }
    }

    pub(super) fn find(&mut self, mut object: usize) -> usize {
        while self.parent[object] != object {
            let grandparent = self.parent[self.parent[object]];
            self.parent[object] = grandparent;
            object = grandparent;
        }
        object
    }

    /// Joins the sets of `a` and `b`; returns `false` if they were already
    /// joined.
    pub(super) fn union(&mut self, a: usize, b: usize) -> bool {
        let (root_a, root_b) = (self.find(a), self.find(b));
        if root_a == root_b {
            return false;
        }
        let (large, small) = if self.size[root_a] >= self.size[root_b] {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };
        self.parent[small] = large;
        self.size[large] += self.size[small];
        true
    }
}
