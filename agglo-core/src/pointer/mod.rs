//! Pointer representation of a dendrogram.
//!
//! Every object stores a parent pointer and the distance at which it joined
//! that parent. Unmerged objects point at themselves with an infinite
//! distance, so a completed hierarchy over `n` objects has exactly `n - 1`
//! links and one root. The builder accumulates merges while an algorithm
//! runs; [`PointerHierarchy`] is the immutable result handed to consumers.

mod builder;
mod hierarchy;
mod order;

pub use self::{
    builder::PointerHierarchyBuilder,
    hierarchy::{Merge, PointerHierarchy},
};

#[cfg(test)]
mod tests;
