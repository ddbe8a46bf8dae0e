//! SonarNode - tagged leaf/internal node stored in the sonar arena.
//!
//! Leaves hold the free interval still open at their position and are cut in
//! place. Internal nodes hold the span they had when they were split, frozen
//! from then on and only used to skip subtrees an obstacle can't reach.

use crate::geometry::Line;

/// Index of a node inside a [`SonarTree`](super::SonarTree) arena.
///
/// Handles are dense, never reused, and only meaningful for the tree that
/// created them. The root is always [`NodeHandle::ROOT`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct NodeHandle(u32);

impl NodeHandle {
  /// Root node handle.
  pub const ROOT: Self = Self(0);

  /// Arena index of this handle.
  #[inline]
  pub fn index(self) -> usize {
    self.0 as usize
  }

  #[inline]
  pub(crate) fn from_index(index: usize) -> Self {
    debug_assert!(index <= u32::MAX as usize, "Sonar arena exceeded u32 handles");
    Self(index as u32)
  }
}

/// Arena node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SonarNode {
  /// Free interval remaining at this position. Zero length once blocked.
  Leaf {
    /// Currently free sub-interval.
    free: Line,
  },
  /// Split node.
  Internal {
    /// Span at the moment of splitting. Never updated again.
    span: Line,
    /// Lower half handle.
    left: NodeHandle,
    /// Upper half handle.
    right: NodeHandle,
  },
}

impl SonarNode {
  /// Create a leaf holding `free`.
  #[inline]
  pub fn leaf(free: Line) -> Self {
    Self::Leaf { free }
  }

  /// Check if this node is a leaf.
  #[inline]
  pub fn is_leaf(&self) -> bool {
    matches!(self, Self::Leaf { .. })
  }

  /// Interval an obstacle is tested against: the free interval for leaves,
  /// the frozen span for internal nodes.
  #[inline]
  pub fn line(&self) -> Line {
    match *self {
      Self::Leaf { free } => free,
      Self::Internal { span, .. } => span,
    }
  }

  /// Child handles of an internal node.
  #[inline]
  pub fn children(&self) -> Option<(NodeHandle, NodeHandle)> {
    match *self {
      Self::Leaf { .. } => None,
      Self::Internal { left, right, .. } => Some((left, right)),
    }
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
