//! SonarTree - append-only arena partitioning the angle domain.
//!
//! # Structure
//!
//! ```text
//!                   root [-π, π]          (internal, span never re-examined)
//!                  /            \
//!        left [-π, 0]          right [0, π]
//!                                  │  insert (0.4, 0.6)
//!                                  ▼
//!                        right [0, π]      (now internal, span frozen)
//!                        /          \
//!                 [0, 0.4]          [0.6, π]
//! ```
//!
//! Leaves are cut in place. A leaf whose free interval gets split in two is
//! promoted: its interval becomes the frozen span and two new leaves are
//! appended to the arena. Nodes are never removed; only [`SonarTree::clear`]
//! starts over.

use smallvec::{smallvec, SmallVec};

use super::node::{NodeHandle, SonarNode};
use crate::constants::{SKELETON_NODE_COUNT, SONAR_ANGLE};
use crate::geometry::{Cut, Line};

/// Work stack size that covers typical tree depths without spilling.
type HandleStack = SmallVec<[NodeHandle; 32]>;

/// Arena of sonar nodes. Handle 0 is the root.
#[derive(Clone, Debug, Default)]
pub struct SonarTree {
  nodes: Vec<SonarNode>,
}

impl SonarTree {
  /// Create the 3-node skeleton.
  pub fn new() -> Self {
    let mut tree = Self::with_capacity(SKELETON_NODE_COUNT);
    tree.clear();
    tree
  }

  /// Create an empty arena with room for `capacity` nodes.
  ///
  /// Holds no nodes until [`clear`](Self::clear) builds the skeleton.
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      nodes: Vec::with_capacity(capacity),
    }
  }

  /// Drop every node and rebuild root + left/right halves split at angle 0.
  ///
  /// Keeps the arena allocation.
  pub fn clear(&mut self) {
    self.nodes.clear();

    let root = self.push(SonarNode::leaf(Line::new(-SONAR_ANGLE, SONAR_ANGLE)));
    let left = self.push(SonarNode::leaf(Line::new(-SONAR_ANGLE, 0.0)));
    let right = self.push(SonarNode::leaf(Line::new(0.0, SONAR_ANGLE)));
    self.nodes[root.index()] = SonarNode::Internal {
      span: Line::new(-SONAR_ANGLE, SONAR_ANGLE),
      left,
      right,
    };
  }

  /// Free the arena allocation. The tree holds no nodes afterwards.
  pub fn release(&mut self) {
    self.nodes = Vec::new();
  }

  /// Number of nodes in the arena.
  #[inline]
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  /// Check if the arena holds no nodes.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Node at `handle`.
  ///
  /// # Panics
  /// Panics if `handle` is not from this tree.
  #[inline]
  pub fn node(&self, handle: NodeHandle) -> &SonarNode {
    &self.nodes[handle.index()]
  }

  /// Left (`[-π, 0]`) and right (`[0, π]`) halves below the root.
  #[inline]
  pub fn halves(&self) -> Option<(NodeHandle, NodeHandle)> {
    self.nodes.first().and_then(SonarNode::children)
  }

  /// Subtract `wedge` from the free space below `handle`.
  ///
  /// Descends only into nodes whose line overlaps the wedge. Zero-length
  /// wedges are a no-op.
  pub fn insert(&mut self, handle: NodeHandle, wedge: Line) {
    if wedge.is_degenerate() {
      return;
    }

    let mut pending: HandleStack = smallvec![handle];
    while let Some(handle) = pending.pop() {
      let node = self.nodes[handle.index()];
      let Some(cut) = node.line().cut(&wedge) else {
        continue;
      };

      match node {
        // Each child re-tests itself; the span only gates the descent
        SonarNode::Internal { left, right, .. } => {
          pending.push(left);
          pending.push(right);
        }
        SonarNode::Leaf { free } => match cut {
          Cut::Two(lower, upper) => {
            let left = self.push(SonarNode::leaf(lower));
            let right = self.push(SonarNode::leaf(upper));
            self.nodes[handle.index()] = SonarNode::Internal {
              span: free,
              left,
              right,
            };
          }
          Cut::One(line) | Cut::Closed(line) => {
            self.nodes[handle.index()] = SonarNode::leaf(line);
          }
        },
      }
    }
  }

  /// Leaf boundary angle closest to 0 below `handle`.
  ///
  /// Only leaves with positive length contribute, both of their edges are
  /// candidates, and a candidate must be strictly closer to replace the
  /// current best.
  pub fn closest_angle(&self, handle: NodeHandle) -> Option<f32> {
    let mut best: Option<f32> = None;
    for (_, free) in self.leaves(handle) {
      if free.is_degenerate() {
        continue;
      }
      for angle in [free.from, free.to] {
        if best.map_or(true, |b| angle.abs() < b.abs()) {
          best = Some(angle);
        }
      }
    }
    best
  }

  /// Open edge closest to straight ahead over both halves.
  ///
  /// The left half is scanned first and wins ties: the right candidate only
  /// replaces it when strictly closer.
  pub fn closest_open_angle(&self) -> Option<f32> {
    let (left, right) = self.halves()?;
    match (self.closest_angle(left), self.closest_angle(right)) {
      (Some(l), Some(r)) => Some(if r.abs() < l.abs() { r } else { l }),
      (l, r) => l.or(r),
    }
  }

  /// Leaves below `handle` in ascending angle order.
  pub fn leaves(&self, handle: NodeHandle) -> Leaves<'_> {
    let pending = if handle.index() < self.nodes.len() {
      smallvec![handle]
    } else {
      SmallVec::new()
    };
    Leaves {
      tree: self,
      pending,
    }
  }

  /// Total free angle across every leaf, in radians.
  pub fn free_measure(&self) -> f32 {
    self.leaves(NodeHandle::ROOT).map(|(_, free)| free.length()).sum()
  }

  fn push(&mut self, node: SonarNode) -> NodeHandle {
    self.nodes.push(node);
    NodeHandle::from_index(self.nodes.len() - 1)
  }
}

/// Iterator over `(handle, free interval)` of the leaves below a node.
#[derive(Debug)]
pub struct Leaves<'a> {
  tree: &'a SonarTree,
  pending: HandleStack,
}

impl Iterator for Leaves<'_> {
  type Item = (NodeHandle, Line);

  fn next(&mut self) -> Option<Self::Item> {
    while let Some(handle) = self.pending.pop() {
      match *self.tree.node(handle) {
        SonarNode::Leaf { free } => return Some((handle, free)),
        SonarNode::Internal { left, right, .. } => {
          self.pending.push(right);
          self.pending.push(left);
        }
      }
    }
    None
  }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
