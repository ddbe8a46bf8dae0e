//! Line - closed scalar range on the angle axis and its subtraction.

/// Closed range `[from, to]` with `from <= to`.
///
/// A zero-length line is the "closed" sentinel: a leaf holding one is fully
/// blocked but stays in the tree.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Line {
  /// Lower bound.
  pub from: f32,
  /// Upper bound.
  pub to: f32,
}

/// Result of cutting a target line by a cutter that overlaps it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cut {
  /// Cutter swallowed the target. Holds a zero-length line on the target's
  /// edge nearest to where the cutter sits.
  Closed(Line),
  /// Cutter covered one edge. Holds the surviving piece.
  One(Line),
  /// Cutter was strictly inside. Holds `[target.from, cutter.from]` and
  /// `[cutter.to, target.to]`.
  Two(Line, Line),
}

impl Line {
  /// Create a new line.
  ///
  /// # Panics
  /// Debug-asserts that `from <= to`.
  #[inline]
  pub fn new(from: f32, to: f32) -> Self {
    debug_assert!(from <= to, "Line from ({from}) must be <= to ({to})");
    Self { from, to }
  }

  /// Zero-length line at `value`.
  #[inline]
  pub const fn point(value: f32) -> Self {
    Self {
      from: value,
      to: value,
    }
  }

  /// `to - from`.
  #[inline]
  pub fn length(&self) -> f32 {
    self.to - self.from
  }

  /// True for the zero-length sentinel.
  #[inline]
  pub fn is_degenerate(&self) -> bool {
    self.length() <= 0.0
  }

  /// Midpoint of the range.
  #[inline]
  pub fn center(&self) -> f32 {
    (self.from + self.to) * 0.5
  }

  /// Check if two lines share interior points.
  ///
  /// Touching endpoints don't count. Symmetric in its arguments.
  #[inline]
  pub fn overlaps(&self, other: &Line) -> bool {
    self.from < other.to && other.from < self.to
  }

  /// Subtract `cutter` from `self`.
  ///
  /// Returns `None` when they don't overlap (including a zero-length
  /// cutter), leaving `self` meaningful as-is. Surviving pieces only ever
  /// reuse existing endpoints, so no arithmetic error accumulates.
  pub fn cut(&self, cutter: &Line) -> Option<Cut> {
    if cutter.is_degenerate() || !self.overlaps(cutter) {
      return None;
    }

    let covers_from = cutter.from <= self.from;
    let covers_to = cutter.to >= self.to;

    let cut = match (covers_from, covers_to) {
      (true, true) => {
        // Park the sentinel on whichever target edge the nearer cutter edge sits on
        let center = self.center();
        let edge = if center - cutter.from <= cutter.to - center {
          self.from
        } else {
          self.to
        };
        Cut::Closed(Line::point(edge))
      }
      (true, false) => Cut::One(Line::new(cutter.to, self.to)),
      (false, true) => Cut::One(Line::new(self.from, cutter.from)),
      (false, false) => Cut::Two(
        Line::new(self.from, cutter.from),
        Line::new(cutter.to, self.to),
      ),
    };
    Some(cut)
  }
}

#[cfg(test)]
#[path = "line_test.rs"]
mod line_test;
