//! Half-open knot-index windows shared by curve algorithms.
//!
//! Interpolation and extrapolation methods never own knot points; they
//! operate on a [`CurveWindow`], a view over a `[begin, end)` index range
//! of a [`SharedKnots`] collection. A composite curve gives its two halves
//! different windows over the same storage.

use crate::knots::{KnotPoint, KnotPoints, SharedKnots};
use std::cell::Ref;
use std::ops::Range;

/// A half-open `[begin, end)` view over shared knot-point storage.
///
/// All index arguments on this type are window-relative: position 0 is the
/// first knot of the window, not of the underlying collection. Gradient
/// slot numbering is window-relative too, so a method confined to the
/// right half of a composite curve addresses its own unknowns from slot 0.
#[derive(Debug, Clone)]
pub struct CurveWindow {
    knots: SharedKnots,
    range: Range<usize>,
}

impl Default for CurveWindow {
    fn default() -> Self {
        Self {
            knots: KnotPoints::new_shared(),
            range: 0..0,
        }
    }
}

impl CurveWindow {
    /// Creates a window over `range` of `knots`.
    pub fn new(knots: SharedKnots, range: Range<usize>) -> Self {
        Self { knots, range }
    }

    /// Creates a window spanning the whole collection.
    pub fn full(knots: SharedKnots) -> Self {
        let len = knots.borrow().len();
        Self { knots, range: 0..len }
    }

    /// The underlying shared storage.
    pub fn knots(&self) -> &SharedKnots {
        &self.knots
    }

    /// The absolute index range this window covers.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Borrows the underlying collection immutably.
    pub fn borrow(&self) -> Ref<'_, KnotPoints> {
        self.knots.borrow()
    }

    /// Number of knots in the window.
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Whether the window contains no knots.
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// The knot at window-relative position `i` (cloned out of the storage).
    ///
    /// # Panics
    ///
    /// Panics if `i` is outside the window; callers bracket first.
    pub fn point(&self, i: usize) -> KnotPoint {
        debug_assert!(i < self.len());
        self.knots.borrow().get(self.range.start + i).cloned().unwrap_or_else(|| {
            // Window ranges are validated when set; an out-of-range access
            // here is a logic error in the calling method.
            panic!("window position {} outside [0, {})", i, self.len())
        })
    }

    /// The first knot of the window.
    pub fn first(&self) -> Option<KnotPoint> {
        if self.is_empty() {
            None
        } else {
            Some(self.point(0))
        }
    }

    /// The last knot of the window.
    pub fn last(&self) -> Option<KnotPoint> {
        if self.is_empty() {
            None
        } else {
            Some(self.point(self.len() - 1))
        }
    }

    /// Window-relative upper bound: the first position whose knot has
    /// `knot.x > x`, clamped to the window.
    pub fn upper_bound(&self, x: f64) -> usize {
        let abs = self.knots.borrow().locate(x);
        abs.clamp(self.range.start, self.range.end) - self.range.start
    }

    /// Window-relative lower bound: the first position whose knot has
    /// `knot.x >= x`, clamped to the window.
    pub fn lower_bound(&self, x: f64) -> usize {
        let abs = self.knots.borrow().lower_bound(x);
        abs.clamp(self.range.start, self.range.end) - self.range.start
    }

    /// Whether the knot at window-relative position `i` is unknown.
    pub fn is_unknown(&self, i: usize) -> bool {
        !self.point(i).known
    }

    /// Gradient slot of the knot at window-relative position `i`: the
    /// number of unknown knots in the window strictly before it.
    pub fn unknown_slot(&self, i: usize) -> usize {
        let knots = self.knots.borrow();
        knots
            .iter()
            .skip(self.range.start)
            .take(i.min(self.len()))
            .filter(|p| !p.known)
            .count()
    }

    /// Number of unknown knots in the window.
    pub fn number_of_unknowns(&self) -> usize {
        self.unknown_slot(self.len())
    }

    /// Adds `multiplier` into the gradient slot of the knot at
    /// window-relative position `i`, if that knot is unknown.
    pub fn accumulate_at(&self, i: usize, multiplier: f64, gradient: &mut [f64]) {
        if self.is_unknown(i) {
            gradient[self.unknown_slot(i)] += multiplier;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knots::KnotPoint;

    fn shared() -> SharedKnots {
        let knots = KnotPoints::new_shared();
        {
            let mut k = knots.borrow_mut();
            k.add(KnotPoint::known(0.0, 1.0)).unwrap();
            k.add(KnotPoint::unknown(1.0, 2.0)).unwrap();
            k.add(KnotPoint::unknown(2.0, 3.0)).unwrap();
            k.add(KnotPoint::known(3.0, 4.0)).unwrap();
            k.add(KnotPoint::unknown(4.0, 5.0)).unwrap();
        }
        knots
    }

    // ====== Window Views ======

    #[test]
    fn test_full_window() {
        let w = CurveWindow::full(shared());
        assert_eq!(w.len(), 5);
        assert_eq!(w.first().unwrap().x, 0.0);
        assert_eq!(w.last().unwrap().x, 4.0);
        assert_eq!(w.number_of_unknowns(), 3);
    }

    #[test]
    fn test_sub_window_relative_positions() {
        let w = CurveWindow::new(shared(), 2..5);
        assert_eq!(w.len(), 3);
        assert_eq!(w.point(0).x, 2.0);
        assert_eq!(w.last().unwrap().x, 4.0);
        // Unknowns within the window only: x=2 and x=4.
        assert_eq!(w.number_of_unknowns(), 2);
        assert_eq!(w.unknown_slot(2), 1);
    }

    // ====== Bracketing ======

    #[test]
    fn test_upper_bound_clamped_to_window() {
        let w = CurveWindow::new(shared(), 1..4);
        assert_eq!(w.upper_bound(-1.0), 0);
        assert_eq!(w.upper_bound(1.0), 1);
        assert_eq!(w.upper_bound(2.5), 2);
        assert_eq!(w.upper_bound(10.0), 3);
    }

    #[test]
    fn test_lower_bound() {
        let w = CurveWindow::full(shared());
        assert_eq!(w.lower_bound(2.0), 2);
        assert_eq!(w.lower_bound(2.5), 3);
    }

    // ====== Gradient Slots ======

    #[test]
    fn test_accumulate_at_skips_known() {
        let w = CurveWindow::full(shared());
        let mut grad = vec![0.0; 3];
        w.accumulate_at(0, 1.0, &mut grad); // known knot, no-op
        w.accumulate_at(1, 2.0, &mut grad); // first unknown
        w.accumulate_at(4, 3.0, &mut grad); // third unknown
        assert_eq!(grad, vec![2.0, 0.0, 3.0]);
    }
}
