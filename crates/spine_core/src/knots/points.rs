//! Ordered, x-unique knot-point storage.

use super::KnotPoint;
use crate::types::{CurveError, CurveResult};
use std::cell::RefCell;
use std::rc::Rc;

/// Knot-point storage shared between a curve, its interpolation method and
/// its extrapolation methods.
///
/// The curve construction model is single-threaded, so shared ownership
/// with interior mutability is sufficient.
pub type SharedKnots = Rc<RefCell<KnotPoints>>;

/// An ordered collection of knot points with unique x values.
///
/// The collection is kept sorted by x on every insertion; a duplicate x is
/// rejected with [`CurveError::DuplicateKnot`]. Unknown knots (those with
/// `known == false`) are mapped to a dense, 0-based *unknown index* used
/// to address slots of calibration gradient buffers.
///
/// # Examples
///
/// ```
/// use spine_core::knots::{KnotPoint, KnotPoints};
///
/// let mut knots = KnotPoints::new();
/// knots.add(KnotPoint::unknown(2.0, 0.0)).unwrap();
/// knots.add(KnotPoint::known(1.0, 0.05)).unwrap();
/// knots.add(KnotPoint::unknown(3.0, 0.0)).unwrap();
///
/// // Kept sorted regardless of insertion order.
/// assert_eq!(knots.get(0).unwrap().x, 1.0);
/// assert_eq!(knots.number_of_unknowns(), 2);
/// // The unknown at position 1 is unknown slot 0.
/// assert_eq!(knots.unknown_index(1), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct KnotPoints {
    points: Vec<KnotPoint>,
}

impl KnotPoints {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Wraps an empty collection in shared ownership.
    pub fn new_shared() -> SharedKnots {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Inserts a knot point, keeping the collection sorted by x.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::DuplicateKnot`] if a knot with the same x
    /// already exists. Duplicates are always an error, never silently
    /// replaced.
    pub fn add(&mut self, kp: KnotPoint) -> CurveResult<()> {
        let pos = self.points.partition_point(|p| p.x < kp.x);
        if let Some(existing) = self.points.get(pos) {
            if existing.x == kp.x {
                return Err(CurveError::DuplicateKnot { x: kp.x });
            }
        }
        self.points.insert(pos, kp);
        Ok(())
    }

    /// Number of knot points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The knot at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&KnotPoint> {
        self.points.get(index)
    }

    /// The first (smallest-x) knot.
    pub fn first(&self) -> Option<&KnotPoint> {
        self.points.first()
    }

    /// The last (largest-x) knot.
    pub fn last(&self) -> Option<&KnotPoint> {
        self.points.last()
    }

    /// Iterates over the knots in x order.
    pub fn iter(&self) -> std::slice::Iter<'_, KnotPoint> {
        self.points.iter()
    }

    /// Index of the first knot with `knot.x > x` (upper bound).
    ///
    /// This is the shared bracketing primitive: for an interior `x`, the
    /// governing segment is `[locate(x) - 1, locate(x)]`.
    pub fn locate(&self, x: f64) -> usize {
        self.points.partition_point(|p| p.x <= x)
    }

    /// Index of the first knot with `knot.x >= x` (lower bound).
    pub fn lower_bound(&self, x: f64) -> usize {
        self.points.partition_point(|p| p.x < x)
    }

    /// Dense unknown slot of the knot at `pos`: the number of unknown
    /// knots strictly before it.
    ///
    /// Only meaningful when the knot at `pos` is itself unknown, but safe
    /// to call for any position.
    pub fn unknown_index(&self, pos: usize) -> usize {
        self.points[..pos.min(self.points.len())]
            .iter()
            .filter(|p| !p.known)
            .count()
    }

    /// Position (in the full collection) of the i-th unknown knot.
    pub fn unknown_position(&self, i: usize) -> CurveResult<usize> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.known)
            .map(|(pos, _)| pos)
            .nth(i)
            .ok_or(CurveError::IndexOutOfRange {
                index: i,
                len: self.number_of_unknowns(),
            })
    }

    /// Number of unknown knots.
    pub fn number_of_unknowns(&self) -> usize {
        self.points.iter().filter(|p| !p.known).count()
    }

    /// The y value of the i-th unknown knot.
    pub fn unknown_y(&self, i: usize) -> CurveResult<f64> {
        let pos = self.unknown_position(i)?;
        Ok(self.points[pos].y)
    }

    /// Sets the y value of the i-th unknown knot.
    pub fn set_unknown_y(&mut self, i: usize, y: f64) -> CurveResult<()> {
        let pos = self.unknown_position(i)?;
        self.points[pos].y = y;
        Ok(())
    }

    /// Sets the y value of the knot at `pos` directly.
    pub fn set_y(&mut self, pos: usize, y: f64) -> CurveResult<()> {
        match self.points.get_mut(pos) {
            Some(p) => {
                p.y = y;
                Ok(())
            }
            None => Err(CurveError::IndexOutOfRange {
                index: pos,
                len: self.points.len(),
            }),
        }
    }

    /// Snapshot of the x values.
    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    /// Snapshot of the y values.
    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    /// Position of the last known knot, if any.
    pub fn last_known_position(&self) -> Option<usize> {
        self.points.iter().rposition(|p| p.known)
    }
}
