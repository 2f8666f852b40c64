//! Two interpolation regimes over one shared knot set, split at a
//! separation point.

use std::cell::RefCell;
use std::rc::Rc;

use spine_core::knots::{KnotPoint, KnotPoints, SharedKnots};
use spine_core::types::CurveResult;

use super::{SpineCurve, UkpCurve};
use crate::problem::VariableSink;

/// How the separation point of a [`CompositeCurve`] is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeparationChoice {
    /// Use the given x.
    Assigned(f64),
    /// Use 0.0, the conventional default.
    Default,
    /// Use the x of the last known knot, falling back to 0.0 when every
    /// knot is unknown.
    LastFixedKnot,
}

/// A curve that interpolates with one method up to a separation point and
/// another beyond it.
///
/// Both sub-curves read the SAME shared knot storage, so a y written
/// through the left curve is immediately visible to the right one; the two
/// regimes differ only in how they interpolate between those knots.
/// Unknown bookkeeping delegates to the left curve (delegating to the
/// right would enumerate the same knots).
pub struct CompositeCurve {
    knots: SharedKnots,
    left: UkpCurve,
    right: UkpCurve,
    separation: SeparationChoice,
    separation_x: f64,
}

impl CompositeCurve {
    /// Registry name of this curve formulation.
    pub const NAME: &'static str = "Composite";

    /// Creates a composite over fresh storage from two interpolation names.
    ///
    /// # Errors
    ///
    /// Returns [`spine_core::types::CurveError::UnknownName`] for an
    /// unregistered interpolation name.
    pub fn new(
        left_interpolation: &str,
        right_interpolation: &str,
        separation: SeparationChoice,
    ) -> CurveResult<Self> {
        let knots = KnotPoints::new_shared();
        let left = UkpCurve::with_knots(knots.clone(), left_interpolation)?;
        let right = UkpCurve::with_knots(knots.clone(), right_interpolation)?;
        Ok(Self {
            knots,
            left,
            right,
            separation,
            separation_x: 0.0,
        })
    }

    /// The separation point, meaningful after [`finalize`].
    ///
    /// [`finalize`]: SpineCurve::finalize
    pub fn separation_x(&self) -> f64 {
        self.separation_x
    }
}

impl SpineCurve for CompositeCurve {
    fn add_knot(&mut self, kp: KnotPoint) -> CurveResult<()> {
        // Storage is shared, so one insertion serves both sub-curves.
        self.knots.borrow_mut().add(kp)
    }

    fn finalize(&mut self) -> CurveResult<()> {
        self.separation_x = match self.separation {
            SeparationChoice::Assigned(x) => x,
            SeparationChoice::Default => 0.0,
            SeparationChoice::LastFixedKnot => {
                let knots = self.knots.borrow();
                match knots.last_known_position() {
                    Some(pos) => knots.get(pos).map(|kp| kp.x).unwrap_or(0.0),
                    None => {
                        tracing::warn!("no fixed knot to separate at, using 0.0");
                        0.0
                    }
                }
            }
        };
        self.left.finalize()?;
        self.right.finalize()
    }

    fn update(&mut self) -> CurveResult<()> {
        // Left writes first; the right curve reads the same storage.
        self.left.update()?;
        self.right.update()
    }

    fn evaluate(&self, x: f64) -> f64 {
        if x <= self.separation_x {
            self.left.evaluate(x)
        } else {
            self.right.evaluate(x)
        }
    }

    fn accumulate_gradient(&self, x: f64, multiplier: f64, gradient: &mut [f64]) {
        if x <= self.separation_x {
            self.left.accumulate_gradient(x, multiplier, gradient);
        } else {
            self.right.accumulate_gradient(x, multiplier, gradient);
        }
    }

    fn number_of_unknowns(&self) -> usize {
        self.left.number_of_unknowns()
    }

    fn unknown(&self, index: usize) -> CurveResult<f64> {
        self.left.unknown(index)
    }

    fn set_unknown(&mut self, index: usize, value: f64) -> CurveResult<()> {
        // Shared storage: writing through the left side is visible to both.
        self.left.set_unknown(index, value)
    }

    fn add_unknowns_to(&self, sink: &mut dyn VariableSink) {
        self.left.add_unknowns_to(sink);
    }

    fn knots(&self) -> SharedKnots {
        self.knots.clone()
    }

    fn clone_box(&self) -> Box<dyn SpineCurve> {
        let knots = Rc::new(RefCell::new(self.knots.borrow().clone()));
        Box::new(Self {
            knots: knots.clone(),
            left: self.left.clone_onto(knots.clone()),
            right: self.right.clone_onto(knots),
            separation: self.separation,
            separation_x: self.separation_x,
        })
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_composite() -> CompositeCurve {
        let mut curve =
            CompositeCurve::new("FlatRight", "StraightLine", SeparationChoice::Assigned(2.0))
                .unwrap();
        curve.add_knot(KnotPoint::unknown(1.0, 10.0)).unwrap();
        curve.add_knot(KnotPoint::unknown(2.0, 20.0)).unwrap();
        curve.add_knot(KnotPoint::unknown(3.0, 40.0)).unwrap();
        curve.finalize().unwrap();
        curve
    }

    // ====== Routing ======

    #[test]
    fn routes_by_separation_point() {
        let curve = sample_composite();
        // Left regime is piecewise flat from the left knot.
        assert_relative_eq!(curve.evaluate(1.5), 10.0);
        // The separation point itself belongs to the left side.
        assert_relative_eq!(curve.evaluate(2.0), 20.0);
        // Right regime interpolates linearly.
        assert_relative_eq!(curve.evaluate(2.5), 30.0);
    }

    #[test]
    fn gradient_routes_like_evaluate() {
        let curve = sample_composite();
        let mut gradient = vec![0.0; 3];
        // Right side, halfway between knots 2 and 3.
        curve.accumulate_gradient(2.5, 1.0, &mut gradient);
        assert_relative_eq!(gradient[0], 0.0);
        assert_relative_eq!(gradient[1], 0.5);
        assert_relative_eq!(gradient[2], 0.5);

        let mut gradient = vec![0.0; 3];
        // Left side, flat from the knot at 1.0.
        curve.accumulate_gradient(1.5, 1.0, &mut gradient);
        assert_relative_eq!(gradient[0], 1.0);
        assert_relative_eq!(gradient[1], 0.0);
    }

    // ====== Separation resolution ======

    #[test]
    fn last_fixed_knot_separation() {
        let mut curve =
            CompositeCurve::new("StraightLine", "StraightLine", SeparationChoice::LastFixedKnot)
                .unwrap();
        curve.add_knot(KnotPoint::unknown(1.0, 1.0)).unwrap();
        curve.add_knot(KnotPoint::known(2.5, 2.0)).unwrap();
        curve.add_knot(KnotPoint::unknown(4.0, 3.0)).unwrap();
        curve.finalize().unwrap();
        assert_relative_eq!(curve.separation_x(), 2.5);
    }

    #[test]
    fn default_separation_is_zero() {
        let mut curve =
            CompositeCurve::new("StraightLine", "StraightLine", SeparationChoice::Default)
                .unwrap();
        curve.add_knot(KnotPoint::unknown(1.0, 1.0)).unwrap();
        curve.add_knot(KnotPoint::unknown(2.0, 2.0)).unwrap();
        curve.finalize().unwrap();
        assert_relative_eq!(curve.separation_x(), 0.0);
    }

    // ====== Shared storage ======

    #[test]
    fn both_sides_see_unknown_writes() {
        let mut curve = sample_composite();
        curve.set_unknown(1, 24.0).unwrap();
        curve.update().unwrap();
        // Left flat segment now reads the new value at its left knot.
        assert_relative_eq!(curve.evaluate(2.0), 24.0);
        // Right linear segment starts from the same value.
        assert_relative_eq!(curve.evaluate(2.5), 32.0);
    }

    #[test]
    fn clone_shares_storage_between_its_own_sides() {
        let curve = sample_composite();
        let mut clone = curve.clone_box();
        clone.set_unknown(0, 0.0).unwrap();
        clone.update().unwrap();
        assert_relative_eq!(clone.evaluate(1.5), 0.0);
        // Original untouched.
        assert_relative_eq!(curve.evaluate(1.5), 10.0);
    }
}
