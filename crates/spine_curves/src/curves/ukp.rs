//! The unknown-knot-point curve: unknowns are the y values of unknown
//! knots.

use std::cell::RefCell;
use std::rc::Rc;

use spine_core::interpolation::{interpolation_from_name, Interpolation};
use spine_core::knots::{KnotPoint, KnotPoints, SharedKnots};
use spine_core::types::{CurveError, CurveResult};
use spine_core::window::CurveWindow;

use super::SpineCurve;
use crate::problem::VariableSink;

/// A curve whose calibration unknowns are the y values of its unknown
/// knot points, interpolated by a pluggable method.
///
/// This is the default spine formulation: one variable per unknown knot,
/// evaluate and gradient delegate straight to the interpolation method
/// over the full knot range.
pub struct UkpCurve {
    knots: SharedKnots,
    method: Box<dyn Interpolation>,
    finalized: bool,
}

impl UkpCurve {
    /// Registry name of this curve formulation.
    pub const NAME: &'static str = "UKP";

    /// Creates a curve with fresh knot storage and the named interpolation.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::UnknownName`] for an unregistered
    /// interpolation name.
    pub fn new(interpolation_name: &str) -> CurveResult<Self> {
        Self::with_knots(KnotPoints::new_shared(), interpolation_name)
    }

    /// Creates a curve over existing shared knot storage.
    ///
    /// Used by composite curves, whose sub-curves read the same knots.
    pub fn with_knots(knots: SharedKnots, interpolation_name: &str) -> CurveResult<Self> {
        Ok(Self {
            knots,
            method: interpolation_from_name(interpolation_name)?,
            finalized: false,
        })
    }

    /// The interpolation method, for inspection.
    pub fn interpolation(&self) -> &dyn Interpolation {
        self.method.as_ref()
    }

    /// Clones this curve onto the given knot storage, rebinding the
    /// interpolation window when the source was finalized.
    pub(crate) fn clone_onto(&self, knots: SharedKnots) -> Self {
        let mut method = self.method.clone();
        let mut finalized = false;
        if self.finalized {
            let rebound = method
                .set_window(CurveWindow::full(knots.clone()))
                .and_then(|()| method.update());
            match rebound {
                Ok(()) => finalized = true,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to rebind interpolation window on clone")
                }
            }
        }
        Self {
            knots,
            method,
            finalized,
        }
    }
}

impl SpineCurve for UkpCurve {
    fn add_knot(&mut self, kp: KnotPoint) -> CurveResult<()> {
        self.knots.borrow_mut().add(kp)
    }

    fn finalize(&mut self) -> CurveResult<()> {
        if self.knots.borrow().is_empty() {
            return Err(CurveError::EmptyCurve);
        }
        self.method.set_window(CurveWindow::full(self.knots.clone()))?;
        self.method.update()?;
        self.finalized = true;
        Ok(())
    }

    fn update(&mut self) -> CurveResult<()> {
        self.method.update()
    }

    fn evaluate(&self, x: f64) -> f64 {
        self.method.evaluate(x)
    }

    fn accumulate_gradient(&self, x: f64, multiplier: f64, gradient: &mut [f64]) {
        self.method.accumulate_gradient(x, multiplier, gradient);
    }

    fn number_of_unknowns(&self) -> usize {
        self.knots.borrow().number_of_unknowns()
    }

    fn unknown(&self, index: usize) -> CurveResult<f64> {
        self.knots.borrow().unknown_y(index)
    }

    fn set_unknown(&mut self, index: usize, value: f64) -> CurveResult<()> {
        self.knots.borrow_mut().set_unknown_y(index, value)
    }

    fn add_unknowns_to(&self, sink: &mut dyn VariableSink) {
        for kp in self.knots.borrow().iter() {
            if !kp.known {
                sink.add_variable(kp.y);
            }
        }
    }

    fn knots(&self) -> SharedKnots {
        self.knots.clone()
    }

    fn clone_box(&self) -> Box<dyn SpineCurve> {
        let knots = Rc::new(RefCell::new(self.knots.borrow().clone()));
        Box::new(self.clone_onto(knots))
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::VariableStore;
    use approx::assert_relative_eq;

    fn sample_curve() -> UkpCurve {
        let mut curve = UkpCurve::new("StraightLine").unwrap();
        curve.add_knot(KnotPoint::unknown(1.0, 10.0)).unwrap();
        curve.add_knot(KnotPoint::unknown(2.0, 20.0)).unwrap();
        curve.add_knot(KnotPoint::known(3.0, 15.0)).unwrap();
        curve.finalize().unwrap();
        curve
    }

    // ====== Lifecycle ======

    #[test]
    fn finalize_requires_knots() {
        let mut curve = UkpCurve::new("StraightLine").unwrap();
        assert_eq!(curve.finalize().unwrap_err(), CurveError::EmptyCurve);
    }

    #[test]
    fn duplicate_knot_propagates() {
        let mut curve = sample_curve();
        let err = curve.add_knot(KnotPoint::known(2.0, 5.0)).unwrap_err();
        assert_eq!(err, CurveError::DuplicateKnot { x: 2.0 });
    }

    // ====== Unknowns ======

    #[test]
    fn unknowns_are_unknown_knot_values() {
        let curve = sample_curve();
        assert_eq!(curve.number_of_unknowns(), 2);
        assert_relative_eq!(curve.unknown(0).unwrap(), 10.0);
        assert_relative_eq!(curve.unknown(1).unwrap(), 20.0);
    }

    #[test]
    fn set_unknown_writes_through_to_evaluation() {
        let mut curve = sample_curve();
        curve.set_unknown(0, 12.0).unwrap();
        curve.update().unwrap();
        assert_relative_eq!(curve.evaluate(1.0), 12.0);
        assert_relative_eq!(curve.evaluate(1.5), 16.0);
    }

    #[test]
    fn add_unknowns_skips_known_knots() {
        let curve = sample_curve();
        let mut store = VariableStore::new();
        curve.add_unknowns_to(&mut store);
        assert_eq!(store.variables, vec![10.0, 20.0]);
    }

    // ====== Gradient ======

    #[test]
    fn gradient_accumulates_into_unknown_slots() {
        let curve = sample_curve();
        let mut gradient = vec![0.0; 2];
        curve.accumulate_gradient(1.5, 1.0, &mut gradient);
        assert_relative_eq!(gradient[0], 0.5);
        assert_relative_eq!(gradient[1], 0.5);
        // Additive on a second call.
        curve.accumulate_gradient(1.5, 1.0, &mut gradient);
        assert_relative_eq!(gradient[0], 1.0);
    }

    // ====== Cloning ======

    #[test]
    fn clone_owns_independent_storage() {
        let curve = sample_curve();
        let mut clone = curve.clone_box();
        clone.set_unknown(0, 99.0).unwrap();
        clone.update().unwrap();
        assert_relative_eq!(clone.evaluate(1.0), 99.0);
        // Original untouched.
        assert_relative_eq!(curve.evaluate(1.0), 10.0);
    }
}
