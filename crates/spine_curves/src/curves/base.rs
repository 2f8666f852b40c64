//! The full curve facade: interpolation inside the knot range, pluggable
//! extrapolation outside it.

use std::cell::RefCell;
use std::rc::Rc;

use spine_core::extrapolation::{
    extrapolation_from_name, ExtrapSide, Extrapolation, InterpGradientFn,
};
use spine_core::knots::{KnotPoint, SharedKnots};
use spine_core::types::{CurveError, CurveResult};
use spine_core::window::CurveWindow;

use super::{SpineCurve, UkpCurve};
use crate::problem::{FixedResidualSink, VariableSink};

/// Construction parameters for a [`BaseCurve`].
#[derive(Debug, Clone)]
pub struct BaseCurveConfig {
    /// Interpolation method name for the inner curve.
    pub interpolation: String,
    /// Left extrapolation method name.
    pub left_extrapolation: String,
    /// Right extrapolation method name.
    pub right_extrapolation: String,
    /// Transform function name, for [`super::TransformCurve`] construction.
    pub transform: Option<String>,
}

impl Default for BaseCurveConfig {
    fn default() -> Self {
        Self {
            interpolation: "StraightLine".into(),
            left_extrapolation: "Flat".into(),
            right_extrapolation: "StraightLine".into(),
            transform: None,
        }
    }
}

impl BaseCurveConfig {
    /// Builds a [`BaseCurve`] over a fresh [`UkpCurve`] from the names.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::UnknownName`] for an unregistered
    /// interpolation or extrapolation name.
    pub fn build(&self) -> CurveResult<BaseCurve> {
        BaseCurve::new(
            Box::new(UkpCurve::new(&self.interpolation)?),
            &self.left_extrapolation,
            &self.right_extrapolation,
        )
    }
}

/// A spine curve completed with left and right extrapolation.
///
/// Evaluation routes on the knot range: `x <= x_min` goes to the left
/// extrapolation, `x < x_max` to the inner curve, everything else to the
/// right extrapolation; the first knot's value is thus produced by the
/// LEFT extrapolation and the last knot's by the RIGHT one. Both
/// extrapolation methods receive a gradient closure onto the inner curve
/// at `finalize`, so their calibration gradients stay exact whatever the
/// interpolation is.
pub struct BaseCurve {
    inner: Rc<RefCell<Box<dyn SpineCurve>>>,
    knots: SharedKnots,
    left: Box<dyn Extrapolation>,
    right: Box<dyn Extrapolation>,
    finalized: bool,
}

impl BaseCurve {
    /// Creates a facade over `inner` with named extrapolation methods.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::UnknownName`] for an unregistered
    /// extrapolation name.
    pub fn new(
        inner: Box<dyn SpineCurve>,
        left_extrapolation: &str,
        right_extrapolation: &str,
    ) -> CurveResult<Self> {
        let knots = inner.knots();
        Ok(Self {
            inner: Rc::new(RefCell::new(inner)),
            knots,
            left: extrapolation_from_name(left_extrapolation, ExtrapSide::Left)?,
            right: extrapolation_from_name(right_extrapolation, ExtrapSide::Right)?,
            finalized: false,
        })
    }

    /// Number of knot points.
    pub fn number_of_knots(&self) -> usize {
        self.knots.borrow().len()
    }

    /// Adds `shift_k` to each unknown, skipping exact zeros, then updates.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidInput`] when the shift vector length
    /// does not match the number of unknowns.
    pub fn apply_shifts(&mut self, shifts: &[f64]) -> CurveResult<()> {
        let n = self.number_of_unknowns();
        if shifts.len() != n {
            return Err(CurveError::InvalidInput(format!(
                "{} shifts for {n} unknowns",
                shifts.len()
            )));
        }
        {
            let mut inner = self.inner.borrow_mut();
            for (k, &shift) in shifts.iter().enumerate() {
                if shift != 0.0 {
                    let value = inner.unknown(k)?;
                    inner.set_unknown(k, value + shift)?;
                }
            }
        }
        self.update()
    }

    fn wire_extrapolations(&mut self) -> CurveResult<()> {
        let inner = self.inner.clone();
        let gradient: InterpGradientFn = Rc::new(move |x, multiplier, buffer: &mut [f64]| {
            inner.borrow().accumulate_gradient(x, multiplier, buffer);
        });
        self.left
            .set_window(CurveWindow::full(self.knots.clone()), gradient.clone())?;
        self.right
            .set_window(CurveWindow::full(self.knots.clone()), gradient)
    }

    fn knot_range(&self) -> Option<(f64, f64)> {
        let knots = self.knots.borrow();
        match (knots.first(), knots.last()) {
            (Some(first), Some(last)) => Some((first.x, last.x)),
            _ => None,
        }
    }
}

impl SpineCurve for BaseCurve {
    fn add_knot(&mut self, kp: KnotPoint) -> CurveResult<()> {
        self.inner.borrow_mut().add_knot(kp)
    }

    fn finalize(&mut self) -> CurveResult<()> {
        self.inner.borrow_mut().finalize()?;
        self.wire_extrapolations()?;
        self.finalized = true;
        Ok(())
    }

    fn update(&mut self) -> CurveResult<()> {
        // Extrapolation methods read through shared windows and cache only
        // x geometry, so refreshing the inner curve is enough.
        self.inner.borrow_mut().update()
    }

    fn evaluate(&self, x: f64) -> f64 {
        let Some((x_min, x_max)) = self.knot_range() else {
            return f64::NAN;
        };
        if x <= x_min {
            self.left.evaluate(x)
        } else if x < x_max {
            self.inner.borrow().evaluate(x)
        } else {
            self.right.evaluate(x)
        }
    }

    fn accumulate_gradient(&self, x: f64, multiplier: f64, gradient: &mut [f64]) {
        let Some((x_min, x_max)) = self.knot_range() else {
            return;
        };
        if x <= x_min {
            self.left.accumulate_gradient(x, multiplier, gradient);
        } else if x < x_max {
            self.inner.borrow().accumulate_gradient(x, multiplier, gradient);
        } else {
            self.right.accumulate_gradient(x, multiplier, gradient);
        }
    }

    fn number_of_unknowns(&self) -> usize {
        self.inner.borrow().number_of_unknowns()
    }

    fn unknown(&self, index: usize) -> CurveResult<f64> {
        self.inner.borrow().unknown(index)
    }

    fn set_unknown(&mut self, index: usize, value: f64) -> CurveResult<()> {
        self.inner.borrow_mut().set_unknown(index, value)
    }

    fn add_unknowns_to(&self, sink: &mut dyn VariableSink) {
        self.inner.borrow().add_unknowns_to(sink);
    }

    fn register_fixed_residuals(&self, sink: &mut dyn FixedResidualSink) {
        self.inner.borrow().register_fixed_residuals(sink);
    }

    fn on_knots_initialized(&mut self) -> CurveResult<()> {
        self.inner.borrow_mut().on_knots_initialized()
    }

    fn knots(&self) -> SharedKnots {
        self.knots.clone()
    }

    fn clone_box(&self) -> Box<dyn SpineCurve> {
        Box::new(self.clone())
    }
}

impl Clone for BaseCurve {
    fn clone(&self) -> Self {
        let inner = self.inner.borrow().clone_box();
        let knots = inner.knots();
        let mut clone = Self {
            inner: Rc::new(RefCell::new(inner)),
            knots,
            left: self.left.clone_box(),
            right: self.right.clone_box(),
            finalized: false,
        };
        if self.finalized {
            // A finalized source wired its extrapolations over the same
            // knot shape, so rewiring over the copy succeeds.
            match clone.wire_extrapolations() {
                Ok(()) => clone.finalized = true,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to rewire extrapolations on clone")
                }
            }
        }
        clone
    }
}

// ============================================================
// Tests
// ============================================================
