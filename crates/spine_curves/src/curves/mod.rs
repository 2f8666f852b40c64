//! Curve facades over the interpolation engine.

mod base;
mod composite;
mod tension;
mod transform;
mod ukp;

pub use base::{BaseCurve, BaseCurveConfig};
pub use composite::{CompositeCurve, SeparationChoice};
pub use tension::TensionSplineCurve;
pub use transform::TransformCurve;
pub use ukp::UkpCurve;

use spine_core::knots::{KnotPoint, SharedKnots};
use spine_core::types::CurveResult;

use crate::problem::{FixedResidualSink, VariableSink};

/// The contract every spine curve implements.
///
/// A spine curve owns shared knot storage and exposes a calibration
/// surface: a flat vector of unknowns, an evaluate function, and an
/// additive gradient of the value with respect to those unknowns. For most
/// formulations the unknowns are the y values of unknown knots; the tension
/// spline instead exposes its basis coefficients.
///
/// Lifecycle: `add_knot` while building, one `finalize`, then any number of
/// `set_unknown`/`update`/`evaluate` rounds from the calibration loop.
pub trait SpineCurve {
    /// Adds a knot point.
    ///
    /// # Errors
    ///
    /// Propagates [`spine_core::types::CurveError::DuplicateKnot`] when a
    /// knot with the same x already exists.
    fn add_knot(&mut self, kp: KnotPoint) -> CurveResult<()>;

    /// Completes construction: installs windows and derived state.
    fn finalize(&mut self) -> CurveResult<()>;

    /// Refreshes state derived from the current unknowns.
    fn update(&mut self) -> CurveResult<()>;

    /// Curve value at `x`.
    fn evaluate(&self, x: f64) -> f64;

    /// Accumulates `multiplier * d(evaluate(x)) / d(unknown_k)` into
    /// `gradient[k]`. Accumulation is additive; the buffer is never
    /// cleared here.
    fn accumulate_gradient(&self, x: f64, multiplier: f64, gradient: &mut [f64]);

    /// Number of unknowns exposed to the calibration problem.
    fn number_of_unknowns(&self) -> usize;

    /// Current value of the i-th unknown.
    fn unknown(&self, index: usize) -> CurveResult<f64>;

    /// Sets the i-th unknown.
    fn set_unknown(&mut self, index: usize, value: f64) -> CurveResult<()>;

    /// Pushes every unknown into `sink`, in gradient-slot order.
    fn add_unknowns_to(&self, sink: &mut dyn VariableSink);

    /// Registers fixed-knot residual targets with `sink`.
    ///
    /// Formulations whose unknowns are the unknown-knot values have
    /// nothing to register; the default does nothing.
    fn register_fixed_residuals(&self, _sink: &mut dyn FixedResidualSink) {}

    /// Re-initializes the unknowns from the current knot values, after the
    /// knots have been seeded with initial y's.
    ///
    /// The default does nothing: when the unknowns are the knot values
    /// themselves, seeding the knots already seeds the unknowns.
    fn on_knots_initialized(&mut self) -> CurveResult<()> {
        Ok(())
    }

    /// Shared handle to the knot storage.
    fn knots(&self) -> SharedKnots;

    /// Clones the curve onto fresh knot storage.
    ///
    /// The clone owns a deep copy of the knots and has its windows rebound
    /// to that copy, so mutating the clone never touches the original.
    fn clone_box(&self) -> Box<dyn SpineCurve>;
}

impl Clone for Box<dyn SpineCurve> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
