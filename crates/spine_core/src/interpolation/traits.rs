//! The interpolation-method contract.

use crate::types::{CurveError, CurveResult};
use crate::window::CurveWindow;

/// An interpolation method over a window of knot points.
///
/// Implementations never own knot points: the owning curve hands them a
/// [`CurveWindow`] via [`set_window`](Interpolation::set_window), and calls
/// [`update`](Interpolation::update) whenever knot y values change so the
/// method can refresh its caches.
///
/// # Gradient contract
///
/// `accumulate_gradient(x, multiplier, gradient)` ADDS
/// `multiplier * d(evaluate(x)) / d(unknown_k)` into `gradient[k]` for each
/// unknown knot `k` the value at `x` depends on. It never zeroes or
/// overwrites the buffer, so several calls compose into one accumulated
/// gradient. Slot `k` is the window-relative dense index of the k-th
/// unknown knot.
pub trait Interpolation {
    /// Registry name of the method.
    fn name(&self) -> &'static str;

    /// Installs the window and runs the method's validation and
    /// precomputation hook.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InsufficientKnots`] (or another validation
    /// error) when the window cannot support the method.
    fn set_window(&mut self, window: CurveWindow) -> CurveResult<()>;

    /// Recomputes value caches after knot y values changed.
    fn update(&mut self) -> CurveResult<()> {
        Ok(())
    }

    /// Interpolated value at `x`.
    ///
    /// Outside the window the method self-extends according to its own
    /// convention; a dedicated extrapolation method normally takes over
    /// there.
    fn evaluate(&self, x: f64) -> f64;

    /// Accumulates the value gradient at `x` into `gradient` (additive).
    fn accumulate_gradient(&self, x: f64, multiplier: f64, gradient: &mut [f64]);

    /// Integral of the interpolated function from the first knot to `x`.
    ///
    /// Only some methods support this; the default is
    /// [`CurveError::NotImplemented`].
    fn integral(&self, _x: f64) -> CurveResult<f64> {
        Err(CurveError::NotImplemented {
            what: "integral of this interpolation method",
        })
    }

    /// Accumulates the gradient of [`integral`](Interpolation::integral)
    /// into `gradient` (additive).
    fn accumulate_integral_gradient(
        &self,
        _x: f64,
        _multiplier: f64,
        _gradient: &mut [f64],
    ) -> CurveResult<()> {
        Err(CurveError::NotImplemented {
            what: "integral gradient of this interpolation method",
        })
    }

    /// Clones the method behind a box.
    ///
    /// The clone still views the ORIGINAL window; the owning curve rebinds
    /// it to cloned storage by calling `set_window` again.
    fn clone_box(&self) -> Box<dyn Interpolation>;
}

impl core::fmt::Debug for dyn Interpolation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Interpolation")
            .field("name", &self.name())
            .finish()
    }
}

impl Clone for Box<dyn Interpolation> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
