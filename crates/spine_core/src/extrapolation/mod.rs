//! Extrapolation methods for the regions outside a curve's knot range.
//!
//! An extrapolation method produces values from the boundary knots of its
//! window, but its calibration gradient is routed through the
//! interpolation curve it extends: at construction the owning curve
//! injects an [`InterpGradientFn`] closure, and the extrapolation method
//! only ever calls that closure at boundary-knot x values. This keeps the
//! chain rule intact whatever the interpolation method is.

mod flat;
mod straight_line;

pub use flat::FlatExtrapolation;
pub use straight_line::StraightLineExtrapolation;

use crate::types::{CurveError, CurveResult};
use crate::window::CurveWindow;
use std::rc::Rc;

/// Which side of the knot range an extrapolation method covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtrapSide {
    /// Left of the first knot.
    Left,
    /// Right of the last knot.
    Right,
}

impl ExtrapSide {
    /// Display name, matching the original side-spec naming.
    pub fn name(self) -> &'static str {
        match self {
            ExtrapSide::Left => "Left",
            ExtrapSide::Right => "Right",
        }
    }
}

/// Gradient of the underlying interpolation curve, injected by the owning
/// curve: `f(x, multiplier, gradient)` accumulates
/// `multiplier * d(interp(x)) / d(unknown_k)` into `gradient[k]`.
pub type InterpGradientFn = Rc<dyn Fn(f64, f64, &mut [f64])>;

/// An extrapolation method over one side of a knot window.
///
/// The gradient contract is the same additive one as
/// [`crate::interpolation::Interpolation::accumulate_gradient`].
pub trait Extrapolation {
    /// Registry name of the method.
    fn name(&self) -> &'static str;

    /// The side this instance covers.
    fn side(&self) -> ExtrapSide;

    /// Installs the window and the interpolation-gradient closure, then
    /// validates that the window has enough knots.
    fn set_window(
        &mut self,
        window: CurveWindow,
        interp_gradient: InterpGradientFn,
    ) -> CurveResult<()>;

    /// Extrapolated value at `x`.
    fn evaluate(&self, x: f64) -> f64;

    /// Accumulates the value gradient at `x` into `gradient` (additive),
    /// routed through the injected interpolation gradient.
    fn accumulate_gradient(&self, x: f64, multiplier: f64, gradient: &mut [f64]);

    /// Clones the method behind a box. As for interpolation methods, the
    /// owning curve rebinds clones with a fresh `set_window`.
    fn clone_box(&self) -> Box<dyn Extrapolation>;
}

impl Clone for Box<dyn Extrapolation> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// All registered extrapolation method names.
pub const EXTRAPOLATION_NAMES: &[&str] =
    &[FlatExtrapolation::NAME, StraightLineExtrapolation::NAME];

/// Constructs an extrapolation method from its registry name.
///
/// # Errors
///
/// Returns [`CurveError::UnknownName`] when the name is not registered.
pub fn extrapolation_from_name(name: &str, side: ExtrapSide) -> CurveResult<Box<dyn Extrapolation>> {
    match name {
        FlatExtrapolation::NAME => Ok(Box::new(FlatExtrapolation::new(side))),
        StraightLineExtrapolation::NAME => Ok(Box::new(StraightLineExtrapolation::new(side))),
        _ => Err(CurveError::UnknownName {
            kind: "extrapolation",
            name: name.to_string(),
        }),
    }
}

pub(crate) fn noop_gradient() -> InterpGradientFn {
    Rc::new(|_x, _m, _g: &mut [f64]| {})
}
