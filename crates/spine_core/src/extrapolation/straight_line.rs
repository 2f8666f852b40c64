//! Straight-line extrapolation through the two boundary knots.

use super::{noop_gradient, ExtrapSide, Extrapolation, InterpGradientFn};
use crate::types::{CurveError, CurveResult};
use crate::window::CurveWindow;
use std::fmt;

/// Straight-line extrapolation through the two knots nearest the boundary.
///
/// Out of two knot points `(x0, y0)` and `(x1, y1)` the value is
///
/// ```text
/// [(x - x0) * y1 + (x1 - x) * y0] / (x1 - x0)
/// ```
///
/// The gradient chains through the injected interpolation gradient at the
/// two boundary x values, weighted by the same barycentric factors.
#[derive(Clone)]
pub struct StraightLineExtrapolation {
    side: ExtrapSide,
    window: CurveWindow,
    /// Window-relative positions of the two boundary knots.
    kp0: usize,
    kp1: usize,
    den_inverse: f64,
    interp_gradient: InterpGradientFn,
}

impl fmt::Debug for StraightLineExtrapolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StraightLineExtrapolation")
            .field("side", &self.side)
            .field("kp0", &self.kp0)
            .field("kp1", &self.kp1)
            .finish()
    }
}

impl StraightLineExtrapolation {
    /// Registry name.
    pub const NAME: &'static str = "StraightLine";

    /// Creates the method for `side`; the window and gradient closure are
    /// installed by the owning curve.
    pub fn new(side: ExtrapSide) -> Self {
        Self {
            side,
            window: CurveWindow::default(),
            kp0: 0,
            kp1: 0,
            den_inverse: 0.0,
            interp_gradient: noop_gradient(),
        }
    }
}

impl Extrapolation for StraightLineExtrapolation {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn side(&self) -> ExtrapSide {
        self.side
    }

    fn set_window(
        &mut self,
        window: CurveWindow,
        interp_gradient: InterpGradientFn,
    ) -> CurveResult<()> {
        if window.len() < 2 {
            return Err(CurveError::InsufficientKnots {
                required: 2,
                provided: window.len(),
            });
        }
        (self.kp0, self.kp1) = match self.side {
            ExtrapSide::Left => (0, 1),
            ExtrapSide::Right => (window.len() - 2, window.len() - 1),
        };
        self.den_inverse = 1.0 / (window.point(self.kp1).x - window.point(self.kp0).x);
        self.window = window;
        self.interp_gradient = interp_gradient;
        Ok(())
    }

    fn evaluate(&self, x: f64) -> f64 {
        let p0 = self.window.point(self.kp0);
        let p1 = self.window.point(self.kp1);
        if x == p0.x {
            return p0.y;
        }
        if x == p1.x {
            return p1.y;
        }
        ((x - p0.x) * p1.y + (p1.x - x) * p0.y) * self.den_inverse
    }

    fn accumulate_gradient(&self, x: f64, multiplier: f64, gradient: &mut [f64]) {
        let x0 = self.window.point(self.kp0).x;
        let x1 = self.window.point(self.kp1).x;
        (self.interp_gradient)(x0, multiplier * (x1 - x) * self.den_inverse, gradient);
        (self.interp_gradient)(x1, multiplier * (x - x0) * self.den_inverse, gradient);
    }

    fn clone_box(&self) -> Box<dyn Extrapolation> {
        Box::new(self.clone())
    }
}
