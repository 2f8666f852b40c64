//! Flat extrapolation from the boundary knot.

use super::{noop_gradient, ExtrapSide, Extrapolation, InterpGradientFn};
use crate::types::{CurveError, CurveResult};
use crate::window::CurveWindow;
use std::fmt;

/// Flat extrapolation: every x maps to the boundary knot's y.
///
/// The gradient is the interpolation curve's gradient at the boundary
/// knot's x, routed through the injected closure.
#[derive(Clone)]
pub struct FlatExtrapolation {
    side: ExtrapSide,
    window: CurveWindow,
    /// Window-relative position of the boundary knot.
    extreme: usize,
    interp_gradient: InterpGradientFn,
}

impl fmt::Debug for FlatExtrapolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlatExtrapolation")
            .field("side", &self.side)
            .field("extreme", &self.extreme)
            .finish()
    }
}

impl FlatExtrapolation {
    /// Registry name.
    pub const NAME: &'static str = "Flat";

    /// Creates the method for `side`; the window and gradient closure are
    /// installed by the owning curve.
    pub fn new(side: ExtrapSide) -> Self {
        Self {
            side,
            window: CurveWindow::default(),
            extreme: 0,
            interp_gradient: noop_gradient(),
        }
    }
}

impl Extrapolation for FlatExtrapolation {
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
        if window.is_empty() {
            return Err(CurveError::InsufficientKnots {
                required: 1,
                provided: 0,
            });
        }
        self.extreme = match self.side {
            ExtrapSide::Left => 0,
            ExtrapSide::Right => window.len() - 1,
        };
        self.window = window;
        self.interp_gradient = interp_gradient;
        Ok(())
    }

    fn evaluate(&self, _x: f64) -> f64 {
        self.window.point(self.extreme).y
    }

    fn accumulate_gradient(&self, _x: f64, multiplier: f64, gradient: &mut [f64]) {
        let boundary_x = self.window.point(self.extreme).x;
        (self.interp_gradient)(boundary_x, multiplier, gradient);
    }

    fn clone_box(&self) -> Box<dyn Extrapolation> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knots::{KnotPoint, KnotPoints, SharedKnots};
    use approx::assert_relative_eq;
    use std::rc::Rc;

    fn shared() -> SharedKnots {
        let knots = KnotPoints::new_shared();
        {
            let mut k = knots.borrow_mut();
            k.add(KnotPoint::unknown(1.0, 10.0)).unwrap();
            k.add(KnotPoint::unknown(3.0, 30.0)).unwrap();
        }
        knots
    }

    #[test]
    fn test_left_uses_first_knot() {
        let mut m = FlatExtrapolation::new(ExtrapSide::Left);
        m.set_window(CurveWindow::full(shared()), noop_gradient())
            .unwrap();
        assert_relative_eq!(m.evaluate(-5.0), 10.0);
        assert_relative_eq!(m.evaluate(0.9), 10.0);
    }

    #[test]
    fn test_right_uses_last_knot() {
        let mut m = FlatExtrapolation::new(ExtrapSide::Right);
        m.set_window(CurveWindow::full(shared()), noop_gradient())
            .unwrap();
        assert_relative_eq!(m.evaluate(100.0), 30.0);
    }

    #[test]
    fn test_reads_fresh_y_after_update() {
        let knots = shared();
        let mut m = FlatExtrapolation::new(ExtrapSide::Right);
        m.set_window(CurveWindow::full(knots.clone()), noop_gradient())
            .unwrap();
        knots.borrow_mut().set_unknown_y(1, 99.0).unwrap();
        assert_relative_eq!(m.evaluate(5.0), 99.0);
    }

    #[test]
    fn test_gradient_routes_through_closure_at_boundary_x() {
        let mut m = FlatExtrapolation::new(ExtrapSide::Left);
        let grad_fn: InterpGradientFn = Rc::new(|x, mult, g: &mut [f64]| {
            // Record the x the closure was called with.
            g[0] += mult;
            g[1] += x;
        });
        m.set_window(CurveWindow::full(shared()), grad_fn).unwrap();
        let mut grad = vec![0.0; 2];
        m.accumulate_gradient(-7.0, 2.0, &mut grad);
        assert_relative_eq!(grad[0], 2.0);
        assert_relative_eq!(grad[1], 1.0); // boundary x, not -7.0
    }

    #[test]
    fn test_empty_window_rejected() {
        let mut m = FlatExtrapolation::new(ExtrapSide::Left);
        let err = m
            .set_window(CurveWindow::full(KnotPoints::new_shared()), noop_gradient())
            .unwrap_err();
        assert_eq!(
            err,
            CurveError::InsufficientKnots {
                required: 1,
                provided: 0
            }
        );
    }
}
