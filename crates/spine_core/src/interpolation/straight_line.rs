//! Plain piecewise-linear interpolation, flat outside the knot range.

use super::Interpolation;
use crate::types::{CurveError, CurveResult};
use crate::window::CurveWindow;

/// Piecewise-linear interpolation, clamped flat on both sides of the knot
/// range (dedicated extrapolation methods normally take over out there).
#[derive(Debug, Clone, Default)]
pub struct StraightLineInterpolation {
    window: CurveWindow,
}

impl StraightLineInterpolation {
    /// Registry name.
    pub const NAME: &'static str = "StraightLine";

    /// Creates the method; the window is installed by the owning curve.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Interpolation for StraightLineInterpolation {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_window(&mut self, window: CurveWindow) -> CurveResult<()> {
        if window.is_empty() {
            return Err(CurveError::EmptyCurve);
        }
        self.window = window;
        Ok(())
    }

    fn evaluate(&self, x: f64) -> f64 {
        let w = &self.window;
        let upper = w.upper_bound(x);
        if upper == 0 {
            return w.point(0).y;
        }
        if upper == w.len() {
            return w.point(w.len() - 1).y;
        }
        let p = w.point(upper - 1);
        let q = w.point(upper);
        p.y + (q.y - p.y) * (x - p.x) / (q.x - p.x)
    }

    fn accumulate_gradient(&self, x: f64, multiplier: f64, gradient: &mut [f64]) {
        let w = &self.window;
        let upper = w.upper_bound(x);
        if upper == 0 {
            w.accumulate_at(0, multiplier, gradient);
            return;
        }
        if upper == w.len() {
            w.accumulate_at(w.len() - 1, multiplier, gradient);
            return;
        }
        let p = w.point(upper - 1);
        let q = w.point(upper);
        let x_diff = q.x - p.x;
        w.accumulate_at(upper - 1, multiplier * (q.x - x) / x_diff, gradient);
        w.accumulate_at(upper, multiplier * (x - p.x) / x_diff, gradient);
    }

    fn clone_box(&self) -> Box<dyn Interpolation> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::test_support::check_gradient;
    use crate::knots::{KnotPoint, KnotPoints, SharedKnots};
    use approx::assert_relative_eq;

    fn fixture() -> (StraightLineInterpolation, SharedKnots) {
        let knots = KnotPoints::new_shared();
        {
            let mut k = knots.borrow_mut();
            k.add(KnotPoint::unknown(0.0, 1.0)).unwrap();
            k.add(KnotPoint::known(1.0, 3.0)).unwrap();
            k.add(KnotPoint::unknown(2.0, 2.0)).unwrap();
        }
        let mut m = StraightLineInterpolation::new();
        m.set_window(CurveWindow::full(knots.clone())).unwrap();
        (m, knots)
    }

    // ====== Evaluation ======

    #[test]
    fn test_interior_and_knots() {
        let (m, _) = fixture();
        assert_relative_eq!(m.evaluate(0.5), 2.0);
        assert_relative_eq!(m.evaluate(1.0), 3.0);
        assert_relative_eq!(m.evaluate(1.5), 2.5);
    }

    #[test]
    fn test_flat_both_sides() {
        let (m, _) = fixture();
        assert_relative_eq!(m.evaluate(-2.0), 1.0);
        assert_relative_eq!(m.evaluate(7.0), 2.0);
    }

    // ====== Gradient ======

    #[test]
    fn test_flat_regions_route_to_edge_knots() {
        let (m, _) = fixture();
        let mut grad = vec![0.0; 2];
        m.accumulate_gradient(-1.0, 1.0, &mut grad);
        m.accumulate_gradient(9.0, 1.0, &mut grad);
        assert_eq!(grad, vec![1.0, 1.0]);
    }

    #[test]
    fn test_gradient_matches_finite_differences() {
        let (mut m, knots) = fixture();
        for &x in &[-1.0, 0.25, 1.75, 3.0] {
            check_gradient(&mut m, &knots, x);
        }
    }
}
