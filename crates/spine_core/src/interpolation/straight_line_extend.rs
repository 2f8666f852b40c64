//! Piecewise-linear interpolation that self-extends past the last knot.

use super::Interpolation;
use crate::types::{CurveError, CurveResult};
use crate::window::CurveWindow;

/// Piecewise-linear interpolation, flat before the first knot and extended
/// along the last segment's slope after the last knot.
///
/// This is the workhorse method for spine curves whose right end should
/// keep drifting with the last calibrated slope instead of flattening.
/// Inside the knot range it is plain linear interpolation; `integral`
/// and its gradient are supported via the trapezium decomposition.
#[derive(Debug, Clone, Default)]
pub struct StraightLineExtendInterpolation {
    window: CurveWindow,
}

impl StraightLineExtendInterpolation {
    /// Registry name.
    pub const NAME: &'static str = "StraightLineExtend";

    /// Creates the method; the window is installed by the owning curve.
    pub fn new() -> Self {
        Self::default()
    }

    fn segment(&self, lower: usize) -> (f64, f64, f64, f64) {
        let p = self.window.point(lower);
        let q = self.window.point(lower + 1);
        (p.x, p.y, q.x, q.y)
    }
}

impl Interpolation for StraightLineExtendInterpolation {
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
            // Flat before the first knot.
            return w.point(0).y;
        }
        if upper == w.len() {
            if w.len() == 1 {
                return w.point(0).y;
            }
            // Straight-line extension along the last segment's slope.
            let (xl, yl, xu, yu) = self.segment(w.len() - 2);
            return yl + (yu - yl) * (x - xl) / (xu - xl);
        }
        let (xl, yl, xu, yu) = self.segment(upper - 1);
        yl + (yu - yl) * (x - xl) / (xu - xl)
    }

    fn accumulate_gradient(&self, x: f64, multiplier: f64, gradient: &mut [f64]) {
        let w = &self.window;
        let mut upper = w.upper_bound(x);
        if upper == 0 {
            w.accumulate_at(0, multiplier, gradient);
            return;
        }
        if upper == w.len() {
            upper -= 1;
            if upper == 0 {
                w.accumulate_at(0, multiplier, gradient);
                return;
            }
        }
        let (xl, _, xu, _) = self.segment(upper - 1);
        let x_diff = xu - xl;
        w.accumulate_at(upper - 1, multiplier * (xu - x) / x_diff, gradient);
        w.accumulate_at(upper, multiplier * (x - xl) / x_diff, gradient);
    }

    // Trapezium decomposition from the first knot; the partial segment at
    // the end uses the (possibly extended) interpolated value at x.
    fn integral(&self, x: f64) -> CurveResult<f64> {
        let w = &self.window;
        let first = w.point(0);
        if x <= first.x {
            // Flat on the left.
            return Ok((x - first.x) * first.y);
        }

        let upper = w.upper_bound(x);
        let mut integral = 0.0;
        let mut last = first;
        for i in 1..upper {
            let p = w.point(i);
            integral += (p.y + last.y) * (p.x - last.x);
            last = p;
        }
        integral += (self.evaluate(x) + last.y) * (x - last.x);
        Ok(0.5 * integral)
    }

    fn accumulate_integral_gradient(
        &self,
        x: f64,
        multiplier: f64,
        gradient: &mut [f64],
    ) -> CurveResult<()> {
        let w = &self.window;
        let first = w.point(0);
        if x <= first.x {
            w.accumulate_at(0, multiplier * (x - first.x), gradient);
            return Ok(());
        }

        let upper = w.upper_bound(x);
        for i in 1..upper {
            let half_dx = 0.5 * (w.point(i).x - w.point(i - 1).x);
            w.accumulate_at(i - 1, multiplier * half_dx, gradient);
            w.accumulate_at(i, multiplier * half_dx, gradient);
        }

        if upper == w.len() {
            if w.len() < 2 {
                return Err(CurveError::InsufficientKnots {
                    required: 2,
                    provided: w.len(),
                });
            }
            // Right extension along the last segment's slope.
            let xn = w.point(w.len() - 1).x;
            let xn_1 = w.point(w.len() - 2).x;
            let inv = 1.0 / (xn - xn_1);
            w.accumulate_at(
                w.len() - 1,
                multiplier * 0.5 * (1.0 + (x - xn_1) * inv) * (x - xn),
                gradient,
            );
            w.accumulate_at(
                w.len() - 2,
                -multiplier * 0.5 * inv * (x - xn) * (x - xn),
                gradient,
            );
        } else {
            let (xl, _, xu, _) = self.segment(upper - 1);
            let x_diff = xu - xl;
            w.accumulate_at(
                upper - 1,
                multiplier * 0.5 * (1.0 + (xu - x) / x_diff) * (x - xl),
                gradient,
            );
            w.accumulate_at(
                upper,
                multiplier * 0.5 * (x - xl) * (x - xl) / x_diff,
                gradient,
            );
        }
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Interpolation> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::test_support::{check_gradient, check_integral_gradient};
    use crate::knots::{KnotPoint, KnotPoints, SharedKnots};
    use approx::assert_relative_eq;

    fn fixture() -> (StraightLineExtendInterpolation, SharedKnots) {
        let knots = KnotPoints::new_shared();
        {
            let mut k = knots.borrow_mut();
            k.add(KnotPoint::unknown(1.0, 10.0)).unwrap();
            k.add(KnotPoint::unknown(2.0, 20.0)).unwrap();
            k.add(KnotPoint::known(3.0, 15.0)).unwrap();
        }
        let mut m = StraightLineExtendInterpolation::new();
        m.set_window(CurveWindow::full(knots.clone())).unwrap();
        (m, knots)
    }

    fn method() -> StraightLineExtendInterpolation {
        fixture().0
    }

    // ====== Evaluation ======

    #[test]
    fn test_hits_knots_exactly() {
        let m = method();
        assert_relative_eq!(m.evaluate(1.0), 10.0);
        assert_relative_eq!(m.evaluate(2.0), 20.0);
        assert_relative_eq!(m.evaluate(3.0), 15.0);
    }

    #[test]
    fn test_linear_between_knots() {
        let m = method();
        assert_relative_eq!(m.evaluate(1.5), 15.0);
        assert_relative_eq!(m.evaluate(2.5), 17.5);
    }

    #[test]
    fn test_flat_left_of_first_knot() {
        let m = method();
        assert_relative_eq!(m.evaluate(0.0), 10.0);
        assert_relative_eq!(m.evaluate(-5.0), 10.0);
    }

    #[test]
    fn test_extends_last_slope_on_right() {
        let m = method();
        // Last segment slope is (15 - 20) / (3 - 2) = -5.
        assert_relative_eq!(m.evaluate(4.0), 10.0);
        assert_relative_eq!(m.evaluate(5.0), 5.0);
    }

    #[test]
    fn test_rate_like_values_across_all_regions() {
        let knots = KnotPoints::new_shared();
        {
            let mut k = knots.borrow_mut();
            k.add(KnotPoint::known(0.0, 1.0)).unwrap();
            k.add(KnotPoint::known(1.0, 1.2)).unwrap();
            k.add(KnotPoint::unknown(2.0, 0.9)).unwrap();
        }
        let mut m = StraightLineExtendInterpolation::new();
        m.set_window(CurveWindow::full(knots)).unwrap();

        assert_relative_eq!(m.evaluate(0.5), 1.1);
        assert_relative_eq!(m.evaluate(-1.0), 1.0);
        // 1.2 + (0.9 - 1.2) * (3 - 1) / (2 - 1)
        assert_relative_eq!(m.evaluate(3.0), 0.6);
    }

    #[test]
    fn test_single_knot_is_constant() {
        let knots = KnotPoints::new_shared();
        knots.borrow_mut().add(KnotPoint::known(1.0, 7.0)).unwrap();
        let mut m = StraightLineExtendInterpolation::new();
        m.set_window(CurveWindow::full(knots)).unwrap();
        assert_relative_eq!(m.evaluate(0.0), 7.0);
        assert_relative_eq!(m.evaluate(1.0), 7.0);
        assert_relative_eq!(m.evaluate(9.0), 7.0);
    }

    #[test]
    fn test_empty_window_rejected() {
        let mut m = StraightLineExtendInterpolation::new();
        let err = m.set_window(CurveWindow::full(KnotPoints::new_shared()));
        assert_eq!(err.unwrap_err(), CurveError::EmptyCurve);
    }

    // ====== Gradient ======

    #[test]
    fn test_gradient_hat_weights() {
        let m = method();
        let mut grad = vec![0.0; 2];
        m.accumulate_gradient(1.25, 1.0, &mut grad);
        assert_relative_eq!(grad[0], 0.75);
        assert_relative_eq!(grad[1], 0.25);
    }

    #[test]
    fn test_gradient_is_additive() {
        let m = method();
        let mut grad = vec![1.0, -1.0];
        m.accumulate_gradient(1.5, 2.0, &mut grad);
        assert_relative_eq!(grad[0], 2.0);
        assert_relative_eq!(grad[1], 0.0);
    }

    #[test]
    fn test_gradient_skips_known_knot() {
        let m = method();
        // Between x=2 (unknown, slot 1) and x=3 (known): only slot 1 moves.
        let mut grad = vec![0.0; 2];
        m.accumulate_gradient(2.5, 1.0, &mut grad);
        assert_relative_eq!(grad[0], 0.0);
        assert_relative_eq!(grad[1], 0.5);
    }

    #[test]
    fn test_gradient_matches_finite_differences() {
        let (mut m, knots) = fixture();
        for &x in &[-1.0, 1.3, 2.7, 4.5] {
            check_gradient(&mut m, &knots, x);
        }
    }

    // ====== Integral ======

    #[test]
    fn test_integral_over_full_segments() {
        let m = method();
        // Trapezia: (10+20)/2 over [1,2] + (20+15)/2 over [2,3].
        assert_relative_eq!(m.integral(3.0).unwrap(), 15.0 + 17.5);
    }

    #[test]
    fn test_integral_left_of_first_knot_is_signed() {
        let m = method();
        assert_relative_eq!(m.integral(0.0).unwrap(), -10.0);
    }

    #[test]
    fn test_integral_beyond_last_knot_uses_extension() {
        let m = method();
        // f(4) = 10, trapezium over [3,4] adds (15+10)/2.
        assert_relative_eq!(m.integral(4.0).unwrap(), 15.0 + 17.5 + 12.5);
    }

    #[test]
    fn test_integral_gradient_matches_finite_differences() {
        let (mut m, knots) = fixture();
        for &x in &[0.5, 1.5, 2.5, 4.0] {
            check_integral_gradient(&mut m, &knots, x);
        }
    }
}
