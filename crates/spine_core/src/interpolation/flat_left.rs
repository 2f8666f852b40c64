//! Right-continuous step interpolation (each knot's y holds to its left).

use super::Interpolation;
use crate::types::{CurveError, CurveResult};
use crate::window::CurveWindow;

/// Step interpolation where the value on `(x_{i-1}, x_i]` is `y_i`.
///
/// Right of the last knot the last y is used.
#[derive(Debug, Clone, Default)]
pub struct FlatLeftInterpolation {
    window: CurveWindow,
}

impl FlatLeftInterpolation {
    /// Registry name.
    pub const NAME: &'static str = "FlatLeft";

    /// Creates the method; the window is installed by the owning curve.
    pub fn new() -> Self {
        Self::default()
    }

    /// Window-relative position of the knot governing `x`.
    fn governing(&self, x: f64) -> usize {
        let lower = self.window.lower_bound(x);
        lower.min(self.window.len() - 1)
    }
}

impl Interpolation for FlatLeftInterpolation {
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
        self.window.point(self.governing(x)).y
    }

    fn accumulate_gradient(&self, x: f64, multiplier: f64, gradient: &mut [f64]) {
        self.window.accumulate_at(self.governing(x), multiplier, gradient);
    }

    fn integral(&self, x: f64) -> CurveResult<f64> {
        let w = &self.window;
        let first = w.point(0);
        if x <= first.x {
            return Ok((x - first.x) * first.y);
        }
        let lower = w.lower_bound(x);
        let mut integral = 0.0;
        let mut last_x = first.x;
        for i in 1..lower {
            let p = w.point(i);
            integral += p.y * (p.x - last_x);
            last_x = p.x;
        }
        let tail = w.point(lower.min(w.len() - 1)).y;
        Ok(integral + tail * (x - last_x))
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
        let lower = w.lower_bound(x);
        let mut last_x = first.x;
        for i in 1..lower {
            let p = w.point(i);
            w.accumulate_at(i, multiplier * (p.x - last_x), gradient);
            last_x = p.x;
        }
        w.accumulate_at(lower.min(w.len() - 1), multiplier * (x - last_x), gradient);
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

    fn fixture() -> (FlatLeftInterpolation, SharedKnots) {
        let knots = KnotPoints::new_shared();
        {
            let mut k = knots.borrow_mut();
            k.add(KnotPoint::unknown(1.0, 2.0)).unwrap();
            k.add(KnotPoint::known(2.0, 5.0)).unwrap();
            k.add(KnotPoint::unknown(4.0, 3.0)).unwrap();
        }
        let mut m = FlatLeftInterpolation::new();
        m.set_window(CurveWindow::full(knots.clone())).unwrap();
        (m, knots)
    }

    // ====== Evaluation ======

    #[test]
    fn test_step_values() {
        let (m, _) = fixture();
        assert_relative_eq!(m.evaluate(0.5), 2.0);
        assert_relative_eq!(m.evaluate(1.0), 2.0);
        assert_relative_eq!(m.evaluate(1.1), 5.0);
        assert_relative_eq!(m.evaluate(2.0), 5.0);
        assert_relative_eq!(m.evaluate(2.1), 3.0);
        assert_relative_eq!(m.evaluate(9.0), 3.0);
    }

    // ====== Gradient ======

    #[test]
    fn test_gradient_matches_finite_differences() {
        let (mut m, knots) = fixture();
        for &x in &[0.5, 1.5, 3.0, 5.0] {
            check_gradient(&mut m, &knots, x);
        }
    }

    // ====== Integral ======

    #[test]
    fn test_integral_piecewise_constant() {
        let (m, _) = fixture();
        // 5 over (1,2], 3 over (2,4] and beyond.
        assert_relative_eq!(m.integral(2.0).unwrap(), 5.0);
        assert_relative_eq!(m.integral(4.0).unwrap(), 11.0);
        assert_relative_eq!(m.integral(1.5).unwrap(), 2.5);
        assert_relative_eq!(m.integral(5.0).unwrap(), 14.0);
    }

    #[test]
    fn test_integral_gradient_matches_finite_differences() {
        let (mut m, knots) = fixture();
        for &x in &[0.5, 1.5, 3.0, 5.0] {
            check_integral_gradient(&mut m, &knots, x);
        }
    }
}
