//! Left-continuous step interpolation (each knot's y holds to its right).

use super::Interpolation;
use crate::types::{CurveError, CurveResult};
use crate::window::CurveWindow;

/// Step interpolation where the value on `[x_i, x_{i+1})` is `y_i`.
///
/// Left of the first knot the first y is used. The running integral and
/// its gradient are supported: with piecewise-constant values they are a
/// plain sum of `y_i * dx_i` terms, which makes this method the natural
/// choice for forward-rate spines integrated into discount factors.
#[derive(Debug, Clone, Default)]
pub struct FlatRightInterpolation {
    window: CurveWindow,
}

impl FlatRightInterpolation {
    /// Registry name.
    pub const NAME: &'static str = "FlatRight";

    /// Creates the method; the window is installed by the owning curve.
    pub fn new() -> Self {
        Self::default()
    }

    /// Window-relative position of the knot governing `x`.
    fn governing(&self, x: f64) -> usize {
        let upper = self.window.upper_bound(x);
        upper.saturating_sub(1)
    }
}

impl Interpolation for FlatRightInterpolation {
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
        if x < first.x {
            return Ok((x - first.x) * first.y);
        }
        let upper = w.upper_bound(x);
        let mut integral = 0.0;
        let mut last = first;
        for i in 1..upper {
            let p = w.point(i);
            integral += last.y * (p.x - last.x);
            last = p;
        }
        Ok(integral + last.y * (x - last.x))
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
        let mut last = first;
        for i in 1..upper {
            let p = w.point(i);
            w.accumulate_at(i - 1, multiplier * (p.x - last.x), gradient);
            last = p;
        }
        w.accumulate_at(upper - 1, multiplier * (x - last.x), gradient);
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Interpolation> {
        Box::new(self.clone())
    }
}
