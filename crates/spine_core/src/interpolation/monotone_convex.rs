//! Hagan-West monotone convex spline interpolation.

use super::Interpolation;
use crate::types::{CurveError, CurveResult};
use crate::window::CurveWindow;

/// Monotone convex spline interpolation (Hagan & West).
///
/// Knot y values must represent the integral of the instantaneous forward
/// rate from 0 to the knot's x (a log-discount-style formulation). The
/// method caches discrete forwards `df` and interval-endpoint forwards `f`
/// at every [`update`](Interpolation::update); the endpoint-forward
/// gradients (`gl`/`gr` triples) depend on knot spacing only and are
/// computed once when the window is set.
///
/// Extrapolation is flat on both sides of the knot range. With fewer than
/// four knots the method degrades to piecewise-linear interpolation.
///
/// An optional positivity clamp on the endpoint forwards can be enabled
/// with [`with_positive_forwards`](Self::with_positive_forwards). The
/// clamp is not differentiable, so the analytic gradient ignores it; it is
/// off by default and rarely binds in practice.
#[derive(Debug, Clone)]
pub struct MonotoneConvexSplineInterpolation {
    window: CurveWindow,
    /// Discrete forwards; `df[i] = (y[i] - y[i-1]) / (x[i] - x[i-1])`, index 0 unused.
    df: Vec<f64>,
    /// Instantaneous forwards at the knots.
    f: Vec<f64>,
    /// Gradient triples of `g[i-1] = f[i-1] - df[i]` per interval.
    gl: Vec<[f64; 3]>,
    /// Gradient triples of `g[i] = f[i] - df[i]` per interval.
    gr: Vec<[f64; 3]>,
    enforce_positivity: bool,
    positivity_coef: f64,
}

impl Default for MonotoneConvexSplineInterpolation {
    fn default() -> Self {
        Self {
            window: CurveWindow::default(),
            df: Vec::new(),
            f: Vec::new(),
            gl: Vec::new(),
            gr: Vec::new(),
            enforce_positivity: false,
            // Hagan & West suggest 2.0 to stay a reasonable distance away
            // from zero; anything in [1, 3] is accepted.
            positivity_coef: 2.0,
        }
    }
}

impl MonotoneConvexSplineInterpolation {
    /// Registry name.
    pub const NAME: &'static str = "MonotoneConvexSpline";

    /// Creates the method with the positivity clamp disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables the endpoint-forward positivity clamp.
    ///
    /// `coef` bounds the clamped forwards to `[0, coef * df]`; values
    /// outside `[1, 3]` fall back to 2.0.
    pub fn with_positive_forwards(mut self, coef: f64) -> Self {
        self.enforce_positivity = true;
        self.positivity_coef = if (1.0..=3.0).contains(&coef) { coef } else { 2.0 };
        self
    }

    /// Fills the `gl`/`gr` gradient triples; knot spacing only.
    fn precompute_endpoint_gradients(&mut self) {
        let n = self.window.len();
        self.gl = vec![[0.0; 3]; n];
        self.gr = vec![[0.0; 3]; n];

        let mut delta_i = self.window.point(1).x - self.window.point(0).x;
        let mut delta_ip1 = 0.0;
        let mut delta_im1 = 0.0;

        for index in 1..n {
            if index < n - 1 {
                delta_ip1 = self.window.point(index + 1).x - self.window.point(index).x;
                // g[i] on [t[i-1], t[i]) relative to knots i-1, i, i+1.
                self.gr[index] = [
                    1.0 / (delta_i + delta_ip1),
                    -1.0 / delta_ip1,
                    delta_i / (delta_ip1 * (delta_i + delta_ip1)),
                ];
            } else {
                // Last interval: f[n] is the extrapolated boundary value,
                // so g[n] depends on the last three knots.
                self.gr[index] = [
                    0.5 * delta_i / (delta_im1 * (delta_im1 + delta_i)),
                    -0.5 / delta_im1,
                    0.5 / (delta_im1 + delta_i),
                ];
            }

            if index > 1 {
                // g[i-1] on [t[i-1], t[i]) relative to knots i-2, i-1, i.
                self.gl[index] = [
                    -delta_i / ((delta_im1 + delta_i) * delta_im1),
                    1.0 / delta_im1,
                    -1.0 / (delta_im1 + delta_i),
                ];
            } else {
                // First interval: f[0] is the extrapolated boundary value,
                // so g[0] depends on the first three knots.
                self.gl[index] = [
                    -0.5 / (delta_i + delta_ip1),
                    0.5 / delta_ip1,
                    -0.5 * delta_i / ((delta_i + delta_ip1) * delta_ip1),
                ];
            }

            delta_im1 = delta_i;
            delta_i = delta_ip1;
        }
    }

    fn clamp_endpoint_forwards(&mut self) {
        let n = self.f.len();
        let coef = self.positivity_coef;
        for index in 1..n {
            let g_im1 = self.f[index - 1] - self.df[index];
            let g_i = self.f[index] - self.df[index];
            if g_im1 <= 0.0 || g_i <= 0.0 {
                continue;
            }
            let bound_im1 = if index == 1 {
                coef * self.df[1]
            } else {
                coef * self.df[index].min(self.df[index - 1])
            };
            let bound_i = if index == n - 1 {
                coef * self.df[index]
            } else {
                coef * self.df[index].min(self.df[index + 1])
            };
            if !(0.0 < self.f[index - 1] && self.f[index - 1] < bound_im1) {
                self.f[index - 1] = self.f[index - 1].clamp(0.0, bound_im1.max(0.0));
            }
            if !(0.0 < self.f[index] && self.f[index] < bound_i) {
                self.f[index] = self.f[index].clamp(0.0, bound_i.max(0.0));
            }
        }
    }

    fn linear_segment(&self, lower: usize, x: f64) -> f64 {
        let p = self.window.point(lower);
        let q = self.window.point(lower + 1);
        p.y + (q.y - p.y) * (x - p.x) / (q.x - p.x)
    }
}

impl Interpolation for MonotoneConvexSplineInterpolation {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_window(&mut self, window: CurveWindow) -> CurveResult<()> {
        if window.is_empty() {
            return Err(CurveError::EmptyCurve);
        }
        self.window = window;
        let n = self.window.len();
        if n > 1 {
            self.df = vec![0.0; n];
            self.f = vec![0.0; n];
            self.update()?;
            self.precompute_endpoint_gradients();
        }
        Ok(())
    }

    fn update(&mut self) -> CurveResult<()> {
        let n = self.window.len();
        if n < 2 {
            return Ok(());
        }

        // Discrete forwards (index 0 stays unused).
        for i in 1..n {
            let p = self.window.point(i - 1);
            let q = self.window.point(i);
            self.df[i] = (q.y - p.y) / (q.x - p.x);
        }

        // Interior instantaneous forwards: weighted average of the two
        // adjacent discrete forwards.
        let last = n - 1;
        for i in 1..last {
            let xm1 = self.window.point(i - 1).x;
            let x = self.window.point(i).x;
            let xp1 = self.window.point(i + 1).x;
            self.f[i] = ((x - xm1) * self.df[i + 1] + (xp1 - x) * self.df[i]) / (xp1 - xm1);
        }

        // Boundary forwards, chosen so that f'(t) vanishes at the ends.
        self.f[0] = self.df[1] - 0.5 * (self.f[1] - self.df[1]);
        self.f[last] = self.df[last] - 0.5 * (self.f[last - 1] - self.df[last]);

        if self.enforce_positivity {
            self.clamp_endpoint_forwards();
        }
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
        if w.len() < 4 {
            return self.linear_segment(upper - 1, x);
        }

        let index = upper;
        let previous = w.point(upper - 1);
        let delta_t = w.point(upper).x - previous.x;
        let x_t = (x - previous.x) / delta_t;

        // Remainder integral of g(t) = f(t) - df over [t[i-1], x].
        let coef1 = self.f[index - 1] - self.df[index];
        let coef3 = coef1 + self.f[index] - self.df[index];
        let coef2 = coef1 + coef3;
        let remainder = delta_t * x_t * (coef1 + x_t * (-coef2 + x_t * coef3));

        w.point(upper).y * x_t + previous.y * (1.0 - x_t) + remainder
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
        if w.len() < 4 {
            let p = w.point(upper - 1);
            let q = w.point(upper);
            let x_diff = q.x - p.x;
            w.accumulate_at(upper - 1, multiplier * (q.x - x) / x_diff, gradient);
            w.accumulate_at(upper, multiplier * (x - p.x) / x_diff, gradient);
            return;
        }

        let index = upper;
        let previous = w.point(upper - 1);
        let delta_i = w.point(upper).x - previous.x;
        let x_t = (x - previous.x) / delta_i;

        // Polynomials multiplying g[i-1] and g[i] in the remainder.
        let phi_t = delta_i * x_t * (1.0 + x_t * (-2.0 + x_t));
        let psi_t = delta_i * x_t * x_t * (x_t - 1.0);

        let n = w.len();
        if index == 1 {
            // First interval: both boundary triples span knots 0..2.
            w.accumulate_at(
                0,
                multiplier * (1.0 - x_t + phi_t * self.gl[1][0] + psi_t * self.gr[1][0]),
                gradient,
            );
            w.accumulate_at(
                1,
                multiplier * (x_t + phi_t * self.gl[1][1] + psi_t * self.gr[1][1]),
                gradient,
            );
            w.accumulate_at(
                2,
                multiplier * (phi_t * self.gl[1][2] + psi_t * self.gr[1][2]),
                gradient,
            );
        } else if index == n - 1 {
            // Last interval: both triples span the last three knots.
            let li = n - 1;
            w.accumulate_at(
                n - 3,
                multiplier * (phi_t * self.gl[li][0] + psi_t * self.gr[li][0]),
                gradient,
            );
            w.accumulate_at(
                n - 2,
                multiplier * (1.0 - x_t + phi_t * self.gl[li][1] + psi_t * self.gr[li][1]),
                gradient,
            );
            w.accumulate_at(
                n - 1,
                multiplier * (x_t + phi_t * self.gl[li][2] + psi_t * self.gr[li][2]),
                gradient,
            );
        } else {
            w.accumulate_at(index - 2, multiplier * phi_t * self.gl[index][0], gradient);
            w.accumulate_at(
                index - 1,
                multiplier * (1.0 - x_t + phi_t * self.gl[index][1] + psi_t * self.gr[index][0]),
                gradient,
            );
            w.accumulate_at(
                index,
                multiplier * (x_t + phi_t * self.gl[index][2] + psi_t * self.gr[index][1]),
                gradient,
            );
            w.accumulate_at(index + 1, multiplier * psi_t * self.gr[index][2], gradient);
        }
    }

    fn clone_box(&self) -> Box<dyn Interpolation> {
        Box::new(self.clone())
    }
}
