//! Bi-quadratic interpolation: a blend of adjacent three-point parabolas.

use super::Interpolation;
use crate::types::{CurveError, CurveResult};
use crate::window::CurveWindow;

/// Shape of the degenerate quadratics at the two ends of the knot range.
///
/// Quadratic `Q[i]` normally passes through knots `i-1, i, i+1`; the first
/// and last quadratics have no neighbour on one side, so they degenerate
/// to a constant or a straight line through the edge segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeQuadratic {
    /// Constant at the edge knot's y.
    Constant,
    /// Straight line through the edge segment.
    Linear,
}

/// Bi-quadratic interpolation.
///
/// For knots `(x[i], y[i])`, `Q[i]` is the parabola through the points
/// `i-1, i, i+1` (degenerate at the ends per [`EdgeQuadratic`]). On
/// `[x[i-1], x[i])` the value is the convex blend
///
/// ```text
/// l(x) * Q[i](x) + (1 - l(x)) * Q[i-1](x),
/// l(x) = (x - x[i-1]) / (x[i] - x[i-1])
/// ```
///
/// Left of the first knot the method extends flat; right of the last knot
/// it carries on the last segment's slope. With only two knots it degrades
/// to straight-line interpolation.
///
/// The gradient uses per-quadratic coefficient derivatives that depend on
/// knot x spacing only; they are precomputed once when the window is set.
/// The value at `x` touches at most the four knots `i-2 .. i+1`.
#[derive(Debug, Clone)]
pub struct BiQuadraticInterpolation {
    window: CurveWindow,
    first_quadratic: EdgeQuadratic,
    last_quadratic: EdgeQuadratic,
    alpha_grad: Vec<[f64; 3]>,
    beta_grad: Vec<[f64; 3]>,
    gamma_grad: Vec<[f64; 3]>,
}

impl Default for BiQuadraticInterpolation {
    fn default() -> Self {
        Self::new(EdgeQuadratic::Constant, EdgeQuadratic::Linear)
    }
}

impl BiQuadraticInterpolation {
    /// Registry name.
    pub const NAME: &'static str = "BiQuadratic";

    /// Creates the method with explicit edge-quadratic shapes.
    pub fn new(first_quadratic: EdgeQuadratic, last_quadratic: EdgeQuadratic) -> Self {
        Self {
            window: CurveWindow::default(),
            first_quadratic,
            last_quadratic,
            alpha_grad: Vec::new(),
            beta_grad: Vec::new(),
            gamma_grad: Vec::new(),
        }
    }

    fn x_at(&self, i: usize) -> f64 {
        self.window.point(i).x
    }

    fn y_at(&self, i: usize) -> f64 {
        self.window.point(i).y
    }

    fn slope(&self, i: usize) -> f64 {
        (self.y_at(i) - self.y_at(i - 1)) / (self.x_at(i) - self.x_at(i - 1))
    }

    /// x^2 coefficient of `Q[index]`.
    fn alpha(&self, index: usize) -> f64 {
        if index == 0 || index + 1 == self.window.len() {
            return 0.0;
        }
        let (xm1, x, xp1) = (self.x_at(index - 1), self.x_at(index), self.x_at(index + 1));
        let (ym1, y, yp1) = (self.y_at(index - 1), self.y_at(index), self.y_at(index + 1));
        ((yp1 - y) / (xp1 - x) - (y - ym1) / (x - xm1)) / (xp1 - xm1)
    }

    /// x coefficient of `Q[index]`.
    fn beta(&self, index: usize, alpha: f64) -> f64 {
        let n = self.window.len();
        if index == 0 {
            return match self.first_quadratic {
                EdgeQuadratic::Constant => 0.0,
                EdgeQuadratic::Linear => self.slope(1),
            };
        }
        if index + 1 == n {
            return match self.last_quadratic {
                EdgeQuadratic::Constant => 0.0,
                EdgeQuadratic::Linear => self.slope(n - 1),
            };
        }
        self.slope(index) - (self.x_at(index - 1) + self.x_at(index)) * alpha
    }

    /// Constant coefficient of `Q[index]`.
    fn gamma(&self, index: usize, alpha: f64) -> f64 {
        let n = self.window.len();
        if index == 0 {
            return match self.first_quadratic {
                EdgeQuadratic::Constant => self.y_at(0),
                EdgeQuadratic::Linear => self.y_at(0) - self.x_at(0) * self.slope(1),
            };
        }
        if index + 1 == n {
            return match self.last_quadratic {
                EdgeQuadratic::Constant => self.y_at(n - 1),
                EdgeQuadratic::Linear => self.y_at(n - 2) - self.x_at(n - 2) * self.slope(n - 1),
            };
        }
        self.y_at(index - 1) + self.x_at(index - 1) * (self.x_at(index) * alpha - self.slope(index))
    }

    /// Precomputes the coefficient derivatives of every quadratic with
    /// respect to the three knot y values it passes through. These depend
    /// on knot x spacing only.
    fn precompute_gradients(&mut self) {
        let n = self.window.len();
        self.alpha_grad = vec![[0.0; 3]; n];
        self.beta_grad = vec![[0.0; 3]; n];
        self.gamma_grad = vec![[0.0; 3]; n];

        let mut t_im1 = self.x_at(0);
        let mut t_i = self.x_at(1);
        let mut delta_i = t_i - t_im1;

        // Degenerate first quadratic: slot 0 (a knot left of the range)
        // stays zero.
        match self.first_quadratic {
            EdgeQuadratic::Constant => {
                self.gamma_grad[0][1] = 1.0;
            }
            EdgeQuadratic::Linear => {
                self.beta_grad[0][1] = -1.0 / delta_i;
                self.beta_grad[0][2] = 1.0 / delta_i;
                self.gamma_grad[0][1] = t_i / delta_i;
                self.gamma_grad[0][2] = -t_im1 / delta_i;
            }
        }

        for index in 1..n - 1 {
            let t_ip1 = self.x_at(index + 1);
            let delta_ip1 = t_ip1 - t_i;

            let a = [
                1.0 / (delta_i * (delta_i + delta_ip1)),
                -1.0 / (delta_i * delta_ip1),
                1.0 / (delta_ip1 * (delta_i + delta_ip1)),
            ];
            self.alpha_grad[index] = a;
            self.beta_grad[index] = [
                -(t_i + t_ip1) * a[0],
                -(t_im1 + t_ip1) * a[1],
                -(t_im1 + t_i) * a[2],
            ];
            self.gamma_grad[index] = [
                t_i * t_ip1 * a[0],
                t_im1 * t_ip1 * a[1],
                t_im1 * t_i * a[2],
            ];

            t_im1 = t_i;
            t_i = t_ip1;
            delta_i = delta_ip1;
        }

        // Degenerate last quadratic: slot 2 (a knot right of the range)
        // stays zero.
        match self.last_quadratic {
            EdgeQuadratic::Constant => {
                self.gamma_grad[n - 1][1] = 1.0;
            }
            EdgeQuadratic::Linear => {
                self.beta_grad[n - 1][0] = -1.0 / delta_i;
                self.beta_grad[n - 1][1] = 1.0 / delta_i;
                self.gamma_grad[n - 1][0] = t_i / delta_i;
                self.gamma_grad[n - 1][1] = -t_im1 / delta_i;
            }
        }
    }

    fn linear_segment(&self, lower: usize, x: f64) -> f64 {
        let p = self.window.point(lower);
        let q = self.window.point(lower + 1);
        p.y + (q.y - p.y) * (x - p.x) / (q.x - p.x)
    }
}

impl Interpolation for BiQuadraticInterpolation {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_window(&mut self, window: CurveWindow) -> CurveResult<()> {
        if window.len() < 2 {
            return Err(CurveError::InsufficientKnots {
                required: 2,
                provided: window.len(),
            });
        }
        self.window = window;
        if self.window.len() >= 3 {
            self.precompute_gradients();
        } else {
            tracing::debug!("bi-quadratic degrades to linear with fewer than 3 knots");
        }
        Ok(())
    }

    fn evaluate(&self, x: f64) -> f64 {
        let w = &self.window;
        let upper = w.upper_bound(x);
        if upper == 0 {
            // Flat on the left.
            return w.point(0).y;
        }
        if upper == w.len() {
            // Carry on the last segment's slope.
            return self.linear_segment(w.len() - 2, x);
        }
        if w.len() == 2 {
            return self.linear_segment(0, x);
        }

        let lower = w.point(upper - 1);
        if lower.x == x {
            return lower.y;
        }

        let index = upper;
        let alpha_l = self.alpha(index - 1);
        let alpha_r = self.alpha(index);
        let beta_l = self.beta(index - 1, alpha_l);
        let beta_r = self.beta(index, alpha_r);
        let gamma_l = self.gamma(index - 1, alpha_l);
        let gamma_r = self.gamma(index, alpha_r);

        let upper_x = w.point(upper).x;
        let coef0 = upper_x * gamma_l - lower.x * gamma_r;
        let coef1 = gamma_r - lower.x * beta_r + upper_x * beta_l - gamma_l;
        let coef2 = beta_r - lower.x * alpha_r + upper_x * alpha_l - beta_l;
        let coef3 = alpha_r - alpha_l;
        (coef0 + x * (coef1 + x * (coef2 + x * coef3))) / (upper_x - lower.x)
    }

    fn accumulate_gradient(&self, x: f64, multiplier: f64, gradient: &mut [f64]) {
        let w = &self.window;
        let upper = w.upper_bound(x);
        if upper == 0 {
            w.accumulate_at(0, multiplier, gradient);
            return;
        }
        if upper == w.len() || w.len() == 2 {
            // Straight-line weights on the governing segment.
            let seg = if upper == w.len() { w.len() - 2 } else { 0 };
            let p = w.point(seg);
            let q = w.point(seg + 1);
            let x_diff = q.x - p.x;
            w.accumulate_at(seg, multiplier * (q.x - x) / x_diff, gradient);
            w.accumulate_at(seg + 1, multiplier * (x - p.x) / x_diff, gradient);
            return;
        }

        let index = upper;
        let lower = w.point(upper - 1);
        let delta_i = w.point(upper).x - lower.x;
        let x_t = (x - lower.x) / delta_i;
        let one_minus_x_t = 1.0 - x_t;

        // Partial derivatives of the left and right quadratics with
        // respect to the three knot y values each passes through.
        let q_grad = |idx: usize, k: usize| {
            self.gamma_grad[idx][k] + x * (self.beta_grad[idx][k] + x * self.alpha_grad[idx][k])
        };

        w.accumulate_at(
            index - 1,
            multiplier * (x_t * q_grad(index, 0) + one_minus_x_t * q_grad(index - 1, 1)),
            gradient,
        );
        w.accumulate_at(
            index,
            multiplier * (x_t * q_grad(index, 1) + one_minus_x_t * q_grad(index - 1, 2)),
            gradient,
        );
        if index > 1 {
            w.accumulate_at(
                index - 2,
                multiplier * one_minus_x_t * q_grad(index - 1, 0),
                gradient,
            );
        }
        if index < w.len() - 1 {
            w.accumulate_at(index + 1, multiplier * x_t * q_grad(index, 2), gradient);
        }
    }

    fn clone_box(&self) -> Box<dyn Interpolation> {
        Box::new(self.clone())
    }
}
