//! Tension spline curve: unknowns are basis coefficients, not knot values.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use spine_core::bspline::{
    knot_at, BSplineDefiningFunctions, ExponentialBSplineDefiningFunctions,
};
use spine_core::knots::{KnotPoint, SharedKnots};
use spine_core::math::solvers::solve_qr;
use spine_core::types::{CurveError, CurveResult};

use super::SpineCurve;
use crate::problem::{FixedResidualSink, VariableSink};

/// A generalized tension spline over the knot points, in the B-spline-like
/// basis built from a psi/phi defining function pair.
///
/// Unlike [`super::UkpCurve`], the calibration unknowns are the basis
/// coefficients, one per knot. Knot y values are DERIVED: [`update`]
/// recomputes every knot's y from the coefficients. Known knots therefore
/// cannot be pinned by excluding variables; instead each known knot
/// registers a fixed residual that the calibration problem carries.
///
/// The natural end conditions (vanishing second derivative at the first
/// and last knot) determine the two boundary coefficients `b[0]` and
/// `b[M+1]` from their neighbours, so only the `M` interior coefficients
/// are free.
///
/// [`update`]: SpineCurve::update
pub struct TensionSplineCurve {
    knots: SharedKnots,
    coefficients: Vec<f64>,
    /// Knot x values padded with three synthetic knots on each side.
    knot_sequence: Vec<f64>,
    /// One tension per padded knot sequence entry.
    tension_parameters: Vec<f64>,
    /// Interval index (left knot index, extended below zero for the
    /// padding intervals) to tension overrides.
    tension_overrides: BTreeMap<i32, f64>,
    default_tension: f64,
    family: Box<dyn BSplineDefiningFunctions>,
    fixed_residuals: Vec<(f64, f64)>,
    finalized: bool,
}

impl TensionSplineCurve {
    /// Registry name of this curve formulation.
    pub const NAME: &'static str = "TensionSpline";

    /// Creates an empty spline with the exponential defining functions.
    pub fn new(default_tension: f64) -> Self {
        Self::with_family(Box::new(ExponentialBSplineDefiningFunctions), default_tension)
    }

    /// Creates an empty spline with explicit defining functions.
    pub fn with_family(family: Box<dyn BSplineDefiningFunctions>, default_tension: f64) -> Self {
        Self {
            knots: spine_core::knots::KnotPoints::new_shared(),
            coefficients: Vec::new(),
            knot_sequence: Vec::new(),
            tension_parameters: Vec::new(),
            tension_overrides: BTreeMap::new(),
            default_tension,
            family,
            fixed_residuals: Vec::new(),
            finalized: false,
        }
    }

    /// Sets the tension of one knot interval, keyed by its left knot index
    /// (indices below zero address the padding intervals).
    ///
    /// The first setting for an interval wins; later settings for the same
    /// interval are ignored, so configuration loaded first takes
    /// precedence.
    pub fn set_tension(&mut self, interval_index: i32, tension: f64) {
        self.tension_overrides.entry(interval_index).or_insert(tension);
    }

    /// Current coefficient values.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    fn n_coefs(&self) -> i32 {
        self.coefficients.len() as i32
    }

    /// The x of the `index`-th real knot, 1-based, via the padded sequence.
    fn knot_from_index(&self, index: i32) -> f64 {
        knot_at(&self.knot_sequence, index)
    }

    /// Coefficient `b[k]` in the 1-based functional representation.
    ///
    /// `b[0]` and `b[M+1]` are derived from the natural end conditions;
    /// anything further out is zero.
    fn coefficient(&self, k: i32) -> f64 {
        let n = self.n_coefs();
        if 0 < k && k <= n {
            return self.coefficients[(k - 1) as usize];
        }
        if k == 0 {
            let ratio = self.y_diff(0) / self.y_diff(1);
            return self.coefficients[0] - (self.coefficients[1] - self.coefficients[0]) * ratio;
        }
        if k == n + 1 {
            let last = (n - 1) as usize;
            let ratio = self.y_diff(n) / self.y_diff(n - 1);
            return self.coefficients[last]
                + (self.coefficients[last] - self.coefficients[last - 1]) * ratio;
        }
        0.0
    }

    /// Index i with `x[i] <= t < x[i+1]` over the real knots (1-based),
    /// capped at the coefficient count for `t` at or beyond the last knot.
    fn coef_index(&self, t: f64) -> i32 {
        if let Some(last) = self.knots.borrow().last() {
            if t >= last.x {
                return self.n_coefs();
            }
        }
        let mut index = 2usize;
        while index < self.knot_sequence.len() && t >= self.knot_sequence[index] {
            index += 1;
        }
        index as i32 - 3
    }

    fn psi(&self, index: i32, t: f64) -> f64 {
        self.family
            .psi(&self.knot_sequence, &self.tension_parameters, index, t)
    }

    fn psi_derivative(&self, index: i32, t: f64) -> f64 {
        self.family
            .psi_derivative(&self.knot_sequence, &self.tension_parameters, index, t)
    }

    fn phi(&self, index: i32, t: f64) -> f64 {
        self.family
            .phi(&self.knot_sequence, &self.tension_parameters, index, t)
    }

    fn phi_derivative(&self, index: i32, t: f64) -> f64 {
        self.family
            .phi_derivative(&self.knot_sequence, &self.tension_parameters, index, t)
    }

    fn z(&self, index: i32) -> f64 {
        let t = self.knot_from_index(index);
        self.psi(index - 1, t) - self.phi(index, t)
    }

    fn z_derivative(&self, index: i32) -> f64 {
        let t = self.knot_from_index(index);
        self.psi_derivative(index - 1, t) - self.phi_derivative(index, t)
    }

    fn y_aux(&self, index: i32) -> f64 {
        self.knot_from_index(index) - self.z(index) / self.z_derivative(index)
    }

    fn y_diff(&self, index: i32) -> f64 {
        self.y_aux(index + 1) - self.y_aux(index)
    }

    fn phi_on_zder(&self, index: i32, t: f64) -> f64 {
        self.phi(index, t) / self.z_derivative(index)
    }

    fn psi_on_zder(&self, index: i32, t: f64) -> f64 {
        self.psi(index, t) / self.z_derivative(index + 1)
    }

    fn phi_psi_coef(&self, index: i32, t: f64) -> f64 {
        (t - self.y_aux(index) + self.phi_on_zder(index, t) - self.psi_on_zder(index, t))
            / self.y_diff(index)
    }

    fn weight_m1(&self, index: i32, t: f64) -> f64 {
        self.phi_on_zder(index, t) / (self.y_aux(index) - self.y_aux(index - 1))
    }

    fn weight(&self, index: i32, t: f64) -> f64 {
        1.0 - self.phi_psi_coef(index, t) - self.phi_on_zder(index, t) / self.y_diff(index - 1)
    }

    fn weight_p1(&self, index: i32, t: f64) -> f64 {
        self.phi_psi_coef(index, t) - self.psi_on_zder(index, t) / self.y_diff(index + 1)
    }

    fn weight_p2(&self, index: i32, t: f64) -> f64 {
        self.psi_on_zder(index, t) / self.y_diff(index + 1)
    }

    fn interpolate(&self, t: f64) -> f64 {
        let index = self.coef_index(t);
        self.coefficient(index - 1) * self.weight_m1(index, t)
            + self.coefficient(index) * self.weight(index, t)
            + self.coefficient(index + 1) * self.weight_p1(index, t)
            + self.coefficient(index + 2) * self.weight_p2(index, t)
    }

    /// Accumulates `multiplier * value` into the gradient slot of the knot
    /// at position `index`, if that knot is unknown.
    fn set_gradient(&self, index: i32, multiplier: f64, gradient: &mut [f64], value: f64) {
        let pos = index as usize;
        let knots = self.knots.borrow();
        if !knots.get(pos).map(|kp| kp.known).unwrap_or(true) {
            gradient[knots.unknown_index(pos)] += multiplier * value;
        }
    }

    /// Maps a weight on coefficient `b[k]` to the free-coefficient columns
    /// of an initialization matrix row, folding in the end conditions.
    fn fold_weight_into_row(&self, row: &mut [f64], k: i32, weight: f64) {
        let n = self.n_coefs();
        if 0 < k && k <= n {
            row[(k - 1) as usize] += weight;
        } else if k == 0 {
            let ratio = self.y_diff(0) / self.y_diff(1);
            row[0] += (1.0 + ratio) * weight;
            row[1] -= ratio * weight;
        } else if k == n + 1 {
            let ratio = self.y_diff(n) / self.y_diff(n - 1);
            row[(n - 1) as usize] += (1.0 + ratio) * weight;
            row[(n - 2) as usize] -= ratio * weight;
        }
        // Anything further out multiplies a zero coefficient.
    }
}

impl SpineCurve for TensionSplineCurve {
    fn add_knot(&mut self, kp: KnotPoint) -> CurveResult<()> {
        let fixed = kp.known.then(|| (kp.x, kp.y));
        self.knots.borrow_mut().add(kp)?;
        self.coefficients.push(1.0);
        if let Some(pair) = fixed {
            self.fixed_residuals.push(pair);
        }
        Ok(())
    }

    fn finalize(&mut self) -> CurveResult<()> {
        let (first, last, xs) = {
            let knots = self.knots.borrow();
            if knots.len() < 2 {
                return Err(CurveError::InsufficientKnots {
                    required: 2,
                    provided: knots.len(),
                });
            }
            // Both bounds exist once len >= 2.
            let first = knots.first().map(|kp| kp.x).unwrap_or(f64::NAN);
            let last = knots.last().map(|kp| kp.x).unwrap_or(f64::NAN);
            (first, last, knots.xs())
        };

        // Placement of the synthetic knots is arbitrary as long as the
        // sequence stays ordered.
        self.knot_sequence.clear();
        self.knot_sequence
            .extend([first - 3.0, first - 2.0, first - 1.0]);
        self.knot_sequence.extend(xs);
        self.knot_sequence.extend([last + 1.0, last + 2.0, last + 3.0]);

        self.tension_parameters.clear();
        let mut interval = -2i32;
        for _ in 0..self.knot_sequence.len() {
            self.tension_parameters.push(
                self.tension_overrides
                    .get(&interval)
                    .copied()
                    .unwrap_or(self.default_tension),
            );
            interval += 1;
        }

        self.finalized = true;
        Ok(())
    }

    fn update(&mut self) -> CurveResult<()> {
        let xs = self.knots.borrow().xs();
        let ys: Vec<f64> = xs.iter().map(|&x| self.interpolate(x)).collect();
        let mut knots = self.knots.borrow_mut();
        for (pos, y) in ys.into_iter().enumerate() {
            knots.set_y(pos, y)?;
        }
        Ok(())
    }

    fn evaluate(&self, x: f64) -> f64 {
        self.interpolate(x)
    }

    fn accumulate_gradient(&self, t: f64, multiplier: f64, gradient: &mut [f64]) {
        let n = self.n_coefs();
        let index = self.coef_index(t);

        if index > 1 {
            self.set_gradient(index - 2, multiplier, gradient, self.weight_m1(index, t));
        } else {
            // End condition at the first knot: b[0] is derived, so its
            // weight is redistributed onto b[1] and b[2].
            let ratio = self.y_diff(0) / self.y_diff(1);
            let weight_m1 = self.weight_m1(index, t);
            self.set_gradient(0, multiplier, gradient, (1.0 + ratio) * weight_m1);
            self.set_gradient(1, multiplier, gradient, -ratio * weight_m1);
        }

        self.set_gradient(index - 1, multiplier, gradient, self.weight(index, t));

        if index < n {
            self.set_gradient(index, multiplier, gradient, self.weight_p1(index, t));

            if index < n - 1 {
                self.set_gradient(index + 1, multiplier, gradient, self.weight_p2(index, t));
            } else {
                // End condition at the last knot, through the p2 weight.
                let ratio = self.y_diff(n) / self.y_diff(n - 1);
                let weight_p2 = self.weight_p2(index, t);
                self.set_gradient(n - 2, multiplier, gradient, -ratio * weight_p2);
                self.set_gradient(n - 1, multiplier, gradient, (1.0 + ratio) * weight_p2);
            }
        } else {
            // index == n: b[M+2] does not exist, and b[M+1] is derived.
            let ratio = self.y_diff(n) / self.y_diff(n - 1);
            let weight_p1 = self.weight_p1(index, t);
            self.set_gradient(n - 2, multiplier, gradient, -ratio * weight_p1);
            self.set_gradient(n - 1, multiplier, gradient, (1.0 + ratio) * weight_p1);
        }
    }

    fn number_of_unknowns(&self) -> usize {
        self.coefficients.len()
    }

    fn unknown(&self, index: usize) -> CurveResult<f64> {
        self.coefficients
            .get(index)
            .copied()
            .ok_or(CurveError::IndexOutOfRange {
                index,
                len: self.coefficients.len(),
            })
    }

    fn set_unknown(&mut self, index: usize, value: f64) -> CurveResult<()> {
        match self.coefficients.get_mut(index) {
            Some(c) => {
                *c = value;
                Ok(())
            }
            None => Err(CurveError::IndexOutOfRange {
                index,
                len: self.coefficients.len(),
            }),
        }
    }

    fn add_unknowns_to(&self, sink: &mut dyn VariableSink) {
        for &c in &self.coefficients {
            sink.add_variable(c);
        }
    }

    fn register_fixed_residuals(&self, sink: &mut dyn FixedResidualSink) {
        for &(x, y) in &self.fixed_residuals {
            sink.add_fixed_residual(x, y);
        }
    }

    /// Solves the banded system `A * coefs = y` so the spline reproduces
    /// the seeded knot values exactly.
    ///
    /// Row r samples the four coefficient weights at knot r's x; the
    /// weights falling on the derived boundary coefficients are folded
    /// back onto the free coefficients via the end conditions, so the
    /// solved spline satisfies `evaluate(x_k) = y_k` for every knot.
    fn on_knots_initialized(&mut self) -> CurveResult<()> {
        if !self.finalized {
            return Err(CurveError::InvalidInput(
                "tension spline must be finalized before coefficient initialization".into(),
            ));
        }

        let n = self.coefficients.len();
        tracing::debug!(coefficients = n, "initializing tension spline coefficients");

        let (xs, ys) = {
            let knots = self.knots.borrow();
            (knots.xs(), knots.ys())
        };

        let mut a = vec![vec![0.0; n]; n];
        for (row_idx, row) in a.iter_mut().enumerate() {
            let index = (row_idx + 1) as i32;
            let x = xs[row_idx];
            self.fold_weight_into_row(row, index - 1, self.weight_m1(index, x));
            self.fold_weight_into_row(row, index, self.weight(index, x));
            self.fold_weight_into_row(row, index + 1, self.weight_p1(index, x));
            self.fold_weight_into_row(row, index + 2, self.weight_p2(index, x));
        }

        self.coefficients = solve_qr(&a, &ys)?;
        self.update()
    }

    fn knots(&self) -> SharedKnots {
        self.knots.clone()
    }

    fn clone_box(&self) -> Box<dyn SpineCurve> {
        let knots = Rc::new(RefCell::new(self.knots.borrow().clone()));
        Box::new(Self {
            knots,
            coefficients: self.coefficients.clone(),
            knot_sequence: self.knot_sequence.clone(),
            tension_parameters: self.tension_parameters.clone(),
            tension_overrides: self.tension_overrides.clone(),
            default_tension: self.default_tension,
            family: self.family.clone(),
            fixed_residuals: self.fixed_residuals.clone(),
            finalized: self.finalized,
        })
    }
}

// ============================================================
// Tests
// ============================================================
