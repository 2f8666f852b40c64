//! Exponential psi/phi defining functions.

use super::{knot_at, step_at, tension_at, BSplineDefiningFunctions};

/// Exponential tension spline defining functions.
///
/// On the interval `[k_i, k_{i+1}]` with tension `s_i`:
///
/// ```text
/// psi(i, t) = (t - k_i)^3 * exp(s_i * (t - k_{i+1})) / D_i
/// phi(i, t) = (k_{i+1} - t)^3 * exp(s_i * (k_i - t)) / D_i
/// D_i       = h_i * (6 + s_i * h_i * (6 + h_i)),   h_i = k_{i+1} - k_i
/// ```
///
/// With zero tension the pair degenerates to the cubic B-spline defining
/// functions; increasing tension pulls the spline towards the piecewise
/// linear interpolant.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExponentialBSplineDefiningFunctions;

impl ExponentialBSplineDefiningFunctions {
    /// Registry name of this family.
    pub const NAME: &'static str = "Exponential";

    fn denominator(knot_sequence: &[f64], tensions: &[f64], index: i32) -> f64 {
        let step = step_at(knot_sequence, index);
        let tension = tension_at(tensions, index);
        step * (6.0 + tension * step * (6.0 + step))
    }
}

impl BSplineDefiningFunctions for ExponentialBSplineDefiningFunctions {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn psi(&self, knot_sequence: &[f64], tensions: &[f64], index: i32, t: f64) -> f64 {
        let lower = knot_at(knot_sequence, index);
        let upper = knot_at(knot_sequence, index + 1);
        let tension = tension_at(tensions, index);
        (t - lower).powi(3) * (tension * (t - upper)).exp()
            / Self::denominator(knot_sequence, tensions, index)
    }

    fn psi_derivative(&self, knot_sequence: &[f64], tensions: &[f64], index: i32, t: f64) -> f64 {
        let lower = knot_at(knot_sequence, index);
        let upper = knot_at(knot_sequence, index + 1);
        let tension = tension_at(tensions, index);
        (t - lower).powi(2)
            * (tension * (t - upper)).exp()
            * (3.0 + tension * (t - lower))
            / Self::denominator(knot_sequence, tensions, index)
    }

    fn phi(&self, knot_sequence: &[f64], tensions: &[f64], index: i32, t: f64) -> f64 {
        let lower = knot_at(knot_sequence, index);
        let upper = knot_at(knot_sequence, index + 1);
        let tension = tension_at(tensions, index);
        (upper - t).powi(3) * (tension * (lower - t)).exp()
            / Self::denominator(knot_sequence, tensions, index)
    }

    fn phi_derivative(&self, knot_sequence: &[f64], tensions: &[f64], index: i32, t: f64) -> f64 {
        let lower = knot_at(knot_sequence, index);
        let upper = knot_at(knot_sequence, index + 1);
        let tension = tension_at(tensions, index);
        -(upper - t).powi(2)
            * (tension * (lower - t)).exp()
            * (3.0 + tension * (upper - t))
            / Self::denominator(knot_sequence, tensions, index)
    }

    fn clone_box(&self) -> Box<dyn BSplineDefiningFunctions> {
        Box::new(*self)
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fixture() -> (Vec<f64>, Vec<f64>) {
        // Two leading and two trailing padding knots around [0, 1, 2.5, 4].
        let seq = vec![-3.0, -2.0, -1.0, 0.0, 1.0, 2.5, 4.0, 5.0, 6.0];
        let tensions = vec![0.5; seq.len()];
        (seq, tensions)
    }

    #[test]
    fn psi_vanishes_at_lower_knot_and_phi_at_upper() {
        let (seq, tensions) = fixture();
        let f = ExponentialBSplineDefiningFunctions;
        for index in 0..3 {
            let lower = knot_at(&seq, index);
            let upper = knot_at(&seq, index + 1);
            assert_relative_eq!(f.psi(&seq, &tensions, index, lower), 0.0);
            assert_relative_eq!(f.phi(&seq, &tensions, index, upper), 0.0);
        }
    }

    #[test]
    fn derivatives_match_finite_differences() {
        let (seq, tensions) = fixture();
        let f = ExponentialBSplineDefiningFunctions;
        let h = 1e-6;
        for index in 0..3 {
            let lower = knot_at(&seq, index);
            let upper = knot_at(&seq, index + 1);
            let t = 0.5 * (lower + upper);

            let psi_fd =
                (f.psi(&seq, &tensions, index, t + h) - f.psi(&seq, &tensions, index, t - h))
                    / (2.0 * h);
            assert_relative_eq!(
                f.psi_derivative(&seq, &tensions, index, t),
                psi_fd,
                epsilon = 1e-6,
                max_relative = 1e-5
            );

            let phi_fd =
                (f.phi(&seq, &tensions, index, t + h) - f.phi(&seq, &tensions, index, t - h))
                    / (2.0 * h);
            assert_relative_eq!(
                f.phi_derivative(&seq, &tensions, index, t),
                phi_fd,
                epsilon = 1e-6,
                max_relative = 1e-5
            );
        }
    }

    #[test]
    fn negative_indices_hit_padding_knots() {
        let (seq, tensions) = fixture();
        let f = ExponentialBSplineDefiningFunctions;
        // Interval [-2, -1] of the padded sequence.
        let value = f.psi(&seq, &tensions, -2, -1.5);
        assert!(value.is_finite());
        assert!(value > 0.0);
    }
}
