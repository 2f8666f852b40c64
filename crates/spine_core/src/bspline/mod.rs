//! Defining functions for generalized tension B-splines.
//!
//! A tension spline is written in terms of a pair of "defining functions"
//! `psi` and `phi` on each knot interval (see B. Kvasov, *Methods of
//! Shape-Preserving Spline Approximation*). Different choices of the pair
//! give different spline families; the exponential pair is provided here.
//!
//! Indices passed to the defining functions are interval indices relative to
//! the real knots and may be negative: the padded knot sequence built by the
//! tension spline carries two extra entries at each end, and the accessors
//! apply the corresponding offsets.

mod exponential;

pub use exponential::ExponentialBSplineDefiningFunctions;

use crate::types::{CurveError, CurveResult};

/// Returns the `index`-th knot of a padded knot sequence.
///
/// The sequence is expected to carry two leading padding entries, so the
/// smallest valid `index` is -2.
#[inline]
pub fn knot_at(knot_sequence: &[f64], index: i32) -> f64 {
    knot_sequence[(index + 2) as usize]
}

/// Returns the width of the `index`-th knot interval of a padded sequence.
#[inline]
pub fn step_at(knot_sequence: &[f64], index: i32) -> f64 {
    knot_at(knot_sequence, index + 1) - knot_at(knot_sequence, index)
}

/// Returns the tension parameter of the `index`-th interval.
///
/// Tensions carry one leading padding entry, so the smallest valid `index`
/// is -1.
#[inline]
pub fn tension_at(tension_parameters: &[f64], index: i32) -> f64 {
    tension_parameters[(index + 1) as usize]
}

/// The psi/phi pair defining a tension spline family.
///
/// Implementations are stateless over the spline data: the padded knot
/// sequence and per-interval tension parameters are passed into every call,
/// so one instance can serve any number of splines.
pub trait BSplineDefiningFunctions: std::fmt::Debug {
    /// Name of the defining function family, used for registry lookup.
    fn name(&self) -> &'static str;

    /// Value of the `index`-th psi function at `t`.
    fn psi(&self, knot_sequence: &[f64], tensions: &[f64], index: i32, t: f64) -> f64;

    /// Derivative of the `index`-th psi function at `t`.
    fn psi_derivative(&self, knot_sequence: &[f64], tensions: &[f64], index: i32, t: f64) -> f64;

    /// Value of the `index`-th phi function at `t`.
    fn phi(&self, knot_sequence: &[f64], tensions: &[f64], index: i32, t: f64) -> f64;

    /// Derivative of the `index`-th phi function at `t`.
    fn phi_derivative(&self, knot_sequence: &[f64], tensions: &[f64], index: i32, t: f64) -> f64;

    /// Boxed clone, required because trait objects cannot derive `Clone`.
    fn clone_box(&self) -> Box<dyn BSplineDefiningFunctions>;
}

impl Clone for Box<dyn BSplineDefiningFunctions> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Names of all registered defining function families.
pub const BSPLINE_FAMILY_NAMES: &[&str] = &[ExponentialBSplineDefiningFunctions::NAME];

/// Creates a defining function family from its registry name.
///
/// # Errors
///
/// Returns [`CurveError::UnknownName`] when no family is registered under
/// `name`.
pub fn bspline_family_from_name(name: &str) -> CurveResult<Box<dyn BSplineDefiningFunctions>> {
    match name {
        ExponentialBSplineDefiningFunctions::NAME => {
            Ok(Box::new(ExponentialBSplineDefiningFunctions))
        }
        other => Err(CurveError::UnknownName {
            kind: "b-spline family",
            name: other.to_string(),
        }),
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_accessors_apply_offsets() {
        let seq = [-2.0, -1.0, 0.0, 1.0, 2.0];
        assert_eq!(knot_at(&seq, -2), -2.0);
        assert_eq!(knot_at(&seq, 0), 0.0);
        assert_eq!(knot_at(&seq, 2), 2.0);
        assert_eq!(step_at(&seq, 0), 1.0);

        let tensions = [0.1, 0.2, 0.3];
        assert_eq!(tension_at(&tensions, -1), 0.1);
        assert_eq!(tension_at(&tensions, 1), 0.3);
    }

    #[test]
    fn registry_resolves_exponential() {
        let family = bspline_family_from_name("Exponential").unwrap();
        assert_eq!(family.name(), "Exponential");
    }

    #[test]
    fn registry_rejects_unknown_family() {
        let err = bspline_family_from_name("Hyperbolic").unwrap_err();
        assert!(matches!(
            err,
            CurveError::UnknownName { kind: "b-spline family", .. }
        ));
    }
}
