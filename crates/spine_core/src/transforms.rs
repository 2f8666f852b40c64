//! Scalar transform functions applied on top of a stored curve.
//!
//! A transform couples three closed-form maps: the forward transform, its
//! inverse, and its first derivative. Curves that store values in a
//! transformed space inverse-transform incoming knot values and apply the
//! forward transform on evaluation, chaining the derivative into gradient
//! accumulation.

use crate::types::{CurveError, CurveResult};

/// A scalar function together with its inverse and first derivative.
pub trait TransformFunction: std::fmt::Debug {
    /// Name of the transform, used for registry lookup.
    fn name(&self) -> &'static str;

    /// Applies the forward transform.
    fn transform(&self, x: f64) -> f64;

    /// Applies the inverse transform.
    fn inverse(&self, x: f64) -> f64;

    /// First derivative of the forward transform at `x`.
    fn derivative(&self, x: f64) -> f64;

    /// Boxed clone, required because trait objects cannot derive `Clone`.
    fn clone_box(&self) -> Box<dyn TransformFunction>;
}

impl Clone for Box<dyn TransformFunction> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// The identity transform `f(x) = x`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTransform;

impl NullTransform {
    /// Registry name of this transform.
    pub const NAME: &'static str = "Null";
}

impl TransformFunction for NullTransform {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn transform(&self, x: f64) -> f64 {
        x
    }

    fn inverse(&self, x: f64) -> f64 {
        x
    }

    fn derivative(&self, _x: f64) -> f64 {
        1.0
    }

    fn clone_box(&self) -> Box<dyn TransformFunction> {
        Box::new(*self)
    }
}

/// The transform `f(x) = exp(-x)`, with inverse `-ln(x)`.
///
/// Storing discount-factor-like quantities through this transform keeps the
/// underlying spine values in rate space while the curve surface stays
/// positive.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpMinusTransform;

impl ExpMinusTransform {
    /// Registry name of this transform.
    pub const NAME: &'static str = "ExpMinus";
}

impl TransformFunction for ExpMinusTransform {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn transform(&self, x: f64) -> f64 {
        (-x).exp()
    }

    fn inverse(&self, x: f64) -> f64 {
        -x.ln()
    }

    fn derivative(&self, x: f64) -> f64 {
        -(-x).exp()
    }

    fn clone_box(&self) -> Box<dyn TransformFunction> {
        Box::new(*self)
    }
}

/// Names of all registered transform functions.
pub const TRANSFORM_NAMES: &[&str] = &[NullTransform::NAME, ExpMinusTransform::NAME];

/// Creates a transform function from its registry name.
///
/// # Errors
///
/// Returns [`CurveError::UnknownName`] when no transform is registered under
/// `name`.
pub fn transform_from_name(name: &str) -> CurveResult<Box<dyn TransformFunction>> {
    match name {
        NullTransform::NAME => Ok(Box::new(NullTransform)),
        ExpMinusTransform::NAME => Ok(Box::new(ExpMinusTransform)),
        other => Err(CurveError::UnknownName {
            kind: "transform",
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
    use approx::assert_relative_eq;

    // ====== Null transform ======

    #[test]
    fn null_transform_is_identity() {
        let t = NullTransform;
        assert_relative_eq!(t.transform(3.5), 3.5);
        assert_relative_eq!(t.inverse(3.5), 3.5);
        assert_relative_eq!(t.derivative(3.5), 1.0);
    }

    // ====== ExpMinus transform ======

    #[test]
    fn exp_minus_round_trips() {
        let t = ExpMinusTransform;
        for &x in &[0.01, 0.05, 1.0, 4.2] {
            assert_relative_eq!(t.inverse(t.transform(x)), x, epsilon = 1e-12);
        }
    }

    #[test]
    fn exp_minus_derivative_matches_finite_difference() {
        let t = ExpMinusTransform;
        let h = 1e-7;
        for &x in &[0.0, 0.5, 2.0] {
            let fd = (t.transform(x + h) - t.transform(x - h)) / (2.0 * h);
            assert_relative_eq!(t.derivative(x), fd, epsilon = 1e-6);
        }
    }

    // ====== Registry ======

    #[test]
    fn registry_resolves_known_names() {
        for &name in TRANSFORM_NAMES {
            let t = transform_from_name(name).unwrap();
            assert_eq!(t.name(), name);
        }
    }

    #[test]
    fn registry_rejects_unknown_name() {
        let err = transform_from_name("Sigmoid").unwrap_err();
        assert!(matches!(err, CurveError::UnknownName { kind: "transform", .. }));
    }

    #[test]
    fn boxed_transform_clones() {
        let t: Box<dyn TransformFunction> = Box::new(ExpMinusTransform);
        let c = t.clone();
        assert_relative_eq!(c.transform(1.0), (-1.0f64).exp());
    }
}
