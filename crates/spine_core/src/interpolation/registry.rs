//! Name-keyed construction of interpolation methods.

use super::{
    BiQuadraticInterpolation, CubicSplineInterpolation, FlatLeftInterpolation,
    FlatRightInterpolation, Interpolation, MonotoneConvexSplineInterpolation,
    StraightLineExtendInterpolation, StraightLineInterpolation,
};
use crate::types::{CurveError, CurveResult};

/// All registered interpolation method names, in registration order.
pub const INTERPOLATION_NAMES: &[&str] = &[
    StraightLineInterpolation::NAME,
    StraightLineExtendInterpolation::NAME,
    FlatLeftInterpolation::NAME,
    FlatRightInterpolation::NAME,
    BiQuadraticInterpolation::NAME,
    MonotoneConvexSplineInterpolation::NAME,
    CubicSplineInterpolation::NAME,
];

/// Constructs an interpolation method from its registry name.
///
/// # Errors
///
/// Returns [`CurveError::UnknownName`] when the name is not registered.
///
/// # Examples
///
/// ```
/// use spine_core::interpolation::interpolation_from_name;
///
/// let m = interpolation_from_name("StraightLineExtend").unwrap();
/// assert_eq!(m.name(), "StraightLineExtend");
/// assert!(interpolation_from_name("Quartic").is_err());
/// ```
pub fn interpolation_from_name(name: &str) -> CurveResult<Box<dyn Interpolation>> {
    match name {
        StraightLineInterpolation::NAME => Ok(Box::new(StraightLineInterpolation::new())),
        StraightLineExtendInterpolation::NAME => {
            Ok(Box::new(StraightLineExtendInterpolation::new()))
        }
        FlatLeftInterpolation::NAME => Ok(Box::new(FlatLeftInterpolation::new())),
        FlatRightInterpolation::NAME => Ok(Box::new(FlatRightInterpolation::new())),
        BiQuadraticInterpolation::NAME => Ok(Box::new(BiQuadraticInterpolation::default())),
        MonotoneConvexSplineInterpolation::NAME => {
            Ok(Box::new(MonotoneConvexSplineInterpolation::new()))
        }
        CubicSplineInterpolation::NAME => Ok(Box::new(CubicSplineInterpolation::new())),
        _ => Err(CurveError::UnknownName {
            kind: "interpolation",
            name: name.to_string(),
        }),
    }
}

/// Whether `name` is a registered interpolation method.
pub fn is_known_interpolation(name: &str) -> bool {
    INTERPOLATION_NAMES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_registered_name_constructs() {
        for name in INTERPOLATION_NAMES {
            let m = interpolation_from_name(name).unwrap();
            assert_eq!(m.name(), *name);
        }
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let err = interpolation_from_name("NotAMethod").unwrap_err();
        assert_eq!(
            err,
            CurveError::UnknownName {
                kind: "interpolation",
                name: "NotAMethod".to_string()
            }
        );
    }

    #[test]
    fn test_is_known_interpolation() {
        assert!(is_known_interpolation("MonotoneConvexSpline"));
        assert!(!is_known_interpolation("monotoneconvexspline"));
    }
}
