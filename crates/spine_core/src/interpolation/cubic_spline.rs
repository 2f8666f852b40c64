//! Cubic spline interpolation (registered, not yet implemented).

use super::Interpolation;
use crate::types::{CurveError, CurveResult};
use crate::window::CurveWindow;

/// Natural cubic spline interpolation.
///
/// The name is registered so that configuration referring to it fails at a
/// well-defined point, but the method itself is not implemented: every
/// operation returns [`CurveError::NotImplemented`], and evaluation
/// is unreachable because `set_window` always fails.
#[derive(Debug, Clone, Default)]
pub struct CubicSplineInterpolation;

impl CubicSplineInterpolation {
    /// Registry name.
    pub const NAME: &'static str = "CubicSpline";

    /// Creates the placeholder method.
    pub fn new() -> Self {
        Self
    }
}

impl Interpolation for CubicSplineInterpolation {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_window(&mut self, _window: CurveWindow) -> CurveResult<()> {
        Err(CurveError::NotImplemented {
            what: "cubic spline interpolation",
        })
    }

    fn evaluate(&self, _x: f64) -> f64 {
        f64::NAN
    }

    fn accumulate_gradient(&self, _x: f64, _multiplier: f64, _gradient: &mut [f64]) {}

    fn clone_box(&self) -> Box<dyn Interpolation> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knots::{KnotPoint, KnotPoints};

    #[test]
    fn test_set_window_reports_not_implemented() {
        let knots = KnotPoints::new_shared();
        knots.borrow_mut().add(KnotPoint::known(1.0, 1.0)).unwrap();
        let mut m = CubicSplineInterpolation::new();
        assert_eq!(
            m.set_window(CurveWindow::full(knots)).unwrap_err(),
            CurveError::NotImplemented {
                what: "cubic spline interpolation"
            }
        );
    }
}
