//! Interpolation methods over knot-point windows.
//!
//! All methods implement the [`Interpolation`] trait: the owning curve
//! installs a [`crate::window::CurveWindow`], calls `update` after knot
//! y values change, and reads values and analytic gradients back.
//!
//! ## Available Methods
//!
//! - [`StraightLineInterpolation`]: piecewise linear, flat outside
//! - [`StraightLineExtendInterpolation`]: piecewise linear, extends the
//!   last slope to the right
//! - [`FlatLeftInterpolation`] / [`FlatRightInterpolation`]: step functions
//! - [`BiQuadraticInterpolation`]: blend of adjacent three-point parabolas
//! - [`MonotoneConvexSplineInterpolation`]: Hagan-West monotone convex
//! - [`CubicSplineInterpolation`]: registered placeholder
//!
//! Methods are also constructible by registry name via
//! [`interpolation_from_name`].

mod bi_quadratic;
mod cubic_spline;
mod flat_left;
mod flat_right;
mod monotone_convex;
mod registry;
mod straight_line;
mod straight_line_extend;
mod traits;

#[cfg(test)]
pub(crate) mod test_support;

pub use bi_quadratic::{BiQuadraticInterpolation, EdgeQuadratic};
pub use cubic_spline::CubicSplineInterpolation;
pub use flat_left::FlatLeftInterpolation;
pub use flat_right::FlatRightInterpolation;
pub use monotone_convex::MonotoneConvexSplineInterpolation;
pub use registry::{interpolation_from_name, is_known_interpolation, INTERPOLATION_NAMES};
pub use straight_line::StraightLineInterpolation;
pub use straight_line_extend::StraightLineExtendInterpolation;
pub use traits::Interpolation;
