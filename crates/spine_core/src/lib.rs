//! # spine_core: Knot-Point Storage and Interpolation Engine
//!
//! ## Layer 1 (Foundation) Role
//!
//! spine_core is the bottom layer of the curve stack, providing:
//! - Knot-point storage sorted by abscissa (`knots`)
//! - Half-open views over shared knot storage (`window`)
//! - Interpolation methods with analytic gradients (`interpolation`)
//! - Extrapolation methods for either side of the knot range (`extrapolation`)
//! - Scalar transform functions (`transforms`)
//! - Tension spline defining functions (`bspline`)
//! - Dense linear solvers for spline initialization (`math::solvers`)
//! - Error types: `CurveError` (`types::error`)
//!
//! Every interpolation and extrapolation method exposes the same gradient
//! contract: gradients are accumulated additively into a caller-owned slice
//! with one slot per unknown knot, so a calibration loop can sum the
//! contributions of many instruments into a single Jacobian row.
//!
//! ## Usage Examples
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use spine_core::interpolation::{Interpolation, StraightLineInterpolation};
//! use spine_core::knots::{KnotPoint, KnotPoints};
//! use spine_core::window::CurveWindow;
//!
//! let knots = Rc::new(RefCell::new(KnotPoints::new()));
//! knots.borrow_mut().add(KnotPoint::unknown(1.0, 10.0)).unwrap();
//! knots.borrow_mut().add(KnotPoint::unknown(2.0, 20.0)).unwrap();
//!
//! let mut method = StraightLineInterpolation::new();
//! method.set_window(CurveWindow::full(knots.clone())).unwrap();
//! assert_eq!(method.evaluate(1.5), 15.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod bspline;
pub mod extrapolation;
pub mod interpolation;
pub mod knots;
pub mod math;
pub mod transforms;
pub mod types;
pub mod window;
