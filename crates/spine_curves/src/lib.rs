//! # spine_curves: Curve Facades and Calibration Seams
//!
//! ## Layer 2 (Curve) Role
//!
//! spine_curves assembles the method families of `spine_core` into whole
//! curves:
//! - The [`SpineCurve`](curves::SpineCurve) contract every formulation
//!   implements (`curves`)
//! - [`UkpCurve`](curves::UkpCurve): unknowns are the unknown knot values
//! - [`TensionSplineCurve`](curves::TensionSplineCurve): unknowns are
//!   spline basis coefficients
//! - [`CompositeCurve`](curves::CompositeCurve): two regimes split at a
//!   separation point over shared knots
//! - [`TransformCurve`](curves::TransformCurve): storage in a transformed
//!   space
//! - [`BaseCurve`](curves::BaseCurve): the facade adding left/right
//!   extrapolation
//! - The optimiser seams [`VariableSink`](problem::VariableSink) and
//!   [`FixedResidualSink`](problem::FixedResidualSink) (`problem`)
//!
//! ## Usage Examples
//!
//! ```rust
//! use spine_curves::curves::{BaseCurveConfig, SpineCurve};
//! use spine_core::knots::KnotPoint;
//!
//! let mut curve = BaseCurveConfig::default().build().unwrap();
//! curve.add_knot(KnotPoint::unknown(1.0, 0.02)).unwrap();
//! curve.add_knot(KnotPoint::unknown(5.0, 0.03)).unwrap();
//! curve.finalize().unwrap();
//!
//! // Flat to the left of the first knot, straight-line beyond the last.
//! assert_eq!(curve.evaluate(0.5), 0.02);
//! assert!(curve.evaluate(6.0) > 0.03);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod curves;
pub mod problem;
