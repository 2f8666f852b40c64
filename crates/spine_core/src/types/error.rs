//! Error types for spine-curve construction.
//!
//! This module provides structured error handling for knot-point storage,
//! method finalisation, and curve evaluation, with diagnostic payloads
//! (offending x values, indices, strategy names) on each variant.

use thiserror::Error;

/// Errors that can occur while building or evaluating a spine curve.
///
/// # Variants
///
/// - `DuplicateKnot`: a knot with the same x already exists
/// - `EmptyCurve`: an operation requires at least one knot
/// - `InsufficientKnots`: a method needs more knots than are available
/// - `IndexOutOfRange`: an unknown/coefficient index is out of bounds
/// - `NotImplemented`: a registered but unimplemented operation was invoked
/// - `UnknownName`: a strategy-registry lookup failed
/// - `Numerical`: a numerical step (e.g. a linear solve) failed
/// - `InvalidInput`: general invalid input
///
/// # Examples
///
/// ```
/// use spine_core::types::CurveError;
///
/// let err = CurveError::DuplicateKnot { x: 2.0 };
/// assert!(format!("{}", err).contains("2"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// A knot point with the same x already exists in the curve.
    #[error("Duplicate knot point at x = {x}")]
    DuplicateKnot {
        /// The x value that collided with an existing knot
        x: f64,
    },

    /// The operation requires a non-empty set of knot points.
    #[error("Curve has no knot points")]
    EmptyCurve,

    /// The method requires more knot points than were provided.
    #[error("Insufficient knot points: need at least {required}, got {provided}")]
    InsufficientKnots {
        /// Minimum number of knot points required
        required: usize,
        /// Number of knot points provided
        provided: usize,
    },

    /// An index into the unknowns (or coefficients) is out of bounds.
    #[error("Index {index} out of range for {len} element(s)")]
    IndexOutOfRange {
        /// The offending index
        index: usize,
        /// The number of available elements
        len: usize,
    },

    /// The operation is registered but deliberately not implemented.
    #[error("Not implemented: {what}")]
    NotImplemented {
        /// Description of the missing operation
        what: &'static str,
    },

    /// A strategy name was not found in its registry.
    #[error("Unknown {kind} name: '{name}'")]
    UnknownName {
        /// Registry kind, e.g. "interpolation" or "extrapolation"
        kind: &'static str,
        /// The name that failed to resolve
        name: String,
    },

    /// A numerical step failed, e.g. a singular linear system.
    #[error("Numerical failure: {0}")]
    Numerical(String),

    /// General invalid input error.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
