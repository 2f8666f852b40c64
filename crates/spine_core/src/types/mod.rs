//! Common types shared across the spine-curve crates.

mod error;

pub use error::CurveError;

/// Convenience alias for results produced by curve operations.
pub type CurveResult<T> = Result<T, CurveError>;
