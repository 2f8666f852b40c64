//! Knot points and their ordered, x-unique storage.
//!
//! A spine curve is parameterised by a set of [`KnotPoint`]s held in a
//! [`KnotPoints`] collection. The collection is shared (via [`SharedKnots`])
//! between the owning curve, its interpolation method and its
//! extrapolation methods, so that updating a y value in one place is
//! immediately visible everywhere.

mod point;
mod points;

pub use point::KnotPoint;
pub use points::{KnotPoints, SharedKnots};
