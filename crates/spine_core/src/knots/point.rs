//! A single knot point on a spine curve.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A single (x, y) point on a spine curve.
///
/// A knot point is either *known* (its y is fixed, typically supplied
/// directly by market data) or *unknown* (its y is a free variable to be
/// determined by calibration). Knot points are totally ordered by their
/// x value; the y value and the known flag never take part in ordering
/// or equality.
///
/// # Examples
///
/// ```
/// use spine_core::knots::KnotPoint;
///
/// let fixed = KnotPoint::known(1.0, 0.05);
/// let free = KnotPoint::unknown(2.0, 0.0);
/// assert!(fixed.known);
/// assert!(!free.known);
/// assert!(fixed < free);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnotPoint {
    /// Abscissa, typically a time to maturity in year fractions.
    pub x: f64,
    /// Ordinate, e.g. a rate, a log-discount-factor, or a transformed value.
    pub y: f64,
    /// Whether y is fixed (true) or a calibration variable (false).
    pub known: bool,
    /// Optional label of the instrument this knot was placed for.
    pub instrument: Option<String>,
}

impl KnotPoint {
    /// Creates a knot point with an explicit known flag.
    pub fn new(x: f64, y: f64, known: bool) -> Self {
        Self {
            x,
            y,
            known,
            instrument: None,
        }
    }

    /// Creates a fixed knot point whose y will never be calibrated.
    pub fn known(x: f64, y: f64) -> Self {
        Self::new(x, y, true)
    }

    /// Creates a free knot point whose y is a calibration variable.
    ///
    /// The initial y is a starting guess for the calibration.
    pub fn unknown(x: f64, y: f64) -> Self {
        Self::new(x, y, false)
    }

    /// Attaches an instrument label, consuming and returning the point.
    pub fn with_instrument(mut self, label: impl Into<String>) -> Self {
        self.instrument = Some(label.into());
        self
    }
}

impl PartialEq for KnotPoint {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x
    }
}

impl PartialOrd for KnotPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.x.partial_cmp(&other.x)
    }
}
