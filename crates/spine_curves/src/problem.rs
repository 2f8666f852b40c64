//! Seams between curves and the calibration problem.
//!
//! Curves never depend on a concrete optimiser. Instead they push their
//! unknown variables into a [`VariableSink`] and, for spline formulations
//! whose unknowns are not the knot values themselves, register fixed-knot
//! residuals with a [`FixedResidualSink`]. The calibration driver owns both
//! sides of the seam.

/// Receives the unknown variables of a curve, in gradient-slot order.
pub trait VariableSink {
    /// Adds one variable with its current value.
    fn add_variable(&mut self, value: f64);
}

/// Receives fixed-knot residual targets.
///
/// A curve whose unknowns are spline coefficients cannot pin a known knot
/// `(x, y)` by excluding it from the variable set; it instead asks the
/// problem to carry an extra residual `curve(x) - y`.
pub trait FixedResidualSink {
    /// Registers the target `curve(x) = y`.
    fn add_fixed_residual(&mut self, x: f64, y: f64);
}

/// A plain collector implementing both sink traits.
///
/// This is what a least-squares driver typically starts from: collect the
/// variables into a flat vector, hand them to the optimiser, and evaluate
/// the extra residuals alongside the instrument residuals.
#[derive(Debug, Default, Clone)]
pub struct VariableStore {
    /// Collected variable values, in the order curves pushed them.
    pub variables: Vec<f64>,
    /// Collected fixed-knot residual targets as `(x, y)` pairs.
    pub fixed_residuals: Vec<(f64, f64)>,
}

impl VariableStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl VariableSink for VariableStore {
    fn add_variable(&mut self, value: f64) {
        self.variables.push(value);
    }
}

impl FixedResidualSink for VariableStore {
    fn add_fixed_residual(&mut self, x: f64, y: f64) {
        self.fixed_residuals.push((x, y));
    }
}
