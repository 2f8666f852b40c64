//! A curve stored in a transformed space.

use spine_core::knots::{KnotPoint, SharedKnots};
use spine_core::transforms::{transform_from_name, NullTransform, TransformFunction};
use spine_core::types::CurveResult;

use super::{BaseCurve, BaseCurveConfig, SpineCurve};
use crate::problem::{FixedResidualSink, VariableSink};

/// A [`BaseCurve`] whose stored values live in the inverse-transformed
/// space.
///
/// Incoming knot values are inverse-transformed before storage and
/// evaluation applies the forward transform, so callers only ever see the
/// transformed space. With `ExpMinus`, for instance, the spine stores
/// rate-like values while the curve surface stays positive. Calibration
/// unknowns remain the stored (raw-space) values; the gradient chains the
/// transform derivative into the multiplier.
pub struct TransformCurve {
    inner: BaseCurve,
    transform: Box<dyn TransformFunction>,
}

impl TransformCurve {
    /// Registry name of this curve formulation.
    pub const NAME: &'static str = "Transform";

    /// Wraps `inner` with the named transform.
    ///
    /// # Errors
    ///
    /// Returns [`spine_core::types::CurveError::UnknownName`] for an
    /// unregistered transform name.
    pub fn new(inner: BaseCurve, transform_name: &str) -> CurveResult<Self> {
        Ok(Self {
            inner,
            transform: transform_from_name(transform_name)?,
        })
    }

    /// Builds the inner curve and transform from one config.
    pub fn from_config(config: &BaseCurveConfig) -> CurveResult<Self> {
        let transform_name = config.transform.as_deref().unwrap_or(NullTransform::NAME);
        Self::new(config.build()?, transform_name)
    }

    /// The transform function in use.
    pub fn transform(&self) -> &dyn TransformFunction {
        self.transform.as_ref()
    }
}

impl SpineCurve for TransformCurve {
    fn add_knot(&mut self, kp: KnotPoint) -> CurveResult<()> {
        let mut stored = kp;
        stored.y = self.transform.inverse(stored.y);
        self.inner.add_knot(stored)
    }

    fn finalize(&mut self) -> CurveResult<()> {
        self.inner.finalize()
    }

    fn update(&mut self) -> CurveResult<()> {
        self.inner.update()
    }

    fn evaluate(&self, x: f64) -> f64 {
        self.transform.transform(self.inner.evaluate(x))
    }

    fn accumulate_gradient(&self, x: f64, multiplier: f64, gradient: &mut [f64]) {
        let raw = self.inner.evaluate(x);
        self.inner
            .accumulate_gradient(x, multiplier * self.transform.derivative(raw), gradient);
    }

    fn number_of_unknowns(&self) -> usize {
        self.inner.number_of_unknowns()
    }

    fn unknown(&self, index: usize) -> CurveResult<f64> {
        self.inner.unknown(index)
    }

    fn set_unknown(&mut self, index: usize, value: f64) -> CurveResult<()> {
        self.inner.set_unknown(index, value)
    }

    fn add_unknowns_to(&self, sink: &mut dyn VariableSink) {
        self.inner.add_unknowns_to(sink);
    }

    fn register_fixed_residuals(&self, sink: &mut dyn FixedResidualSink) {
        self.inner.register_fixed_residuals(sink);
    }

    fn on_knots_initialized(&mut self) -> CurveResult<()> {
        self.inner.on_knots_initialized()
    }

    fn knots(&self) -> SharedKnots {
        self.inner.knots()
    }

    fn clone_box(&self) -> Box<dyn SpineCurve> {
        Box::new(Self {
            inner: self.inner.clone(),
            transform: self.transform.clone(),
        })
    }
}

// ============================================================
// Tests
// ============================================================
