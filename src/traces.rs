//! # Trace prediction
//!
//! The GR700XD traces move on the detector as the pupil wheel turns. To first order this motion
//! is a rigid rotation about a fixed point, so the trace at any commanded angle is obtained by
//! rotating the reference centroids by `angle − reference angle` about their origin, then
//! resampling the rotated centroids onto the reference pixel columns.
//!
//! ```rust, no_run
//! use soss_wavecal::{
//!     constants::REFERENCE_ANGLE, reference_data::directory::ReferenceDirectory,
//!     traces::TracePredictor,
//! };
//!
//! let refs = ReferenceDirectory::new("data");
//! let predictor = TracePredictor::new(&refs, REFERENCE_ANGLE);
//! let traces = predictor.predict_traces(245.85, "12", true).unwrap();
//! assert_eq!(traces.len(), 2);
//! ```
use crate::{
    constants::{Degree, Micron, Pixel},
    geometry::rotate,
    reference_data::ReferenceDataProvider,
    soss_errors::{ensure_same_len, SossError},
    spectral_order::{parse_order_spec, SpectralOrder},
    wavecal::WavecalModel,
};

/// Predicted centroid positions of one spectral order.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub order: SpectralOrder,
    pub x: Vec<Pixel>,
    pub y: Vec<Pixel>,
    pub wavelength: Option<Vec<Micron>>,
}

impl Trace {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Attach the wavelength predicted by `model` at every column of the trace.
    ///
    /// Return
    /// ----------
    /// * [`SossError::OrderMismatch`] if `model` belongs to another order.
    pub fn with_wavelengths(
        mut self,
        model: &WavecalModel,
        angle: Degree,
        reference_angle: Degree,
    ) -> Result<Self, SossError> {
        if model.order() != self.order {
            return Err(SossError::OrderMismatch {
                trace: self.order,
                model: model.order(),
            });
        }
        let wavelength = model.predict(&self.x, angle, reference_angle)?;
        ensure_same_len("trace wavelengths", self.x.len(), wavelength.len())?;
        self.wavelength = Some(wavelength);
        Ok(self)
    }
}

/// Predicts traces from the reference products of a [`ReferenceDataProvider`].
#[derive(Debug, Clone)]
pub struct TracePredictor<P> {
    provider: P,
    reference_angle: Degree,
}

impl<P: ReferenceDataProvider> TracePredictor<P> {
    pub fn new(provider: P, reference_angle: Degree) -> Self {
        TracePredictor {
            provider,
            reference_angle,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn reference_angle(&self) -> Degree {
        self.reference_angle
    }

    /// Predict the trace of a single order at `angle`.
    ///
    /// Arguments
    /// -----------------
    /// * `angle`: commanded pupil wheel angle (degrees).
    /// * `order`: spectral order.
    /// * `resample`: keep the reference pixel columns and resample `y` onto them.
    ///
    /// Return
    /// ----------
    /// * The rotated [`Trace`], without wavelengths.
    /// * [`SossError::UnsupportedOrder`] for order 3, or the provider's failure.
    pub fn predict_trace(
        &self,
        angle: Degree,
        order: SpectralOrder,
        resample: bool,
    ) -> Result<Trace, SossError> {
        let order = order.ensure_supported()?;
        let reference = self.provider.reference_trace(order)?;
        let (x, y) = rotate(
            reference.x(),
            reference.y(),
            angle - self.reference_angle,
            reference.origin(),
            resample,
        )?;
        Ok(Trace {
            order,
            x,
            y,
            wavelength: None,
        })
    }

    /// Predict the traces of every order named in `order_spec`, in the requested order.
    ///
    /// Arguments
    /// -----------------
    /// * `angle`: commanded pupil wheel angle (degrees).
    /// * `order_spec`: order specifier such as `"1"`, `"12"` or `"order2"`, see
    ///   [`parse_order_spec`].
    /// * `resample`: keep the reference pixel columns and resample `y` onto them.
    ///
    /// Return
    /// ----------
    /// * One [`Trace`] per requested order.
    /// * [`SossError::InvalidOrderSpecifier`] for a malformed specifier.
    /// * [`SossError::UnsupportedOrder`] if any requested order is order 3; no partial result
    ///   is returned.
    pub fn predict_traces(
        &self,
        angle: Degree,
        order_spec: &str,
        resample: bool,
    ) -> Result<Vec<Trace>, SossError> {
        let orders = parse_order_spec(order_spec)?;
        if let Some(&unsupported) = orders.iter().find(|o| !o.is_supported()) {
            return Err(SossError::UnsupportedOrder(unsupported));
        }
        orders
            .into_iter()
            .map(|order| self.predict_trace(angle, order, resample))
            .collect()
    }

    /// Predict the trace of `order` and attach the wavelength of each column.
    pub fn predict_trace_with_wavelengths(
        &self,
        angle: Degree,
        order: SpectralOrder,
        resample: bool,
    ) -> Result<Trace, SossError> {
        let trace = self.predict_trace(angle, order, resample)?;
        let model = self.provider.wavecal_model(trace.order)?;
        trace.with_wavelengths(&model, angle, self.reference_angle)
    }
}

#[cfg(test)]
mod traces_test {
    use super::*;
    use crate::{
        constants::REFERENCE_ANGLE,
        reference_data::{InMemoryReferenceData, ReferenceTrace},
        wavecal::MinMaxScaler,
    };
    use approx::assert_relative_eq;

    fn provider() -> InMemoryReferenceData {
        let x1: Vec<f64> = (4..=2043).map(f64::from).collect();
        let y1: Vec<f64> = x1.iter().map(|x| 80.0 - 0.02 * x).collect();
        let x2: Vec<f64> = (1000..=1750).map(f64::from).collect();
        let y2: Vec<f64> = x2.iter().map(|x| 230.0 - 0.03 * x).collect();
        InMemoryReferenceData::new()
            .with_trace(
                SpectralOrder::Order1,
                ReferenceTrace::new(x1, y1, (1887.0, 54.0)).unwrap(),
            )
            .with_trace(
                SpectralOrder::Order2,
                ReferenceTrace::new(x2, y2, (1677.0, 200.0)).unwrap(),
            )
    }

    #[test]
    fn test_reference_angle_returns_reference_trace() {
        let refs = provider();
        let predictor = TracePredictor::new(&refs, REFERENCE_ANGLE);
        let traces = predictor.predict_traces(REFERENCE_ANGLE, "12", false).unwrap();

        for trace in traces {
            let reference = refs.reference_trace(trace.order).unwrap();
            for i in 0..trace.len() {
                assert_relative_eq!(trace.x[i], reference.x()[i], epsilon = 1e-9);
                assert_relative_eq!(trace.y[i], reference.y()[i], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_order_of_outputs_follows_request() {
        let refs = provider();
        let predictor = TracePredictor::new(&refs, REFERENCE_ANGLE);
        let traces = predictor.predict_traces(245.9, "21", true).unwrap();
        assert_eq!(traces[0].order, SpectralOrder::Order2);
        assert_eq!(traces[1].order, SpectralOrder::Order1);
        assert_eq!(traces[0].x, refs.reference_trace(SpectralOrder::Order2).unwrap().x());
    }

    #[test]
    fn test_rotation_moves_trace() {
        let refs = provider();
        let predictor = TracePredictor::new(&refs, REFERENCE_ANGLE);
        let trace = predictor
            .predict_trace(REFERENCE_ANGLE + 0.5, SpectralOrder::Order1, true)
            .unwrap();
        let reference = refs.reference_trace(SpectralOrder::Order1).unwrap();
        // far from the origin column the rotated trace must move
        assert!((trace.y[0] - reference.y()[0]).abs() > 1.0);
    }

    #[test]
    fn test_order3_rejected() {
        let refs = provider();
        let predictor = TracePredictor::new(&refs, REFERENCE_ANGLE);
        assert_eq!(
            predictor.predict_traces(245.8, "123", true),
            Err(SossError::UnsupportedOrder(SpectralOrder::Order3))
        );
        assert!(matches!(
            predictor.predict_traces(245.8, "1234", true),
            Err(SossError::InvalidOrderSpecifier(_))
        ));
        assert!(matches!(
            predictor.predict_traces(245.8, "x", true),
            Err(SossError::InvalidOrderSpecifier(_))
        ));
    }

    #[test]
    fn test_missing_model() {
        let refs = provider();
        let predictor = TracePredictor::new(&refs, REFERENCE_ANGLE);
        assert!(matches!(
            predictor.predict_trace_with_wavelengths(245.8, SpectralOrder::Order1, true),
            Err(SossError::ReferenceDataUnavailable(_))
        ));
    }

    #[test]
    fn test_model_of_other_order_rejected() {
        let refs = provider();
        let predictor = TracePredictor::new(&refs, REFERENCE_ANGLE);
        let trace = predictor
            .predict_trace(REFERENCE_ANGLE, SpectralOrder::Order1, true)
            .unwrap();
        let order2_model = WavecalModel::new(
            SpectralOrder::Order2,
            vec![-0.45, 0.02, 0.01, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            1.1,
            MinMaxScaler::new(672.0, 1620.0).unwrap(),
            MinMaxScaler::new(-0.1, 0.16).unwrap(),
        )
        .unwrap();

        assert_eq!(
            trace.with_wavelengths(&order2_model, REFERENCE_ANGLE, REFERENCE_ANGLE),
            Err(SossError::OrderMismatch {
                trace: SpectralOrder::Order1,
                model: SpectralOrder::Order2,
            })
        );
    }
}
