//! # Soss: entry point of the crate
//!
//! [`Soss`] binds a [`ReferenceDataProvider`] to the reference pupil wheel angle and exposes the
//! three public operations of the crate:
//!
//! 1. [`Soss::predict_traces`] – trace centroids at a commanded angle, for one or several orders.
//! 2. [`Soss::predict_wavelengths`] – wavelength of arbitrary pixel columns of one order.
//! 3. [`Soss::compute_wavemaps`] – order 1 and order 2 wavemaps, with optional spectraces.
//!
//! Every operation is a pure function of its arguments and of the (read-only, cached) reference
//! products, so a single `Soss` can be shared between threads.
//!
//! ## Typical usage
//!
//! ```rust, no_run
//! use soss_wavecal::soss::Soss;
//! use soss_wavecal::spectral_order::SpectralOrder;
//!
//! let soss = Soss::from_directory("data");
//!
//! let traces = soss.predict_traces(245.79, "12", true).unwrap();
//! let waves = soss
//!     .predict_wavelengths(&[100.0, 1000.0, 2000.0], 245.79, SpectralOrder::Order1)
//!     .unwrap();
//! let maps = soss.compute_wavemaps(245.79, false, true).unwrap();
//! assert_eq!(maps.wavemaps.dim(), (2, 256, 2048));
//! ```
use camino::Utf8PathBuf;

use crate::{
    constants::{Degree, Micron, Pixel, REFERENCE_ANGLE},
    reference_data::{directory::ReferenceDirectory, ReferenceDataProvider},
    soss_errors::SossError,
    spectral_order::SpectralOrder,
    traces::{Trace, TracePredictor},
    wavemap::{compute_wavemaps, WavemapParams, WavemapSet},
};

#[derive(Debug, Clone)]
pub struct Soss<P> {
    predictor: TracePredictor<P>,
}

impl Soss<ReferenceDirectory> {
    /// Read the reference products from the instrument files stored in `root`.
    ///
    /// Files are only opened when first needed, see [`ReferenceDirectory`].
    pub fn from_directory(root: impl Into<Utf8PathBuf>) -> Self {
        Soss::new(ReferenceDirectory::new(root))
    }
}

impl<P: ReferenceDataProvider> Soss<P> {
    /// Build a [`Soss`] using the standard [`REFERENCE_ANGLE`].
    pub fn new(provider: P) -> Self {
        Self::with_reference_angle(provider, REFERENCE_ANGLE)
    }

    /// Build a [`Soss`] for reference products captured at another pupil wheel angle.
    pub fn with_reference_angle(provider: P, reference_angle: Degree) -> Self {
        Soss {
            predictor: TracePredictor::new(provider, reference_angle),
        }
    }

    pub fn reference_angle(&self) -> Degree {
        self.predictor.reference_angle()
    }

    pub fn provider(&self) -> &P {
        self.predictor.provider()
    }

    pub fn trace_predictor(&self) -> &TracePredictor<P> {
        &self.predictor
    }

    /// Predict trace centroids at `angle` for the orders of `order_spec`.
    ///
    /// See [`TracePredictor::predict_traces`].
    pub fn predict_traces(
        &self,
        angle: Degree,
        order_spec: &str,
        resample: bool,
    ) -> Result<Vec<Trace>, SossError> {
        self.predictor.predict_traces(angle, order_spec, resample)
    }

    /// Wavelength (µm) at each of `columns` for `order` at `angle`.
    ///
    /// Return
    /// ----------
    /// * [`SossError::UnsupportedOrder`] for order 3, or the provider's failure.
    pub fn predict_wavelengths(
        &self,
        columns: &[Pixel],
        angle: Degree,
        order: SpectralOrder,
    ) -> Result<Vec<Micron>, SossError> {
        let model = self.provider().wavecal_model(order.ensure_supported()?)?;
        model.predict(columns, angle, self.reference_angle())
    }

    /// Order 1 and order 2 wavemaps at `angle` with the default [`WavemapParams`].
    pub fn compute_wavemaps(
        &self,
        angle: Degree,
        include_padding: bool,
        include_spectraces: bool,
    ) -> Result<WavemapSet, SossError> {
        self.compute_wavemaps_with(
            angle,
            &WavemapParams::default(),
            include_padding,
            include_spectraces,
        )
    }

    /// Same as [`Soss::compute_wavemaps`] with explicit settings.
    pub fn compute_wavemaps_with(
        &self,
        angle: Degree,
        params: &WavemapParams,
        include_padding: bool,
        include_spectraces: bool,
    ) -> Result<WavemapSet, SossError> {
        compute_wavemaps(
            &self.predictor,
            angle,
            params,
            include_padding,
            include_spectraces,
        )
    }
}
