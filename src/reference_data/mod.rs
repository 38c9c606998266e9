//! # Reference data
//!
//! Trace prediction and wavelength calibration both start from reference products measured at
//! [`REFERENCE_ANGLE`](crate::constants::REFERENCE_ANGLE):
//!
//! - a [`ReferenceTrace`] per spectral order: centroid positions plus the rotation origin;
//! - a [`WavecalModel`](crate::wavecal::WavecalModel) per spectral order.
//!
//! The rest of the crate only sees these products through the [`ReferenceDataProvider`] trait, so
//! where they come from (memory, a directory of reference files, …) is the caller's choice.
//!
//! ## Providers
//!
//! - [`InMemoryReferenceData`] – built from already parsed values.
//! - [`ReferenceDirectory`](crate::reference_data::directory::ReferenceDirectory) – reads the
//!   instrument reference files from a directory, once per order.
//!
//! ```rust, no_run
//! use soss_wavecal::reference_data::{directory::ReferenceDirectory, ReferenceDataProvider};
//! use soss_wavecal::spectral_order::SpectralOrder;
//!
//! let refs = ReferenceDirectory::new("data");
//! let trace = refs.reference_trace(SpectralOrder::Order1).unwrap();
//! println!("origin = {:?}", trace.origin());
//! ```
use std::{collections::HashMap, sync::Arc};

use crate::{
    constants::Pixel,
    soss_errors::{ensure_same_len, SossError},
    spectral_order::SpectralOrder,
    wavecal::WavecalModel,
};

pub mod directory;
pub mod trace_file;
pub mod wavecal_file;

/// Reference centroid positions of one spectral order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTrace {
    x: Vec<Pixel>,
    y: Vec<Pixel>,
    origin: (Pixel, Pixel),
}

impl ReferenceTrace {
    /// Return
    /// ----------
    /// * [`SossError::ShapeMismatch`] if `x` and `y` differ in length.
    pub fn new(x: Vec<Pixel>, y: Vec<Pixel>, origin: (Pixel, Pixel)) -> Result<Self, SossError> {
        ensure_same_len("reference trace", x.len(), y.len())?;
        Ok(ReferenceTrace { x, y, origin })
    }

    pub fn x(&self) -> &[Pixel] {
        &self.x
    }

    pub fn y(&self) -> &[Pixel] {
        &self.y
    }

    /// Point about which the trace rotates with the pupil wheel.
    pub fn origin(&self) -> (Pixel, Pixel) {
        self.origin
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// `(min, max)` of the sampled pixel columns.
    pub fn x_limits(&self) -> (Pixel, Pixel) {
        self.x
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

/// Source of the per-order reference products.
///
/// Implementations must fail with [`SossError::UnsupportedOrder`] for orders that cannot be
/// modelled and with [`SossError::ReferenceDataUnavailable`] when a product is missing; they
/// never substitute placeholder data.
pub trait ReferenceDataProvider: Send + Sync {
    fn reference_trace(&self, order: SpectralOrder) -> Result<Arc<ReferenceTrace>, SossError>;

    fn wavecal_model(&self, order: SpectralOrder) -> Result<Arc<WavecalModel>, SossError>;
}

impl<P: ReferenceDataProvider + ?Sized> ReferenceDataProvider for &P {
    fn reference_trace(&self, order: SpectralOrder) -> Result<Arc<ReferenceTrace>, SossError> {
        (**self).reference_trace(order)
    }

    fn wavecal_model(&self, order: SpectralOrder) -> Result<Arc<WavecalModel>, SossError> {
        (**self).wavecal_model(order)
    }
}

impl<P: ReferenceDataProvider + ?Sized> ReferenceDataProvider for Arc<P> {
    fn reference_trace(&self, order: SpectralOrder) -> Result<Arc<ReferenceTrace>, SossError> {
        (**self).reference_trace(order)
    }

    fn wavecal_model(&self, order: SpectralOrder) -> Result<Arc<WavecalModel>, SossError> {
        (**self).wavecal_model(order)
    }
}

/// Reference products held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReferenceData {
    traces: HashMap<SpectralOrder, Arc<ReferenceTrace>>,
    models: HashMap<SpectralOrder, Arc<WavecalModel>>,
}

impl InMemoryReferenceData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the reference trace of `order`, replacing any previous one.
    pub fn with_trace(mut self, order: SpectralOrder, trace: ReferenceTrace) -> Self {
        self.traces.insert(order, Arc::new(trace));
        self
    }

    /// Register a wavelength model under the order it was fitted for.
    pub fn with_model(mut self, model: WavecalModel) -> Self {
        self.models.insert(model.order(), Arc::new(model));
        self
    }
}

impl ReferenceDataProvider for InMemoryReferenceData {
    fn reference_trace(&self, order: SpectralOrder) -> Result<Arc<ReferenceTrace>, SossError> {
        let order = order.ensure_supported()?;
        self.traces.get(&order).cloned().ok_or_else(|| {
            SossError::ReferenceDataUnavailable(format!("no reference trace for {order}"))
        })
    }

    fn wavecal_model(&self, order: SpectralOrder) -> Result<Arc<WavecalModel>, SossError> {
        let order = order.ensure_supported()?;
        self.models.get(&order).cloned().ok_or_else(|| {
            SossError::ReferenceDataUnavailable(format!("no wavelength model for {order}"))
        })
    }
}
