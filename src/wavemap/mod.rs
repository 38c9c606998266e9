//! # Wavemaps and spectraces
//!
//! This module builds the per-order 2D wavelength maps of the SUBSTRIP256 readout at a given
//! pupil wheel angle:
//!
//! 1. Predict the order 1 and order 2 traces on the reference pixel columns and attach the
//!    wavelength of every column from the calibration models.
//! 2. Order 2 runs off the detector past column [`ORDER2_CUTOFF_COLUMN`]; its wavelengths there
//!    are continued linearly with the slope found at the cutoff.
//! 3. Resample `x(λ)` and `y(λ)` of each trace onto a shared wavelength grid, extending them
//!    linearly beyond the calibrated range (the "spectraces").
//! 4. Solve the wavelength of every pixel with [`solver::calc_2d_wave_map`], then keep the
//!    SUBSTRIP256 band, with or without the padding.
//!
//! The numerical knobs are grouped in [`WavemapParams`], whose defaults reproduce the reference
//! wavemaps. A fluent, validated builder is available:
//!
//! ```rust
//! use soss_wavecal::wavemap::WavemapParams;
//!
//! let params = WavemapParams::builder()
//!     .padding(10)
//!     .maxiter(8)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.padding, 10);
//! ```
pub mod solver;

use ndarray::{s, stack, Array2, Array3, ArrayView2, Axis};

use crate::{
    constants::{
        Degree, Micron, Pixel, ORDER2_CUTOFF_COLUMN, SUBSTRIP256_HEIGHT, WAVEMAP_PADDING,
        WAVE_GRID_MAX, WAVE_GRID_MIN, WAVE_GRID_SIZE,
    },
    interpolation::{extrapolate_to_wavegrid, linspace},
    reference_data::ReferenceDataProvider,
    soss_errors::{ensure_same_len, SossError},
    spectral_order::SpectralOrder,
    traces::{Trace, TracePredictor},
};

use solver::{calc_2d_wave_map, SolverParams};

/// Settings of the wavemap construction.
#[derive(Debug, Clone, PartialEq)]
pub struct WavemapParams {
    // --- Shared wavelength grid ---
    pub wave_min: Micron,
    pub wave_max: Micron,
    pub n_wave: usize,

    // --- Solver ---
    pub oversample: usize,
    /// Native pixel padding on each side of the detector.
    pub padding: usize,
    pub maxiter: usize,
    /// Convergence tolerance of the solver, in pixels.
    pub dtol: f64,

    /// Detector column beyond which order 2 wavelengths are extrapolated.
    pub order2_cutoff: Pixel,
}

impl Default for WavemapParams {
    fn default() -> Self {
        WavemapParams {
            wave_min: WAVE_GRID_MIN,
            wave_max: WAVE_GRID_MAX,
            n_wave: WAVE_GRID_SIZE,
            oversample: 1,
            padding: WAVEMAP_PADDING,
            maxiter: 5,
            dtol: 1e-2,
            order2_cutoff: ORDER2_CUTOFF_COLUMN,
        }
    }
}

impl WavemapParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> WavemapParamsBuilder {
        WavemapParamsBuilder::new()
    }

    /// The shared wavelength grid.
    pub fn wave_grid(&self) -> Vec<Micron> {
        linspace(self.wave_min, self.wave_max, self.n_wave)
    }

    pub fn solver_params(&self) -> SolverParams {
        SolverParams {
            oversample: self.oversample,
            padding: self.padding,
            maxiter: self.maxiter,
            dtol: self.dtol,
        }
    }
}

/// Builder for [`WavemapParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct WavemapParamsBuilder {
    params: WavemapParams,
}

impl WavemapParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wave_grid(mut self, wave_min: Micron, wave_max: Micron, n_wave: usize) -> Self {
        self.params.wave_min = wave_min;
        self.params.wave_max = wave_max;
        self.params.n_wave = n_wave;
        self
    }
    pub fn oversample(mut self, v: usize) -> Self {
        self.params.oversample = v;
        self
    }
    pub fn padding(mut self, v: usize) -> Self {
        self.params.padding = v;
        self
    }
    pub fn maxiter(mut self, v: usize) -> Self {
        self.params.maxiter = v;
        self
    }
    pub fn dtol(mut self, v: f64) -> Self {
        self.params.dtol = v;
        self
    }
    pub fn order2_cutoff(mut self, v: Pixel) -> Self {
        self.params.order2_cutoff = v;
        self
    }

    /// Validate and return the parameters.
    ///
    /// Return
    /// ----------
    /// * [`SossError::InvalidWavemapParameter`] if the grid is empty or inverted, the
    ///   oversampling is zero, or the tolerance is not strictly positive.
    pub fn build(self) -> Result<WavemapParams, SossError> {
        let p = &self.params;

        if p.n_wave < 2 {
            return Err(SossError::InvalidWavemapParameter(
                "n_wave must be >= 2".into(),
            ));
        }
        if !(p.wave_min.is_finite() && p.wave_max.is_finite() && p.wave_min < p.wave_max) {
            return Err(SossError::InvalidWavemapParameter(
                "wave_min must be < wave_max".into(),
            ));
        }
        if p.oversample == 0 {
            return Err(SossError::InvalidWavemapParameter(
                "oversample must be >= 1".into(),
            ));
        }
        if !(p.dtol.is_finite() && p.dtol > 0.0) {
            return Err(SossError::InvalidWavemapParameter("dtol must be > 0".into()));
        }
        if !p.order2_cutoff.is_finite() {
            return Err(SossError::InvalidWavemapParameter(
                "order2_cutoff must be finite".into(),
            ));
        }

        Ok(self.params)
    }
}

/// Trace centroids of one order resampled on the shared wavelength grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrace {
    pub order: SpectralOrder,
    pub wavelength: Vec<Micron>,
    pub x: Vec<Pixel>,
    pub y: Vec<Pixel>,
}

/// Wavemaps of several orders, stacked along the first axis.
#[derive(Debug, Clone)]
pub struct WavemapSet {
    pub orders: Vec<SpectralOrder>,
    /// `(order, row, column)`
    pub wavemaps: Array3<f64>,
    pub spectraces: Option<Vec<Spectrace>>,
}

impl WavemapSet {
    /// Wavemap of `order`, if it was computed.
    pub fn wavemap(&self, order: SpectralOrder) -> Option<ArrayView2<'_, f64>> {
        self.orders
            .iter()
            .position(|&o| o == order)
            .map(|i| self.wavemaps.index_axis(Axis(0), i))
    }
}

/// Continue the wavelengths of a trace linearly past a detector column.
///
/// Samples at columns `>= cutoff` are replaced by the linear continuation of the last two samples
/// before the cutoff, so the result keeps the local dispersion across the boundary.
///
/// Arguments
/// -----------------
/// * `x`: increasing pixel columns of the trace.
/// * `wavelength`: wavelength at each column.
/// * `cutoff`: first column that falls off the detector.
///
/// Return
/// ----------
/// * The corrected wavelengths, unchanged if the trace never reaches `cutoff`.
/// * [`SossError::ShapeMismatch`] if the inputs differ in length, or
///   [`SossError::InvalidWavemapParameter`] if fewer than two samples precede the cutoff.
pub fn apply_detector_cutoff(
    x: &[Pixel],
    wavelength: &[Micron],
    cutoff: Pixel,
) -> Result<Vec<Micron>, SossError> {
    ensure_same_len("detector cutoff", x.len(), wavelength.len())?;

    let n_on_detector = x.iter().take_while(|&&col| col < cutoff).count();
    if n_on_detector == x.len() {
        return Ok(wavelength.to_vec());
    }
    if n_on_detector < 2 {
        return Err(SossError::InvalidWavemapParameter(format!(
            "at least two trace samples are needed before column {cutoff}"
        )));
    }

    let (i1, i2) = (n_on_detector - 2, n_on_detector - 1);
    let slope = (wavelength[i2] - wavelength[i1]) / (x[i2] - x[i1]);

    Ok(wavelength
        .iter()
        .zip(x)
        .enumerate()
        .map(|(i, (&w, &col))| {
            if i < n_on_detector {
                w
            } else {
                wavelength[i2] + slope * (col - x[i2])
            }
        })
        .collect())
}

fn trace_wavelengths(trace: &Trace) -> Result<&[Micron], SossError> {
    trace.wavelength.as_deref().ok_or_else(|| {
        SossError::ReferenceDataUnavailable(format!("{} trace has no wavelengths", trace.order))
    })
}

/// Keep the SUBSTRIP256 band at the bottom of a full-frame canvas, optionally without padding.
fn crop_substrip(
    canvas: &Array2<f64>,
    params: &WavemapParams,
    include_padding: bool,
) -> Array2<f64> {
    let os = params.oversample;
    let pad = os * params.padding;
    let band_rows = os * (SUBSTRIP256_HEIGHT + 2 * params.padding);
    let band = canvas.slice(s![canvas.nrows() - band_rows.., ..]);
    if include_padding {
        band.to_owned()
    } else {
        band.slice(s![pad..band.nrows() - pad, pad..band.ncols() - pad])
            .to_owned()
    }
}

/// Compute the order 1 and order 2 wavemaps (and optionally the spectraces) at `angle`.
///
/// Arguments
/// -----------------
/// * `predictor`: trace predictor bound to the reference products.
/// * `angle`: commanded pupil wheel angle (degrees).
/// * `params`: grid and solver settings.
/// * `include_padding`: keep the padding around the maps, as needed for reference files.
/// * `include_spectraces`: also return the traces resampled on the wavelength grid.
///
/// Return
/// ----------
/// * A [`WavemapSet`] of shape `(2, 256·os, 2048·os)`, or
///   `(2, (256 + 2·pad)·os, (2048 + 2·pad)·os)` with padding.
/// * Any error of the trace prediction, the calibration models or the solver.
pub fn compute_wavemaps<P: ReferenceDataProvider>(
    predictor: &TracePredictor<P>,
    angle: Degree,
    params: &WavemapParams,
    include_padding: bool,
    include_spectraces: bool,
) -> Result<WavemapSet, SossError> {
    let wave_grid = params.wave_grid();
    let solver_params = params.solver_params();

    let mut maps = Vec::with_capacity(SpectralOrder::SUPPORTED.len());
    let mut spectraces = Vec::with_capacity(SpectralOrder::SUPPORTED.len());

    for order in SpectralOrder::SUPPORTED {
        let trace = predictor.predict_trace_with_wavelengths(angle, order, true)?;
        let wavelength = match order {
            SpectralOrder::Order2 => {
                apply_detector_cutoff(&trace.x, trace_wavelengths(&trace)?, params.order2_cutoff)?
            }
            _ => trace_wavelengths(&trace)?.to_vec(),
        };

        let x = extrapolate_to_wavegrid(&wave_grid, &wavelength, &trace.x)?;
        let y = extrapolate_to_wavegrid(&wave_grid, &wavelength, &trace.y)?;
        let tilt = vec![0.0; wave_grid.len()];

        let canvas = calc_2d_wave_map(&wave_grid, &x, &y, &tilt, &solver_params)?;
        maps.push(crop_substrip(&canvas, params, include_padding));

        spectraces.push(Spectrace {
            order,
            wavelength: wave_grid.clone(),
            x,
            y,
        });
    }

    let views: Vec<ArrayView2<f64>> = maps.iter().map(|m| m.view()).collect();
    let wavemaps = stack(Axis(0), &views).map_err(|e| {
        SossError::InvalidWavemapParameter(format!("cannot stack wavemaps: {e}"))
    })?;

    Ok(WavemapSet {
        orders: SpectralOrder::SUPPORTED.to_vec(),
        wavemaps,
        spectraces: include_spectraces.then_some(spectraces),
    })
}
