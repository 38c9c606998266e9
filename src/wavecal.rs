//! # Wavelength calibration model
//!
//! The wavelength falling on a given pixel column of a trace depends on the column itself and on
//! the offset of the pupil wheel from [`REFERENCE_ANGLE`](crate::constants::REFERENCE_ANGLE).
//! Both inputs are min-max scaled with the bounds seen during the fit, expanded into every
//! monomial up to the order's total degree, and combined linearly:
//!
//! ```text
//! λ(x, θ) = intercept + Σ cᵢ · fᵢ(s_x(x), s_θ(θ − θ_ref))
//! ```
//!
//! The monomials are enumerated by increasing total degree and, within a degree, by increasing
//! power of the angle offset:
//!
//! ```text
//! x, o, x², x·o, o², x³, x²·o, x·o², o³, …
//! ```
//!
//! This enumeration is part of the model: coefficient `i` only makes sense against monomial `i`.
use log::warn;

use crate::{
    constants::{Degree, Micron, Pixel},
    soss_errors::SossError,
    spectral_order::SpectralOrder,
};

/// Min-max feature scaling with the bounds observed during the fit.
///
/// Values outside `[min, max]` are *not* clamped: they map linearly outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMaxScaler {
    pub min: f64,
    pub max: f64,
}

impl MinMaxScaler {
    pub fn new(min: f64, max: f64) -> Result<Self, SossError> {
        if !(min.is_finite() && max.is_finite()) || max == min {
            return Err(SossError::InvalidWavecalModel(format!(
                "degenerate scaler bounds [{min}, {max}]"
            )));
        }
        Ok(MinMaxScaler { min, max })
    }

    pub fn scale(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }

    pub fn contains(&self, value: f64) -> bool {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        (lo..=hi).contains(&value)
    }
}

/// Number of monomials of two variables with total degree in `1..=degree`.
pub const fn n_poly_features(degree: usize) -> usize {
    (degree + 1) * (degree + 2) / 2 - 1
}

/// Expand `(p, o)` into every monomial of total degree `1..=degree`.
///
/// Return
/// ----------
/// * A vector of length [`n_poly_features`]`(degree)` in the fitted enumeration order.
pub fn polynomial_features(p: f64, o: f64, degree: usize) -> Vec<f64> {
    let mut features = Vec::with_capacity(n_poly_features(degree));
    for d in 1..=degree {
        for k in 0..=d {
            features.push(p.powi((d - k) as i32) * o.powi(k as i32));
        }
    }
    features
}

/// Polynomial wavelength calibration of one spectral order.
#[derive(Debug, Clone, PartialEq)]
pub struct WavecalModel {
    order: SpectralOrder,
    degree: usize,
    coefficients: Vec<f64>,
    intercept: Micron,
    position_scaler: MinMaxScaler,
    offset_scaler: MinMaxScaler,
}

impl WavecalModel {
    /// Assemble a wavelength model and check it against the degree fitted for `order`.
    ///
    /// Arguments
    /// -----------------
    /// * `order`: spectral order the coefficients were fitted for.
    /// * `coefficients`: one weight per polynomial feature.
    /// * `intercept`: constant term, in microns.
    /// * `position_scaler`: scaling bounds of the pixel column feature.
    /// * `offset_scaler`: scaling bounds of the angle offset feature.
    ///
    /// Return
    /// ----------
    /// * [`SossError::UnsupportedOrder`] for order 3.
    /// * [`SossError::InvalidWavecalModel`] when the number of coefficients does not match the
    ///   order's polynomial degree.
    pub fn new(
        order: SpectralOrder,
        coefficients: Vec<f64>,
        intercept: Micron,
        position_scaler: MinMaxScaler,
        offset_scaler: MinMaxScaler,
    ) -> Result<Self, SossError> {
        let degree = order.wavecal_degree()?;
        let expected = n_poly_features(degree);
        if coefficients.len() != expected {
            return Err(SossError::InvalidWavecalModel(format!(
                "{order} expects {expected} coefficients (degree {degree}), got {}",
                coefficients.len()
            )));
        }
        Ok(WavecalModel {
            order,
            degree,
            coefficients,
            intercept,
            position_scaler,
            offset_scaler,
        })
    }

    pub fn order(&self) -> SpectralOrder {
        self.order
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> Micron {
        self.intercept
    }

    pub fn position_scaler(&self) -> MinMaxScaler {
        self.position_scaler
    }

    pub fn offset_scaler(&self) -> MinMaxScaler {
        self.offset_scaler
    }

    /// Total polynomial degree of the model, fixed by its order.
    pub fn poly_degree(&self) -> usize {
        self.degree
    }

    /// Evaluate the model at a single pixel column for an already computed angle offset.
    fn eval(&self, column: Pixel, scaled_offset: f64) -> Micron {
        let p = self.position_scaler.scale(column);
        let features = polynomial_features(p, scaled_offset, self.degree);
        self.coefficients
            .iter()
            .zip(&features)
            .map(|(c, f)| c * f)
            .sum::<f64>()
            + self.intercept
    }

    /// Predict the wavelength at each pixel column for a pupil wheel angle.
    ///
    /// Arguments
    /// -----------------
    /// * `columns`: pixel columns along the trace.
    /// * `angle`: commanded pupil wheel angle (degrees).
    /// * `reference_angle`: angle the model offsets are measured from.
    ///
    /// Return
    /// ----------
    /// * One wavelength (µm) per column.
    ///
    /// Note
    /// ----------
    /// * Angle offsets outside the fitted range still produce a prediction; a warning is logged.
    pub fn predict(
        &self,
        columns: &[Pixel],
        angle: Degree,
        reference_angle: Degree,
    ) -> Result<Vec<Micron>, SossError> {
        let offset = angle - reference_angle;
        if !self.offset_scaler.contains(offset) {
            warn!(
                "{}: angle offset {offset:.6} outside calibrated range [{}, {}], extrapolating",
                self.order, self.offset_scaler.min, self.offset_scaler.max
            );
        }
        let scaled_offset = self.offset_scaler.scale(offset);

        Ok(columns
            .iter()
            .map(|&x| self.eval(x, scaled_offset))
            .collect())
    }
}
