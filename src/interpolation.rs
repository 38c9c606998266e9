//! # One-dimensional linear interpolation
//!
//! Piecewise-linear interpolation over tabulated `(xp, fp)` samples, with an explicit policy for
//! query points outside the tabulated domain:
//!
//! - [`OutOfBounds::Clamp`] repeats the boundary value (flat extrapolation). Used while
//!   iterating, where continuity matters more than accuracy.
//! - [`OutOfBounds::Nan`] returns `f64::NAN`, the "no value" sentinel of the wavemaps.
//!
//! It also provides [`extrapolate_to_wavegrid`], which extends a quantity sampled at native
//! trace wavelengths linearly past both ends before resampling it onto a shared wavelength grid.
use itertools::Itertools;

use crate::soss_errors::{ensure_same_len, SossError};

/// Behaviour of [`LinearInterpolator::eval`] outside `[xp[0], xp[n-1]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutOfBounds {
    Clamp,
    Nan,
}

/// Linear interpolator borrowing increasing abscissae `xp` and ordinates `fp`.
///
/// The abscissae are expected to be non-decreasing; this is not checked on every call since
/// the interpolator is evaluated once per detector pixel.
#[derive(Debug, Clone, Copy)]
pub struct LinearInterpolator<'a> {
    xp: &'a [f64],
    fp: &'a [f64],
}

impl<'a> LinearInterpolator<'a> {
    /// Build an interpolator over `(xp, fp)`.
    ///
    /// Return
    /// ----------
    /// * [`SossError::ShapeMismatch`] if the slices differ in length.
    /// * [`SossError::InvalidWavemapParameter`] if no samples are given.
    pub fn new(xp: &'a [f64], fp: &'a [f64]) -> Result<Self, SossError> {
        ensure_same_len("linear interpolation", xp.len(), fp.len())?;
        if xp.is_empty() {
            return Err(SossError::InvalidWavemapParameter(
                "cannot interpolate over an empty table".into(),
            ));
        }
        Ok(LinearInterpolator { xp, fp })
    }

    /// Evaluate at `x`.
    pub fn eval(&self, x: f64, bounds: OutOfBounds) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        let n = self.xp.len();
        let (first, last) = (self.xp[0], self.xp[n - 1]);

        if x < first || x > last {
            return match bounds {
                OutOfBounds::Nan => f64::NAN,
                OutOfBounds::Clamp if x < first => self.fp[0],
                OutOfBounds::Clamp => self.fp[n - 1],
            };
        }

        // first index with xp > x; 0 only when the table starts with NaN
        let idx = self.xp.partition_point(|&v| v <= x);
        if idx == 0 {
            return f64::NAN;
        }
        if idx >= n {
            return self.fp[n - 1];
        }
        let (x0, x1) = (self.xp[idx - 1], self.xp[idx]);
        let (f0, f1) = (self.fp[idx - 1], self.fp[idx]);
        if x1 == x0 {
            return f0;
        }
        f0 + (x - x0) * (f1 - f0) / (x1 - x0)
    }

    /// Evaluate at every point of `xs`.
    pub fn eval_many(&self, xs: &[f64], bounds: OutOfBounds) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x, bounds)).collect()
    }
}

/// Convenience wrapper: interpolate `fp(xp)` at `xs` with clamped ends.
pub fn interp(xs: &[f64], xp: &[f64], fp: &[f64]) -> Result<Vec<f64>, SossError> {
    Ok(LinearInterpolator::new(xp, fp)?.eval_many(xs, OutOfBounds::Clamp))
}

/// `n` evenly spaced samples from `start` to `stop`, both included.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + i as f64 * step })
                .collect()
        }
    }
}

/// `true` when the samples never decrease.
pub fn is_non_decreasing(values: &[f64]) -> bool {
    values.iter().tuple_windows().all(|(a, b)| a <= b)
}

/// Resample a quantity known at native wavelengths onto a wavelength grid, extrapolating
/// linearly on both sides of the native range.
///
/// The native samples are sorted by wavelength, the slope of the two outermost samples on each
/// side is used to extend the quantity to the grid points lying outside the native range, and the
/// extended table is finally interpolated at every grid point.
///
/// Arguments
/// -----------------
/// * `wave_grid`: target wavelength grid (increasing).
/// * `wavelength`: native wavelength of each sample, in any order.
/// * `quantity`: value of the quantity at each native wavelength.
///
/// Return
/// ----------
/// * The quantity on `wave_grid`.
/// * [`SossError::ShapeMismatch`] if `wavelength` and `quantity` differ in length, or
///   [`SossError::InvalidWavemapParameter`] if fewer than two native samples are given.
pub fn extrapolate_to_wavegrid(
    wave_grid: &[f64],
    wavelength: &[f64],
    quantity: &[f64],
) -> Result<Vec<f64>, SossError> {
    ensure_same_len("wavelength extrapolation", wavelength.len(), quantity.len())?;
    if wavelength.len() < 2 {
        return Err(SossError::InvalidWavemapParameter(
            "at least two samples are needed to extrapolate onto the wavelength grid".into(),
        ));
    }

    let (w, q): (Vec<f64>, Vec<f64>) = wavelength
        .iter()
        .zip(quantity)
        .sorted_by(|a, b| a.0.total_cmp(b.0))
        .map(|(&w, &q)| (w, q))
        .unzip();
    let n = w.len();

    let slope_right = (q[n - 1] - q[n - 2]) / (w[n - 1] - w[n - 2]);
    let slope_left = (q[1] - q[0]) / (w[1] - w[0]);

    let (left, right): (Vec<f64>, Vec<f64>) = (
        wave_grid.iter().copied().filter(|&g| g < w[0]).collect(),
        wave_grid.iter().copied().filter(|&g| g > w[n - 1]).collect(),
    );

    let mut w_ext = Vec::with_capacity(left.len() + n + right.len());
    let mut q_ext = Vec::with_capacity(w_ext.capacity());
    for &g in &left {
        w_ext.push(g);
        q_ext.push(q[0] + (g - w[0]) * slope_left);
    }
    w_ext.extend_from_slice(&w);
    q_ext.extend_from_slice(&q);
    for &g in &right {
        w_ext.push(g);
        q_ext.push(q[n - 1] + (g - w[n - 1]) * slope_right);
    }

    interp(wave_grid, &w_ext, &q_ext)
}
