//! # Iterative 2D wavelength map solver
//!
//! A detector pixel receives the wavelength whose (tilted) monochromatic image crosses it. Since
//! the position of that image depends on the wavelength itself, the wavelength of each pixel is
//! the solution of a fixed-point problem, refined here by iterating on a per-pixel column shift
//! `Δx`:
//!
//! ```text
//! λ     = λ_trace(col − Δx)
//! x'    = x_trace(λ) + (row − y_trace(λ)) · tan(tilt(λ))
//! Δx   += x' − col
//! ```
//!
//! until every pixel satisfies `|x' − col| < dtol` or `maxiter` passes have been made. The
//! intermediate passes clamp at the ends of the trace; the final evaluation marks pixels falling
//! outside the trace's wavelength range with `NaN`.
//!
//! The solver only covers a band of [`WORKING_HEIGHT`] rows at the bottom of the detector, the
//! rest of the full-frame canvas stays `NaN`.
use log::debug;
use ndarray::{s, Array2};

use crate::{
    constants::{Micron, Pixel, DETECTOR_SIZE, RADEG, WORKING_HEIGHT},
    interpolation::{is_non_decreasing, LinearInterpolator, OutOfBounds},
    soss_errors::{ensure_same_len, SossError},
};

/// Numerical settings of [`calc_2d_wave_map`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverParams {
    /// Oversampling factor of the pixel grid.
    pub oversample: usize,
    /// Native pixel padding added on every side of the detector.
    pub padding: usize,
    /// Maximum number of refinement passes.
    pub maxiter: usize,
    /// Convergence tolerance in pixels.
    pub dtol: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        SolverParams {
            oversample: 2,
            padding: 10,
            maxiter: 5,
            dtol: 1e-2,
        }
    }
}

impl SolverParams {
    fn validate(&self) -> Result<(), SossError> {
        if self.oversample == 0 {
            return Err(SossError::InvalidWavemapParameter(
                "oversample must be >= 1".into(),
            ));
        }
        if !(self.dtol.is_finite() && self.dtol > 0.0) {
            return Err(SossError::InvalidWavemapParameter(
                "dtol must be a finite value > 0".into(),
            ));
        }
        Ok(())
    }

    /// Side of the square full-frame canvas returned by the solver.
    pub fn canvas_size(&self) -> usize {
        self.oversample * (DETECTOR_SIZE + 2 * self.padding)
    }
}

/// Coordinates of the (oversampled, padded) pixel centers along one detector axis.
///
/// `v[i] = i/os − (os − 1)/(2·os) − padding` for `i < (dim + 2·padding)·os`.
pub fn pixel_coordinates(dim: usize, padding: usize, oversample: usize) -> Vec<Pixel> {
    let os = oversample as f64;
    let offset = (os - 1.0) / (2.0 * os) + padding as f64;
    (0..(dim + 2 * padding) * oversample)
        .map(|i| i as f64 / os - offset)
        .collect()
}

/// Compute the wavelength at every pixel of the detector.
///
/// Arguments
/// -----------------
/// * `wave_grid`: increasing wavelengths at which the trace is tabulated (µm).
/// * `x_dms`: trace x position at each wavelength, full-frame DMS pixels.
/// * `y_dms`: trace y position at each wavelength, full-frame DMS pixels.
/// * `tilt`: trace tilt at each wavelength, in degrees.
/// * `params`: oversampling, padding and iteration controls.
///
/// Return
/// ----------
/// * A square array of side [`SolverParams::canvas_size`] holding the wavelength of every
///   pixel; pixels outside the solved band or the trace's wavelength range are `NaN`.
/// * [`SossError::ShapeMismatch`] if the trace arrays do not match the grid, or
///   [`SossError::InvalidWavemapParameter`] for an unusable grid or settings.
///
/// Note
/// ----------
/// * Failing to converge within `maxiter` passes is not an error: the last iterate is used.
pub fn calc_2d_wave_map(
    wave_grid: &[Micron],
    x_dms: &[Pixel],
    y_dms: &[Pixel],
    tilt: &[f64],
    params: &SolverParams,
) -> Result<Array2<f64>, SossError> {
    params.validate()?;
    ensure_same_len("wavemap trace x", wave_grid.len(), x_dms.len())?;
    ensure_same_len("wavemap trace y", wave_grid.len(), y_dms.len())?;
    ensure_same_len("wavemap trace tilt", wave_grid.len(), tilt.len())?;
    if wave_grid.len() < 2 || !is_non_decreasing(wave_grid) {
        return Err(SossError::InvalidWavemapParameter(
            "the wavelength grid needs at least two increasing samples".into(),
        ));
    }

    let (dimx, dimy) = (DETECTOR_SIZE, WORKING_HEIGHT);
    let y_shift = dimy as f64 - dimx as f64;
    let y_work: Vec<Pixel> = y_dms.iter().map(|y| y + y_shift).collect();

    // column -> wavelength needs increasing columns
    let (x_inc, w_inc) = if x_dms[0] > x_dms[x_dms.len() - 1] {
        (
            x_dms.iter().rev().copied().collect::<Vec<_>>(),
            wave_grid.iter().rev().copied().collect::<Vec<_>>(),
        )
    } else {
        (x_dms.to_vec(), wave_grid.to_vec())
    };

    let wave_at_column = LinearInterpolator::new(&x_inc, &w_inc)?;
    let tilt_at_wave = LinearInterpolator::new(wave_grid, tilt)?;
    let x_at_wave = LinearInterpolator::new(wave_grid, x_dms)?;
    let y_at_wave = LinearInterpolator::new(wave_grid, &y_work)?;

    let x_vec = pixel_coordinates(dimx, params.padding, params.oversample);
    let y_vec = pixel_coordinates(dimy, params.padding, params.oversample);
    let (ny, nx) = (y_vec.len(), x_vec.len());

    let mut delta_x = Array2::<f64>::zeros((ny, nx));
    let mut n_passes = 0;
    let mut converged = false;

    while n_passes < params.maxiter && !converged {
        n_passes += 1;
        converged = true;

        for ((r, c), dx) in delta_x.indexed_iter_mut() {
            let (col, row) = (x_vec[c], y_vec[r]);

            let wave = wave_at_column.eval(col - *dx, OutOfBounds::Clamp);
            let tilt_rad = tilt_at_wave.eval(wave, OutOfBounds::Clamp) * RADEG;
            let x_estimate = x_at_wave.eval(wave, OutOfBounds::Clamp);
            let y_estimate = y_at_wave.eval(wave, OutOfBounds::Clamp);

            let x_iterated = x_estimate + (row - y_estimate) * tilt_rad.tan();
            let residual = x_iterated - col;
            *dx += residual;

            // NaN residuals never count as converged
            if !(residual.abs() < params.dtol) {
                converged = false;
            }
        }
    }

    debug!(
        "wavemap solver: {n_passes} pass(es), {}",
        if converged {
            "converged"
        } else {
            "not converged, keeping last iterate"
        }
    );

    let wave_map = Array2::from_shape_fn((ny, nx), |(r, c)| {
        wave_at_column.eval(x_vec[c] - delta_x[[r, c]], OutOfBounds::Nan)
    });

    let size = params.canvas_size();
    let mut canvas = Array2::from_elem((size, size), f64::NAN);
    canvas.slice_mut(s![size - ny.., ..]).assign(&wave_map);

    Ok(canvas)
}
