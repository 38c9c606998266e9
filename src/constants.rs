//! # Constants and type definitions for the SOSS wavelength models
//!
//! This module centralizes the **instrument constants**, **grid definitions**, and
//! **common type aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - The reference pupil wheel angle the reference traces and wavelength models were captured at
//! - Detector geometry (full frame, working area, SUBSTRIP256 readout)
//! - Wavemap construction defaults (padding, order 2 detector cutoff, wavelength grid)
//! - File name patterns of the reference products
//!
//! Run-time tunables built on top of these defaults live in
//! [`WavemapParams`](crate::wavemap::WavemapParams).

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Detector coordinate in (possibly fractional) pixels
pub type Pixel = f64;
/// Wavelength in microns
pub type Micron = f64;

// -------------------------------------------------------------------------------------------------
// Instrument constants
// -------------------------------------------------------------------------------------------------

/// Commanded pupil wheel position (`PWCPOS`) of the GR700XD at which the reference
/// traces and wavelength calibration models were measured.
pub const REFERENCE_ANGLE: Degree = 245.76;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Number of columns (and rows) of the full detector frame.
pub const DETECTOR_SIZE: usize = 2048;

/// Height of the detector band over which wavemaps are solved. Slightly larger than SUBSTRIP256.
pub const WORKING_HEIGHT: usize = 300;

/// Number of rows of the SUBSTRIP256 readout returned by the wavemap orchestrator.
pub const SUBSTRIP256_HEIGHT: usize = 256;

/// Native pixel padding used when building reference wavemaps.
pub const WAVEMAP_PADDING: usize = 20;

/// Detector column where the order 2 trace runs off the detector.
pub const ORDER2_CUTOFF_COLUMN: Pixel = 1783.0;

/// Lower bound of the shared wavelength grid (µm).
pub const WAVE_GRID_MIN: Micron = 0.5;

/// Upper bound of the shared wavelength grid (µm).
pub const WAVE_GRID_MAX: Micron = 5.5;

/// Number of samples of the shared wavelength grid.
pub const WAVE_GRID_SIZE: usize = 5001;

// -------------------------------------------------------------------------------------------------
// Reference products
// -------------------------------------------------------------------------------------------------

/// Prefix shared by every GR700XD reference product.
pub const REFERENCE_FILE_PREFIX: &str = "jwst_niriss_gr700xd";
