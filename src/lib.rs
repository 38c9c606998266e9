//! # soss_wavecal
//!
//! Trace positions and 2D wavelength maps of the NIRISS/SOSS GR700XD disperser as a function of
//! the commanded pupil wheel position.
//!
//! - [`geometry`] – rigid rotation of trace centroids about their origin.
//! - [`traces`] – trace prediction from the reference traces.
//! - [`wavecal`] – polynomial wavelength calibration per order.
//! - [`wavemap`] – iterative 2D wavemap solver and the wavemap pipeline.
//! - [`reference_data`] – reference products and their providers.
//! - [`soss`] – [`Soss`](crate::soss::Soss), the entry point tying everything together.
pub mod constants;
pub mod geometry;
pub mod interpolation;
pub mod reference_data;
pub mod soss;
pub mod soss_errors;
pub mod spectral_order;
pub mod traces;
pub mod wavecal;
pub mod wavemap;
