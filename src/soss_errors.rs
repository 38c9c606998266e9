use thiserror::Error;

use crate::spectral_order::SpectralOrder;

#[derive(Error, Debug)]
pub enum SossError {
    #[error("Invalid spectral order specifier: {0}")]
    InvalidOrderSpecifier(String),

    #[error("Spectral {0} is not supported yet")]
    UnsupportedOrder(SpectralOrder),

    #[error("Shape mismatch in {context}: expected {expected} elements, found {found}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Reference data unavailable: {0}")]
    ReferenceDataUnavailable(String),

    #[error("Invalid wavelength calibration model: {0}")]
    InvalidWavecalModel(String),

    #[error("Wavelength model of {model} cannot calibrate the {trace} trace")]
    OrderMismatch {
        trace: SpectralOrder,
        model: SpectralOrder,
    },

    #[error("Invalid wavemap parameter: {0}")]
    InvalidWavemapParameter(String),

    #[error("Error during the nom parsing: {0}")]
    NomParsingError(String),

    #[error("Unable to decode wavelength model: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl PartialEq for SossError {
    fn eq(&self, other: &Self) -> bool {
        use SossError::*;
        match (self, other) {
            (InvalidOrderSpecifier(a), InvalidOrderSpecifier(b)) => a == b,
            (UnsupportedOrder(a), UnsupportedOrder(b)) => a == b,
            (
                ShapeMismatch {
                    context: c1,
                    expected: e1,
                    found: f1,
                },
                ShapeMismatch {
                    context: c2,
                    expected: e2,
                    found: f2,
                },
            ) => c1 == c2 && e1 == e2 && f1 == f2,
            (ReferenceDataUnavailable(a), ReferenceDataUnavailable(b)) => a == b,
            (InvalidWavecalModel(a), InvalidWavecalModel(b)) => a == b,
            (
                OrderMismatch {
                    trace: t1,
                    model: m1,
                },
                OrderMismatch {
                    trace: t2,
                    model: m2,
                },
            ) => t1 == t2 && m1 == m2,
            (InvalidWavemapParameter(a), InvalidWavemapParameter(b)) => a == b,
            (NomParsingError(a), NomParsingError(b)) => a == b,

            // not comparable: equal when same variant
            (JsonError(_), JsonError(_)) => true,
            (IoError(_), IoError(_)) => true,

            _ => false,
        }
    }
}

/// Check that two parallel arrays have the same length.
pub(crate) fn ensure_same_len(
    context: &'static str,
    expected: usize,
    found: usize,
) -> Result<(), SossError> {
    if expected != found {
        return Err(SossError::ShapeMismatch {
            context,
            expected,
            found,
        });
    }
    Ok(())
}
