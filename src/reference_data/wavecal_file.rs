//! Decoder for the wavelength calibration model files (`*_wavelength_model_order{N}.json`).
//!
//! ```json
//! {
//!   "model": {
//!     "coef": [ ... ],
//!     "intercept": 2.761308747854264,
//!     "poly_degree": 5,
//!     "scaler": { "data_min_": [x_min, offset_min], "data_max_": [x_max, offset_max] }
//!   }
//! }
//! ```
//!
//! Index 0 of the scaler bounds is the pixel column feature, index 1 the angle offset feature.
use serde::Deserialize;

use crate::{
    soss_errors::SossError,
    spectral_order::SpectralOrder,
    wavecal::{MinMaxScaler, WavecalModel},
};

#[derive(Debug, Deserialize)]
struct WavecalFile {
    model: ModelSection,
}

#[derive(Debug, Deserialize)]
struct ModelSection {
    coef: Vec<f64>,
    intercept: f64,
    #[serde(default)]
    poly_degree: Option<usize>,
    scaler: ScalerSection,
}

#[derive(Debug, Deserialize)]
struct ScalerSection {
    data_min_: [f64; 2],
    data_max_: [f64; 2],
}

/// Decode a wavelength model of `order` from its JSON representation.
///
/// Return
/// ----------
/// * The validated [`WavecalModel`].
/// * [`SossError::JsonError`] if the document does not have the expected layout.
/// * [`SossError::InvalidWavecalModel`] if the declared degree or coefficient count disagree
///   with the order, or if a scaler has degenerate bounds.
pub fn parse_wavecal_model(order: SpectralOrder, content: &str) -> Result<WavecalModel, SossError> {
    let file: WavecalFile = serde_json::from_str(content)?;
    let model = file.model;

    let degree = order.wavecal_degree()?;
    if let Some(declared) = model.poly_degree {
        if declared != degree {
            return Err(SossError::InvalidWavecalModel(format!(
                "{order} is fitted with degree {degree}, file declares {declared}"
            )));
        }
    }

    let [x_min, offset_min] = model.scaler.data_min_;
    let [x_max, offset_max] = model.scaler.data_max_;

    WavecalModel::new(
        order,
        model.coef,
        model.intercept,
        MinMaxScaler::new(x_min, x_max)?,
        MinMaxScaler::new(offset_min, offset_max)?,
    )
}

#[cfg(test)]
mod wavecal_file_test {
    use super::*;
    use approx::assert_relative_eq;

    const ORDER2_JSON: &str = r#"{
        "model": {
            "coef": [-0.45, 0.02, 0.01, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            "intercept": 1.0957902455177815,
            "poly_degree": 3,
            "scaler": {
                "data_min_": [672.1379843340777, -0.10355200000017817],
                "data_max_": [1619.4246462385518, 0.1579992675781341]
            }
        }
    }"#;

    #[test]
    fn test_parse_order2_model() {
        let model = parse_wavecal_model(SpectralOrder::Order2, ORDER2_JSON).unwrap();
        assert_eq!(model.order(), SpectralOrder::Order2);
        assert_eq!(model.coefficients().len(), 9);
        assert_eq!(model.poly_degree(), 3);
        assert_relative_eq!(model.intercept(), 1.0957902455177815, max_relative = 1e-14);
        assert_relative_eq!(model.position_scaler().min, 672.1379843340777, max_relative = 1e-14);
        assert_relative_eq!(model.offset_scaler().max, 0.1579992675781341, max_relative = 1e-14);
    }

    #[test]
    fn test_degree_mismatch_rejected() {
        let err = parse_wavecal_model(SpectralOrder::Order1, ORDER2_JSON).unwrap_err();
        assert!(matches!(err, SossError::InvalidWavecalModel(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_wavecal_model(SpectralOrder::Order2, r#"{"model": {"coef": []}}"#)
            .unwrap_err();
        assert!(matches!(err, SossError::JsonError(_)));
    }
}
