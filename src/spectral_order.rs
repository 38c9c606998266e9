//! # Spectral orders of the GR700XD disperser
//!
//! [`SpectralOrder`] enumerates the diffraction orders known to the crate. Orders 1 and 2
//! carry a reference trace and a wavelength calibration model; order 3 is recognised so that
//! requests for it fail loudly with [`SossError::UnsupportedOrder`] instead of silently
//! returning nothing.
//!
//! Multi-order requests are written as compact order specifiers, the way they appear in
//! reduction scripts:
//!
//! ```rust
//! use soss_wavecal::spectral_order::{parse_order_spec, SpectralOrder};
//!
//! let orders = parse_order_spec("12").unwrap();
//! assert_eq!(orders, vec![SpectralOrder::Order1, SpectralOrder::Order2]);
//!
//! let orders = parse_order_spec("order2").unwrap();
//! assert_eq!(orders, vec![SpectralOrder::Order2]);
//! ```
use std::{fmt, str::FromStr};

use crate::soss_errors::SossError;

/// Maximum number of orders in a single order specifier.
const MAX_ORDERS_PER_SPEC: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpectralOrder {
    Order1,
    Order2,
    Order3,
}

impl SpectralOrder {
    /// Orders for which reference traces and wavelength models exist.
    pub const SUPPORTED: [SpectralOrder; 2] = [SpectralOrder::Order1, SpectralOrder::Order2];

    /// Diffraction order number (1, 2 or 3).
    pub fn number(&self) -> u8 {
        match self {
            SpectralOrder::Order1 => 1,
            SpectralOrder::Order2 => 2,
            SpectralOrder::Order3 => 3,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, SpectralOrder::Order3)
    }

    /// Fail with [`SossError::UnsupportedOrder`] unless this order can be modelled.
    pub fn ensure_supported(self) -> Result<Self, SossError> {
        if self.is_supported() {
            Ok(self)
        } else {
            Err(SossError::UnsupportedOrder(self))
        }
    }

    /// Total degree of the polynomial wavelength calibration fitted for this order.
    ///
    /// Return
    /// ----------
    /// * `Ok(5)` for order 1, `Ok(3)` for order 2.
    /// * [`SossError::UnsupportedOrder`] for order 3.
    pub fn wavecal_degree(&self) -> Result<usize, SossError> {
        match self {
            SpectralOrder::Order1 => Ok(5),
            SpectralOrder::Order2 => Ok(3),
            SpectralOrder::Order3 => Err(SossError::UnsupportedOrder(*self)),
        }
    }

    fn from_digit(c: char) -> Option<Self> {
        match c {
            '1' => Some(SpectralOrder::Order1),
            '2' => Some(SpectralOrder::Order2),
            '3' => Some(SpectralOrder::Order3),
            _ => None,
        }
    }
}

impl fmt::Display for SpectralOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order{}", self.number())
    }
}

impl FromStr for SpectralOrder {
    type Err = SossError;

    /// Accepts either a bare digit (`"1"`) or a named token (`"order1"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let digits = token.strip_prefix("order").unwrap_or(token);
        let mut chars = digits.chars();
        match (chars.next().and_then(SpectralOrder::from_digit), chars.next()) {
            (Some(order), None) => Ok(order),
            _ => Err(SossError::InvalidOrderSpecifier(format!(
                "{s}: use 1, 2, 3, order1, order2 or order3"
            ))),
        }
    }
}

impl TryFrom<&str> for SpectralOrder {
    type Error = SossError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Decompose an order specifier into its spectral orders, preserving the request order.
///
/// Arguments
/// -----------------
/// * `spec`: either a named token (`"order1"`) or a string of up to three order digits
///   (`"1"`, `"12"`, `"123"`, `"21"` …).
///
/// Return
/// ----------
/// * The requested orders, in the order they were written.
/// * [`SossError::InvalidOrderSpecifier`] if the specifier is empty, contains anything other
///   than `1`, `2`, `3`, or names more than three orders.
///
/// Note
/// ----------
/// * Order 3 is accepted here; it is the predictors that reject it.
pub fn parse_order_spec(spec: &str) -> Result<Vec<SpectralOrder>, SossError> {
    let spec = spec.trim();

    if spec.starts_with("order") {
        return Ok(vec![spec.parse()?]);
    }

    let n_orders = spec.chars().count();
    if n_orders == 0 || n_orders > MAX_ORDERS_PER_SPEC {
        return Err(SossError::InvalidOrderSpecifier(format!(
            "'{spec}': order must be 1, 2, 3, or a combination such as 123"
        )));
    }

    spec.chars()
        .map(|c| {
            SpectralOrder::from_digit(c).ok_or_else(|| {
                SossError::InvalidOrderSpecifier(format!(
                    "'{spec}': unrecognised order token '{c}'"
                ))
            })
        })
        .collect()
}
