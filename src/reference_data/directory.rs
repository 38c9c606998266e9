//! Directory-backed [`ReferenceDataProvider`].
//!
//! The reference products are expected under their instrument file names:
//!
//! ```text
//! <root>/jwst_niriss_gr700xd_order1_trace_refmodel.txt
//! <root>/jwst_niriss_gr700xd_order2_trace_refmodel.txt
//! <root>/jwst_niriss_gr700xd_wavelength_model_order1.json
//! <root>/jwst_niriss_gr700xd_wavelength_model_order2.json
//! ```
//!
//! Each file is read and parsed the first time it is requested, then kept for the lifetime of
//! the provider.
use std::{io::ErrorKind, sync::Arc};

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use once_cell::sync::OnceCell;

use crate::{
    constants::REFERENCE_FILE_PREFIX,
    reference_data::{
        trace_file::parse_reference_trace, wavecal_file::parse_wavecal_model,
        ReferenceDataProvider, ReferenceTrace,
    },
    soss_errors::SossError,
    spectral_order::SpectralOrder,
    wavecal::WavecalModel,
};

#[derive(Debug, Default)]
struct OrderCache {
    trace: OnceCell<Arc<ReferenceTrace>>,
    model: OnceCell<Arc<WavecalModel>>,
}

#[derive(Debug)]
pub struct ReferenceDirectory {
    root: Utf8PathBuf,
    order1: OrderCache,
    order2: OrderCache,
}

impl ReferenceDirectory {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        ReferenceDirectory {
            root: root.into(),
            order1: OrderCache::default(),
            order2: OrderCache::default(),
        }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Path of the reference trace table of `order`.
    pub fn trace_path(&self, order: SpectralOrder) -> Utf8PathBuf {
        self.root.join(format!(
            "{REFERENCE_FILE_PREFIX}_order{}_trace_refmodel.txt",
            order.number()
        ))
    }

    /// Path of the wavelength model of `order`.
    pub fn wavecal_path(&self, order: SpectralOrder) -> Utf8PathBuf {
        self.root.join(format!(
            "{REFERENCE_FILE_PREFIX}_wavelength_model_order{}.json",
            order.number()
        ))
    }

    fn cache(&self, order: SpectralOrder) -> Result<&OrderCache, SossError> {
        match order {
            SpectralOrder::Order1 => Ok(&self.order1),
            SpectralOrder::Order2 => Ok(&self.order2),
            SpectralOrder::Order3 => Err(SossError::UnsupportedOrder(order)),
        }
    }
}

fn read_reference_file(path: &Utf8Path) -> Result<String, SossError> {
    debug!("loading reference file {path}");
    std::fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => {
            SossError::ReferenceDataUnavailable(format!("reference file not found: {path}"))
        }
        _ => SossError::IoError(err),
    })
}

impl ReferenceDataProvider for ReferenceDirectory {
    fn reference_trace(&self, order: SpectralOrder) -> Result<Arc<ReferenceTrace>, SossError> {
        self.cache(order)?
            .trace
            .get_or_try_init(|| {
                let content = read_reference_file(&self.trace_path(order))?;
                parse_reference_trace(&content).map(Arc::new)
            })
            .cloned()
    }

    fn wavecal_model(&self, order: SpectralOrder) -> Result<Arc<WavecalModel>, SossError> {
        self.cache(order)?
            .model
            .get_or_try_init(|| {
                let content = read_reference_file(&self.wavecal_path(order))?;
                parse_wavecal_model(order, &content).map(Arc::new)
            })
            .cloned()
    }
}
