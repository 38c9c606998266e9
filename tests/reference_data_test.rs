mod common;

use std::sync::Arc;

use approx::assert_relative_eq;
use soss_wavecal::reference_data::directory::ReferenceDirectory;
use soss_wavecal::reference_data::ReferenceDataProvider;
use soss_wavecal::soss_errors::SossError;
use soss_wavecal::spectral_order::SpectralOrder;

use crate::common::FIXTURE_DIR;

#[test]
fn test_load_order1_trace_model() {
    let refs = ReferenceDirectory::new(FIXTURE_DIR);
    let trace = refs.reference_trace(SpectralOrder::Order1).unwrap();

    let (x0, y0) = trace.origin();
    assert_eq!((x0 as i64, y0 as i64), (1887, 54));
    assert_eq!(trace.x_limits(), (4.0, 2043.0));
    assert_eq!(trace.len(), 2040);
}

#[test]
fn test_load_order2_trace_model() {
    let refs = ReferenceDirectory::new(FIXTURE_DIR);
    let trace = refs.reference_trace(SpectralOrder::Order2).unwrap();

    let (x0, y0) = trace.origin();
    assert_eq!((x0 as i64, y0 as i64), (1677, 200));
    assert_eq!(trace.x_limits(), (1000.0, 1750.0));
}

#[test]
fn test_load_wavecal_model_order1() {
    let refs = ReferenceDirectory::new(FIXTURE_DIR);
    let model = refs.wavecal_model(SpectralOrder::Order1).unwrap();

    assert_eq!(model.order(), SpectralOrder::Order1);
    assert_eq!(model.coefficients().len(), 20);
    assert_eq!(model.poly_degree(), 5);
    assert_relative_eq!(model.intercept(), 2.761308747854264, max_relative = 1e-14);
    assert_relative_eq!(model.position_scaler().min, 73.62893071613087, max_relative = 1e-14);
    assert_relative_eq!(model.position_scaler().max, 2039.7420006352984, max_relative = 1e-14);
    assert_relative_eq!(model.offset_scaler().min, -0.1035520000001781, max_relative = 1e-14);
    assert_relative_eq!(model.offset_scaler().max, 0.1628820800781341, max_relative = 1e-14);
}

#[test]
fn test_load_wavecal_model_order2() {
    let refs = ReferenceDirectory::new(FIXTURE_DIR);
    let model = refs.wavecal_model(SpectralOrder::Order2).unwrap();

    assert_eq!(model.order(), SpectralOrder::Order2);
    assert_eq!(model.coefficients().len(), 9);
    assert_eq!(model.poly_degree(), 3);
    assert_relative_eq!(model.intercept(), 1.0957902455177815, max_relative = 1e-14);
    assert_relative_eq!(model.position_scaler().min, 672.1379843340777, max_relative = 1e-14);
    assert_relative_eq!(model.position_scaler().max, 1619.4246462385518, max_relative = 1e-14);
    assert_relative_eq!(model.offset_scaler().min, -0.10355200000017817, max_relative = 1e-14);
    assert_relative_eq!(model.offset_scaler().max, 0.1579992675781341, max_relative = 1e-14);
}

#[test]
fn test_reference_products_are_cached() {
    let refs = ReferenceDirectory::new(FIXTURE_DIR);

    let first = refs.reference_trace(SpectralOrder::Order1).unwrap();
    let second = refs.reference_trace(SpectralOrder::Order1).unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let first = refs.wavecal_model(SpectralOrder::Order2).unwrap();
    let second = refs.wavecal_model(SpectralOrder::Order2).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_order3_has_no_reference_data() {
    let refs = ReferenceDirectory::new(FIXTURE_DIR);
    assert_eq!(
        refs.reference_trace(SpectralOrder::Order3),
        Err(SossError::UnsupportedOrder(SpectralOrder::Order3))
    );
    assert_eq!(
        refs.wavecal_model(SpectralOrder::Order3),
        Err(SossError::UnsupportedOrder(SpectralOrder::Order3))
    );
}
