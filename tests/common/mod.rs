use approx::assert_relative_eq;
use soss_wavecal::reference_data::directory::ReferenceDirectory;
use soss_wavecal::soss::Soss;

pub const FIXTURE_DIR: &str = "tests/data";

pub fn fixture_soss() -> Soss<ReferenceDirectory> {
    Soss::from_directory(FIXTURE_DIR)
}

pub fn assert_slices_close(actual: &[f64], expected: &[f64], epsilon: f64) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert_relative_eq!(*a, *e, epsilon = epsilon);
    }
}
