//! # Rigid rotation of trace centroids
//!
//! A change of the pupil wheel position rotates the dispersed traces on the detector. Trace
//! positions at an arbitrary angle are obtained by rotating the reference centroids about the
//! origin point stored with each reference trace.
use nalgebra::{Point2, Rotation2, Vector2};

use crate::{
    constants::{Degree, Pixel, RADEG},
    interpolation::{LinearInterpolator, OutOfBounds},
    soss_errors::{ensure_same_len, SossError},
};

/// Rotate a set of 2D points about `origin`.
///
/// Points are shifted so that `origin` sits at `(0, 0)`, multiplied by the rotation matrix
/// `[[cos θ, -sin θ], [sin θ, cos θ]]` and shifted back.
///
/// Arguments
/// -----------------
/// * `x`, `y`: coordinates of the points (same length).
/// * `angle`: rotation angle in degrees (counter-clockwise).
/// * `origin`: center of rotation.
/// * `resample`: when `true`, the rotated `y` values are linearly interpolated back onto the
///   input `x` columns (flat beyond the rotated range) and the input `x` is returned unchanged.
///
/// Return
/// ----------
/// * `(x, y)` of the rotated points, either raw or resampled on the input columns.
/// * [`SossError::ShapeMismatch`] if `x` and `y` differ in length.
///
/// Note
/// ----------
/// * Resampling assumes the rotated abscissae are monotonic, which holds for the small angle
///   offsets the instrument produces. A decreasing run is traversed in reverse.
pub fn rotate(
    x: &[Pixel],
    y: &[Pixel],
    angle: Degree,
    origin: (Pixel, Pixel),
    resample: bool,
) -> Result<(Vec<Pixel>, Vec<Pixel>), SossError> {
    ensure_same_len("rotation", x.len(), y.len())?;

    let rot = Rotation2::new(angle * RADEG);
    let center = Vector2::new(origin.0, origin.1);

    let (mut x_rot, mut y_rot): (Vec<Pixel>, Vec<Pixel>) = x
        .iter()
        .zip(y)
        .map(|(&px, &py)| {
            let p = rot * (Point2::new(px, py) - center) + center;
            (p.x, p.y)
        })
        .unzip();

    if !resample {
        return Ok((x_rot, y_rot));
    }

    if x_rot.len() > 1 && x_rot[0] > x_rot[x_rot.len() - 1] {
        x_rot.reverse();
        y_rot.reverse();
    }
    let lin = LinearInterpolator::new(&x_rot, &y_rot)?;
    let y_resampled = lin.eval_many(x, OutOfBounds::Clamp);

    Ok((x.to_vec(), y_resampled))
}

#[cfg(test)]
mod geometry_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotate_resample_keeps_columns() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [5.0, 6.0, 7.0, 8.0];

        let (x_rot, _) = rotate(&x, &y, 45., (0., 0.), true).unwrap();
        assert_eq!(x_rot, x.to_vec());

        let (x_rot, y_rot) = rotate(&x, &y, 0.3, (2.5, 6.0), true).unwrap();
        assert_eq!(x_rot, x.to_vec());
        assert_eq!(y_rot.len(), y.len());
    }

    #[test]
    fn test_rotate_zero_is_identity() {
        let x = [4.0, 100.0, 1000.0, 2043.0];
        let y = [80.0, 70.5, 50.25, 33.0];

        let (x_rot, y_rot) = rotate(&x, &y, 0.0, (0.0, 0.0), false).unwrap();
        for i in 0..x.len() {
            assert_relative_eq!(x_rot[i], x[i]);
            assert_relative_eq!(y_rot[i], y[i]);
        }
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let (x_rot, y_rot) = rotate(&[2.0], &[1.0], 90.0, (1.0, 1.0), false).unwrap();
        assert_relative_eq!(x_rot[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(y_rot[0], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotate_inverse() {
        let x = [4.0, 500.0, 1200.0, 2043.0];
        let y = [85.0, 62.0, 48.0, 31.0];
        let origin = (1887.0, 54.0);

        let (xr, yr) = rotate(&x, &y, 1.7, origin, false).unwrap();
        let (xb, yb) = rotate(&xr, &yr, -1.7, origin, false).unwrap();
        for i in 0..x.len() {
            assert_relative_eq!(xb[i], x[i], epsilon = 1e-9);
            assert_relative_eq!(yb[i], y[i], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_rotate_resample_follows_straight_line() {
        // A horizontal line rotated about a point on it becomes a line of slope tan(θ)
        // through that point, which resampling must reproduce at every inner column.
        let x: Vec<f64> = (0..11).map(|i| i as f64 * 10.0).collect();
        let y = vec![20.0; x.len()];
        let angle: f64 = 0.5;

        let (_, y_rot) = rotate(&x, &y, angle, (50.0, 20.0), true).unwrap();
        let slope = (angle * RADEG).tan();
        for i in 1..x.len() - 1 {
            assert_relative_eq!(y_rot[i], 20.0 + (x[i] - 50.0) * slope, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_rotate_non_finite_angle() {
        let x = [1.0, 2.0, 3.0];
        let y = [1.0, 2.0, 3.0];

        for angle in [f64::NAN, f64::INFINITY] {
            let (x_rot, y_rot) = rotate(&x, &y, angle, (0.0, 0.0), true).unwrap();
            assert_eq!(x_rot, x.to_vec());
            assert!(y_rot.iter().all(|v| v.is_nan()));

            let (x_raw, _) = rotate(&x, &y, angle, (0.0, 0.0), false).unwrap();
            assert!(x_raw.iter().all(|v| v.is_nan()));
        }
    }

    #[test]
    fn test_rotate_shape_mismatch() {
        let err = rotate(&[1.0, 2.0], &[1.0], 1.0, (0.0, 0.0), true).unwrap_err();
        assert!(matches!(err, SossError::ShapeMismatch { .. }));
    }
}
