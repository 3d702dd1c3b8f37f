use crate::core::batch::{Broadcast, map_batch, resolve_batch_len};
use crate::core::error::GeometryError;
use nalgebra::{Matrix3, Point3};

/// Builds a local basis from three points as the rows `[e1, e2, e3]` of a matrix.
///
/// The axes are
///
/// - `e1 = c - b`
/// - `e3 = e1 × (b - a)`
/// - `e2 = e3 × e1`
///
/// so the basis is right-handed with `e1` along the last bond and `e3` normal to the
/// plane of the three points. With `normalize` each row is divided by its own length.
///
/// Collinear points give a zero `e3` and therefore NaN rows after normalization; the
/// caller is responsible for rejecting such input.
pub fn build_frame(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    normalize: bool,
) -> Matrix3<f64> {
    let v1 = c - b;
    let v2 = b - a;
    let v3 = v1.cross(&v2);
    let v2_ortho = v3.cross(&v1);

    let mut basis =
        Matrix3::from_rows(&[v1.transpose(), v2_ortho.transpose(), v3.transpose()]);
    if normalize {
        for mut row in basis.row_iter_mut() {
            let norm = row.norm();
            row /= norm;
        }
    }
    basis
}

/// Batched [`build_frame`] with leading-dimension broadcasting.
pub fn build_frame_batch<A, B, C>(
    a: A,
    b: B,
    c: C,
    normalize: bool,
) -> Result<Vec<Matrix3<f64>>, GeometryError>
where
    A: Broadcast<Point3<f64>>,
    B: Broadcast<Point3<f64>>,
    C: Broadcast<Point3<f64>>,
{
    let len = resolve_batch_len(&[a.batch_len(), b.batch_len(), c.batch_len()])?;
    Ok(map_batch(len, |i| {
        build_frame(&a.at(i), &b.at(i), &c.at(i), normalize)
    }))
}

/// Rotation carrying the frame of the `from` triple onto the frame of the `to` triple.
///
/// Both frames are built with [`build_frame`]; the result is `B_to^T * B_from`, which maps
/// each axis of the first frame onto the matching axis of the second.
pub fn rotation_between_planes(
    from: &[Point3<f64>; 3],
    to: &[Point3<f64>; 3],
) -> Matrix3<f64> {
    let from_basis = build_frame(&from[0], &from[1], &from[2], true);
    let to_basis = build_frame(&to[0], &to[1], &to[2], true);
    to_basis.transpose() * from_basis
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Rotation3, Vector3};

    const TOLERANCE: f64 = 1e-9;

    fn sample_points() -> (Point3<f64>, Point3<f64>, Point3<f64>) {
        (
            Point3::new(0.3, -1.2, 0.8),
            Point3::new(1.1, 0.4, -0.2),
            Point3::new(2.5, 0.9, 0.6),
        )
    }

    #[test]
    fn normalized_frame_is_orthonormal() {
        let (a, b, c) = sample_points();
        let basis = build_frame(&a, &b, &c, true);

        let product = basis * basis.transpose();
        assert!((product - Matrix3::identity()).norm() < TOLERANCE);
    }

    #[test]
    fn normalized_frame_is_right_handed() {
        let (a, b, c) = sample_points();
        let basis = build_frame(&a, &b, &c, true);

        assert!((basis.determinant() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn first_axis_points_along_last_bond() {
        let (a, b, c) = sample_points();
        let basis = build_frame(&a, &b, &c, true);

        let expected = (c - b).normalize();
        let e1: Vector3<f64> = basis.row(0).transpose();
        assert!((e1 - expected).norm() < TOLERANCE);
    }

    #[test]
    fn unnormalized_frame_keeps_raw_lengths_but_stays_orthogonal() {
        let (a, b, c) = sample_points();
        let basis = build_frame(&a, &b, &c, false);

        let e1: Vector3<f64> = basis.row(0).transpose();
        let e2: Vector3<f64> = basis.row(1).transpose();
        let e3: Vector3<f64> = basis.row(2).transpose();
        assert!((e1.norm() - (c - b).norm()).abs() < TOLERANCE);
        assert!(e1.dot(&e2).abs() < TOLERANCE);
        assert!(e1.dot(&e3).abs() < TOLERANCE);
        assert!(e2.dot(&e3).abs() < TOLERANCE);
    }

    #[test]
    fn collinear_points_produce_nan_rows() {
        let basis = build_frame(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(2.0, 0.0, 0.0),
            true,
        );

        assert!(basis.row(2).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn batch_broadcasts_shared_points() {
        let (a, b, _) = sample_points();
        let targets = vec![Point3::new(2.5, 0.9, 0.6), Point3::new(-1.0, 2.0, 3.0)];

        let frames = build_frame_batch(a, b, &targets, true).unwrap();

        assert_eq!(frames.len(), 2);
        for (frame, c) in frames.iter().zip(&targets) {
            assert!((frame - build_frame(&a, &b, c, true)).norm() < TOLERANCE);
        }
    }

    #[test]
    fn batch_rejects_mismatched_lengths() {
        let starts: Vec<Point3<f64>> = vec![Point3::origin(); 2];
        let targets = vec![Point3::new(1.0, 1.0, 0.0); 3];

        let result = build_frame_batch(&starts, Point3::new(1.0, 0.0, 0.0), &targets, true);

        assert!(matches!(result, Err(GeometryError::ShapeMismatch { .. })));
    }

    #[test]
    fn rotation_between_planes_recovers_rigid_rotation() {
        let (a, b, c) = sample_points();
        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), 0.7)
            * Rotation3::from_axis_angle(&Vector3::x_axis(), -1.3);
        let shift = Vector3::new(4.0, -2.0, 1.5);
        let moved = [rotation * a + shift, rotation * b + shift, rotation * c + shift];

        let recovered = rotation_between_planes(&[a, b, c], &moved);

        assert!((recovered - rotation.matrix()).norm() < TOLERANCE);
    }
}
