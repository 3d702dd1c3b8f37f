use crate::core::batch::{Broadcast, map_batch, resolve_batch_len};
use crate::core::error::GeometryError;
use nalgebra::{Matrix3, Point3, Vector3};
use std::f64::consts::PI;
use tracing::trace;

/// Whether `theta` lies in the half-open bond-angle domain `[-pi, pi)`.
pub fn is_valid_bond_angle(theta: f64) -> bool {
    (-PI..PI).contains(&theta)
}

/// Local frame used to place a new point after `c`, as the columns `[cb, n × cb, n]`
/// with `cb = c - b` and `n = (b - a) × cb`, each column normalized on its own.
///
/// This spans the same axes as [`build_frame`](super::frame::build_frame) but with the
/// second and third axes negated: `extension_frame = build_frame^T * diag(1, -1, -1)`.
/// The sign of these axes fixes the dihedral convention of [`extend_chain`], so the two
/// routines are not interchangeable.
pub(crate) fn extension_frame(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
) -> Matrix3<f64> {
    let ba = b - a;
    let cb = c - b;
    let normal = ba.cross(&cb);

    let mut rotation = Matrix3::from_columns(&[cb, normal.cross(&cb), normal]);
    for mut column in rotation.column_iter_mut() {
        let norm = column.norm();
        column /= norm;
    }
    rotation
}

fn place(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    length: f64,
    theta: f64,
    chi: f64,
) -> Point3<f64> {
    let rotation = extension_frame(a, b, c);
    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_chi, cos_chi) = chi.sin_cos();
    let direction = Vector3::new(-cos_theta, sin_theta * cos_chi, sin_theta * sin_chi);

    c + length * (rotation * direction)
}

/// Places the point following `c` in a chain `a - b - c - d` (natural extension of
/// reference frame).
///
/// # Arguments
///
/// * `length` - Distance `|d - c|`. Not validated.
/// * `theta` - Bond angle `b - c - d` in radians, within `[-pi, pi)`.
/// * `chi` - Dihedral `a - b - c - d` in radians. Unconstrained.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidAngleDomain`] if `theta` is outside `[-pi, pi)` or NaN.
///
/// Collinear `a, b, c` leave the dihedral undefined and the result is NaN.
pub fn extend_chain(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    length: f64,
    theta: f64,
    chi: f64,
) -> Result<Point3<f64>, GeometryError> {
    if !is_valid_bond_angle(theta) {
        return Err(GeometryError::InvalidAngleDomain {
            values: vec![theta],
        });
    }
    Ok(place(a, b, c, length, theta, chi))
}

/// Batched [`extend_chain`]. Each element is placed independently.
///
/// Every bond angle is checked before any point is computed and the error reports all
/// offending values in batch order.
pub fn extend_chain_batch<A, B, C, L, T, X>(
    a: A,
    b: B,
    c: C,
    length: L,
    theta: T,
    chi: X,
) -> Result<Vec<Point3<f64>>, GeometryError>
where
    A: Broadcast<Point3<f64>>,
    B: Broadcast<Point3<f64>>,
    C: Broadcast<Point3<f64>>,
    L: Broadcast<f64>,
    T: Broadcast<f64>,
    X: Broadcast<f64>,
{
    let len = resolve_batch_len(&[
        a.batch_len(),
        b.batch_len(),
        c.batch_len(),
        length.batch_len(),
        theta.batch_len(),
        chi.batch_len(),
    ])?;

    let invalid: Vec<f64> = (0..theta.batch_len().unwrap_or(1))
        .map(|i| theta.at(i))
        .filter(|&value| !is_valid_bond_angle(value))
        .collect();
    if !invalid.is_empty() {
        return Err(GeometryError::InvalidAngleDomain { values: invalid });
    }

    trace!(batch = len, "Extending chain positions.");
    Ok(map_batch(len, |i| {
        place(
            &a.at(i),
            &b.at(i),
            &c.at(i),
            length.at(i),
            theta.at(i),
            chi.at(i),
        )
    }))
}
