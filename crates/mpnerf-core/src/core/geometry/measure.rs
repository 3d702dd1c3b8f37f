use crate::core::batch::{Broadcast, map_batch, resolve_batch_len};
use crate::core::error::GeometryError;
use nalgebra::Point3;

/// Bond angle at `c2` in radians, in `[0, pi]`.
///
/// Uses `atan2(|u1 × u2|, -(u1 · u2))` with `u1 = c2 - c1` and `u2 = c3 - c2`. The dot
/// product is negated because `u1` points into `c2`; the result is the angle between
/// `c1 - c2` and `c3 - c2`. A zero-length bond yields NaN.
pub fn measure_angle(c1: &Point3<f64>, c2: &Point3<f64>, c3: &Point3<f64>) -> f64 {
    let u1 = c2 - c1;
    let u2 = c3 - c2;
    if u1.norm_squared() == 0.0 || u2.norm_squared() == 0.0 {
        return f64::NAN;
    }
    u1.cross(&u2).norm().atan2(-u1.dot(&u2))
}

/// Signed dihedral `c1 - c2 - c3 - c4` in radians, in `(-pi, pi]`.
///
/// Polymer-physics convention:
/// `atan2((|u2| u1) · (u2 × u3), (u1 × u2) · (u2 × u3))`. This is the inverse of the
/// `chi` argument of [`extend_chain`](super::nerf::extend_chain).
pub fn measure_dihedral(
    c1: &Point3<f64>,
    c2: &Point3<f64>,
    c3: &Point3<f64>,
    c4: &Point3<f64>,
) -> f64 {
    let u1 = c2 - c1;
    let u2 = c3 - c2;
    let u3 = c4 - c3;

    let u2_cross_u3 = u2.cross(&u3);
    let y = (u2.norm() * u1).dot(&u2_cross_u3);
    let x = u1.cross(&u2).dot(&u2_cross_u3);
    y.atan2(x)
}

pub fn measure_angle_batch<A, B, C>(c1: A, c2: B, c3: C) -> Result<Vec<f64>, GeometryError>
where
    A: Broadcast<Point3<f64>>,
    B: Broadcast<Point3<f64>>,
    C: Broadcast<Point3<f64>>,
{
    let len = resolve_batch_len(&[c1.batch_len(), c2.batch_len(), c3.batch_len()])?;
    Ok(map_batch(len, |i| {
        measure_angle(&c1.at(i), &c2.at(i), &c3.at(i))
    }))
}

pub fn measure_dihedral_batch<A, B, C, D>(
    c1: A,
    c2: B,
    c3: C,
    c4: D,
) -> Result<Vec<f64>, GeometryError>
where
    A: Broadcast<Point3<f64>>,
    B: Broadcast<Point3<f64>>,
    C: Broadcast<Point3<f64>>,
    D: Broadcast<Point3<f64>>,
{
    let len = resolve_batch_len(&[
        c1.batch_len(),
        c2.batch_len(),
        c3.batch_len(),
        c4.batch_len(),
    ])?;
    Ok(map_batch(len, |i| {
        measure_dihedral(&c1.at(i), &c2.at(i), &c3.at(i), &c4.at(i))
    }))
}
