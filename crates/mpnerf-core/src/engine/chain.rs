use super::error::EngineError;
use crate::core::batch::map_batch;
use crate::core::error::GeometryError;
use crate::core::geometry::frame::build_frame_batch;
use crate::core::geometry::measure::{measure_angle_batch, measure_dihedral_batch};
use crate::core::geometry::nerf::{extend_chain, is_valid_bond_angle};
use nalgebra::{Matrix3, Point3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Placement of one chain point relative to the three points before it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InternalCoordinate {
    /// Bond length to the previous point.
    pub length: f64,
    /// Bond angle at the previous point, radians.
    pub theta: f64,
    /// Dihedral over the last four points, radians.
    pub chi: f64,
}

impl InternalCoordinate {
    pub fn new(length: f64, theta: f64, chi: f64) -> Self {
        Self { length, theta, chi }
    }
}

fn require_points(points: &[Point3<f64>], required: usize) -> Result<(), EngineError> {
    if points.len() < required {
        return Err(EngineError::InsufficientPoints {
            required,
            found: points.len(),
        });
    }
    Ok(())
}

/// Three points fixing the orientation of a chain from its first two bond lengths and
/// first bond angle: `a` at the origin, `b` on the +x axis, `c` in the xy-plane with
/// positive y.
pub fn canonical_seed(
    first_length: f64,
    second_length: f64,
    theta: f64,
) -> Result<[Point3<f64>; 3], EngineError> {
    if !is_valid_bond_angle(theta) {
        return Err(GeometryError::InvalidAngleDomain {
            values: vec![theta],
        }
        .into());
    }
    let a = Point3::origin();
    let b = Point3::new(first_length, 0.0, 0.0);
    let c = Point3::new(
        first_length - second_length * theta.cos(),
        second_length * theta.sin(),
        0.0,
    );
    Ok([a, b, c])
}

/// Grows a chain from `seed` by placing one point per internal coordinate.
///
/// The returned chain starts with the three seed points. All bond angles are validated
/// before the first placement.
pub fn grow_chain(
    seed: &[Point3<f64>; 3],
    internals: &[InternalCoordinate],
) -> Result<Vec<Point3<f64>>, EngineError> {
    let invalid: Vec<f64> = internals
        .iter()
        .map(|ic| ic.theta)
        .filter(|&theta| !is_valid_bond_angle(theta))
        .collect();
    if !invalid.is_empty() {
        return Err(GeometryError::InvalidAngleDomain { values: invalid }.into());
    }

    let mut points = Vec::with_capacity(seed.len() + internals.len());
    points.extend_from_slice(seed);
    for ic in internals {
        let n = points.len();
        let next = extend_chain(
            &points[n - 3],
            &points[n - 2],
            &points[n - 1],
            ic.length,
            ic.theta,
            ic.chi,
        )?;
        points.push(next);
    }
    Ok(points)
}

/// Grows many independent chains, in parallel when the `parallel` feature is on.
#[instrument(skip_all, name = "grow_chains", fields(chains = seeds.len()))]
pub fn grow_chains(
    seeds: &[[Point3<f64>; 3]],
    internals: &[Vec<InternalCoordinate>],
) -> Result<Vec<Vec<Point3<f64>>>, EngineError> {
    if seeds.len() != internals.len() {
        return Err(GeometryError::batch_mismatch(seeds.len(), internals.len()).into());
    }
    info!("Growing independent chains.");
    map_batch(seeds.len(), |i| grow_chain(&seeds[i], &internals[i]))
        .into_iter()
        .collect()
}

/// Internal coordinates of every point after the third, the inverse of [`grow_chain`].
///
/// Point `i` yields `|p[i] - p[i-1]|`, the angle at `p[i-1]` and the dihedral
/// `p[i-3] .. p[i]`. Measured angles are in `[0, pi]`; a perfectly straight segment
/// measures `pi`, which [`grow_chain`] rejects.
pub fn internal_coordinates(
    points: &[Point3<f64>],
) -> Result<Vec<InternalCoordinate>, EngineError> {
    require_points(points, 3)?;
    let n = points.len();
    if n == 3 {
        return Ok(Vec::new());
    }

    let thetas = measure_angle_batch(&points[1..n - 2], &points[2..n - 1], &points[3..])?;
    let chis = measure_dihedral_batch(
        &points[..n - 3],
        &points[1..n - 2],
        &points[2..n - 1],
        &points[3..],
    )?;
    debug!(count = n - 3, "Measured internal coordinates.");

    Ok(points
        .windows(2)
        .skip(2)
        .zip(thetas.into_iter().zip(chis))
        .map(|(bond, (theta, chi))| InternalCoordinate {
            length: (bond[1] - bond[0]).norm(),
            theta,
            chi,
        })
        .collect())
}

/// One [`build_frame`](crate::core::geometry::frame::build_frame) per consecutive
/// triple of the chain.
pub fn local_frames(
    points: &[Point3<f64>],
    normalize: bool,
) -> Result<Vec<Matrix3<f64>>, EngineError> {
    require_points(points, 3)?;
    let n = points.len();
    Ok(build_frame_batch(
        &points[..n - 2],
        &points[1..n - 1],
        &points[2..],
        normalize,
    )?)
}
