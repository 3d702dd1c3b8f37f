use crate::core::batch::map_batch;
use crate::core::geometry::kabsch::{Superposition, points_to_matrix, rmsd, superpose_with};
use crate::core::geometry::measure::measure_angle;
use crate::engine::chain::{
    InternalCoordinate, canonical_seed, grow_chain, internal_coordinates, local_frames,
};
use crate::engine::config::GeometryConfig;
use crate::engine::error::EngineError;
use nalgebra::{Matrix3, Point3};
use tracing::{info, instrument, warn};

/// Outcome of rebuilding a chain from its own internal coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    /// The rebuilt chain, in the canonical orientation of its first three points.
    pub points: Vec<Point3<f64>>,
    /// Internal coordinates measured on the reference, one per point after the third.
    pub internals: Vec<InternalCoordinate>,
    /// Superposition of the rebuilt chain onto the reference.
    pub superposition: Superposition,
    /// RMSD between the superposed chains, averaged over every coordinate.
    pub rmsd: f64,
    /// One local frame per consecutive triple of the rebuilt chain.
    pub frames: Vec<Matrix3<f64>>,
}

/// Rebuilds `reference` from its internal coordinates and scores the result.
///
/// The reference is decomposed into bond lengths, angles and dihedrals, regrown from a
/// canonical seed, and superposed back onto the reference. A faithful round trip gives
/// an RMSD at floating-point noise level.
#[instrument(skip_all, name = "reconstruction_workflow", fields(points = reference.len()))]
pub fn run(
    reference: &[Point3<f64>],
    config: &GeometryConfig,
) -> Result<Reconstruction, EngineError> {
    // === Phase 1: Decompose the reference ===
    let internals = internal_coordinates(reference)?;
    let seed = canonical_seed(
        (reference[1] - reference[0]).norm(),
        (reference[2] - reference[1]).norm(),
        measure_angle(&reference[0], &reference[1], &reference[2]),
    )?;
    info!(
        placements = internals.len(),
        "Derived internal coordinates from reference chain."
    );

    // === Phase 2: Regrow ===
    let points = grow_chain(&seed, &internals)?;

    // === Phase 3: Superpose and score ===
    let superposition = superpose_with(
        &points_to_matrix(&points),
        &points_to_matrix(reference),
        &config.svd,
    )?;
    let deviation = rmsd(&superposition.aligned, &superposition.target)?;
    if deviation.is_finite() {
        info!(rmsd = deviation, "Reconstruction complete.");
    } else {
        warn!(
            rmsd = deviation,
            "Reconstruction produced a non-finite RMSD; the reference has degenerate geometry."
        );
    }

    let frames = local_frames(&points, config.normalize_frames)?;

    Ok(Reconstruction {
        points,
        internals,
        superposition,
        rmsd: deviation,
        frames,
    })
}

/// [`run`] over many independent chains, in parallel when the `parallel` feature is on.
#[instrument(
    skip_all,
    name = "reconstruction_batch_workflow",
    fields(chains = references.len())
)]
pub fn run_batch(
    references: &[Vec<Point3<f64>>],
    config: &GeometryConfig,
) -> Result<Vec<Reconstruction>, EngineError> {
    info!("Reconstructing chains.");
    map_batch(references.len(), |i| run(&references[i], config))
        .into_iter()
        .collect()
}
