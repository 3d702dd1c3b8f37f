//! # Geometry Kernels
//!
//! Stateless, batched 3D kernels for chain reconstruction and comparison.
//!
//! - [`frame`] - Orthonormal frames from three points and plane-to-plane rotations
//! - [`nerf`] - Placement of the next chain point from bond length, angle and dihedral
//! - [`measure`] - Bond angles and signed dihedrals from Cartesian points
//! - [`kabsch`] - Optimal proper superposition of point sets and RMSD
//!
//! Every kernel has a single-instance form over `nalgebra` values and a `*_batch` form
//! that broadcasts its arguments with [`Broadcast`](crate::core::batch::Broadcast).
//! Degenerate geometry (collinear points, zero-length bonds) is not an error; it yields
//! NaN and is left to the caller to screen.

pub mod frame;
pub mod kabsch;
pub mod measure;
pub mod nerf;
