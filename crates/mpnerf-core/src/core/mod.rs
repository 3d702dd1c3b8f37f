//! # Core Module
//!
//! The stateless foundation of the library: geometry kernels, the batch broadcasting
//! abstraction they share, and the error type they report.
//!
//! ## Architecture
//!
//! - **Kernels** ([`geometry`]) - Frame construction, NeRF placement, angle and dihedral
//!   measurement, Kabsch superposition and RMSD
//! - **Batching** ([`batch`]) - Leading-dimension broadcasting of kernel arguments
//! - **Errors** ([`error`]) - Precondition failures raised by the kernels
//!
//! ## Numeric Conventions
//!
//! - Angles are radians. Bond angles passed to placement must lie in `[-pi, pi)`.
//! - Measured bond angles lie in `[0, pi]`, measured dihedrals in `(-pi, pi]`.
//! - Point sets for superposition are `D x N` matrices, one point per column.
//!
//! Kernels never retry and never hide degenerate input: collinear or zero-length
//! geometry propagates NaN to the caller.

pub mod batch;
pub mod error;
pub mod geometry;
