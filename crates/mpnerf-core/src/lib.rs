//! # MP-NeRF Core Library
//!
//! Batched reconstruction of 3D chain coordinates from internal coordinates (bond
//! length, bond angle, dihedral) using the natural extension of reference frame, with
//! the geometric kernels needed to measure and compare the result.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Pure, stateless kernels over `nalgebra` types:
//!   frame construction, point placement, angle and dihedral measurement, Kabsch
//!   superposition and RMSD. Each kernel has a batched form that broadcasts its
//!   arguments and evaluates elements in parallel.
//!
//! - **[`engine`]: Chain Operations.** Configuration and whole-chain routines built on
//!   the kernels: growing a chain point by point, growing many independent chains in
//!   parallel, and extracting internal coordinates from Cartesian chains.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures such as rebuilding a
//!   reference chain from its own internal coordinates and scoring the reconstruction.
//!
//! ## Features
//!
//! - `parallel` (default) - Evaluate batches with `rayon`.

pub mod core;
pub mod engine;
pub mod workflows;
