//! # Workflows Module
//!
//! High-level procedures that combine the engine and core layers into complete tasks.
//!
//! ## Architecture
//!
//! - **Reconstruction Workflow** ([`reconstruct`]) - Decompose a reference chain into
//!   internal coordinates, regrow it with NeRF from a canonical seed, superpose the result
//!   onto the reference and report the RMSD along with the local frames of the rebuilt
//!   chain. A batch entry point processes independent chains in parallel.

pub mod reconstruct;
