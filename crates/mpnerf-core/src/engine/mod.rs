//! # Engine Module
//!
//! Whole-chain operations built on the [`core`](crate::core) kernels, together with the
//! configuration and error types shared by the higher layers.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Frame normalization and SVD convergence settings,
//!   built in code or loaded from TOML
//! - **Chains** ([`chain`]) - Seeding, point-by-point growth, parallel growth of
//!   independent chains, and extraction of internal coordinates
//! - **Error Handling** ([`error`]) - Engine-level errors wrapping kernel and
//!   configuration failures
//!
//! Growth within one chain is serial because each point depends on the three before it.
//! Independent chains share nothing and are grown in parallel.

pub mod chain;
pub mod config;
pub mod error;
