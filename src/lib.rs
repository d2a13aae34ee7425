//! # u-stats
//!
//! Statistical primitives for the U-Engine ecosystem.
//!
//! This crate provides small, pure statistical routines that are
//! domain-agnostic. Every function allocates its own state and returns a
//! fresh result, so all of them are safe to call from any number of threads.
//!
//! ## Modules
//!
//! - [`stats`] — Mean and variance over numeric samples
//! - [`distributions`] — Poisson distribution and probability mass tables
//! - [`special`] — Factorial, log-gamma and incomplete gamma
//! - [`random`] — Seeded RNG construction for reproducible sampling
//!
//! ## Design Philosophy
//!
//! - **No exceptions for expected invalid input**: out-of-domain input
//!   (an empty sample, a non-positive rate) yields `None`
//! - **Numerical stability first**: Poisson masses are built in log space,
//!   sums are compensated
//! - **Property-based testing**: Mathematical invariants verified via proptest

pub mod distributions;
pub mod random;
pub mod special;
pub mod stats;

pub use distributions::{poisson_distribution, Poisson, PoissonTable, EPSILON};
pub use stats::{mean, variance};
