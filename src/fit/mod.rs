//! Firing-rate fitting.
//!
//! Responsibilities:
//!
//! - derive the initial profile and per-iteration corrections (`corrector`)
//! - score simulated timing and record the error trajectory (`convergence`)
//! - drive the fixed-budget fit loop (`fitter`)

pub mod convergence;
pub mod corrector;
pub mod fitter;

pub use convergence::*;
pub use corrector::*;
pub use fitter::*;
