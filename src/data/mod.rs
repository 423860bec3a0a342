//! Data adapters around the fitting core.
//!
//! - observed timing input and sub-range truncation (`timing`)
//! - simulator event-log aggregation (`bcs`)
//! - inter-origin distances (`iod`)
//! - synthetic observed timing for validation (`synth`)

pub mod bcs;
pub mod iod;
pub mod synth;
pub mod timing;

pub use synth::{SyntheticData, SyntheticFiles};
pub use timing::{load_observed, truncate};
