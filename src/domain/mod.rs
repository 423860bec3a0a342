//! Domain types used throughout the pipeline.
//!
//! - genomic intervals and the fixed chromosome length table (`genome`)
//! - model parameters, run configuration, and the saved-run manifest (`types`)

pub mod genome;
pub mod types;

pub use genome::*;
pub use types::*;
