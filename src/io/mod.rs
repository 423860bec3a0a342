//! Input/output helpers.
//!
//! - data-root directory layout and file naming (`layout`)
//! - one-value-per-line profiles and integer row files (`profile`)
//! - append-only error trajectory (`trajectory`)
//! - run manifest JSON read/write (`manifest`)

pub mod layout;
pub mod manifest;
pub mod profile;
pub mod trajectory;

pub use layout::*;
pub use manifest::*;
pub use profile::*;
pub use trajectory::*;
