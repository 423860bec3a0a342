//! Reporting: residual diagnostics and plain-text summaries.

pub mod format;

pub use format::*;
