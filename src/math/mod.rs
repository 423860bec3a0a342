//! Numerical kernels: the shifted accumulator and the replication-time forward model.

pub mod forward;
pub mod window;

pub use forward::*;
pub use window::*;
