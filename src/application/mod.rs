//! Application layer: the visual driven by host updates
//!
//! This layer orchestrates the view-model builder and the reconciler per update cycle.

pub mod error;
pub mod visual;

pub use error::{ApplicationError, ApplicationResult};
pub use visual::Visual;
