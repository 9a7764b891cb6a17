//! Infrastructure layer: I/O implementations
//!
//! This layer implements I/O boundary traits and loads host snapshots from disk.

pub mod error;
pub mod snapshot;
pub mod traits;

pub use error::{InfraError, InfraResult};
pub use snapshot::{SnapshotFormat, SnapshotLoader};
pub use traits::{FileSystem, RealFileSystem};
