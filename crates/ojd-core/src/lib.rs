//! OJD Core: settings, paths, descriptors and the error model
//!
//! Leaf types shared by the job-details loader. Nothing in here reads
//! input files or custom parameters; the only filesystem access is the
//! DID auto-discovery of [`settings::discover_dids`].

pub mod ddo;
pub mod error;
pub mod files;
pub mod paths;
pub mod secret;
pub mod settings;

pub use ddo::{Ddo, Service, METADATA_SERVICE};
pub use error::{JobDetailsError, Outcome};
pub use files::{Algorithm, DdoMetadata, DidPaths, Files};
pub use paths::Paths;
pub use secret::Secret;
pub use settings::{discover_dids, JobSettings};

/// Crate version
pub const OJD_VERSION: &str = env!("CARGO_PKG_VERSION");
