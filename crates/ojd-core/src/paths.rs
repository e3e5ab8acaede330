//! Paths: directory layout of a compute job
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the algorithm custom parameters document inside `inputs/`.
pub const ALGORITHM_CUSTOM_PARAMETERS: &str = "algoCustomData.json";

/// Default base directory when none is configured.
pub const DEFAULT_BASE_DIR: &str = "/data";

/// Layout derived from the job base directory.
///
/// ```text
/// {base}/ddos/{did}
/// {base}/inputs/{did}/{index}
/// {base}/inputs/algoCustomData.json
/// {base}/outputs
/// {base}/logs
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paths {
    base_dir: PathBuf,
}

impl Paths {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Alias of [`Paths::base_dir`].
    pub fn data(&self) -> &Path {
        &self.base_dir
    }

    pub fn inputs(&self) -> PathBuf {
        self.base_dir.join("inputs")
    }

    pub fn ddos(&self) -> PathBuf {
        self.base_dir.join("ddos")
    }

    pub fn outputs(&self) -> PathBuf {
        self.base_dir.join("outputs")
    }

    pub fn logs(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    pub fn algorithm_custom_parameters(&self) -> PathBuf {
        self.inputs().join(ALGORITHM_CUSTOM_PARAMETERS)
    }

    /// Descriptor document of `did`.
    pub fn ddo(&self, did: &str) -> PathBuf {
        self.ddos().join(did)
    }

    /// Directory holding the input files of `did`.
    pub fn did_inputs(&self, did: &str) -> PathBuf {
        self.inputs().join(did)
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_DIR)
    }
}
