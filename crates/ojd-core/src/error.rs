//! Unified Error Model
use std::path::PathBuf;
use thiserror::Error;

/// Every expected failure of settings, resolution and parameter validation.
///
/// Messages follow the `CATEGORY/detail` layout so they can be grepped in logs.
#[derive(Error, Debug)]
pub enum JobDetailsError {
    #[error("CONFIG/{0}")]
    Config(String),

    #[error("NOT_FOUND/{what} missing: {}", .path.display())]
    NotFound {
        what: String,
        did: Option<String>,
        path: PathBuf,
    },

    #[error("EMPTY/algorithm custom input parameters is empty: {}", .path.display())]
    EmptyFile { path: PathBuf },

    #[error("VALIDATION/algorithm custom input parameters do not match the schema: {0}")]
    Validation(#[source] serde_json::Error),

    #[error("NO_INPUT_TYPE/job details have no input parameters type")]
    NoInputType,

    #[error("DDO/malformed descriptor for {did}: {source}")]
    Descriptor {
        did: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO/{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("EXEC/{0}")]
    Executor(String),
}

impl JobDetailsError {
    /// Missing descriptor for `did`.
    pub fn ddo_not_found(did: &str, path: impl Into<PathBuf>) -> Self {
        Self::NotFound {
            what: format!("DDO file for {did}"),
            did: Some(did.to_string()),
            path: path.into(),
        }
    }

    pub fn parameters_not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound {
            what: "algorithm custom input file".to_string(),
            did: None,
            path: path.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The DID named by a `NotFound` or `Descriptor` error, if any.
    pub fn did(&self) -> Option<&str> {
        match self {
            Self::NotFound { did, .. } => did.as_deref(),
            Self::Descriptor { did, .. } => Some(did),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Two-variant result used across the crate instead of panics.
pub type Outcome<T> = Result<T, JobDetailsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_not_found_names_the_did() {
        let err = JobDetailsError::ddo_not_found("did:op:1", "/data/ddos/did:op:1");
        assert_eq!(err.did(), Some("did:op:1"));
        assert!(err.to_string().starts_with("NOT_FOUND/"));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_validation_keeps_cause() {
        let cause = serde_json::from_str::<bool>("\"nope\"").unwrap_err();
        let err = JobDetailsError::Validation(cause);
        assert!(err.source().is_some());
        assert!(err.did().is_none());
    }
}
