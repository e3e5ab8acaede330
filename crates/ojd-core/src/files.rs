//! Resolved input files per DID
use crate::ddo::Ddo;
use crate::error::{JobDetailsError, Outcome};
use indexmap::IndexMap;
use serde::Serialize;
use std::ops::Index;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Loaded descriptor of every input DID, in resolution order.
pub type DdoMetadata = IndexMap<String, Ddo>;

/// Descriptor path and input files of a single DID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DidPaths {
    did: String,
    ddo: PathBuf,
    input_files: Vec<PathBuf>,
}

impl DidPaths {
    /// Fails with `NotFound` if the descriptor does not exist.
    pub fn new(
        did: impl Into<String>,
        ddo: impl Into<PathBuf>,
        input_files: impl IntoIterator<Item = PathBuf>,
    ) -> Outcome<Self> {
        let did = did.into();
        let ddo = ddo.into();

        if !ddo.exists() {
            return Err(JobDetailsError::ddo_not_found(&did, ddo));
        }

        Ok(Self {
            did,
            ddo,
            input_files: input_files.into_iter().collect(),
        })
    }

    pub fn did(&self) -> &str {
        &self.did
    }

    pub fn ddo(&self) -> &Path {
        &self.ddo
    }

    pub fn input_files(&self) -> &[PathBuf] {
        &self.input_files
    }

    pub fn len(&self) -> usize {
        self.input_files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_files.is_empty()
    }
}

/// Immutable, ordered collection of [`DidPaths`]. Cloning shares the entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Files(Arc<[DidPaths]>);

impl Files {
    pub fn iter(&self) -> std::slice::Iter<'_, DidPaths> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DidPaths> {
        self.0.get(index)
    }

    pub fn as_slice(&self) -> &[DidPaths] {
        &self.0
    }
}

impl From<Vec<DidPaths>> for Files {
    fn from(files: Vec<DidPaths>) -> Self {
        Self(files.into())
    }
}

impl FromIterator<DidPaths> for Files {
    fn from_iter<I: IntoIterator<Item = DidPaths>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Index<usize> for Files {
    type Output = DidPaths;

    fn index(&self, index: usize) -> &DidPaths {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a Files {
    type Item = &'a DidPaths;
    type IntoIter = std::slice::Iter<'a, DidPaths>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Algorithm applied to the inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Algorithm {
    pub did: String,
    pub ddo_path: PathBuf,
    /// `None` when the provider did not materialize the algorithm descriptor.
    pub ddo: Option<Ddo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_did_paths_requires_ddo() {
        let err = DidPaths::new("did", "/definitely/not/here", Vec::new()).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.did(), Some("did"));
    }

    #[test]
    fn test_did_paths_length() {
        let dir = tempfile::tempdir().unwrap();
        let ddo = dir.path().join("did");
        std::fs::write(&ddo, "{}").unwrap();

        let inputs = (0..67).map(|i| dir.path().join(i.to_string()));
        let paths = DidPaths::new("did", &ddo, inputs).unwrap();

        assert_eq!(paths.len(), 67);
        assert_eq!(paths.input_files()[66], dir.path().join("66"));
    }

    #[test]
    fn test_files_index_and_iter() {
        let dir = tempfile::tempdir().unwrap();
        let ddo = dir.path().join("a");
        std::fs::write(&ddo, "{}").unwrap();

        let files: Files = vec![
            DidPaths::new("a", &ddo, Vec::new()).unwrap(),
            DidPaths::new("a", &ddo, Vec::new()).unwrap(),
        ]
        .into();

        assert_eq!(files.len(), 2);
        assert_eq!(files[1].did(), "a");
        assert_eq!(files.iter().count(), 2);
        assert_eq!(files.clone(), files);
    }
}
