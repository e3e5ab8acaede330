//! Resolver: DIDs → descriptors and input file paths
use ojd_core::{
    Algorithm, Ddo, DdoMetadata, DidPaths, Files, JobDetailsError, JobSettings, Outcome, Paths,
};
use std::path::Path;

/// Output of a successful resolution.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub files: Files,
    pub metadata: DdoMetadata,
    pub algorithm: Option<Algorithm>,
}

pub struct Resolver<'a> {
    settings: &'a JobSettings,
    paths: Paths,
}

impl<'a> Resolver<'a> {
    pub fn new(settings: &'a JobSettings) -> Self {
        Self {
            settings,
            paths: settings.paths(),
        }
    }

    /// Resolve every DID in order, stopping at the first failure.
    pub fn resolve(&self) -> Outcome<Resolved> {
        let mut files = Vec::with_capacity(self.settings.dids.len());
        let mut metadata = DdoMetadata::with_capacity(self.settings.dids.len());

        for did in &self.settings.dids {
            let (entry, ddo) = self.resolve_did(did)?;
            files.push(entry);
            metadata.insert(did.clone(), ddo);
        }

        Ok(Resolved {
            files: files.into(),
            metadata,
            algorithm: self.resolve_algorithm()?,
        })
    }

    /// Descriptor and input paths of one DID.
    ///
    /// The input paths are derived from the declared file count; the files
    /// themselves are not required to exist yet.
    pub fn resolve_did(&self, did: &str) -> Outcome<(DidPaths, Ddo)> {
        let ddo_path = self.paths.ddo(did);
        let ddo = read_ddo(did, &ddo_path)?;

        let count = match ddo.declared_files() {
            Some(count) => count,
            None => {
                tracing::warn!(did, "DDO has no metadata service, no input files");
                0
            }
        };

        let inputs = self.paths.did_inputs(did);
        let entry = DidPaths::new(
            did,
            ddo_path,
            (0..count).map(|idx| inputs.join(idx.to_string())),
        )?;

        tracing::debug!(did, input_files = count, "resolved DID");
        Ok((entry, ddo))
    }

    fn resolve_algorithm(&self) -> Outcome<Option<Algorithm>> {
        let Some(did) = self.settings.transformation_did.as_deref() else {
            return Ok(None);
        };

        let ddo_path = self.paths.ddo(did);
        let ddo = match read_ddo(did, &ddo_path) {
            Ok(ddo) => Some(ddo),
            Err(e) if e.is_not_found() => {
                tracing::warn!(did, "algorithm DDO not materialized");
                None
            }
            Err(e) => return Err(e),
        };

        Ok(Some(Algorithm {
            did: did.to_string(),
            ddo_path,
            ddo,
        }))
    }
}

fn read_ddo(did: &str, path: &Path) -> Outcome<Ddo> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(JobDetailsError::ddo_not_found(did, path));
        }
        Err(e) => return Err(JobDetailsError::io(path, e)),
    };

    Ddo::from_slice(&bytes).map_err(|source| JobDetailsError::Descriptor {
        did: did.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn write_ddo(base: &Path, did: &str, files: usize) {
        let ddo = json!({
            "id": did,
            "service": [{
                "type": "metadata",
                "attributes": { "main": { "files": vec![json!({}); files] } }
            }]
        });
        fs::create_dir_all(base.join("ddos")).unwrap();
        fs::write(base.join("ddos").join(did), ddo.to_string()).unwrap();
    }

    fn settings(base: &Path, dids: &[&str]) -> JobSettings {
        JobSettings {
            base_dir: base.to_path_buf(),
            dids: dids.iter().map(|d| d.to_string()).collect(),
            transformation_did: None,
            secret: None,
        }
    }

    #[test]
    fn test_one_entry_per_did_in_order() {
        let dir = tempfile::tempdir().unwrap();
        write_ddo(dir.path(), "b", 2);
        write_ddo(dir.path(), "a", 3);

        let settings = settings(dir.path(), &["b", "a", "b"]);
        let resolved = Resolver::new(&settings).resolve().unwrap();

        let dids: Vec<&str> = resolved.files.iter().map(DidPaths::did).collect();
        assert_eq!(dids, vec!["b", "a", "b"]);
        assert_eq!(resolved.files[0].len(), 2);
        assert_eq!(resolved.files[1].len(), 3);
        assert_eq!(
            resolved.files[1].input_files()[2],
            dir.path().join("inputs").join("a").join("2")
        );
        assert_eq!(resolved.metadata.len(), 2);
    }

    #[test]
    fn test_first_missing_did_aborts() {
        let dir = tempfile::tempdir().unwrap();
        write_ddo(dir.path(), "ok", 1);
        fs::write(dir.path().join("ddos").join("broken"), "{ not json").unwrap();

        let settings = settings(dir.path(), &["ok", "missing", "broken"]);
        let err = Resolver::new(&settings).resolve().unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.did(), Some("missing"));
    }

    #[test]
    fn test_malformed_ddo() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("ddos")).unwrap();
        fs::write(dir.path().join("ddos").join("broken"), "{ not json").unwrap();

        let settings = settings(dir.path(), &["broken"]);
        let err = Resolver::new(&settings).resolve().unwrap_err();

        assert!(matches!(err, JobDetailsError::Descriptor { ref did, .. } if did == "broken"));
    }

    #[test]
    fn test_algorithm_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        write_ddo(dir.path(), "data", 1);
        write_ddo(dir.path(), "algo", 0);

        let mut settings = settings(dir.path(), &["data"]);
        assert!(Resolver::new(&settings).resolve().unwrap().algorithm.is_none());

        settings.transformation_did = Some("algo".to_string());
        let algorithm = Resolver::new(&settings).resolve().unwrap().algorithm.unwrap();
        assert_eq!(algorithm.did, "algo");
        assert!(algorithm.ddo.is_some());

        settings.transformation_did = Some("not-materialized".to_string());
        let algorithm = Resolver::new(&settings).resolve().unwrap().algorithm.unwrap();
        assert!(algorithm.ddo.is_none());
    }
}
