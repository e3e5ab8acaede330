//! Job settings: configuration mapping → validated settings
//!
//! Accepted keys (the upper-case form is what the environment provides):
//!
//! | key                  | alias                | required |
//! |----------------------|----------------------|----------|
//! | `base_dir`           | `BASE_DIR`           | yes      |
//! | `dids`               | `DIDS`               | no       |
//! | `transformation_did` | `TRANSFORMATION_DID` | yes (*)  |
//! | `secret`             | `SECRET`             | no       |
//!
//! (*) except through [`JobSettings::from_config_without_algorithm`], which
//! builds the settings of a job with no algorithm.
//!
//! `dids` is either a JSON-encoded array (`'["a","b"]'`) or a list of strings.
//! When it is empty the DIDs are discovered from `{base_dir}/ddos`. Every DID,
//! given or discovered, must be a single file name.
use crate::error::{JobDetailsError, Outcome};
use crate::paths::Paths;
use crate::secret::Secret;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Component, Path, PathBuf};

const ENV_KEYS: [&str; 4] = ["BASE_DIR", "DIDS", "TRANSFORMATION_DID", "SECRET"];

#[derive(Debug, Clone, PartialEq)]
pub struct JobSettings {
    pub base_dir: PathBuf,
    pub dids: Vec<String>,
    pub transformation_did: Option<String>,
    pub secret: Option<Secret>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSettings {
    #[serde(alias = "BASE_DIR")]
    base_dir: PathBuf,
    #[serde(default, alias = "DIDS")]
    dids: Option<RawDids>,
    #[serde(default, alias = "TRANSFORMATION_DID")]
    transformation_did: Option<String>,
    #[serde(default, alias = "SECRET")]
    secret: Option<Secret>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDids {
    List(Vec<String>),
    Encoded(String),
}

impl JobSettings {
    /// Build settings from any serializable mapping (`json!({...})`, `HashMap`, ...).
    ///
    /// `transformation_did` is required.
    pub fn from_config(config: impl Serialize) -> Outcome<Self> {
        Self::from_value(to_value(config)?)
    }

    /// Like [`from_config`](Self::from_config), for a job without an algorithm:
    /// `transformation_did` may be missing.
    pub fn from_config_without_algorithm(config: impl Serialize) -> Outcome<Self> {
        Self::from_value_without_algorithm(to_value(config)?)
    }

    pub fn from_value(config: Value) -> Outcome<Self> {
        Self::parse(config, true)
    }

    pub fn from_value_without_algorithm(config: Value) -> Outcome<Self> {
        Self::parse(config, false)
    }

    fn parse(config: Value, require_algorithm: bool) -> Outcome<Self> {
        let raw: RawSettings =
            serde_json::from_value(config).map_err(|e| JobDetailsError::Config(e.to_string()))?;

        let transformation_did = raw.transformation_did.filter(|did| !did.is_empty());
        match &transformation_did {
            Some(did) => check_did(did)?,
            None if require_algorithm => {
                return Err(JobDetailsError::Config(
                    "missing settings field `transformation_did`".to_string(),
                ));
            }
            None => {}
        }

        let mut dids = match raw.dids {
            Some(RawDids::List(dids)) => dids,
            Some(RawDids::Encoded(encoded)) => parse_dids(&encoded)?,
            None => Vec::new(),
        };

        if dids.is_empty() {
            dids = discover_dids(&Paths::new(&raw.base_dir).ddos())?;
        }
        dids.iter().try_for_each(|did| check_did(did))?;

        Ok(Self {
            base_dir: raw.base_dir,
            dids,
            transformation_did,
            secret: raw.secret,
        })
    }

    /// Read `BASE_DIR`, `DIDS`, `TRANSFORMATION_DID` and `SECRET` from the environment.
    pub fn from_env() -> Outcome<Self> {
        let config: Map<String, Value> = ENV_KEYS
            .iter()
            .filter_map(|key| {
                std::env::var(key)
                    .ok()
                    .map(|value| (key.to_string(), Value::String(value)))
            })
            .collect();

        Self::from_value(Value::Object(config))
    }

    /// Load settings from a YAML (`.yaml`/`.yml`) or JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Outcome<Self> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| JobDetailsError::io(path, e))?;

        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml" | "yml")
        );

        let value: Value = if is_yaml {
            serde_yaml::from_str(&text).map_err(|e| {
                JobDetailsError::Config(format!("{}: {}", path.display(), e))
            })?
        } else {
            serde_json::from_str(&text).map_err(|e| {
                JobDetailsError::Config(format!("{}: {}", path.display(), e))
            })?
        };

        Self::from_value(value)
    }

    pub fn paths(&self) -> Paths {
        Paths::new(&self.base_dir)
    }
}

fn to_value(config: impl Serialize) -> Outcome<Value> {
    serde_json::to_value(config).map_err(|e| JobDetailsError::Config(e.to_string()))
}

/// A DID names a file under `ddos/` and a directory under `inputs/`.
fn check_did(did: &str) -> Outcome<()> {
    let mut components = Path::new(did).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(JobDetailsError::Config(format!(
            "invalid DID {did:?}: must be a single file name"
        ))),
    }
}

fn parse_dids(encoded: &str) -> Outcome<Vec<String>> {
    let value: Value = serde_json::from_str(encoded)
        .map_err(|e| JobDetailsError::Config(format!("dids is not valid JSON: {e}")))?;

    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(did) => Ok(did),
                other => Err(JobDetailsError::Config(format!(
                    "dids must only contain strings, got {other}"
                ))),
            })
            .collect(),
        other => Err(JobDetailsError::Config(format!(
            "dids must be a JSON array, got {other}"
        ))),
    }
}

/// Names of the regular files directly under `ddos`, sorted.
///
/// Subdirectories are skipped. A missing directory yields no DIDs.
pub fn discover_dids(ddos: &Path) -> Outcome<Vec<String>> {
    let entries = match std::fs::read_dir(ddos) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %ddos.display(), "no ddos directory, nothing to discover");
            return Ok(Vec::new());
        }
        Err(e) => return Err(JobDetailsError::io(ddos, e)),
    };

    let mut dids = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| JobDetailsError::io(ddos, e))?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) => dids.push(name),
            Err(name) => tracing::warn!(?name, "skipping DDO with a non UTF-8 name"),
        }
    }

    dids.sort();
    tracing::debug!(count = dids.len(), "discovered DIDs from {}", ddos.display());

    Ok(dids)
}
