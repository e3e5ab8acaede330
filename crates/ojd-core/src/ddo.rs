//! DDO: descriptor documents of the job assets
//!
//! The descriptor schema belongs to the provider. This module only reads what
//! the job needs (the services and the declared file list of the metadata
//! service) and keeps every other top-level field untouched.
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// `type` of the service that declares the input files.
pub const METADATA_SERVICE: &str = "metadata";

#[derive(Debug, Clone, PartialEq)]
pub struct Ddo {
    services: Vec<Service>,
    raw: Map<String, Value>,
}

impl Ddo {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn from_map(raw: Map<String, Value>) -> Result<Self, serde_json::Error> {
        // Older providers write `service`, newer ones `services`
        let services = match raw.get("services").or_else(|| raw.get("service")) {
            Some(value) => Vec::<Service>::deserialize(value)?,
            None => Vec::new(),
        };

        Ok(Self { services, raw })
    }

    pub fn id(&self) -> Option<&str> {
        self.raw.get("id").and_then(Value::as_str)
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// First service tagged `metadata`.
    pub fn metadata_service(&self) -> Option<&Service> {
        self.services
            .iter()
            .find(|s| s.service_type == METADATA_SERVICE)
    }

    /// Number of files declared by the metadata service, `None` without one.
    pub fn declared_files(&self) -> Option<usize> {
        self.metadata_service().map(Service::declared_files)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    /// Top-level keys, in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.raw.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.raw
    }
}

impl Serialize for Ddo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Ddo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Map::deserialize(deserializer)?;
        Ddo::from_map(raw).map_err(D::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<ServiceAttributes>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Service {
    /// Length of `attributes.main.files`, falling back to a plain `files` array.
    pub fn declared_files(&self) -> usize {
        if let Some(main) = self.attributes.as_ref().and_then(|a| a.main.as_ref()) {
            return main.files.len();
        }

        self.extra
            .get("files")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<MainAttributes>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainAttributes {
    #[serde(default)]
    pub files: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ddo(value: Value) -> Ddo {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_declared_files_from_metadata_service() {
        let ddo = ddo(json!({
            "id": "did:op:abc",
            "service": [
                { "type": "access", "attributes": { "main": { "files": [{}] } } },
                { "type": "metadata", "attributes": { "main": { "files": [{}, {}, {}] } } }
            ]
        }));

        assert_eq!(ddo.id(), Some("did:op:abc"));
        assert_eq!(ddo.services().len(), 2);
        assert_eq!(ddo.declared_files(), Some(3));
    }

    #[test]
    fn test_plain_files_array() {
        let ddo = ddo(json!({
            "services": [{ "type": "metadata", "files": [{ "url": "a" }, { "url": "b" }] }]
        }));
        assert_eq!(ddo.declared_files(), Some(2));
    }

    #[test]
    fn test_no_metadata_service() {
        let ddo = ddo(json!({ "services": [{ "type": "compute", "files": "0xencrypted" }] }));
        assert_eq!(ddo.declared_files(), None);
    }

    #[test]
    fn test_keeps_document_keys() {
        let ddo = ddo(json!({ "@context": ["x"], "id": "1", "service": [], "nft": {} }));
        let keys: Vec<&str> = ddo.keys().collect();
        assert_eq!(keys, vec!["@context", "id", "service", "nft"]);
        assert_eq!(serde_json::to_value(&ddo).unwrap()["nft"], json!({}));
    }

    #[test]
    fn test_rejects_service_without_type() {
        let result = serde_json::from_value::<Ddo>(json!({ "services": [{ "id": "x" }] }));
        assert!(result.is_err());
    }
}
