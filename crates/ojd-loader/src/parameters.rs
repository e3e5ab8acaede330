//! Algorithm custom parameters: read, normalize, validate
//!
//! The blocking and async readers only differ in how the file is read. Both
//! hand the read result to [`parse_input_parameters`], so they cannot drift.
use ojd_core::{JobDetailsError, Outcome, Paths};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

/// Marker for the schema type the custom parameters are validated against.
pub struct InputType<T>(PhantomData<fn() -> T>);

impl<T> InputType<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }

    pub fn name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

impl<T> Default for InputType<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for InputType<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for InputType<T> {}

impl<T> fmt::Debug for InputType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InputType<{}>", self.name())
    }
}

/// Read and validate `algoCustomData.json` with a blocking read.
pub fn read_input_parameters<T: DeserializeOwned>(paths: &Paths) -> Outcome<T> {
    let path = paths.algorithm_custom_parameters();
    parse_input_parameters(&path, std::fs::read_to_string(&path))
}

/// Async twin of [`read_input_parameters`].
pub async fn aread_input_parameters<T: DeserializeOwned>(paths: &Paths) -> Outcome<T> {
    let path = paths.algorithm_custom_parameters();
    let raw = tokio::fs::read_to_string(&path).await;
    parse_input_parameters(&path, raw)
}

/// `Ok(None)` when no type was requested, the file is not even looked at.
pub fn validate_input_parameters<T: DeserializeOwned>(
    paths: &Paths,
    input_type: Option<InputType<T>>,
) -> Outcome<Option<T>> {
    match input_type {
        Some(_) => read_input_parameters(paths).map(Some),
        None => Ok(None),
    }
}

pub async fn avalidate_input_parameters<T: DeserializeOwned>(
    paths: &Paths,
    input_type: Option<InputType<T>>,
) -> Outcome<Option<T>> {
    match input_type {
        Some(_) => aread_input_parameters(paths).await.map(Some),
        None => Ok(None),
    }
}

/// Turn the result of reading `path` into validated parameters.
pub fn parse_input_parameters<T: DeserializeOwned>(
    path: &Path,
    raw: std::io::Result<String>,
) -> Outcome<T> {
    let raw = match raw {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(JobDetailsError::parameters_not_found(path));
        }
        Err(e) => return Err(JobDetailsError::io(path, e)),
    };

    let raw = raw.trim();
    if raw.is_empty() {
        return Err(JobDetailsError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    let value: Value = serde_json::from_str(raw).map_err(JobDetailsError::Validation)?;
    let parameters = match T::deserialize(&value) {
        Ok(parameters) => parameters,
        Err(e) => match T::deserialize(&normalize(value)) {
            Ok(parameters) => parameters,
            Err(_) => return Err(JobDetailsError::Validation(e)),
        },
    };

    tracing::debug!(path = %path.display(), "validated algorithm custom parameters");
    Ok(parameters)
}

/// Unwrap top-level fields holding a JSON-encoded scalar (`"\"data\""`, `"true"`).
///
/// Only one level, only scalars; nested objects and arrays are left as they are.
/// A plain string such as `"2024"` is unwrapped too, so
/// [`parse_input_parameters`] only falls back to the normalized document when
/// the document as written does not validate.
pub fn normalize(value: Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(key, value)| (key, decode_scalar(value)))
                .collect(),
        ),
        other => other,
    }
}

fn decode_scalar(value: Value) -> Value {
    if let Value::String(encoded) = &value {
        match serde_json::from_str::<Value>(encoded) {
            Ok(decoded) if !(decoded.is_object() || decoded.is_array()) => return decoded,
            _ => {}
        }
    }
    value
}
