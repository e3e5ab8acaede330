//! OJD Loader: resolve a compute job and validate its custom parameters
//!
//! ```text
//! config → JobSettings → Resolver → JobDetails<T> ─read()─→ ParametrizedJobDetails<T>
//!                                                └─aread()─┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ojd_loader::{load_parametrized_job_details, InputType};
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Deserialize)]
//! struct CustomParameters {
//!     example: String,
//!     #[serde(rename = "isTrue")]
//!     is_true: bool,
//! }
//!
//! let details = load_parametrized_job_details::<CustomParameters>(json!({
//!     "base_dir": "/data",
//!     "dids": "[\"17feb697...\"]",
//!     "transformation_did": "1234567890",
//! }))?;
//!
//! for (did, path) in details.inputs() {
//!     println!("{did}: {}", path.display());
//! }
//! println!("example = {}", details.input_parameters().example);
//! ```

pub mod executor;
pub mod job_details;
pub mod parameters;
pub mod resolver;

pub use executor::{run_in_executor, Work};
pub use job_details::{EmptyJobDetails, JobDetails, JobDetailsBase, ParametrizedJobDetails};
pub use ojd_core::{JobDetailsError, JobSettings, Outcome, Paths};
pub use parameters::{
    aread_input_parameters, avalidate_input_parameters, read_input_parameters,
    validate_input_parameters, InputType,
};
pub use resolver::{Resolved, Resolver};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Settings plus the requested parameters schema.
#[derive(Debug, Clone)]
pub struct JobDetailsLoader<T> {
    settings: JobSettings,
    input_type: Option<InputType<T>>,
}

impl<T> JobDetailsLoader<T> {
    pub fn new(settings: JobSettings, input_type: Option<InputType<T>>) -> Self {
        Self {
            settings,
            input_type,
        }
    }

    pub fn settings(&self) -> &JobSettings {
        &self.settings
    }

    /// Resolve every DID; fails on the first one that cannot be resolved.
    pub fn load(&self) -> Outcome<JobDetails<T>> {
        let resolved = Resolver::new(&self.settings).resolve()?;

        tracing::info!(
            dids = resolved.files.len(),
            algorithm = resolved.algorithm.as_ref().map(|a| a.did.as_str()),
            input_type = self.input_type.map(|t| t.name()),
            "loaded job details"
        );

        let base = JobDetailsBase::new(
            resolved,
            self.settings.paths(),
            self.settings.secret.clone(),
        );
        Ok(JobDetails::new(base, self.input_type))
    }
}

/// Validated settings from a config mapping. `transformation_did` is required.
pub fn create_settings(config: impl Serialize) -> Outcome<JobSettings> {
    JobSettings::from_config(config)
}

pub fn load_job_details<T>(
    input_type: Option<InputType<T>>,
    config: impl Serialize,
) -> Outcome<JobDetails<T>> {
    let settings = create_settings(config)?;
    JobDetailsLoader::new(settings, input_type).load()
}

/// Load the job and validate its custom parameters against `T`.
pub fn load_parametrized_job_details<T: DeserializeOwned>(
    config: impl Serialize,
) -> Outcome<ParametrizedJobDetails<T>> {
    load_job_details(Some(InputType::<T>::new()), config)?.read()
}

/// Load a job with no parameters schema. `transformation_did` may be missing.
pub fn load_empty_job_details(config: impl Serialize) -> Outcome<EmptyJobDetails> {
    let settings = JobSettings::from_config_without_algorithm(config)?;
    JobDetailsLoader::<()>::new(settings, None)
        .load()
        .map(JobDetails::into_empty)
}

/// Async [`load_job_details`]. Resolution runs on the blocking pool.
pub async fn aload_job_details<T: Send + 'static>(
    input_type: Option<InputType<T>>,
    config: impl Serialize,
) -> Outcome<JobDetails<T>> {
    let config = to_config_value(config)?;
    run_in_executor(Work::blocking(move || load_job_details(input_type, config))).await?
}

pub async fn aload_parametrized_job_details<T: DeserializeOwned + Send + 'static>(
    config: impl Serialize,
) -> Outcome<ParametrizedJobDetails<T>> {
    aload_job_details(Some(InputType::<T>::new()), config)
        .await?
        .aread()
        .await
}

pub async fn aload_empty_job_details(config: impl Serialize) -> Outcome<EmptyJobDetails> {
    let config = to_config_value(config)?;
    run_in_executor(Work::blocking(move || load_empty_job_details(config))).await?
}

fn to_config_value(config: impl Serialize) -> Outcome<Value> {
    serde_json::to_value(config).map_err(|e| JobDetailsError::Config(e.to_string()))
}
