//! Job details: read-only view over a resolved job
use crate::parameters::{aread_input_parameters, read_input_parameters, InputType};
use crate::resolver::Resolved;
use ojd_core::{Algorithm, DdoMetadata, Files, JobDetailsError, Outcome, Paths, Secret};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::ops::Deref;
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// Fields shared by every flavour of job details. Never mutated once built.
#[derive(Debug, Serialize)]
pub struct JobDetailsBase {
    files: Files,
    metadata: DdoMetadata,
    paths: Paths,
    algorithm: Option<Algorithm>,
    secret: Option<Secret>,
}

impl JobDetailsBase {
    pub fn new(resolved: Resolved, paths: Paths, secret: Option<Secret>) -> Self {
        Self {
            files: resolved.files,
            metadata: resolved.metadata,
            paths,
            algorithm: resolved.algorithm,
            secret,
        }
    }

    pub fn files(&self) -> &Files {
        &self.files
    }

    /// DDO of each input DID.
    pub fn metadata(&self) -> &DdoMetadata {
        &self.metadata
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    pub fn algorithm(&self) -> Option<&Algorithm> {
        self.algorithm.as_ref()
    }

    pub fn secret(&self) -> Option<&Secret> {
        self.secret.as_ref()
    }

    /// `(did, path)` for every input file, DID order first, then file index.
    ///
    /// A DID may yield several files. Each call starts over.
    pub fn inputs(&self) -> impl Iterator<Item = (&str, &Path)> + '_ {
        self.files.iter().flat_map(|entry| {
            entry
                .input_files()
                .iter()
                .map(move |file| (entry.did(), file.as_path()))
        })
    }
}

/// Job details as loaded, with an optional parameters schema `T`.
pub struct JobDetails<T> {
    base: Arc<JobDetailsBase>,
    input_type: Option<InputType<T>>,
    parameters: OnceLock<T>,
}

impl<T> JobDetails<T> {
    pub fn new(base: JobDetailsBase, input_type: Option<InputType<T>>) -> Self {
        Self {
            base: Arc::new(base),
            input_type,
            parameters: OnceLock::new(),
        }
    }

    pub fn input_type(&self) -> Option<InputType<T>> {
        self.input_type
    }

    pub fn into_empty(self) -> EmptyJobDetails {
        EmptyJobDetails { base: self.base }
    }

    fn require_input_type(&self) -> Outcome<()> {
        match self.input_type {
            Some(_) => Ok(()),
            None => Err(JobDetailsError::NoInputType),
        }
    }
}

impl<T: DeserializeOwned> JobDetails<T> {
    /// Validate the custom parameters and return a view carrying them.
    ///
    /// Fails with `NoInputType` when the job was loaded without a schema.
    /// The file is read again on every call.
    pub fn read(&self) -> Outcome<ParametrizedJobDetails<T>> {
        self.require_input_type()?;
        let input_parameters = read_input_parameters(self.paths())?;
        Ok(self.parametrized(input_parameters))
    }

    pub async fn aread(&self) -> Outcome<ParametrizedJobDetails<T>> {
        self.require_input_type()?;
        let input_parameters = aread_input_parameters(self.paths()).await?;
        Ok(self.parametrized(input_parameters))
    }

    /// Memoized parameters. Errors are not cached, a later call retries.
    pub fn input_parameters(&self) -> Outcome<&T> {
        if let Some(parameters) = self.parameters.get() {
            return Ok(parameters);
        }

        self.require_input_type()?;
        let parameters = read_input_parameters(self.paths())?;
        Ok(self.parameters.get_or_init(|| parameters))
    }

    pub async fn ainput_parameters(&self) -> Outcome<&T> {
        if let Some(parameters) = self.parameters.get() {
            return Ok(parameters);
        }

        self.require_input_type()?;
        let parameters = aread_input_parameters(self.paths()).await?;
        Ok(self.parameters.get_or_init(|| parameters))
    }

    fn parametrized(&self, input_parameters: T) -> ParametrizedJobDetails<T> {
        ParametrizedJobDetails {
            base: Arc::clone(&self.base),
            input_parameters,
        }
    }
}

impl<T> Deref for JobDetails<T> {
    type Target = JobDetailsBase;

    fn deref(&self) -> &JobDetailsBase {
        &self.base
    }
}

impl<T> Clone for JobDetails<T> {
    fn clone(&self) -> Self {
        Self {
            base: Arc::clone(&self.base),
            input_type: self.input_type,
            parameters: OnceLock::new(),
        }
    }
}

impl<T> fmt::Debug for JobDetails<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobDetails")
            .field("base", &self.base)
            .field("input_type", &self.input_type)
            .field("parameters_cached", &self.parameters.get().is_some())
            .finish()
    }
}

/// Job details with validated custom parameters.
#[derive(Debug, Clone)]
pub struct ParametrizedJobDetails<T> {
    base: Arc<JobDetailsBase>,
    input_parameters: T,
}

impl<T> ParametrizedJobDetails<T> {
    pub fn input_parameters(&self) -> &T {
        &self.input_parameters
    }

    pub fn into_input_parameters(self) -> T {
        self.input_parameters
    }
}

impl<T> Deref for ParametrizedJobDetails<T> {
    type Target = JobDetailsBase;

    fn deref(&self) -> &JobDetailsBase {
        &self.base
    }
}

/// Job details loaded without a parameters schema.
#[derive(Debug, Clone)]
pub struct EmptyJobDetails {
    base: Arc<JobDetailsBase>,
}

impl Deref for EmptyJobDetails {
    type Target = JobDetailsBase;

    fn deref(&self) -> &JobDetailsBase {
        &self.base
    }
}
