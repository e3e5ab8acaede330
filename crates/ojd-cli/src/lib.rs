//! OJD inspect: load the job of the current environment and summarize it
use ojd_loader::{
    run_in_executor, InputType, JobDetailsLoader, JobSettings, Outcome, Work,
};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
pub struct Summary {
    pub base_dir: PathBuf,
    pub algorithm: Option<String>,
    pub inputs: Vec<InputSummary>,
    /// Custom parameters as plain JSON, `None` when the job has none.
    pub parameters: Option<Value>,
    pub has_secret: bool,
}

#[derive(Debug, Serialize)]
pub struct InputSummary {
    pub did: String,
    pub path: PathBuf,
    pub exists: bool,
}

pub async fn inspect(settings: JobSettings) -> Outcome<Summary> {
    let loader = JobDetailsLoader::new(settings, Some(InputType::<Value>::new()));
    let details = run_in_executor(Work::blocking(move || loader.load())).await??;

    let parameters = match details.ainput_parameters().await {
        Ok(parameters) => Some(parameters.clone()),
        Err(e) if e.is_not_found() => {
            tracing::info!("job has no algorithm custom parameters");
            None
        }
        Err(e) => return Err(e),
    };

    let inputs = details
        .inputs()
        .map(|(did, path)| InputSummary {
            did: did.to_string(),
            path: path.to_path_buf(),
            exists: path.is_file(),
        })
        .collect();

    Ok(Summary {
        base_dir: details.paths().base_dir().to_path_buf(),
        algorithm: details.algorithm().map(|a| a.did.clone()),
        inputs,
        parameters,
        has_secret: details.secret().is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    #[tokio::test]
    async fn test_inspect_summary() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("ddos")).unwrap();
        fs::create_dir_all(dir.path().join("inputs").join("d1")).unwrap();
        fs::write(
            dir.path().join("ddos").join("d1"),
            json!({ "service": [{ "type": "metadata", "attributes": { "main": { "files": [{}] } } }] })
                .to_string(),
        )
        .unwrap();
        fs::write(dir.path().join("inputs").join("d1").join("0"), "x").unwrap();
        fs::write(
            dir.path().join("inputs").join("algoCustomData.json"),
            r#"{"epochs": "3"}"#,
        )
        .unwrap();

        let settings = JobSettings::from_config(json!({
            "base_dir": dir.path(),
            "transformation_did": "algo",
            "secret": "hush",
        }))
        .unwrap();
        let summary = inspect(settings).await.unwrap();

        assert_eq!(summary.inputs.len(), 1);
        assert!(summary.inputs[0].exists);
        assert_eq!(summary.parameters, Some(json!({ "epochs": "3" })));
        assert_eq!(summary.algorithm.as_deref(), Some("algo"));
        assert!(summary.has_secret);
        assert!(!serde_json::to_string(&summary).unwrap().contains("hush"));
    }
}
