//! Binary entrypoint for ojd-inspect.
use anyhow::Context;
use ojd_cli::inspect;
use ojd_loader::JobSettings;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // OJD_CONFIG points to a YAML/JSON file, otherwise BASE_DIR, DIDS, ... are read
    let settings = match std::env::var("OJD_CONFIG") {
        Ok(path) => JobSettings::from_file(&path)
            .with_context(|| format!("loading settings from {path}"))?,
        Err(_) => JobSettings::from_env().context("loading settings from the environment")?,
    };

    let summary = inspect(settings).await.context("loading job details")?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
