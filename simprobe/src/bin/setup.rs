use anyhow::{Context, Result};
use simprobe::{
    ai::SimilarityClient,
    backend::RestBackend,
    config::load_config,
    init_tracing,
    probe::{ProbeOutcome, run_probes},
    setup::{load_credentials, write_env_template},
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let code = match run().await {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            error!(error = %err, "Setup failed");
            eprintln!("Setup failed: {err:#}");
            1
        }
    };
    std::process::exit(code);
}

async fn run() -> Result<ProbeOutcome> {
    init_tracing();

    let config = load_config()
        .await
        .context("Failed to load application configuration")?;

    write_env_template(&config.env_file).await?;
    let creds = load_credentials(&config.env_file)?;

    let store = RestBackend::from_credentials(&creds)?;
    let service = SimilarityClient::new(
        creds.hf_token.clone(),
        Some(config.embedding.endpoint.clone()),
    )?;

    let outcome = run_probes(&store, &service, &config.backend.table, &config.probe).await;
    info!(
        backend = outcome.backend,
        embedding = outcome.embedding,
        "Connectivity checks finished"
    );

    if outcome.success() {
        info!("Setup completed successfully");
    } else {
        warn!(
            env_file = %config.env_file.display(),
            "Setup incomplete, fill in the credential file and check the failures above"
        );
    }
    Ok(outcome)
}
