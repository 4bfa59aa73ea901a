use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{info, warn};

use crate::config::Credentials;

pub const HF_TOKEN_KEY: &str = "HUGGINGFACE_API_KEY";
pub const BACKEND_URL_KEY: &str = "SUPABASE_URL";
pub const BACKEND_KEY_KEY: &str = "SUPABASE_KEY";

pub fn env_template() -> String {
    [HF_TOKEN_KEY, BACKEND_URL_KEY, BACKEND_KEY_KEY]
        .iter()
        .map(|key| format!("{key}=''\n"))
        .collect()
}

async fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    Ok(())
}

/// Write the credential template, replacing whatever is at `path`.
pub async fn write_env_template(path: &Path) -> Result<()> {
    ensure_parent_dir(path).await?;

    if fs::try_exists(path).await.unwrap_or(false) {
        warn!(path = %path.display(), "Overwriting existing credential file");
    }

    fs::write(path, env_template())
        .await
        .with_context(|| format!("Failed to write credential file at {}", path.display()))?;
    info!(path = %path.display(), "Credential template written");
    Ok(())
}

/// Parse the credential file without touching the process environment.
pub fn load_credentials(path: &Path) -> Result<Credentials> {
    let iter = dotenvy::from_path_iter(path)
        .with_context(|| format!("Failed to open credential file at {}", path.display()))?;
    collect_credentials(path, iter)
}

/// Like [`load_credentials`], but a missing file yields empty credentials.
pub fn load_credentials_or_empty(path: &Path) -> Result<Credentials> {
    match dotenvy::from_path_iter(path) {
        Ok(iter) => collect_credentials(path, iter),
        Err(err) if err.not_found() => {
            warn!(path = %path.display(), "Credential file not found, using empty credentials");
            Ok(Credentials::default())
        }
        Err(err) => Err(err)
            .with_context(|| format!("Failed to open credential file at {}", path.display())),
    }
}

fn collect_credentials<I>(path: &Path, iter: I) -> Result<Credentials>
where
    I: IntoIterator<Item = dotenvy::Result<(String, String)>>,
{
    let mut creds = Credentials::default();
    for item in iter {
        let (key, value) = item
            .with_context(|| format!("Failed to parse credential file at {}", path.display()))?;
        match key.as_str() {
            HF_TOKEN_KEY => creds.hf_token = value,
            BACKEND_URL_KEY => creds.backend_url = value,
            BACKEND_KEY_KEY => creds.backend_key = value,
            _ => {}
        }
    }
    info!(path = %path.display(), "Credentials loaded");
    Ok(creds)
}
