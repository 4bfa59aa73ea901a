use std::{env, io::ErrorKind, path::PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "config/app.yaml";
pub const DEFAULT_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/sentence-transformers/all-MiniLM-L6-v2";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub env_file: PathBuf,
    pub embedding: EmbeddingConfig,
    pub backend: BackendConfig,
    pub probe: ProbeSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env_file: PathBuf::from(".env"),
            embedding: EmbeddingConfig::default(),
            backend: BackendConfig::default(),
            probe: ProbeSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub endpoint: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub table: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            table: "embeddings".to_string(),
        }
    }
}

/// Shape of the placeholder row written by the backend probe.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    pub dimensions: usize,
    pub label: String,
    /// Delete the placeholder row after a successful read-back.
    pub cleanup_probe_row: bool,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            dimensions: 384,
            label: "connectivity probe".to_string(),
            cleanup_probe_row: true,
        }
    }
}

/// Secrets read from the credential file. Passed by value to client constructors,
/// never exported into the process environment.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub hf_token: String,
    pub backend_url: String,
    pub backend_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("hf_token", &redact(&self.hf_token))
            .field("backend_url", &self.backend_url)
            .field("backend_key", &redact(&self.backend_key))
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<empty>" } else { "<redacted>" }
}

pub async fn load_config() -> Result<AppConfig> {
    let path = config_path();
    let contents = match fs::read_to_string(&path).await {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "No config file found, using defaults");
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("Failed to read config file at {}", path.display()));
        }
    };
    let config = parse_config(&contents)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))?;
    info!(path = %path.display(), "Configuration loaded from disk");
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<AppConfig> {
    Ok(serde_yaml::from_str(contents)?)
}

fn config_path() -> PathBuf {
    env::var("APP_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = parse_config("backend:\n  table: vectors\n").unwrap();
        assert_eq!(config.backend.table, "vectors");
        assert_eq!(config.probe.dimensions, 384);
        assert!(config.probe.cleanup_probe_row);
        assert_eq!(config.embedding.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.env_file, PathBuf::from(".env"));
    }

    #[test]
    fn debug_hides_secrets() {
        let creds = Credentials {
            hf_token: "hf_secret".into(),
            backend_url: "https://db.example".into(),
            backend_key: String::new(),
        };
        let shown = format!("{creds:?}");
        assert!(!shown.contains("hf_secret"));
        assert!(shown.contains("<redacted>"));
        assert!(shown.contains("<empty>"));
    }
}
