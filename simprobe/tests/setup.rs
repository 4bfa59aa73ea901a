use std::env;

use simprobe::setup::{load_credentials, load_credentials_or_empty, write_env_template};
use tempfile::TempDir;

fn temp_working_dir() -> TempDir {
    TempDir::new().expect("create temp dir")
}

#[tokio::test]
async fn template_overwrites_previous_content() -> anyhow::Result<()> {
    let dir = temp_working_dir();
    let path = dir.path().join(".env");
    tokio::fs::write(&path, "HUGGINGFACE_API_KEY='hf_real'\nEXTRA=1\n").await?;

    write_env_template(&path).await?;

    let contents = tokio::fs::read_to_string(&path).await?;
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|line| line.ends_with("=''")));
    assert!(!contents.contains("hf_real"));
    Ok(())
}

#[tokio::test]
async fn template_creates_missing_parent_dirs() -> anyhow::Result<()> {
    let dir = temp_working_dir();
    let path = dir.path().join("nested/config/.env");
    write_env_template(&path).await?;
    assert!(path.exists());
    Ok(())
}

#[tokio::test]
async fn unwritable_target_is_an_error() -> anyhow::Result<()> {
    let dir = temp_working_dir();
    // A directory sits where the file should go.
    let path = dir.path().join(".env");
    tokio::fs::create_dir(&path).await?;
    assert!(write_env_template(&path).await.is_err());
    Ok(())
}

#[tokio::test]
async fn fresh_template_loads_empty_credentials() -> anyhow::Result<()> {
    let dir = temp_working_dir();
    let path = dir.path().join(".env");
    write_env_template(&path).await?;

    let creds = load_credentials(&path)?;
    assert!(creds.hf_token.is_empty());
    assert!(creds.backend_url.is_empty());
    assert!(creds.backend_key.is_empty());
    Ok(())
}

#[test]
fn credentials_are_not_exported_to_process_env() -> anyhow::Result<()> {
    let dir = temp_working_dir();
    let path = dir.path().join("creds.env");
    std::fs::write(
        &path,
        "HUGGINGFACE_API_KEY='hf_abc'\nSUPABASE_URL='https://proj.supabase.co'\nSUPABASE_KEY=\"k3y\"\n",
    )?;

    let creds = load_credentials(&path)?;
    assert_eq!(creds.hf_token, "hf_abc");
    assert_eq!(creds.backend_url, "https://proj.supabase.co");
    assert_eq!(creds.backend_key, "k3y");
    assert_ne!(env::var("HUGGINGFACE_API_KEY").ok().as_deref(), Some("hf_abc"));
    Ok(())
}

#[test]
fn missing_credential_file_is_an_error() {
    let dir = temp_working_dir();
    assert!(load_credentials(&dir.path().join("absent.env")).is_err());
}

#[test]
fn missing_credential_file_can_fall_back_to_empty() -> anyhow::Result<()> {
    let dir = temp_working_dir();
    let creds = load_credentials_or_empty(&dir.path().join("absent.env"))?;
    assert!(creds.hf_token.is_empty());
    assert!(creds.backend_url.is_empty());
    assert!(creds.backend_key.is_empty());
    Ok(())
}

#[test]
fn fallback_still_reads_an_existing_file() -> anyhow::Result<()> {
    let dir = temp_working_dir();
    let path = dir.path().join(".env");
    std::fs::write(&path, "HUGGINGFACE_API_KEY='hf_xyz'\n")?;
    let creds = load_credentials_or_empty(&path)?;
    assert_eq!(creds.hf_token, "hf_xyz");
    Ok(())
}
