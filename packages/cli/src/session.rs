//! Token persistence under the user's config directory.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Default)]
struct Credentials {
    token: Option<String>,
}

fn credentials_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("no config directory on this platform")?;
    Ok(dir.join("bricklane").join("credentials.toml"))
}

pub fn load_token() -> Result<Option<String>> {
    let path = credentials_path()?;
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let creds: Credentials = toml::from_str(&raw).unwrap_or_default();
    Ok(creds.token)
}

pub fn store_token(token: &str) -> Result<PathBuf> {
    let path = credentials_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let raw = toml::to_string(&Credentials {
        token: Some(token.to_string()),
    })?;
    fs::write(&path, raw).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
