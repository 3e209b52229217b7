use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::models::Config;

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        info!("{} not found, using default configuration", path.display());
        return Ok(Config::default());
    }
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}
