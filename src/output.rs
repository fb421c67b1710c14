use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::induce::schema::SiteSchema;

/// On-disk shape of a generated configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub generated_at: String,
    pub sites: Vec<SiteSchema>,
}

impl ConfigFile {
    pub fn new(sites: Vec<SiteSchema>, now: DateTime<Local>) -> Self {
        ConfigFile {
            generated_at: now.to_rfc3339(),
            sites,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// `<dir>/<YYYY.MM>/site_config_<YYYY.MM.DD_HH.MM.SS>.json`
pub fn default_path(output_dir: &Path, now: DateTime<Local>) -> PathBuf {
    output_dir
        .join(now.format("%Y.%m").to_string())
        .join(format!("site_config_{}.json", now.format("%Y.%m.%d_%H.%M.%S")))
}

pub fn write_config(path: &Path, config: &ConfigFile) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, config.to_json()?)?;
    info!("Wrote {} site schemas to {}", config.sites.len(), path.display());
    Ok(())
}
