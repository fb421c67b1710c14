use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::induce::heuristics::HeuristicOverrides;

const CONFIG_FILE: &str = "site_autoconfig";
const ENV_PREFIX: &str = "AUTOCONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pages fetched at once.
    pub concurrency: usize,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_ms: u64,
    pub user_agent: String,
    pub output_dir: PathBuf,
    pub heuristics: HeuristicOverrides,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            concurrency: 4,
            timeout_secs: 30,
            max_retries: 3,
            backoff_ms: 2000,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".to_string(),
            output_dir: PathBuf::from("Outputs"),
            heuristics: HeuristicOverrides::default(),
        }
    }
}

impl Settings {
    /// Defaults, then `site_autoconfig.toml` if present, then `AUTOCONFIG_*` env vars.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;
        Ok(settings.sanitized())
    }

    fn sanitized(mut self) -> Self {
        self.concurrency = self.concurrency.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_source_keeps_defaults() {
        let settings = Config::builder()
            .add_source(File::from_str(
                "concurrency = 0\n[heuristics]\nbanned_words = [\"promo\"]\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize::<Settings>()
            .unwrap()
            .sanitized();

        assert_eq!(settings.concurrency, 1);
        assert_eq!(settings.timeout_secs, 30);
        assert_eq!(settings.output_dir, PathBuf::from("Outputs"));
        assert_eq!(settings.heuristics.banned_words, Some(vec!["promo".to_string()]));
        assert!(settings.heuristics.news_keywords.is_none());
    }
}
