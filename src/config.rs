use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::parse::{default_columns, ColumnRule};

/// Optional override file, read from the working directory when present.
pub const CONFIG_FILE: &str = "sihscraper.yaml";

const PAGE_URL: &str = "https://www.sih.gov.in/sih2025PS";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                          AppleWebKit/537.36 (KHTML, like Gecko) \
                          Chrome/91.0.4472.124 Safari/537.36";

/// Run settings. The defaults are the fixed constants the scraper normally
/// runs with; a YAML file can override any of them, including the column
/// mapping, so a layout change on the remote page is a config edit rather
/// than a release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub excel_file: PathBuf,
    pub hash_file: PathBuf,
    pub columns: Vec<ColumnRule>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            url: PAGE_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            timeout_secs: 15,
            excel_file: PathBuf::from("sih_data.xlsx"),
            hash_file: PathBuf::from("data_hash.txt"),
            columns: default_columns(),
        }
    }
}

impl Config {
    /// Load the override file if it exists, otherwise the built-in defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        Url::parse(&self.url).with_context(|| format!("invalid page URL {:?}", self.url))?;
        Ok(())
    }
}
