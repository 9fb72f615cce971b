//! Datasource configuration.
//!
//! Settings are read from a TOML file and then overridden by environment
//! variables. The file is looked up at `$AWSLOGS_DATASOURCE_CONFIG` first, then
//! at `config.toml` in the platform config directory. A missing file means
//! defaults.
//!
//! # config.toml Format
//!
//! ```toml
//! default_region = "us-east-1"
//! log_filter = "awslogs_datasource=debug"
//!
//! [pagination]
//! max_pages = 500
//! max_records = 50000
//! ```

#![warn(clippy::all, rust_2018_idioms)]

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::app::data_plane::cloudwatch_logs::PaginationLimits;

pub const CONFIG_PATH_ENV: &str = "AWSLOGS_DATASOURCE_CONFIG";
pub const DEFAULT_REGION_ENV: &str = "AWSLOGS_DATASOURCE_DEFAULT_REGION";
pub const MAX_PAGES_ENV: &str = "AWSLOGS_DATASOURCE_MAX_PAGES";
pub const MAX_RECORDS_ENV: &str = "AWSLOGS_DATASOURCE_MAX_RECORDS";

const DEFAULT_LOG_FILTER: &str = "awslogs_datasource=info,aws_config=warn,aws_smithy_runtime=warn,aws_sigv4=warn,hyper=warn";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasourceConfig {
    /// Region used when a query leaves its region empty
    pub default_region: Option<String>,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
    pub pagination: PaginationLimits,
}

impl Default for DatasourceConfig {
    fn default() -> Self {
        Self {
            default_region: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            pagination: PaginationLimits::default(),
        }
    }
}

impl DatasourceConfig {
    /// Load from the configured file location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from_path(&path)?,
            Some(path) => {
                tracing::debug!("No config file at {:?}, using defaults", path);
                Self::default()
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        directories::ProjectDirs::from("com", "", "awslogs-datasource")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply overrides from a key lookup (the process environment in production)
    pub fn apply_overrides<L>(&mut self, lookup: L) -> Result<()>
    where
        L: Fn(&str) -> Option<String>,
    {
        if let Some(region) = lookup(DEFAULT_REGION_ENV) {
            self.default_region = Some(region).filter(|r| !r.is_empty());
        }
        if let Some(value) = lookup(MAX_PAGES_ENV) {
            self.pagination.max_pages = value
                .parse()
                .with_context(|| format!("{} must be a positive integer", MAX_PAGES_ENV))?;
        }
        if let Some(value) = lookup(MAX_RECORDS_ENV) {
            self.pagination.max_records = value
                .parse()
                .with_context(|| format!("{} must be a positive integer", MAX_RECORDS_ENV))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.pagination.max_pages == 0 {
            bail!("pagination.max_pages must be greater than zero");
        }
        if self.pagination.max_records == 0 {
            bail!("pagination.max_records must be greater than zero");
        }
        Ok(())
    }
}
