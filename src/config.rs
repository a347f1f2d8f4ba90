use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{
    DEFAULT_CONFIG_PATH, DEFAULT_LOG_DIR, DEFAULT_OUTPUT_DIR, DEFAULT_SAMPLE_LIMIT, ENV_CONFIG_PATH,
    ENV_METRICS_ADDR, SOURCE_KIND_CSV, SOURCE_KIND_JSONL,
};
use crate::error::{HealthError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// Failing row indices kept per result
    #[serde(default = "default_sample_limit")]
    pub sample_limit: usize,
    /// Prometheus listener address, e.g. "127.0.0.1:9898"
    #[serde(default)]
    pub metrics_addr: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            log_dir: default_log_dir(),
            sample_limit: default_sample_limit(),
            metrics_addr: None,
        }
    }
}

/// A named file-backed connector
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SourceConfig {
    pub name: String,
    pub kind: String,
    pub path: PathBuf,
    #[serde(default)]
    pub batch_size: Option<usize>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_DIR)
}

fn default_sample_limit() -> usize {
    DEFAULT_SAMPLE_LIMIT
}

impl Config {
    /// Load config from an explicit path, or from `DATA_HEALTH_CONFIG` /
    /// `data-health.toml`. Only the implicit default may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load_from(path)?,
            None => {
                let path = std::env::var(ENV_CONFIG_PATH)
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
                if path.exists() {
                    Self::load_from(&path)?
                } else {
                    debug!("No config file at {}, using defaults", path.display());
                    Self::default()
                }
            }
        };

        if let Ok(addr) = std::env::var(ENV_METRICS_ADDR) {
            config.engine.metrics_addr = Some(addr);
        }
        Ok(config)
    }

    /// Parse a TOML config file; relative source paths resolve against the
    /// file's directory
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HealthError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        let mut config = Self::from_toml(&content)?;
        if let Some(base) = path.parent() {
            for source in &mut config.sources {
                if source.path.is_relative() {
                    source.path = base.join(&source.path);
                }
            }
        }
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let mut names = std::collections::HashSet::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(HealthError::Config("source name must not be empty".to_string()));
            }
            if !names.insert(source.name.as_str()) {
                return Err(HealthError::Config(format!("duplicate source '{}'", source.name)));
            }
            if source.kind != SOURCE_KIND_CSV && source.kind != SOURCE_KIND_JSONL {
                return Err(HealthError::Config(format!(
                    "source '{}' has unsupported kind '{}' (expected '{}' or '{}')",
                    source.name, source.kind, SOURCE_KIND_CSV, SOURCE_KIND_JSONL
                )));
            }
        }
        if self.engine.sample_limit == 0 {
            return Err(HealthError::Config("engine.sample_limit must be at least 1".to_string()));
        }
        Ok(())
    }
}
