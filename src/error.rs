use thiserror::Error;

use crate::app::rule_spec_loader::RuleSpecError;

#[derive(Error, Debug)]
pub enum HealthError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML deserialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV read failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid regular expression: {0}")]
    Regex(#[from] regex::Error),

    #[error(transparent)]
    RuleSpec(#[from] RuleSpecError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data source error: {message}")]
    Source { message: String },

    #[error("Unknown data source: {0}")]
    UnknownSource(String),
}

pub type Result<T> = std::result::Result<T, HealthError>;
