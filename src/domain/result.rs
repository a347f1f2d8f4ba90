use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Severity levels for a failed validation. Parsing (including serde) goes
/// through `FromStr`: case-insensitive, `warn` accepted for `warning`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Severity {
    /// Worth noting, never degrades health on its own
    Info,
    /// Notable issue, batch is degraded
    Warning,
    /// Significant issue, batch is unhealthy
    #[default]
    Error,
    /// Data must not be used
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "critical" => Ok(Severity::Critical),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = String;

    fn try_from(value: String) -> Result<Self, <Severity as TryFrom<String>>::Error> {
        value.parse()
    }
}

/// Outcome of applying one rule to one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub rule_id: String,
    pub batch_id: String,
    pub passed: bool,
    /// Human-readable failure message; `None` when the rule passed
    pub message: Option<String>,
    pub severity: Severity,
    /// Number of records the rule looked at
    pub checked_count: usize,
    /// Number of records that violated the rule
    pub failed_count: usize,
    /// Indices of the first failing records within the batch
    pub sample_rows: Vec<usize>,
    pub metadata: BTreeMap<String, String>,
}

impl ValidationResult {
    pub fn passed(rule_id: impl Into<String>, batch_id: impl Into<String>, severity: Severity) -> Self {
        Self {
            rule_id: rule_id.into(),
            batch_id: batch_id.into(),
            passed: true,
            message: None,
            severity,
            checked_count: 0,
            failed_count: 0,
            sample_rows: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn failed(
        rule_id: impl Into<String>,
        batch_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            passed: false,
            message: Some(message.into()),
            ..Self::passed(rule_id, batch_id, severity)
        }
    }

    pub fn with_counts(mut self, checked_count: usize, failed_count: usize) -> Self {
        self.checked_count = checked_count;
        self.failed_count = failed_count;
        self
    }

    pub fn with_sample_rows(mut self, sample_rows: Vec<usize>) -> Self {
        self.sample_rows = sample_rows;
        self
    }

    pub fn with_metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }
}
