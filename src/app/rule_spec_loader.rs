//! YAML rule specification loader and validator.
//!
//! A rule spec is a YAML mapping with three required keys:
//!
//! ```yaml
//! version: "1"
//! data_source: orders
//! validations:
//!   - type: not_null
//!     field: order_id
//! ```
//!
//! Any other top-level key is carried through as metadata.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::domain::ValidationRule;
use crate::error::Result;
use crate::rules::build_rule;

const REQUIRED_FIELDS: [&str; 3] = ["version", "data_source", "validations"];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleSpecError {
    /// The YAML cannot be parsed into a rule specification
    #[error("Rule spec parse error: {0}")]
    Parse(String),

    /// Required fields are missing or invalid
    #[error("Rule spec validation error: {0}")]
    Validation(String),
}

impl RuleSpecError {
    pub fn message(&self) -> &str {
        match self {
            RuleSpecError::Parse(m) | RuleSpecError::Validation(m) => m,
        }
    }
}

/// Normalized representation of a rule specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub version: String,
    pub data_source: String,
    pub validations: Vec<Map<String, Value>>,
    pub metadata: Map<String, Value>,
}

impl RuleSpec {
    /// Turn every validation entry into a rule, in spec order
    pub fn build_rules(&self, sample_limit: usize) -> std::result::Result<Vec<Box<dyn ValidationRule>>, RuleSpecError> {
        let mut seen_ids = HashSet::new();
        let mut rules = Vec::with_capacity(self.validations.len());

        for (index, entry) in self.validations.iter().enumerate() {
            let rule = build_rule(entry, sample_limit).map_err(|reason| {
                RuleSpecError::Validation(format!("Validation entry at index {} is invalid: {}", index, reason))
            })?;

            if !seen_ids.insert(rule.rule_id().to_string()) {
                return Err(RuleSpecError::Validation(format!(
                    "Duplicate rule id '{}' at index {}.",
                    rule.rule_id(),
                    index
                )));
            }

            debug!(rule_id = rule.rule_id(), "Built rule: {}", rule.description());
            rules.push(rule);
        }

        Ok(rules)
    }
}

/// Load a rule specification from a YAML file path
pub fn load_rule_spec<P: AsRef<Path>>(path: P) -> Result<RuleSpec> {
    let content = fs::read_to_string(path.as_ref())?;
    Ok(parse_rule_spec(&content)?)
}

/// Parse and validate a rule specification from YAML text
pub fn parse_rule_spec(content: &str) -> std::result::Result<RuleSpec, RuleSpecError> {
    let payload = parse_yaml(content)?;
    validate_rule_spec(&payload)
}

/// Parse YAML text into a top-level mapping
pub fn parse_yaml(content: &str) -> std::result::Result<Map<String, Value>, RuleSpecError> {
    let has_content = content
        .lines()
        .map(str::trim)
        .any(|line| !line.is_empty() && !line.starts_with('#'));
    if !has_content {
        return Err(RuleSpecError::Parse("YAML content is empty.".to_string()));
    }

    let document: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| RuleSpecError::Parse(format!("Invalid YAML: {}.", e)))?;

    match document {
        // e.g. a lone `---` or `~`
        serde_yaml::Value::Null => Err(RuleSpecError::Parse("YAML content is empty.".to_string())),
        serde_yaml::Value::Mapping(_) => match serde_json::to_value(&document) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(RuleSpecError::Parse("Top-level YAML must be a mapping.".to_string())),
            Err(e) => Err(RuleSpecError::Parse(format!("Unsupported YAML content: {}.", e))),
        },
        _ => Err(RuleSpecError::Parse("Top-level YAML must be a mapping.".to_string())),
    }
}

/// Validate and normalize a rule specification mapping
pub fn validate_rule_spec(payload: &Map<String, Value>) -> std::result::Result<RuleSpec, RuleSpecError> {
    let mut missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !payload.contains_key(*field))
        .collect();
    if !missing.is_empty() {
        missing.sort_unstable();
        return Err(RuleSpecError::Validation(format!(
            "Missing required field(s): {}.",
            missing.join(", ")
        )));
    }

    let version = require_string(payload, "version")?;
    let data_source = require_string(payload, "data_source")?;
    let validations = require_list(payload, "validations")?;

    if validations.is_empty() {
        return Err(RuleSpecError::Validation(
            "The validations list must not be empty.".to_string(),
        ));
    }

    let validations = validations
        .iter()
        .enumerate()
        .map(|(index, validation)| {
            validation.as_object().cloned().ok_or_else(|| {
                RuleSpecError::Validation(format!("Validation entry at index {} must be a mapping.", index))
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let metadata = payload
        .iter()
        .filter(|(key, _)| !REQUIRED_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(RuleSpec {
        version,
        data_source,
        validations,
        metadata,
    })
}

/// Strings, integers and bools are accepted (`version: 2` becomes "2").
/// Decimals must be quoted: YAML reads `1.10` as the float 1.1.
fn require_string(payload: &Map<String, Value>, key: &str) -> std::result::Result<String, RuleSpecError> {
    let value = match payload.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) if n.as_f64().map_or(false, |f| f.fract() != 0.0) => {
            return Err(RuleSpecError::Validation(format!(
                "Field '{}' has decimal value {}; quote it to keep it verbatim.",
                key, n
            )));
        }
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    };

    if value.is_empty() {
        return Err(RuleSpecError::Validation(format!(
            "Field '{}' must be a non-empty string.",
            key
        )));
    }
    Ok(value)
}

fn require_list<'a>(payload: &'a Map<String, Value>, key: &str) -> std::result::Result<&'a Vec<Value>, RuleSpecError> {
    payload
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| RuleSpecError::Validation(format!("Field '{}' must be a list.", key)))
}
