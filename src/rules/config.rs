use serde::Deserialize;
use serde_json::Value;

use super::{
    value_as_text, AllowedValuesRule, NotNullRule, PatternRule, RangeRule, RowCountRule, RuleDescriptor, UniqueRule,
};
use crate::constants::{RULE_ALLOWED_VALUES, RULE_NOT_NULL, RULE_PATTERN, RULE_RANGE, RULE_ROW_COUNT, RULE_UNIQUE};
use crate::domain::{Severity, ValidationRule};

/// One entry of a rule spec's `validations` list
#[derive(Debug, Clone, Deserialize)]
pub struct RuleEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    /// Restrict the rule to these source names
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(flatten)]
    pub rule: RuleConfig,
}

/// Rule parameters, selected by the entry's `type` key
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleConfig {
    NotNull {
        field: String,
    },
    Unique {
        field: String,
    },
    Range {
        field: String,
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    Pattern {
        field: String,
        pattern: String,
    },
    AllowedValues {
        field: String,
        values: Vec<Value>,
    },
    RowCount {
        #[serde(default)]
        min: Option<usize>,
        #[serde(default)]
        max: Option<usize>,
    },
}

impl RuleConfig {
    pub fn type_name(&self) -> &'static str {
        match self {
            RuleConfig::NotNull { .. } => RULE_NOT_NULL,
            RuleConfig::Unique { .. } => RULE_UNIQUE,
            RuleConfig::Range { .. } => RULE_RANGE,
            RuleConfig::Pattern { .. } => RULE_PATTERN,
            RuleConfig::AllowedValues { .. } => RULE_ALLOWED_VALUES,
            RuleConfig::RowCount { .. } => RULE_ROW_COUNT,
        }
    }

    fn field(&self) -> Option<&str> {
        match self {
            RuleConfig::NotNull { field }
            | RuleConfig::Unique { field }
            | RuleConfig::Range { field, .. }
            | RuleConfig::Pattern { field, .. }
            | RuleConfig::AllowedValues { field, .. } => Some(field),
            RuleConfig::RowCount { .. } => None,
        }
    }

    /// `<type>-<field>`, or just the type for batch-level rules
    pub fn default_rule_id(&self) -> String {
        match self.field() {
            Some(field) => format!("{}-{}", self.type_name(), field),
            None => self.type_name().to_string(),
        }
    }
}

/// Build a rule from a raw spec entry. Errors carry a reason only; the caller
/// adds the entry position.
pub fn build_rule(entry: &serde_json::Map<String, Value>, sample_limit: usize) -> Result<Box<dyn ValidationRule>, String> {
    let entry: RuleEntry = serde_json::from_value(Value::Object(entry.clone())).map_err(|e| e.to_string())?;

    let descriptor = RuleDescriptor::new(entry.id.clone().unwrap_or_else(|| entry.rule.default_rule_id()))
        .with_severity(entry.severity.unwrap_or_default())
        .with_sources(entry.sources.clone())
        .with_sample_limit(sample_limit);

    if descriptor.rule_id.trim().is_empty() {
        return Err("rule id must not be empty".to_string());
    }

    let rule: Box<dyn ValidationRule> = match entry.rule {
        RuleConfig::NotNull { field } => Box::new(NotNullRule::with_descriptor(require_field(field)?, descriptor)),
        RuleConfig::Unique { field } => Box::new(UniqueRule::new(require_field(field)?, descriptor)),
        RuleConfig::Range { field, min, max } => {
            check_bounds(min, max, |a, b| a > b)?;
            Box::new(RangeRule::new(require_field(field)?, min, max, descriptor))
        }
        RuleConfig::Pattern { field, pattern } => Box::new(
            PatternRule::new(require_field(field)?, &pattern, descriptor)
                .map_err(|e| format!("invalid pattern '{}': {}", pattern, e))?,
        ),
        RuleConfig::AllowedValues { field, values } => {
            if values.is_empty() {
                return Err("'values' must not be empty".to_string());
            }
            let values = values.iter().map(value_as_text).collect();
            Box::new(AllowedValuesRule::new(require_field(field)?, values, descriptor))
        }
        RuleConfig::RowCount { min, max } => {
            check_bounds(min, max, |a, b| a > b)?;
            Box::new(RowCountRule::new(min, max, descriptor))
        }
    };

    Ok(rule)
}

fn require_field(field: String) -> Result<String, String> {
    if field.trim().is_empty() {
        Err("'field' must not be empty".to_string())
    } else {
        Ok(field)
    }
}

fn check_bounds<T: Copy>(min: Option<T>, max: Option<T>, greater: impl Fn(T, T) -> bool) -> Result<(), String> {
    match (min, max) {
        (None, None) => Err("at least one of 'min' or 'max' is required".to_string()),
        (Some(min), Some(max)) if greater(min, max) => Err("'min' must not exceed 'max'".to_string()),
        _ => Ok(()),
    }
}
