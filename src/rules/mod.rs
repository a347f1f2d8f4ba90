//! Built-in validation rules.
//!
//! Every field rule walks the batch once, collects the indices of failing
//! records and reports a single [`ValidationResult`] per batch.

pub mod allowed_values;
pub mod config;
pub mod not_null;
pub mod pattern;
pub mod range;
pub mod row_count;
pub mod unique;

pub use allowed_values::AllowedValuesRule;
pub use config::{build_rule, RuleConfig};
pub use not_null::NotNullRule;
pub use pattern::PatternRule;
pub use range::RangeRule;
pub use row_count::RowCountRule;
pub use unique::UniqueRule;

use serde_json::Value;
use std::collections::BTreeMap;

use crate::constants::DEFAULT_SAMPLE_LIMIT;
use crate::domain::{DataBatch, Severity, ValidationResult};

/// Settings shared by every rule: identity, severity and scope
#[derive(Debug, Clone)]
pub struct RuleDescriptor {
    pub rule_id: String,
    pub severity: Severity,
    /// Source names the rule is restricted to; empty means every source
    pub sources: Vec<String>,
    /// Maximum number of failing row indices kept on a result
    pub sample_limit: usize,
}

impl RuleDescriptor {
    pub fn new(rule_id: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity: Severity::default(),
            sources: Vec::new(),
            sample_limit: DEFAULT_SAMPLE_LIMIT,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_sample_limit(mut self, sample_limit: usize) -> Self {
        self.sample_limit = sample_limit;
        self
    }

    pub fn applies_to(&self, batch: &DataBatch) -> bool {
        self.sources.is_empty() || self.sources.iter().any(|s| s == batch.source_name())
    }

    pub fn metadata(&self) -> BTreeMap<String, String> {
        let mut metadata = BTreeMap::new();
        metadata.insert("severity".to_string(), self.severity.to_string());
        if !self.sources.is_empty() {
            metadata.insert("sources".to_string(), self.sources.join(","));
        }
        metadata
    }

    /// Build the single result for a batch from the failing row indices
    pub(crate) fn outcome(
        &self,
        batch: &DataBatch,
        checked: usize,
        failing_rows: &[usize],
        failure_message: impl FnOnce() -> String,
        metadata: BTreeMap<String, String>,
    ) -> ValidationResult {
        let result = if failing_rows.is_empty() {
            ValidationResult::passed(&self.rule_id, batch.batch_id(), self.severity)
        } else {
            ValidationResult::failed(&self.rule_id, batch.batch_id(), self.severity, failure_message())
        };

        result
            .with_counts(checked, failing_rows.len())
            .with_sample_rows(failing_rows.iter().take(self.sample_limit).copied().collect())
            .with_metadata(metadata)
    }
}

/// Render a value as text for comparison: strings verbatim, everything else as JSON
pub(crate) fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numeric view of a value; numeric strings (surrounding whitespace allowed) count
pub(crate) fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{batch, batch_from};
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_scope_matches_source_name() {
        let scoped = RuleDescriptor::new("r").with_sources(vec!["orders".to_string()]);
        assert!(scoped.applies_to(&batch_from("orders", Vec::new())));
        assert!(!scoped.applies_to(&batch_from("customers", Vec::new())));

        let unscoped = RuleDescriptor::new("r");
        assert!(unscoped.applies_to(&batch(Vec::new())));
    }

    #[test]
    fn test_outcome_caps_sample_rows() {
        let descriptor = RuleDescriptor::new("r").with_sample_limit(2);
        let b = batch(vec![json!({}); 4]);

        let result = descriptor.outcome(&b, 4, &[0, 1, 3], || "bad".to_string(), BTreeMap::new());
        assert!(!result.passed);
        assert_eq!(result.failed_count, 3);
        assert_eq!(result.sample_rows, vec![0, 1]);
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(value_as_f64(&json!(3)), Some(3.0));
        assert_eq!(value_as_f64(&json!(" 2.5 ")), Some(2.5));
        assert_eq!(value_as_f64(&json!("abc")), None);
        assert_eq!(value_as_f64(&json!("NaN")), None);
        assert_eq!(value_as_f64(&json!(true)), None);
    }
}
