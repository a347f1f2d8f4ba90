use std::collections::{BTreeMap, HashSet};

use super::{value_as_text, RuleDescriptor};
use crate::domain::{DataBatch, ValidationResult, ValidationRule};

/// Asserts non-null values of a field belong to a fixed set. Both sides are
/// compared as text, so the number `1` matches an allowed `"1"` and vice versa.
pub struct AllowedValuesRule {
    descriptor: RuleDescriptor,
    field: String,
    values: Vec<String>,
    lookup: HashSet<String>,
}

impl AllowedValuesRule {
    pub fn new(field: impl Into<String>, values: Vec<String>, descriptor: RuleDescriptor) -> Self {
        let lookup = values.iter().cloned().collect();
        Self {
            descriptor,
            field: field.into(),
            values,
            lookup,
        }
    }
}

impl ValidationRule for AllowedValuesRule {
    fn rule_id(&self) -> &str {
        &self.descriptor.rule_id
    }

    fn description(&self) -> String {
        format!("Field '{}' must be one of: {}.", self.field, self.values.join(", "))
    }

    fn applies_to(&self, batch: &DataBatch) -> bool {
        self.descriptor.applies_to(batch)
    }

    fn validate(&self, batch: &DataBatch) -> Vec<ValidationResult> {
        let mut failing = Vec::new();
        let mut unexpected: Vec<String> = Vec::new();
        let mut checked = 0;

        for (i, record) in batch.records().iter().enumerate() {
            let Some(value) = record.get(&self.field).filter(|v| !v.is_null()) else {
                continue;
            };
            checked += 1;
            let text = value_as_text(value);
            if !self.lookup.contains(&text) {
                failing.push(i);
                if !unexpected.contains(&text) {
                    unexpected.push(text);
                }
            }
        }

        let mut metadata = self.metadata();
        if !unexpected.is_empty() {
            metadata.insert("unexpected_values".to_string(), unexpected.join(","));
        }

        vec![self.descriptor.outcome(
            batch,
            checked,
            &failing,
            || format!("Unexpected values found for '{}'.", self.field),
            metadata,
        )]
    }

    fn metadata(&self) -> BTreeMap<String, String> {
        let mut metadata = self.descriptor.metadata();
        metadata.insert("field".to_string(), self.field.clone());
        metadata.insert("allowed_values".to_string(), self.values.join(","));
        metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::batch;
    use serde_json::json;

    fn rule() -> AllowedValuesRule {
        AllowedValuesRule::new(
            "status",
            vec!["open".to_string(), "closed".to_string(), "1".to_string()],
            RuleDescriptor::new("allowed-status"),
        )
    }

    #[test]
    fn test_known_values_pass() {
        let b = batch(vec![json!({"status": "open"}), json!({"status": 1}), json!({})]);
        assert!(rule().validate(&b)[0].passed);
    }

    #[test]
    fn test_unknown_values_fail_and_are_listed_once() {
        let b = batch(vec![
            json!({"status": "pending"}),
            json!({"status": "closed"}),
            json!({"status": "pending"}),
            json!({"status": "Open"}),
        ]);

        let results = rule().validate(&b);
        assert!(!results[0].passed);
        assert_eq!(results[0].failed_count, 3);
        assert_eq!(
            results[0].metadata.get("unexpected_values").map(String::as_str),
            Some("pending,Open")
        );
    }
}
