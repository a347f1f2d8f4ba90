use std::collections::BTreeMap;

use super::RuleDescriptor;
use crate::domain::{DataBatch, ValidationResult, ValidationRule};

/// Asserts the number of records in a batch falls within inclusive bounds
pub struct RowCountRule {
    descriptor: RuleDescriptor,
    min: Option<usize>,
    max: Option<usize>,
}

impl RowCountRule {
    pub fn new(min: Option<usize>, max: Option<usize>, descriptor: RuleDescriptor) -> Self {
        Self { descriptor, min, max }
    }
}

impl ValidationRule for RowCountRule {
    fn rule_id(&self) -> &str {
        &self.descriptor.rule_id
    }

    fn description(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("Batch must contain between {} and {} records.", min, max),
            (Some(min), None) => format!("Batch must contain at least {} records.", min),
            (None, Some(max)) => format!("Batch must contain at most {} records.", max),
            (None, None) => "Batch may contain any number of records.".to_string(),
        }
    }

    fn applies_to(&self, batch: &DataBatch) -> bool {
        self.descriptor.applies_to(batch)
    }

    fn validate(&self, batch: &DataBatch) -> Vec<ValidationResult> {
        let count = batch.len();
        let ok = self.min.map_or(true, |min| count >= min) && self.max.map_or(true, |max| count <= max);

        let mut result = if ok {
            ValidationResult::passed(&self.descriptor.rule_id, batch.batch_id(), self.descriptor.severity)
        } else {
            ValidationResult::failed(
                &self.descriptor.rule_id,
                batch.batch_id(),
                self.descriptor.severity,
                format!("Row count {} outside expected bounds.", count),
            )
        };
        // Batch-level check: a single unit either passes or fails
        result = result.with_counts(1, usize::from(!ok));

        let mut metadata = self.metadata();
        metadata.insert("row_count".to_string(), count.to_string());
        vec![result.with_metadata(metadata)]
    }

    fn metadata(&self) -> BTreeMap<String, String> {
        let mut metadata = self.descriptor.metadata();
        if let Some(min) = self.min {
            metadata.insert("min".to_string(), min.to_string());
        }
        if let Some(max) = self.max {
            metadata.insert("max".to_string(), max.to_string());
        }
        metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::batch;
    use serde_json::json;

    #[test]
    fn test_row_count_within_bounds() {
        let rule = RowCountRule::new(Some(1), Some(3), RuleDescriptor::new("row_count"));
        let results = rule.validate(&batch(vec![json!({}), json!({})]));
        assert!(results[0].passed);
        assert_eq!(results[0].metadata.get("row_count").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_empty_batch_fails_minimum() {
        let rule = RowCountRule::new(Some(1), None, RuleDescriptor::new("row_count"));
        let results = rule.validate(&batch(Vec::new()));
        assert!(!results[0].passed);
        assert_eq!(results[0].message.as_deref(), Some("Row count 0 outside expected bounds."));
        assert_eq!(results[0].failed_count, 1);
    }
}
