use std::collections::BTreeMap;

use super::{value_as_f64, RuleDescriptor};
use crate::domain::{DataBatch, ValidationResult, ValidationRule};

/// Asserts non-null values of a field are numeric and within inclusive bounds.
/// Non-numeric values count as failures.
pub struct RangeRule {
    descriptor: RuleDescriptor,
    field: String,
    min: Option<f64>,
    max: Option<f64>,
}

impl RangeRule {
    /// At least one bound must be given; callers validate that before building.
    pub fn new(field: impl Into<String>, min: Option<f64>, max: Option<f64>, descriptor: RuleDescriptor) -> Self {
        Self {
            descriptor,
            field: field.into(),
            min,
            max,
        }
    }

    fn in_bounds(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }

    fn bounds_text(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("between {} and {}", min, max),
            (Some(min), None) => format!("at least {}", min),
            (None, Some(max)) => format!("at most {}", max),
            (None, None) => "numeric".to_string(),
        }
    }
}

impl ValidationRule for RangeRule {
    fn rule_id(&self) -> &str {
        &self.descriptor.rule_id
    }

    fn description(&self) -> String {
        format!("Field '{}' must be {}.", self.field, self.bounds_text())
    }

    fn applies_to(&self, batch: &DataBatch) -> bool {
        self.descriptor.applies_to(batch)
    }

    fn validate(&self, batch: &DataBatch) -> Vec<ValidationResult> {
        let mut failing = Vec::new();
        let mut non_numeric = 0usize;
        let mut checked = 0;

        for (i, record) in batch.records().iter().enumerate() {
            let Some(value) = record.get(&self.field).filter(|v| !v.is_null()) else {
                continue;
            };
            checked += 1;
            match value_as_f64(value) {
                Some(n) if self.in_bounds(n) => {}
                Some(_) => failing.push(i),
                None => {
                    non_numeric += 1;
                    failing.push(i);
                }
            }
        }

        let mut metadata = self.metadata();
        metadata.insert("non_numeric_count".to_string(), non_numeric.to_string());

        vec![self.descriptor.outcome(
            batch,
            checked,
            &failing,
            || format!("Values out of range for '{}'.", self.field),
            metadata,
        )]
    }

    fn metadata(&self) -> BTreeMap<String, String> {
        let mut metadata = self.descriptor.metadata();
        metadata.insert("field".to_string(), self.field.clone());
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
    fn test_values_within_bounds_pass() {
        let rule = RangeRule::new("age", Some(0.0), Some(120.0), RuleDescriptor::new("range-age"));
        let b = batch(vec![json!({"age": 0}), json!({"age": "120"}), json!({"age": null})]);

        let results = rule.validate(&b);
        assert!(results[0].passed);
        assert_eq!(results[0].checked_count, 2);
    }

    #[test]
    fn test_out_of_range_and_non_numeric_fail() {
        let rule = RangeRule::new("age", Some(0.0), None, RuleDescriptor::new("range-age"));
        let b = batch(vec![json!({"age": -1}), json!({"age": 30}), json!({"age": "old"})]);

        let results = rule.validate(&b);
        assert!(!results[0].passed);
        assert_eq!(results[0].sample_rows, vec![0, 2]);
        assert_eq!(results[0].message.as_deref(), Some("Values out of range for 'age'."));
        assert_eq!(results[0].metadata.get("non_numeric_count").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_description_names_bounds() {
        let rule = RangeRule::new("qty", None, Some(10.0), RuleDescriptor::new("range-qty"));
        assert_eq!(rule.description(), "Field 'qty' must be at most 10.");
    }
}
