use std::collections::{BTreeMap, HashSet};

use super::{value_as_text, RuleDescriptor};
use crate::domain::{DataBatch, ValidationResult, ValidationRule};

/// Asserts that non-null values of a field do not repeat within a batch.
/// Every occurrence after the first one counts as a failing record.
/// Equality is typed: the number `1` and the string `"1"` are different values.
pub struct UniqueRule {
    descriptor: RuleDescriptor,
    field: String,
}

impl UniqueRule {
    pub fn new(field: impl Into<String>, descriptor: RuleDescriptor) -> Self {
        Self {
            descriptor,
            field: field.into(),
        }
    }
}

impl ValidationRule for UniqueRule {
    fn rule_id(&self) -> &str {
        &self.descriptor.rule_id
    }

    fn description(&self) -> String {
        format!("Field '{}' must be unique.", self.field)
    }

    fn applies_to(&self, batch: &DataBatch) -> bool {
        self.descriptor.applies_to(batch)
    }

    fn validate(&self, batch: &DataBatch) -> Vec<ValidationResult> {
        let mut seen = HashSet::new();
        let mut failing = Vec::new();
        let mut checked = 0;

        for (i, record) in batch.records().iter().enumerate() {
            let Some(value) = record.get(&self.field).filter(|v| !v.is_null()) else {
                continue;
            };
            checked += 1;
            // Key on the JSON rendering so 1 and "1" stay distinct
            if !seen.insert(value.to_string()) {
                failing.push(i);
            }
        }

        let mut metadata = self.metadata();
        if let Some(&first) = failing.first() {
            if let Some(value) = batch.records()[first].get(&self.field) {
                metadata.insert("first_duplicate".to_string(), value_as_text(value));
            }
        }

        vec![self.descriptor.outcome(
            batch,
            checked,
            &failing,
            || format!("Duplicate values found for '{}'.", self.field),
            metadata,
        )]
    }

    fn metadata(&self) -> BTreeMap<String, String> {
        let mut metadata = self.descriptor.metadata();
        metadata.insert("field".to_string(), self.field.clone());
        metadata
    }
}
