use std::collections::BTreeMap;

use super::RuleDescriptor;
use crate::domain::{is_null, DataBatch, ValidationResult, ValidationRule};

/// Asserts a field is present and non-null in every record
pub struct NotNullRule {
    descriptor: RuleDescriptor,
    field: String,
}

impl NotNullRule {
    pub fn new(field: impl Into<String>) -> Self {
        Self::with_descriptor(field, RuleDescriptor::new("not-null"))
    }

    pub fn with_descriptor(field: impl Into<String>, descriptor: RuleDescriptor) -> Self {
        Self {
            descriptor,
            field: field.into(),
        }
    }
}

impl ValidationRule for NotNullRule {
    fn rule_id(&self) -> &str {
        &self.descriptor.rule_id
    }

    fn description(&self) -> String {
        format!("Field '{}' must not be null.", self.field)
    }

    fn applies_to(&self, batch: &DataBatch) -> bool {
        self.descriptor.applies_to(batch)
    }

    fn validate(&self, batch: &DataBatch) -> Vec<ValidationResult> {
        let failing: Vec<usize> = batch
            .records()
            .iter()
            .enumerate()
            .filter(|(_, record)| is_null(record, &self.field))
            .map(|(i, _)| i)
            .collect();

        vec![self.descriptor.outcome(
            batch,
            batch.len(),
            &failing,
            || format!("Nulls found for '{}'.", self.field),
            self.metadata(),
        )]
    }

    fn metadata(&self) -> BTreeMap<String, String> {
        let mut metadata = self.descriptor.metadata();
        metadata.insert("field".to_string(), self.field.clone());
        metadata
    }
}
