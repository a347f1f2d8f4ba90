use std::collections::BTreeMap;

use super::{DataBatch, ValidationResult, ValidationRule};

/// Coordinates execution of validation rules over data batches
pub trait RuleEngine: Send + Sync {
    fn register_rules(&mut self, rules: Vec<Box<dyn ValidationRule>>);

    fn validate(&self, batch: &DataBatch) -> Vec<ValidationResult>;

    fn metadata(&self) -> BTreeMap<String, String>;
}
