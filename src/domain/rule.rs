use std::collections::BTreeMap;

use super::{DataBatch, ValidationResult};

/// A single validation rule for a data batch or its records
pub trait ValidationRule: Send + Sync {
    /// Unique identifier for the rule
    fn rule_id(&self) -> &str;

    /// Human-readable summary of the rule
    fn description(&self) -> String;

    /// Whether the rule should run for the provided batch
    fn applies_to(&self, batch: &DataBatch) -> bool;

    /// Validate a batch and produce results
    fn validate(&self, batch: &DataBatch) -> Vec<ValidationResult>;

    /// Metadata describing the rule (e.g. severity, field)
    fn metadata(&self) -> BTreeMap<String, String>;
}
