use regex::Regex;
use std::collections::BTreeMap;

use super::{value_as_text, RuleDescriptor};
use crate::domain::{DataBatch, ValidationResult, ValidationRule};

/// Asserts non-null values of a field match a regular expression.
/// Matching is a search; anchor the pattern to require a full match.
pub struct PatternRule {
    descriptor: RuleDescriptor,
    field: String,
    regex: Regex,
}

impl PatternRule {
    pub fn new(field: impl Into<String>, pattern: &str, descriptor: RuleDescriptor) -> Result<Self, regex::Error> {
        Ok(Self {
            descriptor,
            field: field.into(),
            regex: Regex::new(pattern)?,
        })
    }
}

impl ValidationRule for PatternRule {
    fn rule_id(&self) -> &str {
        &self.descriptor.rule_id
    }

    fn description(&self) -> String {
        format!("Field '{}' must match pattern '{}'.", self.field, self.regex.as_str())
    }

    fn applies_to(&self, batch: &DataBatch) -> bool {
        self.descriptor.applies_to(batch)
    }

    fn validate(&self, batch: &DataBatch) -> Vec<ValidationResult> {
        let mut failing = Vec::new();
        let mut checked = 0;

        for (i, record) in batch.records().iter().enumerate() {
            let Some(value) = record.get(&self.field).filter(|v| !v.is_null()) else {
                continue;
            };
            checked += 1;
            if !self.regex.is_match(&value_as_text(value)) {
                failing.push(i);
            }
        }

        vec![self.descriptor.outcome(
            batch,
            checked,
            &failing,
            || format!("Values not matching pattern for '{}'.", self.field),
            self.metadata(),
        )]
    }

    fn metadata(&self) -> BTreeMap<String, String> {
        let mut metadata = self.descriptor.metadata();
        metadata.insert("field".to_string(), self.field.clone());
        metadata.insert("pattern".to_string(), self.regex.as_str().to_string());
        metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::batch;
    use serde_json::json;

    #[test]
    fn test_pattern_matches_strings_and_numbers() {
        let rule = PatternRule::new("zip", r"^\d{5}$", RuleDescriptor::new("pattern-zip")).unwrap();
        let b = batch(vec![json!({"zip": "98101"}), json!({"zip": 98102}), json!({"zip": null})]);

        assert!(rule.validate(&b)[0].passed);
    }

    #[test]
    fn test_non_matching_values_fail() {
        let rule = PatternRule::new("email", "@", RuleDescriptor::new("pattern-email")).unwrap();
        let b = batch(vec![json!({"email": "a@example.com"}), json!({"email": "nope"})]);

        let results = rule.validate(&b);
        assert!(!results[0].passed);
        assert_eq!(results[0].sample_rows, vec![1]);
        assert_eq!(results[0].message.as_deref(), Some("Values not matching pattern for 'email'."));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        assert!(PatternRule::new("x", "(", RuleDescriptor::new("p")).is_err());
    }
}
