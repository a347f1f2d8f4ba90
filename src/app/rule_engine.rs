use std::collections::BTreeMap;
use tracing::{debug, trace};

use crate::domain::{DataBatch, RuleEngine, ValidationResult, ValidationRule};

/// Executes a collection of validation rules against data batches, in
/// registration order
#[derive(Default)]
pub struct SimpleRuleEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl SimpleRuleEngine {
    pub fn new(rules: Vec<Box<dyn ValidationRule>>) -> Self {
        Self { rules }
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn rules(&self) -> &[Box<dyn ValidationRule>] {
        &self.rules
    }
}

impl RuleEngine for SimpleRuleEngine {
    fn register_rules(&mut self, rules: Vec<Box<dyn ValidationRule>>) {
        self.rules.extend(rules);
    }

    fn validate(&self, batch: &DataBatch) -> Vec<ValidationResult> {
        let mut results = Vec::new();

        for rule in &self.rules {
            if !rule.applies_to(batch) {
                trace!(rule_id = rule.rule_id(), batch_id = batch.batch_id(), "Rule skipped for batch");
                continue;
            }
            results.extend(rule.validate(batch));
        }

        debug!(
            batch_id = batch.batch_id(),
            results = results.len(),
            "Validated batch against {} rules",
            self.rules.len()
        );
        results
    }

    fn metadata(&self) -> BTreeMap<String, String> {
        let mut metadata = BTreeMap::new();
        metadata.insert("rule_count".to_string(), self.rule_count().to_string());
        metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{batch, batch_from};
    use crate::rules::{NotNullRule, RowCountRule, RuleDescriptor};
    use serde_json::json;

    #[test]
    fn test_rule_engine_collects_results_for_rules() {
        let b = batch(vec![json!({"id": 1, "name": "alpha"}), json!({"id": 2, "name": null})]);

        let engine = SimpleRuleEngine::new(vec![Box::new(NotNullRule::new("name"))]);
        let results = engine.validate(&b);

        assert_eq!(results.len(), 1);
        assert!(!results[0].passed);
    }

    #[test]
    fn test_results_follow_registration_order() {
        let mut engine = SimpleRuleEngine::default();
        engine.register_rules(vec![Box::new(NotNullRule::with_descriptor("id", RuleDescriptor::new("first")))]);
        engine.register_rules(vec![Box::new(RowCountRule::new(Some(1), None, RuleDescriptor::new("second")))]);

        let results = engine.validate(&batch(vec![json!({"id": 1})]));
        let ids: Vec<&str> = results.iter().map(|r| r.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
        assert_eq!(engine.rule_count(), 2);
        assert_eq!(engine.rules()[1].rule_id(), "second");
        assert_eq!(engine.metadata().get("rule_count").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_rules_scoped_to_other_sources_are_skipped() {
        let scoped = RuleDescriptor::new("orders-only").with_sources(vec!["orders".to_string()]);
        let engine = SimpleRuleEngine::new(vec![Box::new(NotNullRule::with_descriptor("id", scoped))]);

        assert!(engine.validate(&batch_from("customers", vec![json!({})])).is_empty());
        assert_eq!(engine.validate(&batch_from("orders", vec![json!({})])).len(), 1);
    }
}
