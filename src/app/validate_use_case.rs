use anyhow::Result;
use chrono::Utc;
use std::time::Instant;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::app::ports::ValidationOutputPort;
use crate::app::rule_engine::SimpleRuleEngine;
use crate::app::rule_spec_loader::{RuleSpec, RuleSpecError};
use crate::domain::{DataBatch, DataSource, RuleEngine, ValidationResult};
use crate::observability::metrics;
use crate::report::ValidationReport;

/// Use case for running a data source through the rule engine and routing
/// results to outputs
pub struct ValidateUseCase {
    engine: Box<dyn RuleEngine>,
    passed_output: Box<dyn ValidationOutputPort>,
    failed_output: Box<dyn ValidationOutputPort>,
    spec_version: String,
}

impl ValidateUseCase {
    pub fn new(
        engine: Box<dyn RuleEngine>,
        passed_output: Box<dyn ValidationOutputPort>,
        failed_output: Box<dyn ValidationOutputPort>,
    ) -> Self {
        Self {
            engine,
            passed_output,
            failed_output,
            spec_version: "unversioned".to_string(),
        }
    }

    /// Build the engine from a rule spec
    pub fn from_spec(
        spec: &RuleSpec,
        sample_limit: usize,
        passed_output: Box<dyn ValidationOutputPort>,
        failed_output: Box<dyn ValidationOutputPort>,
    ) -> std::result::Result<Self, RuleSpecError> {
        let engine = SimpleRuleEngine::new(spec.build_rules(sample_limit)?);
        Ok(Self::new(Box::new(engine), passed_output, failed_output).with_spec_version(&spec.version))
    }

    pub fn with_spec_version(mut self, version: impl Into<String>) -> Self {
        self.spec_version = version.into();
        self
    }

    /// Validate one batch and route each result to its output
    pub async fn validate_batch(&self, batch: &DataBatch) -> Result<Vec<ValidationResult>> {
        let started = Instant::now();
        let results = self.engine.validate(batch);
        metrics::validation::batch_validated(started.elapsed().as_secs_f64());

        for result in &results {
            metrics::validation::result_recorded(result);

            if result.passed {
                self.passed_output.write_result(result).await?;
            } else {
                warn!(
                    rule_id = %result.rule_id,
                    batch_id = %result.batch_id,
                    severity = %result.severity,
                    failed = result.failed_count,
                    "{}",
                    result.message.as_deref().unwrap_or("validation failed")
                );
                self.failed_output.write_result(result).await?;
            }
        }

        Ok(results)
    }

    /// Fetch batches from the source, validate each, and summarize the run
    pub async fn run(&self, source: &dyn DataSource, limit: Option<usize>) -> Result<ValidationReport> {
        let run_id = Uuid::new_v4();
        let span = info_span!("validation_run", run_id = %run_id, source = source.name());

        async move {
            let started_at = Utc::now();
            info!(rules = ?self.engine.metadata(), "Starting validation run");

            let batches = match source.fetch_batches(limit).await {
                Ok(batches) => batches,
                Err(e) => {
                    metrics::sources::fetch_error(source.name());
                    return Err(anyhow::Error::new(e)
                        .context(format!("failed to fetch batches from '{}'", source.name())));
                }
            };

            let mut results = Vec::new();
            let mut record_count = 0;

            for batch in &batches {
                metrics::sources::batch_fetched(source.name(), batch.len());
                record_count += batch.len();
                results.extend(self.validate_batch(batch).await?);
            }

            self.passed_output.flush().await?;
            self.failed_output.flush().await?;

            let report = ValidationReport {
                run_id,
                spec_version: self.spec_version.clone(),
                source_name: source.name().to_string(),
                started_at,
                finished_at: Utc::now(),
                batch_count: batches.len(),
                record_count,
                results,
            };

            let status = report.health_status();
            metrics::validation::run_completed(source.name(), status.as_str(), report.pass_rate());
            info!(
                batches = report.batch_count,
                records = report.record_count,
                passed = report.passed_count(),
                failed = report.failed_count(),
                status = status.as_str(),
                "Validation run finished"
            );

            Ok(report)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::rule_spec_loader::parse_rule_spec;
    use crate::domain::{BatchSchema, Record};
    use crate::infra::{InMemoryDataSource, InMemoryValidationOutputAdapter};
    use crate::report::HealthStatus;
    use crate::rules::NotNullRule;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    /// Shares one in-memory adapter between the use case and the test
    struct SharedOutput(Arc<InMemoryValidationOutputAdapter>);

    #[async_trait]
    impl ValidationOutputPort for SharedOutput {
        async fn write_result(&self, result: &ValidationResult) -> anyhow::Result<()> {
            self.0.write_result(result).await
        }
    }

    fn records(values: Vec<serde_json::Value>) -> Vec<Record> {
        values.into_iter().map(|v| v.as_object().cloned().unwrap()).collect()
    }

    #[tokio::test]
    async fn test_routes_results_by_outcome() {
        let passed = Arc::new(InMemoryValidationOutputAdapter::new());
        let failed = Arc::new(InMemoryValidationOutputAdapter::new());

        let engine = SimpleRuleEngine::new(vec![
            Box::new(NotNullRule::with_descriptor("id", crate::rules::RuleDescriptor::new("id-present"))),
            Box::new(NotNullRule::with_descriptor("name", crate::rules::RuleDescriptor::new("name-present"))),
        ]);
        let use_case = ValidateUseCase::new(
            Box::new(engine),
            Box::new(SharedOutput(passed.clone())),
            Box::new(SharedOutput(failed.clone())),
        );

        let source = InMemoryDataSource::new(
            "people",
            records(vec![json!({"id": 1, "name": "alpha"}), json!({"id": 2, "name": null})]),
            BatchSchema::new(["id", "name"]),
        );

        let report = use_case.run(&source, None).await.unwrap();
        assert_eq!(report.batch_count, 1);
        assert_eq!(report.record_count, 2);
        assert_eq!(report.health_status(), HealthStatus::Unhealthy);

        let passed = passed.results();
        let failed = failed.results();
        assert_eq!(passed.len(), 1);
        assert_eq!(passed[0].rule_id, "id-present");
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].message.as_deref(), Some("Nulls found for 'name'."));
    }

    #[tokio::test]
    async fn test_from_spec_builds_engine_and_version() {
        let spec = parse_rule_spec(
            "version: 3\ndata_source: people\nvalidations:\n  - type: not_null\n    field: id\n    severity: warning\n",
        )
        .unwrap();
        let use_case = ValidateUseCase::from_spec(
            &spec,
            5,
            Box::new(InMemoryValidationOutputAdapter::new()),
            Box::new(InMemoryValidationOutputAdapter::new()),
        )
        .unwrap();

        let source = InMemoryDataSource::new("people", records(vec![json!({})]), BatchSchema::default());
        let report = use_case.run(&source, None).await.unwrap();

        assert_eq!(report.spec_version, "3");
        assert_eq!(report.health_status(), HealthStatus::Degraded);
    }

    #[tokio::test]
    async fn test_source_errors_are_propagated() {
        let use_case = ValidateUseCase::new(
            Box::new(SimpleRuleEngine::default()),
            Box::new(InMemoryValidationOutputAdapter::new()),
            Box::new(InMemoryValidationOutputAdapter::new()),
        );
        let source = crate::infra::CsvDataSource::new("ghost", "/no/such/file.csv");

        let err = use_case.run(&source, None).await.unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }
}
