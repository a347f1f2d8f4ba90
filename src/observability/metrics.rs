//! Metrics for the data health pipeline
//!
//! Metric names live in one enum so recording sites never use magic strings.
//! Without an installed recorder every call is a no-op, so library users and
//! tests pay nothing.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Once;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Source metrics
    SourceBatchesFetched,
    SourceRecordsFetched,
    SourceFetchErrors,

    // Validation metrics
    ValidationResultsPassed,
    ValidationResultsFailed,
    ValidationFailedRecords,
    ValidationBatchDuration,
    ValidationRunsCompleted,
    ValidationPassRate,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::SourceBatchesFetched => "data_health_source_batches_fetched_total",
            MetricName::SourceRecordsFetched => "data_health_source_records_fetched_total",
            MetricName::SourceFetchErrors => "data_health_source_fetch_errors_total",
            MetricName::ValidationResultsPassed => "data_health_validation_results_passed_total",
            MetricName::ValidationResultsFailed => "data_health_validation_results_failed_total",
            MetricName::ValidationFailedRecords => "data_health_validation_failed_records_total",
            MetricName::ValidationBatchDuration => "data_health_validation_batch_duration_seconds",
            MetricName::ValidationRunsCompleted => "data_health_validation_runs_completed_total",
            MetricName::ValidationPassRate => "data_health_validation_pass_rate",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static INIT: Once = Once::new();

/// Install the Prometheus exporter listening on `addr`. Idempotent.
pub fn init_metrics(addr: SocketAddr) {
    INIT.call_once(|| {
        let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
        match builder.install() {
            Ok(()) => info!("Prometheus exporter listening on http://{}/metrics", addr),
            Err(e) => warn!("Prometheus exporter install failed: {}", e),
        }
    });
}

pub mod sources {
    use super::MetricName;

    pub fn batch_fetched(source: &str, records: usize) {
        ::metrics::counter!(MetricName::SourceBatchesFetched.as_str(), "source" => source.to_string()).increment(1);
        ::metrics::counter!(MetricName::SourceRecordsFetched.as_str(), "source" => source.to_string())
            .increment(records as u64);
    }

    pub fn fetch_error(source: &str) {
        ::metrics::counter!(MetricName::SourceFetchErrors.as_str(), "source" => source.to_string()).increment(1);
    }
}

pub mod validation {
    use ::metrics::Label;

    use super::MetricName;
    use crate::domain::ValidationResult;

    pub fn result_recorded(result: &ValidationResult) {
        let labels = vec![
            Label::new("rule_id", result.rule_id.clone()),
            Label::new("severity", result.severity.to_string()),
        ];
        if result.passed {
            ::metrics::counter!(MetricName::ValidationResultsPassed.as_str(), labels).increment(1);
        } else {
            ::metrics::counter!(MetricName::ValidationResultsFailed.as_str(), labels.clone()).increment(1);
            ::metrics::counter!(MetricName::ValidationFailedRecords.as_str(), labels)
                .increment(result.failed_count as u64);
        }
    }

    pub fn batch_validated(seconds: f64) {
        ::metrics::histogram!(MetricName::ValidationBatchDuration.as_str()).record(seconds);
    }

    pub fn run_completed(source: &str, status: &str, pass_rate: f64) {
        ::metrics::counter!(
            MetricName::ValidationRunsCompleted.as_str(),
            "source" => source.to_string(),
            "status" => status.to_string()
        )
        .increment(1);
        ::metrics::gauge!(MetricName::ValidationPassRate.as_str(), "source" => source.to_string()).set(pass_rate);
    }
}
