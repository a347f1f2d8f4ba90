use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use uuid::Uuid;

use crate::domain::{Severity, ValidationResult};

/// Overall health verdict for a validation run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// Every rule passed
    Healthy,
    /// Only info/warning rules failed
    Degraded,
    /// At least one error or critical rule failed
    Unhealthy,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Unhealthy => "unhealthy",
        }
    }
}

/// Everything a single validation run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub run_id: Uuid,
    pub spec_version: String,
    pub source_name: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub batch_count: usize,
    pub record_count: usize,
    pub results: Vec<ValidationResult>,
}

impl ValidationReport {
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.len() - self.passed_count()
    }

    /// Share of passing results as a percentage
    pub fn pass_rate(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        self.passed_count() as f64 / self.results.len() as f64 * 100.0
    }

    pub fn failures_by_severity(&self) -> BTreeMap<Severity, usize> {
        let mut counts = BTreeMap::new();
        for result in self.results.iter().filter(|r| !r.passed) {
            *counts.entry(result.severity).or_insert(0) += 1;
        }
        counts
    }

    pub fn health_status(&self) -> HealthStatus {
        let failures = self.failures_by_severity();
        if failures.keys().any(|s| *s >= Severity::Error) {
            HealthStatus::Unhealthy
        } else if !failures.is_empty() {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }

    pub fn failed_results(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    /// Pretty JSON including the derived summary figures
    pub fn to_json(&self) -> serde_json::Result<String> {
        let document = ReportDocument {
            status: self.health_status(),
            passed: self.passed_count(),
            failed: self.failed_count(),
            pass_rate: self.pass_rate(),
            duration_ms: self.duration_ms(),
            report: self,
        };
        serde_json::to_string_pretty(&document)
    }

    /// Human-readable summary
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let status_icon = match self.health_status() {
            HealthStatus::Healthy => "✅",
            HealthStatus::Degraded => "⚠️ ",
            HealthStatus::Unhealthy => "❌",
        };

        // Writing to a String cannot fail
        let _ = writeln!(out, "\n📊 Data health report for {} (spec v{})", self.source_name, self.spec_version);
        let _ = writeln!(out, "   Run: {} ({} ms)", self.run_id, self.duration_ms());
        let _ = writeln!(out, "   Batches: {}", self.batch_count);
        let _ = writeln!(out, "   Records: {}", self.record_count);
        let _ = writeln!(
            out,
            "   Checks: {} passed, {} failed ({:.1}% pass rate)",
            self.passed_count(),
            self.failed_count(),
            self.pass_rate()
        );
        let _ = writeln!(out, "   Status: {} {}", status_icon, self.health_status().as_str());

        if self.failed_count() > 0 {
            let _ = writeln!(out, "\n   Failures:");
            for result in self.failed_results() {
                let _ = writeln!(
                    out,
                    "   - [{}] {} on {}: {} ({} of {} records; sample rows {:?})",
                    result.severity,
                    result.rule_id,
                    result.batch_id,
                    result.message.as_deref().unwrap_or("failed"),
                    result.failed_count,
                    result.checked_count,
                    result.sample_rows
                );
            }
        }

        out
    }
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    status: HealthStatus,
    passed: usize,
    failed: usize,
    pass_rate: f64,
    duration_ms: i64,
    #[serde(flatten)]
    report: &'a ValidationReport,
}
