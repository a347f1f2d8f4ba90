//! Data Health Engine: rule-based validation of tabular data.
//!
//! Sources yield standardized batches, the rule engine validates each batch
//! against rules loaded from a YAML spec, and results roll up into a health
//! report.

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod report;

// Domain data shapes and the traits between stages
pub mod domain;
pub mod rules;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;

pub mod observability;

pub use app::rule_engine::SimpleRuleEngine;
pub use app::rule_spec_loader::{load_rule_spec, parse_rule_spec, RuleSpec, RuleSpecError};
pub use app::validate_use_case::ValidateUseCase;
pub use domain::{DataBatch, DataSource, RuleEngine, Severity, ValidationResult, ValidationRule};
pub use error::{HealthError, Result};
pub use report::{HealthStatus, ValidationReport};
