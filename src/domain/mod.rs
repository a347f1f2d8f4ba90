//! Core data shapes and the traits that sit between pipeline stages.
//!
//! A [`DataSource`] yields [`DataBatch`]es, a [`RuleEngine`] runs
//! [`ValidationRule`]s over each batch, and every rule produces
//! [`ValidationResult`]s for reporting.

pub mod batch;
pub mod engine;
pub mod result;
pub mod rule;
pub mod source;

pub use batch::{is_null, BatchSchema, DataBatch, Record};
pub use engine::RuleEngine;
pub use result::{Severity, ValidationResult};
pub use rule::ValidationRule;
pub use source::DataSource;
