// Observability: metrics for the validation pipeline

pub mod metrics;

pub use metrics::init_metrics;
