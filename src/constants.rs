// Rule type identifiers, as written in the `type:` key of a rule spec entry
pub const RULE_NOT_NULL: &str = "not_null";
pub const RULE_UNIQUE: &str = "unique";
pub const RULE_RANGE: &str = "range";
pub const RULE_PATTERN: &str = "pattern";
pub const RULE_ALLOWED_VALUES: &str = "allowed_values";
pub const RULE_ROW_COUNT: &str = "row_count";

/// All built-in rule types with a short summary, in display order
pub const SUPPORTED_RULES: &[(&str, &str)] = &[
    (RULE_NOT_NULL, "field must be present and non-null in every record"),
    (RULE_UNIQUE, "non-null field values must not repeat within a batch (typed: 1 and \"1\" differ)"),
    (RULE_RANGE, "numeric field values must fall within min/max (inclusive)"),
    (RULE_PATTERN, "field values must match a regular expression"),
    (RULE_ALLOWED_VALUES, "field values must be one of a fixed set (compared as text: 1 matches \"1\")"),
    (RULE_ROW_COUNT, "batch record count must fall within min/max"),
];

// Source connector kinds accepted in config
pub const SOURCE_KIND_CSV: &str = "csv";
pub const SOURCE_KIND_JSONL: &str = "jsonl";

pub const IN_MEMORY_BATCH_ID: &str = "in-memory-batch";

// Defaults
pub const DEFAULT_CONFIG_PATH: &str = "data-health.toml";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_SAMPLE_LIMIT: usize = 5;

// Output file names within the output directory
pub const PASSED_RESULTS_FILE: &str = "passed.ndjson";
pub const FAILED_RESULTS_FILE: &str = "failed.ndjson";

// Environment variables
pub const ENV_CONFIG_PATH: &str = "DATA_HEALTH_CONFIG";
pub const ENV_METRICS_ADDR: &str = "DATA_HEALTH_METRICS_ADDR";
