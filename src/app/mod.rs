pub mod ports;
pub mod rule_engine;
pub mod rule_spec_loader;
pub mod validate_use_case;
