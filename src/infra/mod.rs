pub mod batching;
pub mod csv_data_source;
pub mod in_memory_data_source;
pub mod jsonl_data_source;
pub mod source_registry;
pub mod validation_output_adapter;

pub use csv_data_source::CsvDataSource;
pub use in_memory_data_source::InMemoryDataSource;
pub use jsonl_data_source::JsonLinesDataSource;
pub use source_registry::{build_source, source_for_path, SourceRegistry};
pub use validation_output_adapter::{FileValidationOutputAdapter, InMemoryValidationOutputAdapter};
