use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::{CsvDataSource, JsonLinesDataSource};
use crate::config::SourceConfig;
use crate::constants::{SOURCE_KIND_CSV, SOURCE_KIND_JSONL};
use crate::domain::DataSource;
use crate::error::{HealthError, Result};

/// Named connectors built from config
#[derive(Clone, Default)]
pub struct SourceRegistry {
    sources: HashMap<String, Arc<dyn DataSource>>,
}

impl SourceRegistry {
    pub fn from_configs(configs: &[SourceConfig]) -> Result<Self> {
        let mut registry = Self::default();
        for config in configs {
            let source = build_source(&config.name, &config.kind, &config.path, config.batch_size)?;
            registry.register(source);
        }
        Ok(registry)
    }

    pub fn register(&mut self, source: Arc<dyn DataSource>) {
        self.sources.insert(source.name().to_string(), source);
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn DataSource>> {
        self.sources
            .get(name)
            .cloned()
            .ok_or_else(|| HealthError::UnknownSource(name.to_string()))
    }

    /// Registered source names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

pub fn build_source(name: &str, kind: &str, path: &Path, batch_size: Option<usize>) -> Result<Arc<dyn DataSource>> {
    match kind {
        SOURCE_KIND_CSV => Ok(Arc::new(CsvDataSource::new(name, path).with_batch_size(batch_size))),
        SOURCE_KIND_JSONL => Ok(Arc::new(JsonLinesDataSource::new(name, path).with_batch_size(batch_size))),
        other => Err(HealthError::Config(format!("unsupported source kind '{}'", other))),
    }
}

/// Connector for an ad-hoc input file, kind chosen by extension
pub fn source_for_path(name: &str, path: &Path, batch_size: Option<usize>) -> Result<Arc<dyn DataSource>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let kind = match extension.as_str() {
        "csv" => SOURCE_KIND_CSV,
        "jsonl" | "ndjson" => SOURCE_KIND_JSONL,
        _ => {
            return Err(HealthError::Config(format!(
                "cannot infer source kind from '{}' (expected .csv, .jsonl or .ndjson)",
                path.display()
            )))
        }
    };
    build_source(name, kind, path, batch_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_registry_resolves_configured_sources() {
        let configs = vec![
            SourceConfig {
                name: "orders".to_string(),
                kind: "csv".to_string(),
                path: PathBuf::from("orders.csv"),
                batch_size: None,
            },
            SourceConfig {
                name: "events".to_string(),
                kind: "jsonl".to_string(),
                path: PathBuf::from("events.jsonl"),
                batch_size: Some(10),
            },
        ];

        let registry = SourceRegistry::from_configs(&configs).unwrap();
        assert_eq!(registry.names(), vec!["events", "orders"]);
        assert_eq!(registry.get("events").unwrap().metadata()["kind"], "jsonl");
        assert!(matches!(registry.get("nope"), Err(HealthError::UnknownSource(_))));
    }

    #[test]
    fn test_kind_inferred_from_extension() {
        let csv = source_for_path("a", Path::new("data/a.CSV"), None).unwrap();
        assert_eq!(csv.metadata()["kind"], "csv");

        let jsonl = source_for_path("b", Path::new("b.ndjson"), None).unwrap();
        assert_eq!(jsonl.metadata()["kind"], "jsonl");

        assert!(source_for_path("c", Path::new("c.parquet"), None).is_err());
    }
}
