use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::constants::IN_MEMORY_BATCH_ID;
use crate::domain::{BatchSchema, DataBatch, DataSource, Record};
use crate::error::Result;

/// Data source that serves a single in-memory batch, for tests and embedding
pub struct InMemoryDataSource {
    name: String,
    records: Vec<Record>,
    schema: BatchSchema,
    batch_id: String,
}

impl InMemoryDataSource {
    pub fn new(name: impl Into<String>, records: Vec<Record>, schema: BatchSchema) -> Self {
        Self {
            name: name.into(),
            records,
            schema,
            batch_id: IN_MEMORY_BATCH_ID.to_string(),
        }
    }

    pub fn with_batch_id(mut self, batch_id: impl Into<String>) -> Self {
        self.batch_id = batch_id.into();
        self
    }
}

#[async_trait]
impl DataSource for InMemoryDataSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_batches(&self, limit: Option<usize>) -> Result<Vec<DataBatch>> {
        let batch = DataBatch::new(&self.batch_id, &self.name, self.records.clone(), self.schema.clone());
        let mut batches = vec![batch];
        if let Some(limit) = limit {
            batches.truncate(limit);
        }
        Ok(batches)
    }

    fn metadata(&self) -> BTreeMap<String, String> {
        let mut metadata = BTreeMap::new();
        metadata.insert("batch_id".to_string(), self.batch_id.clone());
        metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source() -> InMemoryDataSource {
        let records = vec![
            json!({"id": 1, "name": "alpha"}).as_object().cloned().unwrap(),
            json!({"id": 2, "name": "beta"}).as_object().cloned().unwrap(),
        ];
        InMemoryDataSource::new("test-source", records, BatchSchema::new(["id", "name"]))
    }

    #[tokio::test]
    async fn test_serves_single_batch() {
        let batches = source().fetch_batches(None).await.unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].batch_id(), "in-memory-batch");
        assert_eq!(batches[0].source_name(), "test-source");
        assert_eq!(batches[0].metadata()["record_count"], "2");
        assert!(batches[0].schema().contains("name"));
    }

    #[tokio::test]
    async fn test_limit_zero_returns_nothing() {
        assert!(source().fetch_batches(Some(0)).await.unwrap().is_empty());
    }

    #[test]
    fn test_metadata_names_batch() {
        let s = source().with_batch_id("fixed");
        assert_eq!(s.metadata().get("batch_id").map(String::as_str), Some("fixed"));
    }
}
