use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

use super::batching::{checksum, split_into_batches, with_file_metadata};
use crate::constants::SOURCE_KIND_JSONL;
use crate::domain::{BatchSchema, DataBatch, DataSource, Record};
use crate::error::{HealthError, Result};

/// Reads newline-delimited JSON: one object per non-blank line
pub struct JsonLinesDataSource {
    name: String,
    path: PathBuf,
    batch_size: Option<usize>,
}

impl JsonLinesDataSource {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            batch_size: None,
        }
    }

    pub fn with_batch_size(mut self, batch_size: Option<usize>) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Schema is the union of keys, in first-seen order. Lines must be UTF-8;
    /// errors name the 1-based file line.
    fn read_records(bytes: &[u8]) -> Result<(BatchSchema, Vec<Record>)> {
        let mut fields: Vec<String> = Vec::new();
        let mut records = Vec::new();

        for (index, raw) in bytes.split(|b| *b == b'\n').enumerate() {
            let line_number = index + 1;
            let line = std::str::from_utf8(raw).map_err(|e| HealthError::Source {
                message: format!("line {} is not valid UTF-8: {}", line_number, e),
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let value: Value = serde_json::from_str(line).map_err(|e| HealthError::Source {
                message: format!("line {} is not valid JSON: {}", line_number, e),
            })?;
            let record = match value {
                Value::Object(map) => map,
                _ => {
                    return Err(HealthError::Source {
                        message: format!("line {} is not a JSON object", line_number),
                    })
                }
            };
            for key in record.keys() {
                if !fields.contains(key) {
                    fields.push(key.clone());
                }
            }
            records.push(record);
        }

        Ok((BatchSchema::new(fields), records))
    }
}

#[async_trait]
impl DataSource for JsonLinesDataSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_batches(&self, limit: Option<usize>) -> Result<Vec<DataBatch>> {
        debug!(path = %self.path.display(), "Reading JSON lines source");
        let bytes = tokio::fs::read(&self.path).await?;
        let digest = checksum(&bytes);
        let (schema, records) = Self::read_records(&bytes)?;

        info!(source = %self.name, records = records.len(), "Loaded JSON lines records");
        let batches = split_into_batches(&self.name, records, &schema, self.batch_size, limit);
        Ok(with_file_metadata(batches, &self.path, &digest))
    }

    fn metadata(&self) -> BTreeMap<String, String> {
        let mut metadata = BTreeMap::new();
        metadata.insert("kind".to_string(), SOURCE_KIND_JSONL.to_string());
        metadata.insert("path".to_string(), self.path.display().to_string());
        if let Some(size) = self.batch_size {
            metadata.insert("batch_size".to_string(), size.to_string());
        }
        metadata
    }
}
