use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

use super::batching::{checksum, split_into_batches, with_file_metadata};
use crate::constants::SOURCE_KIND_CSV;
use crate::domain::{BatchSchema, DataBatch, DataSource, Record};
use crate::error::Result;

/// Reads a headed CSV file. Blank cells become null; every other cell is kept
/// as a string and rules coerce as they need.
pub struct CsvDataSource {
    name: String,
    path: PathBuf,
    batch_size: Option<usize>,
}

impl CsvDataSource {
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

    fn read_records(bytes: &[u8]) -> Result<(BatchSchema, Vec<Record>)> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut records = Vec::new();

        for row in reader.records() {
            let row = row?;
            let record: Record = headers
                .iter()
                .zip(row.iter())
                .map(|(header, cell)| {
                    let value = if cell.is_empty() {
                        Value::Null
                    } else {
                        Value::String(cell.to_string())
                    };
                    (header.clone(), value)
                })
                .collect();
            records.push(record);
        }

        Ok((BatchSchema::new(headers), records))
    }
}

#[async_trait]
impl DataSource for CsvDataSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_batches(&self, limit: Option<usize>) -> Result<Vec<DataBatch>> {
        debug!(path = %self.path.display(), "Reading CSV source");
        let bytes = tokio::fs::read(&self.path).await?;
        let digest = checksum(&bytes);
        let (schema, records) = Self::read_records(&bytes)?;

        info!(source = %self.name, records = records.len(), "Loaded CSV records");
        let batches = split_into_batches(&self.name, records, &schema, self.batch_size, limit);
        Ok(with_file_metadata(batches, &self.path, &digest))
    }

    fn metadata(&self) -> BTreeMap<String, String> {
        let mut metadata = BTreeMap::new();
        metadata.insert("kind".to_string(), SOURCE_KIND_CSV.to_string());
        metadata.insert("path".to_string(), self.path.display().to_string());
        if let Some(size) = self.batch_size {
            metadata.insert("batch_size".to_string(), size.to_string());
        }
        metadata
    }
}
