use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A single record: field name to JSON value
pub type Record = serde_json::Map<String, Value>;

/// Field names known for a batch, in source order. Empty when the source
/// cannot describe its shape up front.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSchema {
    pub fields: Vec<String>,
}

impl BatchSchema {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A bounded set of records read from one source, in the standardized shape
/// every rule works against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataBatch {
    batch_id: String,
    source_name: String,
    records: Vec<Record>,
    schema: BatchSchema,
    extra_metadata: BTreeMap<String, String>,
}

impl DataBatch {
    pub fn new(
        batch_id: impl Into<String>,
        source_name: impl Into<String>,
        records: Vec<Record>,
        schema: BatchSchema,
    ) -> Self {
        Self {
            batch_id: batch_id.into(),
            source_name: source_name.into(),
            records,
            schema,
            extra_metadata: BTreeMap::new(),
        }
    }

    /// Attach a connector-provided metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_metadata.insert(key.into(), value.into());
        self
    }

    pub fn batch_id(&self) -> &str {
        &self.batch_id
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn schema(&self) -> &BatchSchema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Batch metadata; always carries `record_count`
    pub fn metadata(&self) -> BTreeMap<String, String> {
        let mut metadata = self.extra_metadata.clone();
        metadata.insert("record_count".to_string(), self.records.len().to_string());
        metadata
    }
}

/// A field is null when it is absent from the record or holds JSON null
pub fn is_null(record: &Record, field: &str) -> bool {
    matches!(record.get(field), None | Some(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_metadata_reports_record_count() {
        let batch = DataBatch::new(
            "b-1",
            "orders",
            vec![record(json!({"id": 1})), record(json!({"id": 2}))],
            BatchSchema::new(["id"]),
        )
        .with_metadata("source_path", "orders.csv");

        let metadata = batch.metadata();
        assert_eq!(metadata.get("record_count").map(String::as_str), Some("2"));
        assert_eq!(metadata.get("source_path").map(String::as_str), Some("orders.csv"));
    }

    #[test]
    fn test_record_count_cannot_be_overridden() {
        let batch = DataBatch::new("b-1", "orders", Vec::new(), BatchSchema::default())
            .with_metadata("record_count", "99");

        assert_eq!(batch.metadata()["record_count"], "0");
    }

    #[test]
    fn test_is_null_treats_missing_and_null_alike() {
        let r = record(json!({"a": null, "b": 0, "c": ""}));
        assert!(is_null(&r, "a"));
        assert!(is_null(&r, "missing"));
        assert!(!is_null(&r, "b"));
        assert!(!is_null(&r, "c"));
    }
}
