use sha2::{Digest, Sha256};
use std::path::Path;

use crate::domain::{BatchSchema, DataBatch, Record};

/// Split records into batches of `batch_size` (all in one batch when `None`
/// or zero), capped at `limit` batches. An empty input still yields one empty
/// batch so batch-level rules see it.
pub fn split_into_batches(
    source_name: &str,
    records: Vec<Record>,
    schema: &BatchSchema,
    batch_size: Option<usize>,
    limit: Option<usize>,
) -> Vec<DataBatch> {
    let size = batch_size.filter(|s| *s > 0).unwrap_or(records.len().max(1));
    let max_batches = limit.unwrap_or(usize::MAX);

    let mut batches = Vec::new();
    let mut remaining = records.into_iter().peekable();
    let mut index = 0;

    while batches.len() < max_batches {
        let chunk: Vec<Record> = remaining.by_ref().take(size).collect();
        if chunk.is_empty() && index > 0 {
            break;
        }
        batches.push(DataBatch::new(
            format!("{}-{:04}", source_name, index),
            source_name,
            chunk,
            schema.clone(),
        ));
        index += 1;
        if remaining.peek().is_none() {
            break;
        }
    }

    batches
}

/// Hex-encoded SHA-256 of the source file contents
pub fn checksum(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Attach the file provenance every file-backed batch carries
pub fn with_file_metadata(batches: Vec<DataBatch>, path: &Path, checksum: &str) -> Vec<DataBatch> {
    let path = path.display().to_string();
    batches
        .into_iter()
        .map(|b| {
            b.with_metadata("source_path", path.clone())
                .with_metadata("source_checksum", checksum.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| json!({ "i": i }).as_object().cloned().unwrap())
            .collect()
    }

    #[test]
    fn test_single_batch_without_size() {
        let batches = split_into_batches("s", records(5), &BatchSchema::default(), None, None);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 5);
        assert_eq!(batches[0].batch_id(), "s-0000");
    }

    #[test]
    fn test_batches_are_split_and_limited() {
        let batches = split_into_batches("s", records(5), &BatchSchema::default(), Some(2), None);
        let sizes: Vec<usize> = batches.iter().map(DataBatch::len).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(batches[2].batch_id(), "s-0002");

        let limited = split_into_batches("s", records(5), &BatchSchema::default(), Some(2), Some(2));
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn test_empty_input_yields_one_empty_batch() {
        let batches = split_into_batches("s", Vec::new(), &BatchSchema::default(), Some(10), None);
        assert_eq!(batches.len(), 1);
        assert!(batches[0].is_empty());
    }

    #[test]
    fn test_zero_limit_yields_nothing() {
        assert!(split_into_batches("s", records(3), &BatchSchema::default(), None, Some(0)).is_empty());
    }

    #[test]
    fn test_checksum_is_sha256_hex() {
        assert_eq!(
            checksum(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
