use async_trait::async_trait;
use std::collections::BTreeMap;

use super::DataBatch;
use crate::error::Result;

/// A logical source of data batches for validation.
///
/// Implementations encapsulate where the data lives and how it is read; the
/// rest of the pipeline only ever sees [`DataBatch`]es.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Human-readable identifier for the source
    fn name(&self) -> &str;

    /// Batches available for validation, capped at `limit` batches when given
    async fn fetch_batches(&self, limit: Option<usize>) -> Result<Vec<DataBatch>>;

    /// Descriptive metadata about the source
    fn metadata(&self) -> BTreeMap<String, String>;
}
