use async_trait::async_trait;

use crate::domain::ValidationResult;

/// Sink for validation results leaving the engine
#[async_trait]
pub trait ValidationOutputPort: Send + Sync {
    async fn write_result(&self, result: &ValidationResult) -> anyhow::Result<()>;

    /// Flush anything buffered; called once per run
    async fn flush(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
