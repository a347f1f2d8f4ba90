use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

use crate::app::ports::ValidationOutputPort;
use crate::domain::ValidationResult;

/// File-based implementation of ValidationOutputPort.
/// Writes validation results to an NDJSON file, one result per line.
pub struct FileValidationOutputAdapter {
    file_writer: Mutex<BufWriter<File>>,
    file_path: PathBuf,
}

impl FileValidationOutputAdapter {
    pub fn new(file_path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let file_path = file_path.as_ref().to_path_buf();
        if let Some(dir) = file_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }

        info!("Creating validation output file: {}", file_path.display());

        let file_writer = BufWriter::new(
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&file_path)?,
        );

        Ok(Self {
            file_writer: Mutex::new(file_writer),
            file_path,
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

#[async_trait::async_trait]
impl ValidationOutputPort for FileValidationOutputAdapter {
    async fn write_result(&self, result: &ValidationResult) -> anyhow::Result<()> {
        let json_line = serde_json::to_string(result)?;

        let mut writer = self
            .file_writer
            .lock()
            .map_err(|_| anyhow::anyhow!("output writer lock poisoned"))?;
        writeln!(writer, "{}", json_line)?;
        Ok(())
    }

    async fn flush(&self) -> anyhow::Result<()> {
        let mut writer = self
            .file_writer
            .lock()
            .map_err(|_| anyhow::anyhow!("output writer lock poisoned"))?;
        writer.flush()?;
        Ok(())
    }
}

/// Keeps results in memory; useful when embedding the engine
#[derive(Default)]
pub struct InMemoryValidationOutputAdapter {
    results: Mutex<Vec<ValidationResult>>,
}

impl InMemoryValidationOutputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> Vec<ValidationResult> {
        self.results.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl ValidationOutputPort for InMemoryValidationOutputAdapter {
    async fn write_result(&self, result: &ValidationResult) -> anyhow::Result<()> {
        self.results
            .lock()
            .map_err(|_| anyhow::anyhow!("output lock poisoned"))?
            .push(result.clone());
        Ok(())
    }
}
