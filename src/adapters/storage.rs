use crate::domain::ports::Storage;
use crate::utils::error::{InventoryError, Result};
use std::io::ErrorKind;
use std::path::PathBuf;

/// Files relative to a working directory on local disk.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

fn not_found_or_io(err: std::io::Error, path: &str) -> InventoryError {
    if err.kind() == ErrorKind::NotFound {
        InventoryError::NotFound {
            path: path.to_string(),
        }
    } else {
        InventoryError::IoError(err)
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.locate(path);
        tracing::debug!("Reading {}", full_path.display());
        tokio::fs::read(&full_path)
            .await
            .map_err(|e| not_found_or_io(e, path))
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.locate(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tracing::debug!("Writing {} bytes to {}", data.len(), full_path.display());
        tokio::fs::write(full_path, data).await?;
        Ok(())
    }

    async fn list_files(&self, extension: Option<&str>) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.base_path)
            .await
            .map_err(|e| not_found_or_io(e, &self.base_path.to_string_lossy()))?;

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let is_file = tokio::fs::metadata(entry.path())
                .await
                .map(|meta| meta.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if extension.is_none_or(|ext| name.ends_with(ext)) {
                files.push(name);
            }
        }

        files.sort();
        Ok(files)
    }

    fn locate(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}
