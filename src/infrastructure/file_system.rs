use crate::core::interfaces::FileSystemService;
use crate::utils::Result;
use async_trait::async_trait;
use std::path::Path;

/// Tokio-backed file system service used outside of tests.
pub struct TokioFileSystemService;

impl TokioFileSystemService {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TokioFileSystemService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileSystemService for TokioFileSystemService {
    async fn read_file(&self, path: &Path) -> Result<String> {
        Ok(tokio::fs::read_to_string(path).await?)
    }

    async fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.create_directory(parent).await?;
            }
        }
        Ok(tokio::fs::write(path, content).await?)
    }

    async fn create_directory(&self, path: &Path) -> Result<()> {
        Ok(tokio::fs::create_dir_all(path).await?)
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
