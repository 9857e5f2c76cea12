// Local filesystem adapter - File system operations via tokio::fs

use std::io;
use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::ports::*;

/// Local filesystem adapter
#[derive(Debug, Default)]
pub struct FsLocalAdapter;

impl FsLocalAdapter {
    /// Create new local filesystem adapter
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FsPort for FsLocalAdapter {
    async fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError> {
        tokio::fs::try_exists(file_path).await.map_err(|e| {
            DomainError::FsFail(format!("Failed to stat {}: {}", file_path.display(), e))
        })
    }

    async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError> {
        // create_dir_all already tolerates an existing directory
        tokio::fs::create_dir_all(dir_path).await.map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to create directory {}: {}",
                dir_path.display(),
                e
            ))
        })
    }

    async fn remove_file(&self, file_path: &Path) -> Result<(), DomainError> {
        match tokio::fs::remove_file(file_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::FsFail(format!(
                "Failed to delete {}: {}",
                file_path.display(),
                e
            ))),
        }
    }

    async fn read_file(&self, file_path: &Path) -> Result<Vec<u8>, DomainError> {
        tokio::fs::read(file_path).await.map_err(|e| {
            DomainError::FsFail(format!("Failed to read {}: {}", file_path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_directory_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("clips").join("nested");
        let fs = FsLocalAdapter::new();

        fs.create_directory(&dir).await.unwrap();
        fs.create_directory(&dir).await.unwrap();
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn test_remove_missing_file_is_ok() {
        let temp = TempDir::new().unwrap();
        let fs = FsLocalAdapter::new();
        let file = temp.path().join("gone.mp4");

        fs.remove_file(&file).await.unwrap();
        std::fs::write(&file, b"x").unwrap();
        assert!(fs.file_exists(&file).await.unwrap());
        fs.remove_file(&file).await.unwrap();
        assert!(!fs.file_exists(&file).await.unwrap());
    }
}
