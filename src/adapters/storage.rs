use crate::core::Storage;
use crate::utils::error::{OgError, Result};
use std::path::PathBuf;
use url::Url;

/// Keeps generated images in a local directory and hands out `file://` URLs.
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

impl Storage for LocalStorage {
    async fn write_file(&self, name: &str, data: &[u8]) -> Result<String> {
        tokio::fs::create_dir_all(&self.base_path).await?;

        let full_path = self.base_path.join(name);
        tokio::fs::write(&full_path, data).await?;

        let absolute = tokio::fs::canonicalize(&full_path).await?;
        Url::from_file_path(&absolute)
            .map(String::from)
            .map_err(|_| OgError::ConfigError {
                message: format!("cannot build a file URL for {}", absolute.display()),
            })
    }
}
