use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use super::{ContentStore, StorageError, StoredObject};

/// Content directory on local disk, published as `<base>/uploads/<name>`.
#[derive(Debug, Clone)]
pub struct LocalContentStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalContentStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn prepare(&self) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.root).map_err(|source| StorageError::Io {
            path: self.root.clone(),
            source,
        })
    }

    pub fn public_url(&self, stored_filename: &str) -> String {
        format!("{}/uploads/{}", self.public_base_url, stored_filename)
    }
}

#[async_trait]
impl ContentStore for LocalContentStore {
    async fn put(&self, stored_filename: &str, data: &[u8]) -> Result<StoredObject, StorageError> {
        let path = self.root.join(stored_filename);
        let io_err = |source: std::io::Error| StorageError::Io {
            path: path.clone(),
            source,
        };

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(io_err)?;
        file.write_all(data).await.map_err(io_err)?;
        file.sync_all().await.map_err(io_err)?;

        log::debug!("Wrote {} bytes to {}", data.len(), path.display());
        Ok(StoredObject {
            stored_filename: stored_filename.to_string(),
            url: self.public_url(stored_filename),
        })
    }

    fn local_root(&self) -> Option<&Path> {
        Some(&self.root)
    }
}
