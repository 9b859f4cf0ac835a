pub mod local;
pub mod persistence;
pub mod s3_service;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

const MAX_NAME_LEN: usize = 128;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("S3 error: {0}")]
    S3(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub stored_filename: String,
    pub url: String,
}

/// Write-once store for uploaded image bytes.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Stores `data` under `stored_filename`, refusing to overwrite.
    async fn put(&self, stored_filename: &str, data: &[u8]) -> Result<StoredObject, StorageError>;

    /// Directory served under `/uploads`, when the store is filesystem backed.
    fn local_root(&self) -> Option<&Path> {
        None
    }
}

/// Reduces a client-supplied name to `[A-Za-z0-9._-]`, with no path
/// components and no leading dots.
pub fn sanitize_filename(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();
    let cleaned = cleaned.trim_start_matches(['.', '_']);

    if cleaned.is_empty() {
        return "upload".to_string();
    }
    // Keep the tail so the extension survives.
    let skip = cleaned.len().saturating_sub(MAX_NAME_LEN);
    cleaned[skip..].to_string()
}

/// `<uuid>_<sanitized original>`; distinct for every call.
pub fn unique_filename(original: &str) -> String {
    format!("{}_{}", Uuid::new_v4().simple(), sanitize_filename(original))
}
