use std::path::Path;
use std::sync::Arc;

use crate::caption::CaptionOutcome;
use crate::db::dynamodb_repository::{AnalysisLog, RepositoryError};
use crate::db::model::AnalysisRecord;
use crate::inference::ClassificationResult;

use super::{ContentStore, StorageError, unique_filename};

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to store upload: {0}")]
    Storage(#[from] StorageError),
    #[error("failed to record analysis: {0}")]
    Log(#[from] RepositoryError),
}

pub struct PersistRequest<'a> {
    pub original_filename: &'a str,
    pub data: &'a [u8],
    pub client_addr: Option<String>,
    pub classification: &'a ClassificationResult,
    pub caption: &'a CaptionOutcome,
}

/// Stores the upload under a fresh name, then appends the analysis record.
#[derive(Clone)]
pub struct PersistenceSink {
    content: Arc<dyn ContentStore>,
    log: Arc<dyn AnalysisLog>,
}

impl PersistenceSink {
    pub fn new(content: Arc<dyn ContentStore>, log: Arc<dyn AnalysisLog>) -> Self {
        Self { content, log }
    }

    pub fn content_root(&self) -> Option<&Path> {
        self.content.local_root()
    }

    pub async fn persist(&self, request: PersistRequest<'_>) -> Result<AnalysisRecord, PersistenceError> {
        let stored_filename = unique_filename(request.original_filename);
        let stored = self.content.put(&stored_filename, request.data).await?;

        let record = AnalysisRecord::new(
            request.original_filename,
            request.data,
            &stored,
            request.client_addr,
            request.classification,
            request.caption,
        );

        // The stored file is not removed when the insert fails.
        if let Err(e) = self.log.insert(&record).await {
            log::error!(
                "Stored {} but could not log analysis {}: {}",
                stored.stored_filename,
                record.id,
                e
            );
            return Err(e.into());
        }
        Ok(record)
    }
}
