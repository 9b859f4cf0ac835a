use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::caption::CaptionOutcome;
use crate::inference::ClassificationResult;
use crate::storage::StoredObject;

/// One append-only log entry per successful analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub original_filename: String,
    pub stored_filename: String,
    pub image_url: String,
    pub image_sha256: String,
    pub created_at: DateTime<Utc>,
    pub client_addr: Option<String>,
    pub label: String,
    pub confidence: f32,
    pub caption: String,
    pub caption_degraded: bool,
}

impl AnalysisRecord {
    pub fn new(
        original_filename: &str,
        data: &[u8],
        stored: &StoredObject,
        client_addr: Option<String>,
        classification: &ClassificationResult,
        caption: &CaptionOutcome,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_filename: original_filename.to_string(),
            stored_filename: stored.stored_filename.clone(),
            image_url: stored.url.clone(),
            image_sha256: calculate_image_hash(data),
            created_at: Utc::now(),
            client_addr,
            label: classification.label.clone(),
            confidence: classification.confidence,
            caption: caption.text(),
            caption_degraded: caption.is_degraded(),
        }
    }
}

pub fn calculate_image_hash(image_data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(image_data);
    hex::encode(hasher.finalize())
}
