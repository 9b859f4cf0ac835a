use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;

use super::model::AnalysisRecord;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("DynamoDB error: {0}")]
    DynamoDb(String),
}

/// Insert-only sink for analysis records.
#[async_trait]
pub trait AnalysisLog: Send + Sync {
    async fn insert(&self, record: &AnalysisRecord) -> Result<(), RepositoryError>;
}

#[derive(Clone)]
pub struct DynamoDbRepository {
    client: Client,
    analysis_table: String,
}

impl DynamoDbRepository {
    pub fn new(client: Client, analysis_table: String) -> Self {
        Self {
            client,
            analysis_table,
        }
    }

    pub fn record_to_item(record: &AnalysisRecord) -> HashMap<String, AttributeValue> {
        let mut item = HashMap::new();
        item.insert("id".to_string(), AttributeValue::S(record.id.to_string()));
        item.insert(
            "original_filename".to_string(),
            AttributeValue::S(record.original_filename.clone()),
        );
        item.insert(
            "stored_filename".to_string(),
            AttributeValue::S(record.stored_filename.clone()),
        );
        item.insert(
            "image_url".to_string(),
            AttributeValue::S(record.image_url.clone()),
        );
        item.insert(
            "image_sha256".to_string(),
            AttributeValue::S(record.image_sha256.clone()),
        );
        item.insert(
            "created_at".to_string(),
            AttributeValue::S(record.created_at.to_rfc3339()),
        );
        if let Some(client_addr) = &record.client_addr {
            item.insert(
                "client_addr".to_string(),
                AttributeValue::S(client_addr.clone()),
            );
        }
        item.insert("label".to_string(), AttributeValue::S(record.label.clone()));
        item.insert(
            "confidence".to_string(),
            AttributeValue::N(record.confidence.to_string()),
        );
        item.insert("caption".to_string(), AttributeValue::S(record.caption.clone()));
        item.insert(
            "caption_degraded".to_string(),
            AttributeValue::Bool(record.caption_degraded),
        );
        item
    }
}

#[async_trait]
impl AnalysisLog for DynamoDbRepository {
    async fn insert(&self, record: &AnalysisRecord) -> Result<(), RepositoryError> {
        let item = DynamoDbRepository::record_to_item(record);

        match self
            .client
            .put_item()
            .table_name(&self.analysis_table)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(id)")
            .send()
            .await
        {
            Ok(_) => {
                log::info!(
                    "Logged analysis {} ({}) to table '{}'",
                    record.id,
                    record.stored_filename,
                    self.analysis_table
                );
                Ok(())
            }
            Err(e) => {
                log::error!(
                    "DynamoDB put_item failed for analysis {}: {:?}",
                    record.id,
                    e
                );
                Err(RepositoryError::DynamoDb(e.to_string()))
            }
        }
    }
}
