use std::sync::Mutex;

use async_trait::async_trait;

use super::dynamodb_repository::{AnalysisLog, RepositoryError};
use super::model::AnalysisRecord;

#[derive(Default)]
pub struct MemoryAnalysisLog {
    records: Mutex<Vec<AnalysisRecord>>,
    fail_inserts: bool,
}

impl MemoryAnalysisLog {
    pub fn failing() -> Self {
        Self {
            records: Mutex::default(),
            fail_inserts: true,
        }
    }

    pub fn records(&self) -> Vec<AnalysisRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisLog for MemoryAnalysisLog {
    async fn insert(&self, record: &AnalysisRecord) -> Result<(), RepositoryError> {
        if self.fail_inserts {
            return Err(RepositoryError::DynamoDb("table unavailable".into()));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}
