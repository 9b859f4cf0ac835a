use std::sync::Arc;

use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_s3::Client as S3Client;

use crate::caption::CaptionGenerator;
use crate::config::{AppConfig, ContentBackend};
use crate::db::dynamodb_repository::DynamoDbRepository;
use crate::inference::Classifier;
use crate::storage::ContentStore;
use crate::storage::local::LocalContentStore;
use crate::storage::persistence::PersistenceSink;
use crate::storage::s3_service::S3Service;

/// Process-wide dependencies, built once in `main` and shared read-only
/// with every request.
pub struct AppContext {
    /// `None` when the model or labels failed to load at startup.
    pub classifier: Option<Classifier>,
    pub captions: CaptionGenerator,
    pub persistence: PersistenceSink,
    pub max_upload_bytes: usize,
}

impl AppContext {
    pub async fn initialize(config: &AppConfig) -> Self {
        let classifier = match Classifier::load(&config.model_path, &config.labels_path) {
            Ok(classifier) => Some(classifier),
            Err(e) => {
                log::error!(
                    "Classifier unavailable ({}); /analyze will return 500 until restart",
                    e
                );
                None
            }
        };

        let captions = CaptionGenerator::from_config(&config.gemini);

        let aws_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        let content: Arc<dyn ContentStore> = match &config.content_backend {
            ContentBackend::Local => {
                let store =
                    LocalContentStore::new(&config.upload_dir, config.public_base_url.as_str());
                if let Err(e) = store.prepare() {
                    log::error!("Content directory is not usable: {}", e);
                }
                log::info!("Storing uploads in {}", config.upload_dir.display());
                Arc::new(store)
            }
            ContentBackend::S3 { bucket } => {
                log::info!("Storing uploads in s3://{}", bucket);
                Arc::new(S3Service::new(S3Client::new(&aws_config), bucket.clone()))
            }
        };

        let analysis_log = DynamoDbRepository::new(
            DynamoDbClient::new(&aws_config),
            config.analysis_table.clone(),
        );
        log::info!("Logging analyses to DynamoDB table '{}'", config.analysis_table);

        Self {
            classifier,
            captions,
            persistence: PersistenceSink::new(content, Arc::new(analysis_log)),
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.classifier.is_some()
    }
}
