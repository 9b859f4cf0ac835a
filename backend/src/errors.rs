use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use shared::ErrorResponse;

use crate::caption::GenerationError;
use crate::inference::{DecodeError, InferenceError};
use crate::storage::persistence::PersistenceError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    MissingUpload(&'static str),
    #[error("Invalid image: {0}")]
    InvalidImage(#[from] DecodeError),
    #[error("Upload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },
    #[error("Malformed multipart payload: {0}")]
    Multipart(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Model unavailable: the classifier failed to load at startup")]
    ModelUnavailable,
    #[error("Inference failed: {0}")]
    Inference(#[from] InferenceError),
    #[error("Generative AI service error: {0}")]
    RemoteService(GenerationError),
    #[error("Persistence failed: {0}")]
    Persistence(#[from] PersistenceError),
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::MissingCredential => AppError::Configuration(err.to_string()),
            other => AppError::RemoteService(other),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingUpload(_) | AppError::InvalidImage(_) | AppError::Multipart(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Configuration(_)
            | AppError::ModelUnavailable
            | AppError::Inference(_)
            | AppError::RemoteService(_)
            | AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::info!("Rejected request: {}", self);
        }
        HttpResponse::build(status).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
