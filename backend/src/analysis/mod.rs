pub mod response;

use actix_web::web;
use shared::{AnalysisResponse, OcrResponse};

use crate::context::AppContext;
use crate::errors::AppError;
use crate::inference::{InferenceError, decode_image, preprocess};
use crate::storage::persistence::PersistRequest;

pub use response::assemble_response;

/// A single file taken from a multipart upload.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub data: Vec<u8>,
}

/// decode -> preprocess -> classify (with the caption in parallel) ->
/// persist -> assemble.
pub async fn analyze(
    ctx: &AppContext,
    upload: Upload,
    client_addr: Option<String>,
) -> Result<AnalysisResponse, AppError> {
    let bitmap = decode_image(&upload.data)?;
    let classifier = ctx.classifier.clone().ok_or(AppError::ModelUnavailable)?;
    let tensor = preprocess(&bitmap);

    let (classification, caption) = futures::join!(
        web::block(move || classifier.classify(&tensor)),
        ctx.captions.describe(&bitmap),
    );
    let classification = classification
        .map_err(|e| InferenceError::Worker(e.to_string()))
        .and_then(|result| result)?;

    let record = ctx
        .persistence
        .persist(PersistRequest {
            original_filename: &upload.filename,
            data: &upload.data,
            client_addr,
            classification: &classification,
            caption: &caption,
        })
        .await?;

    log::info!(
        "Analyzed {} as {} ({:.3}){}",
        record.stored_filename,
        classification.label,
        classification.confidence,
        if caption.is_degraded() {
            " with degraded caption"
        } else {
            ""
        }
    );
    Ok(assemble_response(&classification, &caption, &record.image_url))
}

pub async fn recognize_text(ctx: &AppContext, upload: Upload) -> Result<OcrResponse, AppError> {
    let bitmap = decode_image(&upload.data)?;
    let recognized_text = ctx.captions.transcribe(&bitmap).await?;
    log::info!(
        "Recognized {} characters from {}",
        recognized_text.chars().count(),
        upload.filename
    );
    Ok(OcrResponse {
        recognized_text,
        status: "success".to_string(),
    })
}
