use std::path::PathBuf;

use actix_cors::Cors;
use actix_files::Files;
use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use futures::TryStreamExt;
use shared::HealthResponse;

use crate::analysis::{self, Upload};
use crate::context::AppContext;
use crate::errors::AppError;

const IMAGE_FIELD: &str = "image";
const OCR_FIELD: &str = "handwriting_image";

pub fn configure_routes(cfg: &mut web::ServiceConfig, upload_dir: Option<PathBuf>) {
    cfg.service(web::resource("/analyze").route(web::post().to(handle_analyze)))
        .service(web::resource("/upload_and_analyze").route(web::post().to(handle_analyze)))
        .service(web::resource("/api/ocr-recognize").route(web::post().to(handle_ocr)))
        .service(web::resource("/health").route(web::get().to(health)));

    if let Some(dir) = upload_dir {
        cfg.service(Files::new("/uploads", dir));
    }
}

pub fn build_cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_header(header::CONTENT_TYPE)
        .supports_credentials()
        .max_age(3600)
}

async fn handle_analyze(
    ctx: web::Data<AppContext>,
    req: HttpRequest,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let upload = read_upload(payload, IMAGE_FIELD, ctx.max_upload_bytes)
        .await?
        .ok_or(AppError::MissingUpload("No image uploaded"))?;
    let client_addr = req.connection_info().peer_addr().map(str::to_string);

    let response = analysis::analyze(&ctx, upload, client_addr).await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn handle_ocr(
    ctx: web::Data<AppContext>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let upload = read_upload(payload, OCR_FIELD, ctx.max_upload_bytes)
        .await?
        .ok_or(AppError::MissingUpload("No handwriting image uploaded"))?;

    let response = analysis::recognize_text(&ctx, upload).await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn health(ctx: web::Data<AppContext>) -> HttpResponse {
    let model_loaded = ctx.model_loaded();
    HttpResponse::Ok().json(HealthResponse {
        status: if model_loaded { "ok" } else { "degraded" }.to_string(),
        model_loaded,
        caption_service_configured: ctx.captions.is_configured(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Drains the multipart stream, keeping the first non-empty part named
/// `field_name`. Other parts are read and discarded.
async fn read_upload(
    mut payload: Multipart,
    field_name: &str,
    limit: usize,
) -> Result<Option<Upload>, AppError> {
    let mut upload = None;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::Multipart(e.to_string()))?
    {
        let wanted = upload.is_none() && field.name() == Some(field_name);
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or_default()
            .to_string();

        let mut data = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::Multipart(e.to_string()))?
        {
            if !wanted {
                continue;
            }
            if data.len() + chunk.len() > limit {
                return Err(AppError::PayloadTooLarge { limit });
            }
            data.extend_from_slice(&chunk);
        }

        if wanted && !data.is_empty() {
            upload = Some(Upload { filename, data });
        }
    }

    Ok(upload)
}
