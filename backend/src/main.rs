mod analysis;
mod caption;
mod config;
mod context;
mod db;
mod errors;
mod inference;
mod routes;
mod storage;
#[cfg(test)]
mod testing;

use actix_web::{App, HttpServer, middleware, web};
use config::AppConfig;
use context::AppContext;
use routes::{build_cors, configure_routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    let context = web::Data::new(AppContext::initialize(&config).await);
    if !context.model_loaded() {
        log::warn!("Starting without a classifier; only OCR and health are functional");
    }
    if !context.captions.is_configured() {
        log::warn!("GEMINI_API_KEY is not set; captions will be placeholders and OCR will fail");
    }

    let upload_dir = context
        .persistence
        .content_root()
        .map(|dir| dir.to_path_buf());
    let cors_origins = config.cors_allowed_origins.clone();
    let bind_address = config.bind_address();

    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .wrap(build_cors(&cors_origins))
            .app_data(context.clone())
            .configure(|cfg| configure_routes(cfg, upload_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
