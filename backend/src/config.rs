use std::path::PathBuf;

use url::Url;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://192.168.29.178:5173";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
    #[error("{0} must be set when CONTENT_BACKEND=s3")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBackend {
    Local,
    S3 { bucket: String },
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub model_path: PathBuf,
    pub labels_path: PathBuf,
    pub upload_dir: PathBuf,
    /// Without trailing slash.
    pub public_base_url: String,
    pub content_backend: ContentBackend,
    pub analysis_table: String,
    pub gemini: GeminiConfig,
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Blank values
    /// are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let max_upload_bytes = match get("MAX_UPLOAD_BYTES") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(0) => {
                    return Err(ConfigError::Invalid {
                        name: "MAX_UPLOAD_BYTES",
                        value: raw,
                        reason: "must be greater than zero".to_string(),
                    });
                }
                Ok(limit) => limit,
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        name: "MAX_UPLOAD_BYTES",
                        value: raw.clone(),
                        reason: e.to_string(),
                    });
                }
            },
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let public_base_url = validated_url(
            "PUBLIC_BASE_URL",
            get("PUBLIC_BASE_URL").unwrap_or_else(|| format!("http://localhost:{}", port)),
        )?;
        let api_base = validated_url(
            "GEMINI_API_BASE",
            get("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
        )?;

        let content_backend = match get("CONTENT_BACKEND").as_deref() {
            None | Some("local") => ContentBackend::Local,
            Some("s3") => ContentBackend::S3 {
                bucket: get("S3_BUCKET_NAME").ok_or(ConfigError::Missing("S3_BUCKET_NAME"))?,
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "CONTENT_BACKEND",
                    value: other.to_string(),
                    reason: "expected `local` or `s3`".to_string(),
                });
            }
        };

        // actix-cors rejects wildcards and non-URL origins when workers start.
        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| validated_url("CORS_ALLOWED_ORIGINS", origin.to_string()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            port,
            model_path: PathBuf::from(
                get("MODEL_PATH").unwrap_or_else(|| "model/personality_model.pt".to_string()),
            ),
            labels_path: PathBuf::from(
                get("LABELS_PATH").unwrap_or_else(|| "model/labels.txt".to_string()),
            ),
            upload_dir: PathBuf::from(get("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string())),
            public_base_url,
            content_backend,
            analysis_table: get("DYNAMODB_ANALYSIS_TABLE")
                .unwrap_or_else(|| "handwriting_analyses".to_string()),
            gemini: GeminiConfig {
                api_key: get("GEMINI_API_KEY"),
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                api_base,
            },
            cors_allowed_origins,
            max_upload_bytes,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn validated_url(name: &'static str, raw: String) -> Result<String, ConfigError> {
    match Url::parse(&raw) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
            Ok(raw.trim_end_matches('/').to_string())
        }
        Ok(url) => Err(ConfigError::Invalid {
            name,
            value: raw.clone(),
            reason: format!("unsupported scheme `{}`", url.scheme()),
        }),
        Err(e) => Err(ConfigError::Invalid {
            name,
            value: raw,
            reason: e.to_string(),
        }),
    }
}
