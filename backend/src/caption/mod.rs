pub mod gemini;

use image::RgbImage;

pub use gemini::GeminiClient;

use crate::config::GeminiConfig;

pub const CAPTION_PROMPT: &str =
    "Describe personality of person's handwriting in one line, if there is any.";
pub const OCR_PROMPT: &str = "Transcribe the handwritten text in this image exactly as written. \
     Return only the transcribed text, preserving line breaks.";

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("GEMINI_API_KEY is not configured")]
    MissingCredential,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("service returned no text")]
    EmptyResponse,
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

/// Result of a caption attempt. `Degraded` carries the reason the caption
/// could not be produced; the request still succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionOutcome {
    Generated(String),
    Degraded(String),
}

impl CaptionOutcome {
    pub fn text(&self) -> String {
        match self {
            CaptionOutcome::Generated(text) => text.clone(),
            CaptionOutcome::Degraded(reason) => format!("Caption unavailable: {}", reason),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, CaptionOutcome::Degraded(_))
    }
}

#[derive(Clone, Default)]
pub struct CaptionGenerator {
    client: Option<GeminiClient>,
}

impl CaptionGenerator {
    pub fn new(client: Option<GeminiClient>) -> Self {
        Self { client }
    }

    pub fn from_config(config: &GeminiConfig) -> Self {
        let Some(api_key) = config.api_key.as_deref() else {
            log::warn!("GEMINI_API_KEY not set; captions and OCR are disabled");
            return Self::default();
        };
        match GeminiClient::new(api_key, config.model.as_str(), config.api_base.as_str()) {
            Ok(client) => {
                log::info!("Generative AI client ready (model {})", client.model());
                Self::new(Some(client))
            }
            Err(e) => {
                log::error!("Failed to initialise generative AI client: {}", e);
                Self::default()
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Never fails: any problem is folded into `CaptionOutcome::Degraded`.
    pub async fn describe(&self, image: &RgbImage) -> CaptionOutcome {
        let Some(client) = &self.client else {
            return CaptionOutcome::Degraded(GenerationError::MissingCredential.to_string());
        };
        match client.generate(image, CAPTION_PROMPT).await {
            Ok(text) => CaptionOutcome::Generated(text),
            Err(e) => {
                log::warn!("Caption generation degraded: {}", e);
                CaptionOutcome::Degraded(e.to_string())
            }
        }
    }

    pub async fn transcribe(&self, image: &RgbImage) -> Result<String, GenerationError> {
        let client = self
            .client
            .as_ref()
            .ok_or(GenerationError::MissingCredential)?;
        client.generate(image, OCR_PROMPT).await
    }
}
