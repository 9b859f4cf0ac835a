use shared::{AnalysisResponse, PersonalityTrait};

use crate::caption::CaptionOutcome;
use crate::inference::ClassificationResult;

pub const SUCCESS_MESSAGE: &str = "Image uploaded and analyzed successfully";

pub fn personality_description(label: &str) -> String {
    match label.parse::<PersonalityTrait>() {
        Ok(personality) => personality.description().to_string(),
        Err(_) => format!("Trait: {}", label),
    }
}

pub fn assemble_response(
    classification: &ClassificationResult,
    caption: &CaptionOutcome,
    image_url: &str,
) -> AnalysisResponse {
    AnalysisResponse {
        class_name: classification.label.clone(),
        confidence: classification.confidence,
        personality_description: personality_description(&classification.label),
        defect_description: caption.text(),
        image_url: Some(image_url.to_string()),
        message: Some(SUCCESS_MESSAGE.to_string()),
    }
}
