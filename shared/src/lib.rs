use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The five trait classes the handwriting model was trained on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum PersonalityTrait {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
}

impl PersonalityTrait {
    pub fn description(&self) -> &'static str {
        match self {
            PersonalityTrait::Openness => {
                "This handwriting shows the personality of a person who is Imaginative, insightful, and curious about the world. They enjoy novelty, art, and new ideas."
            }
            PersonalityTrait::Conscientiousness => {
                "This handwriting reflects a person who is Organized, responsible, dependable, and goal-directed. They exhibit high self-discipline."
            }
            PersonalityTrait::Extraversion => {
                "This handwriting represents an Outgoing, energetic, and assertive personality. They gain energy from social interaction"
            }
            PersonalityTrait::Agreeableness => {
                "This handwriting indicates a Compassionate, cooperative, and kind personality. They value getting along with others."
            }
            PersonalityTrait::Neuroticism => {
                "This handwriting shows personality of person who is Prone to emotional instability, anxiety, and moodiness. They experience negative emotions more intensely."
            }
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AnalysisResponse {
    #[serde(rename = "class")]
    pub class_name: String,
    pub confidence: f32,
    pub personality_description: String,
    pub defect_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OcrResponse {
    pub recognized_text: String,
    pub status: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub caption_service_configured: bool,
    pub version: String,
}
