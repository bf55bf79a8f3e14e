//! Boundary to the generative AI service.
//!
//! The controller only sees the [`Assistant`] trait: primitive inputs in,
//! structured results out. Calls are single request/response with no retry;
//! failures come back as [`AssistantError`] and the caller decides what a
//! failure means for the flow.

pub mod gemini;
mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use gemini::GeminiClient;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("no API key configured (set GEMINI_API_KEY or [assistant].api_key)")]
    MissingApiKey,
    #[error("request to the AI service failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("AI service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("AI service returned no text")]
    EmptyResponse,
    #[error("could not decode model output: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationVerdict {
    pub is_flagged: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestValidation {
    pub is_job_posting: bool,
    pub job_posting_reason: String,
    pub is_budget_realistic: bool,
    pub suggested_max_budget: f64,
    pub suggestion: String,
    pub improved_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoChallenge {
    pub code: String,
    pub instruction: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoVerdict {
    pub is_verified: bool,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Maps,
    Web,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub kind: SourceKind,
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundedAnswer {
    pub text: String,
    pub sources: Vec<GroundingSource>,
}

#[async_trait]
pub trait Assistant: Send + Sync {
    async fn moderate_content(&self, text: &str) -> Result<ModerationVerdict, AssistantError>;

    async fn validate_quest_creation(
        &self,
        title: &str,
        description: &str,
        budget: u64,
    ) -> Result<QuestValidation, AssistantError>;

    /// Identity (KYC) challenge: a short code to hold up in a selfie.
    async fn generate_verification_task(&self) -> Result<PhotoChallenge, AssistantError>;

    async fn verify_photo_task(&self, image_base64: &str, code: &str) -> Result<PhotoVerdict, AssistantError>;

    /// Quest-completion challenge: the code is generated locally, the model
    /// writes the instruction for the given quest.
    async fn generate_quest_verification_task(&self, quest_title: &str) -> Result<PhotoChallenge, AssistantError>;

    async fn verify_quest_completion_photo(
        &self,
        image_base64: &str,
        code: &str,
        quest_title: &str,
        quest_description: &str,
    ) -> Result<PhotoVerdict, AssistantError>;

    async fn generate_maps_response(
        &self,
        prompt: &str,
        location: Option<Location>,
    ) -> Result<GroundedAnswer, AssistantError>;

    async fn analyze_video(&self, video_base64: &str, mime_type: &str, prompt: &str) -> Result<String, AssistantError>;
}
