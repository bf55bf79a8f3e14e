//! Generative Language REST client.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{
    prompts, Assistant, AssistantError, GroundedAnswer, GroundingSource, Location, ModerationVerdict,
    PhotoChallenge, PhotoVerdict, QuestValidation, SourceKind,
};
use crate::config::AssistantConfig;
use crate::util::generate_complex_code;

const JPEG: &str = "image/jpeg";

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    flash_model: String,
    pro_model: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    maps: Option<SourceRef>,
    web: Option<SourceRef>,
}

#[derive(Debug, Deserialize)]
struct SourceRef {
    uri: Option<String>,
    title: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.trim().is_empty()).then_some(text)
    }

    fn sources(&self) -> Vec<GroundingSource> {
        let Some(meta) = self.candidates.first().and_then(|c| c.grounding_metadata.as_ref()) else {
            return Vec::new();
        };
        meta.grounding_chunks
            .iter()
            .flat_map(|chunk| {
                let maps = chunk.maps.as_ref().map(|s| (SourceKind::Maps, s));
                let web = chunk.web.as_ref().map(|s| (SourceKind::Web, s));
                maps.into_iter().chain(web)
            })
            .map(|(kind, s)| GroundingSource { kind, uri: s.uri.clone(), title: s.title.clone() })
            .collect()
    }
}

fn text_part(text: &str) -> Value {
    json!({ "text": text })
}

fn inline_part(data: &str, mime_type: &str) -> Value {
    json!({ "inlineData": { "mimeType": mime_type, "data": data } })
}

fn json_config(schema: Value) -> Value {
    json!({ "responseMimeType": "application/json", "responseSchema": schema })
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<T, AssistantError> {
    Ok(serde_json::from_str(text.trim())?)
}

impl GeminiClient {
    pub fn new(cfg: &AssistantConfig) -> Result<Self, AssistantError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone().filter(|k| !k.is_empty()),
            flash_model: cfg.flash_model.clone(),
            pro_model: cfg.pro_model.clone(),
        })
    }

    fn body(parts: Vec<Value>, generation_config: Option<Value>) -> Value {
        let mut body = json!({ "contents": [{ "role": "user", "parts": parts }] });
        if let Some(cfg) = generation_config {
            body["generationConfig"] = cfg;
        }
        body
    }

    async fn generate(&self, model: &str, body: Value) -> Result<GenerateResponse, AssistantError> {
        let key = self.api_key.as_deref().ok_or(AssistantError::MissingApiKey)?;
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        debug!(%model, "generateContent");

        let response = self
            .http
            .post(&url)
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            warn!(%model, status, "AI service rejected request");
            return Err(AssistantError::Status { status, body });
        }

        Ok(response.json::<GenerateResponse>().await?)
    }

    async fn generate_text(&self, model: &str, body: Value) -> Result<String, AssistantError> {
        self.generate(model, body).await?.text().ok_or(AssistantError::EmptyResponse)
    }

    async fn generate_json<T: DeserializeOwned>(&self, parts: Vec<Value>, schema: Value) -> Result<T, AssistantError> {
        let body = Self::body(parts, Some(json_config(schema)));
        let text = self.generate_text(&self.flash_model, body).await?;
        decode(&text)
    }
}

#[async_trait]
impl Assistant for GeminiClient {
    async fn moderate_content(&self, text: &str) -> Result<ModerationVerdict, AssistantError> {
        self.generate_json(vec![text_part(&prompts::moderation(text))], prompts::moderation_schema())
            .await
    }

    async fn validate_quest_creation(
        &self,
        title: &str,
        description: &str,
        budget: u64,
    ) -> Result<QuestValidation, AssistantError> {
        let prompt = prompts::quest_validation(title, description, budget);
        self.generate_json(vec![text_part(&prompt)], prompts::quest_validation_schema())
            .await
    }

    async fn generate_verification_task(&self) -> Result<PhotoChallenge, AssistantError> {
        self.generate_json(vec![text_part(prompts::IDENTITY_TASK)], prompts::identity_task_schema())
            .await
    }

    async fn verify_photo_task(&self, image_base64: &str, code: &str) -> Result<PhotoVerdict, AssistantError> {
        let parts = vec![inline_part(image_base64, JPEG), text_part(&prompts::identity_check(code))];
        self.generate_json(parts, prompts::verdict_schema()).await
    }

    async fn generate_quest_verification_task(&self, quest_title: &str) -> Result<PhotoChallenge, AssistantError> {
        #[derive(Deserialize)]
        struct Instruction {
            instruction: String,
        }

        let code = generate_complex_code(&mut rand::thread_rng());
        let prompt = prompts::quest_task(quest_title, &code);
        let out: Instruction = self
            .generate_json(vec![text_part(&prompt)], prompts::quest_task_schema())
            .await?;
        Ok(PhotoChallenge { code, instruction: out.instruction })
    }

    async fn verify_quest_completion_photo(
        &self,
        image_base64: &str,
        code: &str,
        quest_title: &str,
        quest_description: &str,
    ) -> Result<PhotoVerdict, AssistantError> {
        let prompt = prompts::quest_check(code, quest_title, quest_description);
        let parts = vec![inline_part(image_base64, JPEG), text_part(&prompt)];
        self.generate_json(parts, prompts::verdict_schema()).await
    }

    async fn generate_maps_response(
        &self,
        prompt: &str,
        location: Option<Location>,
    ) -> Result<GroundedAnswer, AssistantError> {
        let mut body = Self::body(vec![text_part(prompt)], None);
        body["tools"] = json!([{ "googleMaps": {} }]);
        if let Some(loc) = location {
            body["toolConfig"] = json!({
                "retrievalConfig": {
                    "latLng": { "latitude": loc.latitude, "longitude": loc.longitude }
                }
            });
        }
        let response = self.generate(&self.flash_model, body).await?;
        let text = response.text().ok_or(AssistantError::EmptyResponse)?;
        Ok(GroundedAnswer { text, sources: response.sources() })
    }

    async fn analyze_video(&self, video_base64: &str, mime_type: &str, prompt: &str) -> Result<String, AssistantError> {
        let body = Self::body(vec![inline_part(video_base64, mime_type), text_part(prompt)], None);
        self.generate_text(&self.pro_model, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(v: Value) -> GenerateResponse {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn text_joins_first_candidate_parts() {
        let r = response(json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"isFlagged\":" }, { "text": " false}" }] } }]
        }));
        let verdict: ModerationVerdict = decode(&r.text().unwrap()).unwrap();
        assert!(!verdict.is_flagged);
        assert_eq!(verdict.reason, None);
    }

    #[test]
    fn empty_candidates_have_no_text() {
        assert!(response(json!({})).text().is_none());
        assert!(response(json!({ "candidates": [{ "content": { "parts": [] } }] })).text().is_none());
    }

    #[test]
    fn grounding_sources_keep_kind() {
        let r = response(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Try Cafe X" }] },
                "groundingMetadata": { "groundingChunks": [
                    { "maps": { "uri": "https://maps/x", "title": "Cafe X" } },
                    { "web": { "uri": "https://web/y" } }
                ]}
            }]
        }));
        let sources = r.sources();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].kind, SourceKind::Maps);
        assert_eq!(sources[0].title.as_deref(), Some("Cafe X"));
        assert_eq!(sources[1].kind, SourceKind::Web);
        assert_eq!(sources[1].title, None);
    }

    #[test]
    fn body_carries_schema_config() {
        let body = GeminiClient::body(vec![text_part("hi")], Some(json_config(prompts::verdict_schema())));
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn partial_validation_output_defaults_missing_fields() {
        let v: QuestValidation = decode(r#"{"isJobPosting": true, "jobPostingReason": "Full-time"}"#).unwrap();
        assert!(v.is_job_posting);
        assert_eq!(v.suggested_max_budget, 0.0);
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let cfg = AssistantConfig { api_key: None, ..AssistantConfig::default() };
        let client = GeminiClient::new(&cfg).unwrap();
        let err = client.moderate_content("hello").await.unwrap_err();
        assert!(matches!(err, AssistantError::MissingApiKey));
    }
}
