//! Test doubles: an [`Assistant`] that answers from a script and a helper
//! that builds a controller over the built-in marketplace.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::assistant::{
    Assistant, AssistantError, GroundedAnswer, Location, ModerationVerdict, PhotoChallenge, PhotoVerdict,
    QuestValidation,
};
use crate::config::Config;
use crate::controller::{Controller, Services};
use crate::fixtures::Fixtures;
use crate::otp::SimulatedCodeSender;

/// `None` in any slot makes that call fail with [`AssistantError::EmptyResponse`].
pub struct ScriptedAssistant {
    pub moderation: Option<ModerationVerdict>,
    pub analysis: Option<QuestValidation>,
    pub identity_challenge: Option<PhotoChallenge>,
    pub quest_challenge: Option<PhotoChallenge>,
    pub photo: Option<PhotoVerdict>,
    pub calls: Mutex<Vec<&'static str>>,
}

impl Default for ScriptedAssistant {
    fn default() -> Self {
        Self {
            moderation: Some(ModerationVerdict { is_flagged: false, reason: None }),
            analysis: Some(QuestValidation {
                is_job_posting: false,
                is_budget_realistic: true,
                suggested_max_budget: 5000.0,
                suggestion: "Looks good.".into(),
                ..QuestValidation::default()
            }),
            identity_challenge: Some(PhotoChallenge {
                code: "TT-4821".into(),
                instruction: "Hold a paper showing TT-4821 next to your face.".into(),
            }),
            quest_challenge: Some(PhotoChallenge {
                code: "aB3$7!x".into(),
                instruction: "Show your design on screen with aB3$7!x written beside it.".into(),
            }),
            photo: Some(PhotoVerdict { is_verified: true, reason: "Code and work are visible.".into() }),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedAssistant {
    pub fn flagging(reason: Option<&str>) -> Self {
        Self {
            moderation: Some(ModerationVerdict { is_flagged: true, reason: reason.map(str::to_string) }),
            ..Self::default()
        }
    }

    pub fn offline() -> Self {
        Self {
            moderation: None,
            analysis: None,
            identity_challenge: None,
            quest_challenge: None,
            photo: None,
            ..Self::default()
        }
    }

    pub fn rejecting_photos(reason: &str) -> Self {
        Self { photo: Some(PhotoVerdict { is_verified: false, reason: reason.into() }), ..Self::default() }
    }

    pub fn spotting_job_posting(reason: &str) -> Self {
        Self {
            analysis: Some(QuestValidation {
                is_job_posting: true,
                job_posting_reason: reason.into(),
                ..QuestValidation::default()
            }),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn answer<T: Clone>(&self, call: &'static str, slot: &Option<T>) -> Result<T, AssistantError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        slot.clone().ok_or(AssistantError::EmptyResponse)
    }
}

#[async_trait]
impl Assistant for ScriptedAssistant {
    async fn moderate_content(&self, _text: &str) -> Result<ModerationVerdict, AssistantError> {
        self.answer("moderate_content", &self.moderation)
    }

    async fn validate_quest_creation(
        &self,
        _title: &str,
        _description: &str,
        _budget: u64,
    ) -> Result<QuestValidation, AssistantError> {
        self.answer("validate_quest_creation", &self.analysis)
    }

    async fn generate_verification_task(&self) -> Result<PhotoChallenge, AssistantError> {
        self.answer("generate_verification_task", &self.identity_challenge)
    }

    async fn verify_photo_task(&self, _image_base64: &str, _code: &str) -> Result<PhotoVerdict, AssistantError> {
        self.answer("verify_photo_task", &self.photo)
    }

    async fn generate_quest_verification_task(&self, _quest_title: &str) -> Result<PhotoChallenge, AssistantError> {
        self.answer("generate_quest_verification_task", &self.quest_challenge)
    }

    async fn verify_quest_completion_photo(
        &self,
        _image_base64: &str,
        _code: &str,
        _quest_title: &str,
        _quest_description: &str,
    ) -> Result<PhotoVerdict, AssistantError> {
        self.answer("verify_quest_completion_photo", &self.photo)
    }

    async fn generate_maps_response(
        &self,
        prompt: &str,
        _location: Option<Location>,
    ) -> Result<GroundedAnswer, AssistantError> {
        self.answer("generate_maps_response", &Some(GroundedAnswer { text: prompt.into(), sources: Vec::new() }))
    }

    async fn analyze_video(&self, _video_base64: &str, _mime_type: &str, prompt: &str) -> Result<String, AssistantError> {
        self.answer("analyze_video", &Some(prompt.to_string()))
    }
}

/// Controller on the splash screen, built-in data, default timings.
pub fn controller(assistant: ScriptedAssistant) -> Controller {
    controller_with(Arc::new(assistant), &Config::default())
}

pub fn controller_with(assistant: Arc<ScriptedAssistant>, config: &Config) -> Controller {
    controller_over(Fixtures::builtin(OffsetDateTime::now_utc()), assistant, config)
}

/// Controller on the splash screen over an injected marketplace.
pub fn controller_over(fixtures: Fixtures, assistant: Arc<ScriptedAssistant>, config: &Config) -> Controller {
    let services = Services { assistant, codes: Arc::new(SimulatedCodeSender::new(config.timing.code_send_delay())) };
    Controller::new(fixtures, services, config)
}
