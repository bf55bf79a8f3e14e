//! Photo challenge flow shared by identity (KYC) checks and quest completion:
//! get a code, photograph it, let the assistant judge the photo.

use std::path::Path;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::assistant::{AssistantError, PhotoChallenge, PhotoVerdict};
use crate::defaults::Defaults;
use crate::util::read_capped;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeKind {
    Identity,
    QuestCompletion { title: String, description: String },
}

impl ChallengeKind {
    fn generation_failed(&self) -> &'static str {
        "Failed to generate a verification task. Please try again."
    }

    fn verification_failed(&self) -> &'static str {
        match self {
            ChallengeKind::Identity => "Failed to verify the photo. Please try again.",
            ChallengeKind::QuestCompletion { .. } => {
                "Failed to verify the photo. It might be too large or an issue with the AI service. Please try again."
            }
        }
    }
}

/// A captured JPEG, base64 encoded. Never stored; handed straight to the verifier.
#[derive(Clone, PartialEq, Eq)]
pub struct PhotoPayload(String);

impl PhotoPayload {
    pub fn from_jpeg_bytes(bytes: &[u8]) -> Self {
        Self(STANDARD.encode(bytes))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = read_capped(path, Defaults::MAX_PHOTO_BYTES).context("loading photo")?;
        Ok(Self::from_jpeg_bytes(&bytes))
    }

    pub fn as_base64(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for PhotoPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PhotoPayload({} bytes b64)", self.0.len())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoCheck {
    Idle,
    Generating,
    Task(PhotoChallenge),
    Capturing(PhotoChallenge),
    Verifying(PhotoChallenge),
    Verified { challenge: PhotoChallenge, reason: String },
    Failed { challenge: Option<PhotoChallenge>, reason: String },
}

impl PhotoCheck {
    pub fn start(&self) -> Option<PhotoCheck> {
        match self {
            PhotoCheck::Idle => Some(PhotoCheck::Generating),
            _ => None,
        }
    }

    pub fn challenge_ready(
        &self,
        kind: &ChallengeKind,
        result: Result<PhotoChallenge, AssistantError>,
    ) -> Option<PhotoCheck> {
        if !matches!(self, PhotoCheck::Generating) {
            return None;
        }
        Some(match result {
            Ok(challenge) => PhotoCheck::Task(challenge),
            Err(_) => PhotoCheck::Failed { challenge: None, reason: kind.generation_failed().into() },
        })
    }

    pub fn open_camera(&self) -> Option<PhotoCheck> {
        match self {
            PhotoCheck::Task(c) => Some(PhotoCheck::Capturing(c.clone())),
            _ => None,
        }
    }

    pub fn cancel_camera(&self) -> Option<PhotoCheck> {
        match self {
            PhotoCheck::Capturing(c) => Some(PhotoCheck::Task(c.clone())),
            _ => None,
        }
    }

    pub fn capture(&self) -> Option<PhotoCheck> {
        match self {
            PhotoCheck::Capturing(c) => Some(PhotoCheck::Verifying(c.clone())),
            _ => None,
        }
    }

    pub fn verdict(&self, kind: &ChallengeKind, result: Result<PhotoVerdict, AssistantError>) -> Option<PhotoCheck> {
        let PhotoCheck::Verifying(challenge) = self else {
            return None;
        };
        let challenge = challenge.clone();
        Some(match result {
            Ok(v) if v.is_verified => PhotoCheck::Verified { challenge, reason: v.reason },
            Ok(v) => PhotoCheck::Failed { challenge: Some(challenge), reason: v.reason },
            Err(_) => PhotoCheck::Failed {
                challenge: Some(challenge),
                reason: kind.verification_failed().into(),
            },
        })
    }

    /// Back to the instruction when a challenge exists, otherwise ask for a new one.
    pub fn retry(&self) -> Option<PhotoCheck> {
        match self {
            PhotoCheck::Failed { challenge: Some(c), .. } => Some(PhotoCheck::Task(c.clone())),
            PhotoCheck::Failed { challenge: None, .. } => Some(PhotoCheck::Generating),
            _ => None,
        }
    }

    pub fn challenge(&self) -> Option<&PhotoChallenge> {
        match self {
            PhotoCheck::Task(c) | PhotoCheck::Capturing(c) | PhotoCheck::Verifying(c) => Some(c),
            PhotoCheck::Verified { challenge, .. } => Some(challenge),
            PhotoCheck::Failed { challenge, .. } => challenge.as_ref(),
            PhotoCheck::Idle | PhotoCheck::Generating => None,
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, PhotoCheck::Verified { .. })
    }
}
