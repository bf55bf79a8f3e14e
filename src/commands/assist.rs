//! One-shot assistant calls from the command line.

use std::path::Path;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use tracing::info;

use crate::assistant::{Assistant, GroundedAnswer, Location};
use crate::defaults::Defaults;
use crate::util::read_capped;
use crate::verification::PhotoPayload;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn moderate(assistant: &dyn Assistant, text: &str) -> Result<()> {
    let verdict = assistant.moderate_content(text).await.context("moderating text")?;
    info!(flagged = verdict.is_flagged, "moderation done");
    print_json(&verdict)
}

pub async fn validate_quest(assistant: &dyn Assistant, title: &str, description: &str, budget: u64) -> Result<()> {
    let analysis = assistant
        .validate_quest_creation(title, description, budget)
        .await
        .context("validating quest")?;
    print_json(&analysis)
}

pub async fn verify_photo(assistant: &dyn Assistant, image: &Path, code: &str) -> Result<()> {
    let photo = PhotoPayload::from_path(image)?;
    let verdict = assistant
        .verify_photo_task(photo.as_base64(), code)
        .await
        .context("verifying photo")?;
    print_json(&verdict)
}

pub async fn maps(assistant: &dyn Assistant, prompt: &str, lat: Option<f64>, lng: Option<f64>) -> Result<()> {
    let location = lat.zip(lng).map(|(latitude, longitude)| Location { latitude, longitude });
    let answer = assistant
        .generate_maps_response(prompt, location)
        .await
        .context("asking for a grounded answer")?;
    println!("{}", render_grounded(&answer));
    Ok(())
}

pub async fn video(assistant: &dyn Assistant, file: &Path, mime: &str, prompt: &str) -> Result<()> {
    let bytes = read_capped(file, Defaults::MAX_VIDEO_BYTES).context("loading video")?;
    info!(bytes = bytes.len(), %mime, "sending video for analysis");
    let text = assistant
        .analyze_video(&STANDARD.encode(bytes), mime, prompt)
        .await
        .context("analyzing video")?;
    println!("{text}");
    Ok(())
}

/// Answer text followed by a numbered source list.
pub fn render_grounded(answer: &GroundedAnswer) -> String {
    let mut out = answer.text.clone();
    if !answer.sources.is_empty() {
        out.push_str("\n\nSources:");
        for (i, source) in answer.sources.iter().enumerate() {
            let title = source.title.as_deref().unwrap_or("untitled");
            let uri = source.uri.as_deref().unwrap_or("-");
            out.push_str(&format!("\n  {}. {title} <{uri}>", i + 1));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::{GroundingSource, SourceKind};

    #[test]
    fn grounded_answer_lists_sources() {
        let answer = GroundedAnswer {
            text: "Try the cafe on MG Road.".into(),
            sources: vec![
                GroundingSource { kind: SourceKind::Maps, uri: Some("https://maps.example/1".into()), title: Some("Cafe".into()) },
                GroundingSource { kind: SourceKind::Web, uri: None, title: None },
            ],
        };
        let text = render_grounded(&answer);
        assert!(text.starts_with("Try the cafe on MG Road.\n\nSources:"));
        assert!(text.contains("1. Cafe <https://maps.example/1>"));
        assert!(text.contains("2. untitled <->"));
    }

    #[test]
    fn no_sources_is_just_text() {
        let answer = GroundedAnswer { text: "Nothing nearby.".into(), sources: vec![] };
        assert_eq!(render_grounded(&answer), "Nothing nearby.");
    }
}
