use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    prelude::Frame,
    text::Line,
    widgets::{Paragraph, Wrap},
};
use tracing::warn;

use super::inline_error;
use crate::app::{AppCtx, ScreenWidget, Transition};
use crate::controller::Screen;
use crate::ui::common_nav::esc_to_back;
use crate::ui::components::{error_line, field_line_text, framed, TextField};
use crate::ui::help::{help_bar, help_wait};
use crate::ui::layout::three_box_layout;
use crate::ui::style::{accent, button_line, heading, muted, success};
use crate::verification::{PhotoCheck, PhotoPayload};

/// Identity (KYC) and quest-completion photo checks. There is no camera in a
/// terminal, so "taking the photo" means pointing at a JPEG on disk.
#[derive(Default)]
pub struct PhotoCheckScreen {
    photo_path: TextField,
    error: Option<String>,
}

fn current(ctx: &AppCtx) -> Option<(&'static str, &PhotoCheck)> {
    match ctx.controller.screen() {
        Screen::KycVerification(check) => Some(("Identity Verification", check)),
        Screen::QuestPhotoVerification { check, .. } => Some(("Verify Your Work", check)),
        _ => None,
    }
}

impl PhotoCheckScreen {
    fn body(&self, ctx: &AppCtx, check: &PhotoCheck) -> Vec<Line<'static>> {
        let quest_title = ctx.controller.selected_quest().map(|q| q.title.clone());
        match check {
            PhotoCheck::Idle => vec![
                Line::from(muted("Step 2 of 4")),
                Line::from("We need to confirm you're a real person."),
                Line::from("You'll photograph yourself holding a code we give you."),
                Line::from(""),
                button_line("Start Verification", true),
            ],
            PhotoCheck::Generating => vec![Line::from(muted("Generating your verification task..."))],
            PhotoCheck::Task(c) => {
                let mut lines = Vec::new();
                if let Some(title) = quest_title {
                    lines.push(Line::from(format!("Quest: {title}")));
                    lines.push(Line::from(""));
                }
                lines.extend([
                    Line::from(c.instruction.clone()),
                    Line::from(""),
                    Line::from(vec![muted("Code: "), accent(c.code.clone())]),
                    Line::from(""),
                    button_line("Open Camera", true),
                ]);
                lines
            }
            PhotoCheck::Capturing(c) => vec![
                Line::from(vec![muted("Code: "), accent(c.code.clone())]),
                Line::from(""),
                field_line_text("Photo (JPEG path)", &self.photo_path, true),
            ],
            PhotoCheck::Verifying(_) => vec![Line::from(muted("Verifying your photo..."))],
            PhotoCheck::Verified { reason, .. } => vec![
                Line::from(success("Verified!")),
                Line::from(reason.clone()),
                Line::from(""),
                Line::from(muted("Continuing...")),
            ],
            PhotoCheck::Failed { reason, .. } => vec![error_line(reason), Line::from(""), button_line("Try Again", true)],
        }
    }
}

#[async_trait]
impl ScreenWidget for PhotoCheckScreen {
    fn draw(&self, f: &mut Frame<'_>, size: Rect, ctx: &AppCtx) {
        let Some((title, check)) = current(ctx) else { return };
        let boxes = three_box_layout(size, 3, 3);
        f.render_widget(framed(" TaskTribe "), boxes.top);
        f.render_widget(Paragraph::new(heading(title)).alignment(Alignment::Center), boxes.top_inner);

        let mut lines = self.body(ctx, check);
        if let Some(err) = &self.error {
            lines.push(Line::from(""));
            lines.push(error_line(err));
        }
        f.render_widget(framed(""), boxes.middle);
        f.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true }),
            boxes.middle_inner,
        );

        let help = match check {
            PhotoCheck::Capturing(_) => help_bar(&[("Enter", "Capture"), ("Esc", "Close camera")]),
            PhotoCheck::Generating | PhotoCheck::Verifying(_) | PhotoCheck::Verified { .. } => help_wait(),
            _ => help_bar(&[("Enter", "Continue"), ("Esc", "Back")]),
        };
        f.render_widget(help, boxes.bottom);
    }

    async fn on_key(&mut self, k: KeyEvent, ctx: &mut AppCtx) -> Result<Transition> {
        let Some((_, check)) = current(ctx) else {
            return Ok(Transition::Stay);
        };
        let check = check.clone();
        let controller = &mut ctx.controller;

        if let PhotoCheck::Capturing(_) = check {
            match k.code {
                KeyCode::Esc => {
                    self.error = inline_error(controller.cancel_camera());
                }
                KeyCode::Enter => match PhotoPayload::from_path(Path::new(self.photo_path.text.trim())) {
                    Ok(photo) => {
                        self.error = inline_error(controller.capture_photo(photo));
                        self.photo_path = TextField::default();
                    }
                    Err(e) => {
                        warn!(error = %e, "could not read photo");
                        self.error = Some(format!("{e:#}"));
                    }
                },
                _ => {
                    self.photo_path.handle_key(&k);
                }
            }
            return Ok(Transition::Stay);
        }

        if esc_to_back(&k, controller) {
            return Ok(Transition::Stay);
        }
        if k.code == KeyCode::Enter {
            self.error = None;
            let result = match check {
                PhotoCheck::Idle => controller.start_photo_check(),
                PhotoCheck::Task(_) => controller.open_camera(),
                PhotoCheck::Failed { .. } => controller.retry_photo(),
                _ => Ok(()),
            };
            self.error = inline_error(result);
        }
        Ok(Transition::Stay)
    }
}
