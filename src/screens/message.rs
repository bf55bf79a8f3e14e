//! Screens that show a message and offer at most one way forward.

use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    prelude::Frame,
    text::Line,
    widgets::{Paragraph, Wrap},
};
use tracing::debug;

use crate::app::{AppCtx, ScreenWidget, Transition};
use crate::controller::{Controller, FlowError, Screen};
use crate::defaults::Defaults;
use crate::ui::common_nav::esc_to_back;
use crate::ui::components::framed;
use crate::ui::help::{help_continue, help_wait};
use crate::ui::layout::three_box_layout;
use crate::ui::style::{accent, button_line, heading, muted, success};
use crate::util::rupees;

type Body = fn(&AppCtx) -> Vec<Line<'static>>;
type Action = fn(&mut Controller) -> Result<(), FlowError>;

pub struct MessageScreen {
    title: &'static str,
    body: Body,
    button: Option<(&'static str, Action)>,
}

impl MessageScreen {
    pub fn payment_setup() -> Self {
        Self {
            title: "Payout Method",
            body: |_| {
                vec![
                    Line::from(muted("Step 3 of 4")),
                    heading("Setup Your Payout Method"),
                    Line::from("This is how you'll receive your earnings."),
                    Line::from(""),
                    Line::from(muted("Bank account or UPI details can be added from your profile later.")),
                ]
            },
            button: Some(("Save and Continue", Controller::complete_payment)),
        }
    }

    pub fn profile_setup() -> Self {
        Self {
            title: "Professional Profile",
            body: |_| {
                vec![
                    Line::from(muted("Step 4 of 4")),
                    heading("Setup Your Professional Profile"),
                    Line::from("This will be visible to clients and other users."),
                ]
            },
            button: Some(("Complete Profile", Controller::complete_profile)),
        }
    }

    pub fn onboarding_complete() -> Self {
        Self {
            title: "Welcome",
            body: |ctx| {
                let name = ctx.controller.user().map(|u| u.display_name().to_string()).unwrap_or_default();
                vec![
                    heading("You're all set!"),
                    Line::from(format!("Welcome to TaskTribe, {name}.")),
                    Line::from("Your account is verified and ready for quests."),
                ]
            },
            button: Some(("Start Exploring", Controller::finish_onboarding)),
        }
    }

    pub fn application_submitted() -> Self {
        Self {
            title: "Application",
            body: |_| {
                vec![
                    heading("Application Sent!"),
                    Line::from("You'll be notified if you're selected. For now, let's assume you were!"),
                ]
            },
            button: Some(("Start Task", Controller::continue_to_task)),
        }
    }

    pub fn bid_submitted() -> Self {
        Self {
            title: "Bid",
            body: |ctx| {
                let title = ctx.controller.selected_quest().map(|q| q.title.clone()).unwrap_or_default();
                vec![
                    heading("Bid Submitted!"),
                    Line::from(format!("Your proposal for \"{title}\" is with the quest creator.")),
                ]
            },
            button: Some(("Back to Quests", Controller::finish_bid)),
        }
    }

    pub fn submitting_task() -> Self {
        Self {
            title: "Submitting",
            body: |_| {
                vec![
                    heading("Submitting your work..."),
                    Line::from(muted("Checking it against the community guidelines.")),
                ]
            },
            button: None,
        }
    }

    pub fn submission_confirmation() -> Self {
        Self {
            title: "Submitted",
            body: |_| vec![heading("Task Submitted!"), Line::from("It will be reviewed shortly. Great work!")],
            button: Some(("See Result", Controller::continue_to_photo_verification)),
        }
    }

    pub fn submission_rejected() -> Self {
        Self {
            title: "Rejected",
            body: |ctx| {
                let reason = match ctx.controller.screen() {
                    Screen::SubmissionRejected { reason, .. } if !reason.is_empty() => reason.clone(),
                    _ => Defaults::MSG_UNKNOWN_REJECTION.to_string(),
                };
                vec![heading("Submission Rejected"), Line::from(""), Line::from(reason)]
            },
            button: Some(("Try Again", Controller::retry_submission)),
        }
    }

    pub fn quest_complete() -> Self {
        Self {
            title: "Quest Complete",
            body: |ctx| {
                let Screen::QuestComplete { credited, .. } = ctx.controller.screen() else {
                    return Vec::new();
                };
                let won_by_bid = ctx.controller.selected_quest().is_some_and(|q| q.winner.is_some());
                let earned =
                    if won_by_bid { rupees(*credited) } else { format!("{credited} Skill Points!") };
                let xp = ctx.controller.user().map(|u| u.xp).unwrap_or_default();
                vec![
                    heading("Submission Approved!"),
                    Line::from("Your work has been verified. You earned:"),
                    Line::from(success(earned)),
                    Line::from(""),
                    Line::from(vec![muted("Total XP: "), accent(xp.to_string())]),
                ]
            },
            button: Some(("Awesome!", Controller::finish_quest)),
        }
    }
}

#[async_trait]
impl ScreenWidget for MessageScreen {
    fn title(&self) -> &str {
        self.title
    }

    fn draw(&self, f: &mut Frame<'_>, size: Rect, ctx: &AppCtx) {
        let boxes = three_box_layout(size, 3, 3);
        f.render_widget(framed(" TaskTribe "), boxes.top);
        f.render_widget(Paragraph::new(heading(self.title)).alignment(Alignment::Center), boxes.top_inner);

        let mut lines = (self.body)(ctx);
        if let Some((label, _)) = self.button {
            lines.push(Line::from(""));
            lines.push(button_line(label, true));
        }
        f.render_widget(framed(""), boxes.middle);
        f.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true }),
            boxes.middle_inner,
        );

        let help = if self.button.is_some() { help_continue() } else { help_wait() };
        f.render_widget(help, boxes.bottom);
    }

    async fn on_key(&mut self, k: KeyEvent, ctx: &mut AppCtx) -> Result<Transition> {
        if esc_to_back(&k, &mut ctx.controller) {
            return Ok(Transition::Stay);
        }
        if let (KeyCode::Enter, Some((_, action))) = (k.code, self.button) {
            if let Err(e) = action(&mut ctx.controller) {
                debug!(error = %e, "message screen action ignored");
            }
        }
        Ok(Transition::Stay)
    }
}
