use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    prelude::Frame,
    text::Line,
    widgets::{Paragraph, Wrap},
};

use super::inline_error;
use crate::app::{AppCtx, ScreenWidget, Transition};
use crate::ui::common_nav::esc_to_back;
use crate::ui::components::{error_line, field_line_text, framed, Focus, TextField};
use crate::ui::help::help_form;
use crate::ui::layout::three_box_layout;
use crate::ui::style::{button_line, heading, muted};
use crate::util::rupees;
use crate::validation::{self, MIN_PROPOSAL_CHARS};

pub struct BiddingScreen {
    focus: Focus, // 0 amount, 1 proposal, 2 submit
    amount: TextField,
    proposal: TextField,
    error: Option<String>,
}

impl BiddingScreen {
    pub fn new() -> Self {
        Self { focus: Focus::new(3), amount: TextField::default(), proposal: TextField::default(), error: None }
    }

    fn submit(&mut self, ctx: &mut AppCtx) {
        self.error = match validation::bid(&self.amount.text, &self.proposal.text) {
            Ok(amount) => inline_error(ctx.controller.place_bid(amount, self.proposal.text.trim())),
            Err(e) => Some(e.to_string()),
        };
    }
}

#[async_trait]
impl ScreenWidget for BiddingScreen {
    fn draw(&self, f: &mut Frame<'_>, size: Rect, ctx: &AppCtx) {
        let Some(quest) = ctx.controller.selected_quest() else { return };
        let boxes = three_box_layout(size, 3, 3);
        f.render_widget(framed(" Place Bid "), boxes.top);
        f.render_widget(Paragraph::new(heading(format!("Place Bid on: {}", quest.title))), boxes.top_inner);

        let budget = quest.pricing.budget().unwrap_or_default();
        let typed = self.proposal.text.trim().chars().count();
        let mut lines = vec![
            field_line_text("Your Bid Amount (in ₹)", &self.amount, self.focus.is(0)),
            Line::from(muted(format!("Client's budget is up to {}", rupees(budget)))),
            Line::from(""),
            field_line_text("Your Proposal", &self.proposal, self.focus.is(1)),
            Line::from(muted(format!("{typed}/{MIN_PROPOSAL_CHARS} characters minimum"))),
            Line::from(""),
            button_line("Submit Bid", self.focus.is(2)),
        ];
        if let Some(err) = &self.error {
            lines.push(Line::from(""));
            lines.push(error_line(err));
        }
        f.render_widget(framed(""), boxes.middle);
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), boxes.middle_inner);
        f.render_widget(help_form(), boxes.bottom);
    }

    async fn on_key(&mut self, k: KeyEvent, ctx: &mut AppCtx) -> Result<Transition> {
        if esc_to_back(&k, &mut ctx.controller) || self.focus.handle_key(&k) {
            return Ok(Transition::Stay);
        }
        match (self.focus.index, k.code) {
            (2, KeyCode::Enter) => self.submit(ctx),
            (_, KeyCode::Enter) => self.focus.next(),
            (0, _) => {
                self.amount.handle_digit_key(&k);
            }
            (1, _) => {
                self.proposal.handle_key(&k);
            }
            _ => {}
        }
        Ok(Transition::Stay)
    }
}
