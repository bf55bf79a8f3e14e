//! Free-text entry against a quest: the application note, and the work
//! submission that goes to moderation.

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
use crate::ui::style::{button_line, button_spans_disabled, heading, muted};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Application,
    Task,
}

pub struct ActiveTaskScreen {
    mode: Mode,
    focus: Focus, // 0 text, 1 submit
    text: TextField,
    error: Option<String>,
}

impl ActiveTaskScreen {
    pub fn application() -> Self {
        Self { mode: Mode::Application, focus: Focus::new(2), text: TextField::default(), error: None }
    }

    pub fn task() -> Self {
        Self { mode: Mode::Task, ..Self::application() }
    }

    fn labels(&self) -> (&'static str, &'static str, &'static str) {
        match self.mode {
            Mode::Application => ("Tell them why you're a good fit!", "Your note", "Submit Application"),
            Mode::Task => (
                "Enter your final submission text, links, or notes here. The client will review this once you submit.",
                "Your Submission",
                "Submit Task for Review",
            ),
        }
    }
}

#[async_trait]
impl ScreenWidget for ActiveTaskScreen {
    fn draw(&self, f: &mut Frame<'_>, size: Rect, ctx: &AppCtx) {
        let Some(quest) = ctx.controller.selected_quest() else { return };
        let (intro, label, button) = self.labels();

        let boxes = three_box_layout(size, 4, 3);
        f.render_widget(framed(" Quest "), boxes.top);
        let top = match self.mode {
            Mode::Application => vec![heading(format!("Apply for \"{}\"", quest.title))],
            Mode::Task => vec![Line::from(muted("Working on:")), heading(quest.title.clone())],
        };
        f.render_widget(Paragraph::new(top), boxes.top_inner);

        let submit = if self.mode == Mode::Task && self.text.text.trim().is_empty() {
            Line::from(button_spans_disabled(button))
        } else {
            button_line(button, self.focus.is(1))
        };
        let mut lines = vec![
            Line::from(muted(intro)),
            Line::from(""),
            field_line_text(label, &self.text, self.focus.is(0)),
            Line::from(""),
            submit,
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
            (1, KeyCode::Enter) => {
                let result = match self.mode {
                    Mode::Application => ctx.controller.submit_application(),
                    Mode::Task => ctx.controller.submit_task(&self.text.text),
                };
                self.error = inline_error(result);
            }
            (0, KeyCode::Enter) => self.focus.next(),
            (0, _) => {
                self.text.handle_key(&k);
            }
            _ => {}
        }
        Ok(Transition::Stay)
    }
}
