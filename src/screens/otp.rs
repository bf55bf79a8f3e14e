use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    prelude::Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::inline_error;
use crate::app::{AppCtx, ScreenWidget, Transition};
use crate::controller::Screen;
use crate::defaults::Defaults;
use crate::ui::common_nav::esc_to_back;
use crate::ui::components::{error_line, framed, TextField};
use crate::ui::help::help_bar;
use crate::ui::layout::three_box_layout;
use crate::ui::style::{heading, muted};
use crate::validation::pasted_code;

/// Six code boxes. Used for the teen, guardian and adult checks alike.
#[derive(Default)]
pub struct OtpScreen {
    digits: TextField,
    error: Option<String>,
}

impl OtpScreen {
    fn boxes(&self) -> Line<'static> {
        let mut spans = Vec::new();
        let mut chars = self.digits.text.chars();
        for i in 0..Defaults::CODE_LENGTH {
            let focused = i == self.digits.cursor.min(Defaults::CODE_LENGTH - 1);
            let style = if focused {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let c = chars.next().unwrap_or('_');
            spans.push(Span::styled(format!("[{c}]"), style));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }

    /// Keep at most six digits; a pasted six-digit code fills every box.
    fn normalize(&mut self) {
        if let Some(code) = pasted_code(&self.digits.text) {
            self.digits.set(&code);
            return;
        }
        let digits: String =
            self.digits.text.chars().filter(|c| c.is_ascii_digit()).take(Defaults::CODE_LENGTH).collect();
        if digits != self.digits.text {
            self.digits.set(&digits);
        }
    }
}

#[async_trait]
impl ScreenWidget for OtpScreen {
    fn draw(&self, f: &mut Frame<'_>, size: Rect, ctx: &AppCtx) {
        let (title, check) = match ctx.controller.screen() {
            Screen::TeenOtpVerification(c) => ("Verify Your Phone", c),
            Screen::GuardianOtpVerification(c) => ("Verify Guardian's Phone", c),
            Screen::AdultOtpVerification(c) => ("Verify Your Email", c),
            _ => return,
        };
        let boxes = three_box_layout(size, 3, 3);
        f.render_widget(framed(" TaskTribe "), boxes.top);
        f.render_widget(Paragraph::new(heading(title)).alignment(Alignment::Center), boxes.top_inner);

        let mut lines = vec![
            Line::from("Enter the 6-digit code sent to"),
            Line::from(Span::styled(check.contact.clone(), Style::default().fg(Color::Yellow))),
            Line::from(""),
            self.boxes(),
        ];
        if let Some(err) = &self.error {
            lines.push(Line::from(""));
            lines.push(error_line(err));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(muted("Didn't get it? Go back and request a new code.")));
        f.render_widget(framed(""), boxes.middle);
        f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), boxes.middle_inner);
        f.render_widget(help_bar(&[("0-9", "Type code"), ("Enter", "Verify"), ("Esc", "Back")]), boxes.bottom);
    }

    async fn on_key(&mut self, k: KeyEvent, ctx: &mut AppCtx) -> Result<Transition> {
        if esc_to_back(&k, &mut ctx.controller) {
            return Ok(Transition::Stay);
        }
        match k.code {
            KeyCode::Enter => self.error = inline_error(ctx.controller.verify_code(&self.digits.text)),
            _ => {
                if self.digits.handle_key(&k) {
                    self.error = None;
                    self.normalize();
                }
            }
        }
        Ok(Transition::Stay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pasted_text_fills_all_boxes() {
        let mut s = OtpScreen::default();
        s.digits.set("code: 123 456");
        s.normalize();
        assert_eq!(s.digits.text, "123456");

        s.digits.set("12a3456789");
        s.normalize();
        assert_eq!(s.digits.text, "123456");
    }
}
