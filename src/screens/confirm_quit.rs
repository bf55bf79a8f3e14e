use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    prelude::Frame,
    text::Line,
    widgets::{Clear, Paragraph},
};

use crate::app::{AppCtx, ScreenWidget, Transition};
use crate::ui::components::framed;
use crate::ui::layout::centered_rect_abs;
use crate::ui::style::buttons_line;

const MESSAGE: &str = "Do you really want to quit TaskTribe?";
const BUTTONS: [&str; 2] = ["Stay", "Quit"];

/// Ctrl+Q overlay. Quitting drops any in-flight call and pending timer.
pub struct ConfirmQuitScreen {
    selected: usize, // 0 = Stay, 1 = Quit
}

impl ConfirmQuitScreen {
    pub fn new() -> Self {
        Self { selected: 0 }
    }
}

#[async_trait]
impl ScreenWidget for ConfirmQuitScreen {
    fn title(&self) -> &str {
        ""
    }

    fn draw(&self, f: &mut Frame<'_>, size: Rect, _ctx: &AppCtx) {
        let width = (MESSAGE.len() as u16).max(36) + 4;
        let area = centered_rect_abs(width, 7, size);
        let inner = area.inner(&Margin { horizontal: 2, vertical: 1 });
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1); 4])
            .split(inner);

        f.render_widget(Clear, area);
        f.render_widget(framed(self.title()), area);
        f.render_widget(Paragraph::new(Line::from(MESSAGE)).alignment(Alignment::Center), rows[1]);
        f.render_widget(
            Paragraph::new(buttons_line(&BUTTONS, Some(self.selected))).alignment(Alignment::Center),
            rows[3],
        );
    }

    async fn on_key(&mut self, k: KeyEvent, _ctx: &mut AppCtx) -> Result<Transition> {
        match k.code {
            KeyCode::Esc => return Ok(Transition::Pop),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char(' ') => {
                self.selected = 1 - self.selected;
            }
            KeyCode::Enter => {
                return Ok(if self.selected == 1 { Transition::Quit } else { Transition::Pop });
            }
            _ => {}
        }
        Ok(Transition::Stay)
    }
}
