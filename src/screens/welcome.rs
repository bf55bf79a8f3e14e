use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    prelude::Frame,
    text::Line,
    widgets::{Clear, Paragraph},
};

use crate::app::{AppCtx, ScreenWidget, Transition};
use crate::ui::components::framed;
use crate::ui::help::help_bar;
use crate::ui::layout::{centered_rect_abs, three_box_layout};
use crate::ui::style::{buttons_line, heading, muted};

pub struct SplashScreen;

#[async_trait]
impl ScreenWidget for SplashScreen {
    fn draw(&self, f: &mut Frame<'_>, size: Rect, _ctx: &AppCtx) {
        let area = centered_rect_abs(44, 7, size);
        let lines = vec![
            Line::from(""),
            heading("TaskTribe"),
            Line::from(muted("Skills. Quests. Tribes.")),
        ];
        f.render_widget(Clear, area);
        f.render_widget(Paragraph::new(lines).alignment(Alignment::Center).block(framed("")), area);
    }

    async fn on_key(&mut self, _k: KeyEvent, ctx: &mut AppCtx) -> Result<Transition> {
        let _ = ctx.controller.dismiss_splash();
        Ok(Transition::Stay)
    }
}

#[derive(Default)]
pub struct AgeSelectionScreen {
    selected: usize, // 0 = teen, 1 = adult
}

#[async_trait]
impl ScreenWidget for AgeSelectionScreen {
    fn title(&self) -> &str {
        "Who's joining?"
    }

    fn draw(&self, f: &mut Frame<'_>, size: Rect, _ctx: &AppCtx) {
        let boxes = three_box_layout(size, 3, 3);
        f.render_widget(Paragraph::new(heading("Welcome to TaskTribe")).alignment(Alignment::Center), boxes.top);

        let lines = vec![
            Line::from(self.title()),
            Line::from(""),
            Line::from(muted("Teens (13-17) earn Skill Points with a guardian's consent.")),
            Line::from(muted("Adults complete KYC and get paid in rupees.")),
            Line::from(""),
            buttons_line(&["I'm a Teen", "I'm an Adult"], Some(self.selected)),
        ];
        f.render_widget(framed(""), boxes.middle);
        f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), boxes.middle_inner);
        f.render_widget(help_bar(&[("←/→", "Choose"), ("Enter", "Continue")]), boxes.bottom);
    }

    async fn on_key(&mut self, k: KeyEvent, ctx: &mut AppCtx) -> Result<Transition> {
        match k.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => self.selected = 1 - self.selected,
            KeyCode::Enter => {
                let _ = if self.selected == 0 {
                    ctx.controller.select_teen()
                } else {
                    ctx.controller.select_adult()
                };
            }
            _ => {}
        }
        Ok(Transition::Stay)
    }
}
