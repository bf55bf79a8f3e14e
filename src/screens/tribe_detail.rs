use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    prelude::Frame,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::inline_error;
use crate::app::{AppCtx, ScreenWidget, Transition};
use crate::controller::Screen;
use crate::types::{Tribe, TribeStatus};
use crate::ui::common_nav::esc_to_back;
use crate::ui::components::{error_line, framed};
use crate::ui::help::help_bar;
use crate::ui::layout::three_box_layout;
use crate::ui::style::{accent, button_line, button_spans_disabled, heading, muted, sub_tabs};

const TABS: [&str; 2] = ["Overview", "Members"];

#[derive(Default)]
pub struct TribeDetailScreen {
    tab: usize,
    error: Option<String>,
}

impl TribeDetailScreen {
    fn overview(tribe: &Tribe) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(vec![
                accent(format!("{}K", tribe.level)),
                muted(" Total XP   "),
                accent(format!("{}/{}", tribe.members, tribe.max_members)),
                muted(" Members   "),
                accent(format!("#{}", tribe.rank)),
                muted(" Rank   "),
                accent(format!("{}%", tribe.win_rate)),
                muted(" Win Rate"),
            ]),
            Line::from(muted(tribe.tags.iter().map(|t| format!("#{t}")).collect::<Vec<_>>().join("  "))),
            Line::from(""),
            heading("About"),
        ];
        lines.push(Line::from(format!(
            "{} is a {} tier tribe. {}.",
            tribe.name, tribe.level_name, tribe.tagline
        )));
        lines
    }

    fn members(ctx: &AppCtx, tribe: &Tribe) -> Vec<Line<'static>> {
        if tribe.id != ctx.controller.home_tribe().id {
            return vec![Line::from(muted("The member list is visible once you join."))];
        }
        ctx.controller
            .home_members()
            .iter()
            .map(|m| {
                Line::from(vec![
                    Span::raw(m.name.clone()),
                    muted(format!("  {} · Lv {} · {} XP", m.role.label(), m.level, m.xp)),
                ])
            })
            .collect()
    }
}

#[async_trait]
impl ScreenWidget for TribeDetailScreen {
    fn draw(&self, f: &mut Frame<'_>, size: Rect, ctx: &AppCtx) {
        let Screen::TribeDetail(tribe) = ctx.controller.screen() else { return };

        let boxes = three_box_layout(size, 4, 3);
        f.render_widget(framed(" Tribe "), boxes.top);
        f.render_widget(
            Paragraph::new(vec![heading(tribe.name.clone()), Line::from(muted(tribe.tagline.clone()))]),
            boxes.top_inner,
        );

        let mut lines = vec![sub_tabs(&TABS, self.tab), Line::from("")];
        lines.extend(match self.tab {
            0 => Self::overview(tribe),
            _ => Self::members(ctx, tribe),
        });
        lines.push(Line::from(""));
        lines.push(match tribe.status {
            TribeStatus::Full => Line::from(button_spans_disabled("Tribe Full")),
            _ => button_line("Join Tribe", true),
        });
        if let Some(err) = &self.error {
            lines.push(error_line(err));
        }
        f.render_widget(framed(""), boxes.middle);
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), boxes.middle_inner);
        f.render_widget(help_bar(&[("←/→", "Tab"), ("Enter", "Join"), ("Esc", "Back")]), boxes.bottom);
    }

    async fn on_key(&mut self, k: KeyEvent, ctx: &mut AppCtx) -> Result<Transition> {
        if esc_to_back(&k, &mut ctx.controller) {
            return Ok(Transition::Stay);
        }
        match k.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => self.tab = (self.tab + 1) % TABS.len(),
            KeyCode::Enter => {
                let full = matches!(
                    ctx.controller.screen(),
                    Screen::TribeDetail(Tribe { status: TribeStatus::Full, .. })
                );
                if !full {
                    self.error = inline_error(ctx.controller.join_tribe());
                }
            }
            _ => {}
        }
        Ok(Transition::Stay)
    }
}
