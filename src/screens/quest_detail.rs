use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    prelude::Frame,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::inline_error;
use crate::app::{AppCtx, ScreenWidget, Transition};
use crate::types::{Pricing, Quest};
use crate::ui::common_nav::esc_to_back;
use crate::ui::components::{error_line, framed};
use crate::ui::help::help_bar;
use crate::ui::layout::three_box_layout;
use crate::ui::style::{accent, button_line, heading, muted, status_span};
use crate::util::{rupees, time_ago, time_left};

#[derive(Default)]
pub struct QuestDetailScreen {
    error: Option<String>,
}

fn action_label(quest: &Quest, viewer: Option<&str>) -> &'static str {
    match quest.pricing {
        Pricing::Budget(_) if viewer == Some(quest.creator_id.as_str()) => "View Bids",
        Pricing::Budget(_) => "Place Bid",
        Pricing::Reward(_) => "Apply Now",
    }
}

#[async_trait]
impl ScreenWidget for QuestDetailScreen {
    fn draw(&self, f: &mut Frame<'_>, size: Rect, ctx: &AppCtx) {
        let Some(quest) = ctx.controller.selected_quest() else { return };
        let now = ctx.controller.now();
        let viewer = ctx.controller.user().map(|u| u.username.as_str());

        let boxes = three_box_layout(size, 4, 3);
        f.render_widget(framed(" Quest "), boxes.top);
        f.render_widget(
            Paragraph::new(vec![Line::from(muted(format!("Quest by {}", quest.company))), heading(quest.title.clone())]),
            boxes.top_inner,
        );

        let pay = match quest.pricing {
            Pricing::Reward(r) => Line::from(vec![muted("Reward  "), accent(rupees(r))]),
            Pricing::Budget(b) => Line::from(vec![muted("Budget  "), accent(format!("Up to {}", rupees(b)))]),
        };
        let mut lines = vec![
            Line::from(vec![
                muted("Type "),
                Span::raw(quest.kind.label()),
                muted("   Level Req. "),
                Span::raw(format!("{}+", quest.level)),
                muted("   Time Left "),
                Span::raw(time_left(quest.deadline, now)),
                muted("   "),
                status_span(quest.status),
            ]),
            pay,
            Line::from(""),
            heading("Description"),
            Line::from(quest.description.clone()),
        ];

        if let Some(w) = &quest.winner {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![muted("Awarded to "), accent(w.user_id.clone()), muted(format!(" for {}", rupees(w.bid_amount)))]));
        }

        if viewer == Some(quest.creator_id.as_str()) && !quest.bids.is_empty() {
            lines.push(Line::from(""));
            lines.push(heading("Bids Received"));
            for bid in &quest.bids {
                lines.push(Line::from(vec![
                    accent(bid.username.clone()),
                    muted(format!("  placed {}  ", time_ago(bid.timestamp, now))),
                    Span::raw(rupees(bid.amount)),
                ]));
                lines.push(Line::from(muted(format!("  {}", bid.proposal))));
            }
        }

        lines.push(Line::from(""));
        lines.push(button_line(action_label(quest, viewer), true));
        if let Some(err) = &self.error {
            lines.push(error_line(err));
        }

        f.render_widget(framed(""), boxes.middle);
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), boxes.middle_inner);
        f.render_widget(
            help_bar(&[("Enter", action_label(quest, viewer)), ("Esc", "Back")]).alignment(Alignment::Left),
            boxes.bottom,
        );
    }

    async fn on_key(&mut self, k: KeyEvent, ctx: &mut AppCtx) -> Result<Transition> {
        if esc_to_back(&k, &mut ctx.controller) {
            return Ok(Transition::Stay);
        }
        if k.code == KeyCode::Enter {
            self.error = inline_error(ctx.controller.quest_action());
        }
        Ok(Transition::Stay)
    }
}
