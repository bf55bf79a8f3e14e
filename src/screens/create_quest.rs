//! Quest posting form for adults. Posting needs an assistant analysis that
//! did not classify the quest as a job listing.

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
use crate::assistant::QuestValidation;
use crate::controller::{PendingCall, Screen};
use crate::types::QuestType;
use crate::ui::common_nav::esc_to_back;
use crate::ui::components::{choice_line, error_line, field_line_text, framed, Focus, TextField};
use crate::ui::help::help_bar;
use crate::ui::layout::three_box_layout;
use crate::ui::style::{accent, buttons_line, heading, muted, success};
use crate::util::rupees;
use crate::validation::QuestForm;

const ANALYZE: &str = "Analyze Quest with AI";
const USE_SUGGESTION: &str = "Use this suggestion";
const POST: &str = "Post Quest";

pub struct CreateQuestScreen {
    focus: Focus, // 0 title, 1 description, 2 type, 3 budget, 4 deadline, 5 buttons
    button: usize,
    title: TextField,
    description: TextField,
    kind: QuestType,
    budget: TextField,
    deadline: TextField,
    error: Option<String>,
}

fn analysis(ctx: &AppCtx) -> Option<&QuestValidation> {
    match ctx.controller.screen() {
        Screen::CreateQuest { analysis } => analysis.as_ref(),
        _ => None,
    }
}

fn buttons(analysed: bool) -> Vec<&'static str> {
    if analysed {
        vec![ANALYZE, USE_SUGGESTION, POST]
    } else {
        vec![ANALYZE, POST]
    }
}

impl CreateQuestScreen {
    pub fn new() -> Self {
        Self {
            focus: Focus::new(6),
            button: 0,
            title: TextField::default(),
            description: TextField::default(),
            kind: QuestType::Professional,
            budget: TextField::default(),
            deadline: TextField::default(),
            error: None,
        }
    }

    fn form(&self) -> QuestForm {
        QuestForm {
            title: self.title.text.trim().to_string(),
            description: self.description.text.trim().to_string(),
            budget: self.budget.text.clone(),
            deadline: self.deadline.text.trim().to_string(),
            kind: self.kind,
        }
    }

    fn cycle_kind(&mut self, step: isize) {
        let all = QuestType::all();
        let at = all.iter().position(|k| *k == self.kind).unwrap_or(0) as isize;
        let len = all.len() as isize;
        self.kind = all[((at + step).rem_euclid(len)) as usize];
    }

    fn press(&mut self, label: &str, ctx: &mut AppCtx) {
        let form = self.form();
        self.error = match label {
            ANALYZE => inline_error(ctx.controller.analyze_quest(&form)),
            USE_SUGGESTION => {
                if let Some(a) = analysis(ctx).cloned() {
                    let mut form = form;
                    form.use_suggestion(&a);
                    self.description.set(&form.description);
                    self.budget.set(&form.budget);
                }
                None
            }
            POST => inline_error(ctx.controller.create_quest(&form)),
            _ => None,
        };
    }

    fn analysis_lines(analysis: &QuestValidation) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(""), heading("AI Analysis")];
        if analysis.is_job_posting {
            lines.push(error_line("Quest Policy Violation"));
            lines.push(Line::from(analysis.job_posting_reason.clone()));
            return lines;
        }
        lines.push(Line::from(success("Looks like a valid quest.")));
        if !analysis.is_budget_realistic {
            lines.push(Line::from(vec![
                muted("Suggested budget: up to "),
                accent(rupees(analysis.suggested_max_budget.round().max(0.0) as u64)),
            ]));
        }
        lines.push(Line::from(analysis.suggestion.clone()));
        lines.push(Line::from(muted("Improved description:")));
        lines.push(Line::from(analysis.improved_description.clone()));
        lines
    }
}

#[async_trait]
impl ScreenWidget for CreateQuestScreen {
    fn draw(&self, f: &mut Frame<'_>, size: Rect, ctx: &AppCtx) {
        let analysis = analysis(ctx);
        let boxes = three_box_layout(size, 3, 3);
        f.render_widget(framed(" TaskTribe "), boxes.top);
        f.render_widget(Paragraph::new(heading("Post a New Quest")), boxes.top_inner);

        let labels = buttons(analysis.is_some());
        let mut lines = vec![
            field_line_text("Title", &self.title, self.focus.is(0)),
            field_line_text("Description", &self.description, self.focus.is(1)),
            choice_line("Quest Type", self.kind.label(), self.focus.is(2)),
            field_line_text("Budget (₹)", &self.budget, self.focus.is(3)),
            field_line_text("Deadline (YYYY-MM-DD)", &self.deadline, self.focus.is(4)),
            Line::from(""),
            buttons_line(&labels, self.focus.is(5).then_some(self.button.min(labels.len() - 1))),
        ];
        if matches!(ctx.controller.pending(), Some(PendingCall::AnalyzeQuest { .. })) {
            lines.push(Line::from(""));
            lines.push(Line::from(muted("Analyzing...")));
        }
        if let Some(a) = analysis {
            lines.extend(Self::analysis_lines(a));
        }
        if let Some(msg) = self.error.as_deref().or(ctx.controller.notice()) {
            lines.push(Line::from(""));
            lines.push(error_line(msg));
        }
        f.render_widget(framed(""), boxes.middle);
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), boxes.middle_inner);
        f.render_widget(
            help_bar(&[("↑/↓/Tab", "Move"), ("←/→", "Choose"), ("Enter", "Select"), ("Esc", "Back")]),
            boxes.bottom,
        );
    }

    async fn on_key(&mut self, k: KeyEvent, ctx: &mut AppCtx) -> Result<Transition> {
        if esc_to_back(&k, &mut ctx.controller) || self.focus.handle_key(&k) {
            return Ok(Transition::Stay);
        }
        let labels = buttons(analysis(ctx).is_some());
        match (self.focus.index, k.code) {
            (2, KeyCode::Left) => self.cycle_kind(-1),
            (2, KeyCode::Right | KeyCode::Char(' ')) => self.cycle_kind(1),
            (5, KeyCode::Left) => self.button = self.button.saturating_sub(1),
            (5, KeyCode::Right) => self.button = (self.button + 1).min(labels.len() - 1),
            (5, KeyCode::Enter) => {
                let label = labels[self.button.min(labels.len() - 1)];
                self.press(label, ctx);
            }
            (_, KeyCode::Enter) => self.focus.next(),
            (0, _) => {
                self.title.handle_key(&k);
            }
            (1, _) => {
                self.description.handle_key(&k);
            }
            (3, _) => {
                self.budget.handle_digit_key(&k);
            }
            (4, _) => {
                self.deadline.handle_key(&k);
            }
            _ => {}
        }
        Ok(Transition::Stay)
    }
}
