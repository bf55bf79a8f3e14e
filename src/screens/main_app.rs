//! The signed-in shell: home, quests, tribes and profile views behind a tab bar.

use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    prelude::Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
};
use time::OffsetDateTime;
use tracing::warn;

use super::inline_error;
use crate::app::{AppCtx, ScreenWidget, Transition};
use crate::controller::{MainView, Screen};
use crate::types::{ChatRole, Pricing, Quest, TribeMember, User};
use crate::tutorial::{should_show, Tutorial, STEPS};
use crate::ui::common_nav::esc_to_back;
use crate::ui::components::{error_line, field_line_text, framed, TextField};
use crate::ui::help::help_bar;
use crate::ui::layout::{centered_rect_abs, three_box_layout};
use crate::ui::style::{accent, heading, muted, status_span, sub_tabs};
use crate::util::{rupees, time_left};

#[derive(Clone, Copy, PartialEq, Eq)]
enum QuestsTab {
    Find,
    Yours,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TribeTab {
    Chat,
    Members,
    War,
}

impl TribeTab {
    fn index(self) -> usize {
        match self {
            TribeTab::Chat => 0,
            TribeTab::Members => 1,
            TribeTab::War => 2,
        }
    }

    fn step(self, forward: bool) -> Self {
        let all = [TribeTab::Chat, TribeTab::Members, TribeTab::War];
        let next = if forward { self.index() + 1 } else { self.index() + all.len() - 1 };
        all[next % all.len()]
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ProfileTab {
    About,
    Bids,
    Posted,
}

enum Item {
    Quest(String),
    Tribe(String),
}

pub struct MainAppScreen {
    cursor: usize,
    quests_tab: QuestsTab,
    profile_tab: ProfileTab,
    tribe_tab: TribeTab,
    // typing into the tribe chat; number and letter shortcuts are off meanwhile
    composing: bool,
    chat_input: TextField,
    by_deadline: bool,
    tutorial: Option<Tutorial>,
    error: Option<String>,
}

impl MainAppScreen {
    pub fn new(ctx: &AppCtx) -> Self {
        let tutorial = ctx
            .controller
            .user()
            .filter(|u| should_show(u, &ctx.prefs))
            .map(|_| Tutorial::default());
        Self {
            cursor: 0,
            quests_tab: QuestsTab::Find,
            profile_tab: ProfileTab::Posted,
            tribe_tab: TribeTab::Chat,
            composing: false,
            chat_input: TextField::default(),
            by_deadline: false,
            tutorial,
            error: None,
        }
    }

    fn view(ctx: &AppCtx) -> MainView {
        match ctx.controller.screen() {
            Screen::MainApp(view) => *view,
            _ => MainView::Home,
        }
    }

    fn items(&self, ctx: &AppCtx) -> Vec<Item> {
        let Some(user) = ctx.controller.user() else {
            return Vec::new();
        };
        let book = ctx.controller.quests();
        let quests: Vec<&Quest> = match Self::view(ctx) {
            MainView::Home => book.open(self.by_deadline),
            MainView::Quests if self.quests_tab == QuestsTab::Find => book.findable_by(&user.username),
            MainView::Quests => book.involving(&user.username),
            MainView::Tribes if user.is_tribe_member => Vec::new(),
            MainView::Tribes => {
                return ctx.controller.tribes().iter().map(|t| Item::Tribe(t.id.clone())).collect();
            }
            MainView::Profile if !user.is_adult => Vec::new(),
            MainView::Profile => match self.profile_tab {
                ProfileTab::About => Vec::new(),
                ProfileTab::Bids => {
                    book.iter().filter(|q| q.bids.iter().any(|b| b.username == user.username)).collect()
                }
                ProfileTab::Posted => book.posted_by(&user.username),
            },
        };
        quests.into_iter().map(|q| Item::Quest(q.id.clone())).collect()
    }

    fn finish_tutorial(&mut self, ctx: &mut AppCtx) {
        self.tutorial = None;
        if let Err(e) = ctx.prefs.mark_tutorial_completed() {
            warn!(error = %e, "could not persist tutorial flag");
        }
    }

    fn send_chat(&mut self, ctx: &mut AppCtx) {
        self.error = inline_error(ctx.controller.send_tribe_message(&self.chat_input.text));
        if self.error.is_none() {
            self.chat_input.set("");
            self.composing = false;
        }
    }

    fn go(&mut self, ctx: &mut AppCtx, view: MainView) {
        self.cursor = 0;
        self.error = inline_error(ctx.controller.navigate(view));
    }
}

/* ───────────── rendering ───────────── */

fn marker(selected: bool) -> Span<'static> {
    if selected {
        Span::styled("› ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    } else {
        Span::raw("  ")
    }
}

fn quest_row(q: &Quest, selected: bool, now: OffsetDateTime) -> Line<'static> {
    let pay = match q.pricing {
        Pricing::Reward(sp) => format!("{sp} SP"),
        Pricing::Budget(b) => format!("{} budget", rupees(b)),
    };
    let title_style = if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(vec![
        marker(selected),
        Span::styled(q.title.clone(), title_style),
        muted(format!("  {} · {}  ", q.company, q.kind.label())),
        accent(pay),
        muted(format!("  {}  ", time_left(q.deadline, now))),
        status_span(q.status),
        muted(if q.pricing.is_bidding() { format!("  {} bids", q.bids.len()) } else { String::new() }),
    ])
}

fn member_lines(members: &[TribeMember]) -> Vec<Line<'static>> {
    let mut by_xp: Vec<&TribeMember> = members.iter().collect();
    by_xp.sort_by(|a, b| b.xp.cmp(&a.xp));
    by_xp
        .into_iter()
        .map(|m| {
            Line::from(vec![
                Span::raw(format!("  {}", m.name)),
                muted(format!("  Level {} - {}  ", m.level, m.role.label())),
                accent(format!("{} XP", m.xp)),
                muted(format!(" · {} quests", m.quests_completed)),
            ])
        })
        .collect()
}

fn war_lines(ctx: &AppCtx) -> Vec<Line<'static>> {
    let war = ctx.controller.tribe_war();
    let mut lines = vec![
        heading(war.title.clone()),
        Line::from(vec![muted("Live now! Ends in "), accent(war.ends_in.clone())]),
        Line::from(""),
        heading("Live Rankings"),
    ];
    for s in &war.standings {
        let name_style = if s.is_user_tribe {
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let rank_style = if s.rank <= 3 { Style::default().fg(Color::Yellow) } else { Style::default() };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:>2}  ", s.rank), rank_style),
            Span::styled(s.name.clone(), name_style),
            muted(format!("  {} XP", s.xp)),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(heading("Bonus Missions"));
    for m in &war.missions {
        let mut spans = vec![Span::raw(format!("  {}  ", m.title)), accent(m.reward.clone())];
        if let Some(progress) = &m.progress {
            spans.push(muted(format!("  {progress}")));
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn tab_bar(active: MainView) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, view) in MainView::all().into_iter().enumerate() {
        let label = format!(" {} {} ", i + 1, view.label());
        let style = if view == active {
            Style::default().fg(Color::Black).bg(Color::Magenta).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Magenta)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

impl MainAppScreen {
    fn quest_lines(&self, ctx: &AppCtx, items: &[Item], empty: &'static str) -> Vec<Line<'static>> {
        let now = ctx.controller.now();
        if items.is_empty() {
            return vec![Line::from(muted(empty))];
        }
        items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| match item {
                Item::Quest(id) => ctx.controller.quests().get(id).map(|q| quest_row(q, i == self.cursor, now)),
                Item::Tribe(_) => None,
            })
            .collect()
    }

    fn home(&self, ctx: &AppCtx, user: &User, items: &[Item]) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(vec![muted("XP "), accent(user.xp.to_string()), muted(format!("   Level {}", user.level))]),
            Line::from(muted(if user.is_adult {
                "Welcome back!"
            } else {
                "Complete your first quest to start earning!"
            })),
            Line::from(""),
            heading(format!("Hi {}! Ready for a quest?", user.username)),
            Line::from(""),
            sub_tabs(&["Latest", "Deadline"], usize::from(self.by_deadline)),
        ];
        lines.extend(self.quest_lines(ctx, items, "No open quests right now."));
        if !user.is_tribe_member {
            lines.push(Line::from(""));
            lines.push(heading("Discover Tribes"));
            lines.push(Line::from(muted("Don't go alone! Join a tribe from the Tribes tab.")));
            for tribe in ctx.controller.tribes() {
                lines.push(Line::from(format!("  {}  {} members | Level {}", tribe.name, tribe.members, tribe.level)));
            }
        }
        lines
    }

    fn quests(&self, ctx: &AppCtx, items: &[Item]) -> Vec<Line<'static>> {
        let (active, empty) = match self.quests_tab {
            QuestsTab::Find => (0, "Looks like all quests have been taken. Check back later!"),
            QuestsTab::Yours => (1, "You haven't created or started any quests yet."),
        };
        let mut lines = vec![sub_tabs(&["Find Quests", "Your Quests"], active), Line::from("")];
        lines.extend(self.quest_lines(ctx, items, empty));
        lines
    }

    fn tribes(&self, ctx: &AppCtx, user: &User) -> Vec<Line<'static>> {
        if user.is_tribe_member {
            let tribe = ctx.controller.home_tribe();
            let mut lines = vec![
                heading(tribe.name.clone()),
                Line::from(muted(tribe.tagline.clone())),
                Line::from(vec![
                    muted("Level "),
                    accent(format!("{} {}", tribe.level, tribe.level_name)),
                    muted(format!("   Rank #{}   Win rate {}%", tribe.rank, tribe.win_rate)),
                ]),
                Line::from(""),
                sub_tabs(&["Tribe Chat", "Members", "War"], self.tribe_tab.index()),
                Line::from(""),
            ];
            match self.tribe_tab {
                TribeTab::Chat => lines.extend(self.chat_lines(ctx)),
                TribeTab::Members => lines.extend(member_lines(ctx.controller.home_members())),
                TribeTab::War => lines.extend(war_lines(ctx)),
            }
            return lines;
        }

        let mut lines = vec![heading("Discover Tribes"), Line::from("")];
        for (i, tribe) in ctx.controller.tribes().iter().enumerate() {
            lines.push(Line::from(vec![
                marker(i == self.cursor),
                Span::styled(tribe.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                muted(format!(
                    "  {}/{} members · Level {} · {}",
                    tribe.members,
                    tribe.max_members,
                    tribe.level,
                    tribe.status.label()
                )),
            ]));
            lines.push(Line::from(muted(format!("    {}", tribe.tagline))));
        }
        lines
    }

    fn chat_lines(&self, ctx: &AppCtx) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = ctx
            .controller
            .tribe_chat()
            .iter()
            .map(|m| match m.role {
                ChatRole::Notice => Line::from(Span::styled(
                    m.content.clone(),
                    Style::default().fg(Color::Magenta).add_modifier(Modifier::ITALIC),
                ))
                .alignment(Alignment::Center),
                ChatRole::Member => Line::from(vec![muted("  "), Span::raw(m.content.clone())]),
                ChatRole::Own => Line::from(accent(m.content.clone())).alignment(Alignment::Right),
            })
            .collect();
        lines.push(Line::from(""));
        if self.composing {
            lines.push(field_line_text("Message", &self.chat_input, true));
        } else {
            lines.push(Line::from(muted("Enter to message your tribe...")));
        }
        lines
    }

    fn profile(&self, ctx: &AppCtx, user: &User, items: &[Item]) -> Vec<Line<'static>> {
        if !user.is_adult {
            let next_level = 1000 * u64::from(user.level.max(1));
            let filled = ((user.xp * 20) / next_level).min(20) as usize;
            return vec![
                heading(user.username.clone()),
                Line::from(muted(format!("Level {} - Newbie", user.level))),
                Line::from(""),
                Line::from(vec![
                    muted("XP "),
                    Span::styled("█".repeat(filled), Style::default().fg(Color::Magenta)),
                    muted("░".repeat(20 - filled)),
                    muted(format!(" {}/{}", user.xp, next_level)),
                ]),
                Line::from(""),
                heading("Skill Points Vault"),
                Line::from(accent(format!("{} SP", (user.xp as f64 * 2.5).round() as u64))),
                Line::from(muted("Convert to cash when you turn 18!")),
            ];
        }

        let mut lines = vec![
            heading(user.display_name().to_string()),
            Line::from(muted(user.headline.clone().unwrap_or_default())),
            Line::from(vec![
                muted("Total Earned "),
                accent(rupees(u64::from(user.tasks_completed) * 150)),
                muted("   Quests Done "),
                accent(user.tasks_completed.to_string()),
                muted("   Rating "),
                accent(user.rating.map(|r| format!("{r:.1}")).unwrap_or_else(|| "-".into())),
            ]),
            Line::from(""),
        ];
        let active = match self.profile_tab {
            ProfileTab::About => 0,
            ProfileTab::Bids => 1,
            ProfileTab::Posted => 2,
        };
        lines.push(sub_tabs(&["Profile", "My Bids", "My Quests"], active));
        lines.push(Line::from(""));
        match self.profile_tab {
            ProfileTab::About => {
                lines.push(heading("Bio"));
                lines.push(Line::from(user.bio.clone().unwrap_or_default()));
                lines.push(Line::from(""));
                lines.push(heading("Skills"));
                lines.push(Line::from(user.skills.clone().unwrap_or_default().join(" · ")));
            }
            ProfileTab::Bids => lines.extend(self.quest_lines(ctx, items, "You haven't placed any bids yet.")),
            ProfileTab::Posted => lines.extend(self.quest_lines(ctx, items, "You haven't posted any quests yet.")),
        }
        lines
    }

    fn draw_tutorial(&self, f: &mut Frame<'_>, size: Rect, tutorial: &Tutorial) {
        let step = tutorial.current();
        let area = centered_rect_abs(56, 9, size);
        let lines = vec![
            heading(step.title),
            Line::from(""),
            Line::from(step.text),
            Line::from(""),
            Line::from(muted(format!("{} / {}   Enter next · Esc skip", tutorial.step(), STEPS.len()))),
        ];
        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true }).block(framed(" Welcome ")),
            area,
        );
    }
}

#[async_trait]
impl ScreenWidget for MainAppScreen {
    fn draw(&self, f: &mut Frame<'_>, size: Rect, ctx: &AppCtx) {
        let Some(user) = ctx.controller.user() else { return };
        let view = Self::view(ctx);
        let items = self.items(ctx);

        let boxes = three_box_layout(size, 4, 3);
        f.render_widget(framed(" TaskTribe "), boxes.top);
        let who = Line::from(vec![
            Span::styled(
                user.display_name().to_string(),
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            ),
            muted(format!("   Lv {} · {} XP", user.level, user.xp)),
        ]);
        f.render_widget(Paragraph::new(vec![who, tab_bar(view)]), boxes.top_inner);

        let mut lines = match view {
            MainView::Home => self.home(ctx, user, &items),
            MainView::Quests => self.quests(ctx, &items),
            MainView::Tribes => self.tribes(ctx, user),
            MainView::Profile => self.profile(ctx, user, &items),
        };
        if let Some(err) = &self.error {
            lines.push(Line::from(""));
            lines.push(error_line(err));
        }
        f.render_widget(framed(view.label()), boxes.middle);
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), boxes.middle_inner);

        let mut keys = vec![("1-4", "Views"), ("↑/↓", "Move"), ("Enter", "Open")];
        if matches!(view, MainView::Quests | MainView::Profile | MainView::Home)
            || (view == MainView::Tribes && user.is_tribe_member)
        {
            keys.push(("←/→", "Tabs"));
        }
        if user.is_adult {
            keys.push(("n", "New quest"));
        }
        f.render_widget(help_bar(&keys), boxes.bottom);

        if let (MainView::Home, Some(tutorial)) = (view, &self.tutorial) {
            self.draw_tutorial(f, size, tutorial);
        }
    }

    async fn on_key(&mut self, k: KeyEvent, ctx: &mut AppCtx) -> Result<Transition> {
        let view = Self::view(ctx);

        if view == MainView::Home && self.tutorial.is_some() {
            let done = match k.code {
                KeyCode::Enter | KeyCode::Right => self.tutorial.as_mut().is_some_and(Tutorial::next),
                KeyCode::Esc => true,
                _ => false,
            };
            if done {
                self.finish_tutorial(ctx);
            }
            return Ok(Transition::Stay);
        }

        if self.composing {
            match k.code {
                KeyCode::Esc => self.composing = false,
                KeyCode::Enter => self.send_chat(ctx),
                _ => {
                    self.chat_input.handle_key(&k);
                }
            }
            return Ok(Transition::Stay);
        }

        if esc_to_back(&k, &mut ctx.controller) {
            self.cursor = 0;
            return Ok(Transition::Stay);
        }
        let member = ctx.controller.user().is_some_and(|u| u.is_tribe_member);

        let items = self.items(ctx);
        match k.code {
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.go(ctx, MainView::all()[index]);
            }
            KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down => self.cursor = (self.cursor + 1).min(items.len().saturating_sub(1)),
            KeyCode::Left | KeyCode::Right => {
                self.cursor = 0;
                let forward = k.code == KeyCode::Right;
                match view {
                    MainView::Home => self.by_deadline = !self.by_deadline,
                    MainView::Quests => {
                        self.quests_tab =
                            if self.quests_tab == QuestsTab::Find { QuestsTab::Yours } else { QuestsTab::Find };
                    }
                    MainView::Profile => {
                        self.profile_tab = match (self.profile_tab, forward) {
                            (ProfileTab::About, true) | (ProfileTab::Posted, false) => ProfileTab::Bids,
                            (ProfileTab::Bids, true) | (ProfileTab::About, false) => ProfileTab::Posted,
                            (ProfileTab::Posted, true) | (ProfileTab::Bids, false) => ProfileTab::About,
                        };
                    }
                    MainView::Tribes if member => self.tribe_tab = self.tribe_tab.step(forward),
                    MainView::Tribes => {}
                }
            }
            KeyCode::Enter if view == MainView::Tribes && member && self.tribe_tab == TribeTab::Chat => {
                self.error = None;
                self.composing = true;
            }
            KeyCode::Enter => {
                self.error = match items.get(self.cursor) {
                    Some(Item::Quest(id)) => inline_error(ctx.controller.select_quest(id)),
                    Some(Item::Tribe(id)) => inline_error(ctx.controller.select_tribe(id)),
                    None => None,
                };
            }
            KeyCode::Char('n') if ctx.controller.user().is_some_and(|u| u.is_adult) => {
                self.error = inline_error(ctx.controller.open_create_quest());
            }
            _ => {}
        }
        Ok(Transition::Stay)
    }
}
