use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    prelude::Frame,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::inline_error;
use crate::app::{AppCtx, ScreenWidget, Transition};
use crate::ui::common_nav::esc_to_back;
use crate::ui::components::{bool_field_line, error_line, field_line_masked, field_line_text, framed, Focus, TextField};
use crate::ui::help::help_form;
use crate::ui::layout::three_box_layout;
use crate::ui::style::{button_line, heading, muted};
use crate::validation::{password_strength, AdultSignup};

/// Shared frame for the signup forms: step + heading on top, form lines in
/// the middle, any error (local or from the controller) underneath.
fn draw_form(
    f: &mut Frame<'_>,
    size: Rect,
    ctx: &AppCtx,
    step: &'static str,
    title: &'static str,
    mut lines: Vec<Line<'static>>,
    error: Option<&str>,
) {
    let boxes = three_box_layout(size, 4, 3);
    f.render_widget(framed(" TaskTribe "), boxes.top);
    f.render_widget(
        Paragraph::new(vec![Line::from(muted(step)), heading(title)]).alignment(Alignment::Center),
        boxes.top_inner,
    );

    if ctx.controller.pending().is_some() {
        lines.push(Line::from(""));
        lines.push(Line::from(muted("Sending code...")));
    }
    if let Some(msg) = error.or(ctx.controller.notice()) {
        lines.push(Line::from(""));
        lines.push(error_line(msg));
    }
    f.render_widget(framed(""), boxes.middle);
    f.render_widget(Paragraph::new(lines), boxes.middle_inner);
    f.render_widget(help_form(), boxes.bottom);
}

/* ───────────── teen ───────────── */

pub struct TeenSignupScreen {
    focus: Focus, // 0 username, 1 phone, 2 submit
    username: TextField,
    phone: TextField,
    error: Option<String>,
}

impl TeenSignupScreen {
    pub fn new() -> Self {
        Self { focus: Focus::new(3), username: TextField::default(), phone: TextField::default(), error: None }
    }
}

#[async_trait]
impl ScreenWidget for TeenSignupScreen {
    fn draw(&self, f: &mut Frame<'_>, size: Rect, ctx: &AppCtx) {
        let lines = vec![
            field_line_text("Username", &self.username, self.focus.is(0)),
            field_line_text("Your Phone Number", &self.phone, self.focus.is(1)),
            Line::from(""),
            button_line("Send Code", self.focus.is(2)),
        ];
        draw_form(f, size, ctx, "Step 1 of 3", "Create Your Account", lines, self.error.as_deref());
    }

    async fn on_key(&mut self, k: KeyEvent, ctx: &mut AppCtx) -> Result<Transition> {
        if esc_to_back(&k, &mut ctx.controller) || self.focus.handle_key(&k) {
            return Ok(Transition::Stay);
        }
        match (self.focus.index, k.code) {
            (2, KeyCode::Enter) => {
                self.error = inline_error(ctx.controller.teen_signup(&self.username.text, &self.phone.text));
            }
            (_, KeyCode::Enter) => self.focus.next(),
            (0, _) => {
                self.username.handle_key(&k);
            }
            (1, _) => {
                self.phone.handle_digit_key(&k);
            }
            _ => {}
        }
        Ok(Transition::Stay)
    }
}

/* ───────────── guardian ───────────── */

pub struct GuardianScreen {
    focus: Focus, // 0 phone, 1 submit
    phone: TextField,
    error: Option<String>,
}

impl GuardianScreen {
    pub fn new() -> Self {
        Self { focus: Focus::new(2), phone: TextField::default(), error: None }
    }
}

#[async_trait]
impl ScreenWidget for GuardianScreen {
    fn draw(&self, f: &mut Frame<'_>, size: Rect, ctx: &AppCtx) {
        let lines = vec![
            Line::from("For your safety, a parent or guardian needs to verify your account."),
            Line::from(""),
            field_line_text("Guardian's Phone Number", &self.phone, self.focus.is(0)),
            Line::from(""),
            Line::from(muted("By verifying, your guardian agrees to let you take on quests and earn Skill Points.")),
            Line::from(""),
            button_line("Send Verification Code", self.focus.is(1)),
        ];
        draw_form(f, size, ctx, "Step 2 of 3", "Guardian Verification Required", lines, self.error.as_deref());
    }

    async fn on_key(&mut self, k: KeyEvent, ctx: &mut AppCtx) -> Result<Transition> {
        if self.focus.handle_key(&k) {
            return Ok(Transition::Stay);
        }
        match (self.focus.index, k.code) {
            (1, KeyCode::Enter) => {
                self.error = inline_error(ctx.controller.guardian_verification(&self.phone.text));
            }
            (0, KeyCode::Enter) => self.focus.next(),
            (0, _) => {
                self.phone.handle_digit_key(&k);
            }
            _ => {}
        }
        Ok(Transition::Stay)
    }
}

/* ───────────── adult ───────────── */

pub struct AdultSignupScreen {
    focus: Focus, // 0 name, 1 email, 2 password, 3 terms, 4 submit
    full_name: TextField,
    email: TextField,
    password: TextField,
    agreed: bool,
    error: Option<String>,
}

impl AdultSignupScreen {
    pub fn new() -> Self {
        Self {
            focus: Focus::new(5),
            full_name: TextField::default(),
            email: TextField::default(),
            password: TextField::default(),
            agreed: false,
            error: None,
        }
    }

    fn form(&self) -> AdultSignup {
        AdultSignup {
            full_name: self.full_name.text.clone(),
            email: self.email.text.clone(),
            password: self.password.text.clone(),
            agreed: self.agreed,
        }
    }

    fn strength_line(&self) -> Line<'static> {
        let strength = password_strength(&self.password.text);
        let (label, color) = match strength {
            0 | 1 => ("Weak", Color::Red),
            2 => ("Fair", Color::Yellow),
            3 => ("Good", Color::Blue),
            _ => ("Strong", Color::Green),
        };
        let bar: String = (0..4).map(|i| if i < strength { '█' } else { '░' }).collect();
        Line::from(vec![
            muted("  strength "),
            Span::styled(bar, Style::default().fg(color)),
            Span::raw(" "),
            Span::styled(label, Style::default().fg(color)),
        ])
    }
}

#[async_trait]
impl ScreenWidget for AdultSignupScreen {
    fn draw(&self, f: &mut Frame<'_>, size: Rect, ctx: &AppCtx) {
        let mut lines = vec![
            field_line_text("Full Name", &self.full_name, self.focus.is(0)),
            field_line_text("Email Address", &self.email, self.focus.is(1)),
            field_line_masked("Password", &self.password, self.focus.is(2)),
        ];
        if !self.password.text.is_empty() {
            lines.push(self.strength_line());
        }
        lines.push(bool_field_line("I agree to the Terms of Service", self.agreed, self.focus.is(3)));
        lines.push(Line::from(""));
        lines.push(button_line("Create Account", self.focus.is(4)));
        draw_form(f, size, ctx, "Step 1 of 4", "Create Your Professional Account", lines, self.error.as_deref());
    }

    async fn on_key(&mut self, k: KeyEvent, ctx: &mut AppCtx) -> Result<Transition> {
        if esc_to_back(&k, &mut ctx.controller) || self.focus.handle_key(&k) {
            return Ok(Transition::Stay);
        }
        match (self.focus.index, k.code) {
            (4, KeyCode::Enter) => self.error = inline_error(ctx.controller.adult_signup(&self.form())),
            (3, KeyCode::Enter | KeyCode::Char(' ')) => self.agreed = !self.agreed,
            (_, KeyCode::Enter) => self.focus.next(),
            (0, _) => {
                self.full_name.handle_key(&k);
            }
            (1, _) => {
                self.email.handle_key(&k);
            }
            (2, _) => {
                self.password.handle_key(&k);
            }
            _ => {}
        }
        Ok(Transition::Stay)
    }
}
