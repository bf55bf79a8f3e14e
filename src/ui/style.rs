use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use std::borrow::Cow;

use crate::types::QuestStatus;

pub fn span_key(s: &'static str) -> Span<'static> {
    Span::styled(s, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
}
pub fn span_sep() -> Span<'static> {
    Span::styled("  |  ", Style::default().fg(Color::DarkGray))
}
pub fn span_text(s: &'static str) -> Span<'static> {
    Span::raw(s)
}

pub fn heading(s: impl Into<Cow<'static, str>>) -> Line<'static> {
    Line::from(Span::styled(s, Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)))
}

pub fn muted(s: impl Into<Cow<'static, str>>) -> Span<'static> {
    Span::styled(s, Style::default().fg(Color::DarkGray))
}

pub fn accent(s: impl Into<Cow<'static, str>>) -> Span<'static> {
    Span::styled(s, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
}

pub fn success(s: impl Into<Cow<'static, str>>) -> Span<'static> {
    Span::styled(s, Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
}

pub fn status_span(status: QuestStatus) -> Span<'static> {
    let color = match status {
        QuestStatus::Open => Color::Green,
        QuestStatus::InProgress => Color::Blue,
        QuestStatus::PendingVerification => Color::Yellow,
        QuestStatus::Completed => Color::Cyan,
        QuestStatus::Cancelled => Color::Red,
    };
    Span::styled(status.label(), Style::default().fg(color))
}

const ACCENT_BRACKET: Color = Color::Magenta;
const SELECTED_TEXT: Color = Color::Yellow;
const IDLE_TEXT: Color = Color::Magenta;

/// "< LABEL >"
pub fn button_spans<S: Into<Cow<'static, str>>>(label: S, selected: bool) -> Vec<Span<'static>> {
    let label = label.into();
    vec![
        Span::styled("< ", Style::default().fg(ACCENT_BRACKET).add_modifier(Modifier::BOLD)),
        Span::styled(
            label,
            Style::default()
                .fg(if selected { SELECTED_TEXT } else { IDLE_TEXT })
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" >", Style::default().fg(ACCENT_BRACKET).add_modifier(Modifier::BOLD)),
    ]
}

pub fn button_spans_disabled<S: Into<Cow<'static, str>>>(label: S) -> Vec<Span<'static>> {
    vec![
        Span::styled("< ", Style::default().fg(Color::DarkGray)),
        Span::styled(label.into(), Style::default().fg(Color::Gray)),
        Span::styled(" >", Style::default().fg(Color::DarkGray)),
    ]
}

pub fn button_line<S: Into<Cow<'static, str>>>(label: S, selected: bool) -> Line<'static> {
    Line::from(button_spans(label, selected))
}

/// Several buttons on one line, `selected` highlighted.
pub fn buttons_line(labels: &[&'static str], selected: Option<usize>) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("   "));
        }
        spans.extend(button_spans(*label, selected == Some(i)));
    }
    Line::from(spans)
}

/// Underlined tab strip, `active` highlighted.
pub fn sub_tabs(labels: &[&'static str], active: usize) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, label) in labels.iter().enumerate() {
        let style = if i == active {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(*label, style));
        spans.push(Span::raw("   "));
    }
    Line::from(spans)
}
