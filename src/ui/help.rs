use ratatui::{
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::style::{span_key, span_sep, span_text};

/// Footer listing `(key, action)` pairs; Ctrl+Q is always appended.
pub fn help_bar(keys: &[(&'static str, &'static str)]) -> Paragraph<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    for (key, action) in keys {
        spans.push(span_key(key));
        spans.push(Span::raw(" "));
        spans.push(span_text(action));
        spans.push(span_sep());
    }
    spans.push(span_key("Ctrl+Q"));
    spans.push(span_text(" Quit"));
    Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true })
}

pub fn help_form() -> Paragraph<'static> {
    help_bar(&[("↑/↓/Tab", "Move"), ("Enter", "Submit"), ("Esc", "Back")])
}

pub fn help_continue() -> Paragraph<'static> {
    help_bar(&[("Enter", "Continue")])
}

pub fn help_wait() -> Paragraph<'static> {
    help_bar(&[])
}
