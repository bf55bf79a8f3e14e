use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};

/// Single-line input. `cursor` counts chars, not bytes.
#[derive(Clone, Default)]
pub struct TextField {
    pub text: String,
    pub cursor: usize,
}

impl TextField {
    pub fn with(text: &str) -> Self {
        Self { text: text.into(), cursor: text.chars().count() }
    }

    fn byte_at(&self, cursor: usize) -> usize {
        self.text.char_indices().nth(cursor).map(|(i, _)| i).unwrap_or(self.text.len())
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn set(&mut self, text: &str) {
        *self = Self::with(text);
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_at(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_at(self.cursor);
            self.text.remove(at);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_at(self.cursor);
            self.text.remove(at);
        }
    }

    /// Common editing keys. Returns whether the key was consumed.
    pub fn handle_key(&mut self, k: &KeyEvent) -> bool {
        match k.code {
            KeyCode::Char(c) => self.insert_char(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.len(),
            _ => return false,
        }
        true
    }

    /// Like [`handle_key`](Self::handle_key) but only accepts ASCII digits.
    pub fn handle_digit_key(&mut self, k: &KeyEvent) -> bool {
        match k.code {
            KeyCode::Char(c) if !c.is_ascii_digit() => false,
            _ => self.handle_key(k),
        }
    }
}

/// Tab/arrow focus over `len` slots.
#[derive(Clone, Copy, Default)]
pub struct Focus {
    pub index: usize,
    pub len: usize,
}

impl Focus {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn next(&mut self) {
        self.index = (self.index + 1) % self.len.max(1);
    }

    pub fn prev(&mut self) {
        self.index = (self.index + self.len.max(1) - 1) % self.len.max(1);
    }

    pub fn is(&self, i: usize) -> bool {
        self.index == i
    }

    /// Up/Down/Tab/BackTab. Returns whether the key moved focus.
    pub fn handle_key(&mut self, k: &KeyEvent) -> bool {
        match k.code {
            KeyCode::Tab | KeyCode::Down => self.next(),
            KeyCode::BackTab | KeyCode::Up => self.prev(),
            _ => return false,
        }
        true
    }
}

pub fn framed(title: &str) -> Block<'_> {
    Block::default().borders(Borders::ALL).title(title)
}

// Block cursor over the char under it
pub fn field_line_text<'a>(label: &str, field: &TextField, focused: bool) -> Line<'a> {
    render_field(label, &field.text, field.cursor, focused)
}

pub fn field_line_masked<'a>(label: &str, field: &TextField, focused: bool) -> Line<'a> {
    let masked = "•".repeat(field.text.chars().count());
    render_field(label, &masked, field.cursor, focused)
}

fn render_field<'a>(label: &str, text: &str, cursor: usize, focused: bool) -> Line<'a> {
    let label_span = Span::styled(format!("{label}: "), Style::default().fg(Color::Yellow));
    if !focused {
        return Line::from(vec![label_span, Span::raw(text.to_string())]);
    }

    let block = |s: String| {
        Span::styled(s, Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD))
    };
    let left: String = text.chars().take(cursor).collect();
    let mut rest = text.chars().skip(cursor);
    match rest.next() {
        Some(ch) => Line::from(vec![
            label_span,
            Span::raw(left),
            block(ch.to_string()),
            Span::raw(rest.collect::<String>()),
        ]),
        None => Line::from(vec![label_span, Span::raw(left), block(" ".into())]),
    }
}

pub fn bool_field_line<'a>(label: &str, val: bool, focused: bool) -> Line<'a> {
    let mark = if val { "[x]" } else { "[ ]" };
    let mark_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(mark.to_string(), mark_style),
        Span::raw(" "),
        Span::styled(label.to_string(), Style::default().fg(Color::Yellow)),
    ])
}

pub fn choice_line<'a>(label: &str, value: &str, focused: bool) -> Line<'a> {
    let value_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(Color::Yellow)),
        Span::styled(format!("‹ {value} ›"), value_style),
    ])
}

pub fn error_line<'a>(msg: &str) -> Line<'a> {
    Line::from(Span::styled(msg.to_string(), Style::default().fg(Color::Red)))
}
