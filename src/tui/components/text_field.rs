//! # TextField Component
//!
//! Single-line bordered text input used by every form. Owns its buffer and
//! a byte-offset cursor; the parent sets `focused` before each render.
//!
//! Text wider than the box scrolls horizontally so the cursor stays visible.
//! Widths are measured in terminal columns (`unicode-width`), not bytes.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Left + right border
const HORIZONTAL_OVERHEAD: u16 = 2;
/// Top border + content line + bottom border
pub const FIELD_HEIGHT: u16 = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldEvent {
    Changed,
}

pub struct TextField {
    pub label: &'static str,
    /// Prop: draws the highlight border and the terminal cursor
    pub focused: bool,
    buffer: String,
    /// Byte offset into `buffer` (0..=buffer.len())
    cursor: usize,
}

impl TextField {
    pub fn new(label: &'static str) -> Self {
        Self::with_value(label, "")
    }

    pub fn with_value(label: &'static str, value: &str) -> Self {
        Self {
            label,
            focused: false,
            buffer: value.to_string(),
            cursor: value.len(),
        }
    }

    pub fn value(&self) -> &str {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    fn insert_str(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    /// Slice of the buffer that fits in `width` columns with the cursor visible,
    /// and the cursor column within that slice.
    fn visible(&self, width: u16) -> (&str, u16) {
        let width = usize::from(width);
        let mut start = 0;
        while start < self.cursor
            && UnicodeWidthStr::width(&self.buffer[start..self.cursor]) >= width.max(1)
        {
            start = next_char_boundary(&self.buffer, start);
        }
        let mut end = start;
        let mut used = 0;
        for ch in self.buffer[start..].chars() {
            let w = ch.width().unwrap_or(0);
            if used + w > width {
                break;
            }
            used += w;
            end += ch.len_utf8();
        }
        let column = UnicodeWidthStr::width(&self.buffer[start..self.cursor]);
        (&self.buffer[start..end], column as u16)
    }
}

impl Component for TextField {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner = area.width.saturating_sub(HORIZONTAL_OVERHEAD);
        let (text, column) = self.visible(inner);

        let border = if self.focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(self.label);
        frame.render_widget(Paragraph::new(text.to_string()).block(block), area);

        if self.focused && area.height >= FIELD_HEIGHT {
            frame.set_cursor_position((area.x + 1 + column.min(inner), area.y + 1));
        }
    }
}

impl EventHandler for TextField {
    type Event = FieldEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut utf8 = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut utf8));
                Some(FieldEvent::Changed)
            }
            TuiEvent::Paste(text) => {
                let flat: String = text.chars().filter(|c| !c.is_control()).collect();
                self.insert_str(&flat);
                Some(FieldEvent::Changed)
            }
            TuiEvent::Backspace if self.cursor > 0 => {
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(FieldEvent::Changed)
            }
            TuiEvent::Delete if self.cursor < self.buffer.len() => {
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                Some(FieldEvent::Changed)
            }
            TuiEvent::CursorLeft => {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                None
            }
            TuiEvent::CursorRight => {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                None
            }
            TuiEvent::CursorHome => {
                self.cursor = 0;
                None
            }
            TuiEvent::CursorEnd => {
                self.cursor = self.buffer.len();
                None
            }
            _ => None,
        }
    }
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}
