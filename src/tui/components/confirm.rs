//! # Confirm Overlay
//!
//! Modal y/n prompt in front of destructive actions (deleting an item,
//! returning a rental). While open it swallows every key.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `ConfirmState` lives in `TuiState`
//! - `ConfirmDialog` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::core::model::{ItemId, RentalId};
use crate::tui::components::centered_rect;
use crate::tui::event::TuiEvent;

/// The action waiting on the user's answer.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    DeleteItem(ItemId),
    ReturnRental(RentalId),
}

pub struct ConfirmState {
    pub title: &'static str,
    pub message: String,
    pub pending: PendingAction,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmEvent {
    Accept(PendingAction),
    Dismiss,
}

impl ConfirmState {
    pub fn new(title: &'static str, message: String, pending: PendingAction) -> Self {
        Self {
            title,
            message,
            pending,
        }
    }

    pub fn handle_event(&mut self, event: &TuiEvent) -> Option<ConfirmEvent> {
        match event {
            TuiEvent::InputChar('y' | 'Y') => Some(ConfirmEvent::Accept(self.pending.clone())),
            TuiEvent::InputChar('n' | 'N') | TuiEvent::Escape => Some(ConfirmEvent::Dismiss),
            _ => None,
        }
    }
}

/// Transient render wrapper for the confirm overlay.
pub struct ConfirmDialog<'a> {
    state: &'a ConfirmState,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new(state: &'a ConfirmState) -> Self {
        Self { state }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(50, 30, area);
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(format!(" {} ", self.state.title))
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(" y Confirm  n/Esc Cancel ").centered())
            .padding(Padding::uniform(1));

        let body = Paragraph::new(self.state.message.as_str())
            .style(Style::default().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(body, overlay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn state() -> ConfirmState {
        ConfirmState::new(
            "Delete item",
            "Delete iPhone 13?".to_string(),
            PendingAction::DeleteItem(ItemId::from("1")),
        )
    }

    #[test]
    fn test_yes_accepts_pending_action() {
        let mut confirm = state();
        assert_eq!(
            confirm.handle_event(&TuiEvent::InputChar('y')),
            Some(ConfirmEvent::Accept(PendingAction::DeleteItem(ItemId::from("1"))))
        );
    }

    #[test]
    fn test_no_and_escape_dismiss_other_keys_ignored() {
        let mut confirm = state();
        assert_eq!(confirm.handle_event(&TuiEvent::InputChar('n')), Some(ConfirmEvent::Dismiss));
        assert_eq!(confirm.handle_event(&TuiEvent::Escape), Some(ConfirmEvent::Dismiss));
        assert_eq!(confirm.handle_event(&TuiEvent::Submit), None);
        assert_eq!(confirm.handle_event(&TuiEvent::InputChar('d')), None);
    }

    #[test]
    fn test_render_shows_message() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let confirm = state();
        terminal
            .draw(|f| ConfirmDialog::new(&confirm).render(f, f.area()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Delete iPhone 13?"));
        assert!(text.contains("y Confirm"));
    }
}
