//! # Inventory View
//!
//! Item table with live search, an add-item form overlay, and delete
//! requests (the parent confirms them before anything is removed).
//!
//! ```text
//! ┌ Search ───────────────────┐
//! │ iphone                    │
//! └───────────────────────────┘
//! ┌ Inventory (2 of 4) ───────────────────────────┐
//! │ Model      Serial      Rate/day  Value  Status│
//! │▶iPhone 13  SN-APL-001  ...                    │
//! └── / Search  a Add  d Delete ──────────────────┘
//! ```

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Cell, Clear, Paragraph, Row, Table, TableState};

use super::text_field::{FIELD_HEIGHT, TextField};
use super::{centered_rect, item_status_style};
use crate::core::inventory::{self, NewItem};
use crate::core::model::{InventoryItem, ItemId, ItemStatus, format_rupiah};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, PartialEq)]
pub enum InventoryEvent {
    Add(NewItem),
    RequestDelete(ItemId),
}

// ============================================================================
// Add-item form
// ============================================================================

const STATUS_FIELD: usize = 4;
const FORM_FOCUS_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum ItemFormEvent {
    Submit(NewItem),
    Cancel,
}

pub struct ItemForm {
    fields: [TextField; 4],
    pub status: ItemStatus,
    /// 0..=3 text fields, 4 = status selector
    pub focus: usize,
}

impl ItemForm {
    pub fn new() -> Self {
        Self {
            fields: [
                TextField::new("Model"),
                TextField::new("Serial number"),
                TextField::new("Daily rate (Rp)"),
                TextField::new("Purchase value (Rp)"),
            ],
            status: ItemStatus::default(),
            focus: 0,
        }
    }

    fn draft(&self) -> NewItem {
        NewItem::from_input(
            self.fields[0].value(),
            self.fields[1].value(),
            self.fields[2].value(),
            self.fields[3].value(),
            self.status,
        )
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(60, 80, area);
        frame.render_widget(Clear, overlay);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" New Item ")
            .title_bottom(Line::from(" Tab Next  ←/→ Status  Enter Save  Esc Cancel ").centered());
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let rows = Layout::vertical([
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Min(0),
        ])
        .split(inner);

        for (i, field) in self.fields.iter_mut().enumerate() {
            field.focused = self.focus == i;
            field.render(frame, rows[i]);
        }

        let focused = self.focus == STATUS_FIELD;
        let status = Paragraph::new(Line::from(format!("◀ {} ▶", self.status.label())))
            .style(item_status_style(self.status))
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(if focused {
                        Style::default().fg(Color::Yellow)
                    } else {
                        Style::default().fg(Color::DarkGray)
                    })
                    .title("Status"),
            );
        frame.render_widget(status, rows[STATUS_FIELD]);
    }
}

impl Default for ItemForm {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for ItemForm {
    type Event = ItemFormEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Escape => Some(ItemFormEvent::Cancel),
            TuiEvent::Submit => Some(ItemFormEvent::Submit(self.draft())),
            TuiEvent::NextField | TuiEvent::CursorDown => {
                self.focus = (self.focus + 1) % FORM_FOCUS_COUNT;
                None
            }
            TuiEvent::PrevField | TuiEvent::CursorUp => {
                self.focus = (self.focus + FORM_FOCUS_COUNT - 1) % FORM_FOCUS_COUNT;
                None
            }
            _ if self.focus == STATUS_FIELD => {
                match event {
                    TuiEvent::CursorRight | TuiEvent::InputChar(' ') => self.status = self.status.next(),
                    TuiEvent::CursorLeft => self.status = self.status.prev(),
                    _ => {}
                }
                None
            }
            _ => {
                self.fields[self.focus].handle_event(event);
                None
            }
        }
    }
}

// ============================================================================
// View state
// ============================================================================

pub struct InventoryViewState {
    pub search: TextField,
    /// Keys go to the search box while true
    pub searching: bool,
    pub selected: usize,
    pub table_state: TableState,
    pub form: Option<ItemForm>,
}

impl InventoryViewState {
    pub fn new() -> Self {
        Self {
            search: TextField::new("Search model or serial"),
            searching: false,
            selected: 0,
            table_state: TableState::default(),
            form: None,
        }
    }

    /// True while a text input owns the keyboard.
    pub fn captures_text(&self) -> bool {
        self.searching || self.form.is_some()
    }

    pub fn handle_event(&mut self, event: &TuiEvent, inventory: &[InventoryItem]) -> Option<InventoryEvent> {
        if let Some(form) = self.form.as_mut() {
            return match form.handle_event(event)? {
                ItemFormEvent::Submit(draft) => Some(InventoryEvent::Add(draft)),
                ItemFormEvent::Cancel => {
                    self.form = None;
                    None
                }
            };
        }

        if self.searching {
            match event {
                TuiEvent::Escape => {
                    self.search.clear();
                    self.searching = false;
                }
                TuiEvent::Submit | TuiEvent::CursorDown => self.searching = false,
                _ => {
                    if self.search.handle_event(event).is_some() {
                        self.selected = 0;
                    }
                }
            }
            return None;
        }

        let visible = inventory::filter_items(inventory, self.search.value());
        match event {
            TuiEvent::InputChar('/') => {
                self.searching = true;
                None
            }
            TuiEvent::InputChar('a') => {
                self.form = Some(ItemForm::new());
                None
            }
            TuiEvent::InputChar('d') | TuiEvent::Delete => visible
                .get(self.selected)
                .map(|item| InventoryEvent::RequestDelete(item.id.clone())),
            TuiEvent::CursorUp => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            TuiEvent::CursorDown => {
                if self.selected + 1 < visible.len() {
                    self.selected += 1;
                }
                None
            }
            TuiEvent::Escape if !self.search.value().is_empty() => {
                self.search.clear();
                self.selected = 0;
                None
            }
            _ => None,
        }
    }
}

impl Default for InventoryViewState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Render wrapper
// ============================================================================

pub struct InventoryView<'a> {
    state: &'a mut InventoryViewState,
    inventory: &'a [InventoryItem],
}

impl<'a> InventoryView<'a> {
    pub fn new(state: &'a mut InventoryViewState, inventory: &'a [InventoryItem]) -> Self {
        Self { state, inventory }
    }
}

impl Component for InventoryView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [search_area, table_area] =
            Layout::vertical([Constraint::Length(FIELD_HEIGHT), Constraint::Min(0)]).areas(area);

        self.state.search.focused = self.state.searching;
        self.state.search.render(frame, search_area);

        let visible = inventory::filter_items(self.inventory, self.state.search.value());
        self.state.selected = self.state.selected.min(visible.len().saturating_sub(1));
        self.state
            .table_state
            .select((!visible.is_empty()).then_some(self.state.selected));

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(format!(" Inventory ({} of {}) ", visible.len(), self.inventory.len()))
            .title_bottom(Line::from(" / Search  a Add  d Delete  ↑/↓ Select ").centered());

        if visible.is_empty() {
            let message = if self.inventory.is_empty() {
                "No items yet. Press a to add one."
            } else {
                "No items match the search."
            };
            let empty = Paragraph::new(message)
                .style(Style::default().fg(Color::DarkGray))
                .centered()
                .block(block);
            frame.render_widget(empty, table_area);
        } else {
            let rows = visible.iter().map(|item| {
                Row::new(vec![
                    Cell::from(item.model.clone()),
                    Cell::from(item.serial_number.clone()),
                    Cell::from(format_rupiah(item.daily_rate)),
                    Cell::from(format_rupiah(item.purchase_value)),
                    Cell::from(item.status.label()).style(item_status_style(item.status)),
                ])
            });
            let table = Table::new(
                rows,
                [
                    Constraint::Fill(2),
                    Constraint::Fill(2),
                    Constraint::Length(14),
                    Constraint::Length(16),
                    Constraint::Length(11),
                ],
            )
            .header(
                Row::new(["Model", "Serial", "Rate/day", "Value", "Status"])
                    .style(Style::default().add_modifier(Modifier::BOLD)),
            )
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("▶ ")
            .block(block);
            frame.render_stateful_widget(table, table_area, &mut self.state.table_state);
        }

        if let Some(form) = self.state.form.as_mut() {
            form.render(frame, area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sample;
    use crate::tui::components::buffer_text;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn type_str(state: &mut InventoryViewState, inventory: &[InventoryItem], s: &str) {
        for c in s.chars() {
            state.handle_event(&TuiEvent::InputChar(c), inventory);
        }
    }

    #[test]
    fn test_add_form_submits_coerced_item() {
        let inventory = sample::inventory();
        let mut state = InventoryViewState::new();
        state.handle_event(&TuiEvent::InputChar('a'), &inventory);
        assert!(state.captures_text());

        type_str(&mut state, &inventory, "Pixel 8");
        state.handle_event(&TuiEvent::NextField, &inventory);
        type_str(&mut state, &inventory, "SN-GOO-005");
        state.handle_event(&TuiEvent::NextField, &inventory);
        type_str(&mut state, &inventory, "120,000");
        state.handle_event(&TuiEvent::NextField, &inventory);
        type_str(&mut state, &inventory, "abc");
        state.handle_event(&TuiEvent::NextField, &inventory);
        state.handle_event(&TuiEvent::CursorRight, &inventory);

        let event = state.handle_event(&TuiEvent::Submit, &inventory);
        assert_eq!(
            event,
            Some(InventoryEvent::Add(NewItem {
                model: "Pixel 8".to_string(),
                serial_number: "SN-GOO-005".to_string(),
                daily_rate: 120000,
                purchase_value: 0,
                status: ItemStatus::Maintenance,
            }))
        );
        // The form stays open until the parent closes it.
        assert!(state.form.is_some());
    }

    #[test]
    fn test_status_selector_never_offers_rented() {
        let mut form = ItemForm::new();
        form.focus = STATUS_FIELD;
        for event in [TuiEvent::CursorRight, TuiEvent::InputChar(' '), TuiEvent::CursorLeft] {
            for _ in 0..4 {
                form.handle_event(&event);
                assert_ne!(form.status, ItemStatus::Rented);
            }
        }
    }

    #[test]
    fn test_escape_cancels_form() {
        let mut state = InventoryViewState::new();
        state.handle_event(&TuiEvent::InputChar('a'), &[]);
        state.handle_event(&TuiEvent::Escape, &[]);
        assert!(state.form.is_none());
        assert!(!state.captures_text());
    }

    #[test]
    fn test_delete_targets_selected_filtered_row() {
        let inventory = sample::inventory();
        let mut state = InventoryViewState::new();

        state.handle_event(&TuiEvent::InputChar('/'), &inventory);
        type_str(&mut state, &inventory, "apl");
        state.handle_event(&TuiEvent::Submit, &inventory);
        assert!(!state.searching);
        assert_eq!(state.search.value(), "apl");

        state.handle_event(&TuiEvent::CursorDown, &inventory);
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('d'), &inventory),
            Some(InventoryEvent::RequestDelete(ItemId::from("4")))
        );
    }

    #[test]
    fn test_selection_stops_at_last_row() {
        let inventory = sample::inventory();
        let mut state = InventoryViewState::new();
        for _ in 0..10 {
            state.handle_event(&TuiEvent::CursorDown, &inventory);
        }
        assert_eq!(state.selected, 3);
        assert_eq!(state.handle_event(&TuiEvent::InputChar('d'), &[]), None);
    }

    #[test]
    fn test_render_filters_rows() {
        let inventory = sample::inventory();
        let mut state = InventoryViewState::new();
        state.handle_event(&TuiEvent::InputChar('/'), &inventory);
        type_str(&mut state, &inventory, "IPHONE");

        let mut terminal = Terminal::new(TestBackend::new(100, 16)).unwrap();
        terminal
            .draw(|f| InventoryView::new(&mut state, &inventory).render(f, f.area()))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());

        assert!(text.contains("Inventory (2 of 4)"), "{text}");
        assert!(text.contains("iPhone 13"));
        assert!(text.contains("iPhone 14 Pro"));
        assert!(!text.contains("Xiaomi 12"));
        assert!(text.contains("Rp 150,000"));
    }

    #[test]
    fn test_render_form_overlay() {
        let mut state = InventoryViewState::new();
        state.handle_event(&TuiEvent::InputChar('a'), &[]);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|f| InventoryView::new(&mut state, &[]).render(f, f.area()))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("New Item"));
        assert!(text.contains("Serial number"));
        assert!(text.contains("Available"));
    }
}
