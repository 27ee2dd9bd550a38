//! # Rentals View
//!
//! Rental history (newest first), the new-rental form, and a scrollable
//! viewer for the generated agreement.
//!
//! Keys in the list: `n` new rental, `r` return the selected rental,
//! Enter opens its agreement. Returns go through the parent's confirm
//! overlay; this view only asks.

use std::collections::HashSet;

use chrono::NaiveDate;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, List, ListItem, ListState, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use super::text_field::{FIELD_HEIGHT, TextField};
use super::{centered_rect, item_label, rental_status_style};
use crate::core::model::{
    InventoryItem, RentalId, RentalTransaction, format_date, format_rupiah, parse_date,
};
use crate::core::rental::{self, NewRental, parse_duration};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::markdown;

#[derive(Debug, Clone, PartialEq)]
pub enum RentalsEvent {
    Create(NewRental),
    /// The form could not build a submission; the text explains why.
    Invalid(String),
    RequestReturn(RentalId),
}

/// Everything the view reads from `App` for one event or frame.
#[derive(Clone, Copy)]
pub struct RentalsProps<'a> {
    pub rentals: &'a [RentalTransaction],
    pub inventory: &'a [InventoryItem],
    pub drafting: &'a HashSet<RentalId>,
    pub today: NaiveDate,
}

impl RentalsProps<'_> {
    fn available(&self) -> Vec<&InventoryItem> {
        rental::available_items(self.inventory)
    }
}

// ============================================================================
// New-rental form
// ============================================================================

const ITEM_PICKER: usize = 0;
const FORM_FOCUS_COUNT: usize = 5;

pub struct RentalForm {
    /// Index into the current available-items list
    pub item_index: usize,
    /// name, NIK, start date, duration
    fields: [TextField; 4],
    /// 0 = item picker, 1..=4 = `fields`
    pub focus: usize,
}

impl RentalForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            item_index: 0,
            fields: [
                TextField::new("Customer name"),
                TextField::new("Customer NIK"),
                TextField::with_value("Start date (YYYY-MM-DD)", &format_date(today)),
                TextField::with_value("Duration (days)", "1"),
            ],
            focus: ITEM_PICKER,
        }
    }

    fn selected_item<'a>(&self, available: &[&'a InventoryItem]) -> Option<&'a InventoryItem> {
        available.get(self.item_index.min(available.len().saturating_sub(1))).copied()
    }

    fn build(&self, available: &[&InventoryItem]) -> Result<NewRental, String> {
        let item = self
            .selected_item(available)
            .ok_or_else(|| "No available items to rent".to_string())?;
        let start_date = parse_date(self.fields[2].value())
            .ok_or_else(|| "Start date must be YYYY-MM-DD".to_string())?;
        let duration_days = parse_duration(self.fields[3].value())
            .ok_or_else(|| "Duration must be a whole number of days".to_string())?;
        Ok(NewRental {
            item_id: item.id.clone(),
            customer_name: self.fields[0].value().to_string(),
            customer_nik: self.fields[1].value().to_string(),
            start_date,
            duration_days,
        })
    }

    /// Live price line under the form.
    fn preview(&self, available: &[&InventoryItem]) -> String {
        let item = self.selected_item(available);
        let start = parse_date(self.fields[2].value());
        let days = parse_duration(self.fields[3].value());
        match (item, start, days) {
            (Some(item), Some(start), Some(days)) => match rental::quote(item.daily_rate, start, days) {
                Ok(quote) => format!(
                    "Total {} · returns {}",
                    format_rupiah(quote.total_cost),
                    format_date(quote.end_date)
                ),
                Err(e) => e.to_string(),
            },
            _ => "Total -".to_string(),
        }
    }

    pub fn handle_event(
        &mut self,
        event: &TuiEvent,
        available: &[&InventoryItem],
        drafting: bool,
    ) -> Option<RentalFormEvent> {
        match event {
            TuiEvent::Escape => Some(RentalFormEvent::Cancel),
            TuiEvent::Submit if drafting => None,
            TuiEvent::Submit => Some(match self.build(available) {
                Ok(draft) => RentalFormEvent::Submit(draft),
                Err(reason) => RentalFormEvent::Invalid(reason),
            }),
            TuiEvent::NextField | TuiEvent::CursorDown => {
                self.focus = (self.focus + 1) % FORM_FOCUS_COUNT;
                None
            }
            TuiEvent::PrevField | TuiEvent::CursorUp => {
                self.focus = (self.focus + FORM_FOCUS_COUNT - 1) % FORM_FOCUS_COUNT;
                None
            }
            _ if self.focus == ITEM_PICKER => {
                if available.is_empty() {
                    return None;
                }
                let count = available.len();
                match event {
                    TuiEvent::CursorRight | TuiEvent::InputChar(' ') => {
                        self.item_index = (self.item_index.min(count - 1) + 1) % count;
                    }
                    TuiEvent::CursorLeft => {
                        self.item_index = (self.item_index.min(count - 1) + count - 1) % count;
                    }
                    _ => {}
                }
                None
            }
            _ => {
                self.fields[self.focus - 1].handle_event(event);
                None
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, available: &[&InventoryItem], drafting: bool) {
        let overlay = centered_rect(70, 90, area);
        frame.render_widget(Clear, overlay);
        let help = if drafting {
            " Drafting agreement... submit disabled  Esc Close "
        } else {
            " Tab Next  ←/→ Item  Enter Create  Esc Cancel "
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" New Rental ")
            .title_bottom(Line::from(help).centered());
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let rows = Layout::vertical([
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

        let picker_text = match self.selected_item(available) {
            Some(item) => format!(
                "◀ {} · {} · {}/day ▶",
                item.model,
                item.serial_number,
                format_rupiah(item.daily_rate)
            ),
            None => "No available items".to_string(),
        };
        let picker = Paragraph::new(picker_text).block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(if self.focus == ITEM_PICKER {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::DarkGray)
                })
                .title(format!("Item ({} available)", available.len())),
        );
        frame.render_widget(picker, rows[0]);

        for (i, field) in self.fields.iter_mut().enumerate() {
            field.focused = self.focus == i + 1;
            field.render(frame, rows[i + 1]);
        }

        let preview = Paragraph::new(Line::from(Span::styled(
            self.preview(available),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(preview, rows[5]);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RentalFormEvent {
    Submit(NewRental),
    Invalid(String),
    Cancel,
}

// ============================================================================
// Agreement viewer
// ============================================================================

pub struct AgreementViewer {
    pub rental_id: RentalId,
    pub scroll: ScrollViewState,
}

impl AgreementViewer {
    fn new(rental_id: RentalId) -> Self {
        Self {
            rental_id,
            scroll: ScrollViewState::default(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: &RentalsProps<'_>) {
        let overlay = centered_rect(80, 90, area);
        frame.render_widget(Clear, overlay);

        let rental = props.rentals.iter().find(|r| r.id == self.rental_id);
        let title = rental
            .map(|r| format!(" Agreement · {} ", r.customer_name))
            .unwrap_or_else(|| " Agreement ".to_string());
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title)
            .title_bottom(Line::from(" ↑/↓ PgUp/PgDn Scroll  Esc Close ").centered());
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let body = match rental.and_then(|r| r.agreement_text.as_deref()) {
            Some(text) => markdown::render(text, Color::White),
            None if props.drafting.contains(&self.rental_id) => "Drafting agreement...".into(),
            None => "No agreement on file.".into(),
        };

        // One column for the scrollbar
        let width = inner.width.saturating_sub(1);
        let height = markdown::wrapped_height(&body, width);
        let paragraph = Paragraph::new(body).wrap(Wrap { trim: false });

        let mut scroll_view = ScrollView::new(Size::new(width, height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(paragraph, Rect::new(0, 0, width, height));
        frame.render_stateful_widget(scroll_view, inner, &mut self.scroll);
    }
}

// ============================================================================
// View state
// ============================================================================

pub struct RentalsViewState {
    pub selected: usize,
    pub list_state: ListState,
    pub form: Option<RentalForm>,
    pub agreement: Option<AgreementViewer>,
}

impl RentalsViewState {
    pub fn new() -> Self {
        Self {
            selected: 0,
            list_state: ListState::default(),
            form: None,
            agreement: None,
        }
    }

    pub fn captures_text(&self) -> bool {
        self.form.is_some() || self.agreement.is_some()
    }

    pub fn close_form(&mut self) {
        self.form = None;
        // The new rental sits at the head of the list.
        self.selected = 0;
    }

    pub fn handle_event(&mut self, event: &TuiEvent, props: &RentalsProps<'_>) -> Option<RentalsEvent> {
        if let Some(form) = self.form.as_mut() {
            let available = props.available();
            return match form.handle_event(event, &available, !props.drafting.is_empty())? {
                RentalFormEvent::Submit(draft) => Some(RentalsEvent::Create(draft)),
                RentalFormEvent::Invalid(reason) => Some(RentalsEvent::Invalid(reason)),
                RentalFormEvent::Cancel => {
                    self.form = None;
                    None
                }
            };
        }

        if let Some(viewer) = self.agreement.as_mut() {
            match event {
                TuiEvent::Escape | TuiEvent::Submit | TuiEvent::InputChar('q') => self.agreement = None,
                TuiEvent::CursorUp => viewer.scroll.scroll_up(),
                TuiEvent::CursorDown => viewer.scroll.scroll_down(),
                TuiEvent::ScrollPageUp => viewer.scroll.scroll_page_up(),
                TuiEvent::ScrollPageDown => viewer.scroll.scroll_page_down(),
                _ => {}
            }
            return None;
        }

        let selected = props.rentals.get(self.selected);
        match event {
            TuiEvent::InputChar('n') => {
                self.form = Some(RentalForm::new(props.today));
                None
            }
            TuiEvent::InputChar('r') => match selected {
                Some(rental) if rental.is_active() => Some(RentalsEvent::RequestReturn(rental.id.clone())),
                Some(_) => Some(RentalsEvent::Invalid("Rental is already completed".to_string())),
                None => None,
            },
            TuiEvent::Submit => {
                if let Some(rental) = selected {
                    self.agreement = Some(AgreementViewer::new(rental.id.clone()));
                }
                None
            }
            TuiEvent::CursorUp => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            TuiEvent::CursorDown => {
                if self.selected + 1 < props.rentals.len() {
                    self.selected += 1;
                }
                None
            }
            _ => None,
        }
    }
}

impl Default for RentalsViewState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Render wrapper
// ============================================================================

pub struct RentalsView<'a> {
    state: &'a mut RentalsViewState,
    props: RentalsProps<'a>,
}

impl<'a> RentalsView<'a> {
    pub fn new(state: &'a mut RentalsViewState, props: RentalsProps<'a>) -> Self {
        Self { state, props }
    }

    fn rental_item(&self, rental: &RentalTransaction) -> ListItem<'static> {
        let agreement = if self.props.drafting.contains(&rental.id) {
            Span::styled("drafting agreement...", Style::default().fg(Color::Yellow))
        } else if rental.agreement_text.is_some() {
            Span::styled("agreement ✓", Style::default().fg(Color::Green))
        } else {
            Span::styled("no agreement", Style::default().fg(Color::DarkGray))
        };
        let returned = rental
            .actual_return_date
            .map(|d| format!(" · returned {}", format_date(d)))
            .unwrap_or_default();

        ListItem::new(vec![
            Line::from(vec![
                Span::styled(
                    rental.customer_name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  NIK {}  ", rental.customer_nik),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(rental.status.label(), rental_status_style(rental.status)),
            ]),
            Line::from(vec![
                Span::raw(format!(
                    "  {} · {} → {} · {}{} · ",
                    item_label(self.props.inventory, &rental.item_id),
                    format_date(rental.start_date),
                    format_date(rental.end_date),
                    format_rupiah(rental.total_cost),
                    returned
                )),
                agreement,
            ]),
        ])
    }
}

impl Component for RentalsView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let rentals = self.props.rentals;
        self.state.selected = self.state.selected.min(rentals.len().saturating_sub(1));
        self.state
            .list_state
            .select((!rentals.is_empty()).then_some(self.state.selected));

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(format!(" Rentals ({}) ", rentals.len()))
            .title_bottom(
                Line::from(" n New  r Return  Enter Agreement  ↑/↓ Select ").centered(),
            );

        if rentals.is_empty() {
            let empty = Paragraph::new("No rentals yet. Press n to create one.")
                .style(Style::default().fg(Color::DarkGray))
                .centered()
                .block(block);
            frame.render_widget(empty, area);
        } else {
            let items: Vec<ListItem> = rentals.iter().map(|r| self.rental_item(r)).collect();
            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().bg(Color::DarkGray))
                .highlight_symbol("▶ ");
            frame.render_stateful_widget(list, area, &mut self.state.list_state);
        }

        let drafting = !self.props.drafting.is_empty();
        if let Some(form) = self.state.form.as_mut() {
            let available = self.props.available();
            form.render(frame, area, &available, drafting);
        }
        if let Some(viewer) = self.state.agreement.as_mut() {
            viewer.render(frame, area, &self.props);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{ItemId, RentalStatus};
    use crate::core::sample;
    use crate::test_support::{date, sample_item};
    use crate::tui::components::buffer_text;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn props<'a>(
        rentals: &'a [RentalTransaction],
        inventory: &'a [InventoryItem],
        drafting: &'a HashSet<RentalId>,
    ) -> RentalsProps<'a> {
        RentalsProps {
            rentals,
            inventory,
            drafting,
            today: date("2023-11-01"),
        }
    }

    fn type_str(state: &mut RentalsViewState, props: &RentalsProps<'_>, s: &str) {
        for c in s.chars() {
            state.handle_event(&TuiEvent::InputChar(c), props);
        }
    }

    #[test]
    fn test_form_submits_selected_available_item() {
        let inventory = sample::inventory();
        let drafting = HashSet::new();
        let p = props(&[], &inventory, &drafting);
        let mut state = RentalsViewState::new();

        state.handle_event(&TuiEvent::InputChar('n'), &p);
        // Available items are iPhone 13 ("1") and Xiaomi 12 ("3")
        state.handle_event(&TuiEvent::CursorRight, &p);
        state.handle_event(&TuiEvent::NextField, &p);
        type_str(&mut state, &p, "Budi");
        state.handle_event(&TuiEvent::NextField, &p);
        type_str(&mut state, &p, "3201");
        state.handle_event(&TuiEvent::NextField, &p);
        state.handle_event(&TuiEvent::NextField, &p);
        state.handle_event(&TuiEvent::Backspace, &p);
        type_str(&mut state, &p, "3");

        let event = state.handle_event(&TuiEvent::Submit, &p);
        assert_eq!(
            event,
            Some(RentalsEvent::Create(NewRental {
                item_id: ItemId::from("3"),
                customer_name: "Budi".to_string(),
                customer_nik: "3201".to_string(),
                start_date: date("2023-11-01"),
                duration_days: 3,
            }))
        );
    }

    #[test]
    fn test_form_reports_bad_duration() {
        let inventory = vec![sample_item("1", "Xiaomi 12", 100000)];
        let drafting = HashSet::new();
        let p = props(&[], &inventory, &drafting);
        let mut state = RentalsViewState::new();
        state.handle_event(&TuiEvent::InputChar('n'), &p);
        state.handle_event(&TuiEvent::PrevField, &p);
        state.handle_event(&TuiEvent::Backspace, &p);
        type_str(&mut state, &p, "0");

        assert_eq!(
            state.handle_event(&TuiEvent::Submit, &p),
            Some(RentalsEvent::Invalid("Duration must be a whole number of days".to_string()))
        );
    }

    #[test]
    fn test_submit_disabled_while_drafting() {
        let inventory = vec![sample_item("1", "Xiaomi 12", 100000)];
        let drafting: HashSet<RentalId> = [RentalId::from("r9")].into_iter().collect();
        let p = props(&[], &inventory, &drafting);
        let mut state = RentalsViewState::new();
        state.handle_event(&TuiEvent::InputChar('n'), &p);
        assert_eq!(state.handle_event(&TuiEvent::Submit, &p), None);
        assert!(state.form.is_some());
    }

    #[test]
    fn test_preview_prices_rental() {
        let inventory = vec![sample_item("1", "Xiaomi 12", 100000)];
        let available: Vec<&InventoryItem> = inventory.iter().collect();
        let mut form = RentalForm::new(date("2023-11-01"));
        form.focus = 4;
        form.handle_event(&TuiEvent::Backspace, &available, false);
        form.handle_event(&TuiEvent::InputChar('3'), &available, false);
        assert_eq!(form.preview(&available), "Total Rp 300,000 · returns 2023-11-04");
    }

    #[test]
    fn test_return_only_offered_for_active_rentals() {
        let inventory = sample::inventory();
        let mut rentals = sample::rentals();
        let drafting = HashSet::new();
        let mut state = RentalsViewState::new();

        let p = props(&rentals, &inventory, &drafting);
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('r'), &p),
            Some(RentalsEvent::RequestReturn(RentalId::from("r1")))
        );

        rentals[0].status = RentalStatus::Completed;
        let p = props(&rentals, &inventory, &drafting);
        assert!(matches!(
            state.handle_event(&TuiEvent::InputChar('r'), &p),
            Some(RentalsEvent::Invalid(_))
        ));
    }

    #[test]
    fn test_agreement_viewer_opens_and_closes() {
        let inventory = sample::inventory();
        let rentals = sample::rentals();
        let drafting = HashSet::new();
        let p = props(&rentals, &inventory, &drafting);
        let mut state = RentalsViewState::new();

        state.handle_event(&TuiEvent::Submit, &p);
        assert!(state.agreement.is_some());
        assert!(state.captures_text());

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|f| RentalsView::new(&mut state, p).render(f, f.area()))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Agreement · Ahmad Fulan"), "{text}");
        assert!(text.contains("SURAT PERJANJIAN SEWA"));

        state.handle_event(&TuiEvent::Escape, &p);
        assert!(state.agreement.is_none());
    }

    #[test]
    fn test_render_list_shows_drafting_and_removed_items() {
        let mut rentals = sample::rentals();
        rentals[0].agreement_text = None;
        let drafting: HashSet<RentalId> = [RentalId::from("r1")].into_iter().collect();
        let p = props(&rentals, &[], &drafting);
        let mut state = RentalsViewState::new();

        let mut terminal = Terminal::new(TestBackend::new(120, 12)).unwrap();
        terminal
            .draw(|f| RentalsView::new(&mut state, p).render(f, f.area()))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Ahmad Fulan"));
        assert!(text.contains("(removed item)"));
        assert!(text.contains("drafting agreement..."), "{text}");
        assert!(text.contains("Rp 420,000"));
    }
}
