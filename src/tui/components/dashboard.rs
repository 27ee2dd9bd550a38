//! # Dashboard
//!
//! Read-only overview: four counters, the five most recent rentals, and
//! rentals that are past their end date.

use chrono::NaiveDate;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Cell, List, ListItem, Paragraph, Row, Table};

use super::{item_label, rental_status_style};
use crate::core::model::{InventoryItem, RentalTransaction, format_date, format_rupiah};
use crate::core::report::{self, DashboardStats};
use crate::tui::component::Component;

pub struct Dashboard<'a> {
    inventory: &'a [InventoryItem],
    rentals: &'a [RentalTransaction],
    today: NaiveDate,
}

impl<'a> Dashboard<'a> {
    pub fn new(inventory: &'a [InventoryItem], rentals: &'a [RentalTransaction], today: NaiveDate) -> Self {
        Self {
            inventory,
            rentals,
            today,
        }
    }

    fn render_cards(&self, frame: &mut Frame, area: Rect, stats: &DashboardStats) {
        let cards = [
            ("Total Revenue", format_rupiah(stats.total_revenue), Color::Green),
            ("Active Rentals", stats.active_rentals.to_string(), Color::Cyan),
            (
                "Available Units",
                format!("{} / {}", stats.available_items, stats.total_items),
                Color::Yellow,
            ),
            ("Utilization", format!("{:.1}%", stats.utilization_rate), Color::Magenta),
        ];
        let areas = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
        for ((title, value, color), card_area) in cards.into_iter().zip(areas.iter()) {
            let card = Paragraph::new(Line::from(Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )))
            .centered()
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(title),
            );
            frame.render_widget(card, *card_area);
        }
    }

    fn render_recent(&self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(" Recent Transactions ");
        let recent = report::recent_rentals(self.rentals);
        if recent.is_empty() {
            let empty = Paragraph::new("No transactions yet.")
                .style(Style::default().fg(Color::DarkGray))
                .centered()
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let rows = recent.iter().map(|rental| {
            Row::new(vec![
                Cell::from(rental.customer_name.clone()),
                Cell::from(item_label(self.inventory, &rental.item_id)),
                Cell::from(format_date(rental.start_date)),
                Cell::from(format_rupiah(rental.total_cost)),
                Cell::from(rental.status.label()).style(rental_status_style(rental.status)),
            ])
        });
        let table = Table::new(
            rows,
            [
                Constraint::Fill(2),
                Constraint::Fill(2),
                Constraint::Length(10),
                Constraint::Length(14),
                Constraint::Length(9),
            ],
        )
        .header(
            Row::new(["Customer", "Item", "Start", "Total", "Status"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(block);
        frame.render_widget(table, area);
    }

    fn render_overdue(&self, frame: &mut Frame, area: Rect) {
        let overdue = report::overdue_rentals(self.rentals, self.today);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(if overdue.is_empty() {
                Style::default()
            } else {
                Style::default().fg(Color::Red)
            })
            .title(format!(" Overdue ({}) ", overdue.len()));

        if overdue.is_empty() {
            let clear = Paragraph::new("No overdue rentals.")
                .style(Style::default().fg(Color::DarkGray))
                .centered()
                .block(block);
            frame.render_widget(clear, area);
            return;
        }

        let items: Vec<ListItem> = overdue
            .iter()
            .map(|rental| {
                let days_late = (self.today - rental.end_date).num_days();
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(
                            rental.customer_name.clone(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            format!("  {} day{} late", days_late, if days_late == 1 { "" } else { "s" }),
                            Style::default().fg(Color::Red),
                        ),
                    ]),
                    Line::from(Span::styled(
                        format!(
                            "  {} · due {}",
                            item_label(self.inventory, &rental.item_id),
                            format_date(rental.end_date)
                        ),
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
            })
            .collect();
        frame.render_widget(List::new(items).block(block), area);
    }
}

impl Component for Dashboard<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let stats = report::dashboard_stats(self.inventory, self.rentals);
        let [cards_area, lower_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);
        let [recent_area, overdue_area] =
            Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)])
                .areas(lower_area);

        self.render_cards(frame, cards_area, &stats);
        self.render_recent(frame, recent_area);
        self.render_overdue(frame, overdue_area);
    }
}
