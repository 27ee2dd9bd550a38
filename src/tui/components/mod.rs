//! # TUI Components
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as fields:
//! - `TabBar`: view selector and shop name
//! - `Dashboard`: counters, recent and overdue rentals
//! - `ReportsView`: revenue chart, ledger, financial summary
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components whose state lives in `TuiState` and which emit events:
//! - `TextField`: single-line input used by every form
//! - `InventoryView` / `ItemForm`: item table, search, add form
//! - `RentalsView` / `RentalForm`: rental list, new-rental form, agreement viewer
//! - `ConfirmState`: y/n overlay before destructive actions
//!
//! Stateful views follow the persistent state + transient wrapper pattern:
//! `FooState` is owned by `TuiState`, `Foo<'a>` borrows it plus props for
//! one frame.
//!
//! ## Props-Based Data Flow
//!
//! Components receive external data as props, not by reaching into global
//! state:
//! ```rust,ignore
//! // Good: dependencies are explicit
//! Dashboard::new(&app.inventory, &app.rentals, today).render(frame, area);
//! ```

pub mod confirm;
pub mod dashboard;
pub mod inventory_view;
pub mod rentals_view;
pub mod reports_view;
pub mod tab_bar;
pub mod text_field;

pub use confirm::{ConfirmDialog, ConfirmEvent, ConfirmState, PendingAction};
pub use dashboard::Dashboard;
pub use inventory_view::{InventoryEvent, InventoryView, InventoryViewState};
pub use rentals_view::{RentalsEvent, RentalsProps, RentalsView, RentalsViewState};
pub use reports_view::ReportsView;
pub use tab_bar::TabBar;

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};

use crate::core::inventory;
use crate::core::model::{InventoryItem, ItemId, ItemStatus, RentalStatus};

/// Shown in place of a model name when a rental points at a deleted item.
pub const REMOVED_ITEM: &str = "(removed item)";

/// Model name for a rental row. History may outlive the item.
pub fn item_label(inventory: &[InventoryItem], item_id: &ItemId) -> String {
    inventory::find_item(inventory, item_id)
        .map(|item| item.model.clone())
        .unwrap_or_else(|| REMOVED_ITEM.to_string())
}

pub fn item_status_style(status: ItemStatus) -> Style {
    match status {
        ItemStatus::Available => Style::default().fg(Color::Green),
        ItemStatus::Rented => Style::default().fg(Color::Yellow),
        ItemStatus::Maintenance => Style::default().fg(Color::Red),
    }
}

pub fn rental_status_style(status: RentalStatus) -> Style {
    match status {
        RentalStatus::Active => Style::default().fg(Color::Cyan),
        RentalStatus::Completed => Style::default().fg(Color::DarkGray),
    }
}

/// Compute a centered rect using percentage of the outer rect.
pub fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

#[cfg(test)]
pub(crate) fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
    let width = buffer.area.width as usize;
    buffer
        .content()
        .chunks(width.max(1))
        .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
