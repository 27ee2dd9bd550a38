use chrono::NaiveDate;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::state::{App, Tab};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{
    ConfirmDialog, Dashboard, InventoryView, RentalsProps, RentalsView, ReportsView, TabBar,
};

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, today: NaiveDate, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let [tab_area, main_area, status_area] =
        Layout::vertical([Length(1), Min(0), Length(1)]).areas(frame.area());

    TabBar::new(app.active_tab, app.business_name.clone(), app.model_name.clone()).render(frame, tab_area);

    match app.active_tab {
        Tab::Dashboard => Dashboard::new(&app.inventory, &app.rentals, today).render(frame, main_area),
        Tab::Inventory => InventoryView::new(&mut tui.inventory, &app.inventory).render(frame, main_area),
        Tab::Rentals => {
            let props = RentalsProps {
                rentals: &app.rentals,
                inventory: &app.inventory,
                drafting: &app.drafting,
                today,
            };
            RentalsView::new(&mut tui.rentals, props).render(frame, main_area)
        }
        Tab::Reports => ReportsView::new(&app.rentals, app.analysis.as_deref(), app.is_analyzing)
            .render(frame, main_area),
    }

    draw_status_line(frame, status_area, app, tui, spinner_frame);

    // Overlay last so it sits above every view
    if let Some(confirm) = &tui.confirm {
        ConfirmDialog::new(confirm).render(frame, frame.area());
    }
}

fn draw_status_line(frame: &mut Frame, area: Rect, app: &App, tui: &TuiState, spinner_frame: usize) {
    let hints = if tui.confirm.is_some() || tui.captures_text(app.active_tab) {
        ""
    } else if app.active_tab == Tab::Reports {
        "g Analyze  1-4/Tab Switch  q Quit"
    } else {
        "1-4/Tab Switch  q Quit"
    };
    let hint_width = hints.chars().count() as u16;
    let [message_area, hint_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(hint_width)]).areas(area);

    let mut spans = Vec::new();
    if app.is_busy() {
        spans.push(Span::styled(
            format!("{} ", SPINNER[spinner_frame % SPINNER.len()]),
            Style::default().fg(Color::Yellow),
        ));
    }
    spans.push(Span::styled(
        app.status_message.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), message_area);
    frame.render_widget(
        Paragraph::new(hints).style(Style::default().fg(Color::DarkGray)),
        hint_area,
    );
}
