//! # TabBar Component
//!
//! Top line: the four views with the active one highlighted, and the shop
//! name plus model on the right. Stateless; all fields are props.
//!
//! ```text
//!  1 Dashboard │ 2 Inventory │ 3 Rentals │ 4 Reports        Soleh Rent · gemini-2.5-flash
//! ```

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Tabs};
use unicode_width::UnicodeWidthStr;

use crate::core::state::Tab;
use crate::tui::component::Component;

pub struct TabBar {
    pub active: Tab,
    pub business_name: String,
    pub model_name: String,
}

impl TabBar {
    pub fn new(active: Tab, business_name: String, model_name: String) -> Self {
        Self {
            active,
            business_name,
            model_name,
        }
    }
}

impl Component for TabBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let brand = format!("{} · {} ", self.business_name, self.model_name);
        let brand_width = (UnicodeWidthStr::width(brand.as_str()) as u16).min(area.width / 2);
        let [tabs_area, brand_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(brand_width)]).areas(area);

        let titles = Tab::ALL
            .iter()
            .enumerate()
            .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.label())));
        let tabs = Tabs::new(titles)
            .select(self.active.index())
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            )
            .divider("│");
        frame.render_widget(tabs, tabs_area);

        let brand = Paragraph::new(Line::from(Span::styled(
            brand,
            Style::default().fg(Color::DarkGray),
        )))
        .right_aligned();
        frame.render_widget(brand, brand_area);
    }
}
