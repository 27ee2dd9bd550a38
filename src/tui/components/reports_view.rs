//! # Reports View
//!
//! Revenue per rental start date as a bar chart, the two-line ledger, and
//! the AI financial summary (press `g` to request one).

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, BorderType, Cell, Paragraph, Row, Table, Wrap};

use crate::core::model::{RentalTransaction, format_rupiah};
use crate::core::report;
use crate::tui::component::Component;
use crate::tui::markdown;

const BAR_WIDTH: u16 = 8;
/// Header, two lines, borders
const LEDGER_HEIGHT: u16 = 5;

pub struct ReportsView<'a> {
    rentals: &'a [RentalTransaction],
    analysis: Option<&'a str>,
    is_analyzing: bool,
}

impl<'a> ReportsView<'a> {
    pub fn new(rentals: &'a [RentalTransaction], analysis: Option<&'a str>, is_analyzing: bool) -> Self {
        Self {
            rentals,
            analysis,
            is_analyzing,
        }
    }

    fn render_chart(&self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(" Revenue by Start Date ");
        let points = report::revenue_by_date(self.rentals);
        if points.is_empty() {
            let empty = Paragraph::new("No revenue yet.")
                .style(Style::default().fg(Color::DarkGray))
                .centered()
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        // Keep the most recent dates that fit.
        let fits = usize::from((area.width.saturating_sub(2) / (BAR_WIDTH + 1)).max(1));
        let shown = &points[points.len().saturating_sub(fits)..];
        let bars: Vec<Bar> = shown
            .iter()
            .map(|point| {
                Bar::default()
                    .value(point.revenue)
                    .text_value(compact_rupiah(point.revenue))
                    .label(Line::from(point.date.format("%d %b").to_string()))
            })
            .collect();

        let chart = BarChart::default()
            .block(block)
            .data(BarGroup::default().bars(&bars))
            .bar_width(BAR_WIDTH)
            .bar_gap(1)
            .bar_style(Style::default().fg(Color::Green))
            .value_style(Style::default().fg(Color::Black).bg(Color::Green));
        frame.render_widget(chart, area);
    }

    fn render_ledger(&self, frame: &mut Frame, area: Rect) {
        let amount = |value: Option<u64>| value.map(format_rupiah).unwrap_or_else(|| "-".to_string());
        let rows = report::ledger_summary(self.rentals).into_iter().map(|line| {
            Row::new(vec![
                Cell::from(line.account),
                Cell::from(Line::from(amount(line.debit)).right_aligned()),
                Cell::from(Line::from(amount(line.credit)).right_aligned()),
            ])
        });
        let table = Table::new(
            rows,
            [Constraint::Fill(1), Constraint::Length(16), Constraint::Length(16)],
        )
        .header(
            Row::new(["Account", "Debit", "Credit"]).style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .title(" General Ledger "),
        );
        frame.render_widget(table, area);
    }

    fn analysis_text(&self) -> Text<'static> {
        if self.is_analyzing {
            return Line::from("Analyzing...").style(Style::default().fg(Color::Yellow)).into();
        }
        match self.analysis {
            Some(text) => markdown::render(text, Color::White),
            None => Line::from("Press g to generate a financial summary.")
                .style(Style::default().fg(Color::DarkGray))
                .into(),
        }
    }

    fn render_analysis(&self, frame: &mut Frame, area: Rect) {
        let text = self.analysis_text();
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Magenta))
            .title(" AI Financial Summary ")
            .title_bottom(Line::from(" g Generate analysis ").centered());
        frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }).block(block), area);
    }
}

impl Component for ReportsView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [chart_area, lower_area] =
            Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);
        let [ledger_area, analysis_area] =
            Layout::vertical([Constraint::Length(LEDGER_HEIGHT), Constraint::Min(0)]).areas(lower_area);

        self.render_chart(frame, chart_area);
        self.render_ledger(frame, ledger_area);
        self.render_analysis(frame, analysis_area);
    }
}

/// Short bar caption: `420k`, `1.2M`.
fn compact_rupiah(amount: u64) -> String {
    match amount {
        0..1_000 => amount.to_string(),
        1_000..1_000_000 => format!("{}k", amount / 1_000),
        _ => format!("{:.1}M", amount as f64 / 1_000_000.0),
    }
}
