//! Markdown → ratatui `Text` for generated agreements and summaries.
//!
//! Models tend to answer with headings, bold clause titles, numbered
//! clauses and the odd quote. Those get styled; anything else (tables,
//! images, raw HTML) is dropped and its text kept. Code blocks are shown as
//! indented plain text.

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

const INDENT: &str = "    ";
const RULE_WIDTH: usize = 40;

/// Renders `content` to owned `Text`, plain text in `base_fg`.
pub fn render(content: &str, base_fg: Color) -> Text<'static> {
    let mut renderer = Renderer::new(base_fg);
    for event in Parser::new(content) {
        renderer.event(event);
    }
    renderer.finish()
}

struct Renderer {
    base_fg: Color,
    lines: Vec<Line<'static>>,
    /// Spans of the line being built, flushed at block boundaries
    spans: Vec<Span<'static>>,
    bold: usize,
    italic: usize,
    underline: usize,
    heading: Option<HeadingLevel>,
    quote_depth: usize,
    /// None = bullet list, Some(n) = next number of an ordered list
    lists: Vec<Option<u64>>,
    preformatted: bool,
}

impl Renderer {
    fn new(base_fg: Color) -> Self {
        Self {
            base_fg,
            lines: Vec::new(),
            spans: Vec::new(),
            bold: 0,
            italic: 0,
            underline: 0,
            heading: None,
            quote_depth: 0,
            lists: Vec::new(),
            preformatted: false,
        }
    }

    fn finish(mut self) -> Text<'static> {
        self.flush();
        Text::from(self.lines)
    }

    fn style(&self) -> Style {
        let mut modifier = Modifier::empty();
        if self.bold > 0 || self.heading.is_some() {
            modifier |= Modifier::BOLD;
        }
        if self.heading == Some(HeadingLevel::H1) || self.underline > 0 {
            modifier |= Modifier::UNDERLINED;
        }
        if self.italic > 0 || self.quote_depth > 0 {
            modifier |= Modifier::ITALIC;
        }
        Style::default().fg(self.base_fg).add_modifier(modifier)
    }

    fn muted() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    /// Ends the current line, if anything was written to it.
    fn flush(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        let mut spans = Vec::with_capacity(self.spans.len() + self.quote_depth);
        spans.extend((0..self.quote_depth).map(|_| Span::styled("│ ", Self::muted())));
        spans.append(&mut self.spans);
        self.lines.push(Line::from(spans));
    }

    /// One blank line between blocks, never at the top.
    fn separate(&mut self) {
        self.flush();
        if self.lines.last().is_some_and(|line| !line.spans.is_empty()) {
            self.lines.push(Line::default());
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.spans.push(Span::styled(
                code.into_string(),
                Style::default().fg(Color::White).bg(Color::DarkGray),
            )),
            Event::SoftBreak => self.spans.push(Span::raw(" ")),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.separate();
                self.lines
                    .push(Line::from(Span::styled("─".repeat(RULE_WIDTH), Self::muted())));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            // A paragraph inside a list item continues the item's line
            Tag::Paragraph if !self.spans.is_empty() => {}
            Tag::Paragraph => self.separate(),
            Tag::Heading { level, .. } => {
                self.separate();
                self.heading = Some(level);
                let marks = "#".repeat(heading_depth(level));
                let style = self.style();
                self.spans.push(Span::styled(format!("{marks} "), style));
            }
            Tag::BlockQuote(_) => {
                self.separate();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(_) => {
                self.separate();
                self.preformatted = true;
            }
            Tag::List(first) => {
                if self.lists.is_empty() {
                    self.separate();
                } else {
                    self.flush();
                }
                self.lists.push(first);
            }
            Tag::Item => {
                self.flush();
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        *n += 1;
                        format!("{indent}{}. ", *n - 1)
                    }
                    _ => format!("{indent}- "),
                };
                self.spans.push(Span::styled(marker, Self::muted()));
            }
            Tag::Strong => self.bold += 1,
            Tag::Emphasis => self.italic += 1,
            Tag::Link { .. } => self.underline += 1,
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::Item => self.flush(),
            TagEnd::Heading(_) => {
                self.flush();
                self.heading = None;
            }
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::CodeBlock => self.preformatted = false,
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
            }
            TagEnd::Strong => self.bold = self.bold.saturating_sub(1),
            TagEnd::Emphasis => self.italic = self.italic.saturating_sub(1),
            TagEnd::Link => self.underline = self.underline.saturating_sub(1),
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        // ratatui draws \t as zero width
        let text = text.replace('\t', INDENT);
        if self.preformatted {
            for line in text.lines() {
                self.spans.push(Span::raw(INDENT));
                self.spans
                    .push(Span::styled(line.to_string(), Style::default().fg(self.base_fg)));
                self.flush();
            }
            return;
        }
        let style = self.style();
        self.spans.push(Span::styled(text, style));
    }
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Rows `text` occupies when wrapped to `width` columns. Scroll views size
/// their canvas with this; an empty line still takes one row.
pub fn wrapped_height(text: &Text<'_>, width: u16) -> u16 {
    if width == 0 {
        return text.lines.len() as u16;
    }
    let options = textwrap::Options::new(usize::from(width)).break_words(true);
    text.lines
        .iter()
        .map(|line| {
            let plain: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
            textwrap::wrap(&plain, &options).len().max(1) as u16
        })
        .fold(0u16, u16::saturating_add)
}
