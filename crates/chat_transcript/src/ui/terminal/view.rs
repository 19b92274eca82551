use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::config::Icons;
use crate::transcript::resolver::{RenderDecision, RenderedRow};
use crate::transcript::scroll::{ScrollRequest, ScrollTarget};

/// Width reserved for the left indent on assistant rows, aligning content
/// with the user's "› " prefix.
const INDENT: &str = "  ";

/// Turns render decisions into styled lines and keeps the scroll position.
#[derive(Debug, Clone)]
pub struct TranscriptView {
    icons: Icons,
    lines: Vec<Line<'static>>,
    scroll_offset: u16,
}

impl TranscriptView {
    pub fn new(icons: Icons) -> Self {
        Self {
            icons,
            lines: Vec::new(),
            scroll_offset: 0,
        }
    }

    /// Replace the displayed rows.
    pub fn update(&mut self, rows: &[RenderedRow]) {
        let mut lines = Vec::new();
        for row in rows {
            let row_lines = Self::row_lines(&row.decision, &self.icons);
            if row_lines.is_empty() {
                continue;
            }
            // One blank line between rows.
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            lines.extend(row_lines);
        }
        self.lines = lines;
    }

    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll_offset
    }

    pub fn apply_scroll(&mut self, request: ScrollRequest, viewport_height: u16) {
        match request.target {
            ScrollTarget::LastElement => {
                let overflow = self.lines.len().saturating_sub(viewport_height as usize);
                self.scroll_offset = overflow.min(u16::MAX as usize) as u16;
            }
        }
    }

    pub fn scroll_up(&mut self, rows: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(rows);
    }

    pub fn scroll_down(&mut self, rows: u16) {
        let max = self.lines.len().saturating_sub(1).min(u16::MAX as usize) as u16;
        self.scroll_offset = self.scroll_offset.saturating_add(rows).min(max);
    }

    /// Styled lines for a single decision.
    pub fn row_lines(decision: &RenderDecision, icons: &Icons) -> Vec<Line<'static>> {
        match decision {
            RenderDecision::UserText(content) => Self::user_lines(content),
            RenderDecision::AssistantText(text) => text
                .lines
                .iter()
                .map(|line| {
                    let mut spans = vec![Span::raw(INDENT)];
                    spans.extend(line.spans.iter().cloned());
                    Line::from(spans).style(line.style)
                })
                .collect(),
            RenderDecision::AssistantSpinner => vec![Line::from(vec![
                Span::raw(INDENT),
                Span::styled(icons.spinner_icon.clone(), spinner_style()),
            ])],
            RenderDecision::AssistantStatusLabel { spinner, label } => {
                let mut spans = vec![Span::raw(INDENT)];
                if *spinner {
                    spans.push(Span::styled(icons.spinner_icon.clone(), spinner_style()));
                    spans.push(Span::raw(" "));
                    spans.push(Span::styled(
                        label.clone(),
                        Style::default()
                            .add_modifier(Modifier::DIM)
                            .add_modifier(Modifier::ITALIC),
                    ));
                } else {
                    spans.push(Span::styled(
                        label.clone(),
                        Style::default().fg(Color::Green),
                    ));
                }
                vec![Line::from(spans)]
            }
            RenderDecision::CustomWidget(widget) => widget.lines.clone(),
        }
    }

    /// An empty message still gets its `› ` row.
    fn user_lines(content: &str) -> Vec<Line<'static>> {
        let prefix_style = Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::DIM);
        content
            .split('\n')
            .enumerate()
            .map(|(i, line)| {
                let prefix = if i == 0 {
                    Span::styled("› ", prefix_style)
                } else {
                    Span::raw(INDENT)
                };
                Line::from(vec![prefix, Span::raw(line.to_string())])
            })
            .collect()
    }
}

fn spinner_style() -> Style {
    Style::default().fg(Color::Blue)
}

impl Widget for &TranscriptView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.lines.clone())
            .scroll((self.scroll_offset, 0))
            .render(area, buf);
    }
}
