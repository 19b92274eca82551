use std::borrow::Cow;

use ratatui::text::{Line, Span, Text};
use tui_markdown as md;

use crate::transcript::resolver::MarkdownFormatter;

/// Markdown formatter backed by `tui-markdown`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TuiMarkdownFormatter;

impl MarkdownFormatter for TuiMarkdownFormatter {
    fn format(&self, text: &str) -> Text<'static> {
        if text.trim().is_empty() {
            return Text::default();
        }
        let rendered = md::from_str(text);
        Text {
            alignment: rendered.alignment,
            style: rendered.style,
            lines: rendered.lines.iter().map(line_to_static).collect(),
        }
    }
}

pub fn line_to_static(line: &Line<'_>) -> Line<'static> {
    Line {
        style: line.style,
        alignment: line.alignment,
        spans: line
            .spans
            .iter()
            .map(|span| Span {
                style: span.style,
                content: Cow::Owned(span.content.to_string()),
            })
            .collect(),
    }
}
