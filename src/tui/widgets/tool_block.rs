//! Tool block rendering widget for the editor view.
//!
//! Each [`ToolBlock`] reported by the backend is drawn as a bordered box:
//! - Header with status icon and tool type
//! - The executed block (code or command)
//! - Feedback from the execution, styled as an error when it failed
//!
//! # Example
//!
//! ```rust,ignore
//! use seekterm::tui::widgets::ToolBlockWidget;
//! use seekterm::types::ToolBlock;
//!
//! let block = ToolBlock { tool_type: "bash".into(), block: "ls".into(), feedback: "a.txt".into(), success: true };
//! frame.render_widget(ToolBlockWidget::new(&block), area);
//! ```

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::tui::theme::SeekTheme;
use crate::types::ToolBlock;

/// Widget for rendering one backend tool block.
pub struct ToolBlockWidget<'a> {
    block: &'a ToolBlock,
}

impl<'a> ToolBlockWidget<'a> {
    #[must_use]
    pub fn new(block: &'a ToolBlock) -> Self {
        Self { block }
    }

    /// Number of rows the widget needs at `width` columns, borders included.
    #[must_use]
    pub fn height(&self, width: u16) -> u16 {
        let inner = usize::from(width.saturating_sub(2)).max(1);
        let rows = self.lines().iter().map(|line| wrapped_rows(line, inner)).sum::<usize>();
        u16::try_from(rows + 2).unwrap_or(u16::MAX)
    }

    fn header(&self) -> Line<'static> {
        let (icon, style) = if self.block.success {
            ("⚙", SeekTheme::tool_header())
        } else {
            ("✗", SeekTheme::error().add_modifier(Modifier::BOLD))
        };

        let tool = if self.block.tool_type.is_empty() {
            "tool".to_string()
        } else {
            self.block.tool_type.clone()
        };

        Line::from(vec![
            Span::styled(format!(" {icon} "), style),
            Span::styled(tool, style),
        ])
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![self.header()];

        for line in self.block.block.lines() {
            lines.push(Line::from(vec![
                Span::styled("  › ", SeekTheme::prompt()),
                Span::styled(line.to_string(), Style::default().fg(SeekTheme::TOOL_CONTENT)),
            ]));
        }

        if !self.block.feedback.trim().is_empty() {
            lines.push(Line::from(""));
            let style = if self.block.success {
                SeekTheme::muted()
            } else {
                SeekTheme::error()
            };
            for line in self.block.feedback.lines() {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(line.to_string(), style),
                ]));
            }
        }

        lines
    }
}

/// Rows `line` occupies once word-wrapped at `width` columns.
fn wrapped_rows(line: &Line<'_>, width: usize) -> usize {
    let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
    if text.trim().is_empty() {
        return 1;
    }
    textwrap::wrap(&text, width).len().max(1)
}

impl Widget for ToolBlockWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(SeekTheme::border())
            .style(Style::default().bg(SeekTheme::BG_CODE));

        Paragraph::new(self.lines())
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
