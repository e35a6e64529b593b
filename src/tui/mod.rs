//! Terminal UI rendering

pub mod theme;
pub mod widgets;

use std::collections::BTreeMap;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::state::{SessionState, ViewMode};
use crate::screenshot::ScreenshotSlot;
use crate::types::{Message, MessageKind, ToolBlock};
use crate::util::truncate_string;
use theme::SeekTheme;
use widgets::{PlaceholderWidget, ScreenshotWidget, ToolBlockWidget};

/// Backend status strings longer than this are cut in the status bar.
const STATUS_MAX_CHARS: usize = 60;

/// Layout facts the event loop needs after a frame is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderInfo {
    /// Largest useful transcript scroll offset for the current size.
    pub max_scroll: usize,
}

pub fn render(frame: &mut Frame, state: &SessionState) -> RenderInfo {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Chat + computer
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[0]);

    let chat = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Transcript
            Constraint::Length(3), // Input
        ])
        .split(columns[0]);

    let info = render_transcript(frame, chat[0], state);
    render_input(frame, chat[1], state);
    render_computer(frame, columns[1], state);
    render_status_bar(frame, rows[1], state);
    info
}

// ============================================================================
// Transcript
// ============================================================================

fn render_transcript(frame: &mut Frame, area: Rect, state: &SessionState) -> RenderInfo {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(SeekTheme::border())
        .title(Span::styled(" Chat ", SeekTheme::title()));
    let inner = block.inner(area);
    let width = usize::from(inner.width).max(1);

    let mut lines: Vec<Line<'static>> = Vec::new();
    for (index, message) in state.messages().iter().enumerate() {
        push_message_lines(
            &mut lines,
            message,
            width,
            state.is_reasoning_expanded(index),
            state.selected_message() == Some(index),
        );
    }

    if state.is_loading() {
        lines.push(Line::from(Span::styled(
            format!("{} Thinking...", state.throbber_char()),
            SeekTheme::warning(),
        )));
    }

    let height = usize::from(inner.height);
    let max_scroll = lines.len().saturating_sub(height);
    let top = max_scroll - state.scroll_offset().min(max_scroll);

    let transcript = Paragraph::new(lines)
        .block(block)
        .scroll((u16::try_from(top).unwrap_or(u16::MAX), 0));
    frame.render_widget(transcript, area);

    RenderInfo { max_scroll }
}

fn push_message_lines(
    lines: &mut Vec<Line<'static>>,
    message: &Message,
    width: usize,
    expanded: bool,
    selected: bool,
) {
    let (label, label_style, text_style) = match message.kind {
        MessageKind::User => (
            "You".to_string(),
            SeekTheme::user_label(),
            SeekTheme::user_message(),
        ),
        MessageKind::Agent => (
            message
                .agent_name
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| "Agent".to_string()),
            SeekTheme::agent_label(),
            SeekTheme::agent_message(),
        ),
        MessageKind::Error => ("Error".to_string(), SeekTheme::error(), SeekTheme::error()),
    };

    let marker = if selected { "▶ " } else { "" };
    let mut header = Line::from(Span::styled(format!("{marker}{label}"), label_style));
    if selected {
        header = header.style(SeekTheme::selected());
    }
    lines.push(header);

    if message.has_reasoning() {
        if expanded {
            lines.push(Line::from(Span::styled("▾ reasoning", SeekTheme::muted())));
            let reasoning = message.reasoning.as_deref().unwrap_or_default();
            push_wrapped(lines, reasoning, width, SeekTheme::reasoning());
        } else {
            lines.push(Line::from(Span::styled(
                "▸ reasoning (Ctrl+R)",
                SeekTheme::muted(),
            )));
        }
    }

    push_wrapped(lines, &message.content, width, text_style);
    lines.push(Line::from(""));
}

fn push_wrapped(lines: &mut Vec<Line<'static>>, text: &str, width: usize, style: Style) {
    for raw in text.lines() {
        if raw.is_empty() {
            lines.push(Line::from(""));
            continue;
        }
        for wrapped in textwrap::wrap(raw, width) {
            lines.push(Line::from(Span::styled(wrapped.into_owned(), style)));
        }
    }
}

// ============================================================================
// Input and Status Bar
// ============================================================================

fn render_input(frame: &mut Frame, area: Rect, state: &SessionState) {
    let title = if state.is_loading() {
        " Ask (Ctrl+S to stop, Ctrl+C to quit) "
    } else {
        " Ask (Enter to send, Ctrl+C to quit) "
    };

    let input = Paragraph::new(state.input.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(SeekTheme::border_focused())
                .title(title),
        )
        .style(SeekTheme::user_message());
    frame.render_widget(input, area);

    let before_cursor: String = state.input.chars().take(state.cursor_position()).collect();
    let offset = u16::try_from(before_cursor.width()).unwrap_or(u16::MAX);
    let max_x = area.x + area.width.saturating_sub(2);
    frame.set_cursor_position(((area.x + 1).saturating_add(offset).min(max_x), area.y + 1));
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &SessionState) {
    let mut spans = Vec::new();

    if state.is_online() {
        spans.push(Span::styled(" ● Online", SeekTheme::success()));
    } else {
        spans.push(Span::styled(" ○ Offline", SeekTheme::error()));
    }

    spans.push(Span::raw(" │ "));
    spans.push(Span::raw(truncate_string(state.status_text(), STATUS_MAX_CHARS)));

    if state.is_loading() {
        spans.push(Span::styled(
            format!(" {}", state.throbber_char()),
            SeekTheme::warning(),
        ));
    }

    if let Some(error) = state.error() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(error.to_string(), SeekTheme::error()));
    }

    let status_bar = Paragraph::new(Line::from(spans)).style(SeekTheme::status_bar());
    frame.render_widget(status_bar, area);
}

// ============================================================================
// Computer Pane
// ============================================================================

fn render_computer(frame: &mut Frame, area: Rect, state: &SessionState) {
    let tab = |label: &'static str, view: ViewMode| {
        if state.view() == view {
            Span::styled(label, SeekTheme::tab_active())
        } else {
            Span::styled(label, SeekTheme::muted())
        }
    };

    let title = Line::from(vec![
        Span::raw(" "),
        tab(" Editor ", ViewMode::Editor),
        Span::raw(" "),
        tab(" Browser ", ViewMode::Browser),
        Span::raw(" "),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(SeekTheme::border())
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match state.view() {
        ViewMode::Editor => render_editor(frame, inner, &state.snapshot().blocks),
        ViewMode::Browser => render_browser(frame, inner, state),
    }
}

fn render_editor(frame: &mut Frame, area: Rect, blocks: &BTreeMap<String, ToolBlock>) {
    if blocks.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("No tool output yet", SeekTheme::muted())),
            area,
        );
        return;
    }

    // Newest blocks win when they don't all fit.
    let ordered = ordered_blocks(blocks);
    let mut visible = Vec::new();
    let mut used = 0u16;
    for block in ordered.iter().rev() {
        let height = ToolBlockWidget::new(block).height(area.width);
        if used > 0 && used.saturating_add(height) > area.height {
            break;
        }
        used = used.saturating_add(height);
        visible.push((*block, height));
    }

    let mut y = area.y;
    let bottom = area.y + area.height;
    for (block, height) in visible.into_iter().rev() {
        if y >= bottom {
            break;
        }
        let rect = Rect::new(area.x, y, area.width, height.min(bottom - y));
        frame.render_widget(ToolBlockWidget::new(block), rect);
        y = y.saturating_add(height);
    }
}

/// Orders blocks by numeric id when ids are numbers, lexically otherwise.
fn ordered_blocks(blocks: &BTreeMap<String, ToolBlock>) -> Vec<&ToolBlock> {
    let mut entries: Vec<_> = blocks.iter().collect();
    entries.sort_by_key(|(id, _)| (id.parse::<u64>().unwrap_or(u64::MAX), (*id).clone()));
    entries.into_iter().map(|(_, block)| block).collect()
}

fn render_browser(frame: &mut Frame, area: Rect, state: &SessionState) {
    match state.snapshot().screenshot {
        ScreenshotSlot::Empty => frame.render_widget(
            Paragraph::new(Span::styled("No screenshot yet", SeekTheme::muted())),
            area,
        ),
        ScreenshotSlot::Placeholder => frame.render_widget(PlaceholderWidget, area),
        ScreenshotSlot::Handle(id) => match state.screenshots().frame(id) {
            Some(screenshot) => frame.render_widget(ScreenshotWidget::new(screenshot), area),
            None => frame.render_widget(PlaceholderWidget, area),
        },
    }
}
