//! Render tests against ratatui's test backend.

use crate::common::{payload, png_bytes};
use ratatui::{backend::TestBackend, Terminal};
use seekterm::app::state::{SessionState, ViewMode};
use seekterm::error::SeekError;
use seekterm::tui::render;
use seekterm::tui::widgets::PLACEHOLDER_TEXT;
use seekterm::types::ToolBlock;
use std::collections::BTreeMap;

/// Renders `state` into a plain-text screen dump.
fn render_to_string(state: &SessionState, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("Failed to create terminal");

    terminal
        .draw(|frame| {
            render(frame, state);
        })
        .expect("Failed to draw");

    let buffer = terminal.backend().buffer();
    let mut output = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            output.push_str(buffer[(x, y)].symbol());
        }
        output.push('\n');
    }
    output
}

#[test]
fn test_render_offline_status() {
    let state = SessionState::new();
    let screen = render_to_string(&state, 100, 20);

    assert!(screen.contains("Offline"), "{screen}");
    assert!(screen.contains("Agents ready"), "{screen}");
    assert!(screen.contains("No tool output yet"), "{screen}");
}

#[test]
fn test_render_online_with_messages() {
    let mut state = SessionState::new();
    state.set_online(true);
    state.begin_submit("hello there");
    state.finish_submit(Ok(payload("", "")));
    state.apply_latest_answer(&payload("General Kenobi", "1"));

    let screen = render_to_string(&state, 100, 20);

    assert!(screen.contains("Online"), "{screen}");
    assert!(screen.contains("hello there"), "{screen}");
    assert!(screen.contains("Casual Agent"), "{screen}");
    assert!(screen.contains("General Kenobi"), "{screen}");
    assert!(screen.contains("▸ reasoning"), "{screen}");
    assert!(!screen.contains("thought about it"), "{screen}");
}

#[test]
fn test_render_expanded_reasoning() {
    let mut state = SessionState::new();
    state.apply_latest_answer(&payload("Answer", "1"));
    state.toggle_reasoning(0);

    let screen = render_to_string(&state, 100, 20);

    assert!(screen.contains("▾ reasoning"), "{screen}");
    assert!(screen.contains("thought about it"), "{screen}");
}

#[test]
fn test_render_tool_blocks_in_editor() {
    let mut state = SessionState::new();
    let mut answer = payload("Ran it", "1");
    answer.blocks = Some(BTreeMap::from([(
        "0".to_string(),
        ToolBlock {
            tool_type: "python".to_string(),
            block: "print('hi')".to_string(),
            feedback: "hi".to_string(),
            success: true,
        },
    )]));
    state.apply_latest_answer(&answer);

    let screen = render_to_string(&state, 100, 24);

    assert!(screen.contains("python"), "{screen}");
    assert!(screen.contains("print('hi')"), "{screen}");
}

#[test]
fn test_render_placeholder_in_browser() {
    let mut state = SessionState::new();
    state.apply_screenshot(Err(SeekError::status("/screenshots/updated_screen.png", 500)));
    state.select_view(ViewMode::Browser);

    let screen = render_to_string(&state, 100, 20);

    assert!(screen.contains(PLACEHOLDER_TEXT), "{screen}");
}

#[test]
fn test_render_screenshot_in_browser() {
    let mut state = SessionState::new();
    state.apply_screenshot(Ok(png_bytes(8, 8)));
    state.select_view(ViewMode::Browser);

    let screen = render_to_string(&state, 100, 20);

    assert!(screen.contains('▀'), "{screen}");
    assert!(!screen.contains(PLACEHOLDER_TEXT), "{screen}");
}

#[test]
fn test_render_loading_indicator() {
    let mut state = SessionState::new();
    state.begin_submit("slow question");

    let screen = render_to_string(&state, 100, 20);

    assert!(screen.contains("Thinking..."), "{screen}");
    assert!(screen.contains("Ctrl+S to stop"), "{screen}");
}
