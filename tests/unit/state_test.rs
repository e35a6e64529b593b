//! Unit tests for session state reconciliation.
//!
//! These cover the answer dedup rule, submit bookkeeping, local toggles and
//! the screenshot slot lifecycle.

use crate::common::{payload, png_bytes};
use pretty_assertions::assert_eq;
use seekterm::app::state::{
    SessionState, ViewMode, READY_STATUS, STOPPING_STATUS, SUBMIT_ERROR, SUBMIT_ERROR_MESSAGE,
};
use seekterm::error::SeekError;
use seekterm::screenshot::ScreenshotSlot;
use seekterm::types::{MessageKind, ToolBlock};
use std::collections::BTreeMap;

fn agent_contents(state: &SessionState) -> Vec<&str> {
    state
        .messages()
        .iter()
        .filter(|m| m.kind == MessageKind::Agent)
        .map(|m| m.content.as_str())
        .collect()
}

// ============================================================================
// Initial State
// ============================================================================

#[test]
fn test_new_state_defaults() {
    let state = SessionState::new();

    assert!(state.messages().is_empty());
    assert!(!state.is_online());
    assert!(!state.is_loading());
    assert_eq!(state.error(), None);
    assert_eq!(state.view(), ViewMode::Editor);
    assert_eq!(state.status_text(), READY_STATUS);
    assert_eq!(state.snapshot().screenshot, ScreenshotSlot::Empty);
    assert!(state.needs_render());
}

// ============================================================================
// Latest Answer Dedup
// ============================================================================

#[test]
fn test_hello_world_is_appended_once() {
    let mut state = SessionState::new();

    assert!(state.apply_latest_answer(&payload("Hello World.", "1")));
    assert_eq!(agent_contents(&state), ["Hello World."]);

    assert!(!state.apply_latest_answer(&payload("hello   world", "2")));
    assert_eq!(agent_contents(&state), ["Hello World."]);
}

#[test]
fn test_new_answer_carries_metadata() {
    let mut state = SessionState::new();
    let mut answer = payload("Here are the results", "42");
    answer.status = "Done".to_string();

    state.apply_latest_answer(&answer);

    let message = &state.messages()[0];
    assert_eq!(message.reasoning.as_deref(), Some("thought about it"));
    assert_eq!(message.agent_name.as_deref(), Some("Casual Agent"));
    assert_eq!(message.id.as_deref(), Some("42"));
    assert_eq!(state.status_text(), "Done");
}

#[test]
fn test_blank_answer_updates_snapshot_only() {
    let mut state = SessionState::new();
    let mut answer = payload("   ", "3");
    answer.status = "Thinking".to_string();

    assert!(!state.apply_latest_answer(&answer));
    assert!(state.messages().is_empty());
    assert_eq!(state.snapshot().status, "Thinking");
    assert_eq!(state.snapshot().id, "3");
}

#[test]
fn test_answer_matching_user_message_is_not_repeated() {
    let mut state = SessionState::new();
    state.begin_submit("What time is it?");
    state.finish_submit(Ok(payload("", "")));

    assert!(!state.apply_latest_answer(&payload("what time is it", "9")));
    assert_eq!(state.messages().len(), 1);
}

#[test]
fn test_poll_keeps_blocks_when_payload_has_none() {
    let mut state = SessionState::new();
    let mut with_blocks = payload("Running code", "1");
    with_blocks.blocks = Some(BTreeMap::from([(
        "0".to_string(),
        ToolBlock {
            tool_type: "python".to_string(),
            block: "print(1)".to_string(),
            feedback: "1".to_string(),
            success: true,
        },
    )]));
    state.apply_latest_answer(&with_blocks);

    state.apply_latest_answer(&payload("Still running", "2"));
    assert_eq!(state.snapshot().blocks.len(), 1);

    let mut empty = payload("Finished", "3");
    empty.blocks = Some(BTreeMap::new());
    state.apply_latest_answer(&empty);
    assert_eq!(state.snapshot().blocks.len(), 1);
    assert_eq!(state.snapshot().answer, "Finished");
}

// ============================================================================
// Submit and Stop
// ============================================================================

#[test]
fn test_blank_submit_is_rejected() {
    let mut state = SessionState::new();

    assert!(!state.begin_submit(""));
    assert!(!state.begin_submit(" \t\n"));
    assert!(state.messages().is_empty());
    assert!(!state.is_loading());
}

#[test]
fn test_submit_rejected_while_loading() {
    let mut state = SessionState::new();

    assert!(state.begin_submit("first"));
    assert!(!state.begin_submit("second"));
    assert_eq!(state.messages().len(), 1);
}

#[test]
fn test_successful_submit_clears_input() {
    let mut state = SessionState::new();
    for c in "find flights".chars() {
        state.insert_char(c);
    }

    state.begin_submit("find flights");
    assert!(state.is_loading());
    assert_eq!(state.messages()[0].kind, MessageKind::User);

    state.finish_submit(Ok(payload("Found 3 flights", "5")));
    assert!(!state.is_loading());
    assert!(state.input.is_empty());
    assert_eq!(state.snapshot().answer, "Found 3 flights");
    assert_eq!(state.error(), None);
}

#[test]
fn test_failed_submit_appends_one_error() {
    let mut state = SessionState::new();
    state.input = "find flights".to_string();

    state.begin_submit("find flights");
    state.finish_submit(Err(SeekError::status("/query", 500)));

    assert!(!state.is_loading());
    assert_eq!(state.error(), Some(SUBMIT_ERROR));
    let errors: Vec<_> = state
        .messages()
        .iter()
        .filter(|m| m.kind == MessageKind::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].content, SUBMIT_ERROR_MESSAGE);
    assert_eq!(state.input, "find flights");
}

#[test]
fn test_new_submit_clears_previous_error() {
    let mut state = SessionState::new();
    state.begin_submit("one");
    state.finish_submit(Err(SeekError::network("/query", "refused")));

    state.begin_submit("two");
    assert_eq!(state.error(), None);
}

#[test]
fn test_stop_clears_loading_and_sets_status() {
    let mut state = SessionState::new();
    state.begin_submit("long task");

    state.begin_stop();

    assert!(!state.is_loading());
    assert_eq!(state.error(), None);
    assert_eq!(state.status_text(), STOPPING_STATUS);
}

// ============================================================================
// Toggles
// ============================================================================

#[test]
fn test_toggle_reasoning_twice_restores_set() {
    let mut state = SessionState::new();
    state.apply_latest_answer(&payload("answer", "1"));
    let before = state.expanded_reasoning().clone();

    state.toggle_reasoning(0);
    assert!(state.is_reasoning_expanded(0));
    state.toggle_reasoning(0);

    assert_eq!(state.expanded_reasoning(), &before);
}

#[test]
fn test_toggle_selected_reasoning_defaults_to_newest_agent() {
    let mut state = SessionState::new();
    state.apply_latest_answer(&payload("first", "1"));
    state.apply_latest_answer(&payload("second", "2"));

    assert_eq!(state.toggle_selected_reasoning(), Some(1));

    state.select_previous();
    state.select_previous();
    assert_eq!(state.selected_message(), Some(0));
    assert_eq!(state.toggle_selected_reasoning(), Some(0));
}

#[test]
fn test_browser_view_requires_screenshot() {
    let mut state = SessionState::new();

    assert!(!state.select_view(ViewMode::Browser));
    assert_eq!(state.view(), ViewMode::Editor);
}

#[test]
fn test_browser_view_allowed_with_placeholder() {
    let mut state = SessionState::new();
    state.apply_screenshot(Err(SeekError::status("/screenshots/updated_screen.png", 404)));

    assert!(state.select_view(ViewMode::Browser));
    assert_eq!(state.view(), ViewMode::Browser);
    assert!(state.select_view(ViewMode::Editor));
}

// ============================================================================
// Screenshot Lifecycle
// ============================================================================

#[test]
fn test_two_screenshot_failures_release_nothing() {
    let mut state = SessionState::new();

    state.apply_screenshot(Err(SeekError::network("/screenshots", "refused")));
    assert_eq!(state.snapshot().screenshot, ScreenshotSlot::Placeholder);
    let first = state.snapshot().screenshot_timestamp;

    state.apply_screenshot(Err(SeekError::network("/screenshots", "refused")));
    assert_eq!(state.snapshot().screenshot, ScreenshotSlot::Placeholder);
    assert!(state.snapshot().screenshot_timestamp > first);

    assert_eq!(state.screenshots().released_count(), 0);
    assert_eq!(state.screenshots().live_handles(), 0);
}

#[test]
fn test_new_screenshot_releases_previous_handle() {
    let mut state = SessionState::new();

    state.apply_screenshot(Ok(png_bytes(4, 4)));
    let first = state.snapshot().screenshot.handle().expect("handle");
    state.apply_screenshot(Ok(png_bytes(4, 4)));
    let second = state.snapshot().screenshot.handle().expect("handle");

    assert_ne!(first, second);
    assert_eq!(state.screenshots().released_count(), 1);
    assert_eq!(state.screenshots().live_handles(), 1);
}

#[test]
fn test_failure_after_success_releases_handle() {
    let mut state = SessionState::new();
    state.apply_screenshot(Ok(png_bytes(2, 2)));

    state.apply_screenshot(Ok(b"not an image".to_vec()));

    assert_eq!(state.snapshot().screenshot, ScreenshotSlot::Placeholder);
    assert_eq!(state.screenshots().released_count(), 1);
    assert_eq!(state.screenshots().live_handles(), 0);
}

#[test]
fn test_release_resources_on_teardown() {
    let mut state = SessionState::new();
    state.apply_screenshot(Ok(png_bytes(2, 2)));

    state.release_resources();

    assert_eq!(state.snapshot().screenshot, ScreenshotSlot::Empty);
    assert_eq!(state.screenshots().live_handles(), 0);
}

// ============================================================================
// Input and Rendering Bookkeeping
// ============================================================================

#[test]
fn test_input_editing_with_multibyte_chars() {
    let mut state = SessionState::new();
    state.insert_char('é');
    state.insert_char('t');
    state.cursor_home();
    state.insert_char('h');

    assert_eq!(state.input, "hét");
    state.cursor_end();
    state.delete_char();
    assert_eq!(state.input, "hé");
}

#[test]
fn test_mark_rendered_clears_dirty() {
    let mut state = SessionState::new();
    state.mark_rendered();
    assert!(!state.needs_render());

    state.insert_char('x');
    assert!(state.needs_render());
}
