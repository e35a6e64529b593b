//! Session state management
//!
//! [`SessionState`] is the single container for everything the view renders.
//! All mutations are synchronous methods so that each one completes in a
//! single step of the event loop; background tasks only ever reach this
//! state through [`SessionController`](super::controller::SessionController).

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::SeekError;
use crate::screenshot::{ScreenshotSlot, ScreenshotStore};
use crate::types::{AnswerPayload, Message, ResponseSnapshot};
use crate::util::{normalize_answer, now_millis};

/// Status text shown before the first answer arrives.
pub const READY_STATUS: &str = "Agents ready";

/// Status text shown right after a stop request.
pub const STOPPING_STATUS: &str = "Stopping process...";

/// Error text set when a query fails.
pub const SUBMIT_ERROR: &str = "Failed to process query.";

/// Transcript entry appended when a query fails.
pub const SUBMIT_ERROR_MESSAGE: &str = "Error: Unable to get a response.";

/// Which pane the computer view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Tool blocks produced by the agent.
    #[default]
    Editor,
    /// Live screenshot of the agent's browser.
    Browser,
}

pub struct SessionState {
    pub input: String,

    messages: Vec<Message>,
    snapshot: ResponseSnapshot,
    screenshots: ScreenshotStore,

    online: bool,
    loading: bool,
    error: Option<String>,
    view: ViewMode,
    expanded_reasoning: BTreeSet<usize>,
    status_text: String,

    cursor_pos: usize,
    /// Lines scrolled up from the bottom of the transcript.
    scroll_offset: usize,
    selected: Option<usize>,
    throbber_frame: usize,

    dirty: DirtyFlags,
}

#[derive(Default)]
struct DirtyFlags {
    messages: bool,
    input: bool,
    computer: bool,
    full: bool,
}

impl DirtyFlags {
    fn any(&self) -> bool {
        self.messages || self.input || self.computer || self.full
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            input: String::new(),
            messages: Vec::new(),
            snapshot: ResponseSnapshot::default(),
            screenshots: ScreenshotStore::new(),
            online: false,
            loading: false,
            error: None,
            view: ViewMode::Editor,
            expanded_reasoning: BTreeSet::new(),
            status_text: READY_STATUS.to_string(),
            cursor_pos: 0,
            scroll_offset: 0,
            selected: None,
            throbber_frame: 0,
            dirty: DirtyFlags {
                full: true,
                ..Default::default()
            },
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn snapshot(&self) -> &ResponseSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn screenshots(&self) -> &ScreenshotStore {
        &self.screenshots
    }

    #[must_use]
    pub fn is_online(&self) -> bool {
        self.online
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn view(&self) -> ViewMode {
        self.view
    }

    #[must_use]
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    #[must_use]
    pub fn expanded_reasoning(&self) -> &BTreeSet<usize> {
        &self.expanded_reasoning
    }

    #[must_use]
    pub fn is_reasoning_expanded(&self, index: usize) -> bool {
        self.expanded_reasoning.contains(&index)
    }

    #[must_use]
    pub fn selected_message(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    // ========================================================================
    // Input Editing
    // ========================================================================

    /// Inserts a character at the current cursor position.
    pub fn insert_char(&mut self, c: char) {
        let byte_pos = self.byte_index(self.cursor_pos);
        self.input.insert(byte_pos, c);
        self.cursor_pos += 1;
        self.dirty.input = true;
    }

    /// Deletes the character before the cursor (backspace behavior).
    pub fn delete_char(&mut self) {
        if self.cursor_pos > 0 {
            let byte_pos = self.byte_index(self.cursor_pos - 1);
            self.input.remove(byte_pos);
            self.cursor_pos -= 1;
        }
        self.dirty.input = true;
    }

    /// Clears the input buffer and resets the cursor.
    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_pos = 0;
        self.dirty.input = true;
    }

    /// Returns the current cursor position (character index, not byte index).
    #[must_use]
    pub fn cursor_position(&self) -> usize {
        self.cursor_pos
    }

    pub fn cursor_left(&mut self) {
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
        self.dirty.input = true;
    }

    pub fn cursor_right(&mut self) {
        if self.cursor_pos < self.input.chars().count() {
            self.cursor_pos += 1;
        }
        self.dirty.input = true;
    }

    pub fn cursor_home(&mut self) {
        self.cursor_pos = 0;
        self.dirty.input = true;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_pos = self.input.chars().count();
        self.dirty.input = true;
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_pos)
            .map_or(self.input.len(), |(i, _)| i)
    }

    // ========================================================================
    // Scrolling and Selection
    // ========================================================================

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
        self.dirty.messages = true;
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
        self.dirty.messages = true;
    }

    /// Jumps back to the newest transcript entry.
    pub fn scroll_to_latest(&mut self) {
        self.scroll_offset = 0;
        self.dirty.messages = true;
    }

    /// Caps the scroll offset once the renderer knows how far it can go.
    pub fn clamp_scroll(&mut self, max_offset: usize) {
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    /// Moves the selection to the previous message, starting from the newest.
    pub fn select_previous(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(index) => index.saturating_sub(1),
            None => self.messages.len() - 1,
        });
        self.dirty.messages = true;
    }

    /// Moves the selection to the next message; past the newest clears it.
    pub fn select_next(&mut self) {
        self.selected = match self.selected {
            Some(index) if index + 1 < self.messages.len() => Some(index + 1),
            _ => None,
        };
        self.dirty.messages = true;
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.dirty.messages = true;
    }

    // ========================================================================
    // Reconciliation
    // ========================================================================

    pub fn set_online(&mut self, online: bool) {
        if self.online != online {
            debug!(online, "Backend liveness changed");
            self.dirty.full = true;
        }
        self.online = online;
    }

    /// Applies a polled `/latest_answer` payload.
    ///
    /// The snapshot is always merged. A new agent message is appended only
    /// when the answer is non-blank and its normalized form differs from
    /// every message already in the transcript.
    ///
    /// Returns `true` if a message was appended.
    pub fn apply_latest_answer(&mut self, payload: &AnswerPayload) -> bool {
        self.snapshot.merge(payload);
        self.dirty.computer = true;

        if !payload.has_answer() {
            return false;
        }

        let normalized = normalize_answer(&payload.answer);
        let seen = self
            .messages
            .iter()
            .any(|message| normalize_answer(&message.content) == normalized);
        if seen {
            return false;
        }

        let mut message = Message::agent(payload.answer.clone())
            .with_reasoning(payload.reasoning.clone())
            .with_agent_name(payload.agent_name.clone())
            .with_status(payload.status.clone());
        if !payload.uid.is_empty() {
            message = message.with_id(payload.uid.clone());
        }

        debug!(
            agent = %payload.agent_name,
            uid = %payload.uid,
            "Appending agent answer"
        );
        self.add_message(message);
        self.status_text = payload.status.clone();
        self.scroll_to_latest();
        self.dirty.full = true;
        true
    }

    /// Starts a submission: appends the user message, sets loading and
    /// clears any previous error.
    ///
    /// Returns `false` (and changes nothing) for blank queries or while a
    /// previous submission is still in flight.
    pub fn begin_submit(&mut self, query: &str) -> bool {
        if query.trim().is_empty() || self.loading {
            return false;
        }
        self.add_message(Message::user(query));
        self.loading = true;
        self.error = None;
        self.scroll_to_latest();
        self.dirty.full = true;
        true
    }

    /// Completes a submission.
    ///
    /// Success clears the input and merges the response into the snapshot;
    /// failure records the error and appends one error message. Loading is
    /// cleared either way.
    pub fn finish_submit(&mut self, result: Result<AnswerPayload, SeekError>) {
        match result {
            Ok(payload) => {
                self.clear_input();
                self.snapshot.merge(&payload);
                self.dirty.computer = true;
            }
            Err(e) => {
                warn!(error = %e, module = e.module(), "Query failed");
                self.error = Some(SUBMIT_ERROR.to_string());
                self.add_message(Message::error(SUBMIT_ERROR_MESSAGE));
                self.scroll_to_latest();
            }
        }
        self.loading = false;
        self.dirty.full = true;
    }

    /// Local side of a stop request.
    pub fn begin_stop(&mut self) {
        self.loading = false;
        self.error = None;
        self.status_text = STOPPING_STATUS.to_string();
        self.dirty.full = true;
    }

    /// Applies the result of a screenshot fetch.
    ///
    /// Bytes that decode become a new handle; fetch or decode failures
    /// become the placeholder. The outgoing handle is released in both
    /// cases, the placeholder never is.
    pub fn apply_screenshot(&mut self, result: Result<Vec<u8>, SeekError>) {
        let next = match result.and_then(|bytes| self.screenshots.materialize(&bytes)) {
            Ok(id) => ScreenshotSlot::Handle(id),
            Err(e) => {
                debug!(error = %e, "Screenshot unavailable, showing placeholder");
                ScreenshotSlot::Placeholder
            }
        };

        self.screenshots.replace(&mut self.snapshot.screenshot, next);
        self.snapshot.screenshot_timestamp = now_millis().max(self.snapshot.screenshot_timestamp + 1);
        self.dirty.computer = true;
    }

    /// Releases every resource held for the view. Called on teardown.
    pub fn release_resources(&mut self) {
        self.screenshots
            .replace(&mut self.snapshot.screenshot, ScreenshotSlot::Empty);
    }

    // ========================================================================
    // Local Toggles
    // ========================================================================

    /// Expands the reasoning of message `index` if collapsed, collapses it otherwise.
    pub fn toggle_reasoning(&mut self, index: usize) {
        if !self.expanded_reasoning.remove(&index) {
            self.expanded_reasoning.insert(index);
        }
        self.dirty.messages = true;
    }

    /// Toggles reasoning on the selected message, or on the newest agent
    /// message with reasoning when nothing is selected.
    ///
    /// Returns the toggled index.
    pub fn toggle_selected_reasoning(&mut self) -> Option<usize> {
        let index = self.selected.or_else(|| {
            self.messages
                .iter()
                .rposition(|message| message.is_agent() && message.has_reasoning())
        })?;
        self.toggle_reasoning(index);
        Some(index)
    }

    /// Switches the computer view.
    ///
    /// The browser view requires something to show; without a screenshot
    /// the request is ignored. Returns `true` if the view changed.
    pub fn select_view(&mut self, view: ViewMode) -> bool {
        if view == ViewMode::Browser && !self.snapshot.screenshot.is_present() {
            return false;
        }
        if self.view == view {
            return false;
        }
        self.view = view;
        self.dirty.computer = true;
        true
    }

    // ========================================================================
    // Rendering Bookkeeping
    // ========================================================================

    /// Adds a message to the transcript.
    ///
    /// This sets the dirty flag so the UI will re-render.
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
        self.dirty.messages = true;
    }

    pub fn tick_throbber(&mut self) {
        self.throbber_frame = (self.throbber_frame + 1) % 4;
        self.dirty.full = true;
    }

    #[must_use]
    pub fn throbber_char(&self) -> char {
        ['⠋', '⠙', '⠹', '⠸'][self.throbber_frame]
    }

    #[must_use]
    pub fn needs_render(&self) -> bool {
        self.dirty.any()
    }

    pub fn mark_rendered(&mut self) {
        self.dirty.clear();
    }

    pub fn mark_full_redraw(&mut self) {
        self.dirty.full = true;
    }
}
