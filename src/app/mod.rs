//! Application core

use anyhow::{bail, Context, Result};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Write};
use std::time::Duration;
use tokio::time::interval;
use tracing::info;

pub mod controller;
pub mod events;
pub mod poller;
pub mod state;

use controller::SessionController;
use state::ViewMode;

use crate::api::BackendClient;
use crate::tui;
use crate::types::{AnswerPayload, Config};

/// Lines moved per PageUp/PageDown.
const SCROLL_STEP: usize = 10;

/// Runs the interactive terminal session until the user quits.
pub async fn run(config: Config) -> Result<()> {
    let client = BackendClient::from_config(&config);
    info!(backend = client.base_url(), "Starting session");

    let mut controller = SessionController::new(client);
    controller.start_polling(config.poll_interval)?;

    if let Some(prompt) = config.initial_prompt.as_deref() {
        let state = controller.state_mut();
        state.input = prompt.to_string();
        state.cursor_end();
        controller.submit_input();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut controller).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    controller.shutdown().await;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    controller: &mut SessionController,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut throbber_interval = interval(Duration::from_millis(250));

    loop {
        if controller.state().needs_render() {
            let mut info = tui::RenderInfo::default();
            terminal.draw(|frame| info = tui::render(frame, controller.state()))?;
            let state = controller.state_mut();
            state.clamp_scroll(info.max_scroll);
            state.mark_rendered();
        }

        tokio::select! {
            biased;

            Some(Ok(event)) = events.next() => {
                match event {
                    Event::Key(key) if key.kind != KeyEventKind::Release => {
                        if handle_key(controller, key) == KeyOutcome::Quit {
                            break;
                        }
                    }
                    Event::Resize(_, _) => controller.state_mut().mark_full_redraw(),
                    _ => {}
                }
            }

            Some(event) = controller.next_event() => {
                controller.handle_event(event);
                controller.reap_finished();
            }

            _ = throbber_interval.tick(), if controller.state().is_loading() => {
                controller.state_mut().tick_throbber();
            }
        }
    }

    Ok(())
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

/// Maps a key press to a controller action.
pub fn handle_key(controller: &mut SessionController, key: KeyEvent) -> KeyOutcome {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c' | 'd'), KeyModifiers::CONTROL) => return KeyOutcome::Quit,

        (KeyCode::Enter, KeyModifiers::NONE) => {
            controller.submit_input();
        }
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => controller.stop(),

        (KeyCode::Char('r'), KeyModifiers::CONTROL) => {
            controller.state_mut().toggle_selected_reasoning();
        }
        (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
            controller.select_view(ViewMode::Editor);
        }
        (KeyCode::Char('b'), KeyModifiers::CONTROL) => {
            controller.select_view(ViewMode::Browser);
        }

        (KeyCode::Up, KeyModifiers::ALT) => controller.state_mut().select_previous(),
        (KeyCode::Down, KeyModifiers::ALT) => controller.state_mut().select_next(),
        (KeyCode::Esc, _) => controller.state_mut().clear_selection(),

        (KeyCode::PageUp, _) => controller.state_mut().scroll_up(SCROLL_STEP),
        (KeyCode::PageDown, _) => controller.state_mut().scroll_down(SCROLL_STEP),

        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
            controller.state_mut().insert_char(c);
        }
        (KeyCode::Backspace, _) => controller.state_mut().delete_char(),
        (KeyCode::Left, _) => controller.state_mut().cursor_left(),
        (KeyCode::Right, _) => controller.state_mut().cursor_right(),
        (KeyCode::Home, _) => controller.state_mut().cursor_home(),
        (KeyCode::End, _) => controller.state_mut().cursor_end(),

        _ => {}
    }
    KeyOutcome::Continue
}

/// Headless mode: submits the configured prompt, prints the answer, exits.
pub async fn run_print(config: &Config) -> Result<()> {
    let prompt = config
        .initial_prompt
        .as_deref()
        .filter(|prompt| !prompt.trim().is_empty())
        .context("Print mode requires a non-empty prompt")?;

    let client = BackendClient::from_config(config);
    client
        .check_health()
        .await
        .with_context(|| format!("Backend at {} is offline", client.base_url()))?;

    let payload = client
        .query(prompt)
        .await
        .context("Failed to process query")?;

    if !payload.has_answer() {
        bail!("Backend returned an empty answer");
    }

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", format_answer(&payload, config.show_reasoning))?;
    Ok(())
}

/// Formats an answer for print mode, optionally preceded by its reasoning.
#[must_use]
pub fn format_answer(payload: &AnswerPayload, show_reasoning: bool) -> String {
    let reasoning = payload.reasoning.trim();
    if show_reasoning && !reasoning.is_empty() {
        format!("[reasoning]\n{reasoning}\n\n{}", payload.answer.trim_end())
    } else {
        payload.answer.trim_end().to_string()
    }
}
