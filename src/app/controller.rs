//! Chat session controller.
//!
//! The controller owns the [`SessionState`], the backend client, the event
//! channel and every background task. It offers one entry point per
//! mutation source:
//!
//! - [`SessionController::handle_event`] for poll results and query completions
//! - [`SessionController::submit_query`] / [`SessionController::submit_input`]
//! - [`SessionController::stop`]
//! - [`SessionController::toggle_reasoning`] and [`SessionController::select_view`]
//!
//! Network calls run as spawned tasks that report back through
//! [`AppEvent`]s, so every state change happens synchronously inside one of
//! these methods.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::events::AppEvent;
use super::poller::Poller;
use super::state::{SessionState, ViewMode};
use crate::api::BackendClient;
use crate::error::SeekResult;

/// Capacity of the controller's event channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

pub struct SessionController {
    state: SessionState,
    client: BackendClient,
    events_tx: mpsc::Sender<AppEvent>,
    events_rx: mpsc::Receiver<AppEvent>,
    poller: Option<Poller>,
    actions: JoinSet<()>,
}

impl SessionController {
    /// Creates a controller with fresh state. Polling is not started.
    #[must_use]
    pub fn new(client: BackendClient) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: SessionState::new(),
            client,
            events_tx,
            events_rx,
            poller: None,
            actions: JoinSet::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Mutable access for purely local edits (input buffer, scrolling).
    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    /// Starts the poll loop. Calling this twice restarts it; the old tasks
    /// are aborted when the previous poller drops.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SeekError::Config`] for a zero `period`. Any
    /// running poller is left untouched in that case.
    pub fn start_polling(&mut self, period: Duration) -> SeekResult<()> {
        let poller = Poller::spawn(self.client.clone(), period, self.events_tx.clone())?;
        self.poller = Some(poller);
        Ok(())
    }

    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.poller.is_some()
    }

    /// Waits for the next background event.
    ///
    /// Never returns `None` while the controller is alive, since it holds a
    /// sender itself.
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.events_rx.recv().await
    }

    /// Returns an already-queued event without waiting.
    pub fn try_next_event(&mut self) -> Option<AppEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Applies a background event to the session state.
    pub fn handle_event(&mut self, event: AppEvent) {
        debug!(event = event.kind(), "Handling event");
        match event {
            AppEvent::Health { online } => self.state.set_online(online),
            AppEvent::LatestAnswer(payload) => {
                self.state.apply_latest_answer(&payload);
            }
            AppEvent::Screenshot(result) => self.state.apply_screenshot(result),
            AppEvent::QueryFinished(result) => self.state.finish_submit(result),
        }
    }

    /// Submits whatever is in the input buffer.
    ///
    /// The buffer is cleared only once the backend accepts the query.
    pub fn submit_input(&mut self) -> bool {
        let query = self.state.input.clone();
        self.submit_query(&query)
    }

    /// Submits `query` to the backend.
    ///
    /// Blank queries, and queries sent while another is in flight, are
    /// ignored. Otherwise this checks liveness, appends the user message,
    /// marks the session as loading and posts the query in the background.
    /// The outcome arrives later as [`AppEvent::QueryFinished`].
    ///
    /// Returns `true` if a request was issued.
    pub fn submit_query(&mut self, query: &str) -> bool {
        if query.trim().is_empty() || self.state.is_loading() {
            debug!("Ignoring submit: blank query or request in flight");
            return false;
        }

        self.spawn_health_check();

        if !self.state.begin_submit(query) {
            return false;
        }

        let client = self.client.clone();
        let events = self.events_tx.clone();
        let query = query.to_string();
        info!(chars = query.chars().count(), "Submitting query");
        self.actions.spawn(async move {
            let result = client.query(&query).await;
            if events.send(AppEvent::QueryFinished(result)).await.is_err() {
                debug!("Query finished after session teardown");
            }
        });
        true
    }

    /// Asks the backend to stop the running agent.
    ///
    /// Loading and error are cleared right away; a failed stop request is
    /// only logged.
    pub fn stop(&mut self) {
        self.spawn_health_check();
        self.state.begin_stop();

        let client = self.client.clone();
        info!("Requesting stop");
        self.actions.spawn(async move {
            if let Err(e) = client.stop().await {
                warn!(error = %e, "Stop request failed");
            }
        });
    }

    /// Toggles the reasoning panel of message `index`.
    pub fn toggle_reasoning(&mut self, index: usize) {
        self.state.toggle_reasoning(index);
    }

    /// Switches the computer view; see [`SessionState::select_view`].
    pub fn select_view(&mut self, view: ViewMode) -> bool {
        self.state.select_view(view)
    }

    fn spawn_health_check(&mut self) {
        let client = self.client.clone();
        let events = self.events_tx.clone();
        self.actions.spawn(async move {
            let online = client.check_health().await.is_ok();
            if events.send(AppEvent::Health { online }).await.is_err() {
                debug!("Health check finished after session teardown");
            }
        });
    }

    /// Reaps finished action tasks so the set does not grow unbounded.
    pub fn reap_finished(&mut self) {
        while let Some(result) = self.actions.try_join_next() {
            if let Err(e) = result {
                if e.is_panic() {
                    warn!(error = %e, "Background action panicked");
                }
            }
        }
    }

    /// Tears the session down: stops polling, cancels in-flight actions and
    /// releases held screenshot resources.
    ///
    /// Returns the final state for inspection.
    pub async fn shutdown(mut self) -> SessionState {
        if let Some(poller) = self.poller.take() {
            poller.shutdown().await;
        }
        self.actions.abort_all();
        while self.actions.join_next().await.is_some() {}

        self.state.release_resources();
        info!("Session closed");
        self.state
    }
}
