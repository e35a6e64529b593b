//! Events sent from background tasks to the session controller.

use crate::error::SeekError;
use crate::types::AnswerPayload;

/// Completion of a background call.
///
/// Tasks never touch session state themselves; they report through this
/// enum and the controller applies the result in one step.
#[derive(Debug)]
pub enum AppEvent {
    /// Result of a liveness check.
    Health { online: bool },

    /// A successfully fetched `/latest_answer` payload.
    ///
    /// Failed fetches are logged by the poller and produce no event.
    LatestAnswer(AnswerPayload),

    /// Result of a screenshot fetch: raw image bytes or the failure.
    Screenshot(Result<Vec<u8>, SeekError>),

    /// Completion of a submitted query. Sent on every exit path.
    QueryFinished(Result<AnswerPayload, SeekError>),
}

impl AppEvent {
    /// Short label used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            AppEvent::Health { .. } => "health",
            AppEvent::LatestAnswer(_) => "latest_answer",
            AppEvent::Screenshot(_) => "screenshot",
            AppEvent::QueryFinished(_) => "query_finished",
        }
    }
}
