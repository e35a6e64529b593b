//! Periodic backend polling.
//!
//! Three independent tasks run on the same interval: liveness, latest answer
//! and screenshot. Each task awaits its own call before its next tick, so
//! calls of one kind never pile up, while the three kinds overlap freely.
//! A failure in one task has no effect on the others.
//!
//! All tasks live in one [`JoinSet`]; [`Poller::shutdown`] (or dropping the
//! poller) cancels them together.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::events::AppEvent;
use crate::api::BackendClient;
use crate::error::{SeekError, SeekResult};

pub struct Poller {
    tasks: JoinSet<()>,
}

impl Poller {
    /// Spawns the three poll tasks, reporting into `events`.
    ///
    /// The first tick of each task fires immediately. Tasks exit on their
    /// own once the receiving side of `events` is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SeekError::Config`] if `period` is zero; nothing is spawned.
    pub fn spawn(
        client: BackendClient,
        period: Duration,
        events: mpsc::Sender<AppEvent>,
    ) -> SeekResult<Self> {
        if period.is_zero() {
            return Err(SeekError::config("poll interval must be greater than zero"));
        }

        info!(
            backend = client.base_url(),
            period_ms = period.as_millis() as u64,
            "Starting backend polling"
        );

        let mut tasks = JoinSet::new();
        tasks.spawn(poll_health(client.clone(), period, events.clone()));
        tasks.spawn(poll_latest_answer(client.clone(), period, events.clone()));
        tasks.spawn(poll_screenshot(client, period, events));
        Ok(Self { tasks })
    }

    /// Cancels all poll tasks and waits until they are gone.
    pub async fn shutdown(mut self) {
        self.tasks.abort_all();
        while let Some(result) = self.tasks.join_next().await {
            if let Err(e) = result {
                if e.is_panic() {
                    warn!(error = %e, "Poll task panicked");
                }
            }
        }
        debug!("Backend polling stopped");
    }
}

fn ticker(period: Duration) -> tokio::time::Interval {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

async fn poll_health(client: BackendClient, period: Duration, events: mpsc::Sender<AppEvent>) {
    let mut ticker = ticker(period);
    loop {
        ticker.tick().await;
        let online = match client.check_health().await {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, module = e.module(), "Health check failed");
                false
            }
        };
        if events.send(AppEvent::Health { online }).await.is_err() {
            break;
        }
    }
}

async fn poll_latest_answer(
    client: BackendClient,
    period: Duration,
    events: mpsc::Sender<AppEvent>,
) {
    let mut ticker = ticker(period);
    loop {
        ticker.tick().await;
        match client.latest_answer().await {
            Ok(payload) => {
                if events.send(AppEvent::LatestAnswer(payload)).await.is_err() {
                    break;
                }
            }
            Err(e) if e.is_connectivity() => {
                debug!(error = %e, module = e.module(), "Latest answer unavailable");
                if events.is_closed() {
                    break;
                }
            }
            Err(e) => {
                warn!(error = %e, endpoint = e.endpoint(), "Unreadable latest answer");
                if events.is_closed() {
                    break;
                }
            }
        }
    }
}

async fn poll_screenshot(client: BackendClient, period: Duration, events: mpsc::Sender<AppEvent>) {
    let mut ticker = ticker(period);
    loop {
        ticker.tick().await;
        let result = client.screenshot().await;
        if events.send(AppEvent::Screenshot(result)).await.is_err() {
            break;
        }
    }
}
