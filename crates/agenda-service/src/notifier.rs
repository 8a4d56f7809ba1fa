//! Periodic "starting soon" scanner.
//!
//! The notifier owns the set of already-notified event ids for one session
//! and runs [`scan`] against the latest event snapshot on every tick.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use agenda_core::config::NotifierConfig;
use agenda_core::error::CoreError;
use agenda_core::types::{Event, EventId};
use agenda_rules::{Notification, scan};
use chrono::NaiveDateTime;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::ServiceResult;

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

pub struct Notifier<C> {
    clock: C,
    period: Duration,
    events: watch::Receiver<Arc<Vec<Event>>>,
    notified: HashSet<EventId>,
}

impl<C: Clock> Notifier<C> {
    /// ## Summary
    /// Creates a notifier that scans the snapshots published on `events`.
    ///
    /// ## Errors
    /// Returns `CoreError::ConfigError` if the configured tick is zero.
    pub fn new(
        clock: C,
        config: &NotifierConfig,
        events: watch::Receiver<Arc<Vec<Event>>>,
    ) -> ServiceResult<Self> {
        if config.tick_millis == 0 {
            return Err(CoreError::ConfigError(
                "notifier tick must be greater than zero".to_string(),
            )
            .into());
        }

        Ok(Self {
            clock,
            period: config.tick(),
            events,
            notified: HashSet::new(),
        })
    }

    #[must_use]
    pub const fn notified(&self) -> &HashSet<EventId> {
        &self.notified
    }

    /// ## Summary
    /// Runs one scan against the latest snapshot and records the ids that fired.
    pub fn tick(&mut self) -> Vec<Notification> {
        let snapshot = self.events.borrow().clone();
        let outcome = scan(self.clock.now(), &snapshot, &self.notified);
        self.notified = outcome.notified;
        outcome.due
    }

    /// ## Summary
    /// Runs [`Notifier::tick`] on a fixed interval in a background task,
    /// forwarding due notifications to `sink`.
    ///
    /// The task ends when the handle is stopped or dropped, or when `sink` is
    /// closed.
    #[must_use]
    pub fn spawn(mut self, sink: mpsc::Sender<Notification>) -> NotifierHandle {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            tracing::debug!(period_ms = self.period.as_millis(), "Notifier started");

            loop {
                tokio::select! {
                    _ = &mut stop_rx => {
                        tracing::debug!("Notifier stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        for notification in self.tick() {
                            tracing::info!(
                                event_id = %notification.event_id,
                                message = %notification.message(),
                                "Event starting soon"
                            );
                            if sink.send(notification).await.is_err() {
                                tracing::debug!("Notification receiver closed, stopping notifier");
                                return;
                            }
                        }
                    }
                }
            }
        });

        NotifierHandle {
            stop: stop_tx,
            task,
        }
    }
}

/// Teardown hook for a spawned notifier.
pub struct NotifierHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl NotifierHandle {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// ## Summary
    /// Signals the notifier task to stop and waits for it to finish.
    pub async fn stop(self) {
        if self.stop.send(()).is_err() {
            tracing::trace!("Notifier task already finished");
        }
        if let Err(err) = self.task.await {
            tracing::warn!(error = %err, "Notifier task ended abnormally");
        }
    }
}
