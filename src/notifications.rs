//! Periodic scanning for due task notifications
//!
//! Tasks move through a small state machine: unarmed → armed ([`NotificationScanner::arm`]) → fired (which clears them back to unarmed). \
//! The scan is a coarse, periodic poll (once per minute by default, see [`crate::config::SCAN_INTERVAL`]): an alert can lag its target timestamp by up to one interval. This is an accepted approximation, not a precise timer.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::task::JoinHandle;

use crate::error::Error;
use crate::store::TodoStore;
use crate::task::Task;
use crate::traits::TodoSource;

/// A notification that just fired, ready to be rendered by the front-end
#[derive(Clone, Debug)]
pub struct Alert {
    pub task_id: String,
    pub title: String,
    /// The timestamp the task was armed with (which may be slightly in the past by now)
    pub due: DateTime<Local>,
}

/// See [`alert_channel`]
pub type AlertSender = tokio::sync::mpsc::UnboundedSender<Alert>;
/// See [`alert_channel`]
pub type AlertReceiver = tokio::sync::mpsc::UnboundedReceiver<Alert>;

/// Create an alert channel. The receiving end belongs to whatever renders user-visible notifications
pub fn alert_channel() -> (AlertSender, AlertReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// Arms, disarms and periodically scans the task index for due notifications.
///
/// The store is shared behind a mutex: the scanner only holds the lock for the duration of one synchronous scan, never across an await point, so it cannot stall the rest of the application.
pub struct NotificationScanner<S: TodoSource> {
    store: Arc<Mutex<TodoStore<S>>>,
    alerts: AlertSender,
    interval: Duration,
}

impl<S: TodoSource> NotificationScanner<S> {
    /// Create a scanner using the configured scan interval
    pub fn new(store: Arc<Mutex<TodoStore<S>>>, alerts: AlertSender) -> Self {
        Self::new_with_interval(store, alerts, crate::config::scan_interval())
    }

    pub fn new_with_interval(store: Arc<Mutex<TodoStore<S>>>, alerts: AlertSender, interval: Duration) -> Self {
        Self { store, alerts, interval }
    }

    /// Arm a task: it will fire once, as soon as a scan runs after `time_of_day` on the task's day
    pub fn arm(&self, date_key: &str, id: &str, time_of_day: &str) -> Result<DateTime<Local>, Error> {
        let when = self.store.lock().unwrap().set_notification(date_key, id, time_of_day)?;
        log::info!("Armed task {} for {}", id, when);
        Ok(when)
    }

    /// Disarm a task, wherever it is filed
    pub fn disarm(&self, id: &str) {
        self.store.lock().unwrap().clear_notification(id);
    }

    /// Run a single scan: every task whose timestamp has passed is disarmed and emitted as an [`Alert`].
    ///
    /// Returns how many alerts fired.
    pub fn scan_once(&self, now: DateTime<Local>) -> usize {
        let due: Vec<Task> = self.store.lock().unwrap().take_due_notifications(now);

        for task in &due {
            // take_due_notifications only returns armed tasks, so the timestamp is always there
            let when = task.notification().cloned().unwrap_or(now);
            log::info!("Notification fired for {:?} (due {})", task.title(), when);
            let _ = self.alerts.send(Alert {
                task_id: task.id().to_string(),
                title: task.title().to_string(),
                due: when,
            });
        }
        due.len()
    }

    /// Spawn the recurring scan.
    ///
    /// The first scan runs immediately, then one per interval. The returned handle must be kept alive: dropping it tears the timer down.
    pub fn start(self) -> ScannerHandle
    where
        S: 'static,
    {
        let (shutdown, mut shutdown_signal) = tokio::sync::watch::channel(false);
        let interval = self.interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.scan_once(Local::now());
                    },
                    _ = shutdown_signal.changed() => {
                        log::debug!("Notification scanner is shutting down");
                        break;
                    },
                }
            }
        });

        ScannerHandle { shutdown, task: Some(task) }
    }
}

/// Keeps the recurring scan alive, and guarantees it is torn down.
///
/// Call [`stop`](ScannerHandle::stop) for a cooperative shutdown; merely dropping the handle aborts the scan, so a discarded scanner can never leak its timer.
pub struct ScannerHandle {
    shutdown: tokio::sync::watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl ScannerHandle {
    /// Ask the scan loop to exit, and wait until it has
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for ScannerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
