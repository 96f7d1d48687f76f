//! This module provides the in-memory, date-indexed collection of tasks
//!
//! The remote server stays the system of record; the [`TodoStore`] is what the view layer actually reads, and the single place where mutations happen.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Local};

use crate::error::Error;
use crate::task::Task;
use crate::traits::TodoSource;
use crate::utils;

/// The mapping from date key to the tasks filed under that day, insertion order preserved per day
pub type TaskIndex = HashMap<String, Vec<Task>>;

/// An event describing a change to the task index
#[derive(Clone, Debug)]
pub enum StoreEvent {
    /// Nothing has happened yet
    Pristine,
    /// The whole index has been rebuilt from the server
    Reloaded { task_count: usize },
    /// The tasks filed under one day have changed
    DayChanged { date_key: String },
}

impl Display for StoreEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            StoreEvent::Pristine => write!(f, "Not loaded yet"),
            StoreEvent::Reloaded { task_count } => write!(f, "Reloaded {} tasks from the server", task_count),
            StoreEvent::DayChanged { date_key } => write!(f, "[{}] tasks have changed", date_key),
        }
    }
}

impl Default for StoreEvent {
    fn default() -> Self {
        Self::Pristine
    }
}

/// See [`change_channel`]
pub type ChangeSender = tokio::sync::watch::Sender<StoreEvent>;
/// See [`change_channel`]
pub type ChangeReceiver = tokio::sync::watch::Receiver<StoreEvent>;

/// Create a change channel, that a front-end can subscribe to in order to re-render after every index mutation
pub fn change_channel() -> (ChangeSender, ChangeReceiver) {
    tokio::sync::watch::channel(StoreEvent::default())
}

/// The date-indexed collection of tasks, kept in sync with a remote [`TodoSource`].
///
/// Mutations follow the reconciliation policy of the original application:
/// * `add` is pessimistic (the server assigns the id, so nothing is inserted until the create call succeeds),
/// * `remove` is optimistic, corrected by a full [`refresh`](TodoStore::refresh) when the remote call fails,
/// * `toggle_completion` is optimistic, reverted in place when the remote call fails,
/// * notification arming is local-only and never persisted.
pub struct TodoStore<S: TodoSource> {
    source: S,
    index: TaskIndex,
    feedback_channel: Option<ChangeSender>,
}

impl<S: TodoSource> TodoStore<S> {
    /// Create a store over the given source. The index starts empty; call [`refresh`](TodoStore::refresh) to populate it
    pub fn new(source: S) -> Self {
        Self { source, index: TaskIndex::new(), feedback_channel: None }
    }

    /// Create a store that reports every index change on the given channel
    pub fn new_with_feedback_channel(source: S, channel: ChangeSender) -> Self {
        Self { source, index: TaskIndex::new(), feedback_channel: Some(channel) }
    }

    /// Send an event to the subscriber (if any)
    fn feedback(&self, event: StoreEvent) {
        self.feedback_channel
            .as_ref()
            .map(|sender| sender.send(event));
    }

    /// The current task index
    pub fn index(&self) -> &TaskIndex {
        &self.index
    }

    /// The tasks filed under the given day, in insertion order
    pub fn tasks_for(&self, date_key: &str) -> &[Task] {
        self.index.get(date_key).map(|tasks| tasks.as_slice()).unwrap_or(&[])
    }

    /// Refetch every task from the server and rebuild the index from scratch.
    ///
    /// This discards local-only state (notification arming included): it is the universal failure-recovery path, so it must end up matching the system of record exactly. \
    /// Tasks are regrouped by their own due date, not by however the server happened to order them, and each task is re-filed so that its `due_date` equals the key it sits under.
    pub async fn refresh(&mut self) -> Result<(), Error> {
        let all_tasks = self.source.list_all().await?;
        let task_count = all_tasks.len();

        let mut index = TaskIndex::new();
        for mut task in all_tasks {
            // Servers have been seen storing zero-padded dates and full timestamps in dueDate
            let key = utils::normalize_date_key(task.due_date())
                .unwrap_or_else(|| task.due_date().to_string());
            task.set_due_date(key.clone());
            index.entry(key).or_insert_with(Vec::new).push(task);
        }

        self.index = index;
        log::info!("Reloaded {} tasks from the server", task_count);
        self.feedback(StoreEvent::Reloaded { task_count });
        Ok(())
    }

    /// Persist a new task, then file the stored version (with its server-assigned id) under `date_key`.
    ///
    /// On failure the index is left unchanged: the id is not known until the server answers, so there is nothing sensible to insert optimistically.
    pub async fn add(&mut self, task: Task, date_key: &str) -> Result<(), Error> {
        let mut inserted = self.source.create(&task).await
            .map_err(|err| {
                log::error!("Unable to add {:?}: {}", task.title(), err);
                err
            })?;

        inserted.set_due_date(date_key.to_string());
        self.index.entry(date_key.to_string()).or_insert_with(Vec::new).push(inserted);
        self.feedback(StoreEvent::DayChanged { date_key: date_key.to_string() });
        Ok(())
    }

    /// Remove a task from the given day.
    ///
    /// The local removal happens immediately. If the remote delete then fails, the optimistic removal is not rolled back directly: the whole index is refetched from the system of record instead.
    pub async fn remove(&mut self, date_key: &str, id: &str) -> Result<(), Error> {
        if let Some(tasks) = self.index.get_mut(date_key) {
            tasks.retain(|task| task.id() != id);
        }
        self.feedback(StoreEvent::DayChanged { date_key: date_key.to_string() });

        if let Err(err) = self.source.remove(id).await {
            log::error!("Unable to delete task {}: {}. Reloading everything from the server", id, err);
            if let Err(refresh_err) = self.refresh().await {
                log::error!("Unable to resynchronize after a failed delete: {}", refresh_err);
            }
            return Err(err);
        }
        Ok(())
    }

    /// Flip the completion state of a task, then tell the server about the new value.
    ///
    /// The flip happens immediately. If the remote call then fails, the flip is reverted in place, so the index never stays diverged from the system of record.
    pub async fn toggle_completion(&mut self, date_key: &str, id: &str) -> Result<bool, Error> {
        let new_state = match self.task_mut(date_key, id) {
            None => return Err(Error::UnknownTask { date_key: date_key.to_string(), id: id.to_string() }),
            Some(task) => task.toggle_completed(),
        };
        self.feedback(StoreEvent::DayChanged { date_key: date_key.to_string() });

        if let Err(err) = self.source.set_completion(id, new_state).await {
            log::error!("Unable to update completion of task {}: {}. Reverting", id, err);
            if let Some(task) = self.task_mut(date_key, id) {
                task.set_completed(!new_state);
            }
            self.feedback(StoreEvent::DayChanged { date_key: date_key.to_string() });
            return Err(err);
        }
        Ok(new_state)
    }

    /// Arm a task: combine its day with the given `HH:MM` time-of-day, and record the resulting timestamp.
    ///
    /// This is a local-only mutation; it is not persisted remotely and will not survive a [`refresh`](TodoStore::refresh).
    pub fn set_notification(&mut self, date_key: &str, id: &str, time_of_day: &str) -> Result<DateTime<Local>, Error> {
        let when = utils::local_timestamp(date_key, time_of_day)?;
        match self.task_mut(date_key, id) {
            None => Err(Error::UnknownTask { date_key: date_key.to_string(), id: id.to_string() }),
            Some(task) => {
                task.arm(when);
                self.feedback(StoreEvent::DayChanged { date_key: date_key.to_string() });
                Ok(when)
            }
        }
    }

    /// Disarm a task, searching every day for it: ids are globally unique, and the caller may not know which day currently holds the task
    pub fn clear_notification(&mut self, id: &str) {
        for (date_key, tasks) in self.index.iter_mut() {
            for task in tasks.iter_mut().filter(|task| task.id() == id) {
                task.disarm();
                log::debug!("Disarmed task {} on {}", id, date_key);
            }
        }
    }

    /// Disarm and return every task whose notification timestamp has passed.
    ///
    /// Disarming happens before the caller sees the task, which guarantees at most one firing per arm cycle even if a later scan runs concurrently with alert delivery.
    pub fn take_due_notifications(&mut self, now: DateTime<Local>) -> Vec<Task> {
        let mut due = Vec::new();
        for tasks in self.index.values_mut() {
            for task in tasks.iter_mut() {
                if let Some(when) = task.notification() {
                    if *when <= now {
                        due.push(task.clone());
                        task.disarm();
                    }
                }
            }
        }
        due
    }

    fn task_mut(&mut self, date_key: &str, id: &str) -> Option<&mut Task> {
        self.index.get_mut(date_key)
            .and_then(|tasks| tasks.iter_mut().find(|task| task.id() == id))
    }
}
