//! To-do tasks

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single to-do item, as stored by the server and displayed on one calendar day.
///
/// The wire format uses camelCase names (`dueDate`). The `notification` field never travels: arming a notification is a local-only decision, and it is lost when the application restarts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// The server-assigned identifier. Tasks that have not been created remotely yet carry a temporary `pending-` id instead
    id: String,

    /// The display text. Never empty
    title: String,

    /// Derived text shown in list views: the trimmed title followed by the time-of-day
    #[serde(default)]
    description: String,

    /// Whether this task is done. Toggled independently of every other field
    completed: bool,

    /// The `HH:MM` time-of-day displayed next to the title. Informational; the notification timestamp is armed separately
    #[serde(default)]
    time: String,

    /// The day this task is filed under, as a canonical date key
    due_date: String,

    /// When set, an alert fires exactly once as soon as the wall clock passes this instant
    #[serde(skip)]
    notification: Option<DateTime<Local>>,
}

impl Task {
    /// Create a brand new task that is not on the server yet.
    ///
    /// It carries a temporary local id; the server assigns the real one when the task is created remotely.
    pub fn new(title: String, time: String, due_date: String) -> Self {
        let description = format!("{} {}", title.trim(), time);
        Self {
            id: format!("pending-{}", Uuid::new_v4().to_hyphenated()),
            title,
            description,
            completed: false,
            time,
            due_date,
            notification: None,
        }
    }

    pub fn id(&self) -> &str           { &self.id          }
    pub fn title(&self) -> &str        { &self.title       }
    pub fn description(&self) -> &str  { &self.description }
    pub fn completed(&self) -> bool    { self.completed    }
    pub fn time(&self) -> &str         { &self.time        }
    pub fn due_date(&self) -> &str     { &self.due_date    }
    pub fn notification(&self) -> Option<&DateTime<Local>> { self.notification.as_ref() }

    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    /// Flip the completion state, returning the new value
    pub fn toggle_completed(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }

    /// Arm this task: it will fire once the wall clock passes `when`
    pub fn arm(&mut self, when: DateTime<Local>) {
        self.notification = Some(when);
    }

    /// Disarm this task, so that it will not fire (again)
    pub fn disarm(&mut self) {
        self.notification = None;
    }

    /// Re-file this task under another day.
    /// The store uses this to enforce that a task filed under key `K` has `due_date == K`
    pub(crate) fn set_due_date(&mut self, due_date: String) {
        self.due_date = due_date;
    }
}
