use async_trait::async_trait;

use crate::error::Error;
use crate::task::Task;

/// A remote system of record for tasks.
///
/// This is usually a [`Client`](crate::client::Client) talking to the real server, but integration tests substitute an in-memory implementation so that failures can be injected on demand.
///
/// Every operation issues (at most) one request and performs no retry: retry policy, if any, belongs to the caller.
#[async_trait]
pub trait TodoSource: Send + Sync {
    /// Returns every task, across all dates
    async fn list_all(&self) -> Result<Vec<Task>, Error>;

    /// Returns the tasks due on the given day
    async fn list_by_date(&self, date_key: &str) -> Result<Vec<Task>, Error>;

    /// Returns the tasks whose title matches the keyword (matching semantics are owned by the server)
    async fn search_by_title(&self, keyword: &str) -> Result<Vec<Task>, Error>;

    /// Persist a new task. Returns the stored task, including its server-assigned id
    async fn create(&self, task: &Task) -> Result<Task, Error>;

    /// Delete a task
    async fn remove(&self, id: &str) -> Result<(), Error>;

    /// Set the completion state of a task
    async fn set_completion(&self, id: &str, completed: bool) -> Result<(), Error>;
}
