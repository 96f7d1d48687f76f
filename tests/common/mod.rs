//! An in-memory stand-in for the remote to-do server, used by the scenario tests.
//!
//! Its failure injection follows the `(successes, failures)` counter scheme: so that an operation fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use calendar_todo::error::Error;
use calendar_todo::traits::TodoSource;
use calendar_todo::Task;

/// Behaviour tweaks that describe how a mocked server will behave during a given test
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every operation will be allowed
    pub is_suspended: bool,

    pub list_all_behaviour: (u32, u32),
    pub list_by_date_behaviour: (u32, u32),
    pub search_behaviour: (u32, u32),
    pub create_behaviour: (u32, u32),
    pub remove_behaviour: (u32, u32),
    pub set_completion_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// All operations will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            list_all_behaviour: (0, n_fails),
            list_by_date_behaviour: (0, n_fails),
            search_behaviour: (0, n_fails),
            create_behaviour: (0, n_fails),
            remove_behaviour: (0, n_fails),
            set_completion_behaviour: (0, n_fails),
        }
    }

    /// Suspend this mock behaviour until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make this behaviour active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_list_all(&mut self) -> Result<(), Error> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.list_all_behaviour, "list all")
    }
    pub fn can_list_by_date(&mut self) -> Result<(), Error> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.list_by_date_behaviour, "list by date")
    }
    pub fn can_search(&mut self) -> Result<(), Error> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.search_behaviour, "search")
    }
    pub fn can_create(&mut self) -> Result<(), Error> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.create_behaviour, "create")
    }
    pub fn can_remove(&mut self) -> Result<(), Error> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.remove_behaviour, "delete")
    }
    pub fn can_set_completion(&mut self) -> Result<(), Error> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.set_completion_behaviour, "set completion")
    }
}

fn decrement(value: &mut (u32, u32), operation: &'static str) -> Result<(), Error> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 -= 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", operation, value);
        Ok(())
    } else if remaining_failures > 0 {
        value.1 -= 1;
        log::debug!("Mock behaviour: failing a {} ({:?})", operation, value);
        Err(Error::RequestFailed { operation })
    } else {
        log::debug!("Mock behaviour: allowing a {} ({:?})", operation, value);
        Ok(())
    }
}

/// An in-memory server. Clones share the same underlying data, just like clones of a real HTTP client reach the same server
#[derive(Clone, Default)]
pub struct InMemoryServer {
    data: Arc<Mutex<ServerData>>,
}

#[derive(Default)]
struct ServerData {
    tasks: Vec<Task>,
    next_id: u32,
    behaviour: MockBehaviour,
}

impl InMemoryServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_behaviour(&self, behaviour: MockBehaviour) {
        self.data.lock().unwrap().behaviour = behaviour;
    }

    /// Put a task directly into the server, bypassing the client-facing API. Returns the stored task, with its assigned id
    pub fn seed(&self, title: &str, time: &str, due_date: &str) -> Task {
        let template = Task::new(title.to_string(), time.to_string(), due_date.to_string());
        let mut data = self.data.lock().unwrap();
        let task = persist(&template, next_id(&mut data));
        data.tasks.push(task.clone());
        task
    }

    pub fn contains(&self, id: &str) -> bool {
        self.data.lock().unwrap().tasks.iter().any(|task| task.id() == id)
    }

    pub fn task(&self, id: &str) -> Option<Task> {
        self.data.lock().unwrap().tasks.iter().find(|task| task.id() == id).cloned()
    }
}

fn next_id(data: &mut ServerData) -> String {
    data.next_id += 1;
    data.next_id.to_string()
}

/// The id field is private (the library never assigns server ids), so the mock does what the real server does: it answers with a JSON document
fn persist(template: &Task, id: String) -> Task {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": template.title(),
        "description": template.description(),
        "completed": template.completed(),
        "time": template.time(),
        "dueDate": template.due_date(),
    })).unwrap()
}

#[async_trait]
impl TodoSource for InMemoryServer {
    async fn list_all(&self) -> Result<Vec<Task>, Error> {
        let mut data = self.data.lock().unwrap();
        data.behaviour.can_list_all()?;
        Ok(data.tasks.clone())
    }

    async fn list_by_date(&self, date_key: &str) -> Result<Vec<Task>, Error> {
        let mut data = self.data.lock().unwrap();
        data.behaviour.can_list_by_date()?;
        Ok(data.tasks.iter().filter(|task| task.due_date() == date_key).cloned().collect())
    }

    async fn search_by_title(&self, keyword: &str) -> Result<Vec<Task>, Error> {
        let mut data = self.data.lock().unwrap();
        data.behaviour.can_search()?;
        Ok(data.tasks.iter().filter(|task| task.title().contains(keyword)).cloned().collect())
    }

    async fn create(&self, task: &Task) -> Result<Task, Error> {
        let mut data = self.data.lock().unwrap();
        data.behaviour.can_create()?;
        let stored = persist(task, next_id(&mut data));
        data.tasks.push(stored.clone());
        Ok(stored)
    }

    async fn remove(&self, id: &str) -> Result<(), Error> {
        let mut data = self.data.lock().unwrap();
        data.behaviour.can_remove()?;
        let before = data.tasks.len();
        data.tasks.retain(|task| task.id() != id);
        if data.tasks.len() == before {
            return Err(Error::RequestFailed { operation: "delete" });
        }
        Ok(())
    }

    async fn set_completion(&self, id: &str, completed: bool) -> Result<(), Error> {
        let mut data = self.data.lock().unwrap();
        data.behaviour.can_set_completion()?;
        match data.tasks.iter_mut().find(|task| task.id() == id) {
            None => Err(Error::RequestFailed { operation: "set completion" }),
            Some(task) => {
                task.set_completed(completed);
                Ok(())
            },
        }
    }
}
