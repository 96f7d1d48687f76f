//! This module provides a client to connect to the to-do server

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use url::Url;

use crate::error::Error;
use crate::task::Task;
use crate::traits::TodoSource;

/// A [`TodoSource`] that fetches its data from the remote HTTP API (the `/api/todos` family of endpoints)
#[derive(Clone, Debug)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    /// Create a client. This does not start a connection
    pub fn new<S: AsRef<str>>(base_url: S) -> Result<Self, Error> {
        let base_url = Url::parse(base_url.as_ref())?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    /// Create a client against the configured default base URL (see [`crate::config`])
    pub fn new_from_config() -> Result<Self, Error> {
        let url = crate::config::API_BASE_URL.lock().unwrap().clone();
        Self::new(url)
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url
    }

    /// Send a request, and make sure the server accepted it.
    ///
    /// Any transport error or non-success status is logged, then collapsed into a generic [`Error::RequestFailed`] that only names the operation: the server does not expose error codes a user could act on.
    async fn execute(&self, operation: &'static str, request: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        let response = request.send().await
            .map_err(|err| {
                log::error!("Transport error during {}: {}", operation, err);
                Error::request_failed(operation)
            })?;

        let status = response.status();
        if status.is_success() == false {
            log::error!("The {} request was rejected by the server (HTTP {})", operation, status);
            return Err(Error::request_failed(operation));
        }

        log::debug!("{} returned HTTP {}", operation, status);
        Ok(response)
    }

    async fn fetch_tasks(&self, operation: &'static str, url: Url) -> Result<Vec<Task>, Error> {
        let response = self.execute(operation, self.http.get(url)).await?;
        response.json().await
            .map_err(|err| {
                log::error!("Unable to parse the {} response: {}", operation, err);
                Error::request_failed(operation)
            })
    }
}

#[async_trait]
impl TodoSource for Client {
    async fn list_all(&self) -> Result<Vec<Task>, Error> {
        self.fetch_tasks("list all", self.endpoint("/api/todos")).await
    }

    async fn list_by_date(&self, date_key: &str) -> Result<Vec<Task>, Error> {
        let url = self.endpoint(&format!("/api/todos/date/{}", date_key));
        self.fetch_tasks("list by date", url).await
    }

    async fn search_by_title(&self, keyword: &str) -> Result<Vec<Task>, Error> {
        let mut url = self.endpoint("/api/todos/search");
        url.query_pairs_mut().append_pair("keyword", keyword);
        self.fetch_tasks("search", url).await
    }

    async fn create(&self, task: &Task) -> Result<Task, Error> {
        // The server assigns the id, so the temporary local one is not sent
        let body = json!({
            "title": task.title(),
            "description": task.description(),
            "completed": task.completed(),
            "dueDate": task.due_date(),
        });

        let request = self.http.post(self.endpoint("/api/todos")).json(&body);
        let response = self.execute("create", request).await?;
        response.json().await
            .map_err(|err| {
                log::error!("Unable to parse the create response: {}", err);
                Error::request_failed("create")
            })
    }

    async fn remove(&self, id: &str) -> Result<(), Error> {
        let url = self.endpoint(&format!("/api/todos/{}", id));
        self.execute("delete", self.http.delete(url)).await?;
        Ok(())
    }

    async fn set_completion(&self, id: &str, completed: bool) -> Result<(), Error> {
        let url = self.endpoint(&format!("/api/todos/{}/completed", id));
        let request = self.http.request(Method::PATCH, url)
            .json(&json!({ "completed": completed }));
        self.execute("set completion", request).await?;
        Ok(())
    }
}
