//! HTTP access to the task backend.
//!
//! [`TaskApi`] is the seam the CLI and TUI talk to. [`HttpTaskApi`] speaks
//! the backend's JSON routes over a blocking client with a request timeout.
//! Nothing is retried.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, COOKIE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::task::{NewTask, Task, TaskList, TaskUpdate};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{context}: HTTP {status}{}", .message.as_deref().map(|m| format!(" - {m}")).unwrap_or_default())]
    Status {
        context: &'static str,
        status: StatusCode,
        message: Option<String>,
    },
    #[error("{context}: unreadable response: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("session cookie is not a valid header value")]
    InvalidCookie,
}

impl ClientError {
    /// True when the server answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// Operations the client consumes from the backend.
pub trait TaskApi {
    fn create_task(&self, task: &NewTask) -> Result<Task, ClientError>;
    fn list_tasks(&self) -> Result<Vec<Task>, ClientError>;
    fn get_task(&self, id: u64) -> Result<Task, ClientError>;
    fn update_task(&self, id: u64, update: &TaskUpdate) -> Result<(), ClientError>;
    fn delete_task(&self, id: u64) -> Result<(), ClientError>;
}

/// Error body the backend sends with 4xx/5xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct HttpTaskApi {
    client: Client,
    base_url: String,
}

impl HttpTaskApi {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie).map_err(|_| ClientError::InvalidCookie)?;
            headers.insert(COOKIE, value);
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .user_agent(concat!("kanban/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpTaskApi {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn a non-2xx response into [`ClientError::Status`].
fn check_status(response: Response, context: &'static str) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .ok()
        .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
        .map(|b| b.error);
    warn!(%status, context, message = message.as_deref().unwrap_or(""), "backend rejected request");
    Err(ClientError::Status {
        context,
        status,
        message,
    })
}

fn read_json<T: DeserializeOwned>(response: Response, context: &'static str) -> Result<T, ClientError> {
    let response = check_status(response, context)?;
    let body = response.text()?;
    serde_json::from_str(&body).map_err(|source| ClientError::Decode { context, source })
}

impl TaskApi for HttpTaskApi {
    fn create_task(&self, task: &NewTask) -> Result<Task, ClientError> {
        debug!(title = %task.title, "POST /add_task");
        let response = self.client.post(self.url("/add_task")).json(task).send()?;
        read_json(response, "Failed to add task")
    }

    fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        debug!("GET /get_tasks");
        let response = self.client.get(self.url("/get_tasks")).send()?;
        let list: TaskList = read_json(response, "Failed to load tasks")?;
        Ok(list.tasks)
    }

    fn get_task(&self, id: u64) -> Result<Task, ClientError> {
        debug!(id, "GET /get_task");
        let response = self.client.get(self.url(&format!("/get_task/{id}"))).send()?;
        read_json(response, "Task not found")
    }

    fn update_task(&self, id: u64, update: &TaskUpdate) -> Result<(), ClientError> {
        debug!(id, "POST /update_task");
        let response = self
            .client
            .post(self.url(&format!("/update_task/{id}")))
            .json(update)
            .send()?;
        check_status(response, "Failed to update task")?;
        Ok(())
    }

    fn delete_task(&self, id: u64) -> Result<(), ClientError> {
        debug!(id, "DELETE /delete_task");
        let response = self
            .client
            .delete(self.url(&format!("/delete_task/{id}")))
            .send()?;
        check_status(response, "Failed to delete task")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Priority, Progress};
    use mockito::{Matcher, Server};

    const TASK_JSON: &str = r#"{
        "id": 4, "title": "API docs", "description": "Write them",
        "story_point": 2, "development_bit_vector": "01000",
        "priority_tag": "low", "progress_tag": "not-started",
        "user": "sam", "created_at": "Friday 01 November, 09:00 AM"
    }"#;

    fn api_for(server: &Server) -> HttpTaskApi {
        let config = Config {
            server_url: server.url(),
            session_cookie: Some("session=xyz".to_string()),
            ..Config::default()
        };
        HttpTaskApi::new(&config).unwrap()
    }

    #[test]
    fn list_tasks_unwraps_collection() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/get_tasks")
            .match_header("cookie", "session=xyz")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!("{{\"tasks\": [{TASK_JSON}]}}"))
            .create();

        let tasks = api_for(&server).list_tasks().unwrap();
        mock.assert();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].user.as_deref(), Some("sam"));
    }

    #[test]
    fn create_task_posts_payload() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/add_task")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "title": "API docs",
                "story_point": 2,
                "development_bit_vector": "01000",
                "priority_tag": "low",
                "progress_tag": "not-started"
            })))
            .with_status(201)
            .with_body(TASK_JSON)
            .create();

        let new_task = NewTask {
            title: "API docs".to_string(),
            description: "Write them".to_string(),
            story_point: 2,
            development_bit_vector: "01000".to_string(),
            priority_tag: Priority::Low,
            progress_tag: Progress::NotStarted,
        };
        let created = api_for(&server).create_task(&new_task).unwrap();
        mock.assert();
        assert_eq!(created.id, 4);
    }

    #[test]
    fn get_task_reports_server_error_message() {
        let mut server = Server::new();
        server
            .mock("GET", "/get_task/99")
            .with_status(404)
            .with_body(r#"{"error": "Task not found"}"#)
            .create();

        let err = api_for(&server).get_task(99).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Task not found: HTTP 404 Not Found - Task not found");
    }

    #[test]
    fn update_and_delete_hit_their_routes() {
        let mut server = Server::new();
        let update_mock = server
            .mock("POST", "/update_task/4")
            .match_body(Matcher::PartialJson(serde_json::json!({"progress_tag": "completed"})))
            .with_status(200)
            .with_body(TASK_JSON)
            .create();
        let delete_mock = server
            .mock("DELETE", "/delete_task/4")
            .with_status(200)
            .with_body(r#"{"tasks": []}"#)
            .create();

        let api = api_for(&server);
        let task: Task = serde_json::from_str(TASK_JSON).unwrap();
        let update = TaskUpdate::from_task(&task).with_progress(Progress::Completed);
        api.update_task(4, &update).unwrap();
        api.delete_task(4).unwrap();
        update_mock.assert();
        delete_mock.assert();
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let mut server = Server::new();
        server
            .mock("GET", "/get_tasks")
            .with_status(200)
            .with_body("<html>login</html>")
            .create();

        let err = api_for(&server).list_tasks().unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
    }

    #[test]
    fn server_error_without_body_has_no_message() {
        let mut server = Server::new();
        server.mock("DELETE", "/delete_task/1").with_status(500).create();

        let err = api_for(&server).delete_task(1).unwrap_err();
        match err {
            ClientError::Status { status, message, .. } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(message, None);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
