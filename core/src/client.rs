//! Request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url`. Each endpoint has a `build_*`
//! method producing an `HttpRequest` and a `parse_*` method consuming the
//! matching `HttpResponse`. Parsing checks the status, unwraps the
//! `{status, message, data}` envelope and returns `data`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Envelope, Health, Todo, UpdateTodo};

const JSON_HEADER: (&str, &str) = ("content-type", "application/json");

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn todos_url(&self) -> String {
        format!("{}/api/todos", self.base_url)
    }

    fn todo_url(&self, id: u64) -> String {
        format!("{}/api/todos/{id}", self.base_url)
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        bodiless(HttpMethod::Get, self.todos_url())
    }

    pub fn build_get_todo(&self, id: u64) -> HttpRequest {
        bodiless(HttpMethod::Get, self.todo_url(id))
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        with_json(HttpMethod::Post, self.todos_url(), input)
    }

    pub fn build_update_todo(&self, id: u64, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        with_json(HttpMethod::Put, self.todo_url(id), input)
    }

    pub fn build_delete_todo(&self, id: u64) -> HttpRequest {
        bodiless(HttpMethod::Delete, self.todo_url(id))
    }

    pub fn build_health(&self) -> HttpRequest {
        bodiless(HttpMethod::Get, format!("{}/health", self.base_url))
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        parse_data(&response, 200)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_data(&response, 200)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_data(&response, 201)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_data(&response, 200)
    }

    /// Returns the todo the server removed.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_data(&response, 200)
    }

    pub fn parse_health(&self, response: HttpResponse) -> Result<Health, ApiError> {
        parse_data(&response, 200)
    }
}

fn bodiless(method: HttpMethod, path: String) -> HttpRequest {
    HttpRequest {
        method,
        path,
        headers: Vec::new(),
        body: None,
    }
}

fn with_json<T: Serialize>(
    method: HttpMethod,
    path: String,
    input: &T,
) -> Result<HttpRequest, ApiError> {
    let body =
        serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
    Ok(HttpRequest {
        method,
        path,
        headers: vec![(JSON_HEADER.0.to_string(), JSON_HEADER.1.to_string())],
        body: Some(body),
    })
}

fn parse_data<T: DeserializeOwned>(response: &HttpResponse, expected: u16) -> Result<T, ApiError> {
    check_status(response, expected)?;
    let envelope: Envelope<T> = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    envelope
        .data
        .ok_or_else(|| ApiError::DeserializationError("envelope has no data".to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    let message = serde_json::from_str::<Envelope<serde_json::Value>>(&response.body)
        .map(|envelope| envelope.message)
        .unwrap_or_else(|_| response.body.clone());
    Err(match response.status {
        404 => ApiError::NotFound,
        400 => ApiError::BadRequest(message),
        status => ApiError::HttpError { status, message },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TODO_JSON: &str = r#"{"id":1,"title":"Test","description":"Details","completed":false,"createdAt":"2024-05-01T12:00:00Z"}"#;

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:3000")
    }

    fn success(status: u16, data: &str) -> HttpResponse {
        HttpResponse::new(
            status,
            format!(r#"{{"status":"success","message":"ok","data":{data}}}"#),
        )
    }

    fn failure(status: u16, message: &str) -> HttpResponse {
        HttpResponse::new(
            status,
            format!(r#"{{"status":"error","message":"{message}"}}"#),
        )
    }

    #[test]
    fn build_list_todos_produces_correct_request() {
        let req = client().build_list_todos();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/api/todos");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_get_todo_produces_correct_request() {
        let req = client().build_get_todo(42);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/api/todos/42");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_create_todo_produces_correct_request() {
        let input = CreateTodo {
            title: "Buy milk".to_string(),
            description: "Two litres".to_string(),
            due_date: None,
        };
        let req = client().build_create_todo(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/api/todos");
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"title": "Buy milk", "description": "Two litres"})
        );
    }

    #[test]
    fn build_update_todo_produces_correct_request() {
        let input = UpdateTodo {
            title: Some("Updated".to_string()),
            ..UpdateTodo::default()
        };
        let req = client().build_update_todo(3, &input).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/api/todos/3");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["title"], "Updated");
        assert!(body.get("completed").is_none());
        assert!(body.get("dueDate").is_none());
    }

    #[test]
    fn build_delete_todo_produces_correct_request() {
        let req = client().build_delete_todo(9);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/api/todos/9");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_health_produces_correct_request() {
        let req = client().build_health();
        assert_eq!(req.method.to_string(), "GET");
        assert_eq!(req.path, "http://localhost:3000/health");
    }

    #[test]
    fn parse_list_todos_success() {
        let todos = client()
            .parse_list_todos(success(200, &format!("[{TODO_JSON}]")))
            .unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].title, "Test");
    }

    #[test]
    fn parse_get_todo_not_found() {
        let response = failure(404, "To-do with the given ID not found");
        let err = client().parse_get_todo(response).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_get_todo_bad_request_keeps_message() {
        let response = failure(400, "Invalid to-do ID: abc");
        let err = client().parse_get_todo(response).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Invalid to-do ID: abc"));
    }

    #[test]
    fn parse_create_todo_success() {
        let todo = client().parse_create_todo(success(201, TODO_JSON)).unwrap();
        assert_eq!(todo.id, 1);
        assert_eq!(todo.description, "Details");
    }

    #[test]
    fn parse_create_todo_wrong_status() {
        let response = HttpResponse::new(500, "internal error");
        let err = client().parse_create_todo(response).unwrap_err();
        assert!(
            matches!(err, ApiError::HttpError { status: 500, ref message } if message == "internal error")
        );
    }

    #[test]
    fn parse_create_todo_expects_201() {
        let err = client().parse_create_todo(success(200, TODO_JSON)).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 200, .. }));
    }

    #[test]
    fn parse_update_todo_success() {
        let body = TODO_JSON.replace(r#""completed":false"#, r#""completed":true"#);
        let todo = client().parse_update_todo(success(200, &body)).unwrap();
        assert!(todo.completed);
    }

    #[test]
    fn parse_delete_todo_returns_removed() {
        let todo = client().parse_delete_todo(success(200, TODO_JSON)).unwrap();
        assert_eq!(todo.id, 1);
    }

    #[test]
    fn parse_delete_todo_not_found() {
        let err = client()
            .parse_delete_todo(failure(404, "To-do with the given ID not found"))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_health_success() {
        let health = client()
            .parse_health(success(
                200,
                r#"{"status":"ok","timestamp":"2024-05-01T12:00:00Z","todos":3}"#,
            ))
            .unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.todos, 3);
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TodoClient::new("http://localhost:3000/");
        let req = client.build_list_todos();
        assert_eq!(req.path, "http://localhost:3000/api/todos");
    }

    #[test]
    fn parse_list_todos_bad_json() {
        let err = client()
            .parse_list_todos(HttpResponse::new(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_success_without_data_is_an_error() {
        let response = HttpResponse::new(200, r#"{"status":"success","message":"ok"}"#);
        let err = client().parse_get_todo(response).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
