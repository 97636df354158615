//! Todo record and the request payloads that create or patch it.
//!
//! JSON field names are camelCase (`dueDate`, `createdAt`) to match the wire
//! format existing clients and data files already use.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/todos`.
///
/// Every field is optional at the serde level so that a missing title or
/// description surfaces as a validation error from the store rather than
/// as an extractor rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
}

/// Body of `PUT /api/todos/{id}`. Only the fields present in the JSON are
/// applied.
///
/// `completed` keeps the raw JSON value so it can be coerced with
/// [`truthy`]. `due_date` distinguishes an absent key (`None`) from an
/// explicit `null` (`Some(None)`), which clears the date.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub completed: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<String>>,
}

/// Wraps any value that is present in the input, `null` included.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// JSON truthiness: `false`, `null`, `0` and `""` are false, everything
/// else is true.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Todo {
        Todo {
            id: 7,
            title: "Test".to_string(),
            description: "Details".to_string(),
            completed: false,
            due_date: None,
            created_at: DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn todo_serializes_with_camel_case_fields() {
        let todo = sample();
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["title"], "Test");
        assert_eq!(json["completed"], false);
        let created_at: DateTime<Utc> = json["createdAt"].as_str().unwrap().parse().unwrap();
        assert_eq!(created_at, todo.created_at);
        assert!(json.get("dueDate").is_none());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn todo_reads_javascript_iso_timestamps() {
        let raw = r#"{"id":1,"title":"a","description":"b","completed":true,
            "dueDate":"2024-06-01","createdAt":"2024-05-01T12:00:00.123Z"}"#;
        let todo: Todo = serde_json::from_str(raw).unwrap();
        assert_eq!(todo.due_date.as_deref(), Some("2024-06-01"));
        assert!(todo.completed);
    }

    #[test]
    fn todo_accepts_null_due_date() {
        let raw = r#"{"id":1,"title":"a","description":"b","completed":false,
            "dueDate":null,"createdAt":"2024-05-01T12:00:00Z"}"#;
        let todo: Todo = serde_json::from_str(raw).unwrap();
        assert!(todo.due_date.is_none());
    }

    #[test]
    fn create_todo_tolerates_missing_fields() {
        let input: CreateTodo = serde_json::from_str(r#"{"title":"Only title"}"#).unwrap();
        assert_eq!(input.title.as_deref(), Some("Only title"));
        assert!(input.description.is_none());
        assert!(input.due_date.is_none());
    }

    #[test]
    fn create_todo_rejects_wrong_types() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"title":42}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_todo_all_fields_optional() {
        let input: UpdateTodo = serde_json::from_str("{}").unwrap();
        assert!(input.title.is_none());
        assert!(input.description.is_none());
        assert!(input.completed.is_none());
        assert!(input.due_date.is_none());
    }

    #[test]
    fn update_todo_distinguishes_null_due_date_from_absent() {
        let cleared: UpdateTodo = serde_json::from_str(r#"{"dueDate":null}"#).unwrap();
        assert_eq!(cleared.due_date, Some(None));

        let set: UpdateTodo = serde_json::from_str(r#"{"dueDate":"2025-01-01"}"#).unwrap();
        assert_eq!(set.due_date, Some(Some("2025-01-01".to_string())));
    }

    #[test]
    fn update_todo_keeps_raw_completed_value() {
        let input: UpdateTodo = serde_json::from_str(r#"{"completed":null}"#).unwrap();
        assert_eq!(input.completed, Some(Value::Null));

        let input: UpdateTodo = serde_json::from_str(r#"{"completed":"yes"}"#).unwrap();
        assert_eq!(input.completed, Some(json!("yes")));
    }

    #[test]
    fn truthy_follows_json_truthiness() {
        assert!(truthy(&json!(true)));
        assert!(truthy(&json!(1)));
        assert!(truthy(&json!("false")));
        assert!(truthy(&json!([])));
        assert!(truthy(&json!({})));

        assert!(!truthy(&json!(false)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!(0.0)));
        assert!(!truthy(&json!("")));
        assert!(!truthy(&Value::Null));
    }
}
