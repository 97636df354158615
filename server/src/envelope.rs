//! The `{status, message, data?}` wrapper every endpoint responds with.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: Status,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_carries_data() {
        let value = serde_json::to_value(Envelope::success("ok", vec![1, 2])).unwrap();
        assert_eq!(value, json!({"status": "success", "message": "ok", "data": [1, 2]}));
    }

    #[test]
    fn error_omits_data() {
        let value = serde_json::to_value(Envelope::error("nope")).unwrap();
        assert_eq!(value, json!({"status": "error", "message": "nope"}));
    }
}
