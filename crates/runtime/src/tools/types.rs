//! Tool-related types.

use super::ToolError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Correlation token supplied by the model.
    pub id: String,
    pub name: String,
    /// Arguments as produced by the model; not guaranteed to match the schema.
    pub input: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input,
        }
    }
}

/// The result handed back to the model for one tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the tool call this result answers.
    pub invocation_id: String,
    pub payload: Value,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful result.
    pub fn success(invocation_id: impl Into<String>, payload: Value) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            payload,
            is_error: false,
        }
    }

    /// Create an error result with an empty `data` set and a message.
    pub fn error(invocation_id: impl Into<String>, error: &ToolError) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            payload: json!({ "data": [], "message": error.to_string() }),
            is_error: true,
        }
    }

    /// The error message, if this is an error result.
    pub fn message(&self) -> Option<&str> {
        if !self.is_error {
            return None;
        }
        self.payload.get("message").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_result_carries_empty_data() {
        let result = ToolResult::error("call_1", &ToolError::NotFound("get_weather".into()));
        assert!(result.is_error);
        assert_eq!(result.invocation_id, "call_1");
        assert_eq!(result.payload["data"], json!([]));
        assert_eq!(result.message(), Some("tool not found: get_weather"));
    }

    #[test]
    fn success_result_has_no_message() {
        let result = ToolResult::success("call_2", json!({ "data": [{ "a": 1 }] }));
        assert!(!result.is_error);
        assert_eq!(result.message(), None);
    }

    #[test]
    fn is_error_omitted_when_false() {
        let result = ToolResult::success("x", json!({}));
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("is_error").is_none());
    }
}
