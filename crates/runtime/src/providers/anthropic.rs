//! Anthropic Messages API backend.

use crate::conversation::Turn;
use crate::model::{Backend, ModelError, ModelRequest, ModelResponse, Part, StopReason, Usage};
use crate::tools::{ToolCall, ToolResult, ToolSpec};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

// ─────────────────────────────────────────────────────────────────────────────
// API Wire Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ApiTool>,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: &'static str,
    content: ApiContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ApiContent {
    Text(String),
    Blocks(Vec<ApiContentBlock>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ApiContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        is_error: bool,
    },
}

#[derive(Debug, Serialize)]
struct ApiTool {
    name: String,
    description: String,
    input_schema: Value,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ApiResponseBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
    usage: ApiUsage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ApiResponseBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        #[serde(default)]
        input: Value,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend Implementation
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for creating an Anthropic backend.
#[derive(Debug, Clone)]
pub struct AnthropicBackendBuilder {
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicBackendBuilder {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Send requests somewhere other than `api.anthropic.com`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn build(self) -> AnthropicBackend {
        AnthropicBackend {
            client: reqwest::Client::new(),
            api_key: self.api_key,
            model: self.model,
            endpoint: format!("{}/v1/messages", self.base_url.trim_end_matches('/')),
        }
    }
}

/// Anthropic API backend.
pub struct AnthropicBackend {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl AnthropicBackend {
    pub fn builder(
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> AnthropicBackendBuilder {
        AnthropicBackendBuilder::new(api_key, model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn turn_to_api(turn: &Turn) -> ApiMessage {
        match turn {
            Turn::User { text } => ApiMessage {
                role: "user",
                content: ApiContent::Text(text.clone()),
            },
            Turn::Assistant { parts } => {
                // Simple case: single text part
                if let [Part::Text { text }] = parts.as_slice() {
                    return ApiMessage {
                        role: "assistant",
                        content: ApiContent::Text(text.clone()),
                    };
                }
                let blocks = parts
                    .iter()
                    .filter_map(|part| match part {
                        Part::Text { text } if text.is_empty() => None,
                        Part::Text { text } => Some(ApiContentBlock::Text { text: text.clone() }),
                        Part::ToolCall(call) => Some(ApiContentBlock::ToolUse {
                            id: call.id.clone(),
                            name: call.name.clone(),
                            input: call.input.clone(),
                        }),
                    })
                    .collect();
                ApiMessage {
                    role: "assistant",
                    content: ApiContent::Blocks(blocks),
                }
            }
            Turn::ToolResults { results } => ApiMessage {
                role: "user",
                content: ApiContent::Blocks(results.iter().map(Self::result_to_api).collect()),
            },
        }
    }

    fn result_to_api(result: &ToolResult) -> ApiContentBlock {
        ApiContentBlock::ToolResult {
            tool_use_id: result.invocation_id.clone(),
            content: result.payload.to_string(),
            is_error: result.is_error,
        }
    }

    fn tool_to_api(spec: &ToolSpec) -> ApiTool {
        ApiTool {
            name: spec.name.clone(),
            description: spec.description.clone(),
            input_schema: spec.input_schema(),
        }
    }

    fn response_from_api(api: ApiResponse) -> ModelResponse {
        let parts = api
            .content
            .into_iter()
            .filter_map(|block| match block {
                ApiResponseBlock::Text { text } => Some(Part::Text { text }),
                ApiResponseBlock::ToolUse { id, name, input } => {
                    Some(Part::ToolCall(ToolCall::new(id, name, input)))
                }
                ApiResponseBlock::Unknown => None,
            })
            .collect();

        ModelResponse {
            parts,
            stop_reason: api
                .stop_reason
                .as_deref()
                .map(StopReason::from_api)
                .unwrap_or_default(),
            usage: Usage {
                input_tokens: api.usage.input_tokens,
                output_tokens: api.usage.output_tokens,
            },
        }
    }

    async fn error_from_response(response: Response) -> ModelError {
        let status = response.status();
        let retry_after = retry_after(response.headers());
        let body = response.text().await.unwrap_or_default();
        status_error(status, retry_after, &body)
    }
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
        .map(Duration::from_secs)
}

fn status_error(status: StatusCode, retry_after: Option<Duration>, body: &str) -> ModelError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.to_string());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ModelError::Auth(message),
        StatusCode::TOO_MANY_REQUESTS => ModelError::RateLimited { retry_after },
        _ => ModelError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

impl std::fmt::Display for AnthropicBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "anthropic({})", self.model)
    }
}

impl Backend for AnthropicBackend {
    async fn call(&self, request: ModelRequest<'_>) -> Result<ModelResponse, ModelError> {
        let api_request = ApiRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            messages: request.turns().map(Self::turn_to_api).collect(),
            system: request.system,
            tools: request.tools.iter().map(Self::tool_to_api).collect(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .header("accept", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        Ok(Self::response_from_api(api_response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ToolKind;
    use reqwest::header::HeaderValue;
    use serde_json::json;

    #[test]
    fn backend_display() {
        let backend = AnthropicBackend::builder("key", "claude-sonnet-4-20250514").build();
        assert_eq!(backend.to_string(), "anthropic(claude-sonnet-4-20250514)");
    }

    #[test]
    fn base_url_joins_messages_path() {
        let backend = AnthropicBackend::builder("key", "m")
            .base_url("http://localhost:9000/")
            .build();
        assert_eq!(backend.endpoint, "http://localhost:9000/v1/messages");
    }

    #[test]
    fn turns_map_to_wire_messages() {
        let call = ToolCall::new("toolu_1", "get_lead_metrics", json!({ "segment": "DCIO" }));
        let turns = [
            Turn::user("lead metrics"),
            Turn::Assistant {
                parts: vec![Part::text(""), Part::ToolCall(call)],
            },
            Turn::ToolResults {
                results: vec![ToolResult::success("toolu_1", json!({ "data": [] }))],
            },
        ];
        let wire: Vec<Value> = turns
            .iter()
            .map(|t| serde_json::to_value(AnthropicBackend::turn_to_api(t)).unwrap())
            .collect();

        assert_eq!(wire[0], json!({ "role": "user", "content": "lead metrics" }));
        assert_eq!(
            wire[1],
            json!({
                "role": "assistant",
                "content": [{
                    "type": "tool_use",
                    "id": "toolu_1",
                    "name": "get_lead_metrics",
                    "input": { "segment": "DCIO" }
                }]
            })
        );
        assert_eq!(
            wire[2],
            json!({
                "role": "user",
                "content": [{
                    "type": "tool_result",
                    "tool_use_id": "toolu_1",
                    "content": "{\"data\":[]}"
                }]
            })
        );
    }

    #[test]
    fn error_results_flagged() {
        let result = ToolResult::error("toolu_2", &crate::tools::ToolError::Timeout(100));
        let block = serde_json::to_value(AnthropicBackend::result_to_api(&result)).unwrap();
        assert_eq!(block["is_error"], true);
    }

    #[test]
    fn tool_specs_carry_schema() {
        let tool = AnthropicBackend::tool_to_api(&ToolKind::Account360View.spec());
        let tool = serde_json::to_value(tool).unwrap();
        assert_eq!(tool["name"], "get_account_360_view");
        assert_eq!(tool["input_schema"]["required"], json!(["account_name"]));
    }

    #[test]
    fn response_parsing() {
        let api: ApiResponse = serde_json::from_value(json!({
            "content": [
                { "type": "text", "text": "Checking." },
                { "type": "thinking", "thinking": "..." },
                { "type": "tool_use", "id": "toolu_9", "name": "get_conversion_funnel", "input": {} }
            ],
            "stop_reason": "tool_use",
            "usage": { "input_tokens": 12, "output_tokens": 7 }
        }))
        .unwrap();
        let response = AnthropicBackend::response_from_api(api);
        assert_eq!(response.parts.len(), 2);
        assert_eq!(response.stop_reason, StopReason::ToolUse);
        assert_eq!(response.tool_calls()[0].id, "toolu_9");
        assert_eq!(response.usage.total_tokens(), 19);
    }

    #[test]
    fn status_mapping() {
        let body = r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;
        match status_error(StatusCode::UNAUTHORIZED, None, body) {
            ModelError::Auth(message) => assert_eq!(message, "invalid x-api-key"),
            other => panic!("unexpected: {other:?}"),
        }

        let err = status_error(
            StatusCode::TOO_MANY_REQUESTS,
            Some(Duration::from_secs(20)),
            "",
        );
        assert!(err.is_retryable());

        match status_error(StatusCode::INTERNAL_SERVER_ERROR, None, "upstream died") {
            ModelError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "upstream died");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn retry_after_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after(&headers), None);
        headers.insert(RETRY_AFTER, HeaderValue::from_static("15"));
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(15)));
        headers.insert(RETRY_AFTER, HeaderValue::from_static("soon"));
        assert_eq!(retry_after(&headers), None);
    }
}
