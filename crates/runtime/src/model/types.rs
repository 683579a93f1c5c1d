use super::errors::ModelError;
use crate::conversation::Turn;
use crate::tools::{ToolCall, ToolSpec};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

/// A part of a model response: text or a tool invocation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    Text { text: String },
    ToolCall(ToolCall),
}

impl Part {
    /// Create a text part.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text { text: s.into() }
    }
}

/// Why the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StopReason {
    /// Natural end of response.
    #[default]
    EndTurn,
    /// Model wants tool results before continuing.
    ToolUse,
    /// Hit the response size limit.
    MaxTokens,
    /// Hit a configured stop sequence.
    StopSequence,
    /// Anything else (forward compatibility).
    Other(String),
}

impl StopReason {
    /// Parse the provider's stop reason string.
    pub fn from_api(s: &str) -> Self {
        match s {
            "end_turn" => Self::EndTurn,
            "tool_use" => Self::ToolUse,
            "max_tokens" => Self::MaxTokens,
            "stop_sequence" => Self::StopSequence,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::EndTurn => "end_turn",
            Self::ToolUse => "tool_use",
            Self::MaxTokens => "max_tokens",
            Self::StopSequence => "stop_sequence",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token usage statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl Usage {
    pub fn total_tokens(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }

    /// Add another round trip's usage to this one.
    pub fn accumulate(&mut self, other: Usage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

/// Everything needed for a model request.
///
/// The turns sent are `history` (the committed window) followed by
/// `cycle` (the turns of the question being answered).
#[derive(Debug, Clone, Copy)]
pub struct ModelRequest<'a> {
    pub system: Option<&'a str>,
    pub history: &'a [Turn],
    pub cycle: &'a [Turn],
    pub tools: &'a [ToolSpec],
    /// Response size limit in tokens.
    pub max_tokens: u32,
}

impl<'a> ModelRequest<'a> {
    /// All turns in submission order.
    pub fn turns(&self) -> impl Iterator<Item = &'a Turn> + 'a {
        self.history.iter().chain(self.cycle.iter())
    }
}

/// The response from a model.
#[derive(Debug, Clone, Default)]
pub struct ModelResponse {
    pub parts: Vec<Part>,
    pub stop_reason: StopReason,
    pub usage: Usage,
}

impl ModelResponse {
    /// Combined text content from all text parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Text { text } => Some(text.as_str()),
                Part::ToolCall(_) => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// Tool calls in request order.
    pub fn tool_calls(&self) -> Vec<&ToolCall> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::ToolCall(call) => Some(call),
                Part::Text { .. } => None,
            })
            .collect()
    }
}

/// Trait for model provider backends.
pub trait Backend: Send + Sync {
    fn call(
        &self,
        request: ModelRequest<'_>,
    ) -> impl Future<Output = Result<ModelResponse, ModelError>> + Send;
}
