//! Shared helpers for integration tests.

#![allow(dead_code)]

use runtime::{
    Backend, DataSource, ModelError, ModelRequest, ModelResponse, Part, StopReason, ToolCall,
    ToolError, ToolQuery, Turn, Usage,
};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// What the backend was asked.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub system: Option<String>,
    pub history: Vec<Turn>,
    pub cycle: Vec<Turn>,
    pub tools: Vec<String>,
}

impl Recorded {
    pub fn turns(&self) -> Vec<Turn> {
        self.history.iter().chain(&self.cycle).cloned().collect()
    }
}

/// Backend that replays a fixed script of responses.
#[derive(Default)]
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<ModelResponse, ModelError>>>,
    requests: Mutex<Vec<Recorded>>,
}

impl ScriptedBackend {
    pub fn new(script: impl IntoIterator<Item = Result<ModelResponse, ModelError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            requests: Mutex::default(),
        }
    }

    pub fn ok(responses: impl IntoIterator<Item = ModelResponse>) -> Self {
        Self::new(responses.into_iter().map(Ok))
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Backend for ScriptedBackend {
    async fn call(&self, request: ModelRequest<'_>) -> Result<ModelResponse, ModelError> {
        self.requests.lock().unwrap().push(Recorded {
            system: request.system.map(str::to_string),
            history: request.history.to_vec(),
            cycle: request.cycle.to_vec(),
            tools: request.tools.iter().map(|t| t.name.clone()).collect(),
        });
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::InvalidResponse("script exhausted".into())))
    }
}

/// Data source that always fails.
pub struct BrokenSource;

impl DataSource for BrokenSource {
    async fn fetch(&self, _query: &ToolQuery) -> Result<Value, ToolError> {
        Err(ToolError::Unavailable("warehouse offline".into()))
    }
}

fn usage() -> Usage {
    Usage {
        input_tokens: 10,
        output_tokens: 5,
    }
}

/// A final text answer.
pub fn answer(text: &str) -> ModelResponse {
    ModelResponse {
        parts: vec![Part::text(text)],
        stop_reason: StopReason::EndTurn,
        usage: usage(),
    }
}

/// A response requesting the given `(id, tool, input)` calls.
pub fn tool_use(calls: &[(&str, &str, Value)]) -> ModelResponse {
    ModelResponse {
        parts: calls
            .iter()
            .map(|(id, name, input)| Part::ToolCall(ToolCall::new(*id, *name, input.clone())))
            .collect(),
        stop_reason: StopReason::ToolUse,
        usage: usage(),
    }
}

/// A single tool request with empty arguments.
pub fn call(id: &str, name: &str) -> ModelResponse {
    tool_use(&[(id, name, serde_json::json!({}))])
}

pub fn stopped(text: &str, stop_reason: StopReason) -> ModelResponse {
    ModelResponse {
        parts: vec![Part::text(text)],
        stop_reason,
        usage: usage(),
    }
}
