use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while resolving a tool call.
///
/// None of these abort an orchestration cycle: the executor turns them into
/// error results that are handed back to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[non_exhaustive]
pub enum ToolError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("duplicate tool name: {0}")]
    DuplicateTool(String),
    #[error("data source rejected credentials: {0}")]
    Unauthorized(String),
    #[error("timeout after {0}ms")]
    Timeout(u64),
    #[error("data source unavailable: {0}")]
    Unavailable(String),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("no data returned for {0}")]
    EmptyResult(String),
}
