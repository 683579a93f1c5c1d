//! Tool host trait.

use super::{ToolCall, ToolRegistry, ToolResult};
use std::future::Future;

/// Trait for tool execution hosts.
///
/// This is the boundary between the orchestration loop and side effects.
/// `execute` cannot fail: every problem is reported as an error
/// [`ToolResult`] so one bad call never aborts a multi-tool turn.
pub trait ToolHost: Send + Sync {
    /// The tools exposed to the model.
    fn registry(&self) -> &ToolRegistry;

    /// Resolve one tool call.
    fn execute(&self, call: &ToolCall) -> impl Future<Output = ToolResult> + Send;
}
