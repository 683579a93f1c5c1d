//! Beacon runtime: a tool-calling marketing analytics agent.
//!
//! The crate is organised around the cycle of answering one question:
//!
//! - **Session**: explicit per-user state holding the committed
//!   conversation, a context note and usage statistics.
//! - **Orchestrator**: the bounded loop that calls a model [`Backend`],
//!   resolves requested tools through a [`ToolHost`] and commits the whole
//!   cycle atomically.
//! - **ToolExecutor**: validates calls against the catalog and fetches data
//!   from a [`DataSource`], turning every failure into an error result the
//!   model can read.
//! - **Projection**: maps the last successful tool payload to chart
//!   descriptors and a table.
//!
//! # Example
//!
//! ```no_run
//! use runtime::{AnthropicBackend, FixtureSource, LoopConfig, Orchestrator, Session, ToolExecutor};
//!
//! # async fn example() -> runtime::Result<()> {
//! let backend = AnthropicBackend::builder("sk-ant-api03-...", "claude-sonnet-4-20250514").build();
//! let executor = ToolExecutor::new(FixtureSource);
//! let agent = Orchestrator::new(backend, executor, LoopConfig::default())?;
//!
//! let mut session = Session::new();
//! let result = agent.run(&mut session, "Show the conversion funnel").await?;
//! println!("{}", result.final_answer);
//! if let Some(tool) = &result.last_tool {
//!     let projection = runtime::project(&tool.tool_name, &tool.payload);
//!     println!("{} charts", projection.charts.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod conversation;
mod error;
pub mod model;
mod orchestrator;
pub mod projection;
mod providers;
mod session;
pub mod tools;

pub use catalog::{FixtureSource, ToolKind, ToolQuery};
pub use conversation::{ConversationError, ConversationState, PendingCycle, Turn};
pub use error::{Error, Result};
pub use model::{Backend, ModelError, ModelRequest, ModelResponse, Part, StopReason, Usage};
pub use orchestrator::{
    DEFAULT_SYSTEM_PROMPT, FALLBACK_ANSWER, LoopConfig, OrchestrationResult, Orchestrator,
    ROUND_TRIP_RANGE, Termination, ToolOutput,
};
pub use projection::{ChartDescriptor, Projection, Table, follow_ups, project};
pub use providers::{AnthropicBackend, AnthropicBackendBuilder};
pub use session::{Session, SessionId, SessionStats};
pub use tools::{
    DataSource, HttpSource, HttpSourceBuilder, ToolCall, ToolError, ToolExecutor, ToolHost,
    ToolRegistry, ToolResult, ToolSpec,
};
