//! Tool registry, execution and data sources.

pub mod errors;
mod executor;
mod host;
mod http;
mod registry;
mod types;

pub use errors::ToolError;
pub use executor::{DEFAULT_TOOL_TIMEOUT, DataSource, ToolExecutor};
pub use host::ToolHost;
pub use http::{HttpSource, HttpSourceBuilder};
pub use registry::{ObjectSchema, Param, ParamKind, ToolRegistry, ToolSpec};
pub use types::{ToolCall, ToolResult};
