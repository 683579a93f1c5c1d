//! Registry-checked tool execution over a pluggable data source.

use super::{ToolCall, ToolError, ToolHost, ToolRegistry, ToolResult};
use crate::catalog::{self, ToolQuery};
use serde_json::{Map, Value, json};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound on a single data-source fetch.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(15);

/// Where tool data comes from.
pub trait DataSource: Send + Sync {
    /// Fetch the raw payload for a validated query.
    fn fetch(&self, query: &ToolQuery) -> impl Future<Output = Result<Value, ToolError>> + Send;
}

/// [`ToolHost`] that validates calls against the catalog and resolves them
/// through a [`DataSource`].
pub struct ToolExecutor<S> {
    registry: ToolRegistry,
    source: S,
    timeout: Duration,
}

impl<S: DataSource> ToolExecutor<S> {
    /// Executor over the full marketing catalog.
    pub fn new(source: S) -> Self {
        Self::with_registry(catalog::registry(), source)
    }

    /// Executor exposing only the tools in `registry`.
    pub fn with_registry(registry: ToolRegistry, source: S) -> Self {
        Self {
            registry,
            source,
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn resolve(&self, call: &ToolCall) -> Result<Value, ToolError> {
        if !self.registry.contains(&call.name) {
            return Err(ToolError::NotFound(call.name.clone()));
        }
        let query = ToolQuery::decode(&call.name, &call.input)?;
        let raw = tokio::time::timeout(self.timeout, self.source.fetch(&query))
            .await
            .map_err(|_| ToolError::Timeout(self.timeout.as_millis() as u64))??;
        let mut payload = normalize(&call.name, raw)?;
        if let Some((field, value)) = query.entity() {
            bind_entity(&mut payload, field, value);
        }
        Ok(payload)
    }
}

impl<S: DataSource> ToolHost for ToolExecutor<S> {
    fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        match self.resolve(call).await {
            Ok(payload) => {
                debug!(
                    tool = %call.name,
                    rows = payload["row_count"].as_u64().unwrap_or(0),
                    "tool resolved"
                );
                ToolResult::success(&call.id, payload)
            }
            Err(e) => {
                warn!(tool = %call.name, error = %e, "tool call failed");
                ToolResult::error(&call.id, &e)
            }
        }
    }
}

/// Bring a raw payload into the `{"data": [...], "row_count": n}` shape.
fn normalize(tool: &str, raw: Value) -> Result<Value, ToolError> {
    let mut object = match raw {
        Value::Null => return Err(ToolError::EmptyResult(tool.to_string())),
        Value::Array(rows) => {
            let mut object = Map::new();
            object.insert("data".into(), Value::Array(rows));
            object
        }
        Value::Object(object) => object,
        other => {
            return Err(ToolError::InvalidPayload(format!(
                "expected object or array, got {other}"
            )));
        }
    };
    if !object.contains_key("row_count") {
        let rows = match object.get("data") {
            Some(Value::Array(rows)) => rows.len(),
            Some(Value::Null) | None => 0,
            Some(_) => 1,
        };
        object.insert("row_count".into(), json!(rows));
    }
    Ok(Value::Object(object))
}

/// Write the requested entity into every `data` row.
fn bind_entity(payload: &mut Value, field: &str, value: &str) {
    match payload.get_mut("data") {
        Some(Value::Array(rows)) => {
            for row in rows.iter_mut().filter_map(Value::as_object_mut) {
                row.insert(field.to_string(), json!(value));
            }
        }
        Some(Value::Object(row)) => {
            row.insert(field.to_string(), json!(value));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FixtureSource;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Source that always fails with the given error.
    struct Failing(ToolError);

    impl DataSource for Failing {
        async fn fetch(&self, _query: &ToolQuery) -> Result<Value, ToolError> {
            Err(self.0.clone())
        }
    }

    /// Source that returns a fixed payload and counts fetches.
    struct Fixed {
        payload: Value,
        fetches: AtomicUsize,
    }

    impl Fixed {
        fn new(payload: Value) -> Self {
            Self {
                payload,
                fetches: AtomicUsize::new(0),
            }
        }
    }

    impl DataSource for Fixed {
        async fn fetch(&self, _query: &ToolQuery) -> Result<Value, ToolError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.payload.clone())
        }
    }

    struct Slow;

    impl DataSource for Slow {
        async fn fetch(&self, _query: &ToolQuery) -> Result<Value, ToolError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(json!({ "data": [] }))
        }
    }

    fn call(name: &str, input: Value) -> ToolCall {
        ToolCall::new("call_1", name, input)
    }

    #[tokio::test]
    async fn unknown_tool_is_soft_error() {
        let executor = ToolExecutor::new(FixtureSource);
        let result = executor.execute(&call("get_weather", json!({}))).await;
        assert!(result.is_error);
        assert_eq!(result.invocation_id, "call_1");
        assert_eq!(result.payload["data"], json!([]));
        assert_eq!(result.message(), Some("tool not found: get_weather"));
    }

    #[tokio::test]
    async fn tool_outside_registry_is_not_found() {
        let registry = ToolRegistry::new([crate::catalog::ToolKind::LeadMetrics.spec()]).unwrap();
        let executor = ToolExecutor::with_registry(registry, FixtureSource);
        let result = executor
            .execute(&call("get_conversion_funnel", json!({})))
            .await;
        assert!(result.is_error);
        assert_eq!(executor.registry().len(), 1);
    }

    #[tokio::test]
    async fn invalid_arguments_skip_the_source() {
        let executor = ToolExecutor::new(Fixed::new(json!({ "data": [] })));
        let result = executor
            .execute(&call("get_account_360_view", json!({ "region": "EMEA" })))
            .await;
        assert!(result.is_error);
        assert!(result.message().unwrap().starts_with("invalid input"));
        assert_eq!(executor.source().fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fixture_payload_gets_row_count() {
        let executor = ToolExecutor::new(FixtureSource);
        let result = executor
            .execute(&call("get_conversion_funnel", json!({})))
            .await;
        assert!(!result.is_error);
        assert_eq!(result.payload["row_count"], 5);
        assert_eq!(result.payload["data"][0]["stage"], "Leads");
    }

    #[tokio::test]
    async fn account_name_bound_regardless_of_template() {
        let executor = ToolExecutor::new(FixtureSource);
        let result = executor
            .execute(&call(
                "get_account_360_view",
                json!({ "account_name": "Acme Corp" }),
            ))
            .await;
        assert!(!result.is_error);
        assert_eq!(result.payload["data"][0]["account_name"], "Acme Corp");
    }

    #[tokio::test]
    async fn brief_segment_bound_into_rows() {
        let executor = ToolExecutor::new(FixtureSource);
        let result = executor
            .execute(&call(
                "generate_campaign_brief",
                json!({
                    "campaign_type": "webinar",
                    "target_segment": "Enterprise",
                    "campaign_objective": "pipeline"
                }),
            ))
            .await;
        assert_eq!(result.payload["data"][0]["target_segment"], "Enterprise");
    }

    #[tokio::test]
    async fn bare_array_is_wrapped() {
        let executor = ToolExecutor::new(Fixed::new(json!([{ "page": "/a" }, { "page": "/b" }])));
        let result = executor.execute(&call("get_pages_to_sunset", json!({}))).await;
        assert_eq!(
            result.payload,
            json!({ "data": [{ "page": "/a" }, { "page": "/b" }], "row_count": 2 })
        );
    }

    #[tokio::test]
    async fn existing_row_count_kept() {
        let executor = ToolExecutor::new(Fixed::new(json!({ "data": [], "row_count": 40 })));
        let result = executor.execute(&call("get_pages_to_sunset", json!({}))).await;
        assert_eq!(result.payload["row_count"], 40);
    }

    #[tokio::test]
    async fn null_and_scalar_payloads_are_soft_errors() {
        let executor = ToolExecutor::new(Fixed::new(Value::Null));
        let result = executor.execute(&call("get_pages_to_sunset", json!({}))).await;
        assert_eq!(
            result.message(),
            Some("no data returned for get_pages_to_sunset")
        );

        let executor = ToolExecutor::new(Fixed::new(json!("oops")));
        let result = executor.execute(&call("get_pages_to_sunset", json!({}))).await;
        assert!(result.message().unwrap().starts_with("invalid payload"));
    }

    #[tokio::test]
    async fn source_failure_is_soft_error() {
        let executor =
            ToolExecutor::new(Failing(ToolError::Unavailable("warehouse offline".into())));
        let result = executor.execute(&call("get_lead_metrics", json!({}))).await;
        assert!(result.is_error);
        assert_eq!(
            result.message(),
            Some("data source unavailable: warehouse offline")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn slow_source_times_out() {
        let executor = ToolExecutor::new(Slow).with_timeout(Duration::from_millis(250));
        let result = executor.execute(&call("get_lead_metrics", json!({}))).await;
        assert_eq!(result.message(), Some("timeout after 250ms"));
    }
}
