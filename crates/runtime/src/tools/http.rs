//! HTTP-backed data source for live mode.

use super::{DEFAULT_TOOL_TIMEOUT, DataSource, ToolError};
use crate::catalog::ToolQuery;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct FetchRequest {
    arguments: Value,
}

/// Builder for [`HttpSource`].
#[derive(Debug, Clone)]
pub struct HttpSourceBuilder {
    base_url: String,
    api_token: Option<String>,
    timeout: Duration,
}

impl HttpSourceBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: None,
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<HttpSource, ToolError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ToolError::Unavailable(e.to_string()))?;
        Ok(HttpSource {
            client,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            api_token: self.api_token,
            timeout: self.timeout,
        })
    }
}

/// Data service reached over HTTP.
///
/// Each query is sent as `POST {base_url}/tools/{name}` with the
/// normalised arguments in the body; the response body is the payload.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
    timeout: Duration,
}

impl HttpSource {
    pub fn builder(base_url: impl Into<String>) -> HttpSourceBuilder {
        HttpSourceBuilder::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, tool: &str) -> String {
        format!("{}/tools/{tool}", self.base_url)
    }

    fn transport_error(&self, e: reqwest::Error) -> ToolError {
        if e.is_timeout() {
            ToolError::Timeout(self.timeout.as_millis() as u64)
        } else {
            ToolError::Unavailable(e.to_string())
        }
    }
}

impl DataSource for HttpSource {
    async fn fetch(&self, query: &ToolQuery) -> Result<Value, ToolError> {
        let tool = query.kind().name();
        let mut req = self.client.post(self.endpoint(tool)).json(&FetchRequest {
            arguments: query.arguments(),
        });
        if let Some(token) = &self.api_token {
            req = req.bearer_auth(token);
        }

        let response = req.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, tool));
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        parse_body(tool, &body)
    }
}

fn status_error(status: StatusCode, tool: &str) -> ToolError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ToolError::Unauthorized(format!("{status} for {tool}"))
        }
        StatusCode::NOT_FOUND => ToolError::NotFound(tool.to_string()),
        _ => ToolError::Unavailable(format!("{status} for {tool}")),
    }
}

fn parse_body(tool: &str, body: &str) -> Result<Value, ToolError> {
    if body.trim().is_empty() {
        return Err(ToolError::EmptyResult(tool.to_string()));
    }
    match serde_json::from_str(body) {
        Ok(Value::Null) => Err(ToolError::EmptyResult(tool.to_string())),
        Ok(value) => Ok(value),
        Err(e) => Err(ToolError::InvalidPayload(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoint_strips_trailing_slash() {
        let source = HttpSource::builder("http://data.internal/api/").build().unwrap();
        assert_eq!(source.base_url(), "http://data.internal/api");
        assert_eq!(
            source.endpoint("get_lead_metrics"),
            "http://data.internal/api/tools/get_lead_metrics"
        );
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, "t"),
            ToolError::Unauthorized(_)
        ));
        assert_eq!(
            status_error(StatusCode::NOT_FOUND, "t"),
            ToolError::NotFound("t".into())
        );
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, "t"),
            ToolError::Unavailable(_)
        ));
    }

    #[test]
    fn body_parsing() {
        assert_eq!(parse_body("t", "[1]").unwrap(), json!([1]));
        assert_eq!(parse_body("t", "  "), Err(ToolError::EmptyResult("t".into())));
        assert_eq!(parse_body("t", "null"), Err(ToolError::EmptyResult("t".into())));
        assert!(matches!(
            parse_body("t", "<html>"),
            Err(ToolError::InvalidPayload(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_service_is_unavailable() {
        let source = HttpSource::builder("http://127.0.0.1:1")
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        let query = ToolQuery::decode("get_pages_to_sunset", &json!({})).unwrap();
        let err = source.fetch(&query).await.unwrap_err();
        assert!(matches!(
            err,
            ToolError::Unavailable(_) | ToolError::Timeout(_)
        ));
    }
}
