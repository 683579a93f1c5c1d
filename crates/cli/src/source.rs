//! The data source selected by configuration.

use runtime::{DataSource, FixtureSource, HttpSource, ToolError, ToolQuery};
use serde_json::Value;
use std::fmt;

pub enum Source {
    Fixtures(FixtureSource),
    Live(HttpSource),
}

impl DataSource for Source {
    async fn fetch(&self, query: &ToolQuery) -> Result<Value, ToolError> {
        match self {
            Self::Fixtures(source) => source.fetch(query).await,
            Self::Live(source) => source.fetch(query).await,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixtures(_) => f.write_str("built-in sample data"),
            Self::Live(source) => write!(f, "{}", source.base_url()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixtures_delegate() {
        let source = Source::Fixtures(FixtureSource);
        let query = ToolQuery::decode("get_conversion_funnel", &serde_json::json!({})).unwrap();
        let payload = source.fetch(&query).await.unwrap();
        assert_eq!(payload["data"][0]["stage"], "Leads");
        assert_eq!(source.to_string(), "built-in sample data");
    }
}
