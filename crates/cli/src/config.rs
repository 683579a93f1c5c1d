//! Configuration loading from beacon.toml.

use crate::source::Source;
use runtime::{
    AnthropicBackend, DEFAULT_SYSTEM_PROMPT, FixtureSource, HttpSource, LoopConfig, ToolExecutor,
    tools::DEFAULT_TOOL_TIMEOUT,
};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILE: &str = "beacon.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub agent: AgentConfig,
    pub data: DataConfig,
}

/// Model provider settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub name: String,
    /// Anthropic API key. `ANTHROPIC_API_KEY` takes precedence.
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub base_url: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "claude-sonnet-4-20250514".to_string(),
            api_key: None,
            max_tokens: 4096,
            base_url: None,
        }
    }
}

/// Loop limits.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub max_round_trips: u32,
    pub window_turns: usize,
    pub system_prompt: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        let loop_config = LoopConfig::default();
        Self {
            max_round_trips: loop_config.max_round_trips,
            window_turns: loop_config.window_turns,
            system_prompt: None,
        }
    }
}

/// Where tool data comes from.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub mode: DataMode,
    pub live: Option<LiveConfig>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataMode {
    #[default]
    Fixtures,
    Live,
}

/// HTTP data service settings.
#[derive(Debug, Deserialize)]
pub struct LiveConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    15
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Load `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `ANTHROPIC_API_KEY` and `BEACON_MODEL` overrides.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(key) = var("ANTHROPIC_API_KEY").filter(|k| !k.is_empty()) {
            self.model.api_key = Some(key);
        }
        if let Some(model) = var("BEACON_MODEL").filter(|m| !m.is_empty()) {
            self.model.name = model;
        }
    }

    pub fn loop_config(&self) -> Result<LoopConfig, ConfigError> {
        let config = LoopConfig {
            max_round_trips: self.agent.max_round_trips,
            window_turns: self.agent.window_turns,
            system_prompt: self
                .agent
                .system_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            max_tokens: self.model.max_tokens,
        };
        config
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(config)
    }

    pub fn backend(&self) -> Result<AnthropicBackend, ConfigError> {
        let key = self
            .model
            .api_key
            .as_deref()
            .ok_or(ConfigError::MissingApiKey)?;
        let mut builder = AnthropicBackend::builder(key, &self.model.name);
        if let Some(url) = &self.model.base_url {
            builder = builder.base_url(url);
        }
        Ok(builder.build())
    }

    /// Upper bound on one data fetch: `[data.live] timeout_secs` in live
    /// mode, the executor default otherwise.
    pub fn tool_timeout(&self) -> Result<Duration, ConfigError> {
        match (self.data.mode, &self.data.live) {
            (DataMode::Live, Some(live)) if live.timeout_secs == 0 => Err(ConfigError::Invalid(
                "data.live.timeout_secs must be at least 1".into(),
            )),
            (DataMode::Live, Some(live)) => Ok(Duration::from_secs(live.timeout_secs)),
            (DataMode::Live, None) => Err(ConfigError::MissingLiveSource),
            (DataMode::Fixtures, _) => Ok(DEFAULT_TOOL_TIMEOUT),
        }
    }

    /// Tool executor over the configured source and timeout.
    pub fn executor(&self) -> Result<ToolExecutor<Source>, ConfigError> {
        Ok(ToolExecutor::new(self.source()?).with_timeout(self.tool_timeout()?))
    }

    pub fn source(&self) -> Result<Source, ConfigError> {
        match self.data.mode {
            DataMode::Fixtures => Ok(Source::Fixtures(FixtureSource)),
            DataMode::Live => {
                let live = self
                    .data
                    .live
                    .as_ref()
                    .ok_or(ConfigError::MissingLiveSource)?;
                let mut builder =
                    HttpSource::builder(&live.base_url).timeout(self.tool_timeout()?);
                if let Some(token) = &live.api_token {
                    builder = builder.api_token(token);
                }
                let source = builder
                    .build()
                    .map_err(|e| ConfigError::Invalid(e.to_string()))?;
                Ok(Source::Live(source))
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("API key not configured: set ANTHROPIC_API_KEY or model.api_key")]
    MissingApiKey,

    #[error("data.mode is \"live\" but no [data.live] section is configured")]
    MissingLiveSource,

    #[error("invalid config: {0}")]
    Invalid(String),
}
