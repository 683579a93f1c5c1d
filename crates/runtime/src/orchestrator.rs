//! The bounded model/tool round-trip loop.

use crate::conversation::{PendingCycle, Turn};
use crate::model::{Backend, ModelRequest, StopReason, Usage};
use crate::session::Session;
use crate::tools::{ToolCall, ToolHost};
use crate::{Error, Result};
use serde_json::Value;
use std::ops::RangeInclusive;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Answer used when the model produced no text.
pub const FALLBACK_ANSWER: &str = "I couldn't generate a response. Please try rephrasing.";

/// Allowed values for [`LoopConfig::max_round_trips`].
pub const ROUND_TRIP_RANGE: RangeInclusive<u32> = 5..=8;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a marketing analytics agent with tools over \
Marketo, Adobe Analytics, 6sense, Salesforce and PathFactory data. Use the appropriate tools. \
Lead with numbers. Be concise.";

/// Loop limits and prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    /// Tool round trips allowed per question.
    pub max_round_trips: u32,
    /// Committed turns replayed with each question.
    pub window_turns: usize,
    pub system_prompt: String,
    pub max_tokens: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_round_trips: 8,
            window_turns: 10,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: 4096,
        }
    }
}

impl LoopConfig {
    pub fn validate(&self) -> Result<()> {
        if !ROUND_TRIP_RANGE.contains(&self.max_round_trips) {
            return Err(Error::Config(format!(
                "max_round_trips must be between {} and {}, got {}",
                ROUND_TRIP_RANGE.start(),
                ROUND_TRIP_RANGE.end(),
                self.max_round_trips
            )));
        }
        if self.max_tokens == 0 {
            return Err(Error::Config("max_tokens must be positive".into()));
        }
        Ok(())
    }
}

/// How a cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The model answered.
    Completed,
    /// The model still wanted tools after the last allowed round trip.
    IterationLimitExceeded,
    /// The model stopped for another reason; the answer may be partial.
    Incomplete(StopReason),
}

/// The payload of a successful tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub tool_name: String,
    pub payload: Value,
}

/// Outcome of one answered question.
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestrationResult {
    /// Never empty.
    pub final_answer: String,
    /// Names of every executed tool call, in order.
    pub tool_calls_made: Vec<String>,
    /// The most recent successful tool result, if any.
    pub last_tool: Option<ToolOutput>,
    pub elapsed: Duration,
    pub termination: Termination,
    pub round_trips: u32,
    pub usage: Usage,
}

/// Drives one question at a time through a backend and a tool host.
pub struct Orchestrator<B, H> {
    backend: B,
    host: H,
    config: LoopConfig,
}

impl<B: Backend, H: ToolHost> Orchestrator<B, H> {
    pub fn new(backend: B, host: H, config: LoopConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            backend,
            host,
            config,
        })
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// The system prompt for the session's next question.
    pub fn system_prompt(&self, session: &Session) -> String {
        match session.context_note() {
            Some(note) => format!("{}\n\nContext: {note}", self.config.system_prompt),
            None => self.config.system_prompt.clone(),
        }
    }

    /// Answer `question`, committing the cycle to the session on success.
    ///
    /// On error nothing is committed and the session is left as it was.
    pub async fn run(&self, session: &mut Session, question: &str) -> Result<OrchestrationResult> {
        let started = Instant::now();
        let system = self.system_prompt(session);
        let tools = self.host.registry().list();
        let history = session.conversation().window(self.config.window_turns);
        info!(session = %session.id, history = history.len(), "answering question");

        let mut cycle = PendingCycle::new(question);
        let mut tool_calls_made = Vec::new();
        let mut last_tool = None;
        let mut usage = Usage::default();
        let mut round_trips = 0;

        let (text, termination) = loop {
            let request = ModelRequest {
                system: Some(system.as_str()),
                history,
                cycle: cycle.turns(),
                tools,
                max_tokens: self.config.max_tokens,
            };
            let response = self.backend.call(request).await?;
            usage.accumulate(response.usage);
            debug!(
                round_trip = round_trips,
                stop_reason = %response.stop_reason,
                "model responded"
            );

            let calls: Vec<ToolCall> = response.tool_calls().into_iter().cloned().collect();
            let text = response.text();
            match response.stop_reason {
                StopReason::ToolUse if !calls.is_empty() => {
                    if round_trips == self.config.max_round_trips {
                        warn!(
                            limit = self.config.max_round_trips,
                            pending = calls.len(),
                            "round trip limit reached"
                        );
                        break (text, Termination::IterationLimitExceeded);
                    }
                    round_trips += 1;

                    let mut results = Vec::with_capacity(calls.len());
                    for call in &calls {
                        debug!(tool = %call.name, id = %call.id, "executing tool");
                        let result = self.host.execute(call).await;
                        tool_calls_made.push(call.name.clone());
                        if !result.is_error {
                            last_tool = Some(ToolOutput {
                                tool_name: call.name.clone(),
                                payload: result.payload.clone(),
                            });
                        }
                        results.push(result);
                    }
                    cycle.push(Turn::Assistant {
                        parts: response.parts,
                    });
                    cycle.push(Turn::ToolResults { results });
                }
                StopReason::ToolUse | StopReason::EndTurn => break (text, Termination::Completed),
                other => break (text, Termination::Incomplete(other)),
            }
        };

        let final_answer = if text.trim().is_empty() {
            FALLBACK_ANSWER.to_string()
        } else {
            text
        };
        cycle.push(Turn::assistant_text(&final_answer));
        session.conversation_mut().commit(cycle)?;
        session.set_context(question, tool_calls_made.last().map(String::as_str));

        let elapsed = started.elapsed();
        session.stats_mut().record(&tool_calls_made, elapsed);
        info!(
            session = %session.id,
            round_trips,
            tools = ?tool_calls_made,
            termination = ?termination,
            "question answered"
        );

        Ok(OrchestrationResult {
            final_answer,
            tool_calls_made,
            last_tool,
            elapsed,
            termination,
            round_trips,
            usage,
        })
    }
}
