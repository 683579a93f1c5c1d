//! Conversation turn log with a bounded replay window and atomic commits.

use crate::model::Part;
use crate::tools::{ToolCall, ToolResult};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One entry in the conversation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Turn {
    User { text: String },
    /// The model's response: text and tool calls, in the order produced.
    Assistant { parts: Vec<Part> },
    /// Results for the calls of the preceding assistant turn.
    ToolResults { results: Vec<ToolResult> },
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self::User { text: text.into() }
    }

    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self::Assistant {
            parts: vec![Part::text(text)],
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Self::User { .. })
    }

    /// Tool calls carried by an assistant turn.
    pub fn tool_calls(&self) -> impl Iterator<Item = &ToolCall> {
        let parts = match self {
            Self::Assistant { parts } => parts.as_slice(),
            _ => &[],
        };
        parts.iter().filter_map(|part| match part {
            Part::ToolCall(call) => Some(call),
            Part::Text { .. } => None,
        })
    }
}

/// Reasons a pending cycle cannot be committed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConversationError {
    #[error("cycle is empty")]
    EmptyCycle,
    #[error("cycle must start with a user turn")]
    MissingUserTurn,
    #[error("cycle must end with a text-only assistant turn")]
    MissingAnswer,
    #[error("unexpected {found} turn at position {index}")]
    UnexpectedTurn { index: usize, found: &'static str },
    #[error("tool results at position {index} do not answer the preceding calls")]
    MismatchedResults { index: usize },
    #[error("tool calls at position {index} have no results")]
    UnansweredCalls { index: usize },
}

/// Turns of one question being answered. Owned by the loop until commit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingCycle {
    turns: Vec<Turn>,
}

impl PendingCycle {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::user(question)],
        }
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    fn validate(&self) -> Result<(), ConversationError> {
        let turns = &self.turns;
        let (first, last) = match (turns.first(), turns.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(ConversationError::EmptyCycle),
        };
        if !first.is_user() {
            return Err(ConversationError::MissingUserTurn);
        }
        let answered = matches!(last, Turn::Assistant { .. }) && last.tool_calls().next().is_none();
        if turns.len() < 2 || !answered {
            return Err(ConversationError::MissingAnswer);
        }

        for (index, turn) in turns.iter().enumerate().skip(1) {
            let previous = &turns[index - 1];
            match turn {
                Turn::User { .. } => {
                    return Err(ConversationError::UnexpectedTurn {
                        index,
                        found: "user",
                    });
                }
                Turn::Assistant { .. } => {
                    if previous.tool_calls().next().is_some() {
                        return Err(ConversationError::UnansweredCalls { index: index - 1 });
                    }
                    if matches!(previous, Turn::Assistant { .. }) {
                        return Err(ConversationError::UnexpectedTurn {
                            index,
                            found: "assistant",
                        });
                    }
                }
                Turn::ToolResults { results } => {
                    let calls: Vec<&str> = previous.tool_calls().map(|c| c.id.as_str()).collect();
                    let ids: Vec<&str> = results.iter().map(|r| r.invocation_id.as_str()).collect();
                    if calls.is_empty() || calls != ids {
                        return Err(ConversationError::MismatchedResults { index });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Committed conversation for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    turns: Vec<Turn>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent turns to replay, at most `max_turns` of them.
    ///
    /// The window always starts at a user turn so a replayed tool result or
    /// answer never appears without its question.
    pub fn window(&self, max_turns: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(max_turns);
        let tail = &self.turns[start..];
        match tail.iter().position(Turn::is_user) {
            Some(offset) => &tail[offset..],
            None => &[],
        }
    }

    /// Append every turn of `cycle`, or nothing if it is malformed.
    pub fn commit(&mut self, cycle: PendingCycle) -> Result<(), ConversationError> {
        cycle.validate()?;
        self.turns.extend(cycle.turns);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
