//! Per-user session state.

use crate::conversation::ConversationState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Unique session identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Running totals over a session's answered questions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    pub queries: u32,
    pub tools_used: BTreeSet<String>,
    pub total_elapsed: Duration,
}

impl SessionStats {
    pub fn record(&mut self, tools: &[String], elapsed: Duration) {
        self.queries += 1;
        self.tools_used.extend(tools.iter().cloned());
        self.total_elapsed += elapsed;
    }

    /// Mean time per answered question.
    pub fn average_elapsed(&self) -> Duration {
        match self.queries {
            0 => Duration::ZERO,
            n => self.total_elapsed / n,
        }
    }
}

/// A conversation with one user.
///
/// The orchestrator only ever borrows a session mutably, so concurrent
/// cycles on the same session are ruled out by the type system.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub id: SessionId,
    conversation: ConversationState,
    context: Option<String>,
    stats: SessionStats,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }

    pub(crate) fn conversation_mut(&mut self) -> &mut ConversationState {
        &mut self.conversation
    }

    /// One-line summary of the previous exchange, appended to the system
    /// prompt of the next question.
    pub fn context_note(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub(crate) fn set_context(&mut self, question: &str, tool: Option<&str>) {
        self.context = Some(match tool {
            Some(tool) => format!("Last: '{question}' using '{tool}'"),
            None => format!("Last: '{question}'"),
        });
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut SessionStats {
        &mut self.stats
    }

    /// Forget the conversation and context; statistics are kept.
    pub fn reset(&mut self) {
        self.conversation.clear();
        self.context = None;
    }
}
