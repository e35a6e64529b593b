//! Transcript message types.
//!
//! The transcript is an append-only sequence of [`Message`] values. Once a
//! message is appended it is never edited; the agent's progress is reflected
//! in the [`ResponseSnapshot`](super::snapshot::ResponseSnapshot) instead.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a transcript entry.
///
/// # Examples
///
/// ```
/// use seekterm::types::message::MessageKind;
///
/// assert_eq!(MessageKind::Agent.to_string(), "agent");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Query typed by the user.
    User,
    /// Answer reported by the backend.
    Agent,
    /// Local failure notice (e.g. a query that never got a response).
    Error,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::User => write!(f, "user"),
            MessageKind::Agent => write!(f, "agent"),
            MessageKind::Error => write!(f, "error"),
        }
    }
}

/// A single transcript entry.
///
/// Only agent messages carry the optional metadata fields; user and error
/// entries leave them as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub kind: MessageKind,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Backend-assigned answer identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Message {
    /// Creates a user message with the raw query text.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(MessageKind::User, content)
    }

    /// Creates an error message.
    #[must_use]
    pub fn error(content: impl Into<String>) -> Self {
        Self::plain(MessageKind::Error, content)
    }

    /// Creates an agent message without metadata.
    ///
    /// Use the `with_*` builders to attach reasoning, agent name, status or id.
    #[must_use]
    pub fn agent(content: impl Into<String>) -> Self {
        Self::plain(MessageKind::Agent, content)
    }

    fn plain(kind: MessageKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            reasoning: None,
            agent_name: None,
            status: None,
            id: None,
        }
    }

    #[must_use]
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    #[must_use]
    pub fn with_agent_name(mut self, agent_name: impl Into<String>) -> Self {
        self.agent_name = Some(agent_name.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn is_agent(&self) -> bool {
        self.kind == MessageKind::Agent
    }

    /// Returns `true` if the message carries non-blank reasoning text.
    #[must_use]
    pub fn has_reasoning(&self) -> bool {
        self.reasoning
            .as_deref()
            .is_some_and(|reasoning| !reasoning.trim().is_empty())
    }
}
