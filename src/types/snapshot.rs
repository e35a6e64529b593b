//! Backend-reported agent state.
//!
//! [`AnswerPayload`] is the JSON body returned by both `GET /latest_answer`
//! and `POST /query`. [`ResponseSnapshot`] is the client's copy of the most
//! recent payload, merged with [`ResponseSnapshot::merge`].
//!
//! The backend is loose with types: every field may be missing or `null`,
//! and booleans sometimes arrive as the strings `"true"`/`"false"`. The
//! payload types absorb all of that so the rest of the crate only sees
//! plain values.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::screenshot::ScreenshotSlot;

/// Output of a single tool execution, authored by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolBlock {
    /// Tool that ran (e.g. `python`, `bash`, `web_search`).
    #[serde(default, deserialize_with = "string_or_null")]
    pub tool_type: String,

    /// Body of the block: the code or command that was executed.
    #[serde(default, deserialize_with = "string_or_null")]
    pub block: String,

    /// Execution feedback (stdout, error output).
    #[serde(default, deserialize_with = "string_or_null")]
    pub feedback: String,

    #[serde(default, deserialize_with = "loose_bool")]
    pub success: bool,
}

/// Wire shape of `/latest_answer` and `/query` responses.
///
/// # Examples
///
/// ```
/// use seekterm::types::snapshot::AnswerPayload;
///
/// let payload: AnswerPayload = serde_json::from_str(
///     r#"{"answer": "Hi", "done": "true", "uid": "7", "blocks": null}"#,
/// ).unwrap();
///
/// assert!(payload.done);
/// assert_eq!(payload.uid, "7");
/// assert!(payload.blocks.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerPayload {
    #[serde(default, deserialize_with = "string_or_null")]
    pub answer: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub reasoning: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub agent_name: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub status: String,
    #[serde(default, deserialize_with = "id_or_null")]
    pub uid: String,
    #[serde(default)]
    pub blocks: Option<BTreeMap<String, ToolBlock>>,
    #[serde(default, deserialize_with = "loose_bool")]
    pub done: bool,
}

impl AnswerPayload {
    /// Returns `true` when the payload carries a non-blank answer.
    #[must_use]
    pub fn has_answer(&self) -> bool {
        !self.answer.trim().is_empty()
    }
}

/// Latest backend-reported state, as seen by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseSnapshot {
    pub blocks: BTreeMap<String, ToolBlock>,
    pub done: bool,
    pub answer: String,
    pub agent_name: String,
    pub status: String,
    pub id: String,

    /// Current screenshot; written only by the screenshot path.
    pub screenshot: ScreenshotSlot,

    /// Render key bumped whenever `screenshot` changes.
    pub screenshot_timestamp: u64,
}

impl ResponseSnapshot {
    /// Applies `payload` to the snapshot.
    ///
    /// Every answer field is overwritten. `blocks` keeps its previous value
    /// when the payload has none (missing, `null` or an empty map), so the
    /// editor view doesn't go blank between agent steps. Screenshot fields
    /// are untouched.
    pub fn merge(&mut self, payload: &AnswerPayload) {
        if let Some(blocks) = payload.blocks.as_ref().filter(|blocks| !blocks.is_empty()) {
            self.blocks = blocks.clone();
        }
        self.done = payload.done;
        self.answer = payload.answer.clone();
        self.agent_name = payload.agent_name.clone();
        self.status = payload.status.clone();
        self.id = payload.uid.clone();
    }
}

// ============================================================================
// Lenient deserializers
// ============================================================================

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseId {
    Text(String),
    Number(serde_json::Number),
}

/// Accepts `"abc"`, `123` or `null` for identifier fields.
fn id_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<LooseId>::deserialize(deserializer)? {
        Some(LooseId::Text(text)) => text,
        Some(LooseId::Number(number)) => number.to_string(),
        None => String::new(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseBool {
    Bool(bool),
    Text(String),
}

/// Accepts `true`, `"true"` (any case), `false`, `"false"` or `null`.
fn loose_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<LooseBool>::deserialize(deserializer)? {
        Some(LooseBool::Bool(value)) => value,
        Some(LooseBool::Text(text)) => text.trim().eq_ignore_ascii_case("true"),
        None => false,
    })
}
