//! seekterm - Terminal client for a locally hosted AgenticSeek backend
//!
//! The session controller polls the backend for liveness, answers and
//! screenshots, reconciles them into a local transcript, and forwards user
//! queries and stop requests. This library exposes the core types for
//! testing and embedding.

pub mod api;
pub mod app;
pub mod error;
pub mod screenshot;
pub mod tui;
pub mod types;
pub mod util;

// Re-export core types for convenient access
pub use error::{SeekError, SeekResult};
pub use types::{AnswerPayload, Config, Message, MessageKind, ResponseSnapshot, ToolBlock};
