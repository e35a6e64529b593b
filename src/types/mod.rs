//! Core type definitions for seekterm.
//!
//! - [`config`] - Application configuration
//! - [`message`] - Transcript messages
//! - [`snapshot`] - Backend answer payloads and the merged response snapshot
//!
//! # Re-exports
//!
//! ```
//! use seekterm::types::{AnswerPayload, Config, Message, MessageKind, ResponseSnapshot, ToolBlock};
//! ```

pub mod config;
pub mod message;
pub mod snapshot;

pub use config::Config;
pub use message::{Message, MessageKind};
pub use snapshot::{AnswerPayload, ResponseSnapshot, ToolBlock};
