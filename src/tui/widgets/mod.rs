//! TUI widgets for seekterm.

pub mod screenshot_view;
pub mod tool_block;

pub use screenshot_view::{PlaceholderWidget, ScreenshotWidget, PLACEHOLDER_TEXT};
pub use tool_block::ToolBlockWidget;
