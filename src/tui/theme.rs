//! seekterm color theme - slate and signal amber
//!
//! - Dark slate backgrounds
//! - Cyan for agent content
//! - Amber for user content and accents
//!
//! # Usage
//!
//! ```rust,ignore
//! use seekterm::tui::theme::SeekTheme;
//! use ratatui::style::Style;
//!
//! let style = Style::default().fg(SeekTheme::AGENT_TEXT).bg(SeekTheme::BG_PRIMARY);
//! ```

use ratatui::style::{Color, Modifier, Style};

/// seekterm color constants and pre-built styles.
pub struct SeekTheme;

impl SeekTheme {
    // =========================================================================
    // Background Colors
    // =========================================================================

    /// Main background.
    /// Hex: `#11161c`
    pub const BG_PRIMARY: Color = Color::Rgb(17, 22, 28);

    /// Panels and the status bar.
    /// Hex: `#1a222b`
    pub const BG_SECONDARY: Color = Color::Rgb(26, 34, 43);

    /// Tool block background.
    /// Hex: `#1f2933`
    pub const BG_CODE: Color = Color::Rgb(31, 41, 51);

    /// Selected transcript entry.
    /// Hex: `#263340`
    pub const BG_HIGHLIGHT: Color = Color::Rgb(38, 51, 64);

    // =========================================================================
    // Accents
    // =========================================================================

    /// Hex: `#7dd3e0`
    pub const CYAN_BRIGHT: Color = Color::Rgb(125, 211, 224);

    /// Hex: `#4fa8b8`
    pub const CYAN: Color = Color::Rgb(79, 168, 184);

    /// Hex: `#2e5f6a`
    pub const CYAN_DARK: Color = Color::Rgb(46, 95, 106);

    /// Hex: `#f2b85b`
    pub const AMBER_BRIGHT: Color = Color::Rgb(242, 184, 91);

    /// Hex: `#c8913f`
    pub const AMBER: Color = Color::Rgb(200, 145, 63);

    // =========================================================================
    // Semantic Colors
    // =========================================================================

    /// Hex: `#7ccf8a`
    pub const SUCCESS: Color = Color::Rgb(124, 207, 138);

    /// Hex: `#e6b464`
    pub const WARNING: Color = Color::Rgb(230, 180, 100);

    /// Hex: `#d06a6a`
    pub const ERROR: Color = Color::Rgb(208, 106, 106);

    /// Hex: `#6b7885`
    pub const MUTED: Color = Color::Rgb(107, 120, 133);

    // =========================================================================
    // Role and UI Element Colors
    // =========================================================================

    pub const USER_TEXT: Color = Self::AMBER_BRIGHT;
    pub const USER_LABEL: Color = Self::AMBER;
    pub const AGENT_TEXT: Color = Self::CYAN_BRIGHT;
    pub const AGENT_LABEL: Color = Self::CYAN;
    pub const REASONING_TEXT: Color = Self::MUTED;

    pub const BORDER: Color = Self::CYAN_DARK;
    pub const BORDER_FOCUSED: Color = Self::CYAN;
    pub const TOOL_HEADER: Color = Self::AMBER;
    pub const TOOL_CONTENT: Color = Self::CYAN;
    pub const STATUS_BG: Color = Self::BG_SECONDARY;
    pub const STATUS_TEXT: Color = Self::CYAN;

    // =========================================================================
    // Pre-built Styles
    // =========================================================================

    #[must_use]
    pub fn user_message() -> Style {
        Style::default().fg(Self::USER_TEXT)
    }

    #[must_use]
    pub fn user_label() -> Style {
        Style::default()
            .fg(Self::USER_LABEL)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn agent_message() -> Style {
        Style::default().fg(Self::AGENT_TEXT)
    }

    #[must_use]
    pub fn agent_label() -> Style {
        Style::default()
            .fg(Self::AGENT_LABEL)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn reasoning() -> Style {
        Style::default()
            .fg(Self::REASONING_TEXT)
            .add_modifier(Modifier::ITALIC)
    }

    #[must_use]
    pub fn tool_header() -> Style {
        Style::default()
            .fg(Self::TOOL_HEADER)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::BORDER_FOCUSED)
    }

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::AMBER)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn muted() -> Style {
        Style::default().fg(Self::MUTED)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    #[must_use]
    pub fn error() -> Style {
        Style::default().fg(Self::ERROR)
    }

    #[must_use]
    pub fn prompt() -> Style {
        Style::default()
            .fg(Self::AMBER)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn status_bar() -> Style {
        Style::default().fg(Self::STATUS_TEXT).bg(Self::STATUS_BG)
    }

    #[must_use]
    pub fn selected() -> Style {
        Style::default().bg(Self::BG_HIGHLIGHT)
    }

    /// Active tab in the computer pane header.
    #[must_use]
    pub fn tab_active() -> Style {
        Style::default()
            .fg(Self::BG_PRIMARY)
            .bg(Self::CYAN)
            .add_modifier(Modifier::BOLD)
    }
}
