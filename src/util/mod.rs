//! Utility functions and helpers

use std::time::{SystemTime, UNIX_EPOCH};

/// Punctuation stripped from the end of an answer before comparison.
const TERMINAL_PUNCTUATION: &[char] = &['.', '!', '?'];

/// Normalizes an answer for duplicate detection.
///
/// Lowercases, collapses whitespace runs to a single space, trims, and
/// strips trailing `.`, `!` and `?`. The result is stable under repeated
/// application.
///
/// # Examples
///
/// ```
/// use seekterm::util::normalize_answer;
///
/// assert_eq!(normalize_answer("  Hello   World.  "), "hello world");
/// assert_eq!(normalize_answer("hello world"), normalize_answer("Hello World!?"));
/// ```
#[must_use]
pub fn normalize_answer(answer: &str) -> String {
    let collapsed = answer
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");

    collapsed
        .trim_end_matches(|c: char| TERMINAL_PUNCTUATION.contains(&c) || c.is_whitespace())
        .to_string()
}

/// Milliseconds since the Unix epoch, or 0 if the clock is before it.
#[must_use]
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

/// Shortens `s` to at most `max_chars` characters, ending with `...` when cut.
#[must_use]
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}
