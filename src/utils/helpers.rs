//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the crate.

/// Canonical form used when comparing answers: trimmed and lowercased
pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// Whether a given answer matches the stored correct answer.
///
/// Comparison ignores case and surrounding whitespace. A missing answer never
/// matches, not even an empty correct answer.
pub fn answers_match(correct: &str, given: Option<&str>) -> bool {
    match given {
        Some(given) => normalize_answer(correct) == normalize_answer(given),
        None => false,
    }
}

/// Truncate text to a maximum number of characters with ellipsis
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
