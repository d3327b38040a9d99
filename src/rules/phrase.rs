//! Literal phrase matching

use crate::config::MatchMode;

/// Compare a single phrase against a message
///
/// Both sides must already be case-folded when matching is case-insensitive.
pub fn matches(message: &str, phrase: &str, mode: MatchMode) -> bool {
    match mode {
        MatchMode::Contains => message.contains(phrase),
        MatchMode::Exact => message == phrase,
        MatchMode::StartsWith => message.starts_with(phrase),
        MatchMode::EndsWith => message.ends_with(phrase),
    }
}

/// Return the first phrase that matches the message
///
/// Empty phrases are skipped; they can only come from a hand-edited document.
pub fn find_match<'a>(
    message: &str,
    phrases: &'a [String],
    mode: MatchMode,
    case_sensitive: bool,
) -> Option<&'a str> {
    if message.is_empty() {
        return None;
    }

    if case_sensitive {
        return phrases
            .iter()
            .filter(|p| !p.is_empty())
            .find(|p| matches(message, p, mode))
            .map(String::as_str);
    }

    let folded = message.to_lowercase();
    phrases
        .iter()
        .filter(|p| !p.is_empty())
        .find(|p| matches(&folded, &p.to_lowercase(), mode))
        .map(String::as_str)
}
