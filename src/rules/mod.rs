//! Matching primitives for ignore-guard
//!
//! Phrase comparison, regex compilation and caching, and the permission
//! policy that gates rule management.

pub mod pattern;
pub mod permission;
pub mod phrase;

use std::fmt;

/// Which rule list an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Phrase,
    Pattern,
}

impl RuleKind {
    pub fn label(&self) -> &'static str {
        match self {
            RuleKind::Phrase => "phrase",
            RuleKind::Pattern => "pattern",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The rule that caused a message to be dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleHit {
    pub kind: RuleKind,

    /// Phrase text or pattern source as stored
    pub rule: String,
}

impl RuleHit {
    pub fn phrase(text: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Phrase,
            rule: text.into(),
        }
    }

    pub fn pattern(source: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Pattern,
            rule: source.into(),
        }
    }
}

impl fmt::Display for RuleHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.rule)
    }
}
