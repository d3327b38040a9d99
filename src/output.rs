//! Output formatting for the hook driver
//!
//! One JSON object per input line: a filter decision or a command reply.

use serde::Serialize;

use crate::command::Reply;
use crate::rules::RuleHit;

/// Main output structure
#[derive(Debug, Default, Serialize)]
pub struct HookOutput {
    /// "allow" or "drop" for filtered messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<String>,

    /// Rule that caused a drop, as `kind:rule`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<String>,

    /// Reply text for management commands
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,

    /// Input that could not be processed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Filter decision for one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Message continues to downstream processing
    Allow,

    /// Message is silently suppressed
    Drop { matched: RuleHit },
}

impl Decision {
    /// Create a drop decision
    pub fn drop(matched: RuleHit) -> Self {
        Decision::Drop { matched }
    }

    /// Check if this is an allow decision
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Check if this is a drop decision
    pub fn is_drop(&self) -> bool {
        matches!(self, Decision::Drop { .. })
    }

    /// Get the matching rule if applicable
    pub fn matched(&self) -> Option<&RuleHit> {
        match self {
            Decision::Allow => None,
            Decision::Drop { matched } => Some(matched),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Drop { .. } => "drop",
        }
    }
}

impl HookOutput {
    /// Create output from a Decision
    pub fn from_decision(decision: &Decision) -> Self {
        HookOutput {
            decision: Some(decision.as_str().to_string()),
            matched: decision.matched().map(|hit| hit.to_string()),
            ..Default::default()
        }
    }

    /// Create output from a command reply
    pub fn from_reply(reply: &Reply) -> Self {
        HookOutput {
            reply: Some(reply.to_string()),
            success: Some(reply.is_success()),
            ..Default::default()
        }
    }

    /// Input that could not be parsed still lets the message through
    pub fn invalid_input(error: impl Into<String>) -> Self {
        HookOutput {
            decision: Some(Decision::Allow.as_str().to_string()),
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
