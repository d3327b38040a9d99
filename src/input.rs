//! Input parsing for the hook driver
//!
//! One JSON object per line on stdin, as forwarded by the host runtime.

use serde::Deserialize;

use crate::config::deserialize_actor_id;
use crate::engine::preview;

/// An inbound chat message
#[derive(Debug, Clone, Deserialize)]
pub struct HookInput {
    /// Plain text of the message
    pub message: String,

    /// Sender identity; numbers are accepted and rendered as text
    #[serde(default, deserialize_with = "deserialize_actor_id")]
    pub actor_id: String,

    /// Optional chat/session identifier, carried into the audit log
    #[serde(default)]
    pub session_id: Option<String>,
}

impl HookInput {
    /// Parse input from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Get a summary of the input for logging
    pub fn summary(&self) -> String {
        preview(&self.message)
    }
}
