//! Filter engine for ignore-guard
//!
//! The per-message entry point the host runtime calls.

pub mod matcher;

use std::sync::Arc;
use tracing::{debug, info};

use crate::output::Decision;
use crate::store::RuleStore;

pub use matcher::Matcher;

/// Number of characters of a message shown in logs
pub const PREVIEW_CHARS: usize = 50;

/// The filter pipeline
pub struct FilterEngine {
    matcher: Matcher,
}

impl FilterEngine {
    /// Create an engine reading rules from the given store
    pub fn new(store: Arc<RuleStore>) -> Self {
        Self {
            matcher: Matcher::new(store),
        }
    }

    /// Main entry point: decide whether a message continues downstream
    ///
    /// The actor is only used for logging; permissions never affect filtering.
    pub fn decide(&self, message: &str, actor: &str) -> Decision {
        debug!(actor = %actor, message = %preview(message), "checking message");

        match self.matcher.find_match(message) {
            Some(hit) => {
                if self.log_ignored() {
                    info!(
                        actor = %actor,
                        rule = %hit,
                        message = %preview(message),
                        "dropped message"
                    );
                }
                Decision::drop(hit)
            }
            None => Decision::Allow,
        }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn store(&self) -> &Arc<RuleStore> {
        self.matcher.store()
    }

    fn log_ignored(&self) -> bool {
        self.store().with_rules(|rules| rules.logging.log_ignored)
    }
}

/// Truncate a message for logs on a char boundary
pub fn preview(message: &str) -> String {
    match message.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &message[..idx]),
        None => message.to_string(),
    }
}
