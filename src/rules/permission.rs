//! Permission gate for rule management commands

use std::collections::HashSet;
use tracing::warn;

use crate::config::{ListType, UserControlSection};
use crate::error::{FilterError, Result};

/// Who may run mutating commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Only listed actors; an empty set denies everyone
    Whitelist(HashSet<String>),

    /// Everyone but listed actors; an empty set allows everyone
    Blacklist(HashSet<String>),
}

impl AccessPolicy {
    /// Check whether an actor may mutate rules
    ///
    /// Empty identifiers are always denied.
    pub fn is_allowed(&self, actor: &str) -> bool {
        if actor.is_empty() {
            return false;
        }

        match self {
            AccessPolicy::Whitelist(actors) => actors.contains(actor),
            AccessPolicy::Blacklist(actors) => !actors.contains(actor),
        }
    }

    /// Like `is_allowed`, but as an error for `?` chains
    pub fn authorize(&self, actor: &str) -> Result<()> {
        if self.is_allowed(actor) {
            Ok(())
        } else {
            Err(FilterError::PermissionDenied {
                actor: actor.to_string(),
            })
        }
    }
}

impl From<&UserControlSection> for AccessPolicy {
    fn from(section: &UserControlSection) -> Self {
        let actors: HashSet<String> = section.list.iter().cloned().collect();
        match &section.list_type {
            ListType::Whitelist => AccessPolicy::Whitelist(actors),
            ListType::Blacklist => AccessPolicy::Blacklist(actors),
            ListType::Unrecognised(raw) => {
                warn!(list_type = %raw, "unrecognised list_type, denying all rule changes");
                AccessPolicy::Whitelist(HashSet::new())
            }
        }
    }
}
