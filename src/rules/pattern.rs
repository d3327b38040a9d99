//! Regex rule compilation and caching
//!
//! Stored rules are pattern source text only. Compiled matchers live in a
//! cache keyed by pattern text, one table per case setting.

use parking_lot::RwLock;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use tracing::warn;

use crate::error::{FilterError, Result};

/// Compile a pattern with the requested case handling
pub fn compile(pattern: &str, case_sensitive: bool) -> std::result::Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(!case_sensitive)
        .build()
}

/// Check that a pattern can be stored
pub fn validate(pattern: &str) -> Result<()> {
    if pattern.trim().is_empty() {
        return Err(FilterError::Validation("pattern must not be empty".to_string()));
    }

    Regex::new(pattern)
        .map(|_| ())
        .map_err(|e| FilterError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}

/// Compiled regex cache
///
/// One table per case setting. Lookups take a read lock; a miss compiles
/// under the write lock. A `None` entry records a pattern that failed to
/// compile so the warning is emitted once rather than per message.
#[derive(Default)]
pub struct RegexCache {
    sensitive: RwLock<HashMap<String, Option<Regex>>>,
    insensitive: RwLock<HashMap<String, Option<Regex>>>,
}

impl RegexCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, case_sensitive: bool) -> &RwLock<HashMap<String, Option<Regex>>> {
        if case_sensitive {
            &self.sensitive
        } else {
            &self.insensitive
        }
    }

    /// Return the first pattern that matches anywhere in the message
    pub fn find_match<'a>(
        &self,
        message: &str,
        patterns: &'a [String],
        case_sensitive: bool,
    ) -> Option<&'a str> {
        if message.is_empty() {
            return None;
        }

        let table = self.table(case_sensitive);
        for pattern in patterns.iter().filter(|p| !p.is_empty()) {
            let cached = table
                .read()
                .get(pattern)
                .map(|entry| entry.as_ref().map(|r| r.is_match(message)));
            let matched = match cached {
                Some(hit) => hit,
                None => table
                    .write()
                    .entry(pattern.clone())
                    .or_insert_with(|| match compile(pattern, case_sensitive) {
                        Ok(regex) => Some(regex),
                        Err(e) => {
                            warn!(pattern = %pattern, error = %e, "skipping uncompilable pattern");
                            None
                        }
                    })
                    .as_ref()
                    .map(|r| r.is_match(message)),
            };

            if matched == Some(true) {
                return Some(pattern.as_str());
            }
        }

        None
    }

    /// Drop entries for removed patterns or a stale case-sensitivity setting
    pub fn retain_current(&self, patterns: &[String], case_sensitive: bool) {
        self.table(!case_sensitive).write().clear();
        self.table(case_sensitive)
            .write()
            .retain(|pattern, _| patterns.contains(pattern));
    }

    /// Number of cached entries, including failed compilations
    pub fn len(&self) -> usize {
        self.sensitive.read().len() + self.insensitive.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.sensitive.write().clear();
        self.insensitive.write().clear();
    }
}
