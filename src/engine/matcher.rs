//! Per-message rule evaluation

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::RuleSet;
use crate::rules::pattern::RegexCache;
use crate::rules::{phrase, RuleHit};
use crate::store::RuleStore;

/// Evaluates messages against the store's current rules
pub struct Matcher {
    store: Arc<RuleStore>,
    cache: RegexCache,

    /// Store revision the cache was last pruned against
    seen_revision: AtomicU64,
}

impl Matcher {
    pub fn new(store: Arc<RuleStore>) -> Self {
        let seen_revision = AtomicU64::new(store.revision());
        Self {
            store,
            cache: RegexCache::new(),
            seen_revision,
        }
    }

    pub fn store(&self) -> &Arc<RuleStore> {
        &self.store
    }

    /// Whether the message should be dropped
    pub fn should_ignore(&self, message: &str) -> bool {
        self.find_match(message).is_some()
    }

    /// The first rule that matches the message, phrases before patterns
    pub fn find_match(&self, message: &str) -> Option<RuleHit> {
        self.store.with_rules(|rules| {
            self.prune_cache(rules);
            evaluate(rules, &self.cache, message)
        })
    }

    /// Number of compiled patterns currently cached
    pub fn cached_patterns(&self) -> usize {
        self.cache.len()
    }

    // Called under the store's read lock, so the revision cannot move.
    fn prune_cache(&self, rules: &RuleSet) {
        let revision = self.store.revision();
        if self.seen_revision.swap(revision, Ordering::AcqRel) != revision {
            self.cache
                .retain_current(&rules.regex.patterns, rules.regex.case_sensitive);
        }
    }
}

fn evaluate(rules: &RuleSet, cache: &RegexCache, message: &str) -> Option<RuleHit> {
    if !rules.plugin.enabled || message.is_empty() {
        return None;
    }

    if rules.phrases.enabled {
        let hit = phrase::find_match(
            message,
            &rules.phrases.list,
            rules.phrases.match_mode,
            rules.phrases.case_sensitive,
        );
        if let Some(text) = hit {
            return Some(RuleHit::phrase(text));
        }
    }

    if rules.regex.enabled {
        let hit = cache.find_match(message, &rules.regex.patterns, rules.regex.case_sensitive);
        if let Some(source) = hit {
            return Some(RuleHit::pattern(source));
        }
    }

    None
}
