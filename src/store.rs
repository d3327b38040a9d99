//! Shared rule store
//!
//! Holds the single in-memory [`RuleSet`] behind a lock and keeps it in step
//! with the TOML document on disk. Every mutation is written through before
//! it is reported; a failed write rolls the in-memory state back.

use parking_lot::RwLock;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;
use tracing::{debug, info, warn};

use crate::config::RuleSet;
use crate::error::{FilterError, Result};
use crate::rules::pattern;
use crate::rules::permission::AccessPolicy;

/// What the document looked like when we last read or wrote it
///
/// Two writes within one mtime tick differ only in length, so both are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    modified: SystemTime,
    len: u64,
}

impl Fingerprint {
    fn of(path: &Path) -> Option<Self> {
        let meta = std::fs::metadata(path).ok()?;
        Some(Self {
            modified: meta.modified().ok()?,
            len: meta.len(),
        })
    }
}

struct StoreState {
    rules: RuleSet,
    seen: Option<Fingerprint>,
}

/// The rule store
pub struct RuleStore {
    path: Option<PathBuf>,
    state: RwLock<StoreState>,
    revision: AtomicU64,
}

impl RuleStore {
    /// Open the document at `path`, falling back to defaults
    ///
    /// A missing document is created with defaults. A malformed one is left
    /// on disk untouched and defaults are used in memory.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let rules = if path.exists() {
            match Self::load(&path) {
                Ok(rules) => rules,
                Err(e) => {
                    warn!(error = %e, "using default rules");
                    RuleSet::default()
                }
            }
        } else {
            let rules = RuleSet::default();
            if let Err(e) = write_atomic(&path, &rules) {
                warn!(error = %e, "could not create default rule document");
            }
            rules
        };

        info!(
            path = %path.display(),
            phrases = rules.phrases.list.len(),
            patterns = rules.regex.patterns.len(),
            "rule store opened"
        );

        let seen = Fingerprint::of(&path);
        Self {
            path: Some(path),
            state: RwLock::new(StoreState { rules, seen }),
            revision: AtomicU64::new(0),
        }
    }

    /// A store with no backing document, for embedding and tests
    pub fn in_memory(rules: RuleSet) -> Self {
        Self {
            path: None,
            state: RwLock::new(StoreState { rules, seen: None }),
            revision: AtomicU64::new(0),
        }
    }

    /// Read the persisted document
    pub fn load(path: &Path) -> Result<RuleSet> {
        RuleSet::load_from(path)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Counter bumped on every applied change
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    /// Run `f` against the current rules under the read lock
    pub fn with_rules<R>(&self, f: impl FnOnce(&RuleSet) -> R) -> R {
        let state = self.state.read();
        f(&state.rules)
    }

    /// Copy of the current rules
    pub fn snapshot(&self) -> RuleSet {
        self.with_rules(RuleSet::clone)
    }

    /// Current permission policy
    pub fn access_policy(&self) -> AccessPolicy {
        self.with_rules(|rules| AccessPolicy::from(&rules.user_control))
    }

    pub fn list_phrases(&self) -> Vec<String> {
        self.with_rules(|rules| rules.phrases.list.clone())
    }

    pub fn list_regex(&self) -> Vec<String> {
        self.with_rules(|rules| rules.regex.patterns.clone())
    }

    /// Add a phrase; `false` if it was already present
    pub fn add_phrase(&self, text: &str) -> Result<bool> {
        if text.trim().is_empty() {
            return Err(FilterError::Validation("phrase must not be empty".to_string()));
        }

        self.mutate(|rules| Ok(insert_unique(&mut rules.phrases.list, text)))
    }

    /// Remove a phrase; `false` if it was absent
    pub fn remove_phrase(&self, text: &str) -> Result<bool> {
        self.mutate(|rules| Ok(remove_entry(&mut rules.phrases.list, text)))
    }

    /// Add a regex after checking that it compiles; `false` if already present
    pub fn add_regex(&self, source: &str) -> Result<bool> {
        pattern::validate(source)?;
        self.mutate(|rules| Ok(insert_unique(&mut rules.regex.patterns, source)))
    }

    /// Remove a regex by its exact source text
    pub fn remove_regex(&self, source: &str) -> Result<bool> {
        self.mutate(|rules| Ok(remove_entry(&mut rules.regex.patterns, source)))
    }

    /// Change settings through the same write-through path as rule edits
    ///
    /// The phrase and pattern lists cannot be replaced through this call.
    pub fn update_settings(&self, f: impl FnOnce(&mut RuleSet)) -> Result<bool> {
        self.mutate(|rules| {
            let mut updated = rules.clone();
            f(&mut updated);
            updated.phrases.list = rules.phrases.list.clone();
            updated.regex.patterns = rules.regex.patterns.clone();

            if updated == *rules {
                return Ok(false);
            }
            *rules = updated;
            Ok(true)
        })
    }

    /// Write the current rules to disk
    pub fn save(&self) -> Result<()> {
        let mut state = self.state.write();
        self.persist(&mut state)
    }

    fn persist(&self, state: &mut StoreState) -> Result<()> {
        if let Some(path) = &self.path {
            write_atomic(path, &state.rules)?;
            state.seen = Fingerprint::of(path);
        }
        Ok(())
    }

    /// Re-read the document, picking up edits made outside this process
    ///
    /// On a malformed document the current rules stay in effect.
    pub fn reload(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut state = self.state.write();
        let rules = Self::load(path)?;
        state.seen = Fingerprint::of(path);
        if rules != state.rules {
            state.rules = rules;
            self.revision.fetch_add(1, Ordering::AcqRel);
        }
        Ok(())
    }

    /// Reload only if the document changed since we last touched it
    pub fn refresh_if_changed(&self) -> Result<bool> {
        let Some(path) = &self.path else {
            return Ok(false);
        };

        let current = Fingerprint::of(path);
        if current.is_none() || current == self.state.read().seen {
            return Ok(false);
        }

        self.reload()?;
        Ok(true)
    }

    fn mutate<F>(&self, f: F) -> Result<bool>
    where
        F: FnOnce(&mut RuleSet) -> Result<bool>,
    {
        let mut state = self.state.write();

        if let Some(path) = &self.path {
            let current = Fingerprint::of(path);
            if current.is_some() && current != state.seen {
                match Self::load(path) {
                    Ok(rules) => {
                        debug!(path = %path.display(), "picked up external edit");
                        state.rules = rules;
                        state.seen = current;
                        self.revision.fetch_add(1, Ordering::AcqRel);
                    }
                    Err(e) => warn!(error = %e, "ignoring unreadable external edit"),
                }
            }
        }

        let previous = state.rules.clone();
        if !f(&mut state.rules)? {
            return Ok(false);
        }

        if let Err(e) = self.persist(&mut state) {
            warn!(error = %e, "rolling back rule change");
            state.rules = previous;
            return Err(e);
        }

        self.revision.fetch_add(1, Ordering::AcqRel);
        Ok(true)
    }
}

fn insert_unique(list: &mut Vec<String>, item: &str) -> bool {
    if list.iter().any(|existing| existing == item) {
        return false;
    }
    list.push(item.to_string());
    true
}

fn remove_entry(list: &mut Vec<String>, item: &str) -> bool {
    match list.iter().position(|existing| existing == item) {
        Some(idx) => {
            list.remove(idx);
            true
        }
        None => false,
    }
}

/// Write the document to a sibling temp file and rename it into place
fn write_atomic(path: &Path, rules: &RuleSet) -> Result<()> {
    let fail = |reason: String| FilterError::Persistence {
        path: path.to_path_buf(),
        reason,
    };

    let content = rules.to_toml().map_err(|e| fail(e.to_string()))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|e| fail(e.to_string()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| fail(e.to_string()))?;
    tmp.write_all(content.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| fail(e.to_string()))?;
    tmp.persist(path).map_err(|e| fail(e.error.to_string()))?;

    debug!(path = %path.display(), "rule document saved");
    Ok(())
}
