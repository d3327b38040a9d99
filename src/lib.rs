//! ignore-guard - Phrase and regex block rules for inbound chat messages
//!
//! Decides per message whether it should be dropped before the host bot
//! does anything else with it, and lets authorised actors manage the rules
//! with a small command grammar.
//!
//! # Features
//!
//! - **Phrase rules**: contains, exact, startswith or endswith matching, one
//!   mode for all phrases, optional case folding
//! - **Regex rules**: unanchored matching with a compiled-pattern cache
//! - **Shared rule document**: a TOML file editable by commands and by an
//!   external UI, written atomically after every change
//! - **Permission gate**: whitelist or blacklist of actors for mutating commands
//! - **Audit logging**: JSONL log of drops and commands
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ignore_guard::{CommandHandler, FilterEngine, RuleSet, RuleStore};
//!
//! let mut rules = RuleSet::default();
//! rules.user_control.list = vec!["123".to_string()];
//! let store = Arc::new(RuleStore::in_memory(rules));
//!
//! let commands = CommandHandler::new(store.clone());
//! let reply = commands.handle("/ignore add ad", "123").unwrap();
//! assert!(reply.is_success());
//!
//! let engine = FilterEngine::new(store);
//! assert!(engine.decide("This is an AD", "789").is_drop());
//! assert!(engine.decide("nothing here", "789").is_allow());
//! ```

pub mod audit;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod output;
pub mod rules;
pub mod store;

// Re-exports for convenience
pub use command::{CommandHandler, Reply};
pub use config::{ListType, MatchMode, RuleSet};
pub use engine::{FilterEngine, Matcher};
pub use error::{FilterError, Result};
pub use input::HookInput;
pub use output::{Decision, HookOutput};
pub use rules::permission::AccessPolicy;
pub use store::RuleStore;
