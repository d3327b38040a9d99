//! Rule management commands
//!
//! Parses a command line, gates mutating subcommands on the permission
//! policy, applies the change through the [`RuleStore`] and renders a reply.

pub mod parser;

use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::MatchMode;
use crate::error::FilterError;
use crate::rules::RuleKind;
use crate::store::RuleStore;

pub use parser::{parse, Command};

/// Trigger used when none is configured
pub const DEFAULT_TRIGGER: &str = "/ignore";

/// Result of one command, rendered as the reply text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Help { trigger: String },
    Listing {
        mode: MatchMode,
        phrases: Vec<String>,
        patterns: Vec<String>,
    },
    Added { kind: RuleKind, rule: String },
    AlreadyExists { kind: RuleKind, rule: String },
    Removed { kind: RuleKind, rule: String },
    NotFound { kind: RuleKind, rule: String },
    InvalidPattern { reason: String },
    InvalidInput { reason: String },
    MissingArgument { trigger: String, subcommand: &'static str },
    PermissionDenied,
    Failed { reason: String },
}

impl Reply {
    /// Whether the command did what was asked
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Reply::Help { .. } | Reply::Listing { .. } | Reply::Added { .. } | Reply::Removed { .. }
        )
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Help { trigger } => write!(
                f,
                "Ignore list commands\n\n\
                 {t} list - show all phrases and patterns\n\
                 {t} add <phrase> - block a phrase\n\
                 {t} addr <regex> - block a regular expression\n\
                 {t} del <phrase> - unblock a phrase\n\
                 {t} delr <regex> - unblock a regular expression\n\n\
                 Examples:\n\
                 {t} add advert\n\
                 {t} addr ^/spam.*\n\
                 {t} del promo",
                t = trigger
            ),
            Reply::Listing {
                mode,
                phrases,
                patterns,
            } => {
                writeln!(f, "Current ignore list\n")?;
                writeln!(f, "[phrases] mode: {}", mode.as_str())?;
                write_numbered(f, phrases)?;
                writeln!(f)?;
                writeln!(f, "[regex]")?;
                write_numbered(f, patterns)
            }
            Reply::Added { kind, rule } => write!(f, "Added {}: {}", kind, rule),
            Reply::AlreadyExists { kind, rule } => write!(f, "{} already exists: {}", kind, rule),
            Reply::Removed { kind, rule } => write!(f, "Removed {}: {}", kind, rule),
            Reply::NotFound { kind, rule } => write!(f, "{} not found: {}", kind, rule),
            Reply::InvalidPattern { reason } => write!(f, "Invalid pattern: {}", reason),
            Reply::InvalidInput { reason } => write!(f, "Invalid input: {}", reason),
            Reply::MissingArgument {
                trigger,
                subcommand,
            } => {
                let what = match *subcommand {
                    "addr" | "delr" => "<regex>",
                    _ => "<phrase>",
                };
                write!(
                    f,
                    "Missing argument\nUsage: {} {} {}",
                    trigger, subcommand, what
                )
            }
            Reply::PermissionDenied => {
                write!(f, "You do not have permission to run this command")
            }
            Reply::Failed { reason } => write!(f, "Change not saved: {}", reason),
        }
    }
}

fn write_numbered(f: &mut fmt::Formatter<'_>, items: &[String]) -> fmt::Result {
    if items.is_empty() {
        return writeln!(f, "  (empty)");
    }
    for (i, item) in items.iter().enumerate() {
        writeln!(f, "  {}. {}", i + 1, item)?;
    }
    Ok(())
}

/// Command handler bound to one store and trigger
pub struct CommandHandler {
    store: Arc<RuleStore>,
    trigger: String,
}

impl CommandHandler {
    pub fn new(store: Arc<RuleStore>) -> Self {
        Self::with_trigger(store, DEFAULT_TRIGGER)
    }

    pub fn with_trigger(store: Arc<RuleStore>, trigger: impl Into<String>) -> Self {
        Self {
            store,
            trigger: trigger.into(),
        }
    }

    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// Handle a line if it is addressed to this handler's trigger
    pub fn handle(&self, line: &str, actor: &str) -> Option<Reply> {
        parse(line, &self.trigger).map(|command| self.execute(command, actor))
    }

    /// Run an already parsed command on behalf of `actor`
    pub fn execute(&self, command: Command, actor: &str) -> Reply {
        if command.is_mutating() {
            if let Err(e) = self.store.access_policy().authorize(actor) {
                warn!(actor = %actor, error = %e, "rule change denied");
                return Reply::PermissionDenied;
            }
        }

        match command {
            Command::Help => Reply::Help {
                trigger: self.trigger.clone(),
            },
            Command::List => self.store.with_rules(|rules| Reply::Listing {
                mode: rules.phrases.match_mode,
                phrases: rules.phrases.list.clone(),
                patterns: rules.regex.patterns.clone(),
            }),
            Command::MissingArgument(subcommand) => Reply::MissingArgument {
                trigger: self.trigger.clone(),
                subcommand,
            },
            Command::AddPhrase(text) => {
                let result = self.store.add_phrase(&text);
                self.report(actor, RuleKind::Phrase, text, result, true)
            }
            Command::AddRegex(source) => {
                let result = self.store.add_regex(&source);
                self.report(actor, RuleKind::Pattern, source, result, true)
            }
            Command::RemovePhrase(text) => {
                let result = self.store.remove_phrase(&text);
                self.report(actor, RuleKind::Phrase, text, result, false)
            }
            Command::RemoveRegex(source) => {
                let result = self.store.remove_regex(&source);
                self.report(actor, RuleKind::Pattern, source, result, false)
            }
        }
    }

    fn report(
        &self,
        actor: &str,
        kind: RuleKind,
        rule: String,
        result: crate::error::Result<bool>,
        adding: bool,
    ) -> Reply {
        match (result, adding) {
            (Ok(true), true) => {
                info!(actor = %actor, kind = %kind, rule = %rule, "rule added");
                Reply::Added { kind, rule }
            }
            (Ok(false), true) => Reply::AlreadyExists { kind, rule },
            (Ok(true), false) => {
                info!(actor = %actor, kind = %kind, rule = %rule, "rule removed");
                Reply::Removed { kind, rule }
            }
            (Ok(false), false) => Reply::NotFound { kind, rule },
            (Err(FilterError::InvalidPattern { reason, .. }), _) => {
                Reply::InvalidPattern { reason }
            }
            (Err(FilterError::Validation(reason)), _) => Reply::InvalidInput { reason },
            (Err(FilterError::PermissionDenied { .. }), _) => Reply::PermissionDenied,
            (Err(e), _) => Reply::Failed {
                reason: e.to_string(),
            },
        }
    }
}
