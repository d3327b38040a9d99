//! Command line grammar
//!
//! ```text
//! COMMAND := TRIGGER [ "add" ARG | "addr" ARG | "del" ARG | "delr" ARG | "list" ]
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

/// Subcommand word followed by an optional argument spanning the rest of the line
static SUBCOMMAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^(?P<sub>\S+)(?:\s+(?P<arg>.*))?$").expect("subcommand regex is valid")
});

/// A parsed management command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    List,
    AddPhrase(String),
    AddRegex(String),
    RemovePhrase(String),
    RemoveRegex(String),

    /// A mutating subcommand given without its argument
    MissingArgument(&'static str),
}

impl Command {
    /// Whether the command changes the rule set
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::AddPhrase(_)
                | Command::AddRegex(_)
                | Command::RemovePhrase(_)
                | Command::RemoveRegex(_)
                | Command::MissingArgument(_)
        )
    }
}

/// Parse a line addressed to `trigger`
///
/// Returns `None` when the line is not a command for this trigger, including
/// an unknown subcommand or `list` followed by text.
pub fn parse(line: &str, trigger: &str) -> Option<Command> {
    let rest = line.trim().strip_prefix(trigger)?;

    // "/ignorex" belongs to somebody else
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let rest = rest.trim();
    if rest.is_empty() {
        return Some(Command::Help);
    }

    let caps = SUBCOMMAND.captures(rest)?;
    let sub = caps.name("sub").map_or("", |m| m.as_str());
    let arg = caps
        .name("arg")
        .map(|m| m.as_str().trim().to_string())
        .filter(|arg| !arg.is_empty());

    let command = match (sub, arg) {
        ("list", None) => Command::List,
        ("add", Some(arg)) => Command::AddPhrase(arg),
        ("addr", Some(arg)) => Command::AddRegex(arg),
        ("del", Some(arg)) => Command::RemovePhrase(arg),
        ("delr", Some(arg)) => Command::RemoveRegex(arg),
        ("add", None) => Command::MissingArgument("add"),
        ("addr", None) => Command::MissingArgument("addr"),
        ("del", None) => Command::MissingArgument("del"),
        ("delr", None) => Command::MissingArgument("delr"),
        // not ours; the line goes through the filter like any other message
        _ => return None,
    };

    Some(command)
}
