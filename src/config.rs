//! Rule document schema for ignore-guard
//!
//! The same TOML document is edited by the command surface and by any
//! external UI, so both sides share this schema.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FilterError, Result};

/// How phrase rules are compared against a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Phrase appears anywhere in the message
    #[default]
    Contains,

    /// Message equals the phrase
    Exact,

    /// Message begins with the phrase
    StartsWith,

    /// Message ends with the phrase
    EndsWith,
}

impl MatchMode {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "contains" => Some(MatchMode::Contains),
            "exact" => Some(MatchMode::Exact),
            "startswith" => Some(MatchMode::StartsWith),
            "endswith" => Some(MatchMode::EndsWith),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Contains => "contains",
            MatchMode::Exact => "exact",
            MatchMode::StartsWith => "startswith",
            MatchMode::EndsWith => "endswith",
        }
    }
}

// Unknown modes read as `contains` so a typo in the UI never disables filtering.
impl<'de> Deserialize<'de> for MatchMode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(MatchMode::from_str(&raw).unwrap_or_default())
    }
}

/// Interpretation of `user_control.list`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListType {
    /// Only listed actors may manage rules
    #[default]
    Whitelist,

    /// Everyone except listed actors may manage rules
    Blacklist,

    /// Any other value, kept verbatim; nobody may manage rules
    Unrecognised(String),
}

impl ListType {
    /// Parse from string, case-insensitively
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "whitelist" => ListType::Whitelist,
            "blacklist" => ListType::Blacklist,
            _ => ListType::Unrecognised(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ListType::Whitelist => "whitelist",
            ListType::Blacklist => "blacklist",
            ListType::Unrecognised(raw) => raw,
        }
    }
}

impl Serialize for ListType {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

// A bad permission setting must not take the block rules down with it.
impl<'de> Deserialize<'de> for ListType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(ListType::from_str(&raw))
    }
}

/// `[plugin]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginSection {
    pub config_version: String,

    /// Master switch; when off no message is ever dropped
    pub enabled: bool,
}

impl Default for PluginSection {
    fn default() -> Self {
        Self {
            config_version: "1.0.0".to_string(),
            enabled: true,
        }
    }
}

/// `[phrases]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhrasesSection {
    pub enabled: bool,

    /// Blocked phrases in insertion order
    pub list: Vec<String>,

    /// One mode for every phrase
    pub match_mode: MatchMode,

    pub case_sensitive: bool,
}

impl Default for PhrasesSection {
    fn default() -> Self {
        Self {
            enabled: true,
            list: Vec::new(),
            match_mode: MatchMode::Contains,
            case_sensitive: false,
        }
    }
}

/// `[regex]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegexSection {
    pub enabled: bool,

    /// Pattern source text in insertion order, never compiled objects
    pub patterns: Vec<String>,

    pub case_sensitive: bool,
}

impl Default for RegexSection {
    fn default() -> Self {
        Self {
            enabled: true,
            patterns: Vec::new(),
            case_sensitive: false,
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log every dropped message at info level
    pub log_ignored: bool,

    /// Raise the log level to debug
    pub debug: bool,

    /// JSONL audit file for drops and commands
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_path: Option<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            log_ignored: true,
            debug: false,
            audit_path: None,
        }
    }
}

/// `[user_control]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UserControlSection {
    pub list_type: ListType,

    #[serde(deserialize_with = "deserialize_actor_list")]
    pub list: Vec<String>,
}

/// The whole persisted document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RuleSet {
    pub plugin: PluginSection,
    pub phrases: PhrasesSection,
    pub regex: RegexSection,
    pub logging: LoggingSection,
    pub user_control: UserControlSection,
}

impl RuleSet {
    /// Parse a document, collapsing duplicate rule entries
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        let mut rules: RuleSet = toml::from_str(content)?;
        dedup_in_order(&mut rules.phrases.list);
        dedup_in_order(&mut rules.regex.patterns);
        Ok(rules)
    }

    /// Render the document as it is stored on disk
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Read a document from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| FilterError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::from_toml(&content).map_err(|e| FilterError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Default document location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("ignore-guard/config.toml"))
            .unwrap_or_else(|| PathBuf::from("ignore-guard.toml"))
    }

    /// Expand ~ in path strings
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Get the audit log path (expanded)
    pub fn audit_path(&self) -> Option<PathBuf> {
        self.logging.audit_path.as_deref().map(Self::expand_path)
    }
}

fn dedup_in_order(items: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    items.retain(|item| seen.insert(item.clone()));
}

/// Actor identifiers as typed into the document: text or bare numbers
#[derive(Deserialize)]
#[serde(untagged)]
enum ActorId {
    Text(String),
    Number(i64),
}

impl From<ActorId> for String {
    fn from(id: ActorId) -> Self {
        match id {
            ActorId::Text(text) => text,
            ActorId::Number(n) => n.to_string(),
        }
    }
}

fn deserialize_actor_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let ids = Vec::<ActorId>::deserialize(deserializer)?;
    Ok(ids.into_iter().map(String::from).collect())
}

/// Deserialize a single actor identifier that may be given as a number
pub(crate) fn deserialize_actor_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    ActorId::deserialize(deserializer).map(String::from)
}

/// Embedded default document
pub const DEFAULT_CONFIG_TOML: &str = r#"
[plugin]
config_version = "1.0.0"
enabled = true

[phrases]
enabled = true
list = []
match_mode = "contains"
case_sensitive = false

[regex]
enabled = true
patterns = []
case_sensitive = false

[logging]
log_ignored = true
debug = false

[user_control]
list_type = "whitelist"
list = []
"#;
