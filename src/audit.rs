//! JSONL audit logging for ignore-guard
//!
//! Records dropped messages and management commands to a JSONL file.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::warn;

use crate::command::Reply;
use crate::input::HookInput;
use crate::output::Decision;

/// Log level for audit entries
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Dropped,
    Command,
    Denied,
}

/// An audit log entry
#[derive(Debug, Serialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,

    /// DROPPED, COMMAND or DENIED
    pub level: LogLevel,

    pub actor: String,

    /// Rule that matched (drops only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,

    /// Truncated message text
    pub input_summary: String,

    /// Reply or decision summary
    pub reason: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl AuditEntry {
    /// Entry for a filter decision; `None` when nothing was dropped
    pub fn for_decision(input: &HookInput, decision: &Decision) -> Option<Self> {
        let hit = decision.matched()?;
        Some(Self {
            timestamp: Utc::now(),
            level: LogLevel::Dropped,
            actor: input.actor_id.clone(),
            rule: Some(hit.to_string()),
            input_summary: input.summary(),
            reason: format!("matched {} rule", hit.kind),
            session_id: input.session_id.clone(),
        })
    }

    /// Entry for a management command
    pub fn for_command(input: &HookInput, reply: &Reply) -> Self {
        let level = match reply {
            Reply::PermissionDenied => LogLevel::Denied,
            _ => LogLevel::Command,
        };
        let reason = reply.to_string().lines().next().unwrap_or_default().to_string();

        Self {
            timestamp: Utc::now(),
            level,
            actor: input.actor_id.clone(),
            rule: None,
            input_summary: input.summary(),
            reason,
            session_id: input.session_id.clone(),
        }
    }
}

/// Audit logger
#[derive(Default)]
pub struct AuditLogger {
    writer: Option<BufWriter<File>>,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(path: Option<&Path>) -> Self {
        let writer = path.and_then(|p| {
            let opened = match p.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
                _ => Ok(()),
            }
            .and_then(|_| OpenOptions::new().create(true).append(true).open(p));

            match opened {
                Ok(file) => Some(BufWriter::new(file)),
                Err(e) => {
                    warn!(path = %p.display(), error = %e, "audit log disabled");
                    None
                }
            }
        });

        Self { writer }
    }

    /// Log an audit entry
    pub fn log(&mut self, entry: &AuditEntry) -> Result<(), std::io::Error> {
        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(entry)?;
            writeln!(writer, "{}", json)?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Log a decision; allowed messages are not recorded
    pub fn log_decision(
        &mut self,
        input: &HookInput,
        decision: &Decision,
    ) -> Result<(), std::io::Error> {
        match AuditEntry::for_decision(input, decision) {
            Some(entry) => self.log(&entry),
            None => Ok(()),
        }
    }

    /// Log a command and its reply
    pub fn log_command(&mut self, input: &HookInput, reply: &Reply) -> Result<(), std::io::Error> {
        self.log(&AuditEntry::for_command(input, reply))
    }

    /// Check if logging is enabled
    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }
}
