//! ignore-guard - Phrase and regex block rules for inbound chat messages
//!
//! Reads one JSON message per line from stdin and writes one JSON answer per
//! line to stdout.
//!
//! # Usage
//!
//! ```bash
//! echo '{"message":"buy now","actor_id":"123"}' | ignore-guard
//! echo '{"message":"/ignore add buy now","actor_id":"123"}' | ignore-guard --config rules.toml
//! ```

use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use ignore_guard::{
    audit::AuditLogger,
    command::{CommandHandler, DEFAULT_TRIGGER},
    config::RuleSet,
    engine::FilterEngine,
    input::HookInput,
    output::HookOutput,
    store::RuleStore,
};

/// Print version information
fn print_version() {
    println!("ignore-guard {}", env!("CARGO_PKG_VERSION"));
}

/// Print help message
fn print_help() {
    println!(
        r#"ignore-guard - Phrase and regex block rules for inbound chat messages

USAGE:
    ignore-guard [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -v, --version           Print version information
    -c, --config PATH       Rule document (default: {})
    -t, --trigger WORD      Command trigger (default: {})
    -a, --audit PATH        JSONL audit log (overrides logging.audit_path)

INPUT (one JSON object per line):
    {{"message": "text", "actor_id": "123"}}

OUTPUT (one JSON object per line):
    {{"decision": "drop", "matched": "phrase:text"}}
    {{"reply": "Added phrase: text", "success": true}}

ENVIRONMENT:
    RUST_LOG                Log filter for stderr output
"#,
        RuleSet::default_path().display(),
        DEFAULT_TRIGGER
    );
}

/// Parse command line arguments
struct Args {
    help: bool,
    version: bool,
    config_path: Option<String>,
    trigger: Option<String>,
    audit_path: Option<String>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut result = Args {
            help: false,
            version: false,
            config_path: None,
            trigger: None,
            audit_path: None,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-h" | "--help" => result.help = true,
                "-v" | "--version" => result.version = true,
                "-c" | "--config" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.config_path = Some(args[i].clone());
                    }
                }
                "-t" | "--trigger" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.trigger = Some(args[i].clone());
                    }
                }
                "-a" | "--audit" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.audit_path = Some(args[i].clone());
                    }
                }
                arg if arg.starts_with("--config=") => {
                    result.config_path = Some(arg.trim_start_matches("--config=").to_string());
                }
                arg if arg.starts_with("--trigger=") => {
                    result.trigger = Some(arg.trim_start_matches("--trigger=").to_string());
                }
                arg if arg.starts_with("--audit=") => {
                    result.audit_path = Some(arg.trim_start_matches("--audit=").to_string());
                }
                _ => {}
            }
            i += 1;
        }

        result
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();

    if args.help {
        print_help();
        return;
    }

    if args.version {
        print_version();
        return;
    }

    let config_path = args
        .config_path
        .as_deref()
        .map(RuleSet::expand_path)
        .unwrap_or_else(RuleSet::default_path);

    // Peek at the logging section before the store logs anything
    let debug = RuleSet::load_from(&config_path)
        .map(|rules| rules.logging.debug)
        .unwrap_or(false);
    init_tracing(debug);

    let store = Arc::new(RuleStore::open(config_path));
    let engine = FilterEngine::new(store.clone());
    let commands = CommandHandler::with_trigger(
        store.clone(),
        args.trigger.unwrap_or_else(|| DEFAULT_TRIGGER.to_string()),
    );

    let audit_path: Option<PathBuf> = args
        .audit_path
        .as_deref()
        .map(RuleSet::expand_path)
        .or_else(|| store.with_rules(RuleSet::audit_path));
    let mut logger = AuditLogger::new(audit_path.as_deref());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let output = match HookInput::from_json(&line) {
            Ok(input) => {
                if let Err(e) = store.refresh_if_changed() {
                    tracing::warn!(error = %e, "keeping current rules");
                }

                match commands.handle(&input.message, &input.actor_id) {
                    Some(reply) => {
                        if let Err(e) = logger.log_command(&input, &reply) {
                            tracing::warn!(error = %e, "failed to write audit log");
                        }
                        HookOutput::from_reply(&reply)
                    }
                    None => {
                        let decision = engine.decide(&input.message, &input.actor_id);
                        if let Err(e) = logger.log_decision(&input, &decision) {
                            tracing::warn!(error = %e, "failed to write audit log");
                        }
                        HookOutput::from_decision(&decision)
                    }
                }
            }
            Err(e) => {
                // Unparseable input must not blackhole traffic
                tracing::warn!(error = %e, "failed to parse input, allowing");
                HookOutput::invalid_input(format!("failed to parse input: {}", e))
            }
        };

        if writeln!(out, "{}", output.to_json()).is_err() {
            break;
        }
        let _ = out.flush();
    }
}
