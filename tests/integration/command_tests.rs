//! Integration tests for the management command surface

use std::sync::Arc;

use ignore_guard::{CommandHandler, FilterEngine, ListType, Reply, RuleSet, RuleStore};

fn setup(list_type: ListType, actors: &[&str]) -> (CommandHandler, FilterEngine) {
    let mut rules = RuleSet::default();
    rules.user_control.list_type = list_type;
    rules.user_control.list = actors.iter().map(|s| s.to_string()).collect();
    let store = Arc::new(RuleStore::in_memory(rules));
    (
        CommandHandler::new(store.clone()),
        FilterEngine::new(store),
    )
}

// ============================================================================
// Permission Gate
// ============================================================================

#[test]
fn test_whitelisted_actor_can_add() {
    let (commands, engine) = setup(ListType::Whitelist, &["123"]);
    let reply = commands.handle("/ignore add spam", "123").unwrap();
    assert!(reply.is_success());
    assert!(engine.decide("spam here", "999").is_drop());
}

#[test]
fn test_unlisted_actor_denied() {
    let (commands, engine) = setup(ListType::Whitelist, &["123"]);
    for line in [
        "/ignore add spam",
        "/ignore addr ^spam",
        "/ignore del spam",
        "/ignore delr ^spam",
    ] {
        assert_eq!(commands.handle(line, "456").unwrap(), Reply::PermissionDenied);
    }
    assert_eq!(engine.store().revision(), 0);
    assert!(engine.store().list_phrases().is_empty());
    assert!(engine.decide("spam here", "456").is_allow());
}

#[test]
fn test_empty_whitelist_denies_everyone() {
    let (commands, _) = setup(ListType::Whitelist, &[]);
    assert_eq!(
        commands.handle("/ignore add x", "123").unwrap(),
        Reply::PermissionDenied
    );
}

#[test]
fn test_blacklist() {
    let (commands, _) = setup(ListType::Blacklist, &["666"]);
    assert!(commands.handle("/ignore add x", "123").unwrap().is_success());
    assert_eq!(
        commands.handle("/ignore add y", "666").unwrap(),
        Reply::PermissionDenied
    );
}

#[test]
fn test_read_only_commands_open_to_all() {
    let (commands, _) = setup(ListType::Whitelist, &[]);
    assert!(commands.handle("/ignore list", "456").unwrap().is_success());
    assert!(commands.handle("/ignore", "456").unwrap().is_success());
}

// ============================================================================
// Replies
// ============================================================================

#[test]
fn test_full_session() {
    let (commands, engine) = setup(ListType::Whitelist, &["123"]);

    let reply = commands.handle("/ignore add 广告", "123").unwrap();
    assert_eq!(reply.to_string(), "Added phrase: 广告");

    let reply = commands.handle("/ignore add 广告", "123").unwrap();
    assert_eq!(reply.to_string(), "phrase already exists: 广告");

    let reply = commands.handle("/ignore addr ^/spam.*", "123").unwrap();
    assert_eq!(reply.to_string(), "Added pattern: ^/spam.*");

    assert!(engine.decide("看广告", "1").is_drop());
    assert!(engine.decide("/spam everyone", "1").is_drop());

    let listing = commands.handle("/ignore list", "1").unwrap().to_string();
    assert!(listing.contains("1. 广告"));
    assert!(listing.contains("1. ^/spam.*"));

    let reply = commands.handle("/ignore delr ^/spam.*", "123").unwrap();
    assert_eq!(reply.to_string(), "Removed pattern: ^/spam.*");
    assert!(engine.decide("/spam everyone", "1").is_allow());

    let reply = commands.handle("/ignore del nothing", "123").unwrap();
    assert_eq!(reply.to_string(), "phrase not found: nothing");
}

#[test]
fn test_invalid_pattern_rejected() {
    let (commands, engine) = setup(ListType::Whitelist, &["123"]);
    let reply = commands.handle("/ignore addr [unclosed", "123").unwrap();
    assert!(matches!(reply, Reply::InvalidPattern { .. }));
    assert!(!reply.is_success());
    assert!(engine.store().list_regex().is_empty());
}

#[test]
fn test_unknown_subcommand_is_filtered() {
    let (commands, engine) = setup(ListType::Whitelist, &["123"]);
    assert!(commands
        .handle("/ignore addr ^/ignore\\s+frob", "123")
        .unwrap()
        .is_success());

    assert!(commands.handle("/ignore frobnicate", "456").is_none());
    assert!(engine.decide("/ignore frobnicate", "456").is_drop());

    assert!(commands.handle("/ignore list all", "456").is_none());
    assert!(engine.decide("/ignore list all", "456").is_allow());
}

#[test]
fn test_lines_for_other_triggers_ignored() {
    let (commands, _) = setup(ListType::Whitelist, &["123"]);
    assert!(commands.handle("hello", "123").is_none());
    assert!(commands.handle("/ignoreall", "123").is_none());
    assert!(commands.handle(".ignore add x", "123").is_none());
}
