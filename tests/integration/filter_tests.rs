//! Integration tests for per-message filtering

use std::sync::Arc;

use ignore_guard::{FilterEngine, HookInput, MatchMode, RuleSet, RuleStore};

fn engine_with(configure: impl FnOnce(&mut RuleSet)) -> FilterEngine {
    let mut rules = RuleSet::default();
    configure(&mut rules);
    FilterEngine::new(Arc::new(RuleStore::in_memory(rules)))
}

fn dropped(engine: &FilterEngine, message: &str) -> bool {
    let json = serde_json::json!({ "message": message, "actor_id": "42" }).to_string();
    let input = HookInput::from_json(&json).unwrap();
    engine.decide(&input.message, &input.actor_id).is_drop()
}

// ============================================================================
// Phrase Matching
// ============================================================================

#[test]
fn test_contains_case_insensitive() {
    let engine = engine_with(|r| r.phrases.list = vec!["ad".to_string()]);
    assert!(dropped(&engine, "This is an AD"));
    assert!(!dropped(&engine, "nothing here"));
}

#[test]
fn test_each_match_mode() {
    let cases = [
        (MatchMode::Contains, "say hello world", true),
        (MatchMode::Contains, "goodbye", false),
        (MatchMode::Exact, "Hello", true),
        (MatchMode::Exact, "hello!", false),
        (MatchMode::StartsWith, "hello world", true),
        (MatchMode::StartsWith, "oh hello", false),
        (MatchMode::EndsWith, "oh hello", true),
        (MatchMode::EndsWith, "hello world", false),
    ];

    for (mode, message, expected) in cases {
        let engine = engine_with(|r| {
            r.phrases.list = vec!["hello".to_string()];
            r.phrases.match_mode = mode;
        });
        assert_eq!(
            dropped(&engine, message),
            expected,
            "mode {:?} on {:?}",
            mode,
            message
        );
    }
}

#[test]
fn test_case_sensitive_phrases() {
    let engine = engine_with(|r| {
        r.phrases.list = vec!["Promo".to_string()];
        r.phrases.case_sensitive = true;
    });
    assert!(dropped(&engine, "big Promo today"));
    assert!(!dropped(&engine, "big promo today"));
}

// ============================================================================
// Regex Matching
// ============================================================================

#[test]
fn test_anchored_pattern() {
    let engine = engine_with(|r| r.regex.patterns = vec!["^/spam".to_string()]);
    assert!(dropped(&engine, "/spam now"));
    assert!(!dropped(&engine, "not /spam now"));
}

#[test]
fn test_unanchored_pattern() {
    let engine = engine_with(|r| r.regex.patterns = vec!["spam".to_string()]);
    assert!(dropped(&engine, "/spam now"));
    assert!(dropped(&engine, "not /spam now"));
}

#[test]
fn test_regex_case_sensitivity() {
    let engine = engine_with(|r| r.regex.patterns = vec![r"free\s+coins".to_string()]);
    assert!(dropped(&engine, "FREE   Coins here"));

    let engine = engine_with(|r| {
        r.regex.patterns = vec![r"free\s+coins".to_string()];
        r.regex.case_sensitive = true;
    });
    assert!(!dropped(&engine, "FREE   Coins here"));
    assert!(dropped(&engine, "free coins here"));
}

#[test]
fn test_bad_stored_pattern_does_not_block_others() {
    let engine = engine_with(|r| r.regex.patterns = vec!["(".to_string(), "^bad".to_string()]);
    assert!(!dropped(&engine, "hello"));
    assert!(dropped(&engine, "bad words"));
}

// ============================================================================
// Switches
// ============================================================================

#[test]
fn test_plugin_disabled_allows_everything() {
    let engine = engine_with(|r| {
        r.plugin.enabled = false;
        r.phrases.list = vec!["a".to_string(), "e".to_string()];
        r.regex.patterns = vec![".".to_string()];
    });
    for message in ["a", "e", "anything at all", "/spam"] {
        assert!(!dropped(&engine, message));
    }
}

#[test]
fn test_disabled_sections() {
    let engine = engine_with(|r| {
        r.phrases.enabled = false;
        r.regex.enabled = false;
        r.phrases.list = vec!["ad".to_string()];
        r.regex.patterns = vec!["ad".to_string()];
    });
    assert!(!dropped(&engine, "an ad"));
}

#[test]
fn test_empty_message_allowed() {
    let engine = engine_with(|r| r.regex.patterns = vec![".*".to_string()]);
    assert!(!dropped(&engine, ""));
}

#[test]
fn test_rules_added_at_runtime_apply() {
    let engine = engine_with(|_| {});
    assert!(!dropped(&engine, "limited offer"));

    engine.store().add_phrase("offer").unwrap();
    assert!(dropped(&engine, "limited offer"));

    engine.store().remove_phrase("offer").unwrap();
    assert!(!dropped(&engine, "limited offer"));
}
