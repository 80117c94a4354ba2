use std::collections::BTreeSet;

use wip_core::{
    classify, resolve_from_contents, ConfigSource, Configuration, Location, PlanTier,
    PullRequestSnapshot, ResolvedConfig,
};

fn snapshot(title: &str) -> PullRequestSnapshot {
    PullRequestSnapshot {
        number: 12,
        title: title.to_string(),
        labels: Vec::new(),
        head_sha: "0123456789abcdef".to_string(),
        commit_messages: Vec::new(),
        description: String::new(),
    }
}

fn all_locations() -> ResolvedConfig {
    let locations = BTreeSet::from([
        Location::Title,
        Location::LabelName,
        Location::CommitSubject,
    ]);
    ResolvedConfig {
        configuration: Configuration::new(["wip", "work in progress", "🚧"], locations).unwrap(),
        source: ConfigSource::Default,
    }
}

// ---- word boundaries ----

#[test]
fn no_term_means_not_wip() {
    for title in ["Add login", "Refactor parser", "Fix the WIPE command", "gossip protocol"] {
        let v = classify(&snapshot(title), &ResolvedConfig::free_plan());
        assert!(!v.wip, "{title} should not be wip");
        assert!(v.signal.is_none());
        assert!(!v.override_active);
    }
}

#[test]
fn emoji_term_matches() {
    let v = classify(&snapshot("🚧 add login"), &ResolvedConfig::free_plan());
    assert!(v.wip);
    assert_eq!(v.signal.unwrap().term, "🚧");
}

// ---- scenario A ----

#[test]
fn scenario_title_match() {
    let v = classify(&snapshot("WIP: add login"), &ResolvedConfig::free_plan());
    assert!(v.wip);
    let signal = v.signal.unwrap();
    assert_eq!(signal.location, Location::Title);
    assert_eq!(signal.text, "WIP: add login");
    assert_eq!(signal.term, "wip");
}

// ---- scenario B ----

#[test]
fn scenario_label_match_when_title_is_clean() {
    let mut s = snapshot("Add login");
    s.labels = vec!["backend".to_string(), "wip".to_string()];

    let v = classify(&s, &all_locations());
    assert!(v.wip);
    let signal = v.signal.unwrap();
    assert_eq!(signal.location, Location::LabelName);
    assert_eq!(signal.text, "wip");
    assert_eq!(signal.term, "wip");
}

#[test]
fn labels_are_ignored_with_default_locations() {
    let mut s = snapshot("Add login");
    s.labels = vec!["wip".to_string()];

    let v = classify(&s, &ResolvedConfig::free_plan());
    assert!(!v.wip);
}

#[test]
fn title_beats_label_and_first_label_wins() {
    let mut s = snapshot("Work in progress: login");
    s.labels = vec!["🚧".to_string(), "wip".to_string()];
    let v = classify(&s, &all_locations());
    assert_eq!(v.signal.unwrap().location, Location::Title);

    s.title = "Add login".to_string();
    let v = classify(&s, &all_locations());
    let signal = v.signal.unwrap();
    assert_eq!(signal.location, Location::LabelName);
    assert_eq!(signal.text, "🚧");
}

#[test]
fn first_commit_subject_wins() {
    let mut s = snapshot("Add login");
    s.commit_messages = vec![
        "feat: login form\n\nwip in the body does not count".to_string(),
        "WIP: validation".to_string(),
        "work in progress: styling".to_string(),
    ];

    let v = classify(&s, &all_locations());
    let signal = v.signal.unwrap();
    assert_eq!(signal.location, Location::CommitSubject);
    assert_eq!(signal.text, "WIP: validation");
    assert_eq!(signal.term, "wip");
}

#[test]
fn custom_terms_replace_defaults() {
    let resolved = resolve_from_contents(
        PlanTier::Pro,
        Some("terms: [draft, do not merge]\nlocations: title\n"),
    );

    let v = classify(&snapshot("WIP: add login"), &resolved);
    assert!(!v.wip);

    let v = classify(&snapshot("Add login (DO NOT MERGE)"), &resolved);
    assert!(v.wip);
    assert_eq!(v.signal.unwrap().term, "do not merge");
}

// ---- scenarios C and D ----

#[test]
fn scenario_override_suppresses_match() {
    let mut s = snapshot("WIP: add login");
    s.description = "Adds a login form.\n\n@wip ready for review".to_string();

    let v = classify(&s, &ResolvedConfig::free_plan());
    assert!(!v.wip);
    assert!(v.override_active);
    assert_eq!(v.signal.unwrap().term, "wip");
}

#[test]
fn scenario_override_without_match_is_ignored() {
    let mut s = snapshot("Add login");
    s.description = "@wip ready for review".to_string();

    let v = classify(&s, &ResolvedConfig::free_plan());
    assert!(!v.wip);
    assert!(!v.override_active);
}

#[test]
fn removing_directive_restores_wip() {
    let mut s = snapshot("WIP: add login");
    s.description = "@wip ready for review".to_string();
    assert!(!classify(&s, &ResolvedConfig::free_plan()).wip);

    s.description = "Adds a login form.".to_string();
    assert!(classify(&s, &ResolvedConfig::free_plan()).wip);
}

#[test]
fn verdict_carries_config_source() {
    let raw = "terms: wip\n";
    let resolved = resolve_from_contents(PlanTier::Pro, Some(raw));
    let v = classify(&snapshot("wip"), &resolved);
    assert_eq!(v.config_source.raw(), Some(raw));
}
