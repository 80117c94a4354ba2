//! Signal extraction: find the first WIP term in a pull request.
//!
//! Terms match as whole words, case-insensitively. A word boundary is only
//! required on an edge of the term that is itself a word character, so
//! `wip` does not match `WIPE` while `🚧` still matches `🚧Add login`.
//! Whitespace inside a term matches any run of whitespace.

use std::cmp::Reverse;

use regex::Regex;
use tracing::warn;

use crate::domain::{Configuration, Location, PullRequestSnapshot, WipSignal};

/// Compiled matchers for a configuration's terms, in configuration order.
#[derive(Debug, Clone)]
pub struct TermMatcher {
    terms: Vec<(String, Regex)>,
}

impl TermMatcher {
    /// Compile every term. Blank terms and terms that cannot be compiled
    /// are skipped.
    pub fn new(terms: &[String]) -> Self {
        let terms = terms
            .iter()
            .map(|term| term.trim())
            .filter(|term| !term.is_empty())
            .filter_map(|term| match Regex::new(&term_pattern(term)) {
                Ok(re) => Some((term.to_string(), re)),
                Err(e) => {
                    warn!(term = %term, error = %e, "skipping term that cannot be compiled");
                    None
                }
            })
            .collect();
        Self { terms }
    }

    /// The configured term matching `text`, if any.
    ///
    /// The leftmost match wins; at the same position the longest match wins,
    /// then configuration order.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        self.terms
            .iter()
            .enumerate()
            .filter_map(|(idx, (term, re))| {
                re.find(text)
                    .map(|m| ((m.start(), Reverse(m.len()), idx), term.as_str()))
            })
            .min_by_key(|(key, _)| *key)
            .map(|(_, term)| term)
    }

    /// Whether any configured term occurs in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.terms.iter().any(|(_, re)| re.is_match(text))
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn term_pattern(term: &str) -> String {
    let body = term
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    let lead = match term.chars().next() {
        Some(c) if is_word_char(c) => r"\b",
        _ => "",
    };
    let trail = match term.chars().last() {
        Some(c) if is_word_char(c) => r"\b",
        _ => "",
    };
    format!("(?i){lead}{body}{trail}")
}

/// Texts searched at `location`, in the order they are searched.
fn location_texts<'a>(
    snapshot: &'a PullRequestSnapshot,
    location: Location,
) -> Box<dyn Iterator<Item = &'a str> + 'a> {
    match location {
        Location::Title => Box::new(std::iter::once(snapshot.title.as_str())),
        Location::LabelName => Box::new(snapshot.labels.iter().map(String::as_str)),
        Location::CommitSubject => Box::new(snapshot.commit_subjects()),
    }
}

/// Find the first active location containing a configured term.
///
/// Locations are searched in [`Location::PRIORITY`] order; within a
/// location the first label (insertion order) or first commit (chronological
/// order) wins.
pub fn extract_signal(
    snapshot: &PullRequestSnapshot,
    configuration: &Configuration,
) -> Option<WipSignal> {
    let matcher = TermMatcher::new(configuration.terms());

    for location in Location::PRIORITY {
        if !configuration.is_active(location) {
            continue;
        }
        for text in location_texts(snapshot, location) {
            if let Some(term) = matcher.first_match(text) {
                return Some(WipSignal {
                    location,
                    text: text.to_string(),
                    term: term.to_string(),
                });
            }
        }
    }

    None
}
