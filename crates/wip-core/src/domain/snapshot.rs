//! Immutable view of a pull request at the time an event was delivered.

use serde::{Deserialize, Serialize};

/// The pull-request signals the classifier reads.
///
/// `labels` keep the pull request's insertion order and `commit_messages`
/// are chronological, so "first match wins" is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestSnapshot {
    pub number: u64,
    pub title: String,
    pub labels: Vec<String>,
    pub head_sha: String,
    pub commit_messages: Vec<String>,
    pub description: String,
}

impl PullRequestSnapshot {
    /// Subject line (first line) of every commit, in order.
    pub fn commit_subjects(&self) -> impl Iterator<Item = &str> {
        self.commit_messages
            .iter()
            .map(|m| m.lines().next().unwrap_or("").trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_subjects_use_first_line() {
        let snapshot = PullRequestSnapshot {
            number: 1,
            title: "Add login".to_string(),
            labels: vec![],
            head_sha: "abc".to_string(),
            commit_messages: vec![
                "feat: login\r\n\nwip body text".to_string(),
                String::new(),
                "fix: typo".to_string(),
            ],
            description: String::new(),
        };

        let subjects: Vec<&str> = snapshot.commit_subjects().collect();
        assert_eq!(subjects, vec!["feat: login", "", "fix: typo"]);
    }
}
