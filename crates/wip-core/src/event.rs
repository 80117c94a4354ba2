//! Pull-request event boundary.
//!
//! Webhook payloads are parsed into [`PullRequestEvent`] and validated before
//! anything reaches the classifier, so the core never touches loosely typed
//! JSON.

use serde::{Deserialize, Serialize};
use wip_state::RepoRef;

use crate::domain::{EventError, PullRequestSnapshot};

/// Actions that can change the classification of a pull request.
pub const HANDLED_ACTIONS: [&str; 6] = [
    "opened",
    "reopened",
    "edited",
    "labeled",
    "unlabeled",
    "synchronize",
];

/// `pull_request` webhook payload (subset)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestEvent {
    /// Action type (opened, edited, labeled, ...)
    pub action: String,
    pub pull_request: PullRequestPayload,
    pub repository: RepositoryPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestPayload {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<LabelPayload>,
    pub head: HeadPayload,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelPayload {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadPayload {
    pub sha: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryPayload {
    pub name: String,
    pub owner: OwnerPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerPayload {
    pub login: String,
    /// Account id used for the plan lookup.
    pub id: u64,
}

impl PullRequestEvent {
    /// Parse and validate a raw webhook body.
    pub fn from_slice(body: &[u8]) -> Result<Self, EventError> {
        let event: PullRequestEvent = serde_json::from_slice(body)?;
        event.validate()?;
        Ok(event)
    }

    /// Check the fields the pipeline relies on.
    pub fn validate(&self) -> Result<(), EventError> {
        if self.repository.owner.login.trim().is_empty() {
            return Err(EventError::MissingField {
                field: "repository.owner.login",
            });
        }
        if self.repository.name.trim().is_empty() {
            return Err(EventError::MissingField {
                field: "repository.name",
            });
        }
        let sha = &self.pull_request.head.sha;
        if sha.is_empty() {
            return Err(EventError::MissingField {
                field: "pull_request.head.sha",
            });
        }
        if sha.len() < 7 || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(EventError::InvalidHeadSha { sha: sha.clone() });
        }
        Ok(())
    }

    /// Whether this action can change the classification.
    pub fn is_handled(&self) -> bool {
        HANDLED_ACTIONS.contains(&self.action.as_str())
    }

    pub fn repo(&self) -> RepoRef {
        RepoRef::new(&self.repository.owner.login, &self.repository.name)
    }

    pub fn account_id(&self) -> u64 {
        self.repository.owner.id
    }

    pub fn pull_number(&self) -> u64 {
        self.pull_request.number
    }

    pub fn head_sha(&self) -> &str {
        &self.pull_request.head.sha
    }

    /// `html_url "title"`, used to label log lines.
    pub fn log_label(&self) -> String {
        match &self.pull_request.html_url {
            Some(url) => format!("{} \"{}\"", url, self.pull_request.title),
            None => format!(
                "{}#{} \"{}\"",
                self.repo(),
                self.pull_request.number,
                self.pull_request.title
            ),
        }
    }

    /// Build the immutable snapshot the classifier reads.
    pub fn snapshot(&self, commit_messages: Vec<String>) -> PullRequestSnapshot {
        PullRequestSnapshot {
            number: self.pull_request.number,
            title: self.pull_request.title.clone(),
            labels: self
                .pull_request
                .labels
                .iter()
                .map(|l| l.name.clone())
                .collect(),
            head_sha: self.pull_request.head.sha.clone(),
            commit_messages,
            description: self.pull_request.body.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> serde_json::Value {
        json!({
            "action": "edited",
            "pull_request": {
                "number": 12,
                "title": "WIP: add login",
                "body": null,
                "labels": [{"name": "backend", "color": "ededed"}, {"name": "wip"}],
                "head": {"sha": "0123456789abcdef0123456789abcdef01234567", "ref": "login"},
                "html_url": "https://github.com/octo/hello-world/pull/12"
            },
            "repository": {
                "name": "hello-world",
                "owner": {"login": "octo", "id": 1}
            },
            "sender": {"login": "octo", "id": 1}
        })
    }

    #[test]
    fn parses_and_builds_snapshot() {
        let event = PullRequestEvent::from_slice(payload().to_string().as_bytes()).unwrap();
        assert!(event.is_handled());
        assert_eq!(event.repo(), RepoRef::new("octo", "hello-world"));
        assert_eq!(event.account_id(), 1);

        let snapshot = event.snapshot(vec!["initial".to_string()]);
        assert_eq!(snapshot.number, 12);
        assert_eq!(snapshot.labels, vec!["backend", "wip"]);
        assert_eq!(snapshot.description, "");
        assert_eq!(snapshot.commit_messages, vec!["initial"]);
    }

    #[test]
    fn rejects_invalid_head_sha() {
        let mut value = payload();
        value["pull_request"]["head"]["sha"] = json!("not-a-sha");
        let err = PullRequestEvent::from_slice(value.to_string().as_bytes()).unwrap_err();
        assert!(matches!(err, EventError::InvalidHeadSha { .. }));
    }

    #[test]
    fn rejects_missing_fields() {
        let mut value = payload();
        value["pull_request"].as_object_mut().unwrap().remove("title");
        let err = PullRequestEvent::from_slice(value.to_string().as_bytes()).unwrap_err();
        assert!(matches!(err, EventError::Malformed(_)));
    }

    #[test]
    fn closed_action_is_not_handled() {
        let mut value = payload();
        value["action"] = json!("closed");
        let event = PullRequestEvent::from_slice(value.to_string().as_bytes()).unwrap();
        assert!(!event.is_handled());
    }
}
