//! Request and response bodies of the GitHub endpoints used here.

use serde::{Deserialize, Serialize};
use wip_state::{IndicatorAction, IndicatorPayload};

// ---- marketplace ----

#[derive(Debug, Deserialize)]
pub(crate) struct MarketplaceAccount {
    pub marketplace_purchase: MarketplacePurchase,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MarketplacePurchase {
    pub plan: MarketplacePlan,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MarketplacePlan {
    pub price_model: String,
}

// ---- commits ----

#[derive(Debug, Deserialize)]
pub(crate) struct PullCommit {
    pub commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitDetail {
    pub message: String,
}

// ---- check runs ----

#[derive(Debug, Deserialize)]
pub(crate) struct CheckRunList {
    #[serde(default)]
    pub check_runs: Vec<CheckRun>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CheckRun {
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub output: Option<CheckRunOutputRead>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CheckRunOutputRead {
    #[serde(default)]
    pub title: Option<String>,
}

/// `POST /repos/{owner}/{repo}/check-runs` body
#[derive(Debug, Serialize)]
pub(crate) struct CreateCheckRun<'a> {
    pub name: &'a str,
    pub head_sha: &'a str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<&'static str>,
    pub started_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    pub output: CheckRunOutput<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<CheckRunAction<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CheckRunOutput<'a> {
    pub title: &'a str,
    pub summary: &'a str,
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CheckRunAction<'a> {
    pub label: &'a str,
    pub description: &'a str,
    pub identifier: &'a str,
}

impl<'a> From<&'a IndicatorAction> for CheckRunAction<'a> {
    fn from(action: &'a IndicatorAction) -> Self {
        CheckRunAction {
            label: &action.label,
            description: &action.description,
            identifier: &action.identifier,
        }
    }
}

impl<'a> CreateCheckRun<'a> {
    pub fn new(
        check_name: &'a str,
        head_sha: &'a str,
        payload: &'a IndicatorPayload,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        let conclusion = payload.conclusion.check_run_conclusion();
        let timestamp = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        CreateCheckRun {
            name: check_name,
            head_sha,
            status: payload.conclusion.check_run_status(),
            conclusion,
            started_at: timestamp.clone(),
            completed_at: conclusion.map(|_| timestamp),
            output: CheckRunOutput {
                title: &payload.title,
                summary: &payload.summary,
                text: &payload.detail_text,
            },
            actions: payload.actions.iter().map(CheckRunAction::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use wip_state::ConclusionState;

    fn payload(conclusion: ConclusionState) -> IndicatorPayload {
        IndicatorPayload {
            title: "Work in progress".to_string(),
            summary: "summary".to_string(),
            detail_text: "text".to_string(),
            conclusion,
            actions: vec![IndicatorAction {
                label: "✅ Ready for review".to_string(),
                description: "override".to_string(),
                identifier: "override:1".to_string(),
            }],
        }
    }

    #[test]
    fn test_pending_run_has_no_conclusion() {
        let now = chrono::Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let p = payload(ConclusionState::Pending);
        let body = serde_json::to_value(CreateCheckRun::new("WIP", "abc1234", &p, now)).unwrap();

        assert_eq!(body["status"], "in_progress");
        assert!(body.get("conclusion").is_none());
        assert!(body.get("completed_at").is_none());
        assert_eq!(body["started_at"], "2024-03-01T12:00:00Z");
        assert_eq!(body["actions"][0]["identifier"], "override:1");
    }

    #[test]
    fn test_success_run_is_completed() {
        let now = chrono::Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut p = payload(ConclusionState::Success);
        p.actions.clear();
        let body = serde_json::to_value(CreateCheckRun::new("WIP", "abc1234", &p, now)).unwrap();

        assert_eq!(body["status"], "completed");
        assert_eq!(body["conclusion"], "success");
        assert_eq!(body["completed_at"], "2024-03-01T12:00:00Z");
        assert_eq!(body["output"]["text"], "text");
        assert!(body.get("actions").is_none());
    }

    #[test]
    fn test_check_run_list_tolerates_missing_fields() {
        let list: CheckRunList =
            serde_json::from_str(r#"{"total_count":1,"check_runs":[{"status":"queued"}]}"#)
                .unwrap();
        assert_eq!(list.check_runs.len(), 1);
        assert!(list.check_runs[0].conclusion.is_none());
        assert!(list.check_runs[0].output.is_none());
    }
}
