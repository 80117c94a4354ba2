//! Record types exchanged with collaborators.
//!
//! These are the shapes that cross the boundary between the classification
//! core and the outside world: the repository being acted on, the account's
//! plan tier, the previously published indicator and the payload handed to the
//! publisher.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Repository reference
// ---------------------------------------------------------------------------

/// Owner/name pair identifying a repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

// ---------------------------------------------------------------------------
// Plan tier
// ---------------------------------------------------------------------------

/// Marketplace plan of the account that installed the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    Free,
    Pro,
}

impl PlanTier {
    pub fn is_pro(self) -> bool {
        matches!(self, PlanTier::Pro)
    }
}

impl std::fmt::Display for PlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanTier::Free => write!(f, "free"),
            PlanTier::Pro => write!(f, "pro"),
        }
    }
}

impl std::str::FromStr for PlanTier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(PlanTier::Free),
            "pro" => Ok(PlanTier::Pro),
            other => Err(format!("unknown plan tier '{other}' (expected free or pro)")),
        }
    }
}

// ---------------------------------------------------------------------------
// Published indicator state
// ---------------------------------------------------------------------------

/// Marker that identifies an override in a published check run title.
pub const OVERRIDE_TITLE_MARKER: &str = "override";

/// State encoded by the most recently published check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedState {
    pub wip: bool,
    #[serde(rename = "override")]
    pub override_active: bool,
}

impl PublishedState {
    /// Derive the state from a check run's conclusion and output title.
    ///
    /// Anything other than a `success` conclusion (including a run that is
    /// still in progress and has no conclusion) counts as WIP.
    pub fn from_check_run(conclusion: Option<&str>, title: Option<&str>) -> Self {
        Self {
            wip: conclusion != Some("success"),
            override_active: title
                .map(|t| t.contains(OVERRIDE_TITLE_MARKER))
                .unwrap_or(false),
        }
    }

    /// State a publisher would record for the given payload.
    pub fn from_payload(payload: &IndicatorPayload) -> Self {
        Self::from_check_run(
            payload.conclusion.check_run_conclusion(),
            Some(payload.title.as_str()),
        )
    }
}

// ---------------------------------------------------------------------------
// Indicator payload
// ---------------------------------------------------------------------------

/// Terminal state of the indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConclusionState {
    Pending,
    Success,
}

impl ConclusionState {
    /// Check run `status` field.
    pub fn check_run_status(self) -> &'static str {
        match self {
            ConclusionState::Pending => "in_progress",
            ConclusionState::Success => "completed",
        }
    }

    /// Check run `conclusion` field; pending runs have none.
    pub fn check_run_conclusion(self) -> Option<&'static str> {
        match self {
            ConclusionState::Pending => None,
            ConclusionState::Success => Some("success"),
        }
    }
}

/// A button rendered on the check run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorAction {
    pub label: String,
    pub description: String,
    pub identifier: String,
}

/// Everything the publisher needs to render the indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorPayload {
    pub title: String,
    pub summary: String,
    pub detail_text: String,
    pub conclusion: ConclusionState,
    pub actions: Vec<IndicatorAction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_conclusion_counts_as_wip() {
        let state = PublishedState::from_check_run(None, Some("Work in progress"));
        assert!(state.wip);
        assert!(!state.override_active);
    }

    #[test]
    fn override_title_is_detected() {
        let state =
            PublishedState::from_check_run(Some("success"), Some("Ready for review (override)"));
        assert!(!state.wip);
        assert!(state.override_active);
    }

    #[test]
    fn plan_tier_parses_case_insensitively() {
        assert_eq!("PRO".parse::<PlanTier>().unwrap(), PlanTier::Pro);
        assert_eq!(" free ".parse::<PlanTier>().unwrap(), PlanTier::Free);
        assert!("enterprise".parse::<PlanTier>().is_err());
    }

    #[test]
    fn published_state_serializes_override_key() {
        let json = serde_json::to_value(PublishedState {
            wip: true,
            override_active: false,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"wip": true, "override": false}));
    }
}
