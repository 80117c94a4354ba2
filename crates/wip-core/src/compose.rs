//! Output composer: turns a [`Verdict`] into the check run payload.
//!
//! The mapping is deterministic. Three shapes exist:
//!
//! | state              | conclusion | title                         | actions                  |
//! |--------------------|------------|-------------------------------|--------------------------|
//! | work in progress   | pending    | `Work in progress`            | `override:<n>` (pro)     |
//! | ready              | success    | `Ready for review`            | none                     |
//! | ready via override | success    | `Ready for review (override)` | `reset:<n>`              |
//!
//! The detail text always explains which configuration was in effect.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use wip_state::{ConclusionState, IndicatorAction, IndicatorPayload, PlanTier};

use crate::domain::{ConfigSource, Verdict, CONFIG_PATH, DEFAULT_CONFIG_YAML};
use crate::override_directive::OVERRIDE_DIRECTIVE;

pub const TITLE_WIP: &str = "Work in progress";
pub const TITLE_READY: &str = "Ready for review";
pub const TITLE_READY_OVERRIDE: &str = "Ready for review (override)";
pub const SUMMARY_NO_MATCH: &str = "No match found based on configuration.";

const UPSELL_NOTICE: &str = "Custom terms and locations can be configured in `.github/wip.yml` \
     with the [WIP Pro plan](https://github.com/marketplace/wip).";

// ---------------------------------------------------------------------------
// Action identifiers
// ---------------------------------------------------------------------------

/// Kind of interaction offered on the check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Force the pull request to read as ready.
    Override,
    /// Remove an active override.
    Reset,
}

impl ActionKind {
    fn as_str(self) -> &'static str {
        match self {
            ActionKind::Override => "override",
            ActionKind::Reset => "reset",
        }
    }
}

/// Stable identifier `<kind>:<pull number>` attached to a check run action,
/// so a later interaction can be correlated back to its pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionIdentifier {
    pub kind: ActionKind,
    pub pull_number: u64,
}

impl ActionIdentifier {
    pub fn new(kind: ActionKind, pull_number: u64) -> Self {
        Self { kind, pull_number }
    }
}

impl std::fmt::Display for ActionIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.pull_number)
    }
}

/// Error parsing an [`ActionIdentifier`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid action identifier: {0:?}")]
pub struct ParseActionError(String);

impl FromStr for ActionIdentifier {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, number) = s
            .split_once(':')
            .ok_or_else(|| ParseActionError(s.to_string()))?;
        let kind = match kind {
            "override" => ActionKind::Override,
            "reset" => ActionKind::Reset,
            _ => return Err(ParseActionError(s.to_string())),
        };
        let pull_number = number
            .parse::<u64>()
            .map_err(|_| ParseActionError(s.to_string()))?;
        Ok(Self { kind, pull_number })
    }
}

fn override_action(pull_number: u64) -> IndicatorAction {
    IndicatorAction {
        label: "✅ Ready for review".to_string(),
        description: "override status to \"success\"".to_string(),
        identifier: ActionIdentifier::new(ActionKind::Override, pull_number).to_string(),
    }
}

fn reset_action(pull_number: u64) -> IndicatorAction {
    IndicatorAction {
        label: "🔄 Reset".to_string(),
        description: "Remove status override".to_string(),
        identifier: ActionIdentifier::new(ActionKind::Reset, pull_number).to_string(),
    }
}

// ---------------------------------------------------------------------------
// Composer
// ---------------------------------------------------------------------------

/// Compose the indicator payload for `verdict`.
pub fn compose(verdict: &Verdict, plan: PlanTier, pull_number: u64) -> IndicatorPayload {
    let detail_text = detail_text(&verdict.config_source, plan);

    match (&verdict.signal, verdict.override_active) {
        (Some(signal), false) => {
            let mut actions = Vec::new();
            if plan.is_pro() {
                actions.push(override_action(pull_number));
            }
            IndicatorPayload {
                title: TITLE_WIP.to_string(),
                summary: format!(
                    "The {} \"{}\" contains \"{}\".\n\n\
                     You can override the status by adding \"{}\" to the end of the pull request description.",
                    signal.location.label(),
                    signal.text,
                    signal.term,
                    OVERRIDE_DIRECTIVE,
                ),
                detail_text,
                conclusion: ConclusionState::Pending,
                actions,
            }
        }
        (Some(signal), true) => IndicatorPayload {
            title: TITLE_READY_OVERRIDE.to_string(),
            summary: format!(
                "The status has been set to success by adding `{}` to the end of the pull request description. \
                 You can reset the status by removing it.\n\n\
                 Without the override, the {} \"{}\" would match \"{}\".",
                OVERRIDE_DIRECTIVE,
                signal.location.label(),
                signal.text,
                signal.term,
            ),
            detail_text,
            conclusion: ConclusionState::Success,
            actions: vec![reset_action(pull_number)],
        },
        (None, _) => IndicatorPayload {
            title: TITLE_READY.to_string(),
            summary: SUMMARY_NO_MATCH.to_string(),
            detail_text,
            conclusion: ConclusionState::Success,
            actions: Vec::new(),
        },
    }
}

/// Fenced YAML block. The fence is one backtick longer than the longest
/// backtick run in `body` so raw file contents cannot close it.
fn yaml_block(body: &str) -> String {
    let longest_run = body
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run.max(2) + 1);
    format!("{fence}yaml\n{}\n{fence}", body.trim_end())
}

fn detail_text(source: &ConfigSource, plan: PlanTier) -> String {
    let defaults = yaml_block(DEFAULT_CONFIG_YAML);

    if !plan.is_pro() {
        return format!("The default configuration is applied:\n\n{defaults}\n\n{UPSELL_NOTICE}");
    }

    match source {
        ConfigSource::Repository { raw } => format!(
            "The following configuration from `{CONFIG_PATH}` was applied:\n\n{}",
            yaml_block(raw)
        ),
        ConfigSource::Invalid { error } => format!(
            "`{CONFIG_PATH}` could not be applied ({error}), the default configuration is applied instead:\n\n{defaults}"
        ),
        ConfigSource::Default | ConfigSource::FreePlan => format!(
            "`{CONFIG_PATH}` does not exist, the default configuration is applied:\n\n{defaults}"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_identifier_display_and_parse() {
        let id = ActionIdentifier::new(ActionKind::Reset, 42);
        assert_eq!(id.to_string(), "reset:42");
        assert_eq!("reset:42".parse::<ActionIdentifier>().unwrap(), id);
        assert_eq!(
            "override:7".parse::<ActionIdentifier>().unwrap(),
            ActionIdentifier::new(ActionKind::Override, 7)
        );
    }

    #[test]
    fn action_identifier_rejects_garbage() {
        assert!("reset".parse::<ActionIdentifier>().is_err());
        assert!("merge:1".parse::<ActionIdentifier>().is_err());
        assert!("reset:-1".parse::<ActionIdentifier>().is_err());
        assert!("reset:".parse::<ActionIdentifier>().is_err());
    }

    #[test]
    fn free_plan_detail_has_upsell() {
        let text = detail_text(&ConfigSource::FreePlan, PlanTier::Free);
        assert!(text.contains("- work in progress"));
        assert!(text.contains("WIP Pro plan"));
    }

    #[test]
    fn pro_detail_embeds_raw_configuration() {
        let text = detail_text(
            &ConfigSource::Repository {
                raw: "terms: draft\n".to_string(),
            },
            PlanTier::Pro,
        );
        assert!(text.contains("```yaml\nterms: draft\n```"));
        assert!(!text.contains("WIP Pro plan"));
    }

    #[test]
    fn raw_configuration_with_fence_stays_inside_block() {
        let raw = "terms:\n  - wip\n```\nlocations: title\n";
        let text = detail_text(
            &ConfigSource::Repository {
                raw: raw.to_string(),
            },
            PlanTier::Pro,
        );
        assert!(text.ends_with("````yaml\nterms:\n  - wip\n```\nlocations: title\n````"));
    }

    #[test]
    fn yaml_block_uses_shortest_safe_fence() {
        assert_eq!(yaml_block("terms: wip\n"), "```yaml\nterms: wip\n```");
        assert_eq!(
            yaml_block("terms: '````'"),
            "`````yaml\nterms: '````'\n`````"
        );
    }
}
