//! Pull-request sync pipeline.
//!
//! One delivered event is handled as a strictly sequential chain:
//!
//! 1. plan lookup
//! 2. configuration resolution
//! 3. commit listing (only when commit subjects are searched)
//! 4. classification
//! 5. prior-state read and change detection
//! 6. composition and publish (only when the state changed)
//!
//! The first collaborator failure cancels the rest of the chain and is
//! returned as a [`SyncFailure`]. Nothing is retried: the next event for the
//! same pull request recomputes and publishes again.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, Instrument};
use wip_state::{
    CollaboratorError, CommitSource, ConfigStore, ErrorKind, IndicatorPayload, PlanLookup,
    PriorStateReader, Publisher,
};

use crate::change::has_changed;
use crate::classifier::classify;
use crate::compose::compose;
use crate::config_resolver::resolve_configuration;
use crate::domain::{Location, Verdict};
use crate::event::PullRequestEvent;
use crate::obs::{
    emit_classified, emit_event_ignored, emit_published, emit_sync_failed, emit_unchanged,
    sync_span,
};

/// Name of the check run kept in sync.
pub const CHECK_NAME: &str = "WIP";

/// The collaborators one sync needs.
#[derive(Clone)]
pub struct Collaborators {
    pub plans: Arc<dyn PlanLookup>,
    pub config_store: Arc<dyn ConfigStore>,
    pub commits: Arc<dyn CommitSource>,
    pub prior_state: Arc<dyn PriorStateReader>,
    pub publisher: Arc<dyn Publisher>,
}

impl Collaborators {
    /// Use one backend for every collaborator.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: PlanLookup + ConfigStore + CommitSource + PriorStateReader + Publisher + 'static,
    {
        Self {
            plans: backend.clone(),
            config_store: backend.clone(),
            commits: backend.clone(),
            prior_state: backend.clone(),
            publisher: backend,
        }
    }
}

/// Result of a successful sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// The action cannot change the classification.
    Ignored { action: String },
    /// The published indicator already encodes the verdict.
    Unchanged { verdict: Verdict },
    /// A new indicator was published.
    Published {
        verdict: Verdict,
        payload: IndicatorPayload,
    },
}

/// Step of the pipeline that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStage {
    PlanLookup,
    CommitList,
    PriorStateRead,
    Publish,
}

impl std::fmt::Display for SyncStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SyncStage::PlanLookup => "plan_lookup",
            SyncStage::CommitList => "commit_list",
            SyncStage::PriorStateRead => "prior_state_read",
            SyncStage::Publish => "publish",
        };
        f.write_str(s)
    }
}

/// Where a failure happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureContext {
    pub repo: String,
    pub pull_number: u64,
    pub head_sha: String,
    pub stage: SyncStage,
}

/// Structured failure record handed to the caller for external logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncFailure {
    pub context: FailureContext,
    pub kind: ErrorKind,
    pub message: String,
}

impl SyncFailure {
    fn new(event: &PullRequestEvent, stage: SyncStage, err: CollaboratorError) -> Self {
        emit_sync_failed(&event.log_label(), &stage.to_string(), &err.kind().to_string(), &err);
        Self {
            context: FailureContext {
                repo: event.repo().to_string(),
                pull_number: event.pull_number(),
                head_sha: event.head_sha().to_string(),
                stage,
            },
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for SyncFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} failed for {}#{} ({}): {}",
            self.context.stage, self.context.repo, self.context.pull_number, self.kind, self.message
        )
    }
}

impl std::error::Error for SyncFailure {}

/// Handle one pull-request change event end to end.
pub async fn handle_pull_request_change(
    event: &PullRequestEvent,
    collaborators: &Collaborators,
) -> Result<SyncOutcome, SyncFailure> {
    let span = sync_span(&event.repo().to_string(), event.pull_number());
    run(event, collaborators).instrument(span).await
}

async fn run(
    event: &PullRequestEvent,
    collaborators: &Collaborators,
) -> Result<SyncOutcome, SyncFailure> {
    let label = event.log_label();

    if !event.is_handled() {
        emit_event_ignored(&label, &event.action);
        return Ok(SyncOutcome::Ignored {
            action: event.action.clone(),
        });
    }

    let repo = event.repo();

    let plan = collaborators
        .plans
        .plan_for_account(event.account_id())
        .await
        .map_err(|e| SyncFailure::new(event, SyncStage::PlanLookup, e))?;
    debug!(plan = %plan, account_id = event.account_id(), "resolved plan");

    let resolved = resolve_configuration(plan, collaborators.config_store.as_ref(), &repo).await;

    let commit_messages = if resolved.configuration.is_active(Location::CommitSubject) {
        collaborators
            .commits
            .commit_messages(&repo, event.pull_number())
            .await
            .map_err(|e| SyncFailure::new(event, SyncStage::CommitList, e))?
    } else {
        Vec::new()
    };

    let snapshot = event.snapshot(commit_messages);
    let verdict = classify(&snapshot, &resolved);
    emit_classified(&label, &verdict);

    let prior = collaborators
        .prior_state
        .latest_indicator(&repo, &snapshot.head_sha, CHECK_NAME)
        .await
        .map_err(|e| SyncFailure::new(event, SyncStage::PriorStateRead, e))?;

    if !has_changed(&verdict, prior.as_ref()) {
        emit_unchanged(&label, verdict.wip);
        return Ok(SyncOutcome::Unchanged { verdict });
    }

    let payload = compose(&verdict, plan, snapshot.number);
    collaborators
        .publisher
        .publish(&repo, &snapshot.head_sha, CHECK_NAME, &payload)
        .await
        .map_err(|e| SyncFailure::new(event, SyncStage::Publish, e))?;
    emit_published(&label, &payload.title);

    Ok(SyncOutcome::Published { verdict, payload })
}
