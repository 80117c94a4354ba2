//! Structured observability hooks for pull-request sync events.
//!
//! This module provides:
//! - An event-scoped tracing span via the `SyncSpan` RAII guard
//! - Emission functions for the sync lifecycle: ignored, classified,
//!   unchanged, published, failed, configuration fallback
//!
//! Verbosity follows `RUST_LOG`; JSON output is selected at
//! [`crate::init_tracing`] time.

use tracing::{info, warn};

use crate::domain::Verdict;

/// RAII guard that enters a span tagged with the repository and pull number.
///
/// # Example
///
/// ```ignore
/// let _span = SyncSpan::enter("octo/hello-world", 12);
/// // every log line now carries repo and pull_number
/// ```
pub struct SyncSpan {
    _span: tracing::span::EnteredSpan,
}

impl SyncSpan {
    pub fn enter(repo: &str, pull_number: u64) -> Self {
        Self {
            _span: sync_span(repo, pull_number).entered(),
        }
    }
}

/// The span itself, for instrumenting futures (an entered span is not `Send`).
pub fn sync_span(repo: &str, pull_number: u64) -> tracing::Span {
    tracing::info_span!("wip.sync", repo = %repo, pull_number = pull_number)
}

/// Emit event: the delivered action cannot change the classification.
pub fn emit_event_ignored(label: &str, action: &str) {
    info!(event = "sync.ignored", pr = %label, action = %action);
}

/// Emit event: classification finished.
pub fn emit_classified(label: &str, verdict: &Verdict) {
    info!(
        event = "sync.classified",
        pr = %label,
        wip = verdict.wip,
        override_active = verdict.override_active,
        location = verdict.signal.as_ref().map(|s| s.location.key()).unwrap_or("none"),
        term = verdict.signal.as_ref().map(|s| s.term.as_str()).unwrap_or(""),
    );
}

/// Emit event: published state already matches; nothing was written.
pub fn emit_unchanged(label: &str, wip: bool) {
    info!(event = "sync.unchanged", pr = %label, wip = wip);
}

/// Emit event: a new check run was published.
pub fn emit_published(label: &str, title: &str) {
    info!(event = "sync.published", pr = %label, title = %title);
}

/// Emit event: a collaborator failed (warning level).
pub fn emit_sync_failed(label: &str, stage: &str, kind: &str, error: &dyn std::fmt::Display) {
    warn!(
        event = "sync.failed",
        pr = %label,
        stage = %stage,
        kind = %kind,
        error = %error,
    );
}

/// Emit event: repository configuration rejected, defaults applied.
pub fn emit_config_fallback(repo: &str, error: &dyn std::fmt::Display) {
    warn!(event = "config.fallback", repo = %repo, error = %error);
}
