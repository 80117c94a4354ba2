//! Collaborator trait definitions for wip-status
//!
//! These traits define every piece of I/O the classification core depends on:
//! - `PlanLookup`: account id → plan tier
//! - `ConfigStore`: repository file contents
//! - `CommitSource`: commit messages of a pull request
//! - `PriorStateReader`: the last published indicator for a commit
//! - `Publisher`: the mutating call that publishes a new indicator
//!
//! All traits are async and backend-agnostic. In-memory fakes are provided
//! for testing via the `fakes` module.

use async_trait::async_trait;

use crate::error::CollaboratorError;
use crate::schema::{IndicatorPayload, PlanTier, PublishedState, RepoRef};

/// Result type for collaborator operations
pub type CollaboratorResult<T> = std::result::Result<T, CollaboratorError>;

/// Resolves the marketplace plan of an account.
///
/// Accounts that never purchased a plan resolve to `PlanTier::Free`.
#[async_trait]
pub trait PlanLookup: Send + Sync {
    async fn plan_for_account(&self, account_id: u64) -> CollaboratorResult<PlanTier>;
}

/// Reads files from a repository's default branch.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Return the file contents, or `None` if the path does not exist.
    async fn read_file(&self, repo: &RepoRef, path: &str) -> CollaboratorResult<Option<String>>;
}

/// Lists the commits of a pull request.
#[async_trait]
pub trait CommitSource: Send + Sync {
    /// Full commit messages in chronological order.
    async fn commit_messages(
        &self,
        repo: &RepoRef,
        pull_number: u64,
    ) -> CollaboratorResult<Vec<String>>;
}

/// Reads the previously published indicator.
#[async_trait]
pub trait PriorStateReader: Send + Sync {
    /// Most recent check run named `check_name` on `head_sha`, or `None` if
    /// nothing has been published for that commit yet.
    async fn latest_indicator(
        &self,
        repo: &RepoRef,
        head_sha: &str,
        check_name: &str,
    ) -> CollaboratorResult<Option<PublishedState>>;
}

/// Publishes a new indicator.
///
/// Guarantees:
/// - A successful `publish` is observable through `PriorStateReader` for the
///   same commit and check name.
/// - A failed `publish` leaves no partial indicator behind.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(
        &self,
        repo: &RepoRef,
        head_sha: &str,
        check_name: &str,
        payload: &IndicatorPayload,
    ) -> CollaboratorResult<()>;
}
