//! In-memory fakes for collaborator traits (testing only)
//!
//! Provides `MemoryPlanLookup`, `MemoryConfigStore`, `MemoryCommitSource` and
//! `MemoryCheckRuns` that satisfy the trait contracts without any network
//! access. Each fake can be told to fail with a given [`ErrorKind`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::collaborators::*;
use crate::error::{CollaboratorError, ErrorKind};
use crate::schema::{IndicatorPayload, PlanTier, PublishedState, RepoRef};

fn injected(kind: ErrorKind, what: &str) -> CollaboratorError {
    let msg = format!("injected {kind} failure in {what}");
    match kind {
        ErrorKind::Unauthorized => CollaboratorError::Unauthorized(msg),
        ErrorKind::NotFound => CollaboratorError::NotFound { resource: msg },
        ErrorKind::RateLimited => CollaboratorError::RateLimited(msg),
        ErrorKind::Transport => CollaboratorError::Transport(msg),
        ErrorKind::InvalidResponse => CollaboratorError::InvalidResponse(msg),
        ErrorKind::Api => CollaboratorError::Api {
            status: 500,
            body: msg,
        },
    }
}

// ---------------------------------------------------------------------------
// MemoryPlanLookup
// ---------------------------------------------------------------------------

/// Plan lookup backed by a `HashMap<account_id, PlanTier>`.
///
/// Unknown accounts resolve to `PlanTier::Free`.
#[derive(Debug, Default)]
pub struct MemoryPlanLookup {
    plans: Mutex<HashMap<u64, PlanTier>>,
    failure: Mutex<Option<ErrorKind>>,
}

impl MemoryPlanLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plan(self, account_id: u64, plan: PlanTier) -> Self {
        self.plans.lock().unwrap().insert(account_id, plan);
        self
    }

    pub fn fail_with(&self, kind: ErrorKind) {
        *self.failure.lock().unwrap() = Some(kind);
    }
}

#[async_trait]
impl PlanLookup for MemoryPlanLookup {
    async fn plan_for_account(&self, account_id: u64) -> CollaboratorResult<PlanTier> {
        if let Some(kind) = *self.failure.lock().unwrap() {
            return Err(injected(kind, "plan lookup"));
        }
        let plans = self.plans.lock().unwrap();
        Ok(plans.get(&account_id).copied().unwrap_or(PlanTier::Free))
    }
}

// ---------------------------------------------------------------------------
// MemoryConfigStore
// ---------------------------------------------------------------------------

/// Repository file store backed by a `HashMap<(repo, path), contents>`.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    files: Mutex<HashMap<(RepoRef, String), String>>,
    failure: Mutex<Option<ErrorKind>>,
    reads: AtomicUsize,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, repo: &RepoRef, path: &str, contents: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert((repo.clone(), path.to_string()), contents.to_string());
        self
    }

    pub fn fail_with(&self, kind: ErrorKind) {
        *self.failure.lock().unwrap() = Some(kind);
    }

    /// Number of `read_file` calls served so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn read_file(&self, repo: &RepoRef, path: &str) -> CollaboratorResult<Option<String>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(kind) = *self.failure.lock().unwrap() {
            return Err(injected(kind, "config store"));
        }
        let files = self.files.lock().unwrap();
        Ok(files.get(&(repo.clone(), path.to_string())).cloned())
    }
}

// ---------------------------------------------------------------------------
// MemoryCommitSource
// ---------------------------------------------------------------------------

/// Commit source backed by a `HashMap<(repo, pull_number), messages>`.
#[derive(Debug, Default)]
pub struct MemoryCommitSource {
    commits: Mutex<HashMap<(RepoRef, u64), Vec<String>>>,
    failure: Mutex<Option<ErrorKind>>,
    calls: AtomicUsize,
}

impl MemoryCommitSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_commits(self, repo: &RepoRef, pull_number: u64, messages: &[&str]) -> Self {
        self.commits.lock().unwrap().insert(
            (repo.clone(), pull_number),
            messages.iter().map(|m| m.to_string()).collect(),
        );
        self
    }

    pub fn fail_with(&self, kind: ErrorKind) {
        *self.failure.lock().unwrap() = Some(kind);
    }

    /// Number of `commit_messages` calls served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommitSource for MemoryCommitSource {
    async fn commit_messages(
        &self,
        repo: &RepoRef,
        pull_number: u64,
    ) -> CollaboratorResult<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(kind) = *self.failure.lock().unwrap() {
            return Err(injected(kind, "commit source"));
        }
        let commits = self.commits.lock().unwrap();
        Ok(commits
            .get(&(repo.clone(), pull_number))
            .cloned()
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// MemoryCheckRuns
// ---------------------------------------------------------------------------

/// A check run recorded by [`MemoryCheckRuns`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedCheckRun {
    pub repo: RepoRef,
    pub head_sha: String,
    pub check_name: String,
    pub payload: IndicatorPayload,
}

/// In-memory check runs acting as both prior-state reader and publisher.
///
/// Runs are kept in publish order; the reader returns the newest run that
/// matches the repository, commit and check name.
#[derive(Debug, Default)]
pub struct MemoryCheckRuns {
    runs: Mutex<Vec<PublishedCheckRun>>,
    read_failure: Mutex<Option<ErrorKind>>,
    publish_failure: Mutex<Option<ErrorKind>>,
}

impl MemoryCheckRuns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a previously published run.
    pub fn with_run(
        self,
        repo: &RepoRef,
        head_sha: &str,
        check_name: &str,
        payload: IndicatorPayload,
    ) -> Self {
        self.runs.lock().unwrap().push(PublishedCheckRun {
            repo: repo.clone(),
            head_sha: head_sha.to_string(),
            check_name: check_name.to_string(),
            payload,
        });
        self
    }

    pub fn fail_reads_with(&self, kind: ErrorKind) {
        *self.read_failure.lock().unwrap() = Some(kind);
    }

    pub fn fail_publishes_with(&self, kind: ErrorKind) {
        *self.publish_failure.lock().unwrap() = Some(kind);
    }

    /// All runs recorded so far, oldest first.
    pub fn published(&self) -> Vec<PublishedCheckRun> {
        self.runs.lock().unwrap().clone()
    }

    pub fn publish_count(&self) -> usize {
        self.runs.lock().unwrap().len()
    }
}

#[async_trait]
impl PriorStateReader for MemoryCheckRuns {
    async fn latest_indicator(
        &self,
        repo: &RepoRef,
        head_sha: &str,
        check_name: &str,
    ) -> CollaboratorResult<Option<PublishedState>> {
        if let Some(kind) = *self.read_failure.lock().unwrap() {
            return Err(injected(kind, "prior-state reader"));
        }
        let runs = self.runs.lock().unwrap();
        Ok(runs
            .iter()
            .rev()
            .find(|r| &r.repo == repo && r.head_sha == head_sha && r.check_name == check_name)
            .map(|r| PublishedState::from_payload(&r.payload)))
    }
}

#[async_trait]
impl Publisher for MemoryCheckRuns {
    async fn publish(
        &self,
        repo: &RepoRef,
        head_sha: &str,
        check_name: &str,
        payload: &IndicatorPayload,
    ) -> CollaboratorResult<()> {
        if let Some(kind) = *self.publish_failure.lock().unwrap() {
            return Err(injected(kind, "publisher"));
        }
        self.runs.lock().unwrap().push(PublishedCheckRun {
            repo: repo.clone(),
            head_sha: head_sha.to_string(),
            check_name: check_name.to_string(),
            payload: payload.clone(),
        });
        Ok(())
    }
}
