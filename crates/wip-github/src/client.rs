//! GitHub REST client
//!
//! One `GitHubClient` backs every collaborator the sync pipeline needs:
//! marketplace plan lookup, repository file reads, pull-request commits, and
//! the "WIP" check run (read and create).

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use wip_state::{
    CollaboratorError, CollaboratorResult, CommitSource, ConfigStore, IndicatorPayload,
    PlanLookup, PlanTier, PriorStateReader, PublishedState, Publisher, RepoRef,
};

use crate::config::GitHubConfig;
use crate::wire::{CheckRunList, CreateCheckRun, MarketplaceAccount, PullCommit};

const API_VERSION: &str = "2022-11-28";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw+json";
const COMMITS_PER_PAGE: u32 = 100;

/// GitHub client implementing all collaborator traits
#[derive(Debug, Clone)]
pub struct GitHubClient {
    config: GitHubConfig,
    http_client: reqwest::Client,
}

impl GitHubClient {
    /// Create a new GitHub client
    pub fn new(config: GitHubConfig) -> CollaboratorResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| CollaboratorError::Transport(format!("invalid user agent: {e}")))?;
        headers.insert(USER_AGENT, agent);

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| CollaboratorError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(GitHubClient {
            config,
            http_client,
        })
    }

    /// Create client from environment variables
    pub fn from_env() -> CollaboratorResult<Self> {
        Self::new(GitHubConfig::from_env())
    }

    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url, path)
    }

    fn authorized(&self, request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, resource: &str) -> CollaboratorResult<Response> {
        let response = request.send().await.map_err(transport)?;
        debug!(resource = %resource, status = response.status().as_u16(), "github response");
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_for_response(response, resource).await)
        }
    }
}

fn transport(err: reqwest::Error) -> CollaboratorError {
    CollaboratorError::Transport(err.to_string())
}

async fn read_json<T: DeserializeOwned>(response: Response) -> CollaboratorResult<T> {
    let body = response.text().await.map_err(transport)?;
    Ok(serde_json::from_str(&body)?)
}

/// Map a non-success response onto the collaborator failure taxonomy.
async fn error_for_response(response: Response, resource: &str) -> CollaboratorError {
    let status = response.status();
    let quota_exhausted = response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim() == "0")
        .unwrap_or(false);
    let body = response.text().await.unwrap_or_default();
    error_for_status(status, quota_exhausted, resource, body)
}

fn error_for_status(
    status: StatusCode,
    quota_exhausted: bool,
    resource: &str,
    body: String,
) -> CollaboratorError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => CollaboratorError::RateLimited(body),
        StatusCode::FORBIDDEN if quota_exhausted => CollaboratorError::RateLimited(body),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CollaboratorError::Unauthorized(body),
        StatusCode::NOT_FOUND => CollaboratorError::NotFound {
            resource: resource.to_string(),
        },
        _ => CollaboratorError::Api {
            status: status.as_u16(),
            body,
        },
    }
}

#[async_trait]
impl PlanLookup for GitHubClient {
    async fn plan_for_account(&self, account_id: u64) -> CollaboratorResult<PlanTier> {
        let resource = format!("marketplace account {account_id}");
        let request = self.authorized(
            self.http_client
                .get(self.url(&format!("/marketplace_listing/accounts/{account_id}"))),
            self.config.plan_token(),
        );

        match self.send(request, &resource).await {
            Ok(response) => {
                let account: MarketplaceAccount = read_json(response).await?;
                let price_model = account.marketplace_purchase.plan.price_model;
                Ok(if price_model.eq_ignore_ascii_case("FREE") {
                    PlanTier::Free
                } else {
                    PlanTier::Pro
                })
            }
            // not installed through the marketplace
            Err(CollaboratorError::NotFound { .. }) => Ok(PlanTier::Free),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl ConfigStore for GitHubClient {
    async fn read_file(&self, repo: &RepoRef, path: &str) -> CollaboratorResult<Option<String>> {
        let resource = format!("{repo}:{path}");
        let request = self.authorized(
            self.http_client
                .get(self.url(&format!(
                    "/repos/{}/{}/contents/{}",
                    repo.owner, repo.name, path
                )))
                .header(ACCEPT, RAW_MEDIA_TYPE),
            self.config.token.as_deref(),
        );

        match self.send(request, &resource).await {
            Ok(response) => Ok(Some(response.text().await.map_err(transport)?)),
            Err(CollaboratorError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl CommitSource for GitHubClient {
    async fn commit_messages(
        &self,
        repo: &RepoRef,
        pull_number: u64,
    ) -> CollaboratorResult<Vec<String>> {
        let resource = format!("{repo}#{pull_number} commits");
        let request = self.authorized(
            self.http_client
                .get(self.url(&format!(
                    "/repos/{}/{}/pulls/{}/commits",
                    repo.owner, repo.name, pull_number
                )))
                .query(&[("per_page", COMMITS_PER_PAGE)]),
            self.config.token.as_deref(),
        );

        let response = self.send(request, &resource).await?;
        let commits: Vec<PullCommit> = read_json(response).await?;
        Ok(commits.into_iter().map(|c| c.commit.message).collect())
    }
}

#[async_trait]
impl PriorStateReader for GitHubClient {
    async fn latest_indicator(
        &self,
        repo: &RepoRef,
        head_sha: &str,
        check_name: &str,
    ) -> CollaboratorResult<Option<PublishedState>> {
        let resource = format!("{repo}@{head_sha} check runs");
        let request = self.authorized(
            self.http_client
                .get(self.url(&format!(
                    "/repos/{}/{}/commits/{}/check-runs",
                    repo.owner, repo.name, head_sha
                )))
                .query(&[("check_name", check_name)]),
            self.config.token.as_deref(),
        );

        let response = self.send(request, &resource).await?;
        let list: CheckRunList = read_json(response).await?;
        // GitHub lists the newest run first
        Ok(list.check_runs.first().map(|run| {
            PublishedState::from_check_run(
                run.conclusion.as_deref(),
                run.output.as_ref().and_then(|o| o.title.as_deref()),
            )
        }))
    }
}

#[async_trait]
impl Publisher for GitHubClient {
    async fn publish(
        &self,
        repo: &RepoRef,
        head_sha: &str,
        check_name: &str,
        payload: &IndicatorPayload,
    ) -> CollaboratorResult<()> {
        let resource = format!("{repo}@{head_sha} check run");
        let body = CreateCheckRun::new(check_name, head_sha, payload, chrono::Utc::now());
        let request = self.authorized(
            self.http_client
                .post(self.url(&format!("/repos/{}/{}/check-runs", repo.owner, repo.name)))
                .json(&body),
            self.config.token.as_deref(),
        );

        self.send(request, &resource).await?;
        debug!(repo = %repo, head_sha = %head_sha, title = %payload.title, "check run created");
        Ok(())
    }
}
