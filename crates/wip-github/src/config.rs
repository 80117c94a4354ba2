//! GitHub API configuration

use serde::{Deserialize, Serialize};

/// Public GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// REST API base URL (GitHub Enterprise installs differ)
    pub api_url: String,
    /// Installation token used for repository reads and check runs
    pub token: Option<String>,
    /// App token used for marketplace plan lookups; falls back to `token`
    pub app_token: Option<String>,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        GitHubConfig {
            api_url: std::env::var("GITHUB_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            token: std::env::var("GITHUB_TOKEN").ok(),
            app_token: std::env::var("WIP_APP_TOKEN").ok(),
            user_agent: format!("wip-status/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl GitHubConfig {
    /// Create a new config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create config for a specific API endpoint, without credentials
    pub fn new(api_url: &str) -> Self {
        GitHubConfig {
            api_url: api_url.trim_end_matches('/').to_string(),
            token: None,
            app_token: None,
            user_agent: format!("wip-status/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the installation token
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Set the app token used for plan lookups
    pub fn with_app_token(mut self, token: &str) -> Self {
        self.app_token = Some(token.to_string());
        self
    }

    pub(crate) fn plan_token(&self) -> Option<&str> {
        self.app_token.as_deref().or(self.token.as_deref())
    }
}
