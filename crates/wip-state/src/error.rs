//! Error types for wip-state

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable classification of a collaborator failure, used in failure records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unauthorized,
    NotFound,
    RateLimited,
    Transport,
    InvalidResponse,
    Api,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::NotFound => "not_found",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::Transport => "transport",
            ErrorKind::InvalidResponse => "invalid_response",
            ErrorKind::Api => "api",
        };
        f.write_str(s)
    }
}

/// Errors returned by any collaborator (plan lookup, configuration store,
/// commit source, prior-state reader, publisher).
#[derive(Error, Debug)]
pub enum CollaboratorError {
    /// Credentials missing, expired or lacking permission
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The requested resource does not exist
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// The API quota is exhausted
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Network-level failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Any other non-success API status
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },
}

impl CollaboratorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CollaboratorError::Unauthorized(_) => ErrorKind::Unauthorized,
            CollaboratorError::NotFound { .. } => ErrorKind::NotFound,
            CollaboratorError::RateLimited(_) => ErrorKind::RateLimited,
            CollaboratorError::Transport(_) => ErrorKind::Transport,
            CollaboratorError::InvalidResponse(_) => ErrorKind::InvalidResponse,
            CollaboratorError::Api { .. } => ErrorKind::Api,
        }
    }
}

impl From<serde_json::Error> for CollaboratorError {
    fn from(err: serde_json::Error) -> Self {
        CollaboratorError::InvalidResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        let err = CollaboratorError::NotFound {
            resource: "check-runs".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("check-runs"));

        let err = CollaboratorError::Api {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Api);
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn kind_display_is_snake_case() {
        assert_eq!(ErrorKind::RateLimited.to_string(), "rate_limited");
        assert_eq!(
            serde_json::to_value(ErrorKind::InvalidResponse).unwrap(),
            serde_json::json!("invalid_response")
        );
    }
}
