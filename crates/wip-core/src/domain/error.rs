//! Domain-level error taxonomy for wip-status.

/// Errors produced while validating an incoming pull-request event.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("malformed event payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("event is missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid head commit sha: {sha:?}")]
    InvalidHeadSha { sha: String },
}

/// Errors produced while parsing a repository configuration file.
///
/// These never escape the configuration resolver: any of them results in the
/// default configuration being applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration file is empty")]
    Empty,

    #[error("invalid YAML: {0}")]
    Yaml(String),

    #[error("unknown location '{0}' (expected title, label_name or commit_subject)")]
    UnknownLocation(String),

    #[error("`terms` must contain at least one non-blank term")]
    NoTerms,

    #[error("`locations` must contain at least one location")]
    NoLocations,

    #[error("configuration could not be read: {0}")]
    Unreadable(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Yaml(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_error_display() {
        let err = EventError::MissingField {
            field: "pull_request.head.sha",
        };
        assert!(err.to_string().contains("pull_request.head.sha"));

        let err = EventError::InvalidHeadSha {
            sha: "zzz".to_string(),
        };
        assert!(err.to_string().contains("zzz"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::UnknownLocation("body".to_string());
        assert!(err.to_string().contains("'body'"));
        assert!(ConfigError::NoTerms.to_string().contains("terms"));
    }
}
