//! wip-status Core Library
//!
//! Classifies pull requests as work in progress and decides whether the
//! published "WIP" check run needs to change. Re-exports the classification
//! engine and the sync pipeline for programmatic access.

pub mod change;
pub mod classifier;
pub mod compose;
pub mod config_resolver;
pub mod domain;
pub mod event;
pub mod obs;
pub mod override_directive;
pub mod signal;
pub mod sync;
pub mod telemetry;

pub use change::{has_changed, published_state_of};
pub use classifier::classify;
pub use compose::{compose, ActionIdentifier, ActionKind, ParseActionError};
pub use config_resolver::{resolve_configuration, resolve_from_contents};
pub use domain::{
    ConfigError, ConfigSource, Configuration, EventError, Location, PullRequestSnapshot,
    ResolvedConfig, Verdict, WipSignal, CONFIG_PATH, DEFAULT_CONFIG_YAML, DEFAULT_TERMS,
};
pub use event::PullRequestEvent;
pub use override_directive::{has_override_directive, OVERRIDE_DIRECTIVE};
pub use signal::{extract_signal, TermMatcher};
pub use sync::{
    handle_pull_request_change, Collaborators, FailureContext, SyncFailure, SyncOutcome,
    SyncStage, CHECK_NAME,
};

pub use obs::{sync_span, SyncSpan};
pub use telemetry::init_tracing;

pub use wip_state::{
    ConclusionState, IndicatorAction, IndicatorPayload, PlanTier, PublishedState, RepoRef,
};

/// wip-status version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
