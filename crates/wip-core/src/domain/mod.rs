//! Domain types for WIP classification.

pub mod config;
pub mod error;
pub mod snapshot;
pub mod verdict;

pub use config::{
    ConfigSource, Configuration, Location, ResolvedConfig, CONFIG_PATH, DEFAULT_CONFIG_YAML,
    DEFAULT_TERMS,
};
pub use error::{ConfigError, EventError};
pub use snapshot::PullRequestSnapshot;
pub use verdict::{Verdict, WipSignal};
