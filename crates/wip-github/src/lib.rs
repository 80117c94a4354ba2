//! wip-github: GitHub REST backend for wip-status
//!
//! Implements every collaborator trait from `wip-state` against the GitHub
//! REST API with `reqwest`. Credentials are supplied by the caller; this
//! crate never mints tokens.
//!
//! ## Layer 2 - Adapters
//!
//! Focus: wire formats and HTTP status mapping.

pub mod client;
pub mod config;
mod wire;

pub use client::GitHubClient;
pub use config::{GitHubConfig, DEFAULT_API_URL};
