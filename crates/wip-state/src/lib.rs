//! wip-state: Collaborator Contracts for wip-status
//!
//! This crate defines the boundary between the classification core and the
//! outside world. It owns no I/O itself: it declares the async traits every
//! backend (GitHub REST, in-memory fakes) must satisfy, and the records that
//! flow across them.
//!
//! ## Layer 0 - Contracts
//!
//! Focus: stable shapes and failure taxonomy.
//!
//! ## Key Components
//!
//! - `PlanLookup`, `ConfigStore`, `CommitSource`, `PriorStateReader`,
//!   `Publisher`: collaborator traits
//! - `IndicatorPayload`: what gets published as a check run
//! - `PublishedState`: what a previously published check run encodes

pub mod collaborators;
mod error;
pub mod fakes;
mod schema;

pub use collaborators::{
    CollaboratorResult, CommitSource, ConfigStore, PlanLookup, PriorStateReader, Publisher,
};
pub use error::{CollaboratorError, ErrorKind};
pub use schema::{
    ConclusionState, IndicatorAction, IndicatorPayload, PlanTier, PublishedState, RepoRef,
    OVERRIDE_TITLE_MARKER,
};
