//! Change detection against the previously published indicator.
//!
//! Publishing is a mutation against a tightly rate-limited API, so a new
//! check run is only created when its externally observable state differs.

use wip_state::PublishedState;

use crate::domain::Verdict;

/// Whether `verdict` differs from what is already published.
///
/// `None` means no indicator was ever published for the commit, which always
/// counts as a change.
pub fn has_changed(verdict: &Verdict, published: Option<&PublishedState>) -> bool {
    match published {
        None => true,
        Some(prior) => {
            verdict.wip != prior.wip || verdict.override_active != prior.override_active
        }
    }
}

/// The state publishing `verdict` would record.
pub fn published_state_of(verdict: &Verdict) -> PublishedState {
    PublishedState {
        wip: verdict.wip,
        override_active: verdict.override_active,
    }
}
