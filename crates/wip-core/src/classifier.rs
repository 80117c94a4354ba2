//! Classification of a pull request snapshot into a [`Verdict`].

use crate::domain::{PullRequestSnapshot, ResolvedConfig, Verdict};
use crate::override_directive::has_override_directive;
use crate::signal::extract_signal;

/// Classify a pull request.
///
/// Total: the absence of a match is a valid "ready" outcome. The override
/// directive only takes effect when a term matched, so a stray directive on a
/// ready pull request does not produce an override state.
pub fn classify(snapshot: &PullRequestSnapshot, resolved: &ResolvedConfig) -> Verdict {
    let signal = extract_signal(snapshot, &resolved.configuration);
    let directive = signal.is_some() && has_override_directive(&snapshot.description);
    Verdict::new(signal, directive, resolved.source.clone())
}
