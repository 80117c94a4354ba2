//! Classification verdict.

use serde::Serialize;

use super::config::{ConfigSource, Location};

/// The raw match that marked a pull request as work in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WipSignal {
    /// Where the term was found.
    pub location: Location,
    /// Full text of the matching title, label name or commit subject.
    pub text: String,
    /// The configured term that matched.
    pub term: String,
}

/// Outcome of classifying one pull request.
///
/// Invariants, upheld by [`Verdict::new`]:
/// - no signal ⇒ neither `wip` nor `override_active`;
/// - `override_active` ⇒ a signal exists and `wip` is false;
/// - `wip == signal.is_some() && !override_active`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    /// Effective state: a term matched and no override is active.
    pub wip: bool,
    /// Raw match, kept even when overridden so output can explain it.
    pub signal: Option<WipSignal>,
    #[serde(rename = "override")]
    pub override_active: bool,
    pub config_source: ConfigSource,
}

impl Verdict {
    /// Combine a raw match and the presence of an override directive.
    ///
    /// A directive without a raw match has nothing to override and is dropped.
    pub fn new(
        signal: Option<WipSignal>,
        override_directive: bool,
        config_source: ConfigSource,
    ) -> Self {
        let override_active = signal.is_some() && override_directive;
        Self {
            wip: signal.is_some() && !override_active,
            signal,
            override_active,
            config_source,
        }
    }

    /// Whether any configured term matched, regardless of override.
    pub fn raw_match(&self) -> bool {
        self.signal.is_some()
    }
}
