//! Detection of the `@wip ready for review` override directive.
//!
//! The directive is a toggle stored entirely in the pull request description:
//! it is active while the description ends with it and inactive once it is
//! edited away, so it can always be re-derived from the current snapshot.

use std::sync::OnceLock;

use regex::Regex;

/// The directive as users type it.
pub const OVERRIDE_DIRECTIVE: &str = "@wip ready for review";

fn directive_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:^|\s)@wip\s+ready\s+for\s+review\s*\z")
            .expect("override directive pattern is valid")
    })
}

/// Whether `description` ends with the override directive.
pub fn has_override_directive(description: &str) -> bool {
    directive_regex().is_match(description)
}
