//! Configuration resolution per plan tier.
//!
//! The free plan always uses the default configuration without touching the
//! repository. The pro plan reads [`CONFIG_PATH`]; a missing, malformed or
//! unreadable file falls back to the defaults and is never a hard failure.

use wip_state::{ConfigStore, PlanTier, RepoRef};

use crate::domain::{ConfigError, ConfigSource, Configuration, ResolvedConfig, CONFIG_PATH};
use crate::obs::emit_config_fallback;

/// Resolve a configuration from already-fetched file contents.
pub fn resolve_from_contents(plan: PlanTier, contents: Option<&str>) -> ResolvedConfig {
    match (plan, contents) {
        (PlanTier::Free, _) => ResolvedConfig::free_plan(),
        (PlanTier::Pro, None) => ResolvedConfig {
            configuration: Configuration::default(),
            source: ConfigSource::Default,
        },
        (PlanTier::Pro, Some(raw)) => match Configuration::from_yaml(raw) {
            Ok(configuration) => ResolvedConfig {
                configuration,
                source: ConfigSource::Repository {
                    raw: raw.to_string(),
                },
            },
            Err(e) => invalid(e),
        },
    }
}

/// Resolve the configuration for `repo`, reading the file only on the pro
/// plan.
pub async fn resolve_configuration(
    plan: PlanTier,
    store: &dyn ConfigStore,
    repo: &RepoRef,
) -> ResolvedConfig {
    if !plan.is_pro() {
        return ResolvedConfig::free_plan();
    }

    match store.read_file(repo, CONFIG_PATH).await {
        Ok(contents) => {
            let resolved = resolve_from_contents(plan, contents.as_deref());
            if let ConfigSource::Invalid { error } = &resolved.source {
                emit_config_fallback(&repo.to_string(), error);
            }
            resolved
        }
        Err(e) => {
            let resolved = invalid(ConfigError::Unreadable(e.to_string()));
            emit_config_fallback(&repo.to_string(), &e);
            resolved
        }
    }
}

fn invalid(error: ConfigError) -> ResolvedConfig {
    ResolvedConfig {
        configuration: Configuration::default(),
        source: ConfigSource::Invalid {
            error: error.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Location;
    use wip_state::fakes::MemoryConfigStore;
    use wip_state::ErrorKind;

    fn repo() -> RepoRef {
        RepoRef::new("octo", "hello-world")
    }

    #[test]
    fn free_plan_ignores_contents() {
        let resolved = resolve_from_contents(PlanTier::Free, Some("terms: draft"));
        assert_eq!(resolved, ResolvedConfig::free_plan());
    }

    #[test]
    fn pro_plan_applies_valid_file_verbatim() {
        let raw = "terms: draft\nlocations: [title, label_name]\n";
        let resolved = resolve_from_contents(PlanTier::Pro, Some(raw));
        assert_eq!(resolved.configuration.terms(), &["draft"]);
        assert!(resolved.configuration.is_active(Location::LabelName));
        assert_eq!(resolved.source.raw(), Some(raw));
    }

    #[test]
    fn pro_plan_without_file_uses_defaults() {
        let resolved = resolve_from_contents(PlanTier::Pro, None);
        assert_eq!(resolved.configuration, Configuration::default());
        assert_eq!(resolved.source, ConfigSource::Default);
    }

    #[test]
    fn pro_plan_with_malformed_file_falls_back() {
        let resolved = resolve_from_contents(PlanTier::Pro, Some("terms: [wip"));
        assert_eq!(resolved.configuration, Configuration::default());
        assert!(matches!(resolved.source, ConfigSource::Invalid { .. }));
    }

    #[tokio::test]
    async fn free_plan_never_reads_the_store() {
        let store = MemoryConfigStore::new().with_file(&repo(), CONFIG_PATH, "terms: draft");
        let resolved = resolve_configuration(PlanTier::Free, &store, &repo()).await;
        assert_eq!(resolved.source, ConfigSource::FreePlan);
        assert_eq!(store.read_count(), 0);
    }

    #[tokio::test]
    async fn pro_plan_reads_the_store() {
        let store = MemoryConfigStore::new().with_file(&repo(), CONFIG_PATH, "terms: draft");
        let resolved = resolve_configuration(PlanTier::Pro, &store, &repo()).await;
        assert_eq!(resolved.configuration.terms(), &["draft"]);
        assert_eq!(store.read_count(), 1);
    }

    #[tokio::test]
    async fn unreadable_store_falls_back() {
        let store = MemoryConfigStore::new();
        store.fail_with(ErrorKind::Transport);
        let resolved = resolve_configuration(PlanTier::Pro, &store, &repo()).await;
        assert_eq!(resolved.configuration, Configuration::default());
        match resolved.source {
            ConfigSource::Invalid { error } => assert!(error.contains("could not be read")),
            other => panic!("expected invalid source, got {other:?}"),
        }
    }
}
