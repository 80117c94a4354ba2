//! Per-repository WIP configuration.
//!
//! A configuration names the terms that mark a pull request as work in
//! progress and the places they are searched for. Repositories on the pro plan
//! may override the defaults with a `.github/wip.yml` file:
//!
//! ```yaml
//! terms:
//!   - wip
//!   - do not merge
//! locations:
//!   - title
//!   - label_name
//! ```
//!
//! Both keys accept a single scalar as well as a sequence.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Repository path of the configuration file.
pub const CONFIG_PATH: &str = ".github/wip.yml";

/// Terms applied when no repository configuration is in effect.
pub const DEFAULT_TERMS: [&str; 3] = ["wip", "work in progress", "🚧"];

/// The default configuration in the file format, as shown in check runs.
pub const DEFAULT_CONFIG_YAML: &str = "terms:\n- wip\n- work in progress\n- 🚧\nlocations:\n- title\n";

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// Where a term is searched for.
///
/// Declaration order is the search priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Title,
    LabelName,
    CommitSubject,
}

impl Location {
    /// All locations in search priority order.
    pub const PRIORITY: [Location; 3] = [
        Location::Title,
        Location::LabelName,
        Location::CommitSubject,
    ];

    /// Key used in the configuration file.
    pub fn key(self) -> &'static str {
        match self {
            Location::Title => "title",
            Location::LabelName => "label_name",
            Location::CommitSubject => "commit_subject",
        }
    }

    /// Human-readable name used in check run summaries.
    pub fn label(self) -> &'static str {
        match self {
            Location::Title => "title",
            Location::LabelName => "label",
            Location::CommitSubject => "commit subject",
        }
    }
}

impl FromStr for Location {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Location::Title),
            "label_name" | "label" => Ok(Location::LabelName),
            "commit_subject" => Ok(Location::CommitSubject),
            other => Err(ConfigError::UnknownLocation(other.to_string())),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Effective search configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
    terms: Vec<String>,
    locations: BTreeSet<Location>,
}

impl Configuration {
    /// Build a configuration, trimming terms and dropping blank or
    /// case-insensitive duplicates (first spelling wins).
    pub fn new<I, S>(terms: I, locations: BTreeSet<Location>) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let terms: Vec<String> = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .filter(|t| seen.insert(t.to_lowercase()))
            .collect();

        if terms.is_empty() {
            return Err(ConfigError::NoTerms);
        }
        if locations.is_empty() {
            return Err(ConfigError::NoLocations);
        }

        Ok(Self { terms, locations })
    }

    /// Parse the contents of a `.github/wip.yml` file.
    ///
    /// A missing key takes its default value.
    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Err(ConfigError::Empty);
        }
        let file: ConfigFile = serde_yaml::from_str(raw)?;

        let terms = match file.terms {
            Some(terms) => terms.into_vec(),
            None => DEFAULT_TERMS.iter().map(|t| t.to_string()).collect(),
        };
        let locations = match file.locations {
            Some(locations) => locations
                .into_vec()
                .iter()
                .map(|l| l.parse::<Location>())
                .collect::<Result<BTreeSet<_>, _>>()?,
            None => default_locations(),
        };

        Self::new(terms, locations)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn locations(&self) -> &BTreeSet<Location> {
        &self.locations
    }

    pub fn is_active(&self, location: Location) -> bool {
        self.locations.contains(&location)
    }

    /// Render the configuration in the file format.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            terms: DEFAULT_TERMS.iter().map(|t| t.to_string()).collect(),
            locations: default_locations(),
        }
    }
}

fn default_locations() -> BTreeSet<Location> {
    BTreeSet::from([Location::Title])
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    terms: Option<OneOrMany>,
    #[serde(default)]
    locations: Option<OneOrMany>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// How the effective configuration was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigSource {
    /// Free plan: repository file ignored.
    FreePlan,
    /// Pro plan without a configuration file.
    Default,
    /// Pro plan, configuration file applied verbatim.
    Repository { raw: String },
    /// Pro plan, configuration file rejected; defaults applied.
    Invalid { error: String },
}

impl ConfigSource {
    /// Raw file contents, when a repository file was applied.
    pub fn raw(&self) -> Option<&str> {
        match self {
            ConfigSource::Repository { raw } => Some(raw),
            _ => None,
        }
    }
}

/// A configuration together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    pub configuration: Configuration,
    pub source: ConfigSource,
}

impl ResolvedConfig {
    pub fn free_plan() -> Self {
        Self {
            configuration: Configuration::default(),
            source: ConfigSource::FreePlan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_matches_documented_defaults() {
        let config = Configuration::default();
        assert_eq!(config.terms(), &["wip", "work in progress", "🚧"]);
        assert!(config.is_active(Location::Title));
        assert!(!config.is_active(Location::LabelName));
        assert!(!config.is_active(Location::CommitSubject));
    }

    #[test]
    fn parses_sequences() {
        let config = Configuration::from_yaml(
            "terms:\n  - draft\n  - DO NOT MERGE\nlocations:\n  - title\n  - label_name\n",
        )
        .unwrap();
        assert_eq!(config.terms(), &["draft", "DO NOT MERGE"]);
        assert!(config.is_active(Location::Title));
        assert!(config.is_active(Location::LabelName));
    }

    #[test]
    fn parses_scalars_and_label_alias() {
        let config = Configuration::from_yaml("terms: draft\nlocations: label\n").unwrap();
        assert_eq!(config.terms(), &["draft"]);
        assert_eq!(
            config.locations().iter().copied().collect::<Vec<_>>(),
            vec![Location::LabelName]
        );
    }

    #[test]
    fn missing_keys_take_defaults() {
        let config = Configuration::from_yaml("locations: commit_subject\n").unwrap();
        assert_eq!(config.terms(), Configuration::default().terms());
        assert!(config.is_active(Location::CommitSubject));
        assert!(!config.is_active(Location::Title));
    }

    #[test]
    fn terms_are_deduplicated_case_insensitively() {
        let config =
            Configuration::from_yaml("terms: [WIP, wip, '  ', Draft, draft]\n").unwrap();
        assert_eq!(config.terms(), &["WIP", "Draft"]);
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(Configuration::from_yaml("   \n"), Err(ConfigError::Empty));
        assert!(matches!(
            Configuration::from_yaml("terms: [wip"),
            Err(ConfigError::Yaml(_))
        ));
        assert_eq!(
            Configuration::from_yaml("locations: body\n"),
            Err(ConfigError::UnknownLocation("body".to_string()))
        );
        assert_eq!(
            Configuration::from_yaml("terms: []\n"),
            Err(ConfigError::NoTerms)
        );
        assert_eq!(
            Configuration::from_yaml("locations: []\n"),
            Err(ConfigError::NoLocations)
        );
    }

    #[test]
    fn default_yaml_parses_to_default() {
        assert_eq!(
            Configuration::from_yaml(DEFAULT_CONFIG_YAML),
            Ok(Configuration::default())
        );
    }

    #[test]
    fn yaml_rendering_reparses() {
        let config = Configuration::new(
            ["#wip", "[WIP]", "wip: later", "*draft", "!hold", "- todo", "🚧"],
            BTreeSet::from([Location::Title, Location::LabelName, Location::CommitSubject]),
        )
        .unwrap();
        let rendered = config.to_yaml().unwrap();
        assert_eq!(Configuration::from_yaml(&rendered), Ok(config));

        let defaults = Configuration::default().to_yaml().unwrap();
        assert_eq!(
            Configuration::from_yaml(&defaults),
            Ok(Configuration::default())
        );
    }

    #[test]
    fn raw_is_only_exposed_for_repository_source() {
        let source = ConfigSource::Repository {
            raw: "terms: wip".to_string(),
        };
        assert_eq!(source.raw(), Some("terms: wip"));
        assert_eq!(ConfigSource::Default.raw(), None);
        assert_eq!(ConfigSource::FreePlan.raw(), None);
    }
}
