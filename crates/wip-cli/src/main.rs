//! wip-status CLI
//!
//! The `wip` command classifies pull requests as work in progress and keeps
//! the "WIP" check run in sync.
//!
//! ## Commands
//!
//! - `classify`: classify a pull_request event offline and print the verdict
//! - `sync`: run the full pipeline against the GitHub API
//! - `check-config`: validate a `.github/wip.yml` file

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, Level};

use wip_core::{
    classify, compose, handle_pull_request_change, resolve_from_contents, Collaborators,
    Configuration, IndicatorPayload, Location, PlanTier, PullRequestEvent, SyncOutcome, Verdict,
};
use wip_github::{GitHubClient, GitHubConfig, DEFAULT_API_URL};

#[derive(Parser)]
#[command(name = "wip")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Work-in-progress status for pull requests", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a pull_request event without touching GitHub
    Classify {
        /// Path to the pull_request webhook payload (JSON)
        #[arg(short, long)]
        event: PathBuf,

        /// Plan tier of the installation
        #[arg(long, default_value = "free")]
        plan: PlanTier,

        /// Repository configuration file (only applied on the pro plan)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Commit messages of the pull request (JSON array of strings)
        #[arg(long)]
        commits: Option<PathBuf>,
    },

    /// Classify a pull_request event and update its check run on GitHub
    Sync {
        /// Path to the pull_request webhook payload (JSON)
        #[arg(short, long)]
        event: PathBuf,

        /// GitHub REST API base URL
        #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
        api_url: String,

        /// Installation token for repository access
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// App token for marketplace plan lookups
        #[arg(long, env = "WIP_APP_TOKEN", hide_env_values = true)]
        app_token: Option<String>,
    },

    /// Validate a configuration file and print the effective configuration
    CheckConfig {
        /// Path to the configuration file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    wip_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Classify {
            event,
            plan,
            config,
            commits,
        } => cmd_classify(&event, plan, config.as_deref(), commits.as_deref()),
        Commands::Sync {
            event,
            api_url,
            token,
            app_token,
        } => {
            let mut github = GitHubConfig::new(&api_url);
            github.token = token;
            github.app_token = app_token;
            cmd_sync(&event, github).await
        }
        Commands::CheckConfig { path } => cmd_check_config(&path),
    }
}

/// Verdict and payload printed by `wip classify`.
#[derive(Debug, Serialize)]
struct ClassifyReport {
    plan: PlanTier,
    verdict: Verdict,
    payload: IndicatorPayload,
}

fn read_event(path: &Path) -> Result<PullRequestEvent> {
    let body = std::fs::read(path).context(format!("Failed to read event file: {:?}", path))?;
    PullRequestEvent::from_slice(&body).context("Invalid pull_request event")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Classify an event offline
fn cmd_classify(
    event_path: &Path,
    plan: PlanTier,
    config_path: Option<&Path>,
    commits_path: Option<&Path>,
) -> Result<()> {
    let report = classify_report(event_path, plan, config_path, commits_path)?;
    print_json(&report)
}

fn classify_report(
    event_path: &Path,
    plan: PlanTier,
    config_path: Option<&Path>,
    commits_path: Option<&Path>,
) -> Result<ClassifyReport> {
    let event = read_event(event_path)?;

    let raw_config = config_path
        .map(|p| {
            std::fs::read_to_string(p).context(format!("Failed to read config file: {:?}", p))
        })
        .transpose()?;
    let resolved = resolve_from_contents(plan, raw_config.as_deref());

    let commit_messages: Vec<String> = match commits_path {
        Some(p) if resolved.configuration.is_active(Location::CommitSubject) => {
            let body = std::fs::read_to_string(p)
                .context(format!("Failed to read commits file: {:?}", p))?;
            serde_json::from_str(&body).context("Commits file must be a JSON array of strings")?
        }
        _ => Vec::new(),
    };

    let snapshot = event.snapshot(commit_messages);
    let verdict = classify(&snapshot, &resolved);
    let payload = compose(&verdict, plan, snapshot.number);

    Ok(ClassifyReport {
        plan,
        verdict,
        payload,
    })
}

/// Run the full sync pipeline against GitHub
async fn cmd_sync(event_path: &Path, github: GitHubConfig) -> Result<()> {
    let event = read_event(event_path)?;
    info!("Syncing {}", event.log_label());

    let client = GitHubClient::new(github).context("Failed to create GitHub client")?;
    let collaborators = Collaborators::from_backend(Arc::new(client));

    match handle_pull_request_change(&event, &collaborators).await {
        Ok(outcome) => {
            print_json(&outcome)?;
            if let SyncOutcome::Published { payload, .. } = &outcome {
                info!("Published \"{}\"", payload.title);
            }
            Ok(())
        }
        Err(failure) => {
            print_json(&failure)?;
            Err(failure).context("Sync failed")
        }
    }
}

/// Validate a configuration file
fn cmd_check_config(path: &Path) -> Result<()> {
    let report = check_config_report(path)?;
    print!("{report}");
    Ok(())
}

fn check_config_report(path: &Path) -> Result<String> {
    let configuration = load_config(path)?;
    let rendered = configuration
        .to_yaml()
        .context("Failed to render configuration")?;
    Ok(format!(
        "{} is valid. Effective configuration:\n\n{rendered}",
        path.display()
    ))
}

fn load_config(path: &Path) -> Result<Configuration> {
    let raw =
        std::fs::read_to_string(path).context(format!("Failed to read config file: {:?}", path))?;
    Configuration::from_yaml(&raw).context(format!("Invalid configuration in {:?}", path))
}
