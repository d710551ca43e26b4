//! CLI surface: `compare`, `down`, and `up`.
//!
//! `compare` is report-only. `down` mirrors the workspace to the local tree;
//! `up` mirrors the local tree to the workspace. Each run is strictly
//! one-directional; the target is chosen by the active git branch.

use crate::branch::{self, BranchContext, GitStager};
use crate::error::SyncError;
use crate::executor::SyncExecutor;
use crate::gate::TerminalPrompt;
use crate::logging::LoggingConfig;
use crate::paths::PathCodec;
use crate::remote::WorkspaceClient;
use crate::report;
use crate::settings::Settings;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// nbsync - one-way mirror sync between a local notebook tree and a remote workspace
#[derive(Parser)]
#[command(name = "nbsync")]
#[command(about = "One-way mirror sync between a local notebook tree and a remote workspace")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sync root directory (contains nbsync.yml and the git repository)
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Configuration file path (overrides <root>/nbsync.yml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report which notebooks are where; no mutation
    Compare {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Sync workspace notebooks down to the local tree
    Down,
    /// Sync local notebooks up to the workspace
    Up {
        /// Skip the production-branch confirmation
        #[arg(long)]
        force: bool,
    },
}

/// Per-invocation context: settings, resolved branch, codec, and client,
/// all constructed once and shared by reference.
pub struct CliContext {
    root: PathBuf,
    settings: Settings,
    branch: BranchContext,
    codec: PathCodec,
    store: WorkspaceClient,
}

impl CliContext {
    pub fn new(root: PathBuf, config: Option<PathBuf>) -> Result<Self, SyncError> {
        let settings = match config {
            Some(path) => Settings::load_from_file(&path),
            None => Settings::load(&root),
        }?;
        let branch_name = branch::active_branch(&root)?;
        let branch = BranchContext::resolve(&branch_name, &settings);
        let codec = PathCodec::new(&branch.remote_base, &root, &settings.notebook_extension);
        let store = WorkspaceClient::new(&settings.api_url, &settings.notebook_extension);
        Ok(Self {
            root,
            settings,
            branch,
            codec,
            store,
        })
    }

    /// Logging config from settings, with CLI flags taking precedence.
    pub fn logging_config(
        &self,
        log_level: Option<String>,
        log_format: Option<String>,
    ) -> LoggingConfig {
        let mut config = self.settings.logging.clone();
        if let Some(level) = log_level {
            config.level = level;
        }
        if let Some(format) = log_format {
            config.format = format;
        }
        config
    }

    pub async fn execute(&self, command: &Commands) -> Result<String, SyncError> {
        let prompt = TerminalPrompt;
        let stager = GitStager::new(self.root.clone());
        let executor = SyncExecutor::new(
            &self.store,
            &self.codec,
            &self.branch,
            &self.settings,
            &prompt,
            &stager,
        );

        match command {
            Commands::Compare { format } => {
                let cmp = executor.compare().await?;
                match format.as_str() {
                    "json" => report::format_comparison_json(&cmp),
                    "text" => Ok(report::format_comparison_text(&cmp)),
                    other => Err(SyncError::Config(format!(
                        "invalid output format: {} (must be 'text' or 'json')",
                        other
                    ))),
                }
            }
            Commands::Down => {
                executor.pull().await?;
                Ok(format!(
                    "Pulled workspace notebooks from {} and staged all changes",
                    self.branch.remote_base
                ))
            }
            Commands::Up { force } => {
                executor.push(*force).await?;
                Ok(format!(
                    "Pushed local notebooks to {}",
                    self.branch.remote_base
                ))
            }
        }
    }
}
