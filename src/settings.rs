//! Settings loaded once at startup from `nbsync.yml`.
//!
//! The file lives in the sync root; an `NBSYNC_`-prefixed environment
//! overlay takes precedence over file values. The resulting [`Settings`]
//! value is constructed once and passed by reference into every component
//! that needs it.

use crate::error::SyncError;
use crate::logging::LoggingConfig;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Branch names recognized as the production and development lines.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchNames {
    pub prod: String,
    pub dev: String,
}

/// Workspace base folders per branch class. `branches` is a prefix to which
/// the feature branch name and a trailing slash are appended. `envfiles`
/// holds the well-known default env files used by bootstrap.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteFolders {
    pub prod: String,
    pub dev: String,
    pub branches: String,
    pub envfiles: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Workspace REST base URL, e.g. `https://workspace.example.com/api/2.0/`.
    pub api_url: String,
    pub branches: BranchNames,
    pub remote_folders: RemoteFolders,
    /// Normalized path of the designated env file within a target.
    pub envfile_path: String,
    /// Local source extension for notebooks.
    #[serde(default = "default_extension")]
    pub notebook_extension: String,
    /// Bounded pool size for parallel download/delete phases.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Pull prompts for confirmation when more local notebooks than this
    /// would be deleted.
    #[serde(default = "default_delete_confirm_threshold")]
    pub delete_confirm_threshold: usize,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_extension() -> String {
    "py".to_string()
}

fn default_concurrency() -> usize {
    10
}

fn default_delete_confirm_threshold() -> usize {
    10
}

impl Settings {
    pub const FILE_NAME: &'static str = "nbsync.yml";

    /// Load `<root>/nbsync.yml` with the environment overlay.
    pub fn load(root: &Path) -> Result<Self, SyncError> {
        let path = root.join(Self::FILE_NAME);
        if !path.is_file() {
            return Err(SyncError::Config(format!(
                "no {} file found in {}",
                Self::FILE_NAME,
                root.display()
            )));
        }
        Self::load_from_file(&path)
    }

    /// Load settings from a specific file with the environment overlay.
    pub fn load_from_file(path: &Path) -> Result<Self, SyncError> {
        let builder = Config::builder()
            .add_source(File::from(path))
            .add_source(
                Environment::with_prefix("NBSYNC")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder
            .build()
            .map_err(|e| SyncError::Config(e.to_string()))?;
        config
            .try_deserialize()
            .map_err(|e| SyncError::Config(e.to_string()))
    }
}
