//! Branch context and git collaborators.
//!
//! The active branch is read once per run and resolved through the settings
//! lookup table into a plain [`BranchContext`] value; nothing downstream
//! re-inspects branch strings. Git is also the staging collaborator: after a
//! successful pull every local change is staged in one call.

use crate::error::SyncError;
use crate::settings::Settings;
use git2::{IndexAddOption, Repository};
use std::path::{Path, PathBuf};

/// Which class of workspace folder the branch maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchClass {
    Production,
    Development,
    Feature,
}

/// Resolved once per invocation; consumed thereafter as plain data.
#[derive(Debug, Clone)]
pub struct BranchContext {
    pub branch: String,
    pub class: BranchClass,
    /// Workspace base folder for this branch, with trailing slash.
    pub remote_base: String,
}

impl BranchContext {
    pub fn resolve(branch: &str, settings: &Settings) -> Self {
        let (class, remote_base) = if branch == settings.branches.prod {
            (BranchClass::Production, settings.remote_folders.prod.clone())
        } else if branch == settings.branches.dev {
            (BranchClass::Development, settings.remote_folders.dev.clone())
        } else {
            (
                BranchClass::Feature,
                format!("{}{}/", settings.remote_folders.branches, branch),
            )
        };
        Self {
            branch: branch.to_string(),
            class,
            remote_base,
        }
    }

    pub fn is_production(&self) -> bool {
        self.class == BranchClass::Production
    }
}

/// Name of the branch currently checked out at `root`.
pub fn active_branch(root: &Path) -> Result<String, SyncError> {
    let repo = Repository::open(root)
        .map_err(|e| SyncError::Config(format!("{} is not a git repository: {}", root.display(), e)))?;
    let head = repo.head()?;
    head.shorthand()
        .map(str::to_owned)
        .ok_or_else(|| SyncError::Config("HEAD is not a named branch".to_string()))
}

/// Side-effect notification after a pull: stage every change in the index.
pub trait ChangeStager {
    fn stage_all(&self) -> Result<(), SyncError>;
}

/// Stages via the git index, equivalent to `git add -A`.
pub struct GitStager {
    root: PathBuf,
}

impl GitStager {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl ChangeStager for GitStager {
    fn stage_all(&self) -> Result<(), SyncError> {
        let repo = Repository::open(&self.root)?;
        let mut index = repo.index()?;
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"].iter(), None)?;
        index.write()?;
        Ok(())
    }
}
