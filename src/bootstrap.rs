//! First-push bootstrap: clone a default env file into a fresh target.
//!
//! Runs only after a successful push when the remote target had no env file
//! before the run. Best-effort: the push itself is already complete and is
//! never rolled back on a bootstrap failure.

use crate::branch::BranchContext;
use crate::error::SyncError;
use crate::remote::WorkspaceStore;
use crate::settings::Settings;
use tracing::info;

/// Copy the branch-appropriate default env file from the well-known
/// `envfiles` folder into the target under the configured env-file path.
pub async fn clone_envfile(
    store: &dyn WorkspaceStore,
    settings: &Settings,
    ctx: &BranchContext,
) -> Result<(), SyncError> {
    let default_name = if ctx.is_production() {
        "env_prod"
    } else {
        "env_dev"
    };
    info!(source = default_name, "cloning default env file into the target");

    let source = format!("{}{}", settings.remote_folders.envfiles, default_name);
    let content = store.export(&source).await?;

    let destination = format!("{}{}", ctx.remote_base, settings.envfile_path);
    store.import(&destination, &content, true).await
}
