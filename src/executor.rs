//! Sync executor: the phase-ordered state machine of one mirror run.
//!
//! Per run, strictly in order: diff, safety gate, transfers, deletions,
//! and (push only) env-file bootstrap. Transfers run before deletions so a
//! removed notebook never lacks a replacement longer than necessary.
//!
//! Uploads are strictly serial: the workspace races on concurrent
//! directory/file creation. Downloads and deletes touch disjoint paths and
//! run with bounded parallelism. The first failed transfer or delete aborts
//! the remaining batch; already-applied mutations are not rolled back.

use crate::branch::{BranchContext, ChangeStager};
use crate::bootstrap;
use crate::diff::{self, Comparison};
use crate::error::SyncError;
use crate::gate::{self, Prompt};
use crate::listing;
use crate::paths::{NotebookPath, PathCodec};
use crate::remote::WorkspaceStore;
use crate::settings::Settings;
use futures::stream::{self, TryStreamExt};
use tracing::{info, warn};

pub struct SyncExecutor<'a> {
    store: &'a dyn WorkspaceStore,
    codec: &'a PathCodec,
    ctx: &'a BranchContext,
    settings: &'a Settings,
    prompt: &'a dyn Prompt,
    stager: &'a dyn ChangeStager,
}

impl<'a> SyncExecutor<'a> {
    pub fn new(
        store: &'a dyn WorkspaceStore,
        codec: &'a PathCodec,
        ctx: &'a BranchContext,
        settings: &'a Settings,
        prompt: &'a dyn Prompt,
        stager: &'a dyn ChangeStager,
    ) -> Self {
        Self {
            store,
            codec,
            ctx,
            settings,
            prompt,
            stager,
        }
    }

    fn envfile(&self) -> NotebookPath {
        NotebookPath::new(self.settings.envfile_path.clone())
    }

    /// Take fresh snapshots of both stores and partition them.
    /// Read-only; this backs the `compare` command as well as both syncs.
    pub async fn compare(&self) -> Result<Comparison, SyncError> {
        let local = listing::list_local(self.codec)?;
        let remote = listing::list_remote(self.store, self.codec).await?;
        Ok(diff::compare(&local, &remote, &self.envfile()))
    }

    /// Mirror the workspace down to the local tree, then stage all changes.
    pub async fn pull(&self) -> Result<(), SyncError> {
        let cmp = self.compare().await?;
        gate::check_pull(&cmp, self.settings.delete_confirm_threshold, self.prompt)?;

        let transfers = cmp.pull_transfers();
        info!(count = transfers.len(), "downloading notebooks");
        stream::iter(transfers.into_iter().map(Ok::<_, SyncError>))
            .try_for_each_concurrent(self.settings.concurrency, |path| async move {
                self.download(&path).await
            })
            .await?;

        info!(count = cmp.only_local.len(), "deleting local-only notebooks");
        stream::iter(cmp.only_local.iter().cloned().map(Ok::<_, SyncError>))
            .try_for_each_concurrent(self.settings.concurrency, |path| async move {
                self.remove_local(&path).await
            })
            .await?;

        info!("staging all changes");
        self.stager.stage_all()?;
        Ok(())
    }

    /// Mirror the local tree up to the workspace, bootstrapping the env
    /// file if the target lacked one.
    pub async fn push(&self, force: bool) -> Result<(), SyncError> {
        let cmp = self.compare().await?;
        gate::check_push(&cmp, self.ctx, force, self.prompt)?;

        let transfers = cmp.push_transfers();
        info!(count = transfers.len(), "uploading notebooks");
        for path in &transfers {
            self.upload(path).await?;
        }

        info!(count = cmp.only_remote.len(), "deleting workspace-only notebooks");
        stream::iter(cmp.only_remote.iter().cloned().map(Ok::<_, SyncError>))
            .try_for_each_concurrent(self.settings.concurrency, |path| async move {
                self.remove_remote(&path).await
            })
            .await?;

        if !cmp.remote_has_envfile {
            // Push is complete at this point; a failed bootstrap is
            // surfaced but does not fail the run.
            if let Err(e) = bootstrap::clone_envfile(self.store, self.settings, self.ctx).await {
                warn!(error = %e, "env file bootstrap failed; the push itself completed");
            }
        }
        Ok(())
    }

    async fn download(&self, path: &NotebookPath) -> Result<(), SyncError> {
        info!(notebook = %path, "downloading notebook");
        let content = self.store.export(&self.codec.to_remote(path)).await?;
        let local = self.codec.to_local(path);
        if let Some(parent) = local.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&local, &content).await?;
        Ok(())
    }

    async fn remove_local(&self, path: &NotebookPath) -> Result<(), SyncError> {
        info!(notebook = %path, "deleting local notebook");
        tokio::fs::remove_file(self.codec.to_local(path)).await?;
        Ok(())
    }

    async fn upload(&self, path: &NotebookPath) -> Result<(), SyncError> {
        info!(notebook = %path, "uploading notebook");
        let remote = self.codec.to_remote(path);
        if let Some((parent, _)) = remote.rsplit_once('/') {
            if !parent.is_empty() {
                self.store.mkdirs(parent).await?;
            }
        }
        let content = tokio::fs::read(self.codec.to_local(path)).await?;
        self.store.import(&remote, &content, true).await
    }

    async fn remove_remote(&self, path: &NotebookPath) -> Result<(), SyncError> {
        info!(notebook = %path, "deleting workspace notebook");
        self.store.delete(&self.codec.to_remote(path)).await
    }
}
