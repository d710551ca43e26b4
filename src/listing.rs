//! Tree listers: enumerate every tracked notebook in each store as a fresh
//! snapshot of normalized paths.

use crate::error::SyncError;
use crate::paths::{NotebookPath, PathCodec};
use crate::remote::{ObjectKind, WorkspaceStore};
use std::collections::BTreeSet;
use tracing::info;
use walkdir::{DirEntry, WalkDir};

/// The set of normalized paths present in one store at one instant.
/// Built fresh on every invocation, never cached across runs.
pub type TreeSnapshot = BTreeSet<NotebookPath>;

fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

/// Walk the local sync root, collecting every notebook source file.
/// Hidden directories are pruned entirely, descendants included.
pub fn list_local(codec: &PathCodec) -> Result<TreeSnapshot, SyncError> {
    info!(root = %codec.local_root().display(), "listing local notebooks");
    let mut snapshot = TreeSnapshot::new();
    for entry in WalkDir::new(codec.local_root())
        .into_iter()
        .filter_entry(|e| !is_hidden_dir(e))
    {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches_extension = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext == codec.extension())
            .unwrap_or(false);
        if matches_extension {
            snapshot.insert(codec.from_local(entry.path()));
        }
    }
    Ok(snapshot)
}

/// Descend the remote base folder breadth-first via an explicit worklist.
/// A missing base folder yields an empty snapshot (the branch may simply
/// never have been pushed).
pub async fn list_remote(
    store: &dyn WorkspaceStore,
    codec: &PathCodec,
) -> Result<TreeSnapshot, SyncError> {
    info!(base = codec.remote_base(), "listing workspace notebooks");
    let mut snapshot = TreeSnapshot::new();
    let mut pending = vec![codec.remote_base().trim_end_matches('/').to_string()];
    while let Some(dir) = pending.pop() {
        for object in store.list(&dir).await? {
            match object.kind {
                ObjectKind::Directory => pending.push(object.path),
                ObjectKind::Notebook => {
                    snapshot.insert(codec.from_remote(&object.path));
                }
                ObjectKind::Other => {}
            }
        }
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::ObjectInfo;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn codec(root: &Path) -> PathCodec {
        PathCodec::new("/teams/dev/", root, "py")
    }

    #[test]
    fn local_listing_filters_extension_and_hidden_dirs() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("etl")).unwrap();
        fs::create_dir_all(root.join(".git/objects")).unwrap();
        fs::write(root.join("top.py"), "x").unwrap();
        fs::write(root.join("etl/load.py"), "x").unwrap();
        fs::write(root.join("etl/notes.md"), "x").unwrap();
        fs::write(root.join(".git/objects/hook.py"), "x").unwrap();

        let snapshot = list_local(&codec(root)).unwrap();
        let paths: Vec<&str> = snapshot.iter().map(|p| p.as_str()).collect();
        assert_eq!(paths, vec!["etl/load", "top"]);
    }

    /// Fixed directory-to-children mapping standing in for the workspace.
    struct FixedStore {
        dirs: HashMap<String, Vec<ObjectInfo>>,
    }

    #[async_trait]
    impl WorkspaceStore for FixedStore {
        async fn list(&self, path: &str) -> Result<Vec<ObjectInfo>, SyncError> {
            Ok(self.dirs.get(path).cloned().unwrap_or_default())
        }
        async fn export(&self, _: &str) -> Result<Vec<u8>, SyncError> {
            unreachable!("listing never exports")
        }
        async fn import(&self, _: &str, _: &[u8], _: bool) -> Result<(), SyncError> {
            unreachable!()
        }
        async fn delete(&self, _: &str) -> Result<(), SyncError> {
            unreachable!()
        }
        async fn mkdirs(&self, _: &str) -> Result<(), SyncError> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn remote_listing_descends_directories_and_skips_others() {
        let mut dirs = HashMap::new();
        dirs.insert(
            "/teams/dev".to_string(),
            vec![
                ObjectInfo {
                    path: "/teams/dev/top".to_string(),
                    kind: ObjectKind::Notebook,
                },
                ObjectInfo {
                    path: "/teams/dev/etl".to_string(),
                    kind: ObjectKind::Directory,
                },
                ObjectInfo {
                    path: "/teams/dev/lib.jar".to_string(),
                    kind: ObjectKind::Other,
                },
            ],
        );
        dirs.insert(
            "/teams/dev/etl".to_string(),
            vec![ObjectInfo {
                path: "/teams/dev/etl/load".to_string(),
                kind: ObjectKind::Notebook,
            }],
        );
        let store = FixedStore { dirs };

        let dir = TempDir::new().unwrap();
        let snapshot = list_remote(&store, &codec(dir.path())).await.unwrap();
        let paths: Vec<&str> = snapshot.iter().map(|p| p.as_str()).collect();
        assert_eq!(paths, vec!["etl/load", "top"]);
    }

    #[tokio::test]
    async fn missing_base_folder_is_an_empty_snapshot() {
        let store = FixedStore {
            dirs: HashMap::new(),
        };
        let dir = TempDir::new().unwrap();
        let snapshot = list_remote(&store, &codec(dir.path())).await.unwrap();
        assert!(snapshot.is_empty());
    }
}
