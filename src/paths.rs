//! Path normalization between the local tree and the remote workspace.
//!
//! Local paths (`./folder/name.py`) and remote paths (`/base/folder/name`)
//! map into one shared key space of [`NotebookPath`] values, which is the
//! join key for diffing. Normalization is pure and idempotent; malformed
//! input is a caller bug, not a recoverable error.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// A normalized notebook key: forward-slash separated, relative to the
/// store's logical root, with no extension and no store prefix.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NotebookPath(String);

impl NotebookPath {
    /// Canonicalize a raw relative path: forward slashes, no leading `./`
    /// or `/`. Applying this to an already-normalized path is a no-op.
    pub fn new(raw: impl Into<String>) -> Self {
        let mut s: String = raw.into().replace('\\', "/");
        while let Some(rest) = s.strip_prefix("./") {
            s = rest.to_string();
        }
        let s = s.trim_start_matches('/').to_string();
        NotebookPath(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotebookPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Converts between [`NotebookPath`] keys and the two stores' concrete
/// naming schemes. One codec is built per run from the resolved branch
/// context and the sync root.
#[derive(Debug, Clone)]
pub struct PathCodec {
    remote_base: String,
    local_root: PathBuf,
    extension: String,
}

impl PathCodec {
    /// `remote_base` is the workspace folder for the active branch; a
    /// trailing slash is added if missing so prefix stripping is exact.
    pub fn new(remote_base: &str, local_root: &Path, extension: &str) -> Self {
        let remote_base = if remote_base.ends_with('/') {
            remote_base.to_string()
        } else {
            format!("{}/", remote_base)
        };
        Self {
            remote_base,
            local_root: local_root.to_path_buf(),
            extension: extension.to_string(),
        }
    }

    pub fn remote_base(&self) -> &str {
        &self.remote_base
    }

    pub fn local_root(&self) -> &Path {
        &self.local_root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Normalize a local filesystem path: strip the sync root and the
    /// notebook extension.
    pub fn from_local(&self, path: &Path) -> NotebookPath {
        let rel = path.strip_prefix(&self.local_root).unwrap_or(path);
        let mut s = rel.to_string_lossy().replace('\\', "/");
        let suffix = format!(".{}", self.extension);
        if let Some(stripped) = s.strip_suffix(&suffix) {
            s = stripped.to_string();
        }
        NotebookPath::new(s)
    }

    /// Normalize a remote absolute path: strip the branch base prefix.
    pub fn from_remote(&self, path: &str) -> NotebookPath {
        let rel = path.strip_prefix(&self.remote_base).unwrap_or(path);
        NotebookPath::new(rel)
    }

    /// Filesystem location of a notebook under the sync root.
    pub fn to_local(&self, path: &NotebookPath) -> PathBuf {
        self.local_root
            .join(format!("{}.{}", path.as_str(), self.extension))
    }

    /// Workspace absolute path of a notebook under the branch base.
    pub fn to_remote(&self, path: &NotebookPath) -> String {
        format!("{}{}", self.remote_base, path.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn codec() -> PathCodec {
        PathCodec::new("/teams/dev/", Path::new("/repo"), "py")
    }

    #[test]
    fn local_round_trip() {
        let c = codec();
        let p = NotebookPath::new("etl/jobs/load");
        assert_eq!(c.from_local(&c.to_local(&p)), p);
    }

    #[test]
    fn remote_round_trip() {
        let c = codec();
        let p = NotebookPath::new("etl/jobs/load");
        assert_eq!(c.from_remote(&c.to_remote(&p)), p);
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = NotebookPath::new("./a\\b/c");
        let twice = NotebookPath::new(once.as_str());
        assert_eq!(once, twice);
        assert_eq!(once.as_str(), "a/b/c");
    }

    #[test]
    fn from_local_strips_root_and_extension() {
        let c = codec();
        let p = c.from_local(Path::new("/repo/etl/load.py"));
        assert_eq!(p.as_str(), "etl/load");
    }

    #[test]
    fn from_remote_strips_base_prefix() {
        let c = codec();
        let p = c.from_remote("/teams/dev/etl/load");
        assert_eq!(p.as_str(), "etl/load");
    }

    #[test]
    fn base_without_trailing_slash_is_normalized() {
        let c = PathCodec::new("/teams/dev", Path::new("/repo"), "py");
        assert_eq!(c.to_remote(&NotebookPath::new("a")), "/teams/dev/a");
        assert_eq!(c.from_remote("/teams/dev/a").as_str(), "a");
    }

    proptest! {
        #[test]
        fn round_trip_law(segments in prop::collection::vec("[a-z][a-z0-9_]{0,8}", 1..4)) {
            let c = codec();
            let p = NotebookPath::new(segments.join("/"));
            prop_assert_eq!(c.from_local(&c.to_local(&p)), p.clone());
            prop_assert_eq!(c.from_remote(&c.to_remote(&p)), p);
        }
    }
}
