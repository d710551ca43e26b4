//! Error taxonomy for sync operations.
//!
//! Every failure surfaces to the CLI as a terminated run with a readable
//! message. The only conditions swallowed on purpose are workspace
//! "resource not found" responses on list/delete, which the client maps to
//! empty results before errors are ever constructed.

use thiserror::Error;

/// Top-level error type for a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Missing or unreadable settings; raised before any store access.
    #[error("configuration error: {0}")]
    Config(String),

    /// The workspace rejected our credentials.
    #[error(
        "unauthorized call to the workspace API \
         (set NBSYNC_USER/NBSYNC_PASS or a netrc entry, and check the \
         credentials are the ones the workspace expects)"
    )]
    Unauthorized,

    /// Any non-ignored failure response from the workspace. Mutations already
    /// applied in the current run are not rolled back.
    #[error("workspace API error: {0}")]
    Remote(String),

    /// The source store has nothing to transfer; no mutation attempted.
    #[error("{0}")]
    EmptySource(String),

    /// The user declined a confirmation prompt; no mutation attempted.
    #[error("aborted by user")]
    Aborted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
