//! nbsync: one-way mirror sync between a local notebook tree and a remote
//! workspace.
//!
//! Each invocation copies in exactly one direction (push or pull), deleting
//! anything in the target that is absent from the source, so the target
//! ends up an exact mirror of the tracked item set. The workspace folder is
//! chosen from the active git branch; destructive runs are gated behind
//! interactive confirmation.

pub mod bootstrap;
pub mod branch;
pub mod cli;
pub mod diff;
pub mod error;
pub mod executor;
pub mod gate;
pub mod listing;
pub mod logging;
pub mod paths;
pub mod remote;
pub mod report;
pub mod settings;
