//! Error taxonomy shared by the mind-map crates.
//!
//! None of these are fatal: link and history errors are absorbed by the
//! caller, and an import error leaves the graph untouched.

use crate::id::NodeId;
use thiserror::Error;

/// A link could not be created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("cannot link {source_id} -> {target_id}: endpoint missing")]
    MissingEndpoint { source_id: NodeId, target_id: NodeId },
}

/// A mind-map file could not be loaded.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("malformed mind map file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Undo below the first entry or redo past the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryBoundsError {
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
}
