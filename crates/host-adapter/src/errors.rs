//! Error types for the host boundary.

use thiserror::Error;
use uigraft_core_types::NodeId;

/// Failures surfaced by a host port implementation.
#[derive(Debug, Error, Clone)]
pub enum HostError {
    /// The referenced node no longer exists in the host tree.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// The node exists but has no parent, so sibling placement is impossible.
    #[error("node is detached: {0}")]
    Detached(NodeId),

    /// An event channel to the host was closed.
    #[error("host channel closed: {0}")]
    ChannelClosed(String),

    /// Anything the host cannot express more precisely.
    #[error("host internal error: {0}")]
    Internal(String),
}
