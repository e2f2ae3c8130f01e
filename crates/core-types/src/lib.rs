//! Shared identifiers and enums for the uigraft crates.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node in the host UI tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a sandboxed content area reachable through the host.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ContentTargetId(pub Uuid);

impl ContentTargetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContentTargetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContentTargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Author-chosen key identifying one action. Stable for the life of the
/// registry and doubled as a class hook on the control it produces.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub String);

impl ActionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which isolated context an action's behavior runs in.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ExecutionDomain {
    /// The host application's own context, with host capabilities available.
    Privileged,
    /// The sandboxed content area, reachable only by one-shot code submission.
    Content,
}

impl ExecutionDomain {
    pub fn name(&self) -> &'static str {
        match self {
            ExecutionDomain::Privileged => "privileged",
            ExecutionDomain::Content => "content",
        }
    }
}

/// Where a new control lands relative to its anchor element.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlacementMode {
    /// Immediately preceding sibling of the anchor.
    Before,
    /// Immediately following sibling of the anchor; appended to the anchor's
    /// parent when the anchor is the last child.
    After,
    /// Last child of the anchor.
    Child,
}

impl PlacementMode {
    pub fn name(&self) -> &'static str {
        match self {
            PlacementMode::Before => "before",
            PlacementMode::After => "after",
            PlacementMode::Child => "child",
        }
    }
}
