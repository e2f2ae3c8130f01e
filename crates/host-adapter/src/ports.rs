//! The trait boundary between the engine and the host application.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use uigraft_core_types::{ContentTargetId, NodeId};

use crate::errors::HostError;
use crate::node::{Interaction, MutationBatch, NodeSpec};
use crate::selector::Selector;

/// Selector-based lookup and structural mutation of the live host UI tree.
///
/// Lookup is always against the live tree; implementations must not cache
/// resolution results across calls.
#[async_trait]
pub trait UiTree: Send + Sync {
    /// First node matching `selector` in document order, if any.
    async fn query(&self, selector: &Selector) -> Result<Option<NodeId>, HostError>;

    /// First descendant of `scope` matching `selector`, if any.
    async fn query_within(
        &self,
        scope: NodeId,
        selector: &Selector,
    ) -> Result<Option<NodeId>, HostError>;

    /// Create a detached node from `spec`.
    async fn create(&self, spec: NodeSpec) -> Result<NodeId, HostError>;

    /// Insert `node` as the immediately preceding sibling of `sibling`.
    async fn insert_before(&self, node: NodeId, sibling: NodeId) -> Result<(), HostError>;

    /// Append `node` as the last child of `parent`.
    async fn append_child(&self, parent: NodeId, node: NodeId) -> Result<(), HostError>;

    async fn parent_of(&self, node: NodeId) -> Result<Option<NodeId>, HostError>;

    async fn next_sibling(&self, node: NodeId) -> Result<Option<NodeId>, HostError>;
}

/// Subscription to structural/attribute mutation batches under the host root.
pub trait MutationFeed: Send + Sync {
    fn mutations(&self) -> broadcast::Receiver<MutationBatch>;
}

/// Subscription to user interactions with nodes in the host tree.
pub trait InteractionFeed: Send + Sync {
    fn interactions(&self) -> broadcast::Receiver<Interaction>;
}

/// One-shot code submission into the active sandboxed content area.
///
/// There is no structured return channel: a successful `submit` only means
/// the host accepted the code, never that it ran.
#[async_trait]
pub trait ContentBridge: Send + Sync {
    /// The currently active content area, if one is resolvable.
    async fn active_target(&self) -> Result<Option<ContentTargetId>, HostError>;

    /// Submit `code` for one-shot execution inside `target`. Fire-and-forget.
    async fn submit(&self, target: ContentTargetId, code: &str) -> Result<(), HostError>;
}

/// The full set of host ports the engine is wired against.
#[derive(Clone)]
pub struct HostPorts {
    pub ui: Arc<dyn UiTree>,
    pub mutations: Arc<dyn MutationFeed>,
    pub interactions: Arc<dyn InteractionFeed>,
    pub content: Arc<dyn ContentBridge>,
}
