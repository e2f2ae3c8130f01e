//! In-memory implementation of the host ports.
//!
//! `MemoryHost` keeps a node arena behind a lock, publishes mutation batches
//! and interactions on broadcast channels, and records content submissions
//! instead of executing them. It backs the test suite and any embedder that
//! wants the engine without a live host.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tracing::debug;
use uigraft_core_types::{ContentTargetId, NodeId};

use crate::errors::HostError;
use crate::node::{Interaction, MutationBatch, MutationKind, NodeSpec};
use crate::ports::{ContentBridge, HostPorts, InteractionFeed, MutationFeed, UiTree};
use crate::selector::{Combinator, Compound, Selector, Step};

#[derive(Clone, Debug)]
struct NodeData {
    tag: String,
    id_attr: Option<String>,
    classes: Vec<String>,
    title: Option<String>,
    markup: String,
    style: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeData {
    fn from_spec(spec: NodeSpec) -> Self {
        Self {
            tag: spec.tag,
            id_attr: spec.id,
            classes: spec.classes,
            title: spec.title,
            markup: spec.markup,
            style: spec.style,
            parent: None,
            children: Vec::new(),
        }
    }
}

struct Arena {
    nodes: HashMap<NodeId, NodeData>,
    root: NodeId,
}

impl Arena {
    fn new() -> Self {
        let root = NodeId::new();
        let mut nodes = HashMap::new();
        nodes.insert(root, NodeData::from_spec(NodeSpec::element("root")));
        Self { nodes, root }
    }

    fn get(&self, node: NodeId) -> Result<&NodeData, HostError> {
        self.nodes.get(&node).ok_or(HostError::NodeNotFound(node))
    }

    fn get_mut(&mut self, node: NodeId) -> Result<&mut NodeData, HostError> {
        self.nodes
            .get_mut(&node)
            .ok_or(HostError::NodeNotFound(node))
    }

    fn detach(&mut self, node: NodeId) -> Option<NodeId> {
        let old_parent = self.nodes.get(&node).and_then(|d| d.parent)?;
        if let Some(parent_data) = self.nodes.get_mut(&old_parent) {
            parent_data.children.retain(|c| *c != node);
        }
        if let Some(data) = self.nodes.get_mut(&node) {
            data.parent = None;
        }
        Some(old_parent)
    }

    fn preorder(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![from];
        while let Some(node) = stack.pop() {
            out.push(node);
            if let Some(data) = self.nodes.get(&node) {
                for child in data.children.iter().rev() {
                    stack.push(*child);
                }
            }
        }
        out
    }

    fn compound_ok(&self, node: NodeId, compound: &Compound) -> bool {
        self.nodes
            .get(&node)
            .map(|d| compound.matches(&d.tag, d.id_attr.as_deref(), &d.classes))
            .unwrap_or(false)
    }

    /// Right-to-left selector matching with ancestor backtracking. The
    /// `boundary` node acts as the top of the tree for ancestor walks.
    fn steps_match(&self, steps: &[Step], node: NodeId, boundary: NodeId) -> bool {
        let Some((last, rest)) = steps.split_last() else {
            return false;
        };
        if !self.compound_ok(node, &last.compound) {
            return false;
        }
        if rest.is_empty() {
            return true;
        }
        match last.combinator {
            Combinator::Child => {
                if node == boundary {
                    return false;
                }
                match self.nodes.get(&node).and_then(|d| d.parent) {
                    Some(parent) => self.steps_match(rest, parent, boundary),
                    None => false,
                }
            }
            Combinator::Descendant => {
                let mut cur = node;
                while cur != boundary {
                    let Some(parent) = self.nodes.get(&cur).and_then(|d| d.parent) else {
                        break;
                    };
                    if self.steps_match(rest, parent, boundary) {
                        return true;
                    }
                    cur = parent;
                }
                false
            }
        }
    }

    /// First proper descendant of `scope` matching `selector`, document order.
    fn query_in(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.preorder(scope)
            .into_iter()
            .skip(1)
            .find(|node| self.steps_match(selector.steps(), *node, scope))
    }
}

#[derive(Default)]
struct ContentState {
    active: Option<ContentTargetId>,
    submissions: Vec<(ContentTargetId, String)>,
}

/// In-memory host implementing all four engine ports.
pub struct MemoryHost {
    arena: RwLock<Arena>,
    content: Mutex<ContentState>,
    mutation_tx: broadcast::Sender<MutationBatch>,
    interaction_tx: broadcast::Sender<Interaction>,
}

impl MemoryHost {
    pub fn new(capacity: usize) -> Arc<Self> {
        let (mutation_tx, _) = broadcast::channel(capacity.max(1));
        let (interaction_tx, _) = broadcast::channel(capacity.max(1));
        Arc::new(Self {
            arena: RwLock::new(Arena::new()),
            content: Mutex::new(ContentState::default()),
            mutation_tx,
            interaction_tx,
        })
    }

    /// The synthetic document root.
    pub fn root(&self) -> NodeId {
        self.arena.read().root
    }

    /// Bundle this host as the four engine ports.
    pub fn ports(self: &Arc<Self>) -> HostPorts {
        HostPorts {
            ui: self.clone(),
            mutations: self.clone(),
            interactions: self.clone(),
            content: self.clone(),
        }
    }

    /// Create a node from `spec` and attach it under `parent` in one step.
    pub fn append_element(&self, parent: NodeId, spec: NodeSpec) -> NodeId {
        let node = NodeId::new();
        let mut arena = self.arena.write();
        arena.nodes.insert(node, NodeData::from_spec(spec));
        if let Some(data) = arena.nodes.get_mut(&node) {
            data.parent = Some(parent);
        }
        if let Some(parent_data) = arena.nodes.get_mut(&parent) {
            parent_data.children.push(node);
        }
        drop(arena);
        self.publish_mutation(MutationBatch::single(parent, MutationKind::ChildList));
        node
    }

    /// Replace a node's class list, publishing an attribute mutation.
    pub fn set_classes(&self, node: NodeId, classes: &[&str]) {
        {
            let mut arena = self.arena.write();
            if let Some(data) = arena.nodes.get_mut(&node) {
                data.classes = classes.iter().map(|c| c.to_string()).collect();
            }
        }
        self.publish_mutation(MutationBatch::single(
            node,
            MutationKind::Attributes {
                name: "class".to_string(),
            },
        ));
    }

    /// Simulate a user click on `node`.
    pub fn click(&self, node: NodeId) {
        let _ = self.interaction_tx.send(Interaction { node });
    }

    /// Set (or clear) the active content area.
    pub fn set_active_content(&self, target: Option<ContentTargetId>) {
        self.content.lock().active = target;
    }

    /// All code submissions recorded so far, in order.
    pub fn submissions(&self) -> Vec<(ContentTargetId, String)> {
        self.content.lock().submissions.clone()
    }

    pub fn children_of(&self, node: NodeId) -> Vec<NodeId> {
        self.arena
            .read()
            .nodes
            .get(&node)
            .map(|d| d.children.clone())
            .unwrap_or_default()
    }

    pub fn classes_of(&self, node: NodeId) -> Vec<String> {
        self.arena
            .read()
            .nodes
            .get(&node)
            .map(|d| d.classes.clone())
            .unwrap_or_default()
    }

    /// Reconstruct a node's descriptor for assertions.
    pub fn spec_of(&self, node: NodeId) -> Option<NodeSpec> {
        let arena = self.arena.read();
        arena.nodes.get(&node).map(|d| NodeSpec {
            tag: d.tag.clone(),
            id: d.id_attr.clone(),
            classes: d.classes.clone(),
            title: d.title.clone(),
            markup: d.markup.clone(),
            style: d.style.clone(),
        })
    }

    fn publish_mutation(&self, batch: MutationBatch) {
        debug!(records = batch.records.len(), "mutation batch");
        let _ = self.mutation_tx.send(batch);
    }
}

#[async_trait]
impl UiTree for MemoryHost {
    async fn query(&self, selector: &Selector) -> Result<Option<NodeId>, HostError> {
        let arena = self.arena.read();
        Ok(arena.query_in(arena.root, selector))
    }

    async fn query_within(
        &self,
        scope: NodeId,
        selector: &Selector,
    ) -> Result<Option<NodeId>, HostError> {
        let arena = self.arena.read();
        arena.get(scope)?;
        Ok(arena.query_in(scope, selector))
    }

    async fn create(&self, spec: NodeSpec) -> Result<NodeId, HostError> {
        let node = NodeId::new();
        self.arena
            .write()
            .nodes
            .insert(node, NodeData::from_spec(spec));
        Ok(node)
    }

    async fn insert_before(&self, node: NodeId, sibling: NodeId) -> Result<(), HostError> {
        let parent = {
            let mut arena = self.arena.write();
            arena.get(node)?;
            let parent = arena
                .get(sibling)?
                .parent
                .ok_or(HostError::Detached(sibling))?;
            arena.detach(node);
            let index = {
                let parent_data = arena.get(parent)?;
                parent_data
                    .children
                    .iter()
                    .position(|c| *c == sibling)
                    .ok_or_else(|| HostError::Internal("sibling not in parent".to_string()))?
            };
            arena.get_mut(parent)?.children.insert(index, node);
            arena.get_mut(node)?.parent = Some(parent);
            parent
        };
        self.publish_mutation(MutationBatch::single(parent, MutationKind::ChildList));
        Ok(())
    }

    async fn append_child(&self, parent: NodeId, node: NodeId) -> Result<(), HostError> {
        {
            let mut arena = self.arena.write();
            arena.get(parent)?;
            arena.get(node)?;
            arena.detach(node);
            arena.get_mut(parent)?.children.push(node);
            arena.get_mut(node)?.parent = Some(parent);
        }
        self.publish_mutation(MutationBatch::single(parent, MutationKind::ChildList));
        Ok(())
    }

    async fn parent_of(&self, node: NodeId) -> Result<Option<NodeId>, HostError> {
        Ok(self.arena.read().get(node)?.parent)
    }

    async fn next_sibling(&self, node: NodeId) -> Result<Option<NodeId>, HostError> {
        let arena = self.arena.read();
        let Some(parent) = arena.get(node)?.parent else {
            return Ok(None);
        };
        let siblings = &arena.get(parent)?.children;
        let index = siblings.iter().position(|c| *c == node);
        Ok(index.and_then(|i| siblings.get(i + 1).copied()))
    }
}

impl MutationFeed for MemoryHost {
    fn mutations(&self) -> broadcast::Receiver<MutationBatch> {
        self.mutation_tx.subscribe()
    }
}

impl InteractionFeed for MemoryHost {
    fn interactions(&self) -> broadcast::Receiver<Interaction> {
        self.interaction_tx.subscribe()
    }
}

#[async_trait]
impl ContentBridge for MemoryHost {
    async fn active_target(&self) -> Result<Option<ContentTargetId>, HostError> {
        Ok(self.content.lock().active)
    }

    async fn submit(&self, target: ContentTargetId, code: &str) -> Result<(), HostError> {
        let mut content = self.content.lock();
        if content.active != Some(target) {
            return Err(HostError::Internal(format!(
                "content target {target} is not active"
            )));
        }
        content.submissions.push((target, code.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel_fixture(host: &MemoryHost) -> (NodeId, NodeId) {
        let root = host.root();
        let panels = host.append_element(root, NodeSpec::element("div").with_id("panels"));
        let panel = host.append_element(
            panels,
            NodeSpec::element("div")
                .with_class("panel")
                .with_class("webpanel"),
        );
        (panels, panel)
    }

    #[tokio::test]
    async fn query_matches_live_class_changes() {
        let host = MemoryHost::new(16);
        let (_, panel) = panel_fixture(&host);
        let sel = Selector::parse(".panel.webpanel.visible").unwrap();

        assert_eq!(host.query(&sel).await.unwrap(), None);
        host.set_classes(panel, &["panel", "webpanel", "visible"]);
        assert_eq!(host.query(&sel).await.unwrap(), Some(panel));
    }

    #[tokio::test]
    async fn child_combinator_requires_direct_parent() {
        let host = MemoryHost::new(16);
        let root = host.root();
        let switch = host.append_element(root, NodeSpec::element("div").with_id("switch"));
        let wrapper = host.append_element(switch, NodeSpec::element("div"));
        let button = host.append_element(
            wrapper,
            NodeSpec::element("button").with_class("preferences"),
        );

        let direct = Selector::parse("#switch > button.preferences").unwrap();
        let loose = Selector::parse("#switch button.preferences").unwrap();
        assert_eq!(host.query(&direct).await.unwrap(), None);
        assert_eq!(host.query(&loose).await.unwrap(), Some(button));
    }

    #[tokio::test]
    async fn query_within_excludes_the_scope_itself() {
        let host = MemoryHost::new(16);
        let (_, panel) = panel_fixture(&host);
        let sel = Selector::parse(".panel").unwrap();
        assert_eq!(host.query_within(panel, &sel).await.unwrap(), None);
    }

    #[tokio::test]
    async fn insert_before_places_between_siblings() {
        let host = MemoryHost::new(16);
        let root = host.root();
        let first = host.append_element(root, NodeSpec::element("span"));
        let second = host.append_element(root, NodeSpec::element("span"));

        let created = host.create(NodeSpec::element("button")).await.unwrap();
        host.insert_before(created, second).await.unwrap();
        assert_eq!(host.children_of(root), vec![first, created, second]);
        assert_eq!(host.next_sibling(first).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn insert_before_detached_sibling_fails() {
        let host = MemoryHost::new(16);
        let orphan = host.create(NodeSpec::element("div")).await.unwrap();
        let node = host.create(NodeSpec::element("button")).await.unwrap();
        assert!(matches!(
            host.insert_before(node, orphan).await,
            Err(HostError::Detached(_))
        ));
    }

    #[tokio::test]
    async fn structural_changes_publish_mutation_batches() {
        let host = MemoryHost::new(16);
        let mut feed = host.mutations();
        let root = host.root();
        host.append_element(root, NodeSpec::element("div"));

        let batch = feed.recv().await.unwrap();
        assert_eq!(batch.records[0].target, root);
        assert_eq!(batch.records[0].kind, MutationKind::ChildList);
    }

    #[tokio::test]
    async fn content_submission_requires_matching_active_target() {
        let host = MemoryHost::new(16);
        let target = ContentTargetId::new();
        assert!(host.submit(target, "x").await.is_err());

        host.set_active_content(Some(target));
        host.submit(target, "(reload)()").await.unwrap();
        assert_eq!(host.submissions(), vec![(target, "(reload)()".to_string())]);
    }
}
