//! Node and event descriptors crossing the host boundary.

use serde::{Deserialize, Serialize};
use uigraft_core_types::NodeId;

/// Description of a node to create in the host tree.
///
/// `markup` is trusted, author-supplied content; the engine performs no
/// sanitization on it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NodeSpec {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// Tooltip text.
    pub title: Option<String>,
    /// Rendered inner content.
    pub markup: String,
    /// Inline style text.
    pub style: Option<String>,
}

impl NodeSpec {
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }
}

/// What changed in one mutation record.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum MutationKind {
    /// Children were added or removed under the target.
    ChildList,
    /// A named attribute on the target changed.
    Attributes { name: String },
}

/// One observed change in the host tree.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MutationRecord {
    pub target: NodeId,
    pub kind: MutationKind,
}

/// A batch of mutation records delivered together.
///
/// The engine treats batches as level triggers: arrival means "something
/// changed, re-query the tree", never "this exact node changed".
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MutationBatch {
    pub records: Vec<MutationRecord>,
}

impl MutationBatch {
    pub fn single(target: NodeId, kind: MutationKind) -> Self {
        Self {
            records: vec![MutationRecord { target, kind }],
        }
    }
}

/// A user interaction with a node (a click, in host terms).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub node: NodeId,
}
