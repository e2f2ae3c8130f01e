//! The action registry: the engine's entire configuration surface.
//!
//! An [`ActionRegistry`] is an ordered, validated, immutable list of
//! [`ActionDefinition`]s, constructed once per process start. Iteration
//! order equals declaration order and is the rendering order; that ordering
//! is a contract, not incidental.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use uigraft_core_types::{ActionId, ExecutionDomain, PlacementMode};
use uigraft_host_adapter::{Selector, SelectorError};

use crate::errors::RegistryError;

/// A zero-argument procedure run directly in the privileged host context.
pub type PrivilegedFn = Arc<dyn Fn() + Send + Sync + 'static>;

/// An action's behavior, tagged by the execution domain it runs in.
#[derive(Clone)]
pub enum ActionBehavior {
    /// Runs in the host's own context with host capabilities available.
    Privileged(PrivilegedFn),
    /// Captured as source text so it can cross the domain boundary into the
    /// sandboxed content area as a one-shot submission.
    Content { source: String },
}

impl ActionBehavior {
    pub fn privileged(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self::Privileged(Arc::new(f))
    }

    pub fn content(source: impl Into<String>) -> Self {
        Self::Content {
            source: source.into(),
        }
    }

    pub fn domain(&self) -> ExecutionDomain {
        match self {
            ActionBehavior::Privileged(_) => ExecutionDomain::Privileged,
            ActionBehavior::Content { .. } => ExecutionDomain::Content,
        }
    }
}

impl fmt::Debug for ActionBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionBehavior::Privileged(_) => f.write_str("Privileged(..)"),
            ActionBehavior::Content { source } => {
                f.debug_struct("Content").field("source", source).finish()
            }
        }
    }
}

/// Where an action's control lands: a live-resolved anchor plus a mode.
#[derive(Clone, Debug)]
pub struct Placement {
    pub anchor: Selector,
    pub mode: PlacementMode,
}

impl Placement {
    pub fn new(anchor: Selector, mode: PlacementMode) -> Self {
        Self { anchor, mode }
    }

    /// Parse the anchor selector and build a placement in one step. This is
    /// the validation point for author-supplied selectors.
    pub fn parse(anchor: &str, mode: PlacementMode) -> Result<Self, SelectorError> {
        Ok(Self::new(Selector::parse(anchor)?, mode))
    }
}

/// The unit of configuration: one control and the behavior behind it.
#[derive(Clone, Debug)]
pub struct ActionDefinition {
    /// Unique key; also used as a class hook on the created control.
    pub id: ActionId,
    /// Tooltip text.
    pub title: String,
    /// Disabled definitions stay in the registry but never render.
    pub enabled: bool,
    pub behavior: ActionBehavior,
    /// Trusted markup rendered inside the control.
    pub display_markup: String,
    /// Space-separated style hooks for the control.
    pub display_class: String,
    /// Inline style text applied to the control.
    pub style_overrides: Option<String>,
    pub placement: Placement,
}

impl ActionDefinition {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        behavior: ActionBehavior,
        placement: Placement,
    ) -> Self {
        Self {
            id: ActionId::new(id),
            title: title.into(),
            enabled: true,
            behavior,
            display_markup: String::new(),
            display_class: String::new(),
            style_overrides: None,
            placement,
        }
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.display_markup = markup.into();
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.display_class = class.into();
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style_overrides = Some(style.into());
        self
    }

    /// Keep the definition in the registry as a template without rendering it.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Ordered, immutable action configuration, validated at construction.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: Vec<ActionDefinition>,
}

impl ActionRegistry {
    /// Build a registry, rejecting duplicate action ids. Anchor selectors
    /// are already proven well formed by the [`Selector`] type.
    pub fn new(actions: Vec<ActionDefinition>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for def in &actions {
            if !seen.insert(def.id.clone()) {
                return Err(RegistryError::DuplicateId(def.id.clone()));
            }
        }
        Ok(Self { actions })
    }

    /// All definitions in declaration order, disabled ones included.
    pub fn iter(&self) -> impl Iterator<Item = &ActionDefinition> {
        self.actions.iter()
    }

    /// Enabled definitions in declaration order.
    pub fn enabled(&self) -> impl Iterator<Item = &ActionDefinition> {
        self.actions.iter().filter(|def| def.enabled)
    }

    pub fn get(&self, id: &ActionId) -> Option<&ActionDefinition> {
        self.actions.iter().find(|def| &def.id == id)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(id: &str) -> ActionDefinition {
        ActionDefinition::new(
            id,
            "a test action",
            ActionBehavior::privileged(|| {}),
            Placement::parse("#toolbar", PlacementMode::Child).unwrap(),
        )
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = ActionRegistry::new(vec![noop("mute"), noop("mute")]).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateId(ActionId::new("mute")));
    }

    #[test]
    fn iteration_preserves_declaration_order() {
        let registry =
            ActionRegistry::new(vec![noop("zoom_out"), noop("zoom_reset"), noop("zoom_in")])
                .unwrap();
        let ids: Vec<&str> = registry.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["zoom_out", "zoom_reset", "zoom_in"]);
    }

    #[test]
    fn disabled_definitions_are_retained_but_filtered() {
        let registry = ActionRegistry::new(vec![noop("mute"), noop("template").disabled()]).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.get(&ActionId::new("template")).is_some());
        let enabled: Vec<&str> = registry.enabled().map(|d| d.id.as_str()).collect();
        assert_eq!(enabled, vec!["mute"]);
    }

    #[test]
    fn behavior_reports_its_domain() {
        assert_eq!(
            ActionBehavior::privileged(|| {}).domain(),
            uigraft_core_types::ExecutionDomain::Privileged
        );
        assert_eq!(
            ActionBehavior::content("window.location.reload()").domain(),
            uigraft_core_types::ExecutionDomain::Content
        );
    }

    #[test]
    fn placement_parse_rejects_bad_selectors() {
        assert!(Placement::parse("", PlacementMode::Before).is_err());
        assert!(Placement::parse("#a >", PlacementMode::After).is_err());
    }
}
