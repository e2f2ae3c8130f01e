//! Control builder: turn an [`ActionDefinition`] into a node descriptor.
//!
//! Pure construction. Placement and click wiring are the reconciler's job.

use uigraft_host_adapter::NodeSpec;

use crate::registry::ActionDefinition;

/// Fixed framework class carried by every injected control.
pub const CONTROL_MARKER_CLASS: &str = "uigraft-control";

/// Build the control node for `def`: a button carrying the definition's
/// markup, tooltip and style hooks, the action id as a class hook, and the
/// framework marker class.
pub fn build(def: &ActionDefinition) -> NodeSpec {
    let mut spec = NodeSpec::element("button")
        .with_title(def.title.clone())
        .with_markup(def.display_markup.clone());

    for class in def.display_class.split_whitespace() {
        spec = spec.with_class(class);
    }
    spec = spec
        .with_class(def.id.as_str())
        .with_class(CONTROL_MARKER_CLASS);

    if let Some(style) = &def.style_overrides {
        spec = spec.with_style(style.clone());
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ActionBehavior, Placement};
    use uigraft_core_types::PlacementMode;

    fn definition() -> ActionDefinition {
        ActionDefinition::new(
            "mute",
            "Toggle mute state",
            ActionBehavior::privileged(|| {}),
            Placement::parse("#footer", PlacementMode::Child).unwrap(),
        )
        .with_markup("🔊")
        .with_class("button-toolbar-small panel-action-mute")
        .with_style("fill: blue;")
    }

    #[test]
    fn control_carries_markup_title_and_style() {
        let spec = build(&definition());
        assert_eq!(spec.tag, "button");
        assert_eq!(spec.title.as_deref(), Some("Toggle mute state"));
        assert_eq!(spec.markup, "🔊");
        assert_eq!(spec.style.as_deref(), Some("fill: blue;"));
    }

    #[test]
    fn classes_are_display_hooks_plus_id_plus_marker() {
        let spec = build(&definition());
        assert_eq!(
            spec.classes,
            vec![
                "button-toolbar-small",
                "panel-action-mute",
                "mute",
                CONTROL_MARKER_CLASS
            ]
        );
    }
}
