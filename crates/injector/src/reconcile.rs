//! Region reconciliation: bring one region's decoration state in line with
//! "have this region's controls been injected yet".
//!
//! Per region the state machine is {UNDECORATED, DECORATED}. The marker
//! container's presence is both the state record and the idempotency guard;
//! there is no transition back, decoration is permanent for the region's
//! lifetime. Per-action failures (anchor missing, placement refused) degrade
//! to warn-and-skip and never abort the pass.

use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::{debug, info, warn};
use uigraft_core_types::NodeId;
use uigraft_host_adapter::{NodeSpec, Selector, UiTree};

use crate::bridge::ExecutionBridge;
use crate::builder;
use crate::errors::InjectError;
use crate::registry::{ActionDefinition, ActionRegistry};

/// Class of the marker container recording a region's DECORATED state.
pub const MARKER_CONTAINER_CLASS: &str = "uigraft-controls";

static MARKER_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(&format!(".{MARKER_CONTAINER_CLASS}")).expect("marker selector is well formed")
});

/// Runs decoration passes over target regions.
pub struct Reconciler {
    ui: Arc<dyn UiTree>,
    registry: Arc<ActionRegistry>,
    bridge: Arc<ExecutionBridge>,
}

impl Reconciler {
    pub fn new(
        ui: Arc<dyn UiTree>,
        registry: Arc<ActionRegistry>,
        bridge: Arc<ExecutionBridge>,
    ) -> Arc<Self> {
        Arc::new(Self {
            ui,
            registry,
            bridge,
        })
    }

    /// Decorate `region` if it is not decorated yet.
    ///
    /// Returns `Ok(true)` when a pass ran, `Ok(false)` when the marker was
    /// already present and the trigger was a no-op.
    pub async fn decorate_region(&self, region: NodeId) -> Result<bool, InjectError> {
        if self
            .ui
            .query_within(region, &MARKER_SELECTOR)
            .await?
            .is_some()
        {
            debug!(%region, "region already decorated");
            return Ok(false);
        }

        for def in self.registry.iter() {
            if !def.enabled {
                debug!(action = %def.id, "action disabled; not rendered");
                continue;
            }
            self.inject_action(region, def).await;
        }

        let marker = self
            .ui
            .create(NodeSpec::element("div").with_class(MARKER_CONTAINER_CLASS))
            .await?;
        self.ui.append_child(region, marker).await?;

        info!(%region, actions = self.registry.len(), "region decorated");
        Ok(true)
    }

    /// Resolve one action's anchor inside the region against the live tree
    /// and place its control. Every failure here is warn-and-skip: the rest
    /// of the pass still runs, and the next trigger gets another chance.
    async fn inject_action(&self, region: NodeId, def: &ActionDefinition) {
        let anchor = match self.ui.query_within(region, &def.placement.anchor).await {
            Ok(Some(anchor)) => anchor,
            Ok(None) => {
                warn!(
                    action = %def.id,
                    selector = %def.placement.anchor,
                    "anchor not found; skipping action this cycle"
                );
                return;
            }
            Err(err) => {
                warn!(action = %def.id, %err, "anchor query failed; skipping action");
                return;
            }
        };

        let control = match self.ui.create(builder::build(def)).await {
            Ok(control) => control,
            Err(err) => {
                warn!(action = %def.id, %err, "control creation failed; skipping action");
                return;
            }
        };

        if let Err(err) = crate::placement::place(
            self.ui.as_ref(),
            control,
            anchor,
            def.placement.mode,
        )
        .await
        {
            warn!(
                action = %def.id,
                mode = def.placement.mode.name(),
                %err,
                "placement failed; skipping action"
            );
            return;
        }

        self.bridge.bind(control, def.id.clone());
        debug!(action = %def.id, %control, domain = def.behavior.domain().name(), "control injected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ActionBehavior, Placement};
    use uigraft_core_types::PlacementMode;
    use uigraft_host_adapter::MemoryHost;

    fn child_of(selector: &str) -> Placement {
        Placement::parse(selector, PlacementMode::Child).unwrap()
    }

    fn action(id: &str, placement: Placement) -> ActionDefinition {
        ActionDefinition::new(id, "", ActionBehavior::privileged(|| {}), placement)
            .with_markup(id.to_uppercase())
    }

    async fn reconciler_for(
        host: &Arc<MemoryHost>,
        defs: Vec<ActionDefinition>,
    ) -> Arc<Reconciler> {
        let registry = Arc::new(ActionRegistry::new(defs).unwrap());
        let bridge = ExecutionBridge::new(registry.clone(), host.clone(), 8);
        Reconciler::new(host.clone(), registry, bridge)
    }

    #[tokio::test]
    async fn repeated_triggers_decorate_exactly_once() {
        let host = MemoryHost::new(64);
        let region = host.append_element(host.root(), NodeSpec::element("div").with_class("panel"));
        let toolbar = host.append_element(region, NodeSpec::element("div").with_id("toolbar"));

        let reconciler = reconciler_for(&host, vec![action("mute", child_of("#toolbar"))]).await;

        assert!(reconciler.decorate_region(region).await.unwrap());
        for _ in 0..5 {
            assert!(!reconciler.decorate_region(region).await.unwrap());
        }
        assert_eq!(host.children_of(toolbar).len(), 1);
    }

    #[tokio::test]
    async fn controls_appear_in_declaration_order() {
        let host = MemoryHost::new(64);
        let region = host.append_element(host.root(), NodeSpec::element("div").with_class("panel"));
        let toolbar = host.append_element(region, NodeSpec::element("div").with_id("toolbar"));

        let reconciler = reconciler_for(
            &host,
            vec![
                action("zoom_out", child_of("#toolbar")),
                action("zoom_reset", child_of("#toolbar")),
                action("zoom_in", child_of("#toolbar")),
            ],
        )
        .await;
        reconciler.decorate_region(region).await.unwrap();

        let rendered: Vec<String> = host
            .children_of(toolbar)
            .into_iter()
            .filter_map(|node| host.spec_of(node))
            .filter_map(|spec| spec.classes.first().cloned())
            .collect();
        assert_eq!(rendered, vec!["zoom_out", "zoom_reset", "zoom_in"]);
    }

    #[tokio::test]
    async fn disabled_actions_never_render() {
        let host = MemoryHost::new(64);
        let region = host.append_element(host.root(), NodeSpec::element("div").with_class("panel"));
        let toolbar = host.append_element(region, NodeSpec::element("div").with_id("toolbar"));

        let reconciler = reconciler_for(
            &host,
            vec![
                action("mute", child_of("#toolbar")),
                action("template", child_of("#toolbar")).disabled(),
            ],
        )
        .await;
        reconciler.decorate_region(region).await.unwrap();
        assert_eq!(host.children_of(toolbar).len(), 1);
    }

    #[tokio::test]
    async fn missing_anchor_skips_only_that_action() {
        let host = MemoryHost::new(64);
        let region = host.append_element(host.root(), NodeSpec::element("div").with_class("panel"));
        let toolbar = host.append_element(region, NodeSpec::element("div").with_id("toolbar"));

        let reconciler = reconciler_for(
            &host,
            vec![
                action("ghost", child_of("#no-such-toolbar")),
                action("mute", child_of("#toolbar")),
            ],
        )
        .await;
        assert!(reconciler.decorate_region(region).await.unwrap());
        assert_eq!(host.children_of(toolbar).len(), 1);
    }

    #[tokio::test]
    async fn marker_container_is_appended_to_the_region() {
        let host = MemoryHost::new(64);
        let region = host.append_element(host.root(), NodeSpec::element("div").with_class("panel"));
        host.append_element(region, NodeSpec::element("div").with_id("toolbar"));

        let reconciler = reconciler_for(&host, vec![]).await;
        reconciler.decorate_region(region).await.unwrap();

        let marker = host
            .query_within(region, &MARKER_SELECTOR)
            .await
            .unwrap()
            .expect("marker container present");
        assert!(host
            .classes_of(marker)
            .contains(&MARKER_CONTAINER_CLASS.to_string()));
    }
}
