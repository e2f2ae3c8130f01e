//! The process-wide graft context.
//!
//! One context per process: it runs the readiness gate, performs the
//! initial decoration pass over the root region, then starts the change
//! observer and the click router. Both tasks are owned here and torn down
//! deterministically by [`GraftContext::stop`].

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::{info, warn};
use uigraft_core_types::NodeId;
use uigraft_host_adapter::{HostPorts, Selector};
use uigraft_injector::{
    ActionRegistry, ChangeObserver, DispatchOutcome, ExecutionBridge, GateStatus, ReadinessGate,
    Reconciler, TaskHandle,
};

use crate::config::GraftConfig;
use crate::errors::GraftError;

/// Owner of a running engine. Dropping it without calling
/// [`GraftContext::stop`] aborts nothing; teardown is explicit.
pub struct GraftContext {
    root: NodeId,
    bridge: Arc<ExecutionBridge>,
    gate_status: watch::Receiver<GateStatus>,
    observer: TaskHandle,
    router: TaskHandle,
}

impl std::fmt::Debug for GraftContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraftContext")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl GraftContext {
    /// Validate the configuration, wait for the root anchor, run the
    /// initial decoration pass and start the background tasks.
    ///
    /// Fails only on configuration errors or when the gate exhausts its
    /// retry budget; per-action degradations never surface here.
    pub async fn start(
        config: GraftConfig,
        registry: ActionRegistry,
        ports: HostPorts,
    ) -> Result<Self, GraftError> {
        config.validate()?;
        let root_selector = Selector::parse(&config.root_selector)
            .map_err(|err| GraftError::Config(format!("root_selector: {err}")))?;
        let region_selector = Selector::parse(&config.region_selector)
            .map_err(|err| GraftError::Config(format!("region_selector: {err}")))?;

        let registry = Arc::new(registry);

        let gate = ReadinessGate::new(ports.ui.clone(), config.gate.clone());
        let gate_status = gate.status();
        let root = gate.await_root(&root_selector).await?;

        let bridge = ExecutionBridge::new(
            registry.clone(),
            ports.content.clone(),
            config.channel_capacity,
        );
        let reconciler = Reconciler::new(ports.ui.clone(), registry, bridge.clone());

        // Initial pass: the root anchor is the first target region. A failed
        // pass is not fatal; the observer retries on the next mutation.
        if let Err(err) = reconciler.decorate_region(root).await {
            warn!(%err, "initial decoration pass failed");
        }

        let router = bridge.spawn_router(ports.interactions.interactions());
        let observer = ChangeObserver::new(ports.ui.clone(), reconciler, region_selector)
            .spawn(ports.mutations.mutations());

        info!(%root, "graft context started");
        Ok(Self {
            root,
            bridge,
            gate_status,
            observer,
            router,
        })
    }

    /// The resolved root anchor node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Gate status as observed during startup; terminal value is `Ready`.
    pub fn gate_status(&self) -> watch::Receiver<GateStatus> {
        self.gate_status.clone()
    }

    /// Subscribe to dispatch outcomes for every control interaction.
    pub fn outcomes(&self) -> broadcast::Receiver<DispatchOutcome> {
        self.bridge.outcomes()
    }

    /// Stop the change observer and the click router and wait for both.
    pub async fn stop(self) {
        self.observer.stop().await;
        self.router.stop().await;
        info!("graft context stopped");
    }
}
