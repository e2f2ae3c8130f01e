//! uigraft — reactive injection of custom controls into a host UI tree.
//!
//! The engine watches a host application's live, mutable UI tree through a
//! small set of port traits, waits for a root anchor to exist, and then
//! keeps target regions decorated with author-configured controls: each one
//! placed relative to an anchor element and wired to a behavior that runs
//! either in the host's privileged context or inside a sandboxed content
//! area reachable only by one-shot code submission.
//!
//! ```no_run
//! use uigraft::{
//!     ActionBehavior, ActionDefinition, ActionRegistry, GraftConfig, GraftContext, MemoryHost,
//!     Placement, PlacementMode,
//! };
//!
//! # async fn demo() -> Result<(), uigraft::GraftError> {
//! let host = MemoryHost::new(64);
//! let registry = ActionRegistry::new(vec![ActionDefinition::new(
//!     "reload",
//!     "Reload the page",
//!     ActionBehavior::content("window.location.reload()"),
//!     Placement::parse(".status-toolbar", PlacementMode::Child)?,
//! )
//! .with_markup("<span>RELOAD</span>")])?;
//!
//! let context = GraftContext::start(GraftConfig::default(), registry, host.ports()).await?;
//! // ... host runs; regions get decorated as they appear ...
//! context.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod errors;

pub use config::GraftConfig;
pub use context::GraftContext;
pub use errors::GraftError;

pub use uigraft_core_types::{
    ActionId, ContentTargetId, ExecutionDomain, NodeId, PlacementMode,
};
pub use uigraft_host_adapter::{
    ContentBridge, HostError, HostPorts, Interaction, InteractionFeed, MemoryHost, MutationBatch,
    MutationFeed, MutationKind, NodeSpec, Selector, SelectorError, UiTree,
};
pub use uigraft_injector::{
    ActionBehavior, ActionDefinition, ActionRegistry, ChangeObserver, DispatchOutcome,
    ExecutionBridge, GateConfig, GateStatus, InjectError, Placement, PrivilegedFn, ReadinessGate,
    Reconciler, RegistryError, TaskHandle, CONTROL_MARKER_CLASS, MARKER_CONTAINER_CLASS,
};

/// Install a global tracing subscriber honoring `RUST_LOG`, defaulting to
/// `info`. Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
