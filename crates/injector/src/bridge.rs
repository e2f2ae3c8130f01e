//! Execution bridge: route a control's click into the right domain.
//!
//! Privileged behaviors run directly in the host context. Content behaviors
//! are wrapped as an immediately-invoked expression and submitted for
//! one-shot execution inside the active sandboxed content area; nothing
//! comes back across that boundary, so the only observable distinction is
//! between "submitted", "no content target to submit to" and "the host
//! refused the submission". All three are reported as distinct outcomes
//! rather than swallowed.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};
use uigraft_core_types::{ActionId, ContentTargetId, NodeId};
use uigraft_host_adapter::{ContentBridge, Interaction};

use crate::registry::{ActionBehavior, ActionDefinition, ActionRegistry};
use crate::runtime::TaskHandle;

/// Result of dispatching one behavior, published on the outcome feed.
#[derive(Clone, Debug)]
pub enum DispatchOutcome {
    /// A privileged behavior ran to completion in the host context.
    Ran { action: ActionId },

    /// Content code was accepted by the host for one-shot execution.
    /// Deliberately distinct from [`DispatchOutcome::Ran`]: execution past
    /// the domain boundary is unobservable.
    Submitted {
        action: ActionId,
        target: ContentTargetId,
    },

    /// No sandboxed content area was active; the behavior never ran.
    NoContentTarget { action: ActionId },

    /// The host rejected the dispatch.
    Failed { action: ActionId, reason: String },
}

impl DispatchOutcome {
    pub fn action(&self) -> &ActionId {
        match self {
            DispatchOutcome::Ran { action }
            | DispatchOutcome::Submitted { action, .. }
            | DispatchOutcome::NoContentTarget { action }
            | DispatchOutcome::Failed { action, .. } => action,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            DispatchOutcome::Ran { .. } | DispatchOutcome::Submitted { .. }
        )
    }
}

/// Dispatches behaviors and routes clicks from the host interaction feed to
/// the action bound to the clicked control.
pub struct ExecutionBridge {
    registry: Arc<ActionRegistry>,
    content: Arc<dyn ContentBridge>,
    routes: DashMap<NodeId, ActionId>,
    outcome_tx: broadcast::Sender<DispatchOutcome>,
}

impl ExecutionBridge {
    pub fn new(
        registry: Arc<ActionRegistry>,
        content: Arc<dyn ContentBridge>,
        capacity: usize,
    ) -> Arc<Self> {
        let (outcome_tx, _) = broadcast::channel(capacity.max(1));
        Arc::new(Self {
            registry,
            content,
            routes: DashMap::new(),
            outcome_tx,
        })
    }

    /// Bind a created control node to the action it triggers.
    pub fn bind(&self, node: NodeId, action: ActionId) {
        debug!(%node, %action, "control bound");
        self.routes.insert(node, action);
    }

    pub fn bound_action(&self, node: NodeId) -> Option<ActionId> {
        self.routes.get(&node).map(|entry| entry.clone())
    }

    /// Subscribe to dispatch outcomes.
    pub fn outcomes(&self) -> broadcast::Receiver<DispatchOutcome> {
        self.outcome_tx.subscribe()
    }

    /// Run one action's behavior in its domain and report the outcome.
    pub async fn dispatch(&self, def: &ActionDefinition) -> DispatchOutcome {
        let outcome = match &def.behavior {
            ActionBehavior::Privileged(behavior) => {
                debug!(action = %def.id, "running privileged behavior");
                behavior();
                DispatchOutcome::Ran {
                    action: def.id.clone(),
                }
            }
            ActionBehavior::Content { source } => self.dispatch_content(&def.id, source).await,
        };
        let _ = self.outcome_tx.send(outcome.clone());
        outcome
    }

    async fn dispatch_content(&self, action: &ActionId, source: &str) -> DispatchOutcome {
        let target = match self.content.active_target().await {
            Ok(Some(target)) => target,
            Ok(None) => {
                warn!(%action, "no active content target; behavior not run");
                return DispatchOutcome::NoContentTarget {
                    action: action.clone(),
                };
            }
            Err(err) => {
                warn!(%action, %err, "content target lookup failed");
                return DispatchOutcome::Failed {
                    action: action.clone(),
                    reason: err.to_string(),
                };
            }
        };

        // One-shot: wrap the captured source as an immediately-invoked
        // expression before it crosses the boundary.
        let code = format!("({source})()");
        match self.content.submit(target, &code).await {
            Ok(()) => {
                debug!(%action, %target, "content behavior submitted");
                DispatchOutcome::Submitted {
                    action: action.clone(),
                    target,
                }
            }
            Err(err) => {
                warn!(%action, %target, %err, "content submission failed");
                DispatchOutcome::Failed {
                    action: action.clone(),
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Spawn the click-routing loop over the host interaction feed.
    pub fn spawn_router(
        self: &Arc<Self>,
        mut interactions: broadcast::Receiver<Interaction>,
    ) -> TaskHandle {
        let bridge = self.clone();
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    received = interactions.recv() => match received {
                        Ok(event) => bridge.handle_click(event.node).await,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(skipped, "interaction feed lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
            debug!("click router stopped");
        });
        TaskHandle::new(shutdown_tx, task)
    }

    async fn handle_click(&self, node: NodeId) {
        let Some(action) = self.bound_action(node) else {
            debug!(%node, "click on unbound node");
            return;
        };
        match self.registry.get(&action) {
            Some(def) => {
                self.dispatch(def).await;
            }
            None => warn!(%action, "bound action missing from registry"),
        }
    }
}
