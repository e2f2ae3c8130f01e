//! Change observer: re-run reconciliation whenever the host tree mutates.
//!
//! This is a level trigger. The observer never inspects mutation record
//! contents; any batch means "re-query which region is active now" against
//! the live tree, and the reconciler's marker check makes redundant triggers
//! free. Bursts of batches are drained before each recheck so a mutation
//! storm costs one query, not one per record.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};
use uigraft_host_adapter::{MutationBatch, Selector, UiTree};

use crate::reconcile::Reconciler;
use crate::runtime::TaskHandle;

/// Watches the mutation feed and reconciles the active region.
pub struct ChangeObserver {
    ui: Arc<dyn UiTree>,
    reconciler: Arc<Reconciler>,
    region_selector: Selector,
}

impl ChangeObserver {
    pub fn new(
        ui: Arc<dyn UiTree>,
        reconciler: Arc<Reconciler>,
        region_selector: Selector,
    ) -> Self {
        Self {
            ui,
            reconciler,
            region_selector,
        }
    }

    /// Spawn the observation loop. The returned handle owns the task; the
    /// engine context stops it deterministically at teardown.
    pub fn spawn(self, mut mutations: broadcast::Receiver<MutationBatch>) -> TaskHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    received = mutations.recv() => match received {
                        Ok(_) => {
                            // Coalesce the burst; one recheck covers it.
                            while mutations.try_recv().is_ok() {}
                            self.recheck().await;
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            debug!(skipped, "mutation feed lagged; rechecking");
                            self.recheck().await;
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
            debug!("change observer stopped");
        });
        TaskHandle::new(shutdown_tx, task)
    }

    async fn recheck(&self) {
        match self.ui.query(&self.region_selector).await {
            Ok(Some(region)) => {
                if let Err(err) = self.reconciler.decorate_region(region).await {
                    warn!(%region, %err, "region reconciliation failed");
                }
            }
            Ok(None) => debug!(selector = %self.region_selector, "no active region"),
            Err(err) => warn!(%err, "active-region query failed"),
        }
    }
}
