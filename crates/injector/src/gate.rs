//! Readiness gate: poll until the root anchor exists, with a retry budget.
//!
//! The retry is bounded with exponential backoff and a terminal gave-up
//! state, observable through a watch channel.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use uigraft_core_types::NodeId;
use uigraft_host_adapter::{Selector, UiTree};

use crate::errors::InjectError;

/// Gate tuning. Intervals are milliseconds.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Interval before the second attempt.
    pub poll_interval_ms: u64,

    /// Multiplier applied to the interval after each miss.
    pub backoff_factor: u32,

    /// Ceiling for the backed-off interval.
    pub max_interval_ms: u64,

    /// Total query attempts before giving up.
    pub max_attempts: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            backoff_factor: 2,
            max_interval_ms: 5000,
            max_attempts: 20,
        }
    }
}

/// Observable gate state.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum GateStatus {
    Idle,
    Waiting { attempt: u32 },
    Ready,
    GaveUp { attempts: u32 },
}

/// Polls the UI tree until a node matching the root selector exists, then
/// hands the node back exactly once. The gate is discarded afterwards.
pub struct ReadinessGate {
    ui: Arc<dyn UiTree>,
    config: GateConfig,
    status_tx: watch::Sender<GateStatus>,
}

impl ReadinessGate {
    pub fn new(ui: Arc<dyn UiTree>, config: GateConfig) -> Self {
        let (status_tx, _) = watch::channel(GateStatus::Idle);
        Self {
            ui,
            config,
            status_tx,
        }
    }

    /// Subscribe to gate status transitions.
    pub fn status(&self) -> watch::Receiver<GateStatus> {
        self.status_tx.subscribe()
    }

    /// Wait for the root anchor, backing off between attempts.
    pub async fn await_root(&self, selector: &Selector) -> Result<NodeId, InjectError> {
        let factor = self.config.backoff_factor.max(1);
        let max_attempts = self.config.max_attempts.max(1);
        let ceiling = Duration::from_millis(self.config.max_interval_ms.max(1));
        let mut interval = Duration::from_millis(self.config.poll_interval_ms.max(1));

        for attempt in 1..=max_attempts {
            let _ = self.status_tx.send(GateStatus::Waiting { attempt });

            if let Some(root) = self.ui.query(selector).await? {
                info!(%selector, attempt, "root anchor ready");
                let _ = self.status_tx.send(GateStatus::Ready);
                return Ok(root);
            }

            if attempt < max_attempts {
                debug!(%selector, attempt, interval_ms = interval.as_millis() as u64, "root not present; backing off");
                sleep(interval).await;
                interval = (interval * factor).min(ceiling);
            }
        }

        warn!(%selector, attempts = max_attempts, "root anchor never appeared; giving up");
        let _ = self.status_tx.send(GateStatus::GaveUp {
            attempts: max_attempts,
        });
        Err(InjectError::GateGaveUp {
            attempts: max_attempts,
        })
    }
}
