//! Error types for the injection engine.

use thiserror::Error;
use uigraft_core_types::ActionId;
use uigraft_host_adapter::HostError;

/// Registry construction failures. These are configuration errors and
/// surface before any injection begins.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum RegistryError {
    #[error("duplicate action id: {0}")]
    DuplicateId(ActionId),
}

/// Failures of the engine itself. Per-action degradations (missing anchor,
/// failed placement) are warn-and-skip and never become errors; what is left
/// is the gate giving up and host-port failures.
#[derive(Debug, Error, Clone)]
pub enum InjectError {
    /// The readiness gate exhausted its retry budget.
    #[error("root anchor never appeared after {attempts} attempts")]
    GateGaveUp { attempts: u32 },

    #[error(transparent)]
    Host(#[from] HostError),
}
