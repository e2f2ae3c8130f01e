//! Top-level error type for embedders.

use thiserror::Error;
use uigraft_host_adapter::{HostError, SelectorError};
use uigraft_injector::{InjectError, RegistryError};

/// Anything that can stop a graft context from starting or running.
///
/// None of these escape into the host: engine tasks log and degrade, and
/// the variants here only surface from explicit calls such as
/// [`crate::GraftContext::start`].
#[derive(Debug, Error)]
pub enum GraftError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid selector: {0}")]
    Selector(#[from] SelectorError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Inject(#[from] InjectError),

    #[error(transparent)]
    Host(#[from] HostError),
}
