//! The uigraft control-injection engine.
//!
//! Pipeline: the readiness gate polls until the root anchor exists, the
//! action registry is walked in declaration order to place the initial
//! controls, and from then on the change observer re-runs the region
//! reconciliation pass whenever the host tree mutates. Every control's click
//! is routed through the execution bridge into the privileged host context
//! or the sandboxed content area.

pub mod bridge;
pub mod builder;
pub mod errors;
pub mod gate;
pub mod observer;
pub mod placement;
pub mod reconcile;
pub mod registry;
pub mod runtime;

pub use bridge::*;
pub use builder::*;
pub use errors::*;
pub use gate::*;
pub use observer::*;
pub use placement::*;
pub use reconcile::*;
pub use registry::*;
pub use runtime::*;
