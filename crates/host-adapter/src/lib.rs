//! Host-adapter ports for the uigraft engine.
//!
//! The host application is an external collaborator: this crate defines the
//! trait boundary the engine wires against (queryable UI tree, mutation feed,
//! interaction feed, one-shot content submission) together with the node and
//! mutation descriptors that cross it. `MemoryHost` is a complete in-memory
//! implementation of all four ports, used by the test suite and by embedders
//! that have no live host to attach to.

pub mod errors;
pub mod memory;
pub mod node;
pub mod ports;
pub mod selector;

pub use errors::*;
pub use memory::*;
pub use node::*;
pub use ports::*;
pub use selector::*;
