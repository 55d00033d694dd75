#![warn(missing_docs)]

//! The address space and node management core of an OPC UA server.
//!
//! The [`NodeManager`] owns an in-memory [`AddressSpace`] populated from
//! the namespace 0 bootstrap, and exposes the node management and view
//! services on top of it: AddNodes, AddReferences, DeleteNodes,
//! DeleteReferences, Browse, plus attribute read/write and method call.
//! The network layer delivers framed requests to [`messages::Request`]
//! and transmits [`messages::Response`] values back; nothing in this
//! crate performs I/O.

pub mod address_space;
mod instantiator;
mod lifecycle;
pub mod messages;
mod node_manager;

pub use address_space::{AddressSpace, CoreNamespace, ModellingRule, TypeChild};
pub use instantiator::InstantiationCallback;
pub use lifecycle::{Constructor, Destructor, InstanceHandle, LifecycleRegistry};
pub use node_manager::{MethodCallback, NodeManager};
pub use uamodel_nodes::*;
