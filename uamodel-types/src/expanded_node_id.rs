// UA Model for Rust
// SPDX-License-Identifier: MPL-2.0

//! Contains the implementation of `ExpandedNodeId`.

use std::fmt;

use crate::{node_id::NodeId, string::UAString};

/// A NodeId that allows the namespace URI to be specified instead of a
/// namespace index, and which may address a node on another server.
/// References whose target lives outside the local address space carry one
/// of these instead of a plain NodeId.
#[derive(PartialEq, Eq, Clone, Debug, Hash, Default)]
pub struct ExpandedNodeId {
    /// The local node id part.
    pub node_id: NodeId,
    /// Namespace URI, null when the node id's namespace index applies.
    pub namespace_uri: UAString,
    /// Index of the server holding the node, 0 for the local server.
    pub server_index: u32,
}

impl From<NodeId> for ExpandedNodeId {
    fn from(node_id: NodeId) -> Self {
        ExpandedNodeId {
            node_id,
            namespace_uri: UAString::null(),
            server_index: 0,
        }
    }
}

impl From<&NodeId> for ExpandedNodeId {
    fn from(node_id: &NodeId) -> Self {
        node_id.clone().into()
    }
}

impl fmt::Display for ExpandedNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.server_index != 0 {
            write!(f, "svr={};", self.server_index)?;
        }
        if !self.namespace_uri.is_empty() {
            write!(f, "nsu={};{}", self.namespace_uri, self.node_id.identifier)
        } else {
            write!(f, "{}", self.node_id)
        }
    }
}

impl ExpandedNodeId {
    /// Create an expanded node id addressing a node in the local server.
    pub fn new(node_id: impl Into<NodeId>) -> ExpandedNodeId {
        node_id.into().into()
    }

    /// The null expanded node id.
    pub fn null() -> ExpandedNodeId {
        Self::new(NodeId::null())
    }

    /// Test whether this is null.
    pub fn is_null(&self) -> bool {
        self.node_id.is_null() && self.namespace_uri.is_null() && self.server_index == 0
    }

    /// Return `true` if the target lives in the local address space.
    pub fn is_local(&self) -> bool {
        self.server_index == 0 && self.namespace_uri.is_null()
    }
}
