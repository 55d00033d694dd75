// UA Model for Rust
// SPDX-License-Identifier: MPL-2.0

//! Service records for the node management operations: AddNodes,
//! AddReferences, DeleteNodes and DeleteReferences.

use crate::{
    attributes::AddNodeAttributes, node_class::NodeClass, node_id::NodeId,
    qualified_name::QualifiedName, status_code::StatusCode,
};

/// A request to add a single node to the address space.
#[derive(Debug, Clone)]
pub struct AddNodesItem {
    /// The node the new node is created under.
    pub parent_node_id: NodeId,
    /// The reference type linking the parent to the new node.
    pub reference_type_id: NodeId,
    /// The id the caller wants for the new node; null requests a
    /// server-assigned id.
    pub requested_new_node_id: NodeId,
    /// Browse name of the new node, unique among the siblings reached by
    /// the same hierarchical reference type.
    pub browse_name: QualifiedName,
    /// The class of the new node.
    pub node_class: NodeClass,
    /// Class-specific attributes.
    pub node_attributes: AddNodeAttributes,
    /// For objects and variables, the type to instantiate.
    pub type_definition: NodeId,
}

/// The outcome of a single AddNodes operation.
#[derive(Debug, Clone)]
pub struct AddNodesResult {
    /// Status of the operation.
    pub status_code: StatusCode,
    /// The id of the created node when the status is good.
    pub added_node_id: NodeId,
}

/// A request to add a single reference between two nodes.
#[derive(Debug, Clone)]
pub struct AddReferencesItem {
    /// The source of the reference.
    pub source_node_id: NodeId,
    /// The type of the reference.
    pub reference_type_id: NodeId,
    /// Whether the reference points from source to target.
    pub is_forward: bool,
    /// The target of the reference.
    pub target_node_id: NodeId,
}

/// A request to delete a single node.
#[derive(Debug, Clone)]
pub struct DeleteNodesItem {
    /// The node to delete.
    pub node_id: NodeId,
    /// Whether references held by other nodes targeting this one are
    /// removed as well.
    pub delete_target_references: bool,
}

/// A request to delete a single reference.
#[derive(Debug, Clone)]
pub struct DeleteReferencesItem {
    /// The source of the reference.
    pub source_node_id: NodeId,
    /// The type of the reference.
    pub reference_type_id: NodeId,
    /// Whether the reference to delete points from source to target.
    pub is_forward: bool,
    /// The target of the reference.
    pub target_node_id: NodeId,
    /// Whether the opposite half of the pair is removed too.
    pub delete_bidirectional: bool,
}
