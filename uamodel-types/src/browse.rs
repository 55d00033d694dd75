// UA Model for Rust
// SPDX-License-Identifier: MPL-2.0

//! Service records for the Browse operation.

use bitflags::bitflags;

use crate::{
    expanded_node_id::ExpandedNodeId, localized_text::LocalizedText, node_class::NodeClass,
    node_id::NodeId, qualified_name::QualifiedName, status_code::StatusCode,
};

/// The direction references are followed in when browsing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum BrowseDirection {
    /// Follow references from source to target.
    #[default]
    Forward,
    /// Follow references from target to source.
    Inverse,
    /// Follow references in both directions.
    Both,
}

bitflags! {
    /// Mask of the fields to fill in on returned reference descriptions.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
    pub struct BrowseDescriptionResultMask: u32 {
        /// Include the reference type.
        const RESULT_MASK_REFERENCE_TYPE = 1;
        /// Include the direction flag.
        const RESULT_MASK_IS_FORWARD = 1 << 1;
        /// Include the node class.
        const RESULT_MASK_NODE_CLASS = 1 << 2;
        /// Include the browse name.
        const RESULT_MASK_BROWSE_NAME = 1 << 3;
        /// Include the display name.
        const RESULT_MASK_DISPLAY_NAME = 1 << 4;
        /// Include the type definition.
        const RESULT_MASK_TYPE_DEFINITION = 1 << 5;
    }
}

/// A request to browse the references of a single node.
#[derive(Debug, Clone)]
pub struct BrowseDescription {
    /// The node to browse.
    pub node_id: NodeId,
    /// The direction to follow references in.
    pub browse_direction: BrowseDirection,
    /// Only references of this type pass the filter; a null id disables
    /// reference type filtering.
    pub reference_type_id: NodeId,
    /// Whether subtypes of `reference_type_id` pass the filter too.
    pub include_subtypes: bool,
    /// Mask of node classes to return, 0 returns everything.
    pub node_class_mask: u32,
    /// Mask of reference description fields to fill in.
    pub result_mask: u32,
}

impl BrowseDescription {
    /// Browse everything reachable from `node_id` in the given direction,
    /// with all result fields filled in.
    pub fn new(node_id: impl Into<NodeId>, browse_direction: BrowseDirection) -> Self {
        Self {
            node_id: node_id.into(),
            browse_direction,
            reference_type_id: NodeId::null(),
            include_subtypes: true,
            node_class_mask: 0,
            result_mask: BrowseDescriptionResultMask::all().bits(),
        }
    }

    /// Restrict the browse to the given reference type and, optionally, its
    /// subtypes.
    pub fn with_reference_type(
        mut self,
        reference_type_id: impl Into<NodeId>,
        include_subtypes: bool,
    ) -> Self {
        self.reference_type_id = reference_type_id.into();
        self.include_subtypes = include_subtypes;
        self
    }
}

/// Description of one reference returned by Browse.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceDescription {
    /// The type of the reference.
    pub reference_type_id: NodeId,
    /// Whether the reference was followed in its forward direction.
    pub is_forward: bool,
    /// The target of the reference.
    pub node_id: ExpandedNodeId,
    /// Browse name of the target.
    pub browse_name: QualifiedName,
    /// Display name of the target.
    pub display_name: LocalizedText,
    /// Node class of the target.
    pub node_class: NodeClass,
    /// Type definition of the target, for objects and variables.
    pub type_definition: ExpandedNodeId,
}

/// The result of browsing a single node.
#[derive(Debug, Clone)]
pub struct BrowseResult {
    /// Status of the operation.
    pub status_code: StatusCode,
    /// The references that passed the filters.
    pub references: Vec<ReferenceDescription>,
}

impl BrowseResult {
    /// A failed browse result with no references.
    pub fn error(status_code: StatusCode) -> Self {
        Self {
            status_code,
            references: Vec::new(),
        }
    }
}
