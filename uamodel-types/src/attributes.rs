// UA Model for Rust
// SPDX-License-Identifier: MPL-2.0

//! Node attribute collections carried by the AddNodes service, one per node
//! class, plus the mask describing which fields of a collection are set.

use bitflags::bitflags;

use crate::{
    localized_text::LocalizedText, node_class::NodeClass, node_id::NodeId, variant::Variant,
};

bitflags! {
    /// Mask of fields set in a node attributes collection.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
    pub struct AttributesMask: u32 {
        /// Access level is set.
        const ACCESS_LEVEL = 1;
        /// Array dimensions are set.
        const ARRAY_DIMENSIONS = 1 << 1;
        /// Contains no loops is set.
        const CONTAINS_NO_LOOPS = 1 << 3;
        /// Data type is set.
        const DATA_TYPE = 1 << 4;
        /// Description is set.
        const DESCRIPTION = 1 << 5;
        /// Display name is set.
        const DISPLAY_NAME = 1 << 6;
        /// Event notifier is set.
        const EVENT_NOTIFIER = 1 << 7;
        /// Executable is set.
        const EXECUTABLE = 1 << 8;
        /// Historizing is set.
        const HISTORIZING = 1 << 9;
        /// Inverse name is set.
        const INVERSE_NAME = 1 << 10;
        /// Is abstract is set.
        const IS_ABSTRACT = 1 << 11;
        /// Minimum sampling interval is set.
        const MINIMUM_SAMPLING_INTERVAL = 1 << 12;
        /// Symmetric is set.
        const SYMMETRIC = 1 << 15;
        /// User access level is set.
        const USER_ACCESS_LEVEL = 1 << 16;
        /// User executable is set.
        const USER_EXECUTABLE = 1 << 17;
        /// User write mask is set.
        const USER_WRITE_MASK = 1 << 18;
        /// Value rank is set.
        const VALUE_RANK = 1 << 19;
        /// Write mask is set.
        const WRITE_MASK = 1 << 20;
        /// Value is set.
        const VALUE = 1 << 21;
    }
}

/// Attributes for a new `Object` node.
#[derive(Debug, Clone, Default)]
pub struct ObjectAttributes {
    /// Mask of the fields actually set.
    pub specified_attributes: u32,
    /// Display name of the node.
    pub display_name: LocalizedText,
    /// Description of the node.
    pub description: LocalizedText,
    /// Write mask bits.
    pub write_mask: u32,
    /// User write mask bits.
    pub user_write_mask: u32,
    /// Event notifier bits.
    pub event_notifier: u8,
}

/// Attributes for a new `Variable` node.
#[derive(Debug, Clone, Default)]
pub struct VariableAttributes {
    /// Mask of the fields actually set.
    pub specified_attributes: u32,
    /// Display name of the node.
    pub display_name: LocalizedText,
    /// Description of the node.
    pub description: LocalizedText,
    /// Write mask bits.
    pub write_mask: u32,
    /// User write mask bits.
    pub user_write_mask: u32,
    /// Initial value.
    pub value: Variant,
    /// Data type of the value.
    pub data_type: NodeId,
    /// Value rank, -1 for scalar.
    pub value_rank: i32,
    /// Array dimensions when the value rank is positive.
    pub array_dimensions: Option<Vec<u32>>,
    /// Access level bits.
    pub access_level: u8,
    /// User access level bits.
    pub user_access_level: u8,
    /// Minimum sampling interval in milliseconds.
    pub minimum_sampling_interval: f64,
    /// Whether the variable stores history.
    pub historizing: bool,
}

/// Attributes for a new `Method` node.
#[derive(Debug, Clone, Default)]
pub struct MethodAttributes {
    /// Mask of the fields actually set.
    pub specified_attributes: u32,
    /// Display name of the node.
    pub display_name: LocalizedText,
    /// Description of the node.
    pub description: LocalizedText,
    /// Write mask bits.
    pub write_mask: u32,
    /// User write mask bits.
    pub user_write_mask: u32,
    /// Whether the method may be called.
    pub executable: bool,
    /// Whether the method may be called by the current user.
    pub user_executable: bool,
}

/// Attributes for a new `ObjectType` node.
#[derive(Debug, Clone, Default)]
pub struct ObjectTypeAttributes {
    /// Mask of the fields actually set.
    pub specified_attributes: u32,
    /// Display name of the node.
    pub display_name: LocalizedText,
    /// Description of the node.
    pub description: LocalizedText,
    /// Write mask bits.
    pub write_mask: u32,
    /// User write mask bits.
    pub user_write_mask: u32,
    /// Whether the type may be instantiated.
    pub is_abstract: bool,
}

/// Attributes for a new `VariableType` node.
#[derive(Debug, Clone, Default)]
pub struct VariableTypeAttributes {
    /// Mask of the fields actually set.
    pub specified_attributes: u32,
    /// Display name of the node.
    pub display_name: LocalizedText,
    /// Description of the node.
    pub description: LocalizedText,
    /// Write mask bits.
    pub write_mask: u32,
    /// User write mask bits.
    pub user_write_mask: u32,
    /// Default value for instances.
    pub value: Variant,
    /// Data type of the value.
    pub data_type: NodeId,
    /// Value rank, -1 for scalar.
    pub value_rank: i32,
    /// Array dimensions when the value rank is positive.
    pub array_dimensions: Option<Vec<u32>>,
    /// Whether the type may be instantiated.
    pub is_abstract: bool,
}

/// Attributes for a new `ReferenceType` node.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTypeAttributes {
    /// Mask of the fields actually set.
    pub specified_attributes: u32,
    /// Display name of the node.
    pub display_name: LocalizedText,
    /// Description of the node.
    pub description: LocalizedText,
    /// Write mask bits.
    pub write_mask: u32,
    /// User write mask bits.
    pub user_write_mask: u32,
    /// Whether references of this type may exist in the instance hierarchy.
    pub is_abstract: bool,
    /// Whether the reference reads the same in both directions.
    pub symmetric: bool,
    /// Name of the reference when followed inverse.
    pub inverse_name: LocalizedText,
}

/// Attributes for a new `DataType` node.
#[derive(Debug, Clone, Default)]
pub struct DataTypeAttributes {
    /// Mask of the fields actually set.
    pub specified_attributes: u32,
    /// Display name of the node.
    pub display_name: LocalizedText,
    /// Description of the node.
    pub description: LocalizedText,
    /// Write mask bits.
    pub write_mask: u32,
    /// User write mask bits.
    pub user_write_mask: u32,
    /// Whether values of this type may exist.
    pub is_abstract: bool,
}

/// Attributes for a new `View` node.
#[derive(Debug, Clone, Default)]
pub struct ViewAttributes {
    /// Mask of the fields actually set.
    pub specified_attributes: u32,
    /// Display name of the node.
    pub display_name: LocalizedText,
    /// Description of the node.
    pub description: LocalizedText,
    /// Write mask bits.
    pub write_mask: u32,
    /// User write mask bits.
    pub user_write_mask: u32,
    /// Whether the view contains no loops.
    pub contains_no_loops: bool,
    /// Event notifier bits.
    pub event_notifier: u8,
}

/// Enum over the different attribute collections for AddNodes.
#[derive(Debug, Clone, Default)]
pub enum AddNodeAttributes {
    /// Object attributes.
    Object(ObjectAttributes),
    /// Variable attributes.
    Variable(VariableAttributes),
    /// Method attributes.
    Method(MethodAttributes),
    /// ObjectType attributes.
    ObjectType(ObjectTypeAttributes),
    /// VariableType attributes.
    VariableType(VariableTypeAttributes),
    /// ReferenceType attributes.
    ReferenceType(ReferenceTypeAttributes),
    /// DataType attributes.
    DataType(DataTypeAttributes),
    /// View attributes.
    View(ViewAttributes),
    /// No extra attributes.
    #[default]
    None,
}

impl AddNodeAttributes {
    /// The node class these attributes belong to, `None` for the empty
    /// collection which is valid for any class.
    pub fn node_class(&self) -> Option<NodeClass> {
        match self {
            AddNodeAttributes::Object(_) => Some(NodeClass::Object),
            AddNodeAttributes::Variable(_) => Some(NodeClass::Variable),
            AddNodeAttributes::Method(_) => Some(NodeClass::Method),
            AddNodeAttributes::ObjectType(_) => Some(NodeClass::ObjectType),
            AddNodeAttributes::VariableType(_) => Some(NodeClass::VariableType),
            AddNodeAttributes::ReferenceType(_) => Some(NodeClass::ReferenceType),
            AddNodeAttributes::DataType(_) => Some(NodeClass::DataType),
            AddNodeAttributes::View(_) => Some(NodeClass::View),
            AddNodeAttributes::None => None,
        }
    }
}
