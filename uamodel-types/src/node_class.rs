// UA Model for Rust
// SPDX-License-Identifier: MPL-2.0

//! The `NodeClass` enum and the mask used to filter browse results by class.

use bitflags::bitflags;

/// The class of a node in the address space.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum NodeClass {
    /// No node class set, only valid in filters and masked-out results.
    #[default]
    Unspecified = 0,
    /// Objects are general structural nodes.
    Object = 1,
    /// Variables hold a current value.
    Variable = 2,
    /// Methods can be called.
    Method = 4,
    /// Object types define the structure of object nodes.
    ObjectType = 8,
    /// Variable types define the structure of variable nodes.
    VariableType = 16,
    /// Reference types define the semantics of references.
    ReferenceType = 32,
    /// Data types describe the type of variable values.
    DataType = 64,
    /// Views are pre-defined subsets of the address space.
    View = 128,
}

impl NodeClass {
    /// Look up a node class from its numeric value.
    pub fn from_u32(value: u32) -> Option<NodeClass> {
        match value {
            0 => Some(NodeClass::Unspecified),
            1 => Some(NodeClass::Object),
            2 => Some(NodeClass::Variable),
            4 => Some(NodeClass::Method),
            8 => Some(NodeClass::ObjectType),
            16 => Some(NodeClass::VariableType),
            32 => Some(NodeClass::ReferenceType),
            64 => Some(NodeClass::DataType),
            128 => Some(NodeClass::View),
            _ => None,
        }
    }
}

bitflags! {
    /// Mask over node classes, used by Browse to filter results.
    /// An empty mask means all classes pass.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
    pub struct NodeClassMask: u32 {
        /// Object nodes.
        const OBJECT = 1;
        /// Variable nodes.
        const VARIABLE = 2;
        /// Method nodes.
        const METHOD = 4;
        /// Object type nodes.
        const OBJECT_TYPE = 8;
        /// Variable type nodes.
        const VARIABLE_TYPE = 16;
        /// Reference type nodes.
        const REFERENCE_TYPE = 32;
        /// Data type nodes.
        const DATA_TYPE = 64;
        /// View nodes.
        const VIEW = 128;
    }
}
