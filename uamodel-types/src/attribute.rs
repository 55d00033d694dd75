// UA Model for Rust
// SPDX-License-Identifier: MPL-2.0

//! The [`AttributeId`] enum, identifying node attributes by a numeric value,
//! and the write mask controlling which attributes a client may change.
//!
//! Defined in Part 4, Figure B.7.

use bitflags::bitflags;
use log::debug;

/// Error returned when working with an attribute ID.
#[derive(Debug, thiserror::Error)]
#[error("invalid attribute id")]
pub struct AttributeIdError;

/// Node attribute ID, from the OPC UA standard.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
#[repr(u32)]
pub enum AttributeId {
    /// Node ID.
    NodeId = 1,
    /// Node class.
    NodeClass = 2,
    /// Browse name.
    BrowseName = 3,
    /// Display name.
    DisplayName = 4,
    /// Description.
    Description = 5,
    /// Write mask.
    WriteMask = 6,
    /// User write mask.
    UserWriteMask = 7,
    /// Is abstract.
    IsAbstract = 8,
    /// Is symmetric, applies to reference types.
    Symmetric = 9,
    /// Inverse name of reference type.
    InverseName = 10,
    /// For views, contains no loops.
    ContainsNoLoops = 11,
    /// Whether this object can produce events.
    EventNotifier = 12,
    /// Variable value.
    Value = 13,
    /// Data type.
    DataType = 14,
    /// Variable value rank.
    ValueRank = 15,
    /// Variable array dimensions.
    ArrayDimensions = 16,
    /// Variable access level.
    AccessLevel = 17,
    /// Variable user access level.
    UserAccessLevel = 18,
    /// Variable minimum sampling interval.
    MinimumSamplingInterval = 19,
    /// Whether a variable stores history.
    Historizing = 20,
    /// Whether this method is executable.
    Executable = 21,
    /// Whether this method is executable by the current user.
    UserExecutable = 22,
}

impl AttributeId {
    /// Try to get this attribute ID from a 32 bit integer.
    pub fn from_u32(attribute_id: u32) -> Result<AttributeId, AttributeIdError> {
        let attribute_id = match attribute_id {
            1 => AttributeId::NodeId,
            2 => AttributeId::NodeClass,
            3 => AttributeId::BrowseName,
            4 => AttributeId::DisplayName,
            5 => AttributeId::Description,
            6 => AttributeId::WriteMask,
            7 => AttributeId::UserWriteMask,
            8 => AttributeId::IsAbstract,
            9 => AttributeId::Symmetric,
            10 => AttributeId::InverseName,
            11 => AttributeId::ContainsNoLoops,
            12 => AttributeId::EventNotifier,
            13 => AttributeId::Value,
            14 => AttributeId::DataType,
            15 => AttributeId::ValueRank,
            16 => AttributeId::ArrayDimensions,
            17 => AttributeId::AccessLevel,
            18 => AttributeId::UserAccessLevel,
            19 => AttributeId::MinimumSamplingInterval,
            20 => AttributeId::Historizing,
            21 => AttributeId::Executable,
            22 => AttributeId::UserExecutable,
            _ => {
                debug!("Invalid attribute id {}", attribute_id);
                return Err(AttributeIdError);
            }
        };
        Ok(attribute_id)
    }
}

bitflags! {
    /// Mask of attributes a client is allowed to write on a node.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
    pub struct WriteMask: u32 {
        /// Allow writing the access level.
        const ACCESS_LEVEL = 1;
        /// Allow writing the array dimensions.
        const ARRAY_DIMENSIONS = 1 << 1;
        /// Allow writing the browse name.
        const BROWSE_NAME = 1 << 2;
        /// Allow writing contains-no-loops.
        const CONTAINS_NO_LOOPS = 1 << 3;
        /// Allow writing the data type.
        const DATA_TYPE = 1 << 4;
        /// Allow writing the description.
        const DESCRIPTION = 1 << 5;
        /// Allow writing the display name.
        const DISPLAY_NAME = 1 << 6;
        /// Allow writing the event notifier.
        const EVENT_NOTIFIER = 1 << 7;
        /// Allow writing the executable flag.
        const EXECUTABLE = 1 << 8;
        /// Allow writing the historizing flag.
        const HISTORIZING = 1 << 9;
        /// Allow writing the inverse name.
        const INVERSE_NAME = 1 << 10;
        /// Allow writing the is-abstract flag.
        const IS_ABSTRACT = 1 << 11;
        /// Allow writing the minimum sampling interval.
        const MINIMUM_SAMPLING_INTERVAL = 1 << 12;
        /// Allow writing the node class.
        const NODE_CLASS = 1 << 13;
        /// Allow writing the node id.
        const NODE_ID = 1 << 14;
        /// Allow writing the symmetric flag.
        const SYMMETRIC = 1 << 15;
        /// Allow writing the user access level.
        const USER_ACCESS_LEVEL = 1 << 16;
        /// Allow writing the user executable flag.
        const USER_EXECUTABLE = 1 << 17;
        /// Allow writing the user write mask.
        const USER_WRITE_MASK = 1 << 18;
        /// Allow writing the value rank.
        const VALUE_RANK = 1 << 19;
        /// Allow writing the write mask.
        const WRITE_MASK = 1 << 20;
        /// Allow writing the value of a variable type.
        const VALUE_FOR_VARIABLE_TYPE = 1 << 21;
    }
}
