// UA Model for Rust
// SPDX-License-Identifier: MPL-2.0

//! Contains the implementation of `Variable` and `VariableBuilder`.

use log::error;
use uamodel_types::{
    AttributeId, AttributesMask, DataValue, StatusCode, VariableAttributes, VariableTypeId,
    Variant,
};

use crate::{AccessLevel, FromAttributesError};

use super::{base::Base, node::Node, node::NodeBase};

node_builder_impl!(VariableBuilder, Variable);
node_builder_impl_component_of!(VariableBuilder);
node_builder_impl_property_of!(VariableBuilder);

impl VariableBuilder {
    /// Set the current value of the variable.
    pub fn value(mut self, value: impl Into<Variant>) -> Self {
        self.node.set_value(value);
        self
    }

    /// Set the data type of the variable.
    pub fn data_type(mut self, data_type: impl Into<NodeId>) -> Self {
        self.node.set_data_type(data_type);
        self
    }

    /// Set the value rank of the variable.
    pub fn value_rank(mut self, value_rank: i32) -> Self {
        self.node.set_value_rank(value_rank);
        self
    }

    /// Set the array dimensions of the variable.
    pub fn array_dimensions(mut self, array_dimensions: &[u32]) -> Self {
        self.node.set_array_dimensions(array_dimensions);
        self
    }

    /// Set whether the variable stores history.
    pub fn historizing(mut self, historizing: bool) -> Self {
        self.node.set_historizing(historizing);
        self
    }

    /// Set the access level of the variable.
    pub fn access_level(mut self, access_level: AccessLevel) -> Self {
        self.node.set_access_level(access_level);
        self
    }

    /// Set the user access level of the variable.
    pub fn user_access_level(mut self, user_access_level: AccessLevel) -> Self {
        self.node.set_user_access_level(user_access_level);
        self
    }

    /// Makes the variable writable by clients.
    pub fn writable(self) -> Self {
        let access_level = AccessLevel::CURRENT_READ | AccessLevel::CURRENT_WRITE;
        self.access_level(access_level).user_access_level(access_level)
    }

    /// Set the minimum sampling interval of the variable, in milliseconds.
    pub fn minimum_sampling_interval(mut self, minimum_sampling_interval: f64) -> Self {
        self.node
            .set_minimum_sampling_interval(minimum_sampling_interval);
        self
    }

    /// Set the write mask of the variable.
    pub fn write_mask(mut self, write_mask: WriteMask) -> Self {
        self.node.set_write_mask(write_mask);
        self
    }

    /// Add a `HasTypeDefinition` reference to the given variable type.
    pub fn has_type_definition(self, type_id: impl Into<NodeId>) -> Self {
        self.reference(
            type_id,
            ReferenceTypeId::HasTypeDefinition,
            ReferenceDirection::Forward,
        )
    }

    /// Mark the variable as a property of its parent, i.e. typed to
    /// `PropertyType`.
    pub fn is_property(self) -> Self {
        self.has_type_definition(VariableTypeId::PropertyType)
    }
}

/// A `Variable` is a type of node within the `AddressSpace`.
#[derive(Debug)]
pub struct Variable {
    pub(super) base: Base,
    pub(super) value: DataValue,
    pub(super) data_type: NodeId,
    pub(super) value_rank: i32,
    pub(super) array_dimensions: Option<Vec<u32>>,
    pub(super) access_level: u8,
    pub(super) user_access_level: u8,
    pub(super) minimum_sampling_interval: Option<f64>,
    pub(super) historizing: bool,
}

impl Default for Variable {
    fn default() -> Self {
        Self {
            base: Base::new(NodeClass::Variable, &NodeId::null(), "", ""),
            value: DataValue::null(),
            data_type: NodeId::null(),
            value_rank: -1,
            array_dimensions: None,
            access_level: AccessLevel::CURRENT_READ.bits(),
            user_access_level: AccessLevel::CURRENT_READ.bits(),
            minimum_sampling_interval: None,
            historizing: false,
        }
    }
}

node_base_impl!(Variable);

impl Node for Variable {
    fn get_attribute(&self, attribute_id: AttributeId) -> Option<DataValue> {
        match attribute_id {
            AttributeId::Value => Some(self.value()),
            AttributeId::DataType => Some(self.data_type().clone().into()),
            AttributeId::ValueRank => Some(self.value_rank().into()),
            AttributeId::AccessLevel => Some(self.access_level().bits().into()),
            AttributeId::UserAccessLevel => Some(self.user_access_level().bits().into()),
            AttributeId::Historizing => Some(self.historizing().into()),
            // Optional attributes
            AttributeId::ArrayDimensions => self.array_dimensions().map(|v| {
                Variant::from((
                    uamodel_types::VariantScalarTypeId::UInt32,
                    v.into_iter().map(Variant::UInt32).collect::<Vec<_>>(),
                ))
                .into()
            }),
            AttributeId::MinimumSamplingInterval => {
                self.minimum_sampling_interval().map(|v| v.into())
            }
            _ => self.base.get_attribute(attribute_id),
        }
    }

    fn set_attribute(&mut self, attribute_id: AttributeId, value: Variant) -> Result<(), StatusCode> {
        match attribute_id {
            AttributeId::Value => {
                self.set_value(value);
                Ok(())
            }
            AttributeId::DataType => {
                if let Variant::NodeId(v) = value {
                    self.set_data_type(*v);
                    Ok(())
                } else {
                    Err(StatusCode::BadTypeMismatch)
                }
            }
            AttributeId::ValueRank => {
                if let Variant::Int32(v) = value {
                    self.set_value_rank(v);
                    Ok(())
                } else {
                    Err(StatusCode::BadTypeMismatch)
                }
            }
            AttributeId::AccessLevel => {
                if let Variant::Byte(v) = value {
                    self.set_access_level(AccessLevel::from_bits_truncate(v));
                    Ok(())
                } else {
                    Err(StatusCode::BadTypeMismatch)
                }
            }
            AttributeId::UserAccessLevel => {
                if let Variant::Byte(v) = value {
                    self.set_user_access_level(AccessLevel::from_bits_truncate(v));
                    Ok(())
                } else {
                    Err(StatusCode::BadTypeMismatch)
                }
            }
            AttributeId::Historizing => {
                if let Variant::Boolean(v) = value {
                    self.set_historizing(v);
                    Ok(())
                } else {
                    Err(StatusCode::BadTypeMismatch)
                }
            }
            AttributeId::MinimumSamplingInterval => {
                if let Variant::Double(v) = value {
                    self.set_minimum_sampling_interval(v);
                    Ok(())
                } else {
                    Err(StatusCode::BadTypeMismatch)
                }
            }
            _ => self.base.set_attribute(attribute_id, value),
        }
    }
}

impl Variable {
    /// Create a new variable. The data type, value rank and array
    /// dimensions are inferred from the supplied value.
    pub fn new(
        node_id: &NodeId,
        browse_name: impl Into<QualifiedName>,
        display_name: impl Into<LocalizedText>,
        value: impl Into<Variant>,
    ) -> Variable {
        let value = value.into();
        let mut variable = Variable {
            base: Base::new(NodeClass::Variable, node_id, browse_name, display_name),
            ..Default::default()
        };
        if let Some(data_type) = value.data_type() {
            variable.set_data_type(data_type);
        }
        variable.set_value(value);
        variable
    }

    /// Create a new variable from [VariableAttributes].
    pub fn from_attributes(
        node_id: &NodeId,
        browse_name: impl Into<QualifiedName>,
        attributes: VariableAttributes,
    ) -> Result<Self, FromAttributesError> {
        let mandatory_attributes = AttributesMask::DISPLAY_NAME
            | AttributesMask::ACCESS_LEVEL
            | AttributesMask::USER_ACCESS_LEVEL
            | AttributesMask::DATA_TYPE
            | AttributesMask::HISTORIZING
            | AttributesMask::VALUE
            | AttributesMask::VALUE_RANK;
        let mask = AttributesMask::from_bits(attributes.specified_attributes)
            .ok_or(FromAttributesError::InvalidMask)?;
        if mask.contains(mandatory_attributes) {
            let mut node = Self::new(node_id, browse_name, attributes.display_name, Variant::Empty);
            node.set_value(attributes.value);
            node.set_data_type(attributes.data_type);
            node.set_historizing(attributes.historizing);
            node.set_value_rank(attributes.value_rank);
            node.set_access_level(AccessLevel::from_bits_truncate(attributes.access_level));
            node.set_user_access_level(AccessLevel::from_bits_truncate(
                attributes.user_access_level,
            ));
            if mask.contains(AttributesMask::DESCRIPTION) {
                node.set_description(attributes.description);
            }
            if mask.contains(AttributesMask::WRITE_MASK) {
                node.set_write_mask(WriteMask::from_bits_truncate(attributes.write_mask));
            }
            if mask.contains(AttributesMask::USER_WRITE_MASK) {
                node.set_user_write_mask(WriteMask::from_bits_truncate(attributes.user_write_mask));
            }
            if mask.contains(AttributesMask::ARRAY_DIMENSIONS) {
                if let Some(dimensions) = attributes.array_dimensions {
                    node.set_array_dimensions(&dimensions);
                }
            }
            if mask.contains(AttributesMask::MINIMUM_SAMPLING_INTERVAL) {
                node.set_minimum_sampling_interval(attributes.minimum_sampling_interval);
            }
            Ok(node)
        } else {
            error!("Variable cannot be created from attributes - missing mandatory values");
            Err(FromAttributesError::MissingMandatoryValues)
        }
    }

    /// Get whether this variable is valid.
    pub fn is_valid(&self) -> bool {
        self.base.is_valid()
    }

    /// Get the current value of the variable.
    pub fn value(&self) -> DataValue {
        self.value.clone()
    }

    /// Set the value of the variable, timestamped now. The value rank and
    /// array dimensions follow an array value.
    pub fn set_value(&mut self, value: impl Into<Variant>) {
        let value = value.into();
        if let Variant::Array(ref array) = value {
            self.value_rank = array.value_rank();
            self.array_dimensions = Some(array.array_dimensions());
        }
        self.value = DataValue::new_now(value);
    }

    /// Set the value of the variable to a full data value.
    pub fn set_data_value(&mut self, value: DataValue) {
        self.value = value;
    }

    /// Get the data type of this variable.
    pub fn data_type(&self) -> &NodeId {
        &self.data_type
    }

    /// Set the data type of this variable.
    pub fn set_data_type(&mut self, data_type: impl Into<NodeId>) {
        self.data_type = data_type.into();
    }

    /// Get the value rank of this variable, -1 for a scalar.
    pub fn value_rank(&self) -> i32 {
        self.value_rank
    }

    /// Set the value rank of this variable.
    pub fn set_value_rank(&mut self, value_rank: i32) {
        self.value_rank = value_rank;
    }

    /// Get the array dimensions of this variable.
    pub fn array_dimensions(&self) -> Option<Vec<u32>> {
        self.array_dimensions.clone()
    }

    /// Set the array dimensions of this variable.
    pub fn set_array_dimensions(&mut self, array_dimensions: &[u32]) {
        self.array_dimensions = Some(array_dimensions.to_vec());
    }

    /// Get the access level of this variable.
    pub fn access_level(&self) -> AccessLevel {
        AccessLevel::from_bits_truncate(self.access_level)
    }

    /// Set the access level of this variable.
    pub fn set_access_level(&mut self, access_level: AccessLevel) {
        self.access_level = access_level.bits();
    }

    /// Get the user access level of this variable.
    pub fn user_access_level(&self) -> AccessLevel {
        AccessLevel::from_bits_truncate(self.user_access_level)
    }

    /// Set the user access level of this variable.
    pub fn set_user_access_level(&mut self, user_access_level: AccessLevel) {
        self.user_access_level = user_access_level.bits();
    }

    /// Get the minimum sampling interval of this variable, in milliseconds.
    pub fn minimum_sampling_interval(&self) -> Option<f64> {
        self.minimum_sampling_interval
    }

    /// Set the minimum sampling interval of this variable, in milliseconds.
    pub fn set_minimum_sampling_interval(&mut self, minimum_sampling_interval: f64) {
        self.minimum_sampling_interval = Some(minimum_sampling_interval);
    }

    /// Get whether this variable stores history.
    pub fn historizing(&self) -> bool {
        self.historizing
    }

    /// Set whether this variable stores history.
    pub fn set_historizing(&mut self, historizing: bool) {
        self.historizing = historizing;
    }
}
