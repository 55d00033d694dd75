use uamodel_types::{AttributeId, DataValue, StatusCode, Variant, WriteMask};

use super::{AccessLevel, Node, NodeType, TypeTree, Variable};

/// Validate that the value of the given node can be read.
pub fn is_readable(node: &NodeType) -> Result<(), StatusCode> {
    let readable = match node {
        NodeType::Variable(v) => v.access_level().contains(AccessLevel::CURRENT_READ),
        _ => true,
    };
    if readable {
        Ok(())
    } else {
        Err(StatusCode::BadNotReadable)
    }
}

/// Validate that the attribute given by `attribute_id` can be written
/// on this node.
pub fn is_writable(node: &NodeType, attribute_id: AttributeId) -> Result<(), StatusCode> {
    if let (NodeType::Variable(v), AttributeId::Value) = (node, attribute_id) {
        if !v.access_level().contains(AccessLevel::CURRENT_WRITE) {
            return Err(StatusCode::BadNotWritable);
        }

        Ok(())
    } else {
        let mask_value = match attribute_id {
            // The address space does not support modifying node class or node id.
            AttributeId::BrowseName => WriteMask::BROWSE_NAME,
            AttributeId::DisplayName => WriteMask::DISPLAY_NAME,
            AttributeId::Description => WriteMask::DESCRIPTION,
            AttributeId::WriteMask => WriteMask::WRITE_MASK,
            AttributeId::UserWriteMask => WriteMask::USER_WRITE_MASK,
            AttributeId::IsAbstract => WriteMask::IS_ABSTRACT,
            AttributeId::Symmetric => WriteMask::SYMMETRIC,
            AttributeId::InverseName => WriteMask::INVERSE_NAME,
            AttributeId::ContainsNoLoops => WriteMask::CONTAINS_NO_LOOPS,
            AttributeId::EventNotifier => WriteMask::EVENT_NOTIFIER,
            AttributeId::Value => WriteMask::VALUE_FOR_VARIABLE_TYPE,
            AttributeId::DataType => WriteMask::DATA_TYPE,
            AttributeId::ValueRank => WriteMask::VALUE_RANK,
            AttributeId::ArrayDimensions => WriteMask::ARRAY_DIMENSIONS,
            AttributeId::AccessLevel => WriteMask::ACCESS_LEVEL,
            AttributeId::UserAccessLevel => WriteMask::USER_ACCESS_LEVEL,
            AttributeId::MinimumSamplingInterval => WriteMask::MINIMUM_SAMPLING_INTERVAL,
            AttributeId::Historizing => WriteMask::HISTORIZING,
            AttributeId::Executable => WriteMask::EXECUTABLE,
            AttributeId::UserExecutable => WriteMask::USER_EXECUTABLE,
            _ => return Err(StatusCode::BadNotWritable),
        };

        let write_mask = node.as_node().write_mask();
        if write_mask.is_none() || write_mask.is_some_and(|wm| !wm.contains(mask_value)) {
            return Err(StatusCode::BadNotWritable);
        }
        Ok(())
    }
}

/// Validate `value`, verifying that it can be written as the value of
/// `variable`. The value's data type must be the variable's data type or
/// a subtype of it.
pub fn validate_value_to_write(
    variable: &Variable,
    value: &Variant,
    type_tree: &dyn TypeTree,
) -> Result<(), StatusCode> {
    if matches!(value, Variant::Empty) {
        return Ok(());
    }

    let Some(value_data_type) = value.data_type() else {
        return Err(StatusCode::BadTypeMismatch);
    };

    if type_tree.is_subtype_of(&value_data_type.into(), variable.data_type()) {
        Ok(())
    } else {
        Err(StatusCode::BadTypeMismatch)
    }
}

/// Invoke `Read` for the given attribute on `node`.
///
/// This can return a data value containing an error if validation failed.
pub fn read_node_value(node: &NodeType, attribute_id: AttributeId) -> DataValue {
    let mut result_value = DataValue::null();

    if let Err(e) = is_readable(node) {
        result_value.status = Some(e);
        return result_value;
    }

    let Some(attribute) = node.as_node().get_attribute(attribute_id) else {
        result_value.status = Some(StatusCode::BadAttributeIdInvalid);
        return result_value;
    };

    result_value.value = attribute.value;
    result_value.status = attribute.status;
    if matches!(node, NodeType::Variable(_)) && attribute_id == AttributeId::Value {
        result_value.source_timestamp = attribute.source_timestamp;
        result_value.server_timestamp = attribute.server_timestamp;
    }
    result_value
}

/// Validate a `Write` of the given attribute on `node`. The mutation
/// itself happens through [`crate::Node::set_attribute`] once validation
/// has passed; the split lets the caller validate against the type tree
/// while the node is still only borrowed shared.
pub fn validate_node_write(
    node: &NodeType,
    attribute_id: AttributeId,
    value: &Variant,
    type_tree: &dyn TypeTree,
) -> Result<(), StatusCode> {
    is_writable(node, attribute_id)?;

    if let (NodeType::Variable(var), AttributeId::Value) = (node, attribute_id) {
        validate_value_to_write(var, value, type_tree)?;
    }

    Ok(())
}
