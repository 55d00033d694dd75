// UA Model for Rust
// SPDX-License-Identifier: MPL-2.0

//! Generic construction of a node from an attribute collection, used by the
//! AddNodes service.

use uamodel_types::{AddNodeAttributes, NodeClass, NodeId, QualifiedName};

use crate::{
    DataType, EventNotifier, FromAttributesError, Method, NodeType, Object, ObjectType,
    ReferenceType, Variable, VariableType, View,
};

/// Create a node of the given class from an [`AddNodeAttributes`]
/// collection. The attributes must match the node class, except for the
/// empty collection which is valid for any class and yields a node with
/// default attributes.
pub fn new_node_from_attributes(
    node_id: &NodeId,
    browse_name: impl Into<QualifiedName>,
    node_class: NodeClass,
    node_attributes: AddNodeAttributes,
) -> Result<NodeType, FromAttributesError> {
    if node_attributes
        .node_class()
        .is_some_and(|nc| nc != node_class)
    {
        return Err(FromAttributesError::InvalidMask);
    }
    let node: NodeType = match (node_class, node_attributes) {
        (NodeClass::Object, AddNodeAttributes::Object(attrs)) => {
            Object::from_attributes(node_id, browse_name, attrs)?.into()
        }
        (NodeClass::Object, AddNodeAttributes::None) => {
            Object::new(node_id, browse_name, "", EventNotifier::empty()).into()
        }
        (NodeClass::Variable, AddNodeAttributes::Variable(attrs)) => {
            Variable::from_attributes(node_id, browse_name, attrs)?.into()
        }
        (NodeClass::Variable, AddNodeAttributes::None) => {
            Variable::new(node_id, browse_name, "", uamodel_types::Variant::Empty).into()
        }
        (NodeClass::Method, AddNodeAttributes::Method(attrs)) => {
            Method::from_attributes(node_id, browse_name, attrs)?.into()
        }
        (NodeClass::Method, AddNodeAttributes::None) => {
            Method::new(node_id, browse_name, "", false, false).into()
        }
        (NodeClass::ObjectType, AddNodeAttributes::ObjectType(attrs)) => {
            ObjectType::from_attributes(node_id, browse_name, attrs)?.into()
        }
        (NodeClass::ObjectType, AddNodeAttributes::None) => {
            ObjectType::new(node_id, browse_name, "", false).into()
        }
        (NodeClass::VariableType, AddNodeAttributes::VariableType(attrs)) => {
            VariableType::from_attributes(node_id, browse_name, attrs)?.into()
        }
        (NodeClass::VariableType, AddNodeAttributes::None) => {
            VariableType::new(node_id, browse_name, "", NodeId::null(), false, -1).into()
        }
        (NodeClass::ReferenceType, AddNodeAttributes::ReferenceType(attrs)) => {
            ReferenceType::from_attributes(node_id, browse_name, attrs)?.into()
        }
        (NodeClass::ReferenceType, AddNodeAttributes::None) => {
            ReferenceType::new(node_id, browse_name, "", None, false, false).into()
        }
        (NodeClass::DataType, AddNodeAttributes::DataType(attrs)) => {
            DataType::from_attributes(node_id, browse_name, attrs)?.into()
        }
        (NodeClass::DataType, AddNodeAttributes::None) => {
            DataType::new(node_id, browse_name, "", false).into()
        }
        (NodeClass::View, AddNodeAttributes::View(attrs)) => {
            View::from_attributes(node_id, browse_name, attrs)?.into()
        }
        (NodeClass::View, AddNodeAttributes::None) => {
            View::new(node_id, browse_name, "", EventNotifier::empty(), true).into()
        }
        _ => return Err(FromAttributesError::InvalidMask),
    };
    Ok(node)
}
