// UA Model for Rust
// SPDX-License-Identifier: MPL-2.0

//! Materializes instances from type definitions.
//!
//! Given a type node and a target parent, the instantiator creates the
//! instance node, walks the mandatory members of the type (including the
//! members inherited along the subtype chain) depth-first, and copies each
//! template into a fresh node in the server namespace. Constructors
//! registered for the involved types fire as each node is created.
//!
//! Every created node is recorded in a rollback log; a structural failure
//! anywhere in the walk undoes the whole subtree in reverse order,
//! invoking destructors for sub-instances that were constructed, so a
//! caller either observes the complete instance or no change at all.

use std::any::Any;

use log::warn;
use uamodel_types::{
    AddNodeAttributes, NodeClass, NodeId, QualifiedName, ReferenceTypeId, StatusCode,
};

use crate::{
    address_space::{AddressSpace, ModellingRule},
    lifecycle::LifecycleRegistry,
    new_node_from_attributes, HasNodeId, Method, NodeBase, NodeInsertTarget, NodeType, Object,
    ReferenceDirection, Variable,
};

/// Callback invoked once per materialized child, with the new node id,
/// the template it was copied from, and the handle its constructor
/// attached to it, if any.
pub type InstantiationCallback<'a> =
    &'a mut dyn FnMut(&NodeId, &NodeId, Option<&(dyn Any + Send + Sync)>);

pub(crate) struct Instantiator<'a, 'b> {
    address_space: &'a mut AddressSpace,
    lifecycle: &'a mut LifecycleRegistry,
    callback: Option<InstantiationCallback<'b>>,
    // Rollback log, paired with the lifecycle type whose constructor ran.
    created: Vec<(NodeId, Option<NodeId>)>,
}

impl<'a, 'b> Instantiator<'a, 'b> {
    pub(crate) fn new(
        address_space: &'a mut AddressSpace,
        lifecycle: &'a mut LifecycleRegistry,
        callback: Option<InstantiationCallback<'b>>,
    ) -> Self {
        Self {
            address_space,
            lifecycle,
            callback,
            created: Vec::new(),
        }
    }

    /// Create an instance of `type_definition_id` under `parent_id`. The
    /// instance id must be fresh, validation of the request arguments has
    /// already happened in the service layer.
    pub(crate) fn instantiate(
        mut self,
        instance_id: NodeId,
        parent_id: &NodeId,
        reference_type_id: &NodeId,
        browse_name: QualifiedName,
        node_class: NodeClass,
        type_definition_id: &NodeId,
        attributes: AddNodeAttributes,
    ) -> Result<NodeId, StatusCode> {
        match self.instantiate_inner(
            instance_id,
            parent_id,
            reference_type_id,
            browse_name,
            node_class,
            type_definition_id,
            attributes,
        ) {
            Ok(id) => Ok(id),
            Err(e) => {
                self.rollback();
                Err(e)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn instantiate_inner(
        &mut self,
        instance_id: NodeId,
        parent_id: &NodeId,
        reference_type_id: &NodeId,
        browse_name: QualifiedName,
        node_class: NodeClass,
        type_definition_id: &NodeId,
        attributes: AddNodeAttributes,
    ) -> Result<NodeId, StatusCode> {
        let type_node = self
            .address_space
            .find_node(type_definition_id)
            .ok_or(StatusCode::BadTypeDefinitionInvalid)?;
        let class_matches = matches!(
            (node_class, type_node.node_class()),
            (NodeClass::Object, NodeClass::ObjectType)
                | (NodeClass::Variable, NodeClass::VariableType)
        );
        if !class_matches || type_node.is_abstract() == Some(true) {
            return Err(StatusCode::BadTypeDefinitionInvalid);
        }

        let node = new_node_from_attributes(&instance_id, browse_name, node_class, attributes)
            .map_err(|_| StatusCode::BadNodeAttributesInvalid)?;
        self.insert_instance(node, parent_id, reference_type_id, type_definition_id)?;
        self.populate_children(&instance_id, type_definition_id)?;
        Ok(instance_id)
    }

    /// Insert one instance node with its parent reference and type
    /// definition, then fire the constructor of the most-derived type
    /// with one registered.
    fn insert_instance(
        &mut self,
        node: NodeType,
        parent_id: &NodeId,
        reference_type_id: &NodeId,
        type_definition_id: &NodeId,
    ) -> Result<(), StatusCode> {
        // An abstract type anywhere in the declaration hierarchy cannot
        // be materialized.
        let type_node = self
            .address_space
            .find_node(type_definition_id)
            .ok_or(StatusCode::BadTypeDefinitionInvalid)?;
        if type_node.is_abstract() == Some(true) {
            return Err(StatusCode::BadTypeDefinitionInvalid);
        }

        let node_id = node.node_id().clone();
        let type_definition_ref: NodeId = ReferenceTypeId::HasTypeDefinition.into();
        let references = [
            (parent_id, reference_type_id, ReferenceDirection::Inverse),
            (
                type_definition_id,
                &type_definition_ref,
                ReferenceDirection::Forward,
            ),
        ];
        if !self.address_space.insert(node, Some(&references)) {
            return Err(StatusCode::BadNodeIdExists);
        }

        let constructed = self.constructor_type(type_definition_id);
        if let Some(lifecycle_type) = &constructed {
            self.lifecycle.construct(lifecycle_type, &node_id);
        }
        self.created.push((node_id, constructed));
        Ok(())
    }

    /// Materialize the mandatory members of `type_id` under
    /// `instance_id`, depth-first so parents always exist before their
    /// children.
    fn populate_children(
        &mut self,
        instance_id: &NodeId,
        type_id: &NodeId,
    ) -> Result<(), StatusCode> {
        for child in self
            .address_space
            .type_children(type_id, Some(ModellingRule::Mandatory))
        {
            let new_id = self.address_space.next_node_id();
            let node = {
                let template = self
                    .address_space
                    .find_node(&child.template_id)
                    .ok_or(StatusCode::BadInternalError)?;
                match copy_template(template, &new_id) {
                    Some(node) => node,
                    None => {
                        warn!(
                            "Type member {} has node class {:?} which is not instantiated",
                            child.template_id,
                            template.node_class()
                        );
                        continue;
                    }
                }
            };

            let child_type = self.address_space.type_definition(&child.template_id).ok();
            match &child_type {
                Some(type_id) => {
                    self.insert_instance(node, instance_id, &child.reference_type, type_id)?;
                }
                None => {
                    let references =
                        [(instance_id, &child.reference_type, ReferenceDirection::Inverse)];
                    let node_id = node.node_id().clone();
                    if !self.address_space.insert(node, Some(&references)) {
                        return Err(StatusCode::BadNodeIdExists);
                    }
                    self.created.push((node_id, None));
                }
            }

            if let Some(cb) = self.callback.as_deref_mut() {
                cb(&new_id, &child.template_id, self.lifecycle.handle(&new_id));
            }

            // A member typed to another type brings that type's own
            // mandatory structure with it.
            if let Some(child_type) = &child_type {
                self.populate_children(&new_id, child_type)?;
            }
        }
        Ok(())
    }

    /// The most-derived type in the chain of `type_id` with a registered
    /// constructor.
    fn constructor_type(&self, type_id: &NodeId) -> Option<NodeId> {
        self.address_space
            .type_chain(type_id)
            .into_iter()
            .find(|t| self.lifecycle.has_constructor(t))
    }

    /// Undo every node created so far in reverse order, invoking
    /// destructors for sub-instances whose constructors ran.
    fn rollback(&mut self) {
        for (node_id, constructed) in self.created.drain(..).rev() {
            if let Some(lifecycle_type) = constructed {
                self.lifecycle.destroy(&lifecycle_type, &node_id);
            } else {
                self.lifecycle.discard_handle(&node_id);
            }
            self.address_space.delete(&node_id, true);
        }
    }
}

/// Copy a template node into a fresh node id, keeping its class-specific
/// attributes. Modelling rule references are deliberately not part of the
/// copy; they describe the template, not the instance.
fn copy_template(template: &NodeType, new_id: &NodeId) -> Option<NodeType> {
    let browse_name = template.as_node().browse_name().clone();
    let display_name = template.as_node().display_name().clone();
    let description = template.as_node().description().cloned();
    let mut node: NodeType = match template {
        NodeType::Variable(v) => {
            let mut instance = Variable::new(
                new_id,
                browse_name,
                display_name,
                uamodel_types::Variant::Empty,
            );
            instance.set_data_value(v.value());
            instance.set_data_type(v.data_type().clone());
            instance.set_value_rank(v.value_rank());
            if let Some(dimensions) = v.array_dimensions() {
                instance.set_array_dimensions(&dimensions);
            }
            instance.set_access_level(v.access_level());
            instance.set_user_access_level(v.user_access_level());
            if let Some(interval) = v.minimum_sampling_interval() {
                instance.set_minimum_sampling_interval(interval);
            }
            instance.set_historizing(v.historizing());
            instance.into()
        }
        NodeType::Object(o) => {
            Object::new(new_id, browse_name, display_name, o.event_notifier()).into()
        }
        NodeType::Method(m) => Method::new(
            new_id,
            browse_name,
            display_name,
            m.executable(),
            m.user_executable(),
        )
        .into(),
        _ => return None,
    };
    if let Some(description) = description {
        node.as_mut_node().set_description(description);
    }
    Some(node)
}
