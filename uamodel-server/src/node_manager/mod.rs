// UA Model for Rust
// SPDX-License-Identifier: MPL-2.0

//! The [`NodeManager`], the service facade over the address space.
//!
//! All mutations of the address space, the lifecycle registry and the
//! server-assigned id counter are serialized behind write locks taken for
//! the duration of a service call; browse and attribute reads take shared
//! locks and may run concurrently with each other. Service calls never
//! suspend and are not cancellable once accepted.

use hashbrown::HashMap;
use log::{debug, warn};
use parking_lot::RwLock;

use uamodel_types::{
    AddNodesItem, AddNodesResult, AddReferencesItem, AttributeId, BrowseDescription,
    BrowseDescriptionResultMask, BrowseDirection, BrowseResult, DataValue, DeleteNodesItem,
    DeleteReferencesItem, ExpandedNodeId, LocalizedText, NamespaceMap, NodeClass, NodeClassMask,
    NodeId, QualifiedName, ReferenceDescription, ReferenceTypeId, StatusCode, Variant,
};

use crate::{
    address_space::{read_node_value, validate_node_write, AddressSpace, CoreNamespace},
    instantiator::{InstantiationCallback, Instantiator},
    lifecycle::{Constructor, Destructor, LifecycleRegistry},
    new_node_from_attributes, Node, NodeBase, NodeInsertTarget, NodeType, ReferenceDirection,
    TypeTree,
};

/// Handler invoked when a method node is called through the service
/// layer.
pub type MethodCallback =
    Box<dyn Fn(&[Variant]) -> Result<Vec<Variant>, StatusCode> + Send + Sync>;

/// The address space and node management core of the server.
///
/// Owns the node store, the reference index, the lifecycle registry and
/// the namespace table; no process-wide state is involved, so multiple
/// independent managers can coexist in one process.
pub struct NodeManager {
    address_space: RwLock<AddressSpace>,
    lifecycle: RwLock<LifecycleRegistry>,
    method_cbs: RwLock<HashMap<NodeId, MethodCallback>>,
    namespaces: RwLock<NamespaceMap>,
}

impl NodeManager {
    /// Create a new node manager whose address space holds the namespace
    /// 0 bootstrap. Server-assigned node ids are allocated in
    /// `application_namespace`, which is registered as namespace 1.
    pub fn new(application_namespace: &str) -> Self {
        let mut namespaces = NamespaceMap::new();
        let server_namespace = namespaces.add_namespace(application_namespace);

        let mut address_space = AddressSpace::new();
        for (uri, index) in namespaces.known_namespaces() {
            address_space.add_namespace(uri, *index);
        }
        address_space.set_server_namespace(server_namespace);
        CoreNamespace::populate(&mut address_space);

        Self {
            address_space: RwLock::new(address_space),
            lifecycle: RwLock::new(LifecycleRegistry::new()),
            method_cbs: RwLock::new(HashMap::new()),
            namespaces: RwLock::new(namespaces),
        }
    }

    /// The address space behind its lock, for embedders that populate
    /// their own nodes directly.
    pub fn address_space(&self) -> &RwLock<AddressSpace> {
        &self.address_space
    }

    /// Register an additional namespace, returning its index.
    pub fn add_namespace(&self, namespace: &str) -> u16 {
        let mut namespaces = self.namespaces.write();
        let mut address_space = self.address_space.write();
        let index = namespaces.add_namespace(namespace);
        address_space.add_namespace(namespace, index);
        index
    }

    /// Get the index of a registered namespace.
    pub fn namespace_index(&self, namespace: &str) -> Option<u16> {
        self.namespaces.read().get_index(namespace)
    }

    /// Register, or replace, constructor and destructor hooks for a type.
    pub fn set_lifecycle(
        &self,
        type_id: impl Into<NodeId>,
        constructor: Option<Constructor>,
        destructor: Option<Destructor>,
    ) {
        self.lifecycle
            .write()
            .set_lifecycle(type_id.into(), constructor, destructor);
    }

    /// Register a handler for calls to the given method node.
    pub fn register_method(&self, method_id: impl Into<NodeId>, callback: MethodCallback) {
        self.method_cbs.write().insert(method_id.into(), callback);
    }

    /// Add a single node. Validation happens in a fixed order and the
    /// first failure returns without mutating anything.
    pub fn add_node(&self, item: &AddNodesItem) -> Result<NodeId, StatusCode> {
        self.add_node_with_callback(item, None)
    }

    /// Add a single node, invoking `callback` once per materialized child
    /// when the node class has a type definition to instantiate.
    pub fn add_node_with_callback(
        &self,
        item: &AddNodesItem,
        callback: Option<InstantiationCallback<'_>>,
    ) -> Result<NodeId, StatusCode> {
        let mut address_space = self.address_space.write();
        let mut lifecycle = self.lifecycle.write();
        Self::add_node_inner(&mut address_space, &mut lifecycle, item, callback)
    }

    /// Add a list of nodes, one result per item.
    pub fn add_nodes(&self, items: &[AddNodesItem]) -> Vec<AddNodesResult> {
        let mut address_space = self.address_space.write();
        let mut lifecycle = self.lifecycle.write();
        items
            .iter()
            .map(
                |item| match Self::add_node_inner(&mut address_space, &mut lifecycle, item, None) {
                    Ok(added_node_id) => AddNodesResult {
                        status_code: StatusCode::Good,
                        added_node_id,
                    },
                    Err(status_code) => AddNodesResult {
                        status_code,
                        added_node_id: NodeId::null(),
                    },
                },
            )
            .collect()
    }

    fn add_node_inner(
        address_space: &mut AddressSpace,
        lifecycle: &mut LifecycleRegistry,
        item: &AddNodesItem,
        callback: Option<InstantiationCallback<'_>>,
    ) -> Result<NodeId, StatusCode> {
        if address_space.find_node(&item.parent_node_id).is_none() {
            return Err(StatusCode::BadParentNodeIdInvalid);
        }
        if !matches!(
            address_space.find_node(&item.reference_type_id),
            Some(NodeType::ReferenceType(_))
        ) {
            return Err(StatusCode::BadReferenceTypeIdInvalid);
        }
        if !item.requested_new_node_id.is_null()
            && address_space.node_exists(&item.requested_new_node_id)
        {
            return Err(StatusCode::BadNodeIdExists);
        }
        if item.browse_name.is_null() {
            return Err(StatusCode::BadBrowseNameInvalid);
        }
        if item.node_class == NodeClass::Unspecified {
            return Err(StatusCode::BadNodeClassInvalid);
        }
        if item
            .node_attributes
            .node_class()
            .is_some_and(|nc| nc != item.node_class)
        {
            return Err(StatusCode::BadNodeAttributesInvalid);
        }

        let has_type_definition =
            matches!(item.node_class, NodeClass::Object | NodeClass::Variable);
        if has_type_definition {
            let expected_class = match item.node_class {
                NodeClass::Object => NodeClass::ObjectType,
                _ => NodeClass::VariableType,
            };
            let valid = address_space
                .find_node(&item.type_definition)
                .is_some_and(|t| {
                    t.node_class() == expected_class && t.is_abstract() != Some(true)
                });
            if !valid {
                return Err(StatusCode::BadTypeDefinitionInvalid);
            }
        } else if !item.type_definition.is_null() {
            return Err(StatusCode::BadTypeDefinitionInvalid);
        }

        // A browse name must be unique among the siblings reached from
        // the parent by the same hierarchical reference type.
        let hierarchical = address_space.is_subtype_of(
            &item.reference_type_id,
            &ReferenceTypeId::HierarchicalReferences.into(),
        );
        if hierarchical
            && address_space
                .find_node_by_browse_name(
                    &item.parent_node_id,
                    Some((item.reference_type_id.clone(), false)),
                    BrowseDirection::Forward,
                    item.browse_name.clone(),
                )
                .is_some()
        {
            return Err(StatusCode::BadBrowseNameDuplicated);
        }

        let node_id = if item.requested_new_node_id.is_null() {
            address_space.next_node_id()
        } else {
            item.requested_new_node_id.clone()
        };

        if has_type_definition {
            let instantiator = Instantiator::new(address_space, lifecycle, callback);
            return instantiator.instantiate(
                node_id,
                &item.parent_node_id,
                &item.reference_type_id,
                item.browse_name.clone(),
                item.node_class,
                &item.type_definition,
                item.node_attributes.clone(),
            );
        }

        let node = new_node_from_attributes(
            &node_id,
            item.browse_name.clone(),
            item.node_class,
            item.node_attributes.clone(),
        )
        .map_err(|_| StatusCode::BadNodeAttributesInvalid)?;

        let references = [(
            &item.parent_node_id,
            &item.reference_type_id,
            ReferenceDirection::Inverse,
        )];
        if !address_space.insert(node, Some(&references)) {
            return Err(StatusCode::BadNodeIdExists);
        }
        debug!("Added node {} under {}", node_id, item.parent_node_id);
        Ok(node_id)
    }

    /// Add a single reference pair. Both halves are installed atomically.
    pub fn add_reference(&self, item: &AddReferencesItem) -> Result<(), StatusCode> {
        let mut address_space = self.address_space.write();
        Self::add_reference_inner(&mut address_space, item)
    }

    /// Add a list of references, one status per item.
    pub fn add_references(&self, items: &[AddReferencesItem]) -> Vec<StatusCode> {
        let mut address_space = self.address_space.write();
        items
            .iter()
            .map(
                |item| match Self::add_reference_inner(&mut address_space, item) {
                    Ok(()) => StatusCode::Good,
                    Err(e) => e,
                },
            )
            .collect()
    }

    fn add_reference_inner(
        address_space: &mut AddressSpace,
        item: &AddReferencesItem,
    ) -> Result<(), StatusCode> {
        if address_space.find_node(&item.source_node_id).is_none() {
            return Err(StatusCode::BadSourceNodeIdInvalid);
        }
        if !matches!(
            address_space.find_node(&item.reference_type_id),
            Some(NodeType::ReferenceType(_))
        ) {
            return Err(StatusCode::BadReferenceTypeIdInvalid);
        }
        if address_space.find_node(&item.target_node_id).is_none() {
            return Err(StatusCode::BadTargetNodeIdInvalid);
        }
        if item.source_node_id == item.target_node_id {
            return Err(StatusCode::BadInvalidSelfReference);
        }

        let (source, target) = if item.is_forward {
            (&item.source_node_id, &item.target_node_id)
        } else {
            (&item.target_node_id, &item.source_node_id)
        };

        // Keep the subtype relation a forest: a HasSubtype edge that
        // links a type under one of its own descendants is rejected.
        if item.reference_type_id == ReferenceTypeId::HasSubtype
            && address_space.subtype_would_cycle(target, source)
        {
            return Err(StatusCode::BadReferenceNotAllowed);
        }

        if address_space.has_reference(source, target, item.reference_type_id.clone()) {
            return Err(StatusCode::BadDuplicateReferenceNotAllowed);
        }
        address_space.insert_reference(source, target, item.reference_type_id.clone());
        Ok(())
    }

    /// Delete a single node. Destructors fire before any state changes,
    /// and aggregated children that become unreachable from the root are
    /// deleted with it.
    pub fn delete_node(&self, item: &DeleteNodesItem) -> Result<(), StatusCode> {
        let mut address_space = self.address_space.write();
        let mut lifecycle = self.lifecycle.write();
        let mut deleted = Vec::new();
        let result = Self::delete_node_inner(
            &mut address_space,
            &mut lifecycle,
            &item.node_id,
            item.delete_target_references,
            &mut deleted,
        );
        if !deleted.is_empty() {
            let mut method_cbs = self.method_cbs.write();
            for node_id in &deleted {
                method_cbs.remove(node_id);
            }
        }
        result
    }

    /// Delete a list of nodes, one status per item.
    pub fn delete_nodes(&self, items: &[DeleteNodesItem]) -> Vec<StatusCode> {
        items
            .iter()
            .map(|item| match self.delete_node(item) {
                Ok(()) => StatusCode::Good,
                Err(e) => e,
            })
            .collect()
    }

    fn delete_node_inner(
        address_space: &mut AddressSpace,
        lifecycle: &mut LifecycleRegistry,
        node_id: &NodeId,
        delete_target_references: bool,
        deleted: &mut Vec<NodeId>,
    ) -> Result<(), StatusCode> {
        if !address_space.node_exists(node_id) {
            return Err(StatusCode::BadNodeIdUnknown);
        }

        // Fire the destructor of the most-derived type with one
        // registered, then drop any remaining handle.
        if let Ok(type_definition) = address_space.type_definition(node_id) {
            let destructor_type = address_space
                .type_chain(&type_definition)
                .into_iter()
                .find(|t| lifecycle.has_destructor(t));
            if let Some(destructor_type) = destructor_type {
                lifecycle.destroy(&destructor_type, node_id);
            }
        }
        lifecycle.discard_handle(node_id);

        // Aggregated children may be orphaned by this deletion; collect
        // them before the references go away.
        let owned: Vec<NodeId> = address_space
            .find_references(
                node_id,
                Some((ReferenceTypeId::Aggregates, true)),
                BrowseDirection::Forward,
            )
            .map(|rf| rf.target_node.clone())
            .collect();

        address_space.delete(node_id, delete_target_references);
        deleted.push(node_id.clone());

        let root = NodeId::root_folder_id();
        for child in owned {
            if address_space.node_exists(&child) && !address_space.is_reachable_from(&root, &child)
            {
                Self::delete_node_inner(
                    address_space,
                    lifecycle,
                    &child,
                    delete_target_references,
                    deleted,
                )?;
            }
        }
        Ok(())
    }

    /// Delete a single reference, or one half of it when
    /// `delete_bidirectional` is off.
    pub fn delete_reference(&self, item: &DeleteReferencesItem) -> Result<(), StatusCode> {
        let mut address_space = self.address_space.write();
        Self::delete_reference_inner(&mut address_space, item)
    }

    /// Delete a list of references, one status per item.
    pub fn delete_references(&self, items: &[DeleteReferencesItem]) -> Vec<StatusCode> {
        let mut address_space = self.address_space.write();
        items
            .iter()
            .map(
                |item| match Self::delete_reference_inner(&mut address_space, item) {
                    Ok(()) => StatusCode::Good,
                    Err(e) => e,
                },
            )
            .collect()
    }

    fn delete_reference_inner(
        address_space: &mut AddressSpace,
        item: &DeleteReferencesItem,
    ) -> Result<(), StatusCode> {
        if address_space.find_node(&item.source_node_id).is_none() {
            return Err(StatusCode::BadSourceNodeIdInvalid);
        }
        if !matches!(
            address_space.find_node(&item.reference_type_id),
            Some(NodeType::ReferenceType(_))
        ) {
            return Err(StatusCode::BadReferenceTypeIdInvalid);
        }
        if address_space.find_node(&item.target_node_id).is_none() {
            return Err(StatusCode::BadTargetNodeIdInvalid);
        }

        let found = if item.delete_bidirectional {
            let (source, target) = if item.is_forward {
                (&item.source_node_id, &item.target_node_id)
            } else {
                (&item.target_node_id, &item.source_node_id)
            };
            address_space.delete_reference(source, target, item.reference_type_id.clone())
        } else {
            let direction = if item.is_forward {
                ReferenceDirection::Forward
            } else {
                ReferenceDirection::Inverse
            };
            address_space.delete_reference_half(
                &item.source_node_id,
                &item.target_node_id,
                item.reference_type_id.clone(),
                direction,
            )
        };
        if found {
            Ok(())
        } else {
            Err(StatusCode::BadNotFound)
        }
    }

    /// Browse the references of a single node.
    pub fn browse(&self, description: &BrowseDescription) -> BrowseResult {
        let address_space = self.address_space.read();
        Self::browse_inner(&address_space, description)
    }

    /// Browse a list of nodes, one result per description.
    pub fn browse_many(&self, descriptions: &[BrowseDescription]) -> Vec<BrowseResult> {
        let address_space = self.address_space.read();
        descriptions
            .iter()
            .map(|d| Self::browse_inner(&address_space, d))
            .collect()
    }

    fn browse_inner(address_space: &AddressSpace, description: &BrowseDescription) -> BrowseResult {
        if !address_space.node_exists(&description.node_id) {
            return BrowseResult::error(StatusCode::BadNodeIdUnknown);
        }
        if !description.reference_type_id.is_null()
            && address_space.get(&description.reference_type_id) != Some(NodeClass::ReferenceType)
        {
            return BrowseResult::error(StatusCode::BadReferenceTypeIdInvalid);
        }

        let node_class_mask = NodeClassMask::from_bits_truncate(description.node_class_mask);
        let result_mask =
            BrowseDescriptionResultMask::from_bits_truncate(description.result_mask);
        let filter = (!description.reference_type_id.is_null())
            .then(|| (description.reference_type_id.clone(), description.include_subtypes));

        let mut references = Vec::new();
        for rf in address_space.find_references(
            &description.node_id,
            filter,
            description.browse_direction,
        ) {
            let Some(target) = address_space.find_node(rf.target_node) else {
                // References to nodes outside this address space are not
                // resolvable here.
                warn!("Skipping reference to external node {}", rf.target_node);
                continue;
            };
            let node_class = target.node_class();
            if !node_class_mask.is_empty()
                && !node_class_mask
                    .contains(NodeClassMask::from_bits_truncate(node_class as u32))
            {
                continue;
            }

            let type_definition = if matches!(
                node_class,
                NodeClass::Object | NodeClass::Variable
            ) {
                address_space
                    .type_definition(rf.target_node)
                    .map(ExpandedNodeId::new)
                    .unwrap_or_else(|_| ExpandedNodeId::null())
            } else {
                ExpandedNodeId::null()
            };

            let mut reference = ReferenceDescription {
                reference_type_id: rf.reference_type.clone(),
                is_forward: rf.direction == ReferenceDirection::Forward,
                node_id: ExpandedNodeId::new(rf.target_node.clone()),
                browse_name: target.as_node().browse_name().clone(),
                display_name: target.as_node().display_name().clone(),
                node_class,
                type_definition,
            };
            // Clear any fields the result mask does not ask for.
            if !result_mask.contains(BrowseDescriptionResultMask::RESULT_MASK_REFERENCE_TYPE) {
                reference.reference_type_id = NodeId::null();
            }
            if !result_mask.contains(BrowseDescriptionResultMask::RESULT_MASK_NODE_CLASS) {
                reference.node_class = NodeClass::Unspecified;
            }
            if !result_mask.contains(BrowseDescriptionResultMask::RESULT_MASK_BROWSE_NAME) {
                reference.browse_name = QualifiedName::null();
            }
            if !result_mask.contains(BrowseDescriptionResultMask::RESULT_MASK_DISPLAY_NAME) {
                reference.display_name = LocalizedText::null();
            }
            if !result_mask.contains(BrowseDescriptionResultMask::RESULT_MASK_TYPE_DEFINITION) {
                reference.type_definition = ExpandedNodeId::null();
            }
            references.push(reference);
        }

        BrowseResult {
            status_code: StatusCode::Good,
            references,
        }
    }

    /// Read a single attribute of a node. Failures are reported in the
    /// status of the returned data value.
    pub fn read(&self, node_id: &NodeId, attribute_id: AttributeId) -> DataValue {
        let address_space = self.address_space.read();
        let Some(node) = address_space.find_node(node_id) else {
            return DataValue {
                status: Some(StatusCode::BadNodeIdUnknown),
                ..Default::default()
            };
        };
        read_node_value(node, attribute_id)
    }

    /// Write a single attribute of a node.
    pub fn write(
        &self,
        node_id: &NodeId,
        attribute_id: AttributeId,
        value: Variant,
    ) -> Result<(), StatusCode> {
        let mut address_space = self.address_space.write();
        {
            let Some(node) = address_space.find_node(node_id) else {
                return Err(StatusCode::BadNodeIdUnknown);
            };
            validate_node_write(node, attribute_id, &value, &*address_space)?;
        }
        let Some(node) = address_space.find_node_mut(node_id) else {
            return Err(StatusCode::BadInternalError);
        };
        node.as_mut_node().set_attribute(attribute_id, value)
    }

    /// Call a method node in the context of its owning object,
    /// dispatching to the handler registered for it.
    pub fn call_method(
        &self,
        object_id: &NodeId,
        method_id: &NodeId,
        arguments: &[Variant],
    ) -> Result<Vec<Variant>, StatusCode> {
        let address_space = self.address_space.read();
        let Some(NodeType::Method(method)) = address_space.find_node(method_id) else {
            return Err(StatusCode::BadMethodInvalid);
        };
        if !method.executable() {
            return Err(StatusCode::BadMethodInvalid);
        }
        if address_space.find_node(object_id).is_none() {
            return Err(StatusCode::BadNodeIdUnknown);
        }
        if !address_space.has_reference(object_id, method_id, ReferenceTypeId::HasComponent) {
            return Err(StatusCode::BadMethodInvalid);
        }
        drop(address_space);

        let method_cbs = self.method_cbs.read();
        let Some(callback) = method_cbs.get(method_id) else {
            return Err(StatusCode::BadMethodInvalid);
        };
        callback(arguments)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use uamodel_types::{
        AddNodeAttributes, AddNodesItem, AddReferencesItem, AttributeId, AttributesMask,
        BrowseDescription, BrowseDirection, DataTypeId, DeleteNodesItem, DeleteReferencesItem,
        MethodAttributes, NodeClass, NodeClassMask, NodeId, ObjectAttributes, ObjectId,
        ObjectTypeId, ReferenceDescription, ReferenceTypeId, StatusCode, VariableAttributes,
        VariableTypeId, Variant,
    };

    use super::NodeManager;
    use crate::{
        messages::{Request, Response},
        AccessLevel, NodeInsertTarget, ObjectBuilder, ObjectTypeBuilder, VariableBuilder,
    };

    fn make_manager() -> NodeManager {
        NodeManager::new("urn:test")
    }

    fn object_attributes(display_name: &str) -> AddNodeAttributes {
        AddNodeAttributes::Object(ObjectAttributes {
            specified_attributes: (AttributesMask::DISPLAY_NAME | AttributesMask::EVENT_NOTIFIER)
                .bits(),
            display_name: display_name.into(),
            ..Default::default()
        })
    }

    fn variable_attributes(
        display_name: &str,
        value: Variant,
        data_type: DataTypeId,
        writable: bool,
    ) -> AddNodeAttributes {
        let access = if writable {
            AccessLevel::CURRENT_READ | AccessLevel::CURRENT_WRITE
        } else {
            AccessLevel::CURRENT_READ
        };
        AddNodeAttributes::Variable(VariableAttributes {
            specified_attributes: (AttributesMask::DISPLAY_NAME
                | AttributesMask::ACCESS_LEVEL
                | AttributesMask::USER_ACCESS_LEVEL
                | AttributesMask::DATA_TYPE
                | AttributesMask::HISTORIZING
                | AttributesMask::VALUE
                | AttributesMask::VALUE_RANK)
                .bits(),
            display_name: display_name.into(),
            value,
            data_type: data_type.into(),
            value_rank: -1,
            access_level: access.bits(),
            user_access_level: access.bits(),
            ..Default::default()
        })
    }

    fn add_variable_item(node_id: NodeId, name: &str, value: Variant) -> AddNodesItem {
        AddNodesItem {
            parent_node_id: ObjectId::ObjectsFolder.into(),
            reference_type_id: ReferenceTypeId::Organizes.into(),
            requested_new_node_id: node_id,
            browse_name: name.into(),
            node_class: NodeClass::Variable,
            node_attributes: variable_attributes(name, value, DataTypeId::Int32, false),
            type_definition: VariableTypeId::BaseDataVariableType.into(),
        }
    }

    fn add_object_item(node_id: NodeId, name: &str, type_definition: NodeId) -> AddNodesItem {
        AddNodesItem {
            parent_node_id: ObjectId::ObjectsFolder.into(),
            reference_type_id: ReferenceTypeId::Organizes.into(),
            requested_new_node_id: node_id,
            browse_name: name.into(),
            node_class: NodeClass::Object,
            node_attributes: object_attributes(name),
            type_definition,
        }
    }

    fn browse_refs(manager: &NodeManager, node_id: impl Into<NodeId>) -> Vec<ReferenceDescription> {
        let result = manager.browse(&BrowseDescription::new(node_id, BrowseDirection::Forward));
        assert_eq!(result.status_code, StatusCode::Good);
        result.references
    }

    fn refs_to(references: &[ReferenceDescription], target: &NodeId) -> usize {
        references
            .iter()
            .filter(|r| &r.node_id.node_id == target)
            .count()
    }

    // Structural fingerprint used by the no-mutation-on-error tests.
    fn snapshot(manager: &NodeManager) -> (usize, Vec<String>) {
        let len = manager.address_space().read().len();
        let mut references: Vec<String> = browse_refs(manager, ObjectId::ObjectsFolder)
            .iter()
            .map(|r| {
                format!(
                    "{} {} {}",
                    r.reference_type_id, r.node_id.node_id, r.browse_name
                )
            })
            .collect();
        references.sort();
        (len, references)
    }

    /// Build DeviceType with a mandatory ManufacturerName property, and
    /// PumpType below it adding a mandatory Status and an optional
    /// MotorRPM.
    fn add_pump_type(manager: &NodeManager) -> NodeId {
        let mut address_space = manager.address_space().write();
        let device_type = NodeId::new(1, "DeviceType");
        ObjectTypeBuilder::new(&device_type, "DeviceType", "DeviceType")
            .subtype_of(ObjectTypeId::BaseObjectType)
            .insert(&mut *address_space);
        VariableBuilder::new(
            &NodeId::new(1, "DeviceType.ManufacturerName"),
            "ManufacturerName",
            "ManufacturerName",
        )
        .property_of(device_type.clone())
        .is_property()
        .modelling_rule(ObjectId::ModellingRule_Mandatory)
        .data_type(DataTypeId::String)
        .value("ACME")
        .insert(&mut *address_space);

        let pump_type = NodeId::new(1, "PumpType");
        ObjectTypeBuilder::new(&pump_type, "PumpType", "PumpType")
            .subtype_of(device_type)
            .insert(&mut *address_space);
        VariableBuilder::new(&NodeId::new(1, "PumpType.Status"), "Status", "Status")
            .component_of(pump_type.clone())
            .has_type_definition(VariableTypeId::BaseDataVariableType)
            .modelling_rule(ObjectId::ModellingRule_Mandatory)
            .data_type(DataTypeId::Boolean)
            .value(false)
            .insert(&mut *address_space);
        VariableBuilder::new(&NodeId::new(1, "PumpType.MotorRPM"), "MotorRPM", "MotorRPM")
            .component_of(pump_type.clone())
            .has_type_definition(VariableTypeId::BaseDataVariableType)
            .modelling_rule(ObjectId::ModellingRule_Optional)
            .data_type(DataTypeId::Double)
            .value(0f64)
            .insert(&mut *address_space);
        pump_type
    }

    #[test]
    fn add_variable() {
        let manager = make_manager();
        let node_id = NodeId::new(1, "the.answer");
        let assigned = manager
            .add_node(&add_variable_item(node_id.clone(), "TheAnswer", 42i32.into()))
            .unwrap();
        assert_eq!(assigned, node_id);

        let references = browse_refs(&manager, ObjectId::ObjectsFolder);
        assert_eq!(refs_to(&references, &node_id), 1);

        let value = manager.read(&node_id, AttributeId::Value);
        assert_eq!(value.status(), StatusCode::Good);
        assert_eq!(value.value, Some(Variant::Int32(42)));
    }

    #[test]
    fn add_variable_with_assigned_id() {
        let manager = make_manager();
        let assigned = manager
            .add_node(&add_variable_item(NodeId::null(), "Assigned", 1i32.into()))
            .unwrap();
        assert!(!assigned.is_null());
        assert_eq!(assigned.namespace, 1);
        assert!(manager.address_space().read().node_exists(&assigned));
    }

    #[test]
    fn duplicate_add_node() {
        let manager = make_manager();
        let node_id = NodeId::new(1, "the.answer");
        manager
            .add_node(&add_variable_item(node_id.clone(), "TheAnswer", 42i32.into()))
            .unwrap();
        let before = snapshot(&manager);

        let status = manager
            .add_node(&add_variable_item(node_id.clone(), "TheAnswer2", 43i32.into()))
            .unwrap_err();
        assert_eq!(status, StatusCode::BadNodeIdExists);
        assert_eq!(snapshot(&manager), before);
    }

    #[test]
    fn add_node_validation_order() {
        let manager = make_manager();
        let before = snapshot(&manager);

        // An invalid parent wins over an invalid reference type.
        let mut item = add_variable_item(NodeId::new(1, "v"), "v", 1i32.into());
        item.parent_node_id = NodeId::new(1, "no.such.parent");
        item.reference_type_id = NodeId::new(1, "no.such.reftype");
        assert_eq!(
            manager.add_node(&item).unwrap_err(),
            StatusCode::BadParentNodeIdInvalid
        );

        // A reference type that exists but is no ReferenceType.
        let mut item = add_variable_item(NodeId::new(1, "v"), "v", 1i32.into());
        item.reference_type_id = ObjectTypeId::BaseObjectType.into();
        assert_eq!(
            manager.add_node(&item).unwrap_err(),
            StatusCode::BadReferenceTypeIdInvalid
        );

        // An abstract type definition.
        let mut item = add_variable_item(NodeId::new(1, "v"), "v", 1i32.into());
        item.type_definition = VariableTypeId::BaseVariableType.into();
        assert_eq!(
            manager.add_node(&item).unwrap_err(),
            StatusCode::BadTypeDefinitionInvalid
        );

        // A type definition of the wrong node class.
        let mut item = add_variable_item(NodeId::new(1, "v"), "v", 1i32.into());
        item.type_definition = ObjectTypeId::BaseObjectType.into();
        assert_eq!(
            manager.add_node(&item).unwrap_err(),
            StatusCode::BadTypeDefinitionInvalid
        );

        // Attributes not matching the node class.
        let mut item = add_variable_item(NodeId::new(1, "v"), "v", 1i32.into());
        item.node_attributes = object_attributes("v");
        assert_eq!(
            manager.add_node(&item).unwrap_err(),
            StatusCode::BadNodeAttributesInvalid
        );

        // None of the failures may have touched the address space.
        assert_eq!(snapshot(&manager), before);
    }

    #[test]
    fn duplicate_browse_name_among_siblings() {
        let manager = make_manager();
        manager
            .add_node(&add_variable_item(NodeId::new(1, "v1"), "Duplicate", 1i32.into()))
            .unwrap();
        let before = snapshot(&manager);

        let status = manager
            .add_node(&add_variable_item(NodeId::new(1, "v2"), "Duplicate", 2i32.into()))
            .unwrap_err();
        assert_eq!(status, StatusCode::BadBrowseNameDuplicated);
        assert_eq!(snapshot(&manager), before);

        // The same name under a different hierarchical reference type is
        // allowed.
        let mut item = add_variable_item(NodeId::new(1, "v3"), "Duplicate", 3i32.into());
        item.reference_type_id = ReferenceTypeId::HasComponent.into();
        manager.add_node(&item).unwrap();
    }

    #[test]
    fn constructor_fires() {
        let manager = make_manager();
        let type_id = NodeId::new(1, "MachineType");
        ObjectTypeBuilder::new(&type_id, "MachineType", "MachineType")
            .subtype_of(ObjectTypeId::BaseObjectType)
            .insert(&mut *manager.address_space().write());

        let counter = Arc::new(AtomicUsize::new(0));
        let ctor_counter = counter.clone();
        manager.set_lifecycle(
            type_id.clone(),
            Some(Box::new(move |_id| {
                ctor_counter.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            })),
            None,
        );

        manager
            .add_node(&add_object_item(NodeId::new(1, "m1"), "M1", type_id))
            .unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn most_derived_constructor_wins() {
        let manager = make_manager();
        let base = NodeId::new(1, "BaseMachineType");
        let derived = NodeId::new(1, "DerivedMachineType");
        {
            let mut address_space = manager.address_space().write();
            ObjectTypeBuilder::new(&base, "BaseMachineType", "BaseMachineType")
                .subtype_of(ObjectTypeId::BaseObjectType)
                .insert(&mut *address_space);
            ObjectTypeBuilder::new(&derived, "DerivedMachineType", "DerivedMachineType")
                .subtype_of(base.clone())
                .insert(&mut *address_space);
        }

        let base_count = Arc::new(AtomicUsize::new(0));
        let derived_count = Arc::new(AtomicUsize::new(0));
        let c = base_count.clone();
        manager.set_lifecycle(
            base.clone(),
            Some(Box::new(move |_id| {
                c.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            })),
            None,
        );
        let c = derived_count.clone();
        manager.set_lifecycle(
            derived.clone(),
            Some(Box::new(move |_id| {
                c.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            })),
            None,
        );

        manager
            .add_node(&add_object_item(NodeId::new(1, "m1"), "M1", derived))
            .unwrap();
        assert_eq!(derived_count.load(Ordering::SeqCst), 1);
        assert_eq!(base_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn destructor_fires_on_delete() {
        let manager = make_manager();
        let type_id = NodeId::new(1, "MachineType");
        ObjectTypeBuilder::new(&type_id, "MachineType", "MachineType")
            .subtype_of(ObjectTypeId::BaseObjectType)
            .insert(&mut *manager.address_space().write());

        let counter = Arc::new(AtomicUsize::new(0));
        let dtor_counter = counter.clone();
        manager.set_lifecycle(
            type_id.clone(),
            Some(Box::new(|_id| Ok(Some(Box::new(123u32))))),
            Some(Box::new(move |_id, handle| {
                // The handle stored at construction comes back out.
                let handle = handle.expect("handle missing");
                assert_eq!(handle.downcast_ref::<u32>(), Some(&123));
                dtor_counter.fetch_add(1, Ordering::SeqCst);
            })),
        );

        let node_id = NodeId::new(1, "m1");
        manager
            .add_node(&add_object_item(node_id.clone(), "M1", type_id))
            .unwrap();
        manager
            .delete_node(&DeleteNodesItem {
                node_id: node_id.clone(),
                delete_target_references: true,
            })
            .unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        let references = browse_refs(&manager, ObjectId::ObjectsFolder);
        assert_eq!(refs_to(&references, &node_id), 0);
    }

    #[test]
    fn instantiate_pump_type() {
        let manager = make_manager();
        let pump_type = add_pump_type(&manager);

        let pump = manager
            .add_node(&add_object_item(NodeId::new(1, "Pump1"), "Pump1", pump_type))
            .unwrap();

        let result = manager.browse(
            &BrowseDescription::new(pump.clone(), BrowseDirection::Forward)
                .with_reference_type(ReferenceTypeId::Aggregates, true),
        );
        let names: HashSet<String> = result
            .references
            .iter()
            .map(|r| r.browse_name.name.as_ref().to_string())
            .collect();
        let expected: HashSet<String> = ["ManufacturerName".to_string(), "Status".to_string()]
            .into_iter()
            .collect();
        assert_eq!(names, expected);

        // The mandatory property was copied with its value, type
        // definition included, and without the modelling rule.
        let manufacturer = result
            .references
            .iter()
            .find(|r| r.browse_name.name.as_ref() == "ManufacturerName")
            .unwrap()
            .node_id
            .node_id
            .clone();
        let value = manager.read(&manufacturer, AttributeId::Value);
        assert_eq!(value.value, Some(Variant::String("ACME".into())));
        assert_eq!(
            manager
                .address_space()
                .read()
                .type_definition(&manufacturer)
                .unwrap(),
            VariableTypeId::PropertyType
        );
        assert!(manager
            .address_space()
            .read()
            .modelling_rule(&manufacturer)
            .is_none());
    }

    #[test]
    fn instantiation_callback_runs_per_child() {
        let manager = make_manager();
        let pump_type = add_pump_type(&manager);

        let mut materialized = Vec::new();
        {
            let mut callback = |node_id: &NodeId,
                                template_id: &NodeId,
                                _handle: Option<&(dyn std::any::Any + Send + Sync)>| {
                materialized.push((node_id.clone(), template_id.clone()));
            };
            manager
                .add_node_with_callback(
                    &add_object_item(NodeId::new(1, "Pump1"), "Pump1", pump_type),
                    Some(&mut callback),
                )
                .unwrap();
        }

        let templates: HashSet<NodeId> =
            materialized.iter().map(|(_, t)| t.clone()).collect();
        let expected: HashSet<NodeId> = [
            NodeId::new(1, "DeviceType.ManufacturerName"),
            NodeId::new(1, "PumpType.Status"),
        ]
        .into_iter()
        .collect();
        assert_eq!(templates, expected);
    }

    #[test]
    fn most_derived_member_shadows_ancestor() {
        let manager = make_manager();
        let pump_type = add_pump_type(&manager);
        // A further subtype that redefines ManufacturerName.
        let special = NodeId::new(1, "SpecialPumpType");
        {
            let mut address_space = manager.address_space().write();
            ObjectTypeBuilder::new(&special, "SpecialPumpType", "SpecialPumpType")
                .subtype_of(pump_type)
                .insert(&mut *address_space);
            VariableBuilder::new(
                &NodeId::new(1, "SpecialPumpType.ManufacturerName"),
                "ManufacturerName",
                "ManufacturerName",
            )
            .property_of(special.clone())
            .is_property()
            .modelling_rule(ObjectId::ModellingRule_Mandatory)
            .data_type(DataTypeId::String)
            .value("SpecialACME")
            .insert(&mut *address_space);
        }

        let pump = manager
            .add_node(&add_object_item(NodeId::new(1, "Pump2"), "Pump2", special))
            .unwrap();
        let result = manager.browse(
            &BrowseDescription::new(pump, BrowseDirection::Forward)
                .with_reference_type(ReferenceTypeId::Aggregates, true),
        );
        let manufacturers: Vec<_> = result
            .references
            .iter()
            .filter(|r| r.browse_name.name.as_ref() == "ManufacturerName")
            .collect();
        assert_eq!(manufacturers.len(), 1);
        let value = manager.read(&manufacturers[0].node_id.node_id, AttributeId::Value);
        assert_eq!(value.value, Some(Variant::String("SpecialACME".into())));
    }

    #[test]
    fn failed_instantiation_rolls_back() {
        let manager = make_manager();
        let broken_type = NodeId::new(1, "BrokenType");
        {
            let mut address_space = manager.address_space().write();
            let abstract_type = NodeId::new(1, "AbstractChildType");
            ObjectTypeBuilder::new(&abstract_type, "AbstractChildType", "AbstractChildType")
                .is_abstract(true)
                .subtype_of(ObjectTypeId::BaseObjectType)
                .insert(&mut *address_space);
            ObjectTypeBuilder::new(&broken_type, "BrokenType", "BrokenType")
                .subtype_of(ObjectTypeId::BaseObjectType)
                .insert(&mut *address_space);
            // A mandatory member typed to an abstract type cannot be
            // materialized, so instantiation fails mid-walk.
            ObjectBuilder::new(&NodeId::new(1, "BrokenType.Child"), "Child", "Child")
                .component_of(broken_type.clone())
                .has_type_definition(abstract_type)
                .modelling_rule(ObjectId::ModellingRule_Mandatory)
                .insert(&mut *address_space);
        }

        let constructed = Arc::new(AtomicUsize::new(0));
        let destroyed = Arc::new(AtomicUsize::new(0));
        let c = constructed.clone();
        let d = destroyed.clone();
        manager.set_lifecycle(
            broken_type.clone(),
            Some(Box::new(move |_id| {
                c.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            })),
            Some(Box::new(move |_id, _handle| {
                d.fetch_add(1, Ordering::SeqCst);
            })),
        );

        let before = snapshot(&manager);
        let status = manager
            .add_node(&add_object_item(NodeId::new(1, "Broken1"), "Broken1", broken_type))
            .unwrap_err();
        assert_eq!(status, StatusCode::BadTypeDefinitionInvalid);
        // The rollback undid the root instance and tore down its
        // lifecycle symmetrically.
        assert_eq!(snapshot(&manager), before);
        assert_eq!(constructed.load(Ordering::SeqCst), 1);
        assert_eq!(destroyed.load(Ordering::SeqCst), 1);
        assert!(!manager
            .address_space()
            .read()
            .node_exists(&NodeId::new(1, "Broken1")));
    }

    #[test]
    fn add_reference_idempotence() {
        let manager = make_manager();
        let a = manager
            .add_node(&add_object_item(
                NodeId::new(1, "a"),
                "A",
                ObjectTypeId::BaseObjectType.into(),
            ))
            .unwrap();
        let b = manager
            .add_node(&add_object_item(
                NodeId::new(1, "b"),
                "B",
                ObjectTypeId::BaseObjectType.into(),
            ))
            .unwrap();

        let item = AddReferencesItem {
            source_node_id: a.clone(),
            reference_type_id: ReferenceTypeId::HasComponent.into(),
            is_forward: true,
            target_node_id: b.clone(),
        };
        manager.add_reference(&item).unwrap();
        assert_eq!(
            manager.add_reference(&item).unwrap_err(),
            StatusCode::BadDuplicateReferenceNotAllowed
        );
        // The inverse form of the same pair is also a duplicate.
        let inverse = AddReferencesItem {
            source_node_id: b.clone(),
            reference_type_id: ReferenceTypeId::HasComponent.into(),
            is_forward: false,
            target_node_id: a.clone(),
        };
        assert_eq!(
            manager.add_reference(&inverse).unwrap_err(),
            StatusCode::BadDuplicateReferenceNotAllowed
        );

        let references = browse_refs(&manager, a);
        assert_eq!(refs_to(&references, &b), 1);
    }

    #[test]
    fn add_reference_validation() {
        let manager = make_manager();
        let a = manager
            .add_node(&add_object_item(
                NodeId::new(1, "a"),
                "A",
                ObjectTypeId::BaseObjectType.into(),
            ))
            .unwrap();

        let mut item = AddReferencesItem {
            source_node_id: NodeId::new(1, "missing"),
            reference_type_id: ReferenceTypeId::HasComponent.into(),
            is_forward: true,
            target_node_id: a.clone(),
        };
        assert_eq!(
            manager.add_reference(&item).unwrap_err(),
            StatusCode::BadSourceNodeIdInvalid
        );

        item.source_node_id = a.clone();
        item.target_node_id = NodeId::new(1, "missing");
        assert_eq!(
            manager.add_reference(&item).unwrap_err(),
            StatusCode::BadTargetNodeIdInvalid
        );

        item.target_node_id = a.clone();
        assert_eq!(
            manager.add_reference(&item).unwrap_err(),
            StatusCode::BadInvalidSelfReference
        );

        item.target_node_id = ObjectId::ObjectsFolder.into();
        item.reference_type_id = ObjectTypeId::BaseObjectType.into();
        assert_eq!(
            manager.add_reference(&item).unwrap_err(),
            StatusCode::BadReferenceTypeIdInvalid
        );
    }

    #[test]
    fn subtype_cycle_is_rejected() {
        let manager = make_manager();
        let a = NodeId::new(1, "TypeA");
        let b = NodeId::new(1, "TypeB");
        {
            let mut address_space = manager.address_space().write();
            ObjectTypeBuilder::new(&a, "TypeA", "TypeA")
                .subtype_of(ObjectTypeId::BaseObjectType)
                .insert(&mut *address_space);
            ObjectTypeBuilder::new(&b, "TypeB", "TypeB")
                .subtype_of(a.clone())
                .insert(&mut *address_space);
        }

        // B is already a subtype of A, so making A a subtype of B closes
        // a loop.
        let item = AddReferencesItem {
            source_node_id: b.clone(),
            reference_type_id: ReferenceTypeId::HasSubtype.into(),
            is_forward: true,
            target_node_id: a.clone(),
        };
        assert_eq!(
            manager.add_reference(&item).unwrap_err(),
            StatusCode::BadReferenceNotAllowed
        );
    }

    #[test]
    fn reference_cleanup_on_delete() {
        let manager = make_manager();
        let node_id = NodeId::new(1, "n");
        let mut item = add_object_item(node_id.clone(), "N", ObjectTypeId::BaseObjectType.into());
        item.reference_type_id = ReferenceTypeId::HasComponent.into();
        manager.add_node(&item).unwrap();

        manager
            .delete_node(&DeleteNodesItem {
                node_id: node_id.clone(),
                delete_target_references: true,
            })
            .unwrap();

        let result = manager.browse(
            &BrowseDescription::new(ObjectId::ObjectsFolder, BrowseDirection::Forward)
                .with_reference_type(ReferenceTypeId::HasComponent, false),
        );
        assert_eq!(refs_to(&result.references, &node_id), 0);

        // Re-adding yields exactly one reference again.
        manager.add_node(&item).unwrap();
        let result = manager.browse(
            &BrowseDescription::new(ObjectId::ObjectsFolder, BrowseDirection::Forward)
                .with_reference_type(ReferenceTypeId::HasComponent, false),
        );
        assert_eq!(refs_to(&result.references, &node_id), 1);
    }

    #[test]
    fn delete_cascades_to_owned_children() {
        let manager = make_manager();
        let parent = manager
            .add_node(&add_object_item(
                NodeId::new(1, "device"),
                "Device",
                ObjectTypeId::BaseObjectType.into(),
            ))
            .unwrap();
        let mut child_item =
            add_variable_item(NodeId::new(1, "device.speed"), "Speed", 0i32.into());
        child_item.parent_node_id = parent.clone();
        child_item.reference_type_id = ReferenceTypeId::HasComponent.into();
        let child = manager.add_node(&child_item).unwrap();

        manager
            .delete_node(&DeleteNodesItem {
                node_id: parent.clone(),
                delete_target_references: true,
            })
            .unwrap();

        let address_space = manager.address_space().read();
        assert!(!address_space.node_exists(&parent));
        assert!(!address_space.node_exists(&child));
    }

    #[test]
    fn delete_missing_node() {
        let manager = make_manager();
        assert_eq!(
            manager
                .delete_node(&DeleteNodesItem {
                    node_id: NodeId::new(1, "missing"),
                    delete_target_references: true,
                })
                .unwrap_err(),
            StatusCode::BadNodeIdUnknown
        );
    }

    #[test]
    fn delete_reference_service() {
        let manager = make_manager();
        let node_id = manager
            .add_node(&add_object_item(
                NodeId::new(1, "n"),
                "N",
                ObjectTypeId::BaseObjectType.into(),
            ))
            .unwrap();

        manager
            .delete_reference(&DeleteReferencesItem {
                source_node_id: ObjectId::ObjectsFolder.into(),
                reference_type_id: ReferenceTypeId::Organizes.into(),
                is_forward: true,
                target_node_id: node_id.clone(),
                delete_bidirectional: true,
            })
            .unwrap();

        // Both halves are gone, the node itself is untouched.
        let references = browse_refs(&manager, ObjectId::ObjectsFolder);
        assert_eq!(refs_to(&references, &node_id), 0);
        let inverse = manager.browse(
            &BrowseDescription::new(node_id.clone(), BrowseDirection::Inverse)
                .with_reference_type(ReferenceTypeId::Organizes, false),
        );
        assert!(inverse.references.is_empty());
        assert!(manager.address_space().read().node_exists(&node_id));

        // Deleting it again reports that nothing matched.
        assert_eq!(
            manager
                .delete_reference(&DeleteReferencesItem {
                    source_node_id: ObjectId::ObjectsFolder.into(),
                    reference_type_id: ReferenceTypeId::Organizes.into(),
                    is_forward: true,
                    target_node_id: node_id,
                    delete_bidirectional: true,
                })
                .unwrap_err(),
            StatusCode::BadNotFound
        );
    }

    #[test]
    fn browse_filters_and_masks() {
        let manager = make_manager();
        let variable = manager
            .add_node(&add_variable_item(NodeId::new(1, "v"), "V", 1i32.into()))
            .unwrap();
        let object = manager
            .add_node(&add_object_item(
                NodeId::new(1, "o"),
                "O",
                ObjectTypeId::BaseObjectType.into(),
            ))
            .unwrap();

        // Class mask: only variables.
        let mut description =
            BrowseDescription::new(ObjectId::ObjectsFolder, BrowseDirection::Forward);
        description.node_class_mask = NodeClassMask::VARIABLE.bits();
        let result = manager.browse(&description);
        assert_eq!(refs_to(&result.references, &variable), 1);
        assert_eq!(refs_to(&result.references, &object), 0);

        // Result mask: nothing requested, fields come back empty but the
        // references are still there.
        let mut description =
            BrowseDescription::new(ObjectId::ObjectsFolder, BrowseDirection::Forward);
        description.result_mask = 0;
        let result = manager.browse(&description);
        assert!(result
            .references
            .iter()
            .all(|r| r.browse_name.is_null() && r.reference_type_id.is_null()));
        assert_eq!(refs_to(&result.references, &variable), 1);

        // Browsing an unknown node fails.
        let result = manager.browse(&BrowseDescription::new(
            NodeId::new(1, "missing"),
            BrowseDirection::Forward,
        ));
        assert_eq!(result.status_code, StatusCode::BadNodeIdUnknown);

        // Inverse browse from the variable reaches the parent.
        let result = manager.browse(
            &BrowseDescription::new(variable, BrowseDirection::Inverse)
                .with_reference_type(ReferenceTypeId::HierarchicalReferences, true),
        );
        assert_eq!(
            refs_to(&result.references, &ObjectId::ObjectsFolder.into()),
            1
        );
        assert!(result.references.iter().all(|r| !r.is_forward));
    }

    #[test]
    fn write_value_checks_access_and_type() {
        let manager = make_manager();
        let read_only = manager
            .add_node(&add_variable_item(NodeId::new(1, "ro"), "RO", 1i32.into()))
            .unwrap();
        assert_eq!(
            manager
                .write(&read_only, AttributeId::Value, 2i32.into())
                .unwrap_err(),
            StatusCode::BadNotWritable
        );

        let mut item = add_variable_item(NodeId::new(1, "rw"), "RW", 1i32.into());
        item.node_attributes = variable_attributes("RW", 1i32.into(), DataTypeId::Int32, true);
        let writable = manager.add_node(&item).unwrap();

        manager
            .write(&writable, AttributeId::Value, 5i32.into())
            .unwrap();
        let value = manager.read(&writable, AttributeId::Value);
        assert_eq!(value.value, Some(Variant::Int32(5)));

        assert_eq!(
            manager
                .write(&writable, AttributeId::Value, true.into())
                .unwrap_err(),
            StatusCode::BadTypeMismatch
        );
    }

    #[test]
    fn call_method_dispatches_to_handler() {
        let manager = make_manager();
        let object = manager
            .add_node(&add_object_item(
                NodeId::new(1, "o"),
                "O",
                ObjectTypeId::BaseObjectType.into(),
            ))
            .unwrap();
        let method_item = AddNodesItem {
            parent_node_id: object.clone(),
            reference_type_id: ReferenceTypeId::HasComponent.into(),
            requested_new_node_id: NodeId::new(1, "o.double"),
            browse_name: "Double".into(),
            node_class: NodeClass::Method,
            node_attributes: AddNodeAttributes::Method(MethodAttributes {
                specified_attributes: (AttributesMask::DISPLAY_NAME
                    | AttributesMask::EXECUTABLE
                    | AttributesMask::USER_EXECUTABLE)
                    .bits(),
                display_name: "Double".into(),
                executable: true,
                user_executable: true,
                ..Default::default()
            }),
            type_definition: NodeId::null(),
        };
        let method = manager.add_node(&method_item).unwrap();

        assert_eq!(
            manager
                .call_method(&object, &method, &[Variant::Int32(21)])
                .unwrap_err(),
            StatusCode::BadMethodInvalid
        );

        manager.register_method(
            method.clone(),
            Box::new(|args| match args {
                [Variant::Int32(v)] => Ok(vec![Variant::Int32(v * 2)]),
                _ => Err(StatusCode::BadInvalidArgument),
            }),
        );
        assert_eq!(
            manager
                .call_method(&object, &method, &[Variant::Int32(21)])
                .unwrap(),
            vec![Variant::Int32(42)]
        );
    }

    #[test]
    fn add_then_delete_restores_structure() {
        let manager = make_manager();
        let before = snapshot(&manager);

        let node_id = manager
            .add_node(&add_variable_item(NodeId::new(1, "temp"), "Temp", 7i32.into()))
            .unwrap();
        assert_ne!(snapshot(&manager), before);

        manager
            .delete_node(&DeleteNodesItem {
                node_id,
                delete_target_references: true,
            })
            .unwrap();
        assert_eq!(snapshot(&manager), before);
    }

    #[test]
    fn handle_dispatches_requests() {
        let manager = make_manager();
        let response = manager.handle(Request::AddNodes(vec![
            add_variable_item(NodeId::new(1, "v"), "V", 1i32.into()),
            add_variable_item(NodeId::new(1, "v"), "V2", 2i32.into()),
        ]));
        let Response::AddNodes(results) = response else {
            panic!("wrong response kind");
        };
        assert_eq!(results[0].status_code, StatusCode::Good);
        assert_eq!(results[0].added_node_id, NodeId::new(1, "v"));
        assert_eq!(results[1].status_code, StatusCode::BadNodeIdExists);

        let response = manager.handle(Request::Browse(vec![BrowseDescription::new(
            ObjectId::ObjectsFolder,
            BrowseDirection::Forward,
        )]));
        let Response::Browse(results) = response else {
            panic!("wrong response kind");
        };
        assert_eq!(results.len(), 1);
        assert_eq!(refs_to(&results[0].references, &NodeId::new(1, "v")), 1);
    }
}
