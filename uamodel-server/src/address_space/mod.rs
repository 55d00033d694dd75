//! Implementation of [`AddressSpace`], an in-memory OPC UA address space.

mod core_namespace;
mod utils;

pub use core_namespace::CoreNamespace;
pub use uamodel_nodes::*;
pub use utils::*;

use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};
use log::error;

use uamodel_types::{
    BrowseDirection, LocalizedText, NodeClass, NodeId, ObjectId, QualifiedName, ReferenceTypeId,
    StatusCode,
};

/// The modelling rule of a type member, read from its forward
/// `HasModellingRule` reference.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ModellingRule {
    /// The member appears on every instance of the type.
    Mandatory,
    /// The member may appear on instances of the type.
    Optional,
    /// A placeholder for mandatory members declared per instance.
    MandatoryPlaceholder,
    /// A placeholder for optional members declared per instance.
    OptionalPlaceholder,
}

impl ModellingRule {
    /// Map a modelling rule object id to the rule it stands for.
    pub fn from_node_id(node_id: &NodeId) -> Option<ModellingRule> {
        match node_id.as_object_id().ok()? {
            ObjectId::ModellingRule_Mandatory => Some(ModellingRule::Mandatory),
            ObjectId::ModellingRule_Optional => Some(ModellingRule::Optional),
            ObjectId::ModellingRule_MandatoryPlaceholder => {
                Some(ModellingRule::MandatoryPlaceholder)
            }
            ObjectId::ModellingRule_OptionalPlaceholder => Some(ModellingRule::OptionalPlaceholder),
            _ => None,
        }
    }

    /// The modelling rule object node standing for this rule.
    pub fn node_id(&self) -> NodeId {
        match self {
            ModellingRule::Mandatory => ObjectId::ModellingRule_Mandatory.into(),
            ModellingRule::Optional => ObjectId::ModellingRule_Optional.into(),
            ModellingRule::MandatoryPlaceholder => ObjectId::ModellingRule_MandatoryPlaceholder.into(),
            ModellingRule::OptionalPlaceholder => ObjectId::ModellingRule_OptionalPlaceholder.into(),
        }
    }
}

/// A member of a type definition, as seen by the instantiator: the
/// template node, the reference linking it to the type, and its
/// modelling rule.
#[derive(Debug, Clone)]
pub struct TypeChild {
    /// The template node declared on the type.
    pub template_id: NodeId,
    /// The browse name of the template.
    pub browse_name: QualifiedName,
    /// The reference type linking the type to the template.
    pub reference_type: NodeId,
    /// The template's modelling rule, absent for members that are not
    /// instance declarations.
    pub modelling_rule: Option<ModellingRule>,
}

/// Represents an in-memory address space.
///
/// The address space owns the node map, the bidirectional reference index
/// and the counter used for server-assigned node ids. It is also the
/// canonical [`TypeTree`]: subtype questions are answered by walking the
/// `HasSubtype` references stored in the graph.
#[derive(Default)]
pub struct AddressSpace {
    node_map: HashMap<NodeId, NodeType>,
    namespaces: HashMap<u16, String>,
    references: References,
    server_namespace: u16,
    next_numeric_id: u32,
}

impl AddressSpace {
    /// Create a new empty address space.
    pub fn new() -> Self {
        Self {
            node_map: HashMap::new(),
            namespaces: HashMap::new(),
            references: References::new(),
            server_namespace: 0,
            next_numeric_id: 0,
        }
    }

    /// Add a namespace to this address space.
    pub fn add_namespace(&mut self, namespace: &str, index: u16) {
        self.namespaces.insert(index, namespace.to_string());
    }

    /// Get the namespace index of the given namespace URI.
    pub fn namespace_index(&self, namespace: &str) -> Option<u16> {
        self.namespaces
            .iter()
            .find(|(_, ns)| namespace == ns.as_str())
            .map(|(i, _)| *i)
    }

    /// Get the inner namespace map.
    pub fn namespaces(&self) -> &HashMap<u16, String> {
        &self.namespaces
    }

    /// Set the namespace server-assigned node ids are allocated in.
    pub fn set_server_namespace(&mut self, namespace: u16) {
        self.server_namespace = namespace;
    }

    /// The namespace server-assigned node ids are allocated in.
    pub fn server_namespace(&self) -> u16 {
        self.server_namespace
    }

    /// Allocate a fresh numeric node id in the server namespace. The
    /// counter is monotonic and shares the mutation discipline of the
    /// rest of the address space.
    pub fn next_node_id(&mut self) -> NodeId {
        loop {
            self.next_numeric_id += 1;
            let node_id = NodeId::new(self.server_namespace, self.next_numeric_id);
            if !self.node_exists(&node_id) {
                break node_id;
            }
        }
    }

    fn assert_namespace(&self, node_id: &NodeId) {
        if !self.namespaces.contains_key(&node_id.namespace) {
            panic!("Namespace index {} not in address space", node_id.namespace);
        }
    }

    /// Return `true` if the node with the given node ID exists in this address space.
    pub fn node_exists(&self, node_id: &NodeId) -> bool {
        self.node_map.contains_key(node_id)
    }

    /// Insert a reference from `source_node` to `target_node` with
    /// the given reference type. Returns `false` if the pair already
    /// existed.
    pub fn insert_reference(
        &mut self,
        source_node: &NodeId,
        target_node: &NodeId,
        reference_type: impl Into<NodeId>,
    ) -> bool {
        self.references
            .insert_reference(source_node, target_node, reference_type)
    }

    /// Insert a list of references.
    pub fn insert_references<'a>(
        &mut self,
        references: impl Iterator<Item = (&'a NodeId, &'a NodeId, impl Into<NodeId>)>,
    ) {
        self.references.insert_references(references)
    }

    /// Delete a reference pair.
    pub fn delete_reference(
        &mut self,
        source_node: &NodeId,
        target_node: &NodeId,
        reference_type: impl Into<NodeId>,
    ) -> bool {
        self.references
            .delete_reference(source_node, target_node, reference_type)
    }

    /// Delete one half of a reference pair, leaving the other endpoint.
    pub fn delete_reference_half(
        &mut self,
        source_node: &NodeId,
        target_node: &NodeId,
        reference_type: impl Into<NodeId>,
        direction: ReferenceDirection,
    ) -> bool {
        self.references
            .delete_reference_half(source_node, target_node, reference_type, direction)
    }

    /// Delete references starting at or pointing to the given node.
    pub fn delete_node_references(
        &mut self,
        source_node: &NodeId,
        delete_target_references: bool,
    ) -> bool {
        self.references
            .delete_node_references(source_node, delete_target_references)
    }

    /// Check if the reference given by `source_node`, `target_node` and
    /// `reference_type` exists in the address space.
    pub fn has_reference(
        &self,
        source_node: &NodeId,
        target_node: &NodeId,
        reference_type: impl Into<NodeId>,
    ) -> bool {
        self.references
            .has_reference(source_node, target_node, reference_type)
    }

    /// Return a lazy iterator over references starting at `source_node`
    /// that match `filter`.
    pub fn find_references<'a: 'b, 'b>(
        &'a self,
        source_node: &'b NodeId,
        filter: Option<(impl Into<NodeId>, bool)>,
        direction: BrowseDirection,
    ) -> impl Iterator<Item = ReferenceRef<'a>> + 'b {
        self.references
            .find_references(source_node, filter, self, direction)
    }

    /// Find a child of `source_node` matching the given `filter` with
    /// browse name equal to `browse_name`.
    pub fn find_node_by_browse_name<'a: 'b, 'b>(
        &'a self,
        source_node: &'b NodeId,
        filter: Option<(impl Into<NodeId>, bool)>,
        direction: BrowseDirection,
        browse_name: impl Into<QualifiedName>,
    ) -> Option<&'a NodeType> {
        let name = browse_name.into();
        for rf in self.find_references(source_node, filter, direction) {
            let node = self.find_node(rf.target_node);
            if let Some(node) = node {
                if node.as_node().browse_name() == &name {
                    return Some(node);
                }
            }
        }
        None
    }

    /// Find a node by traversing a browse path starting from `source_node`.
    /// All traversed references must match `filter`.
    pub fn find_node_by_browse_path<'a: 'b, 'b>(
        &'a self,
        source_node: &'b NodeId,
        filter: Option<(impl Into<NodeId>, bool)>,
        direction: BrowseDirection,
        browse_path: &[QualifiedName],
    ) -> Option<&'a NodeType> {
        let mut node = self.find_node(source_node)?;
        let filter: Option<(NodeId, bool)> = filter.map(|(id, c)| (id.into(), c));
        for path_elem in browse_path {
            let mut found = false;
            for rf in self.find_references(node.node_id(), filter.clone(), direction) {
                let child = self.find_node(rf.target_node);
                if let Some(child) = child {
                    if child.as_node().browse_name() == path_elem {
                        node = child;
                        found = true;
                        break;
                    }
                }
            }
            if !found {
                return None;
            }
        }
        Some(node)
    }

    /// Find node by something that can be turned into a node id and return a reference to it.
    pub fn find<N>(&self, node_id: N) -> Option<&NodeType>
    where
        N: Into<NodeId>,
    {
        self.find_node(&node_id.into())
    }

    /// Find node by something that can be turned into a node id and return a mutable reference to it.
    pub fn find_mut<N>(&mut self, node_id: N) -> Option<&mut NodeType>
    where
        N: Into<NodeId>,
    {
        self.find_node_mut(&node_id.into())
    }

    /// Finds a node by its node id and returns a reference to it.
    pub fn find_node(&self, node_id: &NodeId) -> Option<&NodeType> {
        self.node_map.get(node_id)
    }

    /// Finds a node by its node id and returns a mutable reference to it.
    pub fn find_node_mut(&mut self, node_id: &NodeId) -> Option<&mut NodeType> {
        self.node_map.get_mut(node_id)
    }

    /// Iterate over every node in the address space, in no particular
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &NodeType)> {
        self.node_map.iter()
    }

    /// The number of nodes in the address space.
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    /// Whether the address space holds no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }

    /// Remove a node from the address space.
    pub fn delete(&mut self, node_id: &NodeId, delete_target_references: bool) -> Option<NodeType> {
        let n = self.node_map.remove(node_id);
        self.references
            .delete_node_references(node_id, delete_target_references);

        n
    }

    /// Follow the unique forward `HasTypeDefinition` reference of an
    /// instance node to its type.
    pub fn type_definition(&self, instance: &NodeId) -> Result<NodeId, StatusCode> {
        self.find_references(
            instance,
            Some((ReferenceTypeId::HasTypeDefinition, false)),
            BrowseDirection::Forward,
        )
        .next()
        .map(|rf| rf.target_node.clone())
        .ok_or(StatusCode::BadNotFound)
    }

    /// The immediate supertype of a type node, following the inverse
    /// `HasSubtype` reference. A type has at most one supertype.
    pub fn supertype(&self, type_id: &NodeId) -> Option<NodeId> {
        self.find_references(
            type_id,
            Some((ReferenceTypeId::HasSubtype, false)),
            BrowseDirection::Inverse,
        )
        .next()
        .map(|rf| rf.target_node.clone())
    }

    /// Iterate a type and its ancestors, most-derived first. Stops if the
    /// chain loops, which the insertion-time checks forbid anyway.
    pub fn type_chain(&self, type_id: &NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(type_id.clone());
        while let Some(id) = current {
            if !visited.insert(id.clone()) {
                break;
            }
            current = self.supertype(&id);
            chain.push(id);
        }
        chain
    }

    /// The modelling rule of a node, read from its forward
    /// `HasModellingRule` reference.
    pub fn modelling_rule(&self, node_id: &NodeId) -> Option<ModellingRule> {
        self.find_references(
            node_id,
            Some((ReferenceTypeId::HasModellingRule, false)),
            BrowseDirection::Forward,
        )
        .find_map(|rf| ModellingRule::from_node_id(rf.target_node))
    }

    /// Enumerate the members of a type definition, walking up the subtype
    /// chain and accumulating the aggregated children of all ancestors.
    /// If the same browse name occurs at multiple levels of the
    /// hierarchy, the most-derived declaration wins. With a filter, only
    /// members carrying that modelling rule are returned.
    pub fn type_children(
        &self,
        type_id: &NodeId,
        filter: Option<ModellingRule>,
    ) -> Vec<TypeChild> {
        let mut children = Vec::new();
        let mut seen = HashSet::new();
        for ancestor in self.type_chain(type_id) {
            for rf in self.find_references(
                &ancestor,
                Some((ReferenceTypeId::Aggregates, true)),
                BrowseDirection::Forward,
            ) {
                let Some(child) = self.find_node(rf.target_node) else {
                    continue;
                };
                let browse_name = child.as_node().browse_name().clone();
                if !seen.insert(browse_name.clone()) {
                    // Shadowed by a more derived declaration.
                    continue;
                }
                children.push(TypeChild {
                    template_id: rf.target_node.clone(),
                    browse_name,
                    reference_type: rf.reference_type.clone(),
                    modelling_rule: self.modelling_rule(rf.target_node),
                });
            }
        }
        if let Some(filter) = filter {
            children.retain(|c| c.modelling_rule == Some(filter));
        }
        children
    }

    /// Test whether `target` can be reached from `root` by following
    /// forward hierarchical references.
    pub fn is_reachable_from(&self, root: &NodeId, target: &NodeId) -> bool {
        if root == target {
            return true;
        }
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(root.clone());
        visited.insert(root.clone());
        while let Some(id) = queue.pop_front() {
            for rf in self.find_references(
                &id,
                Some((ReferenceTypeId::HierarchicalReferences, true)),
                BrowseDirection::Forward,
            ) {
                if rf.target_node == target {
                    return true;
                }
                if visited.insert(rf.target_node.clone()) {
                    queue.push_back(rf.target_node.clone());
                }
            }
        }
        false
    }

    /// Test whether inserting `subtype_of` as the supertype of `type_id`
    /// would close a cycle in the subtype forest.
    pub fn subtype_would_cycle(&self, type_id: &NodeId, subtype_of: &NodeId) -> bool {
        // A cycle appears exactly when the new supertype is already a
        // subtype of the type being linked in.
        self.is_subtype_of(subtype_of, type_id)
    }

    /// Add a `FolderType` node.
    pub fn add_folder(
        &mut self,
        node_id: &NodeId,
        browse_name: impl Into<QualifiedName>,
        display_name: impl Into<LocalizedText>,
        parent_node_id: &NodeId,
    ) -> bool {
        self.assert_namespace(node_id);
        ObjectBuilder::new(node_id, browse_name, display_name)
            .is_folder()
            .organized_by(parent_node_id.clone())
            .insert(self)
    }

    /// Add a list of variables to the address space as organized children
    /// of `parent_node_id`.
    pub fn add_variables(&mut self, variables: Vec<Variable>, parent_node_id: &NodeId) -> Vec<bool> {
        variables
            .into_iter()
            .map(|v| {
                self.insert(
                    v,
                    Some(&[(
                        parent_node_id,
                        &ReferenceTypeId::Organizes.into(),
                        ReferenceDirection::Inverse,
                    )]),
                )
            })
            .collect()
    }
}

impl TypeTree for AddressSpace {
    fn is_subtype_of(&self, child: &NodeId, base: &NodeId) -> bool {
        if child == base {
            return true;
        }
        // Breadth-first walk down the HasSubtype tree from the base. The
        // visited set keeps this terminating even on a corrupt graph.
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(base.clone());
        visited.insert(base.clone());
        while let Some(id) = queue.pop_front() {
            for rf in self.references.find_references(
                &id,
                Some((ReferenceTypeId::HasSubtype, false)),
                self,
                BrowseDirection::Forward,
            ) {
                if rf.target_node == child {
                    return true;
                }
                if visited.insert(rf.target_node.clone()) {
                    queue.push_back(rf.target_node.clone());
                }
            }
        }
        false
    }

    fn get(&self, node: &NodeId) -> Option<NodeClass> {
        let nc = self.find_node(node)?.node_class();
        matches!(
            nc,
            NodeClass::DataType
                | NodeClass::ObjectType
                | NodeClass::VariableType
                | NodeClass::ReferenceType
        )
        .then_some(nc)
    }
}

impl NodeInsertTarget for AddressSpace {
    fn insert<'a>(
        &mut self,
        node: impl Into<NodeType>,
        references: Option<&'a [(&'a NodeId, &NodeId, ReferenceDirection)]>,
    ) -> bool {
        let node_type = node.into();
        let node_id = node_type.node_id().clone();

        self.assert_namespace(&node_id);

        if self.node_exists(&node_id) {
            error!("This node {} already exists", node_id);
            false
        } else {
            // If references are supplied, add them now
            if let Some(references) = references {
                self.references.insert(&node_id, references);
            }
            self.node_map.insert(node_id, node_type);

            true
        }
    }
}

#[cfg(test)]
mod tests {
    use uamodel_types::{
        BrowseDirection, DataTypeId, NodeClass, NodeId, ObjectId, ObjectTypeId, QualifiedName,
        ReferenceTypeId, VariableTypeId,
    };

    use super::{AddressSpace, CoreNamespace};
    use crate::{
        EventNotifier, HasNodeId, NodeBase, NodeInsertTarget, NodeType, Object, ObjectBuilder,
        ObjectTypeBuilder, TypeTree, Variable, VariableBuilder,
    };

    fn make_sample_address_space() -> AddressSpace {
        let mut address_space = AddressSpace::new();
        address_space.add_namespace("http://opcfoundation.org/UA/", 0);
        address_space.add_namespace("urn:test", 1);
        address_space.set_server_namespace(1);
        CoreNamespace::populate(&mut address_space);
        add_sample_vars_to_address_space(&mut address_space);
        address_space
    }

    fn add_sample_vars_to_address_space(address_space: &mut AddressSpace) {
        let ns = 1;

        // Create a sample folder under objects folder
        let sample_folder_id = address_space.next_node_id();
        ObjectBuilder::new(&sample_folder_id, "Sample", "Sample")
            .organized_by(ObjectId::ObjectsFolder)
            .insert(address_space);

        // Add some variables to our sample folder
        let vars = vec![
            Variable::new(&NodeId::new(ns, "v1"), "v1", "v1", 30i32),
            Variable::new(&NodeId::new(ns, 300), "v2", "v2", true),
            Variable::new(&NodeId::new(ns, "v3"), "v3", "v3", "Hello world"),
            Variable::new(&NodeId::new(ns, "v4"), "v4", "v4", 100.123f64),
        ];
        for var in vars {
            let node_id = var.node_id().clone();
            address_space.insert(var, None);
            address_space.insert_reference(
                &sample_folder_id,
                &node_id,
                ReferenceTypeId::HasComponent,
            );
        }
    }

    #[test]
    fn find_root_folder() {
        let address_space = make_sample_address_space();
        let node_type = address_space.find_node(&NodeId::new(0, 84));
        assert!(node_type.is_some());

        let node = node_type.unwrap().as_node();
        assert_eq!(node.node_id(), &NodeId::new(0, 84));
        assert_eq!(node.node_id(), &NodeId::root_folder_id());
    }

    #[test]
    fn find_common_nodes() {
        let address_space = make_sample_address_space();
        let nodes: Vec<NodeId> = vec![
            ObjectId::RootFolder.into(),
            ObjectId::ObjectsFolder.into(),
            ObjectId::TypesFolder.into(),
            ObjectId::DataTypesFolder.into(),
            ObjectId::ReferenceTypesFolder.into(),
            ObjectId::ModellingRule_Mandatory.into(),
            ObjectId::ModellingRule_Optional.into(),
            ObjectTypeId::BaseObjectType.into(),
            ObjectTypeId::FolderType.into(),
            VariableTypeId::BaseVariableType.into(),
            VariableTypeId::BaseDataVariableType.into(),
            VariableTypeId::PropertyType.into(),
            DataTypeId::BaseDataType.into(),
            DataTypeId::Boolean.into(),
            DataTypeId::ByteString.into(),
            DataTypeId::DateTime.into(),
            DataTypeId::Enumeration.into(),
            DataTypeId::Guid.into(),
            DataTypeId::LocalizedText.into(),
            DataTypeId::NodeId.into(),
            DataTypeId::Number.into(),
            DataTypeId::QualifiedName.into(),
            DataTypeId::StatusCode.into(),
            DataTypeId::String.into(),
            DataTypeId::Structure.into(),
            DataTypeId::Double.into(),
            DataTypeId::Float.into(),
            DataTypeId::Integer.into(),
            DataTypeId::SByte.into(),
            DataTypeId::Int16.into(),
            DataTypeId::Int32.into(),
            DataTypeId::Int64.into(),
            DataTypeId::Byte.into(),
            DataTypeId::UInt16.into(),
            DataTypeId::UInt32.into(),
            DataTypeId::UInt64.into(),
            ReferenceTypeId::References.into(),
            ReferenceTypeId::HierarchicalReferences.into(),
            ReferenceTypeId::HasChild.into(),
            ReferenceTypeId::HasSubtype.into(),
            ReferenceTypeId::Organizes.into(),
            ReferenceTypeId::NonHierarchicalReferences.into(),
            ReferenceTypeId::HasTypeDefinition.into(),
            ReferenceTypeId::HasModellingRule.into(),
        ];
        for n in nodes {
            assert!(address_space.find_node(&n).is_some(), "missing {}", n);
        }
    }

    #[test]
    fn object_attributes() {
        let on = NodeId::new(1, "o1");
        let o = Object::new(&on, "Browse01", "Display01", EventNotifier::empty());
        assert_eq!(o.node_class(), NodeClass::Object);
        assert_eq!(o.node_id(), &on);
        assert_eq!(o.browse_name(), &QualifiedName::new(0, "Browse01"));
        assert_eq!(o.display_name(), &"Display01".into());
    }

    #[test]
    fn find_node_by_id() {
        let address_space = make_sample_address_space();
        let ns = 1;

        assert!(!address_space.node_exists(&NodeId::null()));
        assert!(!address_space.node_exists(&NodeId::new(11, "v3")));

        assert!(address_space.node_exists(&NodeId::new(ns, "v1")));
        assert!(address_space.node_exists(&NodeId::new(ns, 300)));
        assert!(address_space.node_exists(&NodeId::new(ns, "v3")));
    }

    #[test]
    fn find_references() {
        let address_space = make_sample_address_space();

        let references: Vec<_> = address_space
            .find_references(
                &NodeId::root_folder_id(),
                Some((ReferenceTypeId::Organizes, false)),
                BrowseDirection::Forward,
            )
            .collect();
        assert_eq!(references.len(), 2);

        let references: Vec<_> = address_space
            .find_references(
                &NodeId::objects_folder_id(),
                Some((ReferenceTypeId::Organizes, false)),
                BrowseDirection::Forward,
            )
            .collect();
        assert_eq!(references.len(), 1);

        let r1 = &references[0];
        assert_eq!(r1.reference_type, &NodeId::from(ReferenceTypeId::Organizes));
        let child_node_id = r1.target_node.clone();

        let child = address_space.find_node(&child_node_id);
        assert!(child.is_some());
    }

    #[test]
    fn find_inverse_references() {
        let address_space = make_sample_address_space();

        let references: Vec<_> = address_space
            .find_references(
                &NodeId::root_folder_id(),
                Some((ReferenceTypeId::Organizes, false)),
                BrowseDirection::Inverse,
            )
            .collect();
        assert!(references.is_empty());

        let references: Vec<_> = address_space
            .find_references(
                &NodeId::objects_folder_id(),
                Some((ReferenceTypeId::Organizes, false)),
                BrowseDirection::Inverse,
            )
            .collect();
        assert_eq!(references.len(), 1);
    }

    #[test]
    fn find_reference_subtypes() {
        let address_space = make_sample_address_space();

        let reference_types = [
            (
                ReferenceTypeId::References,
                ReferenceTypeId::HierarchicalReferences,
            ),
            (ReferenceTypeId::References, ReferenceTypeId::HasChild),
            (ReferenceTypeId::References, ReferenceTypeId::HasSubtype),
            (ReferenceTypeId::References, ReferenceTypeId::Organizes),
            (ReferenceTypeId::References, ReferenceTypeId::Aggregates),
            (ReferenceTypeId::References, ReferenceTypeId::HasProperty),
            (ReferenceTypeId::References, ReferenceTypeId::HasComponent),
            (
                ReferenceTypeId::References,
                ReferenceTypeId::HasModellingRule,
            ),
            (
                ReferenceTypeId::References,
                ReferenceTypeId::HasTypeDefinition,
            ),
            (
                ReferenceTypeId::HierarchicalReferences,
                ReferenceTypeId::HasChild,
            ),
            (
                ReferenceTypeId::HierarchicalReferences,
                ReferenceTypeId::HasSubtype,
            ),
            (
                ReferenceTypeId::HierarchicalReferences,
                ReferenceTypeId::Organizes,
            ),
            (
                ReferenceTypeId::HierarchicalReferences,
                ReferenceTypeId::Aggregates,
            ),
            (
                ReferenceTypeId::HierarchicalReferences,
                ReferenceTypeId::HasProperty,
            ),
            (
                ReferenceTypeId::HierarchicalReferences,
                ReferenceTypeId::HasComponent,
            ),
            (ReferenceTypeId::HasChild, ReferenceTypeId::Aggregates),
            (ReferenceTypeId::HasChild, ReferenceTypeId::HasComponent),
            (ReferenceTypeId::HasChild, ReferenceTypeId::HasProperty),
            (ReferenceTypeId::HasChild, ReferenceTypeId::HasSubtype),
            (ReferenceTypeId::Aggregates, ReferenceTypeId::HasComponent),
            (ReferenceTypeId::Aggregates, ReferenceTypeId::HasProperty),
            (
                ReferenceTypeId::References,
                ReferenceTypeId::NonHierarchicalReferences,
            ),
            (
                ReferenceTypeId::NonHierarchicalReferences,
                ReferenceTypeId::HasModellingRule,
            ),
            (
                ReferenceTypeId::NonHierarchicalReferences,
                ReferenceTypeId::HasTypeDefinition,
            ),
        ];

        // Make sure that subtypes match when subtypes are to be compared and doesn't when they should
        // not be compared.
        reference_types.iter().for_each(|r| {
            let r1: NodeId = r.0.into();
            let r2: NodeId = r.1.into();
            assert!(
                address_space.is_subtype_of(&r2, &r1),
                "{} should be a subtype of {}",
                r2,
                r1
            );
            assert!(
                !address_space.is_subtype_of(&r1, &r2),
                "{} should not be a subtype of {}",
                r1,
                r2
            );
        });
    }

    #[test]
    fn data_type_subtypes() {
        let address_space = make_sample_address_space();
        let int32: NodeId = DataTypeId::Int32.into();
        let number: NodeId = DataTypeId::Number.into();
        let base: NodeId = DataTypeId::BaseDataType.into();
        assert!(address_space.is_subtype_of(&int32, &number));
        assert!(address_space.is_subtype_of(&int32, &base));
        assert!(!address_space.is_subtype_of(&number, &int32));
    }

    #[test]
    fn browse_nodes() {
        let address_space = make_sample_address_space();

        // Test that a node can be found
        let object_id = NodeId::root_folder_id();
        let result = address_space.find_node_by_browse_path(
            &object_id,
            None::<(NodeId, bool)>,
            BrowseDirection::Forward,
            &["Objects".into(), "Sample".into(), "v1".into()],
        );
        let node = result.unwrap();
        assert_eq!(node.as_node().browse_name(), &QualifiedName::from("v1"));

        // Test that a non existent node cannot be found
        let result = address_space.find_node_by_browse_path(
            &object_id,
            None::<(NodeId, bool)>,
            BrowseDirection::Forward,
            &["Objects".into(), "Sample".into(), "vxxx".into()],
        );
        assert!(result.is_none());
    }

    #[test]
    fn object_builder() {
        let mut address_space = make_sample_address_space();

        let node_type_id = NodeId::new(1, "HelloType");
        let _ot = ObjectTypeBuilder::new(&node_type_id, "HelloType", "HelloType")
            .subtype_of(ObjectTypeId::BaseObjectType)
            .insert(&mut address_space);

        let node_id = NodeId::new(1, "Hello");
        let _o = ObjectBuilder::new(&node_id, "Foo", "Foo")
            .event_notifier(EventNotifier::SUBSCRIBE_TO_EVENTS)
            .organized_by(ObjectId::ObjectsFolder)
            .has_type_definition(node_type_id.clone())
            .insert(&mut address_space);

        // Verify the object is there
        let _o = match address_space.find_node(&node_id).unwrap() {
            NodeType::Object(o) => o,
            _ => panic!(),
        };

        // Verify the reference to the objects folder is there
        assert!(address_space.has_reference(
            &ObjectId::ObjectsFolder.into(),
            &node_id,
            ReferenceTypeId::Organizes
        ));
        assert!(address_space.has_reference(
            &node_id,
            &node_type_id,
            ReferenceTypeId::HasTypeDefinition
        ));
        assert_eq!(address_space.type_definition(&node_id).unwrap(), node_type_id);
    }

    #[test]
    fn variable_builder() {
        let result = std::panic::catch_unwind(|| {
            // This should panic
            let _v = VariableBuilder::new(&NodeId::null(), "", "").build();
        });
        assert!(result.is_err());

        // This should build
        let _v = VariableBuilder::new(&NodeId::new(1, 1), "", "")
            .data_type(DataTypeId::Boolean)
            .build();
    }

    #[test]
    fn simple_delete_node() {
        // This is a super basic, debuggable delete test. There is a single root,
        // and a child object. After deleting the child, only the root should
        // exist with no references at all to the child.
        let mut address_space = make_sample_address_space();

        let root_node = NodeId::root_folder_id();

        let node_id = NodeId::new(1, "Hello");
        let _o = ObjectBuilder::new(&node_id, "Foo", "Foo")
            .organized_by(root_node.clone())
            .insert(&mut address_space);

        // Verify the object and refs are there
        assert!(address_space.find_node(&node_id).is_some());
        assert!(address_space.has_reference(&root_node, &node_id, ReferenceTypeId::Organizes));

        address_space.delete(&node_id, true);
        assert!(address_space.find_node(&node_id).is_none());
        assert!(address_space.find_node(&root_node).is_some());
        assert!(!address_space.has_reference(&root_node, &node_id, ReferenceTypeId::Organizes));
    }

    #[test]
    fn delete_node() {
        // Try creating and deleting a node, verifying that it's totally gone afterwards
        (0..2).for_each(|i| {
            let mut address_space = make_sample_address_space();

            let node_type_id = NodeId::new(1, "HelloType");
            let _ot = ObjectTypeBuilder::new(&node_type_id, "HelloType", "HelloType")
                .subtype_of(ObjectTypeId::BaseObjectType)
                .insert(&mut address_space);

            let node_id = NodeId::new(1, "Hello");
            let _o = ObjectBuilder::new(&node_id, "Foo", "Foo")
                .event_notifier(EventNotifier::SUBSCRIBE_TO_EVENTS)
                .organized_by(ObjectId::ObjectsFolder)
                .has_type_definition(node_type_id.clone())
                .insert(&mut address_space);

            // Verify the object and refs are there
            assert!(address_space.find_node(&node_id).is_some());
            assert!(address_space.has_reference(
                &ObjectId::ObjectsFolder.into(),
                &node_id,
                ReferenceTypeId::Organizes
            ));
            assert!(!address_space.has_reference(
                &node_id,
                &ObjectId::ObjectsFolder.into(),
                ReferenceTypeId::Organizes
            ));
            assert!(address_space.has_reference(
                &node_id,
                &node_type_id,
                ReferenceTypeId::HasTypeDefinition
            ));

            // Try one time deleting references, the other time not deleting them.
            let delete_target_references = i == 1;
            address_space.delete(&node_id, delete_target_references);
            if !delete_target_references {
                // Deleted the node and outgoing refs, but not incoming refs
                assert!(address_space.find_node(&node_id).is_none());
                assert!(address_space.has_reference(
                    &ObjectId::ObjectsFolder.into(),
                    &node_id,
                    ReferenceTypeId::Organizes
                ));
                assert!(!address_space.has_reference(
                    &node_id,
                    &node_type_id,
                    ReferenceTypeId::HasTypeDefinition
                ));
            } else {
                // Delete the node and the refs
                assert!(address_space.find_node(&node_id).is_none());
                assert!(!address_space.has_reference(
                    &ObjectId::ObjectsFolder.into(),
                    &node_id,
                    ReferenceTypeId::Organizes
                ));
                assert!(!address_space.has_reference(
                    &node_id,
                    &node_type_id,
                    ReferenceTypeId::HasTypeDefinition
                ));
            }
        });
    }

    #[test]
    fn reachability() {
        let mut address_space = make_sample_address_space();
        let root = NodeId::root_folder_id();

        // The sample folder is reachable, a free-standing node is not.
        let sample = address_space
            .find_node_by_browse_path(
                &root,
                None::<(NodeId, bool)>,
                BrowseDirection::Forward,
                &["Objects".into(), "Sample".into()],
            )
            .unwrap()
            .node_id()
            .clone();
        assert!(address_space.is_reachable_from(&root, &sample));

        let loose = NodeId::new(1, "loose");
        address_space.insert(
            Object::new(&loose, "Loose", "Loose", EventNotifier::empty()),
            None,
        );
        assert!(!address_space.is_reachable_from(&root, &loose));
    }

    #[test]
    fn subtype_cycle_detection() {
        let mut address_space = make_sample_address_space();

        let a = NodeId::new(1, "TypeA");
        let b = NodeId::new(1, "TypeB");
        ObjectTypeBuilder::new(&a, "TypeA", "TypeA")
            .subtype_of(ObjectTypeId::BaseObjectType)
            .insert(&mut address_space);
        ObjectTypeBuilder::new(&b, "TypeB", "TypeB")
            .subtype_of(a.clone())
            .insert(&mut address_space);

        // Linking A under B would close a loop, linking B under a fresh
        // type would not.
        assert!(address_space.subtype_would_cycle(&a, &b));
        assert!(!address_space.subtype_would_cycle(&b, &ObjectTypeId::BaseObjectType.into()));
    }

    #[test]
    fn server_assigned_ids_are_fresh() {
        let mut address_space = make_sample_address_space();
        let a = address_space.next_node_id();
        let b = address_space.next_node_id();
        assert_ne!(a, b);
        assert_eq!(a.namespace, 1);
        assert!(!address_space.node_exists(&b));
    }
}
