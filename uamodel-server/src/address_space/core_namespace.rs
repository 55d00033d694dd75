// UA Model for Rust
// SPDX-License-Identifier: MPL-2.0

//! The namespace 0 bootstrap: the base reference types, node types, data
//! types and folders every address space starts from. Numeric identifiers
//! follow the published Part 6 bindings.

use uamodel_types::{
    DataTypeId, NodeId, ObjectId, ObjectTypeId, ReferenceTypeId, VariableTypeId,
};

use super::AddressSpace;
use crate::{
    DataTypeBuilder, ObjectBuilder, ObjectTypeBuilder, ReferenceTypeBuilder, VariableTypeBuilder,
};

/// Populates an address space with the standard namespace. The resulting
/// nodes are owned by the server and treated as read-only by the service
/// layer.
pub struct CoreNamespace;

impl CoreNamespace {
    /// Add the standard namespace to `address_space`. The base namespace
    /// must already be registered at index 0.
    pub fn populate(address_space: &mut AddressSpace) {
        Self::add_reference_types(address_space);
        Self::add_object_types(address_space);
        Self::add_variable_types(address_space);
        Self::add_data_types(address_space);
        Self::add_folders(address_space);
        Self::add_modelling_rules(address_space);
    }

    fn add_reference_types(address_space: &mut AddressSpace) {
        let references: NodeId = ReferenceTypeId::References.into();
        ReferenceTypeBuilder::new(&references, "References", "References")
            .is_abstract(true)
            .symmetric(true)
            .insert(address_space);

        ReferenceTypeBuilder::new(
            &ReferenceTypeId::HierarchicalReferences.into(),
            "HierarchicalReferences",
            "HierarchicalReferences",
        )
        .is_abstract(true)
        .inverse_name("InverseHierarchicalReferences")
        .subtype_of(ReferenceTypeId::References)
        .insert(address_space);

        ReferenceTypeBuilder::new(
            &ReferenceTypeId::NonHierarchicalReferences.into(),
            "NonHierarchicalReferences",
            "NonHierarchicalReferences",
        )
        .is_abstract(true)
        .symmetric(true)
        .subtype_of(ReferenceTypeId::References)
        .insert(address_space);

        ReferenceTypeBuilder::new(
            &ReferenceTypeId::HasChild.into(),
            "HasChild",
            "HasChild",
        )
        .is_abstract(true)
        .inverse_name("ChildOf")
        .subtype_of(ReferenceTypeId::HierarchicalReferences)
        .insert(address_space);

        ReferenceTypeBuilder::new(
            &ReferenceTypeId::Organizes.into(),
            "Organizes",
            "Organizes",
        )
        .inverse_name("OrganizedBy")
        .subtype_of(ReferenceTypeId::HierarchicalReferences)
        .insert(address_space);

        ReferenceTypeBuilder::new(
            &ReferenceTypeId::Aggregates.into(),
            "Aggregates",
            "Aggregates",
        )
        .is_abstract(true)
        .inverse_name("AggregatedBy")
        .subtype_of(ReferenceTypeId::HasChild)
        .insert(address_space);

        ReferenceTypeBuilder::new(
            &ReferenceTypeId::HasSubtype.into(),
            "HasSubtype",
            "HasSubtype",
        )
        .inverse_name("SubtypeOf")
        .subtype_of(ReferenceTypeId::HasChild)
        .insert(address_space);

        ReferenceTypeBuilder::new(
            &ReferenceTypeId::HasComponent.into(),
            "HasComponent",
            "HasComponent",
        )
        .inverse_name("ComponentOf")
        .subtype_of(ReferenceTypeId::Aggregates)
        .insert(address_space);

        ReferenceTypeBuilder::new(
            &ReferenceTypeId::HasProperty.into(),
            "HasProperty",
            "HasProperty",
        )
        .inverse_name("PropertyOf")
        .subtype_of(ReferenceTypeId::Aggregates)
        .insert(address_space);

        ReferenceTypeBuilder::new(
            &ReferenceTypeId::HasTypeDefinition.into(),
            "HasTypeDefinition",
            "HasTypeDefinition",
        )
        .inverse_name("TypeDefinitionOf")
        .subtype_of(ReferenceTypeId::NonHierarchicalReferences)
        .insert(address_space);

        ReferenceTypeBuilder::new(
            &ReferenceTypeId::HasModellingRule.into(),
            "HasModellingRule",
            "HasModellingRule",
        )
        .inverse_name("ModellingRuleOf")
        .subtype_of(ReferenceTypeId::NonHierarchicalReferences)
        .insert(address_space);
    }

    fn add_object_types(address_space: &mut AddressSpace) {
        ObjectTypeBuilder::new(
            &ObjectTypeId::BaseObjectType.into(),
            "BaseObjectType",
            "BaseObjectType",
        )
        .insert(address_space);

        ObjectTypeBuilder::new(&ObjectTypeId::FolderType.into(), "FolderType", "FolderType")
            .subtype_of(ObjectTypeId::BaseObjectType)
            .insert(address_space);

        ObjectTypeBuilder::new(
            &ObjectTypeId::ModellingRuleType.into(),
            "ModellingRuleType",
            "ModellingRuleType",
        )
        .subtype_of(ObjectTypeId::BaseObjectType)
        .insert(address_space);
    }

    fn add_variable_types(address_space: &mut AddressSpace) {
        VariableTypeBuilder::new(
            &VariableTypeId::BaseVariableType.into(),
            "BaseVariableType",
            "BaseVariableType",
        )
        .is_abstract(true)
        .data_type(DataTypeId::BaseDataType)
        .value_rank(-2)
        .insert(address_space);

        VariableTypeBuilder::new(
            &VariableTypeId::BaseDataVariableType.into(),
            "BaseDataVariableType",
            "BaseDataVariableType",
        )
        .data_type(DataTypeId::BaseDataType)
        .value_rank(-2)
        .subtype_of(VariableTypeId::BaseVariableType)
        .insert(address_space);

        VariableTypeBuilder::new(
            &VariableTypeId::PropertyType.into(),
            "PropertyType",
            "PropertyType",
        )
        .data_type(DataTypeId::BaseDataType)
        .value_rank(-2)
        .subtype_of(VariableTypeId::BaseVariableType)
        .insert(address_space);
    }

    fn add_data_types(address_space: &mut AddressSpace) {
        DataTypeBuilder::new(
            &DataTypeId::BaseDataType.into(),
            "BaseDataType",
            "BaseDataType",
        )
        .is_abstract(true)
        .insert(address_space);

        let base_children = [
            (DataTypeId::Boolean, "Boolean", false),
            (DataTypeId::String, "String", false),
            (DataTypeId::DateTime, "DateTime", false),
            (DataTypeId::Guid, "Guid", false),
            (DataTypeId::ByteString, "ByteString", false),
            (DataTypeId::NodeId, "NodeId", false),
            (DataTypeId::QualifiedName, "QualifiedName", false),
            (DataTypeId::LocalizedText, "LocalizedText", false),
            (DataTypeId::StatusCode, "StatusCode", false),
            (DataTypeId::Structure, "Structure", true),
            (DataTypeId::Enumeration, "Enumeration", true),
            (DataTypeId::Number, "Number", true),
        ];
        for (id, name, is_abstract) in base_children {
            DataTypeBuilder::new(&id.into(), name, name)
                .is_abstract(is_abstract)
                .subtype_of(DataTypeId::BaseDataType)
                .insert(address_space);
        }

        let number_children = [
            (DataTypeId::Integer, "Integer", true),
            (DataTypeId::UInteger, "UInteger", true),
            (DataTypeId::Float, "Float", false),
            (DataTypeId::Double, "Double", false),
        ];
        for (id, name, is_abstract) in number_children {
            DataTypeBuilder::new(&id.into(), name, name)
                .is_abstract(is_abstract)
                .subtype_of(DataTypeId::Number)
                .insert(address_space);
        }

        let integer_children = [
            (DataTypeId::SByte, "SByte"),
            (DataTypeId::Int16, "Int16"),
            (DataTypeId::Int32, "Int32"),
            (DataTypeId::Int64, "Int64"),
        ];
        for (id, name) in integer_children {
            DataTypeBuilder::new(&id.into(), name, name)
                .subtype_of(DataTypeId::Integer)
                .insert(address_space);
        }

        let uinteger_children = [
            (DataTypeId::Byte, "Byte"),
            (DataTypeId::UInt16, "UInt16"),
            (DataTypeId::UInt32, "UInt32"),
            (DataTypeId::UInt64, "UInt64"),
        ];
        for (id, name) in uinteger_children {
            DataTypeBuilder::new(&id.into(), name, name)
                .subtype_of(DataTypeId::UInteger)
                .insert(address_space);
        }
    }

    fn add_folders(address_space: &mut AddressSpace) {
        // The root has no parent, everything else hangs off it.
        ObjectBuilder::new(&ObjectId::RootFolder.into(), "Root", "Root")
            .is_folder()
            .insert(address_space);

        ObjectBuilder::new(&ObjectId::ObjectsFolder.into(), "Objects", "Objects")
            .is_folder()
            .organized_by(ObjectId::RootFolder)
            .insert(address_space);

        ObjectBuilder::new(&ObjectId::TypesFolder.into(), "Types", "Types")
            .is_folder()
            .organized_by(ObjectId::RootFolder)
            .insert(address_space);

        let type_folders = [
            (ObjectId::ObjectTypesFolder, "ObjectTypes"),
            (ObjectId::VariableTypesFolder, "VariableTypes"),
            (ObjectId::ReferenceTypesFolder, "ReferenceTypes"),
            (ObjectId::DataTypesFolder, "DataTypes"),
        ];
        for (id, name) in type_folders {
            ObjectBuilder::new(&id.into(), name, name)
                .is_folder()
                .organized_by(ObjectId::TypesFolder)
                .insert(address_space);
        }

        // Hang the type trees off their folders so every type is
        // hierarchically reachable from the root.
        address_space.insert_reference(
            &ObjectId::ObjectTypesFolder.into(),
            &ObjectTypeId::BaseObjectType.into(),
            ReferenceTypeId::Organizes,
        );
        address_space.insert_reference(
            &ObjectId::VariableTypesFolder.into(),
            &VariableTypeId::BaseVariableType.into(),
            ReferenceTypeId::Organizes,
        );
        address_space.insert_reference(
            &ObjectId::ReferenceTypesFolder.into(),
            &ReferenceTypeId::References.into(),
            ReferenceTypeId::Organizes,
        );
        address_space.insert_reference(
            &ObjectId::DataTypesFolder.into(),
            &DataTypeId::BaseDataType.into(),
            ReferenceTypeId::Organizes,
        );
    }

    fn add_modelling_rules(address_space: &mut AddressSpace) {
        let rules = [
            (ObjectId::ModellingRule_Mandatory, "Mandatory"),
            (ObjectId::ModellingRule_Optional, "Optional"),
            (
                ObjectId::ModellingRule_MandatoryPlaceholder,
                "MandatoryPlaceholder",
            ),
            (
                ObjectId::ModellingRule_OptionalPlaceholder,
                "OptionalPlaceholder",
            ),
        ];
        for (id, name) in rules {
            ObjectBuilder::new(&id.into(), name, name)
                .has_type_definition(ObjectTypeId::ModellingRuleType)
                .organized_by(ObjectId::TypesFolder)
                .insert(address_space);
        }
    }
}
