// UA Model for Rust
// SPDX-License-Identifier: MPL-2.0

//! Well-known numeric identifiers from namespace 0, following the published
//! Part 6 bindings. Only the subset the address space core relies on is
//! carried here.

use crate::node_id::NodeId;

macro_rules! well_known_ids {
    ($(#[$attr:meta])* $name:ident { $($(#[$vattr:meta])* $variant:ident = $value:literal,)+ }) => {
        $(#[$attr])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        #[repr(u32)]
        #[allow(missing_docs, non_camel_case_types)]
        pub enum $name {
            $($(#[$vattr])* $variant = $value,)+
        }

        impl From<$name> for NodeId {
            fn from(value: $name) -> Self {
                NodeId::new(0, value as u32)
            }
        }

        impl From<&$name> for NodeId {
            fn from(value: &$name) -> Self {
                NodeId::new(0, *value as u32)
            }
        }

        impl TryFrom<u32> for $name {
            type Error = ();

            fn try_from(value: u32) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok(Self::$variant),)+
                    _ => Err(()),
                }
            }
        }
    };
}

well_known_ids!(
    /// Well-known object node ids.
    ObjectId {
        ModellingRule_Mandatory = 78,
        ModellingRule_Optional = 80,
        ModellingRule_ExposesItsArray = 83,
        RootFolder = 84,
        ObjectsFolder = 85,
        TypesFolder = 86,
        ViewsFolder = 87,
        ObjectTypesFolder = 88,
        VariableTypesFolder = 89,
        DataTypesFolder = 90,
        ReferenceTypesFolder = 91,
        ModellingRule_OptionalPlaceholder = 11508,
        ModellingRule_MandatoryPlaceholder = 11510,
    }
);

well_known_ids!(
    /// Well-known object type node ids.
    ObjectTypeId {
        BaseObjectType = 58,
        FolderType = 61,
        ModellingRuleType = 77,
    }
);

well_known_ids!(
    /// Well-known variable type node ids.
    VariableTypeId {
        BaseVariableType = 62,
        BaseDataVariableType = 63,
        PropertyType = 68,
    }
);

well_known_ids!(
    /// Well-known reference type node ids.
    ReferenceTypeId {
        References = 31,
        NonHierarchicalReferences = 32,
        HierarchicalReferences = 33,
        HasChild = 34,
        Organizes = 35,
        HasEventSource = 36,
        HasModellingRule = 37,
        HasEncoding = 38,
        HasDescription = 39,
        HasTypeDefinition = 40,
        GeneratesEvent = 41,
        Aggregates = 44,
        HasSubtype = 45,
        HasProperty = 46,
        HasComponent = 47,
        HasNotifier = 48,
        HasOrderedComponent = 49,
    }
);

well_known_ids!(
    /// Well-known data type node ids.
    DataTypeId {
        Boolean = 1,
        SByte = 2,
        Byte = 3,
        Int16 = 4,
        UInt16 = 5,
        Int32 = 6,
        UInt32 = 7,
        Int64 = 8,
        UInt64 = 9,
        Float = 10,
        Double = 11,
        String = 12,
        DateTime = 13,
        Guid = 14,
        ByteString = 15,
        XmlElement = 16,
        NodeId = 17,
        ExpandedNodeId = 18,
        StatusCode = 19,
        QualifiedName = 20,
        LocalizedText = 21,
        Structure = 22,
        DataValue = 23,
        BaseDataType = 24,
        DiagnosticInfo = 25,
        Number = 26,
        Integer = 27,
        UInteger = 28,
        Enumeration = 29,
    }
);
