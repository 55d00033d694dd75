// UA Model for Rust
// SPDX-License-Identifier: MPL-2.0

//! Contains the implementation of `Variant`, the tagged union over the
//! built-in attribute value types.

use chrono::{DateTime, Utc};

use crate::{
    array::Array, byte_string::ByteString, guid::Guid, localized_text::LocalizedText,
    node_id::NodeId, qualified_name::QualifiedName, status_code::StatusCode, string::UAString,
    DataTypeId,
};

/// The type id of a scalar variant value, with the numeric values of the
/// corresponding built-in data types.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u32)]
#[allow(missing_docs)]
pub enum VariantScalarTypeId {
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
    NodeId = 17,
    StatusCode = 19,
    QualifiedName = 20,
    LocalizedText = 21,
}

impl VariantScalarTypeId {
    /// The data type node describing values of this type.
    pub fn data_type_id(&self) -> DataTypeId {
        match self {
            VariantScalarTypeId::Boolean => DataTypeId::Boolean,
            VariantScalarTypeId::SByte => DataTypeId::SByte,
            VariantScalarTypeId::Byte => DataTypeId::Byte,
            VariantScalarTypeId::Int16 => DataTypeId::Int16,
            VariantScalarTypeId::UInt16 => DataTypeId::UInt16,
            VariantScalarTypeId::Int32 => DataTypeId::Int32,
            VariantScalarTypeId::UInt32 => DataTypeId::UInt32,
            VariantScalarTypeId::Int64 => DataTypeId::Int64,
            VariantScalarTypeId::UInt64 => DataTypeId::UInt64,
            VariantScalarTypeId::Float => DataTypeId::Float,
            VariantScalarTypeId::Double => DataTypeId::Double,
            VariantScalarTypeId::String => DataTypeId::String,
            VariantScalarTypeId::DateTime => DataTypeId::DateTime,
            VariantScalarTypeId::Guid => DataTypeId::Guid,
            VariantScalarTypeId::ByteString => DataTypeId::ByteString,
            VariantScalarTypeId::NodeId => DataTypeId::NodeId,
            VariantScalarTypeId::StatusCode => DataTypeId::StatusCode,
            VariantScalarTypeId::QualifiedName => DataTypeId::QualifiedName,
            VariantScalarTypeId::LocalizedText => DataTypeId::LocalizedText,
        }
    }
}

/// A `Variant` holds built-in OPC UA data types, including single and multi
/// dimensional arrays.
///
/// As variants may be passed around a lot on the stack, boxes are used for
/// the larger payloads to keep the size of this type down.
#[derive(PartialEq, Debug, Clone, Default)]
pub enum Variant {
    /// Empty type has no value. It is equivalent to a null value.
    #[default]
    Empty,
    /// Boolean.
    Boolean(bool),
    /// Signed byte.
    SByte(i8),
    /// Unsigned byte.
    Byte(u8),
    /// Signed 16-bit int.
    Int16(i16),
    /// Unsigned 16-bit int.
    UInt16(u16),
    /// Signed 32-bit int.
    Int32(i32),
    /// Unsigned 32-bit int.
    UInt32(u32),
    /// Signed 64-bit int.
    Int64(i64),
    /// Unsigned 64-bit int.
    UInt64(u64),
    /// Float.
    Float(f32),
    /// Double.
    Double(f64),
    /// String.
    String(UAString),
    /// DateTime.
    DateTime(Box<DateTime<Utc>>),
    /// Guid.
    Guid(Box<Guid>),
    /// StatusCode.
    StatusCode(StatusCode),
    /// ByteString.
    ByteString(ByteString),
    /// QualifiedName.
    QualifiedName(Box<QualifiedName>),
    /// LocalizedText.
    LocalizedText(Box<LocalizedText>),
    /// NodeId.
    NodeId(Box<NodeId>),
    /// Single or multi dimensional array of one scalar type.
    Array(Box<Array>),
}

macro_rules! impl_from_for_variant {
    ($tp: ty, $vt: ident) => {
        impl From<$tp> for Variant {
            fn from(value: $tp) -> Self {
                Variant::$vt(value)
            }
        }
    };
    ($tp: ty, $vt: ident, boxed) => {
        impl From<$tp> for Variant {
            fn from(value: $tp) -> Self {
                Variant::$vt(Box::new(value))
            }
        }
    };
}

impl_from_for_variant!(bool, Boolean);
impl_from_for_variant!(i8, SByte);
impl_from_for_variant!(u8, Byte);
impl_from_for_variant!(i16, Int16);
impl_from_for_variant!(u16, UInt16);
impl_from_for_variant!(i32, Int32);
impl_from_for_variant!(u32, UInt32);
impl_from_for_variant!(i64, Int64);
impl_from_for_variant!(u64, UInt64);
impl_from_for_variant!(f32, Float);
impl_from_for_variant!(f64, Double);
impl_from_for_variant!(UAString, String);
impl_from_for_variant!(ByteString, ByteString);
impl_from_for_variant!(StatusCode, StatusCode);
impl_from_for_variant!(DateTime<Utc>, DateTime, boxed);
impl_from_for_variant!(Guid, Guid, boxed);
impl_from_for_variant!(QualifiedName, QualifiedName, boxed);
impl_from_for_variant!(LocalizedText, LocalizedText, boxed);
impl_from_for_variant!(NodeId, NodeId, boxed);

impl<'a> From<&'a str> for Variant {
    fn from(value: &'a str) -> Self {
        Variant::String(value.into())
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Variant::String(value.into())
    }
}

impl From<Array> for Variant {
    fn from(value: Array) -> Self {
        Variant::Array(Box::new(value))
    }
}

/// Build a single dimension array variant from values that each convert
/// into a scalar variant. The caller asserts the element type; mismatching
/// elements yield `Variant::Empty`.
impl<T> From<(VariantScalarTypeId, Vec<T>)> for Variant
where
    T: Into<Variant>,
{
    fn from(value: (VariantScalarTypeId, Vec<T>)) -> Self {
        match Array::new(value.0, value.1.into_iter().map(|v| v.into()).collect::<Vec<_>>()) {
            Ok(array) => array.into(),
            Err(_) => Variant::Empty,
        }
    }
}

impl Variant {
    /// The scalar type of this value, `None` for `Empty` and arrays.
    pub fn scalar_type_id(&self) -> Option<VariantScalarTypeId> {
        match self {
            Variant::Empty | Variant::Array(_) => None,
            Variant::Boolean(_) => Some(VariantScalarTypeId::Boolean),
            Variant::SByte(_) => Some(VariantScalarTypeId::SByte),
            Variant::Byte(_) => Some(VariantScalarTypeId::Byte),
            Variant::Int16(_) => Some(VariantScalarTypeId::Int16),
            Variant::UInt16(_) => Some(VariantScalarTypeId::UInt16),
            Variant::Int32(_) => Some(VariantScalarTypeId::Int32),
            Variant::UInt32(_) => Some(VariantScalarTypeId::UInt32),
            Variant::Int64(_) => Some(VariantScalarTypeId::Int64),
            Variant::UInt64(_) => Some(VariantScalarTypeId::UInt64),
            Variant::Float(_) => Some(VariantScalarTypeId::Float),
            Variant::Double(_) => Some(VariantScalarTypeId::Double),
            Variant::String(_) => Some(VariantScalarTypeId::String),
            Variant::DateTime(_) => Some(VariantScalarTypeId::DateTime),
            Variant::Guid(_) => Some(VariantScalarTypeId::Guid),
            Variant::StatusCode(_) => Some(VariantScalarTypeId::StatusCode),
            Variant::ByteString(_) => Some(VariantScalarTypeId::ByteString),
            Variant::QualifiedName(_) => Some(VariantScalarTypeId::QualifiedName),
            Variant::LocalizedText(_) => Some(VariantScalarTypeId::LocalizedText),
            Variant::NodeId(_) => Some(VariantScalarTypeId::NodeId),
        }
    }

    /// Test whether the variant is empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, Variant::Empty)
    }

    /// Test whether the variant holds an array.
    pub fn is_array(&self) -> bool {
        matches!(self, Variant::Array(_))
    }

    /// The data type node id describing this value, `None` for `Empty`.
    /// For arrays this is the element type.
    pub fn data_type(&self) -> Option<DataTypeId> {
        match self {
            Variant::Empty => None,
            Variant::Array(array) => Some(array.value_type.data_type_id()),
            other => other.scalar_type_id().map(|t| t.data_type_id()),
        }
    }

    /// The value rank this value implies: -1 for scalars, the number of
    /// dimensions for arrays, `None` for `Empty`.
    pub fn value_rank(&self) -> Option<i32> {
        match self {
            Variant::Empty => None,
            Variant::Array(array) => Some(array.value_rank()),
            _ => Some(-1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Variant, VariantScalarTypeId};
    use crate::DataTypeId;

    #[test]
    fn scalar_conversions() {
        assert_eq!(Variant::from(42i32), Variant::Int32(42));
        assert_eq!(Variant::from("hi"), Variant::String("hi".into()));
        assert_eq!(Variant::from(1.5f64).data_type(), Some(DataTypeId::Double));
        assert_eq!(Variant::from(true).value_rank(), Some(-1));
        assert_eq!(Variant::Empty.value_rank(), None);
    }

    #[test]
    fn array_conversion() {
        let v = Variant::from((VariantScalarTypeId::Int32, vec![1i32, 2, 3]));
        let Variant::Array(array) = &v else {
            panic!("expected array, got {:?}", v);
        };
        assert!(array.is_valid());
        assert_eq!(v.value_rank(), Some(1));
        assert_eq!(v.data_type(), Some(DataTypeId::Int32));

        // Mixed element types collapse to Empty.
        let bad = Variant::from((
            VariantScalarTypeId::Int32,
            vec![Variant::Int32(1), Variant::Boolean(true)],
        ));
        assert_eq!(bad, Variant::Empty);
    }
}
