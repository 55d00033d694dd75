// UA Model for Rust
// SPDX-License-Identifier: MPL-2.0

//! Contains the definition of `Array`, the container for array variants.

use crate::{status_code::StatusCode, variant::Variant, variant::VariantScalarTypeId};

/// An array of variant values, all of the same scalar type. A single
/// dimensional array leaves `dimensions` unset; matrices carry explicit
/// dimensions whose product must equal the element count.
#[derive(PartialEq, Debug, Clone)]
pub struct Array {
    /// The scalar type of every element.
    pub value_type: VariantScalarTypeId,
    /// Values, flattened in row-major order for matrices.
    pub values: Vec<Variant>,
    /// Multi dimensional array dimensions, unset for a plain array.
    pub dimensions: Option<Vec<u32>>,
}

impl Array {
    /// Constructs a single dimension array from the values.
    pub fn new(
        value_type: VariantScalarTypeId,
        values: impl Into<Vec<Variant>>,
    ) -> Result<Array, StatusCode> {
        let values = values.into();
        Self::validate_elements(value_type, &values)?;
        Ok(Array {
            value_type,
            values,
            dimensions: None,
        })
    }

    /// Constructs a multi dimensional array from the values, flattened in
    /// row-major order.
    pub fn new_multi(
        value_type: VariantScalarTypeId,
        values: impl Into<Vec<Variant>>,
        dimensions: impl Into<Vec<u32>>,
    ) -> Result<Array, StatusCode> {
        let values = values.into();
        let dimensions = dimensions.into();
        Self::validate_elements(value_type, &values)?;
        let len: usize = dimensions.iter().map(|d| *d as usize).product();
        if len != values.len() {
            return Err(StatusCode::BadInvalidArgument);
        }
        Ok(Array {
            value_type,
            values,
            dimensions: Some(dimensions),
        })
    }

    fn validate_elements(
        value_type: VariantScalarTypeId,
        values: &[Variant],
    ) -> Result<(), StatusCode> {
        if !values
            .iter()
            .all(|v| v.scalar_type_id() == Some(value_type))
        {
            return Err(StatusCode::BadTypeMismatch);
        }
        Ok(())
    }

    /// Test that the array is valid: all elements are scalars of the
    /// declared type and the dimensions, if any, match the element count.
    pub fn is_valid(&self) -> bool {
        self.values
            .iter()
            .all(|v| v.scalar_type_id() == Some(self.value_type))
            && self.dimensions.as_ref().map_or(true, |d| {
                d.iter().map(|v| *v as usize).product::<usize>() == self.values.len()
            })
    }

    /// The value rank of this array: the number of dimensions.
    pub fn value_rank(&self) -> i32 {
        self.dimensions.as_ref().map_or(1, |d| d.len() as i32)
    }

    /// The dimensions of the array; a plain array reports its length.
    pub fn array_dimensions(&self) -> Vec<u32> {
        self.dimensions
            .clone()
            .unwrap_or_else(|| vec![self.values.len() as u32])
    }
}

#[cfg(test)]
mod tests {
    use super::Array;
    use crate::{StatusCode, Variant, VariantScalarTypeId};

    #[test]
    fn dimension_validation() {
        let values: Vec<Variant> = (0..6).map(Variant::Int32).collect();
        let a = Array::new_multi(VariantScalarTypeId::Int32, values.clone(), vec![2u32, 3]).unwrap();
        assert!(a.is_valid());
        assert_eq!(a.value_rank(), 2);
        assert_eq!(a.array_dimensions(), vec![2, 3]);

        assert_eq!(
            Array::new_multi(VariantScalarTypeId::Int32, values.clone(), vec![4u32, 2]).unwrap_err(),
            StatusCode::BadInvalidArgument
        );
        assert_eq!(
            Array::new(VariantScalarTypeId::Boolean, values).unwrap_err(),
            StatusCode::BadTypeMismatch
        );
    }
}
