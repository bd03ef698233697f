//! Zero values for primitive slot types.
//!
//! A reader whose slot was never written still has to return *something* when its declared type is a non-nullable
//! primitive. This registry is the single source of those values; it is a `const` table and never changes at runtime.
//!
//! ## Examples
//! ```rust
//! use fauxbuild_core::defaults;
//! use fauxbuild_core::value::{Value, ValueDesc, ValueType};
//!
//! assert_eq!(defaults::zero_value(ValueType::Int), Some(Value::Int(0)));
//! assert_eq!(defaults::zero_value(ValueType::Text), None);
//! assert_eq!(defaults::default_for(ValueDesc::nullable(ValueType::Int)), None);
//! ```

use crate::value::{Value, ValueDesc, ValueType};

/// Zero value of one primitive type.
#[derive(Debug, Clone)]
pub struct PrimitiveDefault {
    pub ty: ValueType,
    pub zero: Value,
    pub description: &'static str,
}

/// Registry of zero values, one entry per primitive [`ValueType`].
pub const PRIMITIVE_DEFAULTS: &[PrimitiveDefault] = &[
    PrimitiveDefault {
        ty: ValueType::Int,
        zero: Value::Int(0),
        description: "32-bit integer zero.",
    },
    PrimitiveDefault {
        ty: ValueType::Long,
        zero: Value::Long(0),
        description: "64-bit integer zero.",
    },
    PrimitiveDefault {
        ty: ValueType::Boolean,
        zero: Value::Boolean(false),
        description: "`false`.",
    },
    PrimitiveDefault {
        ty: ValueType::Byte,
        zero: Value::Byte(0),
        description: "8-bit integer zero.",
    },
    PrimitiveDefault {
        ty: ValueType::Short,
        zero: Value::Short(0),
        description: "16-bit integer zero.",
    },
    PrimitiveDefault {
        ty: ValueType::Float,
        zero: Value::Float(0.0),
        description: "Single precision `0.0`.",
    },
    PrimitiveDefault {
        ty: ValueType::Double,
        zero: Value::Double(0.0),
        description: "Double precision `0.0`.",
    },
    PrimitiveDefault {
        ty: ValueType::Char,
        zero: Value::Char('\0'),
        description: "The null character `'\\0'`.",
    },
];

/// Return the zero value of `ty`, or `None` if `ty` is not primitive.
pub fn zero_value(ty: ValueType) -> Option<Value> {
    PRIMITIVE_DEFAULTS.iter().find(|d| d.ty == ty).map(|d| d.zero.clone())
}

/// Return what an unwritten slot reads as through a reader declared as `desc`.
///
/// ## Returns
/// - `Some(zero)` for non-nullable primitives.
/// - `None` for nullable readers and for non-primitive types.
pub fn default_for(desc: ValueDesc) -> Option<Value> {
    if desc.defaults_to_zero() {
        zero_value(desc.ty)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{FromSlot, SlotValue};

    #[test]
    fn test_every_primitive_has_exactly_one_zero() {
        for ty in ValueType::ALL.iter().copied() {
            let count = PRIMITIVE_DEFAULTS.iter().filter(|d| d.ty == ty).count();
            let expected = usize::from(ty.is_primitive());
            assert_eq!(count, expected, "zero entries for {ty}");
        }
    }

    #[test]
    fn test_zero_matches_declared_type() {
        for entry in PRIMITIVE_DEFAULTS {
            assert_eq!(entry.zero.value_type(), entry.ty);
        }
    }

    #[test]
    fn test_table_agrees_with_typed_readers() {
        assert_eq!(zero_value(ValueType::Int), Some(i32::from_slot(None).into_value()));
        assert_eq!(zero_value(ValueType::Long), Some(i64::from_slot(None).into_value()));
        assert_eq!(zero_value(ValueType::Boolean), Some(bool::from_slot(None).into_value()));
        assert_eq!(zero_value(ValueType::Byte), Some(i8::from_slot(None).into_value()));
        assert_eq!(zero_value(ValueType::Short), Some(i16::from_slot(None).into_value()));
        assert_eq!(zero_value(ValueType::Float), Some(f32::from_slot(None).into_value()));
        assert_eq!(zero_value(ValueType::Double), Some(f64::from_slot(None).into_value()));
        assert_eq!(zero_value(ValueType::Char), Some(char::from_slot(None).into_value()));
    }

    #[test]
    fn test_non_primitive_and_nullable_stay_absent() {
        assert_eq!(default_for(ValueDesc::of(ValueType::Text)), None);
        assert_eq!(default_for(ValueDesc::of(ValueType::Object)), None);
        assert_eq!(default_for(ValueDesc::nullable(ValueType::Char)), None);
        assert_eq!(default_for(ValueDesc::of(ValueType::Char)), Some(Value::Char('\0')));
    }
}
