//! Slot values and the runtime type descriptors they are checked against.
//!
//! A synthesized builder stores everything it is given as a [`Value`]: a tagged union over the primitive payloads
//! plus text and opaque shared objects. Contract descriptions talk about [`ValueType`]s, and reader return types are
//! described by a [`ValueDesc`] that also records nullability.
//!
//! ## Notes
//! - Primitives are every type except `Text` and `Object`. Only non-nullable primitives ever receive a zero default
//!   (see [`crate::defaults`]).
//! - Rust types enter and leave the store through [`SlotValue`]; reader return types implement [`FromSlot`].
//!
//! ## Examples
//! ```rust
//! use fauxbuild_core::value::{SlotValue, Value, ValueType};
//!
//! let v = 35i32.into_value();
//! assert_eq!(v.value_type(), ValueType::Int);
//! assert_eq!(i32::from_value(&v), Some(35));
//! assert_eq!(v.to_string(), "35");
//! ```

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Runtime type descriptor for a slot value or an operation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueType {
    Int,
    Long,
    Boolean,
    Byte,
    Short,
    Float,
    Double,
    Char,
    Text,
    Object,
}

impl ValueType {
    /// Every value type, primitives first.
    pub const ALL: &'static [ValueType] = &[
        ValueType::Int,
        ValueType::Long,
        ValueType::Boolean,
        ValueType::Byte,
        ValueType::Short,
        ValueType::Float,
        ValueType::Double,
        ValueType::Char,
        ValueType::Text,
        ValueType::Object,
    ];

    /// Check whether this type has a zero value of its own.
    pub const fn is_primitive(self) -> bool {
        !matches!(self, ValueType::Text | ValueType::Object)
    }

    /// Return the lowercase spelling used in signatures and diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            ValueType::Int => "int",
            ValueType::Long => "long",
            ValueType::Boolean => "boolean",
            ValueType::Byte => "byte",
            ValueType::Short => "short",
            ValueType::Float => "float",
            ValueType::Double => "double",
            ValueType::Char => "char",
            ValueType::Text => "text",
            ValueType::Object => "object",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared return type of a reader: the value type plus whether an unwritten slot may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueDesc {
    pub ty: ValueType,
    pub nullable: bool,
}

impl ValueDesc {
    /// Describe `ty` the way a statically typed reader would: primitives are non-nullable, the rest nullable.
    pub const fn of(ty: ValueType) -> Self {
        Self {
            ty,
            nullable: !ty.is_primitive(),
        }
    }

    /// Describe a reader that returns `ty` or nothing.
    pub const fn nullable(ty: ValueType) -> Self {
        Self { ty, nullable: true }
    }

    /// Check whether an unwritten slot read through this descriptor yields a zero value.
    pub const fn defaults_to_zero(self) -> bool {
        !self.nullable && self.ty.is_primitive()
    }
}

impl fmt::Display for ValueDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{}?", self.ty)
        } else {
            write!(f, "{}", self.ty)
        }
    }
}

/// Shared, type-erased object stored in a slot.
///
/// Equality is identity: two `ObjectRef`s are equal only if they point at the same allocation.
#[derive(Clone)]
pub struct ObjectRef {
    type_name: &'static str,
    inner: Rc<dyn Any>,
}

impl ObjectRef {
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: Rc::new(value),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef(<{}>)", self.type_name)
    }
}

/// A value held by a builder slot or passed as an operation argument.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i32),
    Long(i64),
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Float(f32),
    Double(f64),
    Char(char),
    Text(String),
    Object(ObjectRef),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Int(_) => ValueType::Int,
            Value::Long(_) => ValueType::Long,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Byte(_) => ValueType::Byte,
            Value::Short(_) => ValueType::Short,
            Value::Float(_) => ValueType::Float,
            Value::Double(_) => ValueType::Double,
            Value::Char(_) => ValueType::Char,
            Value::Text(_) => ValueType::Text,
            Value::Object(_) => ValueType::Object,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Byte(v) => write!(f, "{v}"),
            Value::Short(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
            Value::Object(v) => write!(f, "<{}>", v.type_name()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

/// Convert a Rust type into and out of a slot [`Value`].
///
/// The conversion is exact: `from_value` returns `None` for any other variant, the store never coerces.
pub trait SlotValue: Sized {
    /// Runtime descriptor of this type.
    const TYPE: ValueType;

    fn into_value(self) -> Value;

    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! slot_values {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl SlotValue for $ty {
                const TYPE: ValueType = ValueType::$variant;

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

slot_values!(
    i32 => Int,
    i64 => Long,
    bool => Boolean,
    i8 => Byte,
    i16 => Short,
    f32 => Float,
    f64 => Double,
    char => Char,
    String => Text,
    ObjectRef => Object,
);

/// A type a reader may return.
///
/// Non-nullable primitives implement this directly and fall back to their zero value; every [`SlotValue`] can be
/// read as `Option<T>`, which is `None` for an unwritten slot.
pub trait FromSlot: Sized {
    /// Reader return descriptor for this type.
    const DESC: ValueDesc;

    fn from_slot(value: Option<Value>) -> Self;
}

macro_rules! primitive_readers {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromSlot for $ty {
                const DESC: ValueDesc = ValueDesc::of(<$ty as SlotValue>::TYPE);

                fn from_slot(value: Option<Value>) -> Self {
                    value.as_ref().and_then(<$ty as SlotValue>::from_value).unwrap_or_default()
                }
            }
        )*
    };
}

primitive_readers!(i32, i64, bool, i8, i16, f32, f64, char);

impl<T: SlotValue> FromSlot for Option<T> {
    const DESC: ValueDesc = ValueDesc::nullable(T::TYPE);

    fn from_slot(value: Option<Value>) -> Self {
        value.as_ref().and_then(T::from_value)
    }
}
