//! Mapping between Rust field types and reflective values.
//!
//! `FieldSlot` is implemented for every type a reflected field may have:
//! the twelve primitives, `Option<primitive>`, and `Option<Arc<T>>`.
//! `reflect_struct!` calls into it to describe a field and to move values
//! in and out of it.

use crate::types::{FieldType, ObjectType, PrimitiveKind};
use crate::value::{FieldValue, ObjectRef, PrimitiveValue};
use std::any::Any;
use std::sync::Arc;

pub trait FieldSlot: Sized {
    /// Declared type of a field holding `Self`.
    fn field_type() -> FieldType;

    /// Read the current value.
    fn to_field_value(&self) -> FieldValue;

    /// Build a new field value from `value`. Plain primitives widen where
    /// allowed; optional primitives take their own kind only. Returns `None`
    /// when `value` cannot be stored in this field type.
    fn from_field_value(value: &FieldValue) -> Option<Self>;
}

macro_rules! primitive_slot {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl FieldSlot for $ty {
                fn field_type() -> FieldType {
                    FieldType::Primitive(PrimitiveKind::$kind)
                }

                fn to_field_value(&self) -> FieldValue {
                    FieldValue::Primitive(PrimitiveValue::$kind(*self))
                }

                fn from_field_value(value: &FieldValue) -> Option<Self> {
                    match value.as_primitive()?.widen_to(PrimitiveKind::$kind)? {
                        PrimitiveValue::$kind(v) => Some(v),
                        _ => None,
                    }
                }
            }

            impl FieldSlot for Option<$ty> {
                fn field_type() -> FieldType {
                    FieldType::Nullable(PrimitiveKind::$kind)
                }

                fn to_field_value(&self) -> FieldValue {
                    match self {
                        Some(v) => FieldValue::Primitive(PrimitiveValue::$kind(*v)),
                        None => FieldValue::Null,
                    }
                }

                fn from_field_value(value: &FieldValue) -> Option<Self> {
                    match value {
                        FieldValue::Null => Some(None),
                        FieldValue::Primitive(PrimitiveValue::$kind(v)) => Some(Some(*v)),
                        FieldValue::Primitive(_) => None,
                        FieldValue::Object(_) => None,
                    }
                }
            }
        )*
    };
}

primitive_slot! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

impl<T: Any + Send + Sync> FieldSlot for Option<Arc<T>> {
    fn field_type() -> FieldType {
        FieldType::Object(ObjectType::of::<T>())
    }

    fn to_field_value(&self) -> FieldValue {
        match self {
            Some(value) => FieldValue::Object(ObjectRef::new(Arc::clone(value))),
            None => FieldValue::Null,
        }
    }

    fn from_field_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Null => Some(None),
            FieldValue::Object(obj) => obj.downcast::<T>().map(Some),
            FieldValue::Primitive(_) => None,
        }
    }
}

#[cfg(test)]
#[path = "../tests/slot_tests.rs"]
mod tests;
