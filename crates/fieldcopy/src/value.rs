//! Runtime field values exchanged between accessors.

use crate::types::PrimitiveKind;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A scalar read out of a field.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PrimitiveValue {
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl PrimitiveValue {
    pub const fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Bool(_) => PrimitiveKind::Bool,
            Self::Char(_) => PrimitiveKind::Char,
            Self::I8(_) => PrimitiveKind::I8,
            Self::I16(_) => PrimitiveKind::I16,
            Self::I32(_) => PrimitiveKind::I32,
            Self::I64(_) => PrimitiveKind::I64,
            Self::U8(_) => PrimitiveKind::U8,
            Self::U16(_) => PrimitiveKind::U16,
            Self::U32(_) => PrimitiveKind::U32,
            Self::U64(_) => PrimitiveKind::U64,
            Self::F32(_) => PrimitiveKind::F32,
            Self::F64(_) => PrimitiveKind::F64,
        }
    }
}

impl fmt::Display for PrimitiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v:?}"),
            Self::I8(v) => write!(f, "{v}i8"),
            Self::I16(v) => write!(f, "{v}i16"),
            Self::I32(v) => write!(f, "{v}i32"),
            Self::I64(v) => write!(f, "{v}i64"),
            Self::U8(v) => write!(f, "{v}u8"),
            Self::U16(v) => write!(f, "{v}u16"),
            Self::U32(v) => write!(f, "{v}u32"),
            Self::U64(v) => write!(f, "{v}u64"),
            Self::F32(v) => write!(f, "{v}f32"),
            Self::F64(v) => write!(f, "{v}f64"),
        }
    }
}

/// A shared reference read out of an `Option<Arc<T>>` field.
///
/// Cloning an `ObjectRef` clones the `Arc`, so a value installed in a target
/// points at the same allocation as the source field.
#[derive(Clone)]
pub struct ObjectRef {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl ObjectRef {
    pub fn new<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            value,
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Runtime type of the pointee.
    pub fn type_id(&self) -> TypeId {
        (*self.value).type_id()
    }

    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The same allocation typed as `T`, or `None` if the pointee is not a `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.value).downcast::<T>().ok()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef")
            .field("type_name", &self.type_name)
            .field("ptr", &Arc::as_ptr(&self.value))
            .finish()
    }
}

/// Value of one field as seen through reflection.
#[derive(Clone, Debug)]
pub enum FieldValue {
    Primitive(PrimitiveValue),
    /// An empty `Option` field.
    Null,
    Object(ObjectRef),
}

impl FieldValue {
    /// Runtime type label used in diagnostics.
    pub fn type_label(&self) -> &'static str {
        match self {
            Self::Primitive(v) => v.kind().name(),
            Self::Null => "null",
            Self::Object(obj) => obj.type_name(),
        }
    }

    pub const fn as_primitive(&self) -> Option<PrimitiveValue> {
        match self {
            Self::Primitive(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<PrimitiveValue> for FieldValue {
    fn from(value: PrimitiveValue) -> Self {
        Self::Primitive(value)
    }
}
