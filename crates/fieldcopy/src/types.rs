//! Field and type metadata.
//!
//! A `TypeDescriptor` is the reflective view of one struct: its name, its
//! `std::any::TypeId`, the fields it declares itself (in declaration order)
//! and, when it embeds a parent through `extends`, the parent's descriptor.
//!
//! Descriptors are produced once per type by `reflect_struct!` and live for
//! the rest of the process, so everything handed out here is `&'static`.

use crate::value::FieldValue;
use bitflags::bitflags;
use rustc_hash::FxHashSet;
use std::any::{Any, TypeId};
use std::fmt;

// =============================================================================
// PrimitiveKind
// =============================================================================

/// Scalar kinds a field can be declared with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl PrimitiveKind {
    pub const ALL: [Self; 12] = [
        Self::Bool,
        Self::Char,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::F32,
        Self::F64,
    ];

    /// Rust spelling of the kind.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// FieldType
// =============================================================================

/// Identity of a shared-reference field's pointee (`Option<Arc<T>>`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectType {
    pub id: TypeId,
    pub name: &'static str,
}

impl ObjectType {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }
}

/// Declared type of a field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// A plain scalar (`i32`, `f64`, ...). Never null.
    Primitive(PrimitiveKind),
    /// An optional scalar (`Option<i32>`), the boxed-primitive equivalent.
    Nullable(PrimitiveKind),
    /// A shared reference (`Option<Arc<T>>`).
    Object(ObjectType),
}

impl FieldType {
    /// Whether `value` may be stored in a field of this type.
    ///
    /// | target         | accepts                                      |
    /// |----------------|----------------------------------------------|
    /// | `Primitive(k)` | a primitive whose kind widens to `k`         |
    /// | `Nullable(k)`  | null, or a primitive of exactly kind `k`     |
    /// | `Object(T)`    | null, or an object whose runtime type is `T` |
    ///
    /// Widening only happens on the way into a plain primitive field. An
    /// optional field is a box of one kind and never converts.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (Self::Primitive(kind), FieldValue::Primitive(v)) => {
                crate::widening::widening(v.kind(), *kind).is_allowed()
            }
            (Self::Nullable(kind), FieldValue::Primitive(v)) => v.kind() == *kind,
            (Self::Nullable(_) | Self::Object(_), FieldValue::Null) => true,
            (Self::Object(ty), FieldValue::Object(obj)) => obj.type_id() == ty.id,
            _ => false,
        }
    }

    pub const fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Self::Primitive(kind) | Self::Nullable(kind) => Some(*kind),
            Self::Object(_) => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => write!(f, "{kind}"),
            Self::Nullable(kind) => write!(f, "Option<{kind}>"),
            Self::Object(ty) => write!(f, "Option<Arc<{}>>", ty.name),
        }
    }
}

// =============================================================================
// Modifiers and visibility
// =============================================================================

bitflags! {
    /// Storage qualifiers declared on a field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FieldModifiers: u8 {
        /// Fixed after construction; the copier never writes it.
        const READONLY = 1 << 0;
        /// Excluded from default serialization. Has no effect on copying.
        const TRANSIENT = 1 << 1;
    }
}

/// Declared visibility of a field. Recorded for introspection only; the
/// generated accessors read and write every field regardless.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    /// `pub(crate)`, `pub(super)`, `pub(in path)`
    Restricted,
    Private,
}

impl Visibility {
    /// Classify the token text of a visibility qualifier (`stringify!($vis)`).
    pub fn from_tokens(tokens: &str) -> Self {
        let tokens = tokens.trim();
        if tokens.is_empty() {
            Self::Private
        } else if tokens == "pub" {
            Self::Public
        } else {
            Self::Restricted
        }
    }
}

// =============================================================================
// FieldDescriptor
// =============================================================================

/// One field declared directly on a type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub field_type: FieldType,
    pub visibility: Visibility,
    pub modifiers: FieldModifiers,
    /// Name of the type that declares this field.
    pub declaring_type: &'static str,
}

impl FieldDescriptor {
    pub const fn new(
        name: &'static str,
        field_type: FieldType,
        visibility: Visibility,
        modifiers: FieldModifiers,
        declaring_type: &'static str,
    ) -> Self {
        Self {
            name,
            field_type,
            visibility,
            modifiers,
            declaring_type,
        }
    }

    pub const fn is_readonly(&self) -> bool {
        self.modifiers.contains(FieldModifiers::READONLY)
    }

    pub const fn is_transient(&self) -> bool {
        self.modifiers.contains(FieldModifiers::TRANSIENT)
    }
}

// =============================================================================
// TypeDescriptor
// =============================================================================

/// Reflective view of one struct type.
#[derive(Debug)]
pub struct TypeDescriptor {
    name: &'static str,
    type_id: TypeId,
    fields: Vec<FieldDescriptor>,
    supertype: Option<&'static TypeDescriptor>,
}

impl TypeDescriptor {
    pub fn new(name: &'static str, type_id: TypeId) -> Self {
        Self {
            name,
            type_id,
            fields: Vec::new(),
            supertype: None,
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn with_supertype(mut self, supertype: Option<&'static TypeDescriptor>) -> Self {
        self.supertype = supertype;
        self
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fields declared by this type itself, in declaration order.
    /// Fields of the supertype are not included.
    pub fn declared_fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up one of this type's own fields by exact name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The embedded parent type, if declared with `extends`.
    pub const fn supertype(&self) -> Option<&'static TypeDescriptor> {
        self.supertype
    }

    /// Supertypes from the direct parent upwards.
    pub fn ancestors(&self) -> impl Iterator<Item = &'static TypeDescriptor> {
        std::iter::successors(self.supertype, |ty| ty.supertype)
    }

    /// First field name declared more than once, if any.
    pub fn duplicate_field_name(&self) -> Option<&'static str> {
        let mut seen = FxHashSet::default();
        self.fields
            .iter()
            .find(|f| !seen.insert(f.name))
            .map(|f| f.name)
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
