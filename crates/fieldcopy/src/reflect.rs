//! Reflection capability: field enumeration and visibility-blind accessors.
//!
//! Rust has no runtime reflection, so accessors are generated at compile time
//! by [`reflect_struct!`](crate::reflect_struct). The macro declares the
//! struct unchanged and adds a `Reflected` / `Reflect` implementation:
//!
//! ```ignore
//! fieldcopy::reflect_struct! {
//!     #[derive(Debug, Default)]
//!     pub struct Account {
//!         pub id: u32,
//!         balance: i64,
//!         created: i64 [readonly],
//!         session: Option<Arc<Session>> [transient],
//!     }
//! }
//!
//! fieldcopy::reflect_struct! {
//!     #[derive(Debug, Default)]
//!     pub struct SavingsAccount extends pub base: Account {
//!         rate: f64,
//!     }
//! }
//! ```
//!
//! Field modifiers go in brackets after the type (`readonly`, `transient`).
//! A struct declared with `extends` embeds its parent as an ordinary field;
//! the parent's fields stay the parent's: they are not part of the child's
//! declared field set and the child's accessors cannot reach them.

use crate::types::{FieldDescriptor, TypeDescriptor};
use crate::value::FieldValue;
use std::any::Any;
use thiserror::Error;

/// Failure reported by a generated (or hand-written) accessor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("type '{type_name}' declares no field '{field}'")]
    UnknownField {
        type_name: &'static str,
        field: String,
    },
    #[error("field '{field}' of type '{type_name}' is read-only")]
    ReadOnly {
        type_name: &'static str,
        field: &'static str,
    },
    #[error("field '{field}' expects {expected}, found {found}")]
    TypeMismatch {
        field: &'static str,
        expected: String,
        found: String,
    },
}

impl AccessError {
    pub fn unknown_field(type_name: &'static str, field: &str) -> Self {
        Self::UnknownField {
            type_name,
            field: field.to_string(),
        }
    }

    pub fn type_mismatch(field: &FieldDescriptor, found: &FieldValue) -> Self {
        Self::TypeMismatch {
            field: field.name,
            expected: field.field_type.to_string(),
            found: found.type_label().to_string(),
        }
    }
}

/// Object-safe reflective access to a value's own declared fields.
pub trait Reflect: Any {
    /// Descriptor of the value's runtime type.
    fn type_descriptor(&self) -> &'static TypeDescriptor;

    /// Read one of the type's own fields. `None` if the type declares no
    /// field with that name.
    fn read_field(&self, name: &str) -> Option<FieldValue>;

    /// Overwrite one of the type's own fields.
    fn write_field(&mut self, name: &str, value: FieldValue) -> Result<(), AccessError>;
}

/// Static access to a reflected type's descriptor.
pub trait Reflected: Reflect + Sized {
    fn descriptor() -> &'static TypeDescriptor;
}

/// Fields declared directly on the runtime type of `object`.
pub fn declared_fields(object: &dyn Reflect) -> &'static [FieldDescriptor] {
    object.type_descriptor().declared_fields()
}

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_modifier {
    (readonly) => {
        $crate::FieldModifiers::READONLY
    };
    (transient) => {
        $crate::FieldModifiers::TRANSIENT
    };
    ($other:ident) => {
        compile_error!(concat!(
            "unknown field modifier `",
            stringify!($other),
            "` (expected `readonly` or `transient`)"
        ))
    };
}

/// Declare a struct and generate its reflective accessors.
///
/// See the [module documentation](crate::reflect) for the syntax.
#[macro_export]
macro_rules! reflect_struct {
    (
        @impl $name:ident;
        $supertype:expr;
        $( $fvis:vis $field:ident : $fty:ty $([$($flag:ident),*])? ),*
    ) => {
        impl $crate::Reflected for $name {
            fn descriptor() -> &'static $crate::TypeDescriptor {
                static DESCRIPTOR: $crate::reflect::__private::Lazy<$crate::TypeDescriptor> =
                    $crate::reflect::__private::Lazy::new(|| {
                        $crate::TypeDescriptor::new(
                            stringify!($name),
                            ::std::any::TypeId::of::<$name>(),
                        )
                        .with_supertype($supertype)
                        $(
                            .with_field($crate::FieldDescriptor::new(
                                stringify!($field),
                                <$fty as $crate::FieldSlot>::field_type(),
                                $crate::Visibility::from_tokens(stringify!($fvis)),
                                $crate::FieldModifiers::empty()
                                    $($( .union($crate::__field_modifier!($flag)) )*)?,
                                stringify!($name),
                            ))
                        )*
                    });
                &DESCRIPTOR
            }
        }

        impl $crate::Reflect for $name {
            fn type_descriptor(&self) -> &'static $crate::TypeDescriptor {
                <Self as $crate::Reflected>::descriptor()
            }

            fn read_field(&self, name: &str) -> ::core::option::Option<$crate::FieldValue> {
                match name {
                    $(
                        stringify!($field) => ::core::option::Option::Some(
                            <$fty as $crate::FieldSlot>::to_field_value(&self.$field),
                        ),
                    )*
                    _ => ::core::option::Option::None,
                }
            }

            #[allow(unused_variables)]
            fn write_field(
                &mut self,
                name: &str,
                value: $crate::FieldValue,
            ) -> ::core::result::Result<(), $crate::AccessError> {
                let descriptor = <Self as $crate::Reflected>::descriptor();
                let field = descriptor.field(name).ok_or_else(|| {
                    $crate::AccessError::unknown_field(descriptor.name(), name)
                })?;
                if field.is_readonly() {
                    return ::core::result::Result::Err($crate::AccessError::ReadOnly {
                        type_name: descriptor.name(),
                        field: field.name,
                    });
                }
                match name {
                    $(
                        stringify!($field) => {
                            self.$field = <$fty as $crate::FieldSlot>::from_field_value(&value)
                                .ok_or_else(|| $crate::AccessError::type_mismatch(field, &value))?;
                            ::core::result::Result::Ok(())
                        }
                    )*
                    _ => ::core::result::Result::Err(
                        $crate::AccessError::unknown_field(descriptor.name(), name),
                    ),
                }
            }
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident extends $pvis:vis $parent_field:ident : $parent:ty {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty $([$($flag:ident),* $(,)?])?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $pvis $parent_field: $parent,
            $(
                $(#[$fmeta])*
                $fvis $field: $fty,
            )*
        }

        $crate::reflect_struct!(
            @impl $name;
            ::core::option::Option::Some(<$parent as $crate::Reflected>::descriptor());
            $( $fvis $field : $fty $([$($flag),*])? ),*
        );
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty $([$($flag:ident),* $(,)?])?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $fty,
            )*
        }

        $crate::reflect_struct!(
            @impl $name;
            ::core::option::Option::None;
            $( $fvis $field : $fty $([$($flag),*])? ),*
        );
    };
}

#[cfg(test)]
#[path = "../tests/reflect_tests.rs"]
mod tests;
