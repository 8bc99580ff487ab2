//! Primitive widening rules.
//!
//! A primitive value may be stored into a field of another kind only when the
//! conversion is lossless. The table is exactly the set of std `From` impls
//! among the supported kinds, except that `bool` converts to nothing but
//! itself:
//!
//! | from   | widens to                                     |
//! |--------|-----------------------------------------------|
//! | `i8`   | `i16` `i32` `i64` `f32` `f64`                 |
//! | `i16`  | `i32` `i64` `f32` `f64`                       |
//! | `i32`  | `i64` `f64`                                   |
//! | `u8`   | `u16` `u32` `u64` `i16` `i32` `i64` `f32` `f64` `char` |
//! | `u16`  | `u32` `u64` `i32` `i64` `f32` `f64`           |
//! | `u32`  | `u64` `i64` `f64`                             |
//! | `f32`  | `f64`                                         |
//! | `char` | `u32` `u64`                                   |
//!
//! `i64`, `u64`, `f64` and `bool` only accept their own kind. Narrowing and
//! sign-changing conversions are never performed.

use crate::types::PrimitiveKind;
use crate::value::PrimitiveValue;

/// Outcome of asking whether one kind may be stored into another.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Conversion {
    Identity,
    Widen,
    Disallowed,
}

impl Conversion {
    pub const fn is_allowed(self) -> bool {
        !matches!(self, Self::Disallowed)
    }
}

/// Classify the conversion from `from` into `to`.
pub const fn widening(from: PrimitiveKind, to: PrimitiveKind) -> Conversion {
    use PrimitiveKind::*;

    if from as u8 == to as u8 {
        return Conversion::Identity;
    }
    match (from, to) {
        (I8, I16 | I32 | I64 | F32 | F64)
        | (I16, I32 | I64 | F32 | F64)
        | (I32, I64 | F64)
        | (U8, U16 | U32 | U64 | I16 | I32 | I64 | F32 | F64 | Char)
        | (U16, U32 | U64 | I32 | I64 | F32 | F64)
        | (U32, U64 | I64 | F64)
        | (F32, F64)
        | (Char, U32 | U64) => Conversion::Widen,
        _ => Conversion::Disallowed,
    }
}

impl PrimitiveValue {
    /// Convert to `to` if the widening table allows it.
    pub fn widen_to(self, to: PrimitiveKind) -> Option<PrimitiveValue> {
        use PrimitiveValue as V;

        match widening(self.kind(), to) {
            Conversion::Identity => return Some(self),
            Conversion::Disallowed => return None,
            Conversion::Widen => {}
        }
        let widened = match (self, to) {
            (V::I8(v), PrimitiveKind::I16) => V::I16(v.into()),
            (V::I8(v), PrimitiveKind::I32) => V::I32(v.into()),
            (V::I8(v), PrimitiveKind::I64) => V::I64(v.into()),
            (V::I8(v), PrimitiveKind::F32) => V::F32(v.into()),
            (V::I8(v), PrimitiveKind::F64) => V::F64(v.into()),

            (V::I16(v), PrimitiveKind::I32) => V::I32(v.into()),
            (V::I16(v), PrimitiveKind::I64) => V::I64(v.into()),
            (V::I16(v), PrimitiveKind::F32) => V::F32(v.into()),
            (V::I16(v), PrimitiveKind::F64) => V::F64(v.into()),

            (V::I32(v), PrimitiveKind::I64) => V::I64(v.into()),
            (V::I32(v), PrimitiveKind::F64) => V::F64(v.into()),

            (V::U8(v), PrimitiveKind::U16) => V::U16(v.into()),
            (V::U8(v), PrimitiveKind::U32) => V::U32(v.into()),
            (V::U8(v), PrimitiveKind::U64) => V::U64(v.into()),
            (V::U8(v), PrimitiveKind::I16) => V::I16(v.into()),
            (V::U8(v), PrimitiveKind::I32) => V::I32(v.into()),
            (V::U8(v), PrimitiveKind::I64) => V::I64(v.into()),
            (V::U8(v), PrimitiveKind::F32) => V::F32(v.into()),
            (V::U8(v), PrimitiveKind::F64) => V::F64(v.into()),
            (V::U8(v), PrimitiveKind::Char) => V::Char(v.into()),

            (V::U16(v), PrimitiveKind::U32) => V::U32(v.into()),
            (V::U16(v), PrimitiveKind::U64) => V::U64(v.into()),
            (V::U16(v), PrimitiveKind::I32) => V::I32(v.into()),
            (V::U16(v), PrimitiveKind::I64) => V::I64(v.into()),
            (V::U16(v), PrimitiveKind::F32) => V::F32(v.into()),
            (V::U16(v), PrimitiveKind::F64) => V::F64(v.into()),

            (V::U32(v), PrimitiveKind::U64) => V::U64(v.into()),
            (V::U32(v), PrimitiveKind::I64) => V::I64(v.into()),
            (V::U32(v), PrimitiveKind::F64) => V::F64(v.into()),

            (V::F32(v), PrimitiveKind::F64) => V::F64(v.into()),

            (V::Char(v), PrimitiveKind::U32) => V::U32(v.into()),
            (V::Char(v), PrimitiveKind::U64) => V::U64(v.into()),

            _ => return None,
        };
        Some(widened)
    }
}

#[cfg(test)]
#[path = "../tests/widening_tests.rs"]
mod tests;
