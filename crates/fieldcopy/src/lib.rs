//! Reflective field copier.
//!
//! Copies the value of every field declared on a source struct into the
//! same-named field declared on a target struct, for structurally similar but
//! independently defined types (DTO to entity and back).
//!
//! - **Reflection**: `reflect_struct!` generates descriptors and
//!   visibility-blind accessors at compile time
//! - **Matching**: exact, case-sensitive field names; only fields declared on
//!   the value's own type take part, never those of an embedded parent
//! - **Coercion**: lossless primitive widening only (see [`widening`]);
//!   shared references are copied as the same `Arc`
//! - **Failure**: per-field problems are skipped and reported, both in the
//!   returned [`CopyReport`] and as `tracing` warnings
//!
//! ```ignore
//! use fieldcopy::{copy_fields, reflect_struct};
//!
//! reflect_struct! {
//!     #[derive(Debug, Default)]
//!     pub struct UserDto { id: u32, name: Option<Arc<String>> }
//! }
//! reflect_struct! {
//!     #[derive(Debug, Default)]
//!     pub struct User { id: u64, name: Option<Arc<String>>, created: i64 [readonly] }
//! }
//!
//! let report = copy_fields(&dto, &mut user)?;
//! assert!(report.is_complete());
//! ```

pub mod config;
pub mod copier;
pub mod error;
pub mod plan;
pub mod reflect;
pub mod report;
pub mod slot;
pub mod tracing_config;
pub mod types;
pub mod value;
pub mod widening;

pub use config::CopierConfig;
pub use copier::{FieldCopier, copy_fields};
pub use error::CopyError;
pub use plan::{CopyPlan, PlanCache, PlanCacheStats, PlanStep, PlannedField};
pub use reflect::{AccessError, Reflect, Reflected, declared_fields};
pub use report::{CopyReport, FieldDiagnostic, SkipReason};
pub use slot::FieldSlot;
pub use tracing_config::init_tracing;
pub use types::{
    FieldDescriptor, FieldModifiers, FieldType, ObjectType, PrimitiveKind, TypeDescriptor,
    Visibility,
};
pub use value::{FieldValue, ObjectRef, PrimitiveValue};
pub use widening::{Conversion, widening};

pub use fieldcopy_common::diagnostics::{DiagnosticCategory, diagnostic_codes};

// Shared test fixtures and cross-module tests.
#[cfg(test)]
#[path = "../tests/fixtures.rs"]
mod fixtures;
#[cfg(test)]
#[path = "../tests/concurrent_tests.rs"]
mod concurrent_tests;
