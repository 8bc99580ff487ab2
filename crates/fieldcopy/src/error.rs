//! Errors that abort a whole `copy_fields` call.
//!
//! Per-field problems never surface here; they become `FieldDiagnostic`s in
//! the `CopyReport`.

use crate::reflect::AccessError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CopyError {
    /// A required argument is missing, or a type's descriptor is malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An accessor failed in a way the copy policy does not cover.
    #[error("unexpected access failure on field '{field}' of '{type_name}': {source}")]
    UnexpectedAccess {
        type_name: &'static str,
        field: &'static str,
        #[source]
        source: AccessError,
    },
}
