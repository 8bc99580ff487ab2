//! Common types shared by the fieldcopy crates.
//!
//! This crate provides:
//! - The diagnostic message catalog (codes, categories, templates)
//! - `{0}`-style message formatting

// Diagnostic catalog and message types
pub mod diagnostics;
pub use diagnostics::{
    DIAGNOSTIC_MESSAGES, DiagnosticCategory, DiagnosticMessage, diagnostic_codes,
    diagnostic_messages, format_message, get_diagnostic_category, get_diagnostic_message,
    get_message_template,
};
