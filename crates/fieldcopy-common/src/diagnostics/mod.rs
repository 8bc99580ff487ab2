//! Diagnostic categories and message lookup for the field copier.
//!
//! Message data lives in `data.rs`. Every skip the copier reports carries one
//! of these codes, so hosts can filter or count by code without parsing text.

use serde::Serialize;

mod data;
pub use data::{DIAGNOSTIC_MESSAGES, diagnostic_codes, diagnostic_messages};

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Message = 2,
}

impl DiagnosticCategory {
    /// Lower-case label used in rendered output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Message => "message",
        }
    }
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

impl DiagnosticMessage {
    /// Render this message with positional arguments.
    #[must_use]
    pub fn render(&self, args: &[&str]) -> String {
        format_message(self.message, args)
    }

    /// Code in display form, e.g. `FC1001`.
    #[must_use]
    pub fn display_code(&self) -> String {
        format!("FC{}", self.code)
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// Look up a diagnostic message definition by code.
///
/// Returns the `DiagnosticMessage` with template string containing `{0}`, `{1}`, etc. placeholders.
/// Use `format_message()` to fill in the placeholders.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the message template for a diagnostic code.
#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|m| m.message)
}

/// Get the category for a diagnostic code.
#[must_use]
pub fn get_diagnostic_category(code: u32) -> Option<DiagnosticCategory> {
    get_diagnostic_message(code).map(|m| m.category)
}

#[cfg(test)]
#[path = "../../tests/diagnostics_tests.rs"]
mod tests;
