//! Per-call copy report and per-field skip diagnostics.

use fieldcopy_common::{DiagnosticCategory, DiagnosticMessage, diagnostic_messages};
use std::collections::BTreeMap;
use std::fmt;

/// Why a source field was not copied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The target type declares no field with the same name.
    NoSuchField,
    /// The matching target field is `readonly`.
    ReadOnlyTarget,
    /// The source value cannot be stored in the target field's type.
    TypeMismatch { expected: String, found: String },
}

impl SkipReason {
    pub const fn message(&self) -> &'static DiagnosticMessage {
        match self {
            Self::NoSuchField => &diagnostic_messages::NO_SUCH_FIELD_ON_TARGET,
            Self::ReadOnlyTarget => &diagnostic_messages::CANNOT_WRITE_TO_FINAL_FIELD,
            Self::TypeMismatch { .. } => &diagnostic_messages::FIELD_TYPE_MISMATCH,
        }
    }

    pub const fn code(&self) -> u32 {
        self.message().code
    }
}

/// One skipped field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDiagnostic {
    pub field: &'static str,
    pub source_type: &'static str,
    pub target_type: &'static str,
    pub reason: SkipReason,
}

impl FieldDiagnostic {
    pub const fn code(&self) -> u32 {
        self.reason.code()
    }

    pub const fn category(&self) -> DiagnosticCategory {
        self.reason.message().category
    }

    /// Rendered message text.
    pub fn message_text(&self) -> String {
        let message = self.reason.message();
        match &self.reason {
            SkipReason::TypeMismatch { expected, found } => {
                message.render(&[self.field, self.target_type, found.as_str(), expected.as_str()])
            }
            SkipReason::NoSuchField | SkipReason::ReadOnlyTarget => {
                message.render(&[self.field, self.target_type])
            }
        }
    }
}

impl fmt::Display for FieldDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {}",
            self.category().as_str(),
            self.reason.message().display_code(),
            self.message_text()
        )
    }
}

/// Outcome of one `copy_fields` call.
#[derive(Clone, Debug, Default)]
pub struct CopyReport {
    pub source_type: &'static str,
    pub target_type: &'static str,
    /// Source fields examined.
    pub fields_scanned: usize,
    /// Names of target fields that were written, in source declaration order.
    pub copied: Vec<&'static str>,
    /// One entry per skipped source field, in source declaration order.
    pub diagnostics: Vec<FieldDiagnostic>,
}

impl CopyReport {
    pub fn new(source_type: &'static str, target_type: &'static str) -> Self {
        Self {
            source_type,
            target_type,
            ..Self::default()
        }
    }

    pub fn fields_copied(&self) -> usize {
        self.copied.len()
    }

    pub fn fields_skipped(&self) -> usize {
        self.diagnostics.len()
    }

    /// True when every source field was copied.
    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn was_copied(&self, field: &str) -> bool {
        self.copied.iter().any(|name| *name == field)
    }

    pub fn diagnostic_for(&self, field: &str) -> Option<&FieldDiagnostic> {
        self.diagnostics.iter().find(|d| d.field == field)
    }

    pub(crate) fn record_copied(&mut self, field: &'static str) {
        self.copied.push(field);
    }

    pub(crate) fn record_skipped(&mut self, diagnostic: FieldDiagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Machine-readable counters.
    pub fn to_counts(&self) -> BTreeMap<&'static str, usize> {
        BTreeMap::from([
            ("fields_scanned", self.fields_scanned),
            ("fields_copied", self.fields_copied()),
            ("fields_skipped", self.fields_skipped()),
        ])
    }
}

impl fmt::Display for CopyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[COPY] {} -> {} scanned={} copied={} skipped={}",
            self.source_type,
            self.target_type,
            self.fields_scanned,
            self.fields_copied(),
            self.fields_skipped()
        )
    }
}

#[cfg(test)]
#[path = "../tests/report_tests.rs"]
mod tests;
