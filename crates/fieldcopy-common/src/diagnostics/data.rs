use super::{DiagnosticCategory, DiagnosticMessage};

pub mod diagnostic_codes {
    pub const NO_SUCH_FIELD_ON_TARGET: u32 = 1001;
    pub const CANNOT_WRITE_TO_FINAL_FIELD: u32 = 1002;
    pub const FIELD_TYPE_MISMATCH: u32 = 1003;
}

pub mod diagnostic_messages {
    use super::{DiagnosticCategory, DiagnosticMessage, diagnostic_codes};

    pub const NO_SUCH_FIELD_ON_TARGET: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::NO_SUCH_FIELD_ON_TARGET,
        category: DiagnosticCategory::Warning,
        message: "No such field '{0}' on target type '{1}'; field skipped.",
    };
    pub const CANNOT_WRITE_TO_FINAL_FIELD: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::CANNOT_WRITE_TO_FINAL_FIELD,
        category: DiagnosticCategory::Warning,
        message: "Cannot write to final field '{0}' on target type '{1}'; field skipped.",
    };
    pub const FIELD_TYPE_MISMATCH: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::FIELD_TYPE_MISMATCH,
        category: DiagnosticCategory::Warning,
        message: "Type mismatch on field '{0}' of target type '{1}': '{2}' is not assignable to '{3}'; field skipped.",
    };
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    diagnostic_messages::NO_SUCH_FIELD_ON_TARGET,
    diagnostic_messages::CANNOT_WRITE_TO_FINAL_FIELD,
    diagnostic_messages::FIELD_TYPE_MISMATCH,
];
