//! Copier configuration.

use serde::{Deserialize, Serialize};

/// Settings for a `FieldCopier`.
///
/// ```json
/// { "cachePlans": true, "emitWarnings": false }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CopierConfig {
    /// Reuse copy plans per (source type, target type) pair.
    pub cache_plans: bool,
    /// Send skip diagnostics to `tracing` as `warn` events. The report
    /// records them either way.
    pub emit_warnings: bool,
}

impl Default for CopierConfig {
    fn default() -> Self {
        Self {
            cache_plans: true,
            emit_warnings: true,
        }
    }
}

impl CopierConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
#[path = "../tests/config_tests.rs"]
mod tests;
