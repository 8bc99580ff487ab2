//! The field copier.
//!
//! `FieldCopier::copy_fields` walks the fields declared on the source's
//! runtime type and writes each one into the same-named field declared on the
//! target's runtime type. Fields that cannot be copied are skipped and
//! reported; the call only fails for conditions that invalidate the whole
//! copy.
//!
//! ```ignore
//! let report = FieldCopier::instance().copy_fields(&dto, &mut entity)?;
//! for diagnostic in &report.diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//! ```

use crate::config::CopierConfig;
use crate::error::CopyError;
use crate::plan::{CopyPlan, PlanCache, PlanStep};
use crate::reflect::{AccessError, Reflect};
use crate::report::{CopyReport, FieldDiagnostic, SkipReason};
use crate::types::{FieldDescriptor, TypeDescriptor};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::{debug, debug_span, trace, warn};

static INSTANCE: Lazy<FieldCopier> = Lazy::new(FieldCopier::default);

/// Copies same-named fields between reflected values.
///
/// A copier holds no per-call state. One instance may be shared across
/// threads; only the plan cache is shared, and it is a concurrent map.
#[derive(Debug, Default)]
pub struct FieldCopier {
    config: CopierConfig,
    plans: PlanCache,
}

impl FieldCopier {
    pub fn new(config: CopierConfig) -> Self {
        Self {
            config,
            plans: PlanCache::new(),
        }
    }

    /// Process-wide copier with the default configuration.
    pub fn instance() -> &'static FieldCopier {
        &INSTANCE
    }

    pub const fn config(&self) -> &CopierConfig {
        &self.config
    }

    pub const fn plan_cache(&self) -> &PlanCache {
        &self.plans
    }

    /// Plan for copying from `source_type` into `target_type`.
    pub fn plan_for(
        &self,
        source_type: &'static TypeDescriptor,
        target_type: &'static TypeDescriptor,
    ) -> Result<Arc<CopyPlan>, CopyError> {
        if self.config.cache_plans {
            self.plans.get_or_build(source_type, target_type)
        } else {
            CopyPlan::build(source_type, target_type).map(Arc::new)
        }
    }

    /// Like [`copy_fields`](Self::copy_fields), for callers holding optional
    /// references. A missing source or target is an `InvalidArgument` error.
    pub fn try_copy_fields(
        &self,
        source: Option<&dyn Reflect>,
        target: Option<&mut dyn Reflect>,
    ) -> Result<CopyReport, CopyError> {
        let source = source
            .ok_or_else(|| CopyError::InvalidArgument("source must not be null".to_string()))?;
        let target = target
            .ok_or_else(|| CopyError::InvalidArgument("target must not be null".to_string()))?;
        self.copy_fields(source, target)
    }

    /// Copy every field declared on `source`'s type into the same-named field
    /// declared on `target`'s type.
    ///
    /// Fields with no counterpart, `readonly` targets and values the target
    /// field cannot hold are skipped and listed in the returned report.
    /// Target fields with no same-named source field are left untouched.
    pub fn copy_fields(
        &self,
        source: &dyn Reflect,
        target: &mut dyn Reflect,
    ) -> Result<CopyReport, CopyError> {
        let source_type = source.type_descriptor();
        let target_type = target.type_descriptor();
        let span = debug_span!(
            "copy_fields",
            source = source_type.name(),
            target = target_type.name()
        );
        let _enter = span.enter();

        let plan = self.plan_for(source_type, target_type)?;
        let mut report = CopyReport::new(source_type.name(), target_type.name());

        for planned in plan.fields() {
            report.fields_scanned += 1;
            let source_field = planned.source;
            let target_field = match planned.step {
                PlanStep::Copy { target } => target,
                PlanStep::NoSuchField => {
                    self.skip(&mut report, source_field, SkipReason::NoSuchField);
                    continue;
                }
                PlanStep::ReadOnlyTarget { .. } => {
                    self.skip(&mut report, source_field, SkipReason::ReadOnlyTarget);
                    continue;
                }
            };

            let value = source.read_field(source_field.name).ok_or_else(|| {
                CopyError::UnexpectedAccess {
                    type_name: source_type.name(),
                    field: source_field.name,
                    source: AccessError::unknown_field(source_type.name(), source_field.name),
                }
            })?;

            if !target_field.field_type.accepts(&value) {
                let reason = SkipReason::TypeMismatch {
                    expected: target_field.field_type.to_string(),
                    found: value.type_label().to_string(),
                };
                self.skip(&mut report, source_field, reason);
                continue;
            }

            match target.write_field(target_field.name, value) {
                Ok(()) => {
                    trace!(field = target_field.name, "copied");
                    report.record_copied(target_field.name);
                }
                Err(AccessError::TypeMismatch {
                    expected, found, ..
                }) => {
                    self.skip(
                        &mut report,
                        source_field,
                        SkipReason::TypeMismatch { expected, found },
                    );
                }
                Err(err) => {
                    return Err(CopyError::UnexpectedAccess {
                        type_name: target_type.name(),
                        field: target_field.name,
                        source: err,
                    });
                }
            }
        }

        debug!(
            copied = report.fields_copied(),
            skipped = report.fields_skipped(),
            "copy_fields finished"
        );
        Ok(report)
    }

    fn skip(&self, report: &mut CopyReport, field: &'static FieldDescriptor, reason: SkipReason) {
        let diagnostic = FieldDiagnostic {
            field: field.name,
            source_type: report.source_type,
            target_type: report.target_type,
            reason,
        };
        if self.config.emit_warnings {
            warn!(
                field = diagnostic.field,
                source_type = diagnostic.source_type,
                target_type = diagnostic.target_type,
                code = diagnostic.code(),
                "{}",
                diagnostic.message_text()
            );
        }
        report.record_skipped(diagnostic);
    }
}

/// Copy with the process-wide [`FieldCopier::instance`].
pub fn copy_fields(source: &dyn Reflect, target: &mut dyn Reflect) -> Result<CopyReport, CopyError> {
    FieldCopier::instance().copy_fields(source, target)
}

#[cfg(test)]
#[path = "../tests/copier_tests.rs"]
mod tests;
