//! Copy plans: which source field goes to which target field.
//!
//! A plan depends only on the two types, never on field values, so it can be
//! computed once per (source type, target type) pair and shared. Whether a
//! particular value fits its target field (null into a primitive, an object
//! of the wrong type) is decided later, at write time.

use crate::error::CopyError;
use crate::types::{FieldDescriptor, TypeDescriptor};
use dashmap::DashMap;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::ptr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// What to do with one source field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlanStep {
    Copy { target: &'static FieldDescriptor },
    NoSuchField,
    ReadOnlyTarget { target: &'static FieldDescriptor },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlannedField {
    pub source: &'static FieldDescriptor,
    pub step: PlanStep,
}

/// Field mapping between two reflected types, in source declaration order.
#[derive(Debug)]
pub struct CopyPlan {
    source_type: &'static TypeDescriptor,
    target_type: &'static TypeDescriptor,
    fields: SmallVec<[PlannedField; 8]>,
}

impl CopyPlan {
    /// Match every field declared on `source_type` against the fields
    /// declared on `target_type` by exact name.
    pub fn build(
        source_type: &'static TypeDescriptor,
        target_type: &'static TypeDescriptor,
    ) -> Result<Self, CopyError> {
        for ty in [source_type, target_type] {
            if let Some(name) = ty.duplicate_field_name() {
                return Err(CopyError::InvalidArgument(format!(
                    "type '{}' declares field '{name}' more than once",
                    ty.name()
                )));
            }
        }

        let target_index: FxHashMap<&'static str, &'static FieldDescriptor> = target_type
            .declared_fields()
            .iter()
            .map(|field| (field.name, field))
            .collect();

        let fields = source_type
            .declared_fields()
            .iter()
            .map(|source| {
                let step = match target_index.get(source.name).copied() {
                    None => PlanStep::NoSuchField,
                    Some(target) if target.is_readonly() => {
                        PlanStep::ReadOnlyTarget { target }
                    }
                    Some(target) => PlanStep::Copy { target },
                };
                PlannedField { source, step }
            })
            .collect();

        Ok(Self {
            source_type,
            target_type,
            fields,
        })
    }

    pub const fn source_type(&self) -> &'static TypeDescriptor {
        self.source_type
    }

    pub const fn target_type(&self) -> &'static TypeDescriptor {
        self.target_type
    }

    pub fn fields(&self) -> &[PlannedField] {
        &self.fields
    }

    /// Number of source fields with a writable same-named target field.
    pub fn copyable_count(&self) -> usize {
        self.fields
            .iter()
            .filter(|f| matches!(f.step, PlanStep::Copy { .. }))
            .count()
    }
}

// =============================================================================
// PlanCache
// =============================================================================

/// Hit/miss counters for a `PlanCache`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PlanCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Thread-safe plan storage keyed by (source descriptor, target descriptor).
///
/// Keys are descriptor addresses, not `TypeId`s: a hand-written `Reflect`
/// impl may hand out several descriptors for one Rust type, and each needs
/// its own plan. Uses `DashMap` so copiers on different threads can share
/// one cache.
#[derive(Debug, Default)]
pub struct PlanCache {
    plans: DashMap<(usize, usize), Arc<CopyPlan>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached plan for the pair, building and storing it on first use.
    pub fn get_or_build(
        &self,
        source_type: &'static TypeDescriptor,
        target_type: &'static TypeDescriptor,
    ) -> Result<Arc<CopyPlan>, CopyError> {
        let key = (descriptor_key(source_type), descriptor_key(target_type));
        if let Some(plan) = self.plans.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(plan.value()));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let plan = Arc::new(CopyPlan::build(source_type, target_type)?);
        trace!(
            source = source_type.name(),
            target = target_type.name(),
            copyable = plan.copyable_count(),
            "PlanCache::get_or_build - built plan"
        );
        // Another thread may have raced us here; keep whichever landed first.
        let entry = self.plans.entry(key).or_insert(plan);
        Ok(Arc::clone(entry.value()))
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    pub fn clear(&self) {
        self.plans.clear();
    }

    pub fn stats(&self) -> PlanCacheStats {
        PlanCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.plans.len(),
        }
    }
}

fn descriptor_key(ty: &'static TypeDescriptor) -> usize {
    ptr::from_ref(ty) as usize
}

#[cfg(test)]
#[path = "../tests/plan_tests.rs"]
mod tests;
