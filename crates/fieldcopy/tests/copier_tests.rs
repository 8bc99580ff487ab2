use super::*;
use crate::fixtures::*;
use crate::reflect_struct;
use crate::types::{FieldModifiers, FieldType, PrimitiveKind, Visibility};
use crate::value::{FieldValue, PrimitiveValue};
use crate::{Reflected, diagnostic_codes};
use once_cell::sync::Lazy;
use std::any::TypeId;
use std::io;
use std::sync::{Arc, Mutex};

fn copier() -> FieldCopier {
    FieldCopier::new(CopierConfig::default())
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn copy_primitives() {
    let source = PrimitiveNumbersHolder::default();
    let mut target = ClassWithManyFields::default();

    let report = copier().copy_fields(&source, &mut target).expect("copy succeeds");

    assert_eq!(target.b, source.b);
    assert_eq!(target.s, source.s);
    assert_eq!(target.i, source.i);
    assert_eq!(target.f, source.f);
    assert_eq!(target.d, source.d);
    // extra fields on the target are ignored
    assert_eq!(target.i_obj, None);
    assert!(target.ih.is_none());
    assert!(target.unused.is_none());

    assert!(report.is_complete());
    assert_eq!(report.fields_scanned, 5);
    assert_eq!(report.copied, vec!["b", "s", "i", "f", "d"]);
}

#[test]
fn copy_primitives_to_target_missing_fields() {
    let source = PrimitiveNumbersHolder::default();
    let mut target = ClassWithFewFields::default();

    let report = copier().copy_fields(&source, &mut target).expect("copy succeeds");

    assert_eq!(target.b, source.b);
    assert_eq!(target.s, source.s);
    assert_eq!(report.fields_copied(), 2);
    assert_eq!(report.fields_skipped(), 3);
    for field in ["i", "f", "d"] {
        let diagnostic = report.diagnostic_for(field).expect("skipped field reported");
        assert_eq!(diagnostic.reason, SkipReason::NoSuchField);
        assert_eq!(diagnostic.code(), diagnostic_codes::NO_SUCH_FIELD_ON_TARGET);
    }
}

#[test]
fn copy_boxed_integer_leaves_other_fields_default() {
    let source = IntegerHolder::default();
    let mut target = ClassWithManyFields::default();

    copier().copy_fields(&source, &mut target).expect("copy succeeds");

    assert_eq!(target.i_obj, source.i_obj);
    assert_eq!(target.i_obj, Some(5));
    // extra fields on the target are ignored
    assert!(target.ih.is_none());
    assert!(target.unused.is_none());
    // extra primitives keep their zero value
    assert_eq!(target.b, 0);
    assert_eq!(target.s, 0);
    assert_eq!(target.i, 0);
    assert_eq!(target.f, 0.0);
    assert_eq!(target.d, 0.0);
}

#[test]
fn copy_object_reference_shares_allocation() {
    let source = ObjectHolder::default();
    let mut target = ClassWithManyFields::default();

    copier().copy_fields(&source, &mut target).expect("copy succeeds");

    let (Some(from), Some(to)) = (&source.ih, &target.ih) else {
        panic!("object field not copied");
    };
    assert!(Arc::ptr_eq(from, to), "reference copied, not cloned");
    assert_eq!(to.i_obj, Some(5));
    assert_eq!(target.i_obj, None);
    assert!(target.unused.is_none());
    assert_eq!(target.b, 0);
    assert_eq!(target.i, 0);
    assert_eq!(target.d, 0.0);
}

#[test]
fn ignores_fields_with_different_names() {
    let source = PrimitiveNumbersHolder::default();
    let mut target = ClassWithWrongNames::default();

    let report = copier().copy_fields(&source, &mut target).expect("copy succeeds");

    // 'd' is the only field with the same name
    assert_eq!(target.d, source.d);
    assert_eq!(target.b1, 0);
    assert_eq!(target.s1, 0);
    assert_eq!(target.i1, 0);
    assert_eq!(target.f1, 0.0);
    assert_eq!(report.copied, vec!["d"]);
    assert_eq!(report.fields_skipped(), 4);
}

#[test]
#[allow(non_snake_case)]
fn matching_is_case_sensitive() {
    reflect_struct! {
        #[derive(Default)]
        struct Upper {
            B: i8,
        }
    }

    let source = PrimitiveNumbersHolder::default();
    let mut target = Upper::default();
    let report = copier().copy_fields(&source, &mut target).expect("copy succeeds");

    assert_eq!(target.B, 0);
    assert_eq!(
        report.diagnostic_for("b").map(|d| &d.reason),
        Some(&SkipReason::NoSuchField)
    );
}

#[test]
fn cannot_populate_final_fields() {
    let source = PrimitiveNumbersHolder::default();
    let mut target = ClassWithFinalFields::default();

    let report = copier().copy_fields(&source, &mut target).expect("copy succeeds");

    assert_eq!(target.b, 20);
    assert_eq!(target.s, 21);
    assert_eq!(target.i, 22);
    assert_eq!(target.f, 23.4);
    assert_eq!(target.d, 25.6);
    assert_eq!(report.fields_copied(), 0);
    assert!(
        report
            .diagnostics
            .iter()
            .all(|d| d.reason == SkipReason::ReadOnlyTarget
                && d.code() == diagnostic_codes::CANNOT_WRITE_TO_FINAL_FIELD)
    );
}

#[test]
fn can_populate_private_transient_fields() {
    // Transient fields are copied like any other field.
    let source = MyDate::with_fast_time(12345);
    let mut target = CalendarDate::default();

    let report = copier().copy_fields(&source, &mut target).expect("copy succeeds");

    assert!(report.is_complete());
    let fast_time = target.read_field("fast_time").and_then(|v| v.as_primitive());
    assert_eq!(fast_time, Some(PrimitiveValue::I64(12345)));

    let field = CalendarDate::descriptor()
        .field("fast_time")
        .expect("declared");
    assert!(field.is_transient());
    assert_eq!(field.visibility, Visibility::Private);
}

#[test]
fn super_class_fields_are_not_populated() {
    let source = PrimitiveNumbersHolder::default();
    let mut target = SubClass::default();

    let report = copier().copy_fields(&source, &mut target).expect("copy succeeds");

    // 'i' is the only field declared on the subclass itself
    assert_eq!(target.i, source.i);
    assert_eq!(target.base.b, 0);
    assert_eq!(target.base.s, 0);
    assert_eq!(target.base.i, 0);
    assert_eq!(target.base.f, 0.0);
    assert_eq!(target.base.d, 0.0);
    assert_eq!(report.copied, vec!["i"]);
}

#[test]
fn super_class_fields_are_not_read_from_source() {
    let mut source = SubClass::default();
    source.i = 7;
    source.base.b = 9;
    source.base.d = 1.5;
    let mut target = ClassWithManyFields::default();

    let report = copier().copy_fields(&source, &mut target).expect("copy succeeds");

    assert_eq!(target.i, 7);
    assert_eq!(target.b, 0);
    assert_eq!(target.d, 0.0);
    assert_eq!(report.fields_scanned, 1);
}

#[test]
fn target_only_fields_keep_their_previous_values() {
    let unused = Arc::new("preset".to_string());
    let ih = Arc::new(IntegerHolder { i_obj: Some(1) });
    let mut target = ClassWithManyFields {
        i: 40,
        i_obj: Some(9),
        ih: Some(Arc::clone(&ih)),
        unused: Some(Arc::clone(&unused)),
        ..ClassWithManyFields::default()
    };

    copier()
        .copy_fields(&PrimitiveNumbersHolder::default(), &mut target)
        .expect("copy succeeds");

    assert_eq!(target.i, 5);
    assert_eq!(target.i_obj, Some(9));
    assert!(target.ih.as_ref().is_some_and(|v| Arc::ptr_eq(v, &ih)));
    assert!(target.unused.as_ref().is_some_and(|v| Arc::ptr_eq(v, &unused)));
}

#[test]
fn source_is_left_unchanged() {
    let source = PrimitiveNumbersHolder::default();
    let mut target = ClassWithManyFields::default();
    copier().copy_fields(&source, &mut target).expect("copy succeeds");
    assert_eq!(source, PrimitiveNumbersHolder::default());
}

// =============================================================================
// Coercion
// =============================================================================

reflect_struct! {
    #[derive(Debug, Default)]
    struct WideningSource {
        b: i8,
        s: i16,
        i: i32,
        l: i64,
        f: f32,
        c: char,
        u: u8,
        flag: bool,
    }
}

reflect_struct! {
    #[derive(Debug, Default)]
    struct WideningTarget {
        b: f64,
        s: i64,
        i: i16,
        l: f32,
        f: f64,
        c: u32,
        u: char,
        flag: i32,
    }
}

#[test]
fn widening_copies_and_narrowing_skips() {
    let source = WideningSource {
        b: -2,
        s: 300,
        i: 70_000,
        l: 1 << 40,
        f: 0.25,
        c: 'A',
        u: b'z',
        flag: true,
    };
    let mut target = WideningTarget {
        i: 11,
        l: 1.5,
        flag: 3,
        ..WideningTarget::default()
    };

    let report = copier().copy_fields(&source, &mut target).expect("copy succeeds");

    assert_eq!(target.b, -2.0);
    assert_eq!(target.s, 300);
    assert_eq!(target.f, 0.25);
    assert_eq!(target.c, 65);
    assert_eq!(target.u, 'z');
    // narrowing, precision-losing and bool conversions leave the target alone
    assert_eq!(target.i, 11);
    assert_eq!(target.l, 1.5);
    assert_eq!(target.flag, 3);

    assert_eq!(report.copied, vec!["b", "s", "f", "c", "u"]);
    let mismatch = report.diagnostic_for("i").expect("narrowing reported");
    assert_eq!(
        mismatch.reason,
        SkipReason::TypeMismatch {
            expected: "i16".to_string(),
            found: "i32".to_string(),
        }
    );
    assert_eq!(mismatch.code(), diagnostic_codes::FIELD_TYPE_MISMATCH);
    assert!(report.diagnostic_for("l").is_some());
    assert!(report.diagnostic_for("flag").is_some());
}

reflect_struct! {
    #[derive(Debug, Default)]
    struct NullableTarget {
        i_obj: i64,
        i: Option<i32>,
    }
}

#[test]
fn nullable_primitives_unwrap_and_wrap() {
    reflect_struct! {
        #[derive(Default)]
        struct Source {
            i_obj: Option<i32>,
            i: i32,
        }
    }

    let source = Source {
        i_obj: Some(5),
        i: 8,
    };
    let mut target = NullableTarget::default();
    let report = copier().copy_fields(&source, &mut target).expect("copy succeeds");

    assert!(report.is_complete());
    assert_eq!(target.i_obj, 5);
    assert_eq!(target.i, Some(8));
}

#[test]
fn optional_targets_take_their_own_kind_only() {
    reflect_struct! {
        #[derive(Default)]
        struct Source {
            i_obj: Option<i32>,
            i: i32,
        }
    }
    reflect_struct! {
        #[derive(Default)]
        struct Target {
            i_obj: Option<i64>,
            i: Option<f64>,
        }
    }

    let source = Source {
        i_obj: Some(5),
        i: 3,
    };
    let mut target = Target {
        i_obj: Some(-1),
        i: None,
    };
    let report = copier().copy_fields(&source, &mut target).expect("copy succeeds");

    assert!(report.copied.is_empty());
    assert_eq!(target.i_obj, Some(-1));
    assert_eq!(target.i, None);
    assert_eq!(
        report.diagnostic_for("i_obj").map(|d| &d.reason),
        Some(&SkipReason::TypeMismatch {
            expected: "Option<i64>".to_string(),
            found: "i32".to_string(),
        })
    );
    assert_eq!(
        report.diagnostic_for("i").map(|d| d.code()),
        Some(diagnostic_codes::FIELD_TYPE_MISMATCH)
    );
}

#[test]
fn null_into_primitive_is_a_mismatch_but_null_into_option_clears() {
    reflect_struct! {
        #[derive(Default)]
        struct Source {
            i_obj: Option<i32>,
            ih: Option<Arc<IntegerHolder>>,
        }
    }

    let mut target = NullableTarget {
        i_obj: 42,
        i: Some(1),
    };
    let report = copier()
        .copy_fields(&Source::default(), &mut target)
        .expect("copy succeeds");
    assert_eq!(target.i_obj, 42);
    assert_eq!(
        report.diagnostic_for("i_obj").map(|d| &d.reason),
        Some(&SkipReason::TypeMismatch {
            expected: "i64".to_string(),
            found: "null".to_string(),
        })
    );

    let mut many = ClassWithManyFields {
        i_obj: Some(3),
        ih: Some(Arc::new(IntegerHolder::default())),
        ..ClassWithManyFields::default()
    };
    let report = copier()
        .copy_fields(&Source::default(), &mut many)
        .expect("copy succeeds");
    assert!(report.is_complete());
    assert_eq!(many.i_obj, None);
    assert!(many.ih.is_none());
}

#[test]
fn incompatible_object_types_are_skipped() {
    reflect_struct! {
        #[derive(Default)]
        struct Target {
            ih: Option<Arc<String>>,
            unused: i32,
        }
    }
    reflect_struct! {
        struct Source {
            ih: Option<Arc<IntegerHolder>>,
            unused: Option<Arc<String>>,
        }
    }

    let source = Source {
        ih: Some(Arc::new(IntegerHolder::default())),
        unused: Some(Arc::new("text".to_string())),
    };
    let mut target = Target {
        ih: Some(Arc::new("keep".to_string())),
        unused: 4,
    };
    let report = copier().copy_fields(&source, &mut target).expect("copy succeeds");

    assert_eq!(target.ih.as_deref().map(String::as_str), Some("keep"));
    assert_eq!(target.unused, 4);
    assert_eq!(report.fields_skipped(), 2);
    assert!(
        report
            .diagnostics
            .iter()
            .all(|d| matches!(d.reason, SkipReason::TypeMismatch { .. }))
    );
}

// =============================================================================
// Fatal conditions
// =============================================================================

#[test]
fn missing_arguments_are_invalid() {
    let source = PrimitiveNumbersHolder::default();
    let mut target = ClassWithManyFields::default();

    let err = copier()
        .try_copy_fields(None, Some(&mut target))
        .expect_err("missing source");
    assert!(matches!(err, CopyError::InvalidArgument(_)));
    assert_eq!(err.to_string(), "invalid argument: source must not be null");

    let err = copier()
        .try_copy_fields(Some(&source), None)
        .expect_err("missing target");
    assert!(matches!(err, CopyError::InvalidArgument(_)));

    let report = copier()
        .try_copy_fields(Some(&source), Some(&mut target))
        .expect("both present");
    assert!(report.is_complete());
    assert_eq!(target.i, 5);
}

/// Hand-written reflection whose accessors disagree with its descriptor.
struct Broken {
    refuse_writes: bool,
}

static BROKEN: Lazy<TypeDescriptor> = Lazy::new(|| {
    TypeDescriptor::new("Broken", TypeId::of::<Broken>()).with_field(FieldDescriptor::new(
        "i",
        FieldType::Primitive(PrimitiveKind::I32),
        Visibility::Private,
        FieldModifiers::empty(),
        "Broken",
    ))
});

impl Reflect for Broken {
    fn type_descriptor(&self) -> &'static TypeDescriptor {
        &BROKEN
    }

    fn read_field(&self, _name: &str) -> Option<FieldValue> {
        None
    }

    fn write_field(&mut self, name: &str, _value: FieldValue) -> Result<(), AccessError> {
        if self.refuse_writes {
            return Err(AccessError::ReadOnly {
                type_name: "Broken",
                field: "i",
            });
        }
        Err(AccessError::unknown_field("Broken", name))
    }
}

#[test]
fn unreadable_declared_field_is_fatal() {
    let source = Broken {
        refuse_writes: false,
    };
    let mut target = ClassWithManyFields::default();

    let err = copier()
        .copy_fields(&source, &mut target)
        .expect_err("accessor failure propagates");
    match err {
        CopyError::UnexpectedAccess {
            type_name, field, ..
        } => {
            assert_eq!(type_name, "Broken");
            assert_eq!(field, "i");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn refused_write_outside_policy_is_fatal() {
    let source = PrimitiveNumbersHolder::default();
    let mut target = Broken {
        refuse_writes: true,
    };

    let err = copier()
        .copy_fields(&source, &mut target)
        .expect_err("accessor failure propagates");
    assert!(matches!(
        err,
        CopyError::UnexpectedAccess {
            source: AccessError::ReadOnly { .. },
            ..
        }
    ));
    assert!(std::error::Error::source(&err).is_some());
}

/// Hand-written reflection that hands out a fresh descriptor per value,
/// all sharing one `TypeId`.
struct PerInstance {
    descriptor: &'static TypeDescriptor,
    value: PrimitiveValue,
}

impl PerInstance {
    fn with_field(name: &'static str, value: PrimitiveValue) -> Self {
        let descriptor = TypeDescriptor::new("PerInstance", TypeId::of::<PerInstance>())
            .with_field(FieldDescriptor::new(
                name,
                FieldType::Primitive(value.kind()),
                Visibility::Private,
                FieldModifiers::empty(),
                "PerInstance",
            ));
        Self {
            descriptor: Box::leak(Box::new(descriptor)),
            value,
        }
    }
}

impl Reflect for PerInstance {
    fn type_descriptor(&self) -> &'static TypeDescriptor {
        self.descriptor
    }

    fn read_field(&self, name: &str) -> Option<FieldValue> {
        self.descriptor
            .field(name)
            .map(|_| FieldValue::Primitive(self.value))
    }

    fn write_field(&mut self, name: &str, _value: FieldValue) -> Result<(), AccessError> {
        Err(AccessError::unknown_field("PerInstance", name))
    }
}

#[test]
fn cached_plans_follow_the_runtime_descriptor() {
    for config in [
        CopierConfig::default(),
        CopierConfig {
            cache_plans: false,
            ..CopierConfig::default()
        },
    ] {
        let copier = FieldCopier::new(config);

        let mut target = ClassWithManyFields::default();
        let report = copier
            .copy_fields(
                &PerInstance::with_field("i", PrimitiveValue::I32(3)),
                &mut target,
            )
            .expect("first descriptor");
        assert_eq!(report.copied, vec!["i"]);
        assert_eq!(target.i, 3);

        let mut target = ClassWithManyFields::default();
        let report = copier
            .copy_fields(
                &PerInstance::with_field("d", PrimitiveValue::F64(7.0)),
                &mut target,
            )
            .expect("second descriptor");
        assert_eq!(report.copied, vec!["d"]);
        assert_eq!(target.d, 7.0);
        assert_eq!(target.i, 0);
    }
}

struct Duplicated;

static DUPLICATED: Lazy<TypeDescriptor> = Lazy::new(|| {
    let field = FieldDescriptor::new(
        "i",
        FieldType::Primitive(PrimitiveKind::I32),
        Visibility::Public,
        FieldModifiers::empty(),
        "Duplicated",
    );
    TypeDescriptor::new("Duplicated", TypeId::of::<Duplicated>())
        .with_field(field.clone())
        .with_field(field)
});

impl Reflect for Duplicated {
    fn type_descriptor(&self) -> &'static TypeDescriptor {
        &DUPLICATED
    }

    fn read_field(&self, _name: &str) -> Option<FieldValue> {
        Some(FieldValue::Primitive(PrimitiveValue::I32(1)))
    }

    fn write_field(&mut self, _name: &str, _value: FieldValue) -> Result<(), AccessError> {
        Ok(())
    }
}

#[test]
fn duplicate_field_names_are_rejected_before_copying() {
    let mut target = ClassWithManyFields::default();
    let err = copier()
        .copy_fields(&Duplicated, &mut target)
        .expect_err("malformed descriptor");
    assert!(matches!(err, CopyError::InvalidArgument(msg) if msg.contains("'i'")));
    assert_eq!(target.i, 0);
}

// =============================================================================
// Configuration and diagnostics channel
// =============================================================================

#[test]
fn plan_cache_is_reused_and_optional() {
    let cached = copier();
    let source = PrimitiveNumbersHolder::default();
    for _ in 0..3 {
        let mut target = ClassWithManyFields::default();
        cached.copy_fields(&source, &mut target).expect("copy succeeds");
        assert_eq!(target.i, 5);
    }
    let stats = cached.plan_cache().stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 2);

    let uncached = FieldCopier::new(CopierConfig {
        cache_plans: false,
        ..CopierConfig::default()
    });
    let mut target = ClassWithManyFields::default();
    let report = uncached.copy_fields(&source, &mut target).expect("copy succeeds");
    assert_eq!(report.copied, vec!["b", "s", "i", "f", "d"]);
    assert!(uncached.plan_cache().is_empty());
}

#[test]
fn shared_instance_and_free_function_copy() {
    let source = PrimitiveNumbersHolder::default();
    let mut target = ClassWithFewFields::default();

    let report = copy_fields(&source, &mut target).expect("copy succeeds");

    assert_eq!(target.b, 2);
    assert_eq!(target.s, 3);
    assert_eq!(report.fields_skipped(), 3);
    assert!(std::ptr::eq(FieldCopier::instance(), FieldCopier::instance()));
}

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CapturedLog {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("log buffer")).into_owned()
    }
}

fn capture_warnings(copier: &FieldCopier) -> String {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let source = PrimitiveNumbersHolder::default();
        let mut target = ClassWithFewFields::default();
        copier.copy_fields(&source, &mut target).expect("copy succeeds");
    });
    log.text()
}

#[test]
fn skipped_fields_are_logged_as_warnings() {
    let output = capture_warnings(&copier());

    assert!(output.contains("WARN"), "output: {output}");
    assert!(
        output.contains("No such field 'i' on target type 'ClassWithFewFields'"),
        "output: {output}"
    );
    assert!(output.contains("code=1001"), "output: {output}");
}

#[test]
fn warnings_can_be_silenced_without_losing_report() {
    let quiet = FieldCopier::new(CopierConfig {
        emit_warnings: false,
        ..CopierConfig::default()
    });
    assert!(capture_warnings(&quiet).is_empty());

    let source = PrimitiveNumbersHolder::default();
    let mut target = ClassWithFewFields::default();
    let report = quiet.copy_fields(&source, &mut target).expect("copy succeeds");
    assert_eq!(report.fields_skipped(), 3);
}
