use serde::Serialize;

use crate::{
    form::form_model::{Field, FieldKey, Form},
    state::{baseline::BaselineStore, normalize::normalize},
    tracker::options::TrackerOptions,
};

/// Which check found the form dirty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum DirtyReason {
    Trigger { field: FieldKey },
    FieldCount { expected: usize, actual: usize },
    Field { field: FieldKey },
}

/// A field without a baseline is never dirty.
pub fn is_field_dirty(baseline: &BaselineStore, field: &Field) -> bool {
    match baseline.get(&field.key) {
        Some(captured) => normalize(field).as_ref() != Some(captured),
        None => false,
    }
}

pub fn is_form_dirty(
    baseline: &BaselineStore,
    form: &Form,
    trigger: Option<&FieldKey>,
    options: &TrackerOptions,
) -> bool {
    evaluate_form(baseline, form, trigger, options).is_some()
}

/// Evaluation order: the triggering field first, then the structural
/// count (when enabled), then every trackable field in document order.
/// The first hit wins.
pub fn evaluate_form(
    baseline: &BaselineStore,
    form: &Form,
    trigger: Option<&FieldKey>,
    options: &TrackerOptions,
) -> Option<DirtyReason> {
    if let Some(field) = trigger.and_then(|key| form.field(key)) {
        if is_field_dirty(baseline, field) {
            return Some(DirtyReason::Trigger {
                field: field.key.clone(),
            });
        }
    }

    let selector = &options.field_selector;

    if options.add_remove_fields_marks_dirty {
        let actual = form.trackable_fields(selector).count();
        let expected = baseline.field_count();
        if actual != expected {
            return Some(DirtyReason::FieldCount { expected, actual });
        }
    }

    form.trackable_fields(selector)
        .find(|f| is_field_dirty(baseline, f))
        .map(|f| DirtyReason::Field { field: f.key.clone() })
}
