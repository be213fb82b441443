use std::rc::Rc;

use dirty_forms::{
    form::form_model::{Field, Form, FormId},
    trace::logger::TraceLogger,
    track_forms,
    tracker::{
        events::EventBus,
        options::{TrackerConfig, TrackerOptions},
        registry::Registry,
        tracker::FormSignal,
    },
};

use crate::common::builders::{field, key, profile_form, tracked};

mod common;

fn two_forms() -> (Form, Form) {
    (
        Form::new("login", vec![Field::text("user", "user", "")]),
        Form::new("search", vec![Field::text("q", "q", "rust")]),
    )
}

#[test]
fn forms_are_tracked_independently() {
    let (mut login, search) = two_forms();
    let mut registry = Registry::new();
    let ids = track_forms(&mut registry, &[login.clone(), search.clone()], &TrackerConfig::default());
    assert_eq!(ids, vec![FormId::new("login"), FormId::new("search")]);

    field(&mut login, "user").value = "ada".into();
    registry.dispatch(&login, &key("user"), "input");

    assert!(registry.is_dirty(&login.id));
    assert!(!registry.is_dirty(&search.id));
    assert!(registry.any_dirty());
    assert_eq!(registry.dirty_forms().collect::<Vec<_>>(), vec![&login.id]);
    assert_eq!(registry.forms().count(), 2);
}

#[test]
fn non_form_elements_are_skipped() {
    let mut div = Form::new("sidebar", vec![Field::text("a", "a", "")]);
    div.tag = "div".into();
    let form = Form::new("real", vec![]);

    let mut registry = Registry::new();
    let ids = track_forms(&mut registry, &[div.clone(), form], &TrackerConfig::default());

    assert_eq!(ids, vec![FormId::new("real")]);
    assert!(!registry.is_tracked(&div.id));
    assert_eq!(registry.binder().active_count(), 0, "Nothing bound for the div");
}

#[test]
fn untrack_releases_bindings() {
    let form = profile_form();
    let (mut registry, _) = tracked(&form, TrackerOptions::default());
    assert_eq!(registry.binder().active_count(), 6);

    assert!(registry.untrack(&form.id));
    assert_eq!(registry.binder().active_count(), 0);
    assert!(!registry.untrack(&form.id), "Second untrack is a no-op");
    assert!(!registry.is_dirty(&form.id));
    assert_eq!(registry.dispatch(&form, &key("name"), "change"), 0);
}

#[test]
fn queries_and_signals_on_untracked_forms_are_harmless() {
    let form = Form::new("ghost", vec![Field::text("a", "a", "")]);
    let mut registry = Registry::new();

    assert!(!registry.is_dirty(&form.id));
    assert!(!registry.signal(&form, FormSignal::CheckForm));
    assert!(!registry.signal(&form, FormSignal::Rescan));
    assert_eq!(registry.dispatch(&form, &key("a"), "change"), 0);
    assert!(!registry.any_dirty());
}

// =========================================================================
// Structural changes
// =========================================================================

#[test]
fn added_field_dirties_only_when_option_enabled() {
    for (enabled, expected) in [(true, true), (false, false)] {
        let mut form = Form::new("f", vec![Field::text("a", "a", "1")]);
        let options = TrackerOptions {
            add_remove_fields_marks_dirty: enabled,
            ..TrackerOptions::default()
        };
        let (mut registry, _) = tracked(&form, options);

        form.add_field(Field::text("b", "b", ""));
        registry.dispatch(&form, &key("a"), "change");
        assert_eq!(
            registry.is_dirty(&form.id),
            expected,
            "add_remove_fields_marks_dirty = {}",
            enabled
        );
    }
}

#[test]
fn removed_field_dirties_when_option_enabled() {
    let mut form = Form::new("f", vec![Field::text("a", "a", "1"), Field::text("b", "b", "2")]);
    let options = TrackerOptions {
        add_remove_fields_marks_dirty: true,
        ..TrackerOptions::default()
    };
    let (mut registry, _) = tracked(&form, options);

    form.remove_field(&key("b"));
    registry.signal(&form, FormSignal::CheckForm);
    assert!(registry.is_dirty(&form.id));
}

#[test]
fn rescan_does_not_accept_the_new_structure() {
    let mut form = Form::new("f", vec![Field::text("a", "a", "1")]);
    let options = TrackerOptions {
        add_remove_fields_marks_dirty: true,
        ..TrackerOptions::default()
    };
    let (mut registry, _) = tracked(&form, options);

    form.add_field(Field::text("b", "b", ""));
    registry.signal(&form, FormSignal::Rescan);
    assert!(registry.is_dirty(&form.id), "Added field stays a change after rescan");
    assert_eq!(registry.tracker(&form.id).unwrap().baseline().field_count(), 1);
    assert_eq!(registry.binder().active_count(), 2, "New field is bound");

    registry.signal(&form, FormSignal::Reinitialize);
    assert!(!registry.is_dirty(&form.id), "Reinitialize adopts the new count");
    assert_eq!(registry.tracker(&form.id).unwrap().baseline().field_count(), 2);
}

#[test]
fn buttons_do_not_count_as_fields() {
    let mut form = Form::new("f", vec![Field::text("a", "a", "1")]);
    let options = TrackerOptions {
        add_remove_fields_marks_dirty: true,
        ..TrackerOptions::default()
    };
    let (mut registry, _) = tracked(&form, options);

    let mut submit = Field::text("go", "go", "Save");
    submit.input_type = Some("submit".into());
    form.add_field(submit);
    registry.signal(&form, FormSignal::CheckForm);
    assert!(!registry.is_dirty(&form.id));
}

#[test]
fn named_button_elements_are_tracked() {
    let mut save = Field::text("save", "action", "save");
    save.tag = "button".into();
    save.input_type = Some("submit".into());
    let form = Form::new("f", vec![Field::text("a", "a", "1"), save]);

    let (registry, _) = tracked(&form, TrackerOptions::default());
    let tracker = registry.tracker(&form.id).unwrap();
    assert_eq!(tracker.baseline().field_count(), 2, "<button type=submit> counts");
    assert_eq!(registry.binder().active_count(), 2);
}

// =========================================================================
// Tracing
// =========================================================================

#[test]
fn trace_logger_records_transitions() {
    let path = std::env::temp_dir().join(format!("dirty-forms-trace-{}.jsonl", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let tracer = Rc::new(TraceLogger::new(&path.display().to_string()));

    let mut form = Form::new("f", vec![Field::text("t", "t", "abc")]);
    let mut registry = Registry::with_binder(EventBus::new(), tracer);
    registry.track(&form, TrackerConfig::default());
    field(&mut form, "t").value = "x".into();
    registry.dispatch(&form, &key("t"), "change");

    let content = std::fs::read_to_string(&path).expect("trace file written");
    let lines: Vec<serde_json::Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).expect("each line is JSON"))
        .collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["event"], "initialize");
    assert_eq!(lines[0]["field_count"], 1);
    assert_eq!(lines[1]["event"], "transition");
    assert_eq!(lines[1]["state"], "Dirty");
    assert_eq!(lines[1]["trigger"], "t");
    assert_eq!(lines[1]["reason"]["check"], "trigger");

    let _ = std::fs::remove_file(&path);
}
