use std::cell::Cell;
use std::rc::Rc;

use dirty_forms::{
    form::form_model::{Field, FieldKey, Form},
    tracker::{
        options::{TrackerConfig, TrackerOptions},
        registry::Registry,
    },
};

/// Registry tracking `form`, with a counter bumped by the change callback.
pub fn tracked(form: &Form, options: TrackerOptions) -> (Registry, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let config = TrackerConfig::new(options).on_change(move |_| counter.set(counter.get() + 1));

    let mut registry = Registry::new();
    registry
        .track(form, config)
        .expect("test form must be trackable");
    (registry, calls)
}

pub fn key(k: &str) -> FieldKey {
    FieldKey::new(k)
}

pub fn field<'a>(form: &'a mut Form, k: &str) -> &'a mut Field {
    form.field_mut(&key(k)).expect("field exists in test form")
}

/// Profile form mixing every field kind.
pub fn profile_form() -> Form {
    Form::new(
        "profile",
        vec![
            Field::text("name", "name", "Ada"),
            Field::textarea("bio", "bio", ""),
            Field::checkbox("news", "newsletter", false),
            Field::radio("plan-free", "plan", "free", true),
            Field::radio("plan-pro", "plan", "pro", false),
            Field::select("country", "country", &["A", "B", "C"], &["A"]),
        ],
    )
}
