use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::form::form_model::{FieldSelector, FormId};

/// Per-form tracking options. Loadable from YAML/JSON; every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerOptions {
    /// Shown by whatever confirms navigation away from a dirty form
    #[serde(default = "default_message")]
    pub message: String,

    /// Class toggled on the form while it is dirty
    #[serde(default = "default_dirty_class")]
    pub dirty_class: String,

    /// Opts the form out of any page-level unload warning
    #[serde(default)]
    pub silent: bool,

    /// Adding or removing trackable fields counts as a change
    #[serde(default)]
    pub add_remove_fields_marks_dirty: bool,

    /// Event names each field is subscribed to
    #[serde(default = "default_field_events")]
    pub field_events: Vec<String>,

    #[serde(default)]
    pub field_selector: FieldSelector,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            message: default_message(),
            dirty_class: default_dirty_class(),
            silent: false,
            add_remove_fields_marks_dirty: false,
            field_events: default_field_events(),
            field_selector: FieldSelector::default(),
        }
    }
}

fn default_message() -> String { "You have unsaved changes!".to_string() }
fn default_dirty_class() -> String { "dirty".to_string() }
fn default_field_events() -> Vec<String> {
    ["change", "keyup", "propertychange", "input"]
        .iter()
        .map(|e| e.to_string())
        .collect()
}

/// Invoked with the form id on every dirty/clean transition.
#[derive(Clone)]
pub struct ChangeCallback(Rc<dyn Fn(&FormId)>);

impl ChangeCallback {
    pub fn new(f: impl Fn(&FormId) + 'static) -> Self {
        ChangeCallback(Rc::new(f))
    }

    pub fn call(&self, form: &FormId) {
        (self.0)(form)
    }
}

impl fmt::Debug for ChangeCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChangeCallback(..)")
    }
}

#[derive(Debug, Clone, Default)]
pub struct TrackerConfig {
    pub options: TrackerOptions,
    pub change: Option<ChangeCallback>,
}

impl TrackerConfig {
    pub fn new(options: TrackerOptions) -> Self {
        Self {
            options,
            change: None,
        }
    }

    pub fn on_change(mut self, f: impl Fn(&FormId) + 'static) -> Self {
        self.change = Some(ChangeCallback::new(f));
        self
    }
}
