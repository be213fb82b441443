use serde::{Deserialize, Serialize};

use crate::{
    form::form_model::{Field, Form},
    tracker::{
        options::TrackerOptions,
        tracker::{FormSignal, NotificationKind},
    },
};

/// A scripted sequence of edits and signals against one form, with
/// expectations about the tracker's reaction. Usually written in YAML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub name: String,

    /// Form as it looks when tracking starts
    pub form: Form,

    /// Overrides for the configured tracker options
    #[serde(default)]
    pub options: Option<TrackerOptions>,

    pub steps: Vec<ScenarioStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScenarioStep {
    SetValue { field: String, value: String },

    SetChecked { field: String, checked: bool },

    /// Select exactly these option values
    Select { field: String, values: Vec<String> },

    SetDisabled { field: String, disabled: bool },

    AddField { field: Field },

    RemoveField { field: String },

    /// Fire a field event through the binder
    Event {
        field: String,
        #[serde(default = "default_event")]
        event: String,
    },

    Signal { signal: FormSignal },

    /// Check the tracker. Absent keys are not checked.
    Expect {
        #[serde(default)]
        dirty: Option<bool>,

        /// Notifications emitted since the previous `expect`
        #[serde(default)]
        notifications: Option<Vec<NotificationKind>>,

        /// Total change-callback invocations so far
        #[serde(default)]
        change_calls: Option<usize>,

        #[serde(default)]
        dirty_class: Option<bool>,

        /// Live event subscriptions held by the binder
        #[serde(default)]
        subscriptions: Option<usize>,
    },
}

fn default_event() -> String {
    "change".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpectationResult {
    pub step_index: usize,
    pub check: String,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub passed: bool,
    pub steps_run: usize,
    pub expectations: Vec<ExpectationResult>,

    /// Set when a step could not be executed at all
    pub error: Option<String>,
}
