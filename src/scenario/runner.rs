use std::cell::Cell;
use std::rc::Rc;

use crate::{
    error::DirtyFormsError,
    form::form_model::{Field, FieldKey, Form},
    scenario::scenario_model::{ExpectationResult, Scenario, ScenarioResult, ScenarioStep},
    trace::logger::TraceLogger,
    tracker::{
        events::EventBus,
        options::{TrackerConfig, TrackerOptions},
        registry::Registry,
        tracker::{FormNotification, FormSignal, NotificationKind},
    },
};

/// Replays a `Scenario` against a fresh registry.
pub struct ScenarioRunner;

struct Replay {
    form: Form,
    registry: Registry<EventBus>,
    pending: Vec<FormNotification>,
    change_calls: Rc<Cell<usize>>,
    expectations: Vec<ExpectationResult>,
}

impl ScenarioRunner {
    /// Run `scenario`. Options in the scenario override `defaults`.
    pub fn run(
        scenario: &Scenario,
        defaults: &TrackerOptions,
        tracer: Rc<TraceLogger>,
    ) -> ScenarioResult {
        let change_calls = Rc::new(Cell::new(0));
        let options = scenario.options.clone().unwrap_or_else(|| defaults.clone());
        let counter = Rc::clone(&change_calls);
        let config = TrackerConfig::new(options).on_change(move |_| counter.set(counter.get() + 1));

        let mut replay = Replay {
            form: scenario.form.clone(),
            registry: Registry::with_binder(EventBus::new(), tracer),
            pending: vec![],
            change_calls,
            expectations: vec![],
        };

        if replay.registry.track(&replay.form, config).is_none() {
            let err = DirtyFormsError::NotAForm(replay.form.id.to_string());
            return Self::failed(scenario, 0, replay.expectations, err.to_string());
        }
        replay.sync();

        for (i, step) in scenario.steps.iter().enumerate() {
            if let Err(e) = replay.execute(step, i) {
                let message = format!("Step {} failed: {}", i, e);
                return Self::failed(scenario, i + 1, replay.expectations, message);
            }
        }

        let passed = replay.expectations.iter().all(|e| e.passed);
        ScenarioResult {
            name: scenario.name.clone(),
            passed,
            steps_run: scenario.steps.len(),
            expectations: replay.expectations,
            error: None,
        }
    }

    fn failed(
        scenario: &Scenario,
        steps_run: usize,
        expectations: Vec<ExpectationResult>,
        message: String,
    ) -> ScenarioResult {
        ScenarioResult {
            name: scenario.name.clone(),
            passed: false,
            steps_run,
            expectations,
            error: Some(message),
        }
    }
}

impl Replay {
    fn execute(&mut self, step: &ScenarioStep, step_index: usize) -> Result<(), DirtyFormsError> {
        match step {
            ScenarioStep::SetValue { field, value } => {
                self.field_mut(field)?.value = value.clone();
            }

            ScenarioStep::SetChecked { field, checked } => {
                self.field_mut(field)?.checked = *checked;
            }

            ScenarioStep::Select { field, values } => {
                self.field_mut(field)?.select_values(values);
            }

            ScenarioStep::SetDisabled { field, disabled } => {
                self.field_mut(field)?.disabled = *disabled;
            }

            ScenarioStep::AddField { field } => {
                self.form.add_field(field.clone());
            }

            ScenarioStep::RemoveField { field } => {
                let key = FieldKey::new(field.as_str());
                self.form.remove_field(&key).ok_or_else(|| self.unknown_field(field))?;
            }

            ScenarioStep::Event { field, event } => {
                let key = FieldKey::new(field.as_str());
                if self.form.field(&key).is_none() {
                    return Err(self.unknown_field(field));
                }
                self.registry.dispatch(&self.form, &key, event);
            }

            ScenarioStep::Signal { signal } => {
                if *signal == FormSignal::Reset {
                    self.form.reset();
                }
                if !self.registry.signal(&self.form, *signal) {
                    return Err(DirtyFormsError::UnknownForm(self.form.id.to_string()));
                }
            }

            ScenarioStep::Expect {
                dirty,
                notifications,
                change_calls,
                dirty_class,
                subscriptions,
            } => {
                self.check_expectations(
                    step_index,
                    *dirty,
                    notifications.as_deref(),
                    *change_calls,
                    *dirty_class,
                    *subscriptions,
                );
                return Ok(());
            }
        }

        self.sync();
        Ok(())
    }

    /// Collect notifications and mirror the dirty class after each step.
    fn sync(&mut self) {
        self.pending.extend(self.registry.drain_notifications());
        self.registry.apply_dirty_class(&mut self.form);
    }

    fn check_expectations(
        &mut self,
        step_index: usize,
        dirty: Option<bool>,
        notifications: Option<&[NotificationKind]>,
        change_calls: Option<usize>,
        dirty_class: Option<bool>,
        subscriptions: Option<usize>,
    ) {
        let emitted: Vec<NotificationKind> =
            std::mem::take(&mut self.pending).into_iter().map(|n| n.kind).collect();

        if let Some(expected) = dirty {
            let actual = self.registry.is_dirty(&self.form.id);
            self.record(step_index, "dirty", expected == actual, expected, actual);
        }

        if let Some(expected) = notifications {
            let passed = expected == emitted.as_slice();
            self.record(step_index, "notifications", passed, expected, &emitted);
        }

        if let Some(expected) = change_calls {
            let actual = self.change_calls.get();
            self.record(step_index, "change_calls", expected == actual, expected, actual);
        }

        if let Some(expected) = dirty_class {
            let class = self
                .registry
                .tracker(&self.form.id)
                .map(|t| t.options().dirty_class.clone())
                .unwrap_or_default();
            let actual = self.form.has_class(&class);
            self.record(step_index, "dirty_class", expected == actual, expected, actual);
        }

        if let Some(expected) = subscriptions {
            let actual = self.registry.binder().active_count();
            self.record(step_index, "subscriptions", expected == actual, expected, actual);
        }
    }

    fn record(
        &mut self,
        step_index: usize,
        check: &str,
        passed: bool,
        expected: impl std::fmt::Debug,
        actual: impl std::fmt::Debug,
    ) {
        self.expectations.push(ExpectationResult {
            step_index,
            check: check.to_string(),
            passed,
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        });
    }

    fn field_mut(&mut self, field: &str) -> Result<&mut Field, DirtyFormsError> {
        let form_id = self.form.id.to_string();
        self.form
            .field_mut(&FieldKey::new(field))
            .ok_or_else(|| DirtyFormsError::UnknownField {
                field: field.to_string(),
                form: form_id,
            })
    }

    fn unknown_field(&self, field: &str) -> DirtyFormsError {
        DirtyFormsError::UnknownField {
            field: field.to_string(),
            form: self.form.id.to_string(),
        }
    }
}
