use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::{
    form::form_model::{FieldKey, Form, FormId},
    state::{
        baseline::BaselineStore,
        evaluator::evaluate_form,
    },
    trace::{logger::TraceLogger, trace::TraceEvent},
    tracker::{
        events::{EventBinder, SubscriptionId},
        options::{TrackerConfig, TrackerOptions},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackerState {
    Uninitialized,
    Clean,
    Dirty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Dirty,
    Clean,
    Changed,
}

/// Outbound notification, emitted only on a dirty/clean transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormNotification {
    pub kind: NotificationKind,
    pub form: FormId,
}

/// Control signals external code can send to a tracked form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormSignal {
    Rescan,
    Reinitialize,
    CheckForm,
    Submit,
    Reset,
}

/// Dirty-state machine for a single form.
///
/// The tracker never owns the form: every operation receives the form's
/// current snapshot, and subscriptions go through the injected binder.
#[derive(Debug)]
pub struct FormTracker {
    form: FormId,
    config: TrackerConfig,
    state: TrackerState,
    baseline: BaselineStore,
    subscriptions: BTreeMap<FieldKey, SubscriptionId>,
    outbox: Vec<FormNotification>,
    tracer: Rc<TraceLogger>,
}

impl FormTracker {
    pub fn new(form: FormId, config: TrackerConfig, tracer: Rc<TraceLogger>) -> Self {
        Self {
            form,
            config,
            state: TrackerState::Uninitialized,
            baseline: BaselineStore::new(),
            subscriptions: BTreeMap::new(),
            outbox: vec![],
            tracer,
        }
    }

    pub fn form_id(&self) -> &FormId {
        &self.form
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == TrackerState::Dirty
    }

    pub fn options(&self) -> &TrackerOptions {
        &self.config.options
    }

    pub fn baseline(&self) -> &BaselineStore {
        &self.baseline
    }

    /// Capture a fresh baseline for every trackable field and (re)bind
    /// their events. Lands in `Clean` without notifying.
    pub fn initialize(&mut self, form: &Form, binder: &mut dyn EventBinder) {
        self.release(binder);
        self.baseline.clear();

        let selector = &self.config.options.field_selector;
        for field in form.trackable_fields(selector) {
            if self.baseline.capture(field) {
                let id = binder.subscribe(&self.form, &field.key, &self.config.options.field_events);
                self.subscriptions.insert(field.key.clone(), id);
            }
        }
        self.baseline.set_field_count(self.baseline.count());
        self.state = TrackerState::Clean;

        self.trace(
            TraceEvent::now(&self.form, "initialize", self.state)
                .with_baseline(self.baseline.fingerprint(), self.baseline.field_count()),
        );
    }

    /// Same as a fresh `initialize`; a dirty form becomes clean silently.
    pub fn reinitialize(&mut self, form: &Form, binder: &mut dyn EventBinder) {
        self.initialize(form, binder);
    }

    pub fn on_field_event(&mut self, form: &Form, field: &FieldKey) -> bool {
        self.evaluate(form, Some(field))
    }

    /// Re-evaluate without a triggering field.
    pub fn check_form(&mut self, form: &Form) -> bool {
        self.evaluate(form, None)
    }

    fn evaluate(&mut self, form: &Form, trigger: Option<&FieldKey>) -> bool {
        if self.state == TrackerState::Uninitialized {
            return false;
        }

        let reason = evaluate_form(&self.baseline, form, trigger, &self.config.options);
        let dirty = reason.is_some();
        if self.set_dirty_status(dirty) {
            self.trace(
                TraceEvent::now(&self.form, "transition", self.state)
                    .with_trigger(trigger)
                    .with_reason(reason),
            );
        }
        dirty
    }

    /// Apply `dirty`. Returns whether the state actually changed; only
    /// then are the callback and notifications fired.
    pub fn set_dirty_status(&mut self, dirty: bool) -> bool {
        if self.state == TrackerState::Uninitialized || dirty == self.is_dirty() {
            return false;
        }

        self.state = if dirty {
            TrackerState::Dirty
        } else {
            TrackerState::Clean
        };

        if let Some(change) = &self.config.change {
            change.call(&self.form);
        }

        let kind = if dirty {
            NotificationKind::Dirty
        } else {
            NotificationKind::Clean
        };
        self.outbox.push(FormNotification {
            kind,
            form: self.form.clone(),
        });
        self.outbox.push(FormNotification {
            kind: NotificationKind::Changed,
            form: self.form.clone(),
        });

        true
    }

    /// Baseline and bind fields added since the last capture, then
    /// re-evaluate. Existing baselines and the stored field count are
    /// left alone; only `initialize` resets them.
    pub fn rescan(&mut self, form: &Form, binder: &mut dyn EventBinder) {
        if self.state == TrackerState::Uninitialized {
            return;
        }

        let selector = &self.config.options.field_selector;
        for field in form.trackable_fields(selector) {
            if self.baseline.contains(&field.key) {
                continue;
            }
            if self.baseline.capture(field) && !self.subscriptions.contains_key(&field.key) {
                let id = binder.subscribe(&self.form, &field.key, &self.config.options.field_events);
                self.subscriptions.insert(field.key.clone(), id);
            }
        }

        self.trace(
            TraceEvent::now(&self.form, "rescan", self.state)
                .with_baseline(self.baseline.fingerprint(), self.baseline.field_count()),
        );

        self.check_form(form);
    }

    /// Submission clears the dirty flag directly: no callback, no
    /// notifications, baseline untouched.
    pub fn on_submit(&mut self) {
        if self.state == TrackerState::Uninitialized {
            return;
        }
        self.state = TrackerState::Clean;
        self.trace(TraceEvent::now(&self.form, "submit", self.state));
    }

    /// Native reset goes through the normal transition path.
    pub fn on_reset(&mut self) {
        if self.state == TrackerState::Uninitialized {
            return;
        }
        if self.set_dirty_status(false) {
            self.trace(TraceEvent::now(&self.form, "reset", self.state));
        }
    }

    pub fn signal(&mut self, form: &Form, signal: FormSignal, binder: &mut dyn EventBinder) {
        match signal {
            FormSignal::Rescan => self.rescan(form, binder),
            FormSignal::Reinitialize => self.reinitialize(form, binder),
            FormSignal::CheckForm => {
                self.check_form(form);
            }
            FormSignal::Submit => self.on_submit(),
            FormSignal::Reset => self.on_reset(),
        }
    }

    /// Mirror the dirty flag onto the form's class list.
    pub fn apply_dirty_class(&self, form: &mut Form) {
        form.toggle_class(&self.config.options.dirty_class, self.is_dirty());
    }

    /// Drop every event subscription this tracker holds.
    pub fn release(&mut self, binder: &mut dyn EventBinder) {
        for (_, id) in std::mem::take(&mut self.subscriptions) {
            binder.unsubscribe(id);
        }
    }

    pub fn drain_notifications(&mut self) -> Vec<FormNotification> {
        std::mem::take(&mut self.outbox)
    }

    fn trace(&self, event: TraceEvent) {
        self.tracer.log(&event);
    }
}
