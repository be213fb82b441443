use std::collections::BTreeMap;
use std::rc::Rc;

use crate::{
    form::form_model::{FieldKey, Form, FormId},
    trace::logger::TraceLogger,
    tracker::{
        events::{EventBinder, EventBus},
        options::TrackerConfig,
        tracker::{FormNotification, FormSignal, FormTracker},
    },
};

/// All tracked forms of a page, plus the binder their fields are
/// subscribed through. Create one per page context and pass it around.
#[derive(Debug)]
pub struct Registry<B: EventBinder = EventBus> {
    trackers: BTreeMap<FormId, FormTracker>,
    binder: B,
    tracer: Rc<TraceLogger>,
}

impl Registry<EventBus> {
    pub fn new() -> Self {
        Self::with_binder(EventBus::new(), Rc::new(TraceLogger::disabled()))
    }
}

impl Default for Registry<EventBus> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: EventBinder> Registry<B> {
    pub fn with_binder(binder: B, tracer: Rc<TraceLogger>) -> Self {
        Self {
            trackers: BTreeMap::new(),
            binder,
            tracer,
        }
    }

    /// Start tracking `form`, replacing any earlier tracker for it.
    /// Anything that is not a `<form>` is skipped and `None` returned.
    pub fn track(&mut self, form: &Form, config: TrackerConfig) -> Option<FormId> {
        if !form.is_form() {
            return None;
        }

        if let Some(mut previous) = self.trackers.remove(&form.id) {
            previous.release(&mut self.binder);
        }

        let mut tracker = FormTracker::new(form.id.clone(), config, Rc::clone(&self.tracer));
        tracker.initialize(form, &mut self.binder);
        self.trackers.insert(form.id.clone(), tracker);

        Some(form.id.clone())
    }

    /// Stop tracking and release every subscription. Returns whether the
    /// form was tracked.
    pub fn untrack(&mut self, form: &FormId) -> bool {
        match self.trackers.remove(form) {
            Some(mut tracker) => {
                tracker.release(&mut self.binder);
                true
            }
            None => false,
        }
    }

    /// Deliver a control signal. Untracked forms ignore it.
    pub fn signal(&mut self, form: &Form, signal: FormSignal) -> bool {
        match self.trackers.get_mut(&form.id) {
            Some(tracker) => {
                tracker.signal(form, signal, &mut self.binder);
                true
            }
            None => false,
        }
    }

    /// Route a field event through the binder: one evaluation per live
    /// subscription matching it. Returns the number of deliveries.
    pub fn dispatch(&mut self, form: &Form, field: &FieldKey, event: &str) -> usize {
        let deliveries = self.binder.deliveries(&form.id, field, event);
        let Some(tracker) = self.trackers.get_mut(&form.id) else {
            return 0;
        };

        for _ in &deliveries {
            tracker.on_field_event(form, field);
        }
        deliveries.len()
    }

    /// `false` for forms that were never tracked.
    pub fn is_dirty(&self, form: &FormId) -> bool {
        self.trackers.get(form).is_some_and(|t| t.is_dirty())
    }

    pub fn any_dirty(&self) -> bool {
        self.trackers.values().any(|t| t.is_dirty())
    }

    pub fn dirty_forms(&self) -> impl Iterator<Item = &FormId> {
        self.trackers
            .values()
            .filter(|t| t.is_dirty())
            .map(|t| t.form_id())
    }

    pub fn forms(&self) -> impl Iterator<Item = &FormId> {
        self.trackers.keys()
    }

    pub fn tracker(&self, form: &FormId) -> Option<&FormTracker> {
        self.trackers.get(form)
    }

    pub fn is_tracked(&self, form: &FormId) -> bool {
        self.trackers.contains_key(form)
    }

    /// Toggle the form's dirty class to match its tracker.
    pub fn apply_dirty_class(&self, form: &mut Form) {
        if let Some(tracker) = self.trackers.get(&form.id) {
            tracker.apply_dirty_class(form);
        }
    }

    pub fn drain_notifications(&mut self) -> Vec<FormNotification> {
        self.trackers
            .values_mut()
            .flat_map(|t| t.drain_notifications())
            .collect()
    }

    pub fn binder(&self) -> &B {
        &self.binder
    }
}
