use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    form::form_model::{FieldKey, FormId},
    state::evaluator::DirtyReason,
    tracker::tracker::TrackerState,
};

/// One JSONL record describing a tracker lifecycle step.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub form: String,

    /// "initialize", "transition", "submit", "reset", "rescan", ...
    pub event: String,
    pub state: String,

    pub trigger: Option<String>,
    pub reason: Option<DirtyReason>,

    pub baseline: Option<String>,
    pub field_count: Option<usize>,
}

impl TraceEvent {
    pub fn now(form: &FormId, event: &str, state: TrackerState) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            form: form.to_string(),
            event: event.to_string(),
            state: format!("{:?}", state),
            trigger: None,
            reason: None,
            baseline: None,
            field_count: None,
        }
    }

    pub fn with_trigger(mut self, trigger: Option<&FieldKey>) -> Self {
        self.trigger = trigger.map(|k| k.to_string());
        self
    }

    pub fn with_reason(mut self, reason: Option<DirtyReason>) -> Self {
        self.reason = reason;
        self
    }

    pub fn with_baseline(mut self, fingerprint: String, field_count: usize) -> Self {
        self.baseline = Some(fingerprint);
        self.field_count = Some(field_count);
        self
    }
}
