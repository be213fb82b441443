use crate::{
    form::form_model::{Form, FormId},
    tracker::{events::EventBinder, options::TrackerConfig, registry::Registry},
};

pub mod cli;
pub mod error;
pub mod form;
pub mod report;
pub mod scenario;
pub mod state;
pub mod trace;
pub mod tracker;

pub use crate::{
    form::form_model::{Field, FieldKey},
    state::normalize::CanonicalValue,
    tracker::{
        events::EventBus,
        tracker::{FormNotification, FormSignal, FormTracker, NotificationKind, TrackerState},
    },
};

/// Track every element of a page selection with the same config.
///
/// Elements that are not forms are skipped. Returns the ids of the forms
/// now tracked, in selection order.
pub fn track_forms<B: EventBinder>(
    registry: &mut Registry<B>,
    elements: &[Form],
    config: &TrackerConfig,
) -> Vec<FormId> {
    elements
        .iter()
        .filter_map(|form| registry.track(form, config.clone()))
        .collect()
}
