use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::form::form_model::{FieldKey, FormId};

pub type SubscriptionId = u64;

/// Seam between the tracker and whatever delivers field mutation events.
///
/// A UI binding layer implements this over its own event system; the
/// tracker only ever talks to this trait.
pub trait EventBinder {
    fn subscribe(&mut self, form: &FormId, field: &FieldKey, events: &[String]) -> SubscriptionId;

    fn unsubscribe(&mut self, id: SubscriptionId);

    /// Live subscriptions that `event` on `field` would be delivered to.
    fn deliveries(&self, form: &FormId, field: &FieldKey, event: &str) -> Vec<SubscriptionId>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub form: FormId,
    pub field: FieldKey,
    pub events: Vec<String>,
}

/// In-memory binder. Delivery is synchronous: `Registry::dispatch` asks
/// it for matching subscriptions and evaluates once per match.
#[derive(Debug, Default)]
pub struct EventBus {
    subscriptions: BTreeMap<SubscriptionId, Subscription>,
    next_id: SubscriptionId,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_count(&self) -> usize {
        self.subscriptions.len()
    }
}

impl EventBinder for EventBus {
    fn subscribe(&mut self, form: &FormId, field: &FieldKey, events: &[String]) -> SubscriptionId {
        self.next_id += 1;
        self.subscriptions.insert(
            self.next_id,
            Subscription {
                form: form.clone(),
                field: field.clone(),
                events: events.to_vec(),
            },
        );
        self.next_id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscriptions.remove(&id);
    }

    fn deliveries(&self, form: &FormId, field: &FieldKey, event: &str) -> Vec<SubscriptionId> {
        self.subscriptions
            .iter()
            .filter(|(_, s)| &s.form == form && &s.field == field)
            .filter(|(_, s)| s.events.iter().any(|e| e == event))
            .map(|(id, _)| *id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_only_subscribed_events() {
        let mut bus = EventBus::new();
        let form = FormId::new("f");
        let field = FieldKey::new("a");
        let id = bus.subscribe(&form, &field, &["change".to_string()]);

        assert_eq!(bus.deliveries(&form, &field, "change"), vec![id]);
        assert!(bus.deliveries(&form, &field, "blur").is_empty());

        bus.unsubscribe(id);
        assert!(bus.deliveries(&form, &field, "change").is_empty());
        assert_eq!(bus.active_count(), 0);
    }
}
