use std::collections::BTreeMap;

use crate::{
    form::form_model::{Field, FieldKey},
    state::normalize::{CanonicalValue, normalize},
};

/// Captured baseline values for one form, keyed by field handle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaselineStore {
    values: BTreeMap<FieldKey, CanonicalValue>,

    /// Trackable field count at the last capture pass
    field_count: usize,
}

impl BaselineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the field's current canonical value, replacing any earlier one.
    /// Untrackable fields get no entry. Returns whether an entry was stored.
    pub fn capture(&mut self, field: &Field) -> bool {
        match normalize(field) {
            Some(value) => {
                self.values.insert(field.key.clone(), value);
                true
            }
            None => {
                self.values.remove(&field.key);
                false
            }
        }
    }

    pub fn get(&self, key: &FieldKey) -> Option<&CanonicalValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &FieldKey) -> bool {
        self.values.contains_key(key)
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub fn field_count(&self) -> usize {
        self.field_count
    }

    pub fn set_field_count(&mut self, count: usize) {
        self.field_count = count;
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.field_count = 0;
    }

    /// SHA-1 over the sorted entries; identifies the baseline in trace output.
    pub fn fingerprint(&self) -> String {
        use sha1::{Digest, Sha1};

        let mut hasher = Sha1::new();
        for (key, value) in &self.values {
            hasher.update(key.0.as_bytes());
            hasher.update([0u8]);
            hasher.update(format!("{:?}", value).as_bytes());
            hasher.update([0u8]);
        }
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_overwrites_and_skips_untrackable() {
        let mut store = BaselineStore::new();
        let mut field = Field::text("a", "a", "one");
        assert!(store.capture(&field));

        field.value = "two".into();
        store.capture(&field);
        assert_eq!(store.get(&field.key), Some(&CanonicalValue::Text("two".into())));
        assert_eq!(store.count(), 1);

        assert!(!store.capture(&Field::text("b", "b", "x").without_name()));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn fingerprint_tracks_content() {
        let mut a = BaselineStore::new();
        let mut b = BaselineStore::new();
        a.capture(&Field::text("a", "a", "x"));
        b.capture(&Field::text("a", "a", "x"));
        assert_eq!(a.fingerprint(), b.fingerprint());

        b.capture(&Field::text("a", "a", "y"));
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
