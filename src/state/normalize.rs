use std::fmt;

use serde::{Deserialize, Serialize};

use crate::form::{
    classifier::{FieldKind, classify},
    form_model::Field,
};

/// Stands in for the value of any disabled field. No real value can
/// produce it, since it is its own variant.
pub const DISABLED_MARKER: &str = "ays-disabled";

/// Comparable form of a field's current value.
///
/// Equality is strict and per variant: `Toggle(false)` never equals
/// `Text("")` or `Disabled`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CanonicalValue {
    Toggle(bool),
    Text(String),
    Disabled,
}

impl fmt::Display for CanonicalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonicalValue::Toggle(b) => write!(f, "{}", b),
            CanonicalValue::Text(s) => write!(f, "{:?}", s),
            CanonicalValue::Disabled => f.write_str(DISABLED_MARKER),
        }
    }
}

/// Canonical value of `field`, or `None` when it is not trackable
/// (ignore marker or no name).
pub fn normalize(field: &Field) -> Option<CanonicalValue> {
    if field.name.is_none() {
        return None;
    }

    let value = match classify(field) {
        FieldKind::Ignored => return None,
        FieldKind::Disabled => CanonicalValue::Disabled,
        FieldKind::Toggle => CanonicalValue::Toggle(field.checked),
        FieldKind::Select => CanonicalValue::Text(selected_values(field)),
        FieldKind::Text => CanonicalValue::Text(field.value.clone()),
    };

    Some(value)
}

/// Values of every selected option, concatenated in document order.
///
/// Multi-selects collapse to one string, so `["ab", "c"]` and `["a", "bc"]`
/// compare equal. Kept for compatibility with existing baselines.
fn selected_values(field: &Field) -> String {
    field
        .options
        .iter()
        .filter(|o| o.selected)
        .map(|o| o.value.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unnamed_and_ignored_fields_are_untracked() {
        assert_eq!(normalize(&Field::text("a", "a", "x").without_name()), None);
        assert_eq!(normalize(&Field::text("a", "a", "x").with_class("ays-ignore")), None);
    }

    #[test]
    fn disabled_overrides_kind() {
        let mut field = Field::checkbox("c", "c", true);
        field.disabled = true;
        assert_eq!(normalize(&field), Some(CanonicalValue::Disabled));
    }

    #[test]
    fn select_concatenates_in_document_order() {
        let field = Field::select("s", "s", &["A", "B", "C"], &["C", "A"]);
        assert_eq!(normalize(&field), Some(CanonicalValue::Text("AC".into())));

        let none = Field::select("s", "s", &["A", "B"], &[]);
        assert_eq!(normalize(&none), Some(CanonicalValue::Text(String::new())));
    }

    #[test]
    fn variants_never_compare_equal() {
        assert_ne!(CanonicalValue::Toggle(false), CanonicalValue::Text(String::new()));
        assert_ne!(CanonicalValue::Text(DISABLED_MARKER.into()), CanonicalValue::Disabled);
    }
}
