use serde::{Deserialize, Serialize};

use crate::form::form_model::Field;

/// How a field's value is read for comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// checkbox / radio: compared by checked state
    Toggle,
    /// `<select>`: compared by the selected option values
    Select,
    Disabled,
    /// Carries an ignore marker, never tracked
    Ignored,
    Text,
}

pub const IGNORE_CLASSES: [&str; 2] = ["ays-ignore", "aysIgnore"];
pub const IGNORE_ATTRIBUTE: &str = "data-ays-ignore";

pub fn classify(field: &Field) -> FieldKind {
    if is_ignored(field) {
        return FieldKind::Ignored;
    }

    if field.disabled {
        return FieldKind::Disabled;
    }

    if field.tag.eq_ignore_ascii_case("select") {
        return FieldKind::Select;
    }

    match field.input_type.as_deref().map(|t| t.to_lowercase()) {
        Some(t) if t == "checkbox" || t == "radio" => FieldKind::Toggle,
        _ => FieldKind::Text,
    }
}

fn is_ignored(field: &Field) -> bool {
    if IGNORE_CLASSES.iter().any(|c| field.has_class(c)) {
        return true;
    }

    // An empty attribute value is falsy, same as the attribute being absent
    field
        .attributes
        .get(IGNORE_ATTRIBUTE)
        .is_some_and(|v| !v.is_empty())
}
