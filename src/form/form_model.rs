use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::form::classifier::{FieldKind, classify};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FormId(pub String);

impl FormId {
    pub fn new(id: impl Into<String>) -> Self {
        FormId(id.into())
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque element handle handed out by the binding layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldKey(pub String);

impl FieldKey {
    pub fn new(key: impl Into<String>) -> Self {
        FieldKey(key.into())
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    #[serde(default)]
    pub selected: bool,
    #[serde(default, rename = "defaultSelected")]
    pub default_selected: bool,
}

/// Snapshot of an input-like element, in the shape the DOM extraction
/// script emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub key: FieldKey,
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default, rename = "type")]
    pub input_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    #[serde(default, rename = "defaultValue")]
    pub default_value: Option<String>,
    #[serde(default, rename = "defaultChecked")]
    pub default_checked: Option<bool>,
}

fn default_tag() -> String {
    "input".to_string()
}

impl Field {
    /// A named `<input type="text">` whose current and default value are `value`.
    pub fn text(key: &str, name: &str, value: &str) -> Self {
        Field {
            key: FieldKey::new(key),
            tag: "input".into(),
            input_type: Some("text".into()),
            name: Some(name.into()),
            value: value.into(),
            checked: false,
            disabled: false,
            classes: vec![],
            attributes: BTreeMap::new(),
            options: vec![],
            default_value: Some(value.into()),
            default_checked: None,
        }
    }

    pub fn checkbox(key: &str, name: &str, checked: bool) -> Self {
        Field {
            input_type: Some("checkbox".into()),
            value: "on".into(),
            checked,
            default_value: None,
            default_checked: Some(checked),
            ..Field::text(key, name, "")
        }
    }

    pub fn radio(key: &str, name: &str, value: &str, checked: bool) -> Self {
        Field {
            input_type: Some("radio".into()),
            value: value.into(),
            checked,
            default_value: None,
            default_checked: Some(checked),
            ..Field::text(key, name, "")
        }
    }

    /// A `<select>` with the given option values; `selected` lists the
    /// initially selected ones.
    pub fn select(key: &str, name: &str, values: &[&str], selected: &[&str]) -> Self {
        let options = values
            .iter()
            .map(|v| SelectOption {
                value: v.to_string(),
                selected: selected.contains(v),
                default_selected: selected.contains(v),
            })
            .collect();

        Field {
            tag: "select".into(),
            input_type: None,
            options,
            default_value: None,
            ..Field::text(key, name, "")
        }
    }

    pub fn textarea(key: &str, name: &str, value: &str) -> Self {
        Field {
            tag: "textarea".into(),
            input_type: None,
            ..Field::text(key, name, value)
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn without_name(mut self) -> Self {
        self.name = None;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn kind(&self) -> FieldKind {
        classify(self)
    }

    /// Select exactly the options whose value is listed, deselecting the rest.
    pub fn select_values(&mut self, values: &[String]) {
        for option in &mut self.options {
            option.selected = values.contains(&option.value);
        }
    }
}

/// Criteria deciding which elements of a form count as fields.
///
/// The default mirrors `:input:not(input[type=submit]):not(input[type=button])`:
/// excluded types apply to `<input>` elements only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSelector {
    #[serde(default = "default_selector_tags")]
    pub tags: Vec<String>,
    #[serde(default = "default_excluded_types")]
    pub excluded_types: Vec<String>,
}

impl Default for FieldSelector {
    fn default() -> Self {
        Self {
            tags: default_selector_tags(),
            excluded_types: default_excluded_types(),
        }
    }
}

fn default_selector_tags() -> Vec<String> {
    ["input", "select", "textarea", "button"]
        .iter()
        .map(|t| t.to_string())
        .collect()
}

fn default_excluded_types() -> Vec<String> {
    vec!["submit".to_string(), "button".to_string()]
}

impl FieldSelector {
    pub fn matches(&self, field: &Field) -> bool {
        let tag = field.tag.to_lowercase();
        if !self.tags.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
            return false;
        }

        match field.input_type.as_deref() {
            Some(ty) if tag == "input" => {
                !self.excluded_types.iter().any(|t| t.eq_ignore_ascii_case(ty))
            }
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub id: FormId,
    #[serde(default = "default_form_tag")]
    pub tag: String,
    #[serde(default)]
    pub classes: Vec<String>,
    /// Fields in document order
    #[serde(default)]
    pub fields: Vec<Field>,
}

fn default_form_tag() -> String {
    "form".to_string()
}

impl Form {
    pub fn new(id: &str, fields: Vec<Field>) -> Self {
        Form {
            id: FormId::new(id),
            tag: default_form_tag(),
            classes: vec![],
            fields,
        }
    }

    pub fn is_form(&self) -> bool {
        self.tag.eq_ignore_ascii_case("form")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn toggle_class(&mut self, class: &str, on: bool) {
        let present = self.has_class(class);
        if on && !present {
            self.classes.push(class.to_string());
        } else if !on && present {
            self.classes.retain(|c| c != class);
        }
    }

    pub fn field(&self, key: &FieldKey) -> Option<&Field> {
        self.fields.iter().find(|f| &f.key == key)
    }

    pub fn field_mut(&mut self, key: &FieldKey) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| &f.key == key)
    }

    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn remove_field(&mut self, key: &FieldKey) -> Option<Field> {
        let idx = self.fields.iter().position(|f| &f.key == key)?;
        Some(self.fields.remove(idx))
    }

    /// Elements matched by the selector, regardless of trackability.
    pub fn selected_fields<'a>(
        &'a self,
        selector: &'a FieldSelector,
    ) -> impl Iterator<Item = &'a Field> + 'a {
        self.fields.iter().filter(move |f| selector.matches(f))
    }

    /// Fields that get a baseline: matched, not ignored, and named.
    pub fn trackable_fields<'a>(
        &'a self,
        selector: &'a FieldSelector,
    ) -> impl Iterator<Item = &'a Field> + 'a {
        self.selected_fields(selector)
            .filter(|f| f.name.is_some() && f.kind() != FieldKind::Ignored)
    }

    /// Native form reset: every field returns to its default state.
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            if let Some(value) = &field.default_value {
                field.value = value.clone();
            }
            if let Some(checked) = field.default_checked {
                field.checked = checked;
            }
            for option in &mut field.options {
                option.selected = option.default_selected;
            }
        }
    }
}
