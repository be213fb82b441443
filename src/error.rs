use std::fmt;

/// Failures of the outer surfaces (file loading, scenario replay). Tracking
/// itself never fails.
#[derive(Debug)]
pub enum DirtyFormsError {
    /// Reading a scenario, form or config file failed
    Io { path: String, source: std::io::Error },

    YamlParse { context: String, source: serde_yaml::Error },

    JsonParse { context: String, source: serde_json::Error },

    /// Scenario step names a form that is not being tracked
    UnknownForm(String),

    /// Scenario step names a field the form does not contain
    UnknownField { field: String, form: String },

    /// Element handed to `track` is not a `<form>`
    NotAForm(String),
}

impl fmt::Display for DirtyFormsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirtyFormsError::Io { path, source } => {
                write!(f, "Failed to read '{}': {}", path, source)
            }
            DirtyFormsError::YamlParse { context, source } => {
                write!(f, "YAML parse error ({}): {}", context, source)
            }
            DirtyFormsError::JsonParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            DirtyFormsError::UnknownForm(form) => {
                write!(f, "Form '{}' is not tracked", form)
            }
            DirtyFormsError::UnknownField { field, form } => {
                write!(f, "Field '{}' not found in form '{}'", field, form)
            }
            DirtyFormsError::NotAForm(id) => {
                write!(f, "Element '{}' is not a form", id)
            }
        }
    }
}

impl std::error::Error for DirtyFormsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DirtyFormsError::Io { source, .. } => Some(source),
            DirtyFormsError::YamlParse { source, .. } => Some(source),
            DirtyFormsError::JsonParse { source, .. } => Some(source),
            _ => None,
        }
    }
}
