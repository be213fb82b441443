use std::{fs::OpenOptions, io::Write, sync::Mutex};

use crate::trace::trace::TraceEvent;

/// Append-only JSONL sink for tracker activity. Never fails the caller:
/// problems are reported on stderr and the record is dropped.
pub struct TraceLogger {
    file: Option<Mutex<std::fs::File>>,
}

impl TraceLogger {
    pub fn new(path: &str) -> Self {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path);

        match file {
            Ok(f) => Self {
                file: Some(Mutex::new(f)),
            },
            Err(e) => {
                eprintln!("dirty-forms: tracing disabled, cannot open {}: {}", path, e);
                Self { file: None }
            }
        }
    }

    pub fn disabled() -> Self {
        Self { file: None }
    }

    /// Logger for an optional path; `None` disables tracing.
    pub fn from_path(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::new(p),
            None => Self::disabled(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    pub fn log(&self, event: &TraceEvent) {
        let Some(sink) = &self.file else {
            return;
        };

        let json = match serde_json::to_string(event) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("dirty-forms: dropping trace record for form {}: {}", event.form, e);
                return;
            }
        };

        let mut file = match sink.lock() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("dirty-forms: trace sink unavailable after a panic: {}", e);
                return;
            }
        };

        if let Err(e) = writeln!(file, "{}", json) {
            eprintln!("dirty-forms: trace write to sink failed for form {}: {}", event.form, e);
        }
    }
}

impl Default for TraceLogger {
    fn default() -> Self {
        Self::disabled()
    }
}

impl std::fmt::Debug for TraceLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceLogger")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{form::form_model::FormId, tracker::tracker::TrackerState};

    #[test]
    fn unopenable_path_disables_tracing() {
        let logger = TraceLogger::new("/nonexistent-dir/trace.jsonl");
        assert!(!logger.is_enabled());
        logger.log(&TraceEvent::now(&FormId::new("f"), "initialize", TrackerState::Clean));

        assert!(!TraceLogger::from_path(None).is_enabled());
    }
}
