use std::rc::Rc;

use crate::error::DirtyFormsError;
use crate::form::form_model::Form;
use crate::report::console::format_console_report;
use crate::report::report_model::ReplayReport;
use crate::scenario::runner::ScenarioRunner;
use crate::scenario::scenario_model::Scenario;
use crate::state::normalize::normalize;
use crate::trace::logger::TraceLogger;
use crate::tracker::options::TrackerOptions;

// ============================================================================
// replay subcommand
// ============================================================================

/// Replay scenarios and return whether all passed.
pub fn cmd_replay(
    scenario_path: &str,
    format: &str,
    output: Option<&str>,
    options: &TrackerOptions,
    tracer: TraceLogger,
    verbose: u8,
) -> Result<bool, Box<dyn std::error::Error>> {
    let scenarios = load_scenarios(scenario_path)?;

    if scenarios.is_empty() {
        eprintln!("No scenarios found at: {}", scenario_path);
        return Ok(true);
    }

    if verbose > 0 {
        eprintln!("Replaying {} scenarios...", scenarios.len());
    }

    let tracer = Rc::new(tracer);
    let start = std::time::Instant::now();

    let mut results = Vec::new();
    for scenario in &scenarios {
        if verbose > 0 {
            eprintln!("  Replaying: {}", scenario.name);
        }
        results.push(ScenarioRunner::run(scenario, options, Rc::clone(&tracer)));
    }

    let duration = start.elapsed().as_millis();
    let report = ReplayReport::from_results(scenario_path, results).with_duration(duration);
    let all_passed = report.all_passed();

    let output_content = match format {
        "json" => serde_json::to_string_pretty(&report)? + "\n",
        _ => format_console_report(&report),
    };

    match output {
        Some(path) => std::fs::write(path, &output_content)?,
        None => print!("{}", output_content),
    }

    Ok(all_passed)
}

/// Load scenarios from a single YAML file or a directory of YAML files.
pub fn load_scenarios(path: &str) -> Result<Vec<Scenario>, DirtyFormsError> {
    let metadata = std::fs::metadata(path).map_err(|source| io_error(path, source))?;
    if metadata.is_dir() {
        let mut scenarios = Vec::new();
        let entries = std::fs::read_dir(path).map_err(|source| io_error(path, source))?;
        for entry in entries {
            let p = entry.map_err(|source| io_error(path, source))?.path();
            if p.extension().is_some_and(|e| e == "yaml" || e == "yml") {
                scenarios.push(parse_scenario_file(&p.display().to_string())?);
            }
        }
        // Sort by name for deterministic order
        scenarios.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(scenarios)
    } else {
        Ok(vec![parse_scenario_file(path)?])
    }
}

fn parse_scenario_file(path: &str) -> Result<Scenario, DirtyFormsError> {
    let content = std::fs::read_to_string(path).map_err(|source| io_error(path, source))?;
    serde_yaml::from_str(&content).map_err(|source| DirtyFormsError::YamlParse {
        context: path.to_string(),
        source,
    })
}

// ============================================================================
// inspect subcommand
// ============================================================================

pub fn cmd_inspect(form_path: &str, options: &TrackerOptions) -> Result<(), Box<dyn std::error::Error>> {
    let form = load_form(form_path)?;
    print!("{}", format_inspection(&form, options));
    Ok(())
}

pub fn load_form(path: &str) -> Result<Form, DirtyFormsError> {
    let content = std::fs::read_to_string(path).map_err(|source| io_error(path, source))?;
    let form: Form = serde_json::from_str(&content).map_err(|source| DirtyFormsError::JsonParse {
        context: path.to_string(),
        source,
    })?;
    if !form.is_form() {
        return Err(DirtyFormsError::NotAForm(form.id.to_string()));
    }
    Ok(form)
}

/// One line per selected field: key, kind, and canonical value (or
/// "untracked").
pub fn format_inspection(form: &Form, options: &TrackerOptions) -> String {
    let mut out = format!("Form '{}'\n", form.id);
    let mut trackable = 0;

    for field in form.selected_fields(&options.field_selector) {
        let value = match normalize(field) {
            Some(v) => {
                trackable += 1;
                v.to_string()
            }
            None => "untracked".to_string(),
        };
        let kind = format!("{:?}", field.kind());
        out.push_str(&format!("  {:<20} {:<10} {}\n", field.key.0, kind, value));
    }

    out.push_str(&format!("{} trackable fields\n", trackable));
    out
}

// ============================================================================
// Helpers
// ============================================================================

fn io_error(path: &str, source: std::io::Error) -> DirtyFormsError {
    DirtyFormsError::Io {
        path: path.to_string(),
        source,
    }
}

