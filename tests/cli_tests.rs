use clap::Parser;
use dirty_forms::cli::commands::{format_inspection, load_form, load_scenarios};
use dirty_forms::cli::config::{
    AppConfig, Cli, Commands, build_tracker_options, load_config, resolve_trace_path,
};
use dirty_forms::error::DirtyFormsError;
use dirty_forms::form::form_model::{Field, Form};
use dirty_forms::tracker::options::TrackerOptions;

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_replay_minimal() {
    let cli = Cli::parse_from(["dirty-forms", "replay", "--scenario", "scenarios/"]);
    match cli.command {
        Commands::Replay {
            scenario,
            format,
            output,
            add_remove_fields_marks_dirty,
        } => {
            assert_eq!(scenario, "scenarios/");
            assert_eq!(format, "console");
            assert!(output.is_none());
            assert!(!add_remove_fields_marks_dirty);
        }
        _ => panic!("Expected Replay command"),
    }
    assert_eq!(cli.verbose, 0);
    assert!(cli.trace.is_none());
}

#[test]
fn cli_parse_replay_all_args() {
    let cli = Cli::parse_from([
        "dirty-forms",
        "-vv",
        "--trace",
        "trace.jsonl",
        "--config",
        "custom.yaml",
        "replay",
        "--scenario",
        "one.yaml",
        "--format",
        "json",
        "-o",
        "out.json",
        "--add-remove-fields-marks-dirty",
    ]);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.trace.as_deref(), Some("trace.jsonl"));
    assert_eq!(cli.config.as_deref(), Some("custom.yaml"));
    match cli.command {
        Commands::Replay {
            format,
            output,
            add_remove_fields_marks_dirty,
            ..
        } => {
            assert_eq!(format, "json");
            assert_eq!(output.as_deref(), Some("out.json"));
            assert!(add_remove_fields_marks_dirty);
        }
        _ => panic!("Expected Replay command"),
    }
}

#[test]
fn cli_parse_inspect() {
    let cli = Cli::parse_from(["dirty-forms", "inspect", "--form", "form.json"]);
    assert!(matches!(cli.command, Commands::Inspect { ref form } if form == "form.json"));
}

#[test]
fn cli_requires_subcommand() {
    assert!(Cli::try_parse_from(["dirty-forms"]).is_err());
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn missing_config_file_gives_defaults() {
    let config = load_config(Some("/nonexistent/dirty-forms.yaml"));
    assert_eq!(config.tracker, TrackerOptions::default());
    assert!(config.trace.path.is_none());
}

#[test]
fn default_options_match_plugin_defaults() {
    let options = TrackerOptions::default();
    assert_eq!(options.message, "You have unsaved changes!");
    assert_eq!(options.dirty_class, "dirty");
    assert!(!options.silent);
    assert!(!options.add_remove_fields_marks_dirty);
    assert_eq!(options.field_events, vec!["change", "keyup", "propertychange", "input"]);
}

#[test]
fn partial_yaml_config_keeps_other_defaults() {
    let yaml = r#"
tracker:
  dirty_class: unsaved
  field_events: [change]
trace:
  path: /tmp/trace.jsonl
"#;
    let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.tracker.dirty_class, "unsaved");
    assert_eq!(config.tracker.field_events, vec!["change"]);
    assert_eq!(config.tracker.message, "You have unsaved changes!");
    assert_eq!(config.tracker.field_selector.tags.len(), 4);
    assert_eq!(config.trace.path.as_deref(), Some("/tmp/trace.jsonl"));
}

#[test]
fn cli_flags_override_config() {
    let mut config = AppConfig::default();
    config.trace.path = Some("from-config.jsonl".into());

    let options = build_tracker_options(&config, true);
    assert!(options.add_remove_fields_marks_dirty);
    assert!(!build_tracker_options(&config, false).add_remove_fields_marks_dirty);

    assert_eq!(resolve_trace_path(Some("cli.jsonl"), &config), Some("cli.jsonl"));
    assert_eq!(resolve_trace_path(None, &config), Some("from-config.jsonl"));
}

// ============================================================================
// File loading & inspect
// ============================================================================

#[test]
fn load_scenarios_reports_missing_path() {
    match load_scenarios("/nonexistent/scenarios") {
        Err(DirtyFormsError::Io { path, .. }) => assert_eq!(path, "/nonexistent/scenarios"),
        other => panic!("Expected Io error, got {:?}", other.map(|s| s.len())),
    }
}

#[test]
fn load_form_parses_extraction_json() {
    let path = std::env::temp_dir().join(format!("dirty-forms-form-{}.json", std::process::id()));
    let json = r#"{
        "id": "signup",
        "fields": [
            { "key": "email", "name": "email", "type": "email", "value": "a@b.c" },
            { "key": "tos", "name": "tos", "type": "checkbox", "checked": true, "defaultChecked": true },
            { "key": "go", "type": "submit", "value": "Sign up" }
        ]
    }"#;
    std::fs::write(&path, json).unwrap();

    let form = load_form(&path.display().to_string()).expect("form loads");
    assert_eq!(form.fields.len(), 3);
    assert!(form.fields[1].checked);
    assert_eq!(form.fields[1].default_checked, Some(true));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn inspection_lists_kinds_and_values() {
    let form = Form::new(
        "f",
        vec![
            Field::text("email", "email", "a@b.c"),
            Field::checkbox("tos", "tos", true),
            Field::select("plan", "plan", &["x", "y"], &["y"]),
            Field::text("anon", "anon", "").without_name(),
        ],
    );

    let out = format_inspection(&form, &TrackerOptions::default());
    assert!(out.starts_with("Form 'f'\n"));
    assert!(out.contains("email") && out.contains("\"a@b.c\""));
    assert!(out.contains("Toggle") && out.contains("true"));
    assert!(out.contains("Select") && out.contains("\"y\""));
    assert!(out.contains("untracked"));
    assert!(out.ends_with("3 trackable fields\n"));
}
