use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::tracker::options::TrackerOptions;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "dirty-forms",
    version,
    about = "Unsaved-change detection for web forms"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Append tracker activity as JSON lines to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,

    /// Path to config file (default: dirty-forms.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay scenario YAML files against the tracker
    Replay {
        /// Scenario YAML file or directory of YAML files
        #[arg(long)]
        scenario: String,

        /// Output format: console, json
        #[arg(long, default_value = "console")]
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Count adding/removing fields as a change
        #[arg(long)]
        add_remove_fields_marks_dirty: bool,
    },

    /// Print the kind and canonical value of every field in a form JSON file
    Inspect {
        /// Form JSON file
        #[arg(long)]
        form: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `dirty-forms.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub tracker: TrackerOptions,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TraceConfig {
    pub path: Option<String>,
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("dirty-forms.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Tracker options from the config file, with CLI flags layered on top.
pub fn build_tracker_options(config: &AppConfig, add_remove_fields_marks_dirty: bool) -> TrackerOptions {
    let mut options = config.tracker.clone();
    if add_remove_fields_marks_dirty {
        options.add_remove_fields_marks_dirty = true;
    }
    options
}

/// Trace path: CLI flag wins over the config file.
pub fn resolve_trace_path<'a>(cli: Option<&'a str>, config: &'a AppConfig) -> Option<&'a str> {
    cli.or(config.trace.path.as_deref())
}
