use clap::Parser;
use dirty_forms::cli::commands::{cmd_inspect, cmd_replay};
use dirty_forms::cli::config::{Cli, Commands, build_tracker_options, load_config, resolve_trace_path};
use dirty_forms::trace::logger::TraceLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    // Trace path: CLI > config > disabled
    let tracer = TraceLogger::from_path(resolve_trace_path(cli.trace.as_deref(), &config));

    match cli.command {
        Commands::Replay {
            scenario,
            format,
            output,
            add_remove_fields_marks_dirty,
        } => {
            let options = build_tracker_options(&config, add_remove_fields_marks_dirty);
            let all_passed = cmd_replay(
                &scenario,
                &format,
                output.as_deref(),
                &options,
                tracer,
                cli.verbose,
            )?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::Inspect { form } => {
            let options = build_tracker_options(&config, false);
            cmd_inspect(&form, &options)?;
        }
    }

    Ok(())
}
