//! Command-line interface entry point for `GradeLens`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use grade_lens::config::Config;
use grade_lens::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};
use grade_lens::{error, info};

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config; an unparseable config level falls back to warn
    let mut level = args
        .log_level
        .map(Level::from)
        .or_else(|| config.logging.level.parse().ok())
        .unwrap_or(Level::Warn);

    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // File logging: CLI flag wins, otherwise config logging.file if set
    let config_log_path = (!config.logging.file.is_empty())
        .then(|| std::path::PathBuf::from(&config.logging.file));

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    let result = match args.command {
        Command::Config { subcommand } => commands::config::run(subcommand, &mut config, &defaults),
        Command::Parse {
            input_file,
            json,
            export,
            output,
        } => commands::parse::run(&input_file, json, export, output.as_deref(), &config),
        Command::Gpa {
            input_file,
            term,
            program,
            mode,
            json,
        } => commands::gpa::run(
            &input_file,
            term.as_deref(),
            program.as_deref(),
            mode.into(),
            json,
            &config,
        ),
        Command::Predict { gpas, from, json } => {
            commands::predict::run(&gpas, from.as_deref(), json)
        }
        Command::Submit {
            input_file,
            program,
            yes,
        } => commands::submit::run(&input_file, program.as_deref(), yes, &config),
        Command::Peers { subcommand, json } => commands::peers::run(subcommand, json, &config),
    };

    if let Err(message) = result {
        error!("{message}");
        eprintln!("✗ {message}");
        std::process::exit(1);
    }
}
