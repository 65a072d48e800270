//! CLI argument definitions for `GradeLens`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use grade_lens::config::ConfigOverrides;
use grade_lens::core::peers::ComparisonMode;
use grade_lens::logger::Level;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Level::from(*self))
    }
}

/// Scale used when placing a GPA among peers
#[derive(Copy, Clone, Debug, Default, ValueEnum, PartialEq, Eq)]
pub enum ModeArg {
    /// Grade points on the 4.0 scale
    #[default]
    Gpa,
    /// Estimated percentage
    Percentage,
}

impl From<ModeArg> for ComparisonMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Gpa => Self::Gpa,
            ModeArg::Percentage => Self::Percentage,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `out_dir`, `round`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum PeersSubcommand {
    /// Average GPA per term for a program.
    Faculty {
        /// Program name as submitted
        #[arg(long, value_name = "PROGRAM")]
        program: String,
    },
    /// Average grade for one or more courses.
    Courses {
        /// Course codes, e.g. "CS 246" (quote codes containing spaces)
        #[arg(value_name = "CODES", num_args = 1.., required = true)]
        codes: Vec<String>,
    },
    /// GPA spread (average, min, max) for a program.
    Stats {
        /// Program name as submitted
        #[arg(long, value_name = "PROGRAM")]
        program: String,
        /// Restrict to one term ("Overall" for all terms)
        #[arg(long, value_name = "TERM")]
        term: Option<String>,
        /// Place this GPA within the submitted range
        #[arg(long, value_name = "GPA")]
        gpa: Option<f64>,
        /// Scale for the placement
        #[arg(long, value_enum, default_value_t = ModeArg::Gpa)]
        mode: ModeArg,
    },
    /// Number of stored submissions.
    Count,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Extract course records from transcript text.
    ///
    /// FILE is the text of an unofficial transcript, one visual line per line.
    Parse {
        /// Path to the transcript text file
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        /// Print records as JSON
        #[arg(long)]
        json: bool,

        /// Write the records to `<stem>_courses.csv` in the configured out_dir
        #[arg(long)]
        export: bool,

        /// Export path (implies --export; `.json` extension writes JSON)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Compute overall and per-term GPA from transcript text.
    Gpa {
        /// Path to the transcript text file
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        /// Restrict the overall figure to one term (e.g., "Fall 2022")
        #[arg(short, long, value_name = "TERM")]
        term: Option<String>,

        /// Compare each term against this program's peer submissions
        #[arg(long, value_name = "PROGRAM")]
        program: Option<String>,

        /// Scale for the peer comparison
        #[arg(long, value_enum, default_value_t = ModeArg::Gpa)]
        mode: ModeArg,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Forecast next-term GPA.
    ///
    /// Uses the GPAs given on the command line, or the term GPAs of a transcript.
    Predict {
        /// GPA history, oldest first
        #[arg(value_name = "GPA", conflicts_with = "from")]
        gpas: Vec<f64>,

        /// Read the history from a transcript text file
        #[arg(long, value_name = "FILE")]
        from: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Submit per-term GPAs from a transcript to the peer store.
    Submit {
        /// Path to the transcript text file
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        /// Program to submit under (defaults to config, then the transcript)
        #[arg(long, value_name = "PROGRAM")]
        program: Option<String>,

        /// Submit even if the program does not match the transcript
        #[arg(short, long)]
        yes: bool,
    },
    /// Compare against anonymized peer submissions.
    Peers {
        #[command(subcommand)]
        subcommand: PeersSubcommand,

        /// Print results as JSON
        #[arg(long, global = true)]
        json: bool,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "gradelens",
    about = "GradeLens command-line interface",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config export directory
    #[arg(long = "config-out-dir", value_name = "DIR")]
    pub config_out_dir: Option<PathBuf>,

    /// Override config export directory (short form)
    #[arg(long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Override config submissions file
    #[arg(long = "submissions", value_name = "PATH")]
    pub submissions: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Short-form flags (e.g., `--out-dir`) take precedence over long-form
    /// flags (e.g., `--config-out-dir`) when both are provided.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        let path_string = |p: &PathBuf| p.to_string_lossy().to_string();
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self.config_log_file.as_ref().map(path_string),
            verbose: self.config_verbose,
            out_dir: self
                .out_dir
                .as_ref()
                .or(self.config_out_dir.as_ref())
                .map(path_string),
            submissions_file: self.submissions.as_ref().map(path_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(command: Command) -> Cli {
        Cli {
            log_level: None,
            verbose: false,
            debug_flag: false,
            log_file: None,
            config_level: None,
            config_log_file: None,
            config_verbose: None,
            config_out_dir: None,
            out_dir: None,
            submissions: None,
            command,
        }
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevelArg::Error.to_string(), "error");
        assert_eq!(LogLevelArg::Warn.to_string(), "warn");
        assert_eq!(LogLevelArg::Info.to_string(), "info");
        assert_eq!(LogLevelArg::Debug.to_string(), "debug");
    }

    #[test]
    fn test_log_level_to_logger_level() {
        assert_eq!(Level::from(LogLevelArg::Error), Level::Error);
        assert_eq!(Level::from(LogLevelArg::Debug), Level::Debug);
    }

    #[test]
    fn test_to_config_overrides_empty() {
        let overrides = bare(Command::Config { subcommand: None }).to_config_overrides();
        assert!(overrides.level.is_none());
        assert!(overrides.file.is_none());
        assert!(overrides.verbose.is_none());
        assert!(overrides.out_dir.is_none());
        assert!(overrides.submissions_file.is_none());
    }

    #[test]
    fn test_to_config_overrides_with_values() {
        let mut cli = bare(Command::Config { subcommand: None });
        cli.config_level = Some(LogLevelArg::Debug);
        cli.config_log_file = Some(PathBuf::from("/tmp/test.log"));
        cli.config_verbose = Some(true);
        cli.submissions = Some(PathBuf::from("/tmp/subs.json"));
        cli.out_dir = Some(PathBuf::from("/output"));

        let overrides = cli.to_config_overrides();
        assert_eq!(overrides.level, Some("debug".to_string()));
        assert_eq!(overrides.file, Some("/tmp/test.log".to_string()));
        assert_eq!(overrides.verbose, Some(true));
        assert_eq!(overrides.out_dir, Some("/output".to_string()));
        assert_eq!(overrides.submissions_file, Some("/tmp/subs.json".to_string()));
    }

    #[test]
    fn test_short_form_precedence_over_long_form() {
        let mut cli = bare(Command::Config { subcommand: None });
        cli.config_out_dir = Some(PathBuf::from("/long/out"));
        cli.out_dir = Some(PathBuf::from("/short/out"));
        assert_eq!(cli.to_config_overrides().out_dir, Some("/short/out".to_string()));

        cli.out_dir = None;
        assert_eq!(cli.to_config_overrides().out_dir, Some("/long/out".to_string()));
    }

    #[test]
    fn test_parse_predict_args() {
        let cli = Cli::parse_from(["gradelens", "predict", "3.1", "3.4", "--json"]);
        match cli.command {
            Command::Predict { gpas, from, json } => {
                assert_eq!(gpas, vec![3.1, 3.4]);
                assert!(from.is_none());
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_peers_args() {
        let cli = Cli::parse_from([
            "gradelens",
            "--submissions",
            "subs.json",
            "peers",
            "stats",
            "--program",
            "Computer Science",
            "--term",
            "Fall 2022",
        ]);
        assert_eq!(cli.submissions, Some(PathBuf::from("subs.json")));
        assert!(matches!(
            cli.command,
            Command::Peers {
                subcommand: PeersSubcommand::Stats { .. },
                json: false
            }
        ));
    }

    #[test]
    fn test_parse_peer_placement_args() {
        let cli = Cli::parse_from([
            "gradelens",
            "peers",
            "stats",
            "--program",
            "Computer Science",
            "--gpa",
            "3.4",
            "--mode",
            "percentage",
        ]);
        match cli.command {
            Command::Peers {
                subcommand: PeersSubcommand::Stats { gpa, mode, .. },
                ..
            } => {
                assert_eq!(gpa, Some(3.4));
                assert_eq!(ComparisonMode::from(mode), ComparisonMode::Percentage);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::parse_from(["gradelens", "gpa", "t.txt", "--program", "Mathematics"]);
        match cli.command {
            Command::Gpa { program, mode, .. } => {
                assert_eq!(program.as_deref(), Some("Mathematics"));
                assert_eq!(mode, ModeArg::Gpa);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
