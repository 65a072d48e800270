//! Configuration module for `GradeLens`

use crate::core::percentage::PercentagePolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the config directory in path values
const DIR_VARIABLE: &str = "$GRADE_LENS";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for exported course files
    #[serde(default)]
    pub out_dir: String,
    /// JSON file holding peer submissions
    #[serde(default)]
    pub submissions_file: String,
}

/// Percentage display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PercentageConfig {
    /// Round displayed percentages to whole numbers
    #[serde(default)]
    pub round: bool,
    /// Lowest displayed percentage; negative disables the floor
    #[serde(default = "no_floor")]
    pub floor: f64,
}

const fn no_floor() -> f64 {
    -1.0
}

impl Default for PercentageConfig {
    fn default() -> Self {
        Self {
            round: false,
            floor: no_floor(),
        }
    }
}

impl PercentageConfig {
    /// Conversion policy described by this section
    #[must_use]
    pub fn policy(&self) -> PercentagePolicy {
        let base = if self.round {
            PercentagePolicy::ROUNDED
        } else {
            PercentagePolicy::EXACT
        };
        if self.floor >= 0.0 {
            base.with_floor(self.floor)
        } else {
            base
        }
    }
}

/// Program configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramConfig {
    /// Program used for submissions when none is given or found on the transcript
    #[serde(default)]
    pub default: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Percentage settings
    #[serde(default)]
    pub percentage: PercentageConfig,
    /// Program settings
    #[serde(default)]
    pub program: ProgramConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override export directory
    pub out_dir: Option<String>,
    /// Override submissions file
    pub submissions_file: Option<String>,
}

impl Config {
    /// Get the `$GRADE_LENS` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/gradelens`
    /// - macOS: `~/Library/Application Support/gradelens`
    /// - Windows: `%APPDATA%\gradelens`
    #[must_use]
    pub fn get_gradelens_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gradelens")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Only string fields that are empty here and non-empty in `defaults` are
    /// filled, so upgrades pick up new settings without touching user values.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;
        let mut fill = |target: &mut String, default: &String| {
            if target.is_empty() && !default.is_empty() {
                target.clone_from(default);
                changed = true;
            }
        };

        fill(&mut self.logging.level, &defaults.logging.level);
        fill(&mut self.logging.file, &defaults.logging.file);
        fill(&mut self.paths.out_dir, &defaults.paths.out_dir);
        fill(
            &mut self.paths.submissions_file,
            &defaults.paths.submissions_file,
        );
        fill(&mut self.program.default, &defaults.program.default);

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Overrides last for this run only; the config file is not modified.
    /// Only non-`None` values replace config values.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }
        if let Some(out_dir) = &overrides.out_dir {
            self.paths.out_dir.clone_from(out_dir);
        }
        if let Some(submissions_file) = &overrides.submissions_file {
            self.paths.submissions_file.clone_from(submissions_file);
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds, inside
    /// [`get_gradelens_dir`](Self::get_gradelens_dir).
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_gradelens_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$GRADE_LENS` in a string to the config directory
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_gradelens_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Missing fields use their serde defaults; `$GRADE_LENS` is expanded in
    /// path values.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let config = Config::from_toml(r#"
    /// [logging]
    /// level = "info"
    /// file = "$GRADE_LENS/gradelens.log"
    /// "#)?;
    /// ```
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.out_dir = Self::expand_variables(&config.paths.out_dir);
        config.paths.submissions_file = Self::expand_variables(&config.paths.submissions_file);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML. The
    /// defaults are compiled into the binary and covered by tests.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// - If the config file exists: load it, merge missing fields from defaults,
    ///   save if anything changed
    /// - Otherwise (first run): create the directory, save the defaults, return them
    ///
    /// Falls back to defaults if the existing file cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to file
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file cannot be written
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys: `level`, `file`, `verbose`, `out_dir`,
    /// `submissions_file`, `round`, `floor`, `program`. Dashes are accepted
    /// in place of underscores.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "out_dir" | "out-dir" => Some(self.paths.out_dir.clone()),
            "submissions_file" | "submissions-file" => Some(self.paths.submissions_file.clone()),
            "round" => Some(self.percentage.round.to_string()),
            "floor" => Some(self.percentage.floor.to_string()),
            "program" => Some(self.program.default.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Updates the in-memory config; call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or the value does not
    /// parse (booleans for `verbose`/`round`, numbers for `floor`, a known
    /// level for `level`).
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => {
                let level: crate::logger::Level = value.parse()?;
                self.logging.level = level.to_string();
            }
            "file" => self.logging.file = value.to_string(),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "out_dir" | "out-dir" => self.paths.out_dir = value.to_string(),
            "submissions_file" | "submissions-file" => {
                self.paths.submissions_file = value.to_string();
            }
            "round" => {
                self.percentage.round = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'round': '{value}'"))?;
            }
            "floor" => {
                self.percentage.floor = value
                    .parse::<f64>()
                    .map_err(|_| format!("Invalid number for 'floor': '{value}'"))?;
            }
            "program" => self.program.default = value.to_string(),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "out_dir" | "out-dir" => self.paths.out_dir.clone_from(&defaults.paths.out_dir),
            "submissions_file" | "submissions-file" => self
                .paths
                .submissions_file
                .clone_from(&defaults.paths.submissions_file),
            "round" => self.percentage.round = defaults.percentage.round,
            "floor" => self.percentage.floor = defaults.percentage.floor,
            "program" => self.program.default.clone_from(&defaults.program.default),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file so the next [`load()`](Config::load)
    /// recreates it. Succeeds if the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted.
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  out_dir = \"{}\"", self.paths.out_dir)?;
        writeln!(f, "  submissions_file = \"{}\"", self.paths.submissions_file)?;

        writeln!(f, "\n[percentage]")?;
        writeln!(f, "  round = {}", self.percentage.round)?;
        writeln!(f, "  floor = {}", self.percentage.floor)?;

        writeln!(f, "\n[program]")?;
        writeln!(f, "  default = \"{}\"", self.program.default)?;

        Ok(())
    }
}
