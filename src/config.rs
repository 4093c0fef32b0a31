//! Run settings, layered from defaults, a TOML file, the environment, and
//! command-line overrides (later layers win).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::authority::DEFAULT_RETRY_LIMIT;

/// Settings file read from the working directory when none is given.
pub const DEFAULT_CONFIG_NAME: &str = "bibmarc";

/// Prefix of environment variables, e.g. `BIBMARC_OUTPUT`.
pub const ENV_PREFIX: &str = "BIBMARC";

/// Everything a conversion run needs.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// CSV export of the translations spreadsheet
    pub input: PathBuf,
    /// ISO 2709 file to write
    pub output: PathBuf,
    /// Authority CSV with `nkc_id` and `cz_dates`
    pub authority: PathBuf,
    /// Prior ISO 2709 catalog with original-work identifiers
    pub reference: PathBuf,
    /// Attempts to find an unused identifier before giving up
    pub identifier_retry_limit: usize,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Seed for identifier minting; random when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Values given on the command line. `None` leaves lower layers in effect.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Explicit settings file; must exist when given
    pub config_file: Option<PathBuf>,
    /// See [`Settings::input`]
    pub input: Option<PathBuf>,
    /// See [`Settings::output`]
    pub output: Option<PathBuf>,
    /// See [`Settings::authority`]
    pub authority: Option<PathBuf>,
    /// See [`Settings::reference`]
    pub reference: Option<PathBuf>,
    /// See [`Settings::seed`]
    pub seed: Option<u64>,
    /// See [`Settings::log_level`]
    pub log_level: Option<String>,
}

impl Settings {
    /// Load settings: defaults, then `bibmarc.toml` (or the explicit file),
    /// then `BIBMARC_*` variables, then `overrides`.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing or unreadable, a value
    /// has the wrong type, or a path setting is given nowhere.
    pub fn load(overrides: &Overrides) -> Result<Self, ConfigError> {
        let file = match &overrides.config_file {
            Some(path) => File::from(path.as_path()).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };
        let retry_limit = i64::try_from(DEFAULT_RETRY_LIMIT).unwrap_or(i64::MAX);

        Config::builder()
            .set_default("identifier_retry_limit", retry_limit)?
            .set_default("log_level", "info")?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .set_override_option("input", path_value(overrides.input.as_deref()))?
            .set_override_option("output", path_value(overrides.output.as_deref()))?
            .set_override_option("authority", path_value(overrides.authority.as_deref()))?
            .set_override_option("reference", path_value(overrides.reference.as_deref()))?
            .set_override_option("seed", overrides.seed.map(|seed| seed.to_string()))?
            .set_override_option("log_level", overrides.log_level.clone())?
            .build()?
            .try_deserialize()
    }
}

fn path_value(path: Option<&Path>) -> Option<String> {
    path.map(|path| path.to_string_lossy().into_owned())
}
