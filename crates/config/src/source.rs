//! Where flag values come from.
//!
//! Values are looked up on the command line first, then in the configuration
//! (files and environment, merged by `figment`), and finally fall back to the
//! flag's default.

use crate::error::{ErrorKind, Result};
use clap::ArgMatches;
use clap::parser::ValueSource;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Toml, Yaml};
use figment::value::Value;
use std::path::{Path, PathBuf};

/// Prefix of environment variables read as configuration.
pub const ENV_PREFIX: &str = "JARCOORD_";
/// Name of the configuration file looked for in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "jarcoord.yaml";

/// The configuration file used when none is given explicitly, if the platform
/// has a config directory.
pub fn default_config_file() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "jarcoord").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// The command line and configuration values flags are resolved from.
///
/// # Examples
///
/// ```
/// use jarcoord_config::{DbFlagGroup, Sources};
///
/// let matches = clap::Command::new("jarcoord")
///     .args(DbFlagGroup::default().args())
///     .try_get_matches_from(["jarcoord", "--skip-db-update"])
///     .unwrap();
/// let sources = Sources::new().with_matches(matches);
/// let (options, _) = DbFlagGroup::default().to_options(&sources).unwrap();
/// assert!(options.skip_db_update);
/// ```
#[derive(Debug, Default)]
pub struct Sources {
    matches: Option<ArgMatches>,
    config: Figment,
}

impl Sources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use parsed command-line arguments. Only values actually given on the
    /// command line count; clap's defaults are ignored in favour of the
    /// configuration.
    pub fn with_matches(mut self, matches: ArgMatches) -> Self {
        self.matches = Some(matches);
        self
    }

    /// Merge a configuration file, picking the format from its extension
    /// (YAML unless it ends in `.toml` or `.json`). A missing file is treated
    /// as empty.
    pub fn with_config_file(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        self.config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => self.config.merge(Toml::file(path)),
            Some("json") => self.config.merge(Json::file(path)),
            _ => self.config.merge(Yaml::file(path)),
        };
        self
    }

    /// Merge environment variables prefixed with [`ENV_PREFIX`]; a double
    /// underscore separates nesting levels (`JARCOORD_DB__SKIP_UPDATE`).
    pub fn with_env(mut self) -> Self {
        self.config = self.config.merge(Env::prefixed(ENV_PREFIX).split("__"));
        self
    }

    /// Merge an arbitrary provider on top of the current configuration.
    pub fn with_figment(mut self, figment: Figment) -> Self {
        self.config = self.config.merge(figment);
        self
    }

    /// Whether `id` was given on the command line.
    pub(crate) fn on_command_line(&self, id: &str) -> Option<&ArgMatches> {
        let matches = self.matches.as_ref()?;
        match matches.value_source(id) {
            Some(ValueSource::CommandLine) => Some(matches),
            _ => None,
        }
    }

    /// Look up a dotted configuration key.
    ///
    /// Environment variables can't contain dashes, so `db.skip_update` is
    /// accepted for `db.skip-update`.
    pub(crate) fn config_value(&self, key: &str) -> Result<Option<Value>> {
        for candidate in [key.to_string(), key.replace('-', "_")] {
            match self.config.find_value(&candidate) {
                Ok(value) => return Ok(Some(value)),
                Err(err) if matches!(err.kind, figment::error::Kind::MissingField(_)) => continue,
                Err(err) => return Err(err).or_raise(|| ErrorKind::Source),
            }
        }
        Ok(None)
    }
}
