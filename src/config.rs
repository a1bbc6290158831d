use std::env;
use std::str::FromStr;
use thiserror::Error;
use crate::level::Level;

/// Environment variable read by [`LogConfig::from_env`].
pub const CONFIG_ENV_VAR: &str = "LETTER_LOG";

/// Errors produced while parsing a [`LogConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("empty log configuration")]
    Empty,
    #[error("unknown log level or preset `{0}`")]
    UnknownLevel(String),
}

/// Per-level switches for a [`Logger`](crate::Logger).
///
/// Every level has its own gate. Three presets cover the usual cases:
///
/// * [`LogConfig::all_enabled`] - everything on (the default)
/// * [`LogConfig::warnings_and_errors_only`]
/// * [`LogConfig::silent`] - everything off
///
/// A config can also be parsed from a string, either a preset name (`all`,
/// `warnings`, `silent`) or a comma-separated list of levels to enable:
///
/// ```
/// # use letter_log::{Level, LogConfig};
/// let config: LogConfig = "info, error".parse().unwrap();
/// assert!(config.is_enabled(Level::Info));
/// assert!(!config.is_enabled(Level::Warning));
///
/// let preset: LogConfig = "warnings".parse().unwrap();
/// assert_eq!(preset, LogConfig::warnings_and_errors_only());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    pub verbose: bool,
    pub debug: bool,
    pub info: bool,
    pub warning: bool,
    pub error: bool,
}

impl LogConfig {
    pub const fn all_enabled() -> Self {
        Self {
            verbose: true,
            debug: true,
            info: true,
            warning: true,
            error: true,
        }
    }

    pub const fn warnings_and_errors_only() -> Self {
        Self {
            verbose: false,
            debug: false,
            info: false,
            warning: true,
            error: true,
        }
    }

    pub const fn silent() -> Self {
        Self {
            verbose: false,
            debug: false,
            info: false,
            warning: false,
            error: false,
        }
    }

    /// Enables `filter`'s level and every more severe one.
    pub fn from_level_filter(filter: log::LevelFilter) -> Self {
        let mut config = Self::silent();
        for level in Level::ALL {
            config.set_enabled(level, log::Level::from(level) <= filter);
        }
        config
    }

    /// Reads the config from the `LETTER_LOG` environment variable.
    ///
    /// An unset or non-unicode variable yields the default config.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var(CONFIG_ENV_VAR) {
            Ok(value) => value.parse(),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        match level {
            Level::Verbose => self.verbose,
            Level::Debug => self.debug,
            Level::Info => self.info,
            Level::Warning => self.warning,
            Level::Error => self.error,
        }
    }

    pub fn set_enabled(&mut self, level: Level, enabled: bool) {
        let gate = match level {
            Level::Verbose => &mut self.verbose,
            Level::Debug => &mut self.debug,
            Level::Info => &mut self.info,
            Level::Warning => &mut self.warning,
            Level::Error => &mut self.error,
        };
        *gate = enabled;
    }

    /// The most verbose level that is enabled, as a `log` filter.
    pub fn max_level_filter(&self) -> log::LevelFilter {
        Level::ALL
            .iter()
            .find(|level| self.is_enabled(**level))
            .map(|level| log::Level::from(*level).to_level_filter())
            .unwrap_or(log::LevelFilter::Off)
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::all_enabled()
    }
}

impl FromStr for LogConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ConfigError::Empty);
        }

        match s.to_ascii_lowercase().as_str() {
            "all" => return Ok(Self::all_enabled()),
            "warnings" => return Ok(Self::warnings_and_errors_only()),
            "silent" | "off" | "none" => return Ok(Self::silent()),
            _ => {}
        }

        let mut config = Self::silent();
        for name in s.split(',').map(str::trim).filter(|name| !name.is_empty()) {
            let level = Level::from_name(name)
                .ok_or_else(|| ConfigError::UnknownLevel(name.to_string()))?;
            config.set_enabled(level, true);
        }
        Ok(config)
    }
}
