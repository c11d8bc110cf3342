//! Checker configuration.
//!
//! Options can be built in code or read from the environment:
//!
//! | variable                   | effect                                   |
//! |----------------------------|------------------------------------------|
//! | `TERN_LOG`                 | log level (`error` .. `trace`)           |
//! | `TERN_DEFAULT_INT_WIDTH`   | width of unsuffixed integer literals     |
//! | `TERN_WARN_USELESS`        | `0`/`false` silences useless-case warnings |
//! | `TERN_WARN_NON_EXHAUSTIVE` | `0`/`false` silences non-exhaustive warnings |

use std::fmt;
use tern_log::Level;

/// Largest supported integer width.
pub const MAX_INT_WIDTH: u32 = 128;

/// Options for one checking session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerOptions {
    /// Warn about match cases covered by earlier cases
    pub warn_useless: bool,
    /// Warn about matches that miss values
    pub warn_non_exhaustive: bool,
    /// Width of integer literals without a suffix
    pub default_int_width: u32,
    /// Level applied to the global logger when a session starts
    pub log_level: Option<Level>,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self {
            warn_useless: true,
            warn_non_exhaustive: true,
            default_int_width: 32,
            log_level: None,
        }
    }
}

/// A malformed environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// Variable name
    pub var: &'static str,
    /// Offending value
    pub value: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value for {}: {:?}", self.var, self.value)
    }
}

impl std::error::Error for ConfigError {}

impl CheckerOptions {
    /// Default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets [`CheckerOptions::warn_useless`].
    #[must_use]
    pub fn warn_useless(mut self, on: bool) -> Self {
        self.warn_useless = on;
        self
    }

    /// Sets [`CheckerOptions::warn_non_exhaustive`].
    #[must_use]
    pub fn warn_non_exhaustive(mut self, on: bool) -> Self {
        self.warn_non_exhaustive = on;
        self
    }

    /// Sets [`CheckerOptions::default_int_width`].
    #[must_use]
    pub fn default_int_width(mut self, width: u32) -> Self {
        self.default_int_width = width;
        self
    }

    /// Sets [`CheckerOptions::log_level`].
    #[must_use]
    pub fn log_level(mut self, level: Level) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Reads options from the process environment.
    ///
    /// # Errors
    ///
    /// Returns the first variable whose value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads options through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// Returns the first variable whose value cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut options = Self::default();

        if let Some(value) = lookup(tern_log::ENV_VAR) {
            let level = value.parse::<Level>().map_err(|_| ConfigError {
                var: tern_log::ENV_VAR,
                value: value.clone(),
            })?;
            options.log_level = Some(level);
        }

        const WIDTH: &str = "TERN_DEFAULT_INT_WIDTH";
        if let Some(value) = lookup(WIDTH) {
            match value.trim().parse::<u32>() {
                Ok(width) if (1..=MAX_INT_WIDTH).contains(&width) => {
                    options.default_int_width = width;
                }
                _ => return Err(ConfigError { var: WIDTH, value }),
            }
        }

        const USELESS: &str = "TERN_WARN_USELESS";
        if let Some(value) = lookup(USELESS) {
            options.warn_useless = parse_flag(USELESS, value)?;
        }

        const NON_EXHAUSTIVE: &str = "TERN_WARN_NON_EXHAUSTIVE";
        if let Some(value) = lookup(NON_EXHAUSTIVE) {
            options.warn_non_exhaustive = parse_flag(NON_EXHAUSTIVE, value)?;
        }

        Ok(options)
    }
}

fn parse_flag(var: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(ConfigError { var, value }),
    }
}
