// config.rs

// Example config.toml:
//
//   data_dir = "/home/me/.local/share/chaincalc"
//   error_reset_ms = 2000
//   thousands_separator = "."
//   decimal_separator = ","
//   persist = true

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::format::Formatter;
use crate::timer::DEFAULT_RESET_DELAY;

const APP_DIR: &str = "chaincalc";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where the history file lives. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
    /// Delay before an error display resets to 0.
    pub error_reset_ms: u64,
    pub thousands_separator: char,
    pub decimal_separator: char,
    /// Keep history across sessions.
    pub persist: bool,
}

impl Default for Config {
    fn default() -> Self {
        let formatter = Formatter::default();
        Self {
            data_dir: None,
            error_reset_ms: DEFAULT_RESET_DELAY.as_millis() as u64,
            thousands_separator: formatter.thousands_separator,
            decimal_separator: formatter.decimal_separator,
            persist: true,
        }
    }
}

impl Config {
    /// `<config_dir>/chaincalc/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Load the configuration. An explicit `path` must exist; the default
    /// location may be absent, in which case defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match Self::default_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound && !required => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };
        let config = Self::parse(&raw).with_context(|| format!("parsing {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.thousands_separator == self.decimal_separator {
            bail!(
                "thousands_separator and decimal_separator are both {:?}",
                self.decimal_separator
            );
        }
        if self.decimal_separator.is_ascii_digit() || self.thousands_separator.is_ascii_digit() {
            bail!("separators cannot be digits");
        }
        Ok(())
    }

    /// Directory holding persisted state.
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join(APP_DIR)))
    }

    pub fn formatter(&self) -> Formatter {
        Formatter::new(self.thousands_separator, self.decimal_separator)
    }

    pub fn error_reset_delay(&self) -> Duration {
        Duration::from_millis(self.error_reset_ms)
    }
}
