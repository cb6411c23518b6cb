//! Session configuration.
//!
//! This module defines the settings of a debugging session. It provides:
//! 1. **Defaults:** Acquisition timeout and presentation viewport sizes.
//! 2. **Structure:** A flat [`Config`] deserialized from JSON, with every field optional.
//! 3. **Loading:** Helpers to parse a JSON string or read a JSON file.
//!
//! The CLI uses `Config::default()` unless a configuration file is given.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::common::constants;
use crate::common::error::{Result, TraceError};

/// Default configuration values.
mod defaults {
    use super::constants;

    /// Time allowed for the simulator to produce a complete trace (1 second).
    pub const ACQUISITION_TIMEOUT_MS: u64 = constants::DEFAULT_ACQUISITION_TIMEOUT_MS;

    /// Register-history entries shown at once.
    pub const HISTORY_VIEWPORT: usize = constants::DEFAULT_HISTORY_VIEWPORT;

    /// Disassembly lines shown at once.
    pub const LISTING_VIEWPORT: usize = constants::DEFAULT_LISTING_VIEWPORT;
}

/// Debugging session settings.
///
/// # Examples
///
/// ```
/// use pipetrace_core::config::Config;
///
/// let config = Config::from_json(r#"{ "listing_viewport": 9 }"#).unwrap();
/// assert_eq!(config.listing_viewport, 9);
/// assert_eq!(config.acquisition_timeout_ms, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Upper bound on the simulator run, in milliseconds.
    #[serde(default = "Config::default_acquisition_timeout_ms")]
    pub acquisition_timeout_ms: u64,

    /// Number of register-history entries a presentation shows.
    #[serde(default = "Config::default_history_viewport")]
    pub history_viewport: usize,

    /// Height of the disassembly window.
    #[serde(default = "Config::default_listing_viewport")]
    pub listing_viewport: usize,
}

impl Config {
    const fn default_acquisition_timeout_ms() -> u64 {
        defaults::ACQUISITION_TIMEOUT_MS
    }

    const fn default_history_viewport() -> usize {
        defaults::HISTORY_VIEWPORT
    }

    const fn default_listing_viewport() -> usize {
        defaults::LISTING_VIEWPORT
    }

    /// The acquisition timeout as a [`Duration`].
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.acquisition_timeout_ms)
    }

    /// Parses a JSON configuration; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// [`TraceError::Config`] if the text is not a valid configuration object.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads a JSON configuration file.
    ///
    /// # Errors
    ///
    /// [`TraceError::Io`] if the file cannot be read, otherwise as for [`Config::from_json`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| TraceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            acquisition_timeout_ms: defaults::ACQUISITION_TIMEOUT_MS,
            history_viewport: defaults::HISTORY_VIEWPORT,
            listing_viewport: defaults::LISTING_VIEWPORT,
        }
    }
}
