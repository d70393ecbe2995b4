//! Configuration loading
//!
//! Resolves the effective [`Settings`] from the three sources, in increasing
//! precedence: built-in defaults, an optional TOML file, `FUSIA_*`
//! environment variables.

use std::path::Path;

use tracing::{debug, warn};

use crate::config::Settings;
use crate::error::Result;

/// Resolves settings from defaults, file and environment
#[derive(Debug, Default)]
pub struct ConfigLoader {
    defaults: Settings,
}

impl ConfigLoader {
    /// Loader starting from the built-in defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the effective settings.
    ///
    /// A missing config file is not an error; the defaults simply stand in
    /// for it. The merged result is validated before being returned.
    pub fn load(&self, config_file: Option<&Path>) -> Result<Settings> {
        let base = match config_file {
            Some(path) if path.exists() => {
                debug!(path = %path.display(), "Reading configuration file");
                Settings::from_file(path)?
            }
            Some(path) => {
                warn!(
                    path = %path.display(),
                    "Configuration file not found, continuing with defaults"
                );
                self.defaults.clone()
            }
            None => self.defaults.clone(),
        };

        let settings = base.merge_with_env()?;
        settings.validate()?;
        Ok(settings)
    }

    /// The built-in defaults this loader starts from
    pub fn defaults(&self) -> &Settings {
        &self.defaults
    }
}
