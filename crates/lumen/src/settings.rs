//! Application settings.
//!
//! Settings are read from TOML. Every field has a default, so a file only
//! needs to name the values it overrides:
//!
//! ```
//! use lumen::Settings;
//!
//! let settings = Settings::from_toml_str(r#"
//! [histogram]
//! bins = 128
//! "#).unwrap();
//!
//! assert_eq!(settings.histogram.bins, 128);
//! assert_eq!(settings.histogram.canvas_height, 80);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::logging::targets;

/// Top-level settings document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The `[histogram]` table.
    pub histogram: HistogramSettings,
}

/// Histogram panel configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramSettings {
    /// Number of histogram bins.
    pub bins: usize,
    /// Canvas width in pixels.
    pub canvas_width: f64,
    /// Canvas height in pixels.
    pub canvas_height: u32,
}

impl Default for HistogramSettings {
    fn default() -> Self {
        Self {
            bins: 256,
            canvas_width: 300.0,
            canvas_height: 80,
        }
    }
}

impl HistogramSettings {
    fn validate(&self) -> Result<()> {
        if self.bins == 0 {
            return Err(Error::invalid_setting("histogram.bins", "must be at least 1"));
        }
        if !self.canvas_width.is_finite() || self.canvas_width <= 0.0 {
            return Err(Error::invalid_setting(
                "histogram.canvas_width",
                format!("must be a positive number, got {}", self.canvas_width),
            ));
        }
        if self.canvas_height == 0 {
            return Err(Error::invalid_setting(
                "histogram.canvas_height",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

impl Settings {
    /// Parses and validates settings from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let settings = Self::from_toml_str(&content)?;
        tracing::debug!(target: targets::SETTINGS, path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Serializes the settings to a TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks every value for usability.
    pub fn validate(&self) -> Result<()> {
        self.histogram.validate()
    }
}
