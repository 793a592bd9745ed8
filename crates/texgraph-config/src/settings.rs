//! Application settings.

use std::path::Path;

use serde::{Deserialize, Serialize};
use texgraph_core::{RasterSize, Rgba};

use crate::ConfigError;

/// Canvas size used when the configured default index is out of range.
pub const FALLBACK_SIZE: RasterSize = RasterSize::square(32);

/// Top-level settings file.
///
/// Every section has defaults, so a partial or empty file loads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Preview canvas options.
    pub canvas: CanvasConfig,
}

/// The `[canvas]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Sizes offered for previews and renders.
    pub size_options: Vec<RasterSize>,
    /// Index into `size_options` of the size used when none is requested.
    pub default_size_index: usize,
    /// Color drawn behind transparent pixels.
    pub background: Rgba,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            size_options: [32, 64, 128, 256].map(RasterSize::square).to_vec(),
            default_size_index: 0,
            background: Rgba::WHITE,
        }
    }
}

impl CanvasConfig {
    /// The configured default size, or [`FALLBACK_SIZE`] if the index is out of range.
    pub fn default_size(&self) -> RasterSize {
        self.size_options
            .get(self.default_size_index)
            .copied()
            .unwrap_or(FALLBACK_SIZE)
    }
}

impl Settings {
    /// Load settings from a TOML file and validate them.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let settings = Self::from_toml(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from `path`, or defaults if the file does not exist.
    ///
    /// Unreadable, malformed or invalid files are still errors.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the settings to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the settings to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks that at least one canvas size exists and none is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas.size_options.is_empty() {
            return Err(ConfigError::Invalid(
                "canvas.size_options must not be empty".to_string(),
            ));
        }
        if let Some(size) = self.canvas.size_options.iter().find(|s| s.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "canvas size {size} has a zero dimension"
            )));
        }
        Ok(())
    }
}
