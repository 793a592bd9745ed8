//! Settings for texgraph hosts.
//!
//! Provides the TOML settings file (canvas size options, default size and
//! background color) and the platform directories it lives in.
//!
//! # Example
//!
//! ```rust,no_run
//! use texgraph_config::{Settings, paths};
//!
//! let settings = Settings::load_or_default(paths::settings_path()).unwrap();
//! let size = settings.canvas.default_size();
//! println!("rendering at {size}");
//!
//! settings.save(paths::settings_path()).unwrap();
//! ```

mod error;
mod settings;

/// Platform-specific paths for configuration.
pub mod paths;

pub use error::ConfigError;
pub use paths::{settings_path, user_config_dir};
pub use settings::{CanvasConfig, FALLBACK_SIZE, Settings};
