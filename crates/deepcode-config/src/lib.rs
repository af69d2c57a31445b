//! # deepcode configuration
//!
//! Typed configuration for the deepcode client: where the backend lives, how
//! indexing jobs are requested and polled, and chat defaults.
//!
//! Values are resolved in three layers, lowest priority first:
//!
//! 1. built-in defaults (see [`components::defaults`])
//! 2. a TOML file (`~/.config/deepcode/config.toml` unless overridden)
//! 3. `DEEPCODE_*` environment variables
//!
//! Command-line flags are applied on top by the binary.
//!
//! ```rust,no_run
//! use deepcode_config::ClientConfig;
//!
//! let config = ClientConfig::load(None)?;
//! println!("backend: {}", config.backend.base_url);
//! # Ok::<(), deepcode_config::ConfigError>(())
//! ```

#![warn(missing_docs)]

pub mod components;
mod loader;

pub use components::*;
pub use loader::{ClientConfig, ConfigError, ConfigResult};
