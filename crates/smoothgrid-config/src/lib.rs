//! Configuration for SmoothGrid tooling.
//!
//! Codec tuning and logging settings persist to disk as a RON file. Missing
//! fields fall back to defaults so older files keep loading.

mod config;
mod error;

pub use config::{CONFIG_FILE_NAME, Config, LogConfig};
pub use error::ConfigError;
