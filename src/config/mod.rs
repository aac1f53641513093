//! Configuration management for sleeplog.
//!
//! This module handles loading configuration from `~/.sleeplog/`.

mod paths;
mod settings;

pub use paths::{Paths, HOME_ENV};
pub use settings::{ColorSetting, Config, DisplayConfig, GeneralConfig};
