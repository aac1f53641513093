//! Path resolution for sleeplog configuration and data files.
//!
//! All sleeplog data is stored in `~/.sleeplog/`:
//! - `config.yaml` - Main configuration file
//! - `sleeplog.db` - SQLite database with sessions and tracker state
//!
//! Set `SLEEPLOG_HOME` to use a different directory.

use std::path::PathBuf;

use crate::error::SleeplogError;

/// Environment variable overriding the data directory.
pub const HOME_ENV: &str = "SLEEPLOG_HOME";

/// Paths to sleeplog configuration and data.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.sleeplog/`
    pub root: PathBuf,
    /// Config file: `~/.sleeplog/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.sleeplog/sleeplog.db`
    pub database: PathBuf,
}

impl Paths {
    /// Resolve paths from `SLEEPLOG_HOME`, falling back to `~/.sleeplog`.
    ///
    /// # Errors
    ///
    /// Returns an error if neither `SLEEPLOG_HOME` nor `HOME` is set.
    pub fn new() -> Result<Self, SleeplogError> {
        if let Some(root) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var("HOME").map_err(|_| {
            SleeplogError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".sleeplog")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("sleeplog.db"),
            root,
        }
    }

    /// Ensure the data directory exists, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), SleeplogError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                SleeplogError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }

        Ok(())
    }
}
