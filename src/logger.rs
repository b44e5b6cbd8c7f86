//! Log buffer and `fern` dispatch setup.
//!
//! Every `log` record goes to an in-memory buffer that the presentation
//! layer can show, and optionally to a file in the user's data directory.

use anyhow::{Context, Result};
use chrono::Utc;
use log::LevelFilter;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::config::LoggingConfig;
use crate::constants::{LOG_FILE_NAME, MAX_BUFFERED_LOGS};

/// Shared logger that can be used across the application
#[derive(Clone)]
pub struct Logger {
    logs: Arc<Mutex<Vec<String>>>,
    level: LevelFilter,
    file_path: Option<PathBuf>,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            logs: Arc::new(Mutex::new(Vec::new())),
            level: LevelFilter::Info,
            file_path: None,
        }
    }

    /// Build a logger from the `[logging]` section.
    pub fn from_config(config: &LoggingConfig) -> Result<Self> {
        let file_path = if config.enabled {
            Some(Self::get_log_file_path()?)
        } else {
            None
        };

        Ok(Self {
            logs: Arc::new(Mutex::new(Vec::new())),
            level: config.level_filter(),
            file_path,
        })
    }

    /// Add a log entry
    pub fn log(&self, message: String) {
        let timestamp = Utc::now().format("%H:%M:%S%.3f").to_string();
        self.push(format!("[{}] {}", timestamp, message));
    }

    fn push(&self, line: String) {
        if let Ok(mut logs) = self.logs.lock() {
            logs.push(line);
            if logs.len() > MAX_BUFFERED_LOGS {
                let overflow = logs.len() - MAX_BUFFERED_LOGS;
                logs.drain(..overflow);
            }
        }
    }

    /// Get all logs sorted by date (newest first)
    pub fn get_logs(&self) -> Vec<String> {
        if let Ok(logs) = self.logs.lock() {
            let mut sorted_logs = logs.clone();
            sorted_logs.reverse();
            sorted_logs
        } else {
            Vec::new()
        }
    }

    /// Clear all logs
    pub fn clear(&self) {
        if let Ok(mut logs) = self.logs.lock() {
            logs.clear();
        }
    }

    /// Whether records are also written to a log file
    pub fn is_enabled(&self) -> bool {
        self.file_path.is_some()
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    /// Assemble the dispatch without installing it.
    pub fn dispatch(&self) -> Result<fern::Dispatch> {
        let buffer = self.clone();
        let mut dispatch = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "[{}] {:<5} {}: {}",
                    Utc::now().format("%H:%M:%S%.3f"),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .level(self.level)
            .level_for("sqlx", LevelFilter::Warn)
            .level_for("sea_orm", LevelFilter::Warn)
            .chain(fern::Output::call(move |record| buffer.push(record.args().to_string())));

        if let Some(path) = &self.file_path {
            let file = fern::log_file(path).with_context(|| format!("Failed to open log file: {}", path.display()))?;
            dispatch = dispatch.chain(file);
        }

        Ok(dispatch)
    }

    /// Install this logger as the global `log` backend.
    pub fn install(&self) -> Result<()> {
        self.dispatch()?
            .apply()
            .context("A global logger is already installed")
    }

    /// Log file location under the user's data directory, created on demand.
    pub fn get_log_file_path() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?
            .join("areatrack");
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create log directory: {}", data_dir.display()))?;
        Ok(data_dir.join(LOG_FILE_NAME))
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}
