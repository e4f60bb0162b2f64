//! Logger configuration
//!
//! Every field can be changed at runtime through the setters on
//! [`Logger`](crate::core::Logger); each processing cycle works on one
//! snapshot taken when it starts.

use super::log_level::LogLevel;
use super::output_format::FormatterConfig;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default permission bits for newly created log files
pub const DEFAULT_FILE_MODE: u32 = 0o666;

/// Default interval between two checks of the in-flight counter in `flush()`
pub const DEFAULT_FLUSH_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Default number of poll intervals `flush()` waits at most
pub const DEFAULT_FLUSH_MAX_ATTEMPTS: u32 = 10;

/// Longest a single `flush()` waits, whatever the configured timing
pub const MAX_FLUSH_BUDGET: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Active log file; `None` means console only
    pub file: Option<PathBuf>,
    /// Rotation threshold in bytes, 0 disables rotation
    pub max_file_size: u64,
    /// Active file plus rotated files kept, never below 1
    pub max_num_files: usize,
    /// Permission bits used when the active file is created (Unix only)
    pub file_mode: u32,
    /// Most verbose level that is still emitted
    pub level: LogLevel,
    /// Apply the level threshold to Fatal and Error as well
    pub gate_critical: bool,
    pub stdout: bool,
    /// Process each record inside the emitting call instead of a background task
    pub auto_flush: bool,
    pub show_millis: bool,
    pub show_date: bool,
    pub show_level: bool,
    pub colors_on_stdout: bool,
    pub colors_on_file: bool,
    /// gzip rotated files
    pub compression: bool,
    pub flush_poll_interval: Duration,
    pub flush_max_attempts: u32,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            file: None,
            max_file_size: 0,
            max_num_files: 1,
            file_mode: DEFAULT_FILE_MODE,
            level: LogLevel::Info,
            gate_critical: false,
            stdout: false,
            auto_flush: false,
            show_millis: true,
            show_date: true,
            show_level: true,
            colors_on_stdout: true,
            colors_on_file: false,
            compression: false,
            flush_poll_interval: DEFAULT_FLUSH_POLL_INTERVAL,
            flush_max_attempts: DEFAULT_FLUSH_MAX_ATTEMPTS,
        }
    }
}

impl LoggerConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration with a target file, size threshold, retention count and level
    #[must_use]
    pub fn with_file(
        file: impl Into<PathBuf>,
        max_file_size: u64,
        max_num_files: usize,
        level: LogLevel,
    ) -> Self {
        Self {
            file: Some(file.into()),
            max_file_size,
            max_num_files: max_num_files.max(1),
            level,
            ..Self::default()
        }
    }

    /// Clamp out-of-range values to the nearest valid one.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.max_num_files = self.max_num_files.max(1);
        self
    }

    #[must_use]
    pub fn timestamp_format(&self) -> TimestampFormat {
        TimestampFormat::from_toggles(self.show_date, self.show_millis)
    }

    #[must_use]
    pub fn formatter(&self) -> FormatterConfig {
        FormatterConfig {
            timestamp_format: self.timestamp_format(),
            show_level: self.show_level,
        }
    }

    /// Upper bound of the time `flush()` spends waiting for background work,
    /// capped at [`MAX_FLUSH_BUDGET`]
    #[must_use]
    pub fn flush_budget(&self) -> Duration {
        self.flush_poll_interval
            .saturating_mul(self.flush_max_attempts)
            .min(MAX_FLUSH_BUDGET)
    }
}
