//! Log level definitions
//!
//! Levels are ordered by verbosity: `Fatal` is the smallest value and
//! `Trace` the largest. A record passes the gate when its level is less
//! than or equal to the configured level.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum LogLevel {
    Fatal = 0,
    Error = 1,
    Warning = 2,
    #[default]
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Fatal,
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Fatal => "FATAL",
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    /// Fixed-width bracketed tag written in front of every message,
    /// trailing separator included.
    pub fn tag(&self) -> &'static str {
        match self {
            LogLevel::Fatal => "[FATAL] ",
            LogLevel::Error => "[ERROR] ",
            LogLevel::Warning => "[WARN ] ",
            LogLevel::Info => "[INFO ] ",
            LogLevel::Debug => "[DEBUG] ",
            LogLevel::Trace => "[TRACE] ",
        }
    }

    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Fatal => BrightRed,
            LogLevel::Error => Red,
            LogLevel::Warning => Yellow,
            LogLevel::Info => Green,
            LogLevel::Debug => Blue,
            LogLevel::Trace => BrightBlack,
        }
    }

    /// Fatal and Error pass the level gate regardless of the threshold
    /// unless gating of critical levels is switched on.
    #[inline]
    pub fn is_critical(&self) -> bool {
        matches!(self, LogLevel::Fatal | LogLevel::Error)
    }

    /// Whether a record at this level is emitted under `threshold`.
    #[inline]
    pub fn passes(&self, threshold: LogLevel, gate_critical: bool) -> bool {
        (!gate_critical && self.is_critical()) || *self <= threshold
    }

    /// Lenient conversion used for environment and config strings.
    ///
    /// Only "debug" and "trace" are recognised; everything else maps to
    /// `Info`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            _ => LogLevel::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FATAL" => Ok(LogLevel::Fatal),
            "ERROR" => Ok(LogLevel::Error),
            "WARN" | "WARNING" => Ok(LogLevel::Warning),
            "INFO" => Ok(LogLevel::Info),
            "DEBUG" => Ok(LogLevel::Debug),
            "TRACE" => Ok(LogLevel::Trace),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
