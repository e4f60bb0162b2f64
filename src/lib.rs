//! # Rust Rotating Logger
//!
//! A leveled, printf-style logger that writes timestamped lines to the
//! console and to a size-rotated file, optionally gzip-compressing the
//! rotated files.
//!
//! ## Features
//!
//! - **Never blocks on I/O by default**: each record is processed by a
//!   short-lived background task; `flush()` drains them within a bounded budget
//! - **Inline mode**: `auto_flush` processes each record before the call returns
//! - **Rotation**: `app.log`, `app.log.1` … `app.log.(N-1)`, newest first
//! - **Runtime configuration**: every setter is safe to call while logging
//!
//! ## Example
//!
//! ```
//! use rust_rotating_logger::prelude::*;
//! use rust_rotating_logger::infof;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let logger = Logger::with_file(dir.path().join("app.log"), 1024 * 1024, 3, LogLevel::Debug);
//! logger.enable_auto_flush(true);
//!
//! infof!(logger, "id=%d", 7);
//! let contents = std::fs::read_to_string(dir.path().join("app.log")).unwrap();
//! assert!(contents.ends_with("[INFO ] id=7\n"));
//! ```

pub mod appenders;
pub mod core;
pub mod global;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, RotatingFileAppender, RotationPolicy};
    pub use crate::core::{
        Appender, FormatArg, FormatterConfig, LogLevel, Logger, LoggerBuilder, LoggerConfig,
        LoggerError, LoggerMetrics, RenderedLine, Result, TaskSpawner, ThreadSpawner,
        TimestampFormat,
    };
    #[cfg(feature = "tokio")]
    pub use crate::core::TokioSpawner;
}

pub use appenders::{ConsoleAppender, RotatingFileAppender, RotationPolicy};
pub use core::{
    sprintf, Appender, FormatArg, FormatterConfig, LogLevel, LogRecord, Logger, LoggerBuilder,
    LoggerConfig, LoggerError, LoggerMetrics, RenderedLine, Result, TaskSpawner, ThreadSpawner,
    TimestampFormat,
};
#[cfg(feature = "tokio")]
pub use core::TokioSpawner;
