//! Process-wide default logger
//!
//! The default instance is created lazily on first use with console output
//! and inline processing at level Info. Call [`install`] before the first
//! use to replace it. Statics are never dropped, so call [`flush`] before
//! exiting when background processing is enabled.

use crate::core::{FormatArg, LogLevel, Logger};
use std::sync::OnceLock;

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

fn initial_logger() -> Logger {
    Logger::builder()
        .stdout(true)
        .auto_flush(true)
        .level(LogLevel::Info)
        .build()
}

/// Install `logger` as the default instance.
///
/// Fails, handing the logger back, once a default exists (installed or
/// created by an earlier call).
pub fn install(logger: Logger) -> Result<(), Logger> {
    DEFAULT_LOGGER.set(logger)
}

/// The default instance, created on first use
pub fn default_logger() -> &'static Logger {
    DEFAULT_LOGGER.get_or_init(initial_logger)
}

pub fn log(level: LogLevel, template: impl Into<String>, args: Vec<FormatArg>) {
    default_logger().log(level, template, args);
}

pub fn fatal(template: impl Into<String>, args: Vec<FormatArg>) {
    default_logger().fatal(template, args);
}

pub fn error(template: impl Into<String>, args: Vec<FormatArg>) {
    default_logger().error(template, args);
}

pub fn warning(template: impl Into<String>, args: Vec<FormatArg>) {
    default_logger().warning(template, args);
}

pub fn info(template: impl Into<String>, args: Vec<FormatArg>) {
    default_logger().info(template, args);
}

pub fn debug(template: impl Into<String>, args: Vec<FormatArg>) {
    default_logger().debug(template, args);
}

pub fn trace(template: impl Into<String>, args: Vec<FormatArg>) {
    default_logger().trace(template, args);
}

pub fn set_level(level: LogLevel) {
    default_logger().set_level(level);
}

pub fn enable_auto_flush(enabled: bool) {
    default_logger().enable_auto_flush(enabled);
}

pub fn enable_stdout(enabled: bool) {
    default_logger().enable_stdout(enabled);
}

pub fn enable_millis(enabled: bool) {
    default_logger().enable_millis(enabled);
}

pub fn enable_date(enabled: bool) {
    default_logger().enable_date(enabled);
}

pub fn enable_level(enabled: bool) {
    default_logger().enable_level(enabled);
}

pub fn flush() -> bool {
    default_logger().flush()
}
