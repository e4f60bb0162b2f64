//! Main logger implementation

use super::{
    appender::Appender,
    config::LoggerConfig,
    dispatch::Dispatcher,
    log_level::LogLevel,
    log_record::LogRecord,
    metrics::LoggerMetrics,
    printf::FormatArg,
    spawner::{TaskSpawner, ThreadSpawner},
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Handle used to emit records and adjust configuration at runtime
///
/// Emission never fails: formatting mistakes show up as inline markers and
/// I/O failures are counted in [`LoggerMetrics`].
///
/// # Example
///
/// ```no_run
/// use rust_rotating_logger::prelude::*;
///
/// let logger = Logger::with_file("/var/log/app.log", 10 * 1024 * 1024, 5, LogLevel::Debug);
/// logger.info("listening on port %d", vec![8080.into()]);
/// logger.flush();
/// ```
pub struct Logger {
    dispatcher: Arc<Dispatcher>,
}

impl Logger {
    /// Logger with the default configuration: no file, no console echo,
    /// background processing at level Info.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LoggerConfig::default())
    }

    #[must_use]
    pub fn with_config(config: LoggerConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// Logger persisting to `file`, rotating at `max_file_size` bytes and
    /// keeping `max_num_files` files in total.
    #[must_use]
    pub fn with_file(
        file: impl Into<PathBuf>,
        max_file_size: u64,
        max_num_files: usize,
        level: LogLevel,
    ) -> Self {
        Self::with_config(LoggerConfig::with_file(file, max_file_size, max_num_files, level))
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_rotating_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .level(LogLevel::Debug)
    ///     .stdout(true)
    ///     .auto_flush(true)
    ///     .build();
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Whether a record at `level` would currently be emitted
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        let (threshold, gate_critical) = self.dispatcher.gate();
        level.passes(threshold, gate_critical)
    }

    pub fn log(&self, level: LogLevel, template: impl Into<String>, args: Vec<FormatArg>) {
        if !self.is_enabled(level) {
            return;
        }
        self.dispatcher.enqueue(LogRecord::new(level, template, args));
        self.dispatcher.dispatch();
    }

    #[inline]
    pub fn fatal(&self, template: impl Into<String>, args: Vec<FormatArg>) {
        self.log(LogLevel::Fatal, template, args);
    }

    #[inline]
    pub fn error(&self, template: impl Into<String>, args: Vec<FormatArg>) {
        self.log(LogLevel::Error, template, args);
    }

    #[inline]
    pub fn warning(&self, template: impl Into<String>, args: Vec<FormatArg>) {
        self.log(LogLevel::Warning, template, args);
    }

    #[inline]
    pub fn info(&self, template: impl Into<String>, args: Vec<FormatArg>) {
        self.log(LogLevel::Info, template, args);
    }

    #[inline]
    pub fn debug(&self, template: impl Into<String>, args: Vec<FormatArg>) {
        self.log(LogLevel::Debug, template, args);
    }

    #[inline]
    pub fn trace(&self, template: impl Into<String>, args: Vec<FormatArg>) {
        self.log(LogLevel::Trace, template, args);
    }

    /// Process one record inline, then wait for background cycles within
    /// `flush_poll_interval * flush_max_attempts`.
    ///
    /// Returns `false` when background work was still running at the deadline.
    pub fn flush(&self) -> bool {
        self.dispatcher.flush()
    }

    pub fn set_file_name(&self, file: impl Into<PathBuf>) {
        let file = file.into();
        self.update_config(|c| c.file = Some(file));
    }

    /// Stop persisting to a file
    pub fn clear_file_name(&self) {
        self.update_config(|c| c.file = None);
    }

    pub fn set_max_file_size(&self, bytes: u64) {
        self.update_config(|c| c.max_file_size = bytes);
    }

    /// Values below 1 are clamped to 1
    pub fn set_max_num_files(&self, count: usize) {
        self.update_config(|c| c.max_num_files = count.max(1));
    }

    pub fn set_permissions(&self, mode: u32) {
        self.update_config(|c| c.file_mode = mode);
    }

    pub fn set_level(&self, level: LogLevel) {
        self.update_config(|c| c.level = level);
    }

    pub fn set_gate_critical(&self, enabled: bool) {
        self.update_config(|c| c.gate_critical = enabled);
    }

    pub fn set_flush_timing(&self, poll_interval: Duration, max_attempts: u32) {
        self.update_config(|c| {
            c.flush_poll_interval = poll_interval;
            c.flush_max_attempts = max_attempts;
        });
    }

    pub fn enable_auto_flush(&self, enabled: bool) {
        self.update_config(|c| c.auto_flush = enabled);
    }

    pub fn enable_stdout(&self, enabled: bool) {
        self.update_config(|c| c.stdout = enabled);
    }

    pub fn enable_millis(&self, enabled: bool) {
        self.update_config(|c| c.show_millis = enabled);
    }

    pub fn enable_date(&self, enabled: bool) {
        self.update_config(|c| c.show_date = enabled);
    }

    pub fn enable_level(&self, enabled: bool) {
        self.update_config(|c| c.show_level = enabled);
    }

    pub fn enable_compression(&self, enabled: bool) {
        self.update_config(|c| c.compression = enabled);
    }

    pub fn enable_colors_on_file(&self, enabled: bool) {
        self.update_config(|c| c.colors_on_file = enabled);
    }

    pub fn enable_colors_on_stdout(&self, enabled: bool) {
        self.update_config(|c| c.colors_on_stdout = enabled);
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> LoggerConfig {
        self.dispatcher.config()
    }

    /// Apply several changes under one write lock
    pub fn update_config<F: FnOnce(&mut LoggerConfig)>(&self, update: F) {
        self.dispatcher.update_config(update);
    }

    pub fn add_appender<A: Appender + 'static>(&self, appender: A) {
        self.dispatcher.add_appender(Box::new(appender));
    }

    /// Get the logger metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use rust_rotating_logger::Logger;
    ///
    /// let logger = Logger::new();
    /// let metrics = logger.metrics();
    /// println!("Dropped: {}", metrics.dropped_count());
    /// println!("Drop rate: {:.2}%", metrics.drop_rate());
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        self.dispatcher.metrics()
    }

    pub fn dropped_count(&self) -> u64 {
        self.metrics().dropped_count()
    }

    /// Records enqueued but not yet processed
    pub fn pending(&self) -> usize {
        self.dispatcher.pending()
    }

    /// Background cycles scheduled but not yet finished
    pub fn in_flight(&self) -> usize {
        self.dispatcher.in_flight()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if !self.flush() {
            eprintln!(
                "[LOGGER WARNING] Logger dropped with {} background cycles still running. \
                 Some logs may be lost.",
                self.in_flight()
            );
        }

        let dropped = self.metrics().dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} dropped logs (drop rate: {:.2}%)",
                dropped,
                self.metrics().drop_rate()
            );
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_rotating_logger::prelude::*;
///
/// let dir = tempfile::tempdir().unwrap();
/// let logger = Logger::builder()
///     .file(dir.path().join("app.log"))
///     .max_file_size(1024 * 1024)
///     .max_num_files(3)
///     .compression(true)
///     .level(LogLevel::Trace)
///     .spawner(ThreadSpawner::new().with_thread_name("app-log"))
///     .build();
/// logger.trace("ready", vec![]);
/// assert!(logger.flush());
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    spawner: Box<dyn TaskSpawner>,
    appenders: Vec<Box<dyn Appender>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            spawner: Box::new(ThreadSpawner::new()),
            appenders: Vec::new(),
        }
    }

    /// Replace the whole configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn file(mut self, file: impl Into<PathBuf>) -> Self {
        self.config.file = Some(file.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_num_files(mut self, count: usize) -> Self {
        self.config.max_num_files = count.max(1);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn file_mode(mut self, mode: u32) -> Self {
        self.config.file_mode = mode;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn gate_critical(mut self, enabled: bool) -> Self {
        self.config.gate_critical = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn stdout(mut self, enabled: bool) -> Self {
        self.config.stdout = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn auto_flush(mut self, enabled: bool) -> Self {
        self.config.auto_flush = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn compression(mut self, enabled: bool) -> Self {
        self.config.compression = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn colors_on_stdout(mut self, enabled: bool) -> Self {
        self.config.colors_on_stdout = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn colors_on_file(mut self, enabled: bool) -> Self {
        self.config.colors_on_file = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn flush_timing(mut self, poll_interval: Duration, max_attempts: u32) -> Self {
        self.config.flush_poll_interval = poll_interval;
        self.config.flush_max_attempts = max_attempts;
        self
    }

    /// Use a different scheduler for background cycles
    #[must_use = "builder methods return a new value"]
    pub fn spawner<S: TaskSpawner + 'static>(mut self, spawner: S) -> Self {
        self.spawner = Box::new(spawner);
        self
    }

    /// Add an appender that receives every rendered line after the console
    /// and the file
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        Logger {
            dispatcher: Arc::new(Dispatcher::new(self.config, self.spawner, self.appenders)),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LoggerError, RenderedLine, Result};
    use parking_lot::Mutex;

    #[derive(Clone, Default)]
    struct Memory(Arc<Mutex<Vec<RenderedLine>>>);

    impl Memory {
        fn lines(&self) -> Vec<String> {
            self.0.lock().iter().map(|l| l.plain.clone()).collect()
        }
    }

    impl Appender for Memory {
        fn append(&mut self, line: &RenderedLine) -> Result<()> {
            self.0.lock().push(line.clone());
            Ok(())
        }
        fn flush(&mut self) -> Result<()> {
            Ok(())
        }
        fn name(&self) -> &str {
            "memory"
        }
    }

    fn inline_logger(level: LogLevel) -> (Logger, Memory) {
        let memory = Memory::default();
        let logger = Logger::builder()
            .level(level)
            .auto_flush(true)
            .appender(memory.clone())
            .build();
        (logger, memory)
    }

    #[test]
    fn test_builder_defaults() {
        let logger = Logger::builder().build();
        let config = logger.config();
        assert_eq!(config.level, LogLevel::Info);
        assert!(config.file.is_none());
        assert!(!config.auto_flush);
        assert_eq!(logger.dropped_count(), 0);
    }

    #[test]
    fn test_with_file_clamps_file_count() {
        let logger = Logger::with_file("/tmp/never-written.log", 100, 0, LogLevel::Debug);
        assert_eq!(logger.config().max_num_files, 1);
        assert_eq!(logger.config().level, LogLevel::Debug);
    }

    #[test]
    fn test_level_gating() {
        let (logger, memory) = inline_logger(LogLevel::Warning);

        logger.info("hidden", vec![]);
        logger.debug("hidden", vec![]);
        logger.warning("shown", vec![]);

        let lines = memory.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("[WARN ] shown\n"));
    }

    #[test]
    fn test_fatal_and_error_bypass_threshold_by_default() {
        // Critical records are emitted even below the threshold; this is
        // intentional and `gate_critical` opts out of it.
        let (logger, memory) = inline_logger(LogLevel::Fatal);
        logger.set_level(LogLevel::Fatal);
        logger.error("still emitted", vec![]);
        logger.fatal("always emitted", vec![]);
        logger.warning("dropped", vec![]);
        assert_eq!(memory.lines().len(), 2);

        logger.set_gate_critical(true);
        logger.error("now gated", vec![]);
        assert_eq!(memory.lines().len(), 2);
        assert!(logger.is_enabled(LogLevel::Fatal));
        assert!(!logger.is_enabled(LogLevel::Error));
    }

    #[test]
    fn test_setters_take_effect_for_next_record() {
        let (logger, memory) = inline_logger(LogLevel::Info);

        logger.enable_level(false);
        logger.enable_date(false);
        logger.enable_millis(false);
        logger.info("bare %s", vec!["line".into()]);

        let line = &memory.lines()[0];
        // HH:MM:SS + space + message
        assert_eq!(line.len(), 8 + 1 + "bare line\n".len(), "line was {:?}", line);
        assert!(line.ends_with(" bare line\n"));
    }

    #[test]
    fn test_set_max_num_files_clamps() {
        let logger = Logger::new();
        logger.set_max_num_files(0);
        assert_eq!(logger.config().max_num_files, 1);
        logger.set_max_num_files(4);
        assert_eq!(logger.config().max_num_files, 4);
    }

    #[test]
    fn test_update_config_applies_all_changes() {
        let logger = Logger::new();
        logger.update_config(|c| {
            c.compression = true;
            c.max_file_size = 512;
            c.file_mode = 0o640;
        });
        let config = logger.config();
        assert!(config.compression);
        assert_eq!(config.max_file_size, 512);
        assert_eq!(config.file_mode, 0o640);
    }

    #[test]
    fn test_background_emission_then_flush() {
        let memory = Memory::default();
        let logger = Logger::builder()
            .appender(memory.clone())
            .flush_timing(Duration::from_millis(10), 500)
            .build();

        for i in 0..10 {
            logger.info("record %d", vec![i.into()]);
        }
        assert!(logger.flush());
        assert_eq!(memory.lines().len(), 10);
        assert_eq!(logger.in_flight(), 0);
        assert_eq!(logger.pending(), 0);
        assert_eq!(logger.metrics().total_logged(), 10);
    }

    #[test]
    fn test_flush_on_idle_logger() {
        let logger = Logger::new();
        assert!(logger.flush());
    }

    #[test]
    fn test_bad_templates_never_fail() {
        let (logger, memory) = inline_logger(LogLevel::Trace);
        logger.trace("%d %s", vec!["abc".into()]);
        logger.trace("%", vec![]);
        logger.trace("%z", vec![3.into()]);

        let lines = memory.lines();
        assert!(lines[0].ends_with("%!d(string=abc) %!s(MISSING)\n"));
        assert!(lines[1].ends_with("%!(NOVERB)\n"));
        assert!(lines[2].ends_with("%!z(int=3)\n"));
    }

    #[test]
    fn test_failing_appender_is_counted_not_raised() {
        struct Broken;
        impl Appender for Broken {
            fn append(&mut self, _line: &RenderedLine) -> Result<()> {
                Err(LoggerError::other("broken"))
            }
            fn flush(&mut self) -> Result<()> {
                Ok(())
            }
            fn name(&self) -> &str {
                "broken"
            }
        }

        let logger = Logger::builder().auto_flush(true).appender(Broken).build();
        logger.error("not persisted by broken", vec![]);
        assert_eq!(logger.metrics().appender_failures(), 1);
        assert_eq!(logger.dropped_count(), 0);
    }
}
