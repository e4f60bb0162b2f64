//! Line rendering for log records
//!
//! A record is rendered once per cycle into a plain line and a colorized
//! line. Both share the same timestamp string; the colorized line differs
//! only in the ANSI escape wrapped around the level tag.
//!
//! Layout: `TIMESTAMP [LEVEL] message\n`, or `TIMESTAMP message\n` when the
//! level tag is switched off.

use super::log_level::LogLevel;
use super::log_record::LogRecord;
use super::timestamp::TimestampFormat;

const ANSI_RESET: &str = "\x1b[0m";

/// Display toggles applied when rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatterConfig {
    pub timestamp_format: TimestampFormat,
    pub show_level: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            timestamp_format: TimestampFormat::default(),
            show_level: true,
        }
    }
}

impl FormatterConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_show_level(mut self, show: bool) -> Self {
        self.show_level = show;
        self
    }

    /// Render `record` into its plain and colorized lines.
    pub fn render(&self, record: &LogRecord) -> RenderedLine {
        let timestamp = self.timestamp_format.format(&record.timestamp);
        let message = record.message();

        if !self.show_level {
            let plain = format!("{} {}\n", timestamp, message);
            return RenderedLine {
                level: record.level,
                colored: plain.clone(),
                plain,
            };
        }

        let tag = record.level.tag();
        let colored_tag = colorize_tag(record.level, tag);
        RenderedLine {
            level: record.level,
            plain: format!("{} {}{}\n", timestamp, tag, message),
            colored: format!("{} {}{}\n", timestamp, colored_tag, message),
        }
    }
}

/// Wrap a level tag in the ANSI foreground color of its level.
pub fn colorize_tag(level: LogLevel, tag: &str) -> String {
    format!("\x1b[{}m{}{}", level.color_code().to_fg_str(), tag, ANSI_RESET)
}

/// One record rendered for output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub level: LogLevel,
    pub plain: String,
    pub colored: String,
}

impl RenderedLine {
    /// The variant to write, picked by a colorize toggle
    #[inline]
    pub fn select(&self, colored: bool) -> &str {
        if colored {
            &self.colored
        } else {
            &self.plain
        }
    }
}
