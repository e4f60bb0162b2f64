//! Log record structure

use super::log_level::LogLevel;
use super::printf::{sprintf, FormatArg};
use chrono::{DateTime, Local};

/// One pending log message.
///
/// The timestamp is taken when the record is created, which is when it is
/// enqueued; rendering later never re-reads the clock.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub template: String,
    pub args: Vec<FormatArg>,
}

impl LogRecord {
    pub fn new(level: LogLevel, template: impl Into<String>, args: Vec<FormatArg>) -> Self {
        Self::with_timestamp(Local::now(), level, template, args)
    }

    pub fn with_timestamp(
        timestamp: DateTime<Local>,
        level: LogLevel,
        template: impl Into<String>,
        args: Vec<FormatArg>,
    ) -> Self {
        Self {
            timestamp,
            level,
            template: template.into(),
            args,
        }
    }

    /// Interpolated message body, without timestamp or level tag
    pub fn message(&self) -> String {
        sprintf(&self.template, &self.args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_interpolation() {
        let record = LogRecord::new(LogLevel::Info, "id=%d name=%s", vec![7.into(), "x".into()]);
        assert_eq!(record.message(), "id=7 name=x");
    }

    #[test]
    fn test_timestamp_captured_at_creation() {
        let before = Local::now();
        let record = LogRecord::new(LogLevel::Debug, "t", Vec::new());
        let after = Local::now();
        assert!(record.timestamp >= before && record.timestamp <= after);

        std::thread::sleep(std::time::Duration::from_millis(5));
        let ts = record.timestamp;
        let _ = record.message();
        assert_eq!(record.timestamp, ts);
    }
}
