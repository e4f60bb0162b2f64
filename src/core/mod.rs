//! Core logger types and traits

pub mod appender;
pub mod config;
pub(crate) mod dispatch;
pub mod error;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod printf;
pub mod record_queue;
pub mod spawner;
pub mod timestamp;

pub use appender::Appender;
pub use config::{
    LoggerConfig, DEFAULT_FILE_MODE, DEFAULT_FLUSH_MAX_ATTEMPTS, DEFAULT_FLUSH_POLL_INTERVAL,
    MAX_FLUSH_BUDGET,
};
pub use error::{LoggerError, Result};
pub use log_level::LogLevel;
pub use log_record::LogRecord;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use output_format::{colorize_tag, FormatterConfig, RenderedLine};
pub use printf::{sprintf, FormatArg};
pub use record_queue::RecordQueue;
pub use spawner::{Task, TaskSpawner, ThreadSpawner};
#[cfg(feature = "tokio")]
pub use spawner::TokioSpawner;
pub use timestamp::TimestampFormat;
