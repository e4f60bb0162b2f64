//! printf-style logging macros.
//!
//! Each argument is converted with `FormatArg::from`, so any integer, float,
//! string, `bool` or `char` can be passed directly.
//!
//! # Examples
//!
//! ```
//! use rust_rotating_logger::prelude::*;
//! use rust_rotating_logger::{infof, warningf};
//!
//! let logger = Logger::builder().auto_flush(true).build();
//!
//! infof!(logger, "Server started");
//!
//! let port = 8080;
//! infof!(logger, "Server listening on port %d", port);
//!
//! warningf!(logger, "disk %s at %.1f%%", "/var", 93.25);
//! ```

/// Log at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_rotating_logger::prelude::*;
/// # let logger = Logger::new();
/// use rust_rotating_logger::logf;
/// logf!(logger, LogLevel::Info, "Simple message");
/// logf!(logger, LogLevel::Error, "Error code: %d", 500);
/// ```
#[macro_export]
macro_rules! logf {
    ($logger:expr, $level:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $logger.log(
            $level,
            $fmt,
            ::std::vec![$($crate::FormatArg::from($arg)),*],
        )
    };
}

/// Log a trace-level message.
///
/// # Examples
///
/// ```
/// # use rust_rotating_logger::prelude::*;
/// # let logger = Logger::builder().level(LogLevel::Trace).build();
/// use rust_rotating_logger::tracef;
/// tracef!(logger, "Entering function: %s()", "calculate");
/// ```
#[macro_export]
macro_rules! tracef {
    ($logger:expr, $($arg:tt)+) => {
        $crate::logf!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debugf {
    ($logger:expr, $($arg:tt)+) => {
        $crate::logf!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_rotating_logger::prelude::*;
/// # let logger = Logger::new();
/// use rust_rotating_logger::infof;
/// let user_id = 42;
/// infof!(logger, "User %d performed action: %s", user_id, "login");
/// ```
#[macro_export]
macro_rules! infof {
    ($logger:expr, $($arg:tt)+) => {
        $crate::logf!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warningf {
    ($logger:expr, $($arg:tt)+) => {
        $crate::logf!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! errorf {
    ($logger:expr, $($arg:tt)+) => {
        $crate::logf!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
///
/// Only records the message; the process keeps running.
#[macro_export]
macro_rules! fatalf {
    ($logger:expr, $($arg:tt)+) => {
        $crate::logf!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
