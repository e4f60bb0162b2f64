//! Basic logger usage example
//!
//! Demonstrates console output, printf-style templates and level gating.
//!
//! Run with: cargo run --example basic_usage

use rust_rotating_logger::prelude::*;
use rust_rotating_logger::{debugf, errorf, fatalf, infof, tracef, warningf};

fn main() {
    println!("=== Rust Rotating Logger - Basic Usage Example ===\n");

    let logger = Logger::builder()
        .stdout(true)
        .auto_flush(true)
        .level(LogLevel::Trace)
        .build();

    println!("1. Logging at different levels:");
    tracef!(logger, "This is a trace message");
    debugf!(logger, "This is a debug message");
    infof!(logger, "This is an info message");
    warningf!(logger, "This is a warning message");
    errorf!(logger, "This is an error message");
    fatalf!(logger, "This is a fatal message (the process keeps running)");

    println!("\n2. Templates:");
    infof!(logger, "user=%s id=%05d balance=%.2f admin=%t", "alice", 42, 1234.5, false);
    infof!(logger, "hex=%#x quoted=%q", 255, "a \"b\"");
    infof!(logger, "mismatches render inline: %d %s", "abc");

    println!("\n3. Threshold INFO - trace and debug won't show:");
    logger.set_level(LogLevel::Info);
    tracef!(logger, "Trace message (hidden)");
    debugf!(logger, "Debug message (hidden)");
    infof!(logger, "Info message (visible)");

    println!("\n4. Layout toggles:");
    logger.enable_date(false);
    logger.enable_colors_on_stdout(false);
    infof!(logger, "time only, no colors");
    logger.enable_level(false);
    logger.enable_millis(false);
    infof!(logger, "no level tag, whole seconds");

    println!("\n=== Example completed successfully! ===");
}
