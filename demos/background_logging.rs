//! Background logging example
//!
//! Emits from several threads without blocking on I/O, then drains the
//! background cycles with a bounded flush.
//!
//! Run with: cargo run --example background_logging

use rust_rotating_logger::prelude::*;
use rust_rotating_logger::{global, infof, warningf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn main() {
    println!("=== Rust Rotating Logger - Background Logging Example ===\n");

    let log_path = std::env::temp_dir().join("rust_rotating_logger_background.log");
    let logger = Arc::new(
        Logger::builder()
            .file(&log_path)
            .max_file_size(256 * 1024)
            .max_num_files(3)
            .flush_timing(Duration::from_millis(10), 200)
            .build(),
    );

    println!("1. Emitting from 4 threads:");
    let start = Instant::now();
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..100 {
                    infof!(logger, "worker %d step %d", worker, i);
                }
                warningf!(logger, "worker %d done", worker);
            })
        })
        .collect();
    for handle in handles {
        if handle.join().is_err() {
            eprintln!("worker panicked");
        }
    }
    println!("   emitted in {:?}, {} cycles in flight", start.elapsed(), logger.in_flight());

    println!("\n2. Flushing:");
    let drained = logger.flush();
    println!("   drained: {} after {:?}", drained, start.elapsed());

    let metrics = logger.metrics();
    println!(
        "   logged: {}, background: {}, inline fallbacks: {}, dropped: {}",
        metrics.total_logged(),
        metrics.background_dispatched(),
        metrics.inline_fallbacks(),
        metrics.dropped_count()
    );
    println!("   log file: {}", log_path.display());

    println!("\n3. Default instance:");
    global::info("the default logger writes to stdout", vec![]);
    global::set_level(LogLevel::Debug);
    global::debug("debug is now visible: %t", vec![true.into()]);
    global::flush();

    println!("\n=== Example completed successfully! ===");
}
