//! File rotation example
//!
//! Writes enough lines to rotate a small log file several times, with and
//! without gzip compression, then lists the resulting files.
//!
//! Run with: cargo run --example file_rotation

use rust_rotating_logger::infof;
use rust_rotating_logger::prelude::*;
use std::fs;
use std::path::Path;

fn list(dir: &Path) -> std::io::Result<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.filter_map(|e| e.ok()).collect();
    entries.sort_by_key(|e| e.file_name());
    for entry in entries {
        println!(
            "   {:<20} {:>6} bytes",
            entry.file_name().to_string_lossy(),
            entry.metadata()?.len()
        );
    }
    Ok(())
}

fn main() -> std::io::Result<()> {
    println!("=== Rust Rotating Logger - File Rotation Example ===\n");

    let dir = std::env::temp_dir().join("rust_rotating_logger_demo");
    if dir.exists() {
        fs::remove_dir_all(&dir)?;
    }
    fs::create_dir_all(&dir)?;
    let log_path = dir.join("app.log");

    let logger = Logger::builder()
        .file(&log_path)
        .max_file_size(1024)
        .max_num_files(4)
        .level(LogLevel::Debug)
        .auto_flush(true)
        .build();

    println!("1. Plain rotation at 1 KiB, keeping 4 files:");
    for i in 0..60 {
        infof!(logger, "request %d served in %dms", i, (i * 7) % 40);
    }
    list(&dir)?;

    println!("\n2. Compressed rotation:");
    logger.enable_compression(true);
    for i in 60..120 {
        infof!(logger, "request %d served in %dms", i, (i * 7) % 40);
    }
    list(&dir)?;

    let metrics = logger.metrics();
    println!(
        "\nLogged: {}, dropped: {}, rotations: {}",
        metrics.total_logged(),
        metrics.dropped_count(),
        metrics.rotations()
    );
    println!("Files are in {}", dir.display());

    Ok(())
}
