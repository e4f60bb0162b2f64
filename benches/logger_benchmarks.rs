//! Criterion benchmarks for rust_rotating_logger

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_rotating_logger::prelude::*;
use rust_rotating_logger::{sprintf, LogRecord};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

// ============================================================================
// Formatting Benchmarks
// ============================================================================

fn bench_sprintf(c: &mut Criterion) {
    let mut group = c.benchmark_group("sprintf");
    group.throughput(Throughput::Elements(1));

    group.bench_function("literal", |b| {
        b.iter(|| sprintf(black_box("server started"), &[]));
    });

    let args = [FormatArg::from("GET"), FormatArg::from("/index.html"), FormatArg::from(200)];
    group.bench_function("request_line", |b| {
        b.iter(|| sprintf(black_box("%s %s -> %d"), black_box(&args)));
    });

    let args = [FormatArg::from(1234.5678), FormatArg::from(255)];
    group.bench_function("float_and_hex", |b| {
        b.iter(|| sprintf(black_box("%8.3f %#x"), black_box(&args)));
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    group.throughput(Throughput::Elements(1));

    let record = LogRecord::new(LogLevel::Info, "id=%d user=%s", vec![7.into(), "alice".into()]);
    for format in [TimestampFormat::DateTimeMillis, TimestampFormat::Time] {
        let config = FormatterConfig::new().with_timestamp_format(format);
        group.bench_with_input(BenchmarkId::from_parameter(format.pattern()), &config, |b, config| {
            b.iter(|| black_box(config.render(black_box(&record))));
        });
    }

    group.finish();
}

// ============================================================================
// Logging Performance Benchmarks
// ============================================================================

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let logger = Logger::builder().level(LogLevel::Warning).build();

    group.bench_function("filtered_out", |b| {
        b.iter(|| logger.debug(black_box("Debug message"), vec![]));
    });

    group.bench_function("is_enabled", |b| {
        b.iter(|| black_box(logger.is_enabled(black_box(LogLevel::Info))));
    });

    group.finish();
}

fn bench_inline_file_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("inline_file_logging");
    group.throughput(Throughput::Elements(1));

    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let logger = Logger::with_file(temp_dir.path().join("plain.log"), 0, 1, LogLevel::Info);
    logger.enable_auto_flush(true);
    group.bench_function("no_rotation", |b| {
        b.iter(|| logger.info(black_box("request served in %dms"), vec![12.into()]));
    });

    let logger = Logger::with_file(temp_dir.path().join("rotating.log"), 64 * 1024, 4, LogLevel::Info);
    logger.enable_auto_flush(true);
    group.bench_function("rotating_64k", |b| {
        b.iter(|| logger.info(black_box("request served in %dms"), vec![12.into()]));
    });

    let logger = Logger::with_file(temp_dir.path().join("gz.log"), 64 * 1024, 4, LogLevel::Info);
    logger.enable_auto_flush(true);
    logger.enable_compression(true);
    group.bench_function("rotating_64k_gzip", |b| {
        b.iter(|| logger.info(black_box("request served in %dms"), vec![12.into()]));
    });

    group.finish();
}

fn bench_background_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("background_logging");
    group.sample_size(20);

    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    for batch in [10usize, 100] {
        group.throughput(Throughput::Elements(batch as u64));
        let logger = Logger::with_file(temp_dir.path().join("bg.log"), 1024 * 1024, 3, LogLevel::Info);
        group.bench_with_input(BenchmarkId::new("emit_and_flush", batch), &batch, |b, &batch| {
            b.iter(|| {
                for i in 0..batch {
                    logger.info("event %d", vec![i.into()]);
                }
                black_box(logger.flush())
            });
        });
    }

    group.finish();
}

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");
    group.sample_size(10);

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Arc::new(Logger::with_file(
        temp_dir.path().join("concurrent.log"),
        1024 * 1024,
        3,
        LogLevel::Info,
    ));
    logger.enable_auto_flush(true);

    for threads in [2usize, 4] {
        group.throughput(Throughput::Elements((threads * 100) as u64));
        group.bench_with_input(BenchmarkId::new("inline", threads), &threads, |b, &threads| {
            b.iter(|| {
                thread::scope(|scope| {
                    for t in 0..threads {
                        let logger = Arc::clone(&logger);
                        scope.spawn(move || {
                            for i in 0..100 {
                                logger.info("t=%d i=%d", vec![t.into(), i.into()]);
                            }
                        });
                    }
                });
            });
        });
    }

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_sprintf,
    bench_render,
    bench_level_filtering,
    bench_inline_file_logging,
    bench_background_logging,
    bench_concurrent_logging
);

criterion_main!(benches);
