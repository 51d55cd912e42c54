//! Criterion benchmarks for rust_tree_logger

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rust_tree_logger::prelude::*;
use std::io;
use std::sync::Arc;

/// Appender that accepts and discards everything
struct Discard;

impl Appender for Discard {
    fn output(&self, _: LogLevel, _: chrono::DateTime<chrono::Local>, data: &[u8]) -> Result<()> {
        black_box(data);
        Ok(())
    }

    fn name(&self) -> &str {
        "discard"
    }
}

fn discarding_root(level: LogLevel) -> Logger {
    Logger::builder()
        .level(level)
        .appender(Arc::new(Discard))
        .exit_on_fatal(false)
        .build()
}

// ============================================================================
// Emission Benchmarks
// ============================================================================

fn bench_emission(c: &mut Criterion) {
    let mut group = c.benchmark_group("emission");
    group.throughput(Throughput::Elements(1));

    let logger = discarding_root(LogLevel::Trace).new_child("bench");

    group.bench_function("info_default_pattern", |b| {
        b.iter(|| logger.info(black_box("Info message")));
    });

    logger.set_format("%N %l %c:%L %m", &[]);
    group.bench_function("info_caller_pattern", |b| {
        b.iter(|| logger.info(black_box("Info message")));
    });

    group.bench_function("formatted_macro", |b| {
        b.iter(|| rust_tree_logger::info!(logger, "value {} of {}", black_box(7), black_box(9)));
    });

    group.finish();
}

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let logger = discarding_root(LogLevel::Warn);

    group.bench_function("filtered_out", |b| {
        b.iter(|| rust_tree_logger::debug!(logger, "hidden {}", black_box(1)));
    });

    group.bench_function("is_debug_enabled", |b| {
        b.iter(|| black_box(logger.is_debug_enabled()));
    });

    group.finish();
}

fn bench_rate_limiter(c: &mut Criterion) {
    let mut group = c.benchmark_group("rate_limiter");
    group.throughput(Throughput::Elements(1));

    let limiter = RateLimiter::per_second(1_000_000);
    group.bench_function("try_acquire", |b| {
        b.iter(|| black_box(limiter.try_acquire()));
    });

    group.finish();
}

// ============================================================================
// Configuration Benchmarks
// ============================================================================

fn bench_cascade(c: &mut Criterion) {
    let mut group = c.benchmark_group("cascade");

    for width in [1usize, 16, 128] {
        let root = discarding_root(LogLevel::Info);
        let _children: Vec<Logger> = (0..width).map(|i| root.new_child(format!("c{i}"))).collect();

        group.throughput(Throughput::Elements(width as u64 + 1));
        group.bench_function(format!("set_level_{width}_children"), |b| {
            b.iter(|| root.set_level(black_box(LogLevel::Debug)));
        });
    }

    group.finish();
}

// ============================================================================
// Async Writer Benchmarks
// ============================================================================

fn bench_async_writer(c: &mut Criterion) {
    let mut group = c.benchmark_group("async_writer");
    let line = b"2024-03-09 07:05:03 [INFO] a typical log line of moderate length\n";
    group.throughput(Throughput::Bytes(line.len() as u64));

    let mut writer = AsyncWriter::new(io::sink(), 64 * 1024).expect("writer");
    group.bench_function("write_line", |b| {
        b.iter(|| writer.write(black_box(line)).expect("write"));
    });
    writer.close().expect("close");

    let appender = Arc::new(AsyncAppender::new(io::sink()).expect("appender"));
    let logger = Logger::builder()
        .appender(appender.clone())
        .exit_on_fatal(false)
        .build();
    group.bench_function("logger_to_async_appender", |b| {
        b.iter(|| logger.info(black_box("buffered message")));
    });
    appender.close().expect("close");

    group.finish();
}

criterion_group!(
    benches,
    bench_emission,
    bench_level_filtering,
    bench_rate_limiter,
    bench_cascade,
    bench_async_writer,
);

criterion_main!(benches);
