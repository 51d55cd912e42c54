//! Async logging example
//!
//! Demonstrates the double-buffered async writer, both behind a logger and
//! used directly as an `io::Write`, including fault handling.
//!
//! Run with: cargo run --example async_logging

use rust_tree_logger::appenders::{AsyncAppender, RotatingFile, RotationPolicy};
use rust_tree_logger::prelude::*;
use std::io::{self, Write};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

struct Unplugged;

impl Write for Unplugged {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "device unplugged"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn main() -> Result<()> {
    println!("=== Rust Tree Logger - Async Logging Example ===\n");

    let path = std::env::temp_dir().join("rust_tree_logger_demo/async.log");
    let file = RotatingFile::new(&path, RotationPolicy::hourly())?;
    let appender = Arc::new(AsyncAppender::new(file)?);

    let root = Logger::builder()
        .name("async")
        .format("%F %T [%l] %N %m")
        .appender(appender.clone())
        .exit_on_fatal(false)
        .build();

    println!("1. Four threads logging through one async appender");
    let start = Instant::now();
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let logger = root.new_child(format!("worker-{}", t));
            thread::spawn(move || {
                for i in 0..10_000 {
                    rust_tree_logger::info!(logger, "message {}", i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker thread panicked");
    }
    let logged = start.elapsed();
    appender.flush_timeout(Duration::from_secs(5))?;
    println!(
        "   40000 records handed off in {:?}, on disk after {:?}",
        logged,
        start.elapsed()
    );
    println!("   Written to {}", path.display());

    println!("\n2. Sticky fault on a failing sink");
    let mut writer = AsyncWriter::new(Unplugged, 1024)?;
    writer.write(b"lost\n")?;
    if let Err(e) = writer.flush() {
        println!("   flush failed: {}", e);
    }
    if let Err(e) = writer.write(b"rejected\n") {
        println!("   later write fails with the same fault: {}", e);
    }
    writer.reset(io::stdout());
    writer.write(b"   after reset, output goes to stdout\n")?;
    writer.close()?;

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
