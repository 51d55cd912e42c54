//! File logging example
//!
//! Demonstrates plain and rotating file appenders routed by level.
//!
//! Run with: cargo run --example file_logging

use rust_tree_logger::appenders::{FileAppender, RotatingFileAppender, RotationPolicy};
use rust_tree_logger::prelude::*;
use std::fs;
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Rust Tree Logger - File Logging Example ===\n");

    let dir = std::env::temp_dir().join("rust_tree_logger_demo");
    let all_path = dir.join("app.log");
    let error_path = dir.join("errors.log");

    let root = Logger::builder()
        .name("app")
        .format("%F %T [%l] %m")
        .appender(Arc::new(RotatingFileAppender::new(
            &all_path,
            RotationPolicy::new().with_max_size(4 * 1024).with_max_backups(3),
        )?))
        .appender_for(
            Arc::new(FileAppender::new(&error_path)?),
            &[LogLevel::Error, LogLevel::Fatal],
        )
        .format_for("%F %T [%l] %c:%L %m", &[LogLevel::Error, LogLevel::Fatal])
        .exit_on_fatal(false)
        .build();

    let jobs = root.new_child("jobs");
    for i in 0..200 {
        jobs.info(format_args!("processed job {}", i));
        if i % 50 == 0 {
            jobs.error(format_args!("job {} needed a retry", i));
        }
    }
    root.flush()?;

    println!("Files in {}:", dir.display());
    let mut names: Vec<String> = fs::read_dir(&dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    for name in names {
        println!("  {}", name);
    }

    println!("\nErrors:\n{}", fs::read_to_string(&error_path)?);
    println!("=== Example completed successfully! ===");
    Ok(())
}
