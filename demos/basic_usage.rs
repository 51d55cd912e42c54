//! Basic logger usage example
//!
//! Demonstrates a logger tree on the console: inheritance, cascading changes
//! and per-node overrides.
//!
//! Run with: cargo run --example basic_usage

use rust_tree_logger::prelude::*;
use rust_tree_logger::{global, info, warn};
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Rust Tree Logger - Basic Usage Example ===\n");

    let root = Logger::builder()
        .name("app")
        .level(LogLevel::Trace)
        .format("%T [%l] %N: %m")
        .appender(Arc::new(ConsoleAppender::with_colors(true)))
        .exit_on_fatal(false)
        .build();

    println!("1. Logging at different levels:");
    root.trace("This is a trace message");
    root.debug("This is a debug message");
    root.info("This is an info message");
    root.warn("This is a warning message");
    root.error("This is an error message");
    root.fatal("This is a fatal message (exit disabled)");

    println!("\n2. Children inherit and follow their parent:");
    let db = root.new_child("db");
    let http = root.new_child("http");
    root.set_level(LogLevel::Info);
    db.debug("hidden: db follows the root's INFO level");
    info!(http, "listening on port {}", 8080);

    println!("\n3. A child that sets its own level keeps it:");
    db.set_level(LogLevel::Debug);
    root.set_level(LogLevel::Warn);
    db.debug("visible: db detached its level");
    http.info("hidden: http still follows the root");
    warn!(http, "{} slow requests", 3);

    println!("\n4. Per-level format with caller location:");
    root.set_format("%T [%l] %N %c:%L: %m", &[LogLevel::Error]);
    http.error("bad gateway");

    println!("\n5. Process-wide root:");
    global::set_exit_on_fatal(false);
    global::set_format("[%l] %N: %m", &[]);
    global::new("worker").info("started");

    root.flush()?;
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
