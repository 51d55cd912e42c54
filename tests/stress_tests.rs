//! Stress tests for concurrent configuration and output
//!
//! These tests verify:
//! - Emitting threads never observe a half-applied configuration change
//! - Concurrent cascades and derivations leave every node consistent
//! - Many threads can share one async appender without losing or
//!   interleaving lines

use rust_tree_logger::appenders::{AsyncAppender, MemoryAppender};
use rust_tree_logger::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

/// Readers racing a mutator must only ever render one of the published
/// patterns. Route and format are separate publications, so any pairing of
/// the two is fine.
#[test]
fn test_emission_sees_consistent_snapshots() {
    let left = Arc::new(MemoryAppender::new());
    let right = Arc::new(MemoryAppender::new());
    let root = Logger::builder()
        .level(LogLevel::Info)
        .format("left %m")
        .appender(left.clone())
        .exit_on_fatal(false)
        .build();
    let child = root.new_child("reader");

    let stop = Arc::new(AtomicBool::new(false));
    let writer = {
        let root = root.clone();
        let (left, right) = (left.clone(), right.clone());
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut flip = false;
            while !stop.load(Ordering::Relaxed) {
                if flip {
                    root.set_format("left %m", &[]);
                    root.set_appender(left.clone(), &[]);
                } else {
                    root.set_format("right %m", &[]);
                    root.set_appender(right.clone(), &[]);
                }
                flip = !flip;
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let child = child.clone();
            thread::spawn(move || {
                for i in 0..2_000 {
                    child.info(i);
                }
            })
        })
        .collect();

    for reader in readers {
        reader.join().expect("reader panicked");
    }
    stop.store(true, Ordering::Relaxed);
    writer.join().expect("writer panicked");

    let lines: Vec<String> = left.lines().into_iter().chain(right.lines()).collect();
    assert_eq!(lines.len(), 8_000);
    for line in lines {
        assert!(
            line.starts_with("left ") || line.starts_with("right "),
            "torn line: {line:?}"
        );
    }
}

#[test]
fn test_concurrent_cascades_converge() {
    let root = Logger::builder().exit_on_fatal(false).build();
    let children: Vec<Logger> = (0..8).map(|i| root.new_child(format!("c{i}"))).collect();
    let grandchildren: Vec<Logger> = children
        .iter()
        .flat_map(|c| (0..8).map(move |i| c.new_child(format!("g{i}"))))
        .collect();

    let barrier = Arc::new(Barrier::new(5));
    let mut handles = Vec::new();
    for t in 0..4 {
        let root = root.clone();
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for i in 0..200 {
                let level = LogLevel::ALL[(t + i) % LogLevel::ALL.len()];
                root.set_level(level);
                root.set_format(&format!("{t}-{i} %m"), &[]);
            }
        }));
    }

    // derive while cascades are running
    let late = {
        let root = root.clone();
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            (0..50).map(|i| root.new_child(format!("late{i}"))).collect::<Vec<_>>()
        })
    };

    for handle in handles {
        handle.join().expect("mutator panicked");
    }
    let late = late.join().expect("deriver panicked");

    // One final change must reach every node, including late children.
    root.set_level(LogLevel::Warn);
    root.set_format("final %m", &[]);
    for node in children.iter().chain(&grandchildren).chain(&late) {
        assert_eq!(node.level(), LogLevel::Warn, "node {}", node.name());
        assert_eq!(node.snapshot().format(LogLevel::Warn), Some("final %m"));
    }
    assert_eq!(root.children().len(), 8 + 50);
}

#[test]
fn test_shared_async_appender_under_load() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("stress.log");
    let file = fs::File::create(&log_file).unwrap();

    let appender = Arc::new(AsyncAppender::with_buffer_size(file, 512).unwrap());
    let root = Logger::builder()
        .level(LogLevel::Trace)
        .format("%N %m")
        .appender(appender.clone())
        .exit_on_fatal(false)
        .build();

    const THREADS: usize = 8;
    const PER_THREAD: usize = 2_000;

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = root.new_child(format!("t{t}"));
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger.debug(i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("logging thread panicked");
    }
    root.flush().unwrap();

    let content = fs::read_to_string(&log_file).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), THREADS * PER_THREAD);

    let unique: HashSet<&str> = lines.iter().copied().collect();
    assert_eq!(unique.len(), lines.len());

    // per-thread order is preserved
    for t in 0..THREADS {
        let prefix = format!("t{t} ");
        let seen: Vec<usize> = lines
            .iter()
            .filter_map(|l| l.strip_prefix(prefix.as_str()))
            .map(|n| n.parse().unwrap())
            .collect();
        assert_eq!(seen, (0..PER_THREAD).collect::<Vec<_>>());
    }
}

#[test]
fn test_rate_limited_level_under_contention() {
    let memory = Arc::new(MemoryAppender::new());
    let root = Logger::builder()
        .appender(memory.clone())
        .rate_limit(Arc::new(RateLimiter::new(0.01, 100).unwrap()), &[LogLevel::Error])
        .exit_on_fatal(false)
        .build();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let root = root.clone();
            thread::spawn(move || {
                for _ in 0..1_000 {
                    root.error("limited");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("logging thread panicked");
    }

    assert_eq!(memory.len(), 100);
    assert_eq!(root.metrics().rate_limited(), 8_000 - 100);
}
