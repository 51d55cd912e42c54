//! Property-based tests for rust_tree_logger using proptest

use parking_lot::Mutex;
use proptest::prelude::*;
use rust_tree_logger::prelude::*;
use rust_tree_logger::Axis;
use std::io::{self, Write};
use std::sync::Arc;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop::sample::select(LogLevel::ALL.to_vec())
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Test that LogLevel string conversions roundtrip correctly
    #[test]
    fn test_log_level_str_roundtrip(level in any_level(), lower in any::<bool>()) {
        let text = if lower { level.to_str().to_lowercase() } else { level.to_str().to_string() };
        let parsed: LogLevel = text.parse().unwrap();
        prop_assert_eq!(level, parsed);
        prop_assert_eq!(level.to_string(), level.to_str());
    }

    /// Ordering follows the numeric severity index
    #[test]
    fn test_log_level_ordering(level1 in any_level(), level2 in any_level()) {
        prop_assert_eq!(level1 <= level2, level1.index() <= level2.index());
        prop_assert_eq!(level1.cmp(&level2), (level1 as u8).cmp(&(level2 as u8)));
    }

    /// A threshold enables exactly the levels at least as severe as itself
    #[test]
    fn test_threshold_enables_prefix(threshold in any_level(), level in any_level()) {
        let logger = Logger::builder().level(threshold).exit_on_fatal(false).build();
        prop_assert_eq!(logger.is_enabled(level), level.index() <= threshold.index());
    }
}

// ============================================================================
// Tree Tests
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    SetRoot(LogLevel),
    SetChild(LogLevel),
    SetGrandchild(LogLevel),
}

fn any_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any_level().prop_map(Op::SetRoot),
        any_level().prop_map(Op::SetChild),
        any_level().prop_map(Op::SetGrandchild),
    ]
}

proptest! {
    /// A node that set its level keeps the value it last set; any other node
    /// shows the latest value set by one of its ancestors.
    #[test]
    fn test_detach_invariant(ops in prop::collection::vec(any_op(), 0..30)) {
        let root = Logger::builder().exit_on_fatal(false).build();
        let child = root.new_child("child");
        let grandchild = child.new_child("grandchild");

        let mut child_own = None;
        let mut grandchild_own = None;
        let mut from_ancestors = root.level();
        for op in &ops {
            match *op {
                Op::SetRoot(level) => {
                    root.set_level(level);
                    from_ancestors = level;
                }
                Op::SetChild(level) => {
                    child.set_level(level);
                    child_own = Some(level);
                    from_ancestors = level;
                }
                Op::SetGrandchild(level) => {
                    grandchild.set_level(level);
                    grandchild_own = Some(level);
                }
            }
        }

        match child_own {
            Some(level) => prop_assert_eq!(child.level(), level),
            None => prop_assert_eq!(child.level(), root.level()),
        }
        match grandchild_own {
            Some(level) => prop_assert_eq!(grandchild.level(), level),
            None => prop_assert_eq!(grandchild.level(), from_ancestors),
        }
        prop_assert_eq!(child.snapshot().is_detached(Axis::Level), child_own.is_some());
    }
}

// ============================================================================
// AsyncWriter Tests
// ============================================================================

#[derive(Clone, Default)]
struct Shared(Arc<Mutex<Vec<u8>>>);

impl Write for Shared {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Bytes reach the sink in write order whatever the buffer size
    #[test]
    fn test_async_writer_preserves_order(
        size in 1usize..256,
        chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..300), 0..40),
    ) {
        let sink = Shared::default();
        let mut writer = AsyncWriter::new(sink.clone(), size).unwrap();

        let mut expected = Vec::new();
        for chunk in &chunks {
            prop_assert_eq!(writer.write(chunk).unwrap(), chunk.len());
            expected.extend_from_slice(chunk);
            prop_assert!(writer.buffered() <= size);
        }
        writer.flush().unwrap();

        prop_assert_eq!(&*sink.0.lock(), &expected);
        prop_assert_eq!(writer.available(), size);
    }

    /// A limiter never grants more than its burst at a single instant
    #[test]
    fn test_rate_limiter_burst_bound(burst in 1u32..50, attempts in 0usize..200) {
        let limiter = RateLimiter::new(0.01, burst).unwrap();
        let granted = (0..attempts).filter(|_| limiter.try_acquire()).count();
        prop_assert_eq!(granted, attempts.min(burst as usize));
    }
}
