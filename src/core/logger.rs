//! Hierarchical logger implementation
//!
//! Loggers form a tree. Every node publishes its configuration as an
//! immutable [`Snapshot`] behind an [`ArcSwap`]; emission loads it once and
//! never takes a lock. Mutators serialise per tree, publish a modified copy
//! and then cascade the same edit to the node's children, skipping any child
//! that has detached the edited axis. A cascade completes before the next
//! mutation of the same tree starts, so children see edits in the order their
//! parent did.

use super::{
    appender::Appender,
    caller,
    config::LoggerConfig,
    error::{LoggerError, Result},
    log_level::LogLevel,
    metrics::LoggerMetrics,
    pattern::{self, DEFAULT_FORMAT},
    rate_limit::RateLimiter,
    record::Record,
    snapshot::{Axis, Snapshot},
};
use arc_swap::ArcSwap;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{self, AssertUnwindSafe, Location};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

/// Level of a freshly built root logger
pub const DEFAULT_LEVEL: LogLevel = LogLevel::Debug;

/// Process exit status after a FATAL record when exit-on-fatal is enabled
pub const FATAL_EXIT_CODE: i32 = 255;

/// Callback invoked with every appender failure on a logger tree
pub type ErrorCallback = Arc<dyn Fn(&LoggerError) + Send + Sync>;

/// How a cascade treats the subtree below a node that detached the axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadePolicy {
    /// The detached node keeps its value; its descendants are still updated
    /// subject to their own detach flags.
    #[default]
    VisitDescendants,

    /// The detached node and its whole subtree keep their values.
    StopAtDetached,
}

/// State shared by every node of one tree.
struct Tree {
    /// Held for a whole update-plus-cascade and for derivation; readers
    /// never take it.
    mutation: Mutex<()>,
    exit_on_fatal: AtomicBool,
    cascade: CascadePolicy,
    on_error: Option<ErrorCallback>,
}

struct Node {
    name: String,
    parent: Option<Weak<Node>>,
    children: RwLock<Vec<Arc<Node>>>,
    current: ArcSwap<Snapshot>,
    metrics: LoggerMetrics,
    tree: Arc<Tree>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Direct,
    Cascade,
}

impl Node {
    /// Apply a direct edit and cascade it under the tree's mutation lock.
    fn mutate(&self, axis: Axis, edit: &dyn Fn(&mut Snapshot)) {
        let _guard = self.tree.mutation.lock();
        self.update(axis, Origin::Direct, edit);
    }

    /// Caller holds the tree's mutation lock.
    fn update(&self, axis: Axis, origin: Origin, edit: &dyn Fn(&mut Snapshot)) {
        let current = self.current.load_full();
        let skipped = origin == Origin::Cascade && current.is_detached(axis);
        if !skipped {
            let mut next = Snapshot::clone(&current);
            edit(&mut next);
            if origin == Origin::Direct {
                next.detached.insert(axis);
            }
            self.current.store(Arc::new(next));
        }

        if skipped && self.tree.cascade == CascadePolicy::StopAtDetached {
            return;
        }

        // The child list is copied so the read lock is not held across the recursion.
        let children = self.children.read().clone();
        for child in children {
            child.update(axis, Origin::Cascade, edit);
        }
    }

    fn report(&self, appender: &str, err: LoggerError) {
        let previous = self.metrics.record_sink_error();
        match &self.tree.on_error {
            Some(callback) => callback(&err),
            None => {
                if previous == 0 || (previous + 1) % 1000 == 0 {
                    eprintln!(
                        "[LOGGER ERROR] Appender '{}' on logger '{}' failed: {} ({} failures)",
                        appender,
                        self.name,
                        err,
                        previous + 1
                    );
                }
            }
        }
    }
}

/// Handle to one node of a logger tree.
///
/// Cloning a `Logger` yields another handle to the same node.
///
/// # Example
///
/// ```
/// use rust_tree_logger::prelude::*;
/// use std::sync::Arc;
///
/// let memory = Arc::new(MemoryAppender::new());
/// let root = Logger::builder()
///     .level(LogLevel::Info)
///     .format("[%l] %m")
///     .appender(memory.clone())
///     .exit_on_fatal(false)
///     .build();
///
/// let db = root.new_child("db");
/// db.set_level(LogLevel::Trace);
/// db.trace("connected");
/// root.debug("filtered out");
///
/// assert_eq!(memory.lines(), vec!["[TRACE] connected\n".to_string()]);
/// ```
#[derive(Clone)]
pub struct Logger {
    node: Arc<Node>,
}

impl Logger {
    /// Create a builder for an isolated root logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Derive a child that starts with a copy of this logger's current
    /// configuration. Nothing on the child is detached yet.
    pub fn new_child(&self, name: impl Into<String>) -> Logger {
        let parent = &self.node;
        // Held while copying and registering so a concurrent cascade either
        // shows up in the copy or finds the child in the list.
        let _guard = parent.tree.mutation.lock();
        let snapshot = parent.current.load().derive();

        let child = Arc::new(Node {
            name: name.into(),
            parent: Some(Arc::downgrade(parent)),
            children: RwLock::new(Vec::new()),
            current: ArcSwap::from_pointee(snapshot),
            metrics: LoggerMetrics::new(),
            tree: Arc::clone(&parent.tree),
        });
        parent.children.write().push(Arc::clone(&child));

        Logger { node: child }
    }

    pub fn name(&self) -> &str {
        &self.node.name
    }

    pub fn parent(&self) -> Option<Logger> {
        self.node
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|node| Logger { node })
    }

    pub fn children(&self) -> Vec<Logger> {
        self.node
            .children
            .read()
            .iter()
            .map(|node| Logger {
                node: Arc::clone(node),
            })
            .collect()
    }

    /// The currently published configuration
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.node.current.load_full()
    }

    pub fn level(&self) -> LogLevel {
        self.node.current.load().level()
    }

    pub fn call_depth(&self) -> usize {
        self.node.current.load().call_depth()
    }

    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.node.current.load().is_enabled(level)
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.is_enabled(LogLevel::Debug)
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.node.metrics
    }

    pub fn exit_on_fatal(&self) -> bool {
        self.node.tree.exit_on_fatal.load(Ordering::Relaxed)
    }

    /// Toggle process termination after FATAL records for the whole tree
    pub fn set_exit_on_fatal(&self, enabled: bool) {
        self.node.tree.exit_on_fatal.store(enabled, Ordering::Relaxed);
    }

    pub fn cascade_policy(&self) -> CascadePolicy {
        self.node.tree.cascade
    }

    pub fn set_level(&self, level: LogLevel) {
        self.node.mutate(Axis::Level, &|s| s.level = level);
    }

    pub fn set_call_depth(&self, depth: usize) {
        self.node.mutate(Axis::CallDepth, &|s| s.call_depth = depth);
    }

    /// Route `levels` (all levels when empty) to `appender`
    pub fn set_appender(&self, appender: Arc<dyn Appender>, levels: &[LogLevel]) {
        let appender = Some(appender);
        self.node.mutate(Axis::Route, &|s| {
            s.set_routes(appender.clone(), levels)
        });
    }

    /// Route `levels` (all levels when empty) nowhere; records are dropped
    pub fn remove_appender(&self, levels: &[LogLevel]) {
        self.node.mutate(Axis::Route, &|s| s.set_routes(None, levels));
    }

    /// Render `levels` (all levels when empty) with `pattern`
    pub fn set_format(&self, pattern: &str, levels: &[LogLevel]) {
        let pattern: Arc<str> = Arc::from(pattern);
        self.node.mutate(Axis::Format, &|s| {
            s.set_formats(&pattern, levels)
        });
    }

    /// Throttle `levels` (all levels when empty) through `limiter`
    ///
    /// Levels given the same limiter share its tokens.
    pub fn set_rate_limit(&self, limiter: Arc<RateLimiter>, levels: &[LogLevel]) {
        let limiter = Some(limiter);
        self.node.mutate(Axis::RateLimit, &|s| {
            s.set_rate_limits(limiter.clone(), levels)
        });
    }

    pub fn clear_rate_limit(&self, levels: &[LogLevel]) {
        self.node.mutate(Axis::RateLimit, &|s| {
            s.set_rate_limits(None, levels)
        });
    }

    /// Emit a record at `level`.
    ///
    /// Never fails: disabled levels, missing routes, empty token buckets and
    /// appender failures all drop the record. A FATAL record terminates the
    /// process afterwards when exit-on-fatal is enabled for the tree.
    #[track_caller]
    pub fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        let snapshot = self.node.current.load();
        if !snapshot.is_enabled(level) {
            return;
        }

        self.emit(&snapshot, level, args, Location::caller());

        if level == LogLevel::Fatal && self.exit_on_fatal() {
            terminate(&snapshot);
        }
    }

    fn emit(
        &self,
        snapshot: &Snapshot,
        level: LogLevel,
        args: fmt::Arguments<'_>,
        location: &'static Location<'static>,
    ) {
        let node = &self.node;
        let Some(appender) = snapshot.route(level) else {
            node.metrics.record_unrouted();
            return;
        };

        if let Some(limiter) = snapshot.rate_limit(level) {
            if !limiter.try_acquire() {
                node.metrics.record_rate_limited();
                return;
            }
        }

        let record = Record::new(level, &node.name, args)
            .with_caller(caller::resolve(location, snapshot.call_depth()));
        let line = pattern::render(snapshot.format(level).unwrap_or(DEFAULT_FORMAT), &record);

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            appender.output(level, record.timestamp, line.as_bytes())
        }));
        match result {
            Ok(Ok(())) => {
                node.metrics.record_logged();
            }
            Ok(Err(e)) => node.report(appender.name(), e),
            Err(panic_info) => {
                let message = panic_message(&*panic_info);
                node.report(appender.name(), LoggerError::other(format!("appender panicked: {}", message)));
            }
        }
    }

    #[inline]
    #[track_caller]
    pub fn fatal(&self, message: impl fmt::Display) {
        self.log(LogLevel::Fatal, format_args!("{}", message));
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(LogLevel::Error, format_args!("{}", message));
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl fmt::Display) {
        self.log(LogLevel::Warn, format_args!("{}", message));
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(LogLevel::Info, format_args!("{}", message));
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(LogLevel::Debug, format_args!("{}", message));
    }

    #[inline]
    #[track_caller]
    pub fn trace(&self, message: impl fmt::Display) {
        self.log(LogLevel::Trace, format_args!("{}", message));
    }

    /// Flush every distinct appender this logger routes to.
    ///
    /// All appenders are attempted; the first failure is returned.
    pub fn flush(&self) -> Result<()> {
        let mut first_err = None;
        for appender in self.snapshot().distinct_appenders() {
            if let Err(e) = appender.flush() {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.node.name)
            .field("snapshot", &**self.node.current.load())
            .finish()
    }
}

fn terminate(snapshot: &Snapshot) -> ! {
    for appender in snapshot.distinct_appenders() {
        if let Err(e) = appender.flush() {
            eprintln!(
                "[LOGGER ERROR] Failed to flush appender '{}' before exit: {}",
                appender.name(),
                e
            );
        }
    }
    std::process::exit(FATAL_EXIT_CODE)
}

fn panic_message(panic_info: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Builder for an isolated root logger
///
/// # Example
/// ```
/// use rust_tree_logger::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .name("app")
///     .level(LogLevel::Info)
///     .format("%F %T [%l] %m")
///     .format_for("%F %T [%l] %c:%L %m", &[LogLevel::Error, LogLevel::Fatal])
///     .appender(Arc::new(ConsoleAppender::new()))
///     .rate_limit(Arc::new(RateLimiter::per_second(10)), &[LogLevel::Error])
///     .exit_on_fatal(false)
///     .build();
/// assert_eq!(logger.level(), LogLevel::Info);
/// ```
pub struct LoggerBuilder {
    name: String,
    snapshot: Snapshot,
    exit_on_fatal: bool,
    cascade: CascadePolicy,
    on_error: Option<ErrorCallback>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        let mut snapshot = Snapshot::new(DEFAULT_LEVEL);
        snapshot.set_formats(&Arc::from(DEFAULT_FORMAT), &[]);
        Self {
            name: String::new(),
            snapshot,
            exit_on_fatal: true,
            cascade: CascadePolicy::default(),
            on_error: None,
        }
    }

    /// Start from a loaded configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if a rate limit is invalid.
    pub fn from_config(config: &LoggerConfig) -> Result<Self> {
        let mut builder = Self::new()
            .name(config.name.clone())
            .level(config.level)
            .call_depth(config.call_depth)
            .format(&config.format)
            .exit_on_fatal(config.exit_on_fatal)
            .cascade_policy(config.cascade);

        for (level, pattern) in &config.formats {
            builder = builder.format_for(pattern, &[*level]);
        }
        for (level, limit) in &config.rate_limits {
            let limiter = RateLimiter::new(limit.per_second, limit.burst)?;
            builder = builder.rate_limit(Arc::new(limiter), &[*level]);
        }
        Ok(builder)
    }

    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.snapshot.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn call_depth(mut self, depth: usize) -> Self {
        self.snapshot.call_depth = depth;
        self
    }

    /// Pattern for every level
    #[must_use = "builder methods return a new value"]
    pub fn format(self, pattern: &str) -> Self {
        self.format_for(pattern, &[])
    }

    #[must_use = "builder methods return a new value"]
    pub fn format_for(mut self, pattern: &str, levels: &[LogLevel]) -> Self {
        self.snapshot.set_formats(&Arc::from(pattern), levels);
        self
    }

    /// Appender for every level
    #[must_use = "builder methods return a new value"]
    pub fn appender(self, appender: Arc<dyn Appender>) -> Self {
        self.appender_for(appender, &[])
    }

    #[must_use = "builder methods return a new value"]
    pub fn appender_for(mut self, appender: Arc<dyn Appender>, levels: &[LogLevel]) -> Self {
        self.snapshot.set_routes(Some(appender), levels);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn rate_limit(mut self, limiter: Arc<RateLimiter>, levels: &[LogLevel]) -> Self {
        self.snapshot.set_rate_limits(Some(limiter), levels);
        self
    }

    /// Terminate the process after FATAL records (default: enabled)
    #[must_use = "builder methods return a new value"]
    pub fn exit_on_fatal(mut self, enabled: bool) -> Self {
        self.exit_on_fatal = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn cascade_policy(mut self, policy: CascadePolicy) -> Self {
        self.cascade = policy;
        self
    }

    /// Receive appender failures instead of the default stderr report
    #[must_use = "builder methods return a new value"]
    pub fn on_error(mut self, callback: ErrorCallback) -> Self {
        self.on_error = Some(callback);
        self
    }

    /// Build a new root logger
    pub fn build(self) -> Logger {
        let tree = Arc::new(Tree {
            mutation: Mutex::new(()),
            exit_on_fatal: AtomicBool::new(self.exit_on_fatal),
            cascade: self.cascade,
            on_error: self.on_error,
        });

        Logger {
            node: Arc::new(Node {
                name: self.name,
                parent: None,
                children: RwLock::new(Vec::new()),
                current: ArcSwap::from_pointee(self.snapshot),
                metrics: LoggerMetrics::new(),
                tree,
            }),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
