//! Appender implementations

pub mod async_appender;
pub mod console;
pub mod file;
pub mod memory;
pub mod rotating_file;

pub use async_appender::AsyncAppender;
pub use console::ConsoleAppender;
pub use file::FileAppender;
pub use memory::MemoryAppender;
pub use rotating_file::{RotatingFile, RotatingFileAppender, RotationPolicy, RotationStrategy};

pub use crate::core::Appender;
