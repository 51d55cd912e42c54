//! Caller resolution
//!
//! Every emission knows its direct call site through `#[track_caller]`. A
//! logger with a non-zero call depth attributes records to a frame further
//! out instead, found by walking the stack from the direct call site.

use std::borrow::Cow;
use std::panic::Location;
use std::path::{Path, PathBuf};

/// Source position a record is attributed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    file: Cow<'static, str>,
    line: u32,
}

impl CallSite {
    pub fn new(file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

impl From<&'static Location<'static>> for CallSite {
    fn from(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }
}

/// Resolve the frame `depth` levels above the direct call site.
///
/// Falls back to `direct` when the stack carries no line information for it
/// or is shallower than `depth`.
pub fn resolve(direct: &'static Location<'static>, depth: usize) -> CallSite {
    if depth == 0 {
        return direct.into();
    }

    let mut frames: Vec<(PathBuf, u32)> = Vec::new();
    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if let (Some(file), Some(line)) = (symbol.filename(), symbol.lineno()) {
                frames.push((file.to_path_buf(), line));
            }
        });
        true
    });

    frames
        .iter()
        .position(|(file, line)| *line == direct.line() && same_file(file, direct.file()))
        .and_then(|caller| frames.get(caller + depth))
        .map(|(file, line)| CallSite::new(file.to_string_lossy().into_owned(), *line))
        .unwrap_or_else(|| direct.into())
}

// Debug info carries absolute paths; `Location` is relative to the crate.
fn same_file(resolved: &Path, location_file: &str) -> bool {
    resolved.ends_with(location_file)
}
