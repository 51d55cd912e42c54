//! `%`-directive pattern rendering
//!
//! A pattern such as `%F %T [%l] %m` is interpreted at emission time against a
//! [`Record`]. Rendering is best-effort: unknown directives are dropped, and
//! the output always ends with exactly the newline the pattern produced or one
//! appended by the renderer.
//!
//! | Directive | Output |
//! |---|---|
//! | `%m` | the formatted message |
//! | `%l` | the level name |
//! | `%N` | the logger name |
//! | `%C` | caller file, full path |
//! | `%c` | caller file, base name |
//! | `%L` | caller line |
//! | `%%` | `%` |
//! | `%n` | newline |
//! | `%F` | date, `2006-01-02` |
//! | `%D` | date, `01/02/06` |
//! | `%T` | time, `15:04:05` |
//! | `%d` | RFC 3339 with local offset |
//! | `%a` / `%A` | short / full weekday |
//! | `%b` / `%B` | short / full month |

use super::record::Record;
use chrono::SecondsFormat;
use std::fmt::Write;
use std::path::Path;

/// Pattern installed on a fresh root logger.
pub const DEFAULT_FORMAT: &str = "%F %T [%l] %m";

/// Render `pattern` for `record`, appending to `out`.
pub fn render_into(pattern: &str, record: &Record<'_>, out: &mut String) {
    let start = out.len();
    let mut rest = pattern;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let mut tail = rest[pos + 1..].chars();
        let Some(directive) = tail.next() else {
            // trailing lone '%'
            rest = "";
            break;
        };
        rest = tail.as_str();

        // fmt::Write for String is infallible
        let _ = match directive {
            'm' => out.write_fmt(record.args),
            'l' => out.write_str(record.level.to_str()),
            'N' => out.write_str(record.logger),
            'C' => out.write_str(record.file()),
            'c' => out.write_str(base_name(record.file())),
            'L' => write!(out, "{}", record.line()),
            '%' => out.write_char('%'),
            'n' => out.write_char('\n'),
            'F' => write!(out, "{}", record.timestamp.format("%Y-%m-%d")),
            'D' => write!(out, "{}", record.timestamp.format("%m/%d/%y")),
            'T' => write!(out, "{}", record.timestamp.format("%H:%M:%S")),
            'd' => out.write_str(&record.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)),
            'a' => write!(out, "{}", record.timestamp.format("%a")),
            'A' => write!(out, "{}", record.timestamp.format("%A")),
            'b' => write!(out, "{}", record.timestamp.format("%b")),
            'B' => write!(out, "{}", record.timestamp.format("%B")),
            _ => Ok(()),
        };
    }
    out.push_str(rest);

    if out.len() == start || !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Render `pattern` for `record` into a fresh line.
pub fn render(pattern: &str, record: &Record<'_>) -> String {
    let mut out = String::with_capacity(256);
    render_into(pattern, record, &mut out);
    out
}

fn base_name(file: &str) -> &str {
    Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::LogLevel;
    use chrono::{Local, TimeZone};

    fn fixed_record(args: std::fmt::Arguments<'_>) -> Record<'_> {
        let ts = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 3).unwrap();
        Record::new(LogLevel::Warn, "db", args).with_timestamp(ts)
    }

    #[test]
    fn test_default_format() {
        let line = render(DEFAULT_FORMAT, &fixed_record(format_args!("disk {}%", 93)));
        assert_eq!(line, "2024-03-09 07:05:03 [WARN] disk 93%\n");
    }

    #[test]
    fn test_date_and_name_directives() {
        let line = render("%D|%a|%A|%b|%B|%N", &fixed_record(format_args!("")));
        assert_eq!(line, "03/09/24|Sat|Saturday|Mar|March|db\n");
    }

    #[test]
    fn test_rfc3339_directive() {
        let line = render("%d", &fixed_record(format_args!("")));
        assert!(line.starts_with("2024-03-09T07:05:03"), "got {line:?}");
    }

    #[test]
    fn test_unknown_directive_dropped() {
        let line = render("a%qb%", &fixed_record(format_args!("")));
        assert_eq!(line, "ab\n");
    }

    #[test]
    fn test_literal_percent_and_newline() {
        let line = render("100%% done%n", &fixed_record(format_args!("")));
        assert_eq!(line, "100% done\n");
    }

    #[test]
    fn test_empty_pattern_still_terminated() {
        assert_eq!(render("", &fixed_record(format_args!("x"))), "\n");
    }

    #[test]
    fn test_caller_directives() {
        let line = render("%C|%c:%L", &fixed_record(format_args!("")));
        let (full, rest) = line.trim_end().split_once('|').unwrap();
        assert!(full.ends_with("pattern.rs"));
        let (short, number) = rest.split_once(':').unwrap();
        assert_eq!(short, "pattern.rs");
        assert!(number.parse::<u32>().unwrap() > 0);
    }

    #[test]
    fn test_multibyte_text_preserved() {
        let line = render("→ %m ←", &fixed_record(format_args!("héllo")));
        assert_eq!(line, "→ héllo ←\n");
    }
}
