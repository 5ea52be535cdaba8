//! Session log parser
//!
//! One JSON object per line. Only `timestamp` and `message.usage` matter here;
//! every other field is ignored.

use crate::TokenBreakdown;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct LogRecord {
    timestamp: Option<String>,
    message: Option<MessageField>,
}

/// `message` is an object on exchanges but can be a plain string on other record kinds.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessageField {
    Object { usage: Option<LogUsage> },
    #[allow(dead_code)]
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize)]
struct LogUsage {
    input_tokens: Option<u64>,
    output_tokens: Option<u64>,
    cache_creation_input_tokens: Option<u64>,
    cache_read_input_tokens: Option<u64>,
}

/// A successfully parsed log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// `None` when the record has no usable timestamp
    pub timestamp: Option<DateTime<Utc>>,
    pub tokens: TokenBreakdown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionLog {
    pub entries: Vec<LogEntry>,
    pub malformed_lines: usize,
}

/// Parse one line. Returns `None` if the line is not a JSON object.
pub fn parse_line(line: &str) -> Option<LogEntry> {
    let mut bytes = line.as_bytes().to_vec();
    let record: LogRecord = simd_json::from_slice(&mut bytes).ok()?;

    let tokens = match record.message {
        Some(MessageField::Object { usage: Some(usage) }) => TokenBreakdown {
            input: usage.input_tokens.unwrap_or(0),
            output: usage.output_tokens.unwrap_or(0),
            cache_write: usage.cache_creation_input_tokens.unwrap_or(0),
            cache_read: usage.cache_read_input_tokens.unwrap_or(0),
        },
        _ => TokenBreakdown::default(),
    };

    Some(LogEntry {
        timestamp: record.timestamp.as_deref().and_then(parse_timestamp),
        tokens,
    })
}

/// Parse every non-empty line of a log, counting the ones that fail.
pub fn parse_session_str(content: &str) -> SessionLog {
    parse_session_bytes(content.as_bytes())
}

/// Like [`parse_session_str`], but a line that is not valid UTF-8 only
/// counts as malformed instead of discarding the whole log.
pub fn parse_session_bytes(content: &[u8]) -> SessionLog {
    let mut log = SessionLog::default();

    for raw in content.split(|&b| b == b'\n') {
        let trimmed = match std::str::from_utf8(raw) {
            Ok(line) => line.trim(),
            Err(_) => {
                log.malformed_lines += 1;
                continue;
            }
        };
        if trimmed.is_empty() {
            continue;
        }

        match parse_line(trimmed) {
            Some(entry) => log.entries.push(entry),
            None => log.malformed_lines += 1,
        }
    }

    log
}

pub fn parse_session_file(path: &Path) -> std::io::Result<SessionLog> {
    let content = std::fs::read(path)?;
    Ok(parse_session_bytes(&content))
}

/// RFC 3339, or a zone-less ISO date-time taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
