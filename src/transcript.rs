// transcript-view — A terminal viewer for long chat transcripts
// Copyright (C) 2025  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Message model and the JSON Lines transcript loader.
//!
//! Two record shapes are understood, one per line:
//! Claude Code session records (`{"type", "message": {"role", "content"}, "timestamp", "isMeta"}`)
//! and flat records (`{"role", "content", "ts", "toolName"}`). Lines that are
//! neither are skipped.

use crate::error::TranscriptError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
    Tool,
    Other,
}

impl Role {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "user" | "human" => Self::User,
            "assistant" | "model" => Self::Assistant,
            "tool" => Self::Tool,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
            Self::Tool => "Tool",
            Self::Other => "System",
        }
    }
}

/// One transcript entry. `index` is its zero-based position and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub index: usize,
    pub role: Role,
    pub content: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: Option<i64>,
    pub tool_name: Option<String>,
}

impl Message {
    #[must_use]
    pub fn new(index: usize, role: Role, content: impl Into<String>) -> Self {
        Self { index, role, content: content.into(), timestamp: None, tool_name: None }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    #[must_use]
    pub fn with_tool_name(mut self, name: impl Into<String>) -> Self {
        self.tool_name = Some(name.into());
        self
    }

    /// Content length in characters, the unit of the long-content threshold.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

#[derive(Debug, Clone)]
pub struct Transcript {
    pub path: PathBuf,
    pub title: String,
    pub messages: Vec<Message>,
}

pub fn load_transcript(path: &Path) -> Result<Transcript, TranscriptError> {
    let file = File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            TranscriptError::NotFound(path.to_path_buf())
        } else {
            TranscriptError::Io { path: path.to_path_buf(), source }
        }
    })?;
    let messages = parse_transcript(BufReader::new(file));
    let title = path.file_stem().map_or_else(
        || path.display().to_string(),
        |stem| stem.to_string_lossy().into_owned(),
    );
    tracing::info!(path = %path.display(), messages = messages.len(), "loaded transcript");
    Ok(Transcript { path: path.to_path_buf(), title, messages })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlatRecord {
    role: String,
    #[serde(default)]
    content: Value,
    #[serde(default)]
    ts: Option<Value>,
    #[serde(default)]
    tool_name: Option<String>,
}

/// Parse JSON Lines into messages, indexing them in input order.
pub fn parse_transcript(reader: impl BufRead) -> Vec<Message> {
    let mut messages = Vec::new();
    // tool_use id -> tool name, filled from assistant records
    let mut tool_names: HashMap<String, String> = HashMap::new();

    for (line_no, line) in reader.lines().enumerate() {
        // Read errors repeat forever on the same reader, so stop at the first.
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!(line_no, "transcript read stopped: {err}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let Ok(value) = serde_json::from_str::<Value>(&line) else {
            tracing::trace!(line_no, "skipping non-JSON transcript line");
            continue;
        };

        let parsed = if value.get("message").is_some() {
            parse_session_record(&value, &mut tool_names)
        } else {
            parse_flat_record(value)
        };
        let Some((role, content, timestamp, tool_name)) = parsed else {
            continue;
        };
        if content.trim().is_empty() {
            continue;
        }
        let mut message = Message::new(messages.len(), role, content);
        message.timestamp = timestamp;
        message.tool_name = tool_name;
        messages.push(message);
    }
    messages
}

type Parsed = (Role, String, Option<i64>, Option<String>);

fn parse_session_record(value: &Value, tool_names: &mut HashMap<String, String>) -> Option<Parsed> {
    if value.get("isMeta").and_then(Value::as_bool) == Some(true) {
        return None;
    }
    let message = value.get("message")?;
    let raw_role = message.get("role").and_then(Value::as_str).unwrap_or("unknown");
    let content = message.get("content");
    let blocks = content.and_then(Value::as_array);

    if raw_role == "assistant"
        && let Some(blocks) = blocks
    {
        for block in blocks.iter().filter(|b| block_type(b) == Some("tool_use")) {
            if let (Some(id), Some(name)) = (
                block.get("id").and_then(Value::as_str),
                block.get("name").and_then(Value::as_str),
            ) {
                tool_names.insert(id.to_owned(), name.to_owned());
            }
        }
    }

    let mut role = Role::parse(raw_role);
    let mut tool_name = None;
    if role == Role::User
        && let Some(blocks) = blocks
        && !blocks.is_empty()
        && blocks.iter().all(|b| block_type(b) == Some("tool_result"))
    {
        role = Role::Tool;
        tool_name = blocks
            .first()
            .and_then(|b| b.get("tool_use_id"))
            .and_then(Value::as_str)
            .and_then(|id| tool_names.get(id))
            .cloned();
    }

    let text = content.map(extract_text).unwrap_or_default();
    let timestamp = value.get("timestamp").and_then(parse_timestamp_ms);
    Some((role, text, timestamp, tool_name))
}

fn parse_flat_record(value: Value) -> Option<Parsed> {
    let record: FlatRecord = serde_json::from_value(value).ok()?;
    let timestamp = record.ts.as_ref().and_then(parse_timestamp_ms);
    Some((Role::parse(&record.role), extract_text(&record.content), timestamp, record.tool_name))
}

fn block_type(block: &Value) -> Option<&str> {
    block.get("type").and_then(Value::as_str)
}

/// Flatten message content (a string or an array of content blocks) to text.
pub fn extract_text(content: &Value) -> String {
    match content {
        Value::String(text) => text.clone(),
        Value::Array(blocks) => {
            blocks.iter().map(extract_block_text).filter(|t| !t.is_empty()).collect::<Vec<_>>().join("\n")
        }
        Value::Object(_) => extract_block_text(content),
        _ => String::new(),
    }
}

fn extract_block_text(block: &Value) -> String {
    match block {
        Value::String(text) => text.clone(),
        Value::Object(map) => match block_type(block) {
            Some("tool_use") => {
                let name = map.get("name").and_then(Value::as_str).unwrap_or("tool");
                let input = map.get("input").map(ToString::to_string).unwrap_or_default();
                format!("[{name}] {input}")
            }
            Some("tool_result") => map.get("content").map(extract_text).unwrap_or_default(),
            Some("thinking") => {
                map.get("thinking").and_then(Value::as_str).unwrap_or_default().to_owned()
            }
            _ => map.get("text").and_then(Value::as_str).unwrap_or_default().to_owned(),
        },
        _ => String::new(),
    }
}

/// Accepts RFC 3339 strings and numeric epochs. Numbers below 10^12 are
/// taken as seconds, anything larger as milliseconds.
pub fn parse_timestamp_ms(value: &Value) -> Option<i64> {
    match value {
        Value::String(raw) => {
            if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(raw) {
                return Some(parsed.timestamp_millis());
            }
            raw.trim().parse::<i64>().ok().and_then(epoch_to_ms)
        }
        Value::Number(number) => {
            let n = number.as_i64().or_else(|| {
                #[allow(clippy::cast_possible_truncation)]
                number.as_f64().map(|f| f as i64)
            })?;
            epoch_to_ms(n)
        }
        _ => None,
    }
}

/// Seconds become milliseconds; values that overflow give no timestamp.
fn epoch_to_ms(n: i64) -> Option<i64> {
    const MS_THRESHOLD: i64 = 1_000_000_000_000;
    if n < MS_THRESHOLD { n.checked_mul(1000) } else { Some(n) }
}

/// Local-time `YYYY-MM-DD HH:MM` for a header row.
#[must_use]
pub fn format_timestamp(ms: i64) -> Option<String> {
    let utc = chrono::DateTime::from_timestamp_millis(ms)?;
    Some(utc.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
}
