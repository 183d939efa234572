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

// Loading transcripts from disk.

use pretty_assertions::assert_eq;
use std::io::Write as _;
use transcript_view::error::{AppError, TranscriptError};
use transcript_view::transcript::{Role, load_transcript};

fn write_lines(dir: &tempfile::TempDir, name: &str, lines: &[&str]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    path
}

#[test]
fn loads_a_session_file_with_tool_calls() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_lines(
        &dir,
        "debug-session.jsonl",
        &[
            r#"{"type":"user","message":{"role":"user","content":"why does it crash?"},"timestamp":"2025-03-01T10:00:00Z"}"#,
            r#"{"type":"assistant","message":{"role":"assistant","content":[{"type":"text","text":"Let me look."},{"type":"tool_use","id":"t1","name":"Read","input":{"path":"src/main.rs"}}]}}"#,
            r#"{"type":"user","message":{"role":"user","content":[{"type":"tool_result","tool_use_id":"t1","content":"fn main() {}"}]}}"#,
            r#"{"type":"user","isMeta":true,"message":{"role":"user","content":"caveat"}}"#,
            "",
            "not json at all",
            r#"{"type":"assistant","message":{"role":"assistant","content":"Found it."}}"#,
        ],
    );

    let transcript = load_transcript(&path).unwrap();
    assert_eq!(transcript.title, "debug-session");
    let roles: Vec<Role> = transcript.messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant, Role::Tool, Role::Assistant]);

    let call = &transcript.messages[1];
    assert!(call.content.starts_with("Let me look.\n[Read] "));
    let result = &transcript.messages[2];
    assert_eq!(result.tool_name.as_deref(), Some("Read"));
    assert_eq!(result.content, "fn main() {}");
    let indices: Vec<usize> = transcript.messages.iter().map(|m| m.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);
}

#[test]
fn loads_flat_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_lines(
        &dir,
        "flat.jsonl",
        &[
            r#"{"role":"user","content":"hi","ts":1700000000}"#,
            r#"{"role":"tool","content":"ok","toolName":"Bash","ts":1700000001000}"#,
        ],
    );
    let transcript = load_transcript(&path).unwrap();
    assert_eq!(transcript.messages.len(), 2);
    assert_eq!(transcript.messages[0].timestamp, Some(1_700_000_000_000));
    assert_eq!(transcript.messages[1].timestamp, Some(1_700_000_001_000));
    assert_eq!(transcript.messages[1].tool_name.as_deref(), Some("Bash"));
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.jsonl");
    let err = load_transcript(&path).unwrap_err();
    assert!(matches!(err, TranscriptError::NotFound(ref p) if p == &path));
    let app_err = AppError::from(&err);
    assert_eq!(app_err.exit_code(), AppError::TRANSCRIPT_NOT_FOUND_EXIT_CODE);
}

#[test]
fn directory_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    // Opening succeeds on some platforms but reading a directory fails; both
    // must surface as an error or an empty transcript, never a panic.
    match load_transcript(dir.path()) {
        Ok(transcript) => assert!(transcript.messages.is_empty()),
        Err(err) => assert!(matches!(err, TranscriptError::Io { .. })),
    }
}

#[test]
fn empty_file_gives_an_empty_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_lines(&dir, "empty.jsonl", &[]);
    let transcript = load_transcript(&path).unwrap();
    assert!(transcript.messages.is_empty());
}

#[test]
fn out_of_range_timestamp_keeps_the_message() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_lines(
        &dir,
        "odd-ts.jsonl",
        &[
            r#"{"role":"user","content":"hi","ts":-9999999999999999999}"#,
            r#"{"role":"assistant","content":"hello","ts":1700000000}"#,
        ],
    );
    let transcript = load_transcript(&path).unwrap();
    assert_eq!(transcript.messages.len(), 2);
    assert_eq!(transcript.messages[0].timestamp, None);
    assert_eq!(transcript.messages[1].timestamp, Some(1_700_000_000_000));
}
