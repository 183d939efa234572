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

// App-level flows: startup, transcript switching, keys and a full frame.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use std::cell::RefCell;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Instant;
use transcript_view::app::{App, NoticeKind, create_app, handle_key};
use transcript_view::clipboard::{ClipboardError, ClipboardSink, MemoryClipboard};
use transcript_view::config::ConfigOverrides;
use transcript_view::error::AppError;

/// Clipboard whose contents stay readable after the app takes ownership.
#[derive(Clone, Default)]
struct SharedClipboard(Rc<RefCell<MemoryClipboard>>);

impl ClipboardSink for SharedClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.0.borrow_mut().set_text(text)
    }
}

fn write_file(path: &Path, content: &str) {
    let mut file = std::fs::File::create(path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
}

fn conversation(dir: &Path, name: &str, turns: usize) -> PathBuf {
    let path = dir.join(name);
    let mut lines = Vec::new();
    for turn in 0..turns {
        lines.push(format!(r#"{{"role":"user","content":"question {turn}","ts":1700000000}}"#));
        lines.push(format!(r#"{{"role":"assistant","content":"answer {turn}","ts":1700000060}}"#));
    }
    write_file(&path, &lines.join("\n"));
    path
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn app_with(sessions: Vec<PathBuf>, config: &Path) -> (App, SharedClipboard) {
    let clipboard = SharedClipboard::default();
    let app = create_app(
        sessions,
        Some(config.to_path_buf()),
        ConfigOverrides::default(),
        Box::new(clipboard.clone()),
    )
    .unwrap();
    (app, clipboard)
}

fn draw(terminal: &mut Terminal<TestBackend>, app: &mut App, frames: usize) {
    for _ in 0..frames {
        terminal.draw(|f| transcript_view::ui::render(f, app)).unwrap();
    }
}

fn screen_text(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

#[test]
fn startup_fails_for_a_missing_first_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("gone.jsonl");
    let result = create_app(
        vec![missing],
        None,
        ConfigOverrides::default(),
        Box::new(MemoryClipboard::default()),
    );
    let err = result.err().unwrap();
    assert!(matches!(err, AppError::TranscriptNotFound(_)));
    let empty = create_app(Vec::new(), None, ConfigOverrides::default(), Box::new(MemoryClipboard::default()));
    assert_eq!(empty.err(), Some(AppError::NoTranscripts));
}

#[test]
fn switching_rereads_the_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("settings.json");
    write_file(&config, r#"{"defaultCollapse":false}"#);
    let first = conversation(dir.path(), "first.jsonl", 2);
    let second = conversation(dir.path(), "second.jsonl", 3);
    let (mut app, _) = app_with(vec![first, second], &config);
    assert!(!app.list.options().default_collapsed);
    assert_eq!(app.title, "first");

    write_file(&config, r#"{"defaultCollapse":true,"showMessageIndex":false}"#);
    let now = Instant::now();
    app.switch_session(1, now);
    assert_eq!(app.current, 1);
    assert_eq!(app.title, "second");
    assert_eq!(app.list.len(), 6);
    assert!(app.list.options().default_collapsed);
    assert!(!app.list.options().show_index);

    // Wraps around.
    app.switch_session(1, now);
    assert_eq!(app.current, 0);
}

#[test]
fn failed_switch_keeps_the_current_list() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("settings.json");
    let good = conversation(dir.path(), "good.jsonl", 2);
    let missing = dir.path().join("missing.jsonl");
    let (mut app, _) = app_with(vec![good, missing], &config);

    app.switch_session(1, Instant::now());
    assert_eq!(app.current, 0);
    assert_eq!(app.list.len(), 4);
    assert!(!app.list.is_torn_down());
    let notice = app.notice.as_ref().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert!(notice.text.contains("missing.jsonl"));
}

#[test]
fn contents_overlay_navigates_to_the_selected_message() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("settings.json");
    let path = conversation(dir.path(), "long.jsonl", 40);
    let (mut app, _) = app_with(vec![path], &config);
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    draw(&mut terminal, &mut app, 3);

    let now = Instant::now();
    handle_key(&mut app, key(KeyCode::Char('t')), now);
    assert!(app.toc.is_some());
    handle_key(&mut app, key(KeyCode::Char('G')), now);
    handle_key(&mut app, key(KeyCode::Char('k')), now);
    handle_key(&mut app, key(KeyCode::Enter), now);
    assert!(app.toc.is_none());
    // User messages sit at even indices; the second to last one is 76.
    assert_eq!(app.list.highlighted(), Some(76));
    assert_eq!(app.list.cursor(), Some(76));

    draw(&mut terminal, &mut app, 60);
    assert!(app.list.window().visible().any(|item| item.index == 76));
    assert!(screen_text(&terminal).contains("question 38"));
}

#[test]
fn copy_and_render_mode_keys() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("settings.json");
    let path = conversation(dir.path(), "chat.jsonl", 2);
    let (mut app, clipboard) = app_with(vec![path], &config);
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    draw(&mut terminal, &mut app, 3);

    let now = Instant::now();
    handle_key(&mut app, key(KeyCode::Char('n')), now);
    handle_key(&mut app, key(KeyCode::Char('n')), now);
    handle_key(&mut app, key(KeyCode::Char('c')), now);
    assert_eq!(clipboard.0.borrow().contents.as_deref(), Some("answer 0"));
    assert_eq!(app.notice.as_ref().map(|n| n.text.as_str()), Some("Copied message #2"));

    assert_eq!(app.list.renderer_name(), "markdown");
    handle_key(&mut app, key(KeyCode::Char('m')), now);
    assert_eq!(app.list.renderer_name(), "raw");
    assert!(!app.config.render_markdown);

    handle_key(&mut app, key(KeyCode::Char('q')), now);
    assert!(app.should_quit);
}

#[test]
fn full_frame_shows_header_items_and_footer() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("settings.json");
    let path = conversation(dir.path(), "frame.jsonl", 2);
    let (mut app, _) = app_with(vec![path], &config);
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    draw(&mut terminal, &mut app, 5);

    let text = screen_text(&terminal);
    assert!(text.contains("frame"));
    assert!(text.contains("#1"));
    assert!(text.contains("User"));
    assert!(text.contains("question 0"));
    assert!(text.contains("answer 1"));
    assert!(text.contains("quit"));
    assert!(app.list.is_settled());
}

#[test]
fn notices_expire() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("settings.json");
    let path = conversation(dir.path(), "one.jsonl", 1);
    let (mut app, _) = app_with(vec![path], &config);
    let now = Instant::now();
    app.switch_session(1, now);
    assert!(app.notice.is_some());
    app.tick(now + transcript_view::app::NOTICE_DURATION);
    assert!(app.notice.is_none());
}
