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

// Table-of-contents navigation, highlight timing and clipboard copy.

use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};
use transcript_view::clipboard::{ClipboardError, ClipboardSink, MemoryClipboard};
use transcript_view::list::HIGHLIGHT_DURATION;

use crate::helpers::{list_of, settle};

const WIDTH: u16 = 50;
const HEIGHT: u16 = 30;

fn lens() -> Vec<usize> {
    (0..300).map(|i| (i % 5) * 150 + 30).collect()
}

#[test]
fn navigate_centers_and_highlights_the_target() {
    let mut list = list_of(&lens(), true);
    settle(&mut list, WIDTH, HEIGHT);
    let now = Instant::now();

    assert!(list.navigate_to(200, now));
    assert_eq!(list.cursor(), Some(200));
    settle(&mut list, WIDTH, HEIGHT);

    assert!(list.window().visible().any(|item| item.index == 200));
    let top = list.item_offset(200).unwrap();
    let height = list.item_height(200).unwrap();
    let expected = top + height / 2 - usize::from(HEIGHT) / 2;
    assert_eq!(list.scroll_offset(), expected);
    assert_eq!(list.highlighted(), Some(200));
}

#[test]
fn highlight_clears_after_its_duration() {
    let mut list = list_of(&lens(), true);
    settle(&mut list, WIDTH, HEIGHT);
    let now = Instant::now();
    list.navigate_to(40, now);

    assert!(!list.tick(now + Duration::from_millis(500)));
    assert_eq!(list.highlighted(), Some(40));
    assert!(list.tick(now + HIGHLIGHT_DURATION));
    assert_eq!(list.highlighted(), None);
}

#[test]
fn second_navigation_replaces_the_first_highlight() {
    let mut list = list_of(&lens(), true);
    settle(&mut list, WIDTH, HEIGHT);
    let start = Instant::now();
    list.navigate_to(40, start);
    list.navigate_to(90, start + Duration::from_secs(1));

    // The first timer's deadline passes without clearing the second.
    assert!(!list.tick(start + HIGHLIGHT_DURATION));
    assert_eq!(list.highlighted(), Some(90));
    settle(&mut list, WIDTH, HEIGHT);
    assert!(list.window().contains(90));
}

#[test]
fn navigate_out_of_range_is_ignored() {
    let mut list = list_of(&lens(), true);
    settle(&mut list, WIDTH, HEIGHT);
    let offset = list.scroll_offset();
    assert!(!list.navigate_to(300, Instant::now()));
    assert_eq!(list.highlighted(), None);
    settle(&mut list, WIDTH, HEIGHT);
    assert_eq!(list.scroll_offset(), offset);
}

#[test]
fn teardown_releases_the_highlight() {
    let mut list = list_of(&lens(), true);
    settle(&mut list, WIDTH, HEIGHT);
    let now = Instant::now();
    list.navigate_to(120, now);
    list.layout_pass(WIDTH, HEIGHT);
    list.teardown();
    assert_eq!(list.highlighted(), None);
    assert!(!list.navigate_to(10, now));
    assert!(!list.is_active());
}

#[test]
fn copy_content_writes_the_raw_message() {
    let list = list_of(&[5, 20], true);
    let mut clipboard = MemoryClipboard::default();
    assert!(list.copy_content(1, &mut clipboard).unwrap());
    assert_eq!(clipboard.contents.as_deref(), Some("w".repeat(20).as_str()));
    assert!(!list.copy_content(7, &mut clipboard).unwrap());
}

struct BrokenClipboard;

impl ClipboardSink for BrokenClipboard {
    fn set_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable("no display".to_owned()))
    }
}

#[test]
fn copy_failure_is_returned_and_leaves_the_list_alone() {
    let mut list = list_of(&lens(), true);
    settle(&mut list, WIDTH, HEIGHT);
    list.scroll_by(12);
    settle(&mut list, WIDTH, HEIGHT);
    let offset = list.scroll_offset();

    let err = list.copy_content(3, &mut BrokenClipboard).unwrap_err();
    assert!(matches!(err, ClipboardError::Unavailable(_)));
    assert_eq!(list.scroll_offset(), offset);
    assert!(list.is_settled());
}
