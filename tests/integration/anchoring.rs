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

// Scroll anchoring across collapse, expand and relayout.

use pretty_assertions::assert_eq;
use transcript_view::list::{Align, COLLAPSED_HEIGHT, CollapseState, ToggleDirection};
use transcript_view::ui::RawRenderer;

use crate::helpers::{list_of, screen_top, settle};

const WIDTH: u16 = 42;

#[test]
fn expanding_in_a_long_transcript_keeps_the_reading_position() {
    let mut list = list_of(&[600; 500], true);
    settle(&mut list, WIDTH, 170);
    assert!(list.item(0).unwrap().is_collapsed());

    list.scroll_to_index(245, Align::Start);
    settle(&mut list, WIDTH, 170);
    let visible: Vec<usize> = list.window().visible().map(|item| item.index).collect();
    assert_eq!(visible.first(), Some(&245));
    assert!(visible.contains(&260));

    let top_245 = list.item_offset(245).unwrap();
    let scroll = list.scroll_offset();
    let total = list.total_extent();
    assert_eq!(list.item_height(250), Some(COLLAPSED_HEIGHT));

    assert_eq!(list.toggle(250), Some(ToggleDirection::Expand));
    settle(&mut list, WIDTH, 170);

    let expanded = list.item_height(250).unwrap();
    assert_eq!(expanded, 1 + 15 + 1);
    assert_eq!(list.item_offset(245), Some(top_245));
    assert_eq!(list.scroll_offset(), scroll);
    assert_eq!(list.total_extent(), total + expanded - COLLAPSED_HEIGHT);
}

#[test]
fn collapse_then_expand_in_one_settle_window_has_no_drift() {
    let mut list = list_of(&[600; 30], false);
    settle(&mut list, WIDTH, 40);
    list.scroll_to_index(10, Align::Start);
    settle(&mut list, WIDTH, 40);
    let scroll = list.scroll_offset();
    let corrections = list.corrections();

    assert_eq!(list.toggle(12), Some(ToggleDirection::Collapse));
    list.layout_pass(WIDTH, 40);
    assert_eq!(list.toggle(12), Some(ToggleDirection::Expand));
    settle(&mut list, WIDTH, 40);

    assert_eq!(list.item(12).unwrap().state(), CollapseState::Expanded);
    assert_eq!(list.scroll_offset(), scroll);
    assert_eq!(list.corrections(), corrections + 1);
}

#[test]
fn back_to_back_toggles_without_a_pass_have_no_drift() {
    let mut list = list_of(&[600; 30], false);
    settle(&mut list, WIDTH, 40);
    list.scroll_to_index(10, Align::Start);
    settle(&mut list, WIDTH, 40);
    let scroll = list.scroll_offset();

    list.toggle(11);
    list.toggle(11);
    settle(&mut list, WIDTH, 40);
    assert_eq!(list.scroll_offset(), scroll);
}

#[test]
fn expand_then_collapse_in_one_settle_window_has_no_drift() {
    let mut list = list_of(&[600; 30], true);
    settle(&mut list, WIDTH, 40);
    list.scroll_to_index(10, Align::Start);
    settle(&mut list, WIDTH, 40);
    let scroll = list.scroll_offset();
    let total = list.total_extent();

    assert_eq!(list.toggle(11), Some(ToggleDirection::Expand));
    list.layout_pass(WIDTH, 40);
    assert_eq!(list.toggle(11), Some(ToggleDirection::Collapse));
    settle(&mut list, WIDTH, 40);

    assert_eq!(list.scroll_offset(), scroll);
    assert_eq!(list.total_extent(), total);
}

#[test]
fn collapsing_the_middle_item_when_everything_fits_keeps_the_first_in_place() {
    let mut list = list_of(&[10, 600, 10], false);
    settle(&mut list, WIDTH, 100);
    let a_top = screen_top(&mut list, 0);

    assert_eq!(list.toggle(1), Some(ToggleDirection::Collapse));
    settle(&mut list, WIDTH, 100);

    assert_eq!(screen_top(&mut list, 0), a_top);
    assert_eq!(list.item_height(1), Some(COLLAPSED_HEIGHT));
}

#[test]
fn collapsing_a_scrolled_item_pins_its_bottom_edge() {
    let mut list = list_of(&[10, 10, 10, 600, 10], false);
    settle(&mut list, WIDTH, 10);
    // Item 3 spans rows 9..26; End alignment puts its bottom on the viewport bottom.
    assert_eq!(list.scroll_to_index(3, Align::End), Some(16));
    settle(&mut list, WIDTH, 10);
    let first_top = screen_top(&mut list, 0);
    let bottom = screen_top(&mut list, 3) + 17;
    assert_eq!(bottom, 10);

    assert_eq!(list.toggle(3), Some(ToggleDirection::Collapse));
    settle(&mut list, WIDTH, 10);

    let collapsed = i64::try_from(COLLAPSED_HEIGHT).unwrap();
    assert_eq!(screen_top(&mut list, 3) + collapsed, bottom);
    // Content above moves down on screen by the height the item gave up.
    assert_eq!(screen_top(&mut list, 0) - first_top, 17 - collapsed);
    assert_eq!(list.scroll_offset(), 9);
}

#[test]
fn toggling_during_a_smooth_scroll_keeps_the_requested_distance() {
    let mut list = list_of(&[600; 40], true);
    settle(&mut list, WIDTH, 40);
    let above = screen_top(&mut list, 2);

    list.scroll_by(20);
    list.layout_pass(WIDTH, 40);
    assert_eq!(list.scroll_offset(), 10);
    let last_visible = list.window().visible().last().map(|item| item.index).unwrap();
    assert_eq!(last_visible, 4);

    assert_eq!(list.toggle(last_visible), Some(ToggleDirection::Expand));
    settle(&mut list, WIDTH, 40);

    assert_eq!(list.item_height(last_visible), Some(17));
    assert_eq!(list.scroll_target(), 20);
    assert_eq!(list.scroll_offset(), 20);
    assert_eq!(screen_top(&mut list, 2), above - 20);
}

#[test]
fn expanding_the_middle_item_pushes_only_what_follows() {
    let mut list = list_of(&[10, 600, 10], true);
    settle(&mut list, WIDTH, 100);
    let a_top = screen_top(&mut list, 0);
    let c_top = screen_top(&mut list, 2);
    let b_before = list.item_height(1).unwrap();

    assert_eq!(list.toggle(1), Some(ToggleDirection::Expand));
    settle(&mut list, WIDTH, 100);

    let b_after = list.item_height(1).unwrap();
    assert_eq!(screen_top(&mut list, 0), a_top);
    assert_eq!(screen_top(&mut list, 2) - c_top, i64::try_from(b_after - b_before).unwrap());
}

#[test]
fn scroll_to_any_index_in_ten_thousand_items_mounts_it() {
    let lens: Vec<usize> = (0..10_000).map(|i| (i % 7) * 120 + 20).collect();
    let mut list = list_of(&lens, true);
    settle(&mut list, 60, 40);

    for (target, align) in [
        (9_999, Align::Start),
        (5_000, Align::Center),
        (123, Align::End),
        (7_777, Align::Auto),
        (0, Align::Start),
    ] {
        list.scroll_to_index(target, align);
        settle(&mut list, 60, 40);
        assert!(list.window().contains(target), "{target} not mounted");
        assert!(
            list.window().visible().any(|item| item.index == target),
            "{target} not visible"
        );
    }
}

#[test]
fn teardown_with_a_pending_correction_freezes_the_offset() {
    let mut list = list_of(&[600; 40], false);
    settle(&mut list, WIDTH, 40);
    list.scroll_to_index(20, Align::Start);
    settle(&mut list, WIDTH, 40);
    let corrections = list.corrections();

    list.toggle(21);
    list.layout_pass(WIDTH, 40);
    list.teardown();
    let offset = list.scroll_offset();
    for _ in 0..5 {
        list.layout_pass(WIDTH, 40);
    }

    assert_eq!(list.scroll_offset(), offset);
    assert_eq!(list.corrections(), corrections);
    assert_eq!(list.toggle(22), None);
    assert!(list.is_settled());
}

#[test]
fn width_change_keeps_the_first_visible_item_on_top() {
    let mut list = list_of(&[600; 200], true);
    settle(&mut list, WIDTH, 40);
    list.scroll_to_index(50, Align::Start);
    settle(&mut list, WIDTH, 40);
    assert_eq!(screen_top(&mut list, 50), 0);

    settle(&mut list, 90, 40);
    assert_eq!(list.window().visible().next().map(|item| item.index), Some(50));
    assert_eq!(screen_top(&mut list, 50), 0);
}

#[test]
fn renderer_change_keeps_the_first_visible_item_on_top() {
    let mut list = list_of(&[300; 100], true);
    settle(&mut list, WIDTH, 40);
    list.scroll_to_index(30, Align::Start);
    settle(&mut list, WIDTH, 40);

    list.set_renderer(Box::new(RawRenderer));
    settle(&mut list, WIDTH, 40);
    assert_eq!(list.renderer_name(), "raw");
    assert_eq!(screen_top(&mut list, 30), 0);
}
