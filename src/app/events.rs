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

use super::App;
use super::keys::{handle_key, toggle_at};
use crossterm::event::{Event, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use std::time::Instant;

const MOUSE_SCROLL_LINES: isize = 3;

pub fn handle_terminal_event(app: &mut App, event: Event, now: Instant) {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key, now),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        // Resize is picked up by the next layout pass
        _ => {}
    }
}

fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if app.toc.is_some() {
        return;
    }
    match mouse.kind {
        MouseEventKind::ScrollUp => app.list.scroll_by(-MOUSE_SCROLL_LINES),
        MouseEventKind::ScrollDown => app.list.scroll_by(MOUSE_SCROLL_LINES),
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(index) = clicked_toggle_row(app, mouse) {
                toggle_at(app, index);
            }
        }
        _ => {}
    }
}

/// Item whose header or toggle hint row sits under the mouse.
fn clicked_toggle_row(app: &App, mouse: MouseEvent) -> Option<usize> {
    let area = app.rendered_list_area;
    if mouse.column < area.x
        || mouse.column >= area.right()
        || mouse.row < area.y
        || mouse.row >= area.bottom()
    {
        return None;
    }
    let (index, row) = app.list.item_at_row(usize::from(mouse.row - area.y))?;
    let height = app.list.item_height(index)?;
    let is_hint = app.list.item(index).is_some_and(|item| item.is_long()) && row + 1 == height;
    (row == 0 || is_hint).then_some(index)
}
