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
use super::state::NoticeKind;
use super::toc::TocState;
use crate::list::ToggleDirection;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

/// Rows scrolled per arrow key press.
const LINE_STEP: isize = 1;

fn is_ctrl_shortcut(modifiers: KeyModifiers) -> bool {
    modifiers.contains(KeyModifiers::CONTROL) && !modifiers.contains(KeyModifiers::ALT)
}

fn is_ctrl_char_shortcut(key: KeyEvent, expected: char) -> bool {
    is_ctrl_shortcut(key.modifiers)
        && matches!(key.code, KeyCode::Char(c) if c.eq_ignore_ascii_case(&expected))
}

pub fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    if is_ctrl_char_shortcut(key, 'c') {
        app.should_quit = true;
        return;
    }
    if app.toc.is_some() {
        handle_toc_key(app, key, now);
    } else {
        handle_list_key(app, key, now);
    }
}

fn page_rows(app: &App) -> isize {
    let rows = app.list.viewport_height().saturating_sub(2).max(1);
    isize::try_from(rows).unwrap_or(isize::MAX)
}

fn handle_list_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('j') | KeyCode::Down => app.list.scroll_by(LINE_STEP),
        KeyCode::Char('k') | KeyCode::Up => app.list.scroll_by(-LINE_STEP),
        KeyCode::PageDown => app.list.scroll_by(page_rows(app)),
        KeyCode::PageUp => app.list.scroll_by(-page_rows(app)),
        KeyCode::Char('d') if is_ctrl_shortcut(key.modifiers) => {
            app.list.scroll_by(page_rows(app) / 2);
        }
        KeyCode::Char('u') if is_ctrl_shortcut(key.modifiers) => {
            app.list.scroll_by(-page_rows(app) / 2);
        }
        KeyCode::Char('g') | KeyCode::Home => app.list.scroll_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.list.scroll_to_bottom(),
        KeyCode::Char('n') | KeyCode::Tab => app.list.move_cursor(1),
        KeyCode::Char('p') | KeyCode::BackTab => app.list.move_cursor(-1),
        KeyCode::Enter | KeyCode::Char(' ') => toggle_focused(app, now),
        KeyCode::Char('c') => copy_focused(app, now),
        KeyCode::Char('t') => open_toc(app, now),
        KeyCode::Char('m') => app.toggle_render_mode(now),
        KeyCode::Char(']') => app.switch_session(1, now),
        KeyCode::Char('[') => app.switch_session(-1, now),
        _ => {}
    }
}

fn toggle_focused(app: &mut App, now: Instant) {
    let Some(index) = app.focused_item() else {
        return;
    };
    app.list.set_cursor(index);
    if app.list.toggle(index).is_none() {
        app.notify("Message is short; nothing to expand", NoticeKind::Info, now);
    }
}

/// Toggle from a mouse click. Returns the direction when something changed.
pub(super) fn toggle_at(app: &mut App, index: usize) -> Option<ToggleDirection> {
    app.list.set_cursor(index);
    app.list.toggle(index)
}

fn copy_focused(app: &mut App, now: Instant) {
    let Some(index) = app.focused_item() else {
        return;
    };
    match app.list.copy_content(index, app.clipboard.as_mut()) {
        Ok(true) => app.notify(format!("Copied message #{}", index + 1), NoticeKind::Info, now),
        Ok(false) => {}
        Err(err) => app.notify(format!("Copy failed: {err}"), NoticeKind::Error, now),
    }
}

fn open_toc(app: &mut App, now: Instant) {
    match TocState::build(app.list.messages(), app.list.cursor()) {
        Some(toc) => app.toc = Some(toc),
        None => app.notify("No user messages to list", NoticeKind::Info, now),
    }
}

fn handle_toc_key(app: &mut App, key: KeyEvent, now: Instant) {
    let Some(toc) = app.toc.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Esc | KeyCode::Char('t' | 'q') => app.toc = None,
        KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => toc.select_next(),
        KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => toc.select_prev(),
        KeyCode::Char('g') | KeyCode::Home => toc.select_first(),
        KeyCode::Char('G') | KeyCode::End => toc.select_last(),
        KeyCode::Enter => {
            let target = toc.selected_index();
            app.toc = None;
            if let Some(index) = target {
                app.list.navigate_to(index, now);
            }
        }
        _ => {}
    }
}
