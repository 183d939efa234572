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

//! One message as it appears in the list: collapse state and wrapped layout.

use crate::transcript::Message;
use ratatui::text::{Line, Text};
use ratatui::widgets::{Paragraph, Wrap};

/// Content longer than this many characters gets the collapsed presentation.
pub const LONG_CONTENT_THRESHOLD: usize = 500;
/// Height cap of a collapsed item: header, body rows and the toggle hint.
pub const COLLAPSED_HEIGHT: usize = 10;
pub const COLLAPSED_BODY_ROWS: usize = COLLAPSED_HEIGHT - 2;
/// Bottom body rows dimmed while collapsed.
pub const FADE_ROWS: usize = 2;
/// Columns reserved left of the body for role and selection marks.
pub const GUTTER_WIDTH: u16 = 2;

/// Turns message content into unwrapped styled lines.
pub trait ContentRenderer {
    fn render(&self, content: &str) -> Vec<Line<'static>>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseState {
    Expanded,
    Collapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleDirection {
    Collapse,
    Expand,
}

/// Wrapped body for one content width.
struct LayoutCache {
    width: u16,
    body: Paragraph<'static>,
    body_rows: usize,
}

pub struct MessageItem {
    message: Message,
    state: CollapseState,
    long: bool,
    cache: Option<LayoutCache>,
}

impl MessageItem {
    #[must_use]
    pub fn new(message: Message, default_collapsed: bool) -> Self {
        let long = message.char_len() > LONG_CONTENT_THRESHOLD;
        let state =
            if long && default_collapsed { CollapseState::Collapsed } else { CollapseState::Expanded };
        Self { message, state, long, cache: None }
    }

    #[must_use]
    pub fn message(&self) -> &Message {
        &self.message
    }

    #[must_use]
    pub fn is_long(&self) -> bool {
        self.long
    }

    #[must_use]
    pub fn state(&self) -> CollapseState {
        self.state
    }

    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.state == CollapseState::Collapsed
    }

    /// Flip between collapsed and expanded. Short content has nothing to
    /// toggle and returns `None`.
    pub fn toggle(&mut self) -> Option<ToggleDirection> {
        if !self.long {
            return None;
        }
        let (state, direction) = match self.state {
            CollapseState::Expanded => (CollapseState::Collapsed, ToggleDirection::Collapse),
            CollapseState::Collapsed => (CollapseState::Expanded, ToggleDirection::Expand),
        };
        self.state = state;
        Some(direction)
    }

    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    fn ensure_layout(&mut self, width: u16, renderer: &dyn ContentRenderer) -> &LayoutCache {
        let content_width = width.saturating_sub(GUTTER_WIDTH).max(1);
        if self.cache.as_ref().is_some_and(|cache| cache.width != content_width) {
            self.cache = None;
        }
        let content = &self.message.content;
        self.cache.get_or_insert_with(|| {
            let body = Paragraph::new(Text::from(renderer.render(content)))
                .wrap(Wrap { trim: false });
            let body_rows = body.line_count(content_width);
            LayoutCache { width: content_width, body, body_rows }
        })
    }

    /// Wrapped body height for a slot `width` columns wide, hidden rows included.
    pub fn body_rows(&mut self, width: u16, renderer: &dyn ContentRenderer) -> usize {
        self.ensure_layout(width, renderer).body_rows
    }

    /// Body rows shown in the current state.
    pub fn visible_body_rows(&mut self, width: u16, renderer: &dyn ContentRenderer) -> usize {
        let rows = self.body_rows(width, renderer);
        if self.is_collapsed() { rows.min(COLLAPSED_BODY_ROWS) } else { rows }
    }

    /// Rows hidden by the collapsed presentation.
    pub fn hidden_rows(&mut self, width: u16, renderer: &dyn ContentRenderer) -> usize {
        if !self.is_collapsed() {
            return 0;
        }
        self.body_rows(width, renderer).saturating_sub(COLLAPSED_BODY_ROWS)
    }

    /// True rendered height: header, visible body and, for long content, the
    /// toggle hint row.
    pub fn height(&mut self, width: u16, renderer: &dyn ContentRenderer) -> usize {
        1 + self.visible_body_rows(width, renderer) + usize::from(self.long)
    }

    /// Wrapped body paragraph, laid out for `width`.
    pub fn body(&mut self, width: u16, renderer: &dyn ContentRenderer) -> &Paragraph<'static> {
        &self.ensure_layout(width, renderer).body
    }
}
