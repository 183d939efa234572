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

//! Table of contents: one entry per user message.

use crate::transcript::{Message, Role};

/// Characters of message text shown per entry.
pub const PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub index: usize,
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocState {
    pub entries: Vec<TocEntry>,
    pub selected: usize,
}

impl TocState {
    /// `None` when the transcript has no user messages.
    pub fn build<'a>(messages: impl IntoIterator<Item = &'a Message>, cursor: Option<usize>) -> Option<Self> {
        let entries: Vec<TocEntry> = messages
            .into_iter()
            .filter(|message| message.role == Role::User)
            .map(|message| TocEntry { index: message.index, preview: preview(&message.content) })
            .collect();
        if entries.is_empty() {
            return None;
        }
        // Preselect the last user message at or above the cursor.
        let selected = cursor
            .and_then(|cursor| entries.iter().rposition(|entry| entry.index <= cursor))
            .unwrap_or(0);
        Some(Self { entries, selected })
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.entries.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.entries.len().saturating_sub(1);
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.entries.get(self.selected).map(|entry| entry.index)
    }
}

/// Content with whitespace collapsed, cut at
/// [`PREVIEW_CHARS`] with a trailing `...`.
#[must_use]
pub fn preview(content: &str) -> String {
    let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= PREVIEW_CHARS {
        return flat;
    }
    let mut cut: String = flat.chars().take(PREVIEW_CHARS).collect();
    cut.push_str("...");
    cut
}
