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

use crate::clipboard::ClipboardSink;
use crate::config::{ConfigOverrides, ViewerConfig};
use crate::list::MessageList;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use super::toc::TocState;

/// How long a status-line notice stays up.
pub const NOTICE_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    pub deadline: Instant,
}

pub struct App {
    /// Transcript files given on the command line, in order.
    pub sessions: Vec<PathBuf>,
    /// Index into `sessions` of the transcript on screen.
    pub current: usize,
    pub title: String,
    pub list: MessageList,
    pub config: ViewerConfig,
    /// Explicit `--config` path; `None` reads the default location.
    pub config_path: Option<PathBuf>,
    pub overrides: ConfigOverrides,
    /// Table-of-contents overlay, open when `Some`.
    pub toc: Option<TocState>,
    pub notice: Option<Notice>,
    pub clipboard: Box<dyn ClipboardSink>,
    pub should_quit: bool,
    /// Area the list was drawn into last frame (for mouse mapping).
    pub rendered_list_area: ratatui::layout::Rect,
}

impl App {
    pub fn notify(&mut self, text: impl Into<String>, kind: NoticeKind, now: Instant) {
        let text = text.into();
        match kind {
            NoticeKind::Info => tracing::info!(notice = %text),
            NoticeKind::Error => tracing::warn!(notice = %text),
        }
        self.notice = Some(Notice { text, kind, deadline: now + NOTICE_DURATION });
    }

    /// Expire timed state: the list highlight and the notice.
    pub fn tick(&mut self, now: Instant) {
        self.list.tick(now);
        if self.notice.as_ref().is_some_and(|notice| now >= notice.deadline) {
            self.notice = None;
        }
    }

    /// Item the keyboard acts on: the cursor, else the first visible item.
    #[must_use]
    pub fn focused_item(&self) -> Option<usize> {
        self.list
            .cursor()
            .or_else(|| self.list.window().visible().next().map(|item| item.index))
    }
}
