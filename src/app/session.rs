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

//! Opening transcripts and switching between them.

use super::state::{App, NoticeKind};
use crate::clipboard::ClipboardSink;
use crate::config::{ConfigOverrides, ViewerConfig};
use crate::error::AppError;
use crate::list::{ListOptions, MessageList};
use crate::transcript::{Message, load_transcript};
use std::path::PathBuf;
use std::time::Instant;

fn build_list(messages: Vec<Message>, config: ViewerConfig) -> MessageList {
    let options =
        ListOptions { default_collapsed: config.default_collapsed, show_index: config.show_index };
    MessageList::new(messages, options, crate::ui::renderer_for(config.render_markdown))
}

/// Load the first transcript and build the app around it. Failing to load it
/// is fatal; later switches only raise a notice.
pub fn create_app(
    sessions: Vec<PathBuf>,
    config_path: Option<PathBuf>,
    overrides: ConfigOverrides,
    clipboard: Box<dyn ClipboardSink>,
) -> Result<App, AppError> {
    let first = sessions.first().ok_or(AppError::NoTranscripts)?;
    let transcript = load_transcript(first).map_err(|err| AppError::from(&err))?;
    let config = ViewerConfig::load(config_path.as_deref(), overrides);
    tracing::debug!(?config, "viewer config");
    Ok(App {
        sessions,
        current: 0,
        title: transcript.title,
        list: build_list(transcript.messages, config),
        config,
        config_path,
        overrides,
        toc: None,
        notice: None,
        clipboard,
        should_quit: false,
        rendered_list_area: ratatui::layout::Rect::default(),
    })
}

impl App {
    /// Move `step` transcripts forward or back, wrapping around.
    pub fn switch_session(&mut self, step: isize, now: Instant) {
        let count = self.sessions.len();
        if count < 2 {
            self.notify("Only one transcript open", NoticeKind::Info, now);
            return;
        }
        let next = (self.current.cast_signed() + step).rem_euclid(count.cast_signed()).cast_unsigned();
        self.open_session(next, now);
    }

    /// Replace the list with the transcript at `index`. On failure the
    /// current list stays as it is.
    pub fn open_session(&mut self, index: usize, now: Instant) -> bool {
        let Some(path) = self.sessions.get(index) else {
            return false;
        };
        let transcript = match load_transcript(path) {
            Ok(transcript) => transcript,
            Err(err) => {
                tracing::warn!(path = %path.display(), "transcript switch failed: {err}");
                let message = AppError::from(&err).user_message();
                self.notify(message, NoticeKind::Error, now);
                return false;
            }
        };

        self.list.teardown();
        self.config = ViewerConfig::load(self.config_path.as_deref(), self.overrides);
        self.list = build_list(transcript.messages, self.config);
        self.current = index;
        self.toc = None;
        self.title = transcript.title;
        let text = format!("Opened {} ({} messages)", self.title, self.list.len());
        self.notify(text, NoticeKind::Info, now);
        true
    }

    /// Flip between markdown and verbatim rendering for the open transcript.
    pub fn toggle_render_mode(&mut self, now: Instant) {
        self.config.render_markdown = !self.config.render_markdown;
        self.list.set_renderer(crate::ui::renderer_for(self.config.render_markdown));
        let mode = self.list.renderer_name();
        self.notify(format!("Rendering: {mode}"), NoticeKind::Info, now);
    }
}
