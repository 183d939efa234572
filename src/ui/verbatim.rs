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

//! Verbatim content renderer: text as written, ANSI colors interpreted.

use crate::list::ContentRenderer;
use ansi_to_tui::IntoText as _;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar as _;

const TAB_STOP: usize = 4;

/// Replace tabs with spaces up to the next tab stop, counting display columns.
fn expand_tabs(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut column = 0;
    for ch in content.chars() {
        match ch {
            '\t' => {
                let pad = TAB_STOP - column % TAB_STOP;
                out.extend(std::iter::repeat_n(' ', pad));
                column += pad;
            }
            '\n' => {
                out.push(ch);
                column = 0;
            }
            _ => {
                out.push(ch);
                column += ch.width().unwrap_or(0);
            }
        }
    }
    out
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RawRenderer;

impl ContentRenderer for RawRenderer {
    fn render(&self, content: &str) -> Vec<Line<'static>> {
        let content = expand_tabs(content);
        if let Ok(text) = content.as_bytes().into_text() {
            text.lines
                .into_iter()
                .map(|line| {
                    let owned: Vec<Span<'static>> = line
                        .spans
                        .into_iter()
                        .map(|s| Span::styled(s.content.into_owned(), s.style))
                        .collect();
                    Line::from(owned)
                })
                .collect()
        } else {
            content.lines().map(|l| Line::from(l.to_owned())).collect()
        }
    }

    fn name(&self) -> &'static str {
        "raw"
    }
}
