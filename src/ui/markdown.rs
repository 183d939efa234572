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

//! Markdown content renderer backed by `tui-markdown`.

use crate::list::ContentRenderer;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use std::panic::{self, AssertUnwindSafe};

/// Renders message content as markdown. Falls back to plain text when the
/// markdown renderer panics on odd input.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownRenderer {
    pub bg: Option<Color>,
}

impl ContentRenderer for MarkdownRenderer {
    fn render(&self, content: &str) -> Vec<Line<'static>> {
        render_markdown_safe(content, self.bg)
    }

    fn name(&self) -> &'static str {
        "markdown"
    }
}

pub(super) fn render_markdown_safe(text: &str, bg: Option<Color>) -> Vec<Line<'static>> {
    render_markdown_safe_with(text, bg, render_with_tui_markdown)
}

fn render_markdown_safe_with<F>(text: &str, bg: Option<Color>, renderer: F) -> Vec<Line<'static>>
where
    F: FnOnce(&str, Option<Color>) -> Vec<Line<'static>>,
{
    if let Ok(lines) = panic::catch_unwind(AssertUnwindSafe(|| renderer(text, bg))) {
        lines
    } else {
        tracing::warn!("tui-markdown panic; falling back to plain-text rendering");
        plain_text_fallback(text, bg)
    }
}

fn render_with_tui_markdown(text: &str, bg: Option<Color>) -> Vec<Line<'static>> {
    let rendered = tui_markdown::from_str(text);
    rendered
        .lines
        .into_iter()
        .map(|line| {
            let owned_spans: Vec<Span<'static>> = line
                .spans
                .into_iter()
                .map(|span| {
                    let style = bg.map_or(span.style, |bg_color| span.style.bg(bg_color));
                    Span::styled(span.content.into_owned(), style)
                })
                .collect();
            let line_style = bg.map_or(line.style, |bg_color| line.style.bg(bg_color));
            Line::from(owned_spans).style(line_style)
        })
        .collect()
}

fn plain_text_fallback(text: &str, bg: Option<Color>) -> Vec<Line<'static>> {
    let style = bg.map_or_else(Style::default, |bg_color| Style::default().bg(bg_color));
    text.split('\n').map(|line| Line::from(Span::styled(line.to_owned(), style))).collect()
}
