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

mod layout;
mod list;
mod markdown;
pub mod theme;
mod toc;
mod verbatim;

pub use list::draw_list;
pub use markdown::MarkdownRenderer;
pub use verbatim::RawRenderer;

use crate::app::{App, NoticeKind};
use crate::list::ContentRenderer;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

const HEADER_PAD: u16 = 1;

/// Content renderer for the configured mode.
pub fn renderer_for(markdown: bool) -> Box<dyn ContentRenderer> {
    if markdown { Box::new(MarkdownRenderer::default()) } else { Box::new(RawRenderer) }
}

pub fn render(frame: &mut Frame, app: &mut App) {
    let areas = layout::compute(frame.area());

    if areas.header.height > 0 {
        render_header(frame, areas.header, app);
        render_separator(frame, areas.header_sep);
    }

    list::render(frame, areas.body, app);

    if areas.footer.height > 0 {
        render_separator(frame, areas.footer_sep);
        render_footer(frame, areas.footer, app);
    }

    if let Some(toc) = &app.toc {
        toc::render(frame, areas.body, toc);
    }
}

fn padded(area: Rect) -> Rect {
    Rect {
        x: area.x + HEADER_PAD,
        width: area.width.saturating_sub(HEADER_PAD * 2),
        ..area
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let sep = Span::styled("  \u{2502}  ", Style::default().fg(theme::DIM));
    let mut spans = vec![Span::styled(
        app.title.clone(),
        Style::default().fg(theme::RUST_ORANGE).add_modifier(Modifier::BOLD),
    )];
    if app.sessions.len() > 1 {
        spans.push(Span::styled(
            format!(" [{}/{}]", app.current + 1, app.sessions.len()),
            Style::default().fg(theme::DIM),
        ));
    }
    spans.extend([
        sep.clone(),
        Span::raw(format!("{} messages", app.list.len())),
        sep,
        Span::styled(app.list.renderer_name(), Style::default().fg(theme::DIM)),
    ]);
    frame.render_widget(Paragraph::new(Line::from(spans)), padded(area));
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let line = if let Some(notice) = &app.notice {
        let color = match notice.kind {
            NoticeKind::Info => theme::NOTICE_INFO,
            NoticeKind::Error => theme::NOTICE_ERROR,
        };
        Line::from(Span::styled(notice.text.clone(), Style::default().fg(color)))
    } else {
        let hints = [
            ("j/k", "scroll"),
            ("n/p", "select"),
            ("Enter", "expand/collapse"),
            ("t", "contents"),
            ("c", "copy"),
            ("m", "markdown/raw"),
            ("[/]", "transcript"),
            ("q", "quit"),
        ];
        let mut spans = Vec::new();
        for (key, label) in hints {
            spans.push(Span::styled(key, Style::default().fg(ratatui::style::Color::White)));
            spans.push(Span::styled(format!(" {label}  "), Style::default().fg(theme::DIM)));
        }
        Line::from(spans)
    };
    frame.render_widget(Paragraph::new(line), padded(area));
}

fn render_separator(frame: &mut Frame, area: Rect) {
    if area.height == 0 {
        return;
    }
    let sep_str = theme::SEPARATOR_CHAR.repeat(usize::from(area.width));
    let line = Line::from(Span::styled(sep_str, Style::default().fg(theme::DIM)));
    frame.render_widget(Paragraph::new(line), area);
}
