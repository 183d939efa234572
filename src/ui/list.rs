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

use crate::app::App;
use crate::list::item::{FADE_ROWS, GUTTER_WIDTH};
use crate::list::{MessageItem, MessageList, VirtualItem};
use crate::transcript::format_timestamp;
use crate::ui::theme;
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Widget};

pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
    app.rendered_list_area = Rect::default();
    if area.width < 2 || area.height == 0 {
        return;
    }
    // Rightmost column is the scrollbar
    let list_area = Rect { width: area.width - 1, ..area };
    let scrollbar_area = Rect { x: area.right() - 1, width: 1, ..area };

    app.list.layout_pass(list_area.width, list_area.height);
    app.rendered_list_area = list_area;

    if app.list.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "  (no messages)",
            Style::default().fg(theme::DIM),
        )));
        frame.render_widget(empty, list_area);
        return;
    }

    draw_list(frame.buffer_mut(), list_area, &mut app.list);
    render_scrollbar(frame, scrollbar_area, &app.list);
}

/// Draw the window mounted by the last layout pass into `buf`.
pub fn draw_list(buf: &mut Buffer, area: Rect, list: &mut MessageList) {
    let window = list.window().clone();
    for slot in &window.items {
        draw_item(buf, area, list, *slot, window.scroll_offset);
    }
}

fn header_line(item: &MessageItem, show_index: bool) -> Line<'static> {
    let message = item.message();
    let dim = Style::default().fg(theme::DIM);
    let mut spans = Vec::new();
    if show_index {
        spans.push(Span::styled(format!("#{} ", message.index + 1), dim));
    }
    spans.push(Span::styled(
        message.role.label(),
        Style::default().fg(theme::role_color(message.role)).add_modifier(Modifier::BOLD),
    ));
    if let Some(tool) = &message.tool_name {
        spans.push(Span::styled(format!(" · {tool}"), dim));
    }
    if let Some(ts) = message.timestamp.and_then(format_timestamp) {
        spans.push(Span::styled(format!("  {ts}"), dim));
    }
    Line::from(spans)
}

#[allow(clippy::cast_possible_truncation)]
fn draw_item(buf: &mut Buffer, area: Rect, list: &mut MessageList, slot: VirtualItem, scroll: usize) {
    let view_bottom = scroll + usize::from(area.height);
    let Some(item) = list.item(slot.index) else {
        return;
    };
    let header = header_line(item, list.options().show_index);
    let role_color = theme::role_color(item.message().role);
    let (long, collapsed) = (item.is_long(), item.is_collapsed());
    let is_cursor = list.cursor() == Some(slot.index);
    let highlighted = list.highlighted() == Some(slot.index);
    let visible_body = list.visible_body_rows(slot.index);
    let hidden = list.hidden_rows(slot.index);
    let true_height = 1 + visible_body + usize::from(long);

    // Rows of the item to draw: inside the viewport and inside the slot the
    // virtualizer gave it this frame.
    let first = scroll.saturating_sub(slot.start);
    let last = view_bottom.saturating_sub(slot.start).min(slot.size).min(true_height);
    if first >= last {
        return;
    }
    let y_of = |row: usize| area.y + (slot.start + row - scroll) as u16;
    let content_x = area.x + GUTTER_WIDTH;
    let content_width = area.width.saturating_sub(GUTTER_WIDTH);

    if first == 0 {
        buf.set_line(content_x, y_of(0), &header, content_width);
    }

    let body_first = first.max(1);
    let body_last = last.min(1 + visible_body);
    if body_first < body_last
        && let Some(body) = list.body(slot.index)
    {
        let rect = Rect {
            x: content_x,
            y: y_of(body_first),
            width: content_width,
            height: (body_last - body_first) as u16,
        };
        let skip = u16::try_from(body_first - 1).unwrap_or(u16::MAX);
        body.clone().scroll((skip, 0)).render(rect, buf);
    }

    if collapsed && hidden > 0 {
        let fade_start = (1 + visible_body).saturating_sub(FADE_ROWS).max(1);
        let fade = Style::default().fg(theme::FADE_FG).add_modifier(Modifier::DIM);
        for row in fade_start.max(first)..(1 + visible_body).min(last) {
            buf.set_style(Rect { x: content_x, y: y_of(row), width: content_width, height: 1 }, fade);
        }
    }

    if long {
        let row = 1 + visible_body;
        if (first..last).contains(&row) {
            let text = if collapsed {
                format!("{} ({hidden} more rows)", theme::HINT_EXPAND)
            } else {
                theme::HINT_COLLAPSE.to_owned()
            };
            let hint = Line::from(Span::styled(text, Style::default().fg(theme::DIM)));
            buf.set_line(content_x, y_of(row), &hint, content_width);
        }
    }

    let gutter_style = if is_cursor {
        Style::default().fg(role_color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(role_color).add_modifier(Modifier::DIM)
    };
    let gutter_symbol = if is_cursor { theme::GUTTER_CURSOR } else { theme::GUTTER_BAR };
    for row in first..last {
        buf.set_string(area.x, y_of(row), gutter_symbol, gutter_style);
        if highlighted {
            let line = Rect { x: area.x, y: y_of(row), width: area.width, height: 1 };
            buf.set_style(line, Style::default().bg(theme::HIGHLIGHT_BG));
        }
    }
}

fn render_scrollbar(frame: &mut Frame, area: Rect, list: &MessageList) {
    let viewport = usize::from(area.height);
    let total = list.total_extent();
    if total <= viewport {
        return;
    }
    let mut state = ScrollbarState::new(total - viewport)
        .position(list.scroll_offset())
        .viewport_content_length(viewport);
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(None)
        .end_symbol(None)
        .thumb_style(Style::default().fg(theme::RUST_ORANGE))
        .track_style(Style::default().fg(theme::DIM));
    frame.render_stateful_widget(scrollbar, area, &mut state);
}
