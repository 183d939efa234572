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

use crate::app::TocState;
use crate::ui::{layout, theme};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState};

const MAX_WIDTH: u16 = 72;
const MAX_HEIGHT: u16 = 20;

pub fn render(frame: &mut Frame, area: Rect, toc: &TocState) {
    // Borders plus one row per entry
    let wanted = u16::try_from(toc.entries.len()).unwrap_or(u16::MAX).saturating_add(2);
    let popup = layout::centered(area, MAX_WIDTH, wanted.min(MAX_HEIGHT));
    if popup.width < 8 || popup.height < 3 {
        return;
    }

    let items: Vec<ListItem> = toc
        .entries
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("#{:<5}", entry.index + 1), Style::default().fg(theme::DIM)),
                Span::raw(entry.preview.clone()),
            ]))
        })
        .collect();

    let block = Block::default()
        .title(Span::styled(
            " Contents ",
            Style::default().fg(theme::RUST_ORANGE).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Span::styled(" Enter jump · Esc close ", Style::default().fg(theme::DIM)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(theme::RUST_ORANGE).add_modifier(Modifier::BOLD))
        .highlight_symbol("› ");
    let mut state = ListState::default().with_selected(Some(toc.selected));

    // Clear the area first so the overlay has a solid background
    frame.render_widget(Clear, popup);
    frame.render_stateful_widget(list, popup, &mut state);
}
