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

use crate::transcript::Role;
use ratatui::style::Color;

// Accent
pub const RUST_ORANGE: Color = Color::Rgb(244, 118, 0);

// UI chrome
pub const DIM: Color = Color::DarkGray;
pub const SEPARATOR_CHAR: &str = "─";

// Role header colors
pub const ROLE_USER: Color = Color::White;
pub const ROLE_ASSISTANT: Color = RUST_ORANGE;
pub const ROLE_TOOL: Color = Color::Cyan;
pub const ROLE_OTHER: Color = Color::Yellow;

// Gutter marks
pub const GUTTER_BAR: &str = "▏";
pub const GUTTER_CURSOR: &str = "▌";

// Navigation highlight background
pub const HIGHLIGHT_BG: Color = Color::Rgb(40, 44, 52);

// Fade mask over the last rows of a collapsed body
pub const FADE_FG: Color = Color::DarkGray;

// Toggle hints
pub const HINT_EXPAND: &str = "▸ expand";
pub const HINT_COLLAPSE: &str = "▴ collapse";

// Notices
pub const NOTICE_INFO: Color = Color::Green;
pub const NOTICE_ERROR: Color = Color::Red;

pub fn role_color(role: Role) -> Color {
    match role {
        Role::User => ROLE_USER,
        Role::Assistant => ROLE_ASSISTANT,
        Role::Tool => ROLE_TOOL,
        Role::Other => ROLE_OTHER,
    }
}
