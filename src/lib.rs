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

pub mod app;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod list;
pub mod transcript;
pub mod ui;

use clap::Parser;
use config::ConfigOverrides;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tview", version, about = "Terminal viewer for long chat transcripts")]
pub struct Cli {
    /// Transcript files (JSON Lines); `[` and `]` switch between them
    #[arg(required = true, value_name = "TRANSCRIPT")]
    pub transcripts: Vec<PathBuf>,

    /// Settings file (defaults to <config dir>/transcript-view/settings.json)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Start long messages collapsed
    #[arg(long, conflicts_with = "expanded")]
    pub collapsed: bool,

    /// Start long messages expanded
    #[arg(long)]
    pub expanded: bool,

    /// Hide the `#N` message index in headers
    #[arg(long)]
    pub no_index: bool,

    /// Show content verbatim instead of rendering markdown
    #[arg(long)]
    pub raw: bool,

    /// Write tracing diagnostics to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Tracing filter directives (defaults to RUST_LOG, then `info`)
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Append to the log file instead of truncating it
    #[arg(long)]
    pub log_append: bool,
}

impl Cli {
    /// Settings the command line forces, whatever the settings file says.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        let default_collapsed = if self.collapsed {
            Some(true)
        } else if self.expanded {
            Some(false)
        } else {
            None
        };
        ConfigOverrides {
            default_collapsed,
            show_index: self.no_index.then_some(false),
            render_markdown: self.raw.then_some(false),
        }
    }
}
