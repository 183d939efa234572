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

//! Read-only viewer settings.
//!
//! Settings come from `settings.json` in the user config directory, then CLI
//! flags override them. The file is re-read on every transcript switch. A
//! missing, unreadable or malformed file falls back to defaults.

use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = "transcript-view";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewerConfig {
    pub default_collapsed: bool,
    pub show_index: bool,
    pub render_markdown: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self { default_collapsed: true, show_index: true, render_markdown: true }
    }
}

/// CLI flags that win over the settings file when set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub default_collapsed: Option<bool>,
    pub show_index: Option<bool>,
    pub render_markdown: Option<bool>,
}

/// On-disk shape. Values may be booleans or the strings `"true"`/`"false"`;
/// anything other than `false` counts as enabled.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default, deserialize_with = "lenient_bool")]
    default_collapse: Option<bool>,
    #[serde(default, deserialize_with = "lenient_bool")]
    show_message_index: Option<bool>,
    #[serde(default, deserialize_with = "lenient_bool")]
    render_markdown: Option<bool>,
    /// Older spelling of `renderMarkdown`: `"raw"` disables markdown.
    #[serde(default)]
    default_render_mode: Option<String>,
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }
    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Bool(value) => value,
        Raw::Text(text) => !text.trim().eq_ignore_ascii_case("false"),
    }))
}

#[must_use]
pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(SETTINGS_FILE))
}

impl ViewerConfig {
    /// Load from `path` (or the default location), then apply `overrides`.
    #[must_use]
    pub fn load(path: Option<&Path>, overrides: ConfigOverrides) -> Self {
        let default_path = settings_path();
        let file = match path.or(default_path.as_deref()) {
            Some(path) => read_settings(path),
            None => SettingsFile::default(),
        };
        Self::from_settings(file).with_overrides(overrides)
    }

    fn from_settings(file: SettingsFile) -> Self {
        let defaults = Self::default();
        let render_markdown = file.render_markdown.unwrap_or_else(|| {
            file.default_render_mode.as_deref().map_or(defaults.render_markdown, |mode| mode != "raw")
        });
        Self {
            default_collapsed: file.default_collapse.unwrap_or(defaults.default_collapsed),
            show_index: file.show_message_index.unwrap_or(defaults.show_index),
            render_markdown,
        }
    }

    #[must_use]
    pub fn with_overrides(self, overrides: ConfigOverrides) -> Self {
        Self {
            default_collapsed: overrides.default_collapsed.unwrap_or(self.default_collapsed),
            show_index: overrides.show_index.unwrap_or(self.show_index),
            render_markdown: overrides.render_markdown.unwrap_or(self.render_markdown),
        }
    }
}

fn read_settings(path: &Path) -> SettingsFile {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no settings file; using defaults");
            return SettingsFile::default();
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), "settings file unreadable: {err}");
            return SettingsFile::default();
        }
    };
    match serde_json::from_str(&content) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(path = %path.display(), "settings file invalid, using defaults: {err}");
            SettingsFile::default()
        }
    }
}
