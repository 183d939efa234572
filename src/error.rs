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

use std::path::PathBuf;

/// Fatal errors surfaced to the user on exit, each with its own exit code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    #[error("Transcript not found: {0}")]
    TranscriptNotFound(String),
    #[error("Transcript could not be read: {0}")]
    TranscriptUnreadable(String),
    #[error("No transcript to show")]
    NoTranscripts,
}

impl AppError {
    pub const TRANSCRIPT_NOT_FOUND_EXIT_CODE: i32 = 20;
    pub const TRANSCRIPT_UNREADABLE_EXIT_CODE: i32 = 21;
    pub const NO_TRANSCRIPTS_EXIT_CODE: i32 = 22;

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::TranscriptNotFound(_) => Self::TRANSCRIPT_NOT_FOUND_EXIT_CODE,
            Self::TranscriptUnreadable(_) => Self::TRANSCRIPT_UNREADABLE_EXIT_CODE,
            Self::NoTranscripts => Self::NO_TRANSCRIPTS_EXIT_CODE,
        }
    }

    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::TranscriptNotFound(path) => {
                format!("Transcript `{path}` does not exist. Check the path and retry.")
            }
            Self::TranscriptUnreadable(detail) => {
                format!("Transcript could not be read: {detail}")
            }
            Self::NoTranscripts => "No transcript given. Usage: tview <TRANSCRIPT>...".to_owned(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("transcript not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read transcript {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<&TranscriptError> for AppError {
    fn from(err: &TranscriptError) -> Self {
        match err {
            TranscriptError::NotFound(path) => Self::TranscriptNotFound(path.display().to_string()),
            TranscriptError::Io { path, source } => {
                Self::TranscriptUnreadable(format!("{}: {source}", path.display()))
            }
        }
    }
}
