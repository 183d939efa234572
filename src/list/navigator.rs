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

//! Index navigation for the table of contents: center an item and flash it.

use super::virtualizer::{Align, Virtualizer};
use std::time::{Duration, Instant};

pub const HIGHLIGHT_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightTimer {
    pub index: usize,
    pub deadline: Instant,
}

/// Owns the single highlight slot. A new navigation replaces the running
/// timer instead of stacking a second one.
#[derive(Debug, Default)]
pub struct ScrollNavigator {
    highlight: Option<HighlightTimer>,
}

impl ScrollNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the centered scroll target for `index` and start its highlight.
    ///
    /// Returns the target offset for the caller to animate towards. Unmeasured
    /// targets stay pending in the virtualizer and are refined as they mount.
    pub fn navigate(
        &mut self,
        virtualizer: &mut Virtualizer,
        index: usize,
        now: Instant,
    ) -> Option<usize> {
        let target = virtualizer.resolve_index(index, Align::Center)?;
        if let Some(previous) =
            self.highlight.replace(HighlightTimer { index, deadline: now + HIGHLIGHT_DURATION })
        {
            tracing::trace!(previous = previous.index, index, "highlight replaced");
        }
        tracing::debug!(index, target, "navigate");
        Some(target)
    }

    /// Expire the highlight once its deadline has passed. Returns `true` when
    /// the highlight was cleared by this call.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.highlight {
            Some(timer) if now >= timer.deadline => {
                self.highlight = None;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn highlighted(&self) -> Option<usize> {
        self.highlight.map(|timer| timer.index)
    }

    #[must_use]
    pub fn timer(&self) -> Option<HighlightTimer> {
        self.highlight
    }

    pub fn cancel(&mut self) {
        self.highlight = None;
    }
}
