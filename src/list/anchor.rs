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

//! Scroll anchoring across height changes the list cannot predict.
//!
//! Before a toggle mutates an item, [`AnchorController::capture`] records where
//! one edge of that item sits, both on screen and in content rows. After the
//! new height has been observed and applied (two layout passes later) the
//! controller reports how far that edge moved in content rows, and the list
//! shifts its scroll offset by exactly that amount. Scrolling done by the list
//! itself in between is not layout movement and is left alone.

use super::virtualizer::{ViewportWindow, Virtualizer};

/// Layout passes between capture and correction: one to render and observe
/// the new height, one to apply it to the virtualizer.
pub const SETTLE_CYCLES: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorCause {
    Collapse,
    Expand,
    /// Width or renderer change: every item may reflow at once.
    Relayout,
}

impl AnchorCause {
    #[must_use]
    pub fn edge(self) -> AnchorEdge {
        match self {
            Self::Collapse => AnchorEdge::Bottom,
            Self::Expand | Self::Relayout => AnchorEdge::Top,
        }
    }
}

/// Which item edge is pinned, measured against the same viewport edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorEdge {
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorSnapshot {
    pub index: usize,
    /// Item edge minus viewport edge, in rows. Negative is above.
    pub edge_offset: i64,
    /// Item edge in content rows, from the top of the list.
    pub content_edge: i64,
    pub cause: AnchorCause,
}

#[derive(Debug, Default)]
pub struct AnchorController {
    pending: Option<AnchorSnapshot>,
    cycles: u8,
    corrections: usize,
}

fn signed(rows: usize) -> i64 {
    i64::try_from(rows).unwrap_or(i64::MAX)
}

/// Content-space position of `index`'s anchor edge.
fn content_edge(virtualizer: &mut Virtualizer, index: usize, edge: AnchorEdge) -> Option<i64> {
    let top = virtualizer.offset_of(index)?;
    Some(match edge {
        AnchorEdge::Top => signed(top),
        AnchorEdge::Bottom => signed(top + virtualizer.size(index)),
    })
}

/// Screen-space position of `index`'s anchor edge for the current offset.
fn edge_offset(
    virtualizer: &mut Virtualizer,
    index: usize,
    edge: AnchorEdge,
) -> Option<i64> {
    let content = content_edge(virtualizer, index, edge)?;
    let viewport_edge = match edge {
        AnchorEdge::Top => virtualizer.scroll_offset(),
        AnchorEdge::Bottom => virtualizer.scroll_offset() + virtualizer.viewport_height(),
    };
    Some(content - signed(viewport_edge))
}

impl AnchorController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the anchor for an upcoming mutation of `index`.
    ///
    /// A capture replaces any snapshot still waiting to settle and restarts the
    /// settle count, so back-to-back toggles end in one net correction.
    pub fn capture(&mut self, virtualizer: &mut Virtualizer, index: usize, cause: AnchorCause) {
        let edge = cause.edge();
        let (Some(edge_offset), Some(content_edge)) =
            (edge_offset(virtualizer, index, edge), content_edge(virtualizer, index, edge))
        else {
            tracing::trace!(index, "anchor capture for unknown index ignored");
            return;
        };
        let snapshot = AnchorSnapshot { index, edge_offset, content_edge, cause };
        if let Some(previous) = self.pending.replace(snapshot) {
            tracing::trace!(previous = previous.index, index, "anchor snapshot replaced");
        }
        self.cycles = 0;
        tracing::debug!(index, edge_offset, ?cause, "anchor captured");
    }

    /// Advance one layout pass. Returns the scroll delta to apply once the
    /// snapshot has settled, `None` otherwise.
    ///
    /// `window` is the window mounted by the previous pass; a snapshot whose item
    /// has left it is dropped without correction.
    pub fn on_layout_settled(
        &mut self,
        virtualizer: &mut Virtualizer,
        window: &ViewportWindow,
    ) -> Option<i64> {
        let snapshot = self.pending?;
        self.cycles += 1;
        if self.cycles < SETTLE_CYCLES {
            return None;
        }
        self.pending = None;
        self.cycles = 0;

        if !window.contains(snapshot.index) {
            tracing::trace!(index = snapshot.index, "anchor item left the window; no correction");
            return None;
        }
        let current = content_edge(virtualizer, snapshot.index, snapshot.cause.edge())?;
        let delta = current - snapshot.content_edge;
        self.corrections += 1;
        tracing::debug!(
            index = snapshot.index,
            captured = snapshot.content_edge,
            current,
            delta,
            "anchor correction"
        );
        Some(delta)
    }

    /// Re-read the pending snapshot's content edge from the current layout,
    /// keeping its screen position. Used after the list has moved the item on
    /// purpose, so only later layout changes count as drift.
    pub fn rebase(&mut self, virtualizer: &mut Virtualizer) {
        let Some(snapshot) = self.pending.as_mut() else {
            return;
        };
        if let Some(edge) = content_edge(virtualizer, snapshot.index, snapshot.cause.edge()) {
            snapshot.content_edge = edge;
        }
    }

    #[must_use]
    pub fn pending(&self) -> Option<&AnchorSnapshot> {
        self.pending.as_ref()
    }

    pub fn clear(&mut self) {
        self.pending = None;
        self.cycles = 0;
    }

    /// Corrections applied since creation.
    #[must_use]
    pub fn corrections(&self) -> usize {
        self.corrections
    }
}
