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

//! Windowed layout over a sequence of variable-height items.
//!
//! Sizes start as a fixed estimate and are replaced by measurements as items
//! get mounted. Item offsets live in a cumulative-sum cache with a valid-prefix
//! watermark: a size change at index `i` only drops offsets after `i`, and the
//! cache is extended lazily up to whatever index a query needs.

use std::ops::Range;

/// Items rendered above and below the strictly visible range.
pub const DEFAULT_OVERSCAN: usize = 5;
/// Blank rows between two consecutive items.
pub const DEFAULT_GAP: usize = 1;

/// Where a scrolled-to item should land inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    Start,
    Center,
    End,
    /// Leave the viewport alone if the item is fully visible, otherwise move
    /// the least distance that shows it.
    #[default]
    Auto,
}

/// One mounted item: its ordinal index, top offset and current size in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualItem {
    pub index: usize,
    pub start: usize,
    pub size: usize,
}

impl VirtualItem {
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.size
    }
}

/// Snapshot of what a layout pass decided to mount.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewportWindow {
    pub items: Vec<VirtualItem>,
    pub total_extent: usize,
    pub scroll_offset: usize,
    pub viewport_height: usize,
}

impl ViewportWindow {
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        match (self.items.first(), self.items.last()) {
            (Some(first), Some(last)) => first.index..last.index + 1,
            _ => 0..0,
        }
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.range().contains(&index)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&VirtualItem> {
        let first = self.items.first()?.index;
        self.items.get(index.checked_sub(first)?)
    }

    /// Height of the spacer standing in for unmounted items above the window.
    #[must_use]
    pub fn padding_top(&self) -> usize {
        self.items.first().map_or(0, |item| item.start)
    }

    /// Height of the spacer standing in for unmounted items below the window.
    #[must_use]
    pub fn padding_bottom(&self) -> usize {
        self.items.last().map_or(0, |item| self.total_extent.saturating_sub(item.end()))
    }

    /// Items that intersect the viewport, overscan excluded.
    pub fn visible(&self) -> impl Iterator<Item = &VirtualItem> {
        let top = self.scroll_offset;
        let bottom = top + self.viewport_height;
        self.items.iter().filter(move |item| item.end() > top && item.start < bottom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingScroll {
    index: usize,
    align: Align,
    last_offset: usize,
}

#[derive(Debug)]
pub struct Virtualizer {
    count: usize,
    estimate: usize,
    gap: usize,
    overscan: usize,
    /// Measured size per index; `None` falls back to `estimate`.
    sizes: Vec<Option<usize>>,
    /// Top offset per index. Only `offsets[..valid]` is trustworthy.
    offsets: Vec<usize>,
    valid: usize,
    /// Sum of all sizes plus gaps, kept up to date on every measurement.
    total: usize,
    scroll_offset: usize,
    viewport_height: usize,
    pending_scroll: Option<PendingScroll>,
}

impl Virtualizer {
    #[must_use]
    pub fn new(count: usize, estimate: usize) -> Self {
        let mut virtualizer = Self {
            count,
            estimate,
            gap: DEFAULT_GAP,
            overscan: DEFAULT_OVERSCAN,
            sizes: vec![None; count],
            offsets: vec![0; count],
            valid: 0,
            total: 0,
            scroll_offset: 0,
            viewport_height: 0,
            pending_scroll: None,
        };
        virtualizer.total = virtualizer.unmeasured_total();
        virtualizer
    }

    #[must_use]
    pub fn with_gap(mut self, gap: usize) -> Self {
        self.gap = gap;
        self.valid = 0;
        self.total = self.unmeasured_total();
        self
    }

    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    fn unmeasured_total(&self) -> usize {
        if self.count == 0 {
            return 0;
        }
        self.count * self.estimate + (self.count - 1) * self.gap
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn total_extent(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    #[must_use]
    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    #[must_use]
    pub fn max_scroll(&self) -> usize {
        self.total.saturating_sub(self.viewport_height)
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height;
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    /// Set the scroll offset, clamped to the scrollable extent.
    pub fn set_scroll_offset(&mut self, offset: usize) {
        self.scroll_offset = offset.min(self.max_scroll());
    }

    /// Size used for layout: the measurement if there is one, else the estimate.
    #[must_use]
    pub fn size(&self, index: usize) -> usize {
        self.sizes.get(index).copied().flatten().unwrap_or(self.estimate)
    }

    #[must_use]
    pub fn is_measured(&self, index: usize) -> bool {
        self.sizes.get(index).is_some_and(Option::is_some)
    }

    /// Number of leading offsets currently cached.
    #[must_use]
    pub fn cached_prefix_len(&self) -> usize {
        self.valid
    }

    /// Record the real size of an item. Returns `true` when the layout changed.
    ///
    /// Offsets after `index` are dropped from the cache; offsets at or before it
    /// are kept.
    pub fn measure(&mut self, index: usize, size: usize) -> bool {
        let Some(slot) = self.sizes.get_mut(index) else {
            return false;
        };
        let old = slot.unwrap_or(self.estimate);
        *slot = Some(size);
        if old == size {
            return false;
        }
        self.total = self.total + size - old;
        self.valid = self.valid.min(index + 1);
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
        tracing::trace!(index, old, size, "item size changed");
        true
    }

    /// Forget every measurement, e.g. after the content width changed.
    pub fn reset_measurements(&mut self) {
        self.sizes.iter_mut().for_each(|size| *size = None);
        self.valid = 0;
        self.total = self.unmeasured_total();
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    fn ensure_offsets(&mut self, upto: usize) {
        let upto = upto.min(self.count.saturating_sub(1));
        if self.count == 0 || upto < self.valid {
            return;
        }
        for i in self.valid..=upto {
            self.offsets[i] =
                if i == 0 { 0 } else { self.offsets[i - 1] + self.size(i - 1) + self.gap };
        }
        self.valid = upto + 1;
    }

    /// Top offset of an item, extending the offset cache as needed.
    pub fn offset_of(&mut self, index: usize) -> Option<usize> {
        if index >= self.count {
            return None;
        }
        self.ensure_offsets(index);
        Some(self.offsets[index])
    }

    /// Index of the item whose rows (gap included) contain `offset`.
    pub fn item_at(&mut self, offset: usize) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        if self.valid > 0 {
            let last = self.valid - 1;
            let last_end = self.offsets[last] + self.size(last) + self.gap;
            if offset < last_end {
                let gap = self.gap;
                let found = self.offsets[..self.valid]
                    .partition_point(|&start| start <= offset)
                    .saturating_sub(1);
                debug_assert!(self.offsets[found] + self.size(found) + gap > offset);
                return Some(found);
            }
        }
        let mut index = self.valid;
        loop {
            let start = self.offset_of(index)?;
            if offset < start + self.size(index) + self.gap || index + 1 == self.count {
                return Some(index);
            }
            index += 1;
        }
    }

    /// Compute the mounted window for the current scroll offset.
    pub fn window(&mut self) -> ViewportWindow {
        let mut window = ViewportWindow {
            items: Vec::new(),
            total_extent: self.total,
            scroll_offset: self.scroll_offset,
            viewport_height: self.viewport_height,
        };
        if self.count == 0 || self.viewport_height == 0 {
            return window;
        }
        let Some(first) = self.item_at(self.scroll_offset) else {
            return window;
        };
        let bottom = self.scroll_offset + self.viewport_height;
        let mut last = first;
        while last + 1 < self.count {
            match self.offset_of(last + 1) {
                Some(start) if start < bottom => last += 1,
                _ => break,
            }
        }

        let start = first.saturating_sub(self.overscan);
        let end = (last + 1 + self.overscan).min(self.count);
        self.ensure_offsets(end - 1);
        window.items = (start..end)
            .map(|index| VirtualItem { index, start: self.offsets[index], size: self.size(index) })
            .collect();
        window
    }

    fn offset_for(&mut self, index: usize, align: Align) -> Option<usize> {
        let top = self.offset_of(index)?;
        let size = self.size(index);
        let viewport = self.viewport_height;
        let offset = match align {
            Align::Start => top,
            Align::End => (top + size).saturating_sub(viewport),
            Align::Center => (top + size / 2).saturating_sub(viewport / 2),
            Align::Auto => {
                let current = self.scroll_offset;
                if top >= current && top + size <= current + viewport {
                    current
                } else if top < current || size > viewport {
                    top
                } else {
                    (top + size).saturating_sub(viewport)
                }
            }
        };
        Some(offset.min(self.max_scroll()))
    }

    /// Resolve the scroll offset that brings `index` into view without moving.
    ///
    /// The request stays pending while the item is unmeasured, so that
    /// [`Self::refine_pending`] can correct the estimate once it is known.
    pub fn resolve_index(&mut self, index: usize, align: Align) -> Option<usize> {
        let Some(offset) = self.offset_for(index, align) else {
            tracing::trace!(index, count = self.count, "scroll request out of range");
            return None;
        };
        self.pending_scroll = (!self.is_measured(index))
            .then_some(PendingScroll { index, align, last_offset: offset });
        Some(offset)
    }

    /// Jump to an item. Unmeasured items are reached through their estimated
    /// offset and stay pending until [`Self::refine_pending`] sees them measured.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> Option<usize> {
        let offset = self.resolve_index(index, align)?;
        self.scroll_offset = offset;
        tracing::debug!(index, offset, pending = self.pending_scroll.is_some(), "scroll to index");
        Some(offset)
    }

    /// Re-resolve a pending scroll request against the latest measurements.
    ///
    /// Returns the corrected target offset while the request is still settling;
    /// the caller decides whether to jump or animate there. The request is
    /// dropped once the item is measured and its offset held still for a pass.
    pub fn refine_pending(&mut self) -> Option<usize> {
        let pending = self.pending_scroll?;
        let Some(offset) = self.offset_for(pending.index, pending.align) else {
            self.pending_scroll = None;
            return None;
        };
        if self.is_measured(pending.index) && offset == pending.last_offset {
            self.pending_scroll = None;
            return None;
        }
        self.pending_scroll = Some(PendingScroll { last_offset: offset, ..pending });
        Some(offset)
    }

    /// Index of the item a pending scroll request is waiting on.
    #[must_use]
    pub fn pending_index(&self) -> Option<usize> {
        self.pending_scroll.map(|pending| pending.index)
    }

    #[must_use]
    pub fn has_pending_scroll(&self) -> bool {
        self.pending_scroll.is_some()
    }

    pub fn cancel_pending_scroll(&mut self) {
        self.pending_scroll = None;
    }
}
