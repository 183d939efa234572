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

//! Virtualized transcript list.
//!
//! Each frame runs one layout pass ([`MessageList::layout_pass`]):
//!
//! 1. apply the item heights observed by the previous pass,
//! 2. let a pending anchor snapshot correct the scroll offset,
//! 3. refine a pending scroll-to-index against the new heights,
//! 4. advance the smooth-scroll animation,
//! 5. compute the mounted window,
//! 6. observe the true height of every mounted item for the next pass.
//!
//! Heights therefore reach the virtualizer one frame after they are rendered,
//! which is why anchor corrections wait for two passes.

pub mod anchor;
pub mod item;
pub mod navigator;
pub mod virtualizer;

pub use anchor::{AnchorCause, AnchorController, AnchorEdge, AnchorSnapshot, SETTLE_CYCLES};
pub use item::{
    COLLAPSED_HEIGHT, CollapseState, ContentRenderer, LONG_CONTENT_THRESHOLD, MessageItem,
    ToggleDirection,
};
pub use navigator::{HIGHLIGHT_DURATION, HighlightTimer, ScrollNavigator};
pub use virtualizer::{Align, ViewportWindow, VirtualItem, Virtualizer};

use crate::clipboard::{ClipboardError, ClipboardSink};
use crate::transcript::Message;
use ratatui::widgets::Paragraph;
use std::time::Instant;

/// Row estimate for items that have not been rendered yet.
pub const ESTIMATED_ITEM_HEIGHT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub default_collapsed: bool,
    pub show_index: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self { default_collapsed: true, show_index: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScrollBehavior {
    Jump,
    Smooth,
}

pub struct MessageList {
    items: Vec<MessageItem>,
    renderer: Box<dyn ContentRenderer>,
    options: ListOptions,
    virtualizer: Virtualizer,
    anchor: AnchorController,
    navigator: ScrollNavigator,
    /// Width of the last layout pass; 0 before the first one.
    width: u16,
    /// Window mounted by the last layout pass.
    window: ViewportWindow,
    /// `(index, height)` observed while mounting, applied next pass.
    observations: Vec<(usize, usize)>,
    /// Target scroll offset requested by input or navigation.
    scroll_target: usize,
    /// Smooth scroll position (fractional) for animation.
    scroll_pos: f32,
    behavior: ScrollBehavior,
    cursor: Option<usize>,
    torn_down: bool,
}

fn shift(value: usize, delta: i64, max: usize) -> usize {
    let shifted = i64::try_from(value).unwrap_or(i64::MAX).saturating_add(delta);
    usize::try_from(shifted.max(0)).unwrap_or(usize::MAX).min(max)
}

impl MessageList {
    pub fn new(
        messages: Vec<Message>,
        options: ListOptions,
        renderer: Box<dyn ContentRenderer>,
    ) -> Self {
        let items: Vec<MessageItem> = messages
            .into_iter()
            .map(|message| MessageItem::new(message, options.default_collapsed))
            .collect();
        let virtualizer = Virtualizer::new(items.len(), ESTIMATED_ITEM_HEIGHT);
        tracing::debug!(items = items.len(), renderer = renderer.name(), "message list created");
        Self {
            items,
            renderer,
            options,
            virtualizer,
            anchor: AnchorController::new(),
            navigator: ScrollNavigator::new(),
            width: 0,
            window: ViewportWindow::default(),
            observations: Vec::new(),
            scroll_target: 0,
            scroll_pos: 0.0,
            behavior: ScrollBehavior::Smooth,
            cursor: None,
            torn_down: false,
        }
    }

    /// Run one settle cycle for a viewport of `width` x `height` cells.
    pub fn layout_pass(&mut self, width: u16, height: u16) {
        if self.torn_down || width == 0 || height == 0 {
            return;
        }
        self.virtualizer.set_viewport_height(usize::from(height));
        if self.width != width {
            let previous = std::mem::replace(&mut self.width, width);
            if previous != 0 {
                tracing::debug!(from = previous, to = width, "list width changed");
                self.relayout();
            }
        }

        for (index, size) in std::mem::take(&mut self.observations) {
            self.virtualizer.measure(index, size);
        }

        if let Some(delta) = self.anchor.on_layout_settled(&mut self.virtualizer, &self.window) {
            self.shift_scroll(delta);
        }

        if let Some(target) = self.virtualizer.refine_pending() {
            match self.behavior {
                ScrollBehavior::Jump => self.jump_to(target),
                ScrollBehavior::Smooth => self.scroll_target = target,
            }
        }

        self.animate();
        self.window = self.virtualizer.window();

        let renderer = self.renderer.as_ref();
        for mounted in &self.window.items {
            let Some(item) = self.items.get_mut(mounted.index) else {
                continue;
            };
            let height = item.height(width, renderer);
            if height != mounted.size || !self.virtualizer.is_measured(mounted.index) {
                self.observations.push((mounted.index, height));
            }
        }
    }

    /// Throw away every measurement and re-anchor on the first visible item.
    fn relayout(&mut self) {
        if let Some(first_visible) = self.window.visible().next().map(|item| item.index) {
            self.anchor.capture(&mut self.virtualizer, first_visible, AnchorCause::Relayout);
        }
        let anchor = self.anchor.pending().copied();

        self.observations.clear();
        self.items.iter_mut().for_each(MessageItem::invalidate);
        self.virtualizer.reset_measurements();

        // Estimate-based jump so the anchor item stays roughly in place until
        // the real heights arrive and the anchor correction runs.
        if let Some(snapshot) = anchor
            && snapshot.cause.edge() == AnchorEdge::Top
            && let Some(top) = self.virtualizer.offset_of(snapshot.index)
        {
            let max = self.virtualizer.max_scroll();
            self.jump_to(shift(top, -snapshot.edge_offset, max));
        }
        // Drift is measured from the estimated layout from here on.
        self.anchor.rebase(&mut self.virtualizer);
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
    fn animate(&mut self) {
        let max = self.virtualizer.max_scroll();
        self.scroll_target = self.scroll_target.min(max);
        let target = self.scroll_target as f32;
        let delta = target - self.scroll_pos;
        if delta.abs() < 0.5 {
            self.scroll_pos = target;
        } else {
            // Halfway each frame: settles within a handful of frames.
            self.scroll_pos += delta * 0.5;
        }
        self.scroll_pos = self.scroll_pos.clamp(0.0, max as f32);
        self.virtualizer.set_scroll_offset(self.scroll_pos.round() as usize);
    }

    #[allow(clippy::cast_precision_loss)]
    fn shift_scroll(&mut self, delta: i64) {
        if delta == 0 {
            return;
        }
        let max = self.virtualizer.max_scroll();
        let offset = shift(self.virtualizer.scroll_offset(), delta, max);
        self.virtualizer.set_scroll_offset(offset);
        self.scroll_target = shift(self.scroll_target, delta, max);
        self.scroll_pos = (self.scroll_pos + delta as f32).clamp(0.0, max as f32);
        if self.behavior == ScrollBehavior::Jump || self.scroll_target == offset {
            self.scroll_pos = offset as f32;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn jump_to(&mut self, offset: usize) {
        self.virtualizer.set_scroll_offset(offset);
        self.scroll_target = self.virtualizer.scroll_offset();
        self.scroll_pos = self.scroll_target as f32;
        self.behavior = ScrollBehavior::Jump;
    }

    /// Toggle a long item between collapsed and expanded, anchoring the
    /// reading position. Short items and unknown indices are ignored.
    pub fn toggle(&mut self, index: usize) -> Option<ToggleDirection> {
        if self.torn_down {
            return None;
        }
        let item = self.items.get(index)?;
        if !item.is_long() {
            tracing::trace!(index, "toggle on short item ignored");
            return None;
        }
        let cause =
            if item.is_collapsed() { AnchorCause::Expand } else { AnchorCause::Collapse };
        self.anchor.capture(&mut self.virtualizer, index, cause);
        let direction = self.items.get_mut(index)?.toggle();
        tracing::debug!(index, ?direction, "item toggled");
        direction
    }

    /// Scroll by `rows` (negative is up), animated.
    pub fn scroll_by(&mut self, rows: isize) {
        if self.torn_down {
            return;
        }
        self.virtualizer.cancel_pending_scroll();
        let max = self.virtualizer.max_scroll();
        let delta = i64::try_from(rows).unwrap_or(0);
        self.scroll_target = shift(self.scroll_target, delta, max);
        self.behavior = ScrollBehavior::Smooth;
    }

    pub fn scroll_to_top(&mut self) {
        if !self.is_empty() {
            self.scroll_to_index(0, Align::Start);
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        if let Some(last) = self.items.len().checked_sub(1) {
            self.scroll_to_index(last, Align::End);
        }
    }

    /// Jump so that `index` lands at `align`. Unmeasured targets are refined
    /// on the following layout passes.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> Option<usize> {
        if self.torn_down {
            return None;
        }
        let offset = self.virtualizer.scroll_to_index(index, align)?;
        self.jump_to(offset);
        Some(offset)
    }

    /// Smooth-scroll `index` to the viewport center, highlight it and move
    /// the cursor onto it.
    pub fn navigate_to(&mut self, index: usize, now: Instant) -> bool {
        if self.torn_down {
            return false;
        }
        let Some(target) = self.navigator.navigate(&mut self.virtualizer, index, now) else {
            return false;
        };
        self.scroll_target = target;
        self.behavior = ScrollBehavior::Smooth;
        self.cursor = Some(index);
        true
    }

    /// Expire timed state. Returns `true` if something visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.navigator.tick(now)
    }

    /// Copy the raw content of `index`. `Ok(false)` when there is no such item.
    pub fn copy_content(
        &self,
        index: usize,
        sink: &mut dyn ClipboardSink,
    ) -> Result<bool, ClipboardError> {
        let Some(item) = self.items.get(index) else {
            tracing::trace!(index, "copy of unknown item ignored");
            return Ok(false);
        };
        sink.set_text(&item.message().content)?;
        Ok(true)
    }

    /// Release everything in flight. Later layout passes and toggles do nothing.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.anchor.clear();
        self.virtualizer.cancel_pending_scroll();
        self.navigator.cancel();
        self.observations.clear();
        let offset = self.virtualizer.scroll_offset();
        self.jump_to(offset);
        tracing::debug!(offset, "message list torn down");
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn set_renderer(&mut self, renderer: Box<dyn ContentRenderer>) {
        tracing::debug!(from = self.renderer.name(), to = renderer.name(), "renderer changed");
        self.renderer = renderer;
        if self.torn_down {
            return;
        }
        self.relayout();
    }

    #[must_use]
    pub fn renderer_name(&self) -> &'static str {
        self.renderer.name()
    }

    /// Nothing left to settle: no queued heights, anchor, pending scroll or
    /// running animation.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::float_cmp)]
    pub fn is_settled(&self) -> bool {
        self.observations.is_empty()
            && self.anchor.pending().is_none()
            && !self.virtualizer.has_pending_scroll()
            && self.scroll_pos == self.scroll_target as f32
    }

    /// Settling work or a highlight is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.is_settled() || self.navigator.highlighted().is_some()
    }

    // --- Cursor ---

    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn set_cursor(&mut self, index: usize) {
        if index < self.items.len() {
            self.cursor = Some(index);
        }
    }

    /// Move the cursor by `step` items and scroll it into view.
    pub fn move_cursor(&mut self, step: isize) {
        if self.torn_down || self.items.is_empty() {
            return;
        }
        let last = self.items.len() - 1;
        let next = match self.cursor {
            None => self.window.visible().next().map_or(0, |item| item.index),
            Some(current) => current.saturating_add_signed(step).min(last),
        };
        self.cursor = Some(next);
        if let Some(target) = self.virtualizer.resolve_index(next, Align::Auto) {
            self.scroll_target = target;
            self.behavior = ScrollBehavior::Smooth;
        }
    }

    // --- Accessors ---

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn options(&self) -> ListOptions {
        self.options
    }

    #[must_use]
    pub fn item(&self, index: usize) -> Option<&MessageItem> {
        self.items.get(index)
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.items.iter().map(MessageItem::message)
    }

    #[must_use]
    pub fn scroll_offset(&self) -> usize {
        self.virtualizer.scroll_offset()
    }

    #[must_use]
    pub fn scroll_target(&self) -> usize {
        self.scroll_target
    }

    #[must_use]
    pub fn total_extent(&self) -> usize {
        self.virtualizer.total_extent()
    }

    #[must_use]
    pub fn viewport_height(&self) -> usize {
        self.virtualizer.viewport_height()
    }

    /// Top offset of an item in content rows.
    pub fn item_offset(&mut self, index: usize) -> Option<usize> {
        self.virtualizer.offset_of(index)
    }

    /// Height the virtualizer currently lays the item out with.
    #[must_use]
    pub fn item_height(&self, index: usize) -> Option<usize> {
        (index < self.items.len()).then(|| self.virtualizer.size(index))
    }

    #[must_use]
    pub fn window(&self) -> &ViewportWindow {
        &self.window
    }

    #[must_use]
    pub fn highlighted(&self) -> Option<usize> {
        self.navigator.highlighted()
    }

    #[must_use]
    pub fn corrections(&self) -> usize {
        self.anchor.corrections()
    }

    /// Wrapped body of a laid-out item.
    pub fn body(&mut self, index: usize) -> Option<&Paragraph<'static>> {
        if self.width == 0 {
            return None;
        }
        let renderer = self.renderer.as_ref();
        Some(self.items.get_mut(index)?.body(self.width, renderer))
    }

    /// Body rows shown in the item's current state.
    pub fn visible_body_rows(&mut self, index: usize) -> usize {
        let renderer = self.renderer.as_ref();
        match self.items.get_mut(index) {
            Some(item) if self.width > 0 => item.visible_body_rows(self.width, renderer),
            _ => 0,
        }
    }

    /// Body rows hidden by the collapsed presentation.
    pub fn hidden_rows(&mut self, index: usize) -> usize {
        let renderer = self.renderer.as_ref();
        match self.items.get_mut(index) {
            Some(item) if self.width > 0 => item.hidden_rows(self.width, renderer),
            _ => 0,
        }
    }

    /// Map a viewport row to `(index, row within the item)`. Gap rows map to
    /// nothing.
    #[must_use]
    pub fn item_at_row(&self, row: usize) -> Option<(usize, usize)> {
        let offset = self.window.scroll_offset + row;
        self.window
            .items
            .iter()
            .find(|item| item.start <= offset && offset < item.end())
            .map(|item| (item.index, offset - item.start))
    }
}
