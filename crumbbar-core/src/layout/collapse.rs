// SPDX-License-Identifier: LGPL-3.0-only
//! Arrange-time collapse strategy.
//!
//! [CollapseLayout] partitions a row of breadcrumb slots directly during the
//! arrange pass, without tracking primary/overflow membership between passes.
//! Slot 0 is always the ellipsis indicator (see [`BreadcrumbCursor`](crate::cursor::BreadcrumbCursor));
//! slots `1..` are the items in logical order.

use super::{finite_width, LayoutElement};
use nalgebra::Vector2;
use std::ops::Range;
use taffy::{AvailableSpace, Size};
use vello::kurbo::Rect;

/// Collapses the oldest items of a row behind the ellipsis slot.
#[derive(Debug, Clone, Default)]
pub struct CollapseLayout {
    available_width: Option<f32>,
    ellipsis_is_rendered: bool,
    first_rendered_slot: usize,
    visible_items_count: usize,
    slot_count: usize,
}

impl CollapseLayout {
    /// Create a new collapse layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the last measure decided to render the ellipsis.
    pub fn ellipsis_is_rendered(&self) -> bool {
        self.ellipsis_is_rendered
    }

    /// Slot of the first item arranged after the ellipsis.
    pub fn first_rendered_item_index_after_ellipsis(&self) -> usize {
        self.first_rendered_slot
    }

    /// Number of item slots left visible by the last arrange.
    pub fn visible_items_count(&self) -> usize {
        self.visible_items_count
    }

    /// Item slots hidden behind the ellipsis by the last arrange.
    pub fn hidden_slots(&self) -> Range<usize> {
        if self.ellipsis_is_rendered && self.slot_count > 1 {
            1..self.first_rendered_slot
        } else {
            1..1
        }
    }

    /// Logical indices (slot minus one) of the hidden items.
    pub fn hidden_item_indices(&self) -> Range<usize> {
        let slots = self.hidden_slots();
        slots.start - 1..slots.end - 1
    }

    /// Measure every slot and decide whether the items overflow.
    ///
    /// Returns the desired size of the row.
    pub fn measure<E: LayoutElement>(
        &mut self,
        children: &mut [E],
        constraints: Size<AvailableSpace>,
    ) -> Vector2<f32> {
        self.available_width = finite_width(constraints.width);
        self.slot_count = children.len();

        let mut items_width = 0.0f32;
        let mut max_height = 0.0f32;
        let mut ellipsis_width = 0.0f32;

        for (slot, child) in children.iter_mut().enumerate() {
            let size = child.measure(constraints);
            if slot == 0 {
                ellipsis_width = size.x;
            } else {
                items_width += size.x;
            }
            max_height = max_height.max(size.y);
        }

        self.ellipsis_is_rendered = match self.available_width {
            Some(available) => self.slot_count > 1 && items_width + ellipsis_width > available,
            None => false,
        };

        log::trace!(
            "CollapseLayout: measured {} items, width {} (available {:?}), ellipsis {}",
            self.slot_count.saturating_sub(1),
            items_width,
            self.available_width,
            self.ellipsis_is_rendered
        );

        if self.ellipsis_is_rendered {
            Vector2::new(items_width + ellipsis_width, max_height)
        } else {
            Vector2::new(items_width, max_height)
        }
    }

    /// Arrange the slots inside `bounds`: the ellipsis first (when rendered),
    /// followed by every item from the first rendered slot on. Hidden slots
    /// are arranged into [Rect::ZERO].
    pub fn arrange<E: LayoutElement>(&mut self, children: &mut [E], bounds: Rect) -> Vector2<f32> {
        let slot_count = children.len();
        self.slot_count = slot_count;
        self.visible_items_count = 0;
        self.first_rendered_slot = 1;

        if self.ellipsis_is_rendered {
            self.first_rendered_slot = self.first_slot_to_arrange(children);
        }

        let max_height = self.items_height(children);
        let mut x = bounds.x0;

        if let Some(ellipsis) = children.first_mut() {
            if self.ellipsis_is_rendered {
                x = arrange_at(ellipsis, x, bounds.y0, max_height);
            } else {
                ellipsis.arrange(Rect::ZERO);
            }
        }

        for slot in 1..slot_count {
            let child = &mut children[slot];
            if slot < self.first_rendered_slot {
                child.arrange(Rect::ZERO);
            } else {
                x = arrange_at(child, x, bounds.y0, max_height);
                self.visible_items_count += 1;
            }
        }

        Vector2::new(bounds.width() as f32, bounds.height() as f32)
    }

    /// Walk back from the last item, keeping items while they fit next to the ellipsis.
    /// The last item is always kept.
    fn first_slot_to_arrange<E: LayoutElement>(&self, children: &[E]) -> usize {
        let slot_count = children.len();
        if slot_count < 2 {
            return 1;
        }
        let Some(available) = self.available_width else {
            return 1;
        };

        let mut accumulated = children[slot_count - 1].desired_size().x + children[0].desired_size().x;
        for slot in (1..slot_count - 1).rev() {
            let next = accumulated + children[slot].desired_size().x;
            if next > available {
                return slot + 1;
            }
            accumulated = next;
        }
        1
    }

    fn items_height<E: LayoutElement>(&self, children: &[E]) -> f32 {
        let mut max_height = 0.0f32;
        if self.ellipsis_is_rendered {
            if let Some(ellipsis) = children.first() {
                max_height = ellipsis.desired_size().y;
            }
        }
        for child in children.iter().skip(self.first_rendered_slot) {
            max_height = max_height.max(child.desired_size().y);
        }
        max_height
    }
}

fn arrange_at<E: LayoutElement>(child: &mut E, x: f64, y: f64, height: f32) -> f64 {
    let width = child.desired_size().x as f64;
    child.arrange(Rect::new(x, y, x + width, y + height as f64));
    x + width
}
