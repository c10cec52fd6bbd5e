// SPDX-License-Identifier: LGPL-3.0-only
//! Breadcrumb row collapsed during arrange.
//!
//! Unlike the [BreadcrumbBar](crate::breadcrumb_bar::BreadcrumbBar), this row
//! keeps no partition between passes: a [CollapseLayout] decides on every
//! arrange which of the oldest items are hidden behind the ellipsis.

use crate::breadcrumb_bar::ItemClickedHandler;
use crate::breadcrumb_item::{BreadcrumbBarItem, ItemFlags};
use crate::element_factory::BreadcrumbElementFactory;
use crate::flyout::{ItemClicked, OverflowFlyout};
use crate::template::{ItemTemplate, LabelTemplate};
use crumbbar_core::cursor::BreadcrumbCursor;
use crumbbar_core::layout::{CollapseLayout, LayoutElement};
use nalgebra::Vector2;
use std::fmt::Display;
use std::sync::Arc;
use taffy::{AvailableSpace, Size};
use vello::kurbo::Rect;

/// A breadcrumb row whose slot 0 is the ellipsis and slots `1..` are the items.
pub struct CollapsedBreadcrumbRow<T: Clone + 'static> {
    items: Vec<T>,
    factory: BreadcrumbElementFactory<T>,
    slots: Vec<BreadcrumbBarItem<T>>,
    ellipsis_size: Vector2<f32>,
    layout: CollapseLayout,
    flyout: OverflowFlyout<T>,
    on_item_clicked: Option<ItemClickedHandler<T>>,
}

impl<T: Clone + Display + 'static> CollapsedBreadcrumbRow<T> {
    /// Create a row rendering `items` as text labels.
    pub fn new(items: Vec<T>) -> Self {
        Self::with_template(items, LabelTemplate::new())
    }
}

impl<T: Clone + 'static> CollapsedBreadcrumbRow<T> {
    /// Create a row rendering `items` with `template`.
    pub fn with_template(items: Vec<T>, template: impl ItemTemplate<T> + 'static) -> Self {
        let mut row = Self {
            items: Vec::new(),
            factory: BreadcrumbElementFactory::new(Arc::new(template)),
            slots: Vec::new(),
            ellipsis_size: LabelTemplate::new().measure_text("\u{2026}"),
            layout: CollapseLayout::new(),
            flyout: OverflowFlyout::new(),
            on_item_clicked: None,
        };
        row.set_items(items);
        row
    }

    /// Set the size of the ellipsis slot.
    pub fn with_ellipsis_size(mut self, size: Vector2<f32>) -> Self {
        self.ellipsis_size = size;
        if let Some(ellipsis) = self.slots.first_mut() {
            *ellipsis = BreadcrumbBarItem::ellipsis(size);
        }
        self
    }

    /// Set the callback for when a breadcrumb item is clicked.
    pub fn with_on_item_clicked<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ItemClicked<T>) + Send + Sync + 'static,
    {
        self.on_item_clicked = Some(Arc::new(callback));
        self
    }

    /// Replace the items. Every slot is rebuilt.
    pub fn set_items(&mut self, items: Vec<T>) {
        for slot in self.slots.drain(..) {
            self.factory.recycle_element(slot);
        }
        self.flyout.close();

        let last = items.len().checked_sub(1);
        let mut slots = Vec::with_capacity(items.len() + 1);
        for (slot, item) in BreadcrumbCursor::new(Some(&items[..])).slots().enumerate() {
            match item {
                None => slots.push(BreadcrumbBarItem::ellipsis(self.ellipsis_size)),
                Some(item) => {
                    let index = slot - 1;
                    let mut element = self.factory.get_element(item.clone(), index);
                    element.set_flags(ItemFlags::LAST, Some(index) == last);
                    slots.push(element);
                },
            }
        }
        self.slots = slots;
        self.items = items;
    }

    /// Measure every slot. Returns the desired size of the row.
    pub fn measure(&mut self, constraints: Size<AvailableSpace>) -> Vector2<f32> {
        self.layout.measure(&mut self.slots, constraints)
    }

    /// Arrange the slots inside `bounds`, hiding the oldest items as needed.
    pub fn arrange(&mut self, bounds: Rect) -> Vector2<f32> {
        self.layout.arrange(&mut self.slots, bounds)
    }

    /// Click the ellipsis. Opens the flyout with the hidden items.
    pub fn click_ellipsis(&mut self) -> bool {
        if !self.layout.ellipsis_is_rendered() {
            return false;
        }
        let anchor = self
            .slots
            .first()
            .map_or(Rect::ZERO, LayoutElement::arranged_rect);
        self.flyout
            .open_hidden(&self.items, self.layout.hidden_item_indices(), anchor);
        true
    }

    /// Click the visible item at logical `index`.
    pub fn click_item(&mut self, index: usize) -> Option<ItemClicked<T>> {
        let visible = self
            .slots
            .get(index + 1)
            .map_or(false, LayoutElement::is_arranged_visible);
        if !visible {
            log::warn!("Ignoring click on hidden breadcrumb item {}", index);
            return None;
        }
        let clicked = ItemClicked {
            index,
            item: self.items[index].clone(),
        };
        self.raise_item_clicked(&clicked);
        Some(clicked)
    }

    /// Click the flyout entry at display `position`.
    pub fn click_overflow(&mut self, position: usize) -> Option<ItemClicked<T>> {
        let clicked = self.flyout.click(position)?;
        self.raise_item_clicked(&clicked);
        Some(clicked)
    }

    fn raise_item_clicked(&self, clicked: &ItemClicked<T>) {
        if let Some(callback) = &self.on_item_clicked {
            callback(clicked);
        }
    }

    /// The items in logical order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Slots in order: the ellipsis followed by every item.
    pub fn slots(&self) -> &[BreadcrumbBarItem<T>] {
        &self.slots
    }

    /// The collapse layout.
    pub fn layout(&self) -> &CollapseLayout {
        &self.layout
    }

    /// The overflow flyout.
    pub fn flyout(&self) -> &OverflowFlyout<T> {
        &self.flyout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::FnTemplate;
    use crumbbar_core::layout::width_constraints;

    fn row(widths: &[f32]) -> CollapsedBreadcrumbRow<f32> {
        CollapsedBreadcrumbRow::with_template(
            widths.to_vec(),
            FnTemplate::new(|width: &f32, _| Vector2::new(*width, 20.0)),
        )
        .with_ellipsis_size(Vector2::new(20.0, 20.0))
    }

    #[test]
    fn test_slots_start_with_ellipsis() {
        let row = row(&[30.0, 40.0]);
        assert_eq!(row.slots().len(), 3);
        assert!(row.slots()[0].is_ellipsis());
        assert_eq!(row.slots()[1].index(), Some(0));
        assert!(row.slots()[2].is_last());
    }

    #[test]
    fn test_hidden_items_open_in_flyout() {
        let mut row = row(&[50.0, 50.0, 50.0, 50.0]);
        row.measure(width_constraints(120.0));
        row.arrange(Rect::new(0.0, 0.0, 120.0, 20.0));

        assert!(row.click_item(0).is_none());
        assert_eq!(row.click_item(3).map(|clicked| clicked.index), Some(3));

        assert!(row.click_ellipsis());
        assert_eq!(row.flyout().logical_index(0), Some(1));
        assert_eq!(row.flyout().anchor(), Some(Rect::new(0.0, 0.0, 20.0, 20.0)));

        let clicked = row.click_overflow(1).unwrap();
        assert_eq!(clicked.index, 0);
        assert!(!row.flyout().is_open());
    }

    #[test]
    fn test_wide_row_has_no_ellipsis() {
        let mut row = row(&[50.0, 50.0]);
        row.measure(width_constraints(500.0));
        row.arrange(Rect::new(0.0, 0.0, 500.0, 20.0));
        assert!(!row.click_ellipsis());
        assert!(row.click_item(0).is_some());
    }
}
