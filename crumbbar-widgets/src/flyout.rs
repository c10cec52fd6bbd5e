// SPDX-License-Identifier: LGPL-3.0-only
//! Pop-up listing the collapsed breadcrumb items.

use crate::breadcrumb_item::{BreadcrumbBarItem, ItemFlags};
use crumbbar_core::error::BreadcrumbResult;
use crumbbar_core::provider::ItemDataProvider;
use std::ops::Range;
use vello::kurbo::Rect;

/// Event raised when a breadcrumb item is clicked, inline or in the flyout.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemClicked<T> {
    /// Logical index of the clicked item.
    pub index: usize,
    /// The clicked item.
    pub item: T,
}

/// One row of the flyout.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyoutEntry<T> {
    /// Logical index of the item.
    pub index: usize,
    /// The item.
    pub item: T,
}

/// Presents overflowed items, most recently collapsed first.
#[derive(Debug, Clone)]
pub struct OverflowFlyout<T> {
    entries: Vec<FlyoutEntry<T>>,
    anchor: Option<Rect>,
}

impl<T: Clone + 'static> OverflowFlyout<T> {
    /// Create a closed flyout.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            anchor: None,
        }
    }

    /// Show the provider's overflow items anchored to `anchor`.
    ///
    /// Display position `p` shows overflow position `count - p - 1`.
    pub fn open(&mut self, provider: &ItemDataProvider<T>, anchor: Rect) -> BreadcrumbResult<()> {
        let count = provider.overflow_list_size();
        let mut entries = Vec::with_capacity(count);
        for position in 0..count {
            let index = provider.convert_overflow_index_to_index(count - position - 1)?;
            if let Some(item) = provider.item(index) {
                entries.push(FlyoutEntry {
                    index,
                    item: item.clone(),
                });
            }
        }
        self.entries = entries;
        self.anchor = Some(anchor);
        log::debug!("Opened overflow flyout with {} items", self.entries.len());
        Ok(())
    }

    /// Show the items in `hidden` anchored to `anchor`.
    ///
    /// Used by rows arranged with a [CollapseLayout](crumbbar_core::layout::CollapseLayout),
    /// which only know the hidden range.
    pub fn open_hidden(&mut self, items: &[T], hidden: Range<usize>, anchor: Rect) {
        let end = hidden.end.min(items.len());
        let start = hidden.start.min(end);
        self.entries = (start..end)
            .rev()
            .map(|index| FlyoutEntry {
                index,
                item: items[index].clone(),
            })
            .collect();
        self.anchor = Some(anchor);
        log::debug!("Opened overflow flyout with {} hidden items", self.entries.len());
    }

    /// Hide the flyout.
    pub fn close(&mut self) {
        if self.anchor.take().is_some() {
            log::debug!("Closed overflow flyout");
        }
        self.entries.clear();
    }

    /// Whether the flyout is shown.
    pub fn is_open(&self) -> bool {
        self.anchor.is_some()
    }

    /// Rectangle the flyout is anchored to while open.
    pub fn anchor(&self) -> Option<Rect> {
        self.anchor
    }

    /// Entries in display order.
    pub fn entries(&self) -> &[FlyoutEntry<T>] {
        &self.entries
    }

    /// Logical index shown at display `position`.
    pub fn logical_index(&self, position: usize) -> Option<usize> {
        self.entries.get(position).map(|entry| entry.index)
    }

    /// Click the entry at display `position`. Closes the flyout and returns
    /// the event to raise.
    pub fn click(&mut self, position: usize) -> Option<ItemClicked<T>> {
        if !self.is_open() {
            log::warn!("Ignoring click on closed overflow flyout");
            return None;
        }
        let Some(entry) = self.entries.get(position) else {
            log::warn!(
                "Ignoring click on flyout entry {} of {}",
                position,
                self.entries.len()
            );
            return None;
        };
        let clicked = ItemClicked {
            index: entry.index,
            item: entry.item.clone(),
        };
        self.close();
        Some(clicked)
    }

    /// Realization hook: `element` is about to show display `position`.
    pub fn element_prepared(&self, element: &mut BreadcrumbBarItem<T>, position: usize) {
        element.set_flags(ItemFlags::ELLIPSIS_DROPDOWN, true);
        self.bind(element, position);
    }

    /// Realization hook: `element` moved to display `position`.
    pub fn element_index_changed(&self, element: &mut BreadcrumbBarItem<T>, position: usize) {
        self.bind(element, position);
    }

    fn bind(&self, element: &mut BreadcrumbBarItem<T>, position: usize) {
        let entry = self.entries.get(position);
        element.set_index(entry.map(|entry| entry.index));
        element.set_content(entry.map(|entry| entry.item.clone()));
    }
}

impl<T: Clone + 'static> Default for OverflowFlyout<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::LabelTemplate;
    use crumbbar_core::items::ItemsSource;
    use std::sync::Arc;

    fn collapsed_provider() -> ItemDataProvider<&'static str> {
        let mut provider = ItemDataProvider::new();
        provider.set_source(Some(ItemsSource::new(vec!["Home", "Docs", "Work", "Report"])));
        provider.move_items_out_of_primary_list(&[0, 1, 2]);
        provider
    }

    #[test]
    fn test_open_lists_most_recent_first() {
        let provider = collapsed_provider();
        let mut flyout = OverflowFlyout::new();
        flyout.open(&provider, Rect::new(0.0, 0.0, 20.0, 20.0)).unwrap();

        assert!(flyout.is_open());
        let indices: Vec<usize> = flyout.entries().iter().map(|entry| entry.index).collect();
        assert_eq!(indices, vec![2, 1, 0]);
        assert_eq!(flyout.entries()[0].item, "Work");
    }

    #[test]
    fn test_display_position_mirrors_overflow_position() {
        let mut provider = ItemDataProvider::new();
        provider.set_source(Some(ItemsSource::new(vec!["a", "b", "c", "d", "e"])));
        provider.move_items_out_of_primary_list(&[0, 1, 3]);
        let mut flyout = OverflowFlyout::new();
        flyout.open(&provider, Rect::ZERO).unwrap();

        let count = provider.overflow_list_size();
        assert_eq!(flyout.entries().len(), count);
        for position in 0..count {
            assert_eq!(
                flyout.logical_index(position),
                Some(provider.convert_overflow_index_to_index(count - position - 1).unwrap())
            );
        }
        assert_eq!(flyout.entries()[0].item, "d");
    }

    #[test]
    fn test_click_maps_to_logical_index_and_closes() {
        let provider = collapsed_provider();
        let mut flyout = OverflowFlyout::new();
        flyout.open(&provider, Rect::ZERO).unwrap();

        let clicked = flyout.click(2).unwrap();
        assert_eq!(clicked, ItemClicked { index: 0, item: "Home" });
        assert!(!flyout.is_open());
        assert!(flyout.click(0).is_none());
    }

    #[test]
    fn test_click_out_of_range() {
        let provider = collapsed_provider();
        let mut flyout = OverflowFlyout::new();
        flyout.open(&provider, Rect::ZERO).unwrap();
        assert!(flyout.click(7).is_none());
        assert!(flyout.is_open());
    }

    #[test]
    fn test_open_hidden_range() {
        let items = ["a", "b", "c", "d"];
        let mut flyout = OverflowFlyout::new();
        flyout.open_hidden(&items, 0..2, Rect::ZERO);
        assert_eq!(flyout.logical_index(0), Some(1));
        assert_eq!(flyout.logical_index(1), Some(0));
        assert_eq!(flyout.logical_index(2), None);
    }

    #[test]
    fn test_element_prepared_binds_entry() {
        let provider = collapsed_provider();
        let mut flyout = OverflowFlyout::new();
        flyout.open(&provider, Rect::ZERO).unwrap();

        let mut element: BreadcrumbBarItem<&'static str> =
            BreadcrumbBarItem::new(Arc::new(LabelTemplate::new()));
        flyout.element_prepared(&mut element, 0);
        assert!(element.is_ellipsis_dropdown());
        assert_eq!(element.index(), Some(2));

        flyout.element_index_changed(&mut element, 1);
        assert_eq!(element.index(), Some(1));
        assert_eq!(element.content(), Some(&"Docs"));
    }
}
