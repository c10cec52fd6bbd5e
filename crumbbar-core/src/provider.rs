// SPDX-License-Identifier: LGPL-3.0-only
//! The item data provider.
//!
//! [ItemDataProvider] owns the logical items of a breadcrumb bar, the
//! primary/overflow partition and the cached widths of realized items. It
//! answers the index translations the rendering surface needs, since that
//! surface only ever sees the filtered primary or overflow view.

use crate::error::{BreadcrumbError, BreadcrumbResult, IndexView};
use crate::items::{CollectionChange, ItemsSource, SubscriptionId};
use std::cell::Cell;
use std::rc::Rc;

/// Which collapsible set an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    /// Rendered inline.
    Primary,
    /// Hidden behind the ellipsis.
    Overflow,
}

/// Per-item state owned by the provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemState {
    /// Width of the last realized visual, `None` if the item was never measured.
    pub measured_width: Option<f32>,
    /// Current membership.
    pub membership: Membership,
}

impl Default for ItemState {
    fn default() -> Self {
        Self {
            measured_width: None,
            membership: Membership::Primary,
        }
    }
}

/// Owns breadcrumb items and their primary/overflow partition.
///
/// Invariants:
/// - every item has exactly one [Membership];
/// - `primary_list_size() + overflow_list_size() == size()`;
/// - the overflow set is always a prefix `[0, k)` of the logical indices when
///   driven by the [OverflowEngine](crate::engine::OverflowEngine).
pub struct ItemDataProvider<T: Clone + 'static> {
    items: Vec<T>,
    states: Vec<ItemState>,
    primary: Vec<usize>,
    overflow: Vec<usize>,
    overflow_button_width: f32,
    source: Option<ItemsSource<T>>,
    subscription: Option<SubscriptionId>,
    pending_change: Rc<Cell<Option<CollectionChange>>>,
}

impl<T: Clone + 'static> ItemDataProvider<T> {
    /// Create an empty provider without a source.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            states: Vec::new(),
            primary: Vec::new(),
            overflow: Vec::new(),
            overflow_button_width: 0.0,
            source: None,
            subscription: None,
            pending_change: Rc::new(Cell::new(None)),
        }
    }

    /// Replace the backing collection.
    ///
    /// Every item starts in the primary list and every cached width is dropped.
    /// `None` is the valid empty state.
    pub fn set_source(&mut self, source: Option<ItemsSource<T>>) {
        self.detach();

        if let Some(source) = &source {
            let pending = self.pending_change.clone();
            self.subscription = Some(source.subscribe(move |change| {
                let merged = match pending.get() {
                    None => change,
                    Some(_) => CollectionChange::Reset,
                };
                pending.set(Some(merged));
            }));
        }
        self.source = source;
        self.pending_change.set(None);
        self.rederive();
    }

    /// The current backing collection.
    pub fn source(&self) -> Option<&ItemsSource<T>> {
        self.source.as_ref()
    }

    /// Take the change notification received since the last call.
    ///
    /// Several changes in between are reported as one [CollectionChange::Reset].
    pub fn take_pending_change(&self) -> Option<CollectionChange> {
        self.pending_change.take()
    }

    /// Re-derive all items from the backing collection.
    ///
    /// There is no incremental diffing: the partition and width cache are
    /// rebuilt from scratch.
    pub fn refresh(&mut self) {
        self.pending_change.set(None);
        self.rederive();
    }

    fn rederive(&mut self) {
        self.items = self
            .source
            .as_ref()
            .map(ItemsSource::snapshot)
            .unwrap_or_default();
        self.states = vec![ItemState::default(); self.items.len()];
        self.rebuild_views();
        log::debug!("Breadcrumb data provider re-derived {} items", self.items.len());
    }

    fn detach(&mut self) {
        if let (Some(source), Some(id)) = (self.source.take(), self.subscription.take()) {
            source.unsubscribe(id);
        }
    }

    fn rebuild_views(&mut self) {
        self.primary.clear();
        self.overflow.clear();
        for (index, state) in self.states.iter().enumerate() {
            match state.membership {
                Membership::Primary => self.primary.push(index),
                Membership::Overflow => self.overflow.push(index),
            }
        }
    }

    /// Total number of logical items.
    pub fn size(&self) -> usize {
        self.items.len()
    }

    /// Number of items in the primary list.
    pub fn primary_list_size(&self) -> usize {
        self.primary.len()
    }

    /// Number of items in the overflow list.
    pub fn overflow_list_size(&self) -> usize {
        self.overflow.len()
    }

    /// Whether at least one item is collapsed.
    pub fn has_overflow(&self) -> bool {
        self.primary.len() != self.items.len()
    }

    /// The item at a logical index.
    pub fn item(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// All items in logical order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// State of the item at a logical index.
    pub fn state(&self, index: usize) -> Option<&ItemState> {
        self.states.get(index)
    }

    /// Whether the item at a logical index is in the primary list.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a valid logical index.
    pub fn is_item_in_primary_list(&self, index: usize) -> bool {
        self.states[index].membership == Membership::Primary
    }

    /// Cached width of the item, `None` when it was never measured while primary.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a valid logical index.
    pub fn width_for_item(&self, index: usize) -> Option<f32> {
        self.states[index].measured_width
    }

    /// Record a fresh measurement for the item at `primary_position`.
    ///
    /// # Panics
    ///
    /// Panics if `primary_position` is outside of the primary list.
    pub fn update_width_for_primary_item(&mut self, primary_position: usize, width: f32) {
        let index = self.primary[primary_position];
        self.states[index].measured_width = Some(width);
    }

    /// Move the given logical indices into the primary list. Order is irrelevant.
    pub fn move_items_to_primary_list(&mut self, indices: &[usize]) {
        self.set_membership(indices, Membership::Primary);
    }

    /// Move the given logical indices into the overflow list. Order is irrelevant.
    pub fn move_items_out_of_primary_list(&mut self, indices: &[usize]) {
        self.set_membership(indices, Membership::Overflow);
        debug_assert!(
            self.items.is_empty() || !self.primary.is_empty(),
            "the primary list must keep at least one item"
        );
    }

    fn set_membership(&mut self, indices: &[usize], membership: Membership) {
        if indices.is_empty() {
            return;
        }
        for &index in indices {
            self.states[index].membership = membership;
        }
        self.rebuild_views();
        log::debug!(
            "Moved {:?} to {:?} (primary {}/{})",
            indices,
            membership,
            self.primary.len(),
            self.items.len()
        );
    }

    /// Reset to "no overflow".
    pub fn move_all_items_to_primary_list(&mut self) {
        if !self.has_overflow() {
            return;
        }
        for state in &mut self.states {
            state.membership = Membership::Primary;
        }
        self.rebuild_views();
        log::debug!("Moved all {} items to the primary list", self.items.len());
    }

    /// Sum of the cached widths of every overflowed item.
    ///
    /// Items without a cached width count as zero, which favors attempting a
    /// recovery over refusing it.
    pub fn width_required_to_recovery_all_items_to_primary(&self) -> f32 {
        self.overflow
            .iter()
            .map(|&index| match self.states[index].measured_width {
                Some(width) => width,
                None => {
                    log::debug!("Item {} has no cached width, assuming 0", index);
                    0.0
                }
            })
            .sum()
    }

    /// Logical indices of the primary list, in order.
    pub fn primary_indices(&self) -> &[usize] {
        &self.primary
    }

    /// Logical indices of the overflow list, in order.
    pub fn overflow_indices(&self) -> &[usize] {
        &self.overflow
    }

    /// Primary items in logical order.
    pub fn primary_items(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        self.primary.iter().map(move |&index| &self.items[index])
    }

    /// Overflowed items in logical order.
    pub fn overflow_items(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        self.overflow.iter().map(move |&index| &self.items[index])
    }

    /// Translate a position of the primary view into a logical index.
    pub fn convert_primary_index_to_index(&self, position: usize) -> BreadcrumbResult<usize> {
        self.primary.get(position).copied().ok_or_else(|| {
            BreadcrumbError::index_out_of_range(position, self.primary.len(), IndexView::Primary)
        })
    }

    /// Translate a position of the overflow view into a logical index.
    pub fn convert_overflow_index_to_index(&self, position: usize) -> BreadcrumbResult<usize> {
        self.overflow.get(position).copied().ok_or_else(|| {
            BreadcrumbError::index_out_of_range(position, self.overflow.len(), IndexView::Overflow)
        })
    }

    /// Translate several primary positions, preserving their order.
    pub fn convert_primary_indices_to_indices(
        &self,
        positions: &[usize],
    ) -> BreadcrumbResult<Vec<usize>> {
        positions
            .iter()
            .map(|&position| self.convert_primary_index_to_index(position))
            .collect()
    }

    /// Translate several overflow positions, preserving their order.
    pub fn convert_overflow_indices_to_indices(
        &self,
        positions: &[usize],
    ) -> BreadcrumbResult<Vec<usize>> {
        positions
            .iter()
            .map(|&position| self.convert_overflow_index_to_index(position))
            .collect()
    }

    /// Cached width of the ellipsis indicator, 0 until first measured.
    pub fn overflow_button_width(&self) -> f32 {
        self.overflow_button_width
    }

    /// Record the width of the ellipsis indicator.
    pub fn set_overflow_button_width(&mut self, width: f32) {
        self.overflow_button_width = width;
    }
}

impl<T: Clone + 'static> Default for ItemDataProvider<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Drop for ItemDataProvider<T> {
    fn drop(&mut self) {
        self.detach();
    }
}

impl<T: Clone + std::fmt::Debug + 'static> std::fmt::Debug for ItemDataProvider<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemDataProvider")
            .field("items", &self.items)
            .field("primary", &self.primary)
            .field("overflow", &self.overflow)
            .field("overflow_button_width", &self.overflow_button_width)
            .finish()
    }
}
