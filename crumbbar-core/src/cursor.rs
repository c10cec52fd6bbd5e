// SPDX-License-Identifier: LGPL-3.0-only
//! Slot-based traversal of breadcrumb items.
//!
//! A breadcrumb row reserves its first slot for the ellipsis indicator, so a
//! list of `n` items has `n + 1` slots: slot 0 yields `None` and slot `i`
//! yields item `i - 1`.

use crate::error::{BreadcrumbError, BreadcrumbResult};

/// An explicit cursor over breadcrumb slots.
///
/// The cursor starts before the first slot. Reading it before the first
/// [`move_next`](Self::move_next), or advancing it past the end, is a
/// programmer error and reported as [BreadcrumbError::CursorOutOfRange].
#[derive(Debug, Clone)]
pub struct BreadcrumbCursor<'a, T> {
    items: Option<&'a [T]>,
    position: Option<usize>,
    size: usize,
}

impl<'a, T> BreadcrumbCursor<'a, T> {
    /// Create a cursor over `items`. An absent list still has the ellipsis slot.
    pub fn new(items: Option<&'a [T]>) -> Self {
        let size = items.map_or(0, <[T]>::len) + 1;
        Self {
            items,
            position: None,
            size,
        }
    }

    /// Number of slots including the ellipsis slot.
    pub fn slot_count(&self) -> usize {
        self.size
    }

    /// Current slot, `None` before the first advance.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    fn has_current(&self) -> bool {
        self.position.map_or(true, |position| position < self.size)
    }

    /// Value of the current slot: `None` for the ellipsis slot, the item otherwise.
    pub fn current(&self) -> BreadcrumbResult<Option<&'a T>> {
        match self.position {
            Some(0) => Ok(None),
            Some(position) if position < self.size => Ok(self
                .items
                .and_then(|items| items.get(position - 1))),
            position => Err(BreadcrumbError::cursor_out_of_range(position, self.size)),
        }
    }

    /// Advance to the next slot. Returns whether the cursor now points at a slot.
    pub fn move_next(&mut self) -> BreadcrumbResult<bool> {
        if !self.has_current() {
            return Err(BreadcrumbError::cursor_out_of_range(
                self.position,
                self.size,
            ));
        }
        let next = self.position.map_or(0, |position| position + 1);
        self.position = Some(next);
        Ok(next < self.size)
    }

    /// Rewind to before the first slot.
    pub fn reset(&mut self) {
        self.position = None;
    }

    /// Fill `out` with consecutive slot values starting at the current slot.
    ///
    /// Returns how many entries were written. The cursor ends on the slot
    /// after the last one written.
    pub fn get_many(&mut self, out: &mut [Option<&'a T>]) -> BreadcrumbResult<usize> {
        let mut written = 0;
        if self.position.is_some() && self.has_current() {
            loop {
                if written >= out.len() {
                    break;
                }
                out[written] = self.current()?;
                written += 1;
                if !self.move_next()? {
                    break;
                }
            }
        }
        Ok(written)
    }

    /// Drive the cursor as a standard iterator.
    pub fn slots(self) -> BreadcrumbSlots<'a, T> {
        BreadcrumbSlots { cursor: self }
    }
}

/// Iterator adapter over a [BreadcrumbCursor].
#[derive(Debug, Clone)]
pub struct BreadcrumbSlots<'a, T> {
    cursor: BreadcrumbCursor<'a, T>,
}

impl<'a, T> Iterator for BreadcrumbSlots<'a, T> {
    type Item = Option<&'a T>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.cursor.has_current() {
            return None;
        }
        match self.cursor.move_next() {
            Ok(true) => self.cursor.current().ok(),
            _ => None,
        }
    }
}
