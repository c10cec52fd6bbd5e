// SPDX-License-Identifier: LGPL-3.0-only
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// Describes how an [ItemsSource] was mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionChange {
    /// `count` items were inserted starting at `index`.
    Added {
        /// First inserted index.
        index: usize,
        /// Number of inserted items.
        count: usize,
    },
    /// `count` items were removed starting at `index`.
    Removed {
        /// First removed index.
        index: usize,
        /// Number of removed items.
        count: usize,
    },
    /// The collection was replaced or changed in an unspecified way.
    Reset,
}

/// Identifies a listener registered on an [ItemsSource].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

type ChangeListener = Rc<dyn Fn(CollectionChange)>;

struct Inner<T> {
    items: Vec<T>,
    listeners: Vec<(SubscriptionId, ChangeListener)>,
    next_id: usize,
}

/// An observable list of breadcrumb contents.
///
/// Cloning the source shares the underlying list, so a widget and the
/// application can hold the same collection. Every effective mutation notifies
/// the registered listeners with a [CollectionChange].
pub struct ItemsSource<T: 'static> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T: 'static> ItemsSource<T> {
    /// Creates a new source with the given items.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                items,
                listeners: Vec::with_capacity(1),
                next_id: 0,
            })),
        }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    /// Returns `true` if there are no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the items.
    pub fn items(&self) -> Ref<'_, [T]> {
        Ref::map(self.inner.borrow(), |inner| inner.items.as_slice())
    }

    /// Append an item.
    pub fn push(&self, item: T) {
        let index = {
            let mut inner = self.inner.borrow_mut();
            inner.items.push(item);
            inner.items.len() - 1
        };
        self.notify(CollectionChange::Added { index, count: 1 });
    }

    /// Insert an item at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&self, index: usize, item: T) {
        self.inner.borrow_mut().items.insert(index, item);
        self.notify(CollectionChange::Added { index, count: 1 });
    }

    /// Remove and return the item at `index`, or `None` if out of range.
    pub fn remove(&self, index: usize) -> Option<T> {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            (index < inner.items.len()).then(|| inner.items.remove(index))
        };
        if removed.is_some() {
            self.notify(CollectionChange::Removed { index, count: 1 });
        }
        removed
    }

    /// Remove and return the last item.
    pub fn pop(&self) -> Option<T> {
        let popped = {
            let mut inner = self.inner.borrow_mut();
            inner.items.pop().map(|item| (item, inner.items.len()))
        };
        popped.map(|(item, index)| {
            self.notify(CollectionChange::Removed { index, count: 1 });
            item
        })
    }

    /// Keep only the first `len` items.
    pub fn truncate(&self, len: usize) {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            let old_len = inner.items.len();
            inner.items.truncate(len);
            old_len.saturating_sub(len)
        };
        if removed > 0 {
            self.notify(CollectionChange::Removed {
                index: len,
                count: removed,
            });
        }
    }

    /// Remove every item.
    pub fn clear(&self) {
        let was_empty = {
            let mut inner = self.inner.borrow_mut();
            let was_empty = inner.items.is_empty();
            inner.items.clear();
            was_empty
        };
        if !was_empty {
            self.notify(CollectionChange::Reset);
        }
    }

    /// Replace all items.
    pub fn reset(&self, items: Vec<T>) {
        self.inner.borrow_mut().items = items;
        self.notify(CollectionChange::Reset);
    }

    /// Mutate the items in a set scope. Listeners receive [CollectionChange::Reset].
    pub fn mutate(&self, op: impl FnOnce(&mut Vec<T>)) {
        op(&mut self.inner.borrow_mut().items);
        self.notify(CollectionChange::Reset);
    }

    /// Register a change listener.
    pub fn subscribe(&self, listener: impl Fn(CollectionChange) + 'static) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, Rc::new(listener)));
        id
    }

    /// Remove a change listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(listener_id, _)| *listener_id != id);
        inner.listeners.len() != before
    }

    /// Returns `true` if both handles share the same list.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn notify(&self, change: CollectionChange) {
        // Listeners may read the source, so release the borrow first.
        let listeners: Vec<ChangeListener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(change);
        }
    }
}

impl<T: Clone + 'static> ItemsSource<T> {
    /// Clone the current items.
    pub fn snapshot(&self) -> Vec<T> {
        self.inner.borrow().items.clone()
    }
}

impl<T: 'static> Clone for ItemsSource<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: 'static> Default for ItemsSource<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: 'static> From<Vec<T>> for ItemsSource<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T: std::fmt::Debug + 'static> std::fmt::Debug for ItemsSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ItemsSource")
            .field("items", &inner.items)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording(source: &ItemsSource<&'static str>) -> Rc<RefCell<Vec<CollectionChange>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        source.subscribe(move |change| sink.borrow_mut().push(change));
        log
    }

    #[test]
    fn test_mutations_notify() {
        let source = ItemsSource::new(vec!["Home"]);
        let log = recording(&source);

        source.push("Documents");
        source.insert(0, "Root");
        assert_eq!(source.remove(1), Some("Home"));
        source.truncate(1);
        source.reset(vec!["A", "B"]);

        assert_eq!(
            *log.borrow(),
            vec![
                CollectionChange::Added { index: 1, count: 1 },
                CollectionChange::Added { index: 0, count: 1 },
                CollectionChange::Removed { index: 1, count: 1 },
                CollectionChange::Removed { index: 1, count: 1 },
                CollectionChange::Reset,
            ]
        );
        assert_eq!(source.snapshot(), vec!["A", "B"]);
    }

    #[test]
    fn test_noop_mutations_are_silent() {
        let source: ItemsSource<&'static str> = ItemsSource::default();
        let log = recording(&source);

        assert_eq!(source.pop(), None);
        assert_eq!(source.remove(3), None);
        source.truncate(4);
        source.clear();

        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_unsubscribe() {
        let source = ItemsSource::new(vec!["Home"]);
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let id = source.subscribe(move |_| *sink.borrow_mut() += 1);

        source.push("Documents");
        assert!(source.unsubscribe(id));
        assert!(!source.unsubscribe(id));
        source.push("Projects");

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_clones_share_items() {
        let source = ItemsSource::new(vec![1, 2]);
        let other = source.clone();
        other.push(3);
        assert!(source.ptr_eq(&other));
        assert_eq!(source.len(), 3);
        assert_eq!(&*source.items(), &[1, 2, 3]);
    }
}
