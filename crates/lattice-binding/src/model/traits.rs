//! Core traits for observable lists.
//!
//! This module defines the change notification contract shared by every list
//! in the crate, and the trait that lets a [`FilteredList`] observe any source.
//!
//! [`FilteredList`]: super::FilteredList

use lattice_binding_core::Signal;

use super::sort::SortDescriptor;

/// A structured description of one change to an observable list.
///
/// Indices always refer to the list that emitted the notification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListChange {
    /// An element was inserted at this index.
    ItemAdded(usize),
    /// The element at this index is about to be removed.
    ///
    /// Emitted *before* removal, so the element is still readable at
    /// `index` while slots run.
    ItemRemoved(usize),
    /// The element at `index` changed in place.
    ItemChanged {
        /// Position of the changed element.
        index: usize,
        /// The changed property, or `None` if the whole element was replaced
        /// or the changed property is unknown.
        property: Option<String>,
    },
    /// The list was emptied.
    Cleared,
    /// Anything may have changed; discard assumptions and re-read the list.
    Reset,
}

impl ListChange {
    /// Convenience constructor for a named property change.
    pub fn property_changed(index: usize, property: impl Into<String>) -> Self {
        ListChange::ItemChanged {
            index,
            property: Some(property.into()),
        }
    }

    /// Convenience constructor for a whole-item change.
    pub fn item_replaced(index: usize) -> Self {
        ListChange::ItemChanged {
            index,
            property: None,
        }
    }

    /// The index this change refers to, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            ListChange::ItemAdded(i) | ListChange::ItemRemoved(i) => Some(*i),
            ListChange::ItemChanged { index, .. } => Some(*index),
            ListChange::Cleared | ListChange::Reset => None,
        }
    }
}

/// Collection of signals emitted by observable lists.
///
/// Consumers connect to these signals to stay synchronized with the list.
///
/// # Signal Usage
///
/// - **Before removal**: `before_item_removed` fires, then `list_changed`
///   with [`ListChange::ItemRemoved`], then the element is removed
/// - **Before clearing**: `before_cleared` fires, the list is emptied, then
///   `list_changed` with [`ListChange::Cleared`]
/// - **Everything else**: `list_changed` after the mutation
/// - **Sort changes**: `sort_changed` with the new sort descriptor, or `None`
///   when sorting is removed
///
/// Only `list_changed` is affected by suppressing list-changed events.
pub struct ListSignals {
    /// Emitted for every structural or element change.
    pub list_changed: Signal<ListChange>,

    /// Emitted just before the element at this index is removed.
    pub before_item_removed: Signal<usize>,

    /// Emitted just before the list is cleared.
    pub before_cleared: Signal<()>,

    /// Emitted when the active sort is applied or removed.
    /// Args: the new sort descriptor, if sorted.
    pub sort_changed: Signal<Option<SortDescriptor>>,
}

impl Default for ListSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl ListSignals {
    /// Creates a new set of list signals.
    pub fn new() -> Self {
        Self {
            list_changed: Signal::new(),
            before_item_removed: Signal::new(),
            before_cleared: Signal::new(),
            sort_changed: Signal::new(),
        }
    }

    /// Emits the pre-removal signals for `index`.
    ///
    /// Call this before the element is taken out of the list.
    pub fn emit_before_removed(&self, index: usize) {
        self.before_item_removed.emit(index);
        self.list_changed.emit(ListChange::ItemRemoved(index));
    }

    /// Emits signals for clearing the list.
    ///
    /// Calls the provided function between `before_cleared` and `Cleared`.
    pub fn emit_cleared<F>(&self, clear_fn: F)
    where
        F: FnOnce(),
    {
        self.before_cleared.emit(());
        clear_fn();
        self.list_changed.emit(ListChange::Cleared);
    }

    /// Emits a reset notification.
    pub fn emit_reset(&self) {
        self.list_changed.emit(ListChange::Reset);
    }
}

/// An ordered sequence that reports its changes through [`ListSignals`].
///
/// This is the only contract a [`FilteredList`] needs from its source.
///
/// # Implementation Requirements
///
/// - Emit [`ListChange::ItemRemoved`] *before* removing an element, while it
///   is still readable at that index.
/// - Emit every other notification *after* the mutation, so the element can
///   be read at the reported index.
/// - Never hold an internal lock while emitting, since slots read the list.
///
/// [`FilteredList`]: super::FilteredList
pub trait ObservableList: Send + Sync {
    /// The element type.
    type Item;

    /// Returns the number of elements.
    fn len(&self) -> usize;

    /// Returns `true` if the list is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls `f` with the element at `index`, or returns `None` if the index
    /// is out of range.
    fn with_item<R>(&self, index: usize, f: impl FnOnce(&Self::Item) -> R) -> Option<R>;

    /// Returns the signals for this list.
    fn signals(&self) -> &ListSignals;

    /// Returns a clone of the element at `index`.
    fn get(&self, index: usize) -> Option<Self::Item>
    where
        Self::Item: Clone,
    {
        self.with_item(index, Clone::clone)
    }

    /// Clones every element into a `Vec`, in list order.
    fn to_vec(&self) -> Vec<Self::Item>
    where
        Self::Item: Clone,
    {
        (0..self.len()).filter_map(|i| self.get(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_list_signals_creation() {
        let signals = ListSignals::new();
        assert_eq!(signals.list_changed.connection_count(), 0);
        assert_eq!(signals.before_item_removed.connection_count(), 0);
    }

    #[test]
    fn test_emit_before_removed_order() {
        let signals = ListSignals::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let recv_before = received.clone();
        signals.before_item_removed.connect(move |index| {
            recv_before.lock().push(format!("before {index}"));
        });

        let recv_changed = received.clone();
        signals.list_changed.connect(move |change| {
            recv_changed.lock().push(format!("{change:?}"));
        });

        signals.emit_before_removed(3);

        let events = received.lock();
        assert_eq!(*events, vec!["before 3".to_string(), "ItemRemoved(3)".to_string()]);
    }

    #[test]
    fn test_emit_cleared_wraps_clear() {
        let signals = ListSignals::new();
        let counter = Arc::new(Mutex::new(Vec::new()));

        let c1 = counter.clone();
        signals.before_cleared.connect(move |_| c1.lock().push("before"));

        let c2 = counter.clone();
        signals.list_changed.connect(move |change| {
            assert_eq!(*change, ListChange::Cleared);
            c2.lock().push("cleared");
        });

        let c3 = counter.clone();
        signals.emit_cleared(|| c3.lock().push("clear"));
        assert_eq!(*counter.lock(), vec!["before", "clear", "cleared"]);
    }

    #[test]
    fn test_change_index() {
        assert_eq!(ListChange::ItemAdded(2).index(), Some(2));
        assert_eq!(ListChange::property_changed(5, "Name").index(), Some(5));
        assert_eq!(ListChange::Reset.index(), None);
        assert_eq!(
            ListChange::item_replaced(1),
            ListChange::ItemChanged {
                index: 1,
                property: None
            }
        );
    }
}
