//! Sortable observable list.
//!
//! `BindingList<T>` is an ordered, mutable list that reports every change
//! through [`ListSignals`]. On top of the plain list operations it supports:
//!
//! - multi-key sorting by named properties, kept up to date as items change
//! - lookup of the first element whose property equals a value
//! - bulk appends that emit a single reset instead of one event per item
//! - a begin/commit/cancel protocol for adding an item that is edited before
//!   it takes its sorted place
//!
//! Every method takes `&self`; the list is meant to be shared as
//! `Arc<BindingList<T>>` between its owner and observers such as a
//! [`FilteredList`](super::FilteredList). No internal lock is held while a
//! signal is emitted.

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use lattice_binding_core::logging::{span_names, targets};
use lattice_binding_core::{BindingError, PerfSpan, Result};

use super::comparer::Comparer;
use super::property::{Properties, PropertyRegistry};
use super::sort::SortDescriptor;
use super::traits::{ListChange, ListSignals, ObservableList};
use super::value::PropertyValue;

/// Behavior switches for a [`BindingList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingListConfig {
    /// Whether [`BindingList::begin_new`] is permitted.
    pub allow_new: bool,
    /// Whether elements may be replaced or modified in place.
    pub allow_edit: bool,
    /// Whether elements may be removed or the list cleared.
    pub allow_remove: bool,
    /// Whether `list_changed` notifications are emitted.
    pub raise_list_changed_events: bool,
}

impl Default for BindingListConfig {
    fn default() -> Self {
        Self {
            allow_new: true,
            allow_edit: true,
            allow_remove: true,
            raise_list_changed_events: true,
        }
    }
}

impl BindingListConfig {
    /// Creates the default configuration (everything allowed, events on).
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration that rejects every mutation except appends.
    pub fn append_only() -> Self {
        Self {
            allow_new: false,
            allow_edit: false,
            allow_remove: false,
            ..Self::default()
        }
    }

    /// Sets the allow-new flag.
    pub fn with_allow_new(mut self, allow: bool) -> Self {
        self.allow_new = allow;
        self
    }

    /// Sets the allow-edit flag.
    pub fn with_allow_edit(mut self, allow: bool) -> Self {
        self.allow_edit = allow;
        self
    }

    /// Sets the allow-remove flag.
    pub fn with_allow_remove(mut self, allow: bool) -> Self {
        self.allow_remove = allow;
        self
    }

    /// Sets whether list-changed notifications are emitted.
    pub fn with_list_changed_events(mut self, raise: bool) -> Self {
        self.raise_list_changed_events = raise;
        self
    }
}

/// How [`BindingList::add_range_with`] reports the appended items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddRangeMode {
    /// No per-item notifications; one [`ListChange::Reset`] at the end.
    #[default]
    SingleReset,
    /// One [`ListChange::ItemAdded`] per item and no trailing reset.
    PerItem,
}

/// The sort currently applied to a list.
struct ActiveSort<T> {
    descriptor: SortDescriptor,
    comparer: Comparer<T>,
}

struct ListState<T> {
    sort: Option<ActiveSort<T>>,
    /// Index of the item added by `begin_new` and not yet committed.
    pending_new: Option<usize>,
}

/// A sortable list that emits change notifications.
///
/// # Example
///
/// ```
/// use lattice_binding::model::{BindingList, ObservableList, PropertyRegistry, SortDescriptor};
///
/// #[derive(Clone, Default)]
/// struct Person {
///     name: String,
/// }
///
/// let registry = PropertyRegistry::<Person>::builder()
///     .property("Name", |p| p.name.clone())
///     .build();
///
/// let list = BindingList::with_registry(
///     vec![Person { name: "Bob".into() }, Person { name: "Ann".into() }],
///     registry,
/// );
///
/// list.apply_sort(SortDescriptor::ascending("Name")).unwrap();
/// assert_eq!(list.with_item(0, |p| p.name.clone()).as_deref(), Some("Ann"));
///
/// // New items take their sorted position.
/// list.add(Person { name: "Abe".into() });
/// assert_eq!(list.find("Name", "Abe").unwrap(), Some(0));
/// ```
pub struct BindingList<T> {
    items: RwLock<Vec<T>>,
    state: Mutex<ListState<T>>,
    config: RwLock<BindingListConfig>,
    registry: Arc<PropertyRegistry<T>>,
    signals: ListSignals,
}

impl<T: Properties + Send + Sync> BindingList<T> {
    /// Creates a list of items that describe their own properties.
    pub fn new(items: Vec<T>) -> Self {
        Self::with_registry(items, T::property_registry().clone())
    }

    /// Creates an empty list.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Send + Sync + 'static> BindingList<T> {
    /// Creates a list whose element properties are described by `registry`.
    pub fn with_registry(items: Vec<T>, registry: PropertyRegistry<T>) -> Self {
        Self {
            items: RwLock::new(items),
            state: Mutex::new(ListState {
                sort: None,
                pending_new: None,
            }),
            config: RwLock::new(BindingListConfig::default()),
            registry: Arc::new(registry),
            signals: ListSignals::new(),
        }
    }

    /// Replaces the configuration, returning `self` for chaining.
    pub fn with_config(self, config: BindingListConfig) -> Self {
        self.set_config(config);
        self
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Returns the current configuration.
    pub fn config(&self) -> BindingListConfig {
        *self.config.read()
    }

    /// Replaces the configuration.
    pub fn set_config(&self, config: BindingListConfig) {
        *self.config.write() = config;
        self.signals
            .list_changed
            .set_blocked(!config.raise_list_changed_events);
    }

    /// Suppresses or restores `list_changed` notifications.
    ///
    /// While suppressed the list stays correct and queryable; observers fall
    /// out of date until [`BindingList::reset_bindings`] is called.
    pub fn set_raise_list_changed_events(&self, raise: bool) {
        let config = self.config().with_list_changed_events(raise);
        self.set_config(config);
    }

    /// Returns `true` if `list_changed` notifications are emitted.
    pub fn raises_list_changed_events(&self) -> bool {
        self.config.read().raise_list_changed_events
    }

    /// The property registry used for sorting and searching.
    pub fn registry(&self) -> &PropertyRegistry<T> {
        &self.registry
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    /// Returns the number of items in the list.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Returns a read guard over the items.
    ///
    /// Do not mutate the list while holding the guard.
    pub fn items(&self) -> impl std::ops::Deref<Target = Vec<T>> + '_ {
        self.items.read()
    }

    /// The active sort descriptor, if any.
    pub fn sort_descriptor(&self) -> Option<SortDescriptor> {
        self.state
            .lock()
            .sort
            .as_ref()
            .map(|sort| sort.descriptor.clone())
    }

    /// Returns `true` if a sort is active.
    pub fn is_sorted(&self) -> bool {
        self.state.lock().sort.is_some()
    }

    /// Index of the uncommitted item from [`BindingList::begin_new`].
    pub fn pending_new(&self) -> Option<usize> {
        self.state.lock().pending_new
    }

    /// Returns the index of the first item whose `property` equals `key`.
    ///
    /// Fails with `InvalidProperty` if the element type has no such property,
    /// or with the accessor's error if reading the property fails.
    pub fn find(&self, property: &str, key: impl Into<PropertyValue>) -> Result<Option<usize>> {
        let accessor = self.registry.resolve(property)?;
        let key = key.into();

        let items = self.items.read();
        for (index, item) in items.iter().enumerate() {
            if accessor.get(item)? == key {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Appends an item, or inserts it at its sorted position if sorted.
    ///
    /// Returns the index the item was placed at.
    pub fn add(&self, item: T) -> usize {
        self.commit_pending();
        let index = self.sorted_position(&item).unwrap_or_else(|| self.len());
        self.raw_insert(index, item);
        index
    }

    /// Inserts an item at `index`.
    ///
    /// If sorted, the item goes to its sorted position instead; the returned
    /// index is where it was actually placed.
    pub fn insert(&self, index: usize, item: T) -> Result<usize> {
        let len = self.len();
        if index > len {
            return Err(BindingError::index_out_of_range(index, len));
        }

        self.commit_pending();
        let index = self.sorted_position(&item).unwrap_or(index);
        self.raw_insert(index, item);
        Ok(index)
    }

    /// Removes and returns the item at `index`.
    ///
    /// Removing the pending new item ends the new-item transaction and is
    /// allowed even when removal is disabled.
    pub fn remove_at(&self, index: usize) -> Result<T> {
        let len = self.len();
        if index >= len {
            return Err(BindingError::index_out_of_range(index, len));
        }
        if !self.config().allow_remove && self.pending_new() != Some(index) {
            return Err(BindingError::NotAllowed("remove"));
        }

        Ok(self.raw_remove(index))
    }

    /// Replaces the item at `index`, returning the old item.
    ///
    /// If sorted, the new item is moved to its sorted position.
    pub fn replace(&self, index: usize, item: T) -> Result<T> {
        self.check_edit(index)?;

        let old = std::mem::replace(&mut self.items.write()[index], item);
        self.signals
            .list_changed
            .emit(ListChange::item_replaced(index));
        self.restore_order(index, true);
        Ok(old)
    }

    /// Modifies the item at `index` in place.
    ///
    /// Emits an `ItemChanged` with no property name. If sorted, the item is
    /// moved to its sorted position.
    pub fn modify<F, R>(&self, index: usize, f: F) -> Result<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        self.check_edit(index)?;

        let result = f(&mut self.items.write()[index]);
        self.signals
            .list_changed
            .emit(ListChange::item_replaced(index));
        self.restore_order(index, true);
        Ok(result)
    }

    /// Modifies one named property of the item at `index`.
    ///
    /// Emits an `ItemChanged` naming `property`. If the list is sorted by
    /// `property` as its primary key, the item is removed and reinserted at
    /// its sorted position, unless it is the pending new item, whose move is
    /// deferred to [`BindingList::commit_new`].
    pub fn modify_property<F, R>(&self, index: usize, property: &str, f: F) -> Result<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        self.check_edit(index)?;

        let result = f(&mut self.items.write()[index]);
        self.signals
            .list_changed
            .emit(ListChange::property_changed(index, property));

        let affects_order = self
            .state
            .lock()
            .sort
            .as_ref()
            .is_some_and(|sort| sort.comparer.primary_property() == Some(property));
        self.restore_order(index, affects_order);
        Ok(result)
    }

    /// Removes every item.
    pub fn clear(&self) -> Result<()> {
        if !self.config().allow_remove {
            return Err(BindingError::NotAllowed("clear"));
        }

        self.signals.emit_cleared(|| {
            self.items.write().clear();
            self.state.lock().pending_new = None;
        });
        tracing::trace!(target: targets::LIST, "list cleared");
        Ok(())
    }

    /// Appends many items with a single trailing reset.
    ///
    /// Returns the number of items added.
    pub fn add_range<I>(&self, items: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        self.add_range_with(items, AddRangeMode::SingleReset)
    }

    /// Appends many items, reporting them as `mode` specifies.
    ///
    /// In [`AddRangeMode::SingleReset`] a sorted list is fully resorted after
    /// the append.
    pub fn add_range_with<I>(&self, items: I, mode: AddRangeMode) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        match mode {
            AddRangeMode::PerItem => items.into_iter().map(|item| self.add(item)).count(),
            AddRangeMode::SingleReset => {
                self.commit_pending();

                let added = {
                    let mut list = self.items.write();
                    let before = list.len();
                    list.extend(items);
                    list.len() - before
                };
                let _span = PerfSpan::with_len(span_names::ADD_RANGE, added);

                // a failed resort has already dropped the sort; the appended
                // items still need the reset
                let _ = self.try_resort();
                self.signals.emit_reset();
                tracing::debug!(target: targets::LIST, added, "range added");
                added
            }
        }
    }

    /// Emits a reset so observers re-read the whole list.
    pub fn reset_bindings(&self) {
        self.signals.emit_reset();
    }

    /// Emits an `ItemChanged` with no property name for `index`.
    pub fn reset_item(&self, index: usize) -> Result<()> {
        let len = self.len();
        if index >= len {
            return Err(BindingError::index_out_of_range(index, len));
        }
        self.signals
            .list_changed
            .emit(ListChange::item_replaced(index));
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Sorts the list by `descriptor` and keeps it sorted.
    ///
    /// Every property name is validated first; an unknown name fails with
    /// `InvalidProperty` and leaves the list and its current sort untouched.
    /// The sort is stable. On success a single `Reset` is emitted.
    ///
    /// If reading a property fails during the sort, the list keeps its
    /// previous order, becomes unsorted, and `SortFailure` is returned.
    #[tracing::instrument(skip_all, target = "lattice_binding::sort", level = "debug")]
    pub fn apply_sort(&self, descriptor: impl Into<SortDescriptor>) -> Result<()> {
        let descriptor = descriptor.into();
        if descriptor.is_empty() {
            return Err(BindingError::InvalidSortDescriptor(
                "at least one sort key is required".into(),
            ));
        }

        let comparer = Comparer::new(&self.registry, &descriptor)?;

        {
            let mut state = self.state.lock();
            state.pending_new = None;
            state.sort = Some(ActiveSort {
                descriptor: descriptor.clone(),
                comparer,
            });
        }

        if let Err(err) = self.try_resort() {
            return Err(err.into_sort_failure());
        }

        tracing::debug!(target: targets::SORT, sort = %descriptor, "sort applied");
        self.signals.sort_changed.emit(Some(descriptor));
        self.signals.emit_reset();
        Ok(())
    }

    /// Removes the active sort.
    ///
    /// The current order is kept; the pre-sort order is not restored.
    pub fn remove_sort(&self) {
        let removed = self.state.lock().sort.take().is_some();
        if removed {
            tracing::debug!(target: targets::SORT, "sort removed");
            self.signals.sort_changed.emit(None);
        }
    }

    // -------------------------------------------------------------------------
    // New-item transaction
    // -------------------------------------------------------------------------

    /// Appends a default-constructed item that is not sorted until committed.
    ///
    /// Any earlier uncommitted item is committed first. Returns the index of
    /// the new item.
    pub fn begin_new(&self) -> Result<usize>
    where
        T: Default,
    {
        if !self.config().allow_new {
            return Err(BindingError::NotAllowed("new item"));
        }

        self.commit_pending();
        let index = self.len();
        self.raw_insert(index, T::default());
        self.state.lock().pending_new = Some(index);
        tracing::trace!(target: targets::LIST, index, "new item begun");
        Ok(index)
    }

    /// Commits the pending new item at `index`.
    ///
    /// If sorted, the whole list is resorted, since edits made during the
    /// transaction may have touched several sort keys. Returns `false` (and
    /// does nothing) if `index` is not the pending item.
    pub fn commit_new(&self, index: usize) -> bool {
        {
            let mut state = self.state.lock();
            if state.pending_new != Some(index) {
                return false;
            }
            state.pending_new = None;
        }

        tracing::trace!(target: targets::LIST, index, "new item committed");
        if self.is_sorted() {
            self.resort();
        }
        true
    }

    /// Discards the pending new item at `index`.
    ///
    /// Returns `false` (and does nothing) if `index` is not the pending item.
    pub fn cancel_new(&self, index: usize) -> bool {
        if self.pending_new() != Some(index) {
            return false;
        }

        self.raw_remove(index);
        tracing::trace!(target: targets::LIST, index, "new item cancelled");
        true
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn check_edit(&self, index: usize) -> Result<()> {
        let len = self.len();
        if index >= len {
            return Err(BindingError::index_out_of_range(index, len));
        }
        if !self.config().allow_edit {
            return Err(BindingError::NotAllowed("edit"));
        }
        Ok(())
    }

    /// Inserts and notifies. The caller picks the index.
    fn raw_insert(&self, index: usize, item: T) {
        self.items.write().insert(index, item);
        if let Some(pending) = self.state.lock().pending_new.as_mut() {
            if *pending >= index {
                *pending += 1;
            }
        }
        tracing::trace!(target: targets::LIST, index, "item added");
        self.signals.list_changed.emit(ListChange::ItemAdded(index));
    }

    /// Notifies, then removes.
    fn raw_remove(&self, index: usize) -> T {
        self.signals.emit_before_removed(index);
        let item = self.items.write().remove(index);
        {
            let mut state = self.state.lock();
            state.pending_new = match state.pending_new {
                Some(pending) if pending == index => None,
                Some(pending) if pending > index => Some(pending - 1),
                other => other,
            };
        }
        tracing::trace!(target: targets::LIST, index, "item removed");
        item
    }

    /// Where `item` belongs if the list is sorted; `None` when unsorted.
    ///
    /// A failing property read drops the sort and yields `None`.
    fn sorted_position(&self, item: &T) -> Option<usize> {
        let comparer = self.active_comparer()?;
        let position = comparer.insertion_point(&self.items.read(), item);
        match position {
            Ok(index) => Some(index),
            Err(err) => {
                self.abandon_sort(&err);
                None
            }
        }
    }

    /// Re-establishes sort order after the item at `index` changed.
    fn restore_order(&self, index: usize, affects_order: bool) {
        if !affects_order {
            return;
        }
        let Some(comparer) = self.active_comparer() else {
            return;
        };

        match self.pending_new() {
            Some(pending) if pending == index => return,
            Some(_) => {
                // the pending item sits unsorted at the end; a full resort
                // places both it and the changed item
                self.commit_pending();
                return;
            }
            None => {}
        }

        let in_place = comparer.is_in_place(&self.items.read(), index);
        match in_place {
            Ok(true) => {}
            Ok(false) => {
                let item = self.raw_remove(index);
                let target = comparer.insertion_point(&self.items.read(), &item);
                let target = target.unwrap_or_else(|err| {
                    self.abandon_sort(&err);
                    index
                });
                self.raw_insert(target, item);
            }
            Err(err) => self.abandon_sort(&err),
        }
    }

    /// Commits whatever item is pending.
    fn commit_pending(&self) {
        if let Some(index) = self.pending_new() {
            self.commit_new(index);
        }
    }

    /// Full resort that degrades to unsorted on failure. Emits `Reset` on
    /// success.
    fn resort(&self) {
        if self.try_resort().is_ok() {
            self.signals.emit_reset();
        }
    }

    /// Stable full sort by the active comparer; no notification.
    fn try_resort(&self) -> Result<()> {
        let Some(comparer) = self.active_comparer() else {
            return Ok(());
        };

        let mut items = self.items.write();
        let _span = PerfSpan::with_len(span_names::SORT, items.len());

        let order = match comparer.sorted_order(&items) {
            Ok(order) => order,
            Err(err) => {
                drop(items);
                self.abandon_sort(&err);
                return Err(err);
            }
        };

        let mut slots: Vec<Option<T>> = items.drain(..).map(Some).collect();
        items.extend(order.into_iter().filter_map(|i| slots[i].take()));
        Ok(())
    }

    fn active_comparer(&self) -> Option<Comparer<T>> {
        self.state
            .lock()
            .sort
            .as_ref()
            .map(|sort| sort.comparer.clone())
    }

    /// Drops the active sort after a property read failed.
    fn abandon_sort(&self, err: &BindingError) {
        let dropped = self.state.lock().sort.take();
        if let Some(sort) = dropped {
            tracing::warn!(
                target: targets::SORT,
                sort = %sort.descriptor,
                error = %err,
                "sort abandoned, list is now unsorted"
            );
            self.signals.sort_changed.emit(None);
        }
    }
}

impl<T: Send + Sync + 'static> ObservableList for BindingList<T> {
    type Item = T;

    fn len(&self) -> usize {
        BindingList::len(self)
    }

    fn with_item<R>(&self, index: usize, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.items.read().get(index).map(f)
    }

    fn signals(&self) -> &ListSignals {
        &self.signals
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for BindingList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingList")
            .field("items", &*self.items.read())
            .finish_non_exhaustive()
    }
}
