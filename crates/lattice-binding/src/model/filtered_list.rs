//! Filtered projection of an observable list.
//!
//! `FilteredList` wraps any [`ObservableList`] and exposes only the elements
//! that satisfy a predicate, in source order. It holds a row mapping rather
//! than copies of the elements, and keeps that mapping current by listening
//! to the source's `list_changed` signal.

use parking_lot::{Mutex, RwLock};
use std::sync::{Arc, Weak};

use lattice_binding_core::logging::{span_names, targets};
use lattice_binding_core::{ConnectionGuard, PerfSpan, PredicateError};

use super::traits::{ListChange, ListSignals, ObservableList};

/// Type alias for a filter predicate.
///
/// An `Err` is treated as "does not match".
pub type Predicate<T> = Arc<dyn Fn(&T) -> Result<bool, PredicateError> + Send + Sync>;

/// Mapping between derived rows and source indices.
#[derive(Debug, Default)]
struct RowMapping {
    /// Derived row to source index, strictly increasing.
    proxy_to_source: Vec<usize>,
    /// Source index to derived row (None if filtered out).
    source_to_proxy: Vec<Option<usize>>,
}

impl RowMapping {
    fn clear(&mut self) {
        self.proxy_to_source.clear();
        self.source_to_proxy.clear();
    }

    fn rebuild(&mut self, source_len: usize, accepted: Vec<usize>) {
        self.proxy_to_source = accepted;
        self.source_to_proxy = vec![None; source_len];
        self.reindex();
    }

    fn len(&self) -> usize {
        self.proxy_to_source.len()
    }

    fn source_len(&self) -> usize {
        self.source_to_proxy.len()
    }

    fn map_to_source(&self, row: usize) -> Option<usize> {
        self.proxy_to_source.get(row).copied()
    }

    fn map_from_source(&self, source_index: usize) -> Option<usize> {
        self.source_to_proxy.get(source_index).and_then(|&x| x)
    }

    fn reindex(&mut self) {
        self.source_to_proxy.fill(None);
        for (row, &source_index) in self.proxy_to_source.iter().enumerate() {
            if let Some(slot) = self.source_to_proxy.get_mut(source_index) {
                *slot = Some(row);
            }
        }
    }

    /// A source element was inserted at `index`; shift everything after it.
    fn source_inserted(&mut self, index: usize) {
        self.source_to_proxy.insert(index, None);
        for source_index in &mut self.proxy_to_source {
            if *source_index >= index {
                *source_index += 1;
            }
        }
        self.reindex();
    }

    /// The source element at `index` is gone; drop its row and shift.
    fn source_removed(&mut self, index: usize) {
        if let Some(row) = self.map_from_source(index) {
            self.proxy_to_source.remove(row);
        }
        self.source_to_proxy.remove(index);
        for source_index in &mut self.proxy_to_source {
            if *source_index > index {
                *source_index -= 1;
            }
        }
        self.reindex();
    }

    /// The derived row at which the unmapped source `index` belongs.
    ///
    /// The first and last source index go to the matching end. Otherwise the
    /// source is scanned from `index` toward its nearer end for an element
    /// that is already mapped, and the new row goes next to it.
    fn insertion_row(&self, index: usize) -> usize {
        let source_len = self.source_len();
        if index == 0 {
            return 0;
        }
        if index + 1 >= source_len {
            return self.len();
        }

        if index < source_len / 2 {
            (0..index)
                .rev()
                .find_map(|j| self.map_from_source(j))
                .map_or(0, |row| row + 1)
        } else {
            (index + 1..source_len)
                .find_map(|j| self.map_from_source(j))
                .unwrap_or(self.len())
        }
    }

    fn insert_row(&mut self, row: usize, source_index: usize) {
        self.proxy_to_source.insert(row, source_index);
        self.reindex();
    }

    fn remove_row(&mut self, row: usize) {
        self.proxy_to_source.remove(row);
        self.reindex();
    }
}

/// State shared with the source subscription.
struct FilterInner<S: ObservableList> {
    source: RwLock<Option<Arc<S>>>,
    predicate: RwLock<Option<Predicate<S::Item>>>,
    mapping: RwLock<RowMapping>,
    signals: ListSignals,
}

impl<S> FilterInner<S>
where
    S: ObservableList + 'static,
    S::Item: 'static,
{
    fn source(&self) -> Option<Arc<S>> {
        self.source.read().clone()
    }

    /// Evaluates the predicate for source `index`, excluding on error.
    fn accepts(&self, source: &S, index: usize) -> bool {
        let predicate = self.predicate.read().clone();
        let Some(predicate) = predicate else {
            return index < source.len();
        };

        match source.with_item(index, |item| predicate(item)) {
            Some(Ok(matches)) => matches,
            Some(Err(err)) => {
                tracing::debug!(
                    target: targets::FILTER,
                    index,
                    error = %err,
                    "predicate failed, excluding element"
                );
                false
            }
            None => false,
        }
    }

    /// Rebuilds the mapping and emits one `Reset`.
    ///
    /// `skip` names a source index that is about to be removed and must not
    /// be mapped.
    fn rebuild(&self, skip: Option<usize>) {
        let _span = PerfSpan::new(span_names::REFILTER);

        let (source_len, accepted) = match self.source() {
            None => (0, Vec::new()),
            Some(source) => {
                let len = source.len();
                let accepted: Vec<usize> = (0..len)
                    .filter(|&i| Some(i) != skip && self.accepts(&source, i))
                    .map(|i| match skip {
                        Some(skipped) if i > skipped => i - 1,
                        _ => i,
                    })
                    .collect();
                let len = if skip.is_some() { len.saturating_sub(1) } else { len };
                (len, accepted)
            }
        };

        let matched = accepted.len();
        self.mapping.write().rebuild(source_len, accepted);
        tracing::debug!(target: targets::FILTER, source_len, matched, "refiltered");
        self.signals.emit_reset();
    }

    #[tracing::instrument(skip_all, target = "lattice_binding::filter", level = "trace")]
    fn on_source_changed(&self, change: &ListChange) {
        let Some(source) = self.source() else {
            return;
        };

        match change {
            ListChange::ItemAdded(index) => self.source_added(&source, *index),
            ListChange::ItemRemoved(index) => self.source_removing(&source, *index),
            ListChange::ItemChanged {
                index,
                property: Some(property),
            } => self.source_property_changed(&source, *index, property),
            ListChange::ItemChanged { property: None, .. } | ListChange::Reset => {
                self.rebuild(None)
            }
            ListChange::Cleared => self.signals.emit_cleared(|| self.mapping.write().clear()),
        }
    }

    fn source_added(&self, source: &S, index: usize) {
        let in_sync = {
            let mapping = self.mapping.read();
            index <= mapping.source_len() && mapping.source_len() + 1 == source.len()
        };
        if !in_sync {
            tracing::debug!(target: targets::FILTER, index, "mapping out of date, refiltering");
            self.rebuild(None);
            return;
        }

        let accepted = self.accepts(source, index);
        let row = {
            let mut mapping = self.mapping.write();
            mapping.source_inserted(index);
            accepted.then(|| {
                let row = mapping.insertion_row(index);
                mapping.insert_row(row, index);
                row
            })
        };

        if let Some(row) = row {
            tracing::trace!(target: targets::FILTER, index, row, "element added");
            self.signals.list_changed.emit(ListChange::ItemAdded(row));
        }
    }

    fn source_removing(&self, source: &S, index: usize) {
        let (in_sync, row) = {
            let mapping = self.mapping.read();
            (
                index < mapping.source_len() && mapping.source_len() == source.len(),
                mapping.map_from_source(index),
            )
        };
        if !in_sync {
            tracing::debug!(target: targets::FILTER, index, "mapping out of date, refiltering");
            self.rebuild(Some(index));
            return;
        }

        if let Some(row) = row {
            tracing::trace!(target: targets::FILTER, index, row, "element removed");
            self.signals.emit_before_removed(row);
        }
        self.mapping.write().source_removed(index);
    }

    fn source_property_changed(&self, source: &S, index: usize, property: &str) {
        let (in_sync, current) = {
            let mapping = self.mapping.read();
            (
                index < mapping.source_len() && mapping.source_len() == source.len(),
                mapping.map_from_source(index),
            )
        };
        if !in_sync {
            self.rebuild(None);
            return;
        }

        match (self.accepts(source, index), current) {
            (true, Some(row)) => {
                self.signals
                    .list_changed
                    .emit(ListChange::property_changed(row, property));
            }
            (true, None) => {
                let row = {
                    let mut mapping = self.mapping.write();
                    let row = mapping.insertion_row(index);
                    mapping.insert_row(row, index);
                    row
                };
                tracing::trace!(target: targets::FILTER, index, row, property, "element now matches");
                self.signals.list_changed.emit(ListChange::ItemAdded(row));
            }
            (false, Some(row)) => {
                tracing::trace!(target: targets::FILTER, index, row, property, "element no longer matches");
                self.signals.emit_before_removed(row);
                self.mapping.write().remove_row(row);
            }
            (false, None) => {}
        }
    }
}

/// A read-only, predicate-restricted view of a source list.
///
/// The derived sequence always equals "every source element that satisfies
/// the predicate, in source order". Source changes are applied incrementally
/// where possible and re-emitted in derived coordinates; anything that may
/// affect many elements triggers a full refilter and a single
/// [`ListChange::Reset`].
///
/// A predicate that returns an error excludes the element; the error is
/// logged at `debug` level on the `lattice_binding::filter` target.
///
/// Events the source suppressed (see
/// [`BindingList::set_raise_list_changed_events`]) are detected only when
/// the source length no longer matches the mapping, which triggers a
/// refilter. A suppressed add followed by a suppressed remove leaves the
/// length unchanged and the view stale; call
/// [`BindingList::reset_bindings`] or [`FilteredList::refilter`] after
/// re-enabling events.
///
/// [`BindingList::set_raise_list_changed_events`]: super::BindingList::set_raise_list_changed_events
/// [`BindingList::reset_bindings`]: super::BindingList::reset_bindings
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use lattice_binding::model::{BindingList, FilteredList, ObservableList, PropertyRegistry};
///
/// let registry = PropertyRegistry::<i32>::builder().property("Value", |v| *v).build();
/// let source = Arc::new(BindingList::with_registry(vec![1, 2, 3, 4, 5], registry));
///
/// let evens = FilteredList::builder()
///     .source(source.clone())
///     .predicate(|v: &i32| v % 2 == 0)
///     .build();
/// assert_eq!(evens.to_vec(), vec![2, 4]);
///
/// source.add(6);
/// assert_eq!(evens.to_vec(), vec![2, 4, 6]);
/// ```
pub struct FilteredList<S: ObservableList> {
    inner: Arc<FilterInner<S>>,
    subscription: Mutex<Option<ConnectionGuard>>,
}

impl<S> Default for FilteredList<S>
where
    S: ObservableList + 'static,
    S::Item: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> FilteredList<S>
where
    S: ObservableList + 'static,
    S::Item: 'static,
{
    /// Creates an empty filtered list with no source and no predicate.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(FilterInner {
                source: RwLock::new(None),
                predicate: RwLock::new(None),
                mapping: RwLock::new(RowMapping::default()),
                signals: ListSignals::new(),
            }),
            subscription: Mutex::new(None),
        }
    }

    /// Creates a filtered list over `source` that passes every element.
    pub fn with_source(source: Arc<S>) -> Self {
        let list = Self::new();
        list.set_source(source);
        list
    }

    /// Starts building a filtered list.
    pub fn builder() -> FilteredListBuilder<S> {
        FilteredListBuilder::new()
    }

    /// Attaches to a new source, detaching from the previous one, and
    /// refilters.
    pub fn set_source(&self, source: Arc<S>) {
        self.detach();
        *self.inner.source.write() = Some(source.clone());

        let weak_inner: Weak<FilterInner<S>> = Arc::downgrade(&self.inner);
        let id = source.signals().list_changed.connect(move |change| {
            if let Some(inner) = weak_inner.upgrade() {
                inner.on_source_changed(change);
            }
        });

        let weak_source = Arc::downgrade(&source);
        *self.subscription.lock() = Some(ConnectionGuard::new(move || {
            if let Some(source) = weak_source.upgrade() {
                source.signals().list_changed.disconnect(id);
            }
        }));

        tracing::debug!(target: targets::FILTER, "source attached");
        self.inner.rebuild(None);
    }

    /// Detaches from the source and empties the derived sequence.
    pub fn clear_source(&self) {
        self.detach();
        *self.inner.source.write() = None;
        self.inner.rebuild(None);
    }

    /// The current source, if any.
    pub fn source(&self) -> Option<Arc<S>> {
        self.inner.source()
    }

    /// Replaces the predicate and refilters.
    pub fn set_predicate<F>(&self, predicate: F)
    where
        F: Fn(&S::Item) -> bool + Send + Sync + 'static,
    {
        self.set_fallible_predicate(move |item| Ok(predicate(item)));
    }

    /// Replaces the predicate with one that may fail, and refilters.
    pub fn set_fallible_predicate<F>(&self, predicate: F)
    where
        F: Fn(&S::Item) -> Result<bool, PredicateError> + Send + Sync + 'static,
    {
        *self.inner.predicate.write() = Some(Arc::new(predicate));
        self.inner.rebuild(None);
    }

    /// Removes the predicate so every source element passes, and refilters.
    pub fn clear_predicate(&self) {
        *self.inner.predicate.write() = None;
        self.inner.rebuild(None);
    }

    /// Returns `true` if a predicate is set.
    pub fn has_predicate(&self) -> bool {
        self.inner.predicate.read().is_some()
    }

    /// Rebuilds the derived sequence from scratch and emits one `Reset`.
    pub fn refilter(&self) {
        self.inner.rebuild(None);
    }

    /// Maps a derived row to its source index.
    pub fn map_to_source(&self, row: usize) -> Option<usize> {
        self.inner.mapping.read().map_to_source(row)
    }

    /// Maps a source index to its derived row, or `None` if filtered out.
    pub fn map_from_source(&self, source_index: usize) -> Option<usize> {
        self.inner.mapping.read().map_from_source(source_index)
    }

    /// Number of matching elements.
    pub fn len(&self) -> usize {
        self.inner.mapping.read().len()
    }

    /// Returns `true` if no element matches.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn detach(&self) {
        if let Some(guard) = self.subscription.lock().take() {
            guard.disconnect();
            tracing::debug!(target: targets::FILTER, "source detached");
        }
    }
}

impl<S> ObservableList for FilteredList<S>
where
    S: ObservableList + 'static,
    S::Item: 'static,
{
    type Item = S::Item;

    fn len(&self) -> usize {
        FilteredList::len(self)
    }

    fn with_item<R>(&self, index: usize, f: impl FnOnce(&S::Item) -> R) -> Option<R> {
        let source_index = self.map_to_source(index)?;
        self.source()?.with_item(source_index, f)
    }

    fn signals(&self) -> &ListSignals {
        &self.inner.signals
    }
}

impl<S: ObservableList> std::fmt::Debug for FilteredList<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilteredList")
            .field("mapping", &self.inner.mapping.read().proxy_to_source)
            .field("attached", &self.subscription.lock().is_some())
            .finish()
    }
}

/// Builder for [`FilteredList`].
pub struct FilteredListBuilder<S: ObservableList> {
    source: Option<Arc<S>>,
    predicate: Option<Predicate<S::Item>>,
}

impl<S> Default for FilteredListBuilder<S>
where
    S: ObservableList + 'static,
    S::Item: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> FilteredListBuilder<S>
where
    S: ObservableList + 'static,
    S::Item: 'static,
{
    /// Creates a builder with no source and no predicate.
    pub fn new() -> Self {
        Self {
            source: None,
            predicate: None,
        }
    }

    /// Sets the source list.
    pub fn source(mut self, source: Arc<S>) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets an infallible predicate.
    pub fn predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&S::Item) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(move |item| Ok(predicate(item))));
        self
    }

    /// Sets a predicate that may fail.
    pub fn fallible_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&S::Item) -> Result<bool, PredicateError> + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Builds the filtered list, filtering the source once.
    pub fn build(self) -> FilteredList<S> {
        let list = FilteredList::new();
        *list.inner.predicate.write() = self.predicate;
        match self.source {
            Some(source) => list.set_source(source),
            None => list.inner.rebuild(None),
        }
        list
    }
}

static_assertions::assert_impl_all!(
    FilteredList<super::BindingList<String>>: Send, Sync
);
