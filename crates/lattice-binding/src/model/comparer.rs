//! Multi-key property comparer.
//!
//! A [`Comparer`] is a [`SortDescriptor`] resolved against an element type's
//! [`PropertyRegistry`]. Keys are evaluated left to right and the first
//! non-equal result wins; two elements are equal only if every key ties.
//!
//! Property reads can fail, so every comparison returns a `Result`. Full sorts
//! read each element's keys once up front ([`Comparer::sorted_order`]) so an
//! accessor failure is detected before anything is reordered.

use std::cmp::Ordering;

use lattice_binding_core::Result;

use super::property::{PropertyAccessor, PropertyRegistry};
use super::sort::{SortDescriptor, SortDirection};
use super::value::PropertyValue;

/// Compares elements of `T` by one or more named properties.
pub struct Comparer<T> {
    keys: Vec<(PropertyAccessor<T>, SortDirection)>,
}

impl<T> Clone for Comparer<T> {
    fn clone(&self) -> Self {
        Self {
            keys: self.keys.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Comparer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.keys.iter().map(|(a, d)| (a.name(), d)))
            .finish()
    }
}

impl<T> Comparer<T> {
    /// Resolves every key of `descriptor` against `registry`.
    ///
    /// Fails with `InvalidProperty` on the first unknown name.
    pub fn new(registry: &PropertyRegistry<T>, descriptor: &SortDescriptor) -> Result<Self> {
        let keys = descriptor
            .keys()
            .iter()
            .map(|key| Ok((registry.resolve(&key.property)?.clone(), key.direction)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { keys })
    }

    /// Name of the primary sort property.
    pub fn primary_property(&self) -> Option<&str> {
        self.keys.first().map(|(accessor, _)| accessor.name())
    }

    /// Compares two elements.
    pub fn compare(&self, a: &T, b: &T) -> Result<Ordering> {
        for (accessor, direction) in &self.keys {
            let ordering = accessor.get(a)?.ordinal_cmp(&accessor.get(b)?);
            if ordering != Ordering::Equal {
                return Ok(direction.apply(ordering));
            }
        }
        Ok(Ordering::Equal)
    }

    /// Reads all key values of `item`, in key order.
    pub fn sort_key(&self, item: &T) -> Result<Vec<PropertyValue>> {
        self.keys
            .iter()
            .map(|(accessor, _)| accessor.get(item))
            .collect()
    }

    /// Compares two key vectors produced by [`Comparer::sort_key`].
    pub fn compare_keys(&self, a: &[PropertyValue], b: &[PropertyValue]) -> Ordering {
        self.keys
            .iter()
            .zip(a.iter().zip(b))
            .map(|((_, direction), (a, b))| direction.apply(a.ordinal_cmp(b)))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }

    /// Returns the stable sorted permutation of `items`.
    ///
    /// Element `i` of the result is the index in `items` of the element that
    /// belongs at position `i`. Equal elements keep their relative order.
    pub fn sorted_order(&self, items: &[T]) -> Result<Vec<usize>> {
        let keyed = items
            .iter()
            .map(|item| self.sort_key(item))
            .collect::<Result<Vec<_>>>()?;

        let mut order: Vec<usize> = (0..items.len()).collect();
        order.sort_by(|&a, &b| self.compare_keys(&keyed[a], &keyed[b]));
        Ok(order)
    }

    /// Finds where `item` belongs in the already sorted `items`.
    ///
    /// The boundaries are checked first so appending increasing data costs
    /// one comparison. Otherwise a binary search places `item` after the
    /// last element that does not compare greater than it; its position among
    /// equal elements is not otherwise specified.
    pub fn insertion_point(&self, items: &[T], item: &T) -> Result<usize> {
        let (Some(first), Some(last)) = (items.first(), items.last()) else {
            return Ok(0);
        };

        if self.compare(item, last)? != Ordering::Less {
            return Ok(items.len());
        }
        if self.compare(item, first)? != Ordering::Greater {
            return Ok(0);
        }

        let (mut lo, mut hi) = (0, items.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.compare(&items[mid], item)? == Ordering::Greater {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        Ok(lo)
    }

    /// Returns `true` if the element at `index` is ordered correctly relative
    /// to its neighbours.
    pub fn is_in_place(&self, items: &[T], index: usize) -> Result<bool> {
        let item = &items[index];
        if index > 0 && self.compare(&items[index - 1], item)? == Ordering::Greater {
            return Ok(false);
        }
        if let Some(next) = items.get(index + 1) {
            if self.compare(item, next)? == Ordering::Greater {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
