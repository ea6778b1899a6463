//! Observable list models for Lattice Binding.
//!
//! This module provides ordered collections that report every mutation as a
//! structured [`ListChange`], so views and derived lists can stay in sync
//! without re-reading everything:
//!
//! - Sorting by one or more named properties, maintained as items change
//! - Property search by name
//! - Predicate-filtered projections that update incrementally
//!
//! # Core Types
//!
//! - `ObservableList`: The trait every list implements; all a filter needs
//! - `ListSignals` / `ListChange`: Change notifications
//! - `PropertyValue`: Dynamically typed value read from an element property
//! - `PropertyRegistry` / `Properties`: Named property access
//! - `SortDescriptor` / `Comparer`: Multi-key sort specification
//!
//! # List Implementations
//!
//! - `BindingList`: Sortable list with a new-item transaction
//! - `FilteredList`: Read-only filtered projection of another list
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use lattice_binding::model::{
//!     BindingList, FilteredList, ObservableList, PropertyRegistry, SortDescriptor,
//! };
//!
//! let registry = PropertyRegistry::<(String, u32)>::builder()
//!     .property("Name", |p| p.0.clone())
//!     .property("Age", |p| p.1)
//!     .build();
//!
//! let people = Arc::new(BindingList::with_registry(
//!     vec![("Bob".to_string(), 42), ("Ann".to_string(), 17), ("Cid".to_string(), 30)],
//!     registry,
//! ));
//! people.apply_sort(SortDescriptor::ascending("Name")).unwrap();
//!
//! let adults = FilteredList::builder()
//!     .source(people.clone())
//!     .predicate(|p: &(String, u32)| p.1 >= 18)
//!     .build();
//!
//! adults.signals().list_changed.connect(|change| {
//!     println!("adults changed: {change:?}");
//! });
//!
//! people.add(("Abe".to_string(), 65));
//! let names: Vec<_> = adults.to_vec().into_iter().map(|p| p.0).collect();
//! assert_eq!(names, ["Abe", "Bob", "Cid"]);
//! ```
//!
//! # Architecture Overview
//!
//! ```text
//! ┌──────────────┐  ListChange  ┌──────────────┐  ListChange  ┌──────────┐
//! │ BindingList  │─────────────>│ FilteredList │─────────────>│  Views   │
//! │ (sorted)     │              │ (row map)    │              │          │
//! └──────────────┘              └──────────────┘              └──────────┘
//!        │                             │
//!        └──── PropertyRegistry ───────┘ (sort keys, predicates)
//! ```

mod binding_list;
mod comparer;
mod filtered_list;
mod property;
mod sort;
mod traits;
mod value;

pub use binding_list::{AddRangeMode, BindingList, BindingListConfig};
pub use comparer::Comparer;
pub use filtered_list::{FilteredList, FilteredListBuilder, Predicate};
pub use property::{Getter, Properties, PropertyAccessor, PropertyRegistry, PropertyRegistryBuilder};
pub use sort::{SortDescriptor, SortDirection, SortKey};
pub use traits::{ListChange, ListSignals, ObservableList};
pub use value::PropertyValue;
