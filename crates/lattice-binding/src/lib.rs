//! Lattice Binding - observable, sortable and filterable lists.
//!
//! This is the main umbrella crate that re-exports all public APIs.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use lattice_binding::prelude::*;
//!
//! #[derive(Properties, Clone, Default, Debug)]
//! struct Task {
//!     #[property(rename = "Title")]
//!     title: String,
//!     #[property(rename = "Priority")]
//!     priority: u8,
//!     #[property(skip)]
//!     notes: Vec<String>,
//! }
//!
//! let tasks = Arc::new(BindingList::<Task>::empty());
//! tasks.apply_sort("Priority desc, Title".parse::<SortDescriptor>().unwrap()).unwrap();
//!
//! let urgent = FilteredList::builder()
//!     .source(tasks.clone())
//!     .predicate(|t: &Task| t.priority >= 5)
//!     .build();
//!
//! tasks.add(Task { title: "lunch".into(), priority: 1, ..Default::default() });
//! tasks.add(Task { title: "deploy".into(), priority: 9, ..Default::default() });
//!
//! assert_eq!(tasks.find("Title", "deploy").unwrap(), Some(0));
//! assert_eq!(urgent.len(), 1);
//! ```

// Lets the derive macro refer to `::lattice_binding` from inside this crate.
extern crate self as lattice_binding;

pub use lattice_binding_core::*;
pub use lattice_binding_macros::*;

pub mod model;
pub use model::Properties;
pub mod prelude;
