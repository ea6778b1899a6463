//! Prelude module for Lattice Binding.
//!
//! This module re-exports the most commonly used types for convenient importing:
//!
//! ```ignore
//! use lattice_binding::prelude::*;
//! ```
//!
//! This provides access to:
//! - Signal/slot system (`Signal`, `ConnectionId`, `ConnectionGuard`)
//! - Lists (`BindingList`, `FilteredList`, `ObservableList`)
//! - Change notifications (`ListChange`, `ListSignals`)
//! - Property access (`Properties`, `PropertyRegistry`, `PropertyValue`)
//! - Sorting (`SortDescriptor`, `SortDirection`)
//! - Errors (`BindingError`, `Result`)

// ============================================================================
// Signal/Slot System
// ============================================================================

pub use crate::{ConnectionGuard, ConnectionId, Signal};

// ============================================================================
// Errors
// ============================================================================

pub use crate::{AccessorError, BindingError, PredicateError, Result};

// ============================================================================
// Lists
// ============================================================================

pub use crate::model::{
    AddRangeMode, BindingList, BindingListConfig, FilteredList, FilteredListBuilder, ListChange,
    ListSignals, ObservableList,
};

// ============================================================================
// Properties and Sorting
// ============================================================================

pub use crate::Properties;
pub use crate::model::{PropertyRegistry, PropertyValue, SortDescriptor, SortDirection, SortKey};
