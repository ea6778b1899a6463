//! Core systems for Lattice Binding.
//!
//! This crate provides the foundational pieces shared by the observable
//! collections in `lattice-binding`:
//!
//! - **Signal/Slot System**: Type-safe, synchronous change notification
//! - **Errors**: The [`BindingError`] type and its companions
//! - **Logging**: `tracing` targets and span helpers
//!
//! # Signal/Slot Example
//!
//! ```
//! use lattice_binding_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```

mod error;
pub mod logging;
pub mod signal;

pub use error::{AccessorError, BindingError, PredicateError, Result};
pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
