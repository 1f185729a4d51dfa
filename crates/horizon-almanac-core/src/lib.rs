//! Core systems for Horizon Almanac.
//!
//! This crate provides the foundational components shared by the Horizon
//! Almanac calendar engine:
//!
//! - **Signal System**: Type-safe change notification for engine consumers
//! - **Logging**: `tracing` integration with per-subsystem targets
//!
//! The engine is synchronous and single-threaded by design: one interaction
//! produces one state mutation and one set of notifications before control
//! returns to the caller. Signals therefore dispatch directly on the
//! emitting thread; there is no queued or cross-thread delivery.
//!
//! # Signal Example
//!
//! ```
//! use horizon_almanac_core::Signal;
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

pub mod logging;
pub mod signal;

pub use signal::{ConnectionGuard, ConnectionId, Signal};
