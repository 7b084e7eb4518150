//! Core systems for foldlist.
//!
//! This crate provides the foundational pieces the model layer is built on:
//!
//! - **Signal/Slot System**: Type-safe, synchronous change notification
//! - **Logging**: `tracing` target names, span names and `PerfSpan`
//!
//! # Signal/Slot Example
//!
//! ```
//! use foldlist_core::Signal;
//!
//! let parent_expanded = Signal::<usize>::new();
//!
//! let conn_id = parent_expanded.connect(|position| {
//!     println!("parent {} expanded", position);
//! });
//!
//! parent_expanded.emit(2);
//! parent_expanded.disconnect(conn_id);
//! ```

pub mod logging;
pub mod signal;

pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
