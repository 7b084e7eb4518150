//! Prelude module for foldlist.
//!
//! This module re-exports the most commonly used types for convenient importing:
//!
//! ```ignore
//! use foldlist::prelude::*;
//! ```

// ============================================================================
// Signal/Slot System
// ============================================================================

pub use crate::signal::{ConnectionGuard, ConnectionId, Signal};

// ============================================================================
// List Model
// ============================================================================

pub use crate::model::{
    ExpandableConfig, ExpandableListModel, FlatEntry, FlatItem, FoldError, FoldResult,
    ListSignals, ParentId, ParentItem, ParentNode, ViewType,
};

// ============================================================================
// Views and State
// ============================================================================

pub use crate::model::{
    AttachedView, ChildBinding, ExpansionSnapshot, ItemBinder, ParentBinding, StateBundle,
    ViewHolder,
};
