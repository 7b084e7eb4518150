//! Expandable two-level lists for row-based renderers.
//!
//! A list of parents, each owning an ordered list of children, is presented
//! to a renderer as one flat sequence. Expanding a parent inserts its
//! children immediately after it; collapsing removes them again. The model
//! tells renderers exactly which flat indices changed so they can animate
//! per-row insertions and removals.
//!
//! # Core Types
//!
//! - `HierarchyModel`: The immutable parents and their children
//! - `ParentWrapper`: Per-parent expanded flag, stable across toggles
//! - `FlatItemStore`: The flat sequence of parent and child entries
//! - `PositionMapper`: Conversions between flat indices, parent indices
//!   and parent-relative positions
//! - `ExpandableListModel`: Owns all of the above and runs transitions
//! - `ExpansionSnapshot` / `StateBundle`: Save and restore expansion state
//!
//! # Example
//!
//! ```no_run
//! use foldlist::model::{ExpandableListModel, ParentNode};
//!
//! let model = ExpandableListModel::new(vec![
//!     ParentNode::new("Fruit").with_children(vec!["Apple", "Pear"]),
//!     ParentNode::new("Vegetables").with_children(vec!["Leek"]),
//! ]);
//!
//! model.signals().item_inserted.connect(|index| {
//!     println!("row inserted at {}", index);
//! });
//!
//! model.expand_parent(0);
//! assert_eq!(model.item_count(), 4);
//! ```
//!
//! # Architecture Overview
//!
//! ```text
//! ┌────────────────┐     ┌───────────────┐     ┌────────────────┐
//! │ HierarchyModel │────>│ FlatItemStore │<────│ PositionMapper │
//! └────────────────┘     └───────────────┘     └────────────────┘
//!          │                     ▲
//!          │   ┌─────────────────┴───┐     ┌─────────────┐
//!          └──>│ ExpandableListModel │────>│ ListSignals │───> renderer
//!              └─────────────────────┘     └─────────────┘
//! ```
//!
//! Renderers query the model by flat index and listen to its signals.

mod config;
mod debug;
mod error;
mod expansion;
mod flat_store;
mod hierarchy;
mod position;
mod signals;
mod snapshot;
mod view;

pub use config::ExpandableConfig;
pub use debug::{FlatListDebug, TreeFormatOptions, TreeStyle};
pub use error::{FoldError, FoldResult};
pub use expansion::{ExpandableListModel, FlatItem};
pub use flat_store::{FlatEntry, FlatItemStore};
pub use hierarchy::{HierarchyModel, ParentId, ParentItem, ParentNode, ParentWrapper};
pub use position::{PositionMapper, ViewType};
pub use signals::ListSignals;
pub use snapshot::{EXPANDED_STATE_KEY, ExpansionSnapshot, StateBundle};
pub use view::{AttachedView, ChildBinding, ItemBinder, ParentBinding, ViewHolder, ViewId};
