//! foldlist - expandable two-level lists for row-based renderers.
//!
//! This is the umbrella crate: it re-exports the core systems and adds the
//! list model.
//!
//! # Example
//!
//! ```no_run
//! use foldlist::prelude::*;
//!
//! let model = ExpandableListModel::new(vec![
//!     ParentNode::new("Inbox").with_children(vec!["Welcome", "Invoice"]),
//!     ParentNode::new("Archive"),
//! ]);
//!
//! model.signals().parent_expanded.connect(|position| {
//!     println!("parent {} expanded", position);
//! });
//!
//! // A click on the first row, as reported by a view.
//! model.toggle_from_view(0).ok();
//! ```

pub use foldlist_core::*;

pub mod model;
pub mod prelude;
