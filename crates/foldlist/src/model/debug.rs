//! Human-readable dumps of a flattened list.
//!
//! ```ignore
//! use foldlist::model::FlatListDebug;
//!
//! println!("{}", FlatListDebug::new().format(&model));
//! ```
//!
//! Produces output like:
//!
//! ```text
//! Flat list (3 parents, 5 rows):
//! [0] v Fruit
//! [1] ├── Apple
//! [2] └── Pear
//! [3] > Vegetables
//! [4] v Grains
//! ```

use std::fmt::{self, Write};

use super::expansion::{ExpandableListModel, FlatItem};
use super::hierarchy::ParentItem;

/// Branch drawing style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Plain indentation.
    Compact,
}

/// Configuration for flat list debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to prefix each row with its flat index.
    pub show_indices: bool,
    /// Whether to show the expanded marker on parent rows.
    pub show_markers: bool,
    /// Whether to list the parent-relative position of parent rows.
    pub show_positions: bool,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_indices: true,
            show_markers: true,
            show_positions: false,
        }
    }
}

impl TreeFormatOptions {
    /// Options for detailed debugging output.
    pub fn detailed() -> Self {
        Self {
            show_positions: true,
            ..Default::default()
        }
    }

    /// Options for minimal output.
    pub fn minimal() -> Self {
        Self {
            style: TreeStyle::Compact,
            show_indices: false,
            show_markers: false,
            show_positions: false,
        }
    }
}

/// Renders the current flat sequence of a model as an indented tree.
#[derive(Debug, Clone, Default)]
pub struct FlatListDebug {
    options: TreeFormatOptions,
}

impl FlatListDebug {
    /// Create a new debug visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a debug visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Formats the model using the items' `Debug` output as labels.
    pub fn format<P>(&self, model: &ExpandableListModel<P>) -> String
    where
        P: ParentItem + fmt::Debug,
        P::Child: fmt::Debug,
    {
        self.format_with(model, |item| match item {
            FlatItem::Parent { item, .. } => format!("{item:?}"),
            FlatItem::Child { item, .. } => format!("{item:?}"),
        })
    }

    /// Formats the model, producing each row's label with `label`.
    pub fn format_with<P, F>(&self, model: &ExpandableListModel<P>, mut label: F) -> String
    where
        P: ParentItem,
        F: FnMut(&FlatItem<'_, P>) -> String,
    {
        let entries = model.flat_entries();
        let mut output = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(
            output,
            "Flat list ({} parents, {} rows):",
            model.parent_count(),
            entries.len()
        );
        if entries.is_empty() {
            output.push_str("  (empty)\n");
            return output;
        }

        let mut children_seen = 0;
        for (flat_index, entry) in entries.iter().enumerate() {
            let Ok(item) = model.item_at(flat_index) else {
                let _ = writeln!(output, "[{flat_index}] (unrecognized {entry:?})");
                continue;
            };

            if self.options.show_indices {
                let _ = write!(output, "[{flat_index}] ");
            }

            match &item {
                FlatItem::Parent { expanded, .. } => {
                    if self.options.show_markers {
                        output.push_str(self.marker(*expanded));
                        output.push(' ');
                    }
                    output.push_str(&label(&item));
                    if self.options.show_positions {
                        let _ = write!(output, " (position {})", flat_index - children_seen);
                    }
                }
                FlatItem::Child { .. } => {
                    children_seen += 1;
                    let is_last = !matches!(entries.get(flat_index + 1), Some(next) if next.is_child());
                    output.push_str(self.connector(is_last));
                    output.push_str(&label(&item));
                }
            }
            output.push('\n');
        }

        output
    }

    fn marker(&self, expanded: bool) -> &'static str {
        match (self.options.style, expanded) {
            (TreeStyle::Unicode, true) => "\u{25be}",
            (TreeStyle::Unicode, false) => "\u{25b8}",
            (_, true) => "v",
            (_, false) => ">",
        }
    }

    fn connector(&self, is_last: bool) -> &'static str {
        match (self.options.style, is_last) {
            (TreeStyle::Ascii, false) => "+-- ",
            (TreeStyle::Ascii, true) => "`-- ",
            (TreeStyle::Unicode, false) => "\u{251c}\u{2500}\u{2500} ",
            (TreeStyle::Unicode, true) => "\u{2514}\u{2500}\u{2500} ",
            (TreeStyle::Compact, _) => "  ",
        }
    }
}
