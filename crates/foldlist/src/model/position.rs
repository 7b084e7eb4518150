//! Position mapping between parent indices, flat indices and identities.
//!
//! Three coordinate systems are in play:
//!
//! - **parent index**: position among parents only (the hierarchy order)
//! - **flat index**: position in the rendered, flattened sequence
//! - **parent-relative position**: a parent's flat index minus the visible
//!   children before it, i.e. where it would sit if every parent were
//!   collapsed. Listeners and persisted snapshots use this one.
//!
//! All queries are linear scans of the flat sequence.

use std::fmt;

use super::error::{FoldError, FoldResult};
use super::flat_store::{FlatEntry, FlatItemStore};
use super::hierarchy::{HierarchyModel, ParentId, ParentItem};

/// The kind of row a renderer must create for a flat index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewType {
    /// A parent row.
    Parent,
    /// A child row.
    Child,
}

impl ViewType {
    /// Raw code used for parent rows.
    pub const PARENT_CODE: i32 = 0;
    /// Raw code used for child rows.
    pub const CHILD_CODE: i32 = 1;

    /// Returns the raw code of this view type.
    pub fn code(self) -> i32 {
        match self {
            ViewType::Parent => Self::PARENT_CODE,
            ViewType::Child => Self::CHILD_CODE,
        }
    }
}

impl TryFrom<i32> for ViewType {
    type Error = FoldError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            Self::PARENT_CODE => Ok(ViewType::Parent),
            Self::CHILD_CODE => Ok(ViewType::Child),
            other => Err(FoldError::UnrecognizedViewType(other)),
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewType::Parent => write!(f, "parent"),
            ViewType::Child => write!(f, "child"),
        }
    }
}

/// Stateless position queries over a flat sequence and its hierarchy.
pub struct PositionMapper<'a, P> {
    store: &'a FlatItemStore,
    hierarchy: &'a HierarchyModel<P>,
}

impl<'a, P: ParentItem> PositionMapper<'a, P> {
    /// Creates a mapper over the given sequence.
    pub fn new(store: &'a FlatItemStore, hierarchy: &'a HierarchyModel<P>) -> Self {
        Self { store, hierarchy }
    }

    /// Returns the flat index of the `parent_index`-th parent entry.
    ///
    /// Returns `None` if there are not that many parents.
    pub fn parent_flat_index(&self, parent_index: usize) -> Option<usize> {
        self.store
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_parent())
            .nth(parent_index)
            .map(|(flat_index, _)| flat_index)
    }

    /// Returns the flat index of the entry for the parent with the given id.
    pub fn flat_index_of(&self, id: ParentId) -> Option<usize> {
        self.store
            .iter()
            .position(|entry| *entry == FlatEntry::Parent(id))
    }

    /// Counts child entries strictly before `flat_index`.
    ///
    /// Positions past the end count every child in the sequence.
    pub fn visible_child_count_before(&self, flat_index: usize) -> usize {
        if flat_index == 0 {
            return 0;
        }
        self.store
            .iter()
            .take(flat_index)
            .filter(|entry| entry.is_child())
            .count()
    }

    /// Converts a flat index into a parent-relative position.
    pub fn parent_relative_position(&self, flat_index: usize) -> usize {
        flat_index - self.visible_child_count_before(flat_index)
    }

    /// Returns the validated entry at `flat_index`.
    ///
    /// Fails with `IndexOutOfRange` past the end, and with
    /// `UnrecognizedEntry` if the entry no longer resolves into the
    /// hierarchy.
    pub fn entry_at(&self, flat_index: usize) -> FoldResult<FlatEntry> {
        let entry = self.store.get(flat_index)?;
        let resolves = match entry {
            FlatEntry::Parent(id) => self.hierarchy.parent(id).is_some(),
            FlatEntry::Child { parent, index } => index < self.hierarchy.child_count(parent),
        };
        if !resolves {
            tracing::error!(
                target: foldlist_core::logging::targets::MODEL,
                flat_index,
                ?entry,
                "flat entry does not resolve into the hierarchy"
            );
            return Err(FoldError::UnrecognizedEntry { index: flat_index });
        }
        Ok(entry)
    }

    /// Returns the kind of row at `flat_index`.
    pub fn view_type(&self, flat_index: usize) -> FoldResult<ViewType> {
        Ok(match self.entry_at(flat_index)? {
            FlatEntry::Parent(_) => ViewType::Parent,
            FlatEntry::Child { .. } => ViewType::Child,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::hierarchy::ParentNode;

    type Node = ParentNode<&'static str, &'static str>;

    fn three_parents_second_expanded() -> (FlatItemStore, HierarchyModel<Node>) {
        let hierarchy = HierarchyModel::new(vec![
            ParentNode::new("A"),
            ParentNode::new("B")
                .with_children(vec!["b1"])
                .with_initially_expanded(true),
            ParentNode::new("C"),
        ]);
        let (store, _) = FlatItemStore::flatten(&hierarchy);
        (store, hierarchy)
    }

    #[test]
    fn test_parent_flat_index() {
        let (store, hierarchy) = three_parents_second_expanded();
        let mapper = PositionMapper::new(&store, &hierarchy);

        assert_eq!(mapper.parent_flat_index(0), Some(0));
        assert_eq!(mapper.parent_flat_index(1), Some(1));
        assert_eq!(mapper.parent_flat_index(2), Some(3));
        assert_eq!(mapper.parent_flat_index(3), None);
        assert_eq!(mapper.flat_index_of(ParentId::new(2)), Some(3));
    }

    #[test]
    fn test_visible_child_count_before() {
        let (store, hierarchy) = three_parents_second_expanded();
        let mapper = PositionMapper::new(&store, &hierarchy);

        let counts: Vec<usize> = (0..=store.len())
            .map(|i| mapper.visible_child_count_before(i))
            .collect();
        assert_eq!(counts, vec![0, 0, 0, 1, 1]);
        assert_eq!(mapper.visible_child_count_before(100), 1);
        assert_eq!(mapper.parent_relative_position(3), 2);
    }

    #[test]
    fn test_view_type_codes() {
        let (store, hierarchy) = three_parents_second_expanded();
        let mapper = PositionMapper::new(&store, &hierarchy);

        assert_eq!(mapper.view_type(0).unwrap(), ViewType::Parent);
        assert_eq!(mapper.view_type(2).unwrap(), ViewType::Child);
        assert!(matches!(
            mapper.view_type(4),
            Err(FoldError::IndexOutOfRange { index: 4, len: 4 })
        ));

        assert_eq!(ViewType::try_from(0).unwrap(), ViewType::Parent);
        assert_eq!(ViewType::try_from(ViewType::Child.code()).unwrap(), ViewType::Child);
        assert!(matches!(
            ViewType::try_from(7),
            Err(FoldError::UnrecognizedViewType(7))
        ));
    }

    #[test]
    fn test_unrecognized_entry() {
        let (mut store, hierarchy) = three_parents_second_expanded();
        store
            .insert_run(
                0,
                [FlatEntry::Child {
                    parent: ParentId::new(0),
                    index: 5,
                }],
            )
            .unwrap();
        let mapper = PositionMapper::new(&store, &hierarchy);

        assert!(matches!(
            mapper.entry_at(0),
            Err(FoldError::UnrecognizedEntry { index: 0 })
        ));
    }
}
