//! Storage for the flattened, displayable sequence.
//!
//! The flat sequence mixes parent entries and child entries. Entries refer
//! back into the hierarchy by id and position instead of holding the items,
//! so the sequence can be mutated without touching caller data.

use super::error::{FoldError, FoldResult};
use super::hierarchy::{HierarchyModel, ParentId, ParentItem, ParentWrapper};

/// One slot of the flattened sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlatEntry {
    /// The wrapper entry of a parent.
    Parent(ParentId),
    /// The `index`-th child of `parent`.
    Child {
        /// The owning parent.
        parent: ParentId,
        /// Position among the parent's children.
        index: usize,
    },
}

impl FlatEntry {
    /// Returns `true` for a parent entry.
    pub fn is_parent(&self) -> bool {
        matches!(self, FlatEntry::Parent(_))
    }

    /// Returns `true` for a child entry.
    pub fn is_child(&self) -> bool {
        matches!(self, FlatEntry::Child { .. })
    }

    /// Returns the parent this entry is, or belongs to.
    pub fn parent_id(&self) -> ParentId {
        match *self {
            FlatEntry::Parent(id) => id,
            FlatEntry::Child { parent, .. } => parent,
        }
    }
}

/// The ordered flat sequence.
///
/// All mutation happens as contiguous runs. Inserting at `len()` appends;
/// every other position must be in bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatItemStore {
    entries: Vec<FlatEntry>,
}

impl FlatItemStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens a hierarchy, honoring each parent's initial expansion.
    ///
    /// Returns the store along with one wrapper per parent, in hierarchy order.
    pub fn flatten<P: ParentItem>(hierarchy: &HierarchyModel<P>) -> (Self, Vec<ParentWrapper>) {
        let mut entries = Vec::with_capacity(hierarchy.len());
        let mut wrappers = Vec::with_capacity(hierarchy.len());

        for (id, parent) in hierarchy.iter() {
            let expanded = parent.is_initially_expanded();
            wrappers.push(ParentWrapper::new(id, expanded));
            entries.push(FlatEntry::Parent(id));
            if expanded {
                entries.extend(Self::child_run(id, parent.children().len()));
            }
        }

        (Self { entries }, wrappers)
    }

    /// Returns the child entries of `parent`, in order.
    pub fn child_run(parent: ParentId, count: usize) -> impl Iterator<Item = FlatEntry> {
        (0..count).map(move |index| FlatEntry::Child { parent, index })
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry at `index`.
    pub fn get(&self, index: usize) -> FoldResult<FlatEntry> {
        self.entries
            .get(index)
            .copied()
            .ok_or(FoldError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
    }

    /// Returns the entries as a slice.
    pub fn as_slice(&self) -> &[FlatEntry] {
        &self.entries
    }

    /// Iterates over the entries in order.
    pub fn iter(&self) -> impl Iterator<Item = &FlatEntry> + '_ {
        self.entries.iter()
    }

    /// Inserts a contiguous run starting at `index`.
    ///
    /// The run occupies `index..index + n` afterwards. Returns `n`.
    pub fn insert_run<I>(&mut self, index: usize, items: I) -> FoldResult<usize>
    where
        I: IntoIterator<Item = FlatEntry>,
    {
        self.check_insert(index)?;
        let before = self.entries.len();
        self.entries.splice(index..index, items);
        Ok(self.entries.len() - before)
    }

    /// Removes the contiguous run `index..index + count` and returns it.
    pub fn remove_run(&mut self, index: usize, count: usize) -> FoldResult<Vec<FlatEntry>> {
        self.check_insert(index)?;
        let end = index
            .checked_add(count)
            .filter(|&end| end <= self.entries.len())
            .ok_or(FoldError::IndexOutOfRange {
                index: index.saturating_add(count),
                len: self.entries.len(),
            })?;
        Ok(self.entries.drain(index..end).collect())
    }

    fn check_insert(&self, index: usize) -> FoldResult<()> {
        if index > self.entries.len() {
            return Err(FoldError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(())
    }
}
