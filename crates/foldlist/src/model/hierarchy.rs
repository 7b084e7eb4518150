//! The two-level parent/child hierarchy an expandable list is built from.
//!
//! The hierarchy is read-only once handed to a model. Expansion state never
//! lives on the caller's items; it lives on the [`ParentWrapper`] the model
//! creates once per parent.

/// Trait for parent items that own an ordered list of children.
///
/// Implement this trait for types that should be directly usable as parents
/// in an [`ExpandableListModel`](super::ExpandableListModel).
///
/// # Example
///
/// ```ignore
/// use foldlist::model::ParentItem;
///
/// struct Album {
///     title: String,
///     tracks: Vec<String>,
/// }
///
/// impl ParentItem for Album {
///     type Child = String;
///
///     fn child_items(&self) -> Option<&[String]> {
///         Some(&self.tracks)
///     }
/// }
/// ```
pub trait ParentItem: Send + Sync {
    /// The type of the children this parent owns.
    type Child: Send + Sync;

    /// Returns the ordered children of this parent, or `None` if it has none.
    fn child_items(&self) -> Option<&[Self::Child]>;

    /// Returns whether this parent starts out expanded.
    fn is_initially_expanded(&self) -> bool {
        false
    }

    /// Returns the children as a slice, treating absent children as empty.
    fn children(&self) -> &[Self::Child] {
        self.child_items().unwrap_or(&[])
    }
}

/// A ready-made parent item: a payload, its children and an initial state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentNode<T, C> {
    /// The parent's own payload.
    pub data: T,
    /// The parent's children, in display order.
    pub children: Vec<C>,
    /// Whether the parent starts out expanded.
    pub initially_expanded: bool,
}

impl<T, C> ParentNode<T, C> {
    /// Creates a collapsed parent with no children.
    pub fn new(data: T) -> Self {
        Self {
            data,
            children: Vec::new(),
            initially_expanded: false,
        }
    }

    /// Sets the children.
    pub fn with_children(mut self, children: Vec<C>) -> Self {
        self.children = children;
        self
    }

    /// Sets whether the parent starts out expanded.
    pub fn with_initially_expanded(mut self, expanded: bool) -> Self {
        self.initially_expanded = expanded;
        self
    }
}

impl<T: Send + Sync, C: Send + Sync> ParentItem for ParentNode<T, C> {
    type Child = C;

    fn child_items(&self) -> Option<&[C]> {
        if self.children.is_empty() {
            None
        } else {
            Some(&self.children)
        }
    }

    fn is_initially_expanded(&self) -> bool {
        self.initially_expanded
    }
}

/// Stable identity of a parent within a model.
///
/// The id is the parent's position in the hierarchy, which never changes for
/// the lifetime of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParentId(usize);

impl ParentId {
    /// Creates an id for the parent at `index` in the hierarchy.
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the parent's index in the hierarchy.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Model-owned wrapper carrying the expansion flag of one parent.
///
/// One wrapper is created per parent when the model is built and is only
/// ever flagged afterwards, never recreated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentWrapper {
    id: ParentId,
    expanded: bool,
}

impl ParentWrapper {
    pub(crate) fn new(id: ParentId, expanded: bool) -> Self {
        Self { id, expanded }
    }

    /// Returns the id of the wrapped parent.
    pub fn id(&self) -> ParentId {
        self.id
    }

    /// Returns whether the wrapped parent is expanded.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub(crate) fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }
}

/// The authoritative, ordered list of parents.
pub struct HierarchyModel<P> {
    parents: Vec<P>,
}

impl<P: ParentItem> HierarchyModel<P> {
    /// Creates a hierarchy from the caller's parents.
    pub fn new(parents: Vec<P>) -> Self {
        Self { parents }
    }

    /// Returns the number of parents.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Returns `true` if there are no parents.
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Returns the parent at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&P> {
        self.parents.get(index)
    }

    /// Returns the parent with the given id, if any.
    pub fn parent(&self, id: ParentId) -> Option<&P> {
        self.parents.get(id.index())
    }

    /// Returns the children of the parent with the given id.
    ///
    /// An unknown id has no children.
    pub fn children(&self, id: ParentId) -> &[P::Child] {
        self.parent(id).map(|parent| parent.children()).unwrap_or(&[])
    }

    /// Returns the number of children of the parent with the given id.
    pub fn child_count(&self, id: ParentId) -> usize {
        self.children(id).len()
    }

    /// Iterates over the parents together with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (ParentId, &P)> + '_ {
        self.parents
            .iter()
            .enumerate()
            .map(|(index, parent)| (ParentId::new(index), parent))
    }

    /// Returns the parents as a slice.
    pub fn as_slice(&self) -> &[P] {
        &self.parents
    }
}

impl<P: ParentItem + PartialEq> HierarchyModel<P> {
    /// Returns the id of the first parent equal to `item`.
    pub fn position_of(&self, item: &P) -> Option<ParentId> {
        self.parents
            .iter()
            .position(|parent| parent == item)
            .map(ParentId::new)
    }
}
