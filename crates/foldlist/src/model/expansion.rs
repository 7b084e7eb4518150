//! The expandable list model: flattening plus the expand/collapse engine.
//!
//! `ExpandableListModel` owns the hierarchy, one [`ParentWrapper`] per
//! parent and the flat sequence derived from them. It is the only mutator of
//! the flat sequence; renderers observe it through [`ListSignals`] and the
//! query methods.

use std::sync::Arc;

use foldlist_core::PerfSpan;
use foldlist_core::logging::{span_names, targets};
use parking_lot::{Mutex, RwLock};

use super::config::ExpandableConfig;
use super::error::{FoldError, FoldResult};
use super::flat_store::{FlatEntry, FlatItemStore};
use super::hierarchy::{HierarchyModel, ParentId, ParentItem, ParentWrapper};
use super::position::{PositionMapper, ViewType};
use super::signals::ListSignals;
use super::view::{
    AttachedView, ChildBinding, ItemBinder, ParentBinding, ViewAttachments, ViewHolder, ViewId,
};

/// Mutable state guarded by the model's lock.
pub(super) struct FlatState {
    pub(super) store: FlatItemStore,
    pub(super) wrappers: Vec<ParentWrapper>,
}

/// Who asked for an expansion transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    /// A click reported by a view. Notifies the listener signals.
    User,
    /// An API call. Notifies attached views.
    Programmatic,
}

/// A resolved flat entry, borrowing the caller's items.
pub enum FlatItem<'a, P: ParentItem> {
    /// A parent row.
    Parent {
        /// The parent's id.
        id: ParentId,
        /// The parent item.
        item: &'a P,
        /// Whether the parent is expanded.
        expanded: bool,
    },
    /// A child row.
    Child {
        /// The owning parent's id.
        parent: ParentId,
        /// Position among the parent's children.
        index: usize,
        /// The child item.
        item: &'a P::Child,
    },
}

impl<P: ParentItem> FlatItem<'_, P> {
    /// Returns the kind of row this item is displayed as.
    pub fn view_type(&self) -> ViewType {
        match self {
            FlatItem::Parent { .. } => ViewType::Parent,
            FlatItem::Child { .. } => ViewType::Child,
        }
    }
}

/// A two-level list flattened for a row-based renderer.
///
/// Parents are displayed in hierarchy order; an expanded parent is followed
/// immediately by its children, in order. Expanding inserts the children as
/// one contiguous run and emits one `item_inserted` per child (ascending);
/// collapsing removes the run and emits one `item_removed` per child
/// (descending).
///
/// # Example
///
/// ```ignore
/// use foldlist::model::{ExpandableListModel, ParentNode};
///
/// let model = ExpandableListModel::new(vec![
///     ParentNode::new("Fruit").with_children(vec!["Apple", "Pear"]),
///     ParentNode::new("Vegetables").with_children(vec!["Leek"]),
/// ]);
///
/// model.signals().item_inserted.connect(|index| {
///     println!("row inserted at {}", index);
/// });
///
/// model.expand_parent(0);
/// assert_eq!(model.item_count(), 4);
/// ```
pub struct ExpandableListModel<P> {
    hierarchy: HierarchyModel<P>,
    pub(super) state: RwLock<FlatState>,
    views: Mutex<ViewAttachments>,
    config: RwLock<ExpandableConfig>,
    signals: ListSignals,
}

impl<P: ParentItem> ExpandableListModel<P> {
    /// Creates a model with the default configuration.
    pub fn new(parents: Vec<P>) -> Self {
        Self::with_config(parents, ExpandableConfig::default())
    }

    /// Creates a model with the given configuration.
    pub fn with_config(parents: Vec<P>, config: ExpandableConfig) -> Self {
        let hierarchy = HierarchyModel::new(parents);
        let (store, wrappers) = FlatItemStore::flatten(&hierarchy);
        tracing::debug!(
            target: targets::MODEL,
            parents = hierarchy.len(),
            flat_len = store.len(),
            "flattened hierarchy"
        );
        Self {
            hierarchy,
            state: RwLock::new(FlatState { store, wrappers }),
            views: Mutex::new(ViewAttachments::default()),
            config: RwLock::new(config),
            signals: ListSignals::new(),
        }
    }

    /// Returns the signals for this model.
    pub fn signals(&self) -> &ListSignals {
        &self.signals
    }

    /// Returns the hierarchy the model was built from.
    pub fn hierarchy(&self) -> &HierarchyModel<P> {
        &self.hierarchy
    }

    /// Returns a copy of the current configuration.
    pub fn config(&self) -> ExpandableConfig {
        self.config.read().clone()
    }

    /// Replaces the configuration.
    pub fn set_config(&self, config: ExpandableConfig) {
        *self.config.write() = config;
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Returns the number of entries in the flat sequence.
    pub fn item_count(&self) -> usize {
        self.state.read().store.len()
    }

    /// Returns the number of parents.
    pub fn parent_count(&self) -> usize {
        self.hierarchy.len()
    }

    /// Returns the parent at `parent_index` in the hierarchy.
    pub fn parent_item(&self, parent_index: usize) -> Option<&P> {
        self.hierarchy.get(parent_index)
    }

    /// Returns a copy of the flat sequence.
    pub fn flat_entries(&self) -> Vec<FlatEntry> {
        self.state.read().store.as_slice().to_vec()
    }

    /// Returns the validated entry at `flat_index`.
    pub fn entry(&self, flat_index: usize) -> FoldResult<FlatEntry> {
        let state = self.state.read();
        PositionMapper::new(&state.store, &self.hierarchy).entry_at(flat_index)
    }

    /// Returns the item displayed at `flat_index`.
    pub fn item_at(&self, flat_index: usize) -> FoldResult<FlatItem<'_, P>> {
        let (entry, expanded) = {
            let state = self.state.read();
            let entry = PositionMapper::new(&state.store, &self.hierarchy).entry_at(flat_index)?;
            let expanded = state
                .wrappers
                .get(entry.parent_id().index())
                .is_some_and(ParentWrapper::is_expanded);
            (entry, expanded)
        };

        let unrecognized = || FoldError::UnrecognizedEntry { index: flat_index };
        match entry {
            FlatEntry::Parent(id) => Ok(FlatItem::Parent {
                id,
                item: self.hierarchy.parent(id).ok_or_else(unrecognized)?,
                expanded,
            }),
            FlatEntry::Child { parent, index } => Ok(FlatItem::Child {
                parent,
                index,
                item: self
                    .hierarchy
                    .children(parent)
                    .get(index)
                    .ok_or_else(unrecognized)?,
            }),
        }
    }

    /// Returns the kind of row at `flat_index`.
    pub fn view_type(&self, flat_index: usize) -> FoldResult<ViewType> {
        let state = self.state.read();
        PositionMapper::new(&state.store, &self.hierarchy).view_type(flat_index)
    }

    /// Returns the flat index of the `parent_index`-th parent.
    pub fn parent_flat_index(&self, parent_index: usize) -> Option<usize> {
        let state = self.state.read();
        PositionMapper::new(&state.store, &self.hierarchy).parent_flat_index(parent_index)
    }

    /// Counts child entries strictly before `flat_index`.
    ///
    /// `flat_index` may equal `item_count()`.
    pub fn visible_child_count_before(&self, flat_index: usize) -> FoldResult<usize> {
        let state = self.state.read();
        Self::check_position(&state.store, flat_index)?;
        Ok(PositionMapper::new(&state.store, &self.hierarchy).visible_child_count_before(flat_index))
    }

    /// Converts a flat index into a parent-relative position.
    pub fn parent_relative_position(&self, flat_index: usize) -> FoldResult<usize> {
        let state = self.state.read();
        Self::check_position(&state.store, flat_index)?;
        Ok(PositionMapper::new(&state.store, &self.hierarchy).parent_relative_position(flat_index))
    }

    /// Returns the hierarchy index of the parent that owns `flat_index`.
    pub fn parent_index_at(&self, flat_index: usize) -> FoldResult<usize> {
        Ok(self.entry(flat_index)?.parent_id().index())
    }

    /// Returns the wrapper of the parent with the given id.
    ///
    /// The same wrapper (same id, current flag) is returned across toggles.
    pub fn wrapper(&self, id: ParentId) -> Option<ParentWrapper> {
        self.state.read().wrappers.get(id.index()).copied()
    }

    /// Returns whether the parent with the given id is expanded.
    pub fn is_expanded(&self, id: ParentId) -> bool {
        self.wrapper(id).is_some_and(|w| w.is_expanded())
    }

    fn check_position(store: &FlatItemStore, flat_index: usize) -> FoldResult<()> {
        if flat_index > store.len() {
            return Err(FoldError::IndexOutOfRange {
                index: flat_index,
                len: store.len(),
            });
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Programmatic expand / collapse
    // -------------------------------------------------------------------------

    /// Expands the `parent_index`-th parent.
    ///
    /// Returns `true` if the parent changed state. An unknown index or an
    /// already expanded parent is a no-op.
    pub fn expand_parent(&self, parent_index: usize) -> bool {
        self.set_expanded_by_index(parent_index, true)
    }

    /// Collapses the `parent_index`-th parent.
    ///
    /// Returns `true` if the parent changed state.
    pub fn collapse_parent(&self, parent_index: usize) -> bool {
        self.set_expanded_by_index(parent_index, false)
    }

    /// Expands every parent, in hierarchy order.
    ///
    /// Returns the number of parents that changed state.
    pub fn expand_all(&self) -> usize {
        let _span = PerfSpan::new(span_names::EXPANSION);
        self.set_all(true)
    }

    /// Collapses every parent, in hierarchy order.
    ///
    /// Returns the number of parents that changed state.
    pub fn collapse_all(&self) -> usize {
        let _span = PerfSpan::new(span_names::EXPANSION);
        self.set_all(false)
    }

    fn set_all(&self, expanded: bool) -> usize {
        (0..self.hierarchy.len())
            .filter(|&index| self.transition(ParentId::new(index), expanded, Trigger::Programmatic))
            .count()
    }

    fn set_expanded_by_index(&self, parent_index: usize, expanded: bool) -> bool {
        if parent_index >= self.hierarchy.len() {
            tracing::trace!(
                target: targets::EXPANSION,
                parent_index,
                "no parent at index, ignoring"
            );
            return false;
        }
        self.transition(ParentId::new(parent_index), expanded, Trigger::Programmatic)
    }

    // -------------------------------------------------------------------------
    // User interaction
    // -------------------------------------------------------------------------

    /// Handles a view reporting that the parent row at `flat_index` was
    /// expanded by the user.
    ///
    /// Returns `Ok(false)` if the row is a child, the parent was already
    /// expanded, or user toggles are disabled.
    pub fn expand_from_view(&self, flat_index: usize) -> FoldResult<bool> {
        self.user_transition(flat_index, Some(true))
    }

    /// Handles a view reporting that the parent row at `flat_index` was
    /// collapsed by the user.
    pub fn collapse_from_view(&self, flat_index: usize) -> FoldResult<bool> {
        self.user_transition(flat_index, Some(false))
    }

    /// Handles a click on the parent row at `flat_index`, flipping its state.
    pub fn toggle_from_view(&self, flat_index: usize) -> FoldResult<bool> {
        self.user_transition(flat_index, None)
    }

    fn user_transition(&self, flat_index: usize, target: Option<bool>) -> FoldResult<bool> {
        let FlatEntry::Parent(id) = self.entry(flat_index)? else {
            return Ok(false);
        };
        if !self.config.read().items_expandable {
            tracing::trace!(
                target: targets::EXPANSION,
                flat_index,
                "user toggles disabled, ignoring"
            );
            return Ok(false);
        }
        let expanded = target.unwrap_or_else(|| !self.is_expanded(id));
        Ok(self.transition(id, expanded, Trigger::User))
    }

    // -------------------------------------------------------------------------
    // Views
    // -------------------------------------------------------------------------

    /// Attaches a view to be notified of programmatic transitions.
    pub fn attach_view(&self, view: Arc<dyn AttachedView>) -> ViewId {
        let id = self.views.lock().attach(view);
        tracing::debug!(target: targets::MODEL, ?id, "view attached");
        id
    }

    /// Detaches a view. Returns `false` if it was not attached.
    pub fn detach_view(&self, id: ViewId) -> bool {
        let detached = self.views.lock().detach(id);
        tracing::debug!(target: targets::MODEL, ?id, detached, "view detached");
        detached
    }

    /// Returns the number of attached views.
    pub fn attached_view_count(&self) -> usize {
        self.views.lock().len()
    }

    /// Binds the row at `flat_index` into a renderer-owned holder.
    ///
    /// Fails with `ViewTypeMismatch` if the holder's kind does not match the
    /// entry at `flat_index`.
    pub fn bind<B: ItemBinder<P>>(
        &self,
        flat_index: usize,
        holder: ViewHolder<'_, B::ParentHolder, B::ChildHolder>,
        binder: &mut B,
    ) -> FoldResult<()> {
        let toggle_on_click = self.config.read().toggle_on_item_click;
        match (self.item_at(flat_index)?, holder) {
            (FlatItem::Parent { id, item, expanded }, ViewHolder::Parent(holder)) => {
                binder.bind_parent(
                    holder,
                    ParentBinding {
                        flat_index,
                        parent_index: id.index(),
                        item,
                        expanded,
                        toggle_on_click,
                    },
                );
                Ok(())
            }
            (FlatItem::Child { parent, index, item }, ViewHolder::Child(holder)) => {
                binder.bind_child(
                    holder,
                    ChildBinding {
                        flat_index,
                        parent_index: parent.index(),
                        child_index: index,
                        item,
                    },
                );
                Ok(())
            }
            (item, _) => Err(FoldError::ViewTypeMismatch {
                index: flat_index,
                expected: item.view_type(),
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Engine
    // -------------------------------------------------------------------------

    /// Moves one parent to `expanded`, inserting or removing its child run.
    ///
    /// The whole run is applied under the write lock; events are emitted
    /// afterwards in the order a renderer would have seen them slot by slot.
    #[tracing::instrument(skip(self), target = "foldlist::model::expansion", level = "trace")]
    fn transition(&self, id: ParentId, expanded: bool, trigger: Trigger) -> bool {
        let child_count = self.hierarchy.child_count(id);

        let (flat_index, position) = {
            let mut state = self.state.write();
            let Some(was_expanded) = state.wrappers.get(id.index()).map(|w| w.is_expanded()) else {
                return false;
            };
            if was_expanded == expanded {
                tracing::trace!(target: targets::EXPANSION, parent = id.index(), expanded, "already in target state");
                return false;
            }

            let mapper = PositionMapper::new(&state.store, &self.hierarchy);
            let Some(flat_index) = mapper.flat_index_of(id) else {
                tracing::error!(target: targets::EXPANSION, parent = id.index(), "parent missing from flat sequence");
                return false;
            };
            let position = mapper.parent_relative_position(flat_index);

            let applied = if expanded {
                state
                    .store
                    .insert_run(flat_index + 1, FlatItemStore::child_run(id, child_count))
                    .map(|_| ())
            } else {
                state.store.remove_run(flat_index + 1, child_count).map(|_| ())
            };
            if let Err(err) = applied {
                tracing::error!(target: targets::EXPANSION, parent = id.index(), %err, "child run out of place");
                return false;
            }
            if let Some(wrapper) = state.wrappers.get_mut(id.index()) {
                wrapper.set_expanded(expanded);
            }
            (flat_index, position)
        };

        tracing::debug!(
            target: targets::EXPANSION,
            parent = id.index(),
            flat_index,
            position,
            children = child_count,
            expanded,
            ?trigger,
            "parent toggled"
        );

        if expanded {
            self.signals.emit_run_inserted(flat_index + 1, child_count);
        } else {
            self.signals.emit_run_removed(flat_index + 1, child_count);
        }

        match trigger {
            Trigger::User => self.signals.emit_parent_toggled(position, expanded),
            Trigger::Programmatic => {
                if self.config.read().notify_attached_views {
                    let views = self.views.lock().snapshot();
                    for view in views {
                        view.parent_expansion_changed(flat_index, expanded);
                    }
                }
            }
        }

        true
    }
}

impl<P: ParentItem + PartialEq> ExpandableListModel<P> {
    /// Returns the id of the parent equal to `item`, if it is in the list.
    pub fn parent_id_of(&self, item: &P) -> Option<ParentId> {
        self.hierarchy.position_of(item)
    }

    /// Expands the parent equal to `item`.
    ///
    /// A parent that is not in the list is silently ignored.
    pub fn expand_parent_item(&self, item: &P) -> bool {
        self.set_expanded_by_item(item, true)
    }

    /// Collapses the parent equal to `item`.
    ///
    /// A parent that is not in the list is silently ignored.
    pub fn collapse_parent_item(&self, item: &P) -> bool {
        self.set_expanded_by_item(item, false)
    }

    fn set_expanded_by_item(&self, item: &P, expanded: bool) -> bool {
        match self.parent_id_of(item) {
            Some(id) => self.transition(id, expanded, Trigger::Programmatic),
            None => {
                tracing::trace!(target: targets::EXPANSION, "parent item not found, ignoring");
                false
            }
        }
    }
}

static_assertions::assert_impl_all!(
    ExpandableListModel<super::hierarchy::ParentNode<String, String>>: Send, Sync
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::hierarchy::ParentNode;

    type Node = ParentNode<&'static str, &'static str>;

    fn node(name: &'static str, children: &[&'static str]) -> Node {
        ParentNode::new(name).with_children(children.to_vec())
    }

    #[test]
    fn test_initial_flattening() {
        let model = ExpandableListModel::new(vec![
            node("A", &["a1", "a2"]),
            node("B", &["b1"]).with_initially_expanded(true),
        ]);

        assert_eq!(model.item_count(), 4);
        assert_eq!(model.view_type(0).unwrap(), ViewType::Parent);
        assert_eq!(model.view_type(2).unwrap(), ViewType::Child);
        assert!(!model.is_expanded(ParentId::new(0)));
        assert!(model.is_expanded(ParentId::new(1)));
    }

    #[test]
    fn test_item_at_resolves_items() {
        let model = ExpandableListModel::new(vec![
            node("A", &["a1", "a2"]).with_initially_expanded(true),
        ]);

        match model.item_at(0).unwrap() {
            FlatItem::Parent { id, item, expanded } => {
                assert_eq!(id, ParentId::new(0));
                assert_eq!(item.data, "A");
                assert!(expanded);
            }
            FlatItem::Child { .. } => panic!("expected a parent"),
        }
        match model.item_at(2).unwrap() {
            FlatItem::Child { parent, index, item } => {
                assert_eq!(parent, ParentId::new(0));
                assert_eq!(index, 1);
                assert_eq!(*item, "a2");
            }
            FlatItem::Parent { .. } => panic!("expected a child"),
        }
        assert!(matches!(
            model.item_at(3),
            Err(FoldError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_expand_collapse_by_index() {
        let model = ExpandableListModel::new(vec![node("A", &["a1", "a2"]), node("B", &[])]);

        assert!(model.expand_parent(0));
        assert_eq!(model.item_count(), 4);
        assert!(!model.expand_parent(0));
        assert_eq!(model.item_count(), 4);

        assert!(model.collapse_parent(0));
        assert_eq!(model.item_count(), 2);
        assert!(!model.collapse_parent(0));
        assert!(!model.expand_parent(9));
    }

    #[test]
    fn test_expand_parent_without_children_flips_state_only() {
        let model = ExpandableListModel::new(vec![node("A", &[])]);

        assert!(model.expand_parent(0));
        assert!(model.is_expanded(ParentId::new(0)));
        assert_eq!(model.item_count(), 1);
    }

    #[test]
    fn test_expand_by_identity() {
        let model = ExpandableListModel::new(vec![node("A", &["a1"]), node("B", &["b1"])]);

        assert!(model.expand_parent_item(&node("B", &["b1"])));
        assert_eq!(model.parent_flat_index(1), Some(1));
        assert_eq!(model.view_type(2).unwrap(), ViewType::Child);

        assert!(!model.expand_parent_item(&node("Z", &[])));
        assert!(!model.collapse_parent_item(&node("Z", &[])));
        assert_eq!(model.item_count(), 3);

        assert!(model.collapse_parent_item(&node("B", &["b1"])));
        assert_eq!(model.item_count(), 2);
    }

    #[test]
    fn test_expand_all_and_collapse_all() {
        let model = ExpandableListModel::new(vec![
            node("A", &["a1"]),
            node("B", &["b1", "b2"]).with_initially_expanded(true),
            node("C", &[]),
        ]);

        assert_eq!(model.expand_all(), 2);
        assert_eq!(model.item_count(), 6);
        assert_eq!(model.expand_all(), 0);

        assert_eq!(model.collapse_all(), 3);
        assert_eq!(model.item_count(), 3);
    }

    #[test]
    fn test_parent_index_at() {
        let model = ExpandableListModel::new(vec![
            node("A", &["a1"]).with_initially_expanded(true),
            node("B", &[]),
        ]);

        assert_eq!(model.parent_index_at(0).unwrap(), 0);
        assert_eq!(model.parent_index_at(1).unwrap(), 0);
        assert_eq!(model.parent_index_at(2).unwrap(), 1);
        assert!(model.parent_index_at(3).is_err());
    }

    #[test]
    fn test_user_toggle_respects_config() {
        let model = ExpandableListModel::with_config(
            vec![node("A", &["a1"])],
            ExpandableConfig::default().with_items_expandable(false),
        );

        assert!(!model.toggle_from_view(0).unwrap());
        assert_eq!(model.item_count(), 1);

        // Programmatic calls are not gated.
        assert!(model.expand_parent(0));
        assert_eq!(model.item_count(), 2);
    }

    #[test]
    fn test_user_toggle_on_child_row_is_noop() {
        let model = ExpandableListModel::new(vec![
            node("A", &["a1"]).with_initially_expanded(true),
        ]);

        assert!(!model.collapse_from_view(1).unwrap());
        assert!(model.is_expanded(ParentId::new(0)));
        assert!(matches!(
            model.toggle_from_view(5),
            Err(FoldError::IndexOutOfRange { index: 5, len: 2 })
        ));
    }

    #[test]
    fn test_visible_child_count_bounds() {
        let model = ExpandableListModel::new(vec![
            node("A", &["a1"]).with_initially_expanded(true),
            node("B", &[]),
        ]);

        assert_eq!(model.visible_child_count_before(0).unwrap(), 0);
        assert_eq!(model.visible_child_count_before(3).unwrap(), 1);
        assert_eq!(model.parent_relative_position(2).unwrap(), 1);
        assert!(model.visible_child_count_before(4).is_err());
    }
}
