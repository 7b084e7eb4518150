//! Change notifications emitted by an expandable list.

use foldlist_core::Signal;

/// Collection of signals emitted by an [`ExpandableListModel`](super::ExpandableListModel).
///
/// Renderers connect to the positional signals to stay synchronized with the
/// flat sequence; an expand/collapse listener connects to the parent signals.
///
/// # Signal Usage
///
/// - **Expand**: one `item_inserted` per child, ascending flat indices
/// - **Collapse**: one `item_removed` per child, descending flat indices
/// - **Restore**: a single `dataset_changed`
/// - **User toggles**: `parent_expanded` / `parent_collapsed` carrying the
///   parent-relative position
///
/// Every signal is emitted after the whole mutation has been applied, with
/// no model lock held, so slots may query the model. Slots must not mutate
/// the model they are connected to.
pub struct ListSignals {
    /// Emitted after a single entry was inserted.
    /// Args: flat index of the new entry
    pub item_inserted: Signal<usize>,

    /// Emitted after a single entry was removed.
    /// Args: flat index the entry occupied
    pub item_removed: Signal<usize>,

    /// Emitted after a bulk change that renderers must fully re-query.
    pub dataset_changed: Signal<()>,

    /// Emitted when a user interaction expanded a parent.
    /// Args: parent-relative position
    pub parent_expanded: Signal<usize>,

    /// Emitted when a user interaction collapsed a parent.
    /// Args: parent-relative position
    pub parent_collapsed: Signal<usize>,
}

impl Default for ListSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl ListSignals {
    /// Creates a new set of list signals.
    pub fn new() -> Self {
        Self {
            item_inserted: Signal::new(),
            item_removed: Signal::new(),
            dataset_changed: Signal::new(),
            parent_expanded: Signal::new(),
            parent_collapsed: Signal::new(),
        }
    }

    /// Emits `item_inserted` for each index of a run, ascending.
    ///
    /// Each index already accounts for the entries inserted before it.
    pub fn emit_run_inserted(&self, first: usize, count: usize) {
        for index in first..first + count {
            self.item_inserted.emit(index);
        }
    }

    /// Emits `item_removed` for each index of a run, descending.
    ///
    /// Each index is still valid at the moment its entry is removed.
    pub fn emit_run_removed(&self, first: usize, count: usize) {
        for index in (first..first + count).rev() {
            self.item_removed.emit(index);
        }
    }

    /// Emits the listener signal matching an expansion transition.
    pub fn emit_parent_toggled(&self, position: usize, expanded: bool) {
        if expanded {
            self.parent_expanded.emit(position);
        } else {
            self.parent_collapsed.emit(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_list_signals_creation() {
        let signals = ListSignals::new();
        assert_eq!(signals.item_inserted.connection_count(), 0);
        assert_eq!(signals.dataset_changed.connection_count(), 0);
    }

    #[test]
    fn test_run_event_order() {
        let signals = ListSignals::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let recv_ins = received.clone();
        signals.item_inserted.connect(move |&index| {
            recv_ins.lock().push(("inserted", index));
        });
        let recv_rem = received.clone();
        signals.item_removed.connect(move |&index| {
            recv_rem.lock().push(("removed", index));
        });

        signals.emit_run_inserted(3, 2);
        signals.emit_run_removed(3, 2);
        signals.emit_run_inserted(9, 0);

        let events = received.lock();
        assert_eq!(
            *events,
            vec![
                ("inserted", 3),
                ("inserted", 4),
                ("removed", 4),
                ("removed", 3)
            ]
        );
    }

    #[test]
    fn test_parent_toggled_routes_by_state() {
        let signals = ListSignals::new();
        let expanded = Arc::new(Mutex::new(Vec::new()));
        let collapsed = Arc::new(Mutex::new(Vec::new()));

        let e = expanded.clone();
        signals.parent_expanded.connect(move |&pos| e.lock().push(pos));
        let c = collapsed.clone();
        signals.parent_collapsed.connect(move |&pos| c.lock().push(pos));

        signals.emit_parent_toggled(1, true);
        signals.emit_parent_toggled(4, false);

        assert_eq!(*expanded.lock(), vec![1]);
        assert_eq!(*collapsed.lock(), vec![4]);
    }
}
