//! Capturing and restoring per-parent expansion state.
//!
//! A snapshot maps each parent's parent-relative position to its expanded
//! flag. Keys do not depend on which parents happen to be expanded, so a
//! snapshot taken from one model can be replayed onto a freshly built model
//! over the same parents (for example after the host recreates its views).
//!
//! Snapshots survive a round trip through a plain key-value blob:
//!
//! ```ignore
//! let mut bundle = StateBundle::new();
//! model.save_instance_state(&mut bundle)?;
//! let text = bundle.to_json_string()?;
//!
//! // ... later, on a new model over the same parents ...
//! let bundle = StateBundle::from_json_str(&text)?;
//! new_model.restore_instance_state(&bundle)?;
//! ```
//!
//! The parents must be identical, in identical order, to those at capture
//! time. This is not validated; a mismatched restore is best-effort.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use foldlist_core::PerfSpan;
use foldlist_core::logging::{span_names, targets};
use serde::{Deserialize, Serialize};

use super::error::FoldResult;
use super::expansion::ExpandableListModel;
use super::flat_store::{FlatEntry, FlatItemStore};
use super::hierarchy::ParentItem;

/// Bundle key under which the expansion snapshot is stored.
pub const EXPANDED_STATE_KEY: &str = "ExpandableListModel.ExpandedStateMap";

/// Expanded flags keyed by parent-relative position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpansionSnapshot {
    states: BTreeMap<usize, bool>,
}

impl ExpansionSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the state of the parent at `position`.
    pub fn insert(&mut self, position: usize, expanded: bool) {
        self.states.insert(position, expanded);
    }

    /// Returns the recorded state of the parent at `position`.
    pub fn get(&self, position: usize) -> Option<bool> {
        self.states.get(&position).copied()
    }

    /// Returns the number of recorded parents.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` if nothing is recorded.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Iterates over `(position, expanded)` pairs in position order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, bool)> + '_ {
        self.states.iter().map(|(&position, &expanded)| (position, expanded))
    }

    /// Encodes the snapshot as a JSON object, e.g. `{"0":true,"1":false}`.
    pub fn to_json_value(&self) -> FoldResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Decodes a snapshot from a JSON object.
    pub fn from_json_value(value: serde_json::Value) -> FoldResult<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

impl FromIterator<(usize, bool)> for ExpansionSnapshot {
    fn from_iter<I: IntoIterator<Item = (usize, bool)>>(iter: I) -> Self {
        Self {
            states: iter.into_iter().collect(),
        }
    }
}

/// A string-keyed blob of persisted values, as handed over by a host that
/// saves and restores view state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateBundle {
    values: HashMap<String, serde_json::Value>,
}

impl StateBundle {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value under `key`, replacing any previous value.
    pub fn put(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.values.insert(key.into(), value);
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    /// Returns `true` if a value is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Serializes the bundle as JSON text.
    pub fn to_json_string(&self) -> FoldResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a bundle from JSON text.
    pub fn from_json_str(text: &str) -> FoldResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

impl<P: ParentItem> ExpandableListModel<P> {
    /// Captures the expanded flag of every parent.
    pub fn capture_expansion_state(&self) -> ExpansionSnapshot {
        let state = self.state.read();
        let mut snapshot = ExpansionSnapshot::new();
        let mut children_seen = 0;

        for (flat_index, entry) in state.store.iter().enumerate() {
            match *entry {
                FlatEntry::Parent(id) => {
                    let expanded = state
                        .wrappers
                        .get(id.index())
                        .is_some_and(|w| w.is_expanded());
                    snapshot.insert(flat_index - children_seen, expanded);
                }
                FlatEntry::Child { .. } => children_seen += 1,
            }
        }

        tracing::debug!(target: targets::SNAPSHOT, parents = snapshot.len(), "captured expansion state");
        snapshot
    }

    /// Replays a captured snapshot onto this model.
    ///
    /// Each parent whose position is in the snapshot takes the recorded
    /// state, and its child run is inserted or removed to match. Parents
    /// missing from the snapshot are left alone. Emits a single
    /// `dataset_changed` afterwards instead of per-index events.
    pub fn restore_expansion_state(&self, snapshot: &ExpansionSnapshot) {
        let _span = PerfSpan::new(span_names::SNAPSHOT);
        let mut matched = BTreeSet::new();
        let mut changed = 0usize;

        {
            let mut state = self.state.write();
            let mut flat_index = 0;
            let mut children_seen = 0;

            while flat_index < state.store.len() {
                let entry = state.store.as_slice()[flat_index];
                let id = match entry {
                    FlatEntry::Child { .. } => {
                        children_seen += 1;
                        flat_index += 1;
                        continue;
                    }
                    FlatEntry::Parent(id) => id,
                };

                let position = flat_index - children_seen;
                let (Some(wanted), Some(present)) = (
                    snapshot.get(position),
                    state.wrappers.get(id.index()).map(|w| w.is_expanded()),
                ) else {
                    flat_index += 1;
                    continue;
                };
                matched.insert(position);

                // Children are in the sequence exactly when the wrapper is expanded.
                if wanted != present {
                    let child_count = self.hierarchy().child_count(id);
                    let applied = if wanted {
                        state
                            .store
                            .insert_run(flat_index + 1, FlatItemStore::child_run(id, child_count))
                            .map(|_| ())
                    } else {
                        state.store.remove_run(flat_index + 1, child_count).map(|_| ())
                    };
                    match applied {
                        Ok(()) => {
                            if let Some(wrapper) = state.wrappers.get_mut(id.index()) {
                                wrapper.set_expanded(wanted);
                            }
                            changed += 1;
                            if wanted {
                                // Step over the inserted run, counting it.
                                flat_index += child_count;
                                children_seen += child_count;
                            }
                        }
                        Err(err) => {
                            tracing::error!(
                                target: targets::SNAPSHOT,
                                parent = id.index(),
                                %err,
                                "could not reconcile child run"
                            );
                        }
                    }
                }
                flat_index += 1;
            }
        }

        let unmatched = snapshot.len() - matched.len();
        if unmatched > 0 {
            tracing::warn!(
                target: targets::SNAPSHOT,
                unmatched,
                "snapshot positions did not match any parent; parents differ from capture time"
            );
        }
        tracing::debug!(target: targets::SNAPSHOT, changed, "restored expansion state");

        self.signals().dataset_changed.emit(());
    }

    /// Stores the current expansion snapshot in `bundle`.
    pub fn save_instance_state(&self, bundle: &mut StateBundle) -> FoldResult<()> {
        let value = self.capture_expansion_state().to_json_value()?;
        bundle.put(EXPANDED_STATE_KEY, value);
        Ok(())
    }

    /// Restores the expansion snapshot stored in `bundle`.
    ///
    /// Returns `Ok(false)` without touching the model if the bundle holds no
    /// snapshot, and fails with `FoldError::Snapshot` if the stored value is
    /// not a snapshot.
    pub fn restore_instance_state(&self, bundle: &StateBundle) -> FoldResult<bool> {
        let Some(value) = bundle.get(EXPANDED_STATE_KEY) else {
            tracing::trace!(target: targets::SNAPSHOT, "no expansion state in bundle");
            return Ok(false);
        };
        let snapshot = ExpansionSnapshot::from_json_value(value.clone())?;
        self.restore_expansion_state(&snapshot);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::error::FoldError;
    use crate::model::hierarchy::{ParentId, ParentNode};
    use parking_lot::Mutex;
    use std::sync::Arc;

    type Node = ParentNode<&'static str, u32>;

    fn parents() -> Vec<Node> {
        vec![
            ParentNode::new("A").with_children(vec![1, 2]),
            ParentNode::new("B")
                .with_children(vec![3])
                .with_initially_expanded(true),
            ParentNode::new("C").with_children(vec![4, 5, 6]),
        ]
    }

    #[test]
    fn test_capture_keys_ignore_expanded_children() {
        let model = ExpandableListModel::new(parents());
        model.expand_parent(0);

        let snapshot = model.capture_expansion_state();
        let pairs: Vec<(usize, bool)> = snapshot.iter().collect();
        assert_eq!(pairs, vec![(0, true), (1, true), (2, false)]);
    }

    #[test]
    fn test_capture_then_restore_is_identity() {
        let model = ExpandableListModel::new(parents());
        model.expand_parent(2);
        let before = model.flat_entries();

        let snapshot = model.capture_expansion_state();
        model.restore_expansion_state(&snapshot);

        assert_eq!(model.flat_entries(), before);
    }

    #[test]
    fn test_restore_onto_fresh_model() {
        let captured = ExpandableListModel::new(parents());
        captured.expand_parent(0);
        captured.collapse_parent(1);
        captured.expand_parent(2);
        let snapshot = captured.capture_expansion_state();

        let restored = ExpandableListModel::new(parents());
        restored.restore_expansion_state(&snapshot);

        assert_eq!(restored.flat_entries(), captured.flat_entries());
        assert!(restored.is_expanded(ParentId::new(0)));
        assert!(!restored.is_expanded(ParentId::new(1)));
        assert!(restored.is_expanded(ParentId::new(2)));
    }

    #[test]
    fn test_restore_emits_single_dataset_changed() {
        let model = ExpandableListModel::new(parents());
        let events = Arc::new(Mutex::new(Vec::new()));

        let e = events.clone();
        model
            .signals()
            .item_inserted
            .connect(move |&i| e.lock().push(format!("inserted {i}")));
        let e = events.clone();
        model
            .signals()
            .dataset_changed
            .connect(move |_| e.lock().push("changed".to_string()));

        let snapshot: ExpansionSnapshot = [(0, true), (2, true)].into_iter().collect();
        model.restore_expansion_state(&snapshot);

        assert_eq!(*events.lock(), vec!["changed".to_string()]);
        assert_eq!(model.item_count(), 3 + 2 + 1 + 3);
    }

    #[test]
    fn test_partial_snapshot_leaves_other_parents() {
        let model = ExpandableListModel::new(parents());
        let snapshot: ExpansionSnapshot = [(1, false)].into_iter().collect();

        model.restore_expansion_state(&snapshot);

        assert_eq!(model.item_count(), 3);
        assert!(!model.is_expanded(ParentId::new(0)));
        assert!(!model.is_expanded(ParentId::new(1)));
    }

    #[test]
    fn test_restore_with_mismatched_parents_is_best_effort() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let model = ExpandableListModel::new(vec![
            ParentNode::new("A").with_children(vec![1, 2]),
            ParentNode::new("B").with_children(vec![3]),
        ]);
        let fired = Arc::new(Mutex::new(0));
        let f = fired.clone();
        model.signals().dataset_changed.connect(move |_| *f.lock() += 1);

        // Position 9 does not exist on a two-parent list.
        let snapshot: ExpansionSnapshot = [(0, true), (9, true)].into_iter().collect();
        model.restore_expansion_state(&snapshot);

        assert!(model.is_expanded(ParentId::new(0)));
        assert!(!model.is_expanded(ParentId::new(1)));
        assert_eq!(model.item_count(), 4);
        assert_eq!(model.parent_flat_index(1), Some(3));
        assert_eq!(*fired.lock(), 1);
    }

    #[test]
    fn test_bundle_round_trip_through_text() {
        let model = ExpandableListModel::new(parents());
        model.expand_parent(0);

        let mut bundle = StateBundle::new();
        model.save_instance_state(&mut bundle).unwrap();
        let text = bundle.to_json_string().unwrap();
        assert!(text.contains(EXPANDED_STATE_KEY));

        let fresh = ExpandableListModel::new(parents());
        let bundle = StateBundle::from_json_str(&text).unwrap();
        assert!(fresh.restore_instance_state(&bundle).unwrap());
        assert_eq!(fresh.flat_entries(), model.flat_entries());
    }

    #[test]
    fn test_bundle_without_state_is_noop() {
        let model = ExpandableListModel::new(parents());
        let fired = Arc::new(Mutex::new(0));
        let f = fired.clone();
        model.signals().dataset_changed.connect(move |_| *f.lock() += 1);

        assert!(!model.restore_instance_state(&StateBundle::new()).unwrap());
        assert_eq!(*fired.lock(), 0);
    }

    #[test]
    fn test_bundle_with_garbage_state() {
        let model = ExpandableListModel::new(parents());
        let mut bundle = StateBundle::new();
        bundle.put(EXPANDED_STATE_KEY, serde_json::json!(["not", "a", "map"]));

        let err = model.restore_instance_state(&bundle).unwrap_err();
        assert!(matches!(err, FoldError::Snapshot(_)));
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot: ExpansionSnapshot = [(0, true), (1, false)].into_iter().collect();
        let value = snapshot.to_json_value().unwrap();
        assert_eq!(value, serde_json::json!({"0": true, "1": false}));
        assert_eq!(ExpansionSnapshot::from_json_value(value).unwrap(), snapshot);
    }
}
