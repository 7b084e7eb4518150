//! The seam between the model and the renderers that display it.
//!
//! The model never holds view types. Renderers are reached through two
//! small interfaces:
//!
//! - [`AttachedView`]: a registered renderer that wants to animate rows when
//!   a parent is expanded or collapsed programmatically
//! - [`ItemBinder`]: fills a renderer-owned row holder with the data for one
//!   flat index

use std::sync::Arc;

use slotmap::{SlotMap, new_key_type};

use super::hierarchy::ParentItem;
use super::position::ViewType;

/// A renderer view attached to a model.
///
/// Views are called back once per programmatic transition, in attachment
/// order. A transition triggered by the view itself (a click reported
/// through `expand_from_view` and friends) is not echoed back.
pub trait AttachedView: Send + Sync {
    /// Called after the parent at `flat_index` changed state.
    fn parent_expansion_changed(&self, flat_index: usize, expanded: bool);
}

new_key_type! {
    /// Handle returned when a view is attached; used to detach it.
    pub struct ViewId;
}

struct Attachment {
    /// Attachment sequence; slotmap keys are reused, so order lives here.
    seq: u64,
    view: Arc<dyn AttachedView>,
}

/// The set of currently attached views.
#[derive(Default)]
pub(crate) struct ViewAttachments {
    views: SlotMap<ViewId, Attachment>,
    next_seq: u64,
}

impl ViewAttachments {
    pub(crate) fn attach(&mut self, view: Arc<dyn AttachedView>) -> ViewId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.views.insert(Attachment { seq, view })
    }

    pub(crate) fn detach(&mut self, id: ViewId) -> bool {
        self.views.remove(id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.views.len()
    }

    /// Clones out the views in attachment order so callbacks run without the
    /// attachment lock.
    pub(crate) fn snapshot(&self) -> Vec<Arc<dyn AttachedView>> {
        let mut ordered: Vec<&Attachment> = self.views.values().collect();
        ordered.sort_by_key(|attachment| attachment.seq);
        ordered
            .into_iter()
            .map(|attachment| attachment.view.clone())
            .collect()
    }
}

/// Data handed to a binder for a parent row.
#[derive(Debug)]
pub struct ParentBinding<'a, P> {
    /// Flat index of the row.
    pub flat_index: usize,
    /// Position of the parent in the hierarchy.
    pub parent_index: usize,
    /// The parent item.
    pub item: &'a P,
    /// Whether the parent is currently expanded.
    pub expanded: bool,
    /// Whether a click anywhere on the row should toggle expansion.
    pub toggle_on_click: bool,
}

/// Data handed to a binder for a child row.
#[derive(Debug)]
pub struct ChildBinding<'a, C> {
    /// Flat index of the row.
    pub flat_index: usize,
    /// Position of the owning parent in the hierarchy.
    pub parent_index: usize,
    /// Position of the child among its parent's children.
    pub child_index: usize,
    /// The child item.
    pub item: &'a C,
}

/// Fills renderer-owned row holders with model data.
///
/// # Example
///
/// ```ignore
/// struct TextBinder;
///
/// impl ItemBinder<Album> for TextBinder {
///     type ParentHolder = String;
///     type ChildHolder = String;
///
///     fn bind_parent(&mut self, holder: &mut String, binding: ParentBinding<'_, Album>) {
///         let marker = if binding.expanded { "v" } else { ">" };
///         *holder = format!("{marker} {}", binding.item.title);
///     }
///
///     fn bind_child(&mut self, holder: &mut String, binding: ChildBinding<'_, String>) {
///         *holder = format!("    {}", binding.item);
///     }
/// }
/// ```
pub trait ItemBinder<P: ParentItem> {
    /// The holder type used for parent rows.
    type ParentHolder;
    /// The holder type used for child rows.
    type ChildHolder;

    /// Binds a parent row.
    fn bind_parent(&mut self, holder: &mut Self::ParentHolder, binding: ParentBinding<'_, P>);

    /// Binds a child row.
    fn bind_child(&mut self, holder: &mut Self::ChildHolder, binding: ChildBinding<'_, P::Child>);
}

/// A renderer-owned row holder of either kind.
pub enum ViewHolder<'h, PH, CH> {
    /// A holder created for a parent row.
    Parent(&'h mut PH),
    /// A holder created for a child row.
    Child(&'h mut CH),
}

impl<PH, CH> ViewHolder<'_, PH, CH> {
    /// Returns the kind of row this holder was created for.
    pub fn view_type(&self) -> ViewType {
        match self {
            ViewHolder::Parent(_) => ViewType::Parent,
            ViewHolder::Child(_) => ViewType::Child,
        }
    }
}
