use crate::history::EditValues;
use mm_core::NodeId;

/// Selected and editing node, plus the text captured at selection time.
///
/// `editing` is only ever set together with `selected` on the same id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    selected: Option<NodeId>,
    editing: Option<NodeId>,
    /// Title/content when the node was selected; an edit commit is compared
    /// against this.
    snapshot: Option<EditValues>,
}

impl Selection {
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn editing(&self) -> Option<NodeId> {
        self.editing
    }

    pub fn snapshot(&self) -> Option<&EditValues> {
        self.snapshot.as_ref()
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selected == Some(id)
    }

    pub fn is_editing(&self, id: NodeId) -> bool {
        self.editing == Some(id)
    }

    /// Select `id`. Editing another node ends.
    pub fn select(&mut self, id: NodeId) {
        if self.editing != Some(id) {
            self.editing = None;
        }
        self.selected = Some(id);
    }

    pub fn set_snapshot(&mut self, values: EditValues) {
        self.snapshot = Some(values);
    }

    /// Select `id` and enter edit mode on it.
    pub fn begin_edit(&mut self, id: NodeId) {
        self.selected = Some(id);
        self.editing = Some(id);
    }

    pub fn end_edit(&mut self) {
        self.editing = None;
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.editing = None;
        self.snapshot = None;
    }
}
